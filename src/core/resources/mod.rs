//=========================================================================
// Resource Manager
//=========================================================================
//
// Path-keyed asset caches for textures, sounds and music.
//
// Assets are kept as raw bytes behind `Arc`, so handing one out is a
// reference-count bump. Decoding is left to the consumer. The engine
// constructs one manager rooted at the configured assets folder; the
// frame loop itself never touches it.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::{debug, warn};

//=== Internal Dependencies ===============================================

use crate::error::ResourceError;

//=== Asset ===============================================================

/// Loaded asset bytes and the path they came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Asset {
    path: PathBuf,
    bytes: Arc<[u8]>,
}

impl Asset {
    /// Reads a file fully. Empty files are rejected.
    pub fn load(path: &Path) -> Result<Self, ResourceError> {
        let bytes = fs::read(path).map_err(|source| ResourceError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        if bytes.is_empty() {
            return Err(ResourceError::Empty(path.to_path_buf()));
        }

        Ok(Self {
            path: path.to_path_buf(),
            bytes: bytes.into(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

//=== ResourceManager =====================================================

#[derive(Debug)]
pub struct ResourceManager {
    root: PathBuf,
    textures: HashMap<String, Asset>,
    sounds: HashMap<String, Asset>,
    music: HashMap<String, Asset>,
}

impl ResourceManager {
    /// Creates an empty manager; relative asset names resolve under `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            textures: HashMap::new(),
            sounds: HashMap::new(),
            music: HashMap::new(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    //--- Textures ---------------------------------------------------------

    pub fn load_texture(&mut self, name: &str) -> Result<Asset, ResourceError> {
        Self::load_into(&self.root, &mut self.textures, name)
    }

    pub fn get_texture(&self, name: &str) -> Option<Asset> {
        self.textures.get(name).cloned()
    }

    pub fn unload_texture(&mut self, name: &str) {
        Self::unload_from(&mut self.textures, name);
    }

    //--- Sounds -----------------------------------------------------------

    pub fn load_sound(&mut self, name: &str) -> Result<Asset, ResourceError> {
        Self::load_into(&self.root, &mut self.sounds, name)
    }

    pub fn get_sound(&self, name: &str) -> Option<Asset> {
        self.sounds.get(name).cloned()
    }

    pub fn unload_sound(&mut self, name: &str) {
        Self::unload_from(&mut self.sounds, name);
    }

    //--- Music ------------------------------------------------------------

    pub fn load_music(&mut self, name: &str) -> Result<Asset, ResourceError> {
        Self::load_into(&self.root, &mut self.music, name)
    }

    pub fn get_music(&self, name: &str) -> Option<Asset> {
        self.music.get(name).cloned()
    }

    pub fn unload_music(&mut self, name: &str) {
        Self::unload_from(&mut self.music, name);
    }

    //--- Cleanup ----------------------------------------------------------

    pub fn clear_all(&mut self) {
        self.clear_textures();
        self.clear_audio();
    }

    pub fn clear_textures(&mut self) {
        self.textures.clear();
    }

    /// Drops both sounds and music.
    pub fn clear_audio(&mut self) {
        self.sounds.clear();
        self.music.clear();
    }

    //--- Info -------------------------------------------------------------

    pub fn loaded_texture_count(&self) -> usize {
        self.textures.len()
    }

    pub fn loaded_sound_count(&self) -> usize {
        self.sounds.len()
    }

    pub fn loaded_music_count(&self) -> usize {
        self.music.len()
    }

    //--- Internal Helpers -------------------------------------------------

    fn load_into(
        root: &Path,
        cache: &mut HashMap<String, Asset>,
        name: &str,
    ) -> Result<Asset, ResourceError> {
        if let Some(asset) = cache.get(name) {
            return Ok(asset.clone());
        }

        let asset = Asset::load(&root.join(name))?;
        debug!(target: "resources", "Loaded {} ({} bytes)", asset.path().display(), asset.len());
        cache.insert(name.to_owned(), asset.clone());
        Ok(asset)
    }

    fn unload_from(cache: &mut HashMap<String, Asset>, name: &str) {
        if cache.remove(name).is_none() {
            warn!(target: "resources", "Asset {} is not loaded", name);
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
