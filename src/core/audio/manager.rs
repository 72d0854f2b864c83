//=========================================================================
// Audio Manager
//=========================================================================
//
// Default `AudioSystem` implementation.
//
// Responsibilities:
// - Path-keyed caches for sounds and music
// - Channel bookkeeping (which sound occupies which channel)
// - Volume control, clamped to 0..=128
// - Device teardown on cleanup
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashMap;
use std::path::PathBuf;

use log::{debug, info, trace, warn};

//=== Internal Dependencies ===============================================

use super::device::{AudioDevice, Loop, SilentAudioDevice};
use super::AudioSystem;
use crate::core::config::{AudioConfig, MAX_VOLUME};
use crate::core::resources::Asset;
use crate::error::AudioError;

//=== AudioManager ========================================================

#[derive(Debug)]
pub struct AudioManager<D: AudioDevice = SilentAudioDevice> {
    device: D,
    root: PathBuf,
    sounds: HashMap<String, Asset>,
    music: HashMap<String, Asset>,
    channels: Vec<Option<String>>,
    sound_volume: u8,
    music_volume: u8,
}

impl<D: AudioDevice> AudioManager<D> {
    /// Opens `device` and applies the configured volumes.
    pub fn new(
        mut device: D,
        config: &AudioConfig,
        root: impl Into<PathBuf>,
    ) -> Result<Self, AudioError> {
        device.open(config.channels)?;

        let mut manager = Self {
            device,
            root: root.into(),
            sounds: HashMap::new(),
            music: HashMap::new(),
            channels: vec![None; config.channels],
            sound_volume: MAX_VOLUME,
            music_volume: MAX_VOLUME,
        };
        manager.set_sound_volume(config.sound_volume.into());
        manager.set_music_volume(config.music_volume.into());

        info!(target: "audio", "Audio initialized with {} channels", config.channels);
        Ok(manager)
    }

    pub fn device(&self) -> &D {
        &self.device
    }

    //=====================================================================
    // Sounds
    //=====================================================================

    /// Loads and caches a sound; already cached names are not reloaded.
    pub fn load_sound(&mut self, name: &str) -> Result<(), AudioError> {
        if !self.sounds.contains_key(name) {
            let asset = Asset::load(&self.root.join(name))?;
            debug!(target: "audio", "Loaded sound {}", name);
            self.sounds.insert(name.to_owned(), asset);
        }
        Ok(())
    }

    /// Plays a loaded sound on the first free channel.
    ///
    /// Returns the channel, or `None` when every channel is busy.
    pub fn play_sound(&mut self, name: &str, repeat: Loop) -> Result<Option<usize>, AudioError> {
        let Some(channel) = self.available_channel() else {
            warn!(target: "audio", "No free channel for sound {}", name);
            return Ok(None);
        };

        self.play_sound_on(name, channel, repeat)?;
        Ok(Some(channel))
    }

    /// Plays a loaded sound on a specific channel, replacing what was there.
    pub fn play_sound_on(&mut self, name: &str, channel: usize, repeat: Loop) -> Result<(), AudioError> {
        self.check_channel(channel)?;
        let sound = self
            .sounds
            .get(name)
            .ok_or_else(|| AudioError::UnknownAsset(name.to_owned()))?;

        self.device.play(channel, sound, repeat)?;
        self.channels[channel] = Some(name.to_owned());
        trace!(target: "audio", "Playing {} on channel {}", name, channel);
        Ok(())
    }

    pub fn stop_sound(&mut self, channel: usize) -> Result<(), AudioError> {
        self.check_channel(channel)?;
        self.device.halt(channel);
        self.channels[channel] = None;
        Ok(())
    }

    pub fn stop_all_sounds(&mut self) {
        for (channel, slot) in self.channels.iter_mut().enumerate() {
            if slot.take().is_some() {
                self.device.halt(channel);
            }
        }
    }

    /// Name of the sound occupying `channel`, if any.
    pub fn channel_sound(&self, channel: usize) -> Option<&str> {
        self.channels.get(channel)?.as_deref()
    }

    //=====================================================================
    // Music
    //=====================================================================

    pub fn load_music(&mut self, name: &str) -> Result<(), AudioError> {
        if !self.music.contains_key(name) {
            let asset = Asset::load(&self.root.join(name))?;
            debug!(target: "audio", "Loaded music {}", name);
            self.music.insert(name.to_owned(), asset);
        }
        Ok(())
    }

    pub fn play_music(&mut self, name: &str, repeat: Loop) -> Result<(), AudioError> {
        let track = self
            .music
            .get(name)
            .ok_or_else(|| AudioError::UnknownAsset(name.to_owned()))?;
        self.device.play_music(track, repeat)
    }

    pub fn stop_music(&mut self) {
        self.device.halt_music();
    }

    pub fn pause_music(&mut self) {
        self.device.pause_music();
    }

    pub fn resume_music(&mut self) {
        self.device.resume_music();
    }

    pub fn is_music_playing(&self) -> bool {
        self.device.is_music_playing()
    }

    //=====================================================================
    // Volume
    //=====================================================================

    /// Sets the volume of every channel, clamped to `0..=128`.
    pub fn set_sound_volume(&mut self, volume: i32) {
        self.sound_volume = clamp_volume(volume);
        self.device.set_sound_volume(self.sound_volume);
    }

    /// Sets the music volume, clamped to `0..=128`.
    pub fn set_music_volume(&mut self, volume: i32) {
        self.music_volume = clamp_volume(volume);
        self.device.set_music_volume(self.music_volume);
    }

    pub fn sound_volume(&self) -> u8 {
        self.sound_volume
    }

    pub fn music_volume(&self) -> u8 {
        self.music_volume
    }

    //=====================================================================
    // Channels
    //=====================================================================

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// First channel with nothing playing.
    pub fn available_channel(&self) -> Option<usize> {
        (0..self.channels.len())
            .find(|&channel| self.channels[channel].is_none() && !self.device.is_playing(channel))
    }

    pub fn loaded_sound_count(&self) -> usize {
        self.sounds.len()
    }

    pub fn loaded_music_count(&self) -> usize {
        self.music.len()
    }

    //--- Internal Helpers -------------------------------------------------

    fn check_channel(&self, channel: usize) -> Result<(), AudioError> {
        if !self.device.is_open() {
            return Err(AudioError::DeviceClosed);
        }
        if channel >= self.channels.len() {
            return Err(AudioError::InvalidChannel {
                channel,
                available: self.channels.len(),
            });
        }
        Ok(())
    }
}

impl<D: AudioDevice> AudioSystem for AudioManager<D> {
    fn update(&mut self) {
        if !self.device.is_open() {
            return;
        }

        for (channel, slot) in self.channels.iter_mut().enumerate() {
            if slot.is_some() && !self.device.is_playing(channel) {
                trace!(target: "audio", "Channel {} finished {:?}", channel, slot);
                *slot = None;
            }
        }
    }

    fn cleanup(&mut self) {
        if !self.device.is_open() {
            return;
        }

        self.stop_all_sounds();
        self.device.halt_music();
        self.sounds.clear();
        self.music.clear();
        self.device.close();

        info!(target: "audio", "Audio shut down");
    }
}

fn clamp_volume(volume: i32) -> u8 {
    // Lossless: clamped into 0..=128 first.
    volume.clamp(0, MAX_VOLUME as i32) as u8
}

//=========================================================================
// Unit Tests
//=========================================================================
