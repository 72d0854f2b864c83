//=========================================================================
// Scene Manager
//=========================================================================
//
// Manages scene registration, stack operations, and lifecycle.
//
// Scenes are stored in a HashMap by key and referenced via a stack
// of keys. This allows scenes to maintain state between activations.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashMap;

use log::{debug, warn};

//=== Internal Dependencies ===============================================

use super::{FrameContext, Scene, SceneContext, SceneKey, SceneSystem, SceneTransition, TransitionQueue};
use crate::core::render::RenderTarget;
use crate::error::SceneError;

//=== SceneManager ========================================================

/// Stack-based scene switching.
///
/// The topmost opaque scene and every transparent scene above it are
/// active: they update in stack order and render bottom-up.
pub struct SceneManager<K: SceneKey> {
    scenes: HashMap<K, Box<dyn Scene<K>>>,
    stack: Vec<K>,
    transitions: TransitionQueue<K>,
    started: bool,
}

impl<K: SceneKey> SceneManager<K> {
    //--- Construction -----------------------------------------------------

    pub fn new() -> Self {
        Self {
            scenes: HashMap::new(),
            stack: Vec::new(),
            transitions: TransitionQueue::new(),
            started: false,
        }
    }

    //--- Registration -----------------------------------------------------

    /// Registers a scene. Must happen before the scene is pushed.
    pub fn register_scene<T>(&mut self, key: K, scene: T)
    where
        T: Scene<K> + 'static,
    {
        if self.scenes.insert(key, Box::new(scene)).is_some() {
            warn!(target: "scene", "Scene {:?} was already registered and has been replaced", key);
        }
    }

    /// Registers a scene and puts it on the stack.
    ///
    /// Its `on_enter` runs on the first update.
    pub fn register_default<T>(&mut self, key: K, scene: T)
    where
        T: Scene<K> + 'static,
    {
        self.register_scene(key, scene);

        if self.stack.contains(&key) {
            warn!(target: "scene", "Scene {:?} is already in the stack", key);
        } else {
            debug!(target: "scene", "Registered scene {:?} as default", key);
            self.stack.push(key);
        }
    }

    /// Queues a transition from outside a scene update.
    pub fn request(&mut self, transition: SceneTransition<K>) {
        self.transitions.push(transition);
    }

    //--- Queries ----------------------------------------------------------

    pub fn is_registered(&self, key: K) -> bool {
        self.scenes.contains_key(&key)
    }

    /// Bottom-to-top scene stack.
    pub fn stack(&self) -> &[K] {
        &self.stack
    }

    pub fn top(&self) -> Option<K> {
        self.stack.last().copied()
    }

    //--- Lifecycle --------------------------------------------------------

    fn start(&mut self) {
        self.started = true;
        for &key in &self.stack {
            if let Some(scene) = self.scenes.get_mut(&key) {
                debug!(target: "scene", "Entering initial scene {:?}", key);
                scene.on_enter();
            } else {
                warn!(target: "scene", "Initial scene {:?} not registered", key);
            }
        }
    }

    //--- Transition Processing --------------------------------------------

    /// Applies queued transitions in FIFO order.
    fn process_transitions(&mut self) {
        for transition in self.transitions.take() {
            match transition {
                SceneTransition::Push(key) => self.push_internal(key),
                SceneTransition::Remove(key) => self.remove_internal(key),
                SceneTransition::Replace(old, new) => self.replace_internal(old, new),
                SceneTransition::Clear => self.clear_internal(),
            }
        }
    }

    fn push_internal(&mut self, key: K) {
        if self.stack.contains(&key) {
            warn!(target: "scene", "Scene {:?} is already in the stack, skipping push", key);
            return;
        }

        let Some(scene) = self.scenes.get_mut(&key) else {
            warn!(target: "scene", "Attempted to push unregistered scene {:?}", key);
            return;
        };

        debug!(target: "scene", "Pushing scene {:?}", key);
        self.stack.push(key);
        scene.on_enter();
    }

    fn remove_internal(&mut self, key: K) {
        let Some(pos) = self.stack.iter().position(|&k| k == key) else {
            debug!(target: "scene", "Scene {:?} not in stack, skipping removal", key);
            return;
        };

        debug!(target: "scene", "Removing scene {:?} at position {}", key, pos);
        self.stack.remove(pos);
        if let Some(scene) = self.scenes.get_mut(&key) {
            scene.on_exit();
        }
    }

    fn replace_internal(&mut self, old: K, new: K) {
        let Some(pos) = self.stack.iter().position(|&k| k == old) else {
            warn!(target: "scene", "Scene {:?} not in stack, skipping replacement", old);
            return;
        };

        if self.stack.contains(&new) {
            warn!(target: "scene", "Scene {:?} is already in the stack, skipping replacement", new);
            return;
        }

        if !self.scenes.contains_key(&new) {
            warn!(target: "scene", "Attempted to replace with unregistered scene {:?}", new);
            return;
        }

        debug!(target: "scene", "Replacing scene {:?} with {:?}", old, new);

        if let Some(scene) = self.scenes.get_mut(&old) {
            scene.on_exit();
        }
        self.stack[pos] = new;
        if let Some(scene) = self.scenes.get_mut(&new) {
            scene.on_enter();
        }
    }

    fn clear_internal(&mut self) {
        debug!(target: "scene", "Clearing scene stack");

        // Top-down, mirroring the order scenes were entered.
        for key in self.stack.drain(..).rev() {
            if let Some(scene) = self.scenes.get_mut(&key) {
                scene.on_exit();
            }
        }
    }

    //--- Internal Helpers -------------------------------------------------

    // Bottom-up list: top of stack down to the first opaque scene.
    fn active_scenes(&self) -> Vec<K> {
        let mut active = Vec::new();

        for &key in self.stack.iter().rev() {
            active.push(key);

            if let Some(scene) = self.scenes.get(&key) {
                if !scene.is_transparent() {
                    break;
                }
            }
        }

        active.reverse();
        active
    }
}

impl<K: SceneKey> Default for SceneManager<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: SceneKey> SceneSystem for SceneManager<K> {
    fn update(&mut self, frame: &FrameContext<'_>) -> Result<(), SceneError> {
        if !self.started {
            self.start();
        }

        for key in self.active_scenes() {
            if let Some(scene) = self.scenes.get_mut(&key) {
                let mut ctx = SceneContext::new(frame, &mut self.transitions);
                scene.update(&mut ctx)?;
            }
        }

        self.process_transitions();
        Ok(())
    }

    fn render(&self, target: &mut dyn RenderTarget) -> Result<(), SceneError> {
        for key in self.active_scenes() {
            if let Some(scene) = self.scenes.get(&key) {
                scene.render(target)?;
            }
        }
        Ok(())
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::core::input::InputState;
    use crate::core::render::{Color, Rect, SoftwareRenderer};
    use crate::core::time::FrameTime;
    use crate::engine::EngineHandle;

    //--- Test Helpers -----------------------------------------------------

    #[derive(Clone, Copy, Eq, PartialEq, Hash, Debug)]
    enum TestScene {
        A,
        B,
        C,
    }

    impl SceneKey for TestScene {}

    type Log = Arc<Mutex<Vec<String>>>;

    struct TrackedScene {
        name: &'static str,
        log: Log,
        transparent: bool,
        on_update: Option<SceneTransition<TestScene>>,
        fail: bool,
    }

    impl TrackedScene {
        fn new(name: &'static str, log: &Log) -> Self {
            Self {
                name,
                log: Arc::clone(log),
                transparent: false,
                on_update: None,
                fail: false,
            }
        }

        fn transparent(mut self) -> Self {
            self.transparent = true;
            self
        }

        fn then(mut self, transition: SceneTransition<TestScene>) -> Self {
            self.on_update = Some(transition);
            self
        }

        fn record(&self, what: &str) {
            self.log.lock().unwrap().push(format!("{}:{}", self.name, what));
        }
    }

    impl Scene<TestScene> for TrackedScene {
        fn on_enter(&mut self) {
            self.record("enter");
        }

        fn on_exit(&mut self) {
            self.record("exit");
        }

        fn update(&mut self, ctx: &mut SceneContext<'_, TestScene>) -> Result<(), SceneError> {
            self.record("update");
            if self.fail {
                return Err(SceneError::failed(self.name, "boom"));
            }
            if let Some(transition) = self.on_update.take() {
                ctx.transition(transition);
            }
            Ok(())
        }

        fn render(&self, target: &mut dyn RenderTarget) -> Result<(), SceneError> {
            self.record("render");
            target.fill_rect(Rect::new(0.0, 0.0, 1.0, 1.0), Color::WHITE);
            Ok(())
        }

        fn is_transparent(&self) -> bool {
            self.transparent
        }
    }

    fn drive(manager: &mut SceneManager<TestScene>) -> Result<(), SceneError> {
        let input = InputState::new();
        let engine = EngineHandle::new(60);
        let frame = FrameContext {
            time: FrameTime {
                delta_time: 0.016,
                total_time: 0.016,
                frame_index: 0,
                timestamp_ms: 16,
            },
            input: &input,
            engine: &engine,
        };
        manager.update(&frame)
    }

    fn take(log: &Log) -> Vec<String> {
        std::mem::take(&mut *log.lock().unwrap())
    }

    //=====================================================================
    // Lifecycle Tests
    //=====================================================================

    #[test]
    fn default_scene_enters_on_first_update() {
        let log = Log::default();
        let mut manager = SceneManager::new();
        manager.register_default(TestScene::A, TrackedScene::new("A", &log));

        drive(&mut manager).unwrap();
        drive(&mut manager).unwrap();

        assert_eq!(take(&log), ["A:enter", "A:update", "A:update"]);
    }

    #[test]
    fn transition_applies_after_update_pass() {
        let log = Log::default();
        let mut manager = SceneManager::new();
        manager.register_default(
            TestScene::A,
            TrackedScene::new("A", &log).then(SceneTransition::Replace(TestScene::A, TestScene::B)),
        );
        manager.register_scene(TestScene::B, TrackedScene::new("B", &log));

        drive(&mut manager).unwrap();
        assert_eq!(take(&log), ["A:enter", "A:update", "A:exit", "B:enter"]);
        assert_eq!(manager.stack(), &[TestScene::B]);

        drive(&mut manager).unwrap();
        assert_eq!(take(&log), ["B:update"]);
    }

    #[test]
    fn unregistered_push_is_ignored() {
        let log = Log::default();
        let mut manager = SceneManager::new();
        manager.register_default(TestScene::A, TrackedScene::new("A", &log));
        manager.request(SceneTransition::Push(TestScene::C));

        drive(&mut manager).unwrap();
        assert_eq!(manager.stack(), &[TestScene::A]);
    }

    #[test]
    fn clear_exits_top_down() {
        let log = Log::default();
        let mut manager = SceneManager::new();
        manager.register_default(TestScene::A, TrackedScene::new("A", &log));
        manager.register_default(TestScene::B, TrackedScene::new("B", &log).transparent());

        drive(&mut manager).unwrap();
        take(&log);

        manager.request(SceneTransition::Clear);
        drive(&mut manager).unwrap();

        assert_eq!(take(&log), ["A:update", "B:update", "B:exit", "A:exit"]);
        assert!(manager.stack().is_empty());
    }

    //=====================================================================
    // Active Set Tests
    //=====================================================================

    #[test]
    fn opaque_scene_hides_lower_stack() {
        let log = Log::default();
        let mut manager = SceneManager::new();
        manager.register_default(TestScene::A, TrackedScene::new("A", &log));
        manager.register_default(TestScene::B, TrackedScene::new("B", &log));

        drive(&mut manager).unwrap();
        assert_eq!(take(&log), ["A:enter", "B:enter", "B:update"]);
    }

    #[test]
    fn transparent_scene_renders_over_lower_scene() {
        let log = Log::default();
        let mut manager = SceneManager::new();
        manager.register_default(TestScene::A, TrackedScene::new("A", &log));
        manager.register_default(TestScene::B, TrackedScene::new("B", &log).transparent());

        let mut target = SoftwareRenderer::new(4, 4).unwrap();
        manager.render(&mut target).unwrap();

        assert_eq!(take(&log), ["A:render", "B:render"]);
        assert_eq!(manager.top(), Some(TestScene::B));
    }

    #[test]
    fn failing_scene_propagates_error() {
        let log = Log::default();
        let mut manager = SceneManager::new();
        let mut scene = TrackedScene::new("A", &log);
        scene.fail = true;
        manager.register_default(TestScene::A, scene);

        let err = drive(&mut manager).unwrap_err();
        assert_eq!(err.to_string(), "scene A failed: boom");
    }

    #[test]
    fn empty_manager_is_a_no_op() {
        let mut manager = SceneManager::<()>::new();
        let input = InputState::new();
        let engine = EngineHandle::new(60);
        let frame = FrameContext {
            time: FrameTime {
                delta_time: 0.0,
                total_time: 0.0,
                frame_index: 0,
                timestamp_ms: 0,
            },
            input: &input,
            engine: &engine,
        };

        manager.update(&frame).unwrap();
        let mut target = SoftwareRenderer::new(1, 1).unwrap();
        manager.render(&mut target).unwrap();
    }
}
