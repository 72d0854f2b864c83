//=========================================================================
// Tempo Engine
//=========================================================================
//
// Main entry point: construction, the frame loop, and shutdown.
//
// Architecture:
// ```text
//     EngineBuilder ──build(platform)──> Engine ──run()──> [frame loop]
//         │                                │                   │
//         ├─ with_window()                 ├─ handle()         └─ cleanup
//         ├─ with_target_fps()             ├─ set_target_fps()     (once)
//         └─ with_scenes() ...             └─ stop()
// ```
//
// One iteration, strictly ordered:
//   1. timestamp → delta_time / total_time
//   2. drain events (Quit → stop; others → input, arrival order)
//   3. input.update → scenes.update(frame) → audio.update
//   4. surface.clear → scenes.render(surface) → surface.present
//   5. throttle to the target rate (sleep, or yield if over budget)
//
// Stop requests and rate changes are observed at the top of the next
// iteration. Cleanup (audio, then platform) runs exactly once on every
// exit path: normal stop, quit event, collaborator error, or panic.
//
//=========================================================================

//=== Module Declarations =================================================

mod handle;
mod state;

//=== Public API ==========================================================

pub use handle::EngineHandle;
pub use state::{EngineState, Lifecycle};

//=== External Dependencies ===============================================

use std::path::PathBuf;

use log::{debug, error, info, trace};

//=== Internal Dependencies ===============================================

use crate::core::audio::{AudioManager, AudioSystem, SilentAudioDevice};
use crate::core::config::{EngineConfig, WindowConfig};
use crate::core::input::{InputManager, InputSystem};
use crate::core::render::Renderer;
use crate::core::resources::ResourceManager;
use crate::core::scene::{FrameContext, SceneManager, SceneSystem};
use crate::core::time::{FrameClock, FrameLimiter, FrameTimer, SystemClock};
use crate::error::EngineError;
use crate::platform::{Platform, SystemEvent};

//=== EngineBuilder =======================================================

/// Builder for configuring and constructing an [`Engine`].
///
/// # Default Values
///
/// - **Window**: 1024x768, "Tempo Engine"
/// - **Target FPS**: 60
/// - **Collaborators**: `InputManager`, empty `SceneManager`,
///   `AudioManager` on a silent device, `SystemClock`
///
/// # Examples
///
/// ```no_run
/// use tempo_engine::prelude::*;
///
/// let mut engine = EngineBuilder::new()
///     .with_window(800, 600, "Demo")
///     .with_target_fps(30)
///     .build(HeadlessPlatform::new())?;
///
/// engine.run()?;
/// # Ok::<(), EngineError>(())
/// ```
pub struct EngineBuilder {
    config: EngineConfig,
    clock: Option<Box<dyn FrameClock>>,
    input: Option<Box<dyn InputSystem>>,
    scenes: Option<Box<dyn SceneSystem>>,
    audio: Option<Box<dyn AudioSystem>>,
}

impl EngineBuilder {
    pub fn new() -> Self {
        Self::from_config(EngineConfig::default())
    }

    /// Starts from a loaded configuration file.
    pub fn from_config(config: EngineConfig) -> Self {
        Self {
            config,
            clock: None,
            input: None,
            scenes: None,
            audio: None,
        }
    }

    //--- Parameters -------------------------------------------------------

    /// Sets the display size and title. Zero sizes are rejected by `build`.
    pub fn with_window(mut self, width: u32, height: u32, title: impl Into<String>) -> Self {
        self.config.window = WindowConfig::new(width, height, title);
        self
    }

    /// Sets the initial frame-rate cap. Zero is rejected by `build`.
    pub fn with_target_fps(mut self, fps: u32) -> Self {
        self.config.target_fps = fps;
        self
    }

    pub fn with_assets_folder(mut self, folder: impl Into<PathBuf>) -> Self {
        self.config.assets_folder = folder.into();
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    //--- Collaborators ----------------------------------------------------

    /// Replaces the time source (e.g. a `ManualClock` in tests).
    pub fn with_clock(mut self, clock: impl FrameClock + 'static) -> Self {
        self.clock = Some(Box::new(clock));
        self
    }

    pub fn with_input(mut self, input: impl InputSystem + 'static) -> Self {
        self.input = Some(Box::new(input));
        self
    }

    /// Installs the scene system, typically a populated `SceneManager`.
    pub fn with_scenes(mut self, scenes: impl SceneSystem + 'static) -> Self {
        self.scenes = Some(Box::new(scenes));
        self
    }

    pub fn with_audio(mut self, audio: impl AudioSystem + 'static) -> Self {
        self.audio = Some(Box::new(audio));
        self
    }

    //--- Construction -----------------------------------------------------

    /// Validates the configuration, opens the display and brings up the
    /// collaborators.
    ///
    /// # Errors
    ///
    /// - [`EngineError::InvalidDimensions`] for a zero width or height
    /// - [`EngineError::InvalidFrameRate`] for a zero target
    /// - [`EngineError::Platform`] when the display cannot be acquired
    /// - [`EngineError::Audio`] when the default audio device fails to open
    ///
    /// No partially constructed engine is ever returned; anything acquired
    /// before a failure is released again.
    pub fn build<P: Platform>(self, mut platform: P) -> Result<Engine<P>, EngineError> {
        let Self {
            config,
            clock,
            input,
            scenes,
            audio,
        } = self;

        let WindowConfig { width, height, .. } = config.window;
        if width == 0 || height == 0 {
            return Err(EngineError::InvalidDimensions { width, height });
        }
        if config.target_fps == 0 {
            return Err(EngineError::InvalidFrameRate(config.target_fps));
        }
        config.validate()?;

        let surface = platform.open(&config.window)?;

        let audio = match audio {
            Some(audio) => audio,
            None => {
                match AudioManager::new(SilentAudioDevice::new(), &config.audio, &config.assets_folder) {
                    Ok(manager) => Box::new(manager),
                    Err(err) => {
                        error!(target: "engine", "Audio bring-up failed: {}", err);
                        platform.shutdown();
                        return Err(err.into());
                    }
                }
            }
        };

        info!(
            target: "engine",
            "Engine created: {}x{} \"{}\" @ {} fps",
            width,
            height,
            config.window.title,
            config.target_fps
        );

        Ok(Engine {
            platform,
            surface,
            clock: clock.unwrap_or_else(|| Box::new(SystemClock::new())),
            input: input.unwrap_or_else(|| Box::new(InputManager::new())),
            scenes: scenes.unwrap_or_else(|| Box::new(SceneManager::<()>::new())),
            audio,
            resources: ResourceManager::new(&config.assets_folder),
            handle: EngineHandle::new(config.target_fps),
            timer: FrameTimer::new(),
            limiter: FrameLimiter::new(config.target_fps),
            window: config.window,
            lifecycle: Lifecycle::Created,
            events: Vec::new(),
        })
    }
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

//=== Engine ==============================================================

/// Frame-loop controller.
///
/// Owns the platform, the render surface, the clock and every
/// collaborator. Create it with [`EngineBuilder`] or [`Engine::new`].
///
/// # Lifecycle
///
/// `Created` → `run()` → `Running` → loop exits → cleanup → `Stopped`.
/// A stopped engine cannot be restarted. Dropping an engine that never
/// ran still releases audio and display.
pub struct Engine<P: Platform> {
    platform: P,
    surface: P::Surface,
    clock: Box<dyn FrameClock>,
    input: Box<dyn InputSystem>,
    scenes: Box<dyn SceneSystem>,
    audio: Box<dyn AudioSystem>,
    resources: ResourceManager,
    handle: EngineHandle,
    timer: FrameTimer,
    limiter: FrameLimiter,
    window: WindowConfig,
    lifecycle: Lifecycle,
    events: Vec<SystemEvent>,
}

impl<P: Platform> Engine<P> {
    /// Constructs an engine with default collaborators.
    pub fn new(platform: P, width: u32, height: u32, title: &str) -> Result<Self, EngineError> {
        EngineBuilder::new().with_window(width, height, title).build(platform)
    }

    //--- Execution --------------------------------------------------------

    /// Runs the frame loop until stopped, then cleans up.
    ///
    /// # Errors
    ///
    /// - [`EngineError::AlreadyRunning`] / [`EngineError::AlreadyStopped`]
    ///   when not in the `Created` state (collaborators are not touched)
    /// - any collaborator error, which ends the loop; cleanup still runs
    pub fn run(&mut self) -> Result<(), EngineError> {
        match self.lifecycle {
            Lifecycle::Created => {}
            Lifecycle::Running => return Err(EngineError::AlreadyRunning),
            Lifecycle::Stopped => return Err(EngineError::AlreadyStopped),
        }

        self.lifecycle = Lifecycle::Running;
        if self.handle.start() {
            info!(target: "engine", "Entering frame loop (target {} fps)", self.handle.target_fps());
        } else {
            info!(target: "engine", "Stop requested before run; no iterations");
        }

        // Cleanup runs when the guard drops: on return and on unwind.
        let guard = CleanupGuard { engine: self };
        let result = guard.engine.run_loop();

        if let Err(err) = &result {
            error!(target: "engine", "Frame loop aborted: {}", err);
        }
        info!(
            target: "engine",
            "Frame loop ended after {} frames ({:.3}s)",
            guard.engine.timer.frame_count(),
            guard.engine.timer.total_time()
        );

        drop(guard);
        result
    }

    /// Requests the loop to stop after the current iteration. Idempotent.
    ///
    /// A stop issued before `run()` is kept: `run()` then performs no
    /// iterations and goes straight to cleanup.
    pub fn stop(&self) {
        self.handle.stop();
    }

    /// Replaces the frame-rate cap from the next iteration on.
    ///
    /// Zero is rejected; the previous target stays in effect.
    pub fn set_target_fps(&self, fps: u32) -> Result<(), EngineError> {
        self.handle.set_target_fps(fps)
    }

    /// Handle usable from collaborators or other threads.
    pub fn handle(&self) -> EngineHandle {
        self.handle.clone()
    }

    //--- Accessors --------------------------------------------------------

    /// Construction-time `(width, height)`; never changes.
    pub fn screen_size(&self) -> (u32, u32) {
        (self.window.width, self.window.height)
    }

    pub fn title(&self) -> &str {
        &self.window.title
    }

    pub fn target_fps(&self) -> u32 {
        self.handle.target_fps()
    }

    pub fn is_running(&self) -> bool {
        self.handle.is_running()
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn state(&self) -> EngineState {
        EngineState {
            running: self.handle.is_running(),
            delta_time: self.timer.delta_time(),
            total_time: self.timer.total_time(),
            target_frame_rate: self.handle.target_fps(),
            frame_count: self.timer.frame_count(),
        }
    }

    pub fn resources(&self) -> &ResourceManager {
        &self.resources
    }

    pub fn resources_mut(&mut self) -> &mut ResourceManager {
        &mut self.resources
    }

    pub fn surface(&self) -> &P::Surface {
        &self.surface
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    //--- Frame Loop -------------------------------------------------------

    fn run_loop(&mut self) -> Result<(), EngineError> {
        self.timer.start(self.clock.now_millis());

        while self.handle.is_running() {
            let frame_start = self.clock.now_millis();
            self.limiter.set_target_fps(self.handle.target_fps());

            //--- 1. Time accounting ---------------------------------------
            let time = self.timer.tick(frame_start);
            trace!(
                target: "engine",
                "Frame {} dt={:.4}s total={:.3}s",
                time.frame_index,
                time.delta_time,
                time.total_time
            );

            //--- 2. Events -------------------------------------------------
            self.platform.poll_events(&mut self.events);
            for event in self.events.drain(..) {
                match event {
                    SystemEvent::Quit => {
                        info!(target: "engine", "Quit requested");
                        self.handle.stop();
                    }
                    SystemEvent::Input(input) => self.input.handle_event(&input),
                }
            }

            //--- 3. Update ---------------------------------------------------
            self.input.update();
            let frame = FrameContext {
                time,
                input: self.input.state(),
                engine: &self.handle,
            };
            self.scenes.update(&frame)?;
            self.audio.update();

            //--- 4. Render ---------------------------------------------------
            self.surface.clear()?;
            self.scenes.render(&mut self.surface)?;
            self.surface.present()?;

            //--- 5. Throttle -------------------------------------------------
            let slept = self.limiter.throttle(self.clock.as_ref(), frame_start);
            if slept.is_zero() {
                debug!(
                    target: "engine",
                    "Frame {} overran its {:?} budget",
                    time.frame_index,
                    self.limiter.frame_budget()
                );
            }
        }

        Ok(())
    }

    /// Releases audio, then the display. Runs at most once.
    fn cleanup(&mut self) {
        if self.lifecycle == Lifecycle::Stopped {
            return;
        }

        self.lifecycle = Lifecycle::Stopped;
        self.handle.set_running(false);

        debug!(target: "engine", "Cleaning up");
        self.audio.cleanup();
        self.platform.shutdown();
        info!(target: "engine", "Engine stopped");
    }
}

impl<P: Platform> Drop for Engine<P> {
    fn drop(&mut self) {
        self.cleanup();
    }
}

//=== CleanupGuard ========================================================

struct CleanupGuard<'a, P: Platform> {
    engine: &'a mut Engine<P>,
}

impl<P: Platform> Drop for CleanupGuard<'_, P> {
    fn drop(&mut self) {
        self.engine.cleanup();
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use std::panic::{catch_unwind, AssertUnwindSafe};
    use std::sync::atomic::Ordering;
    use std::sync::{Arc, Mutex};
    use std::thread;
    use std::time::Duration;

    use super::*;
    use crate::core::input::{InputEvent, InputState, KeyCode};
    use crate::core::render::{Color, Rect, RenderTarget, SoftwareRenderer, Vec2};
    use crate::core::time::ManualClock;
    use crate::error::{PlatformError, RenderError, SceneError};
    use crate::platform::HeadlessPlatform;

    //=====================================================================
    // Recording Collaborators
    //=====================================================================

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Poll,
        HandleEvent(InputEvent),
        InputUpdate,
        SceneUpdate(f64),
        AudioUpdate,
        Clear,
        Render,
        Present,
        AudioCleanup,
        Shutdown,
    }

    type CallLog = Arc<Mutex<Vec<Call>>>;

    fn record(log: &CallLog, call: Call) {
        log.lock().unwrap().push(call);
    }

    fn calls(log: &CallLog) -> Vec<Call> {
        log.lock().unwrap().clone()
    }

    //--- Input -----------------------------------------------------------

    struct RecordingInput {
        log: CallLog,
        inner: InputManager,
    }

    impl InputSystem for RecordingInput {
        fn handle_event(&mut self, event: &InputEvent) {
            record(&self.log, Call::HandleEvent(event.clone()));
            self.inner.handle_event(event);
        }

        fn update(&mut self) {
            record(&self.log, Call::InputUpdate);
            self.inner.update();
        }

        fn state(&self) -> &InputState {
            self.inner.state()
        }
    }

    //--- Scenes ----------------------------------------------------------

    type UpdateHook = Box<dyn FnMut(&FrameContext<'_>) -> Result<(), SceneError>>;

    struct RecordingScenes {
        log: CallLog,
        hook: UpdateHook,
    }

    impl SceneSystem for RecordingScenes {
        fn update(&mut self, frame: &FrameContext<'_>) -> Result<(), SceneError> {
            record(&self.log, Call::SceneUpdate(frame.time.delta_time));
            (self.hook)(frame)
        }

        fn render(&self, target: &mut dyn RenderTarget) -> Result<(), SceneError> {
            record(&self.log, Call::Render);
            target.fill_rect(Rect::new(0.0, 0.0, 2.0, 2.0), Color::RED);
            Ok(())
        }
    }

    //--- Audio -----------------------------------------------------------

    struct RecordingAudio {
        log: CallLog,
    }

    impl AudioSystem for RecordingAudio {
        fn update(&mut self) {
            record(&self.log, Call::AudioUpdate);
        }

        fn cleanup(&mut self) {
            record(&self.log, Call::AudioCleanup);
        }
    }

    //--- Platform & Surface ----------------------------------------------

    struct RecordingPlatform {
        log: CallLog,
        inner: HeadlessPlatform,
    }

    struct RecordingSurface {
        log: CallLog,
        inner: SoftwareRenderer,
    }

    impl Platform for RecordingPlatform {
        type Surface = RecordingSurface;

        fn open(&mut self, window: &WindowConfig) -> Result<RecordingSurface, PlatformError> {
            Ok(RecordingSurface {
                log: Arc::clone(&self.log),
                inner: self.inner.open(window)?,
            })
        }

        fn poll_events(&mut self, events: &mut Vec<SystemEvent>) {
            record(&self.log, Call::Poll);
            self.inner.poll_events(events);
        }

        fn shutdown(&mut self) {
            record(&self.log, Call::Shutdown);
            self.inner.shutdown();
        }
    }

    impl RenderTarget for RecordingSurface {
        fn size(&self) -> (u32, u32) {
            self.inner.size()
        }

        fn fill_rect(&mut self, rect: Rect, color: Color) {
            self.inner.fill_rect(rect, color);
        }

        fn draw_rect(&mut self, rect: Rect, color: Color) {
            self.inner.draw_rect(rect, color);
        }

        fn camera(&self) -> Vec2 {
            self.inner.camera()
        }
    }

    impl Renderer for RecordingSurface {
        fn clear(&mut self) -> Result<(), RenderError> {
            record(&self.log, Call::Clear);
            self.inner.clear()
        }

        fn present(&mut self) -> Result<(), RenderError> {
            record(&self.log, Call::Present);
            self.inner.present()
        }
    }

    //=====================================================================
    // Fixture
    //=====================================================================

    struct Fixture {
        engine: Engine<RecordingPlatform>,
        log: CallLog,
        clock: ManualClock,
    }

    fn fixture<F>(platform: HeadlessPlatform, clock: ManualClock, hook: F) -> Fixture
    where
        F: FnMut(&FrameContext<'_>) -> Result<(), SceneError> + 'static,
    {
        let log = CallLog::default();

        let engine = EngineBuilder::new()
            .with_window(800, 600, "Test")
            .with_clock(clock.clone())
            .with_input(RecordingInput {
                log: Arc::clone(&log),
                inner: InputManager::new(),
            })
            .with_scenes(RecordingScenes {
                log: Arc::clone(&log),
                hook: Box::new(hook),
            })
            .with_audio(RecordingAudio { log: Arc::clone(&log) })
            .build(RecordingPlatform {
                log: Arc::clone(&log),
                inner: platform,
            })
            .unwrap();

        Fixture { engine, log, clock }
    }

    fn quit_first() -> Fixture {
        fixture(
            HeadlessPlatform::new().with_poll(vec![SystemEvent::Quit]),
            ManualClock::new(),
            |_| Ok(()),
        )
    }

    /// Hook that stops the engine once `frames` iterations have updated.
    fn stop_after(frames: u64) -> impl FnMut(&FrameContext<'_>) -> Result<(), SceneError> {
        move |frame| {
            if frame.time.frame_index + 1 >= frames {
                frame.engine.stop();
            }
            Ok(())
        }
    }

    fn count(log: &[Call], wanted: &Call) -> usize {
        log.iter().filter(|call| *call == wanted).count()
    }

    //=====================================================================
    // Lifecycle Tests
    //=====================================================================

    #[test]
    fn quit_on_first_poll_runs_exactly_one_iteration() {
        let mut fx = quit_first();
        assert_eq!(fx.engine.lifecycle(), Lifecycle::Created);

        fx.engine.run().unwrap();

        assert_eq!(
            calls(&fx.log),
            [
                Call::Poll,
                Call::InputUpdate,
                Call::SceneUpdate(0.0),
                Call::AudioUpdate,
                Call::Clear,
                Call::Render,
                Call::Present,
                Call::AudioCleanup,
                Call::Shutdown,
            ]
        );
        assert!(!fx.engine.is_running());
        assert!(!fx.engine.state().running);
        assert_eq!(fx.engine.lifecycle(), Lifecycle::Stopped);
    }

    #[test]
    fn stop_during_update_finishes_the_frame() {
        let mut fx = fixture(HeadlessPlatform::new(), ManualClock::new(), stop_after(3));

        fx.engine.run().unwrap();

        let log = calls(&fx.log);
        assert_eq!(count(&log, &Call::InputUpdate), 3);
        assert_eq!(count(&log, &Call::Present), 3);
        assert_eq!(count(&log, &Call::Poll), 3);
        assert_eq!(&log[log.len() - 3..], [Call::Present, Call::AudioCleanup, Call::Shutdown]);
        assert_eq!(fx.engine.state().frame_count, 3);
    }

    #[test]
    fn cleanup_runs_once_per_lifetime() {
        let mut fx = quit_first();
        fx.engine.run().unwrap();

        assert!(matches!(fx.engine.run(), Err(EngineError::AlreadyStopped)));
        fx.engine.stop();

        let log = calls(&fx.log);
        drop(fx.engine);

        assert_eq!(count(&log, &Call::AudioCleanup), 1);
        assert_eq!(count(&log, &Call::Shutdown), 1);
        assert_eq!(calls(&fx.log), log);
    }

    #[test]
    fn dropping_an_engine_that_never_ran_releases_resources() {
        let fx = quit_first();
        let log = Arc::clone(&fx.log);

        drop(fx);

        assert_eq!(calls(&log), [Call::AudioCleanup, Call::Shutdown]);
    }

    #[test]
    fn screen_size_is_fixed_at_construction() {
        let mut fx = quit_first();
        assert_eq!(fx.engine.screen_size(), (800, 600));
        assert_eq!(fx.engine.title(), "Test");

        fx.engine.run().unwrap();
        assert_eq!(fx.engine.screen_size(), (800, 600));
    }

    //=====================================================================
    // Event Tests
    //=====================================================================

    #[test]
    fn events_are_forwarded_in_order_before_input_update() {
        let seen = Arc::new(Mutex::new(None));
        let seen_in_scene = Arc::clone(&seen);

        let platform = HeadlessPlatform::new().with_poll(vec![
            SystemEvent::Input(InputEvent::key_down(KeyCode::KeyA)),
            SystemEvent::Quit,
            SystemEvent::Input(InputEvent::key_down(KeyCode::KeyB)),
        ]);
        let mut fx = fixture(platform, ManualClock::new(), move |frame| {
            let keys = (
                frame.input.is_key_pressed(KeyCode::KeyA),
                frame.input.is_key_pressed(KeyCode::KeyB),
            );
            *seen_in_scene.lock().unwrap() = Some(keys);
            Ok(())
        });

        fx.engine.run().unwrap();

        assert_eq!(
            &calls(&fx.log)[..4],
            [
                Call::Poll,
                Call::HandleEvent(InputEvent::key_down(KeyCode::KeyA)),
                Call::HandleEvent(InputEvent::key_down(KeyCode::KeyB)),
                Call::InputUpdate,
            ]
        );
        assert_eq!(*seen.lock().unwrap(), Some((true, true)));
    }

    #[test]
    fn pending_backlog_is_handled_in_the_first_iteration() {
        const BACKLOG: usize = 150;
        let keys = [KeyCode::KeyA, KeyCode::KeyB, KeyCode::KeyC];

        let platform = HeadlessPlatform::new();
        let injector = platform.injector();
        for i in 0..BACKLOG {
            injector.input(InputEvent::key_down(keys[i % keys.len()]));
        }
        injector.quit();

        let mut fx = fixture(platform, ManualClock::new(), |_| Ok(()));
        fx.engine.run().unwrap();

        let log = calls(&fx.log);
        assert_eq!(fx.engine.state().frame_count, 1);
        assert_eq!(count(&log, &Call::Poll), 1);

        let forwarded: Vec<InputEvent> = log
            .iter()
            .filter_map(|call| match call {
                Call::HandleEvent(event) => Some(event.clone()),
                _ => None,
            })
            .collect();
        let expected: Vec<InputEvent> = (0..BACKLOG)
            .map(|i| InputEvent::key_down(keys[i % keys.len()]))
            .collect();
        assert_eq!(forwarded, expected);

        // Poll, every event, then the input update.
        assert_eq!(log.iter().position(|call| *call == Call::InputUpdate), Some(BACKLOG + 1));
    }

    #[test]
    fn stop_before_run_skips_the_loop_but_cleans_up() {
        let mut fx = fixture(HeadlessPlatform::new(), ManualClock::new(), |_| Ok(()));

        fx.engine.handle().stop();
        fx.engine.run().unwrap();

        assert_eq!(calls(&fx.log), [Call::AudioCleanup, Call::Shutdown]);
        assert_eq!(fx.engine.state().frame_count, 0);
        assert_eq!(fx.engine.lifecycle(), Lifecycle::Stopped);
        assert!(!fx.engine.is_running());
    }

    #[test]
    fn stop_from_another_thread_ends_the_loop() {
        let mut fx = fixture(HeadlessPlatform::new(), ManualClock::new(), |_| Ok(()));
        let handle = fx.engine.handle();

        let stopper = thread::spawn(move || {
            while !handle.is_running() {
                thread::yield_now();
            }
            handle.stop();
        });

        fx.engine.run().unwrap();
        stopper.join().unwrap();

        assert_eq!(fx.engine.lifecycle(), Lifecycle::Stopped);
        assert_eq!(count(&calls(&fx.log), &Call::Shutdown), 1);
    }

    //=====================================================================
    // Timing Tests
    //=====================================================================

    #[test]
    fn total_time_is_the_sum_of_deltas() {
        let clock = ManualClock::new();
        let work_clock = clock.clone();
        let deltas = Arc::new(Mutex::new(Vec::new()));
        let recorded = Arc::clone(&deltas);

        let mut fx = fixture(HeadlessPlatform::new(), clock, move |frame| {
            recorded.lock().unwrap().push(frame.time.delta_time);
            work_clock.advance_millis(3 + frame.time.frame_index % 5 * 7);
            if frame.time.frame_index == 9 {
                frame.engine.stop();
            }
            Ok(())
        });

        fx.engine.run().unwrap();

        let deltas = deltas.lock().unwrap().clone();
        assert_eq!(deltas.len(), 10);
        assert_eq!(deltas[0], 0.0);
        assert!(deltas.iter().all(|&dt| dt >= 0.0));

        let sum = deltas.iter().fold(0.0, |acc, dt| acc + dt);
        assert_eq!(fx.engine.state().total_time, sum);
        assert!(fx.clock.now_millis() > 0);
    }

    #[test]
    fn last_target_fps_before_run_wins() {
        let mut fx = quit_first();

        fx.engine.set_target_fps(30).unwrap();
        fx.engine.set_target_fps(120).unwrap();
        fx.engine.run().unwrap();

        assert_eq!(fx.clock.sleeps(), [Duration::from_secs_f64(1.0 / 120.0)]);
        assert_eq!(fx.engine.state().target_frame_rate, 120);
    }

    #[test]
    fn zero_target_fps_is_rejected_and_previous_kept() {
        let fx = quit_first();

        assert!(matches!(fx.engine.set_target_fps(0), Err(EngineError::InvalidFrameRate(0))));
        assert_eq!(fx.engine.target_fps(), 60);
    }

    #[test]
    fn rate_change_mid_frame_applies_next_iteration() {
        let mut fx = fixture(HeadlessPlatform::new(), ManualClock::new(), |frame| {
            match frame.time.frame_index {
                0 => frame.engine.set_target_fps(50).map_err(|e| SceneError::failed("test", e.to_string()))?,
                _ => frame.engine.stop(),
            }
            Ok(())
        });

        fx.engine.run().unwrap();

        assert_eq!(
            fx.clock.sleeps(),
            [Duration::from_secs_f64(1.0 / 60.0), Duration::from_secs_f64(1.0 / 50.0)]
        );
    }

    #[test]
    fn overrun_frame_yields_instead_of_sleeping() {
        let clock = ManualClock::new();
        let work_clock = clock.clone();
        let mut fx = fixture(HeadlessPlatform::new(), clock, move |frame| {
            work_clock.advance_millis(50);
            frame.engine.stop();
            Ok(())
        });

        fx.engine.run().unwrap();

        assert!(fx.clock.sleeps().is_empty());
        assert_eq!(fx.clock.yields(), 1);
    }

    //=====================================================================
    // Failure Tests
    //=====================================================================

    #[test]
    fn zero_dimensions_are_rejected() {
        let platform = HeadlessPlatform::new();
        let counter = platform.shutdown_counter();

        let result = EngineBuilder::new().with_window(0, 600, "Bad").build(platform);

        assert!(matches!(result, Err(EngineError::InvalidDimensions { width: 0, height: 600 })));
        assert_eq!(counter.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn zero_fps_is_rejected_at_build() {
        let result = EngineBuilder::new().with_target_fps(0).build(HeadlessPlatform::new());
        assert!(matches!(result, Err(EngineError::InvalidFrameRate(0))));
    }

    #[test]
    fn display_failure_is_fatal() {
        let result = Engine::new(HeadlessPlatform::new().failing_open("no display"), 800, 600, "Test");

        match result {
            Err(EngineError::Platform(PlatformError::SurfaceCreation(reason))) => {
                assert_eq!(reason, "no display");
            }
            Err(other) => panic!("unexpected error: {}", other),
            Ok(_) => panic!("engine built without a display"),
        }
    }

    #[test]
    fn scene_error_ends_loop_and_still_cleans_up() {
        let mut fx = fixture(HeadlessPlatform::new(), ManualClock::new(), |frame| {
            if frame.time.frame_index == 1 {
                return Err(SceneError::failed("Main", "boom"));
            }
            Ok(())
        });

        let err = fx.engine.run().unwrap_err();

        assert_eq!(err.to_string(), "scene Main failed: boom");
        let log = calls(&fx.log);
        assert_eq!(count(&log, &Call::Present), 1);
        assert_eq!(
            &log[log.len() - 3..],
            [Call::SceneUpdate(0.016), Call::AudioCleanup, Call::Shutdown]
        );
        assert_eq!(fx.engine.lifecycle(), Lifecycle::Stopped);
    }

    #[test]
    fn panic_in_scene_still_cleans_up() {
        let mut fx = fixture(HeadlessPlatform::new(), ManualClock::new(), |_| panic!("scene exploded"));

        let outcome = catch_unwind(AssertUnwindSafe(|| fx.engine.run()));

        assert!(outcome.is_err());
        let log = calls(&fx.log);
        assert_eq!(&log[log.len() - 2..], [Call::AudioCleanup, Call::Shutdown]);
        assert_eq!(fx.engine.lifecycle(), Lifecycle::Stopped);
        assert!(!fx.engine.is_running());
    }

    //=====================================================================
    // Default Collaborator Tests
    //=====================================================================

    #[test]
    fn default_collaborators_run_headless() {
        let platform = HeadlessPlatform::new();
        let injector = platform.injector();
        let counter = platform.shutdown_counter();

        let mut engine = EngineBuilder::new()
            .with_window(64, 48, "Headless")
            .with_clock(ManualClock::new())
            .build(platform)
            .unwrap();

        injector.input(InputEvent::key_down(KeyCode::Space));
        injector.quit();
        engine.run().unwrap();

        assert_eq!(engine.surface().frames_presented(), 1);
        assert_eq!(engine.platform().poll_count(), 1);
        assert_eq!(counter.load(Ordering::SeqCst), 1);
        assert_eq!(engine.resources().root(), std::path::Path::new("assets"));
    }

    #[test]
    fn builder_reads_config() {
        let mut config = EngineConfig::default();
        config.window = WindowConfig::new(320, 200, "Configured");
        config.target_fps = 25;

        let engine = EngineBuilder::from_config(config)
            .with_clock(ManualClock::new())
            .build(HeadlessPlatform::new())
            .unwrap();

        assert_eq!(engine.screen_size(), (320, 200));
        assert_eq!(engine.target_fps(), 25);
        assert_eq!(engine.surface().size(), (320, 200));
    }
}
