//=========================================================================
// Tempo Demo
//=========================================================================
//
// Opens a window and runs one playable scene plus a pause overlay.
//
// Controls:
//   Arrow keys  move the square
//   P           toggle the pause overlay
//   Escape      quit
//
// Configuration is read from `config.json` in the working directory;
// a missing file falls back to defaults.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::process::ExitCode;

use log::{error, info};

//=== Internal Dependencies ===============================================

use tempo_engine::prelude::*;

//=== Constants ===========================================================

const CONFIG_PATH: &str = "config.json";

/// Movement speed, pixels per second.
const SPEED: f32 = 240.0;

const PLAYER_SIZE: f32 = 32.0;

//=== Scene Keys ==========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum DemoScene {
    Play,
    Pause,
}

impl SceneKey for DemoScene {}

//=== PlayScene ===========================================================

struct PlayScene {
    player: Rect,
    bounds: (f32, f32),
}

impl PlayScene {
    fn new(width: u32, height: u32) -> Self {
        let (w, h) = (width as f32, height as f32);
        Self {
            player: Rect::new((w - PLAYER_SIZE) / 2.0, (h - PLAYER_SIZE) / 2.0, PLAYER_SIZE, PLAYER_SIZE),
            bounds: (w, h),
        }
    }
}

impl Scene<DemoScene> for PlayScene {
    fn on_enter(&mut self) {
        info!(target: "demo", "Play scene entered");
    }

    fn update(&mut self, ctx: &mut SceneContext<'_, DemoScene>) -> Result<(), SceneError> {
        let input = ctx.input();

        if input.is_key_pressed(KeyCode::Escape) {
            ctx.engine().stop();
            return Ok(());
        }
        if input.is_key_pressed(KeyCode::KeyP) {
            ctx.push_scene(DemoScene::Pause);
            return Ok(());
        }

        let mut direction = Vec2::ZERO;
        if input.is_key_down(KeyCode::ArrowLeft) {
            direction.x -= 1.0;
        }
        if input.is_key_down(KeyCode::ArrowRight) {
            direction.x += 1.0;
        }
        if input.is_key_down(KeyCode::ArrowUp) {
            direction.y -= 1.0;
        }
        if input.is_key_down(KeyCode::ArrowDown) {
            direction.y += 1.0;
        }

        let step = direction.normalized() * (SPEED * ctx.delta_time() as f32);
        let moved = self.player.translated(step);
        self.player.x = moved.x.clamp(0.0, self.bounds.0 - PLAYER_SIZE);
        self.player.y = moved.y.clamp(0.0, self.bounds.1 - PLAYER_SIZE);

        Ok(())
    }

    fn render(&self, target: &mut dyn RenderTarget) -> Result<(), SceneError> {
        let (width, height) = target.size();
        target.draw_rect(Rect::new(0.0, 0.0, width as f32, height as f32), Color::WHITE);
        target.fill_rect(self.player, Color::GREEN);
        Ok(())
    }
}

//=== PauseScene ==========================================================

/// Transparent overlay: the play scene keeps rendering underneath.
struct PauseScene;

impl Scene<DemoScene> for PauseScene {
    fn on_enter(&mut self) {
        info!(target: "demo", "Paused");
    }

    fn on_exit(&mut self) {
        info!(target: "demo", "Resumed");
    }

    fn update(&mut self, ctx: &mut SceneContext<'_, DemoScene>) -> Result<(), SceneError> {
        if ctx.input().is_key_pressed(KeyCode::Escape) {
            ctx.engine().stop();
        } else if ctx.input().is_key_pressed(KeyCode::KeyP) {
            ctx.remove_scene(DemoScene::Pause);
        }
        Ok(())
    }

    fn render(&self, target: &mut dyn RenderTarget) -> Result<(), SceneError> {
        let (width, height) = target.size();
        target.fill_rect(
            Rect::new(0.0, 0.0, width as f32, height as f32),
            Color::rgba(0, 0, 0, 160),
        );
        Ok(())
    }

    fn is_transparent(&self) -> bool {
        true
    }
}

//=== Entry Point =========================================================

fn run() -> Result<(), EngineError> {
    let config = EngineConfig::load(CONFIG_PATH)?;
    let (width, height) = (config.window.width, config.window.height);

    let mut scenes = SceneManager::new();
    scenes.register_default(DemoScene::Play, PlayScene::new(width, height));
    scenes.register_scene(DemoScene::Pause, PauseScene);

    let builder = EngineBuilder::from_config(config).with_scenes(scenes);

    #[cfg(any(target_os = "windows", target_os = "macos", target_os = "linux"))]
    let mut engine = builder.build(WinitPlatform::new())?;

    #[cfg(not(any(target_os = "windows", target_os = "macos", target_os = "linux")))]
    let mut engine = builder.build(HeadlessPlatform::new())?;

    engine.run()
}

fn main() -> ExitCode {
    init_logging(LoggingConfig::default());

    match run() {
        Ok(()) => {
            info!(target: "demo", "Exited cleanly");
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!(target: "demo", "{}", err);
            ExitCode::FAILURE
        }
    }
}
