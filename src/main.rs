//! Canvas Pong entry point
//!
//! On the web this wires the game to the page and starts the frame loop.
//! Natively it plays a headless match against a recording surface.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;

    use wasm_bindgen::prelude::*;

    use canvas_pong::Settings;
    use canvas_pong::frame_loop::FrameLoop;
    use canvas_pong::platform::CANVAS_ID;
    use canvas_pong::platform::web::{launch, register_offline_worker};

    thread_local! {
        static FRAME_LOOP: RefCell<Option<FrameLoop>> = const { RefCell::new(None) };
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Canvas Pong starting...");

        let settings = Settings::load();
        if settings.offline_worker.enabled {
            register_offline_worker(&settings.offline_worker.script_url);
        }

        let frame_loop = match launch(CANVAS_ID, &settings) {
            Ok(frame_loop) => frame_loop,
            Err(e) => {
                log::error!("Startup failed: {}", e);
                panic!("Canvas Pong failed to start: {e}");
            }
        };
        FRAME_LOOP.with(|slot| *slot.borrow_mut() = Some(frame_loop));

        log::info!("Canvas Pong running!");
    }

    /// Stop the frame loop (the last frame stays on screen)
    #[wasm_bindgen]
    pub fn pause_game() {
        FRAME_LOOP.with(|slot| {
            if let Some(frame_loop) = slot.borrow().as_ref() {
                frame_loop.stop();
            }
        });
    }

    /// Restart a stopped frame loop
    #[wasm_bindgen]
    pub fn resume_game() -> Result<(), JsValue> {
        FRAME_LOOP.with(|slot| match slot.borrow().as_ref() {
            Some(frame_loop) => frame_loop
                .start()
                .map_err(|e| JsValue::from_str(&e.to_string())),
            None => Ok(()),
        })
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use canvas_pong::consts::{DEFAULT_HEIGHT, DEFAULT_WIDTH};
    use canvas_pong::renderer::CommandRecorder;
    use canvas_pong::{Game, Settings};

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Canvas Pong (native) starting...");
    log::info!("Native mode is headless - run with `trunk serve` for the web version");

    // One minute at 60 fps with an idle player
    const FRAMES: u64 = 60 * 60;

    let mut game = Game::new(
        CommandRecorder::new(DEFAULT_WIDTH, DEFAULT_HEIGHT),
        &Settings::load(),
    );
    game.run_frames(FRAMES);

    let (player, opponent) = game.state.scores();
    log::info!(
        "Headless match finished after {} frames: player {} - opponent {} (ball speed {:.1})",
        game.frames(),
        player,
        opponent,
        game.state.ball.speed
    );
    match serde_json::to_string(&game.state) {
        Ok(json) => log::debug!("Final state: {}", json),
        Err(e) => log::warn!("Could not dump final state: {}", e),
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
