//! Host-driven game loop
//!
//! `Game` bundles the simulation with its surface and theme and knows how to
//! run a single frame. It never schedules anything itself. On the web,
//! `FrameLoop` calls `Game::frame` from `requestAnimationFrame` until stopped;
//! its start/stop bookkeeping is `LoopControl`, generic over a `Scheduler`.
//!
//! Everything runs on the page's one thread. The game sits behind
//! `Rc<RefCell<_>>` and the frame callback and pointer callback each borrow it
//! for the length of their own work, so their mutations interleave in arrival
//! order but never overlap.

use std::cell::Cell;

use crate::error::Result;
use crate::renderer::{Surface, render};
use crate::settings::{Settings, Theme};
use crate::sim::{GameEvent, GameState, tick};

/// Game instance holding all state
pub struct Game<S: Surface> {
    pub state: GameState,
    pub theme: Theme,
    surface: S,
    frames: u64,
}

impl<S: Surface> Game<S> {
    /// Lay out a new court sized to `surface`
    pub fn new(surface: S, settings: &Settings) -> Self {
        let state =
            GameState::new(surface.width(), surface.height()).with_hardening(settings.hardening);
        Self {
            state,
            theme: settings.theme.clone(),
            surface,
            frames: 0,
        }
    }

    /// Run one update then one render. Returns the update's events.
    pub fn frame(&mut self) -> &[GameEvent] {
        tick(&mut self.state);
        self.frames += 1;

        for event in &self.state.events {
            match event {
                GameEvent::Scored { side } => {
                    let (player, opponent) = self.state.scores();
                    log::info!("Point to {} ({} - {})", side.as_str(), player, opponent);
                }
                GameEvent::PaddleHit { side, speed } => {
                    log::debug!("{} paddle hit, speed now {:.1}", side.as_str(), speed);
                }
                GameEvent::WallBounce => log::trace!("Wall bounce"),
            }
        }

        render(&self.state, &self.theme, &mut self.surface);
        &self.state.events
    }

    /// Run `n` frames back to back (headless driving)
    pub fn run_frames(&mut self, n: u64) {
        for _ in 0..n {
            self.frame();
        }
    }

    /// Pointer moved to `y`, relative to the top of the surface
    pub fn pointer_moved(&mut self, y: f32) {
        self.state.pointer_moved(y);
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Frames run since creation
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

/// Something that can call the loop back on the next display frame
pub trait Scheduler {
    type Handle: Copy + std::fmt::Debug;

    /// Ask for one callback on the next frame
    fn request(&self) -> Result<Self::Handle>;

    /// Withdraw a request that has not fired yet
    fn cancel(&self, handle: Self::Handle);
}

/// Running flag and pending frame request of a self-rescheduling loop.
///
/// The host calls `on_frame` from the scheduled callback. Dropping the
/// control stops it.
pub struct LoopControl<S: Scheduler> {
    scheduler: S,
    running: Cell<bool>,
    pending: Cell<Option<S::Handle>>,
}

impl<S: Scheduler> LoopControl<S> {
    pub fn new(scheduler: S) -> Self {
        Self {
            scheduler,
            running: Cell::new(false),
            pending: Cell::new(None),
        }
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn is_running(&self) -> bool {
        self.running.get()
    }

    /// Handle of the frame request still outstanding, if any
    pub fn pending(&self) -> Option<S::Handle> {
        self.pending.get()
    }

    /// Begin running frames. No-op when already running.
    pub fn start(&self) -> Result<()> {
        if self.running.replace(true) {
            return Ok(());
        }
        if let Err(e) = self.schedule() {
            self.running.set(false);
            return Err(e);
        }
        log::info!("Frame loop started");
        Ok(())
    }

    /// Cancel the pending frame and stop rescheduling
    pub fn stop(&self) {
        if self.running.replace(false) {
            if let Some(handle) = self.pending.take() {
                self.scheduler.cancel(handle);
            }
            log::info!("Frame loop stopped");
        }
    }

    /// Scheduled callback fired: run `frame` if still running, then ask for
    /// the next one. Returns whether a frame ran.
    pub fn on_frame(&self, frame: impl FnOnce()) -> bool {
        self.pending.set(None);
        if !self.running.get() {
            return false;
        }

        frame();

        if let Err(e) = self.schedule() {
            log::error!("Failed to schedule next frame: {}", e);
            self.running.set(false);
        }
        true
    }

    fn schedule(&self) -> Result<()> {
        let handle = self.scheduler.request()?;
        self.pending.set(Some(handle));
        Ok(())
    }
}

impl<S: Scheduler> Drop for LoopControl<S> {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::{AnimationFrames, FrameLoop};

#[cfg(target_arch = "wasm32")]
mod web {
    use std::cell::RefCell;
    use std::rc::Rc;

    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;

    use super::{Game, LoopControl, Scheduler};
    use crate::error::{Error, Result};
    use crate::renderer::Surface;

    /// `requestAnimationFrame` on the page's window
    pub struct AnimationFrames {
        callback: RefCell<Option<Closure<dyn FnMut(f64)>>>,
    }

    impl Scheduler for AnimationFrames {
        type Handle = i32;

        fn request(&self) -> Result<i32> {
            let callback = self.callback.borrow();
            let callback = callback
                .as_ref()
                .ok_or_else(|| Error::Js("frame callback not installed".to_string()))?;
            let window = web_sys::window().ok_or(Error::NoWindow)?;
            Ok(window.request_animation_frame(callback.as_ref().unchecked_ref())?)
        }

        fn cancel(&self, id: i32) {
            let Some(window) = web_sys::window() else {
                log::warn!("No window to cancel animation frame {}", id);
                return;
            };
            if let Err(e) = window.cancel_animation_frame(id) {
                log::warn!("Failed to cancel animation frame {}: {:?}", id, e);
            }
        }
    }

    /// Drives a `Game` once per display frame until stopped.
    ///
    /// Dropping the loop stops it.
    pub struct FrameLoop {
        control: Rc<LoopControl<AnimationFrames>>,
    }

    impl FrameLoop {
        pub fn new<S: Surface + 'static>(game: Rc<RefCell<Game<S>>>) -> Self {
            let control = Rc::new(LoopControl::new(AnimationFrames {
                callback: RefCell::new(None),
            }));

            let weak = Rc::downgrade(&control);
            let callback = Closure::<dyn FnMut(f64)>::new(move |_time: f64| {
                if let Some(control) = weak.upgrade() {
                    control.on_frame(|| {
                        game.borrow_mut().frame();
                    });
                }
            });
            *control.scheduler().callback.borrow_mut() = Some(callback);

            Self { control }
        }

        pub fn start(&self) -> Result<()> {
            self.control.start()
        }

        pub fn stop(&self) {
            self.control.stop();
        }

        pub fn is_running(&self) -> bool {
            self.control.is_running()
        }
    }
}
