//! Browser wiring: canvas, pointer input, offline worker registration

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{HtmlCanvasElement, MouseEvent};

use super::{CONTEXT_KIND, surface_y};
use crate::error::{Error, Result};
use crate::frame_loop::{FrameLoop, Game};
use crate::renderer::{CanvasSurface, Surface};
use crate::settings::Settings;

/// Find the canvas with id `id`
pub fn canvas_by_id(id: &str) -> Result<HtmlCanvasElement> {
    let window = web_sys::window().ok_or(Error::NoWindow)?;
    let document = window.document().ok_or(Error::NoDocument)?;
    document
        .get_element_by_id(id)
        .ok_or_else(|| Error::MissingElement(id.to_string()))?
        .dyn_into::<HtmlCanvasElement>()
        .map_err(|_| Error::NotACanvas(id.to_string()))
}

/// Build the game on canvas `canvas_id`, hook up pointer input and return a
/// started frame loop.
pub fn launch(canvas_id: &str, settings: &Settings) -> Result<FrameLoop> {
    let canvas = canvas_by_id(canvas_id)?;
    let surface = CanvasSurface::new(canvas.clone(), CONTEXT_KIND)?;
    log::info!(
        "Canvas `{}` is {}x{}",
        canvas_id,
        surface.width(),
        surface.height()
    );

    let game = Rc::new(RefCell::new(Game::new(surface, settings)));
    attach_pointer_input(&canvas, game.clone())?;

    let frame_loop = FrameLoop::new(game);
    frame_loop.start()?;
    Ok(frame_loop)
}

/// Center the player paddle on the pointer on every `mousemove` over the
/// canvas. The listener lives as long as the page.
pub fn attach_pointer_input<S: Surface + 'static>(
    canvas: &HtmlCanvasElement,
    game: Rc<RefCell<Game<S>>>,
) -> Result<()> {
    let canvas_clone = canvas.clone();
    let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
        let rect = canvas_clone.get_bounding_client_rect();
        let y = surface_y(event.client_y() as f32, rect.top() as f32);
        game.borrow_mut().pointer_moved(y);
    });
    canvas.add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

/// Register the offline worker script. Failures are logged and ignored.
pub fn register_offline_worker(script_url: &str) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let navigator = window.navigator();
    if !js_sys::Reflect::has(&navigator, &JsValue::from_str("serviceWorker")).unwrap_or(false) {
        log::info!("Service workers unavailable, running online only");
        return;
    }

    let promise = navigator.service_worker().register(script_url);
    let script_url = script_url.to_string();
    wasm_bindgen_futures::spawn_local(async move {
        match JsFuture::from(promise).await {
            Ok(_) => log::info!("Offline worker registered ({})", script_url),
            Err(e) => log::warn!("Offline worker registration failed: {:?}", e),
        }
    });
}
