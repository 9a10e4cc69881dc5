//! Startup errors
//!
//! Anything that goes wrong while wiring the game to the page is fatal: the
//! wasm entry point logs it and panics.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("no global window")]
    NoWindow,
    #[error("window has no document")]
    NoDocument,
    #[error("no element with id `{0}`")]
    MissingElement(String),
    #[error("element `{0}` is not a canvas")]
    NotACanvas(String),
    #[error("canvas does not provide a `{0}` context")]
    NoContext(String),
    #[error("javascript error: {0}")]
    Js(String),
}

#[cfg(target_arch = "wasm32")]
impl From<wasm_bindgen::JsValue> for Error {
    fn from(value: wasm_bindgen::JsValue) -> Self {
        Error::Js(format!("{value:?}"))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
