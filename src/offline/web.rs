//! Service worker binding for the offline strategies
//!
//! `serviceWorker.js` registers the `install` and `fetch` listeners
//! synchronously while the worker script evaluates, then forwards each event
//! to `handle_install` / `handle_fetch` once this module has instantiated.

use js_sys::{Array, Promise};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::{JsFuture, future_to_promise};
use web_sys::{Cache, CacheStorage, Request, Response, ServiceWorkerGlobalScope, Url};

use super::{Backend, OfflineError, install, respond};

fn cache_err(value: JsValue) -> OfflineError {
    OfflineError::Cache(format!("{value:?}"))
}

fn network_err(value: JsValue) -> OfflineError {
    OfflineError::Network(format!("{value:?}"))
}

/// Browser Cache API plus `fetch`, from inside the worker scope
#[derive(Clone)]
pub struct BrowserBackend {
    scope: ServiceWorkerGlobalScope,
}

impl BrowserBackend {
    pub fn new(scope: ServiceWorkerGlobalScope) -> Self {
        Self { scope }
    }

    /// Origin the worker was served from
    pub fn origin(&self) -> String {
        self.scope.location().origin()
    }

    fn caches(&self) -> Result<CacheStorage, OfflineError> {
        self.scope.caches().map_err(cache_err)
    }

    async fn open(&self, name: &str) -> Result<Cache, OfflineError> {
        let cache = JsFuture::from(self.caches()?.open(name))
            .await
            .map_err(cache_err)?;
        cache.dyn_into::<Cache>().map_err(cache_err)
    }
}

impl Backend for BrowserBackend {
    type Request = Request;
    type Response = Response;

    fn request_url(&self, request: &Request) -> String {
        request.url()
    }

    fn request_origin(&self, request: &Request) -> Option<String> {
        let origin = Url::new(&request.url()).ok()?.origin();
        // Opaque origins serialize as "null"
        (origin != "null").then_some(origin)
    }

    async fn add_all(&self, cache: &str, paths: &[&str]) -> Result<(), OfflineError> {
        let cache = self.open(cache).await?;
        let paths: Array = paths.iter().map(|p| JsValue::from_str(p)).collect();
        JsFuture::from(cache.add_all_with_str_sequence(&paths))
            .await
            .map_err(cache_err)?;
        Ok(())
    }

    async fn lookup(
        &self,
        cache: Option<&str>,
        request: &Request,
    ) -> Result<Option<Response>, OfflineError> {
        let promise = match cache {
            Some(name) => self.open(name).await?.match_with_request(request),
            None => self.caches()?.match_with_request(request),
        };
        let found = JsFuture::from(promise).await.map_err(cache_err)?;
        if found.is_undefined() {
            return Ok(None);
        }
        found.dyn_into::<Response>().map(Some).map_err(cache_err)
    }

    async fn put(&self, cache: &str, request: &Request, response: Response) -> Result<(), OfflineError> {
        let cache = self.open(cache).await?;
        JsFuture::from(cache.put_with_request(request, &response))
            .await
            .map_err(cache_err)?;
        Ok(())
    }

    async fn fetch(&self, request: &Request) -> Result<Response, OfflineError> {
        let response = JsFuture::from(self.scope.fetch_with_request(request))
            .await
            .map_err(network_err)?;
        response.dyn_into::<Response>().map_err(network_err)
    }

    fn duplicate(&self, response: &Response) -> Result<Response, OfflineError> {
        Response::clone(response).map_err(cache_err)
    }
}

fn worker_scope() -> Result<ServiceWorkerGlobalScope, JsValue> {
    let _ = console_log::init_with_level(log::Level::Info);
    js_sys::global().dyn_into()
}

/// Fill the static cache. The worker passes the promise to `waitUntil`.
#[wasm_bindgen]
pub fn handle_install() -> Result<Promise, JsValue> {
    let backend = BrowserBackend::new(worker_scope()?);
    Ok(future_to_promise(async move {
        match install(&backend).await {
            Ok(()) => Ok(JsValue::UNDEFINED),
            Err(e) => {
                log::error!("Offline install failed: {}", e);
                Err(JsValue::from_str(&e.to_string()))
            }
        }
    }))
}

/// Answer `request`. The worker passes the promise to `respondWith`; it
/// resolves to `undefined` when neither network nor cache has an answer.
#[wasm_bindgen]
pub fn handle_fetch(request: Request) -> Result<Promise, JsValue> {
    let backend = BrowserBackend::new(worker_scope()?);
    let origin = backend.origin();
    Ok(future_to_promise(async move {
        match respond(&backend, &request, &origin).await {
            Ok(Some(response)) => Ok(response.into()),
            Ok(None) => {
                log::warn!("No network or cached answer for {}", request.url());
                Ok(JsValue::UNDEFINED)
            }
            Err(e) => Err(JsValue::from_str(&e.to_string())),
        }
    }))
}
