//! Offline caching worker
//!
//! On install the static assets are stored in `STATIC_CACHE`. On fetch,
//! same-origin requests are served cache-first and everything else
//! network-first, with successful network responses copied into
//! `DYNAMIC_CACHE` for later offline use.
//!
//! The strategies are written against `Backend` so they run unchanged on the
//! browser Cache/fetch APIs (`web`) and on in-memory fakes.

#[cfg(target_arch = "wasm32")]
pub mod web;

use thiserror::Error;

/// Cache filled on install
pub const STATIC_CACHE: &str = "static-cache";
/// Cache filled from network-first responses
pub const DYNAMIC_CACHE: &str = "dynamic-cache";

/// Assets stored on install: the page and the game's wasm-bindgen output.
///
/// `Trunk.toml` turns off file hashing so these names are stable. Installing
/// fails as a whole if any of them is missing.
pub const STATIC_ASSETS: &[&str] = &[
    "./",
    "./index.html",
    "./canvas-pong.js",
    "./canvas-pong_bg.wasm",
];

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum OfflineError {
    #[error("cache error: {0}")]
    Cache(String),
    #[error("network error: {0}")]
    Network(String),
}

/// How a request is resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Serve from cache, fall back to the network
    CacheFirst,
    /// Try the network, fall back to the dynamic cache
    NetworkFirst,
}

/// Cache storage plus network access, as seen by the worker
#[allow(async_fn_in_trait)]
pub trait Backend {
    type Request;
    type Response;

    /// Absolute URL of `request`
    fn request_url(&self, request: &Self::Request) -> String;

    /// Serialized origin of `request`, `None` when the URL has no
    /// tuple origin (`data:`, `blob:` and the like)
    fn request_origin(&self, request: &Self::Request) -> Option<String>;

    /// Fetch every path in `paths` and store it in cache `cache`
    async fn add_all(&self, cache: &str, paths: &[&str]) -> Result<(), OfflineError>;

    /// Look `request` up in cache `cache`, or in every cache when `None`
    async fn lookup(
        &self,
        cache: Option<&str>,
        request: &Self::Request,
    ) -> Result<Option<Self::Response>, OfflineError>;

    async fn put(
        &self,
        cache: &str,
        request: &Self::Request,
        response: Self::Response,
    ) -> Result<(), OfflineError>;

    async fn fetch(&self, request: &Self::Request) -> Result<Self::Response, OfflineError>;

    /// Independent copy of `response` (bodies can only be read once)
    fn duplicate(&self, response: &Self::Response) -> Result<Self::Response, OfflineError>;
}

/// Pick the strategy for a request with origin `request_origin` from a
/// worker running at `worker_origin`. Same-origin requests are cache-first;
/// anything whose origin differs or is opaque is network-first.
pub fn route(request_origin: Option<&str>, worker_origin: &str) -> Strategy {
    match request_origin {
        Some(origin) if origin == worker_origin => Strategy::CacheFirst,
        _ => Strategy::NetworkFirst,
    }
}

/// Populate the static cache
pub async fn install<B: Backend>(backend: &B) -> Result<(), OfflineError> {
    backend.add_all(STATIC_CACHE, STATIC_ASSETS).await?;
    log::info!("Cached {} static assets", STATIC_ASSETS.len());
    Ok(())
}

/// Serve from any cache; on a miss go to the network without caching
pub async fn cache_first<B: Backend>(
    backend: &B,
    request: &B::Request,
) -> Result<B::Response, OfflineError> {
    match backend.lookup(None, request).await {
        Ok(Some(cached)) => return Ok(cached),
        Ok(None) => {}
        Err(e) => log::warn!("Cache lookup failed, using network: {}", e),
    }
    backend.fetch(request).await
}

/// Try the network and keep a copy in the dynamic cache. When the network
/// fails, answer from the dynamic cache; `None` if it has nothing either.
pub async fn network_first<B: Backend>(
    backend: &B,
    request: &B::Request,
) -> Result<Option<B::Response>, OfflineError> {
    match backend.fetch(request).await {
        Ok(response) => {
            match backend.duplicate(&response) {
                Ok(copy) => {
                    if let Err(e) = backend.put(DYNAMIC_CACHE, request, copy).await {
                        log::warn!("Could not cache {}: {}", backend.request_url(request), e);
                    }
                }
                Err(e) => log::warn!("Could not copy response: {}", e),
            }
            Ok(Some(response))
        }
        Err(e) => {
            log::debug!("{}; falling back to cache", e);
            backend.lookup(Some(DYNAMIC_CACHE), request).await
        }
    }
}

/// Resolve a fetch the way the worker does: route, then apply the strategy
pub async fn respond<B: Backend>(
    backend: &B,
    request: &B::Request,
    worker_origin: &str,
) -> Result<Option<B::Response>, OfflineError> {
    let origin = backend.request_origin(request);
    match route(origin.as_deref(), worker_origin) {
        Strategy::CacheFirst => cache_first(backend, request).await.map(Some),
        Strategy::NetworkFirst => network_first(backend, request).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};
    use std::collections::{HashMap, HashSet};

    const ORIGIN: &str = "https://pong.example";

    /// Request as the browser hands it over: URL plus its parsed origin
    #[derive(Debug, Clone)]
    struct FakeRequest {
        url: String,
        origin: Option<String>,
    }

    /// Same-origin request for `path`
    fn local(path: &str) -> FakeRequest {
        FakeRequest {
            url: format!("{ORIGIN}{}", path.trim_start_matches('.')),
            origin: Some(ORIGIN.to_string()),
        }
    }

    fn remote(origin: &str, path: &str) -> FakeRequest {
        FakeRequest {
            url: format!("{origin}{path}"),
            origin: Some(origin.to_string()),
        }
    }

    /// In-memory caches and a scripted network keyed by URL
    #[derive(Default)]
    struct FakeBackend {
        caches: RefCell<HashMap<String, HashMap<String, String>>>,
        network: HashMap<String, String>,
        offline: bool,
        broken_cache: bool,
        fetches: Cell<u32>,
        failing_puts: HashSet<String>,
    }

    impl FakeBackend {
        fn online(pages: &[(&FakeRequest, &str)]) -> Self {
            Self {
                network: pages
                    .iter()
                    .map(|(request, body)| (request.url.clone(), body.to_string()))
                    .collect(),
                ..Default::default()
            }
        }

        fn cached(&self, cache: &str, request: &FakeRequest) -> Option<String> {
            self.caches.borrow().get(cache)?.get(&request.url).cloned()
        }

        fn seed(&self, cache: &str, request: &FakeRequest, body: &str) {
            self.caches
                .borrow_mut()
                .entry(cache.to_string())
                .or_default()
                .insert(request.url.clone(), body.to_string());
        }
    }

    impl Backend for FakeBackend {
        type Request = FakeRequest;
        type Response = String;

        fn request_url(&self, request: &FakeRequest) -> String {
            request.url.clone()
        }

        fn request_origin(&self, request: &FakeRequest) -> Option<String> {
            request.origin.clone()
        }

        async fn add_all(&self, cache: &str, paths: &[&str]) -> Result<(), OfflineError> {
            for path in paths {
                let request = local(path);
                let body = self.fetch(&request).await?;
                self.seed(cache, &request, &body);
            }
            Ok(())
        }

        async fn lookup(
            &self,
            cache: Option<&str>,
            request: &FakeRequest,
        ) -> Result<Option<String>, OfflineError> {
            if self.broken_cache {
                return Err(OfflineError::Cache("quota".to_string()));
            }
            let caches = self.caches.borrow();
            Ok(match cache {
                Some(name) => caches.get(name).and_then(|c| c.get(&request.url)).cloned(),
                None => caches.values().find_map(|c| c.get(&request.url)).cloned(),
            })
        }

        async fn put(&self, cache: &str, request: &FakeRequest, response: String) -> Result<(), OfflineError> {
            if self.failing_puts.contains(&request.url) {
                return Err(OfflineError::Cache("put rejected".to_string()));
            }
            self.seed(cache, request, &response);
            Ok(())
        }

        async fn fetch(&self, request: &FakeRequest) -> Result<String, OfflineError> {
            self.fetches.set(self.fetches.get() + 1);
            if self.offline {
                return Err(OfflineError::Network("offline".to_string()));
            }
            self.network
                .get(&request.url)
                .cloned()
                .ok_or_else(|| OfflineError::Network(format!("404 {}", request.url)))
        }

        fn duplicate(&self, response: &String) -> Result<String, OfflineError> {
            Ok(response.clone())
        }
    }

    #[test]
    fn test_route_same_origin_is_cache_first() {
        assert_eq!(route(Some(ORIGIN), ORIGIN), Strategy::CacheFirst);
    }

    #[test]
    fn test_route_other_origin_is_network_first() {
        assert_eq!(route(Some("https://fonts.example"), ORIGIN), Strategy::NetworkFirst);
        assert_eq!(route(Some("https://pong.example:8443"), ORIGIN), Strategy::NetworkFirst);
        assert_eq!(route(Some("http://pong.example"), ORIGIN), Strategy::NetworkFirst);
    }

    #[test]
    fn test_route_opaque_origin_is_network_first() {
        assert_eq!(route(None, ORIGIN), Strategy::NetworkFirst);
        // Browsers serialize opaque origins as "null"
        assert_eq!(route(Some("null"), ORIGIN), Strategy::NetworkFirst);
    }

    #[test]
    fn test_static_assets_are_the_served_build() {
        assert!(STATIC_ASSETS.contains(&"./index.html"));
        assert!(STATIC_ASSETS.contains(&"./canvas-pong.js"));
        assert!(STATIC_ASSETS.contains(&"./canvas-pong_bg.wasm"));
        // Only files this build emits
        assert!(STATIC_ASSETS.iter().all(|p| !p.contains("bundle") && !p.contains("/css/")));
        let unique: HashSet<_> = STATIC_ASSETS.iter().collect();
        assert_eq!(unique.len(), STATIC_ASSETS.len());
    }

    #[test]
    fn test_install_caches_static_assets() {
        let requests: Vec<FakeRequest> = STATIC_ASSETS.iter().map(|p| local(p)).collect();
        let pages: Vec<(&FakeRequest, &str)> = requests.iter().map(|r| (r, "asset")).collect();
        let backend = FakeBackend::online(&pages);

        pollster::block_on(install(&backend)).unwrap();

        for request in &requests {
            assert_eq!(backend.cached(STATIC_CACHE, request).as_deref(), Some("asset"));
        }
    }

    #[test]
    fn test_install_fails_when_an_asset_is_missing() {
        let index = local("./index.html");
        let backend = FakeBackend::online(&[(&index, "<html>")]);
        let result = pollster::block_on(install(&backend));
        assert!(matches!(result, Err(OfflineError::Network(_))));
    }

    #[test]
    fn test_cache_first_hit_skips_network() {
        let backend = FakeBackend::online(&[]);
        let index = local("./index.html");
        backend.seed(STATIC_CACHE, &index, "cached");

        let body = pollster::block_on(cache_first(&backend, &index)).unwrap();

        assert_eq!(body, "cached");
        assert_eq!(backend.fetches.get(), 0);
    }

    #[test]
    fn test_cache_first_miss_uses_network_without_caching() {
        let request = local("./favicon.ico");
        let backend = FakeBackend::online(&[(&request, "fresh")]);

        let body = pollster::block_on(cache_first(&backend, &request)).unwrap();

        assert_eq!(body, "fresh");
        assert_eq!(backend.fetches.get(), 1);
        assert_eq!(backend.cached(DYNAMIC_CACHE, &request), None);
    }

    #[test]
    fn test_cache_first_broken_cache_uses_network() {
        let index = local("./index.html");
        let mut backend = FakeBackend::online(&[(&index, "fresh")]);
        backend.broken_cache = true;
        let body = pollster::block_on(cache_first(&backend, &index)).unwrap();
        assert_eq!(body, "fresh");
    }

    #[test]
    fn test_network_first_stores_copy() {
        let font = remote("https://fonts.example", "/a.woff");
        let backend = FakeBackend::online(&[(&font, "font")]);

        let body = pollster::block_on(network_first(&backend, &font)).unwrap();

        assert_eq!(body.as_deref(), Some("font"));
        assert_eq!(backend.cached(DYNAMIC_CACHE, &font).as_deref(), Some("font"));
    }

    #[test]
    fn test_network_first_falls_back_to_dynamic_cache() {
        let font = remote("https://fonts.example", "/a.woff");
        let other = remote("https://fonts.example", "/b.woff");
        let mut backend = FakeBackend::online(&[]);
        backend.offline = true;
        backend.seed(DYNAMIC_CACHE, &font, "stale font");
        // Only the dynamic cache counts for the fallback
        backend.seed(STATIC_CACHE, &other, "other");

        let body = pollster::block_on(network_first(&backend, &font)).unwrap();
        assert_eq!(body.as_deref(), Some("stale font"));

        let missing = pollster::block_on(network_first(&backend, &other)).unwrap();
        assert_eq!(missing, None);
    }

    #[test]
    fn test_network_first_put_failure_still_returns_response() {
        let score = remote("https://api.example", "/score");
        let mut backend = FakeBackend::online(&[(&score, "ok")]);
        backend.failing_puts.insert(score.url.clone());

        let body = pollster::block_on(network_first(&backend, &score)).unwrap();

        assert_eq!(body.as_deref(), Some("ok"));
        assert_eq!(backend.cached(DYNAMIC_CACHE, &score), None);
    }

    #[test]
    fn test_respond_dispatches_by_origin() {
        let page = local("./index.html");
        let lib = remote("https://cdn.example", "/lib.js");
        let backend = FakeBackend::online(&[(&page, "net page"), (&lib, "net lib")]);
        backend.seed(STATIC_CACHE, &page, "cached page");
        backend.seed(STATIC_CACHE, &lib, "cached lib");

        let page = pollster::block_on(respond(&backend, &page, ORIGIN)).unwrap();
        let lib = pollster::block_on(respond(&backend, &lib, ORIGIN)).unwrap();

        assert_eq!(page.as_deref(), Some("cached page"));
        assert_eq!(lib.as_deref(), Some("net lib"));
        assert_eq!(backend.fetches.get(), 1);
    }

    #[test]
    fn test_respond_opaque_origin_goes_to_network() {
        let blob = FakeRequest {
            url: "data:text/plain,hi".to_string(),
            origin: None,
        };
        let backend = FakeBackend::online(&[(&blob, "hi")]);
        backend.seed(STATIC_CACHE, &blob, "cached");

        let body = pollster::block_on(respond(&backend, &blob, ORIGIN)).unwrap();

        assert_eq!(body.as_deref(), Some("hi"));
        assert_eq!(backend.fetches.get(), 1);
    }
}
