use axum::http::HeaderValue;
use metrics_exporter_prometheus::PrometheusHandle;
use screener::config::{CatalogConfig, CorsConfig};
use screener::screener::{
    CatalogError, CatalogSource, JsonDirectoryCatalog, PreloadedCatalog, ScreenerCatalog,
};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, Any, CorsLayer};
use tracing::warn;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Catalog strategy chosen from configuration at startup.
pub(crate) enum ConfiguredCatalog {
    Preloaded(PreloadedCatalog),
    Reloading(JsonDirectoryCatalog),
}

impl ConfiguredCatalog {
    /// Loads eagerly unless per-request reloads are enabled, so a broken data
    /// directory stops startup instead of failing the first request.
    pub(crate) fn from_config(config: &CatalogConfig) -> Result<Self, CatalogError> {
        if config.reload_each_request {
            let source = JsonDirectoryCatalog::new(&config.data_dir);
            source.load()?;
            Ok(Self::Reloading(source))
        } else {
            PreloadedCatalog::from_dir(&config.data_dir).map(Self::Preloaded)
        }
    }

    pub(crate) fn mode(&self) -> &'static str {
        match self {
            ConfiguredCatalog::Preloaded(_) => "preloaded",
            ConfiguredCatalog::Reloading(_) => "reload_each_request",
        }
    }
}

impl CatalogSource for ConfiguredCatalog {
    fn load(&self) -> Result<Arc<ScreenerCatalog>, CatalogError> {
        match self {
            ConfiguredCatalog::Preloaded(source) => source.load(),
            ConfiguredCatalog::Reloading(source) => source.load(),
        }
    }
}

pub(crate) fn cors_layer(config: &CorsConfig) -> CorsLayer {
    if config.allows_any_origin() {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(%origin, "ignoring CORS origin that is not a valid header value");
                None
            }
        })
        .collect();

    // Credentialed requests forbid wildcard methods/headers, so mirror them.
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
}
