//! API server setup and configuration.

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    trace::TraceLayer,
};

use crate::config::ServiceConfig;
use crate::vision::{NativeVisionEngine, VisionEngine};
use crate::{Result, ScanHubError, staging};

use super::handlers::{health_handler, index_handler, ocr_handler, scan_image_handler, scan_result_handler};
use super::types::ApiState;

/// Build the CORS layer.
///
/// `SCANHUB_CORS_ORIGINS` (comma-separated) restricts allowed origins;
/// the default allows all origins for development convenience.
fn cors_from_env() -> CorsLayer {
    if let Ok(origins_str) = std::env::var("SCANHUB_CORS_ORIGINS") {
        let origins: Vec<_> = origins_str
            .split(',')
            .filter(|s| !s.trim().is_empty())
            .filter_map(|s| s.trim().parse::<axum::http::HeaderValue>().ok())
            .collect();

        if !origins.is_empty() {
            tracing::info!("CORS configured with {} explicit allowed origin(s)", origins.len());
            return CorsLayer::new()
                .allow_origin(AllowOrigin::list(origins))
                .allow_methods(Any)
                .allow_headers(Any);
        }

        tracing::warn!("SCANHUB_CORS_ORIGINS set but empty/invalid - falling back to permissive CORS");
    }

    CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any)
}

/// Create the API router with all routes configured.
///
/// This is public to allow embedding the router in other applications and
/// to let tests drive it in-process with a substitute engine.
///
/// Request bodies over `config.max_upload_bytes` are rejected at the
/// router layer (HTTP 413) before any handler logic runs.
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use scanhub::config::ServiceConfig;
/// use scanhub::vision::NativeVisionEngine;
/// use scanhub::api::create_router;
///
/// let config = ServiceConfig::default();
/// let engine = Arc::new(NativeVisionEngine::new(config.ocr.clone()));
/// let router = create_router(config, engine);
/// ```
pub fn create_router(config: ServiceConfig, engine: Arc<dyn VisionEngine>) -> Router {
    let max_upload_bytes = config.max_upload_bytes;
    let state = ApiState {
        config: Arc::new(config),
        engine,
    };

    Router::new()
        .route("/", get(index_handler))
        .route("/health", get(health_handler))
        .route("/api/scan/result", post(scan_result_handler))
        .route("/api/scan/image", post(scan_image_handler))
        .route("/api/ocr", post(ocr_handler))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(RequestBodyLimitLayer::new(max_upload_bytes))
        .layer(cors_from_env())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the API server.
///
/// Creates the upload staging directory if absent, binds the production
/// vision engine, and serves until the process exits.
///
/// # Arguments
///
/// * `host` - IP address to bind to (e.g., "127.0.0.1" or "0.0.0.0")
/// * `port` - Port number to bind to (e.g., 8000)
/// * `config` - Service configuration resolved at startup
///
/// # Examples
///
/// ```no_run
/// use scanhub::{api::serve, config::ServiceConfig};
///
/// #[tokio::main]
/// async fn main() -> scanhub::Result<()> {
///     serve("127.0.0.1", 8000, ServiceConfig::default()).await?;
///     Ok(())
/// }
/// ```
pub async fn serve(host: impl AsRef<str>, port: u16, config: ServiceConfig) -> Result<()> {
    staging::ensure_upload_dir(&config.upload_dir)?;

    let ip: IpAddr = host
        .as_ref()
        .parse()
        .map_err(|e| ScanHubError::validation(format!("Invalid host address: {}", e)))?;
    let addr = SocketAddr::new(ip, port);

    tracing::info!(
        "Starting scanhub API server on http://{} (upload dir: {}, max upload: {} bytes)",
        addr,
        config.upload_dir.display(),
        config.max_upload_bytes
    );

    let engine: Arc<dyn VisionEngine> = Arc::new(NativeVisionEngine::new(config.ocr.clone()));
    let app = create_router(config, engine);

    let listener = tokio::net::TcpListener::bind(addr).await.map_err(ScanHubError::Io)?;

    axum::serve(listener, app)
        .await
        .map_err(|e| ScanHubError::Other(e.to_string()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OcrConfig;

    #[test]
    fn test_create_router() {
        let config = ServiceConfig::default();
        let engine: Arc<dyn VisionEngine> = Arc::new(NativeVisionEngine::new(OcrConfig::default()));
        let _router = create_router(config, engine);
    }

    #[tokio::test]
    async fn test_serve_rejects_invalid_host() {
        let result = serve("not-an-ip", 0, ServiceConfig {
            upload_dir: std::env::temp_dir().join("scanhub-host-test"),
            ..ServiceConfig::default()
        })
        .await;
        assert!(matches!(result, Err(ScanHubError::Validation { .. })));
    }
}
