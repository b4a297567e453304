use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    http::{HeaderValue, Method},
    Router,
};
use ferropix_core::{config::StorageBackendKind, ResizerConfig, ServerConfig};
use tokio::signal;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{info, Level};

use crate::{
    resizer::ImageResizer,
    routes::{create_router, AppState},
    ServerError, ServerResult,
};

/// Manages the HTTP server and the resize service behind it.
pub struct Server {
    router: Router,
    addr: SocketAddr,
}

impl Server {
    /// Create a new server instance with the provided configuration.
    pub fn new(config: ResizerConfig) -> ServerResult<Self> {
        info!("Initializing ferropix server...");

        // Convert core storage settings to the storage crate's config.
        let storage_config = ferropix_storage::StorageConfig {
            storage_type: match &config.storage.backend {
                StorageBackendKind::Local => ferropix_storage::StorageType::Local {
                    path: config.storage.local.base_path.clone(),
                },
                StorageBackendKind::S3 => ferropix_storage::StorageType::S3 {
                    region: config.storage.s3.region.clone(),
                    access_key_id: config.storage.s3.access_key_id.clone(),
                    secret_access_key: config.storage.s3.secret_access_key.clone(),
                    endpoint: config.storage.s3.endpoint.clone(),
                },
            },
        };

        let store = storage_config
            .create_store()
            .map_err(|e| ServerError::Internal(format!("storage initialization failed: {e}")))?;

        let resizer = Arc::new(ImageResizer::new(store, config.size_table()));

        let app_state = AppState {
            resizer,
            cache: config.cache.clone(),
        };

        let router = create_app_router(app_state, &config.server)?;

        let addr = format!("{}:{}", config.server.host, config.server.port)
            .parse()
            .map_err(|e| ServerError::Internal(format!("invalid server address: {e}")))?;

        Ok(Self { router, addr })
    }

    /// Start the server and listen for incoming connections.
    pub async fn serve(self) -> ServerResult<()> {
        info!("Starting server on {}", self.addr);

        let listener = tokio::net::TcpListener::bind(self.addr)
            .await
            .map_err(|e| ServerError::Internal(format!("failed to bind to address: {e}")))?;

        info!("Server listening on http://{}", self.addr);
        info!("Health check available at http://{}/api/health", self.addr);

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| ServerError::Internal(format!("server error: {e}")))?;

        info!("Server shutdown complete");
        Ok(())
    }
}

fn create_app_router(state: AppState, config: &ServerConfig) -> ServerResult<Router> {
    let cors_layer = if config.cors_origins.contains(&"*".to_string()) {
        CorsLayer::new()
            .allow_origin(tower_http::cors::Any)
            .allow_methods([Method::GET, Method::HEAD])
    } else {
        let origins: Result<Vec<HeaderValue>, _> = config
            .cors_origins
            .iter()
            .map(|origin| origin.parse::<HeaderValue>())
            .collect();
        let origins =
            origins.map_err(|e| ServerError::Internal(format!("invalid CORS origin: {e}")))?;
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::HEAD])
    };

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_request(DefaultOnRequest::new().level(Level::DEBUG))
        .on_response(DefaultOnResponse::new().level(Level::DEBUG));

    Ok(create_router(state).layer(trace_layer).layer(cors_layer))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install ctrl-c handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
