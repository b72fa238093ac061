//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (request ID, tracing, CORS, limits)
//! - Serve the upload tree read-only when enabled
//! - Bind server to listener (plain TCP or TLS)
//! - Graceful shutdown

use std::io;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::FromRef;
use axum::routing::{get, post};
use axum::{middleware, Router};
use axum_server::tls_rustls::RustlsConfig;
use axum_server::Handle;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::config::{TlsConfig, UploadConfig};
use crate::health::health_handler;
use crate::http::response::not_found;
use crate::lifecycle::shutdown;
use crate::lifecycle::startup::{prepare_upload_root, StartupError};
use crate::observability::tracing::request_span;
use crate::security::{apply_limits, cors_layer, hide_dotfiles};
use crate::upload::{upload_handler, UploadSettings};

/// How long in-flight TLS connections get to finish after shutdown.
const TLS_DRAIN_TIMEOUT: Duration = Duration::from_secs(30);

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub uploads: Arc<UploadSettings>,
}

impl FromRef<AppState> for Arc<UploadSettings> {
    fn from_ref(state: &AppState) -> Self {
        state.uploads.clone()
    }
}

/// HTTP server for the upload service.
pub struct HttpServer {
    router: Router,
    config: UploadConfig,
    settings: Arc<UploadSettings>,
}

impl HttpServer {
    /// Prepare the upload root and build the router.
    pub fn new(config: UploadConfig) -> Result<Self, StartupError> {
        let root = prepare_upload_root(&config.storage.root_dir)?;
        let settings = Arc::new(UploadSettings::from_config(&config, root));
        let router = build_router(&config, settings.clone());

        Ok(Self {
            router,
            config,
            settings,
        })
    }

    /// The fully layered router, e.g. for driving it in-process.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &UploadConfig {
        &self.config
    }

    /// Absolute root of the upload tree.
    pub fn upload_root(&self) -> &Path {
        &self.settings.root_dir
    }

    /// Run the server until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            root = %self.settings.root_dir.display(),
            scheme = %self.settings.naming_scheme,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown::wait(shutdown))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Run the server over TLS until `shutdown` fires.
    pub async fn run_tls(
        self,
        listener: std::net::TcpListener,
        tls: &TlsConfig,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), io::Error> {
        let addr = listener.local_addr()?;
        listener.set_nonblocking(true)?;
        let rustls = RustlsConfig::from_pem_file(&tls.cert_path, &tls.key_path).await?;

        tracing::info!(
            address = %addr,
            root = %self.settings.root_dir.display(),
            scheme = %self.settings.naming_scheme,
            "HTTPS server starting"
        );

        let handle = Handle::new();
        let drain = handle.clone();
        tokio::spawn(async move {
            shutdown::wait(shutdown).await;
            drain.graceful_shutdown(Some(TLS_DRAIN_TIMEOUT));
        });

        axum_server::from_tcp_rustls(listener, rustls)
            .handle(handle)
            .serve(self.router.into_make_service())
            .await?;

        tracing::info!("HTTPS server stopped");
        Ok(())
    }
}

/// Build the Axum router with all middleware layers.
pub fn build_router(config: &UploadConfig, settings: Arc<UploadSettings>) -> Router {
    let state = AppState {
        uploads: settings.clone(),
    };

    let mut router = Router::new()
        .route("/health", get(health_handler))
        .route("/upload", post(upload_handler))
        .fallback(not_found)
        .method_not_allowed_fallback(not_found)
        .with_state(state);

    if let Some(mount) = &settings.public_mount {
        let files = Router::new()
            .nest_service(
                mount.trim_end_matches('/'),
                ServeDir::new(&settings.root_dir),
            )
            .layer(middleware::from_fn(hide_dotfiles));
        router = router.merge(files);
    }

    apply_limits(router, &config.limits, &config.timeouts).layer(
        ServiceBuilder::new()
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
            .layer(TraceLayer::new_for_http().make_span_with(request_span))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(cors_layer(&config.cors)),
    )
}
