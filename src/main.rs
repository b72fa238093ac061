//! Folder-based file upload service.
//!
//! Clients POST multipart uploads to `/upload`; each file is stored under a
//! directory derived from sanitized naming fields (`folderName`, or
//! `companyName`/`projectName`/`titleName`) below the upload root.
//!
//! ```text
//!     Client ──▶ CORS / request ID / trace / limits ──▶ router
//!                                                        │
//!                 GET /health ◀──────────────────────────┤
//!                 POST /upload ─▶ naming ─▶ destination ─▶ store ─▶ disk
//!                 GET /uploads/* ◀── ServeDir ◀──────────────────── disk
//! ```

use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tokio::net::TcpListener;

use folder_upload::config::{
    apply_env_overrides, read_config, validate_config, ConfigError, UploadConfig,
};
use folder_upload::lifecycle::signals::shutdown_signal;
use folder_upload::lifecycle::StartupError;
use folder_upload::observability::{logging, metrics};
use folder_upload::{HttpServer, Shutdown};

#[derive(Parser, Debug)]
#[command(name = "folder-upload", version, about = "Folder-based file upload service")]
struct Args {
    /// TOML configuration file.
    #[arg(short, long, env = "UPLOAD_CONFIG")]
    config: Option<PathBuf>,

    /// Bind host (overrides config and environment).
    #[arg(long)]
    host: Option<String>,

    /// Listening port (overrides config and environment).
    #[arg(short, long)]
    port: Option<u16>,

    /// Upload root directory (overrides config and environment).
    #[arg(long)]
    root_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    match run(Args::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("folder-upload: {e}");
            let mut source = e.source();
            while let Some(cause) = source {
                eprintln!("  caused by: {cause}");
                source = cause.source();
            }
            ExitCode::FAILURE
        }
    }
}

fn load_config(args: &Args) -> Result<UploadConfig, ConfigError> {
    let mut config = match &args.config {
        Some(path) => read_config(path)?,
        None => UploadConfig::default(),
    };

    apply_env_overrides(&mut config)?;

    if let Some(host) = &args.host {
        config.listener.host = host.clone();
    }
    if let Some(port) = args.port {
        config.listener.port = port;
    }
    if let Some(root) = &args.root_dir {
        config.storage.root_dir = root.clone();
    }

    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

async fn run(args: Args) -> Result<(), Box<dyn Error>> {
    let config = load_config(&args)?;
    logging::init_logging(&config.observability)?;

    tracing::info!("folder-upload v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address(),
        root_dir = %config.storage.root_dir.display(),
        naming_scheme = %config.storage.naming_scheme,
        max_files = config.limits.max_files,
        max_file_size = ?config.limits.max_file_size,
        static_files = config.static_files.enabled,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        if let Some(addr) = config.observability.metrics_socket_addr() {
            metrics::init_metrics(addr)?;
        }
    }

    let server = HttpServer::new(config)?;
    let address = server.config().listener.bind_address();
    let tls = server.config().listener.tls.clone();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        shutdown_signal().await;
        shutdown.trigger();
    });

    let bind_err = |source: std::io::Error| StartupError::Bind {
        address: address.clone(),
        source,
    };

    match tls {
        Some(tls) => {
            let listener = std::net::TcpListener::bind(&address).map_err(bind_err)?;
            server.run_tls(listener, &tls, server_shutdown).await?;
        }
        None => {
            let listener = TcpListener::bind(&address).await.map_err(bind_err)?;
            server.run(listener, server_shutdown).await?;
        }
    }

    tracing::info!("Shutdown complete");
    Ok(())
}
