use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing::{info, warn};

use lexcase_intake::IntakeWorkflowBuilder;
use lexcase_server::api::AppState;
use lexcase_server::config::LexcaseConfig;

/// Lexcase case intake HTTP server.
#[derive(Parser, Debug)]
#[command(name = "lexcase-server", about = "Standalone HTTP server for Lexcase")]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long, default_value = "lexcase.toml")]
    config: String,

    /// Override the bind host.
    #[arg(long)]
    host: Option<String>,

    /// Override the bind port.
    #[arg(long)]
    port: Option<u16>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Initialize the configured repository schema, then exit.
    Migrate,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Load configuration from TOML file, or use defaults if the file does not exist.
    let config_found = Path::new(&cli.config).exists();
    let config: LexcaseConfig = if config_found {
        let contents = std::fs::read_to_string(&cli.config)?;
        toml::from_str(&contents)?
    } else {
        toml::from_str("")?
    };

    if let Some(Commands::Migrate) = cli.command {
        lexcase_server::telemetry::init_fmt_only();
        return run_migrate(&config).await;
    }

    let telemetry_guard = lexcase_server::telemetry::init(&config.telemetry);

    if !config_found {
        info!(path = %cli.config, "config file not found, using defaults");
    }

    let repository = lexcase_server::repo_factory::create_repository(&config.repository).await?;
    info!(backend = %config.repository.backend, "case repository initialized");

    let storage = lexcase_server::storage_factory::create_storage(&config.storage).await?;
    info!(
        backend = %config.storage.backend,
        bucket = %config.storage.bucket,
        "object store initialized"
    );

    let workflow = IntakeWorkflowBuilder::new()
        .repository(Arc::clone(&repository))
        .storage(Arc::clone(&storage))
        .bucket(config.storage.bucket.clone())
        .limits(config.intake.limits())
        .max_concurrent_uploads(config.intake.max_concurrent_uploads)
        .build()?;

    let state = AppState {
        workflow: Arc::new(workflow),
        repository,
        storage,
        body_limit: config.intake.request_body_limit(),
    };
    let app = lexcase_server::api::router(state);

    let host = cli.host.unwrap_or(config.server.host);
    let port = cli.port.unwrap_or(config.server.port);
    let addr = format!("{host}:{port}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(address = %addr, "lexcase-server listening");

    let shutdown_timeout = Duration::from_secs(config.server.shutdown_timeout_seconds);
    let server = async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
    };

    // In-flight requests get `shutdown_timeout` once the signal arrives.
    tokio::select! {
        result = server => result?,
        () = async {
            shutdown_signal().await;
            tokio::time::sleep(shutdown_timeout).await;
        } => {
            warn!(
                timeout_secs = config.server.shutdown_timeout_seconds,
                "shutdown timeout exceeded, dropping in-flight requests"
            );
        }
    }

    telemetry_guard.shutdown();

    info!("lexcase-server shut down");
    Ok(())
}

/// Run the `migrate` subcommand: initialize the repository schema and exit.
async fn run_migrate(config: &LexcaseConfig) -> Result<(), Box<dyn std::error::Error>> {
    info!(backend = %config.repository.backend, "running repository migrations...");
    let _repository = lexcase_server::repo_factory::create_repository(&config.repository).await?;
    info!(backend = %config.repository.backend, "repository migrations complete");
    Ok(())
}

/// Wait for SIGINT (Ctrl+C) or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => { info!("received SIGINT"); }
        () = terminate => { info!("received SIGTERM"); }
    }
}
