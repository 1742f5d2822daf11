//! Server Initialization
//!
//! Loads configuration, installs logging, bootstraps the application
//! context, runs the HTTP server and flushes usage statistics on shutdown.

use anyhow::Context;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use ctfai_infrastructure::config::{AppConfig, ConfigLoader};
use ctfai_infrastructure::logging::init_logging;
use ctfai_infrastructure::init_app;

use crate::admin::AdminAuthConfig;
use crate::args::Cli;
use crate::routes::build_rocket;

/// Load configuration, applying command line overrides
pub fn load_config(cli: &Cli) -> anyhow::Result<AppConfig> {
    let mut loader = ConfigLoader::new();
    if let Some(path) = &cli.config {
        loader = loader.with_config_path(path);
    }
    let mut config = loader.load().context("Failed to load configuration")?;
    if let Some(host) = &cli.host {
        config.server.host = host.clone();
    }
    if let Some(port) = cli.port {
        anyhow::ensure!(port != 0, "Server port cannot be 0");
        config.server.port = port;
    }
    Ok(config)
}

/// Rocket configuration for the loaded server settings
///
/// Rocket's own logger stays off; requests are traced by the service.
pub fn rocket_figment(config: &AppConfig) -> rocket::figment::Figment {
    rocket::Config::figment()
        .merge(("address", config.server.host.clone()))
        .merge(("port", config.server.port))
        .merge(("log_level", "off"))
}

/// Run the server until Rocket shuts down (Ctrl+C or SIGTERM)
pub async fn run_server(cli: Cli) -> anyhow::Result<()> {
    let config = load_config(&cli)?;
    init_logging(&config.logging).context("Failed to initialize logging")?;

    let figment = rocket_figment(&config);
    let auth = AdminAuthConfig::from_app_config(&config.admin);
    let (host, port) = (config.server.host.clone(), config.server.port);

    let context = init_app(config)
        .await
        .context("Failed to initialize application")?;

    let shutdown = CancellationToken::new();
    let flusher = context.start_usage_flusher(shutdown.clone());

    info!(%host, port, "HTTP server listening");
    let launched = build_rocket(context, auth).configure(figment).launch().await;

    shutdown.cancel();
    if let Err(e) = flusher.await {
        error!(error = %e, "Usage statistics flusher task failed");
    }

    if let Err(e) = launched {
        anyhow::bail!("HTTP server failed: {e}");
    }
    info!("Server stopped");
    Ok(())
}
