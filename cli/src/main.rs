//! Car registry CLI server
//!
//! ```sh
//! # Run with default config (~/.config/car-registry/config.toml)
//! car-registry
//!
//! # Custom config path
//! car-registry --config /etc/car-registry/config.toml
//!
//! # Override the listen port
//! car-registry --port 8081
//!
//! # Validate config without starting
//! car-registry --check
//! ```

use std::path::PathBuf;

use clap::Parser;
use tracing::{error, info};

use car_registry::config::AppConfig;
use car_registry::server::{init_tracing, ServerHandle, ServerOptions};

/// Car registry: REST service for users and their cars.
#[derive(Parser, Debug)]
#[command(
    name = "car-registry",
    version,
    about = "REST service for registering users and their cars",
    long_about = "Car registry REST API server with Swagger UI and Prometheus metrics.\n\n\
                  Default config: ~/.config/car-registry/config.toml"
)]
struct Cli {
    /// Path to the configuration file (TOML).
    #[arg(short, long, env = "CAR_REGISTRY_CONFIG")]
    config: Option<PathBuf>,

    /// Override the REST API listen port.
    #[arg(short, long)]
    port: Option<u16>,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(short, long)]
    log_level: Option<String>,

    /// Validate the configuration file and exit without starting the server.
    #[arg(long)]
    check: bool,

    /// Skip database migrations on startup.
    #[arg(long)]
    no_migrate: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // ── Load configuration ─────────────────────────────────────
    let config_path = cli.config.unwrap_or_else(car_registry::default_config_path);

    let loaded = AppConfig::load(&config_path);

    // ── Config validation mode ─────────────────────────────────
    if cli.check {
        let mut config = loaded?;
        if let Some(port) = cli.port {
            config.server.port = port;
        }
        config.validate()?;
        println!("Configuration is valid");
        println!("   Config file : {}", config_path.display());
        println!("   API address : {}", config.listen_address());
        println!("   Database    : {}", config.database.url);
        println!("   Log format  : {}", config.logging.format);
        return Ok(());
    }

    let mut config = match loaded {
        Ok(mut cfg) => {
            if let Some(ref level) = cli.log_level {
                cfg.logging.level = level.clone();
            }
            // Init tracing first so subsequent logs are formatted properly
            init_tracing(&cfg);
            info!("Configuration loaded from {}", config_path.display());
            cfg
        }
        Err(e) => {
            let mut cfg = AppConfig::default();
            if let Some(ref level) = cli.log_level {
                cfg.logging.level = level.clone();
            }
            init_tracing(&cfg);
            error!("Failed to load config from {}: {}", config_path.display(), e);
            error!("Using default configuration.");
            cfg
        }
    };

    // ── Apply CLI overrides ────────────────────────────────────
    if let Some(port) = cli.port {
        info!("CLI override: port = {}", port);
        config.server.port = port;
    }

    // ── Start server ───────────────────────────────────────────
    let handle = ServerHandle::start(ServerOptions {
        config,
        auto_migrate: !cli.no_migrate,
    })
    .await?;

    // Install OS signal handlers (SIGTERM, SIGINT)
    handle.install_signal_handler();

    info!("Press Ctrl+C to shutdown gracefully.");

    handle.shutdown_signal().wait().await;
    handle.wait().await;

    Ok(())
}
