//! Standalone paymail host backed by a static JSON directory.
//!
//! ```text
//! PAYMAIL_BASE_URL=https://example.com PAYMAIL_DIRECTORY=handles.json paymail-server
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use bsvalias_server::service::config::DEFAULT_BODY_LIMIT;
use bsvalias_server::{
    CorsConfig, NetworkConfig, NetworkModule, PaymailConfig, PaymailRouter, StaticDirectory,
};
use clap::Parser;
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Serve bsvalias discovery and sub-protocol endpoints.
#[derive(Debug, Parser)]
#[command(name = "paymail-server", version, about)]
struct Args {
    /// Public origin advertised in every capability URL.
    #[arg(long, env = "PAYMAIL_BASE_URL")]
    base_url: String,

    #[arg(long, env = "PAYMAIL_HOST", default_value = "0.0.0.0")]
    host: String,

    #[arg(long, env = "PAYMAIL_PORT", default_value_t = 3000)]
    port: u16,

    /// Prefix for sub-protocol routes. Discovery is always at the root.
    #[arg(long, env = "PAYMAIL_BASE_PATH", default_value = "/")]
    base_path: String,

    /// JSON file of handles to serve.
    #[arg(long, env = "PAYMAIL_DIRECTORY")]
    directory: PathBuf,

    /// Advertise that payment destination requests must be signed.
    #[arg(long, env = "PAYMAIL_SENDER_VALIDATION")]
    sender_validation: bool,

    /// Comma-separated allowed origins; CORS is off when unset.
    #[arg(long, env = "PAYMAIL_CORS_ORIGINS", value_delimiter = ',')]
    cors_origins: Option<Vec<String>>,

    /// Maximum JSON request body in bytes.
    #[arg(long, env = "PAYMAIL_BODY_LIMIT", default_value_t = DEFAULT_BODY_LIMIT)]
    body_limit: usize,

    /// Emit logs as JSON lines.
    #[arg(long, env = "PAYMAIL_LOG_JSON")]
    log_json: bool,
}

fn init_logging(json: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("bsvalias_server=info,tower_http=info"));
    let registry = tracing_subscriber::registry().with(filter);

    let initialized = if json {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_target(false).compact())
            .try_init()
    };
    initialized.context("failed to initialize tracing subscriber")
}

impl Args {
    fn paymail_config(&self, directory: StaticDirectory) -> PaymailConfig {
        let mut config = PaymailConfig {
            base_path: self.base_path.clone(),
            request_sender_validation: self.sender_validation,
            cors: self.cors_origins.clone().map(|origins| CorsConfig { origins }),
            ..PaymailConfig::default()
        };
        config.body.limit = self.body_limit;
        Arc::new(directory).install(&mut config.sub_protocols);
        config
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.log_json)?;

    let directory = StaticDirectory::load(&args.directory)?;
    let config = args.paymail_config(directory);
    let paymail = PaymailRouter::build(&args.base_url, &config)
        .with_context(|| format!("invalid paymail configuration for {}", args.base_url))?;

    let mut module = NetworkModule::new(
        NetworkConfig {
            host: args.host.clone(),
            port: args.port,
            ..NetworkConfig::default()
        },
        paymail,
    );
    let port = module.start().await?;
    info!(port, base_url = %args.base_url, "paymail server listening");

    module
        .serve(async {
            if let Err(err) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %err, "failed to listen for ctrl-c");
            }
        })
        .await
}
