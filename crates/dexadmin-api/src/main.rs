use anyhow::Context;
use clap::Parser;
use dexadmin_api::{AdminConfig, AdminServer, SrvConfig, PASSWORD_ENV};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "dexadmin", version, about = "Exchange administration server")]
struct Cli {
    /// Path to a TOML config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Listen address, overrides the config file
    #[arg(long)]
    listen: Option<SocketAddr>,

    /// PEM certificate for HTTPS, overrides the config file
    #[arg(long, requires = "key")]
    cert: Option<PathBuf>,

    /// PEM private key for HTTPS, overrides the config file
    #[arg(long, requires = "cert")]
    key: Option<PathBuf>,

    /// Log filter, overrides the config file
    #[arg(long)]
    log: Option<String>,
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for ctrl-c: {}", e);
    }
    tracing::info!("shutdown requested, draining in-flight requests");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => AdminConfig::from_file(path)?,
        None => AdminConfig::default(),
    };
    if let Some(listen) = cli.listen {
        config.listen_addr = listen;
    }
    if cli.cert.is_some() {
        config.tls_cert = cli.cert;
        config.tls_key = cli.key;
    }
    if let Some(log) = cli.log {
        config.log_filter = log;
    }

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let password = std::env::var(PASSWORD_ENV).ok();
    let auth = config.auth_secret(password.as_deref())?;
    let tls = config.tls()?;
    let core = config.build_core().context("failed to set up exchange core")?;

    let server = AdminServer::bind(SrvConfig {
        core: Arc::new(core),
        addr: config.listen_addr,
        auth,
        tls,
    })
    .await?;

    server.run(shutdown_signal()).await?;
    Ok(())
}
