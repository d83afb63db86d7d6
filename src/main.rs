use anyhow::Result;
use backname::{Config, SharedConfig};
use is_terminal::IsTerminal;
use lazy_static::lazy_static;
use std::sync::Arc;
use time::format_description::FormatItem;
use time::macros::format_description;
use tokio::signal;
use tracing_subscriber::fmt::time::UtcTime;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

lazy_static! {
    static ref LOG_TIMESTAMP_FORMAT: &'static [FormatItem<'static>] =
        format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]Z");
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_init();

    let config = config_init(std::env::args().nth(1))?;

    tracing::info!(
        "serving zone {} on UDP {}",
        config.zone.name,
        &config.dns_udp_bind_addr
    );
    if let Some(tcp_addr) = &config.dns_tcp_bind_addr {
        tracing::info!("serving zone {} on TCP {}", config.zone.name, tcp_addr);
    }
    let dns_server = backname::dns::new(config.clone()).await?;
    let dns_handle = tokio::spawn(dns_server.block_until_done());

    tokio::select! {
        _ = signal::ctrl_c() => {
            tracing::info!("quitting from signal");
        },
        dns_res = dns_handle => {
            dns_res??;
            tracing::warn!("DNS server stopped");
        }
    }
    tracing::info!("goodbye");
    Ok(())
}

fn tracing_init() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(std::io::stdout().is_terminal())
                .with_timer(UtcTime::new(*LOG_TIMESTAMP_FORMAT)),
        )
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "backname=info".into()),
        )
        .init();
}

/// Load the config from the JSON file given as the first argument, or from the environment.
fn config_init(config_file: Option<String>) -> Result<SharedConfig> {
    let config = match config_file {
        Some(config_file) => {
            tracing::debug!("loading config from {config_file}");
            Config::try_from_file(&config_file)?
        }
        None => {
            tracing::debug!("loading config from environment");
            Config::from_env()?
        }
    };
    Ok(Arc::new(config))
}
