use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::utils::toml_config::{LogFormat, ServerConfig};

/// Installs the global subscriber. `RUST_LOG` overrides `server.log_level`.
///
/// Returns an error if a subscriber is already installed.
pub fn init_logging(server: &ServerConfig, verbose: bool) -> anyhow::Result<()> {
    let default_level = if verbose {
        "debug"
    } else {
        server.log_level.as_str()
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "portcullis={lvl},portcullis_server={lvl},tower_http={lvl}",
            lvl = default_level
        ))
    });

    let registry = tracing_subscriber::registry().with(filter);

    match server.effective_log_format() {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()?,
        LogFormat::Pretty => registry
            .with(tracing_subscriber::fmt::layer())
            .try_init()?,
    }

    Ok(())
}
