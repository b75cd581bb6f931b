//! CLI module for Portcullis
//!
//! Provides command-line interface parsing and handling for the
//! portcullis-server binary. Uses clap for argument parsing and owo-colors for
//! colored terminal output.

pub mod init;
pub mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::db::DatabaseProvider;
use crate::utils::toml_config::{AppConfig, ConfigError};
use output::Output;

/// Portcullis - user registration and JWT login service
#[derive(Parser, Debug)]
#[command(
    name = "portcullis-server",
    version,
    about = "Portcullis - user registration and JWT login service",
    long_about = "A small HTTP service for user registration, password login issuing JWTs,\n\
                  and bearer-token protected user lookup.\n\n\
                  Run without arguments to start the server, or use 'init' to scaffold a configuration.",
    after_help = "EXAMPLES:\n    \
                  portcullis-server init              # Scaffold portcullis.toml and .env.example\n    \
                  portcullis-server                   # Start the server (requires portcullis.toml)\n    \
                  portcullis-server config --validate # Check the configuration\n    \
                  portcullis-server --config my.toml  # Use a custom config file"
)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "portcullis.toml", global = true)]
    pub config: PathBuf,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scaffold portcullis.toml, .env.example, .gitignore and data/
    Init {
        /// Directory to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Overwrite existing files without prompting
        #[arg(short, long)]
        force: bool,

        /// Host address for the server
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Port for the server
        #[arg(long, default_value = "3000")]
        port: u16,
    },

    /// Show the effective configuration (secrets redacted)
    Config {
        /// Also report configuration warnings
        #[arg(long)]
        validate: bool,
    },
}

impl Cli {
    /// Parse CLI arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn output(&self) -> Output {
        if self.no_color {
            Output::no_color()
        } else {
            Output::new()
        }
    }
}

/// Loads and prints the configuration. Returns `false` if it failed to load.
pub fn show_config(path: &std::path::Path, validate: bool, output: &Output) -> bool {
    let config = match AppConfig::load(path) {
        Ok(config) => config,
        Err(e) => {
            output.error(&e.to_string());
            if matches!(e, ConfigError::FileNotFound(_)) {
                output.hint("Run 'portcullis-server init' to create one");
            }
            return false;
        }
    };

    output.header(&format!("Configuration ({})", path.display()));
    output.kv("listen", &format!("{}:{}", config.server.host, config.server.port));
    output.kv("environment", &format!("{:?}", config.server.environment).to_lowercase());
    output.kv("log_level", &config.server.log_level);
    output.kv(
        "log_format",
        &format!("{:?}", config.server.effective_log_format()).to_lowercase(),
    );
    output.kv("jwt_secret", &format!("${} (set)", config.auth.jwt_secret_env));
    output.kv(
        "token_validity",
        &format!("{}s", config.auth.token_validity_secs),
    );
    output.kv(
        "min_password_length",
        &config.auth.min_password_length.to_string(),
    );
    output.kv(
        "database",
        &DatabaseProvider::from_config(&config.database).describe(),
    );
    output.kv(
        "rate_limit",
        &if config.rate_limit.enabled {
            format!(
                "{} req/min per {}",
                config.rate_limit.requests_per_minute,
                if config.rate_limit.trust_proxy_headers {
                    "forwarded IP"
                } else {
                    "peer IP"
                }
            )
        } else {
            "disabled".to_string()
        },
    );

    if validate {
        match config.validate_with_warnings() {
            Ok(warnings) if warnings.is_empty() => output.success("Configuration is valid"),
            Ok(warnings) => {
                for warning in warnings {
                    output.warning(&warning.to_string());
                }
            }
            Err(e) => {
                output.error(&e.to_string());
                return false;
            }
        }
    }

    true
}
