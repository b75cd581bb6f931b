//! Init command implementation
//!
//! Scaffolds `portcullis.toml`, `.env.example`, `.gitignore` and the `data/`
//! directory.

use super::output::Output;
use std::fs;
use std::path::{Path, PathBuf};

/// Result of the init operation
#[derive(Debug, PartialEq, Eq)]
pub enum InitResult {
    Success,
    /// `portcullis.toml` exists and `--force` was not given
    AlreadyExists,
    Error(String),
}

/// Configuration for the init command
pub struct InitConfig {
    /// Directory to initialize
    pub path: PathBuf,
    /// Overwrite existing files
    pub force: bool,
    pub host: String,
    pub port: u16,
}

/// Run the init command
pub fn run(config: InitConfig, output: &Output) -> InitResult {
    output.banner();
    output.header("Initializing Portcullis");

    let base_path = &config.path;

    let config_path = base_path.join("portcullis.toml");
    if config_path.exists() && !config.force {
        output.warning("portcullis.toml already exists!");
        output.hint("Use --force to overwrite existing files");
        return InitResult::AlreadyExists;
    }

    let data_dir = base_path.join("data");
    if data_dir.exists() {
        output.skipped("data", "already exists");
    } else if let Err(e) = fs::create_dir_all(&data_dir) {
        output.error(&format!("Failed to create data: {}", e));
        return InitResult::Error(e.to_string());
    } else {
        output.created("directory", "data");
    }

    let files = [
        ("config", "portcullis.toml", generate_config_toml(&config)),
        ("env", ".env.example", generate_env_example()),
    ];
    for (kind, name, content) in files {
        if let Err(e) = write_file(&base_path.join(name), &content, config.force) {
            output.error(&format!("Failed to create {}: {}", name, e));
            return InitResult::Error(e.to_string());
        }
        output.created(kind, name);
    }

    // Never clobber an existing .gitignore, even with --force.
    let gitignore_path = base_path.join(".gitignore");
    if gitignore_path.exists() {
        output.skipped(".gitignore", "already exists");
    } else if let Err(e) = write_file(&gitignore_path, &generate_gitignore(), false) {
        output.warning(&format!("Failed to create .gitignore: {}", e));
    } else {
        output.created("file", ".gitignore");
    }

    output.complete("Portcullis initialized successfully!");

    output.header("Next Steps");
    output.newline();
    output.info("1. Set the signing secret:");
    output.command("cp .env.example .env");
    output.command("# Edit .env and set JWT_SECRET_KEY (min 32 chars)");
    output.newline();
    output.info("2. Start the server:");
    output.command("portcullis-server");

    output.hint(&format!(
        "Server will be available at http://{}:{}",
        config.host, config.port
    ));

    InitResult::Success
}

fn write_file(path: &Path, content: &str, force: bool) -> std::io::Result<()> {
    if path.exists() && !force {
        return Ok(());
    }
    fs::write(path, content)
}

fn generate_config_toml(config: &InitConfig) -> String {
    format!(
        r#"# Portcullis configuration
# Secrets are never stored here: each *_env key names the environment
# variable that holds the value.

[server]
host = "{host}"
port = {port}
log_level = "info"
# log_format = "json"          # defaults to json in production
environment = "development"    # or "production"

[auth]
jwt_secret_env = "JWT_SECRET_KEY"
token_validity_secs = 86400
min_password_length = 6

[database]
url = "./data/portcullis.db"   # or ":memory:"
# turso_url_env = "TURSO_DATABASE_URL"
# turso_token_env = "TURSO_AUTH_TOKEN"

[rate_limit]
enabled = true
requests_per_minute = 100
# trust_proxy_headers = true   # only behind a proxy that sets X-Forwarded-For
"#,
        host = config.host,
        port = config.port
    )
}

fn generate_env_example() -> String {
    r#"# Portcullis Environment Variables
# Copy this file to .env and fill in the values.

# REQUIRED: JWT signing secret (minimum 32 characters in production)
# Generate with: openssl rand -base64 32
JWT_SECRET_KEY=change-me-in-production-use-at-least-32-characters

# Optional: Logging filter, overrides server.log_level
RUST_LOG=info,portcullis=debug

# Optional: Turso cloud database (enable the *_env keys in portcullis.toml)
# TURSO_DATABASE_URL=libsql://your-db.turso.io
# TURSO_AUTH_TOKEN=your-token
"#
    .to_string()
}

fn generate_gitignore() -> String {
    r#"/data/
*.db
*.db-journal

.env
.env.local

/target/
"#
    .to_string()
}
