use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

pub const DEFAULT_SERVER_URL: &str = "http://localhost:5000";

/// Persisted CLI preferences (`cli.json` in the config directory).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CliConfig {
    /// Server used when neither `--server` nor `LANDING_API_URL` is given.
    pub server: Option<String>,
    /// Email of the last successful login, shown by `auth status`.
    pub last_login: Option<String>,
}

pub fn get_config_dir() -> anyhow::Result<PathBuf> {
    let config_dir = if let Ok(custom_dir) = std::env::var("LANDING_CLI_CONFIG_DIR") {
        PathBuf::from(custom_dir)
    } else {
        let home = std::env::var("HOME").map_err(|_| anyhow::anyhow!("HOME environment variable not set"))?;
        PathBuf::from(home).join(".config").join("landing").join("cli")
    };

    if !config_dir.exists() {
        fs::create_dir_all(&config_dir)?;
    }

    Ok(config_dir)
}

pub fn load_cli_config() -> anyhow::Result<CliConfig> {
    let config_file = get_config_dir()?.join("cli.json");

    if !config_file.exists() {
        return Ok(CliConfig::default());
    }

    let content = fs::read_to_string(config_file)?;
    let config: CliConfig = serde_json::from_str(&content)?;
    Ok(config)
}

pub fn save_cli_config(config: &CliConfig) -> anyhow::Result<()> {
    let config_file = get_config_dir()?.join("cli.json");

    let content = serde_json::to_string_pretty(config)?;
    fs::write(config_file, content)?;
    Ok(())
}

/// `--server` / `LANDING_API_URL`, then the saved server, then localhost.
pub fn resolve_server(flag: Option<String>) -> anyhow::Result<String> {
    if let Some(server) = flag.filter(|s| !s.trim().is_empty()) {
        return Ok(server);
    }
    Ok(load_cli_config()?
        .server
        .unwrap_or_else(|| DEFAULT_SERVER_URL.to_string()))
}
