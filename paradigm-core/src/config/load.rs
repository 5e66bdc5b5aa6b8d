use std::env;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use lazy_static::lazy_static;

use super::{Config, ConfigLayer};

#[derive(Copy, Clone)]
enum FileFormat {
    Json,
    Toml,
}

lazy_static! {
    static ref CONFIG: RwLock<Config> = RwLock::new(Config::default());
}

pub fn get_config() -> Config {
    CONFIG.read().unwrap().clone()
}

pub fn set_config(config: Config) {
    *CONFIG.write().unwrap() = config;
}

pub fn base_config_dir() -> PathBuf {
    if let Ok(xdg) = env::var("XDG_CONFIG_HOME")
        && !xdg.is_empty()
    {
        return PathBuf::from(xdg).join("paradigm");
    }

    let home = env::var("HOME").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join(".config").join("paradigm")
}

pub fn global_config_path() -> PathBuf {
    base_config_dir().join("config.toml")
}

/// Config file named by `PARADIGM_CONFIG`, when set and non-empty.
pub fn env_config_path() -> Option<PathBuf> {
    match env::var("PARADIGM_CONFIG") {
        Ok(path) if !path.is_empty() => Some(PathBuf::from(path)),
        _ => None,
    }
}

fn parse_layer(raw: &str, format: FileFormat) -> Result<ConfigLayer, Box<dyn std::error::Error>> {
    match format {
        FileFormat::Toml => Ok(toml::from_str(raw)?),
        FileFormat::Json => Ok(serde_json::from_str(raw)?),
    }
}

/// Parse one config file, picking the format from the extension (anything
/// that is not `.json` is treated as TOML).
pub fn load_layer_from_path(path: &Path) -> Result<ConfigLayer, Box<dyn std::error::Error>> {
    let format = match path.extension().and_then(|e| e.to_str()) {
        Some("json") => FileFormat::Json,
        _ => FileFormat::Toml,
    };

    let raw = std::fs::read_to_string(path)?;
    parse_layer(&raw, format)
}

fn env_string(key: &str) -> Option<String> {
    match env::var(key) {
        Ok(value) if !value.is_empty() => Some(value),
        _ => None,
    }
}

fn env_parsed<T: std::str::FromStr>(key: &str) -> Result<Option<T>, Box<dyn std::error::Error>> {
    match env_string(key) {
        None => Ok(None),
        Some(raw) => raw.parse().map(Some).map_err(|_| {
            Box::new(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("invalid value for {key}: `{raw}`"),
            )) as Box<dyn std::error::Error>
        }),
    }
}

fn env_layer() -> Result<ConfigLayer, Box<dyn std::error::Error>> {
    Ok(ConfigLayer {
        gateway_url: env_string("PARADIGM_GATEWAY_URL"),
        window_radius: env_parsed("PARADIGM_WINDOW_RADIUS")?,
        quiet_period_ms: env_parsed("PARADIGM_QUIET_PERIOD_MS")?,
        bind_addr: env_string("PARADIGM_BIND_ADDR"),
        upstream_model: env_string("PARADIGM_UPSTREAM_MODEL"),
        upstream_search_model: env_string("PARADIGM_UPSTREAM_SEARCH_MODEL"),
    })
}

/// Fold the configuration layers onto the defaults: global file, then the
/// `PARADIGM_CONFIG` file, then per-key environment overrides.
pub fn load_config() -> Result<Config, Box<dyn std::error::Error>> {
    let mut config = Config::default();

    let global = global_config_path();
    if global.exists() {
        config.apply_layer(&load_layer_from_path(&global)?);
    }

    if let Some(path) = env_config_path() {
        config.apply_layer(&load_layer_from_path(&path)?);
    }

    config.apply_layer(&env_layer()?);
    Ok(config)
}
