use crate::core::models::{DataPath, validate_base_url};
use crate::core::poller::DEFAULT_POLL_INTERVAL;
use log::info;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub base_url: String,
    #[serde(default)]
    pub csrf_token: String,
    #[serde(default)]
    pub default_warehouse: Option<String>,
    #[serde(default)]
    pub poll_interval_ms: Option<u64>,
}

impl Config {
    pub fn poll_interval_ms(&self) -> u64 {
        self.poll_interval_ms
            .unwrap_or(DEFAULT_POLL_INTERVAL.as_millis() as u64)
    }
}

pub struct ConfigService;

impl ConfigService {
    pub fn load_config(data_path: &DataPath) -> io::Result<Config> {
        let config_path = data_path.config_path();
        if !config_path.exists() {
            let config = Config::default();
            let toml = toml::to_string(&config).map_err(|e| {
                io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("Failed to serialize config: {e}"),
                )
            })?;
            let config_dir = config_path.parent().ok_or_else(|| {
                io::Error::new(io::ErrorKind::InvalidInput, "Config path has no parent")
            })?;
            fs::create_dir_all(config_dir)?;
            fs::write(&config_path, toml)?;
            return Ok(config);
        }

        let content = fs::read_to_string(&config_path)?;
        let config: Config = toml::from_str(&content).map_err(|e| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("Invalid config format: {e}"),
            )
        })?;
        Ok(config)
    }

    pub fn save_config(config: &Config, data_path: &DataPath) -> io::Result<()> {
        let config_path = data_path.config_path();
        let toml = toml::to_string(config).map_err(|e| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("Failed to serialize config: {e}"),
            )
        })?;
        fs::write(&config_path, toml)?;
        info!("Saved configuration to {}", config_path.display());
        Ok(())
    }

    pub fn get_value(config: &Config, key: &str) -> io::Result<String> {
        match key {
            "base_url" => Ok(config.base_url.clone()),
            "csrf_token" => Ok(config.csrf_token.clone()),
            "default_warehouse" => Ok(config.default_warehouse.clone().unwrap_or_default()),
            "poll_interval_ms" => Ok(config.poll_interval_ms().to_string()),
            _ => Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("Unknown key: {key}"),
            )),
        }
    }

    pub fn set_value(config: &mut Config, key: &str, value: &str) -> io::Result<()> {
        match key {
            "base_url" => {
                validate_base_url(value)?;
                config.base_url = value.trim_end_matches('/').to_string();
            }
            "csrf_token" => {
                config.csrf_token = value.to_string();
            }
            "default_warehouse" => {
                config.default_warehouse = if value.is_empty() {
                    None
                } else {
                    Some(value.to_string())
                };
            }
            "poll_interval_ms" => {
                let millis: u64 = value.parse().map_err(|e| {
                    io::Error::new(
                        io::ErrorKind::InvalidInput,
                        format!("Invalid poll interval: {e}"),
                    )
                })?;
                if millis == 0 {
                    return Err(io::Error::new(
                        io::ErrorKind::InvalidInput,
                        "Poll interval must be at least 1 ms",
                    ));
                }
                config.poll_interval_ms = Some(millis);
            }
            _ => {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("Unknown key: {key}"),
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn data_path(dir: &TempDir) -> DataPath {
        DataPath::new(Some(dir.path().to_path_buf())).unwrap()
    }

    #[test]
    fn load_creates_default_config_file() {
        let dir = TempDir::new().unwrap();
        let path = data_path(&dir);

        let config = ConfigService::load_config(&path).unwrap();
        assert!(config.base_url.is_empty());
        assert!(path.config_path().exists());
    }

    #[test]
    fn set_and_save_round_trips() {
        let dir = TempDir::new().unwrap();
        let path = data_path(&dir);

        let mut config = ConfigService::load_config(&path).unwrap();
        ConfigService::set_value(&mut config, "base_url", "https://auctions.example.com/").unwrap();
        ConfigService::set_value(&mut config, "csrf_token", "tok123").unwrap();
        ConfigService::set_value(&mut config, "poll_interval_ms", "500").unwrap();
        ConfigService::save_config(&config, &path).unwrap();

        let reloaded = ConfigService::load_config(&path).unwrap();
        // Trailing slash is stripped so endpoint paths can be appended.
        assert_eq!(reloaded.base_url, "https://auctions.example.com");
        assert_eq!(reloaded.csrf_token, "tok123");
        assert_eq!(reloaded.poll_interval_ms(), 500);
    }

    #[test]
    fn rejects_invalid_values() {
        let mut config = Config::default();
        assert!(ConfigService::set_value(&mut config, "base_url", "not a url").is_err());
        assert!(ConfigService::set_value(&mut config, "poll_interval_ms", "0").is_err());
        assert!(ConfigService::set_value(&mut config, "poll_interval_ms", "soon").is_err());
        assert!(ConfigService::set_value(&mut config, "no_such_key", "x").is_err());
    }

    #[test]
    fn poll_interval_defaults_to_two_seconds() {
        let config = Config::default();
        assert_eq!(config.poll_interval_ms(), 2000);
    }
}
