use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path, path::PathBuf, time::Duration};

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5/weather";

/// Settings for the upstream weather provider (used by the proxy server).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 10,
        }
    }
}

impl ProviderConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Returns the API key, or an error telling the user how to set one.
    pub fn require_api_key(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| {
                anyhow!(
                    "No API key configured for the weather provider.\n\
                     Hint: run `weather configure` or set OPENWEATHER_API_KEY."
                )
            })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:8000".to_string(),
        }
    }
}

/// Settings for the console client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub server_url: String,
    pub city_list: PathBuf,
    pub timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:8000".to_string(),
            city_list: PathBuf::from("city.list.json"),
            timeout_secs: 15,
        }
    }
}

impl ClientConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// [provider]
/// api_key = "..."
///
/// [client]
/// city_list = "/data/city.list.json"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub provider: ProviderConfig,
    pub server: ServerConfig,
    pub client: ClientConfig,
}

impl Config {
    /// Load config from the platform location, or defaults if it doesn't exist yet.
    /// Environment overrides are applied on top.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        Self::load_with_env(path, |key| std::env::var(key).ok())
    }

    fn load_with_env(path: &Path, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut cfg = if path.exists() {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            Self::from_toml_str(&contents)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?
        } else {
            // First run: no config file, use defaults.
            Self::default()
        };

        cfg.apply_env(lookup);
        Ok(cfg)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Override file values from the environment.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(key) = lookup("OPENWEATHER_API_KEY") {
            self.provider.api_key = Some(key);
        }
        if let Some(url) = lookup("WEATHER_BASE_URL") {
            self.provider.base_url = url;
        }
        if let Some(bind) = lookup("WEATHER_SERVER_BIND") {
            self.server.bind = bind;
        }
        if let Some(url) = lookup("WEATHER_SERVER_URL") {
            self.client.server_url = url;
        }
    }

    /// Save config to the platform location.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_file_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    /// Save config to `path`, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weather-map", "weather")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn empty_file_yields_defaults() {
        let cfg = Config::from_toml_str("").unwrap();

        assert_eq!(cfg.provider.base_url, DEFAULT_BASE_URL);
        assert_eq!(cfg.provider.timeout(), Duration::from_secs(10));
        assert_eq!(cfg.server.bind, "127.0.0.1:8000");
        assert_eq!(cfg.client.server_url, "http://127.0.0.1:8000");
        assert!(cfg.provider.api_key.is_none());
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let cfg = Config::from_toml_str(
            r#"
            [provider]
            api_key = "KEY"
            timeout_secs = 3

            [client]
            city_list = "/data/city.list.json"
            "#,
        )
        .unwrap();

        assert_eq!(cfg.provider.require_api_key().unwrap(), "KEY");
        assert_eq!(cfg.provider.timeout(), Duration::from_secs(3));
        assert_eq!(cfg.provider.base_url, DEFAULT_BASE_URL);
        assert_eq!(cfg.client.city_list, PathBuf::from("/data/city.list.json"));
        assert_eq!(cfg.client.timeout_secs, 15);
    }

    #[test]
    fn missing_api_key_error_has_hint() {
        let cfg = Config::default();
        let err = cfg.provider.require_api_key().unwrap_err();

        let msg = err.to_string();
        assert!(msg.contains("No API key configured"));
        assert!(msg.contains("Hint: run `weather configure`"));
    }

    #[test]
    fn blank_api_key_counts_as_missing() {
        let mut cfg = Config::default();
        cfg.provider.api_key = Some("   ".into());
        assert!(cfg.provider.require_api_key().is_err());
    }

    #[test]
    fn env_overrides_file_values() {
        let mut cfg = Config::from_toml_str("[provider]\napi_key = \"FILE_KEY\"\n").unwrap();
        let env: HashMap<&str, &str> = HashMap::from([
            ("OPENWEATHER_API_KEY", "ENV_KEY"),
            ("WEATHER_SERVER_URL", "http://weather.local:9000"),
        ]);

        cfg.apply_env(|k| env.get(k).map(|v| v.to_string()));

        assert_eq!(cfg.provider.api_key.as_deref(), Some("ENV_KEY"));
        assert_eq!(cfg.client.server_url, "http://weather.local:9000");
        assert_eq!(cfg.server.bind, "127.0.0.1:8000");
    }

    #[test]
    fn unknown_type_is_a_parse_error() {
        let err = Config::from_toml_str("[provider]\ntimeout_secs = \"soon\"\n").unwrap_err();
        assert!(err.to_string().contains("soon"));
    }

    fn scratch_path(test: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("weather-config-{test}-{}", std::process::id()))
            .join("config.toml")
    }

    #[test]
    fn load_from_missing_file_yields_defaults() {
        let path = scratch_path("missing");
        assert!(!path.exists());

        let cfg = Config::load_with_env(&path, |_| None).unwrap();
        assert_eq!(cfg.provider.base_url, DEFAULT_BASE_URL);
        assert_eq!(cfg.server.bind, "127.0.0.1:8000");
        assert!(cfg.provider.api_key.is_none());

        let cfg = Config::load_from(&path).unwrap();
        assert_eq!(cfg.client.city_list, PathBuf::from("city.list.json"));
        assert_eq!(cfg.client.timeout_secs, 15);
    }

    #[test]
    fn load_from_reads_file_then_applies_env() {
        let path = scratch_path("env");
        let mut saved = Config::default();
        saved.provider.api_key = Some("FILE_KEY".into());
        saved.server.bind = "0.0.0.0:9000".into();
        saved.client.city_list = PathBuf::from("/data/city.list.json");
        saved.save_to(&path).unwrap();

        let cfg = Config::load_with_env(&path, |k| {
            (k == "OPENWEATHER_API_KEY").then(|| "ENV_KEY".to_string())
        })
        .unwrap();
        assert_eq!(cfg.provider.api_key.as_deref(), Some("ENV_KEY"));
        assert_eq!(cfg.server.bind, "0.0.0.0:9000");

        let cfg = Config::load_from(&path).unwrap();
        assert_eq!(cfg.client.city_list, PathBuf::from("/data/city.list.json"));

        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn load_from_corrupt_file_names_the_path() {
        let path = scratch_path("corrupt");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "[provider\napi_key = ").unwrap();

        let err = Config::load_with_env(&path, |_| None).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
        assert!(err.to_string().contains("config.toml"));

        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn save_then_load_from_path() {
        let dir = std::env::temp_dir().join(format!("weather-config-test-{}", std::process::id()));
        let path = dir.join("nested").join("config.toml");

        let mut cfg = Config::default();
        cfg.provider.api_key = Some("SAVED".into());
        cfg.client.server_url = "http://10.0.0.2:8000".into();
        cfg.save_to(&path).unwrap();

        let loaded = Config::load_with_env(&path, |_| None).unwrap();
        assert_eq!(loaded.provider.api_key.as_deref(), Some("SAVED"));
        assert_eq!(loaded.client.server_url, "http://10.0.0.2:8000");

        let _ = fs::remove_dir_all(&dir);
    }
}
