use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://gateway.marvel.com";
pub const DEFAULT_PAGE_SIZE: u32 = 10;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub public_key_env: Option<String>,
    pub private_key_env: Option<String>,
    pub public_key_command: Option<String>,
    pub private_key_command: Option<String>,
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            public_key_env: Some("MARVEL_PUBLIC_KEY".to_string()),
            private_key_env: Some("MARVEL_PRIVATE_KEY".to_string()),
            public_key_command: None,
            private_key_command: None,
            timeout_secs: 30,
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ListConfig {
    pub page_size: u32,
}

impl Default for ListConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub list: ListConfig,
}

fn config_path() -> Option<PathBuf> {
    let config_dir = dirs::config_dir()?;
    Some(config_dir.join("heroes").join("config.toml"))
}

impl Config {
    pub fn load() -> Self {
        let Some(path) = config_path() else {
            return Config::default();
        };

        let Ok(content) = std::fs::read_to_string(&path) else {
            return Config::default();
        };

        match Self::parse(&content) {
            Some(config) => config,
            None => {
                tracing::warn!(path = %path.display(), "ignoring invalid config file");
                Config::default()
            }
        }
    }

    /// Parse a config document. A zero page size is treated as invalid.
    fn parse(content: &str) -> Option<Self> {
        let config = toml::from_str::<Config>(content).ok()?;
        if config.list.page_size == 0 {
            return None;
        }
        Some(config)
    }

    pub fn base_url(&self) -> &str {
        self.api.base_url.trim_end_matches('/')
    }
}
