use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// The original deployment proxies `/api/*` to this origin; without the
/// proxy we talk to it directly.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8991";

pub const DEFAULT_DEBOUNCE_MS: u64 = 500;

#[derive(Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Backend origin; `None` until the setup wizard has run.
    pub api_base_url: Option<String>,
    /// Quiet period before a typed query is committed to a search.
    pub debounce_ms: u64,
    /// Whether committing an empty query clears the visible results.
    /// The original client left stale results on screen.
    pub clear_results_on_empty_query: bool,
    /// Where exported GIFs land; defaults to the user's download directory.
    pub gif_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: None,
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            clear_results_on_empty_query: false,
            gif_dir: None,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, Box<dyn std::error::Error>> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(&config_path)?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }

    pub fn save(&self) -> Result<(), Box<dyn std::error::Error>> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(self)?;
        fs::write(&config_path, json)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf, Box<dyn std::error::Error>> {
        let dirs = directories::ProjectDirs::from("", "", "cliptui")
            .ok_or("Could not determine config directory")?;
        Ok(dirs.config_dir().join("config.json"))
    }

    pub fn needs_setup(&self) -> bool {
        self.api_base_url.is_none()
    }
}
