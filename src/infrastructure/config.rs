use crate::domain::layout::PageDefinition;
use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_CONFIG_PATH: &str = "config/dashboard";
const ENV_PREFIX: &str = "DASHLETS";

#[derive(Debug, Deserialize, Clone)]
pub struct DashboardConfig {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub ticker: TickerSettings,
    #[serde(default)]
    pub preferences: PreferenceSettings,
    #[serde(default = "default_pages")]
    pub pages: Vec<PageDefinition>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self { bind: default_bind() }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct TickerSettings {
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
}

impl Default for TickerSettings {
    fn default() -> Self {
        Self {
            interval_ms: default_interval_ms(),
        }
    }
}

impl TickerSettings {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms.max(1))
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct PreferenceSettings {
    #[serde(default = "default_preferences_path")]
    pub path: String,
}

impl Default for PreferenceSettings {
    fn default() -> Self {
        Self {
            path: default_preferences_path(),
        }
    }
}

fn default_bind() -> String {
    "0.0.0.0:9123".to_string()
}

fn default_interval_ms() -> u64 {
    1000
}

fn default_preferences_path() -> String {
    "data/preferences.toml".to_string()
}

fn default_pages() -> Vec<PageDefinition> {
    vec![PageDefinition::dashboard()]
}

impl DashboardConfig {
    /// Anchor shown at startup: the first configured page.
    pub fn landing_anchor(&self) -> Option<&str> {
        self.pages.first().map(|p| p.anchor.as_str())
    }
}

/// Load `<path>.toml` (optional) with `DASHLETS__SECTION__KEY` overrides.
pub fn load_dashboard_config(path: &str) -> anyhow::Result<DashboardConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name(path).required(false))
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    Ok(settings.try_deserialize()?)
}
