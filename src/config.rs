use crate::app::ViewMode;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PanelConfig {
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub features: FeatureFlags,
    #[serde(default)]
    pub watch: WatchConfig,
}

/// [display] section configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// View mode the panel opens in
    #[serde(default)]
    pub default_view: ViewMode,
    /// chrono format string for timestamps older than a week
    #[serde(default = "default_date_format")]
    pub date_format: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeatureFlags {
    /// Show the alternate "export for Copilot" button
    #[serde(default)]
    pub copilot_export: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchConfig {
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

fn default_date_format() -> String {
    "%-m/%-d/%Y".to_string()
}

fn default_debounce_ms() -> u64 {
    300
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            default_view: ViewMode::default(),
            date_format: default_date_format(),
        }
    }
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
        }
    }
}

pub const LOCAL_CONFIG_FILE: &str = ".annopanel.toml";

fn global_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("annopanel/config.toml"))
}

/// Load config by merging global defaults with local overrides.
/// Priority: `<dir>/.annopanel.toml` > `~/.config/annopanel/config.toml` > built-in defaults.
pub fn load_config(dir: &Path) -> PanelConfig {
    load_config_from(global_config_path().as_deref(), &dir.join(LOCAL_CONFIG_FILE))
}

/// Merging is deep: individual fields within a section override independently.
/// Unreadable or unparsable files are treated as absent.
pub fn load_config_from(global: Option<&Path>, local: &Path) -> PanelConfig {
    let global_table = global.and_then(read_table);
    let local_table = read_table(local);

    let merged = match (global_table, local_table) {
        (Some(mut global), Some(local)) => {
            deep_merge(&mut global, local);
            toml::Value::Table(global)
        }
        (Some(global), None) => toml::Value::Table(global),
        (None, Some(local)) => toml::Value::Table(local),
        (None, None) => return PanelConfig::default(),
    };

    merged.try_into().unwrap_or_else(|err| {
        tracing::warn!(%err, "invalid panel config, using defaults");
        PanelConfig::default()
    })
}

fn read_table(path: &Path) -> Option<toml::map::Map<String, toml::Value>> {
    let content = std::fs::read_to_string(path).ok()?;
    match content.parse::<toml::Value>() {
        Ok(toml::Value::Table(t)) => Some(t),
        Ok(_) => None,
        Err(err) => {
            tracing::warn!(path = %path.display(), %err, "skipping unparsable config file");
            None
        }
    }
}

/// Recursively merge `overlay` into `base`. Overlay values win; nested tables are merged recursively.
fn deep_merge(
    base: &mut toml::map::Map<String, toml::Value>,
    overlay: toml::map::Map<String, toml::Value>,
) {
    for (key, value) in overlay {
        match (base.get_mut(&key), &value) {
            (Some(toml::Value::Table(base_table)), toml::Value::Table(overlay_table)) => {
                deep_merge(base_table, overlay_table.clone());
            }
            _ => {
                base.insert(key, value);
            }
        }
    }
}
