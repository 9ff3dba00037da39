//! Settings for the terminal host.
//!
//! Settings live in `settings.toml` in the platform config folder unless
//! `--config` names another file:
//! - macOS: ~/Library/Application Support/org.mission.Mission/
//! - Windows: %APPDATA%/mission/Mission/config/
//! - Linux: ~/.config/mission/
//!
//! A missing or unreadable file yields the defaults.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use mission_core::{DEFAULT_PULSE_DURATION, NavigationPolicy};
use mission_preview::{DEFAULT_TIMEOUT, DEFAULT_USER_AGENT, PreviewConfig};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

const APP_QUALIFIER: &str = "org";
const APP_ORG: &str = "mission";
const APP_NAME: &str = "Mission";
const CONFIG_FILENAME: &str = "settings.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub preview: PreviewSettings,
    pub pulse: PulseSettings,
    pub navigation: NavigationSettings,
    pub session: SessionSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewSettings {
    pub timeout_ms: u64,
    pub user_agent: String,
    /// Deployed preview endpoint. Resolved in-process when unset.
    pub endpoint: Option<String>,
}

impl Default for PreviewSettings {
    fn default() -> Self {
        Self {
            timeout_ms: duration_ms(DEFAULT_TIMEOUT),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            endpoint: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PulseSettings {
    pub duration_ms: u64,
}

impl Default for PulseSettings {
    fn default() -> Self {
        Self {
            duration_ms: duration_ms(DEFAULT_PULSE_DURATION),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigationSettings {
    pub allow_retreat: bool,
}

impl Default for NavigationSettings {
    fn default() -> Self {
        Self {
            allow_retreat: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSettings {
    /// Session file keeping intro positions between runs.
    pub path: Option<PathBuf>,
}

fn duration_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

impl Settings {
    pub fn preview_config(&self) -> PreviewConfig {
        PreviewConfig {
            timeout: Duration::from_millis(self.preview.timeout_ms),
            user_agent: self.preview.user_agent.clone(),
        }
    }

    pub fn pulse_duration(&self) -> Duration {
        Duration::from_millis(self.pulse.duration_ms)
    }

    pub fn navigation_policy(&self) -> NavigationPolicy {
        NavigationPolicy {
            allow_retreat: self.navigation.allow_retreat,
        }
    }
}

/// Get the path to the default settings file.
///
/// Returns `None` if the platform-specific directory cannot be determined.
pub fn settings_path() -> Option<PathBuf> {
    ProjectDirs::from(APP_QUALIFIER, APP_ORG, APP_NAME)
        .map(|dirs| dirs.config_dir().join(CONFIG_FILENAME))
}

/// Load settings from `explicit`, or from the default location.
pub fn load_settings(explicit: Option<&Path>) -> Settings {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => {
            let Some(path) = settings_path() else {
                warn!("Could not determine settings path, using defaults");
                return Settings::default();
            };
            path
        }
    };
    load_settings_from(&path)
}

pub fn load_settings_from(path: &Path) -> Settings {
    match fs::read_to_string(path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(settings) => {
                info!(path = %path.display(), "loaded settings");
                settings
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to parse settings file, using defaults");
                Settings::default()
            }
        },
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            info!(path = %path.display(), "no settings file found, using defaults");
            Settings::default()
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "failed to read settings file, using defaults");
            Settings::default()
        }
    }
}
