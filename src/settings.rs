use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use crate::comments::session::DEFAULT_BATCH_SIZE;
use crate::comments::viewport::DEFAULT_LOAD_MORE_THRESHOLD;
use crate::theme::ThemeOverrides;

const APP_SENTINEL: &str = "hn-term";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(rename = "_app")]
    pub app: String,

    #[serde(default = "default_true")]
    pub show_help_text: bool,

    #[serde(default)]
    pub comments: CommentSettings,

    #[serde(default)]
    pub stories: StorySettings,

    #[serde(default)]
    pub keys: KeySettings,

    #[serde(default)]
    pub theme: ThemeOverrides,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommentSettings {
    /// Root-level comments fetched per batch.
    pub batch_size: usize,
    /// Entries from the end of the list at which the next batch is requested.
    pub load_more_threshold: usize,
}

impl Default for CommentSettings {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            load_more_threshold: DEFAULT_LOAD_MORE_THRESHOLD,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorySettings {
    pub initial_count: usize,
    pub batch_size: usize,
}

impl Default for StorySettings {
    fn default() -> Self {
        Self {
            initial_count: 30,
            batch_size: 15,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeySettings {
    /// How long `Space` waits for the modal key.
    pub modal_timeout_ms: u64,
}

impl Default for KeySettings {
    fn default() -> Self {
        Self {
            modal_timeout_ms: 2000,
        }
    }
}

const fn default_true() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            app: APP_SENTINEL.to_string(),
            show_help_text: true,
            comments: CommentSettings::default(),
            stories: StorySettings::default(),
            keys: KeySettings::default(),
            theme: ThemeOverrides::default(),
        }
    }
}

impl Settings {
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings from {}", path.display()))?;

        let settings: Settings = toml::from_str(&content)
            .with_context(|| format!("Failed to parse settings from {}", path.display()))?;

        settings.validate()?;
        Ok(settings)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let content =
            toml::to_string_pretty(self).with_context(|| "Failed to serialize settings")?;

        fs::write(path, content)
            .with_context(|| format!("Failed to write settings to {}", path.display()))?;

        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.app != APP_SENTINEL {
            bail!(
                "Settings file appears to belong to another application (expected _app = '{}', found '{}')",
                APP_SENTINEL,
                self.app
            );
        }
        if self.comments.batch_size == 0 || self.stories.batch_size == 0 {
            bail!("batch_size must be at least 1");
        }
        Ok(())
    }
}

pub fn config_dir(custom: Option<&PathBuf>) -> Option<PathBuf> {
    custom
        .cloned()
        .or_else(|| dirs::home_dir().map(|p| p.join(".config").join("hn-term")))
}

pub fn settings_path(config_dir: &Path) -> PathBuf {
    config_dir.join("settings.toml")
}

pub fn logs_dir(config_dir: &Path) -> PathBuf {
    config_dir.join("logs")
}

pub fn db_path(config_dir: &Path) -> PathBuf {
    config_dir.join("data.db")
}
