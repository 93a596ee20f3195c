//! Client config load/save for `~/.rasa-chat/config.yaml`.
//! Two sections: `server` (where to post) and `chat` (how to render).

use std::path::{Path, PathBuf};

use crate::client::DEFAULT_WEBHOOK_URL;
use crate::messages::DEFAULT_SENDER;
use crate::widget::Notices;

/// Server section (webhook url).
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ServerSection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Chat section (sender id, sanitising, notices).
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ChatSection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sender: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sanitize: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notify_network_failure: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notify_no_reply: Option<bool>,
}

/// Full config file.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerSection,
    #[serde(default)]
    pub chat: ChatSection,
}

impl Config {
    /// This config with every unset field filled in from the defaults.
    pub fn resolved(&self) -> Self {
        let notices = self.notices();
        Config {
            server: ServerSection {
                url: Some(self.webhook_url().into()),
            },
            chat: ChatSection {
                sender: Some(self.sender().into()),
                sanitize: Some(self.sanitize()),
                notify_network_failure: Some(notices.network_failure),
                notify_no_reply: Some(notices.no_reply),
            },
        }
    }

    pub fn webhook_url(&self) -> &str {
        self.server.url.as_deref().unwrap_or(DEFAULT_WEBHOOK_URL)
    }

    pub fn sender(&self) -> &str {
        self.chat.sender.as_deref().unwrap_or(DEFAULT_SENDER)
    }

    pub fn sanitize(&self) -> bool {
        self.chat.sanitize.unwrap_or(true)
    }

    pub fn notices(&self) -> Notices {
        let defaults = Notices::default();
        Notices {
            network_failure: self
                .chat
                .notify_network_failure
                .unwrap_or(defaults.network_failure),
            no_reply: self.chat.notify_no_reply.unwrap_or(defaults.no_reply),
        }
    }
}

/// Returns the default config file path: `~/.rasa-chat/config.yaml` (platform-specific).
pub fn default_config_path() -> Option<PathBuf> {
    let home = home_dir()?;
    Some(home.join(".rasa-chat").join("config.yaml"))
}

#[cfg(unix)]
fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME").map(PathBuf::from)
}

#[cfg(windows)]
fn home_dir() -> Option<PathBuf> {
    std::env::var_os("USERPROFILE").map(PathBuf::from)
}

#[cfg(not(any(unix, windows)))]
fn home_dir() -> Option<PathBuf> {
    None
}

/// Load config from a YAML file. An empty file yields the default config.
pub fn load(path: &Path) -> Result<Config, ConfigError> {
    let contents = std::fs::read_to_string(path)?;
    if contents.trim().is_empty() {
        return Ok(Config::default());
    }
    Ok(serde_yaml::from_str(&contents)?)
}

/// Save config to a YAML file. Creates parent directory if missing.
pub fn save(path: &Path, config: &Config) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let contents = serde_yaml::to_string(config)?;
    std::fs::write(path, contents)?;
    Ok(())
}

/// Config load/save error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config: {0}")]
    Parse(#[from] serde_yaml::Error),
}
