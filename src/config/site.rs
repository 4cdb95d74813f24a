//! Site configuration (blogdesk.yml)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::content::Category;

/// Name of the configuration file in the base directory
pub const CONFIG_FILE: &str = "blogdesk.yml";

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub subtitle: String,
    pub description: String,
    pub author: String,
    pub language: String,
    pub timezone: String,

    // URL
    pub url: String,
    pub root: String,

    // Display
    pub date_format: String,
    pub per_page: usize,

    // Writing
    pub default_category: Category,

    // Storage
    pub data_dir: String,
    pub storage_key: String,
    #[serde(default)]
    pub remote: RemoteConfig,

    // Services
    #[serde(default)]
    pub assistant: AssistantConfig,
    #[serde(default)]
    pub server: ServerConfig,

    // Store any additional fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "My Blog".to_string(),
            subtitle: String::new(),
            description: String::new(),
            author: "John Doe".to_string(),
            language: "en".to_string(),
            timezone: String::new(),

            url: "http://localhost:4000".to_string(),
            root: "/".to_string(),

            date_format: "MMM D, YYYY".to_string(),
            per_page: 10,

            default_category: Category::Lifestyle,

            data_dir: "data".to_string(),
            storage_key: "blog-posts".to_string(),
            remote: RemoteConfig::default(),

            assistant: AssistantConfig::default(),
            server: ServerConfig::default(),
            extra: HashMap::new(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: SiteConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Load `blogdesk.yml` from `base_dir` if present, then apply environment overrides
    pub fn load_dir<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let path = base_dir.as_ref().join(CONFIG_FILE);
        let mut config = if path.exists() {
            let config = Self::load(&path)?;
            tracing::debug!("Loaded config from {:?}", path);
            config
        } else {
            tracing::debug!("No {} found, using defaults", CONFIG_FILE);
            Self::default()
        };

        config.apply_env(|key| env::var(key).ok());
        Ok(config)
    }

    /// Override credentials from the environment
    ///
    /// `lookup` is `std::env::var` outside of tests.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = non_empty("BLOGDESK_REMOTE_URL") {
            self.remote.url = Some(url);
        }
        if let Some(key) = non_empty("BLOGDESK_REMOTE_KEY") {
            self.remote.api_key = Some(key);
        }
        if let Some(key) = non_empty("BLOGDESK_ASSISTANT_KEY") {
            self.assistant.api_key = Some(key);
        }
    }
}

/// Hosted record store
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    pub url: Option<String>,
    pub api_key: Option<String>,
    pub timeout_secs: u64,
    pub retries: u32,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            url: None,
            api_key: None,
            timeout_secs: 5,
            retries: 1,
        }
    }
}

impl RemoteConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }

    /// Retries after a failed call, clamped to 0..=1
    pub fn retries(&self) -> u32 {
        self.retries.min(1)
    }
}

/// Text-completion service used by the writing assistant
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistantConfig {
    pub api_key: Option<String>,
    pub endpoint: String,
    pub model: String,
    pub timeout_secs: u64,
    pub temperature: f32,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: "https://api.openai.com/v1/chat/completions".to_string(),
            model: "gpt-4o-mini".to_string(),
            timeout_secs: 30,
            temperature: 0.7,
        }
    }
}

impl AssistantConfig {
    pub fn enabled(&self) -> bool {
        self.api_key
            .as_deref()
            .map(|k| !k.trim().is_empty())
            .unwrap_or(false)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub ip: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            ip: "127.0.0.1".to_string(),
            port: 4000,
        }
    }
}
