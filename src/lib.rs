//! blogdesk: a personal blog and content desk
//!
//! Posts are written in a small markdown subset and kept in a hosted record
//! store, with a local JSON snapshot for when the store is out of reach. The
//! crate serves the public blog, exposes an admin API, and can draft social
//! posts through an optional writing assistant.

pub mod assistant;
pub mod commands;
pub mod config;
pub mod content;
pub mod helpers;
pub mod server;
pub mod store;
pub mod templates;

use anyhow::Result;
use std::path::{Path, PathBuf};

/// The main blogdesk application
#[derive(Clone)]
pub struct Blogdesk {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Snapshot directory
    pub data_dir: PathBuf,
}

impl Blogdesk {
    /// Create a new instance from a directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config = config::SiteConfig::load_dir(&base_dir)?;
        let data_dir = base_dir.join(&config.data_dir);

        Ok(Self {
            config,
            base_dir,
            data_dir,
        })
    }

    /// Open the content store
    pub async fn open_store(&self) -> Result<store::ContentStore> {
        Ok(store::ContentStore::open(&self.config, &self.base_dir).await?)
    }

    /// Writing assistant, disabled without an API key
    pub fn assistant(&self) -> assistant::Assistant {
        assistant::Assistant::from_config(&self.config.assistant)
    }

    /// Helpers bound to this site
    pub fn helpers(&self) -> helpers::Helpers {
        helpers::Helpers::new(self.config.clone())
    }

    /// Delete local snapshots
    pub fn clean(&self) -> Result<()> {
        commands::clean::run(self)
    }

    /// Import markdown files as posts
    pub async fn import(&self, dir: &Path) -> Result<()> {
        commands::import::run(self, dir).await
    }
}
