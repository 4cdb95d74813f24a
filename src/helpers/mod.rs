//! Helper functions for templates and presentation
//!
//! URL generation, date display, and HTML output of rendered content.

mod date;
mod html;
mod list;
mod url;

pub use date::*;
pub use html::*;
pub use list::*;
pub use url::*;

use chrono::{DateTime, Utc};

use crate::config::SiteConfig;

/// Collection of helper functions bound to a site configuration
#[derive(Clone)]
pub struct Helpers {
    config: SiteConfig,
}

impl Helpers {
    /// Create a new helpers instance
    pub fn new(config: SiteConfig) -> Self {
        Self { config }
    }

    /// Site configuration the helpers are bound to
    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    /// Get url_for helper
    pub fn url_for(&self, path: &str) -> String {
        url_for(&self.config, path)
    }

    /// Get full_url_for helper
    pub fn full_url_for(&self, path: &str) -> String {
        full_url_for(&self.config, path)
    }

    /// Public path of a post page
    pub fn post_path(&self, slug: &str) -> String {
        post_path(&self.config, slug)
    }

    /// Format a date in the site timezone
    pub fn date(&self, date: &DateTime<Utc>, format: Option<&str>) -> String {
        display_date(
            date,
            &self.config.timezone,
            format.unwrap_or(&self.config.date_format),
        )
    }
}
