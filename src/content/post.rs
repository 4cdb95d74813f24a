//! Post model and the fields used to create or update one

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::markdown::{inline_text, render, Block};
use crate::helpers::truncate;

/// Average reading speed used for `read_time`
pub const WORDS_PER_MINUTE: usize = 200;

/// Maximum length of a derived excerpt, in characters
const EXCERPT_LENGTH: usize = 160;

/// A blog post
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    /// Opaque identifier, assigned at creation
    pub id: Uuid,

    /// URL-safe name used for public lookup
    pub slug: String,

    pub title: String,

    pub excerpt: String,

    /// Raw markdown-subset source
    pub content: String,

    pub category: Category,

    /// Whether the post shows up on public listings
    pub published: bool,

    /// Highlight flag, independent of `published`
    pub featured: bool,

    #[serde(default)]
    pub visibility: Visibility,

    /// Secret for password-protected posts
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    /// Creation date
    pub date: DateTime<Utc>,

    /// Last updated date
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated: Option<DateTime<Utc>>,

    /// Display string such as "3 min"
    pub read_time: String,
}

impl Post {
    /// Recompute every field derived from `content`
    pub fn refresh_derived(&mut self) {
        self.read_time = read_time(&self.content);
        if self.excerpt.trim().is_empty() {
            self.excerpt = derive_excerpt(&self.content);
        }
    }

    /// Whether the post needs a password before its content is shown
    pub fn is_locked(&self) -> bool {
        self.visibility == Visibility::Password
    }
}

/// The fixed set of post categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Technology,
    Lifestyle,
    Career,
    Travel,
    Wellness,
    Creative,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Technology,
        Category::Lifestyle,
        Category::Career,
        Category::Travel,
        Category::Wellness,
        Category::Creative,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Technology => "technology",
            Category::Lifestyle => "lifestyle",
            Category::Career => "career",
            Category::Travel => "travel",
            Category::Wellness => "wellness",
            Category::Creative => "creative",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase();
        Category::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == needle)
            .ok_or_else(|| {
                format!(
                    "Unknown category: {}. Available: {}",
                    s,
                    Category::ALL.map(|c| c.as_str()).join(", ")
                )
            })
    }
}

/// Who may read a post's content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    #[default]
    Public,
    Password,
}

impl FromStr for Visibility {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "public" => Ok(Visibility::Public),
            "password" => Ok(Visibility::Password),
            other => Err(format!("Unknown visibility: {}", other)),
        }
    }
}

/// Fields supplied when creating a post
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PostFields {
    pub title: String,
    pub slug: Option<String>,
    pub excerpt: Option<String>,
    pub content: String,
    pub category: Option<Category>,
    pub published: bool,
    pub featured: bool,
    pub visibility: Visibility,
    pub password: Option<String>,
}

/// Partial update of a post; `None` leaves a field untouched
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PostPatch {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub excerpt: Option<String>,
    pub content: Option<String>,
    pub category: Option<Category>,
    pub published: Option<bool>,
    pub featured: Option<bool>,
    pub visibility: Option<Visibility>,
    pub password: Option<String>,
}

impl PostPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.slug.is_none()
            && self.excerpt.is_none()
            && self.content.is_none()
            && self.category.is_none()
            && self.published.is_none()
            && self.featured.is_none()
            && self.visibility.is_none()
            && self.password.is_none()
    }
}

/// Public listing view of a post, without content or secrets
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostSummary {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub excerpt: String,
    pub category: Category,
    pub date: DateTime<Utc>,
    pub read_time: String,
    pub featured: bool,
    pub locked: bool,
}

impl From<&Post> for PostSummary {
    fn from(post: &Post) -> Self {
        Self {
            id: post.id,
            slug: post.slug.clone(),
            title: post.title.clone(),
            excerpt: post.excerpt.clone(),
            category: post.category,
            date: post.date,
            read_time: post.read_time.clone(),
            featured: post.featured,
            locked: post.is_locked(),
        }
    }
}

/// Count whitespace-separated words
pub fn word_count(content: &str) -> usize {
    content.split_whitespace().count()
}

/// Reading time display string, at least one minute
pub fn read_time(content: &str) -> String {
    let minutes = word_count(content).div_ceil(WORDS_PER_MINUTE).max(1);
    format!("{} min", minutes)
}

/// Plain-text excerpt from the first paragraph of markdown-subset content
pub fn derive_excerpt(content: &str) -> String {
    let plain = render(content)
        .iter()
        .find_map(|block| match block {
            Block::Paragraph { content } => Some(inline_text(content)),
            _ => None,
        })
        .unwrap_or_default();
    let plain = plain.split_whitespace().collect::<Vec<_>>().join(" ");

    truncate(&plain, EXCERPT_LENGTH, None)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(n: usize) -> String {
        vec!["word"; n].join(" ")
    }

    #[test]
    fn test_read_time() {
        assert_eq!(read_time(&words(400)), "2 min");
        assert_eq!(read_time(&words(401)), "3 min");
        assert_eq!(read_time(&words(1)), "1 min");
        assert_eq!(read_time(""), "1 min");
    }

    #[test]
    fn test_category_parse() {
        assert_eq!("Travel".parse::<Category>(), Ok(Category::Travel));
        assert!("gardening".parse::<Category>().is_err());
    }

    #[test]
    fn test_category_serde() {
        let json = serde_json::to_string(&Category::Wellness).unwrap();
        assert_eq!(json, "\"wellness\"");
    }

    #[test]
    fn test_derive_excerpt_skips_heading() {
        let excerpt = derive_excerpt("# Title\n\nFirst **real** paragraph.\n\nSecond.");
        assert_eq!(excerpt, "First real paragraph.");
    }

    #[test]
    fn test_derive_excerpt_truncates() {
        let excerpt = derive_excerpt(&words(100));
        assert!(excerpt.ends_with("..."));
        assert!(excerpt.chars().count() <= EXCERPT_LENGTH);
    }

    #[test]
    fn test_post_serializes_camel_case() {
        let post = Post {
            id: Uuid::nil(),
            slug: "hello".to_string(),
            title: "Hello".to_string(),
            excerpt: String::new(),
            content: "hi".to_string(),
            category: Category::Career,
            published: true,
            featured: false,
            visibility: Visibility::Public,
            password: None,
            date: Utc::now(),
            updated: None,
            read_time: "1 min".to_string(),
        };
        let value = serde_json::to_value(&post).unwrap();
        assert_eq!(value["readTime"], "1 min");
        assert!(value.get("password").is_none());
    }
}
