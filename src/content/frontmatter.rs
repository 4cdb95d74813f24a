//! Front-matter parsing for imported markdown files

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

use super::post::{Category, PostFields, Visibility};

/// Front-matter data from an imported post file
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FrontMatter {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub excerpt: Option<String>,
    pub category: Option<String>,
    /// Imported posts are published unless they say otherwise
    pub published: bool,
    pub featured: bool,
    pub visibility: Option<String>,
    pub password: Option<String>,
}

impl Default for FrontMatter {
    fn default() -> Self {
        Self {
            title: None,
            slug: None,
            excerpt: None,
            category: None,
            published: true,
            featured: false,
            visibility: None,
            password: None,
        }
    }
}

impl FrontMatter {
    /// Parse front-matter from content string
    /// Returns (front_matter, remaining_content)
    pub fn parse(content: &str) -> (Self, &str) {
        let content = content.trim_start();

        if content.starts_with("---") {
            return Self::parse_yaml(content);
        }

        (FrontMatter::default(), content)
    }

    fn parse_yaml(content: &str) -> (Self, &str) {
        let rest = &content[3..];
        let rest = rest.trim_start_matches(['\n', '\r']);

        let Some(end_pos) = rest.find("\n---") else {
            return (FrontMatter::default(), content);
        };

        let yaml_content = &rest[..end_pos];
        let remaining = rest[end_pos + 4..].trim_start_matches(['\n', '\r']);

        if yaml_content.trim().is_empty() {
            return (FrontMatter::default(), remaining);
        }

        // A leading `---` is also a thematic break; only treat the block as
        // front-matter when it has at least one `key: value` line.
        let has_yaml_structure = yaml_content.lines().any(|line| {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                return false;
            }
            if let Some(colon_pos) = trimmed.find(':') {
                let key = &trimmed[..colon_pos];
                let is_valid_key = !key.is_empty()
                    && key
                        .chars()
                        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
                    && key != "http"
                    && key != "https";
                if is_valid_key {
                    let after_colon = &trimmed[colon_pos + 1..];
                    return after_colon.is_empty() || after_colon.starts_with(' ');
                }
            }
            false
        });

        if !has_yaml_structure {
            return (FrontMatter::default(), content);
        }

        match serde_yaml::from_str::<FrontMatter>(yaml_content) {
            Ok(fm) => (fm, remaining),
            Err(e) => {
                tracing::warn!(
                    "Failed to parse YAML front-matter, treating as content: {}",
                    e
                );
                (FrontMatter::default(), content)
            }
        }
    }

    /// Turn front-matter and body into create fields
    ///
    /// `fallback_title` is used when the front-matter has no title, usually
    /// the file stem.
    pub fn into_fields(self, body: &str, fallback_title: &str) -> Result<PostFields> {
        let category = self
            .category
            .as_deref()
            .map(str::parse::<Category>)
            .transpose()
            .map_err(|e| anyhow!(e))?;
        let visibility = self
            .visibility
            .as_deref()
            .map(str::parse::<Visibility>)
            .transpose()
            .map_err(|e| anyhow!(e))?
            .unwrap_or_default();

        Ok(PostFields {
            title: self.title.unwrap_or_else(|| fallback_title.to_string()),
            slug: self.slug,
            excerpt: self.excerpt,
            content: body.trim().to_string(),
            category,
            published: self.published,
            featured: self.featured,
            visibility,
            password: self.password,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_yaml_frontmatter() {
        let content = r#"---
title: Morning Pages
category: wellness
featured: true
---
# Heading

Body text."#;

        let (fm, body) = FrontMatter::parse(content);
        assert_eq!(fm.title.as_deref(), Some("Morning Pages"));
        assert_eq!(fm.category.as_deref(), Some("wellness"));
        assert!(fm.published);
        assert!(fm.featured);
        assert!(body.starts_with("# Heading"));
    }

    #[test]
    fn test_no_frontmatter() {
        let (fm, body) = FrontMatter::parse("Just text");
        assert_eq!(fm.title, None);
        assert_eq!(body, "Just text");
    }

    #[test]
    fn test_thematic_break_not_yaml() {
        let content = "---\n\nSome prose with a link https://example.com\n\n---\nMore.";
        let (fm, body) = FrontMatter::parse(content);
        assert_eq!(fm.title, None);
        assert!(body.contains("Some prose"));
    }

    #[test]
    fn test_into_fields() {
        let content = "---\ntitle: Trip\ncategory: Travel\npublished: false\n---\nWe went.";
        let (fm, body) = FrontMatter::parse(content);
        let fields = fm.into_fields(body, "ignored").unwrap();
        assert_eq!(fields.title, "Trip");
        assert_eq!(fields.category, Some(Category::Travel));
        assert!(!fields.published);
        assert_eq!(fields.content, "We went.");
    }

    #[test]
    fn test_into_fields_rejects_unknown_category() {
        let (fm, body) = FrontMatter::parse("---\ncategory: cooking\n---\nbody");
        assert!(fm.into_fields(body, "x").is_err());
    }

    #[test]
    fn test_fallback_title() {
        let (fm, body) = FrontMatter::parse("body only");
        let fields = fm.into_fields(body, "from-file").unwrap();
        assert_eq!(fields.title, "from-file");
    }
}
