//! Create a new post

use anyhow::Result;
use std::fs;
use std::path::Path;

use crate::content::{loader, Post, PostFields};
use crate::store::ContentStore;

/// Read post content from `--content` or `--file`
///
/// A file's front-matter is stripped; only its body is returned.
pub fn read_body(content: Option<String>, file: Option<&Path>) -> Result<Option<String>> {
    match (content, file) {
        (Some(content), _) => Ok(Some(content)),
        (None, Some(path)) => {
            let raw = fs::read_to_string(path)?;
            let (_, body) = crate::content::FrontMatter::parse(&raw);
            Ok(Some(body.to_string()))
        }
        (None, None) => Ok(None),
    }
}

/// Start from a markdown file's front-matter, or from scratch
pub fn base_fields(file: Option<&Path>) -> Result<PostFields> {
    match file {
        Some(path) => loader::load_file(path),
        None => Ok(PostFields::default()),
    }
}

/// Create the post and report it
pub async fn create_post(store: &ContentStore, fields: PostFields) -> Result<Post> {
    let post = store.create(fields).await?;
    println!(
        "Created: {} ({}) [{}]",
        post.slug,
        post.id,
        if post.published { "published" } else { "unpublished" }
    );
    Ok(post)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::Category;
    use tempfile::TempDir;

    #[test]
    fn test_read_body_prefers_inline_content() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("post.md");
        fs::write(&path, "---\ntitle: From file\n---\nFile body").unwrap();

        assert_eq!(
            read_body(Some("inline".to_string()), Some(&path)).unwrap(),
            Some("inline".to_string())
        );
        assert_eq!(
            read_body(None, Some(&path)).unwrap(),
            Some("File body".to_string())
        );
        assert_eq!(read_body(None, None).unwrap(), None);
    }

    #[test]
    fn test_base_fields_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("trip.md");
        fs::write(&path, "---\ntitle: Trip\ncategory: travel\n---\nBody").unwrap();

        let fields = base_fields(Some(&path)).unwrap();
        assert_eq!(fields.title, "Trip");
        assert_eq!(fields.category, Some(Category::Travel));
        assert_eq!(fields.content, "Body");
        assert!(base_fields(None).unwrap().title.is_empty());
    }
}
