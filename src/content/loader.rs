//! Content loader - reads markdown files into post fields for import

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::{FrontMatter, PostFields};

/// A markdown file parsed into create fields
#[derive(Debug, Clone)]
pub struct LoadedPost {
    pub source: PathBuf,
    pub fields: PostFields,
}

/// Load every markdown file under `dir`, sorted by path
///
/// Files that fail to parse are logged and skipped.
pub fn load_dir(dir: &Path) -> Result<Vec<LoadedPost>> {
    if !dir.exists() {
        anyhow::bail!("Directory does not exist: {:?}", dir);
    }

    let mut paths: Vec<PathBuf> = WalkDir::new(dir)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
        .map(|e| e.path().to_path_buf())
        .filter(|p| p.is_file() && is_markdown_file(p))
        .collect();
    paths.sort();

    let mut posts = Vec::new();
    for path in paths {
        match load_file(&path) {
            Ok(fields) => posts.push(LoadedPost {
                source: path,
                fields,
            }),
            Err(e) => {
                tracing::warn!("Failed to load post {:?}: {}", path, e);
            }
        }
    }

    Ok(posts)
}

/// Load a single markdown file
pub fn load_file(path: &Path) -> Result<PostFields> {
    let content = fs::read_to_string(path)?;
    let (fm, body) = FrontMatter::parse(&content);

    let fallback_title = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("Untitled");

    fm.into_fields(body, fallback_title)
}

/// Check if a file is a markdown file
fn is_markdown_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e == "md" || e == "markdown")
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_dir() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("b-second.md"),
            "---\ntitle: Second\n---\nBody two.",
        )
        .unwrap();
        fs::write(dir.path().join("a-first.markdown"), "Body one.").unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(
            dir.path().join("nested").join("c.md"),
            "---\ncategory: nope\n---\nbad",
        )
        .unwrap();

        let posts = load_dir(dir.path()).unwrap();
        assert_eq!(posts.len(), 2);
        assert_eq!(posts[0].fields.title, "a-first");
        assert_eq!(posts[1].fields.title, "Second");
        assert_eq!(posts[1].fields.content, "Body two.");
    }

    #[test]
    fn test_missing_dir() {
        assert!(load_dir(Path::new("/definitely/not/here")).is_err());
    }
}
