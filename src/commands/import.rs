//! Import markdown files as posts

use anyhow::Result;
use std::path::Path;

use crate::content::loader;
use crate::store::{ContentStore, StoreError};
use crate::Blogdesk;

/// Outcome of an import run
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub created: usize,
    pub skipped: usize,
}

/// Import every markdown file under `dir` into `store`
///
/// Files whose slug is already taken are skipped; any other store error
/// aborts the run.
pub async fn import_dir(store: &ContentStore, dir: &Path) -> Result<ImportSummary> {
    let mut summary = ImportSummary::default();

    for loaded in loader::load_dir(dir)? {
        match store.create(loaded.fields).await {
            Ok(post) => {
                println!("Imported: {} <- {:?}", post.slug, loaded.source);
                summary.created += 1;
            }
            Err(StoreError::DuplicateSlug(slug)) => {
                tracing::warn!("Skipping {:?}: slug {:?} already exists", loaded.source, slug);
                summary.skipped += 1;
            }
            Err(StoreError::Validation(reason)) => {
                tracing::warn!("Skipping {:?}: {}", loaded.source, reason);
                summary.skipped += 1;
            }
            Err(e) => return Err(e.into()),
        }
    }

    Ok(summary)
}

/// Run the import command
pub async fn run(desk: &Blogdesk, dir: &Path) -> Result<()> {
    let dir = if dir.is_absolute() {
        dir.to_path_buf()
    } else {
        desk.base_dir.join(dir)
    };
    let store = desk.open_store().await?;
    let summary = import_dir(&store, &dir).await?;
    println!(
        "Imported {} posts, skipped {}",
        summary.created, summary.skipped
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::Category;
    use crate::store::StoreOptions;
    use std::fs;
    use std::time::Duration;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_import_dir() {
        let data = TempDir::new().unwrap();
        let options = StoreOptions {
            data_dir: data.path().to_path_buf(),
            storage_key: "blog-posts".to_string(),
            default_category: Category::Creative,
            timeout: Duration::from_millis(100),
            retries: 0,
        };
        let store = ContentStore::open_with(options, None).await.unwrap();

        let posts = TempDir::new().unwrap();
        fs::write(
            posts.path().join("one.md"),
            "---\ntitle: Imported one\n---\nFirst body",
        )
        .unwrap();
        fs::write(
            posts.path().join("two.md"),
            "---\ntitle: Dupe\nslug: welcome\n---\nBody",
        )
        .unwrap();
        fs::write(posts.path().join("three.md"), "---\ntitle: Empty\n---\n").unwrap();

        let summary = import_dir(&store, posts.path()).await.unwrap();
        assert_eq!(
            summary,
            ImportSummary {
                created: 1,
                skipped: 2
            }
        );

        let post = store.get_by_slug("imported-one").await.unwrap();
        assert!(post.published);
        assert_eq!(post.category, Category::Creative);
    }
}
