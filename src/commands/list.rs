//! List posts

use anyhow::Result;

use crate::content::Post;
use crate::helpers::Helpers;
use crate::store::ContentStore;

/// List posts of a given kind: all, published, featured, or unpublished
pub async fn run(store: &ContentStore, helpers: &Helpers, kind: &str) -> Result<()> {
    let posts: Vec<Post> = match kind {
        "all" | "post" | "posts" => store.list().await,
        "published" => store.published().await,
        "featured" => store.featured().await,
        "unpublished" | "draft" | "drafts" => store
            .list()
            .await
            .into_iter()
            .filter(|p| !p.published)
            .collect(),
        other => anyhow::bail!(
            "Unknown list type: {}. Use all, published, featured, or unpublished",
            other
        ),
    };

    println!("Posts ({}, {} backend):", posts.len(), store.backend().as_str());
    for post in posts {
        println!("  {}", format_line(&post, helpers));
    }

    Ok(())
}

fn format_line(post: &Post, helpers: &Helpers) -> String {
    let mut flags = Vec::new();
    if !post.published {
        flags.push("unpublished");
    }
    if post.featured {
        flags.push("featured");
    }
    if post.is_locked() {
        flags.push("password");
    }

    let mut line = format!(
        "{} - {} [{}] {}",
        helpers.date(&post.date, Some("YYYY-MM-DD")),
        post.title,
        post.slug,
        post.category
    );
    if !flags.is_empty() {
        line.push_str(&format!(" ({})", flags.join(", ")));
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use crate::store::fallback_posts;

    #[test]
    fn test_format_line() {
        let helpers = Helpers::new(SiteConfig::default());
        let posts = fallback_posts();
        let draft = posts.iter().find(|p| !p.published).unwrap();
        assert_eq!(
            format_line(draft, &helpers),
            "2024-04-02 - On changing careers [on-changing-careers] career (unpublished)"
        );
    }
}
