//! Show, edit, delete, and toggle existing posts

use anyhow::{anyhow, Result};
use chrono::Utc;
use uuid::Uuid;

use crate::content::{Post, PostPatch};
use crate::helpers::{relative_date, render_blocks, Helpers};
use crate::store::ContentStore;

/// Find a post by id or slug
pub async fn resolve(store: &ContentStore, key: &str) -> Result<Post> {
    let found = match Uuid::parse_str(key) {
        Ok(id) => store.get(id).await,
        Err(_) => store.get_by_slug(key).await,
    };
    found.ok_or_else(|| anyhow!("No post matches {:?}", key))
}

/// Print a post's metadata and content
pub async fn show(store: &ContentStore, helpers: &Helpers, key: &str, html: bool) -> Result<()> {
    let post = resolve(store, key).await?;

    println!("{}", post.title);
    println!("  id:        {}", post.id);
    println!("  slug:      {}", post.slug);
    println!("  category:  {}", post.category);
    println!("  date:      {}", helpers.date(&post.date, None));
    if let Some(updated) = &post.updated {
        println!(
            "  updated:   {} ({})",
            helpers.date(updated, None),
            relative_date(updated, Utc::now())
        );
    }
    println!("  read time: {}", post.read_time);
    println!(
        "  status:    {}{}{}",
        if post.published { "published" } else { "unpublished" },
        if post.featured { ", featured" } else { "" },
        if post.is_locked() { ", password" } else { "" }
    );
    println!();

    if html {
        print!("{}", render_blocks(&crate::content::render(&post.content)));
    } else {
        println!("{}", post.content);
    }

    Ok(())
}

/// Apply a patch to a post
pub async fn edit(store: &ContentStore, key: &str, patch: PostPatch) -> Result<Post> {
    if patch.is_empty() {
        anyhow::bail!("Nothing to change");
    }
    let post = resolve(store, key).await?;
    let post = store.update(post.id, patch).await?;
    println!("Updated: {} ({})", post.slug, post.id);
    Ok(post)
}

pub async fn delete(store: &ContentStore, key: &str) -> Result<()> {
    let post = resolve(store, key).await?;
    store.delete(post.id).await?;
    println!("Deleted: {} ({})", post.slug, post.id);
    Ok(())
}

pub async fn set_published(store: &ContentStore, key: &str, published: bool) -> Result<Post> {
    let post = resolve(store, key).await?;
    let post = store.set_published(post.id, published).await?;
    println!(
        "{}: {}",
        if published { "Published" } else { "Unpublished" },
        post.slug
    );
    Ok(post)
}

pub async fn set_featured(store: &ContentStore, key: &str, featured: bool) -> Result<Post> {
    let post = resolve(store, key).await?;
    let post = store.set_featured(post.id, featured).await?;
    println!(
        "{}: {}",
        if featured { "Featured" } else { "Unfeatured" },
        post.slug
    );
    Ok(post)
}
