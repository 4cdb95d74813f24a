//! Built-in fallback dataset
//!
//! Used when neither the remote store nor a local snapshot has any posts.

use chrono::{TimeZone, Utc};
use uuid::Uuid;

use crate::content::{Category, Post, Visibility};

struct SeedPost {
    id: u128,
    slug: &'static str,
    title: &'static str,
    category: Category,
    published: bool,
    featured: bool,
    date: (i32, u32, u32),
    content: &'static str,
}

const SEED_POSTS: &[SeedPost] = &[
    SeedPost {
        id: 0x5eed_0001,
        slug: "welcome",
        title: "Welcome to the blog",
        category: Category::Lifestyle,
        published: true,
        featured: true,
        date: (2024, 1, 8),
        content: "# Welcome\n\nThis is where I write about **work**, *life*, and the things in between.\n\n> Write what you would want to read.\n\n- Short posts\n- Honest notes\n- The occasional list",
    },
    SeedPost {
        id: 0x5eed_0002,
        slug: "shipping-small-tools",
        title: "Shipping small tools",
        category: Category::Technology,
        published: true,
        featured: false,
        date: (2024, 2, 14),
        content: "## Why small\n\nSmall tools are easy to finish. Start with `one command` and grow from there.\n\n1. Pick a problem you have\n2. Solve only that\n3. Ship it\n\nMore on this in [my notes](https://example.com/notes).",
    },
    SeedPost {
        id: 0x5eed_0003,
        slug: "a-week-in-lisbon",
        title: "A week in Lisbon",
        category: Category::Travel,
        published: true,
        featured: true,
        date: (2024, 3, 22),
        content: "Steep streets, good coffee, and ***a lot*** of walking.\n\n---\n\n### Where I stayed\n\nA small flat near the river. Would book again.",
    },
    SeedPost {
        id: 0x5eed_0004,
        slug: "on-changing-careers",
        title: "On changing careers",
        category: Category::Career,
        published: false,
        featured: false,
        date: (2024, 4, 2),
        content: "Draft. Notes on leaving a job I liked for one I wanted.",
    },
];

/// The fallback posts, newest first
pub fn fallback_posts() -> Vec<Post> {
    let mut posts: Vec<Post> = SEED_POSTS
        .iter()
        .filter_map(|seed| {
            let (y, m, d) = seed.date;
            let date = Utc.with_ymd_and_hms(y, m, d, 9, 0, 0).single()?;
            let mut post = Post {
                id: Uuid::from_u128(seed.id),
                slug: seed.slug.to_string(),
                title: seed.title.to_string(),
                excerpt: String::new(),
                content: seed.content.to_string(),
                category: seed.category,
                published: seed.published,
                featured: seed.featured,
                visibility: Visibility::Public,
                password: None,
                date,
                updated: None,
                read_time: String::new(),
            };
            post.refresh_derived();
            Some(post)
        })
        .collect();

    posts.sort_by(|a, b| b.date.cmp(&a.date));
    posts
}
