//! Built-in page templates using the Tera template engine
//!
//! Templates are embedded in the binary. Autoescaping is on; the only
//! values marked `safe` are produced by the HTML helpers, which escape
//! everything they emit.

use anyhow::Result;
use serde::Serialize;
use std::collections::HashMap;
use tera::{Context, Tera};

use crate::content::{render, Category, Post};
use crate::helpers::{
    html_escape, list_categories, page_count, page_range, paginator, render_blocks, truncate,
    Helpers,
};

/// Template renderer with the embedded page templates
pub struct TemplateRenderer {
    tera: Tera,
    helpers: Helpers,
}

impl TemplateRenderer {
    /// Create a new renderer with all templates loaded
    pub fn new(helpers: Helpers) -> Result<Self> {
        let mut tera = Tera::default();
        tera.autoescape_on(vec![".html"]);

        tera.add_raw_templates(vec![
            ("layout.html", include_str!("desk/layout.html")),
            ("index.html", include_str!("desk/index.html")),
            ("post.html", include_str!("desk/post.html")),
            ("locked.html", include_str!("desk/locked.html")),
            ("not_found.html", include_str!("desk/not_found.html")),
            // Partials
            (
                "partials/header.html",
                include_str!("desk/partials/header.html"),
            ),
            (
                "partials/footer.html",
                include_str!("desk/partials/footer.html"),
            ),
            (
                "partials/post_meta.html",
                include_str!("desk/partials/post_meta.html"),
            ),
        ])?;

        tera.register_filter("truncate_chars", truncate_chars_filter);

        Ok(Self { tera, helpers })
    }

    /// Render a template with given context
    pub fn render(&self, template_name: &str, context: &Context) -> Result<String> {
        Ok(self.tera.render(template_name, context)?)
    }

    /// Index page of `posts` (already filtered to what the public may see)
    pub fn index(
        &self,
        posts: &[Post],
        featured: &[Post],
        category: Option<Category>,
        page: usize,
    ) -> Result<String> {
        let config = self.helpers.config();
        let listed: Vec<&Post> = posts
            .iter()
            .filter(|p| category.map_or(true, |c| p.category == c))
            .collect();

        let total_pages = page_count(listed.len(), config.per_page);
        let current = page.clamp(1, total_pages);
        let range = page_range(listed.len(), config.per_page, current);

        let mut context = self.base_context();
        context.insert(
            "posts",
            &listed[range]
                .iter()
                .map(|p| PostData::new(p, &self.helpers))
                .collect::<Vec<_>>(),
        );
        // Featured strip only on the unfiltered first page.
        let featured: Vec<PostData> = if category.is_none() && current == 1 {
            featured
                .iter()
                .map(|p| PostData::new(p, &self.helpers))
                .collect()
        } else {
            Vec::new()
        };
        context.insert("featured", &featured);
        context.insert(
            "categories",
            &list_categories(config, posts, category, true),
        );
        context.insert(
            "pagination",
            &paginator(config, current, total_pages, category, 2),
        );

        self.render("index.html", &context)
    }

    /// Full post page
    pub fn post(&self, post: &Post) -> Result<String> {
        let mut context = self.base_context();
        context.insert("post", &PostData::new(post, &self.helpers));
        context.insert("body", &render_blocks(&render(&post.content)));
        self.render("post.html", &context)
    }

    /// Password prompt for a protected post
    pub fn locked(&self, post: &Post, failed: bool) -> Result<String> {
        let mut context = self.base_context();
        context.insert("post", &PostData::new(post, &self.helpers));
        context.insert("failed", &failed);
        self.render("locked.html", &context)
    }

    pub fn not_found(&self, path: &str) -> Result<String> {
        let mut context = self.base_context();
        context.insert("path", path);
        self.render("not_found.html", &context)
    }

    fn base_context(&self) -> Context {
        let mut context = Context::new();
        context.insert("site", &SiteData::new(&self.helpers));
        context
    }
}

/// Tera filter: truncate by character count
fn truncate_chars_filter(
    value: &tera::Value,
    args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = tera::try_get_value!("truncate_chars", "value", String, value);
    let length = match args.get("length") {
        Some(val) => tera::try_get_value!("truncate_chars", "length", usize, val),
        None => 150,
    };
    let omission = match args.get("omission") {
        Some(val) => tera::try_get_value!("truncate_chars", "omission", String, val),
        None => "...".to_string(),
    };

    Ok(tera::Value::String(truncate(&s, length, Some(&omission))))
}

/// Data structures for template context

#[derive(Debug, Clone, Serialize)]
pub struct SiteData {
    pub title: String,
    pub subtitle: String,
    pub description: String,
    pub author: String,
    pub language: String,
    /// Escaped root URL, safe to emit in attributes
    pub root: String,
}

impl SiteData {
    pub fn new(helpers: &Helpers) -> Self {
        let config = helpers.config();
        Self {
            title: config.title.clone(),
            subtitle: config.subtitle.clone(),
            description: config.description.clone(),
            author: config.author.clone(),
            language: config.language.clone(),
            root: html_escape(&helpers.url_for("")),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PostData {
    pub title: String,
    pub slug: String,
    /// Escaped page path, safe to emit in attributes
    pub path: String,
    /// Escaped absolute URL
    pub permalink: String,
    pub date: String,
    pub datetime: String,
    pub category: String,
    pub excerpt: String,
    pub read_time: String,
    pub featured: bool,
    pub locked: bool,
}

impl PostData {
    pub fn new(post: &Post, helpers: &Helpers) -> Self {
        Self {
            title: post.title.clone(),
            slug: post.slug.clone(),
            path: html_escape(&helpers.post_path(&post.slug)),
            permalink: html_escape(&helpers.full_url_for(&format!("posts/{}", post.slug))),
            date: helpers.date(&post.date, None),
            datetime: post.date.to_rfc3339(),
            category: post.category.to_string(),
            excerpt: post.excerpt.clone(),
            read_time: post.read_time.clone(),
            featured: post.featured,
            locked: post.is_locked(),
        }
    }
}
