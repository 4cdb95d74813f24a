//! List helper functions for category navigation and pagination

use std::collections::HashMap;
use std::ops::Range;

use super::html::html_escape;
use super::url::url_for;
use crate::config::SiteConfig;
use crate::content::{Category, Post};

/// Generate the category navigation list as HTML
///
/// Only categories with at least one of `posts` are listed, in the fixed
/// category order. `current` marks the active category.
pub fn list_categories(
    config: &SiteConfig,
    posts: &[Post],
    current: Option<Category>,
    show_count: bool,
) -> String {
    let mut counts: HashMap<Category, usize> = HashMap::new();
    for post in posts {
        *counts.entry(post.category).or_insert(0) += 1;
    }

    if counts.is_empty() {
        return String::new();
    }

    let class = "category-list";
    let mut html = format!(r#"<ul class="{}">"#, class);

    for category in Category::ALL {
        let Some(count) = counts.get(&category) else {
            continue;
        };
        let url = url_for(config, &format!("?category={}", category.as_str()));
        let active = if current == Some(category) {
            " current"
        } else {
            ""
        };

        html.push_str(&format!(
            r#"<li class="{}-item{}"><a class="{}-link" href="{}">{}</a>"#,
            class,
            active,
            class,
            html_escape(&url),
            category
        ));

        if show_count {
            html.push_str(&format!(r#"<span class="{}-count">{}</span>"#, class, count));
        }

        html.push_str("</li>");
    }

    html.push_str("</ul>");
    html
}

/// Number of pages needed for `total` items
pub fn page_count(total: usize, per_page: usize) -> usize {
    total.div_ceil(per_page.max(1)).max(1)
}

/// Index range of page `current` (1-based, clamped to the last page)
pub fn page_range(total: usize, per_page: usize, current: usize) -> Range<usize> {
    let per_page = per_page.max(1);
    let current = current.clamp(1, page_count(total, per_page));
    let start = (current - 1) * per_page;
    start..(start + per_page).min(total)
}

/// Generate a paginator
///
/// Page links keep the `category` filter. Nothing is rendered for a single page.
pub fn paginator(
    config: &SiteConfig,
    current: usize,
    total: usize,
    category: Option<Category>,
    mid_size: usize,
) -> String {
    if total <= 1 {
        return String::new();
    }

    let page_url = |page: usize| {
        let mut query = Vec::new();
        if let Some(category) = category {
            query.push(format!("category={}", category.as_str()));
        }
        if page > 1 {
            query.push(format!("page={}", page));
        }
        let path = if query.is_empty() {
            String::new()
        } else {
            format!("?{}", query.join("&"))
        };
        html_escape(&url_for(config, &path))
    };

    let mut html = r#"<nav class="pagination">"#.to_string();

    if current > 1 {
        html.push_str(&format!(
            r#"<a class="pagination-prev" href="{}">Newer</a>"#,
            page_url(current - 1)
        ));
    } else {
        html.push_str(r#"<span class="pagination-prev disabled">Newer</span>"#);
    }

    html.push_str(r#"<span class="pagination-numbers">"#);

    let start = current.saturating_sub(mid_size).max(1);
    let end = (current + mid_size).min(total);

    if start > 1 {
        html.push_str(&format!(
            r#"<a class="pagination-number" href="{}">1</a>"#,
            page_url(1)
        ));
        if start > 2 {
            html.push_str(r#"<span class="pagination-ellipsis">…</span>"#);
        }
    }

    for page in start..=end {
        if page == current {
            html.push_str(&format!(
                r#"<span class="pagination-number current">{}</span>"#,
                page
            ));
        } else {
            html.push_str(&format!(
                r#"<a class="pagination-number" href="{}">{}</a>"#,
                page_url(page),
                page
            ));
        }
    }

    if end < total {
        if end < total - 1 {
            html.push_str(r#"<span class="pagination-ellipsis">…</span>"#);
        }
        html.push_str(&format!(
            r#"<a class="pagination-number" href="{}">{}</a>"#,
            page_url(total),
            total
        ));
    }

    html.push_str("</span>");

    if current < total {
        html.push_str(&format!(
            r#"<a class="pagination-next" href="{}">Older</a>"#,
            page_url(current + 1)
        ));
    } else {
        html.push_str(r#"<span class="pagination-next disabled">Older</span>"#);
    }

    html.push_str("</nav>");
    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::fallback_posts;

    #[test]
    fn test_page_range() {
        assert_eq!(page_count(0, 10), 1);
        assert_eq!(page_count(21, 10), 3);
        assert_eq!(page_range(21, 10, 1), 0..10);
        assert_eq!(page_range(21, 10, 3), 20..21);
        assert_eq!(page_range(21, 10, 9), 20..21);
        assert_eq!(page_range(0, 10, 1), 0..0);
    }

    #[test]
    fn test_list_categories() {
        let config = SiteConfig::default();
        let posts = fallback_posts();
        let html = list_categories(&config, &posts, Some(Category::Travel), true);

        assert!(html.starts_with(r#"<ul class="category-list">"#));
        assert!(html.contains(r#"<li class="category-list-item current"><a class="category-list-link" href="/?category=travel">travel</a>"#));
        assert!(!html.contains("wellness"));
        // Technology comes before lifestyle in the fixed order.
        assert!(html.find("technology").unwrap() < html.find("lifestyle").unwrap());
    }

    #[test]
    fn test_paginator() {
        let config = SiteConfig::default();
        assert_eq!(paginator(&config, 1, 1, None, 2), "");

        let html = paginator(&config, 2, 3, Some(Category::Career), 2);
        assert!(html.contains(r#"href="/?category=career">Newer</a>"#));
        assert!(html.contains(r#"href="/?category=career&amp;page=3">Older</a>"#));
        assert!(html.contains(r#"<span class="pagination-number current">2</span>"#));
    }
}
