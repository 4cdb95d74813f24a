//! HTML helper functions
//!
//! Display nodes never carry markup; everything that reaches a document goes
//! through `html_escape` here.

use crate::content::{Block, Inline};

/// `rel` attribute for links that open in a new browsing context
pub const NEW_CONTEXT_REL: &str = "noopener noreferrer";

/// Generate an anchor tag
///
/// # Examples
/// ```ignore
/// link_to("https://e.com", "Site", true)
/// // -> <a href="https://e.com" target="_blank" rel="noopener noreferrer">Site</a>
/// ```
pub fn link_to(href: &str, text: &str, new_context: bool) -> String {
    let href = html_escape(&safe_url(href, false));
    let text = html_escape(text);

    if new_context {
        format!(
            r#"<a href="{}" target="_blank" rel="{}">{}</a>"#,
            href, NEW_CONTEXT_REL, text
        )
    } else {
        format!(r#"<a href="{}">{}</a>"#, href, text)
    }
}

/// Generate an image tag
///
/// # Examples
/// ```ignore
/// image_tag("/images/photo.jpg", "My Photo") // -> <img src="/images/photo.jpg" alt="My Photo">
/// ```
pub fn image_tag(src: &str, alt: &str) -> String {
    format!(
        r#"<img src="{}" alt="{}">"#,
        html_escape(&safe_url(src, true)),
        html_escape(alt)
    )
}

/// Neutralize URL schemes that execute script
///
/// `data:` URLs are only allowed for images, and only for `data:image/`.
pub fn safe_url(url: &str, image: bool) -> String {
    let lowered: String = url
        .trim()
        .chars()
        .filter(|c| !c.is_whitespace() && !c.is_control())
        .collect::<String>()
        .to_lowercase();

    let blocked = lowered.starts_with("javascript:")
        || lowered.starts_with("vbscript:")
        || (lowered.starts_with("data:") && !(image && lowered.starts_with("data:image/")));

    if blocked {
        "#".to_string()
    } else {
        url.trim().to_string()
    }
}

/// Render a sequence of blocks as HTML
pub fn render_blocks(blocks: &[Block]) -> String {
    let mut out = String::new();

    for block in blocks {
        match block {
            Block::ThematicBreak => out.push_str("<hr>"),
            Block::Blockquote { content } => {
                out.push_str("<blockquote><p>");
                out.push_str(&render_inline(content));
                out.push_str("</p></blockquote>");
            }
            Block::Heading { level, content } => {
                out.push_str(&format!(
                    "<h{level}>{}</h{level}>",
                    render_inline(content),
                    level = level
                ));
            }
            Block::UnorderedList { items } => {
                out.push_str(&render_list("ul", items));
            }
            Block::OrderedList { items } => {
                out.push_str(&render_list("ol", items));
            }
            Block::Paragraph { content } => {
                out.push_str("<p>");
                out.push_str(&render_inline(content));
                out.push_str("</p>");
            }
        }
        out.push('\n');
    }

    out
}

fn render_list(tag: &str, items: &[Vec<Inline>]) -> String {
    let mut out = format!("<{}>", tag);
    for item in items {
        out.push_str("<li>");
        out.push_str(&render_inline(item));
        out.push_str("</li>");
    }
    out.push_str(&format!("</{}>", tag));
    out
}

/// Render inline nodes as HTML
pub fn render_inline(nodes: &[Inline]) -> String {
    let mut out = String::new();

    for node in nodes {
        match node {
            Inline::Text { text } => out.push_str(&html_escape(text)),
            Inline::LineBreak => out.push_str("<br>"),
            Inline::Image { alt, url } => out.push_str(&image_tag(url, alt)),
            Inline::Link {
                label,
                url,
                new_context,
            } => out.push_str(&link_to(url, label, *new_context)),
            Inline::BoldItalic { text } => {
                out.push_str(&format!("<strong><em>{}</em></strong>", html_escape(text)))
            }
            Inline::Bold { text } => {
                out.push_str(&format!("<strong>{}</strong>", html_escape(text)))
            }
            Inline::Italic { text } => out.push_str(&format!("<em>{}</em>", html_escape(text))),
            Inline::Code { text } => out.push_str(&format!("<code>{}</code>", html_escape(text))),
        }
    }

    out
}

/// Escape HTML special characters
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Truncate a string to a specified length
pub fn truncate(s: &str, length: usize, omission: Option<&str>) -> String {
    let omission = omission.unwrap_or("...");

    if s.chars().count() <= length {
        s.to_string()
    } else {
        let truncated: String = s
            .chars()
            .take(length.saturating_sub(omission.chars().count()))
            .collect();
        format!("{}{}", truncated.trim_end(), omission)
    }
}
