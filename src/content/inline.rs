//! Inline substitution for the markdown subset
//!
//! Substitution runs as an ordered list of passes. Each pass only looks at the
//! literal text left over by the passes before it, so a span produced by one
//! pass is never re-matched by a later one.

use lazy_static::lazy_static;
use regex::{Captures, Regex};
use serde::Serialize;

lazy_static! {
    static ref IMAGE_RE: Regex = Regex::new(r"!\[([^\]\n]*)\]\(([^)\n]+)\)").unwrap();
    static ref LINK_RE: Regex = Regex::new(r"\[([^\]\n]+)\]\(([^)\n]+)\)").unwrap();
    static ref BOLD_ITALIC_RE: Regex = Regex::new(r"\*\*\*(.+?)\*\*\*").unwrap();
    static ref BOLD_RE: Regex = Regex::new(r"\*\*(.+?)\*\*").unwrap();
    static ref ITALIC_RE: Regex = Regex::new(r"\*(.+?)\*").unwrap();
    static ref CODE_RE: Regex = Regex::new(r"`(.+?)`").unwrap();
}

/// An inline display node
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Inline {
    /// Literal text, not yet escaped
    Text { text: String },
    /// Explicit line break inside a paragraph or blockquote
    LineBreak,
    Image { alt: String, url: String },
    /// Link; `new_context` asks the presentation layer to open it in a new
    /// browsing context with `noopener noreferrer`
    Link {
        label: String,
        url: String,
        new_context: bool,
    },
    BoldItalic { text: String },
    Bold { text: String },
    Italic { text: String },
    Code { text: String },
}

impl Inline {
    pub fn text(text: impl Into<String>) -> Self {
        Inline::Text { text: text.into() }
    }

    /// The human-readable text of the node, without markup
    pub fn plain_text(&self) -> &str {
        match self {
            Inline::Text { text }
            | Inline::BoldItalic { text }
            | Inline::Bold { text }
            | Inline::Italic { text }
            | Inline::Code { text } => text,
            Inline::Image { alt, .. } => alt,
            Inline::Link { label, .. } => label,
            Inline::LineBreak => "\n",
        }
    }
}

/// Run every inline pass over `text`; newlines become `LineBreak` nodes
pub fn parse_inline(text: &str) -> Vec<Inline> {
    let mut nodes = vec![Inline::text(text)];

    nodes = apply_pass(nodes, &IMAGE_RE, |caps| Inline::Image {
        alt: caps[1].to_string(),
        url: caps[2].trim().to_string(),
    });
    nodes = apply_pass(nodes, &LINK_RE, |caps| Inline::Link {
        label: caps[1].to_string(),
        url: caps[2].trim().to_string(),
        new_context: true,
    });
    nodes = apply_pass(nodes, &BOLD_ITALIC_RE, |caps| Inline::BoldItalic {
        text: caps[1].to_string(),
    });
    nodes = apply_pass(nodes, &BOLD_RE, |caps| Inline::Bold {
        text: caps[1].to_string(),
    });
    nodes = apply_pass(nodes, &ITALIC_RE, |caps| Inline::Italic {
        text: caps[1].to_string(),
    });
    nodes = apply_pass(nodes, &CODE_RE, |caps| Inline::Code {
        text: caps[1].to_string(),
    });

    split_line_breaks(nodes)
}

/// Replace every match of `re` inside `Text` nodes with the node built by `build`
fn apply_pass<F>(nodes: Vec<Inline>, re: &Regex, build: F) -> Vec<Inline>
where
    F: Fn(&Captures) -> Inline,
{
    let mut out = Vec::with_capacity(nodes.len());

    for node in nodes {
        let Inline::Text { text } = node else {
            out.push(node);
            continue;
        };

        let mut last = 0;
        for caps in re.captures_iter(&text) {
            let Some(whole) = caps.get(0) else {
                continue;
            };
            push_text(&mut out, &text[last..whole.start()]);
            out.push(build(&caps));
            last = whole.end();
        }
        push_text(&mut out, &text[last..]);
    }

    out
}

fn split_line_breaks(nodes: Vec<Inline>) -> Vec<Inline> {
    let mut out = Vec::with_capacity(nodes.len());

    for node in nodes {
        match node {
            Inline::Text { text } if text.contains('\n') => {
                for (i, line) in text.split('\n').enumerate() {
                    if i > 0 {
                        out.push(Inline::LineBreak);
                    }
                    push_text(&mut out, line);
                }
            }
            other => out.push(other),
        }
    }

    out
}

/// Append literal text, merging with a preceding text node
fn push_text(out: &mut Vec<Inline>, text: &str) {
    if text.is_empty() {
        return;
    }
    if let Some(Inline::Text { text: prev }) = out.last_mut() {
        prev.push_str(text);
    } else {
        out.push(Inline::text(text));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_untouched() {
        assert_eq!(parse_inline("just words"), vec![Inline::text("just words")]);
    }

    #[test]
    fn test_bold_then_italic() {
        let nodes = parse_inline("**bold** and *italic*");
        assert_eq!(
            nodes,
            vec![
                Inline::Bold {
                    text: "bold".to_string()
                },
                Inline::text(" and "),
                Inline::Italic {
                    text: "italic".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_bold_italic_wins_over_bold() {
        let nodes = parse_inline("***loud***");
        assert_eq!(
            nodes,
            vec![Inline::BoldItalic {
                text: "loud".to_string()
            }]
        );
    }

    #[test]
    fn test_non_greedy_matches() {
        let nodes = parse_inline("*a* b *c*");
        assert_eq!(nodes.len(), 3);
        assert_eq!(nodes[0].plain_text(), "a");
        assert_eq!(nodes[1].plain_text(), " b ");
        assert_eq!(nodes[2].plain_text(), "c");
    }

    #[test]
    fn test_image_before_link() {
        let nodes = parse_inline("![cat](/cat.png) and [home](/)");
        assert_eq!(
            nodes[0],
            Inline::Image {
                alt: "cat".to_string(),
                url: "/cat.png".to_string()
            }
        );
        assert_eq!(
            nodes[2],
            Inline::Link {
                label: "home".to_string(),
                url: "/".to_string(),
                new_context: true
            }
        );
    }

    #[test]
    fn test_link_label_not_rematched() {
        // The label is already a link node; the italic pass never sees it.
        let nodes = parse_inline("[*x*](http://e.com)");
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].plain_text(), "*x*");
    }

    #[test]
    fn test_inline_code() {
        let nodes = parse_inline("run `cargo doc` now");
        assert_eq!(
            nodes[1],
            Inline::Code {
                text: "cargo doc".to_string()
            }
        );
    }

    #[test]
    fn test_lone_marker_is_literal() {
        assert_eq!(parse_inline("2 * 3 = 6"), vec![Inline::text("2 * 3 = 6")]);
    }

    #[test]
    fn test_spans_do_not_cross_lines() {
        let nodes = parse_inline("*a\nb*");
        assert_eq!(
            nodes,
            vec![Inline::text("*a"), Inline::LineBreak, Inline::text("b*")]
        );
    }

    #[test]
    fn test_stars_inside_backticks_win_over_code() {
        // Emphasis passes run before the code pass.
        assert_eq!(
            parse_inline("`f(*args, *kw)`"),
            vec![
                Inline::text("`f("),
                Inline::Italic {
                    text: "args, ".to_string()
                },
                Inline::text("kw)`"),
            ]
        );
    }
}
