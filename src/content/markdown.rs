//! Markdown-subset rendering into typed display nodes
//!
//! The supported subset is line oriented: thematic breaks, blockquotes,
//! three heading levels, flat ordered and unordered lists, and paragraphs.
//! There is no nesting. The output is inert data; escaping belongs to the
//! presentation layer (see `helpers::html`).

use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;

use super::inline::{parse_inline, Inline};

lazy_static! {
    static ref BLOCK_SEPARATOR_RE: Regex = Regex::new(r"\n[ \t]*\n").unwrap();
    static ref ORDERED_ITEM_RE: Regex = Regex::new(r"^[0-9]+\. ").unwrap();
}

/// A block-level display node
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Block {
    ThematicBreak,
    Blockquote { content: Vec<Inline> },
    Heading { level: u8, content: Vec<Inline> },
    UnorderedList { items: Vec<Vec<Inline>> },
    OrderedList { items: Vec<Vec<Inline>> },
    Paragraph { content: Vec<Inline> },
}

/// Render markdown-subset source into blocks
///
/// Empty input yields no blocks. Rendering never fails.
///
/// # Examples
/// ```ignore
/// render("# Hello") // -> [Heading { level: 1, content: [Text("Hello")] }]
/// ```
pub fn render(source: &str) -> Vec<Block> {
    let normalized = source.replace("\r\n", "\n");
    BLOCK_SEPARATOR_RE
        .split(&normalized)
        .map(str::trim)
        .filter(|block| !block.is_empty())
        .map(classify_block)
        .collect()
}

/// Classify one trimmed, non-empty block; first match wins
fn classify_block(block: &str) -> Block {
    if block == "---" || block == "***" {
        return Block::ThematicBreak;
    }

    if block.starts_with("> ") {
        let text = block
            .lines()
            .map(|line| {
                line.strip_prefix("> ")
                    .or_else(|| line.strip_prefix('>'))
                    .unwrap_or(line)
            })
            .collect::<Vec<_>>()
            .join("\n");
        return Block::Blockquote {
            content: parse_inline(&text),
        };
    }

    let first_line = block.lines().next().unwrap_or_default();

    for (marker, level) in [("### ", 3), ("## ", 2), ("# ", 1)] {
        if let Some(rest) = first_line.strip_prefix(marker) {
            return Block::Heading {
                level,
                content: parse_inline(rest),
            };
        }
    }

    if is_unordered_item(first_line) {
        // Lines with another marker kind are dropped, not merged.
        let items = block
            .lines()
            .filter(|line| is_unordered_item(line))
            .map(|line| parse_inline(&line[2..]))
            .collect();
        return Block::UnorderedList { items };
    }

    if ORDERED_ITEM_RE.is_match(first_line) {
        let items = block
            .lines()
            .filter_map(|line| ORDERED_ITEM_RE.find(line).map(|m| &line[m.end()..]))
            .map(parse_inline)
            .collect();
        return Block::OrderedList { items };
    }

    Block::Paragraph {
        content: parse_inline(block),
    }
}

/// Like `render`, for content that may be absent
pub fn render_optional(source: Option<&str>) -> Vec<Block> {
    source.map(render).unwrap_or_default()
}

fn is_unordered_item(line: &str) -> bool {
    line.starts_with("- ") || line.starts_with("* ")
}

/// Plain text of a run of inline nodes
pub fn inline_text(nodes: &[Inline]) -> String {
    nodes.iter().map(Inline::plain_text).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(items: &[Vec<Inline>]) -> Vec<String> {
        items.iter().map(|item| inline_text(item)).collect()
    }

    #[test]
    fn test_empty_input() {
        assert!(render("").is_empty());
        assert!(render_optional(None).is_empty());
        assert!(render("\n\n   \n\n").is_empty());
    }

    #[test]
    fn test_render_is_deterministic() {
        let source = "# T\n\n> q\n\n- a\n- b\n\n1. x\n\ntext *i*";
        assert_eq!(render(source), render(source));
    }

    #[test]
    fn test_heading_levels() {
        assert_eq!(
            render("# Hello"),
            vec![Block::Heading {
                level: 1,
                content: vec![Inline::text("Hello")]
            }]
        );
        let blocks = render("## Two\n\n### Three");
        assert!(matches!(blocks[0], Block::Heading { level: 2, .. }));
        assert!(matches!(blocks[1], Block::Heading { level: 3, .. }));
    }

    #[test]
    fn test_heading_requires_space() {
        assert!(matches!(render("#hashtag")[0], Block::Paragraph { .. }));
    }

    #[test]
    fn test_bold_and_italic_paragraph() {
        let blocks = render("**bold** and *italic*");
        let Block::Paragraph { content } = &blocks[0] else {
            panic!("expected paragraph, got {:?}", blocks[0]);
        };
        let spans: Vec<_> = content
            .iter()
            .filter(|n| matches!(n, Inline::Bold { .. } | Inline::Italic { .. }))
            .collect();
        assert_eq!(spans.len(), 2);
        assert!(matches!(spans[0], Inline::Bold { text } if text == "bold"));
        assert!(matches!(spans[1], Inline::Italic { text } if text == "italic"));
    }

    #[test]
    fn test_unordered_list() {
        let blocks = render("- a\n- b\n- c");
        assert_eq!(blocks.len(), 1);
        let Block::UnorderedList { items } = &blocks[0] else {
            panic!("expected list, got {:?}", blocks[0]);
        };
        assert_eq!(texts(items), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_star_list_markers() {
        let Block::UnorderedList { items } = &render("* one\n* two")[0] else {
            panic!("expected list");
        };
        assert_eq!(texts(items), vec!["one", "two"]);
    }

    #[test]
    fn test_ordered_list() {
        let Block::OrderedList { items } = &render("1. first\n2. **second**\n10. tenth")[0] else {
            panic!("expected ordered list");
        };
        assert_eq!(texts(items), vec!["first", "second", "tenth"]);
        assert!(matches!(items[1][0], Inline::Bold { .. }));
    }

    #[test]
    fn test_ordered_list_needs_ascii_digits() {
        assert!(matches!(
            render("\u{0661}. item\n\u{0662}. next")[0],
            Block::Paragraph { .. }
        ));
    }

    #[test]
    fn test_mixed_markers_follow_first_line() {
        let Block::UnorderedList { items } = &render("- a\n1. b\n- c\nplain")[0] else {
            panic!("expected unordered list");
        };
        assert_eq!(texts(items), vec!["a", "c"]);

        let Block::OrderedList { items } = &render("1. a\n- b\n2. c")[0] else {
            panic!("expected ordered list");
        };
        assert_eq!(texts(items), vec!["a", "c"]);
    }

    #[test]
    fn test_paragraphs_split_on_blank_lines() {
        let blocks = render("para one\n\npara two");
        assert_eq!(blocks.len(), 2);
        assert!(blocks
            .iter()
            .all(|b| matches!(b, Block::Paragraph { .. })));
    }

    #[test]
    fn test_whitespace_only_line_separates_blocks() {
        assert_eq!(render("one\n   \ntwo").len(), 2);
    }

    #[test]
    fn test_single_newline_is_line_break() {
        let blocks = render("line one\nline two");
        assert_eq!(
            blocks,
            vec![Block::Paragraph {
                content: vec![
                    Inline::text("line one"),
                    Inline::LineBreak,
                    Inline::text("line two")
                ]
            }]
        );
    }

    #[test]
    fn test_link_paragraph() {
        let blocks = render("[x](http://e.com)");
        assert_eq!(
            blocks,
            vec![Block::Paragraph {
                content: vec![Inline::Link {
                    label: "x".to_string(),
                    url: "http://e.com".to_string(),
                    new_context: true
                }]
            }]
        );
    }

    #[test]
    fn test_thematic_break() {
        let blocks = render("above\n\n---\n\n***\n\nbelow");
        assert_eq!(blocks.len(), 4);
        assert_eq!(blocks[1], Block::ThematicBreak);
        assert_eq!(blocks[2], Block::ThematicBreak);
    }

    #[test]
    fn test_blockquote_keeps_lines() {
        let blocks = render("> first\n> # not a heading");
        assert_eq!(
            blocks,
            vec![Block::Blockquote {
                content: vec![
                    Inline::text("first"),
                    Inline::LineBreak,
                    Inline::text("# not a heading")
                ]
            }]
        );
    }

    #[test]
    fn test_crlf_input() {
        let blocks = render("# Title\r\n\r\nbody");
        assert_eq!(blocks.len(), 2);
    }

    #[test]
    fn test_blocks_in_source_order() {
        let blocks = render("# A\n\n- x\n\n> q\n\np");
        assert!(matches!(blocks[0], Block::Heading { .. }));
        assert!(matches!(blocks[1], Block::UnorderedList { .. }));
        assert!(matches!(blocks[2], Block::Blockquote { .. }));
        assert!(matches!(blocks[3], Block::Paragraph { .. }));
    }
}
