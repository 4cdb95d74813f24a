//! Render a markdown-subset file

use anyhow::Result;
use std::fs;
use std::path::Path;

use crate::content::{render, FrontMatter};
use crate::helpers::render_blocks;

/// Output format of the render command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderFormat {
    Html,
    Json,
}

/// Render `source` into HTML or the JSON display-node tree
pub fn render_source(source: &str, format: RenderFormat) -> Result<String> {
    let (_, body) = FrontMatter::parse(source);
    let blocks = render(body);

    Ok(match format {
        RenderFormat::Html => render_blocks(&blocks),
        RenderFormat::Json => serde_json::to_string_pretty(&blocks)?,
    })
}

/// Run the render command
pub fn run(path: &Path, format: RenderFormat) -> Result<()> {
    let source = fs::read_to_string(path)?;
    print!("{}", render_source(&source, format)?);
    if format == RenderFormat::Json {
        println!();
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_html() {
        let html = render_source("---\ntitle: T\n---\n# Hi\n\n- a\n- b", RenderFormat::Html).unwrap();
        assert_eq!(html, "<h1>Hi</h1>\n<ul><li>a</li><li>b</li></ul>\n");
    }

    #[test]
    fn test_render_json() {
        let json = render_source("para one\n\npara two", RenderFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value.as_array().unwrap().len(), 2);
        assert_eq!(value[0]["type"], "paragraph");
        assert_eq!(value[0]["content"][0]["text"], "para one");
    }

    #[test]
    fn test_render_empty() {
        assert_eq!(render_source("", RenderFormat::Html).unwrap(), "");
    }
}
