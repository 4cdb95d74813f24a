//! Content module - posts, drafts, and markdown-subset rendering

mod draft;
mod frontmatter;
mod inline;
pub mod loader;
mod markdown;
mod post;

pub use draft::{Platform, SocialDraft};
pub use frontmatter::FrontMatter;
pub use inline::{parse_inline, Inline};
pub use markdown::{inline_text, render, render_optional, Block};
pub use post::{
    derive_excerpt, read_time, word_count, Category, Post, PostFields, PostPatch, PostSummary,
    Visibility, WORDS_PER_MINUTE,
};
