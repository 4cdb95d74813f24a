//! CLI commands

pub mod assist;
pub mod clean;
pub mod drafts;
pub mod import;
pub mod init;
pub mod list;
pub mod new;
pub mod post;
pub mod render;
