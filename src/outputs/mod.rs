//! Output rendering and persistence.
//!
//! - [`markdown`]: renders a post bundle or quote board as Markdown text
//!   for the terminal
//! - [`json`]: writes the full post bundle under a date directory for
//!   downstream consumption

pub mod json;
pub mod markdown;
