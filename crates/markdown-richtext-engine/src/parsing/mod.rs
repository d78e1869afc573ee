//! # Markdown Parsing
//!
//! The renderer consumes an already-parsed [`Document`]. Producing that tree is
//! the job of a [`MarkdownParser`]; the engine ships [`PulldownParser`], an
//! adapter over `pulldown-cmark`, and uses whichever parser it is given when
//! it needs to re-parse raw HTML blocks.
//!
//! ## Modules
//!
//! - **`pulldown`**: event-stream to [`Document`] builder

pub mod pulldown;

pub use pulldown::PulldownParser;

use crate::models::Document;

/// Turns markdown source into a document tree.
pub trait MarkdownParser {
    fn parse(&self, markdown: &str) -> Document;
}

/// Parses markdown with the default [`PulldownParser`].
pub fn parse_markdown(markdown: &str) -> Document {
    PulldownParser.parse(markdown)
}
