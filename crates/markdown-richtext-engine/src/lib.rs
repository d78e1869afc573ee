//! Renders markdown into paragraph-structured styled text.
//!
//! The output of a render call is a [`RenderedDocument`]: paragraphs with
//! their layout attributes, each holding runs of text that share one set of
//! character attributes. A small vocabulary of inline HTML tags is treated as
//! pseudo-markup, and pipe tables inside a paragraph are laid out with
//! padding characters.
//!
//! ```
//! use markdown_richtext_engine::{Environment, MonospaceMeasurer, Style, render_markdown};
//!
//! let rendered = render_markdown(
//!     "Hello <u>world</u>",
//!     &Style::default(),
//!     &Environment::default(),
//!     &MonospaceMeasurer::default(),
//! );
//! assert_eq!(rendered.plain_text(), "Hello world");
//! ```

pub mod models;
pub mod parsing;
pub mod rendering;
pub mod style;

// Re-export key types for easier usage
pub use models::*;
pub use parsing::{MarkdownParser, PulldownParser, parse_markdown};
pub use rendering::{ParagraphEdit, RenderState, Renderer};
pub use style::{Environment, MonospaceMeasurer, SizeCategory, Style, TextMeasurer};

/// Parses and renders `markdown` in one call.
pub fn render_markdown(
    markdown: &str,
    style: &Style,
    environment: &Environment,
    measurer: &(dyn TextMeasurer + Sync),
) -> RenderedDocument {
    Renderer::new(style, environment, measurer).render_markdown(markdown)
}
