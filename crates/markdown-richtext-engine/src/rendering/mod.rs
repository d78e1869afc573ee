//! # Rendering
//!
//! Walks a [`Document`] and produces paragraph-structured styled text.
//!
//! Formatting is inherited through a [`RenderState`] that every recursive
//! step receives by value: a quote or list only changes the copy it hands
//! to its children. Markers and first-line indents travel as
//! [`ParagraphEdit`]s that the next emitted paragraph consumes.
//!
//! Text conventions in the output:
//!
//! | Character | Meaning |
//! |-----------|---------|
//! | `\n` | paragraph separator, closes every paragraph but the last |
//! | `U+2028` | line break inside a paragraph |
//! | `\t` | jump to the next tab stop (markers, indents) |
//! | `U+00A0` struck through | horizontal rule |
//!
//! ## Modules
//!
//! - **`blocks`**: block-level traversal
//! - **`inline`**: inline nodes, pseudo-tags and inline tables
//! - **`lists`**: list markers and indent steps
//! - **`paragraph`**: paragraph attributes and edit runs
//! - **`state`**: inherited formatting state

pub mod blocks;
mod flatten;
pub mod inline;
pub mod lists;
pub mod paragraph;
pub mod state;

pub use state::{ParagraphEdit, RenderState};

use url::Url;

use crate::models::{Document, RenderedDocument};
use crate::parsing::{MarkdownParser, PulldownParser};
use crate::style::{Environment, Style, TextMeasurer};

/// Container blocks nested deeper than this render as plain text
pub const MAX_BLOCK_DEPTH: usize = 32;
/// Inline structure nested deeper than this renders as plain text
pub const MAX_INLINE_DEPTH: usize = 32;

pub(crate) const LINE_SEPARATOR: char = '\u{2028}';
pub(crate) const PARAGRAPH_SEPARATOR: &str = "\n";
pub(crate) const NO_BREAK_SPACE: &str = "\u{00A0}";
/// Prefix that makes an HTML block re-parse as a paragraph
pub(crate) const HTML_SENTINEL: &str = "htmlsentinel";

/// Renders documents with one style, environment and measurer.
///
/// ```
/// use markdown_richtext_engine::rendering::Renderer;
/// use markdown_richtext_engine::style::{Environment, MonospaceMeasurer, Style};
///
/// let style = Style::default();
/// let environment = Environment::default();
/// let measurer = MonospaceMeasurer::default();
/// let rendered = Renderer::new(&style, &environment, &measurer).render_markdown("*hi*");
/// assert_eq!(rendered.plain_text(), "hi");
/// ```
pub struct Renderer<'a> {
    pub(crate) style: &'a Style,
    pub(crate) environment: &'a Environment,
    pub(crate) measurer: &'a (dyn TextMeasurer + Sync),
    pub(crate) parser: &'a (dyn MarkdownParser + Sync),
    base_url: Option<Url>,
}

impl<'a> Renderer<'a> {
    pub fn new(
        style: &'a Style,
        environment: &'a Environment,
        measurer: &'a (dyn TextMeasurer + Sync),
    ) -> Self {
        Self {
            style,
            environment,
            measurer,
            parser: &PulldownParser,
            base_url: None,
        }
    }

    /// Base URL that relative link and image targets resolve against.
    pub fn with_base_url(mut self, base_url: Url) -> Self {
        self.base_url = Some(base_url);
        self
    }

    /// Parser used for markdown input and for re-parsing HTML blocks.
    pub fn with_parser(mut self, parser: &'a (dyn MarkdownParser + Sync)) -> Self {
        self.parser = parser;
        self
    }

    /// State a document starts in.
    pub fn initial_state(&self) -> RenderState {
        RenderState::new(self.style, self.environment)
    }

    pub fn render(&self, document: &Document) -> RenderedDocument {
        let mut out = RenderedDocument::default();
        self.render_blocks(&document.blocks, &self.initial_state(), false, &mut out);
        log::debug!(
            "rendered {} blocks into {} paragraphs",
            document.blocks.len(),
            out.paragraphs.len()
        );
        out
    }

    pub fn render_markdown(&self, markdown: &str) -> RenderedDocument {
        self.render(&self.parser.parse(markdown))
    }

    /// Resolves a link or image target. Absolute URLs are normalized,
    /// relative ones are joined to the base URL when there is one and kept
    /// as written otherwise.
    pub fn resolve_url(&self, target: &str) -> String {
        let target = target.trim();
        if let Ok(url) = Url::parse(target) {
            return url.into();
        }
        match &self.base_url {
            Some(base) => match base.join(target) {
                Ok(url) => url.into(),
                Err(e) => {
                    log::debug!("cannot resolve {target:?} against {base}: {e}");
                    target.to_string()
                }
            },
            None => target.to_string(),
        }
    }
}
