use serde::{Deserialize, Serialize};

use super::{color::Color, font::FontDescriptor};

/// Horizontal paragraph alignment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Alignment {
    #[default]
    Leading,
    Center,
    Trailing,
    Justified,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WritingDirection {
    #[default]
    Natural,
    LeftToRight,
    RightToLeft,
}

/// Paragraph-level attributes, in absolute units (points).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParagraphStyle {
    pub alignment: Alignment,
    pub writing_direction: WritingDirection,
    pub line_spacing: f32,
    pub spacing_before: f32,
    pub spacing_after: f32,
    pub head_indent: f32,
    pub tail_indent: f32,
    pub tab_stops: Vec<f32>,
}

/// Character-level attributes shared by every character of a [`Run`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextAttributes {
    pub font: FontDescriptor,
    pub foreground: Color,
    pub background: Option<Color>,
    pub underline: bool,
    pub strikethrough: bool,
    /// Vertical offset from the baseline in points
    pub baseline_offset: f32,
    /// Resolved link target
    pub link: Option<String>,
}

/// A span of text sharing one attribute set.
#[derive(Debug, Clone, PartialEq)]
pub struct Run {
    pub text: String,
    pub attributes: TextAttributes,
    /// Alignment requested by an enclosing centered scope. Consumed when the
    /// block renderer groups runs into paragraphs.
    pub(crate) alignment: Option<Alignment>,
}

impl Run {
    pub fn new(text: impl Into<String>, attributes: TextAttributes) -> Self {
        Self {
            text: text.into(),
            attributes,
            alignment: None,
        }
    }
}

/// One output paragraph: attributes plus its runs in order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Paragraph {
    pub style: ParagraphStyle,
    pub runs: Vec<Run>,
}

impl Paragraph {
    pub fn text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }
}

/// An image met while rendering. Images are not embedded as text; the
/// presentation layer places them using these references.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageReference {
    /// Source resolved against the base URL
    pub source: String,
    pub alt: String,
    pub width: Option<f32>,
    pub height: Option<f32>,
    /// Index into [`RenderedDocument::paragraphs`] of the paragraph the image
    /// occurred in
    pub paragraph: usize,
}

/// Result of one top-level render call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderedDocument {
    pub paragraphs: Vec<Paragraph>,
    pub images: Vec<ImageReference>,
}

impl RenderedDocument {
    /// Concatenation of every run's text in document order.
    pub fn plain_text(&self) -> String {
        self.runs().map(|r| r.text.as_str()).collect()
    }

    pub fn runs(&self) -> impl Iterator<Item = &Run> {
        self.paragraphs.iter().flat_map(|p| p.runs.iter())
    }
}
