use crate::models::{Color, FontDescriptor, TextAttributes};
use crate::style::{Environment, Style};

/// A leading insertion rendered before a paragraph's content.
#[derive(Debug, Clone, PartialEq)]
pub enum ParagraphEdit {
    /// Move the first line to the n-th tab stop
    Indent(usize),
    /// A list marker drawn with its own font
    Marker { text: String, font: FontDescriptor },
}

impl ParagraphEdit {
    /// The edit that replaces this one for blocks after the first.
    ///
    /// A marker is drawn once; later blocks only indent past it, which takes
    /// the same two tab stops the marker edit uses.
    pub fn continuation(&self) -> ParagraphEdit {
        match self {
            ParagraphEdit::Indent(n) => ParagraphEdit::Indent(*n),
            ParagraphEdit::Marker { .. } => ParagraphEdit::Indent(2),
        }
    }
}

/// Inherited formatting state.
///
/// Cloned at every recursive descent; a clone is never written back, so
/// siblings cannot observe each other's changes. Spacing, indents and tab
/// stops are in em.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderState {
    pub font: FontDescriptor,
    pub color: Color,
    pub paragraph_spacing: f32,
    pub head_indent: f32,
    pub tail_indent: f32,
    pub tab_stops: Vec<f32>,
    /// Edits queued for the next paragraph
    pub edits: Vec<ParagraphEdit>,
    /// Number of enclosing container blocks
    pub depth: usize,
}

impl RenderState {
    pub fn new(style: &Style, environment: &Environment) -> Self {
        Self {
            font: style
                .default_font
                .scaled(environment.size_category.scale()),
            color: style.default_color,
            paragraph_spacing: style.paragraph_spacing,
            head_indent: 0.0,
            tail_indent: 0.0,
            tab_stops: Vec::new(),
            edits: Vec::new(),
            depth: 0,
        }
    }

    /// State for a block that follows a sibling which already consumed the
    /// queued edits.
    pub fn continued(&self) -> Self {
        Self {
            edits: self.edits.iter().map(ParagraphEdit::continuation).collect(),
            ..self.clone()
        }
    }

    pub fn with_font(&self, font: FontDescriptor) -> Self {
        Self {
            font,
            ..self.clone()
        }
    }

    pub fn with_color(&self, color: Color) -> Self {
        Self {
            color,
            ..self.clone()
        }
    }

    /// Character attributes for text drawn in this state.
    pub fn attributes(&self) -> TextAttributes {
        TextAttributes {
            font: self.font.clone(),
            foreground: self.color,
            ..TextAttributes::default()
        }
    }
}
