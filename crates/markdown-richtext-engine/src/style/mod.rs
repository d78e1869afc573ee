//! # Style and Environment
//!
//! Static inputs of a render call:
//!
//! - [`Style`]: fonts, colors and spacing constants. Spacing and indent values
//!   are in em, resolved against the current font size when a paragraph is
//!   built.
//! - [`Environment`]: presentation-level settings that are the same for every
//!   paragraph (writing direction, alignment, line spacing, text size).
//! - [`TextMeasurer`]: the injected text-width capability.

pub mod measure;

pub use measure::{MonospaceMeasurer, TextMeasurer};

use serde::{Deserialize, Serialize};

use crate::models::{Alignment, Color, FontDescriptor, WritingDirection};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Style {
    pub default_font: FontDescriptor,
    pub default_color: Color,
    /// Spacing after each paragraph, in em
    pub paragraph_spacing: f32,
    /// Head indent added per block quote or list level, in em
    pub head_indent_step: f32,
    /// Tail indent added per block quote level, in em
    pub tail_indent_step: f32,
    /// Gap between an ordered list number and the item text, in em
    pub list_marker_spacing: f32,
    pub code_font_scale: f32,
    /// Font scale for heading levels 1 to 6
    pub heading_scale: [f32; 6],
    /// Spacing after headings, in em
    pub heading_spacing: f32,
    pub link_color: Option<Color>,
    pub code_background: Option<Color>,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            default_font: FontDescriptor::default(),
            default_color: Color::BLACK,
            paragraph_spacing: 0.5,
            head_indent_step: 1.5,
            tail_indent_step: 1.0,
            list_marker_spacing: 0.5,
            code_font_scale: 0.85,
            heading_scale: [1.75, 1.5, 1.3, 1.15, 1.0, 0.9],
            heading_spacing: 0.6,
            link_color: Some(Color::rgb(0x1a, 0x4f, 0x8b)),
            code_background: None,
        }
    }
}

impl Style {
    /// Scale for a heading level; levels outside 1..=6 are clamped.
    pub fn heading_scale_for(&self, level: u8) -> f32 {
        let index = usize::from(level.clamp(1, 6)) - 1;
        self.heading_scale[index]
    }
}

/// Text size preference chosen by the reader, applied to the default font.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SizeCategory {
    ExtraSmall,
    Small,
    Medium,
    #[default]
    Large,
    ExtraLarge,
    ExtraExtraLarge,
    ExtraExtraExtraLarge,
    AccessibilityMedium,
    AccessibilityLarge,
}

impl SizeCategory {
    pub fn scale(self) -> f32 {
        match self {
            SizeCategory::ExtraSmall => 0.82,
            SizeCategory::Small => 0.88,
            SizeCategory::Medium => 0.94,
            SizeCategory::Large => 1.0,
            SizeCategory::ExtraLarge => 1.12,
            SizeCategory::ExtraExtraLarge => 1.24,
            SizeCategory::ExtraExtraExtraLarge => 1.35,
            SizeCategory::AccessibilityMedium => 1.65,
            SizeCategory::AccessibilityLarge => 2.0,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Environment {
    pub writing_direction: WritingDirection,
    pub alignment: Alignment,
    /// Extra space between lines, in points
    pub line_spacing: f32,
    pub size_category: SizeCategory,
}
