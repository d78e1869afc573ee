use serde::{Deserialize, Serialize};

/// Describes the font a run is drawn with.
///
/// The engine never resolves real font metrics; descriptors are handed to the
/// injected [`TextMeasurer`](crate::style::TextMeasurer) and to the
/// presentation layer as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontDescriptor {
    pub family: String,
    /// Point size
    pub size: f32,
    pub bold: bool,
    pub italic: bool,
    pub monospaced: bool,
    /// Tabular (fixed-width) digits, used for ordered list numbers
    pub monospaced_digits: bool,
}

impl Default for FontDescriptor {
    fn default() -> Self {
        Self {
            family: "system-ui".to_string(),
            size: 17.0,
            bold: false,
            italic: false,
            monospaced: false,
            monospaced_digits: false,
        }
    }
}

impl FontDescriptor {
    pub fn new(family: impl Into<String>, size: f32) -> Self {
        Self {
            family: family.into(),
            size,
            ..Self::default()
        }
    }

    pub fn bold(&self) -> Self {
        Self {
            bold: true,
            ..self.clone()
        }
    }

    pub fn italic(&self) -> Self {
        Self {
            italic: true,
            ..self.clone()
        }
    }

    pub fn monospace(&self) -> Self {
        Self {
            monospaced: true,
            ..self.clone()
        }
    }

    pub fn with_monospaced_digits(&self) -> Self {
        Self {
            monospaced_digits: true,
            ..self.clone()
        }
    }

    pub fn with_size(&self, size: f32) -> Self {
        Self {
            size,
            ..self.clone()
        }
    }

    pub fn with_family(&self, family: impl Into<String>) -> Self {
        Self {
            family: family.into(),
            ..self.clone()
        }
    }

    pub fn scaled(&self, factor: f32) -> Self {
        self.with_size(self.size * factor)
    }
}
