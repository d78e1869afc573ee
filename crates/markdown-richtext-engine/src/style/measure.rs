use crate::models::FontDescriptor;

/// Measures rendered text width for a font.
///
/// Implemented by whatever text-layout system consumes the engine's output.
/// Closures of the form `Fn(&str, &FontDescriptor) -> f32` implement it too.
pub trait TextMeasurer {
    /// Width of `text` drawn with `font`, in points.
    fn measure(&self, text: &str, font: &FontDescriptor) -> f32;
}

impl<F> TextMeasurer for F
where
    F: Fn(&str, &FontDescriptor) -> f32,
{
    fn measure(&self, text: &str, font: &FontDescriptor) -> f32 {
        self(text, font)
    }
}

/// Approximates every character as a fixed fraction of the font size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonospaceMeasurer {
    /// Advance per character, as a fraction of the point size
    pub advance: f32,
}

impl MonospaceMeasurer {
    pub fn new(advance: f32) -> Self {
        Self { advance }
    }
}

impl Default for MonospaceMeasurer {
    fn default() -> Self {
        Self::new(0.6)
    }
}

impl TextMeasurer for MonospaceMeasurer {
    fn measure(&self, text: &str, font: &FontDescriptor) -> f32 {
        text.chars().count() as f32 * font.size * self.advance
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn monospace_scales_with_font_size() {
        let m = MonospaceMeasurer::new(0.5);
        assert_eq!(m.measure("abcd", &FontDescriptor::new("mono", 10.0)), 20.0);
        assert_eq!(m.measure("", &FontDescriptor::new("mono", 10.0)), 0.0);
    }

    #[test]
    fn closures_are_measurers() {
        let m = |text: &str, _font: &FontDescriptor| text.len() as f32;
        assert_eq!(m.measure("abc", &FontDescriptor::default()), 3.0);
    }
}
