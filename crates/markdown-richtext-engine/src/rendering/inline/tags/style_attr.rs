use std::sync::OnceLock;

use regex::Regex;

use crate::models::Color;
use crate::rendering::state::RenderState;

/// Font size requested by a styled tag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FontSize {
    /// Absolute point size
    Points(f32),
    /// Factor applied to the enclosing size
    Scale(f32),
}

/// Character overrides carried by `<span style>` and `<font>` tags.
///
/// Unset fields keep whatever the enclosing scope uses.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StyleOverride {
    pub color: Option<Color>,
    pub background: Option<Color>,
    pub size: Option<FontSize>,
    pub bold: Option<bool>,
    pub italic: Option<bool>,
    pub family: Option<String>,
}

/// `<font size>` steps 1 to 7 in pixels; 3 is the normal size.
const FONT_SIZE_STEPS: [f32; 7] = [10.0, 13.0, 16.0, 18.0, 24.0, 32.0, 48.0];
const NORMAL_FONT_STEP: i32 = 3;

fn declaration_regex() -> &'static Regex {
    static DECLARATION: OnceLock<Regex> = OnceLock::new();
    DECLARATION.get_or_init(|| {
        Regex::new(r"([A-Za-z-]+)\s*:\s*([^;]+)").expect("Invalid declaration regex")
    })
}

fn size_regex() -> &'static Regex {
    static SIZE: OnceLock<Regex> = OnceLock::new();
    SIZE.get_or_init(|| {
        Regex::new(r"^(\d*\.?\d+)\s*(px|pt|em|rem|%)?$").expect("Invalid size regex")
    })
}

impl StyleOverride {
    /// Reads the declarations of a CSS `style` attribute. Properties outside
    /// the supported set and values that do not parse are skipped.
    pub fn from_style_attr(style: &str) -> Self {
        let mut out = Self::default();
        for caps in declaration_regex().captures_iter(style) {
            let property = caps[1].to_ascii_lowercase();
            let value = caps[2].trim();
            match property.as_str() {
                "color" => out.color = parse_color(value),
                "background" | "background-color" => out.background = parse_color(value),
                "font-size" => out.size = parse_css_size(value),
                "font-weight" => out.bold = parse_weight(value),
                "font-style" => {
                    out.italic = match value.to_ascii_lowercase().as_str() {
                        "italic" | "oblique" => Some(true),
                        "normal" => Some(false),
                        _ => None,
                    }
                }
                "font-family" => out.family = first_family(value),
                _ => log::trace!("ignoring style property {property}"),
            }
        }
        out
    }

    /// Reads the attributes of a legacy `<font>` tag.
    pub fn from_font_attrs(color: Option<&str>, size: Option<&str>, face: Option<&str>) -> Self {
        Self {
            color: color.and_then(parse_color),
            size: size.and_then(parse_font_step),
            family: face.and_then(first_family),
            ..Self::default()
        }
    }

    /// Derives the state a scope with these overrides renders in.
    pub fn apply(&self, state: &RenderState) -> RenderState {
        let mut next = state.clone();
        if let Some(bold) = self.bold {
            next.font.bold = bold;
        }
        if let Some(italic) = self.italic {
            next.font.italic = italic;
        }
        match self.size {
            Some(FontSize::Points(points)) => next.font.size = points,
            Some(FontSize::Scale(factor)) => next.font.size *= factor,
            None => {}
        }
        if let Some(family) = &self.family {
            next.font.family = family.clone();
        }
        if let Some(color) = self.color {
            next.color = color;
        }
        next
    }
}

fn parse_color(value: &str) -> Option<Color> {
    match Color::parse(value) {
        Ok(color) => Some(color),
        Err(e) => {
            log::debug!("ignoring color override: {e}");
            None
        }
    }
}

fn parse_css_size(value: &str) -> Option<FontSize> {
    let caps = size_regex().captures(value.trim())?;
    let number: f32 = caps[1].parse().ok()?;
    if number <= 0.0 {
        return None;
    }
    match caps.get(2).map(|m| m.as_str()) {
        None | Some("px") | Some("pt") => Some(FontSize::Points(number)),
        Some("em") | Some("rem") => Some(FontSize::Scale(number)),
        Some(_) => Some(FontSize::Scale(number / 100.0)),
    }
}

/// `<font size>` accepts a step from 1 to 7 or a signed offset from 3.
fn parse_font_step(value: &str) -> Option<FontSize> {
    let value = value.trim();
    let step = if let Some(rest) = value.strip_prefix('+') {
        NORMAL_FONT_STEP.saturating_add(rest.parse::<i32>().ok()?)
    } else if value.starts_with('-') {
        NORMAL_FONT_STEP.saturating_add(value.parse::<i32>().ok()?)
    } else {
        value.parse::<i32>().ok()?
    };
    let index = usize::try_from(step.clamp(1, 7) - 1).ok()?;
    let normal = FONT_SIZE_STEPS[(NORMAL_FONT_STEP - 1) as usize];
    Some(FontSize::Scale(FONT_SIZE_STEPS[index] / normal))
}

fn parse_weight(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "bold" | "bolder" => Some(true),
        "normal" | "lighter" => Some(false),
        numeric => numeric.parse::<u16>().ok().map(|w| w >= 600),
    }
}

fn first_family(value: &str) -> Option<String> {
    let family = value
        .split(',')
        .next()?
        .trim()
        .trim_matches(|c| c == '"' || c == '\'');
    (!family.is_empty()).then(|| family.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::{Environment, Style};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn reads_supported_declarations() {
        let o = StyleOverride::from_style_attr(
            "color: red; background-color:#00ff00; font-weight: bold; font-style:italic; font-family: 'Iowan Old Style', serif",
        );
        assert_eq!(o.color, Some(Color::rgb(255, 0, 0)));
        assert_eq!(o.background, Some(Color::rgb(0, 255, 0)));
        assert_eq!(o.bold, Some(true));
        assert_eq!(o.italic, Some(true));
        assert_eq!(o.family.as_deref(), Some("Iowan Old Style"));
    }

    #[test]
    fn skips_unknown_properties_and_bad_values() {
        let o = StyleOverride::from_style_attr("color: notacolor; margin: 4px; font-size: huge");
        assert_eq!(o, StyleOverride::default());
    }

    #[rstest]
    #[case("12px", Some(FontSize::Points(12.0)))]
    #[case("9pt", Some(FontSize::Points(9.0)))]
    #[case("1.5em", Some(FontSize::Scale(1.5)))]
    #[case("50%", Some(FontSize::Scale(0.5)))]
    #[case("14", Some(FontSize::Points(14.0)))]
    #[case("0px", None)]
    #[case("large", None)]
    fn css_sizes(#[case] input: &str, #[case] expected: Option<FontSize>) {
        assert_eq!(parse_css_size(input), expected);
    }

    #[rstest]
    #[case("3", 1.0)]
    #[case("6", 2.0)]
    #[case("+3", 2.0)]
    #[case("-2", 10.0 / 16.0)]
    #[case("12", 3.0)]
    #[case("+2147483647", 3.0)]
    #[case("-2147483648", 10.0 / 16.0)]
    fn font_steps(#[case] input: &str, #[case] factor: f32) {
        assert_eq!(parse_font_step(input), Some(FontSize::Scale(factor)));
    }

    #[test]
    fn weights() {
        assert_eq!(parse_weight("700"), Some(true));
        assert_eq!(parse_weight("400"), Some(false));
        assert_eq!(parse_weight("heavy"), None);
    }

    #[test]
    fn apply_only_touches_set_fields() {
        let base = RenderState::new(&Style::default(), &Environment::default());
        let o = StyleOverride {
            color: Some(Color::rgb(1, 2, 3)),
            size: Some(FontSize::Scale(2.0)),
            ..StyleOverride::default()
        };
        let next = o.apply(&base);
        assert_eq!(next.color, Color::rgb(1, 2, 3));
        assert_eq!(next.font.size, base.font.size * 2.0);
        assert_eq!(next.font.family, base.font.family);
        assert_eq!(next.font.bold, base.font.bold);
    }
}
