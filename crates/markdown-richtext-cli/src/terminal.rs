//! Converts rendered paragraphs into ratatui lines.
//!
//! Terminal cells have one size, so point values from the engine are turned
//! into cell counts with a fixed points-per-cell factor, and the same factor
//! drives the [`CellMeasurer`] the engine lays out tables and list markers
//! with.

use markdown_richtext_engine::{
    Alignment, Color, FontDescriptor, Paragraph, RenderedDocument, TextAttributes, TextMeasurer,
};
use ratatui::layout::Alignment as LineAlignment;
use ratatui::style::{Color as TermColor, Modifier, Style as TermStyle};
use ratatui::text::{Line, Span};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Width of a horizontal rule, in cells
const RULE_WIDTH: usize = 40;
const RULE: char = '─';

/// Measures text in terminal cells.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellMeasurer {
    pub points_per_cell: f32,
}

impl CellMeasurer {
    /// A measurer where one cell is half an em of `font`.
    pub fn for_font(font: &FontDescriptor) -> Self {
        Self {
            points_per_cell: (font.size * 0.5).max(f32::EPSILON),
        }
    }

    fn cells(&self, points: f32) -> usize {
        (points / self.points_per_cell).round().max(0.0) as usize
    }
}

impl TextMeasurer for CellMeasurer {
    fn measure(&self, text: &str, _font: &FontDescriptor) -> f32 {
        text.width() as f32 * self.points_per_cell
    }
}

/// Lays out a rendered document as terminal lines.
pub fn to_lines(
    document: &RenderedDocument,
    measurer: CellMeasurer,
    default_color: Color,
) -> Vec<Line<'static>> {
    let mut builder = LineBuilder {
        measurer,
        default_color,
        lines: Vec::new(),
    };
    for paragraph in &document.paragraphs {
        builder.push_paragraph(paragraph);
    }
    builder.lines
}

struct LineBuilder {
    measurer: CellMeasurer,
    default_color: Color,
    lines: Vec<Line<'static>>,
}

/// The line being assembled.
#[derive(Default)]
struct OpenLine {
    spans: Vec<Span<'static>>,
    text: String,
    style: TermStyle,
    column: usize,
    tabs: usize,
}

impl OpenLine {
    fn push(&mut self, c: char, style: TermStyle) {
        if style != self.style {
            self.flush();
            self.style = style;
        }
        self.text.push(c);
        self.column += c.width().unwrap_or(0);
    }

    fn pad_to(&mut self, column: usize, style: TermStyle) {
        while self.column < column {
            self.push(' ', style);
        }
    }

    fn flush(&mut self) {
        if !self.text.is_empty() {
            let text = std::mem::take(&mut self.text);
            self.spans.push(Span::styled(text, self.style));
        }
    }

    fn finish(mut self, alignment: LineAlignment) -> Line<'static> {
        self.flush();
        Line::from(self.spans).alignment(alignment)
    }
}

impl LineBuilder {
    fn push_paragraph(&mut self, paragraph: &Paragraph) {
        let alignment = match paragraph.style.alignment {
            Alignment::Center => LineAlignment::Center,
            Alignment::Trailing => LineAlignment::Right,
            Alignment::Leading | Alignment::Justified => LineAlignment::Left,
        };
        let stops: Vec<usize> = paragraph
            .style
            .tab_stops
            .iter()
            .map(|stop| self.measurer.cells(*stop))
            .collect();
        let head = self.measurer.cells(paragraph.style.head_indent);

        let mut line = OpenLine::default();
        let mut ended = false;
        for run in &paragraph.runs {
            let style = self.term_style(&run.attributes);
            if run.attributes.strikethrough && run.text == "\u{00A0}" {
                for _ in 0..RULE_WIDTH {
                    line.push(RULE, style.remove_modifier(Modifier::CROSSED_OUT));
                }
                continue;
            }
            for c in run.text.chars() {
                match c {
                    '\t' => {
                        // the n-th tab of a line goes to the n-th stop
                        let target = stops
                            .get(line.tabs)
                            .copied()
                            .filter(|stop| *stop >= line.column)
                            .or_else(|| stops.iter().copied().find(|stop| *stop > line.column))
                            .unwrap_or(line.column + 1);
                        line.tabs += 1;
                        line.pad_to(target, TermStyle::default());
                    }
                    '\u{2028}' => {
                        self.lines.push(std::mem::take(&mut line).finish(alignment));
                        line.pad_to(head, TermStyle::default());
                    }
                    '\n' => {
                        self.lines.push(std::mem::take(&mut line).finish(alignment));
                        if paragraph.style.spacing_after > 0.0 {
                            self.lines.push(Line::default());
                        }
                        ended = true;
                    }
                    c => line.push(c, style),
                }
            }
        }
        if !ended {
            self.lines.push(line.finish(alignment));
        }
    }

    fn term_style(&self, attributes: &TextAttributes) -> TermStyle {
        let mut style = TermStyle::default();
        if attributes.foreground != self.default_color {
            style = style.fg(term_color(attributes.foreground));
        }
        if let Some(background) = attributes.background {
            style = style.bg(term_color(background));
        }
        let font = &attributes.font;
        if font.bold {
            style = style.add_modifier(Modifier::BOLD);
        }
        if font.italic {
            style = style.add_modifier(Modifier::ITALIC);
        }
        if attributes.underline || attributes.link.is_some() {
            style = style.add_modifier(Modifier::UNDERLINED);
        }
        if attributes.strikethrough {
            style = style.add_modifier(Modifier::CROSSED_OUT);
        }
        style
    }
}

fn term_color(color: Color) -> TermColor {
    TermColor::Rgb(color.red, color.green, color.blue)
}

#[cfg(test)]
mod tests {
    use super::*;
    use markdown_richtext_engine::{Environment, Renderer, Style};
    use pretty_assertions::assert_eq;

    fn render_lines(markdown: &str) -> Vec<String> {
        let style = Style {
            default_font: FontDescriptor::new("Mono", 2.0),
            ..Style::default()
        };
        let environment = Environment::default();
        let measurer = CellMeasurer::for_font(&style.default_font);
        let document = Renderer::new(&style, &environment, &measurer).render_markdown(markdown);
        to_lines(&document, measurer, style.default_color)
            .iter()
            .map(|line| line.spans.iter().map(|s| s.content.as_ref()).collect())
            .collect()
    }

    #[test]
    fn cell_measurer_uses_display_width() {
        let m = CellMeasurer {
            points_per_cell: 2.0,
        };
        assert_eq!(m.measure("ab", &FontDescriptor::default()), 4.0);
        assert_eq!(m.measure("日本", &FontDescriptor::default()), 8.0);
    }

    #[test]
    fn paragraphs_are_separated_by_a_blank_line() {
        assert_eq!(render_lines("one\n\ntwo"), vec!["one", "", "two"]);
    }

    #[test]
    fn list_markers_sit_on_tab_stops() {
        assert_eq!(
            render_lines("- a\n  - b\n- c\n"),
            vec!["\u{2022}  a", "   \u{2022}  b", "\u{2022}  c"]
        );
    }

    #[test]
    fn quote_lines_are_indented() {
        assert_eq!(render_lines("> quoted"), vec!["   quoted"]);
    }

    #[test]
    fn line_breaks_continue_at_head_indent() {
        assert_eq!(render_lines("> a<br>b"), vec!["   a", "   b"]);
    }

    #[test]
    fn rules_are_drawn() {
        let lines = render_lines("---");
        assert_eq!(lines, vec![RULE.to_string().repeat(RULE_WIDTH)]);
    }

    #[test]
    fn tables_line_up_in_cells() {
        assert_eq!(
            render_lines("| a | bb |\n|---|---:|\n| ccc | d |"),
            vec!["a\u{2007}\u{2007}\u{2003}bb", "ccc\u{2003}\u{2007}d"]
        );
    }
}
