//! Pipe tables written inside a paragraph.
//!
//! The markdown parser leaves `| a | b |` lines as plain text. When such a
//! line opens a paragraph's table, cells are collected row by row and laid
//! out at the end of the paragraph: every column is padded with figure
//! spaces to its widest cell, columns are separated by an em space and rows
//! by a line separator. The second row is the alignment row and is never
//! drawn.

use crate::models::{Run, TextAttributes};
use crate::rendering::LINE_SEPARATOR;
use crate::rendering::state::RenderState;
use crate::style::TextMeasurer;

pub const COLUMN_SEPARATOR: char = '|';
/// Padding character; figure spaces have a stable width in most fonts
pub const FILLER: char = '\u{2007}';
pub const COLUMN_SPACER: char = '\u{2003}';

const ALIGNMENT_ROW: usize = 1;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ColumnAlignment {
    #[default]
    Leading,
    Center,
    Trailing,
}

impl ColumnAlignment {
    /// Reads a delimiter cell such as `:---:`.
    fn from_delimiter(cell: &str) -> Self {
        let cell = cell.trim();
        match (cell.starts_with(':'), cell.ends_with(':')) {
            (true, true) if cell.len() > 1 => ColumnAlignment::Center,
            (_, true) => ColumnAlignment::Trailing,
            _ => ColumnAlignment::Leading,
        }
    }
}

/// True when a text node starts a table: its trimmed content begins and
/// ends with the column separator.
pub fn is_table_row(text: &str) -> bool {
    let t = text.trim();
    t.len() >= 2 && t.starts_with(COLUMN_SEPARATOR) && t.ends_with(COLUMN_SEPARATOR)
}

#[derive(Debug, Clone, PartialEq)]
struct Cell {
    runs: Vec<Run>,
    width: f32,
}

/// An open table collecting rows.
#[derive(Debug, Clone, PartialEq)]
pub struct InlineTable {
    columns: usize,
    column_widths: Vec<f32>,
    alignments: Option<Vec<ColumnAlignment>>,
    rows: Vec<Vec<Cell>>,
    /// Raw text of the alignment row's cells
    delimiters: Vec<String>,
    pending: Vec<Run>,
    pending_raw: String,
    /// State at the point the table opened; fills and spacers use it
    state: RenderState,
}

impl InlineTable {
    /// Opens a table from its header line. The column count is the number
    /// of separators minus one and never changes afterwards.
    pub fn open(header: &str, state: &RenderState) -> Self {
        let columns = header
            .trim()
            .matches(COLUMN_SEPARATOR)
            .count()
            .saturating_sub(1)
            .max(1);
        log::trace!("opening inline table with {columns} columns");
        Self {
            columns,
            column_widths: vec![0.0; columns],
            alignments: None,
            rows: vec![Vec::new()],
            delimiters: Vec::new(),
            pending: Vec::new(),
            pending_raw: String::new(),
            state: state.clone(),
        }
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Appends a text fragment, closing a cell at every separator.
    pub fn push_text(
        &mut self,
        text: &str,
        attributes: &TextAttributes,
        measurer: &dyn TextMeasurer,
    ) {
        for (i, segment) in text.split(COLUMN_SEPARATOR).enumerate() {
            if i > 0 {
                self.close_cell(measurer);
            }
            if !segment.is_empty() {
                self.pending.push(Run::new(segment, attributes.clone()));
                self.pending_raw.push_str(segment);
            }
        }
    }

    /// Appends already-rendered runs to the pending cell.
    pub fn push_runs(&mut self, runs: Vec<Run>) {
        for mut run in runs {
            run.alignment = None;
            self.pending_raw.push_str(&run.text);
            self.pending.push(run);
        }
    }

    /// Ends the current row at a line break.
    pub fn end_row(&mut self, measurer: &dyn TextMeasurer) {
        self.close_cell(measurer);
        if self.rows.last().is_some_and(|row| !row.is_empty()) {
            self.finish_row();
        }
    }

    fn row_index(&self) -> usize {
        self.rows.len() - 1
    }

    fn finish_row(&mut self) {
        if self.row_index() == ALIGNMENT_ROW && self.alignments.is_none() {
            let alignments = (0..self.columns)
                .map(|c| {
                    self.delimiters
                        .get(c)
                        .map(|d| ColumnAlignment::from_delimiter(d))
                        .unwrap_or_default()
                })
                .collect();
            self.alignments = Some(alignments);
        }
        self.rows.push(Vec::new());
    }

    fn close_cell(&mut self, measurer: &dyn TextMeasurer) {
        let runs = trim_cell(std::mem::take(&mut self.pending));
        let raw = std::mem::take(&mut self.pending_raw);
        if runs.is_empty() {
            return;
        }
        if self.rows.last().is_some_and(|row| row.len() == self.columns) {
            self.finish_row();
        }

        let row = self.row_index();
        let runs = if row == 0 {
            runs.into_iter()
                .map(|mut run| {
                    run.attributes.font = run.attributes.font.bold();
                    run
                })
                .collect()
        } else {
            runs
        };
        let width = runs
            .iter()
            .map(|run| measurer.measure(&run.text, &run.attributes.font))
            .sum();

        let column = self.rows[row].len();
        if row == ALIGNMENT_ROW {
            self.delimiters.push(raw);
        } else if width > self.column_widths[column] {
            self.column_widths[column] = width;
        }
        self.rows[row].push(Cell { runs, width });
    }

    /// Closes the table and lays it out.
    pub fn render(mut self, measurer: &dyn TextMeasurer) -> Vec<Run> {
        self.end_row(measurer);
        let alignments = self.alignments.take().unwrap_or_default();
        let attributes = self.state.attributes();
        let filler = FILLER.to_string();
        let filler_width = measurer.measure(&filler, &self.state.font);

        let mut out = Vec::new();
        let rows = self
            .rows
            .iter()
            .enumerate()
            .filter(|(i, row)| *i != ALIGNMENT_ROW && !row.is_empty())
            .map(|(_, row)| row);
        for (r, row) in rows.enumerate() {
            if r > 0 {
                out.push(Run::new(LINE_SEPARATOR.to_string(), attributes.clone()));
            }
            for column in 0..self.columns {
                if column > 0 {
                    out.push(Run::new(COLUMN_SPACER.to_string(), attributes.clone()));
                }
                let cell = row.get(column);
                let gap = self.column_widths[column] - cell.map_or(0.0, |c| c.width);
                let fill = if filler_width > 0.0 && gap > 0.0 {
                    (gap / filler_width).round() as usize
                } else {
                    0
                };
                let (before, after) = match alignments.get(column).copied().unwrap_or_default() {
                    ColumnAlignment::Leading => (0, fill),
                    ColumnAlignment::Trailing => (fill, 0),
                    ColumnAlignment::Center => (fill / 2, fill - fill / 2),
                };
                if before > 0 {
                    out.push(Run::new(filler.repeat(before), attributes.clone()));
                }
                if let Some(cell) = cell {
                    out.extend(cell.runs.iter().cloned());
                }
                if after > 0 {
                    out.push(Run::new(filler.repeat(after), attributes.clone()));
                }
            }
        }
        out
    }
}

/// Strips the whitespace around a cell's content and drops runs left empty.
fn trim_cell(mut runs: Vec<Run>) -> Vec<Run> {
    while let Some(first) = runs.first_mut() {
        let trimmed = first.text.trim_start();
        if trimmed.is_empty() {
            runs.remove(0);
        } else {
            first.text = trimmed.to_string();
            break;
        }
    }
    while let Some(last) = runs.last_mut() {
        let trimmed = last.text.trim_end();
        if trimmed.is_empty() {
            runs.pop();
        } else {
            last.text = trimmed.to_string();
            break;
        }
    }
    runs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FontDescriptor;
    use crate::style::{Environment, MonospaceMeasurer, Style};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn state() -> RenderState {
        let style = Style {
            default_font: FontDescriptor::new("Body", 10.0),
            ..Style::default()
        };
        RenderState::new(&style, &Environment::default())
    }

    fn text(runs: &[Run]) -> String {
        runs.iter().map(|r| r.text.as_str()).collect()
    }

    fn table(lines: &[&str]) -> Vec<Run> {
        let m = MonospaceMeasurer::new(1.0);
        let s = state();
        let mut t = InlineTable::open(lines[0], &s);
        for (i, line) in lines.iter().enumerate() {
            if i > 0 {
                t.end_row(&m);
            }
            t.push_text(line, &s.attributes(), &m);
        }
        t.render(&m)
    }

    #[rstest]
    #[case("| a | b |", true)]
    #[case("  |x|  ", true)]
    #[case("||", true)]
    #[case("|", false)]
    #[case("a | b", false)]
    #[case("| a", false)]
    fn detects_table_rows(#[case] input: &str, #[case] expected: bool) {
        assert_eq!(is_table_row(input), expected);
    }

    #[rstest]
    #[case(":---:", ColumnAlignment::Center)]
    #[case("---:", ColumnAlignment::Trailing)]
    #[case(":---", ColumnAlignment::Leading)]
    #[case("---", ColumnAlignment::Leading)]
    #[case(":", ColumnAlignment::Trailing)]
    fn delimiter_alignment(#[case] cell: &str, #[case] expected: ColumnAlignment) {
        assert_eq!(ColumnAlignment::from_delimiter(cell), expected);
    }

    #[test]
    fn column_count_comes_from_header() {
        assert_eq!(InlineTable::open("| a | b | c |", &state()).columns(), 3);
        assert_eq!(InlineTable::open("||", &state()).columns(), 1);
    }

    #[test]
    fn equal_widths_need_no_padding() {
        let runs = table(&["| a | b |", "|---|---:|", "| x | y |"]);
        assert_eq!(text(&runs), "a\u{2003}b\u{2028}x\u{2003}y");
        assert!(runs[0].attributes.font.bold);
        assert!(!runs.last().expect("runs").attributes.font.bold);
    }

    #[test]
    fn shorter_cells_are_padded_by_alignment() {
        let runs = table(&["| name | n |", "|:---:|---:|", "| ab | 100 |"]);
        // column 0 is 4 wide, "ab" is centered; column 1 is 3 wide, "n" is trailing
        assert_eq!(
            text(&runs),
            "name\u{2003}\u{2007}\u{2007}n\u{2028}\u{2007}ab\u{2007}\u{2003}100"
        );
    }

    #[test]
    fn missing_cells_are_filled() {
        let runs = table(&["| a | b |", "|---|---|", "| long |"]);
        assert_eq!(
            text(&runs),
            "a\u{2007}\u{2007}\u{2007}\u{2003}b\u{2028}long\u{2003}\u{2007}"
        );
    }

    #[test]
    fn extra_cells_start_a_new_row() {
        let runs = table(&["| a |", "|---|", "| x | y |"]);
        assert_eq!(text(&runs), "a\u{2028}x\u{2028}y");
    }

    #[test]
    fn header_only_table() {
        let runs = table(&["| a | b |"]);
        assert_eq!(text(&runs), "a\u{2003}b");
    }

    #[test]
    fn styled_runs_join_the_pending_cell() {
        let m = MonospaceMeasurer::new(1.0);
        let s = state();
        let mut t = InlineTable::open("| a | b |", &s);
        t.push_text("| a | ", &s.attributes(), &m);
        let mut styled = Run::new("bold", s.attributes());
        styled.attributes.underline = true;
        t.push_runs(vec![styled]);
        t.push_text(" |", &s.attributes(), &m);
        let runs = t.render(&m);
        assert_eq!(text(&runs), "a\u{2003}bold");
        assert!(runs.iter().any(|r| r.text == "bold" && r.attributes.underline));
    }
}
