use super::state::{ParagraphEdit, RenderState};
use crate::models::{Alignment, ParagraphStyle, Run};
use crate::style::Environment;

/// Builds the final paragraph attributes for a state.
///
/// Direction, alignment and line spacing are environment-wide; spacing,
/// indents and tab stops scale with the state's font size so indentation is
/// proportional to the text it holds. `alignment` overrides the environment
/// for centered scopes.
pub fn build_paragraph_style(
    state: &RenderState,
    environment: &Environment,
    alignment: Option<Alignment>,
) -> ParagraphStyle {
    let size = state.font.size;
    ParagraphStyle {
        alignment: alignment.unwrap_or(environment.alignment),
        writing_direction: environment.writing_direction,
        line_spacing: environment.line_spacing,
        spacing_before: 0.0,
        spacing_after: state.paragraph_spacing * size,
        head_indent: state.head_indent * size,
        tail_indent: state.tail_indent * size,
        tab_stops: state.tab_stops.iter().map(|stop| stop * size).collect(),
    }
}

/// Renders the queued edits as the literal runs that lead a paragraph.
pub fn edit_runs(state: &RenderState) -> Vec<Run> {
    state
        .edits
        .iter()
        .filter_map(|edit| match edit {
            ParagraphEdit::Indent(0) => None,
            ParagraphEdit::Indent(n) => Some(Run::new("\t".repeat(*n), state.attributes())),
            ParagraphEdit::Marker { text, font } => {
                let mut attributes = state.attributes();
                attributes.font = font.clone();
                Some(Run::new(format!("\t{text}\t"), attributes))
            }
        })
        .collect()
}

/// Merges neighbouring runs with identical attributes and drops empty ones.
pub fn coalesce(runs: Vec<Run>) -> Vec<Run> {
    let mut out: Vec<Run> = Vec::with_capacity(runs.len());
    for run in runs {
        if run.text.is_empty() {
            continue;
        }
        match out.last_mut() {
            Some(last) if last.attributes == run.attributes && last.alignment == run.alignment => {
                last.text.push_str(&run.text)
            }
            _ => out.push(run),
        }
    }
    out
}
