use super::state::{ParagraphEdit, RenderState};
use crate::models::FontDescriptor;
use crate::style::{Style, TextMeasurer};

pub const BULLET: &str = "\u{2022}";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    Bullet,
    Ordered { start: u64 },
}

/// Marker geometry for one list.
#[derive(Debug, Clone, PartialEq)]
pub struct ListLayout {
    pub kind: ListKind,
    /// Head indent added for the list's items, in em
    pub step: f32,
    pub marker_font: FontDescriptor,
}

/// Ordered list marker text.
pub fn ordered_marker(number: u64) -> String {
    format!("{number}.")
}

impl ListLayout {
    pub fn bullet(style: &Style, state: &RenderState) -> Self {
        Self {
            kind: ListKind::Bullet,
            step: style.head_indent_step,
            marker_font: state.font.clone(),
        }
    }

    /// Sizes the indent step so the widest number fits.
    ///
    /// The step is the measured width of the highest marker plus the marker
    /// spacing, in em of the list's font, and never less than the bullet
    /// step so short lists line up with bullet lists.
    pub fn ordered(
        style: &Style,
        state: &RenderState,
        measurer: &dyn TextMeasurer,
        start: u64,
        count: usize,
    ) -> Self {
        let marker_font = state.font.with_monospaced_digits();
        let highest = start.saturating_add((count as u64).saturating_sub(1));
        let width = measurer.measure(&ordered_marker(highest), &marker_font);
        let size = state.font.size;
        let measured = if size > 0.0 { width / size } else { 0.0 };
        Self {
            kind: ListKind::Ordered { start },
            step: style
                .head_indent_step
                .max(measured + style.list_marker_spacing),
            marker_font,
        }
    }

    /// Marker edit for the item at `index`.
    pub fn marker(&self, index: usize) -> ParagraphEdit {
        let text = match self.kind {
            ListKind::Bullet => BULLET.to_string(),
            ListKind::Ordered { start } => {
                ordered_marker(start.saturating_add(index as u64))
            }
        };
        ParagraphEdit::Marker {
            text,
            font: self.marker_font.clone(),
        }
    }

    /// State shared by every item of the list.
    ///
    /// Markers sit between two tab stops: the parent's head indent and the
    /// new one. Tight lists drop the spacing between items, loose lists use
    /// the style's paragraph spacing whatever the parent had.
    pub fn item_state(&self, style: &Style, parent: &RenderState, tight: bool) -> RenderState {
        let mut state = parent.clone();
        let head = parent.head_indent + self.step;
        state.tab_stops.push(parent.head_indent);
        state.tab_stops.push(head);
        state.head_indent = head;
        state.paragraph_spacing = if tight { 0.0 } else { style.paragraph_spacing };
        state.depth += 1;
        state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::{Environment, MonospaceMeasurer};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn setup() -> (Style, RenderState) {
        let style = Style {
            default_font: FontDescriptor::new("Body", 10.0),
            ..Style::default()
        };
        let state = RenderState::new(&style, &Environment::default());
        (style, state)
    }

    #[rstest]
    #[case(1, 9, 1.5)]
    #[case(1, 12, 2.0)]
    #[case(99, 2, 2.5)]
    fn ordered_step_fits_highest_number(#[case] start: u64, #[case] count: usize, #[case] step: f32) {
        let (style, state) = setup();
        let layout = ListLayout::ordered(&style, &state, &MonospaceMeasurer::new(0.5), start, count);
        assert_eq!(layout.step, step);
        assert!(layout.marker_font.monospaced_digits);
    }

    #[test]
    fn markers_count_from_start() {
        let (style, state) = setup();
        let layout = ListLayout::ordered(&style, &state, &MonospaceMeasurer::new(0.5), 7, 3);
        let texts: Vec<String> = (0..3)
            .map(|i| match layout.marker(i) {
                ParagraphEdit::Marker { text, .. } => text,
                other => panic!("unexpected edit {other:?}"),
            })
            .collect();
        assert_eq!(texts, vec!["7.", "8.", "9."]);
    }

    #[test]
    fn bullet_markers_use_enclosing_font() {
        let (style, state) = setup();
        let layout = ListLayout::bullet(&style, &state);
        assert_eq!(
            layout.marker(4),
            ParagraphEdit::Marker {
                text: BULLET.into(),
                font: state.font.clone()
            }
        );
        assert_eq!(layout.step, style.head_indent_step);
    }

    #[test]
    fn item_state_adds_tab_stops_and_level() {
        let (style, mut state) = setup();
        state.head_indent = 1.0;
        let layout = ListLayout::bullet(&style, &state);

        let tight = layout.item_state(&style, &state, true);
        assert_eq!(tight.tab_stops, vec![1.0, 2.5]);
        assert_eq!(tight.head_indent, 2.5);
        assert_eq!(tight.paragraph_spacing, 0.0);
        assert_eq!(tight.depth, 1);

        let loose = layout.item_state(&style, &state, false);
        assert_eq!(loose.paragraph_spacing, style.paragraph_spacing);
    }

    #[test]
    fn loose_list_inside_tight_item_restores_spacing() {
        let (style, state) = setup();
        let outer = ListLayout::bullet(&style, &state).item_state(&style, &state, true);
        assert_eq!(outer.paragraph_spacing, 0.0);

        let inner = ListLayout::bullet(&style, &outer).item_state(&style, &outer, false);
        assert_eq!(inner.paragraph_spacing, style.paragraph_spacing);
    }
}
