use super::tags::OpenTag;
use crate::models::{Alignment, Color, Inline, Run};
use crate::rendering::state::RenderState;
use crate::style::Style;

/// Discriminant of a scope; a closing tag only finalizes a scope of the
/// same kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    Underline,
    ColorFont,
    CenterParagraph,
    InlineHeading,
    Link,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum ScopePayload {
    Underline,
    ColorFont { background: Option<Color> },
    CenterParagraph { opened_by: &'static str },
    InlineHeading,
    Link { target: String },
}

/// Content accumulated by an open scope, in order.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Pending {
    /// A literal node, rendered with the scope's state at finalization
    Node(Inline),
    /// Output of a nested scope or void tag, already rendered
    Runs(Vec<Run>),
}

/// One entry of the inline scope stack.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ScopeFrame {
    pub payload: ScopePayload,
    /// State the scope's content is rendered in
    pub state: RenderState,
    pub children: Vec<Pending>,
}

impl ScopeFrame {
    /// Opens a scope under `parent`. `resolve` turns an anchor's href into
    /// a link target.
    pub fn open(
        tag: OpenTag,
        parent: &RenderState,
        style: &Style,
        resolve: impl Fn(&str) -> String,
    ) -> Self {
        let (payload, state) = match tag {
            OpenTag::Underline => (ScopePayload::Underline, parent.clone()),
            OpenTag::Bold => (
                ScopePayload::ColorFont { background: None },
                parent.with_font(parent.font.bold()),
            ),
            OpenTag::Italic => (
                ScopePayload::ColorFont { background: None },
                parent.with_font(parent.font.italic()),
            ),
            OpenTag::Styled(overrides) => (
                ScopePayload::ColorFont {
                    background: overrides.background,
                },
                overrides.apply(parent),
            ),
            OpenTag::Anchor { href } => {
                let state = match style.link_color {
                    Some(color) => parent.with_color(color),
                    None => parent.clone(),
                };
                (
                    ScopePayload::Link {
                        target: resolve(&href),
                    },
                    state,
                )
            }
            OpenTag::Center { opened_by } => {
                (ScopePayload::CenterParagraph { opened_by }, parent.clone())
            }
            OpenTag::Heading { level, style: overrides } => {
                let heading = parent.with_font(
                    parent.font.bold().scaled(style.heading_scale_for(level)),
                );
                (ScopePayload::InlineHeading, overrides.apply(&heading))
            }
        };
        Self {
            payload,
            state,
            children: Vec::new(),
        }
    }

    pub fn kind(&self) -> ScopeKind {
        match self.payload {
            ScopePayload::Underline => ScopeKind::Underline,
            ScopePayload::ColorFont { .. } => ScopeKind::ColorFont,
            ScopePayload::CenterParagraph { .. } => ScopeKind::CenterParagraph,
            ScopePayload::InlineHeading => ScopeKind::InlineHeading,
            ScopePayload::Link { .. } => ScopeKind::Link,
        }
    }

    /// True for a centered scope opened by `<p align=center>`, which `</p>`
    /// closes.
    pub fn opened_by_paragraph(&self) -> bool {
        matches!(
            self.payload,
            ScopePayload::CenterParagraph { opened_by: "p" }
        )
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Applies the scope's own attributes to its rendered content. Runs that
    /// already carry the attribute from an inner scope keep it.
    pub fn overlay(&self, runs: &mut [Run]) {
        match &self.payload {
            ScopePayload::Underline => {
                for run in runs {
                    run.attributes.underline = true;
                }
            }
            ScopePayload::ColorFont { background: Some(bg) } => {
                for run in runs {
                    run.attributes.background.get_or_insert(*bg);
                }
            }
            ScopePayload::ColorFont { background: None } | ScopePayload::InlineHeading => {}
            ScopePayload::CenterParagraph { .. } => {
                for run in runs {
                    run.alignment.get_or_insert(Alignment::Center);
                }
            }
            ScopePayload::Link { target } => {
                for run in runs {
                    run.attributes
                        .link
                        .get_or_insert_with(|| target.clone());
                }
            }
        }
    }
}
