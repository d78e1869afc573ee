//! # Inline Rendering
//!
//! Renders a paragraph's inline nodes into styled runs. Markdown structure
//! (emphasis, links, code) maps onto attributes directly. Raw HTML nodes that
//! form one of the recognized pseudo-tags drive a scope stack instead:
//!
//! - an opening tag pushes a [`ScopeFrame`](scope::ScopeFrame) with a state
//!   derived from its parent
//! - literal nodes are appended to the innermost open scope
//! - a closing tag whose kind matches the top frame renders it and hands the
//!   runs to the frame below, or to the output or open table
//! - a closing tag that does not match the top frame is ignored
//! - frames still open at the end are finalized innermost first
//!
//! Lines between `|` separators outside any scope build an
//! [`InlineTable`](table::InlineTable) that is laid out when the paragraph
//! ends.
//!
//! ## Modules
//!
//! - **`scope`**: scope frames and their attribute overlays
//! - **`table`**: inline pipe tables
//! - **`tags`**: pseudo-tag recognition

pub mod scope;
pub mod table;
pub mod tags;

use scope::{Pending, ScopeFrame};
use table::{InlineTable, is_table_row};
use tags::{ImageTag, PseudoTag};

use super::state::RenderState;
use super::{LINE_SEPARATOR, MAX_INLINE_DEPTH, NO_BREAK_SPACE, Renderer, flatten};
use crate::models::{ImageReference, Inline, Run};

/// The inline state machine for one sequence of sibling nodes.
struct Machine<'m, 'a> {
    renderer: &'m Renderer<'a>,
    images: &'m mut Vec<ImageReference>,
    base: RenderState,
    depth: usize,
    scopes: Vec<ScopeFrame>,
    table: Option<InlineTable>,
    output: Vec<Run>,
    after_hard_break: bool,
}

impl<'a> Renderer<'a> {
    /// Renders inline content in `state`, returning the runs and the images
    /// met along the way.
    pub fn render_inlines(
        &self,
        inlines: &[Inline],
        state: &RenderState,
    ) -> (Vec<Run>, Vec<ImageReference>) {
        let mut images = Vec::new();
        let runs = self.render_inlines_into(inlines, state, &mut images);
        (runs, images)
    }

    pub(crate) fn render_inlines_into(
        &self,
        inlines: &[Inline],
        state: &RenderState,
        images: &mut Vec<ImageReference>,
    ) -> Vec<Run> {
        Machine::new(self, images, state.clone(), 0).run(inlines)
    }
}

impl<'m, 'a> Machine<'m, 'a> {
    fn new(
        renderer: &'m Renderer<'a>,
        images: &'m mut Vec<ImageReference>,
        base: RenderState,
        depth: usize,
    ) -> Self {
        Self {
            renderer,
            images,
            base,
            depth,
            scopes: Vec::new(),
            table: None,
            output: Vec::new(),
            after_hard_break: false,
        }
    }

    fn run(mut self, inlines: &[Inline]) -> Vec<Run> {
        for node in inlines {
            self.step(node);
        }
        self.finish()
    }

    fn step(&mut self, node: &Inline) {
        match node {
            Inline::Html(raw) => match tags::recognize(raw) {
                Some(tag) => self.handle_tag(tag),
                None => {
                    self.after_hard_break = false;
                    self.append_literal(node.clone());
                }
            },
            Inline::Text(text) => {
                let text = if self.after_hard_break {
                    text.trim_start()
                } else {
                    text.as_str()
                };
                if text.is_empty() {
                    return;
                }
                self.after_hard_break = false;
                if self.scopes.is_empty() && (self.table.is_some() || is_table_row(text)) {
                    self.table_text(text);
                } else {
                    self.append_literal(Inline::Text(text.to_string()));
                }
            }
            Inline::SoftBreak => {
                if self.after_hard_break {
                    return;
                }
                if self.scopes.is_empty()
                    && let Some(table) = self.table.as_mut()
                {
                    table.end_row(self.renderer.measurer);
                } else {
                    self.append_literal(Inline::SoftBreak);
                }
            }
            Inline::LineBreak => {
                if self.scopes.is_empty()
                    && let Some(table) = self.table.as_mut()
                {
                    table.end_row(self.renderer.measurer);
                } else {
                    self.append_literal(Inline::LineBreak);
                }
                self.after_hard_break = true;
            }
            other => {
                self.after_hard_break = false;
                self.append_literal(other.clone());
            }
        }
    }

    fn handle_tag(&mut self, tag: PseudoTag) {
        match tag {
            PseudoTag::Open(open) => {
                let parent = self.current_state();
                let renderer = self.renderer;
                let frame = ScopeFrame::open(open, parent, renderer.style, |href| {
                    renderer.resolve_url(href)
                });
                log::trace!("opening {:?} scope", frame.kind());
                self.scopes.push(frame);
            }
            PseudoTag::Close(kind) => match self.scopes.last() {
                Some(top) if top.kind() == kind => self.close_top(),
                _ => log::debug!("ignoring closing tag without a matching {kind:?} scope"),
            },
            PseudoTag::ParagraphBoundary { closing: true }
                if self.scopes.last().is_some_and(ScopeFrame::opened_by_paragraph) =>
            {
                self.close_top()
            }
            PseudoTag::ParagraphBoundary { .. } => {
                if !self.target_is_empty() {
                    let separator = self.styled(LINE_SEPARATOR.to_string());
                    self.append_runs(vec![separator]);
                }
                self.after_hard_break = true;
            }
            PseudoTag::LineBreak => self.step(&Inline::LineBreak),
            PseudoTag::Rule => {
                let mut rule = self.styled(NO_BREAK_SPACE.to_string());
                rule.attributes.strikethrough = true;
                let runs = vec![
                    self.styled(LINE_SEPARATOR.to_string()),
                    rule,
                    self.styled(LINE_SEPARATOR.to_string()),
                ];
                self.append_runs(runs);
                self.after_hard_break = true;
            }
            PseudoTag::ListItemStart => {
                let mut runs = Vec::new();
                if !self.target_is_empty() {
                    runs.push(self.styled(LINE_SEPARATOR.to_string()));
                }
                runs.push(self.styled(format!("{} ", super::lists::BULLET)));
                self.append_runs(runs);
                self.after_hard_break = true;
            }
            PseudoTag::ListBoundary => {}
            PseudoTag::Image(image) => self.record_image_tag(image),
        }
    }

    fn current_state(&self) -> &RenderState {
        self.scopes.last().map_or(&self.base, |frame| &frame.state)
    }

    fn styled(&self, text: String) -> Run {
        Run::new(text, self.current_state().attributes())
    }

    fn target_is_empty(&self) -> bool {
        match self.scopes.last() {
            Some(frame) => frame.is_empty(),
            None => self.table.is_none() && self.output.is_empty(),
        }
    }

    fn table_text(&mut self, text: &str) {
        let attributes = self.base.attributes();
        let measurer = self.renderer.measurer;
        let table = self
            .table
            .get_or_insert_with(|| InlineTable::open(text, &self.base));
        table.push_text(text, &attributes, measurer);
    }

    /// Appends a literal node to the innermost target.
    fn append_literal(&mut self, node: Inline) {
        match self.scopes.last_mut() {
            Some(frame) => frame.children.push(Pending::Node(node)),
            None => {
                let base = self.base.clone();
                let runs = self.render_leaf(&node, &base);
                self.emit(runs);
            }
        }
    }

    /// Appends rendered runs to the innermost target.
    fn append_runs(&mut self, runs: Vec<Run>) {
        match self.scopes.last_mut() {
            Some(frame) => frame.children.push(Pending::Runs(runs)),
            None => self.emit(runs),
        }
    }

    /// Delivers runs when no scope is open.
    fn emit(&mut self, runs: Vec<Run>) {
        match self.table.as_mut() {
            Some(table) => table.push_runs(runs),
            None => self.output.extend(runs),
        }
    }

    fn close_top(&mut self) {
        if let Some(frame) = self.scopes.pop() {
            let runs = self.finalize(frame);
            self.append_runs(runs);
        }
    }

    fn finalize(&mut self, frame: ScopeFrame) -> Vec<Run> {
        let mut runs = Vec::new();
        for child in &frame.children {
            match child {
                Pending::Node(node) => runs.extend(self.render_leaf(node, &frame.state)),
                Pending::Runs(rendered) => runs.extend(rendered.iter().cloned()),
            }
        }
        frame.overlay(&mut runs);
        if frame.kind() == scope::ScopeKind::InlineHeading {
            runs.push(Run::new(LINE_SEPARATOR.to_string(), frame.state.attributes()));
            self.after_hard_break = true;
        }
        runs
    }

    fn finish(mut self) -> Vec<Run> {
        while let Some(frame) = self.scopes.pop() {
            log::debug!("closing unterminated {:?} scope", frame.kind());
            let runs = self.finalize(frame);
            self.append_runs(runs);
        }
        if let Some(table) = self.table.take() {
            let runs = table.render(self.renderer.measurer);
            self.output.extend(runs);
        }
        self.output
    }

    /// Renders one node in `state`. Structural nodes recurse into a fresh
    /// machine; pseudo-tags inside them pair up among themselves.
    fn render_leaf(&mut self, node: &Inline, state: &RenderState) -> Vec<Run> {
        let style = self.renderer.style;
        match node {
            Inline::Text(text) | Inline::Html(text) => {
                vec![Run::new(text.clone(), state.attributes())]
            }
            Inline::SoftBreak => vec![Run::new(" ", state.attributes())],
            Inline::LineBreak => vec![Run::new(LINE_SEPARATOR.to_string(), state.attributes())],
            Inline::Code(code) => {
                let mut attributes = state
                    .with_font(state.font.monospace().scaled(style.code_font_scale))
                    .attributes();
                attributes.background = style.code_background;
                vec![Run::new(code.clone(), attributes)]
            }
            Inline::Emphasis(children) => {
                self.render_nested(children, &state.with_font(state.font.italic()))
            }
            Inline::Strong(children) => {
                self.render_nested(children, &state.with_font(state.font.bold()))
            }
            Inline::Link { dest, children } => {
                let link_state = match style.link_color {
                    Some(color) => state.with_color(color),
                    None => state.clone(),
                };
                let target = self.renderer.resolve_url(dest);
                let mut runs = self.render_nested(children, &link_state);
                for run in &mut runs {
                    run.attributes.link.get_or_insert_with(|| target.clone());
                }
                runs
            }
            Inline::Image { source, children } => {
                let (width, height) = tags::query_dimensions(source);
                self.images.push(ImageReference {
                    source: self.renderer.resolve_url(source),
                    alt: flatten::inline_text(children),
                    width,
                    height,
                    paragraph: 0,
                });
                Vec::new()
            }
        }
    }

    fn render_nested(&mut self, children: &[Inline], state: &RenderState) -> Vec<Run> {
        if self.depth + 1 >= MAX_INLINE_DEPTH {
            log::debug!("inline nesting limit reached; flattening to text");
            return vec![Run::new(flatten::inline_text(children), state.attributes())];
        }
        Machine::new(self.renderer, &mut *self.images, state.clone(), self.depth + 1).run(children)
    }

    fn record_image_tag(&mut self, image: ImageTag) {
        self.images.push(ImageReference {
            source: self.renderer.resolve_url(&image.src),
            alt: image.alt,
            width: image.width,
            height: image.height,
            paragraph: 0,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Alignment, Color, FontDescriptor};
    use crate::style::{Environment, MonospaceMeasurer, Style};
    use pretty_assertions::assert_eq;
    use url::Url;

    fn style() -> Style {
        Style {
            default_font: FontDescriptor::new("Body", 10.0),
            ..Style::default()
        }
    }

    fn render_with(style: &Style, base: Option<&str>, inlines: &[Inline]) -> (Vec<Run>, Vec<ImageReference>) {
        let environment = Environment::default();
        let measurer = MonospaceMeasurer::new(1.0);
        let mut renderer = Renderer::new(style, &environment, &measurer);
        if let Some(base) = base {
            renderer = renderer.with_base_url(Url::parse(base).expect("base url"));
        }
        let state = renderer.initial_state();
        renderer.render_inlines(inlines, &state)
    }

    fn render(inlines: &[Inline]) -> Vec<Run> {
        render_with(&style(), None, inlines).0
    }

    fn text(runs: &[Run]) -> String {
        runs.iter().map(|r| r.text.as_str()).collect()
    }

    fn html(s: &str) -> Inline {
        Inline::html(s)
    }

    fn t(s: &str) -> Inline {
        Inline::text(s)
    }

    #[test]
    fn underline_scope_marks_its_content() {
        let runs = render(&[t("a "), html("<u>"), t("b"), html("</u>"), t(" c")]);
        assert_eq!(text(&runs), "a b c");
        let underlined: Vec<_> = runs.iter().filter(|r| r.attributes.underline).collect();
        assert_eq!(underlined.len(), 1);
        assert_eq!(underlined[0].text, "b");
    }

    #[test]
    fn nested_scopes_combine_attributes() {
        let runs = render(&[
            html(r#"<span style="color:red">"#),
            html("<b>"),
            t("text"),
            html("</b>"),
            html("</span>"),
        ]);
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].text, "text");
        assert!(runs[0].attributes.font.bold);
        assert_eq!(runs[0].attributes.foreground, Color::rgb(255, 0, 0));
    }

    #[test]
    fn mismatched_closer_is_ignored() {
        let runs = render(&[html("<u>"), t("x"), html("</span>"), t("y"), html("</u>")]);
        assert_eq!(text(&runs), "xy");
        assert!(runs.iter().all(|r| r.attributes.underline));
    }

    #[test]
    fn dangling_closer_drops_nothing() {
        let runs = render(&[t("a"), html("</b>"), t("b")]);
        assert_eq!(text(&runs), "ab");
    }

    #[test]
    fn unterminated_scopes_are_finalized_at_end() {
        let runs = render(&[t("a"), html("<u>"), t("b"), html("<b>"), t("c")]);
        assert_eq!(text(&runs), "abc");
        let c = runs.iter().find(|r| r.text == "c").expect("c run");
        assert!(c.attributes.underline);
        assert!(c.attributes.font.bold);
    }

    #[test]
    fn unrecognized_html_is_literal() {
        let runs = render(&[html("<table>"), t("x"), html("<!-- note -->")]);
        assert_eq!(text(&runs), "<table>x<!-- note -->");
    }

    #[test]
    fn anchors_resolve_against_base_url() {
        let (runs, _) = render_with(
            &style(),
            Some("https://example.com/docs/"),
            &[html(r#"<a href="page.html">"#), t("go"), html("</a>")],
        );
        assert_eq!(
            runs[0].attributes.link.as_deref(),
            Some("https://example.com/docs/page.html")
        );
        assert_eq!(Some(runs[0].attributes.foreground), style().link_color);
    }

    #[test]
    fn markdown_link_inside_anchor_keeps_its_own_target() {
        let runs = render(&[
            html(r#"<a href="https://outer.example/">"#),
            Inline::Link {
                dest: "https://inner.example/".into(),
                children: vec![t("in")],
            },
            t("out"),
            html("</a>"),
        ]);
        assert_eq!(runs[0].attributes.link.as_deref(), Some("https://inner.example/"));
        assert_eq!(runs[1].attributes.link.as_deref(), Some("https://outer.example/"));
    }

    #[test]
    fn center_scope_marks_alignment() {
        let runs = render(&[t("a"), html("<center>"), t("b"), html("</center>")]);
        assert_eq!(runs[0].alignment, None);
        assert_eq!(runs[1].alignment, Some(Alignment::Center));
    }

    #[test]
    fn paragraph_closer_ends_centered_paragraph_scope() {
        let runs = render(&[html(r#"<p align="center">"#), t("mid"), html("</p>"), t("after")]);
        assert_eq!(text(&runs), "midafter");
        assert_eq!(runs[0].alignment, Some(Alignment::Center));
        assert_eq!(runs[1].alignment, None);
    }

    #[test]
    fn inline_heading_ends_with_a_line_break() {
        let runs = render(&[html("<h2>"), t("Title"), html("</h2>"), t("  body")]);
        assert_eq!(text(&runs), "Title\u{2028}body");
        assert!(runs[0].attributes.font.bold);
        assert!(runs[0].attributes.font.size > 10.0);
    }

    #[test]
    fn hard_break_strips_following_whitespace() {
        let runs = render(&[t("a"), Inline::LineBreak, t("   b"), html("<br>"), Inline::SoftBreak, t(" c")]);
        assert_eq!(text(&runs), "a\u{2028}b\u{2028}c");
    }

    #[test]
    fn paragraph_tags_separate_only_after_content() {
        let runs = render(&[html("<p>"), t("one"), html("</p>"), html("<p>"), t("two")]);
        // a closer and the next opener each separate
        assert_eq!(text(&runs), "one\u{2028}\u{2028}two");
    }

    #[test]
    fn list_item_tags_become_bullets() {
        let runs = render(&[html("<ul>"), html("<li>"), t("a"), html("</li>"), html("<li>"), t("b"), html("</ul>")]);
        assert_eq!(text(&runs), "\u{2022} a\u{2028}\u{2022} b");
    }

    #[test]
    fn rule_tag_draws_struck_space() {
        let runs = render(&[t("a"), html("<hr>"), t("b")]);
        assert_eq!(text(&runs), "a\u{2028}\u{00A0}\u{2028}b");
        assert!(runs[2].attributes.strikethrough);
    }

    #[test]
    fn images_are_collected_not_drawn() {
        let (runs, images) = render_with(
            &style(),
            Some("https://cdn.example/"),
            &[
                t("see "),
                Inline::Image {
                    source: "a.png?width=10".into(),
                    children: vec![t("first")],
                },
                html(r#"<img src="/b.png" alt="second" height="5">"#),
            ],
        );
        assert_eq!(text(&runs), "see ");
        assert_eq!(images.len(), 2);
        assert_eq!(images[0].source, "https://cdn.example/a.png?width=10");
        assert_eq!(images[0].alt, "first");
        assert_eq!(images[0].width, Some(10.0));
        assert_eq!(images[1].source, "https://cdn.example/b.png");
        assert_eq!(images[1].height, Some(5.0));
    }

    #[test]
    fn code_uses_monospace_and_background() {
        let style = Style {
            code_background: Some(Color::rgb(9, 9, 9)),
            ..style()
        };
        let (runs, _) = render_with(&style, None, &[Inline::Code("x".into())]);
        assert!(runs[0].attributes.font.monospaced);
        assert_eq!(runs[0].attributes.background, Some(Color::rgb(9, 9, 9)));
        assert_eq!(runs[0].attributes.font.size, 10.0 * style.code_font_scale);
    }

    #[test]
    fn table_inside_paragraph() {
        let runs = render(&[
            t("| a | b |"),
            Inline::SoftBreak,
            t("|---|---:|"),
            Inline::SoftBreak,
            t("| x | "),
            html("<u>"),
            t("y"),
            html("</u>"),
            t(" |"),
        ]);
        assert_eq!(text(&runs), "a\u{2003}b\u{2028}x\u{2003}y");
        let y = runs.iter().find(|r| r.text == "y").expect("y run");
        assert!(y.attributes.underline);
    }

    #[test]
    fn deep_emphasis_is_flattened() {
        let mut node = t("deep");
        for _ in 0..(MAX_INLINE_DEPTH * 2) {
            node = Inline::Strong(vec![node]);
        }
        let runs = render(&[node]);
        assert_eq!(text(&runs), "deep");
    }

    #[test]
    fn span_background_applies_to_inner_runs() {
        let runs = render(&[
            html(r#"<span style="background-color: yellow">"#),
            t("a"),
            html(r#"<span style="background-color: blue">"#),
            t("b"),
            html("</span>"),
            html("</span>"),
        ]);
        assert_eq!(runs[0].attributes.background, Some(Color::rgb(255, 255, 0)));
        assert_eq!(runs[1].attributes.background, Some(Color::rgb(0, 0, 255)));
    }
}
