use super::lists::ListLayout;
use super::paragraph::{build_paragraph_style, coalesce, edit_runs};
use super::state::{ParagraphEdit, RenderState};
use super::{
    HTML_SENTINEL, LINE_SEPARATOR, MAX_BLOCK_DEPTH, NO_BREAK_SPACE, PARAGRAPH_SEPARATOR, Renderer,
    flatten,
};
use crate::models::{Alignment, Block, Inline, ListItem, Paragraph, RenderedDocument, Run};

impl<'a> Renderer<'a> {
    /// Renders sibling blocks. Only the first sibling sees the queued edits;
    /// later ones get their continuation.
    pub(crate) fn render_blocks(
        &self,
        blocks: &[Block],
        state: &RenderState,
        has_successor: bool,
        out: &mut RenderedDocument,
    ) {
        for (i, block) in blocks.iter().enumerate() {
            let block_state = if i == 0 { state.clone() } else { state.continued() };
            let successor = has_successor || i + 1 < blocks.len();
            self.render_block(block, &block_state, successor, out);
        }
    }

    fn render_block(
        &self,
        block: &Block,
        state: &RenderState,
        has_successor: bool,
        out: &mut RenderedDocument,
    ) {
        if block.is_container() && state.depth >= MAX_BLOCK_DEPTH {
            log::debug!("block nesting limit reached; flattening to text");
            let text = flatten::blocks_text(std::slice::from_ref(block));
            let runs = vec![Run::new(text, state.attributes())];
            self.emit_paragraphs(state, runs, has_successor, out);
            return;
        }

        match block {
            Block::Paragraph(content) => {
                self.render_inline_block(content, state, has_successor, out)
            }
            Block::Heading { level, content } => {
                let mut heading = state.with_font(
                    state
                        .font
                        .bold()
                        .scaled(self.style.heading_scale_for(*level)),
                );
                heading.paragraph_spacing = self.style.heading_spacing;
                self.render_inline_block(content, &heading, has_successor, out)
            }
            Block::BlockQuote(children) => {
                let mut quote = state.with_font(state.font.italic());
                quote.head_indent += self.style.head_indent_step;
                quote.tail_indent += self.style.tail_indent_step;
                quote.tab_stops.push(quote.head_indent);
                quote.edits.push(ParagraphEdit::Indent(1));
                quote.depth += 1;
                self.render_blocks(children, &quote, has_successor, out)
            }
            Block::BulletList { items, tight } => {
                let layout = ListLayout::bullet(self.style, state);
                self.render_list(&layout, items, *tight, state, has_successor, out)
            }
            Block::OrderedList {
                items,
                tight,
                start,
            } => {
                let layout =
                    ListLayout::ordered(self.style, state, self.measurer, *start, items.len());
                self.render_list(&layout, items, *tight, state, has_successor, out)
            }
            Block::CodeBlock(code) => {
                let code_state =
                    state.with_font(state.font.monospace().scaled(self.style.code_font_scale));
                let mut attributes = code_state.attributes();
                attributes.background = self.style.code_background;
                let normalized = code.replace("\r\n", "\n");
                let code = normalized.strip_suffix('\n').unwrap_or(&normalized);
                let text = code.replace('\n', &LINE_SEPARATOR.to_string());
                let runs = vec![Run::new(text, attributes)];
                self.emit_paragraphs(&code_state, runs, has_successor, out)
            }
            Block::HtmlBlock(raw) => {
                let content = self.recover_html_block(raw);
                self.render_inline_block(&content, state, has_successor, out)
            }
            Block::ThematicBreak => {
                let mut attributes = state.attributes();
                attributes.strikethrough = true;
                let runs = vec![Run::new(NO_BREAK_SPACE, attributes)];
                self.emit_paragraphs(state, runs, has_successor, out)
            }
        }
    }

    fn render_list(
        &self,
        layout: &ListLayout,
        items: &[ListItem],
        tight: bool,
        state: &RenderState,
        has_successor: bool,
        out: &mut RenderedDocument,
    ) {
        let list_state = layout.item_state(self.style, state, tight);
        let empty_item = [Block::Paragraph(Vec::new())];
        for (i, item) in items.iter().enumerate() {
            let item_state = if i == 0 {
                list_state.clone()
            } else {
                list_state.continued()
            };
            let blocks: &[Block] = if item.blocks.is_empty() {
                &empty_item
            } else {
                &item.blocks
            };
            for (j, block) in blocks.iter().enumerate() {
                let mut block_state = if j == 0 {
                    item_state.clone()
                } else {
                    item_state.continued()
                };
                block_state.edits.push(if j == 0 {
                    layout.marker(i)
                } else {
                    ParagraphEdit::Indent(2)
                });
                let successor = has_successor || i + 1 < items.len() || j + 1 < blocks.len();
                self.render_block(block, &block_state, successor, out);
            }
        }
    }

    /// Re-parses an HTML block with a sentinel prefix so it reads as one
    /// paragraph with inline HTML, then removes the sentinel. Block-level
    /// tags on their own line would start a new HTML block, so a second
    /// attempt joins the lines first.
    fn recover_html_block(&self, raw: &str) -> Vec<Inline> {
        let raw = raw.trim_end();
        let joined = join_html_lines(raw);
        for candidate in [raw, joined.as_str()] {
            if let Some(inlines) = self.reparse_as_paragraph(candidate) {
                return inlines;
            }
        }
        log::debug!("html block did not re-parse as one paragraph; keeping it literal");
        vec![Inline::Html(raw.to_string())]
    }

    fn reparse_as_paragraph(&self, raw: &str) -> Option<Vec<Inline>> {
        let document = self.parser.parse(&format!("{HTML_SENTINEL} {raw}"));
        let [Block::Paragraph(inlines)] = document.blocks.as_slice() else {
            return None;
        };
        let Some(Inline::Text(first)) = inlines.first() else {
            return None;
        };
        let rest = first.strip_prefix(HTML_SENTINEL)?.trim_start();
        let mut recovered = inlines.clone();
        if rest.is_empty() {
            recovered.remove(0);
        } else {
            recovered[0] = Inline::text(rest);
        }
        Some(recovered)
    }

    fn render_inline_block(
        &self,
        content: &[Inline],
        state: &RenderState,
        has_successor: bool,
        out: &mut RenderedDocument,
    ) {
        let first_image = out.images.len();
        let runs = self.render_inlines_into(content, state, &mut out.images);
        let paragraph = out.paragraphs.len();
        for image in &mut out.images[first_image..] {
            image.paragraph = paragraph;
        }
        self.emit_paragraphs(state, runs, has_successor, out);
    }

    /// Groups runs into paragraphs. Runs from centered scopes form their own
    /// paragraphs; the first paragraph carries the queued edits and every
    /// paragraph but the document's last ends with a separator.
    fn emit_paragraphs(
        &self,
        state: &RenderState,
        runs: Vec<Run>,
        has_successor: bool,
        out: &mut RenderedDocument,
    ) {
        let segments = split_by_alignment(runs);
        let last = segments.len().saturating_sub(1);
        for (k, (alignment, body)) in segments.into_iter().enumerate() {
            let mut paragraph_runs = if k == 0 { edit_runs(state) } else { Vec::new() };
            paragraph_runs.extend(body);
            if k < last || has_successor {
                paragraph_runs.push(Run::new(PARAGRAPH_SEPARATOR, state.attributes()));
            }
            out.paragraphs.push(Paragraph {
                style: build_paragraph_style(state, self.environment, alignment),
                runs: coalesce(paragraph_runs),
            });
        }
    }
}

/// Joins lines of an HTML block. Lines meeting at a tag are glued directly,
/// other line ends become a space.
fn join_html_lines(raw: &str) -> String {
    let mut joined = String::with_capacity(raw.len());
    for line in raw.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if !joined.is_empty() && !joined.ends_with('>') && !line.starts_with('<') {
            joined.push(' ');
        }
        joined.push_str(line);
    }
    joined
}

/// Splits runs where their requested alignment changes. Whitespace-only
/// segments between aligned ones are dropped.
fn split_by_alignment(runs: Vec<Run>) -> Vec<(Option<Alignment>, Vec<Run>)> {
    let mut segments: Vec<(Option<Alignment>, Vec<Run>)> = Vec::new();
    for mut run in runs {
        let alignment = run.alignment.take();
        match segments.last_mut() {
            Some((current, body)) if *current == alignment => body.push(run),
            _ => segments.push((alignment, vec![run])),
        }
    }
    if segments.len() > 1 {
        segments.retain(|(_, body)| body.iter().any(|r| !r.text.trim().is_empty()));
    }
    if segments.is_empty() {
        segments.push((None, Vec::new()));
    }
    segments
}
