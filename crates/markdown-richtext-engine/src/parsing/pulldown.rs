use pulldown_cmark::{Event, HeadingLevel, Options, Parser, Tag, TagEnd};

use super::MarkdownParser;
use crate::models::{Block, Document, Inline, ListItem};

/// [`MarkdownParser`] backed by `pulldown-cmark`.
///
/// Only CommonMark is enabled: pipe tables stay plain text so the inline
/// table engine can lay them out, and raw HTML is kept for the pseudo-tag
/// recognizer.
#[derive(Debug, Clone, Copy, Default)]
pub struct PulldownParser;

impl MarkdownParser for PulldownParser {
    fn parse(&self, markdown: &str) -> Document {
        let mut builder = TreeBuilder::default();
        for event in Parser::new_ext(markdown, Options::empty()) {
            builder.event(event);
        }
        Document::new(builder.finish())
    }
}

enum InlineKind {
    /// `implicit` paragraphs wrap the bare text of tight list items
    Paragraph { implicit: bool },
    Heading(u8),
    Emphasis,
    Strong,
    Link(String),
    Image(String),
}

enum Frame {
    Quote(Vec<Block>),
    List {
        start: Option<u64>,
        items: Vec<ListItem>,
        tight: bool,
    },
    Item(Vec<Block>),
    Inline {
        kind: InlineKind,
        children: Vec<Inline>,
    },
    Code(String),
    Html(String),
}

#[derive(Default)]
struct TreeBuilder {
    blocks: Vec<Block>,
    stack: Vec<Frame>,
}

impl TreeBuilder {
    fn event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(tag) => self.end(tag),
            Event::Text(text) => match self.stack.last_mut() {
                Some(Frame::Code(code)) => code.push_str(&text),
                Some(Frame::Html(raw)) => raw.push_str(&text),
                _ => self.push_inline(Inline::Text(text.into_string())),
            },
            Event::Code(code) => self.push_inline(Inline::Code(code.into_string())),
            Event::Html(html) => match self.stack.last_mut() {
                Some(Frame::Html(raw)) => raw.push_str(&html),
                _ => self.push_inline(Inline::Html(html.into_string())),
            },
            Event::InlineHtml(html) => self.push_inline(Inline::Html(html.into_string())),
            Event::SoftBreak => self.push_inline(Inline::SoftBreak),
            Event::HardBreak => self.push_inline(Inline::LineBreak),
            Event::Rule => self.push_block(Block::ThematicBreak),
            _ => {}
        }
    }

    fn start(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Paragraph => {
                self.close_implicit_paragraph();
                if matches!(self.stack.last(), Some(Frame::Item(_))) {
                    self.mark_list_loose();
                }
                self.stack.push(Frame::Inline {
                    kind: InlineKind::Paragraph { implicit: false },
                    children: Vec::new(),
                });
            }
            Tag::Heading { level, .. } => {
                self.close_implicit_paragraph();
                self.stack.push(Frame::Inline {
                    kind: InlineKind::Heading(heading_level_to_u8(level)),
                    children: Vec::new(),
                });
            }
            Tag::BlockQuote(_) => {
                self.close_implicit_paragraph();
                self.stack.push(Frame::Quote(Vec::new()));
            }
            Tag::CodeBlock(_) => {
                self.close_implicit_paragraph();
                self.stack.push(Frame::Code(String::new()));
            }
            Tag::HtmlBlock => {
                self.close_implicit_paragraph();
                self.stack.push(Frame::Html(String::new()));
            }
            Tag::List(start) => {
                self.close_implicit_paragraph();
                self.stack.push(Frame::List {
                    start,
                    items: Vec::new(),
                    tight: true,
                });
            }
            Tag::Item => self.stack.push(Frame::Item(Vec::new())),
            Tag::Emphasis => self.open_inline(InlineKind::Emphasis),
            Tag::Strong => self.open_inline(InlineKind::Strong),
            Tag::Link { dest_url, .. } => self.open_inline(InlineKind::Link(dest_url.into_string())),
            Tag::Image { dest_url, .. } => {
                self.open_inline(InlineKind::Image(dest_url.into_string()))
            }
            _ => {}
        }
    }

    fn end(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph | TagEnd::Heading(_) => {
                if let Some(Frame::Inline { kind, children }) = self.stack.pop() {
                    let block = match kind {
                        InlineKind::Heading(level) => Block::Heading {
                            level,
                            content: children,
                        },
                        _ => Block::Paragraph(children),
                    };
                    self.push_block(block);
                }
            }
            TagEnd::BlockQuote(_) => {
                self.close_implicit_paragraph();
                if let Some(Frame::Quote(blocks)) = self.stack.pop() {
                    self.push_block(Block::BlockQuote(blocks));
                }
            }
            TagEnd::CodeBlock => {
                if let Some(Frame::Code(text)) = self.stack.pop() {
                    self.push_block(Block::CodeBlock(text));
                }
            }
            TagEnd::HtmlBlock => {
                if let Some(Frame::Html(raw)) = self.stack.pop() {
                    self.push_block(Block::HtmlBlock(raw));
                }
            }
            TagEnd::List(_) => {
                if let Some(Frame::List {
                    start,
                    items,
                    tight,
                }) = self.stack.pop()
                {
                    let block = match start {
                        Some(start) => Block::OrderedList {
                            items,
                            tight,
                            start,
                        },
                        None => Block::BulletList { items, tight },
                    };
                    self.push_block(block);
                }
            }
            TagEnd::Item => {
                self.close_implicit_paragraph();
                if let Some(Frame::Item(blocks)) = self.stack.pop()
                    && let Some(Frame::List { items, .. }) = self.stack.last_mut()
                {
                    items.push(ListItem::new(blocks));
                }
            }
            TagEnd::Emphasis | TagEnd::Strong | TagEnd::Link | TagEnd::Image => {
                if let Some(Frame::Inline { kind, children }) = self.stack.pop() {
                    let node = match kind {
                        InlineKind::Emphasis => Inline::Emphasis(children),
                        InlineKind::Strong => Inline::Strong(children),
                        InlineKind::Link(dest) => Inline::Link { dest, children },
                        InlineKind::Image(source) => Inline::Image { source, children },
                        kind @ (InlineKind::Paragraph { .. } | InlineKind::Heading(_)) => {
                            self.stack.push(Frame::Inline { kind, children });
                            return;
                        }
                    };
                    self.push_inline(node);
                }
            }
            _ => {}
        }
    }

    fn open_inline(&mut self, kind: InlineKind) {
        self.ensure_inline_frame();
        self.stack.push(Frame::Inline {
            kind,
            children: Vec::new(),
        });
    }

    fn push_inline(&mut self, node: Inline) {
        self.ensure_inline_frame();
        if let Some(Frame::Inline { children, .. }) = self.stack.last_mut() {
            // pulldown-cmark splits text at brackets and escapes; keep it whole
            // so pipe rows reach the table engine as one node
            match (children.last_mut(), node) {
                (Some(Inline::Text(prev)), Inline::Text(text)) => prev.push_str(&text),
                (_, node) => children.push(node),
            }
        }
    }

    fn ensure_inline_frame(&mut self) {
        if !matches!(self.stack.last(), Some(Frame::Inline { .. })) {
            self.stack.push(Frame::Inline {
                kind: InlineKind::Paragraph { implicit: true },
                children: Vec::new(),
            });
        }
    }

    fn close_implicit_paragraph(&mut self) {
        if matches!(
            self.stack.last(),
            Some(Frame::Inline {
                kind: InlineKind::Paragraph { implicit: true },
                ..
            })
        ) && let Some(Frame::Inline { children, .. }) = self.stack.pop()
        {
            self.push_block(Block::Paragraph(children));
        }
    }

    fn push_block(&mut self, block: Block) {
        match self.stack.last_mut() {
            Some(Frame::Quote(blocks)) | Some(Frame::Item(blocks)) => blocks.push(block),
            _ => self.blocks.push(block),
        }
    }

    fn mark_list_loose(&mut self) {
        if let Some(Frame::List { tight, .. }) = self
            .stack
            .iter_mut()
            .rev()
            .find(|f| matches!(f, Frame::List { .. }))
        {
            *tight = false;
        }
    }

    fn finish(mut self) -> Vec<Block> {
        self.close_implicit_paragraph();
        self.blocks
    }
}

fn heading_level_to_u8(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}
