//! Plain-text fallbacks for content nested deeper than the renderer follows.
//! Both walks use an explicit work list so input depth never reaches the
//! call stack.

use super::LINE_SEPARATOR;
use crate::models::{Block, Inline};

pub(crate) fn inline_text(inlines: &[Inline]) -> String {
    let mut out = String::new();
    let mut work: Vec<&Inline> = inlines.iter().rev().collect();
    while let Some(node) = work.pop() {
        match node {
            Inline::Text(t) | Inline::Code(t) | Inline::Html(t) => out.push_str(t),
            Inline::SoftBreak => out.push(' '),
            Inline::LineBreak => out.push(LINE_SEPARATOR),
            Inline::Image { .. } => {}
            structural => work.extend(structural.children().iter().rev()),
        }
    }
    out
}

/// Text of every leaf block, one per line.
pub(crate) fn blocks_text(blocks: &[Block]) -> String {
    let mut lines: Vec<String> = Vec::new();
    let mut work: Vec<&Block> = blocks.iter().rev().collect();
    while let Some(block) = work.pop() {
        match block {
            Block::Paragraph(content) | Block::Heading { content, .. } => {
                lines.push(inline_text(content))
            }
            Block::CodeBlock(text) | Block::HtmlBlock(text) => {
                lines.push(text.trim_end_matches('\n').to_string())
            }
            Block::ThematicBreak => {}
            Block::BlockQuote(children) => work.extend(children.iter().rev()),
            Block::BulletList { items, .. } | Block::OrderedList { items, .. } => work.extend(
                items
                    .iter()
                    .rev()
                    .flat_map(|item| item.blocks.iter().rev()),
            ),
        }
    }
    lines.join(&LINE_SEPARATOR.to_string())
}
