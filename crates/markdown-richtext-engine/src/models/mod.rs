pub mod color;
pub mod document;
pub mod font;
pub mod output;

pub use color::{Color, ColorParseError};
pub use document::{Block, Document, Inline, ListItem};
pub use font::FontDescriptor;
pub use output::{
    Alignment, ImageReference, Paragraph, ParagraphStyle, RenderedDocument, Run, TextAttributes,
    WritingDirection,
};
