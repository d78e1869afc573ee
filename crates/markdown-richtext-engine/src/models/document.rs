/// A parsed markdown document: the input to the renderer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    pub blocks: Vec<Block>,
}

impl Document {
    pub fn new(blocks: Vec<Block>) -> Self {
        Self { blocks }
    }
}

/// Block-level elements of a document.
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    /// Paragraph with inline content
    Paragraph(Vec<Inline>),
    /// Heading with level (1-6) and inline content
    Heading { level: u8, content: Vec<Inline> },
    /// Block quote containing nested blocks
    BlockQuote(Vec<Block>),
    /// Unordered list
    BulletList { items: Vec<ListItem>, tight: bool },
    /// Ordered list numbered from `start`
    OrderedList {
        items: Vec<ListItem>,
        tight: bool,
        start: u64,
    },
    /// Literal code; markup is not interpreted inside
    CodeBlock(String),
    /// Raw HTML block
    HtmlBlock(String),
    /// Horizontal rule
    ThematicBreak,
}

impl Block {
    /// True for blocks that contain other blocks.
    pub fn is_container(&self) -> bool {
        matches!(
            self,
            Block::BlockQuote(_) | Block::BulletList { .. } | Block::OrderedList { .. }
        )
    }
}

/// A list item containing block elements
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListItem {
    pub blocks: Vec<Block>,
}

impl ListItem {
    pub fn new(blocks: Vec<Block>) -> Self {
        Self { blocks }
    }
}

/// Inline content nodes.
#[derive(Debug, Clone, PartialEq)]
pub enum Inline {
    Text(String),
    /// Line ending inside a paragraph, rendered as a space
    SoftBreak,
    /// Hard line break
    LineBreak,
    Code(String),
    /// Raw inline HTML. A closed set of tags is interpreted as pseudo-markup,
    /// everything else renders literally.
    Html(String),
    Emphasis(Vec<Inline>),
    Strong(Vec<Inline>),
    Link { dest: String, children: Vec<Inline> },
    Image { source: String, children: Vec<Inline> },
}

impl Inline {
    pub fn text(s: impl Into<String>) -> Self {
        Inline::Text(s.into())
    }

    pub fn html(s: impl Into<String>) -> Self {
        Inline::Html(s.into())
    }

    /// Children of structural nodes, empty for leaves.
    pub fn children(&self) -> &[Inline] {
        match self {
            Inline::Emphasis(children)
            | Inline::Strong(children)
            | Inline::Link { children, .. }
            | Inline::Image { children, .. } => children,
            _ => &[],
        }
    }
}
