//! Recognition of the closed set of HTML tags interpreted as pseudo-markup.
//!
//! A raw HTML inline is recognized only when its whole text is a single
//! well-formed tag from the vocabulary below; anything else is rendered
//! literally by the caller.
//!
//! | Tag | Meaning |
//! |-----|---------|
//! | `u`, `ins` | underline scope |
//! | `b`, `strong`, `i`, `em`, `span`, `font` | color/font scope |
//! | `a href` | link scope |
//! | `center`, `div align=center`, `p align=center` | centered scope |
//! | `h1`..`h6` | inline heading scope |
//! | `p`, `/p` | paragraph boundary |
//! | `br`, `hr`, `img`, `li`, `ul`, `ol` | void tags |

pub mod cursor;
pub mod style_attr;

pub use style_attr::{FontSize, StyleOverride};

use cursor::Cursor;

use super::scope::ScopeKind;

/// A tag that opens a scope.
#[derive(Debug, Clone, PartialEq)]
pub enum OpenTag {
    Underline,
    Bold,
    Italic,
    Styled(StyleOverride),
    Anchor { href: String },
    Center { opened_by: &'static str },
    Heading { level: u8, style: StyleOverride },
}

/// An `<img>` tag.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageTag {
    pub src: String,
    pub alt: String,
    pub width: Option<f32>,
    pub height: Option<f32>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PseudoTag {
    Open(OpenTag),
    Close(ScopeKind),
    /// `<p>` or `</p>`
    ParagraphBoundary { closing: bool },
    LineBreak,
    Rule,
    ListItemStart,
    /// `</li>`, `<ul>`, `</ul>`, `<ol>`, `</ol>`
    ListBoundary,
    Image(ImageTag),
}

/// A tag split into name and attributes.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RawTag {
    /// Lowercased tag name
    pub name: String,
    pub closing: bool,
    /// Lowercased attribute names with entity-decoded values
    pub attrs: Vec<(String, String)>,
}

impl RawTag {
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    fn centered(&self) -> bool {
        self.attr("align")
            .is_some_and(|a| a.eq_ignore_ascii_case("center"))
    }
}

/// Scans `source` as exactly one tag. Returns `None` when it is anything
/// else: text, a comment, several tags, or a malformed tag.
pub(crate) fn scan_tag(source: &str) -> Option<RawTag> {
    let mut cur = Cursor::new(source.trim());
    if cur.bump()? != b'<' {
        return None;
    }
    let closing = cur.eat(b'/');
    let name = cur.take_while(|b| b.is_ascii_alphanumeric());
    if name.is_empty() {
        return None;
    }

    let mut attrs = Vec::new();
    loop {
        cur.skip_whitespace();
        match cur.peek()? {
            b'>' => {
                cur.bump();
                break;
            }
            b'/' => {
                cur.bump();
                cur.skip_whitespace();
                if !cur.eat(b'>') {
                    return None;
                }
                break;
            }
            _ => {
                let key = cur.take_while(|b| {
                    !b.is_ascii_whitespace() && !matches!(b, b'=' | b'>' | b'/' | b'"' | b'\'')
                });
                if key.is_empty() {
                    return None;
                }
                cur.skip_whitespace();
                let value = if cur.eat(b'=') {
                    cur.skip_whitespace();
                    attribute_value(&mut cur)?
                } else {
                    ""
                };
                attrs.push((
                    key.to_ascii_lowercase(),
                    html_escape::decode_html_entities(value).into_owned(),
                ));
            }
        }
    }

    if !cur.eof() {
        return None;
    }
    Some(RawTag {
        name: name.to_ascii_lowercase(),
        closing,
        attrs,
    })
}

fn attribute_value<'a>(cur: &mut Cursor<'a>) -> Option<&'a str> {
    match cur.peek()? {
        quote @ (b'"' | b'\'') => {
            cur.bump();
            let value = cur.take_while(|b| b != quote);
            cur.eat(quote).then_some(value)
        }
        _ => Some(cur.take_while(|b| !b.is_ascii_whitespace() && b != b'>')),
    }
}

fn heading_level(name: &str) -> Option<u8> {
    let level = name.strip_prefix('h')?.parse::<u8>().ok()?;
    (1..=6).contains(&level).then_some(level)
}

/// Recognizes a raw inline HTML node as a pseudo-tag.
pub fn recognize(source: &str) -> Option<PseudoTag> {
    let tag = scan_tag(source)?;
    let name = tag.name.as_str();

    if tag.closing {
        return match name {
            "u" | "ins" => Some(PseudoTag::Close(ScopeKind::Underline)),
            "b" | "strong" | "i" | "em" | "span" | "font" => {
                Some(PseudoTag::Close(ScopeKind::ColorFont))
            }
            "a" => Some(PseudoTag::Close(ScopeKind::Link)),
            "center" | "div" => Some(PseudoTag::Close(ScopeKind::CenterParagraph)),
            "p" => Some(PseudoTag::ParagraphBoundary { closing: true }),
            "li" | "ul" | "ol" => Some(PseudoTag::ListBoundary),
            _ => heading_level(name).map(|_| PseudoTag::Close(ScopeKind::InlineHeading)),
        };
    }

    let open = |t| Some(PseudoTag::Open(t));
    match name {
        "u" | "ins" => open(OpenTag::Underline),
        "b" | "strong" => open(OpenTag::Bold),
        "i" | "em" => open(OpenTag::Italic),
        "span" => open(OpenTag::Styled(StyleOverride::from_style_attr(
            tag.attr("style").unwrap_or_default(),
        ))),
        "font" => open(OpenTag::Styled(StyleOverride::from_font_attrs(
            tag.attr("color"),
            tag.attr("size"),
            tag.attr("face"),
        ))),
        "a" => tag.attr("href").and_then(|href| {
            open(OpenTag::Anchor {
                href: href.to_string(),
            })
        }),
        "center" => open(OpenTag::Center {
            opened_by: "center",
        }),
        "div" if tag.centered() => open(OpenTag::Center { opened_by: "div" }),
        "p" if tag.centered() => open(OpenTag::Center { opened_by: "p" }),
        "p" => Some(PseudoTag::ParagraphBoundary { closing: false }),
        "br" => Some(PseudoTag::LineBreak),
        "hr" => Some(PseudoTag::Rule),
        "li" => Some(PseudoTag::ListItemStart),
        "ul" | "ol" => Some(PseudoTag::ListBoundary),
        "img" => {
            let src = tag.attr("src")?.to_string();
            let (query_width, query_height) = query_dimensions(&src);
            Some(PseudoTag::Image(ImageTag {
                alt: tag.attr("alt").unwrap_or_default().to_string(),
                width: tag.attr("width").and_then(parse_dimension).or(query_width),
                height: tag.attr("height").and_then(parse_dimension).or(query_height),
                src,
            }))
        }
        _ => heading_level(name).map(|level| {
            PseudoTag::Open(OpenTag::Heading {
                level,
                style: StyleOverride::from_style_attr(tag.attr("style").unwrap_or_default()),
            })
        }),
    }
}

fn parse_dimension(value: &str) -> Option<f32> {
    let value = value.trim();
    let number = value.strip_suffix("px").unwrap_or(value).trim();
    number.parse::<f32>().ok().filter(|n| *n > 0.0)
}

/// Reads `width` and `height` query parameters from an image source.
pub(crate) fn query_dimensions(src: &str) -> (Option<f32>, Option<f32>) {
    let Some((_, query)) = src.split_once('?') else {
        return (None, None);
    };
    let query = query.split('#').next().unwrap_or_default();
    let mut width = None;
    let mut height = None;
    for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
        match key.as_ref() {
            "width" | "w" => width = parse_dimension(&value),
            "height" | "h" => height = parse_dimension(&value),
            _ => {}
        }
    }
    (width, height)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Color;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("<u>", PseudoTag::Open(OpenTag::Underline))]
    #[case("<INS>", PseudoTag::Open(OpenTag::Underline))]
    #[case("<strong>", PseudoTag::Open(OpenTag::Bold))]
    #[case("<em>", PseudoTag::Open(OpenTag::Italic))]
    #[case("</u>", PseudoTag::Close(ScopeKind::Underline))]
    #[case("</span>", PseudoTag::Close(ScopeKind::ColorFont))]
    #[case("</b>", PseudoTag::Close(ScopeKind::ColorFont))]
    #[case("</a>", PseudoTag::Close(ScopeKind::Link))]
    #[case("</div>", PseudoTag::Close(ScopeKind::CenterParagraph))]
    #[case("</h3>", PseudoTag::Close(ScopeKind::InlineHeading))]
    #[case("<br>", PseudoTag::LineBreak)]
    #[case("<br/>", PseudoTag::LineBreak)]
    #[case("<br />", PseudoTag::LineBreak)]
    #[case("<hr>", PseudoTag::Rule)]
    #[case("<p>", PseudoTag::ParagraphBoundary { closing: false })]
    #[case("</p>", PseudoTag::ParagraphBoundary { closing: true })]
    #[case("<li>", PseudoTag::ListItemStart)]
    #[case("</ul>", PseudoTag::ListBoundary)]
    #[case("<center>", PseudoTag::Open(OpenTag::Center { opened_by: "center" }))]
    #[case("<div align=\"center\">", PseudoTag::Open(OpenTag::Center { opened_by: "div" }))]
    #[case("<p align=CENTER>", PseudoTag::Open(OpenTag::Center { opened_by: "p" }))]
    fn recognizes_vocabulary(#[case] source: &str, #[case] expected: PseudoTag) {
        assert_eq!(recognize(source), Some(expected));
    }

    #[rstest]
    #[case("<table>")]
    #[case("<div>")]
    #[case("<a name=\"x\">")]
    #[case("<img alt=\"no source\">")]
    #[case("<h7>")]
    #[case("<!-- comment -->")]
    #[case("<b>bold</b>")]
    #[case("<span style=\"color:red\"")]
    #[case("plain text")]
    #[case("<>")]
    fn rejects_everything_else(#[case] source: &str) {
        assert_eq!(recognize(source), None);
    }

    #[test]
    fn anchors_decode_entities() {
        assert_eq!(
            recognize("<a href='/search?q=a&amp;b=c'>"),
            Some(PseudoTag::Open(OpenTag::Anchor {
                href: "/search?q=a&b=c".into()
            }))
        );
    }

    #[test]
    fn span_carries_style_overrides() {
        let Some(PseudoTag::Open(OpenTag::Styled(style))) =
            recognize(r#"<span style="color: blue; font-weight: bold">"#)
        else {
            panic!("span not recognized");
        };
        assert_eq!(style.color, Some(Color::rgb(0, 0, 255)));
        assert_eq!(style.bold, Some(true));
    }

    #[test]
    fn font_tag_reads_legacy_attributes() {
        let Some(PseudoTag::Open(OpenTag::Styled(style))) =
            recognize(r#"<font color="green" size="+1" face="Georgia">"#)
        else {
            panic!("font not recognized");
        };
        assert_eq!(style.color, Some(Color::rgb(0, 128, 0)));
        assert_eq!(style.size, Some(FontSize::Scale(18.0 / 16.0)));
        assert_eq!(style.family.as_deref(), Some("Georgia"));
    }

    #[test]
    fn heading_tag_reads_color() {
        assert_eq!(
            recognize(r#"<h2 style="color:#ff0000">"#),
            Some(PseudoTag::Open(OpenTag::Heading {
                level: 2,
                style: StyleOverride {
                    color: Some(Color::rgb(255, 0, 0)),
                    ..StyleOverride::default()
                }
            }))
        );
    }

    #[test]
    fn image_dimensions_prefer_attributes_over_query() {
        assert_eq!(
            recognize(r#"<img src="pic.png?width=40&height=30" alt="A pic" width="100px">"#),
            Some(PseudoTag::Image(ImageTag {
                src: "pic.png?width=40&height=30".into(),
                alt: "A pic".into(),
                width: Some(100.0),
                height: Some(30.0),
            }))
        );
    }

    #[test]
    fn query_dimensions_ignore_fragment_and_unknown_keys() {
        assert_eq!(query_dimensions("a.png?w=12&x=1#top"), (Some(12.0), None));
        assert_eq!(query_dimensions("a.png"), (None, None));
    }

    #[test]
    fn scan_collects_attributes() {
        let tag = scan_tag(r#"<IMG SRC=a.png data-x='1' hidden>"#).expect("tag");
        assert_eq!(tag.name, "img");
        assert!(!tag.closing);
        assert_eq!(
            tag.attrs,
            vec![
                ("src".to_string(), "a.png".to_string()),
                ("data-x".to_string(), "1".to_string()),
                ("hidden".to_string(), String::new()),
            ]
        );
    }
}
