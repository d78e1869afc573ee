use std::fmt::Write;

use markdown_richtext_engine::{Paragraph, RenderedDocument, Run};

/// Text dump of paragraphs, runs and images, one item per line.
pub fn dump(document: &RenderedDocument) -> String {
    let mut out = String::new();
    for (index, paragraph) in document.paragraphs.iter().enumerate() {
        dump_paragraph(&mut out, index, paragraph);
    }
    for image in &document.images {
        let _ = writeln!(
            out,
            "image {:?} alt={:?} size={:?}x{:?} in paragraph {}",
            image.source, image.alt, image.width, image.height, image.paragraph
        );
    }
    out
}

fn dump_paragraph(out: &mut String, index: usize, paragraph: &Paragraph) {
    let style = &paragraph.style;
    let _ = writeln!(
        out,
        "paragraph {index}: {:?} head={} tail={} after={} stops={:?}",
        style.alignment, style.head_indent, style.tail_indent, style.spacing_after, style.tab_stops
    );
    for run in &paragraph.runs {
        let _ = writeln!(out, "  {:?}{}", run.text, flags(run));
    }
}

fn flags(run: &Run) -> String {
    let attributes = &run.attributes;
    let font = &attributes.font;
    let mut flags = format!(" {}@{}", font.family, font.size);
    for (set, name) in [
        (font.bold, "bold"),
        (font.italic, "italic"),
        (font.monospaced, "mono"),
        (attributes.underline, "underline"),
        (attributes.strikethrough, "strike"),
    ] {
        if set {
            flags.push(' ');
            flags.push_str(name);
        }
    }
    let _ = write!(flags, " fg={}", attributes.foreground);
    if let Some(background) = attributes.background {
        let _ = write!(flags, " bg={background}");
    }
    if let Some(link) = &attributes.link {
        let _ = write!(flags, " link={link}");
    }
    flags
}
