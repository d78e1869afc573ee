// Benchmark helper functions - Rust's dead code analysis doesn't understand
// that these are used by benchmark files in the same directory
// See: https://users.rust-lang.org/t/cargo-rustc-benches-awarnings/110111/2
#[allow(dead_code)]
pub fn generate_markdown_content(size: usize) -> String {
    let base = "# Title\n\n## Section\n\nParagraph with *some* **content** and a [link](page.html).\n\n- Bullet point\n  - Nested item\n- Another item\n\n1. First\n2. Second\n\n> Quoted text\n\n```rust\nfn example() {\n    println!(\"Hello\");\n}\n```\n\n";
    base.repeat(size)
}

/// Paragraphs dense with pseudo-tags, nested and dangling ones included.
#[allow(dead_code)]
pub fn generate_tagged_content(size: usize) -> String {
    let base = "Intro <span style=\"color:#336699\"><b>bold blue</b> and <u>underlined</u></span> text.<br>\
                Next line <a href=\"/x\">anchor</a> with <font color=\"red\" size=\"+1\">font</font></span>.\n\n\
                <center>\n<h2>Centered heading</h2>\n</center>\n\n";
    base.repeat(size)
}

#[allow(dead_code)]
pub fn generate_table(rows: usize, columns: usize) -> String {
    let mut content = String::new();
    let header: String = (0..columns).map(|c| format!("| column {c} ")).collect();
    content.push_str(&header);
    content.push_str("|\n");
    content.push_str(&"|:---:".repeat(columns));
    content.push_str("|\n");
    for row in 0..rows {
        let cells: String = (0..columns).map(|c| format!("| {} ", row * c)).collect();
        content.push_str(&cells);
        content.push_str("|\n");
    }
    content
}

#[allow(dead_code)]
pub fn generate_nested_lists(depth: usize) -> String {
    (0..depth)
        .map(|level| format!("{}{}. item at level {level}\n", "   ".repeat(level), level + 1))
        .collect()
}
