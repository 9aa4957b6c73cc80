//! Rendering of an HTML subtree to markdown.
//!
//! This is the normalization step behind the content extractor: once the
//! content region of a page is located, its subtree is flattened into
//! markdown so every page reaches the backend in the same lightweight text
//! form. Headings, paragraphs, emphasis, links, images, code, blockquotes,
//! and (nested) lists are preserved; `script`/`style` subtrees and comments
//! are dropped; whitespace is collapsed. Rendering is a pure function of the
//! parsed HTML.

use ego_tree::NodeRef;
use scraper::{ElementRef, Node};

/// Tags whose subtrees carry no indexable content.
const DROPPED_TAGS: &[&str] = &[
    "script",
    "style",
    "noscript",
    "template",
    "head",
    "iframe",
    "svg",
];

/// Renders the subtree of `region` to markdown.
#[must_use]
pub fn render(region: ElementRef<'_>) -> String {
    let mut out = String::new();
    render_blocks(region, &mut out);
    out.trim().to_string()
}

fn is_dropped(name: &str) -> bool {
    DROPPED_TAGS.contains(&name)
}

fn is_block(name: &str) -> bool {
    matches!(
        name,
        "h1" | "h2"
            | "h3"
            | "h4"
            | "h5"
            | "h6"
            | "p"
            | "div"
            | "section"
            | "article"
            | "main"
            | "aside"
            | "header"
            | "footer"
            | "nav"
            | "figure"
            | "figcaption"
            | "details"
            | "summary"
            | "blockquote"
            | "pre"
            | "ul"
            | "ol"
            | "hr"
            | "table"
            | "thead"
            | "tbody"
            | "tr"
            | "td"
            | "th"
    )
}

/// Walks the direct children of `el`, emitting block-level markdown into
/// `out`. Consecutive inline nodes are accumulated into one paragraph.
fn render_blocks(el: ElementRef<'_>, out: &mut String) {
    let mut paragraph = String::new();

    for child in el.children() {
        match child.value() {
            Node::Text(text) => paragraph.push_str(&collapse_ws(&text.text)),
            Node::Element(element) => {
                let name = element.name();
                if is_dropped(name) {
                    continue;
                }
                let Some(child_el) = ElementRef::wrap(child) else {
                    continue;
                };
                if is_block(name) {
                    flush_paragraph(&mut paragraph, out);
                    render_block_element(child_el, name, out);
                } else {
                    append_inline_node(child, &mut paragraph);
                }
            }
            _ => {}
        }
    }

    flush_paragraph(&mut paragraph, out);
}

fn render_block_element(el: ElementRef<'_>, name: &str, out: &mut String) {
    match name {
        "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
            let level = name[1..].parse::<usize>().unwrap_or(1);
            let text = inline(el);
            let text = text.trim();
            if !text.is_empty() {
                push_block(out, &format!("{} {}", "#".repeat(level), text));
            }
        }
        "p" => {
            let text = inline(el);
            let text = text.trim();
            if !text.is_empty() {
                push_block(out, text);
            }
        }
        "hr" => push_block(out, "---"),
        "pre" => {
            let raw: String = el.text().collect();
            let raw = raw.trim_matches('\n');
            push_block(out, &format!("```\n{raw}\n```"));
        }
        "blockquote" => {
            let mut inner = String::new();
            render_blocks(el, &mut inner);
            let quoted: Vec<String> = inner
                .trim()
                .lines()
                .map(|line| {
                    if line.is_empty() {
                        ">".to_string()
                    } else {
                        format!("> {line}")
                    }
                })
                .collect();
            if !quoted.is_empty() {
                push_block(out, &quoted.join("\n"));
            }
        }
        "ul" | "ol" => {
            let list = render_list(el, 0);
            if !list.is_empty() {
                push_block(out, &list);
            }
        }
        // Generic containers (and tables, which are flattened): recurse so
        // their content still lands in the output.
        _ => render_blocks(el, out),
    }
}

fn render_list(el: ElementRef<'_>, depth: usize) -> String {
    let ordered = el.value().name() == "ol";
    let pad = "  ".repeat(depth);
    let mut index = 1usize;
    let mut lines: Vec<String> = Vec::new();

    for child in el.children() {
        let Some(item) = ElementRef::wrap(child) else {
            continue;
        };
        if item.value().name() != "li" {
            continue;
        }

        let mut text = String::new();
        let mut nested: Vec<String> = Vec::new();
        for li_child in item.children() {
            if let Some(e) = ElementRef::wrap(li_child) {
                let name = e.value().name();
                if matches!(name, "ul" | "ol") {
                    let sub = render_list(e, depth + 1);
                    if !sub.is_empty() {
                        nested.push(sub);
                    }
                    continue;
                }
                if is_dropped(name) {
                    continue;
                }
            }
            append_inline_node(li_child, &mut text);
        }

        let marker = if ordered {
            let m = format!("{index}. ");
            index += 1;
            m
        } else {
            "- ".to_string()
        };
        lines.push(format!("{pad}{marker}{}", text.trim()));
        lines.extend(nested);
    }

    lines.join("\n")
}

/// Collects the inline markdown for an element's children.
fn inline(el: ElementRef<'_>) -> String {
    let mut out = String::new();
    for child in el.children() {
        append_inline_node(child, &mut out);
    }
    out
}

fn append_inline_node(node: NodeRef<'_, Node>, out: &mut String) {
    match node.value() {
        Node::Text(text) => out.push_str(&collapse_ws(&text.text)),
        Node::Element(element) => {
            let name = element.name();
            if is_dropped(name) {
                return;
            }
            let Some(el) = ElementRef::wrap(node) else {
                return;
            };
            match name {
                "br" => out.push('\n'),
                "strong" | "b" => wrap_delimited(el, "**", out),
                "em" | "i" => wrap_delimited(el, "*", out),
                "code" => {
                    let raw: String = el.text().collect();
                    let raw = raw.trim();
                    if !raw.is_empty() {
                        out.push('`');
                        out.push_str(raw);
                        out.push('`');
                    }
                }
                "a" => {
                    let label = inline(el);
                    let label = label.trim();
                    match el.value().attr("href") {
                        Some(href) if !href.is_empty() => {
                            let label = if label.is_empty() { href } else { label };
                            out.push_str(&format!("[{label}]({href})"));
                        }
                        _ => out.push_str(label),
                    }
                }
                "img" => {
                    if let Some(src) = el.value().attr("src") {
                        let alt = el.value().attr("alt").unwrap_or_default();
                        out.push_str(&format!("![{alt}]({src})"));
                    }
                }
                _ => out.push_str(&inline(el)),
            }
        }
        _ => {}
    }
}

fn wrap_delimited(el: ElementRef<'_>, delimiter: &str, out: &mut String) {
    let body = inline(el);
    let body = body.trim();
    if !body.is_empty() {
        out.push_str(delimiter);
        out.push_str(body);
        out.push_str(delimiter);
    }
}

fn push_block(out: &mut String, block: &str) {
    if !out.is_empty() {
        out.push_str("\n\n");
    }
    out.push_str(block);
}

fn flush_paragraph(paragraph: &mut String, out: &mut String) {
    let text = paragraph.trim();
    if !text.is_empty() {
        push_block(out, text);
    }
    paragraph.clear();
}

/// Collapses whitespace runs to single spaces, preserving boundary spaces so
/// adjacent inline fragments stay separated.
fn collapse_ws(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut last_was_ws = false;
    for c in input.chars() {
        if c.is_whitespace() {
            if !last_was_ws {
                out.push(' ');
            }
            last_was_ws = true;
        } else {
            out.push(c);
            last_was_ws = false;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::{Html, Selector};

    fn render_region(html: &str) -> String {
        let document = Html::parse_fragment(html);
        let selector = Selector::parse("div.root").unwrap();
        let region = document.select(&selector).next().expect("region present");
        render(region)
    }

    #[test]
    fn heading_and_paragraph() {
        let md = render_region(r#"<div class="root"><h1>Title</h1><p>Body</p></div>"#);
        assert_eq!(md, "# Title\n\nBody");
    }

    #[test]
    fn heading_levels() {
        let md = render_region(r#"<div class="root"><h2>Two</h2><h3>Three</h3></div>"#);
        assert_eq!(md, "## Two\n\n### Three");
    }

    #[test]
    fn emphasis_and_links() {
        let md = render_region(
            r#"<div class="root"><p>see <a href="https://docs.example/">the docs</a> for <strong>much</strong> <em>more</em></p></div>"#,
        );
        assert_eq!(
            md,
            "see [the docs](https://docs.example/) for **much** *more*"
        );
    }

    #[test]
    fn anchor_without_href_degrades_to_text() {
        let md = render_region(r#"<div class="root"><p>plain <a>label</a> here</p></div>"#);
        assert_eq!(md, "plain label here");
    }

    #[test]
    fn unordered_list_with_nesting() {
        let md = render_region(
            r#"<div class="root"><ul><li>alpha</li><li>beta<ul><li>nested</li></ul></li></ul></div>"#,
        );
        assert_eq!(md, "- alpha\n- beta\n  - nested");
    }

    #[test]
    fn ordered_list_numbering() {
        let md = render_region(
            r#"<div class="root"><ol><li>first</li><li>second</li><li>third</li></ol></div>"#,
        );
        assert_eq!(md, "1. first\n2. second\n3. third");
    }

    #[test]
    fn scripts_and_styles_are_dropped() {
        let md = render_region(
            r#"<div class="root"><p>kept</p><script>alert(1)</script><style>p{}</style></div>"#,
        );
        assert_eq!(md, "kept");
    }

    #[test]
    fn preformatted_blocks_are_fenced() {
        let md = render_region("<div class=\"root\"><pre>let x = 1;\nlet y = 2;</pre></div>");
        assert_eq!(md, "```\nlet x = 1;\nlet y = 2;\n```");
    }

    #[test]
    fn inline_code() {
        let md = render_region(r#"<div class="root"><p>run <code>cargo test</code> now</p></div>"#);
        assert_eq!(md, "run `cargo test` now");
    }

    #[test]
    fn blockquote_prefixes_lines() {
        let md = render_region(
            r#"<div class="root"><blockquote><p>first</p><p>second</p></blockquote></div>"#,
        );
        assert_eq!(md, "> first\n>\n> second");
    }

    #[test]
    fn images_keep_alt_text() {
        let md = render_region(r#"<div class="root"><p><img src="/a.png" alt="chart"></p></div>"#);
        assert_eq!(md, "![chart](/a.png)");
    }

    #[test]
    fn source_whitespace_is_collapsed() {
        let md = render_region("<div class=\"root\"><p>spread\n   over\n   lines</p></div>");
        assert_eq!(md, "spread over lines");
    }

    #[test]
    fn stray_text_becomes_a_paragraph() {
        let md = render_region(r#"<div class="root">loose text<p>then a block</p></div>"#);
        assert_eq!(md, "loose text\n\nthen a block");
    }

    #[test]
    fn rendering_is_deterministic() {
        let html = r#"<div class="root"><h1>T</h1><ul><li>a</li><li>b</li></ul></div>"#;
        assert_eq!(render_region(html), render_region(html));
    }
}
