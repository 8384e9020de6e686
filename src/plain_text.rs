//! HTML → plain text that keeps the source's indentation and line breaks,
//! for pasting into code blocks.

use scraper::{ElementRef, Html, Node};
use tracing::warn;

use crate::error::Result;
use crate::html;
use crate::tidy::{collapse_newlines, trim_newlines};

const LINE_TAGS: &[&str] = &[
    "div", "p", "br", "li", "h1", "h2", "h3", "h4", "h5", "h6", "pre", "blockquote",
];

/// Recover indentation-faithful text from clipboard HTML.
///
/// `<pre>` blocks win over everything else, then inline `<code>`, then a walk
/// of the whole body that turns block elements into line breaks. Returns an
/// empty string when nothing could be extracted.
pub fn html_to_plain_text(html: &str) -> String {
    match extract(html) {
        Ok(text) => text,
        Err(err) => {
            warn!(error = %err, "could not extract plain text from HTML");
            String::new()
        }
    }
}

fn extract(html: &str) -> Result<String> {
    let document = html::parse_document(html);

    for tag in ["pre", "code"] {
        if let Some(text) = raw_blocks(&document, tag)? {
            return Ok(text);
        }
    }

    let body = html::body(&document)?;
    let mut text = String::new();
    for child in body.children() {
        walk(child.value(), ElementRef::wrap(child), 0, &mut text)?;
    }
    if text.trim().is_empty() {
        text = body.text().collect();
    }

    Ok(trim_newlines(&collapse_newlines(&text)).to_string())
}

// Raw text of every outermost `tag` element, one per line.
fn raw_blocks(document: &Html, tag: &str) -> Result<Option<String>> {
    let selector = html::selector(tag)?;
    let blocks: Vec<String> = document
        .select(&selector)
        .filter(|element| !html::nested_in_same_tag(*element))
        .map(|element| element.text().collect())
        .collect();

    if blocks.is_empty() {
        return Ok(None);
    }
    let joined = collapse_newlines(&blocks.join("\n"));
    Ok(Some(trim_newlines(&joined).to_string()))
}

fn walk(node: &Node, element: Option<ElementRef<'_>>, depth: usize, out: &mut String) -> Result<()> {
    match node {
        Node::Text(text) => out.push_str(text),
        Node::Element(el) => {
            let element = match element {
                Some(element) => element,
                None => return Ok(()),
            };
            let depth = html::descend(depth)?;
            let name = el.name();

            let mut inner = String::new();
            for child in element.children() {
                walk(child.value(), ElementRef::wrap(child), depth, &mut inner)?;
            }

            if name == "br" {
                out.push_str(&inner);
                out.push('\n');
            } else if LINE_TAGS.contains(&name) && name != "pre" {
                out.push('\n');
                out.push_str(&inner);
                out.push('\n');
            } else {
                out.push_str(&inner);
            }
        }
        _ => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_pre_indentation() {
        assert_eq!(html_to_plain_text("<pre>  line1\n\n\n  line2</pre>"), "  line1\n  line2");
    }

    #[test]
    fn keeps_tabs_and_markup_inside_pre() {
        let html = "<pre><code><span class=\"kw\">def</span> f():\n\treturn <b>1</b>\n</code></pre>";
        assert_eq!(html_to_plain_text(html), "def f():\n\treturn 1");
    }

    #[test]
    fn joins_multiple_pre_blocks() {
        let html = "<p>ignored</p><pre>\n\nfirst\n</pre><p>also ignored</p><pre>second\n\n</pre>";
        assert_eq!(html_to_plain_text(html), "first\nsecond");
    }

    #[test]
    fn falls_back_to_inline_code() {
        let html = "<p>Run <code>cargo  build</code> then <code>  ./run</code></p>";
        assert_eq!(html_to_plain_text(html), "cargo  build\n  ./run");
    }

    #[test]
    fn walks_block_structure() {
        let html = "<div>    indented</div><div>\tnext <span>inline</span></div><p>a<br>b</p>";
        assert_eq!(html_to_plain_text(html), "    indented\n\tnext inline\na\nb");
    }

    #[test]
    fn list_items_become_lines() {
        let html = "<ul><li>one</li><li>two</li></ul><h3>Heading</h3>";
        assert_eq!(html_to_plain_text(html), "one\ntwo\nHeading");
    }

    #[test]
    fn whitespace_only_walk_uses_document_text() {
        assert_eq!(html_to_plain_text("<br><br>"), "");
        assert_eq!(html_to_plain_text(""), "");
    }

    #[test]
    fn runaway_nesting_yields_nothing() {
        let html = format!("{}text", "<div>".repeat(html::MAX_DEPTH + 10));
        assert_eq!(html_to_plain_text(&html), "");
    }
}
