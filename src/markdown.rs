//! HTML → GitHub-flavoured Markdown.
//!
//! The base conversion is htmd's turndown port with ATX headings, fenced code
//! and `-` bullets. Handlers registered here add the GFM pieces it leaves out:
//! tables, `~~` strikethrough and task-list checkboxes. [`html_to_markdown`]
//! then runs the list tidy pipeline over the result.

use htmd::options::{BulletListMarker, CodeBlockStyle, HeadingStyle, Options};
use htmd::{Element, HtmlToMarkdown};

use crate::error::{ConvertError, Result};
use crate::html;
use crate::tidy::tidy_markdown;

// Table handlers run bottom-up on already converted text, so rows and cells
// are tagged with private-use characters for the `table` handler to split on.
const ROW_MARK: char = '\u{E000}';
const CELL_MARK: char = '\u{E001}';

/// Convert clipboard HTML to tidy Markdown.
pub fn html_to_markdown(html: &str) -> Result<String> {
    let markdown = convert(html)?;
    Ok(tidy_markdown(&markdown))
}

/// Base conversion only, before any list tidying.
pub fn convert(html: &str) -> Result<String> {
    html::check_depth(&html::parse_document(html))?;

    let markdown = converter()
        .convert(html)
        .map_err(|e| ConvertError::Markdown(e.to_string()))?;

    Ok(markdown
        .trim_start_matches(|c: char| matches!(c, '\t' | '\r' | '\n'))
        .trim_end()
        .to_string())
}

fn converter() -> HtmlToMarkdown {
    HtmlToMarkdown::builder()
        .skip_tags(html::DROPPED_TAGS.to_vec())
        .options(Options {
            heading_style: HeadingStyle::Atx,
            code_block_style: CodeBlockStyle::Fenced,
            bullet_list_marker: BulletListMarker::Dash,
            ..Default::default()
        })
        .add_handler(vec!["del", "s", "strike"], strikethrough)
        .add_handler(vec!["input"], checkbox)
        .add_handler(vec!["table"], table)
        .add_handler(vec!["thead", "tbody", "tfoot"], table_section)
        .add_handler(vec!["tr"], table_row)
        .add_handler(vec!["th", "td"], table_cell)
        .build()
}

fn attr<'a>(element: &Element<'a>, name: &str) -> Option<&'a str> {
    element
        .attrs
        .iter()
        .find(|a| &*a.name.local == name)
        .map(|a| &*a.value)
}

// Flanking spaces move outside the markers.
fn strikethrough(element: Element) -> Option<String> {
    let content = element.content;
    let inner = content.trim();
    if inner.is_empty() {
        return Some(if content.is_empty() { String::new() } else { " ".to_string() });
    }
    let lead = if content.starts_with(char::is_whitespace) { " " } else { "" };
    let trail = if content.ends_with(char::is_whitespace) { " " } else { "" };
    Some(format!("{}~~{}~~{}", lead, inner, trail))
}

// The whitespace after the input in the source separates the box from the label.
fn checkbox(element: Element) -> Option<String> {
    let is_checkbox = attr(&element, "type").map_or(false, |t| t.eq_ignore_ascii_case("checkbox"));
    if !is_checkbox {
        return Some(String::new());
    }
    let mark = if attr(&element, "checked").is_some() { "[x]" } else { "[ ]" };
    Some(mark.to_string())
}

fn table_section(element: Element) -> Option<String> {
    Some(element.content.to_string())
}

fn table_row(element: Element) -> Option<String> {
    Some(format!("{}{}", ROW_MARK, element.content))
}

fn table_cell(element: Element) -> Option<String> {
    let text = element.content.split_whitespace().collect::<Vec<_>>().join(" ");
    Some(format!("{}{}", CELL_MARK, text.replace('|', "\\|")))
}

fn table(element: Element) -> Option<String> {
    let rows: Vec<Vec<&str>> = element
        .content
        .split(ROW_MARK)
        .skip(1)
        .map(|row| row.split(CELL_MARK).skip(1).map(str::trim).collect())
        .collect();

    let width = rows.iter().map(Vec::len).max().unwrap_or(0);
    if width == 0 {
        return Some(String::new());
    }

    let mut lines = Vec::with_capacity(rows.len() + 1);
    for (i, mut row) in rows.into_iter().enumerate() {
        row.resize(width, "");
        lines.push(format!("| {} |", row.join(" | ")));
        if i == 0 {
            lines.push(format!("| {} |", vec!["---"; width].join(" | ")));
        }
    }
    Some(format!("\n\n{}\n\n", lines.join("\n")))
}
