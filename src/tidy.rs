//! Clean-up passes over converted Markdown and raw clipboard text.
//!
//! HTML→Markdown conversion of list items that wrap block content leaves
//! blank lines between bullets and markers split from their text. The
//! pipeline here restores compact list formatting without touching other
//! content.

use once_cell::sync::Lazy;
use regex::Regex;

static WIDE_BULLET: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^([ \t]*)-[ \t]{2,}").unwrap());
static BULLET_LINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*-\s").unwrap());
static BULLET_ONLY: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\s*)-\s*$").unwrap());
static BLANK_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{2,}").unwrap());
static PLAIN_BLANK_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").unwrap());

/// Tidy list formatting in converted Markdown.
///
/// Runs one pass of the pipeline (bullet spacing, blank-line removal around
/// bullets, orphaned marker merging, blank-run collapse, trailing blank
/// removal) and repeats it until the text stops changing, so the result is
/// a fixed point: tidying it again is a no-op.
pub fn tidy_markdown(markdown: &str) -> String {
    let mut current = tidy_pass(markdown);
    loop {
        let next = tidy_pass(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

fn tidy_pass(markdown: &str) -> String {
    let spaced = WIDE_BULLET.replace_all(markdown, "${1}- ");
    let lines: Vec<&str> = spaced.split('\n').collect();
    let merged = compact_lists(&lines).join("\n");
    let collapsed = BLANK_RUN.replace_all(&merged, "\n\n");
    collapsed.trim_end_matches('\n').to_string()
}

fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

fn is_bullet(line: &str) -> bool {
    BULLET_LINE.is_match(line)
}

fn next_non_blank(lines: &[&str], from: usize) -> Option<usize> {
    (from..lines.len()).find(|&j| !is_blank(lines[j]))
}

fn prev_non_blank(lines: &[&str], before: usize) -> Option<usize> {
    (0..before).rev().find(|&j| !is_blank(lines[j]))
}

// Single left-to-right scan: drops blank lines that separate list content and
// folds a bare "-" marker into the next line of text.
fn compact_lists(lines: &[&str]) -> Vec<String> {
    let mut out = Vec::with_capacity(lines.len());
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i];

        if is_blank(line) {
            if let (Some(p), Some(n)) = (prev_non_blank(lines, i), next_non_blank(lines, i + 1)) {
                let (prev, next) = (lines[p], lines[n]);
                // A following bullet covers both "between bullets" and
                // "paragraph then list".
                let drop = is_bullet(next) || (BULLET_ONLY.is_match(prev) && !is_blank(next));
                if drop {
                    i += 1;
                    continue;
                }
            }
        }

        if let Some(caps) = BULLET_ONLY.captures(line) {
            if let Some(n) = next_non_blank(lines, i + 1) {
                let next = lines[n];
                if !is_bullet(next) {
                    let indent = caps.get(1).map_or("", |m| m.as_str());
                    out.push(format!("{}- {}", indent, next.trim()));
                    i = n + 1;
                    continue;
                }
            }
        }

        out.push(line.to_string());
        i += 1;
    }

    out
}

/// Collapse every run of newlines down to a single one.
pub fn collapse_newlines(text: &str) -> String {
    BLANK_RUN.replace_all(text, "\n").into_owned()
}

/// Strip leading and trailing newlines, leaving other whitespace alone.
pub fn trim_newlines(text: &str) -> &str {
    text.trim_matches('\n')
}

/// Clean-up for plain text pasted outside code: three or more newlines become
/// one blank line, and trailing newlines go.
pub fn tidy_plain_text(text: &str) -> String {
    let collapsed = PLAIN_BLANK_RUN.replace_all(text, "\n\n");
    collapsed.trim_end_matches('\n').to_string()
}
