use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, warn};

use crate::html::is_simple_link;
use crate::markdown::html_to_markdown;
use crate::plain_text::html_to_plain_text;
use crate::settings::PasteSettings;
use crate::tidy::{tidy_plain_text, trim_newlines};

static BARE_URL: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^https?://\S+$").unwrap());
static MARKDOWN_LINK: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^\[.*?\]\(https?://\S+\)$").unwrap());

/// What the clipboard offered for one paste.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ClipboardPayload {
    pub text: String,
    pub html: Option<String>,
}

impl ClipboardPayload {
    pub fn new(text: impl Into<String>) -> Self {
        ClipboardPayload { text: text.into(), html: None }
    }

    /// Attach an HTML flavour. An empty string counts as no HTML at all.
    pub fn with_html(mut self, html: impl Into<String>) -> Self {
        let html = html.into();
        self.html = if html.is_empty() { None } else { Some(html) };
        self
    }

    pub fn html(&self) -> Option<&str> {
        self.html.as_deref().filter(|h| !h.is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty() && self.html().is_none()
    }
}

/// Where the cursor sits in the destination document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorRegion {
    CodeBlock,
    InlineCode,
    #[default]
    Normal,
}

impl CursorRegion {
    /// Only fenced/multi-line code counts; inline code pastes like prose.
    pub fn is_code_block(self) -> bool {
        self == CursorRegion::CodeBlock
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PasteContext {
    pub in_code_region: bool,
}

impl From<CursorRegion> for PasteContext {
    fn from(region: CursorRegion) -> Self {
        PasteContext { in_code_region: region.is_code_block() }
    }
}

/// Produce the string to insert for a paste.
pub fn normalize_paste(payload: &ClipboardPayload, context: PasteContext) -> String {
    process_paste_content(&payload.text, payload.html(), context.in_code_region)
}

/// Turn clipboard text and optional HTML into the text to insert.
///
/// Inside a code region the HTML is reduced to indentation-faithful plain
/// text; elsewhere it becomes Markdown. Conversion problems never escape:
/// the plain-text payload stands in whenever the HTML can't be used.
pub fn process_paste_content(text: &str, html: Option<&str>, in_code_region: bool) -> String {
    let html = html.filter(|h| !h.is_empty());

    if in_code_region {
        if let Some(html) = html {
            let plain = html_to_plain_text(html);
            if !plain.is_empty() {
                debug!(len = plain.len(), "pasting text extracted from HTML into code");
                return plain;
            }
            debug!("HTML held no usable text, pasting plain text into code");
        }
        return trim_newlines(text).to_string();
    }

    match html {
        Some(html) => match html_to_markdown(html) {
            Ok(markdown) if markdown.is_empty() && !text.is_empty() => {
                debug!("HTML held nothing to convert, pasting plain text");
                tidy_plain_text(text)
            }
            Ok(markdown) => {
                debug!(len = markdown.len(), "pasting HTML as markdown");
                markdown
            }
            Err(err) => {
                warn!(error = %err, "markdown conversion failed, pasting plain text");
                text.to_string()
            }
        },
        None => tidy_plain_text(text),
    }
}

// ── Interception ───────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclineReason {
    Disabled,
    Empty,
    /// Plain text that is just a URL; link-title tools handle these.
    BareUrl,
    MarkdownLink,
    /// HTML that is nothing but one link, with the URL as plain text.
    SimpleLink,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasteDecision {
    Handle,
    Decline(DeclineReason),
}

/// Decide whether to take over a paste or leave it to the host.
pub fn decide(settings: &PasteSettings, payload: &ClipboardPayload, region: CursorRegion) -> PasteDecision {
    if !settings.enabled {
        return PasteDecision::Decline(DeclineReason::Disabled);
    }
    if payload.is_empty() {
        return PasteDecision::Decline(DeclineReason::Empty);
    }
    if region.is_code_block() {
        return PasteDecision::Handle;
    }

    let trimmed = payload.text.trim();
    match payload.html() {
        None if BARE_URL.is_match(trimmed) => PasteDecision::Decline(DeclineReason::BareUrl),
        None if MARKDOWN_LINK.is_match(trimmed) => PasteDecision::Decline(DeclineReason::MarkdownLink),
        Some(html) if BARE_URL.is_match(trimmed) && is_simple_link(html) => {
            PasteDecision::Decline(DeclineReason::SimpleLink)
        }
        _ => PasteDecision::Handle,
    }
}

/// Full paste handling: `None` when the paste is declined, otherwise the text
/// to insert in place of the selection.
pub fn handle_paste(settings: &PasteSettings, payload: &ClipboardPayload, region: CursorRegion) -> Option<String> {
    match decide(settings, payload, region) {
        PasteDecision::Handle => Some(normalize_paste(payload, region.into())),
        PasteDecision::Decline(reason) => {
            debug!(?reason, "leaving paste to the host");
            None
        }
    }
}
