use std::cell::RefCell;

use html5ever::tendril::StrTendril;
use html5ever::tokenizer::{
    BufferQueue, TagKind, Token, TokenSink, TokenSinkResult, Tokenizer, TokenizerOpts,
};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Node, Selector};

use crate::error::{ConvertError, Result};

/// Element nesting the converters will follow before giving up.
pub const MAX_DEPTH: usize = 256;

static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Elements whose content never makes it into a paste.
pub const DROPPED_TAGS: &[&str] = &["script", "style", "head", "title", "meta", "template", "noscript"];

/// Step one level deeper into the tree, failing once past [`MAX_DEPTH`].
pub fn descend(depth: usize) -> Result<usize> {
    if depth >= MAX_DEPTH {
        return Err(ConvertError::TooDeep { limit: MAX_DEPTH });
    }
    Ok(depth + 1)
}

/// Fail when some element sits more than [`MAX_DEPTH`] levels below the
/// document root.
pub fn check_depth(document: &Html) -> Result<()> {
    let too_deep = document
        .root_element()
        .descendants()
        .filter(|node| node.value().is_element())
        .any(|node| node.ancestors().take(MAX_DEPTH + 1).count() > MAX_DEPTH);
    if too_deep {
        return Err(ConvertError::TooDeep { limit: MAX_DEPTH });
    }
    Ok(())
}

pub fn parse_document(html: &str) -> Html {
    Html::parse_document(html)
}

pub fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| ConvertError::Selector(format!("{}: {:?}", css, e)))
}

/// The `<body>` of a parsed document, or its root when there is none.
pub fn body(document: &Html) -> Result<ElementRef<'_>> {
    let body = selector("body")?;
    Ok(document.select(&body).next().unwrap_or_else(|| document.root_element()))
}

/// True when `element` sits inside another element with the same tag name.
pub fn nested_in_same_tag(element: ElementRef<'_>) -> bool {
    let name = element.value().name();
    element.ancestors().any(|node| match node.value() {
        Node::Element(parent) => parent.name() == name,
        _ => false,
    })
}

// ── Token stream ───────────────────────────────────────────────────

struct HtmlSink {
    tokens: RefCell<Vec<HtmlToken>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HtmlToken {
    StartTag(String, Vec<(String, String)>),
    EndTag(String),
    Text(String),
    // Comments and doctypes
    Other,
}

impl TokenSink for HtmlSink {
    type Handle = ();

    fn process_token(&self, token: Token, _line_number: u64) -> TokenSinkResult<()> {
        match token {
            Token::TagToken(tag) => {
                let name = tag.name.to_string();
                let attrs: Vec<(String, String)> = tag.attrs.iter()
                    .map(|a| (a.name.local.to_string(), a.value.to_string()))
                    .collect();
                match tag.kind {
                    TagKind::StartTag => self.tokens.borrow_mut().push(HtmlToken::StartTag(name, attrs)),
                    TagKind::EndTag => self.tokens.borrow_mut().push(HtmlToken::EndTag(name)),
                }
            }
            Token::CharacterTokens(s) => {
                self.tokens.borrow_mut().push(HtmlToken::Text(s.to_string()));
            }
            Token::CommentToken(_) | Token::DoctypeToken(_) => {
                self.tokens.borrow_mut().push(HtmlToken::Other);
            }
            _ => {}
        }
        TokenSinkResult::Continue
    }
}

/// Flat token stream for `html`, without building a tree.
pub fn tokenize(html: &str) -> Vec<HtmlToken> {
    let sink = HtmlSink { tokens: RefCell::new(Vec::new()) };
    let tokenizer = Tokenizer::new(sink, TokenizerOpts::default());
    let mut queue = BufferQueue::default();
    queue.push_back(StrTendril::from(html));
    // The sink never returns `Script`, so feeding always runs to the end.
    let _ = tokenizer.feed(&mut queue);
    tokenizer.end();

    tokenizer.sink.tokens.into_inner()
}

/// True when `html` is a single `<a href>` holding nothing but text, e.g. what
/// a browser puts on the clipboard when copying a link.
pub fn is_simple_link(html: &str) -> bool {
    let normalized = WHITESPACE_RUN.replace_all(html.trim(), " ");
    let tokens = tokenize(&normalized);

    match tokens.as_slice() {
        [HtmlToken::StartTag(open, attrs), inner @ .., HtmlToken::EndTag(close)] => {
            open == "a"
                && close == "a"
                && attrs.iter().any(|(k, v)| k == "href" && !v.is_empty())
                && inner.iter().all(|t| matches!(t, HtmlToken::Text(_)))
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenizes_tags_and_text() {
        let tokens = tokenize("<b class=\"x\">hi</b>");
        assert_eq!(
            tokens,
            vec![
                HtmlToken::StartTag("b".into(), vec![("class".into(), "x".into())]),
                HtmlToken::Text("hi".into()),
                HtmlToken::EndTag("b".into()),
            ]
        );
    }

    #[test]
    fn simple_link_detection() {
        assert!(is_simple_link("<a href=\"https://example.com\">example</a>"));
        assert!(is_simple_link("  <a  href='https://example.com'\n target=\"_blank\">ex\n ample</a> "));
        assert!(is_simple_link("<a href=\"https://example.com\"></a>"));
        assert!(!is_simple_link("<a href=\"https://example.com\"><b>bold</b></a>"));
        assert!(!is_simple_link("<a>no href</a>"));
        assert!(!is_simple_link("<p><a href=\"https://example.com\">x</a></p>"));
        assert!(!is_simple_link("<a href=\"https://example.com\">x</a> trailing"));
    }

    #[test]
    fn descend_stops_at_limit() {
        assert_eq!(descend(0), Ok(1));
        assert_eq!(descend(MAX_DEPTH), Err(ConvertError::TooDeep { limit: MAX_DEPTH }));
    }

    #[test]
    fn feeds_past_script_elements() {
        let tokens = tokenize("<script>run()</script><b>y</b>");
        assert_eq!(tokens.last(), Some(&HtmlToken::EndTag("b".into())));
    }

    #[test]
    fn depth_check_counts_element_nesting() {
        assert_eq!(check_depth(&parse_document(&"<div>".repeat(16))), Ok(()));
        assert_eq!(
            check_depth(&parse_document(&"<div>".repeat(MAX_DEPTH + 10))),
            Err(ConvertError::TooDeep { limit: MAX_DEPTH })
        );
    }

    #[test]
    fn finds_body_and_nesting() {
        let document = parse_document("<p><code>a<code>b</code></code></p>");
        let body = body(&document).unwrap();
        assert_eq!(body.value().name(), "body");

        let code = selector("code").unwrap();
        let nested: Vec<bool> = document.select(&code).map(nested_in_same_tag).collect();
        assert_eq!(nested, vec![false, true]);
    }
}
