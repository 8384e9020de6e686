//! Clipboard paste normalization for a Markdown note editor.
//!
//! Rich clipboard HTML becomes compact GitHub-flavoured Markdown; pastes that
//! land in a code block become plain text with the source's indentation and
//! line breaks intact.

pub mod error;
pub mod html;
pub mod markdown;
pub mod paste;
pub mod plain_text;
pub mod settings;
pub mod tidy;

pub use error::ConvertError;
pub use markdown::html_to_markdown;
pub use paste::{
    decide, handle_paste, normalize_paste, process_paste_content, ClipboardPayload, CursorRegion,
    DeclineReason, PasteContext, PasteDecision,
};
pub use plain_text::html_to_plain_text;
pub use settings::PasteSettings;
pub use tidy::tidy_markdown;
