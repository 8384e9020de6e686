use thiserror::Error;

pub type Result<T> = std::result::Result<T, ConvertError>;

/// Reasons an HTML conversion gives up. None of these reach the user: the
/// paste dispatcher swaps in the plain-text payload instead.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConvertError {
    #[error("HTML nests deeper than {limit} elements")]
    TooDeep { limit: usize },

    #[error("markdown conversion failed: {0}")]
    Markdown(String),

    #[error("invalid selector: {0}")]
    Selector(String),
}
