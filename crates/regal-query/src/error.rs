use thiserror::Error;

/// Structured recommendation-query parse errors.
///
/// One variant per failure kind, carrying the offending input fragment where
/// one exists. Parsing never yields a partial term.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("expected a term")]
    MissingTerm,

    #[error("expected '(' after {0}")]
    ExpectedOpenParen(&'static str),

    #[error("expected ',' in {0}")]
    ExpectedComma(&'static str),

    #[error("expected ')' to close {0}")]
    ExpectedCloseParen(&'static str),

    #[error("expected a strategy at '{0}'")]
    ExpectedStrategy(String),

    #[error("expected a product id after {0}")]
    ExpectedProductId(&'static str),

    #[error("trailing input after term: '{0}'")]
    TrailingInput(String),
}
