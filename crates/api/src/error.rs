// ABOUTME: Error types for API documentation parsing operations.
// ABOUTME: Provides CatalogError with structural parse, missing section and rule set variants.

use std::fmt;
use thiserror::Error;

/// Errors that can occur while building the function catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// No `name(arguments)` fragment was found in a signature block.
    #[error("could not find function signature in {0:?}")]
    MissingSignature(String),

    /// A signature was found but no function name precedes its parenthesis.
    #[error("could not find function name in {0:?}")]
    MissingFunctionName(String),

    /// A signature has no parenthesized argument list.
    #[error("could not find arguments in {0:?}")]
    MissingArguments(String),

    /// The document lacks a container the parser depends on.
    #[error("document has no element matching {0:?}")]
    MissingSection(String),

    /// The rule set could not be loaded (malformed JSON or bad selector).
    #[error("invalid rule set: {0}")]
    InvalidRules(String),
}

impl CatalogError {
    /// Creates a MissingSignature error naming the fragments that were searched.
    pub fn missing_signature(fragments: &[&str]) -> Self {
        CatalogError::MissingSignature(fragments.join(" | "))
    }

    /// Creates an InvalidRules error from an underlying error.
    pub fn invalid_rules(err: impl fmt::Display) -> Self {
        CatalogError::InvalidRules(err.to_string())
    }

    /// Returns true for errors raised by a single malformed entry, as opposed
    /// to errors about the document or the rule set as a whole.
    pub fn is_entry_error(&self) -> bool {
        matches!(
            self,
            CatalogError::MissingSignature(_)
                | CatalogError::MissingFunctionName(_)
                | CatalogError::MissingArguments(_)
        )
    }
}
