//! Errors raised while reading sources and computing coverage.
//!
//! A missing MC/DC pair is *not* an error: coverage gaps are data carried by
//! [`Coverage`][crate::mcdc::Coverage]. The variants here are either failures of
//! the surrounding input (unparsable source, unreadable observations) or
//! contract violations by a caller.

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },

    /// An assignment handed to the evaluator lacks one of the decision's conditions.
    #[error("no value for condition `{condition}` in assignment")]
    MissingCondition { condition: String },

    #[error("cannot enumerate {count} conditions (limit is {limit})")]
    TooManyConditions { count: usize, limit: usize },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed observations: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn parse(line: usize, message: impl Into<String>) -> Self {
        Error::Parse {
            line,
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
