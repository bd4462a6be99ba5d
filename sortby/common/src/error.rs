use std::error::Error;

use miette::Diagnostic;
use thiserror::Error;

/// Boxed error returned by fallible extractors.
pub type BoxedError = Box<dyn Error + Send + Sync + 'static>;

#[derive(Debug, Error, Diagnostic)]
pub enum SortError {
    #[error("invalid sort direction `{token}`")]
    #[diagnostic(help("sort direction must be exactly `asc` or `desc`"))]
    InvalidDirection { token: String },

    #[error("malformed sort criterion: {reason}")]
    MalformedCriterion { reason: String },

    #[error("failed to extract sort key for criterion #{criterion}")]
    Extract {
        criterion: usize,
        #[source]
        source: BoxedError,
    },
}

impl SortError {
    #[inline]
    pub fn invalid_direction(token: impl Into<String>) -> Self {
        Self::InvalidDirection {
            token: token.into(),
        }
    }

    #[inline]
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedCriterion {
            reason: reason.into(),
        }
    }
}

pub type SortResult<T> = Result<T, SortError>;
