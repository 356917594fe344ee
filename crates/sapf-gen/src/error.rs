use sapf_core::MapValidationError;
use sapf_paths::SearchError;

/// Errors raised while generating or importing a grid.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GenError {
    /// A generator parameter is out of range.
    #[error("invalid generator parameter: {0}")]
    InvalidParameter(String),
    /// Malformed input text, with the 1-based line it was found on.
    #[error("parse error on line {line}: {message}")]
    Parse { line: usize, message: String },
    /// The generated layout failed grid validation.
    #[error(transparent)]
    Map(#[from] MapValidationError),
    /// A solvability check could not run.
    #[error(transparent)]
    Search(#[from] SearchError),
}

impl GenError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidParameter(msg.into())
    }

    pub(crate) fn parse(line: usize, msg: impl Into<String>) -> Self {
        Self::Parse {
            line,
            message: msg.into(),
        }
    }
}
