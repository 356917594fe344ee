use sapf_core::Coord;

/// Errors raised by a search before or while it runs.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SearchError {
    /// The grid lacks a start or a goal; raised before any work begins.
    #[error("{algorithm} requires both start and goal to be set (missing {missing})")]
    InvalidArgument {
        algorithm: &'static str,
        missing: &'static str,
    },
    /// A child→parent chain loops back on itself. Indicates a search bug.
    #[error("cycle detected in parent chain at {at}; cannot reconstruct path")]
    CycleDetected { at: Coord },
}

/// Registry misuse.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("algorithm key must be non-empty")]
    EmptyKey,
    #[error("algorithm key already registered: '{0}'")]
    DuplicateKey(String),
    #[error("unknown algorithm: '{0}'")]
    UnknownAlgorithm(String),
}
