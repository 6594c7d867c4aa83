use thiserror::Error;

use crate::syntax::NodeKind;

/// A failure that aborts building one unit.
#[derive(Debug, Error)]
pub enum BuildError {
    /// The input tree violates an assumption the builder relies on.
    #[error("builder precondition violated at {kind} `{name}`: {message}")]
    Precondition {
        kind: NodeKind,
        name: String,
        message: String,
    },

    #[error("expected exactly one namespace fragment, found {found}")]
    AmbiguousRoot { found: usize },

    #[error("build cancelled before type `{next_type}`")]
    Cancelled { next_type: String },

    #[error("failed to start builder thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

impl BuildError {
    pub fn precondition(kind: NodeKind, name: &str, message: impl Into<String>) -> Self {
        Self::Precondition {
            kind,
            name: name.to_string(),
            message: message.into(),
        }
    }
}
