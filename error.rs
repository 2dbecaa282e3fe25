use std::path::PathBuf;

/// Everything that can stop an invocation before it reaches a verdict.
///
/// Each variant is terminal: the binary prints it and exits with status 2.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{0}")]
    Usage(String),

    #[error("could not open the repository at {path:?}: {source}")]
    Repository {
        path: PathBuf,
        #[source]
        source: git2::Error,
    },

    #[error("could not resolve revision {revision:?}: {source}")]
    Revision {
        revision: String,
        #[source]
        source: git2::Error,
    },

    #[error("{context}: {source}")]
    Backend {
        context: String,
        #[source]
        source: git2::Error,
    },

    #[error("invalid glob {pattern:?}: {reason}")]
    Pattern { pattern: String, reason: String },

    #[error("executing {program:?} failed: {reason}")]
    Execution { program: String, reason: String },

    #[error("could not write output: {0}")]
    Output(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn backend(context: impl Into<String>, source: git2::Error) -> Self {
        Error::Backend {
            context: context.into(),
            source,
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
