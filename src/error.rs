use thiserror::Error;

/// Unified error type for git-semtag operations
#[derive(Error, Debug)]
pub enum SemtagError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Repository state error: {0}")]
    RepositoryState(String),

    #[error("Prerelease pattern mismatch: old pattern '{pattern}' does not match '{identifier}'")]
    PatternMismatch { pattern: String, identifier: String },

    #[error("No change: {0}")]
    NoChange(String),

    #[error("Version parsing error: {0}")]
    Version(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in git-semtag
pub type Result<T> = std::result::Result<T, SemtagError>;

impl SemtagError {
    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        SemtagError::Configuration(msg.into())
    }

    /// Create a repository state error with context
    pub fn repository(msg: impl Into<String>) -> Self {
        SemtagError::RepositoryState(msg.into())
    }

    /// Create a version error with context
    pub fn version(msg: impl Into<String>) -> Self {
        SemtagError::Version(msg.into())
    }

    /// Create a "nothing to release" error with context
    pub fn no_change(msg: impl Into<String>) -> Self {
        SemtagError::NoChange(msg.into())
    }

    /// Create a pattern mismatch error naming the old pattern and the identifier
    pub fn pattern_mismatch(pattern: impl Into<String>, identifier: impl Into<String>) -> Self {
        SemtagError::PatternMismatch {
            pattern: pattern.into(),
            identifier: identifier.into(),
        }
    }
}

// libgit2 failures are repository state problems; keep its message as diagnostic text.
impl From<git2::Error> for SemtagError {
    fn from(err: git2::Error) -> Self {
        SemtagError::RepositoryState(err.message().to_string())
    }
}

impl From<semver::Error> for SemtagError {
    fn from(err: semver::Error) -> Self {
        SemtagError::Version(err.to_string())
    }
}
