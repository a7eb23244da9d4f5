//! Git operations abstraction layer
//!
//! This module provides a trait-based abstraction over the repository reads
//! and writes that version computation needs, so the core logic can run
//! against a real repository or an in-memory one.
//!
//! # Overview
//!
//! The primary abstraction is the [Repository] trait. The concrete
//! implementations include:
//!
//! - [repository::Git2Repository]: A real implementation using the `git2` crate
//! - [mock::MockRepository]: An in-memory linear history for testing
//!
//! # Usage
//!
//! Most code should depend on the [Repository] trait rather than concrete
//! implementations.
//!
//! ```rust
//! # use git_semtag::git::{MockRepository, Repository};
//! let mut repo = MockRepository::new();
//! repo.commit("feat: first feature");
//! repo.tag("0.1.0");
//! repo.commit("fix: a bug");
//!
//! assert_eq!(repo.list_tags().unwrap(), vec!["0.1.0"]);
//! assert_eq!(
//!     repo.list_commit_subjects(Some("0.1.0")).unwrap(),
//!     vec!["fix: a bug"]
//! );
//! ```

pub mod mock;
pub mod repository;

pub use mock::MockRepository;
pub use repository::Git2Repository;

use crate::error::Result;

/// Repository operations needed to describe HEAD
///
/// ## Error Handling
///
/// All methods return [crate::error::Result<T>]. Implementations map
/// underlying failures (like `git2::Error`) to
/// [crate::error::SemtagError::RepositoryState].
///
/// ## Implementations
///
/// - [Git2Repository](repository::Git2Repository): Real Git implementation using the `git2` crate
/// - [MockRepository](mock::MockRepository): Test implementation with a linear history
pub trait Repository {
    /// Subjects of the commits reachable from HEAD, newest first
    ///
    /// When `since` names a tag, commits reachable from that tag are left
    /// out. With `None` the whole history is returned.
    ///
    /// # Returns
    /// * `Ok(Vec<String>)` - First lines of the commit messages, newest first
    /// * `Err` - If the tag does not exist, HEAD is unborn, or Git fails
    fn list_commit_subjects(&self, since: Option<&str>) -> Result<Vec<String>>;

    /// Names of the tags merged into HEAD, oldest created first
    ///
    /// Annotated tags are dated by their tagger, lightweight tags by the
    /// commit they point at. Ties are broken by version precedence, then by
    /// name.
    fn list_tags(&self) -> Result<Vec<String>>;

    /// Abbreviated id of the HEAD commit
    fn head_short_id(&self) -> Result<String>;

    /// Create a signed annotated tag on HEAD
    ///
    /// # Arguments
    /// * `name` - Name for the new tag
    /// * `message` - Annotation message
    fn create_signed_tag(&self, name: &str, message: &str) -> Result<()>;
}
