//! Analysis engine: change classification and version resolution

pub mod change_classifier;
pub mod version_resolver;

pub use change_classifier::{ChangeClassifier, Triggers};
pub use version_resolver::{History, Resolution, VersionResolver};
