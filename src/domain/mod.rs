//! Domain logic - pure rules independent of git operations

pub mod commit;
pub mod prerelease;
pub mod tag;
pub mod trigger;
pub mod version;

pub use commit::ParsedCommit;
pub use prerelease::{PrereleaseCounter, PrereleasePattern};
pub use tag::{TagSelector, VersionTag};
pub use trigger::TriggerRule;
pub use version::ChangeLevel;
