use crate::domain::{ChangeLevel, ParsedCommit, TriggerRule};
use crate::error::Result;
use tracing::debug;

/// The three trigger rules, one per bump level
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Triggers {
    pub major: TriggerRule,
    pub minor: TriggerRule,
    pub patch: TriggerRule,
}

impl Triggers {
    /// Compile the three trigger rules
    pub fn compile(major: &str, minor: &str, patch: &str) -> Result<Self> {
        Ok(Triggers {
            major: TriggerRule::compile(major)?,
            minor: TriggerRule::compile(minor)?,
            patch: TriggerRule::compile(patch)?,
        })
    }
}

impl Default for Triggers {
    fn default() -> Self {
        Triggers {
            major: TriggerRule::default_major(),
            minor: TriggerRule::default_minor(),
            patch: TriggerRule::default_patch(),
        }
    }
}

/// Classifies commits into change levels
#[derive(Debug, Clone, Default)]
pub struct ChangeClassifier {
    triggers: Triggers,
}

impl ChangeClassifier {
    /// Create a new classifier
    pub fn new(triggers: Triggers) -> Self {
        ChangeClassifier { triggers }
    }

    /// The triggers in use
    pub fn triggers(&self) -> &Triggers {
        &self.triggers
    }

    /// Classify one commit, checking major, then minor, then patch
    pub fn classify(&self, commit: &ParsedCommit) -> ChangeLevel {
        if self.triggers.major.evaluate(commit) {
            ChangeLevel::Major
        } else if self.triggers.minor.evaluate(commit) {
            ChangeLevel::Minor
        } else if self.triggers.patch.evaluate(commit) {
            ChangeLevel::Patch
        } else {
            ChangeLevel::None
        }
    }

    /// The greatest change among commit subjects.
    ///
    /// Subjects that are not conventional commits are skipped. An empty list,
    /// or one without conventional commits, yields `ChangeLevel::None`.
    pub fn greatest_change<S: AsRef<str>>(&self, subjects: &[S]) -> ChangeLevel {
        let greatest = subjects
            .iter()
            .filter_map(|subject| ParsedCommit::parse(subject.as_ref()))
            .map(|commit| self.classify(&commit))
            .max()
            .unwrap_or_default();

        debug!(commits = subjects.len(), %greatest, "classified commits");
        greatest
    }
}
