use crate::analyzer::ChangeClassifier;
use crate::domain::version::{self, DEFAULT_RELEASE_VERSION};
use crate::domain::{PrereleaseCounter, VersionTag};
use crate::error::{Result, SemtagError};
use semver::Version;
use tracing::{debug, info};

/// What the repository history looks like from HEAD
#[derive(Debug, Clone, Copy)]
pub struct History<'a> {
    /// Greatest stable release tag, if any
    pub last_release: Option<&'a VersionTag>,
    /// Most recently created version tag of any kind, if any
    pub last_version: Option<&'a VersionTag>,
    /// Commit subjects since `last_release` (whole history without one)
    pub commits_since_release: &'a [String],
    /// Commit subjects since `last_version` (whole history without one)
    pub commits_since_version: &'a [String],
}

/// Outcome of a version resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// HEAD is already described by this tag; it is returned verbatim
    Unchanged(String),
    /// A new version, without build metadata
    Computed(Version),
}

/// Derives the next version from tags and commit history
#[derive(Debug, Clone, Copy)]
pub struct VersionResolver<'a> {
    classifier: &'a ChangeClassifier,
    counter: &'a PrereleaseCounter,
}

impl<'a> VersionResolver<'a> {
    /// Create a new resolver over resolved settings
    pub fn new(classifier: &'a ChangeClassifier, counter: &'a PrereleaseCounter) -> Self {
        VersionResolver {
            classifier,
            counter,
        }
    }

    /// Next stable version given the last release and the commits since it.
    ///
    /// Without a release the answer is always `0.1.0`.
    ///
    /// # Errors
    /// Returns a version error when the bump would overflow a component.
    pub fn resolve_stable<S: AsRef<str>>(
        &self,
        last_release: Option<&Version>,
        commits_since_release: &[S],
    ) -> Result<Version> {
        match last_release {
            None => Ok(DEFAULT_RELEASE_VERSION),
            Some(release) => {
                let level = self.classifier.greatest_change(commits_since_release);
                let next = version::bump(release, level)?;
                debug!(%release, %level, %next, "bumped stable version");
                Ok(next)
            }
        }
    }

    /// Next prerelease on top of `new_stable`, continuing from `previous`.
    ///
    /// Numbering restarts when the stable base moved or the previous version
    /// was not a prerelease.
    ///
    /// # Errors
    /// - `NoChange` when `previous` is the release `new_stable` itself
    /// - `PatternMismatch` when the previous prerelease does not fit the old pattern
    pub fn resolve_prerelease(
        &self,
        new_stable: &Version,
        previous: Option<&Version>,
    ) -> Result<Version> {
        let identifier = match previous {
            None => self.counter.compute_next(None, true)?,
            Some(previous) => {
                let previous_base = version::stable_part(previous);
                let previous_pre = (!previous.pre.is_empty()).then(|| previous.pre.as_str());

                if previous_base == *new_stable && previous_pre.is_none() {
                    return Err(SemtagError::no_change(format!(
                        "no changes since release {}",
                        previous
                    )));
                }

                let need_reset = previous_base != *new_stable;
                self.counter.compute_next(previous_pre, need_reset)?
            }
        };

        version::with_prerelease(new_stable, &identifier)
    }

    /// Resolve the version describing HEAD.
    ///
    /// # Errors
    /// Fails when there is nothing to describe, when a prerelease would not
    /// change anything, or when the previous prerelease cannot be read.
    pub fn resolve(&self, history: &History<'_>, prerelease: bool) -> Result<Resolution> {
        match history.last_version {
            Some(last) if history.commits_since_version.is_empty() => {
                info!(version = %last.name, "no commits since last version");
                return Ok(Resolution::Unchanged(last.name.clone()));
            }
            None if history.commits_since_version.is_empty() => {
                return Err(SemtagError::repository("the repository has no commits"));
            }
            _ => {}
        }

        let new_stable = self.resolve_stable(
            history.last_release.map(|tag| &tag.version),
            history.commits_since_release,
        )?;

        let next = if prerelease {
            self.resolve_prerelease(&new_stable, history.last_version.map(|tag| &tag.version))?
        } else {
            new_stable
        };

        info!(%next, prerelease, "resolved next version");
        Ok(Resolution::Computed(next))
    }
}
