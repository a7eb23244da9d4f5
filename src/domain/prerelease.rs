//! Prerelease identifier numbering
//!
//! A prerelease pattern is a template such as `dev(p)` or `rc.(p)` where the
//! `(p)` placeholder stands for an increasing number. Two patterns are held at
//! once: the current one renders new identifiers, the old one recognises the
//! identifier of the previous prerelease. They differ only while migrating
//! from one naming scheme to another (e.g. `alpha(p)` -> `beta(p)`).

use crate::error::{Result, SemtagError};
use regex::Regex;
use std::fmt;
use tracing::debug;

/// Placeholder replaced by the prerelease number
pub const PLACEHOLDER: &str = "(p)";

/// Pattern used when none is configured
pub const DEFAULT_PATTERN: &str = "dev(p)";

/// Number given to the first prerelease of a stable base
pub const FIRST_PRERELEASE: u64 = 1;

/// A template containing exactly one `(p)` placeholder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrereleasePattern {
    template: String,
}

impl PrereleasePattern {
    /// Validate and wrap a pattern template
    ///
    /// # Errors
    /// Returns a configuration error unless the template contains exactly one placeholder.
    pub fn new(template: impl Into<String>) -> Result<Self> {
        let template = template.into();
        match template.matches(PLACEHOLDER).count() {
            1 => Ok(PrereleasePattern { template }),
            0 => Err(SemtagError::config(format!(
                "Prerelease pattern '{}' does not contain the placeholder '{}'",
                template, PLACEHOLDER
            ))),
            _ => Err(SemtagError::config(format!(
                "Prerelease pattern '{}' contains the placeholder '{}' more than once",
                template, PLACEHOLDER
            ))),
        }
    }

    /// Render the pattern with the given number
    /// Example: pattern="dev(p)", number=3 -> "dev3"
    pub fn render(&self, number: u64) -> String {
        self.template.replacen(PLACEHOLDER, &number.to_string(), 1)
    }

    /// Extract the number from an identifier rendered by this pattern
    ///
    /// # Errors
    /// Returns a pattern mismatch error if the identifier was not produced by this pattern.
    pub fn extract_number(&self, identifier: &str) -> Result<u64> {
        // Escape everything, then turn the escaped placeholder into a numeric group
        let escaped = regex::escape(&self.template);
        let numeric = escaped.replacen(&regex::escape(PLACEHOLDER), r"(\d+)", 1);

        let re = Regex::new(&format!("^{}$", numeric)).map_err(|e| {
            SemtagError::config(format!(
                "Prerelease pattern '{}' cannot be matched: {}",
                self.template, e
            ))
        })?;

        re.captures(identifier)
            .and_then(|captures| captures.get(1))
            .and_then(|m| m.as_str().parse::<u64>().ok())
            .ok_or_else(|| SemtagError::pattern_mismatch(&self.template, identifier))
    }

    /// The raw template text
    pub fn as_str(&self) -> &str {
        &self.template
    }
}

impl Default for PrereleasePattern {
    fn default() -> Self {
        PrereleasePattern {
            template: DEFAULT_PATTERN.to_string(),
        }
    }
}

impl fmt::Display for PrereleasePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.template)
    }
}

/// Computes the next prerelease identifier
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PrereleaseCounter {
    current: PrereleasePattern,
    old: PrereleasePattern,
}

impl PrereleaseCounter {
    /// Build a counter from the current pattern and an optional old pattern.
    ///
    /// The old pattern defaults to the current one. Both are validated here,
    /// before any identifier is looked at.
    pub fn new(current: &str, old: Option<&str>) -> Result<Self> {
        let current = PrereleasePattern::new(current)?;
        let old = match old {
            Some(old) => PrereleasePattern::new(old)?,
            None => current.clone(),
        };
        Ok(PrereleaseCounter { current, old })
    }

    /// Pattern used to render new identifiers
    pub fn current(&self) -> &PrereleasePattern {
        &self.current
    }

    /// Pattern used to recognise the previous identifier
    pub fn old(&self) -> &PrereleasePattern {
        &self.old
    }

    /// Extract the number of a previous identifier using the old pattern
    pub fn extract_number(&self, identifier: &str) -> Result<u64> {
        self.old.extract_number(identifier)
    }

    /// Compute the identifier following `previous`.
    ///
    /// Without a previous identifier, or when `need_reset` is set, numbering
    /// restarts at 1. Otherwise the previous number is read with the old
    /// pattern, incremented, and rendered with the current pattern.
    ///
    /// # Examples
    /// ```
    /// # use git_semtag::domain::PrereleaseCounter;
    /// let counter = PrereleaseCounter::new("dev(p)", None).unwrap();
    /// assert_eq!(counter.compute_next(Some("dev2"), false).unwrap(), "dev3");
    /// assert_eq!(counter.compute_next(Some("dev2"), true).unwrap(), "dev1");
    /// ```
    pub fn compute_next(&self, previous: Option<&str>, need_reset: bool) -> Result<String> {
        let number = match previous {
            Some(previous) if !need_reset => {
                let last = self.extract_number(previous)?;
                debug!(previous, last, old_pattern = %self.old, "continuing prerelease numbering");
                last.checked_add(1).ok_or_else(|| {
                    SemtagError::config(format!(
                        "Prerelease number of '{}' cannot be incremented any further",
                        previous
                    ))
                })?
            }
            _ => FIRST_PRERELEASE,
        };
        Ok(self.current.render(number))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pattern_requires_placeholder() {
        assert!(PrereleasePattern::new("dev").is_err());
        assert!(PrereleasePattern::new("").is_err());
        assert!(PrereleasePattern::new("(p).(p)").is_err());
        assert!(PrereleasePattern::new("rc.(p)").is_ok());
    }

    #[test]
    fn test_pattern_render() {
        let pattern = PrereleasePattern::new("rc.(p)").unwrap();
        assert_eq!(pattern.render(4), "rc.4");
    }

    #[test]
    fn test_basic_extraction() {
        let counter = PrereleaseCounter::default();
        assert_eq!(counter.extract_number("dev2").unwrap(), 2);
    }

    #[test]
    fn test_extract_with_bare_placeholder() {
        let counter = PrereleaseCounter::new("(p)", None).unwrap();
        assert_eq!(counter.extract_number("3").unwrap(), 3);
    }

    #[test]
    fn test_extract_with_old_pattern() {
        let counter = PrereleaseCounter::new("beta(p)", Some("alpha(p)")).unwrap();
        assert_eq!(counter.extract_number("alpha3").unwrap(), 3);
    }

    #[test]
    fn test_extract_treats_pattern_text_literally() {
        let counter = PrereleaseCounter::new("rc.(p)", None).unwrap();
        assert_eq!(counter.extract_number("rc.12").unwrap(), 12);
        assert!(counter.extract_number("rcx12").is_err());
    }

    #[test]
    fn test_compute_next_increments() {
        let counter = PrereleaseCounter::default();
        assert_eq!(counter.compute_next(Some("dev2"), false).unwrap(), "dev3");
    }

    #[test]
    fn test_compute_next_reset() {
        let counter = PrereleaseCounter::default();
        assert_eq!(counter.compute_next(Some("dev2"), true).unwrap(), "dev1");
        assert_eq!(counter.compute_next(None, false).unwrap(), "dev1");
    }

    #[test]
    fn test_compute_next_migrates_pattern() {
        let counter = PrereleaseCounter::new("beta(p)", Some("alpha(p)")).unwrap();
        assert_eq!(counter.compute_next(Some("alpha3"), false).unwrap(), "beta4");
    }

    #[test]
    fn test_compute_next_mismatch_is_an_error() {
        let counter = PrereleaseCounter::new("beta(p)", Some("alpha(p)")).unwrap();
        let err = counter.compute_next(Some("beta3"), false).unwrap_err();
        match err {
            SemtagError::PatternMismatch {
                pattern,
                identifier,
            } => {
                assert_eq!(pattern, "alpha(p)");
                assert_eq!(identifier, "beta3");
            }
            other => panic!("expected a pattern mismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_counter_validates_both_patterns() {
        assert!(matches!(
            PrereleaseCounter::new("dev", None),
            Err(SemtagError::Configuration(_))
        ));
        assert!(matches!(
            PrereleaseCounter::new("dev(p)", Some("alpha")),
            Err(SemtagError::Configuration(_))
        ));
    }

    #[test]
    fn test_high_numbers() {
        let counter = PrereleaseCounter::default();
        assert_eq!(counter.compute_next(Some("dev99"), false).unwrap(), "dev100");
    }

    #[test]
    fn test_compute_next_at_counter_limit() {
        let counter = PrereleaseCounter::default();
        let err = counter
            .compute_next(Some("dev18446744073709551615"), false)
            .unwrap_err();
        assert!(matches!(err, SemtagError::Configuration(_)));
        assert_eq!(
            counter
                .compute_next(Some("dev18446744073709551614"), false)
                .unwrap(),
            "dev18446744073709551615"
        );
    }
}
