use regex::Regex;
use std::sync::OnceLock;

/// Groups: 1 = type, 2 = scope, 3 = breaking marker, 4 = summary
const CONVENTIONAL_COMMIT_PATTERN: &str = r"^(\w+)(?:\(([\w./-]+)\))?(!)?: (.*)$";

fn conventional_commit_regex() -> Option<&'static Regex> {
    static REGEX: OnceLock<Option<Regex>> = OnceLock::new();
    REGEX
        .get_or_init(|| Regex::new(CONVENTIONAL_COMMIT_PATTERN).ok())
        .as_ref()
}

/// Parsed representation of a conventional commit subject
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCommit {
    pub r#type: String,
    pub scope: Option<String>,
    pub summary: String,
    pub is_breaking_change: bool,
}

impl ParsedCommit {
    /// Parse a commit subject according to conventional commits.
    /// Supports formats:
    /// - type(scope)!: summary
    /// - type(scope): summary
    /// - type!: summary
    /// - type: summary
    ///
    /// Only the first line is considered. Anything else yields `None`; callers
    /// treat that as "not a conventional commit" and skip the subject.
    pub fn parse(subject: &str) -> Option<Self> {
        let first_line = subject.lines().next()?;
        let captures = conventional_commit_regex()?.captures(first_line)?;

        let r#type = captures.get(1)?.as_str().to_string();
        let scope = captures.get(2).map(|m| m.as_str().to_string());
        let is_breaking_change = captures.get(3).is_some();
        let summary = captures
            .get(4)
            .map(|m| m.as_str().trim().to_string())
            .unwrap_or_default();

        Some(ParsedCommit {
            r#type,
            scope,
            summary,
            is_breaking_change,
        })
    }
}

/// Parse every subject, silently dropping the ones that are not conventional.
pub fn parse_all<S: AsRef<str>>(subjects: &[S]) -> Vec<ParsedCommit> {
    subjects
        .iter()
        .filter_map(|s| ParsedCommit::parse(s.as_ref()))
        .collect()
}
