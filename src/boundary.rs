use std::fmt;

/// Non-fatal conditions met while reading the repository history.
/// They are reported to the user but never stop the run.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundaryWarning {
    /// Tags merged into HEAD whose names are not semantic versions
    NonSemverTags { tags: Vec<String> },
    /// Commit subjects skipped because they are not conventional commits
    NonConventionalCommits { skipped: usize, total: usize },
}

impl fmt::Display for BoundaryWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundaryWarning::NonSemverTags { tags } => {
                let shown: Vec<&str> = tags.iter().take(5).map(String::as_str).collect();
                write!(
                    f,
                    "Ignoring {} tag(s) that are not semantic versions: {}",
                    tags.len(),
                    shown.join(", ")
                )?;
                if tags.len() > shown.len() {
                    write!(f, ", ... and {} more", tags.len() - shown.len())?;
                }
                Ok(())
            }
            BoundaryWarning::NonConventionalCommits { skipped, total } => {
                write!(
                    f,
                    "Skipped {} of {} commit(s) that are not conventional commits",
                    skipped, total
                )
            }
        }
    }
}
