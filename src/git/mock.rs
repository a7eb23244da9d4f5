use crate::error::{Result, SemtagError};
use crate::git::Repository;
use std::cell::RefCell;

/// Mock repository with a linear history, for testing without git
#[derive(Debug, Default)]
pub struct MockRepository {
    /// Commit subjects, oldest first
    commits: Vec<String>,
    /// Tags in creation order, with the number of commits they cover
    tags: Vec<(String, usize)>,
    /// Signed tags requested through the trait, with their messages
    created: RefCell<Vec<(String, String)>>,
    fail_tag_creation: bool,
}

impl MockRepository {
    /// Create a new empty mock repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a commit on top of HEAD
    pub fn commit(&mut self, subject: impl Into<String>) -> &mut Self {
        self.commits.push(subject.into());
        self
    }

    /// Tag the current HEAD
    pub fn tag(&mut self, name: impl Into<String>) -> &mut Self {
        self.tags.push((name.into(), self.commits.len()));
        self
    }

    /// Make every later `create_signed_tag` call fail
    pub fn fail_tag_creation(&mut self) -> &mut Self {
        self.fail_tag_creation = true;
        self
    }

    /// Tags created through [Repository::create_signed_tag], with messages
    pub fn created_tags(&self) -> Vec<(String, String)> {
        self.created.borrow().clone()
    }

    fn tag_position(&self, name: &str) -> Result<usize> {
        self.tags
            .iter()
            .find(|(tag, _)| tag == name)
            .map(|(_, position)| *position)
            .ok_or_else(|| SemtagError::repository(format!("Cannot find tag '{}'", name)))
    }
}

impl Repository for MockRepository {
    fn list_commit_subjects(&self, since: Option<&str>) -> Result<Vec<String>> {
        let start = match since {
            Some(name) => self.tag_position(name)?,
            None => 0,
        };
        Ok(self.commits[start..].iter().rev().cloned().collect())
    }

    fn list_tags(&self) -> Result<Vec<String>> {
        let created = self.created.borrow();
        Ok(self
            .tags
            .iter()
            .map(|(name, _)| name.clone())
            .chain(created.iter().map(|(name, _)| name.clone()))
            .collect())
    }

    fn head_short_id(&self) -> Result<String> {
        if self.commits.is_empty() {
            return Err(SemtagError::repository("Cannot resolve HEAD: unborn branch"));
        }
        Ok(format!("{:07x}", 0xabc0000 + self.commits.len()))
    }

    fn create_signed_tag(&self, name: &str, message: &str) -> Result<()> {
        if self.fail_tag_creation {
            return Err(SemtagError::repository(format!(
                "git tag {} failed: gpg failed to sign the data",
                name
            )));
        }
        self.created
            .borrow_mut()
            .push((name.to_string(), message.to_string()));
        Ok(())
    }
}
