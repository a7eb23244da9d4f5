use crate::domain::tag::compare_precedence;
use crate::error::{Result, SemtagError};
use git2::{ObjectType, Oid, Repository as Git2Repo, Sort};
use semver::Version;
use std::cmp::Ordering;
use std::path::Path;
use std::process::Command;
use tracing::{debug, instrument};

/// Wrapper around git2::Repository with our trait interface
pub struct Git2Repository {
    repo: Git2Repo,
}

impl Git2Repository {
    /// Open or discover a git repository
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Git2Repo::discover(path.as_ref()).map_err(|e| {
            SemtagError::repository(format!(
                "Cannot open a git repository at '{}': {}",
                path.as_ref().display(),
                e.message()
            ))
        })?;

        Ok(Git2Repository { repo })
    }

    /// Create from existing git2::Repository
    pub fn from_git2(repo: Git2Repo) -> Self {
        Git2Repository { repo }
    }

    fn head_oid(&self) -> Result<Oid> {
        let head = self
            .repo
            .head()
            .map_err(|e| SemtagError::repository(format!("Cannot resolve HEAD: {}", e.message())))?;
        Ok(head.peel_to_commit()?.id())
    }

    fn tag_commit_oid(&self, tag_name: &str) -> Result<Oid> {
        let reference = self
            .repo
            .find_reference(&format!("refs/tags/{}", tag_name))
            .map_err(|e| {
                SemtagError::repository(format!("Cannot find tag '{}': {}", tag_name, e.message()))
            })?;

        Ok(reference.peel_to_commit()?.id())
    }

    /// Creation time and target commit of a tag, `None` when the tag does
    /// not point at a commit (a tree or a blob)
    fn tag_time(&self, tag_name: &str) -> Result<Option<(i64, Oid)>> {
        let reference = self.repo.find_reference(&format!("refs/tags/{}", tag_name))?;
        let commit = match reference.peel_to_commit() {
            Ok(commit) => commit,
            Err(e) => {
                debug!(tag = tag_name, error = e.message(), "skipping tag without a commit");
                return Ok(None);
            }
        };

        let tagger_time = reference
            .peel(ObjectType::Tag)
            .ok()
            .and_then(|object| object.into_tag().ok())
            .and_then(|tag| tag.tagger().map(|tagger| tagger.when().seconds()));

        Ok(Some((
            tagger_time.unwrap_or_else(|| commit.time().seconds()),
            commit.id(),
        )))
    }

    fn is_merged(&self, head: Oid, target: Oid) -> Result<bool> {
        Ok(head == target || self.repo.graph_descendant_of(head, target)?)
    }
}

fn compare_tag_names(a: &str, b: &str) -> Ordering {
    let by_version = match (Version::parse(a), Version::parse(b)) {
        (Ok(a_version), Ok(b_version)) => compare_precedence(&a_version, &b_version),
        _ => Ordering::Equal,
    };
    by_version.then_with(|| a.cmp(b))
}

impl super::Repository for Git2Repository {
    #[instrument(skip(self))]
    fn list_commit_subjects(&self, since: Option<&str>) -> Result<Vec<String>> {
        let mut revwalk = self.repo.revwalk()?;
        revwalk.set_sorting(Sort::TOPOLOGICAL | Sort::TIME)?;
        revwalk.push(self.head_oid()?)?;

        if let Some(tag_name) = since {
            revwalk.hide(self.tag_commit_oid(tag_name)?)?;
        }

        let mut subjects = Vec::new();
        for oid_result in revwalk {
            let commit = self.repo.find_commit(oid_result?)?;
            let summary = commit.summary_bytes().unwrap_or_default();
            subjects.push(String::from_utf8_lossy(summary).into_owned());
        }

        debug!(count = subjects.len(), "listed commit subjects");
        Ok(subjects)
    }

    #[instrument(skip(self))]
    fn list_tags(&self) -> Result<Vec<String>> {
        let head = self.head_oid()?;
        let names = self.repo.tag_names(None)?;

        let mut dated = Vec::new();
        for name in names.iter().flatten() {
            let Some((time, target)) = self.tag_time(name)? else {
                continue;
            };
            if self.is_merged(head, target)? {
                dated.push((time, name.to_string()));
            }
        }

        dated.sort_by(|(a_time, a_name), (b_time, b_name)| {
            a_time
                .cmp(b_time)
                .then_with(|| compare_tag_names(a_name, b_name))
        });

        debug!(count = dated.len(), "listed merged tags");
        Ok(dated.into_iter().map(|(_, name)| name).collect())
    }

    fn head_short_id(&self) -> Result<String> {
        let head = self.repo.find_object(self.head_oid()?, None)?;
        let short = head.short_id()?;
        short
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| SemtagError::repository("HEAD id is not valid UTF-8"))
    }

    #[instrument(skip(self, message))]
    fn create_signed_tag(&self, name: &str, message: &str) -> Result<()> {
        let workdir = self
            .repo
            .workdir()
            .unwrap_or_else(|| self.repo.path());

        let output = Command::new("git")
            .args(["tag", "-s", "-m", message, name])
            .current_dir(workdir)
            .output()?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(SemtagError::repository(format!(
                "git tag {} failed: {}",
                name, stderr
            )));
        }

        debug!(tag = name, "created signed tag");
        Ok(())
    }
}
