use crate::domain::version::parse_version;
use semver::Version;
use std::cmp::Ordering;

/// A repository tag whose name is a full semantic version
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionTag {
    pub name: String,
    pub version: Version,
}

impl VersionTag {
    /// Create a version tag if the name parses as a semantic version
    pub fn parse(name: impl Into<String>) -> Option<Self> {
        let name = name.into();
        let version = parse_version(&name).ok()?;
        Some(VersionTag { name, version })
    }

    /// Whether this tag is a stable release (no prerelease component)
    pub fn is_release(&self) -> bool {
        self.version.pre.is_empty()
    }
}

/// Compare two versions by SemVer precedence.
///
/// Major, minor and patch compare as integers, then the prerelease compares
/// per the SemVer rules (a release outranks any of its prereleases, numeric
/// identifiers compare numerically). Build metadata does not take part.
pub fn compare_precedence(a: &Version, b: &Version) -> Ordering {
    a.major
        .cmp(&b.major)
        .then(a.minor.cmp(&b.minor))
        .then(a.patch.cmp(&b.patch))
        .then_with(|| a.pre.cmp(&b.pre))
}

/// Selects release tags out of all repository tags
///
/// The input order is taken as the order in which tags were created, oldest
/// first. Tags that are not semantic versions are set aside.
#[derive(Debug, Clone, Default)]
pub struct TagSelector {
    tags: Vec<VersionTag>,
    ignored: Vec<String>,
}

impl TagSelector {
    /// Build a selector from tag names in creation order
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut tags = Vec::new();
        let mut ignored = Vec::new();

        for name in names {
            let name = name.into();
            match VersionTag::parse(name.as_str()) {
                Some(tag) => tags.push(tag),
                None => ignored.push(name),
            }
        }

        TagSelector { tags, ignored }
    }

    /// The greatest stable release by version precedence
    pub fn last_release(&self) -> Option<&VersionTag> {
        self.tags
            .iter()
            .filter(|tag| tag.is_release())
            .max_by(|a, b| compare_precedence(&a.version, &b.version))
    }

    /// The most recently created version tag, prerelease or not
    pub fn last_any_version(&self) -> Option<&VersionTag> {
        self.tags.last()
    }

    /// All version tags in creation order
    pub fn tags(&self) -> &[VersionTag] {
        &self.tags
    }

    /// Tag names that are not semantic versions
    pub fn ignored(&self) -> &[String] {
        &self.ignored
    }
}
