use crate::error::{Result, SemtagError};
use semver::{BuildMetadata, Prerelease, Version};
use std::fmt;

/// Version used when a repository has no stable release yet
pub const DEFAULT_RELEASE_VERSION: Version = Version::new(0, 1, 0);

/// Severity of a change set, in ascending order of importance
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum ChangeLevel {
    #[default]
    None,
    Patch,
    Minor,
    Major,
}

impl fmt::Display for ChangeLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ChangeLevel::None => "none",
            ChangeLevel::Patch => "patch",
            ChangeLevel::Minor => "minor",
            ChangeLevel::Major => "major",
        };
        f.write_str(name)
    }
}

/// Parse a full semantic version (`MAJOR.MINOR.PATCH[-PRE][+META]`).
///
/// No prefix is stripped: a tag named `v1.2.3` is not a version.
pub fn parse_version(text: &str) -> Result<Version> {
    Version::parse(text)
        .map_err(|e| SemtagError::version(format!("Invalid semantic version '{}': {}", text, e)))
}

/// The `MAJOR.MINOR.PATCH` part of a version, without prerelease or metadata
pub fn stable_part(version: &Version) -> Version {
    Version::new(version.major, version.minor, version.patch)
}

/// Bump a stable version according to a change level.
///
/// - **Major**: major += 1, minor = 0, patch = 0
/// - **Minor**: minor += 1, patch = 0
/// - **Patch**: patch += 1
/// - **None**: unchanged
///
/// Prerelease and build metadata of the input are dropped.
///
/// # Errors
/// Returns a version error when the bumped component would overflow.
pub fn bump(version: &Version, level: ChangeLevel) -> Result<Version> {
    let increment = |component: u64| {
        component.checked_add(1).ok_or_else(|| {
            SemtagError::version(format!("Version {} cannot be bumped any further", version))
        })
    };

    Ok(match level {
        ChangeLevel::Major => Version::new(increment(version.major)?, 0, 0),
        ChangeLevel::Minor => Version::new(version.major, increment(version.minor)?, 0),
        ChangeLevel::Patch => Version::new(version.major, version.minor, increment(version.patch)?),
        ChangeLevel::None => stable_part(version),
    })
}

/// Attach a prerelease identifier, validating it against the SemVer grammar.
pub fn with_prerelease(version: &Version, prerelease: &str) -> Result<Version> {
    let pre = Prerelease::new(prerelease).map_err(|e| {
        SemtagError::config(format!(
            "Prerelease '{}' is not a valid semantic version identifier: {}",
            prerelease, e
        ))
    })?;
    let mut next = version.clone();
    next.pre = pre;
    Ok(next)
}

/// Attach build metadata, validating it against the SemVer grammar.
pub fn with_metadata(version: &Version, metadata: &str) -> Result<Version> {
    let build = BuildMetadata::new(metadata).map_err(|e| {
        SemtagError::config(format!(
            "Metadata '{}' is not valid semantic version build metadata: {}",
            metadata, e
        ))
    })?;
    let mut next = version.clone();
    next.build = build;
    Ok(next)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_change_level_total_order() {
        assert!(ChangeLevel::None < ChangeLevel::Patch);
        assert!(ChangeLevel::Patch < ChangeLevel::Minor);
        assert!(ChangeLevel::Minor < ChangeLevel::Major);
        assert_eq!(
            [ChangeLevel::Minor, ChangeLevel::None, ChangeLevel::Major]
                .into_iter()
                .max(),
            Some(ChangeLevel::Major)
        );
    }

    #[test]
    fn test_version_parse() {
        let v = parse_version("1.2.3").unwrap();
        assert_eq!(v, Version::new(1, 2, 3));
    }

    #[test]
    fn test_version_parse_rejects_prefix_and_short_forms() {
        assert!(parse_version("v1.2.3").is_err());
        assert!(parse_version("1.2").is_err());
        assert!(parse_version("1.2.3.4").is_err());
        assert!(parse_version("01.2.3").is_err());
    }

    #[test]
    fn test_version_round_trip() {
        for text in ["0.1.0", "1.2.3-dev4", "2.0.0-rc.1+sha.abc", "3.4.5+20240101"] {
            assert_eq!(parse_version(text).unwrap().to_string(), text);
        }
    }

    #[test]
    fn test_version_bump_major() {
        let v = Version::new(1, 2, 3);
        assert_eq!(bump(&v, ChangeLevel::Major).unwrap(), Version::new(2, 0, 0));
    }

    #[test]
    fn test_version_bump_minor() {
        let v = Version::new(1, 2, 3);
        assert_eq!(bump(&v, ChangeLevel::Minor).unwrap(), Version::new(1, 3, 0));
    }

    #[test]
    fn test_version_bump_patch() {
        let v = Version::new(1, 2, 3);
        assert_eq!(bump(&v, ChangeLevel::Patch).unwrap(), Version::new(1, 2, 4));
    }

    #[test]
    fn test_version_bump_none_strips_metadata() {
        let v = parse_version("1.2.3+abc").unwrap();
        assert_eq!(bump(&v, ChangeLevel::None).unwrap(), Version::new(1, 2, 3));
    }

    #[test]
    fn test_version_bump_overflow_is_an_error() {
        let v = Version::new(1, u64::MAX, 7);
        let err = bump(&v, ChangeLevel::Minor).unwrap_err();
        assert!(matches!(err, SemtagError::Version(_)));
        assert_eq!(bump(&v, ChangeLevel::Major).unwrap(), Version::new(2, 0, 0));
        assert_eq!(
            bump(&v, ChangeLevel::Patch).unwrap(),
            Version::new(1, u64::MAX, 8)
        );
    }

    #[test]
    fn test_with_prerelease_validates() {
        let v = Version::new(1, 0, 0);
        assert_eq!(with_prerelease(&v, "dev1").unwrap().to_string(), "1.0.0-dev1");
        assert!(with_prerelease(&v, "dev_1").is_err());
        assert!(with_prerelease(&v, "01").is_err());
    }

    #[test]
    fn test_with_metadata_validates() {
        let v = parse_version("1.0.0-dev1").unwrap();
        assert_eq!(
            with_metadata(&v, "abc1234-20240102").unwrap().to_string(),
            "1.0.0-dev1+abc1234-20240102"
        );
        assert!(with_metadata(&v, "a b").is_err());
    }
}
