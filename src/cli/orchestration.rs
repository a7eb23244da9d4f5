//! Main workflow orchestration logic
//!
//! This module contains the `describe` and `changelog` workflows. It keeps
//! CLI argument parsing apart from the business logic: arguments and the
//! configuration file are merged once into explicit settings, and each
//! workflow is a plain function over a [Repository] and those settings.

use tracing::{info, instrument, warn};

use crate::analyzer::{ChangeClassifier, History, Resolution, Triggers, VersionResolver};
use crate::boundary::BoundaryWarning;
use crate::changelog::{self, ChangelogTree, FormatSpec};
use crate::config::{ChangelogConfig, Config};
use crate::domain::version::with_metadata;
use crate::domain::commit::parse_all;
use crate::domain::{PrereleaseCounter, TagSelector};
use crate::error::Result;
use crate::git::Repository;
use crate::metadata::MetadataRegistry;

/// Arguments for the describe workflow
///
/// Mirrors the CLI options, where `None` means "use the configuration".
/// This decoupling allows the workflow to be called programmatically
/// without depending on clap.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DescribeArgs {
    /// Compute a prerelease instead of a release
    pub prerelease: bool,

    /// Also report the last version
    pub diff: bool,

    /// Do not append build metadata
    pub exclude_metadata: bool,

    /// Comma-separated metadata providers
    pub metadata: Option<String>,

    pub major_trigger: Option<String>,
    pub minor_trigger: Option<String>,
    pub patch_trigger: Option<String>,

    pub prerelease_pattern: Option<String>,
    pub old_prerelease_pattern: Option<String>,

    /// Create a signed tag named after the computed version
    pub create_tag: bool,

    /// Tag annotation, defaults to the version
    pub tag_message: Option<String>,
}

/// Fully resolved describe settings
#[derive(Debug, Clone)]
pub struct DescribeSettings {
    pub classifier: ChangeClassifier,
    pub counter: PrereleaseCounter,
    /// Metadata providers to run, `None` when metadata is disabled
    pub metadata: Option<String>,
    pub prerelease: bool,
    pub diff: bool,
    pub create_tag: bool,
    pub tag_message: Option<String>,
}

impl DescribeSettings {
    /// Merge the configuration with CLI overrides.
    ///
    /// Triggers and prerelease patterns are compiled here, so a bad value is
    /// reported before the repository is read.
    pub fn resolve(config: &Config, args: &DescribeArgs) -> Result<Self> {
        let triggers = Triggers::compile(
            args.major_trigger.as_deref().unwrap_or(&config.triggers.major),
            args.minor_trigger.as_deref().unwrap_or(&config.triggers.minor),
            args.patch_trigger.as_deref().unwrap_or(&config.triggers.patch),
        )?;

        let old_pattern = args
            .old_prerelease_pattern
            .as_deref()
            .or(config.prerelease.old_pattern.as_deref());
        let counter = PrereleaseCounter::new(
            args.prerelease_pattern
                .as_deref()
                .unwrap_or(&config.prerelease.pattern),
            old_pattern,
        )?;

        let providers = args
            .metadata
            .clone()
            .unwrap_or_else(|| config.metadata.providers.join(","));
        let excluded = args.exclude_metadata || config.metadata.exclude;
        let metadata = (!excluded && !providers.trim().is_empty()).then_some(providers);

        Ok(DescribeSettings {
            classifier: ChangeClassifier::new(triggers),
            counter,
            metadata,
            prerelease: args.prerelease,
            diff: args.diff,
            create_tag: args.create_tag,
            tag_message: args.tag_message.clone(),
        })
    }
}

/// Result of a describe run
#[derive(Debug, Clone, PartialEq)]
pub struct DescribeOutcome {
    /// The version describing HEAD
    pub version: String,

    /// The last version tag before this run, if any
    pub last_version: Option<String>,

    /// HEAD was already tagged with `version`
    pub unchanged: bool,

    /// Whether a signed tag was created
    pub tag_created: bool,

    pub warnings: Vec<BoundaryWarning>,
}

/// Arguments for the changelog workflow
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChangelogArgs {
    /// Start from the last version of any kind instead of the last release
    pub latest: bool,

    /// Use the Markdown preset
    pub markdown: bool,

    pub title_format: Option<String>,
    pub type_format: Option<String>,
    pub scope_format: Option<String>,
    pub list_format: Option<String>,
    pub item_format: Option<String>,
}

/// Fully resolved changelog settings
#[derive(Debug, Clone, PartialEq)]
pub struct ChangelogSettings {
    pub latest: bool,
    pub format: FormatSpec,
}

fn pick(cli: &Option<String>, file: &Option<String>, preset: String) -> String {
    cli.clone().or_else(|| file.clone()).unwrap_or(preset)
}

impl ChangelogSettings {
    /// Merge the preset, the configuration and CLI overrides, in that order.
    pub fn resolve(config: &Config, args: &ChangelogArgs) -> Result<Self> {
        let file: &ChangelogConfig = &config.changelog;
        let preset = if args.markdown || file.markdown {
            FormatSpec::markdown()
        } else {
            FormatSpec::default()
        };

        let format = FormatSpec::new(
            pick(&args.title_format, &file.title, preset.title),
            pick(&args.type_format, &file.r#type, preset.r#type),
            pick(&args.scope_format, &file.scope, preset.scope),
            pick(&args.list_format, &file.list, preset.list),
            pick(&args.item_format, &file.item, preset.item),
        )?;

        Ok(ChangelogSettings {
            latest: args.latest,
            format,
        })
    }
}

/// Result of a changelog run
#[derive(Debug, Clone, PartialEq)]
pub struct ChangelogOutcome {
    pub text: String,
    pub warnings: Vec<BoundaryWarning>,
}

fn tag_warnings(selector: &TagSelector) -> Vec<BoundaryWarning> {
    if selector.ignored().is_empty() {
        return Vec::new();
    }
    warn!(count = selector.ignored().len(), "ignoring non-semver tags");
    vec![BoundaryWarning::NonSemverTags {
        tags: selector.ignored().to_vec(),
    }]
}

fn commit_warning(subjects: &[String]) -> Option<BoundaryWarning> {
    let skipped = subjects.len() - parse_all(subjects).len();

    (skipped > 0).then(|| {
        warn!(skipped, total = subjects.len(), "skipping non-conventional commits");
        BoundaryWarning::NonConventionalCommits {
            skipped,
            total: subjects.len(),
        }
    })
}

/// Describe HEAD with the next semantic version
///
/// Orchestrates the whole computation:
/// 1. Select the last release and the last version among merged tags
/// 2. Collect commit subjects since each of them
/// 3. Resolve the next release or prerelease
/// 4. Append build metadata
/// 5. Optionally create a signed tag
///
/// # Arguments
///
/// * `repo` - Repository to describe
/// * `settings` - Resolved settings
///
/// # Returns
///
/// The computed version with diagnostics, or the first error met
#[instrument(skip_all, fields(prerelease = settings.prerelease))]
pub fn run_describe<R: Repository>(repo: &R, settings: &DescribeSettings) -> Result<DescribeOutcome> {
    let selector = TagSelector::new(repo.list_tags()?);
    let mut warnings = tag_warnings(&selector);

    let last_release = selector.last_release();
    let last_version = selector.last_any_version();

    let commits_since_release =
        repo.list_commit_subjects(last_release.map(|tag| tag.name.as_str()))?;
    let commits_since_version = if last_version == last_release {
        commits_since_release.clone()
    } else {
        repo.list_commit_subjects(last_version.map(|tag| tag.name.as_str()))?
    };
    warnings.extend(commit_warning(&commits_since_release));

    let history = History {
        last_release,
        last_version,
        commits_since_release: &commits_since_release,
        commits_since_version: &commits_since_version,
    };
    let resolver = VersionResolver::new(&settings.classifier, &settings.counter);

    let (version, unchanged) = match resolver.resolve(&history, settings.prerelease)? {
        Resolution::Unchanged(name) => (name, true),
        Resolution::Computed(next) => {
            let next = match &settings.metadata {
                Some(providers) => {
                    let metadata = MetadataRegistry::with_builtins(repo).compute(providers)?;
                    if metadata.is_empty() {
                        next
                    } else {
                        with_metadata(&next, &metadata)?
                    }
                }
                None => next,
            };
            (next.to_string(), false)
        }
    };

    let mut tag_created = false;
    if settings.create_tag {
        if unchanged {
            info!(tag = %version, "HEAD is already tagged, not creating a tag");
        } else {
            let message = settings.tag_message.as_deref().unwrap_or(&version);
            repo.create_signed_tag(&version, message)?;
            tag_created = true;
        }
    }

    info!(%version, unchanged, tag_created, "described HEAD");
    Ok(DescribeOutcome {
        version,
        last_version: last_version.map(|tag| tag.name.clone()),
        unchanged,
        tag_created,
        warnings,
    })
}

/// Render the changelog of the commits since the last release (or version)
#[instrument(skip_all, fields(latest = settings.latest))]
pub fn run_changelog<R: Repository>(
    repo: &R,
    settings: &ChangelogSettings,
) -> Result<ChangelogOutcome> {
    let selector = TagSelector::new(repo.list_tags()?);
    let mut warnings = tag_warnings(&selector);

    let since = if settings.latest {
        selector.last_any_version()
    } else {
        selector.last_release()
    }
    .map(|tag| tag.name.as_str());

    let mut subjects = repo.list_commit_subjects(since)?;
    warnings.extend(commit_warning(&subjects));
    subjects.reverse();

    let tree = ChangelogTree::from_subjects(&subjects);
    let text = tree.render(&changelog::title_for(since), &settings.format);

    info!(?since, commits = subjects.len(), "rendered changelog");
    Ok(ChangelogOutcome { text, warnings })
}
