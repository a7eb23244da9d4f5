use git_semtag::boundary::BoundaryWarning;
use git_semtag::changelog::FormatSpec;
use git_semtag::cli::orchestration::{
    run_changelog, run_describe, ChangelogArgs, ChangelogSettings, DescribeArgs, DescribeSettings,
};
use git_semtag::config::Config;
use git_semtag::git::MockRepository;
use git_semtag::SemtagError;

fn settings(args: DescribeArgs) -> DescribeSettings {
    DescribeSettings::resolve(&Config::default(), &args).unwrap()
}

fn released_repo() -> MockRepository {
    let mut repo = MockRepository::new();
    repo.commit("feat: initial import").tag("1.2.3");
    repo
}

#[test]
fn test_describe_release_with_sha_metadata() {
    let mut repo = released_repo();
    repo.commit("fix: crash on empty input");

    let outcome = run_describe(&repo, &settings(DescribeArgs::default())).unwrap();
    assert!(outcome.version.starts_with("1.2.4+"));
    assert_eq!(outcome.last_version.as_deref(), Some("1.2.3"));
    assert!(!outcome.unchanged);
    assert!(!outcome.tag_created);
}

#[test]
fn test_describe_without_metadata() {
    let mut repo = released_repo();
    repo.commit("feat(api): add endpoint");

    let args = DescribeArgs {
        exclude_metadata: true,
        ..DescribeArgs::default()
    };
    assert_eq!(run_describe(&repo, &settings(args)).unwrap().version, "1.3.0");

    let args = DescribeArgs {
        metadata: Some(String::new()),
        ..DescribeArgs::default()
    };
    assert_eq!(run_describe(&repo, &settings(args)).unwrap().version, "1.3.0");
}

#[test]
fn test_describe_unknown_metadata_provider() {
    let mut repo = released_repo();
    repo.commit("feat: x");

    let args = DescribeArgs {
        metadata: Some("sha,branch".to_string()),
        ..DescribeArgs::default()
    };
    let err = run_describe(&repo, &settings(args)).unwrap_err();
    assert!(matches!(err, SemtagError::Configuration(_)));
    assert!(err.to_string().contains("'branch'"));
}

#[test]
fn test_describe_custom_trigger_override() {
    let mut repo = released_repo();
    repo.commit("docs: explain triggers");

    let args = DescribeArgs {
        exclude_metadata: true,
        minor_trigger: Some("type == 'feat' || type == 'docs'".to_string()),
        ..DescribeArgs::default()
    };
    assert_eq!(run_describe(&repo, &settings(args)).unwrap().version, "1.3.0");
}

#[test]
fn test_describe_invalid_trigger_is_rejected_early() {
    let args = DescribeArgs {
        major_trigger: Some("type ==".to_string()),
        ..DescribeArgs::default()
    };
    let err = DescribeSettings::resolve(&Config::default(), &args).unwrap_err();
    assert!(matches!(err, SemtagError::Configuration(_)));
}

#[test]
fn test_describe_prerelease_pattern_migration() {
    let mut repo = released_repo();
    repo.commit("feat: a").tag("1.3.0-alpha.3").commit("fix: b");

    let args = DescribeArgs {
        prerelease: true,
        exclude_metadata: true,
        prerelease_pattern: Some("beta.(p)".to_string()),
        old_prerelease_pattern: Some("alpha.(p)".to_string()),
        ..DescribeArgs::default()
    };
    assert_eq!(
        run_describe(&repo, &settings(args)).unwrap().version,
        "1.3.0-beta.4"
    );
}

#[test]
fn test_describe_prerelease_pattern_mismatch() {
    let mut repo = released_repo();
    repo.commit("feat: a").tag("1.3.0-rc1").commit("fix: b");

    let args = DescribeArgs {
        prerelease: true,
        exclude_metadata: true,
        ..DescribeArgs::default()
    };
    let err = run_describe(&repo, &settings(args)).unwrap_err();
    assert!(matches!(err, SemtagError::PatternMismatch { .. }));
}

#[test]
fn test_describe_first_prerelease_without_tags() {
    let mut repo = MockRepository::new();
    repo.commit("feat: initial import");

    let args = DescribeArgs {
        prerelease: true,
        exclude_metadata: true,
        ..DescribeArgs::default()
    };
    let outcome = run_describe(&repo, &settings(args)).unwrap();
    assert_eq!(outcome.version, "0.1.0-dev1");
    assert_eq!(outcome.last_version, None);
}

#[test]
fn test_describe_empty_repository() {
    let repo = MockRepository::new();
    let err = run_describe(&repo, &settings(DescribeArgs::default())).unwrap_err();
    assert!(matches!(err, SemtagError::RepositoryState(_)));
}

#[test]
fn test_describe_creates_tag_with_default_message() {
    let mut repo = released_repo();
    repo.commit("fix: a");

    let args = DescribeArgs {
        exclude_metadata: true,
        create_tag: true,
        ..DescribeArgs::default()
    };
    let outcome = run_describe(&repo, &settings(args)).unwrap();
    assert!(outcome.tag_created);
    assert_eq!(
        repo.created_tags(),
        vec![("1.2.4".to_string(), "1.2.4".to_string())]
    );
}

#[test]
fn test_describe_creates_tag_with_message() {
    let mut repo = released_repo();
    repo.commit("fix: a");

    let args = DescribeArgs {
        exclude_metadata: true,
        create_tag: true,
        tag_message: Some("Bugfix release".to_string()),
        ..DescribeArgs::default()
    };
    run_describe(&repo, &settings(args)).unwrap();
    assert_eq!(
        repo.created_tags(),
        vec![("1.2.4".to_string(), "Bugfix release".to_string())]
    );
}

#[test]
fn test_describe_tag_failure_propagates() {
    let mut repo = released_repo();
    repo.commit("fix: a").fail_tag_creation();

    let args = DescribeArgs {
        create_tag: true,
        ..DescribeArgs::default()
    };
    let err = run_describe(&repo, &settings(args)).unwrap_err();
    assert!(matches!(err, SemtagError::RepositoryState(_)));
}

#[test]
fn test_describe_unchanged_head_skips_tag_creation() {
    let repo = released_repo();

    let args = DescribeArgs {
        create_tag: true,
        ..DescribeArgs::default()
    };
    let outcome = run_describe(&repo, &settings(args)).unwrap();
    assert_eq!(outcome.version, "1.2.3");
    assert!(outcome.unchanged);
    assert!(!outcome.tag_created);
    assert!(repo.created_tags().is_empty());
}

#[test]
fn test_describe_reports_boundary_warnings() {
    let mut repo = MockRepository::new();
    repo.commit("feat: initial import")
        .tag("v0.1.0")
        .tag("0.1.0")
        .commit("Merge branch 'topic'")
        .commit("fix: a");

    let args = DescribeArgs {
        exclude_metadata: true,
        ..DescribeArgs::default()
    };
    let outcome = run_describe(&repo, &settings(args)).unwrap();
    assert_eq!(outcome.version, "0.1.1");
    assert_eq!(
        outcome.warnings,
        vec![
            BoundaryWarning::NonSemverTags {
                tags: vec!["v0.1.0".to_string()]
            },
            BoundaryWarning::NonConventionalCommits {
                skipped: 1,
                total: 2
            },
        ]
    );
}

#[test]
fn test_describe_is_deterministic() {
    let mut repo = released_repo();
    repo.commit("feat: a").commit("fix: b");

    let settings = settings(DescribeArgs {
        prerelease: true,
        ..DescribeArgs::default()
    });
    let first = run_describe(&repo, &settings).unwrap();
    let second = run_describe(&repo, &settings).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_changelog_settings_merge_order() {
    let mut config = Config::default();
    config.changelog.markdown = true;
    config.changelog.item = Some("* %s".to_string());
    config.changelog.title = Some("## %s".to_string());

    let args = ChangelogArgs {
        title_format: Some("= %s =".to_string()),
        ..ChangelogArgs::default()
    };
    let settings = ChangelogSettings::resolve(&config, &args).unwrap();
    assert_eq!(
        settings.format,
        FormatSpec {
            title: "= %s =".to_string(),
            r#type: "## %s".to_string(),
            scope: "### %s".to_string(),
            list: "%s".to_string(),
            item: "* %s".to_string(),
        }
    );
}

#[test]
fn test_changelog_latest_starts_from_last_version() {
    let mut repo = released_repo();
    repo.commit("feat: a").tag("1.3.0-dev1").commit("fix: b");

    let settings = ChangelogSettings::resolve(
        &Config::default(),
        &ChangelogArgs {
            latest: true,
            ..ChangelogArgs::default()
        },
    )
    .unwrap();
    let outcome = run_changelog(&repo, &settings).unwrap();
    assert_eq!(
        outcome.text,
        "# Changelog from version 1.3.0-dev1\n= fix\n- other\n* B\n"
    );

    let settings =
        ChangelogSettings::resolve(&Config::default(), &ChangelogArgs::default()).unwrap();
    let outcome = run_changelog(&repo, &settings).unwrap();
    assert!(outcome.text.starts_with("# Changelog from version 1.2.3\n= feat\n"));
}

#[test]
fn test_changelog_without_commits() {
    let repo = released_repo();
    let settings =
        ChangelogSettings::resolve(&Config::default(), &ChangelogArgs::default()).unwrap();
    let outcome = run_changelog(&repo, &settings).unwrap();
    assert_eq!(outcome.text, "# Changelog from version 1.2.3\n\n");
    assert!(outcome.warnings.is_empty());
}
