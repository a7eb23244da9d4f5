use git_semtag::boundary::BoundaryWarning;
use git_semtag::ui;

// ============================================================================
// BoundaryWarning Display Tests
// ============================================================================

#[test]
fn test_boundary_warning_non_semver_tags_display() {
    let warning = BoundaryWarning::NonSemverTags {
        tags: vec!["v1.0.0".to_string(), "nightly".to_string()],
    };

    let display_msg = warning.to_string();
    assert!(
        display_msg.contains("not semantic versions"),
        "Message should explain why tags are ignored, got: {}",
        display_msg
    );
    assert!(
        display_msg.contains("v1.0.0") && display_msg.contains("nightly"),
        "Message should list the ignored tags, got: {}",
        display_msg
    );
    assert!(
        display_msg.contains("2 tag(s)"),
        "Message should count the ignored tags, got: {}",
        display_msg
    );
}

#[test]
fn test_boundary_warning_non_semver_tags_truncated() {
    let tags: Vec<String> = (0..8).map(|i| format!("build-{}", i)).collect();
    let warning = BoundaryWarning::NonSemverTags { tags };

    let display_msg = warning.to_string();
    assert!(display_msg.contains("build-4"));
    assert!(!display_msg.contains("build-5"));
    assert!(
        display_msg.ends_with("and 3 more"),
        "Message should mention the hidden tags, got: {}",
        display_msg
    );
}

#[test]
fn test_boundary_warning_non_conventional_commits_display() {
    let warning = BoundaryWarning::NonConventionalCommits {
        skipped: 2,
        total: 5,
    };

    let display_msg = warning.to_string();
    assert!(
        display_msg.contains("2 of 5"),
        "Message should contain counts, got: {}",
        display_msg
    );
    assert!(
        display_msg.contains("not conventional commits"),
        "Message should explain why commits are skipped, got: {}",
        display_msg
    );
}

// ============================================================================
// UI Formatting Tests
// ============================================================================

#[test]
fn test_format_boundary_warning() {
    let warning = BoundaryWarning::NonConventionalCommits {
        skipped: 1,
        total: 1,
    };
    let text = console::strip_ansi_codes(&ui::format_boundary_warning(&warning)).to_string();
    assert_eq!(text, format!("⚠ WARNING: {}", warning));
}

#[test]
fn test_format_error() {
    let text = console::strip_ansi_codes(&ui::format_error("no HEAD")).to_string();
    assert_eq!(text, "ERROR: no HEAD");
}
