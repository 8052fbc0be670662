use pkg_publish::boundary::AdvisoryWarning;
use pkg_publish::ui;

// ============================================================================
// AdvisoryWarning Display Tests
// ============================================================================

#[test]
fn test_advisory_release_cli_missing_display() {
    let warning = AdvisoryWarning::ReleaseCliMissing {
        program: "gh".to_string(),
    };

    let display_msg = warning.to_string();
    assert!(
        display_msg.contains("'gh' is not installed"),
        "Message should name the missing program, got: {}",
        display_msg
    );
    assert!(
        display_msg.contains("manually"),
        "Message should say the release must be created manually, got: {}",
        display_msg
    );
}

#[test]
fn test_advisory_tag_count_mismatch_display() {
    let warning = AdvisoryWarning::TagCountMismatch { found: 3 };

    let display_msg = warning.to_string();
    assert!(
        display_msg.contains("exactly two"),
        "Message should state the expected count, got: {}",
        display_msg
    );
    assert!(
        display_msg.contains("found 3"),
        "Message should contain the found count, got: {}",
        display_msg
    );
}

#[test]
fn test_advisory_release_draft_failed_display() {
    let warning = AdvisoryWarning::ReleaseDraftFailed {
        tag: "v1.2.4".to_string(),
        reason: "HTTP 401: Bad credentials".to_string(),
    };

    let display_msg = warning.to_string();
    assert!(
        display_msg.contains("v1.2.4"),
        "Message should contain tag 'v1.2.4', got: {}",
        display_msg
    );
    assert!(
        display_msg.contains("Bad credentials"),
        "Message should contain the reason, got: {}",
        display_msg
    );
}

#[test]
fn test_advisory_warnings_are_comparable() {
    assert_eq!(
        AdvisoryWarning::TagCountMismatch { found: 1 },
        AdvisoryWarning::TagCountMismatch { found: 1 }
    );
    assert_ne!(
        AdvisoryWarning::TagCountMismatch { found: 1 },
        AdvisoryWarning::TagCountMismatch { found: 0 }
    );
}

// ============================================================================
// Display Function Tests
// ============================================================================

#[test]
fn test_display_warning_does_not_panic() {
    // Visual verification test - output is printed to stderr
    ui::display_warning(&AdvisoryWarning::ReleaseCliMissing {
        program: "gh".to_string(),
    });
}

#[test]
fn test_display_dry_run_plan_does_not_panic() {
    ui::display_dry_run_plan(&[
        "Create the signed tag v1.2.4".to_string(),
        "Push to origin with tags".to_string(),
    ]);
}

#[test]
fn test_usage_text_mentions_prerelease_flag() {
    let usage = ui::usage_text();
    assert!(usage.contains("IS_RELEASE_CANDIDATE"));
    assert!(usage.contains("--config"));
}
