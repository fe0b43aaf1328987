use release_lit::boundary::BoundaryWarning;
use release_lit::ui;

// ============================================================================
// BoundaryWarning Display Tests
// ============================================================================

#[test]
fn test_boundary_warning_unparsable_tag_display() {
    let warning = BoundaryWarning::UnparsableTag {
        tag: "release-123".to_string(),
        reason: "Invalid format".to_string(),
    };

    let display_msg = warning.to_string();
    assert!(
        display_msg.contains("release-123"),
        "Message should contain tag 'release-123', got: {}",
        display_msg
    );
    assert!(
        display_msg.contains("Invalid format"),
        "Message should contain reason 'Invalid format', got: {}",
        display_msg
    );
}

#[test]
fn test_boundary_warning_undecodable_commit_display() {
    let warning = BoundaryWarning::UndecodableCommit {
        hash: "0123456789abcdef".to_string(),
        reason: "message is not valid UTF-8".to_string(),
    };

    let display_msg = warning.to_string();
    assert!(
        display_msg.contains("0123456"),
        "Message should contain shortened hash, got: {}",
        display_msg
    );
    assert!(
        !display_msg.contains("0123456789abcdef"),
        "Message should not contain the full hash, got: {}",
        display_msg
    );
    assert!(display_msg.contains("not valid UTF-8"));
}

#[test]
fn test_boundary_warning_no_previous_release_display() {
    let warning = BoundaryWarning::NoPreviousRelease {
        baseline: "1.0.0".to_string(),
    };
    assert_eq!(
        warning.to_string(),
        "No version tags found, starting at 1.0.0"
    );
}

#[test]
fn test_boundary_warning_no_release_needed_display() {
    let warning = BoundaryWarning::NoReleaseNeeded {
        latest_tag: "v2.3.4".to_string(),
    };

    let display_msg = warning.to_string();
    assert!(
        display_msg.contains("v2.3.4"),
        "Message should contain tag 'v2.3.4', got: {}",
        display_msg
    );
    assert!(display_msg.contains("nothing to release"));
}

// ============================================================================
// BoundaryWarning Equality Tests
// ============================================================================

#[test]
fn test_boundary_warning_equality() {
    let a = BoundaryWarning::MalformedCommit {
        hash: "abc".to_string(),
        subject: "wip".to_string(),
    };
    let b = a.clone();
    let c = BoundaryWarning::MalformedCommit {
        hash: "abc".to_string(),
        subject: "WIP".to_string(),
    };

    assert_eq!(a, b);
    assert_ne!(a, c);
}

// ============================================================================
// UI Display Tests
// ============================================================================

#[test]
fn test_display_boundary_warning_does_not_panic() {
    // Visual verification test - output is printed to stderr
    ui::display_boundary_warning(&BoundaryWarning::UnparsableTag {
        tag: "nightly".to_string(),
        reason: "not a version".to_string(),
    });
}
