//! User interface module.
//!
//! A release run is non-interactive; everything here only reports progress.

pub mod formatter;

pub use formatter::{
    display_draft_created, display_dry_run_plan, display_error, display_manual_release_reminder,
    display_status, display_success, display_usage, display_version_change, display_warning,
    usage_text,
};
