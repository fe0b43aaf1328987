//! User interface module - terminal output.
//!
//! Everything the user reads goes through here; diagnostics go through
//! `tracing` instead.

pub mod formatter;

// Re-export formatter functions for convenience
pub use formatter::{
    display_boundary_warning, display_commit_analysis, display_dry_run, display_error,
    display_proposed_version, display_status, display_success, format_category_summary,
    format_commit_list,
};
