//! Command-line workflow

pub mod orchestration;

pub use orchestration::{run_release_workflow, ReleaseWorkflowArgs, WorkflowResult, WorkflowStatus};
