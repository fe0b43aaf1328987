use clap::Parser;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use release_lit::cli::{run_release_workflow, ReleaseWorkflowArgs, WorkflowStatus};
use release_lit::config;
use release_lit::git::Git2Repository;
use release_lit::ui;

#[derive(clap::Parser)]
#[command(
    name = "release-lit",
    version,
    about = "Cut a release from conventional commits: next version, changelog, manifest bump and tag"
)]
struct Args {
    #[arg(
        long = "cpath",
        visible_alias = "cp",
        value_name = "PATH",
        help = "Changelog path, relative to the repository root [default: CHANGELOG.md]"
    )]
    changelog: Option<String>,

    #[arg(
        short = 't',
        long = "type",
        value_name = "TYPE",
        help = "Project type: node, python or go [default: node]"
    )]
    project_type: Option<String>,

    #[arg(short, long, help = "Custom configuration file path")]
    config: Option<String>,

    #[arg(long, help = "Preview what would happen without making changes")]
    dry_run: bool,

    #[arg(long, help = "Release even when no commit warrants a version bump")]
    allow_empty: bool,

    #[arg(short, long, action = clap::ArgAction::Count, help = "Increase log verbosity (-v, -vv, -vvv)")]
    verbose: u8,
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr)
                .with_filter(filter),
        )
        .init();
}

fn main() {
    let args = Args::parse();
    init_tracing(args.verbose);

    let config = match config::load_config(args.config.as_deref()) {
        Ok(cfg) => cfg,
        Err(e) => {
            ui::display_error(&format!("Error loading config: {}", e));
            std::process::exit(1);
        }
    };

    let repo = match Git2Repository::open(".") {
        Ok(repo) => repo,
        Err(e) => {
            ui::display_error(&format!("Git repository error: {}", e));
            std::process::exit(1);
        }
    };

    let workflow_args = ReleaseWorkflowArgs {
        changelog_path: args.changelog,
        project_type: args.project_type,
        dry_run: args.dry_run,
        allow_empty: args.allow_empty,
    };
    let today = chrono::Local::now().date_naive();

    match run_release_workflow(&repo, &workflow_args, &config, today) {
        Ok(result) => {
            if result.status == WorkflowStatus::NothingToRelease {
                ui::display_status("Nothing to release");
            }
        }
        Err(e) => {
            ui::display_error(&format!("{:#}", e));
            std::process::exit(1);
        }
    }
}
