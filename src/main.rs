use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use git_semtag::cli::orchestration::{
    run_changelog, run_describe, ChangelogArgs, ChangelogSettings, DescribeArgs, DescribeSettings,
};
use git_semtag::config;
use git_semtag::git::Git2Repository;
use git_semtag::ui;

/// Environment variable holding the log filter
const LOG_ENV: &str = "SEMTAG_LOG";

#[derive(Parser)]
#[command(
    name = "git-semtag",
    version,
    about = "Compute semantic versions and changelogs from conventional commits"
)]
struct Args {
    #[arg(short, long, global = true, help = "Custom configuration file path")]
    config: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Describe HEAD with the next semantic version
    Describe(DescribeCommand),
    /// Print the changelog since the last release
    Changelog(ChangelogCommand),
}

#[derive(clap::Args)]
struct DescribeCommand {
    #[arg(short, long, help = "Describe a prerelease rather than a release")]
    prerelease: bool,

    #[arg(long, help = "Print also the last version")]
    diff: bool,

    #[arg(long, help = "Do not include build metadata")]
    exclude_metadata: bool,

    #[arg(
        short,
        long,
        value_name = "LIST",
        help = "Comma-separated metadata providers (sha, date)"
    )]
    metadata: Option<String>,

    #[arg(long, value_name = "EXPR", help = "Trigger for a major bump")]
    major_trigger: Option<String>,

    #[arg(long, value_name = "EXPR", help = "Trigger for a minor bump")]
    minor_trigger: Option<String>,

    #[arg(long, value_name = "EXPR", help = "Trigger for a patch bump")]
    patch_trigger: Option<String>,

    #[arg(long, value_name = "PATTERN", help = "Prerelease pattern, '(p)' marks the number")]
    prerelease_pattern: Option<String>,

    #[arg(
        long,
        value_name = "PATTERN",
        help = "Pattern of the previous prerelease, when it changed"
    )]
    old_prerelease_pattern: Option<String>,

    #[arg(long, help = "Create a signed tag with the computed version")]
    create_tag: bool,

    #[arg(long, requires = "create_tag", help = "Message of the created tag")]
    tag_message: Option<String>,
}

#[derive(clap::Args)]
struct ChangelogCommand {
    #[arg(long, help = "Start from the last version instead of the last release")]
    latest: bool,

    #[arg(long, help = "Use the Markdown preset")]
    markdown: bool,

    #[arg(short = 'T', long, value_name = "FORMAT", help = "Title format")]
    title_format: Option<String>,

    #[arg(short = 't', long, value_name = "FORMAT", help = "Type format")]
    type_format: Option<String>,

    #[arg(short = 's', long, value_name = "FORMAT", help = "Scope format")]
    scope_format: Option<String>,

    #[arg(short = 'l', long, value_name = "FORMAT", help = "List format")]
    list_format: Option<String>,

    #[arg(short = 'i', long, value_name = "FORMAT", help = "Item format")]
    item_format: Option<String>,
}

impl From<DescribeCommand> for DescribeArgs {
    fn from(cmd: DescribeCommand) -> Self {
        DescribeArgs {
            prerelease: cmd.prerelease,
            diff: cmd.diff,
            exclude_metadata: cmd.exclude_metadata,
            metadata: cmd.metadata,
            major_trigger: cmd.major_trigger,
            minor_trigger: cmd.minor_trigger,
            patch_trigger: cmd.patch_trigger,
            prerelease_pattern: cmd.prerelease_pattern,
            old_prerelease_pattern: cmd.old_prerelease_pattern,
            create_tag: cmd.create_tag,
            tag_message: cmd.tag_message,
        }
    }
}

impl From<ChangelogCommand> for ChangelogArgs {
    fn from(cmd: ChangelogCommand) -> Self {
        ChangelogArgs {
            latest: cmd.latest,
            markdown: cmd.markdown,
            title_format: cmd.title_format,
            type_format: cmd.type_format,
            scope_format: cmd.scope_format,
            list_format: cmd.list_format,
            item_format: cmd.item_format,
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let args = Args::parse();

    if let Err(e) = run(args) {
        ui::display_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let config = config::load_config(args.config.as_deref())?;

    match args.command {
        Command::Describe(cmd) => {
            // Settings are resolved before the repository is touched
            let settings = DescribeSettings::resolve(&config, &cmd.into())?;
            let repo = Git2Repository::open(".")
                .context("describe needs to be run inside a git repository")?;

            let outcome = run_describe(&repo, &settings)?;
            for warning in &outcome.warnings {
                ui::display_boundary_warning(warning);
            }

            if settings.diff && !outcome.unchanged {
                ui::display_last_version(outcome.last_version.as_deref());
            }
            ui::display_result(&outcome.version);

            if outcome.tag_created {
                ui::display_success(&format!("Created signed tag {}", outcome.version));
            }
        }
        Command::Changelog(cmd) => {
            let settings = ChangelogSettings::resolve(&config, &cmd.into())?;
            let repo = Git2Repository::open(".")
                .context("changelog needs to be run inside a git repository")?;

            let outcome = run_changelog(&repo, &settings)?;
            for warning in &outcome.warnings {
                ui::display_boundary_warning(warning);
            }
            ui::display_result(&outcome.text);
        }
    }

    Ok(())
}
