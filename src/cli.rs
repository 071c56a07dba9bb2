use crate::commands::{self, ReportFormat};
use crate::config::Overrides;
use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "import-path-fixer",
    version,
    about = "Repair broken relative imports against a module tree"
)]
struct Cli {
    /// Increase verbosity (-v, -vv). Uses RUST_LOG under the hood
    #[arg(short = 'v', action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Resolve every import, rewrite the targets and write a report
    Fix {
        #[command(flatten)]
        common: CommonArgs,
        /// Report file (defaults to import-fix-report.txt)
        #[arg(long)]
        report: Option<PathBuf>,
        /// Report format; inferred from the report extension when omitted
        #[arg(long, value_enum)]
        format: Option<ReportFormat>,
        /// Print the diff and report instead of writing them
        #[arg(long)]
        dry_run: bool,
    },
    /// Report what fix would change; exits non-zero if anything would
    Check {
        #[command(flatten)]
        common: CommonArgs,
        #[arg(long, value_enum)]
        format: Option<ReportFormat>,
    },
    /// Print the module index built from the root
    Index {
        /// Path to import-fixer.toml (defaults to current directory)
        #[arg(long)]
        config: Option<String>,
        /// Module root directory
        #[arg(long)]
        root: Option<PathBuf>,
    },
}

#[derive(Args, Debug)]
struct CommonArgs {
    /// Target files or glob patterns
    targets: Vec<String>,
    /// Path to import-fixer.toml (defaults to current directory)
    #[arg(long)]
    config: Option<String>,
    /// Module root directory
    #[arg(long)]
    root: Option<PathBuf>,
    /// Fuzzy similarity threshold in 0..=1
    #[arg(long)]
    threshold: Option<f32>,
}

impl CommonArgs {
    fn overrides(self, report: Option<PathBuf>) -> (Option<String>, Overrides) {
        let overrides = Overrides {
            root: self.root,
            targets: self.targets,
            report,
            threshold: self.threshold,
        };
        (self.config, overrides)
    }
}

fn init_tracing(verbosity: u8) {
    let level = match verbosity {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| level.to_string());
    // a second init (tests driving run_cli_with) is not an error
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(env_filter))
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init();
}

pub fn run_cli() -> Result<()> {
    dispatch(Cli::parse())
}

pub fn run_cli_with<I, S>(args: I) -> Result<()>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let args: Vec<String> = args.into_iter().map(Into::into).collect();
    dispatch(Cli::try_parse_from(args)?)
}

fn dispatch(cli: Cli) -> Result<()> {
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Fix {
            common,
            report,
            format,
            dry_run,
        } => {
            let (config, overrides) = common.overrides(report);
            commands::fix(config.as_deref(), overrides, format, dry_run)?
        }
        Commands::Check { common, format } => {
            let (config, overrides) = common.overrides(None);
            commands::check(config.as_deref(), overrides, format)?
        }
        Commands::Index { config, root } => {
            let overrides = Overrides {
                root,
                ..Overrides::default()
            };
            commands::index(config.as_deref(), overrides)?
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_fix_with_targets_and_flags() {
        let cli = Cli::try_parse_from([
            "import-path-fixer",
            "-v",
            "fix",
            "src/a.ts",
            "src/**/*.ts",
            "--threshold",
            "0.7",
            "--dry-run",
            "--format",
            "json",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 1);
        match cli.command {
            Commands::Fix {
                common,
                format,
                dry_run,
                ..
            } => {
                assert_eq!(common.targets, vec!["src/a.ts", "src/**/*.ts"]);
                assert_eq!(common.threshold, Some(0.7));
                assert_eq!(format, Some(ReportFormat::Json));
                assert!(dry_run);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn unknown_subcommand_is_rejected() {
        assert!(run_cli_with(["import-path-fixer", "frobnicate"]).is_err());
    }
}
