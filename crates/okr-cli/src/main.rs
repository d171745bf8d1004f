//! `okr`: lint, aggregate and generate OKR status reports.
//!
//! Exit codes: 0 for clean reports, 1 for lint failures, 2 for anything
//! unanticipated (unreadable files, broken config, bad stdin).

use std::fs;
use std::io;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};

use okr_lint::{KrEntry, Report, SectionFilter};

mod config;
mod render;

use config::Config;

#[derive(Debug, Parser)]
#[command(name = "okr", version, about = "Lint, aggregate and generate OKR status reports")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Check reports against the format and structure rules
    Lint(ReportArgs),
    /// Lint reports and print them merged into one
    Cat(ReportArgs),
    /// Print a fresh report skeleton from the config
    Generate(GenerateArgs),
}

#[derive(Debug, Args)]
struct ReportArgs {
    /// Report files; standard input when none are given
    files: Vec<PathBuf>,

    /// Read only these sections (comma separated)
    #[arg(long, value_name = "SECTIONS", value_delimiter = ',')]
    include_sections: Vec<String>,

    /// Skip these sections (comma separated)
    #[arg(
        long,
        value_name = "SECTIONS",
        value_delimiter = ',',
        default_value = "OKR updates"
    )]
    ignore_sections: Vec<String>,

    /// Engineer view: read only the `Last week` section
    #[arg(short = 'e', long, conflicts_with = "team")]
    engineer: bool,

    /// Team view: skip the `OKR updates` section
    #[arg(short = 't', long)]
    team: bool,
}

impl ReportArgs {
    /// Build the section filter. The engineer preset replaces both
    /// section lists; the team preset only resets the ignore list and
    /// leaves `--include-sections` as given.
    fn filter(&self) -> SectionFilter {
        let mut include = self.include_sections.clone();
        let mut ignore = self.ignore_sections.clone();
        if self.engineer {
            include = vec!["Last week".to_string()];
            ignore = Vec::new();
        } else if self.team {
            ignore = vec!["OKR updates".to_string()];
        }
        SectionFilter::new()
            .with_includes(include)
            .with_ignores(ignore)
    }
}

#[derive(Debug, Args)]
struct GenerateArgs {
    /// Config file path
    #[arg(long, value_name = "PATH", default_value = config::DEFAULT_PATH)]
    config: PathBuf,
}

fn main() {
    init_tracing();
    let cli = Cli::parse();
    let result = match &cli.command {
        Commands::Lint(args) => run_lint(args),
        Commands::Cat(args) => run_cat(args),
        Commands::Generate(args) => run_generate(args),
    };
    match result {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("Caught unknown error while linting:\n\n{err:?}");
            std::process::exit(2);
        }
    }
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_env("OKR_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Run a closure over each input in argument order, stopping at the
/// first lint failure. Returns the process exit code.
fn for_each_input<F>(args: &ReportArgs, mut handle: F) -> anyhow::Result<i32>
where
    F: FnMut(Vec<KrEntry>),
{
    let filter = args.filter();
    if args.files.is_empty() {
        let text = io::read_to_string(io::stdin()).context("reading standard input")?;
        match okr_lint::lint(&text, &filter) {
            Ok(entries) => handle(entries),
            Err(failure) => {
                eprintln!("Error(s) in input stream:\n\n{failure}");
                return Ok(1);
            }
        }
        return Ok(0);
    }
    for path in &args.files {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        match okr_lint::lint(&text, &filter) {
            Ok(entries) => {
                tracing::info!(file = %path.display(), entries = entries.len(), "report ok");
                handle(entries);
            }
            Err(failure) => {
                eprintln!("Error(s) in file {}:\n\n{failure}", path.display());
                return Ok(1);
            }
        }
    }
    Ok(0)
}

fn run_lint(args: &ReportArgs) -> anyhow::Result<i32> {
    for_each_input(args, |_| {})
}

fn run_cat(args: &ReportArgs) -> anyhow::Result<i32> {
    let mut report = Report::new();
    let code = for_each_input(args, |entries| {
        report.merge(&Report::from_entries(entries));
    })?;
    if code == 0 {
        print!("{}", render::report_markdown(&report));
    }
    Ok(code)
}

fn run_generate(args: &GenerateArgs) -> anyhow::Result<i32> {
    let config = Config::load(&args.config)?;
    print!("{}", render::skeleton(&config));
    Ok(0)
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn clap_command_tree_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn lint_takes_positional_files() {
        let cli = Cli::try_parse_from(["okr", "lint", "a.md", "b.md"]).unwrap();
        let Commands::Lint(args) = cli.command else {
            panic!("expected lint");
        };
        assert_eq!(args.files.len(), 2);
        assert!(args.include_sections.is_empty());
        assert_eq!(args.ignore_sections, vec!["OKR updates".to_string()]);
    }

    #[test]
    fn default_filter_ignores_okr_updates() {
        let cli = Cli::try_parse_from(["okr", "lint"]).unwrap();
        let Commands::Lint(args) = cli.command else {
            panic!("expected lint");
        };
        let filter = args.filter();
        assert!(filter.should_visit("Last week"));
        assert!(!filter.should_visit("OKR updates"));
    }

    #[test]
    fn include_sections_split_on_commas() {
        let cli = Cli::try_parse_from([
            "okr",
            "lint",
            "--include-sections",
            "Last week,Next week",
        ])
        .unwrap();
        let Commands::Lint(args) = cli.command else {
            panic!("expected lint");
        };
        let filter = args.filter();
        assert!(filter.should_visit("Last week"));
        assert!(filter.should_visit("Next week"));
        assert!(!filter.should_visit("Other"));
    }

    #[test]
    fn engineer_view_reads_only_last_week() {
        let cli = Cli::try_parse_from(["okr", "lint", "-e"]).unwrap();
        let Commands::Lint(args) = cli.command else {
            panic!("expected lint");
        };
        let filter = args.filter();
        assert!(filter.should_visit("Last week"));
        assert!(!filter.should_visit("OKR updates"));
        assert!(!filter.should_visit("Anything else"));
        assert!(filter.has_includes());
    }

    #[test]
    fn engineer_view_overrides_explicit_sections() {
        let cli = Cli::try_parse_from([
            "okr",
            "lint",
            "--include-sections",
            "Other",
            "--ignore-sections",
            "Last week",
            "-e",
        ])
        .unwrap();
        let Commands::Lint(args) = cli.command else {
            panic!("expected lint");
        };
        let filter = args.filter();
        assert!(filter.should_visit("Last week"));
        assert!(!filter.should_visit("Other"));
    }

    #[test]
    fn team_view_ignores_okr_updates() {
        let cli = Cli::try_parse_from(["okr", "cat", "-t", "a.md"]).unwrap();
        let Commands::Cat(args) = cli.command else {
            panic!("expected cat");
        };
        let filter = args.filter();
        assert!(!filter.should_visit("OKR updates"));
        assert!(filter.should_visit("Last week"));
        assert!(!filter.has_includes());
    }

    #[test]
    fn team_view_keeps_explicit_includes() {
        let cli =
            Cli::try_parse_from(["okr", "lint", "--include-sections", "Next week", "-t"])
                .unwrap();
        let Commands::Lint(args) = cli.command else {
            panic!("expected lint");
        };
        let filter = args.filter();
        assert!(filter.should_visit("Next week"));
        assert!(!filter.should_visit("Last week"));
    }

    #[test]
    fn engineer_and_team_views_conflict() {
        assert!(Cli::try_parse_from(["okr", "lint", "-e", "-t"]).is_err());
    }

    #[test]
    fn generate_defaults_its_config_path() {
        let cli = Cli::try_parse_from(["okr", "generate"]).unwrap();
        let Commands::Generate(args) = cli.command else {
            panic!("expected generate");
        };
        assert_eq!(args.config, PathBuf::from("okr.yaml"));
    }

    #[test]
    fn subcommand_is_required() {
        assert!(Cli::try_parse_from(["okr"]).is_err());
    }

    fn report_args(files: Vec<PathBuf>) -> ReportArgs {
        ReportArgs {
            files,
            include_sections: Vec::new(),
            ignore_sections: vec!["OKR updates".to_string()],
            engineer: false,
            team: false,
        }
    }

    const CLEAN_REPORT: &str = "\
# Last week

## Platform

- Cache (PLAT1)
  - @alice (1 day)
  - Warmed the cache
";

    #[test]
    fn lint_reads_files_in_order_until_all_pass() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("first.md");
        let second = dir.path().join("second.md");
        fs::write(&first, CLEAN_REPORT).unwrap();
        fs::write(&second, CLEAN_REPORT).unwrap();
        assert_eq!(run_lint(&report_args(vec![first, second])).unwrap(), 0);
    }

    #[test]
    fn lint_stops_at_the_first_failing_file() {
        let dir = tempfile::tempdir().unwrap();
        let failing = dir.path().join("failing.md");
        fs::write(
            &failing,
            "# Last week\n\n## Platform\n\n- Cache (PLAT1)\n  - Warmed the cache\n",
        )
        .unwrap();
        // The second path never exists; exit code 1 instead of an IO
        // error means the loop stopped at the first failure.
        let args = report_args(vec![failing, dir.path().join("never-read.md")]);
        assert_eq!(run_lint(&args).unwrap(), 1);
    }

    #[test]
    fn unreadable_file_is_an_unanticipated_error() {
        let dir = tempfile::tempdir().unwrap();
        let args = report_args(vec![dir.path().join("missing.md")]);
        assert!(run_lint(&args).is_err());
    }
}
