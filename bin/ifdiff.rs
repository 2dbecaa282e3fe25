#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

use std::{
    io::{self, Write},
    path::PathBuf,
    process::ExitCode,
};

use clap::{CommandFactory, Parser as ClapParser};
use ifdiff::{GitBackend, Options, Outcome, ProcessRunner, DEFAULT_BASE};
use tracing_subscriber::EnvFilter;

const EXAMPLES: &str = "\
Examples:
  ifdiff --base=HEAD~1 --current=HEAD '**/*.go'
      Lists .go files that changed in the most recent commit. If no files are
      listed, the command exits with code 1.
  ifdiff --base=HEAD~1 --current=HEAD '**/*.go' -- go test ./...
      Runs 'go test ./...' if any .go files changed in the most recent commit.
  ifdiff '**/*.go' -- go fmt
      Runs 'go fmt' if any .go files have been modified but not committed.

Exit status:
  0  files matched (and the command succeeded), or nothing matched but a
     command was given or --zero was set
  1  nothing matched
  2  usage error, bad glob, repository error or failing command";

/// Run a command only if files matching a glob changed in git.
#[derive(ClapParser, Debug)]
#[command(author, version, about, long_about = None, after_help = EXAMPLES)]
pub struct Cli {
    /// The revision to diff against.
    #[arg(long, env = "IFDIFF_BASE", default_value = DEFAULT_BASE)]
    pub base: String,

    /// The revision to diff. If empty, modified and untracked files are
    /// included.
    #[arg(long, env = "IFDIFF_CURRENT")]
    pub current: Option<String>,

    /// Do not list the files that match the globs.
    #[arg(long = "nolist")]
    pub no_list: bool,

    /// Exit with code 0 even if no files match.
    #[arg(long)]
    pub zero: bool,

    /// Look for the repository from this directory instead of the current one.
    #[arg(short = 'C', long, default_value = ".")]
    pub repo: PathBuf,

    /// Globs selecting changed files. `*` does not cross `/`; use `**` for
    /// that.
    #[arg(value_name = "GLOB")]
    pub globs: Vec<String>,

    /// Command to run if any changed file matches.
    #[arg(last = true, value_name = "COMMAND")]
    pub command: Vec<String>,
}

impl From<Cli> for Options {
    fn from(cli: Cli) -> Self {
        Options {
            base: cli.base,
            current: cli.current.unwrap_or_default(),
            patterns: cli.globs,
            command: cli.command,
            list: !cli.no_list,
            zero_exit: cli.zero,
        }
    }
}

/// Complain about a command line without globs, followed by the usage line.
fn report_missing_globs(stderr: &mut dyn Write) -> io::Result<()> {
    writeln!(stderr, "Error: must specify at least one glob")?;
    writeln!(stderr)?;
    writeln!(stderr, "{}", Cli::command().render_usage())?;
    writeln!(stderr)?;
    writeln!(stderr, "For more information, try '--help'.")
}

#[cfg_attr(coverage_nightly, coverage(off))]
fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("IFDIFF_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let repo = cli.repo.clone();
    let options = Options::from(cli);
    tracing::debug!(?options, "parsed command line");
    if options.patterns.is_empty() {
        let _ = report_missing_globs(&mut io::stderr());
        return Outcome::Failure.into();
    }

    ifdiff::run(
        &options,
        || GitBackend::open(&repo),
        &ProcessRunner,
        &mut io::stdout().lock(),
        &mut io::stderr(),
    )
    .into()
}
