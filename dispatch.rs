use std::{
    io::Write,
    process::{Command, ExitCode, Stdio},
};

use crate::{resolver::changed_files, Backend, Error, Options, Patterns, Result};

/// Runs the trailing command of an invocation.
pub trait Runner {
    /// Run `command` to completion. Anything short of a zero exit status is an
    /// [`Error::Execution`].
    fn run(&self, command: &[String]) -> Result<()>;
}

/// Spawns the command as a child process sharing this process's standard
/// streams.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessRunner;

impl Runner for ProcessRunner {
    fn run(&self, command: &[String]) -> Result<()> {
        let Some((program, args)) = command.split_first() else {
            return Err(Error::Usage("no command to execute".into()));
        };
        tracing::debug!(?program, ?args, "running command");
        let status = Command::new(program)
            .args(args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .map_err(|error| Error::Execution {
                program: program.clone(),
                reason: error.to_string(),
            })?;
        if !status.success() {
            return Err(Error::Execution {
                program: program.clone(),
                reason: status.to_string(),
            });
        }
        Ok(())
    }
}

/// How an invocation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(test, derive(serde::Serialize))]
pub enum Outcome {
    /// Something matched and the command, if any, succeeded; or nothing
    /// matched but that was acceptable.
    Success,
    /// Nothing matched and nothing asked for that to be fine.
    NoMatch,
    /// An error stopped the invocation.
    Failure,
}

impl Outcome {
    pub fn code(self) -> u8 {
        match self {
            Outcome::Success => 0,
            Outcome::NoMatch => 1,
            Outcome::Failure => 2,
        }
    }
}

impl From<Outcome> for ExitCode {
    fn from(outcome: Outcome) -> Self {
        ExitCode::from(outcome.code())
    }
}

/// Report `matched` and decide whether to run the trailing command.
pub fn dispatch(
    options: &Options,
    matched: &[&str],
    runner: &dyn Runner,
    stdout: &mut dyn Write,
    stderr: &mut dyn Write,
) -> Result<Outcome> {
    if options.list {
        for file in matched {
            writeln!(stdout, "{file}")?;
        }
        stdout.flush()?;
    }

    if matched.is_empty() {
        writeln!(stderr, "No changes matched.")?;
        if !options.command.is_empty() || options.zero_exit {
            return Ok(Outcome::Success);
        }
        return Ok(Outcome::NoMatch);
    }

    if !options.command.is_empty() {
        runner.run(&options.command)?;
    }
    Ok(Outcome::Success)
}

/// Resolve, match and dispatch, reporting the first error on `stderr`.
///
/// `open` is only called once the patterns are known to be usable.
pub fn run<B: Backend>(
    options: &Options,
    open: impl FnOnce() -> Result<B>,
    runner: &dyn Runner,
    stdout: &mut dyn Write,
    stderr: &mut dyn Write,
) -> Outcome {
    match pipeline(options, open, runner, stdout, stderr) {
        Ok(outcome) => outcome,
        Err(error) => {
            let _ = writeln!(stderr, "Error: {error}");
            Outcome::Failure
        }
    }
}

fn pipeline<B: Backend>(
    options: &Options,
    open: impl FnOnce() -> Result<B>,
    runner: &dyn Runner,
    stdout: &mut dyn Write,
    stderr: &mut dyn Write,
) -> Result<Outcome> {
    let patterns = Patterns::compile(&options.patterns)?;
    let files = changed_files(open()?, &options.base, &options.current)?;
    let matched = patterns.matches(&files);
    tracing::debug!(
        changed = files.len(),
        matched = matched.len(),
        "matched changed files"
    );
    dispatch(options, &matched, runner, stdout, stderr)
}
