//! External command boundary.
//!
//! Every deployment step outside this crate's own logic (composer, lando,
//! drush, mysql) funnels through [`ToolRunner`], so workflows can be
//! exercised in tests without spawning anything.

use crate::error::Error;
use std::path::Path;
use std::process::Command;

pub trait ToolRunner {
    /// Run a program with arguments, optionally in a working directory.
    fn run(&self, program: &str, args: &[String], dir: Option<&Path>) -> Result<(), Error>;

    /// Run a full shell line (used for the `zcat | mysql` import pipe).
    fn run_shell(&self, script: &str) -> Result<(), Error>;
}

/// Split a configured command string into program and leading arguments.
pub fn split_command(command: &str) -> Result<(String, Vec<String>), Error> {
    let mut words = shell_words::split(command)
        .map_err(|err| Error::Config(format!("cannot parse command '{command}': {err}")))?;
    if words.is_empty() {
        return Err(Error::Config(format!("empty command string: '{command}'")));
    }
    let program = words.remove(0);
    Ok((program, words))
}

/// Spawns commands with inherited stdio so tool output reaches the operator.
pub struct ShellRunner;

impl ShellRunner {
    fn wait(mut command: Command, rendered: String) -> Result<(), Error> {
        tracing::debug!(command = %rendered, "running");
        let status = command.status()?;
        if !status.success() {
            return Err(Error::Tool {
                command: rendered,
                code: status.code().unwrap_or(-1),
            });
        }
        Ok(())
    }
}

impl ToolRunner for ShellRunner {
    fn run(&self, program: &str, args: &[String], dir: Option<&Path>) -> Result<(), Error> {
        let resolved = which::which(program).map_err(|_| {
            Error::Config(format!("required tool '{program}' was not found on PATH"))
        })?;
        let mut command = Command::new(resolved);
        command.args(args);
        if let Some(dir) = dir {
            command.current_dir(dir);
        }
        let mut rendered = program.to_string();
        for arg in args {
            rendered.push(' ');
            rendered.push_str(arg);
        }
        Self::wait(command, rendered)
    }

    fn run_shell(&self, script: &str) -> Result<(), Error> {
        let mut command = Command::new("sh");
        command.args(["-c", script]);
        Self::wait(command, script.to_string())
    }
}
