// Copyright © 2025 Lukas Bower
// SPDX-License-Identifier: Apache-2.0
// Purpose: Command loop driving the vmsh topology engine from scripts and terminals.
// Author: Lukas Bower
#![forbid(unsafe_code)]
#![warn(missing_docs)]

//! Command loop driving the vmsh topology engine.
//!
//! The shell reads one command per line, evaluates it against a [`Vmsh`]
//! topology and prints the rendered result. Failures reported by the engine
//! are printed on the error stream and the loop carries on; engine defects and
//! I/O failures end the loop with an error.

pub mod config;

use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use log::debug;
use vmsh_core::{Value, Vmsh, VmshError};

pub use config::{
    default_config_path, load_config, validate_config, NicConfig, ShellConfig, VmshConfig,
    DEFAULT_PROMPT,
};

/// Result of executing a single shell command.
#[derive(Debug, PartialEq, Eq)]
pub enum CommandStatus {
    /// Continue reading commands.
    Continue,
    /// Exit the shell loop.
    Quit,
}

/// Shell driver feeding command lines into the topology engine.
pub struct Shell<W: Write, E: Write> {
    vmsh: Vmsh,
    writer: W,
    errors: E,
    prompt: String,
}

impl<W: Write, E: Write> Shell<W, E> {
    /// Create a shell over `vmsh`, printing results to `writer` and failures to `errors`.
    pub fn new(vmsh: Vmsh, writer: W, errors: E) -> Self {
        Self {
            vmsh,
            writer,
            errors,
            prompt: DEFAULT_PROMPT.to_owned(),
        }
    }

    /// Replace the interactive prompt.
    #[must_use]
    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    /// Borrow the topology engine.
    pub fn vmsh(&self) -> &Vmsh {
        &self.vmsh
    }

    /// Execute commands from a buffered reader until EOF or `quit` is encountered.
    ///
    /// Blank lines and `#` comments are skipped.
    pub fn run_script<R: BufRead>(&mut self, reader: R) -> Result<()> {
        for (index, line) in reader.lines().enumerate() {
            let line = line.with_context(|| format!("failed to read script line {}", index + 1))?;
            let command = strip_comment(&line);
            if command.is_empty() {
                continue;
            }
            if self.step(command)? == CommandStatus::Quit {
                break;
            }
        }
        Ok(())
    }

    /// Run an interactive loop, printing the prompt before every line.
    ///
    /// End of input closes the loop as if `quit` had been typed.
    pub fn repl<R: BufRead>(&mut self, mut reader: R) -> Result<()> {
        let mut line = String::new();
        loop {
            write!(self.writer, "{}", self.prompt)?;
            self.writer.flush()?;
            line.clear();
            if reader.read_line(&mut line)? == 0 {
                writeln!(self.writer)?;
                break;
            }
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            if self.step(trimmed)? == CommandStatus::Quit {
                break;
            }
        }
        Ok(())
    }

    /// Execute a single command line.
    ///
    /// Every engine failure is returned; callers that keep a loop alive use
    /// [`Shell::step`] instead.
    pub fn execute(&mut self, line: &str) -> Result<CommandStatus> {
        let value = self.vmsh.evaluate(line)?;
        if value == Value::Exit {
            debug!("quit requested");
            return Ok(CommandStatus::Quit);
        }
        for rendered in self.vmsh.render(&value) {
            writeln!(self.writer, "{rendered}")?;
        }
        Ok(CommandStatus::Continue)
    }

    /// Execute a line, reporting recoverable engine failures on the error stream.
    pub fn step(&mut self, line: &str) -> Result<CommandStatus> {
        match self.execute(line) {
            Err(err) => match err.downcast_ref::<VmshError>() {
                Some(failure) if !failure.is_internal() => {
                    debug!("command {line:?} failed: {failure}");
                    writeln!(self.errors, "{failure}")?;
                    Ok(CommandStatus::Continue)
                }
                _ => Err(err),
            },
            status => status,
        }
    }

    /// Consume the shell and return the engine and both writers.
    pub fn into_parts(self) -> (Vmsh, W, E) {
        (self.vmsh, self.writer, self.errors)
    }
}

fn strip_comment(line: &str) -> &str {
    let code = match line.find('#') {
        Some(index) => &line[..index],
        None => line,
    };
    code.trim()
}
