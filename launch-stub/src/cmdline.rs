//! Flat command-line construction.
//!
//! Windows process creation takes one command-line string rather than an
//! argument vector; the child's C runtime splits the string back into argv.
//! [`CommandLine::build`] re-serializes an argument vector with the quoting
//! convention that splitter expects; any deviation silently corrupts
//! argument boundaries. The rules:
//!
//! - the executable path is emitted first, wrapped in quotes verbatim;
//! - an argument is wrapped in quotes iff it contains a space;
//! - `"` becomes `\"`;
//! - `\` is doubled when it precedes a `"`, another `\`, or (inside a
//!   quoted argument) the end of the argument; otherwise it stays single;
//! - arguments are separated by single spaces.

use crate::error::{LaunchError, Result};

/// Hard upper bound for a serialized command line, in bytes.
pub const MAX_CMDLINE_LENGTH: usize = 32_768;

/// A serialized child invocation: the flat command-line string plus the
/// vector it was built from.
#[derive(Debug, Clone)]
pub struct CommandLine {
    executable: String,
    args: Vec<String>,
    line: String,
}

impl CommandLine {
    /// Serializes `executable` and `args` into a flat command line.
    ///
    /// Fails with [`LaunchError::CommandLineTooLong`] once the result
    /// reaches [`MAX_CMDLINE_LENGTH`]; no truncated line is ever produced.
    pub fn build(executable: &str, args: &[String]) -> Result<Self> {
        let mut line = String::with_capacity(executable.len() + 2);
        line.push('"');
        line.push_str(executable);
        line.push('"');
        for arg in args {
            line.push(' ');
            push_escaped(&mut line, arg);
        }
        if line.len() >= MAX_CMDLINE_LENGTH {
            return Err(LaunchError::CommandLineTooLong {
                length: line.len(),
                limit: MAX_CMDLINE_LENGTH,
            });
        }
        Ok(Self {
            executable: executable.to_owned(),
            args: args.to_vec(),
            line,
        })
    }

    /// The flat command-line string, starting with the quoted executable.
    pub fn as_str(&self) -> &str {
        &self.line
    }

    /// The executable path, unquoted.
    pub fn executable(&self) -> &str {
        &self.executable
    }

    /// The argument vector the line was built from, without the executable.
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Everything after the quoted executable and its separating space;
    /// empty when there are no arguments.
    pub fn raw_args(&self) -> &str {
        if self.args.is_empty() {
            ""
        } else {
            &self.line[self.executable.len() + 3..]
        }
    }
}

fn push_escaped(line: &mut String, arg: &str) {
    let needs_quotes = arg.contains(' ');
    if needs_quotes {
        line.push('"');
    }
    let mut chars = arg.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            '"' => line.push_str("\\\""),
            '\\' => {
                let doubled = match chars.peek() {
                    // A trailing backslash must not swallow the closing quote.
                    None => needs_quotes,
                    Some(&next) => next == '"' || next == '\\',
                };
                line.push_str(if doubled { "\\\\" } else { "\\" });
            }
            _ => line.push(ch),
        }
    }
    if needs_quotes {
        line.push('"');
    }
}
