use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;
use thiserror::Error;
use tracing::{debug, info, instrument};

/// Placeholder that expands to one argument per structure file.
pub const STRUCTURES_PLACEHOLDER: &str = "{structures}";

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Failed to launch '{program}' for {tool}: {source}")]
    Spawn {
        tool: String,
        program: String,
        #[source]
        source: io::Error,
    },
    #[error("Failed to remove stale output '{}' of {tool}: {source}", path.display())]
    StaleOutput {
        tool: String,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Unknown placeholder '{{{placeholder}}}' in arguments of {tool}")]
    UnknownPlaceholder { tool: String, placeholder: String },
    #[error("Unterminated placeholder in argument '{argument}' of {tool}")]
    UnterminatedPlaceholder { tool: String, argument: String },
}

/// The result of running an external program to completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolOutcome {
    /// Exit status zero and every expected output present.
    Success,
    /// Non-zero exit status, or termination by a signal (`status` is `None`).
    ToolFailure { status: Option<i32>, stderr: String },
    /// Exit status zero but some expected outputs were not written.
    MissingOutput { missing: Vec<PathBuf> },
}

/// Values substituted into a tool's argument template.
#[derive(Debug, Clone, Default)]
pub struct ToolArguments {
    values: HashMap<String, String>,
    structures: Vec<String>,
}

impl ToolArguments {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &str, value: impl Into<String>) -> Self {
        self.values.insert(name.to_string(), value.into());
        self
    }

    pub fn with_structures(mut self, structures: Vec<String>) -> Self {
        self.structures = structures;
        self
    }
}

/// An external program and its argument template.
///
/// Arguments may contain `{name}` placeholders filled from [`ToolArguments`]; an argument
/// that is exactly [`STRUCTURES_PLACEHOLDER`] expands to the whole structure list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalTool {
    pub name: String,
    pub program: String,
    pub args: Vec<String>,
}

impl ExternalTool {
    pub fn new(name: &str, program: &str, args: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            program: program.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
        }
    }

    /// Expands the argument template.
    ///
    /// `{{` and `}}` stand for literal braces.
    ///
    /// # Errors
    ///
    /// Fails on a placeholder with no value or on an unclosed `{`.
    pub fn render_args(&self, arguments: &ToolArguments) -> Result<Vec<String>, ToolError> {
        let mut rendered = Vec::with_capacity(self.args.len());
        for arg in &self.args {
            if arg == STRUCTURES_PLACEHOLDER {
                rendered.extend(arguments.structures.iter().cloned());
                continue;
            }
            rendered.push(self.substitute(arg, arguments)?);
        }
        Ok(rendered)
    }

    fn substitute(&self, arg: &str, arguments: &ToolArguments) -> Result<String, ToolError> {
        let mut out = String::with_capacity(arg.len());
        let mut rest = arg;
        while let Some(pos) = rest.find(['{', '}']) {
            out.push_str(&rest[..pos]);
            let tail = &rest[pos..];
            if tail.starts_with("{{") || tail.starts_with("}}") {
                out.push_str(&tail[..1]);
                rest = &tail[2..];
                continue;
            }
            let after = &tail[1..];
            if tail.starts_with('}') {
                out.push('}');
                rest = after;
                continue;
            }
            let close = after
                .find('}')
                .ok_or_else(|| ToolError::UnterminatedPlaceholder {
                    tool: self.name.clone(),
                    argument: arg.to_string(),
                })?;
            let key = &after[..close];
            let value = arguments
                .values
                .get(key)
                .ok_or_else(|| ToolError::UnknownPlaceholder {
                    tool: self.name.clone(),
                    placeholder: key.to_string(),
                })?;
            out.push_str(value);
            rest = &after[close + 1..];
        }
        out.push_str(rest);
        Ok(out)
    }

    fn remove_stale_outputs(
        &self,
        working_dir: &Path,
        expected_outputs: &[PathBuf],
    ) -> Result<(), ToolError> {
        for output in expected_outputs {
            let path = working_dir.join(output);
            if path.is_file() {
                debug!("Removing stale {:?} before running {}", path, self.name);
                fs::remove_file(&path).map_err(|source| ToolError::StaleOutput {
                    tool: self.name.clone(),
                    path,
                    source,
                })?;
            }
        }
        Ok(())
    }

    /// Runs the program synchronously inside `working_dir`.
    ///
    /// Relative entries of `expected_outputs` are resolved against `working_dir`. Any of
    /// them left over from an earlier run is deleted before the program starts, so only
    /// files written by this run count; they are checked after a zero exit status.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError`] when the template cannot be expanded or the process cannot be
    /// started. A process that starts but fails is reported through [`ToolOutcome`].
    #[instrument(skip_all, fields(tool = %self.name))]
    pub fn run(
        &self,
        working_dir: &Path,
        arguments: &ToolArguments,
        expected_outputs: &[PathBuf],
    ) -> Result<ToolOutcome, ToolError> {
        let args = self.render_args(arguments)?;
        self.remove_stale_outputs(working_dir, expected_outputs)?;
        info!("Running {}: {} {}", self.name, self.program, args.join(" "));

        let output = Command::new(&self.program)
            .args(&args)
            .current_dir(working_dir)
            .output()
            .map_err(|e| ToolError::Spawn {
                tool: self.name.clone(),
                program: self.program.clone(),
                source: e,
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        if !stdout.trim().is_empty() {
            debug!("{} stdout:\n{}", self.name, stdout.trim_end());
        }
        if !output.status.success() {
            return Ok(ToolOutcome::ToolFailure {
                status: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let missing: Vec<PathBuf> = expected_outputs
            .iter()
            .filter(|p| !working_dir.join(p).exists())
            .cloned()
            .collect();
        if missing.is_empty() {
            Ok(ToolOutcome::Success)
        } else {
            Ok(ToolOutcome::MissingOutput { missing })
        }
    }
}
