//! ProcessRunner trait: the seam between the bootstrap steps and the external
//! toolchain (interpreter, venv module, pip).
//!
//! `SystemRunner` spawns real processes; tests substitute a scripted runner.

use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::error::{BootstrapError, Result};

/// A single external command: program, arguments, working directory and
/// environment changes layered over the inherited environment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Invocation {
    pub program: PathBuf,
    pub args: Vec<OsString>,
    pub cwd: Option<PathBuf>,
    pub env: Vec<(OsString, OsString)>,
    pub env_remove: Vec<OsString>,
}

impl Invocation {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            ..Self::default()
        }
    }

    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args
            .extend(args.into_iter().map(|a| a.as_ref().to_os_string()));
        self
    }

    pub fn current_dir(mut self, dir: &Path) -> Self {
        self.cwd = Some(dir.to_path_buf());
        self
    }

    pub fn env(mut self, key: impl AsRef<OsStr>, value: impl AsRef<OsStr>) -> Self {
        self.env
            .push((key.as_ref().to_os_string(), value.as_ref().to_os_string()));
        self
    }

    pub fn env_remove(mut self, key: impl AsRef<OsStr>) -> Self {
        self.env_remove.push(key.as_ref().to_os_string());
        self
    }

    /// Program name for messages (`pip`, `python3`), not the full path.
    pub fn program_name(&self) -> String {
        self.program
            .file_name()
            .unwrap_or(self.program.as_os_str())
            .to_string_lossy()
            .to_string()
    }

    /// Shell-like rendering for logs.
    pub fn display(&self) -> String {
        let mut s = self.program.display().to_string();
        for a in &self.args {
            s.push(' ');
            s.push_str(&a.to_string_lossy());
        }
        s
    }

    fn to_command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        if let Some(ref cwd) = self.cwd {
            cmd.current_dir(cwd);
        }
        for key in &self.env_remove {
            cmd.env_remove(key);
        }
        for (k, v) in &self.env {
            cmd.env(k, v);
        }
        cmd
    }
}

/// Output of a captured command. `code` is `None` when killed by a signal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Captured {
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl Captured {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Runs external commands to completion. No timeouts: each call blocks until
/// the child exits.
pub trait ProcessRunner {
    /// Run with stdout/stderr captured.
    fn capture(&self, invocation: &Invocation) -> Result<Captured>;

    /// Run with inherited stdio so the operator sees the tool's progress.
    /// Returns the exit code (`None` when killed by a signal).
    fn stream(&self, invocation: &Invocation) -> Result<Option<i32>>;
}

/// `ProcessRunner` backed by `std::process::Command`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl ProcessRunner for SystemRunner {
    fn capture(&self, invocation: &Invocation) -> Result<Captured> {
        tracing::debug!(cmd = %invocation.display(), "capture");
        let out = invocation
            .to_command()
            .stdin(Stdio::null())
            .output()
            .map_err(|e| BootstrapError::Spawn {
                program: invocation.program_name(),
                source: e,
            })?;
        Ok(Captured {
            code: out.status.code(),
            stdout: String::from_utf8_lossy(&out.stdout).to_string(),
            stderr: String::from_utf8_lossy(&out.stderr).to_string(),
        })
    }

    fn stream(&self, invocation: &Invocation) -> Result<Option<i32>> {
        tracing::debug!(cmd = %invocation.display(), "stream");
        let status = invocation
            .to_command()
            .status()
            .map_err(|e| BootstrapError::Spawn {
                program: invocation.program_name(),
                source: e,
            })?;
        Ok(status.code())
    }
}
