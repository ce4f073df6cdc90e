//! Venv activation without sourcing a shell script.
//!
//! Activating means: `VIRTUAL_ENV` points at the env, the env's script
//! directory leads `PATH`, and `PYTHONHOME` is unset. The same changes are
//! layered onto every child [`Invocation`] and, for the CLI, exported to the
//! current process.

use std::env;
use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};

use venvkit_core::config::env_keys::activation as keys;
use venvkit_core::config::{remove_env_var, set_env_var};

use crate::error::{BootstrapError, Result};
use crate::layout::{ActivationScript, VenvLayout};
use crate::runner::Invocation;

#[derive(Debug, Clone)]
pub struct Activation {
    venv_dir: PathBuf,
    bin_dir: PathBuf,
    search_path: OsString,
    script: ActivationScript,
}

impl Activation {
    /// Build the activation for `script`, prepending its directory to `base_path`
    /// (normally the inherited `PATH`).
    pub fn new(
        layout: &VenvLayout,
        script: ActivationScript,
        base_path: Option<OsString>,
    ) -> Result<Self> {
        let venv_dir = std::path::absolute(layout.root())
            .map_err(|e| BootstrapError::io("Resolve venv directory", e))?;
        let bin_dir = venv_dir.join(script.kind.scripts_dir_name());

        let mut entries = vec![bin_dir.clone()];
        if let Some(ref base) = base_path {
            entries.extend(env::split_paths(base).filter(|p| *p != bin_dir));
        }
        let search_path = env::join_paths(entries).map_err(|e| {
            BootstrapError::io(
                "Build activated PATH",
                io::Error::new(io::ErrorKind::InvalidInput, e),
            )
        })?;

        Ok(Self {
            venv_dir,
            bin_dir,
            search_path,
            script,
        })
    }

    pub fn venv_dir(&self) -> &Path {
        &self.venv_dir
    }

    pub fn bin_dir(&self) -> &Path {
        &self.bin_dir
    }

    pub fn script(&self) -> &ActivationScript {
        &self.script
    }

    pub fn search_path(&self) -> &OsString {
        &self.search_path
    }

    /// Layer the activation onto a child invocation.
    pub fn apply(&self, invocation: Invocation) -> Invocation {
        invocation
            .env_remove(keys::PYTHONHOME)
            .env(keys::VIRTUAL_ENV, &self.venv_dir)
            .env(keys::PATH, &self.search_path)
    }

    /// Apply the activation to the current process so anything spawned
    /// afterwards (including by other code) resolves to the env.
    pub fn export_to_process(&self) {
        remove_env_var(keys::PYTHONHOME);
        set_env_var(keys::VIRTUAL_ENV, &self.venv_dir);
        set_env_var(keys::PATH, &self.search_path);
        tracing::debug!(venv = %self.venv_dir.display(), "Exported activation to process");
    }

    /// Locate `program` the way an activated shell would: the env's script
    /// directory first, then the rest of the activated search path.
    pub fn find(&self, program: &str) -> Option<PathBuf> {
        self.find_in_env(program)
            .or_else(|| which::which_in(program, Some(&self.search_path), &self.venv_dir).ok())
    }

    /// `program` inside the env's script directory only.
    pub fn find_in_env(&self, program: &str) -> Option<PathBuf> {
        let in_env = self
            .bin_dir
            .join(format!("{}{}", program, env::consts::EXE_SUFFIX));
        in_env.is_file().then_some(in_env)
    }

    /// Like [`find`](Self::find), falling back to the bare name.
    pub fn resolve(&self, program: &str) -> PathBuf {
        self.find(program).unwrap_or_else(|| PathBuf::from(program))
    }
}
