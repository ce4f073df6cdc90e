//! Typed configuration structs, grouped by concern.

use super::env_keys::{bootstrap as boot_keys, observability as obv_keys};
use super::loader::{env_bool, env_optional, env_or};
use std::path::{Path, PathBuf};

/// Conventional environment directory name.
pub const DEFAULT_VENV_DIR: &str = "venv";
/// Conventional dependency manifest name.
pub const DEFAULT_REQUIREMENTS: &str = "requirements.txt";

/// Where the environment lives, what it installs, and which interpreter creates it.
///
/// `venv_dir` and `requirements` are resolved against `project_dir` unless absolute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootstrapConfig {
    pub project_dir: PathBuf,
    pub venv_dir: PathBuf,
    pub requirements: PathBuf,
    /// Interpreter name or path; `None` probes `python3` then `python`.
    pub python: Option<String>,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            project_dir: PathBuf::from("."),
            venv_dir: PathBuf::from(DEFAULT_VENV_DIR),
            requirements: PathBuf::from(DEFAULT_REQUIREMENTS),
            python: None,
        }
    }
}

impl BootstrapConfig {
    /// Load from environment variables (and `.env`), empty values use defaults.
    pub fn from_env() -> Self {
        super::loader::load_dotenv();
        let defaults = Self::default();
        Self {
            project_dir: env_optional(boot_keys::VENVKIT_PROJECT_DIR, &[])
                .map(PathBuf::from)
                .unwrap_or(defaults.project_dir),
            venv_dir: PathBuf::from(env_or(
                boot_keys::VENVKIT_VENV_DIR,
                boot_keys::VENV_DIR_ALIASES,
                || DEFAULT_VENV_DIR.to_string(),
            )),
            requirements: PathBuf::from(env_or(
                boot_keys::VENVKIT_REQUIREMENTS,
                boot_keys::REQUIREMENTS_ALIASES,
                || DEFAULT_REQUIREMENTS.to_string(),
            )),
            python: env_optional(boot_keys::VENVKIT_PYTHON, &[]),
        }
    }

    /// Apply command-line values on top; `None` keeps the current value.
    pub fn with_cli_overrides(
        mut self,
        project_dir: Option<PathBuf>,
        venv_dir: Option<PathBuf>,
        requirements: Option<PathBuf>,
        python: Option<String>,
    ) -> Self {
        if let Some(dir) = project_dir {
            self.project_dir = dir;
        }
        if let Some(dir) = venv_dir {
            self.venv_dir = dir;
        }
        if let Some(req) = requirements {
            self.requirements = req;
        }
        if python.is_some() {
            self.python = python;
        }
        self
    }

    /// Pin `project_dir` to an absolute path.
    ///
    /// Child processes run inside `project_dir` while the derived paths are
    /// checked from the current directory, so both must agree.
    pub fn absolutize(mut self) -> std::io::Result<Self> {
        self.project_dir = std::path::absolute(&self.project_dir)?;
        Ok(self)
    }

    /// Absolute-or-project-relative path of the environment directory.
    pub fn venv_path(&self) -> PathBuf {
        resolve_in(&self.project_dir, &self.venv_dir)
    }

    /// Absolute-or-project-relative path of the dependency manifest.
    pub fn manifest_path(&self) -> PathBuf {
        resolve_in(&self.project_dir, &self.requirements)
    }
}

fn resolve_in(base: &Path, p: &Path) -> PathBuf {
    if p.is_absolute() {
        p.to_path_buf()
    } else {
        base.join(p)
    }
}

/// Observability: quiet, log_level, log_json, audit_log
#[derive(Debug, Clone)]
pub struct ObservabilityConfig {
    pub quiet: bool,
    pub log_level: String,
    pub log_json: bool,
    pub audit_log: Option<String>,
}

impl ObservabilityConfig {
    pub fn from_env() -> &'static Self {
        use std::sync::OnceLock;
        static CACHE: OnceLock<ObservabilityConfig> = OnceLock::new();
        CACHE.get_or_init(|| {
            super::loader::load_dotenv();
            Self {
                quiet: env_bool(obv_keys::VENVKIT_QUIET, &[], false),
                log_level: env_or(obv_keys::VENVKIT_LOG_LEVEL, &[], || {
                    "venvkit=info".to_string()
                }),
                log_json: env_bool(obv_keys::VENVKIT_LOG_JSON, &[], false),
                audit_log: env_optional(obv_keys::VENVKIT_AUDIT_LOG, &[]),
            }
        })
    }
}
