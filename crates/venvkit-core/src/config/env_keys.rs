//! Environment variable keys and aliases.
//!
//! Primary keys use the `VENVKIT_*` prefix; aliases are checked in order when
//! the primary key is unset.

/// Project layout: where the venv lives and which manifest it installs.
pub mod bootstrap {
    pub const VENVKIT_PROJECT_DIR: &str = "VENVKIT_PROJECT_DIR";

    pub const VENVKIT_VENV_DIR: &str = "VENVKIT_VENV_DIR";
    pub const VENV_DIR_ALIASES: &[&str] = &["VENV_DIR"];

    pub const VENVKIT_REQUIREMENTS: &str = "VENVKIT_REQUIREMENTS";
    pub const REQUIREMENTS_ALIASES: &[&str] = &["REQUIREMENTS_FILE"];

    /// Interpreter used to probe the version and create the venv.
    pub const VENVKIT_PYTHON: &str = "VENVKIT_PYTHON";
}

/// Observability and logging
pub mod observability {
    pub const VENVKIT_QUIET: &str = "VENVKIT_QUIET";
    pub const VENVKIT_LOG_LEVEL: &str = "VENVKIT_LOG_LEVEL";
    pub const VENVKIT_LOG_JSON: &str = "VENVKIT_LOG_JSON";
    pub const VENVKIT_AUDIT_LOG: &str = "VENVKIT_AUDIT_LOG";
}

/// Variables written by venv activation.
pub mod activation {
    pub const VIRTUAL_ENV: &str = "VIRTUAL_ENV";
    pub const PATH: &str = "PATH";
    pub const PYTHONHOME: &str = "PYTHONHOME";
}
