//! The bootstrap procedure: version check, create-if-missing, activate,
//! print version, install, done.
//!
//! Steps run strictly in order and the first failure aborts the run. Nothing
//! created before the failure is rolled back.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;

use serde::Serialize;
use venvkit_core::config::BootstrapConfig;
use venvkit_core::observability;

use crate::activation::Activation;
use crate::builder::{self, VenvState};
use crate::error::{check_exit, BootstrapError, Result};
use crate::installer;
use crate::interpreter::{self, PythonVersion};
use crate::layout::{ActivationScript, VenvLayout};
use crate::runner::{Invocation, ProcessRunner};

pub const COMPLETION_MESSAGE: &str = "Environment setup complete.";

/// What a successful run did.
#[derive(Debug, Clone, Serialize)]
pub struct BootstrapReport {
    pub python: PathBuf,
    pub interpreter_version: PythonVersion,
    pub venv_dir: PathBuf,
    pub created: bool,
    pub activation_script: ActivationScript,
    /// `python --version` output of the activated interpreter.
    pub version_line: String,
}

/// Run the full procedure for `config`, writing operator messages to `out`.
///
/// With `export_activation` the activated `PATH`/`VIRTUAL_ENV` are also set on
/// the current process; child processes get them either way.
pub fn run_bootstrap(
    config: &BootstrapConfig,
    runner: &dyn ProcessRunner,
    out: &mut dyn Write,
    export_activation: bool,
) -> Result<BootstrapReport> {
    let started = Instant::now();
    let result = run_steps(config, runner, out, export_activation);
    match result {
        Ok(ref report) => observability::audit_bootstrap_completed(
            &report.venv_dir.to_string_lossy(),
            report.created,
            &report.interpreter_version.to_string(),
            started.elapsed().as_millis() as u64,
        ),
        Err(ref e) => observability::audit_bootstrap_failed(&e.to_string(), e.exit_code()),
    }
    result
}

fn run_steps(
    config: &BootstrapConfig,
    runner: &dyn ProcessRunner,
    out: &mut dyn Write,
    export_activation: bool,
) -> Result<BootstrapReport> {
    let config = config
        .clone()
        .absolutize()
        .map_err(|e| BootstrapError::io(format!("Resolve {}", config.project_dir.display()), e))?;
    let cwd = config.project_dir.as_path();
    let layout = VenvLayout::new(config.venv_path());

    // 1. Interpreter version
    let python = interpreter::find_python(config.python.as_deref())?;
    observability::audit_bootstrap_started(
        &cwd.to_string_lossy(),
        &layout.root().to_string_lossy(),
        &python.to_string_lossy(),
    );
    let version = interpreter::query_version(runner, &python, cwd)?.ensure_supported()?;
    tracing::debug!(python = %python.display(), %version, "Interpreter supported");

    // 2. Create the environment once
    if layout.exists() {
        say(
            out,
            &format!(
                "Virtual environment already exists at {}",
                layout.root().display()
            ),
        )?;
    } else {
        say(
            out,
            &format!(
                "Creating virtual environment at {}...",
                layout.root().display()
            ),
        )?;
    }
    let state = builder::ensure_venv(runner, &python, &layout, cwd)?;

    // 3. Activate
    let script = layout.find_activation_script()?;
    let activation = Activation::new(&layout, script, std::env::var_os("PATH"))?;
    if export_activation {
        activation.export_to_process();
    }
    crate::info_log!(script = %activation.script().path.display(), "Activated virtual environment");

    // 4. Report the active interpreter
    let version_line = print_active_version(runner, &activation, cwd, out)?;

    // 5. Dependencies
    installer::install_requirements(runner, &activation, &config.manifest_path(), cwd)?;

    // 6. Done
    say(out, COMPLETION_MESSAGE)?;

    Ok(BootstrapReport {
        python,
        interpreter_version: version,
        venv_dir: activation.venv_dir().to_path_buf(),
        created: state == VenvState::Created,
        activation_script: activation.script().clone(),
        version_line,
    })
}

fn print_active_version(
    runner: &dyn ProcessRunner,
    activation: &Activation,
    cwd: &Path,
    out: &mut dyn Write,
) -> Result<String> {
    let inv = activation.apply(
        Invocation::new(activation.resolve("python"))
            .arg("--version")
            .current_dir(cwd),
    );
    let captured = runner.capture(&inv)?;
    check_exit(&inv.program_name(), captured.code)?;
    // Python 2 wrote the version to stderr.
    let line = if captured.stdout.trim().is_empty() {
        captured.stderr.trim()
    } else {
        captured.stdout.trim()
    }
    .to_string();
    say(out, &line)?;
    Ok(line)
}

fn say(out: &mut dyn Write, msg: &str) -> Result<()> {
    writeln!(out, "{}", msg).map_err(|e| BootstrapError::io("Write output", e))
}
