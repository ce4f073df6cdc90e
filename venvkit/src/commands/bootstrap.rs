//! `venvkit` / `venvkit bootstrap`

use anyhow::Result;
use std::io;
use venvkit_core::config::BootstrapConfig;
use venvkit_env::{run_bootstrap, SystemRunner};

pub fn cmd_bootstrap(config: &BootstrapConfig) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let report = run_bootstrap(config, &SystemRunner, &mut out, true)?;
    tracing::debug!(
        venv = %report.venv_dir.display(),
        created = report.created,
        python = %report.interpreter_version,
        "Bootstrap finished"
    );
    Ok(())
}
