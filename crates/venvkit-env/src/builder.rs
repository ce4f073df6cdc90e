//! Create the isolated environment with `python -m venv`.

use std::path::Path;
use std::time::Instant;

use crate::error::{check_exit, Result};
use crate::layout::VenvLayout;
use crate::runner::{Invocation, ProcessRunner};

/// Whether this run created the environment or found it in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VenvState {
    Existing,
    Created,
}

pub fn venv_invocation(python: &Path, layout: &VenvLayout, cwd: &Path) -> Invocation {
    Invocation::new(python)
        .args(["-m", "venv"])
        .arg(layout.root())
        .current_dir(cwd)
}

/// Create the environment unless its directory already exists.
///
/// An existing directory is never touched, even if it is incomplete; the
/// activation step reports a broken env. A failed `venv` run is not cleaned up.
pub fn ensure_venv(
    runner: &dyn ProcessRunner,
    python: &Path,
    layout: &VenvLayout,
    cwd: &Path,
) -> Result<VenvState> {
    if layout.exists() {
        return Ok(VenvState::Existing);
    }

    let inv = venv_invocation(python, layout, cwd);
    let started = Instant::now();
    let code = runner.stream(&inv)?;
    check_exit(&inv.program_name(), code)?;

    let elapsed = started.elapsed().as_millis() as u64;
    crate::info_log!(venv = %layout.root().display(), elapsed_ms = elapsed, "Created virtual environment");
    venvkit_core::observability::audit_venv_created(
        &layout.root().to_string_lossy(),
        &python.to_string_lossy(),
        elapsed,
    );
    Ok(VenvState::Created)
}
