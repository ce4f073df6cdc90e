//! `venvkit clean` — remove the project's virtual environment.
//!
//! Only directories carrying a `pyvenv.cfg` marker are removed, so a
//! mistyped `--venv-dir` cannot delete unrelated data.

use anyhow::{bail, Context, Result};
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::Path;
use venvkit_core::config::BootstrapConfig;
use venvkit_core::observability;
use walkdir::WalkDir;

/// Written by `python -m venv` at the env root.
const VENV_MARKER: &str = "pyvenv.cfg";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CleanOutcome {
    Missing,
    DryRun,
    Cancelled,
    Removed { freed: u64 },
}

pub fn cmd_clean(config: &BootstrapConfig, dry_run: bool, force: bool) -> Result<()> {
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut err = io::stderr();
    clean_venv(&config.venv_path(), dry_run, force, &mut input, &mut err)?;
    Ok(())
}

fn clean_venv(
    venv_dir: &Path,
    dry_run: bool,
    force: bool,
    input: &mut dyn BufRead,
    out: &mut dyn Write,
) -> Result<CleanOutcome> {
    if !venv_dir.exists() {
        writeln!(out, "No virtual environment found at {}", venv_dir.display())?;
        return Ok(CleanOutcome::Missing);
    }
    if !venv_dir.join(VENV_MARKER).is_file() {
        bail!(
            "{} does not look like a virtual environment (no {}); refusing to remove it",
            venv_dir.display(),
            VENV_MARKER
        );
    }

    let size = dir_size(venv_dir);
    writeln!(
        out,
        "🗂  Virtual environment at {} ({})",
        venv_dir.display(),
        format_size(size)
    )?;

    if dry_run {
        writeln!(out, "(Dry run — nothing removed. Drop --dry-run to delete.)")?;
        return Ok(CleanOutcome::DryRun);
    }

    if !force {
        write!(out, "Remove it? [y/N] ")?;
        out.flush()?;
        let mut answer = String::new();
        input.read_line(&mut answer)?;
        if !matches!(answer.trim().to_lowercase().as_str(), "y" | "yes") {
            writeln!(out, "Cancelled.")?;
            return Ok(CleanOutcome::Cancelled);
        }
    }

    fs::remove_dir_all(venv_dir)
        .with_context(|| format!("Failed to remove {}", venv_dir.display()))?;
    tracing::info!(venv = %venv_dir.display(), freed = size, "Removed virtual environment");
    observability::audit_venv_removed(&venv_dir.to_string_lossy(), size);
    writeln!(out, "✓ Removed {}, freed {}", venv_dir.display(), format_size(size))?;
    Ok(CleanOutcome::Removed { freed: size })
}

/// Total size of regular files under `path`; symlinks are not followed.
fn dir_size(path: &Path) -> u64 {
    WalkDir::new(path)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter_map(|e| e.metadata().ok())
        .map(|m| m.len())
        .sum()
}

/// Format byte size to human-readable string.
fn format_size(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else if bytes < 1024 * 1024 * 1024 {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    } else {
        format!("{:.2} GB", bytes as f64 / (1024.0 * 1024.0 * 1024.0))
    }
}
