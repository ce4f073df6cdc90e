//! On-disk layout of a virtual environment.
//!
//! `python -m venv` writes one of two layouts: POSIX (`bin/`) or Windows
//! (`Scripts/`). Both are checked regardless of the host platform, native first.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::{BootstrapError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutKind {
    Posix,
    Windows,
}

impl LayoutKind {
    /// Directory holding the activation script and the env's executables.
    pub fn scripts_dir_name(self) -> &'static str {
        match self {
            Self::Posix => "bin",
            Self::Windows => "Scripts",
        }
    }

    pub fn native() -> Self {
        if cfg!(windows) {
            Self::Windows
        } else {
            Self::Posix
        }
    }

    /// Lookup order: the host's layout first.
    pub fn search_order() -> [Self; 2] {
        match Self::native() {
            Self::Posix => [Self::Posix, Self::Windows],
            Self::Windows => [Self::Windows, Self::Posix],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActivationScript {
    pub kind: LayoutKind,
    pub path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VenvLayout {
    root: PathBuf,
}

impl VenvLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn exists(&self) -> bool {
        self.root.exists()
    }

    pub fn scripts_dir(&self, kind: LayoutKind) -> PathBuf {
        self.root.join(kind.scripts_dir_name())
    }

    pub fn activation_script_path(&self, kind: LayoutKind) -> PathBuf {
        self.scripts_dir(kind).join("activate")
    }

    /// First existing activation script, or an error naming both candidates.
    pub fn find_activation_script(&self) -> Result<ActivationScript> {
        for kind in LayoutKind::search_order() {
            let path = self.activation_script_path(kind);
            if path.is_file() {
                return Ok(ActivationScript { kind, path });
            }
        }
        Err(BootstrapError::ActivationScriptNotFound {
            posix: self.activation_script_path(LayoutKind::Posix),
            windows: self.activation_script_path(LayoutKind::Windows),
        })
    }
}
