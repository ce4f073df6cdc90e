//! Dependency installation from the requirements manifest.
//!
//! `pip` is the authority on the manifest; it is only read here for
//! logging and the audit trail.

use std::path::{Path, PathBuf};
use std::time::Instant;

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::activation::Activation;
use crate::error::{check_exit, Result};
use crate::runner::{Invocation, ProcessRunner};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Manifest {
    pub path: PathBuf,
    pub requirements: Vec<String>,
    pub sha256: String,
}

impl Manifest {
    /// Read the manifest; `None` when it is missing or unreadable.
    ///
    /// The digest covers the raw bytes. Entries are decoded lossily, since pip
    /// accepts encodings (UTF-16 with a BOM) that are not UTF-8.
    pub fn load(path: &Path) -> Option<Self> {
        if !path.is_file() {
            return None;
        }
        let bytes = match std::fs::read(path) {
            Ok(b) => b,
            Err(e) => {
                tracing::warn!(manifest = %path.display(), error = %e, "Could not read requirements manifest");
                return None;
            }
        };
        let mut hasher = Sha256::new();
        hasher.update(&bytes);
        Some(Self {
            path: path.to_path_buf(),
            requirements: parse_requirements(&String::from_utf8_lossy(&bytes)),
            sha256: hex::encode(hasher.finalize()),
        })
    }
}

/// Requirement lines: trimmed, without blank lines or `#` comments.
/// Option lines (`-r other.txt`, `--index-url ...`) are kept as written.
pub fn parse_requirements(content: &str) -> Vec<String> {
    content
        .lines()
        .map(|l| match l.find(" #") {
            Some(pos) => &l[..pos],
            None => l,
        })
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .map(String::from)
        .collect()
}

/// `pip install -r <manifest>` with the env's own `pip`; without a `pip`
/// script, `<env python> -m pip`; without either, whatever `pip` the
/// activated search path yields.
pub fn install_invocation(activation: &Activation, manifest: &Path, cwd: &Path) -> Invocation {
    let base = if let Some(pip) = activation.find_in_env("pip") {
        Invocation::new(pip)
    } else if let Some(python) = activation.find_in_env("python") {
        Invocation::new(python).args(["-m", "pip"])
    } else {
        Invocation::new(activation.resolve("pip"))
    };
    activation.apply(
        base.args(["install", "-r"])
            .arg(manifest)
            .current_dir(cwd),
    )
}

/// Install every manifest entry into the active environment. Fail-fast: a
/// non-zero installer exit is returned as `CommandFailed` with pip's status.
pub fn install_requirements(
    runner: &dyn ProcessRunner,
    activation: &Activation,
    manifest_path: &Path,
    cwd: &Path,
) -> Result<()> {
    let manifest = Manifest::load(manifest_path);
    match manifest {
        Some(ref m) => {
            crate::info_log!(manifest = %m.path.display(), requirements = m.requirements.len(), "Installing dependencies")
        }
        None => tracing::warn!(
            manifest = %manifest_path.display(),
            "Requirements manifest not found; the installer will report it"
        ),
    }

    let inv = install_invocation(activation, manifest_path, cwd);
    let started = Instant::now();
    let code = runner.stream(&inv)?;
    let elapsed = started.elapsed().as_millis() as u64;

    venvkit_core::observability::audit_install_completed(
        &manifest_path.to_string_lossy(),
        manifest.as_ref().map(|m| m.sha256.as_str()),
        manifest.as_ref().map_or(0, |m| m.requirements.len()),
        code.unwrap_or(-1),
        elapsed,
    );
    check_exit(&inv.program_name(), code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{LayoutKind, VenvLayout};
    use crate::runner::Captured;
    use std::cell::RefCell;
    use std::fs;

    /// Records streamed invocations and reports success.
    #[derive(Default)]
    struct Recorder {
        streamed: RefCell<Vec<Invocation>>,
    }

    impl ProcessRunner for Recorder {
        fn capture(&self, _inv: &Invocation) -> Result<Captured> {
            unreachable!("installer only streams")
        }

        fn stream(&self, inv: &Invocation) -> Result<Option<i32>> {
            self.streamed.borrow_mut().push(inv.clone());
            Ok(Some(0))
        }
    }

    fn activated(root: &Path) -> Activation {
        let layout = VenvLayout::new(root.join("venv"));
        fs::create_dir_all(layout.scripts_dir(LayoutKind::Posix)).unwrap();
        let script = layout.activation_script_path(LayoutKind::Posix);
        fs::write(&script, "").unwrap();
        Activation::new(
            &layout,
            crate::layout::ActivationScript {
                kind: LayoutKind::Posix,
                path: script,
            },
            None,
        )
        .unwrap()
    }

    #[test]
    fn test_parse_requirements_skips_comments_and_blanks() {
        let reqs = parse_requirements(
            "# app deps\nstreamlit>=1.30\n\n  google-generativeai  \npython-docx # docs export\n-r extra.txt\n",
        );
        assert_eq!(
            reqs,
            vec!["streamlit>=1.30", "google-generativeai", "python-docx", "-r extra.txt"]
        );
    }

    #[test]
    fn test_manifest_load_missing_is_none() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(Manifest::load(&tmp.path().join("requirements.txt")).is_none());
    }

    #[test]
    fn test_manifest_digest_tracks_content() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("requirements.txt");
        fs::write(&path, "streamlit\n").unwrap();
        let a = Manifest::load(&path).unwrap();
        fs::write(&path, "streamlit\nfpdf\n").unwrap();
        let b = Manifest::load(&path).unwrap();
        assert_eq!(a.sha256.len(), 64);
        assert_ne!(a.sha256, b.sha256);
        assert_eq!(b.requirements.len(), 2);
    }

    #[test]
    fn test_install_invocation_uses_env_pip() {
        let tmp = tempfile::tempdir().unwrap();
        let act = activated(tmp.path());
        let pip = act
            .bin_dir()
            .join(format!("pip{}", std::env::consts::EXE_SUFFIX));
        fs::write(&pip, "").unwrap();

        let inv = install_invocation(&act, Path::new("requirements.txt"), tmp.path());

        assert_eq!(inv.program, pip);
        assert_eq!(
            inv.args,
            ["install", "-r", "requirements.txt"].map(std::ffi::OsString::from)
        );
        assert!(inv.env.iter().any(|(k, _)| k == "VIRTUAL_ENV"));
    }

    #[test]
    fn test_install_invocation_falls_back_to_python_m_pip() {
        let tmp = tempfile::tempdir().unwrap();
        let act = activated(tmp.path());
        let python = act
            .bin_dir()
            .join(format!("python{}", std::env::consts::EXE_SUFFIX));
        fs::write(&python, "").unwrap();

        let inv = install_invocation(&act, Path::new("requirements.txt"), tmp.path());

        assert_eq!(inv.program, python);
        assert_eq!(inv.args[..3], ["-m", "pip", "install"].map(std::ffi::OsString::from));
    }

    #[test]
    fn test_utf16_manifest_still_reaches_pip() {
        let tmp = tempfile::tempdir().unwrap();
        let act = activated(tmp.path());
        let manifest = tmp.path().join("requirements.txt");
        let mut bytes = vec![0xFF, 0xFE];
        for unit in "streamlit\r\n".encode_utf16() {
            bytes.extend_from_slice(&unit.to_le_bytes());
        }
        fs::write(&manifest, &bytes).unwrap();

        let loaded = Manifest::load(&manifest).unwrap();
        assert_eq!(loaded.sha256.len(), 64);

        let runner = Recorder::default();
        install_requirements(&runner, &act, &manifest, tmp.path()).unwrap();

        let streamed = runner.streamed.borrow();
        assert_eq!(streamed.len(), 1);
        assert!(streamed[0].display().contains("install -r"));
    }
}
