//! Interpreter discovery and version probing.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

use crate::error::{check_exit, BootstrapError, Result};
use crate::runner::{Invocation, ProcessRunner};

/// Probed in order when no interpreter is configured.
pub const PYTHON_CANDIDATES: &[&str] = &["python3", "python"];

/// Prints `<major> <minor>` on one line.
pub const VERSION_PROBE: &str = "import sys; print(sys.version_info[0], sys.version_info[1])";

/// The only supported major version.
pub const SUPPORTED_MAJOR: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PythonVersion {
    pub major: u32,
    pub minor: u32,
}

impl fmt::Display for PythonVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

impl PythonVersion {
    pub fn ensure_supported(self) -> Result<Self> {
        if self.major == SUPPORTED_MAJOR {
            Ok(self)
        } else {
            Err(BootstrapError::UnsupportedVersion {
                major: self.major,
                minor: self.minor,
            })
        }
    }
}

/// Locate the interpreter used for probing and venv creation.
///
/// A configured value containing a path separator is used as a path;
/// a bare name is looked up on `PATH`. Without a configured value the
/// first of [`PYTHON_CANDIDATES`] found on `PATH` wins.
pub fn find_python(preferred: Option<&str>) -> Result<PathBuf> {
    if let Some(p) = preferred {
        let as_path = Path::new(p);
        if as_path.components().count() > 1 || as_path.is_absolute() {
            if as_path.exists() {
                return Ok(as_path.to_path_buf());
            }
        } else if let Ok(found) = which::which(p) {
            return Ok(found);
        }
        return Err(BootstrapError::InterpreterNotFound {
            tried: vec![p.to_string()],
        });
    }
    for name in PYTHON_CANDIDATES {
        if let Ok(found) = which::which(name) {
            tracing::debug!(name, path = %found.display(), "Found interpreter");
            return Ok(found);
        }
    }
    Err(BootstrapError::InterpreterNotFound {
        tried: PYTHON_CANDIDATES.iter().map(|s| s.to_string()).collect(),
    })
}

/// Ask the interpreter for its major and minor version.
pub fn query_version(
    runner: &dyn ProcessRunner,
    python: &Path,
    cwd: &Path,
) -> Result<PythonVersion> {
    let inv = Invocation::new(python)
        .arg("-c")
        .arg(VERSION_PROBE)
        .current_dir(cwd);
    let out = runner.capture(&inv)?;
    check_exit(&inv.program_name(), out.code)?;
    parse_version_pair(&out.stdout)
}

/// Parse the `<major> <minor>` line printed by [`VERSION_PROBE`].
pub fn parse_version_pair(output: &str) -> Result<PythonVersion> {
    let parse_err = || BootstrapError::VersionParse {
        output: output.trim().to_string(),
    };
    let mut parts = output.split_whitespace();
    let major = parts
        .next()
        .and_then(|s| s.parse::<u32>().ok())
        .ok_or_else(parse_err)?;
    let minor = parts
        .next()
        .and_then(|s| s.parse::<u32>().ok())
        .ok_or_else(parse_err)?;
    if parts.next().is_some() {
        return Err(parse_err());
    }
    Ok(PythonVersion { major, minor })
}

static VERSION_LINE_RE: OnceLock<Regex> = OnceLock::new();

/// Extract `X.Y[.Z]` from a `python --version` line such as `Python 3.11.4`.
pub fn parse_version_line(line: &str) -> Option<String> {
    let re = VERSION_LINE_RE
        .get_or_init(|| Regex::new(r"(\d+\.\d+(?:\.\d+)?)").expect("version line regex"));
    re.captures(line)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_version_pair() {
        let v = parse_version_pair("3 11\n").unwrap();
        assert_eq!(v, PythonVersion { major: 3, minor: 11 });
        assert_eq!(v.to_string(), "3.11");
    }

    #[test]
    fn test_parse_version_pair_rejects_garbage() {
        for bad in ["", "3", "three eleven", "3 11 2", "Python 3.11"] {
            let err = parse_version_pair(bad).unwrap_err();
            assert!(matches!(err, BootstrapError::VersionParse { .. }), "{bad:?}");
        }
    }

    #[test]
    fn test_only_major_three_is_supported() {
        assert!(PythonVersion { major: 3, minor: 6 }.ensure_supported().is_ok());
        let err = PythonVersion { major: 2, minor: 7 }
            .ensure_supported()
            .unwrap_err();
        assert!(err.to_string().contains("2.7"));
        assert!(PythonVersion { major: 4, minor: 0 }.ensure_supported().is_err());
    }

    #[test]
    fn test_parse_version_line() {
        assert_eq!(parse_version_line("Python 3.11.4").as_deref(), Some("3.11.4"));
        assert_eq!(parse_version_line("Python 3.13.0rc1").as_deref(), Some("3.13.0"));
        assert_eq!(parse_version_line("Python 2.7").as_deref(), Some("2.7"));
        assert_eq!(parse_version_line("no version here"), None);
    }

    #[test]
    fn test_find_python_with_explicit_path() {
        let tmp = tempfile::tempdir().unwrap();
        let fake = tmp.path().join("python3");
        std::fs::write(&fake, "").unwrap();
        let found = find_python(Some(&fake.to_string_lossy())).unwrap();
        assert_eq!(found, fake);

        let missing = tmp.path().join("nope").join("python3");
        let err = find_python(Some(&missing.to_string_lossy())).unwrap_err();
        assert!(matches!(err, BootstrapError::InterpreterNotFound { .. }));
    }
}
