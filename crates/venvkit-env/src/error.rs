//! Errors returned by the bootstrap procedure.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, BootstrapError>;

/// Every variant is fatal; the procedure never retries.
#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("Unsupported Python version {major}.{minor}: Python 3 is required")]
    UnsupportedVersion { major: u32, minor: u32 },

    #[error(
        "Activation script not found: checked {} and {}",
        .posix.display(),
        .windows.display()
    )]
    ActivationScriptNotFound { posix: PathBuf, windows: PathBuf },

    #[error("`{program}` {}", describe_exit(.code))]
    CommandFailed { program: String, code: Option<i32> },

    #[error("No Python interpreter found (tried: {})", .tried.join(", "))]
    InterpreterNotFound { tried: Vec<String> },

    #[error("Could not parse interpreter version from output {output:?}")]
    VersionParse { output: String },

    #[error("Failed to start `{program}`")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("{context}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(c) => format!("exited with status {}", c),
        None => "was terminated by a signal".to_string(),
    }
}

impl BootstrapError {
    pub fn io(context: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Process exit code for this failure.
    ///
    /// A failed external tool propagates its own status unmodified; everything
    /// else (including a tool killed by a signal) exits with 1.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::CommandFailed {
                code: Some(code), ..
            } if *code != 0 => *code,
            _ => 1,
        }
    }
}

/// Turn a finished tool's exit code into `Ok` or `CommandFailed`.
pub fn check_exit(program: &str, code: Option<i32>) -> Result<()> {
    match code {
        Some(0) => Ok(()),
        _ => Err(BootstrapError::CommandFailed {
            program: program.to_string(),
            code,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_version_message_contains_major_minor() {
        let err = BootstrapError::UnsupportedVersion { major: 2, minor: 7 };
        assert!(err.to_string().contains("2.7"));
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_activation_not_found_names_both_paths() {
        let err = BootstrapError::ActivationScriptNotFound {
            posix: PathBuf::from("venv/bin/activate"),
            windows: PathBuf::from("venv/Scripts/activate"),
        };
        let msg = err.to_string();
        assert!(msg.contains("venv/bin/activate"));
        assert!(msg.contains("venv/Scripts/activate"));
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_command_failed_propagates_status() {
        let err = check_exit("pip", Some(2)).unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().contains("exited with status 2"));

        let killed = check_exit("pip", None).unwrap_err();
        assert_eq!(killed.exit_code(), 1);
        assert!(killed.to_string().contains("signal"));

        assert!(check_exit("pip", Some(0)).is_ok());
    }
}
