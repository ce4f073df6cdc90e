//! Python virtual environment bootstrapper.
//!
//! Probes the interpreter, creates the venv once, activates it for child
//! processes, and installs the project's requirements manifest.

pub mod activation;
pub mod bootstrap;
pub mod builder;
pub mod error;
pub mod installer;
pub mod interpreter;
pub mod layout;
pub mod log;
pub mod runner;

pub use bootstrap::{run_bootstrap, BootstrapReport, COMPLETION_MESSAGE};
pub use error::{BootstrapError, Result};
pub use runner::{ProcessRunner, SystemRunner};
