use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use venvkit_core::config::BootstrapConfig;

/// venvkit - create a project's Python virtual environment and install its requirements
#[derive(Parser, Debug)]
#[command(name = "venvkit")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub env: EnvArgs,

    /// Defaults to `bootstrap` when omitted
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Project layout overrides. Each falls back to its environment variable,
/// then to the conventional default.
#[derive(Args, Debug, Default)]
pub struct EnvArgs {
    /// Project directory the venv and manifest are resolved against (default: .)
    #[arg(long, global = true, env = "VENVKIT_PROJECT_DIR", value_name = "DIR")]
    pub project_dir: Option<PathBuf>,

    /// Virtual environment directory (default: venv)
    #[arg(long, global = true, env = "VENVKIT_VENV_DIR", value_name = "DIR")]
    pub venv_dir: Option<PathBuf>,

    /// Requirements manifest passed to `pip install -r` (default: requirements.txt)
    #[arg(long, global = true, env = "VENVKIT_REQUIREMENTS", value_name = "FILE")]
    pub requirements: Option<PathBuf>,

    /// Interpreter used to create the venv (default: first of python3, python on PATH)
    #[arg(long, global = true, env = "VENVKIT_PYTHON", value_name = "EXE")]
    pub python: Option<String>,
}

impl EnvArgs {
    pub fn to_config(&self) -> BootstrapConfig {
        BootstrapConfig::from_env().with_cli_overrides(
            self.project_dir.clone(),
            self.venv_dir.clone(),
            self.requirements.clone(),
            self.python.clone(),
        )
    }
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Check the interpreter, create the venv if missing, activate it, install requirements
    Bootstrap,

    /// Show the resolved interpreter, venv and manifest without changing anything
    Info {
        /// Output as JSON
        #[arg(long, default_value = "false")]
        json: bool,
    },

    /// Remove the virtual environment directory
    Clean {
        /// Show what would be removed without deleting
        #[arg(long, default_value = "false")]
        dry_run: bool,

        /// Skip the confirmation prompt
        #[arg(long, short = 'f', default_value = "false")]
        force: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_arguments_means_bootstrap() {
        let cli = Cli::try_parse_from(["venvkit"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_global_options_after_subcommand() {
        let cli = Cli::try_parse_from([
            "venvkit",
            "clean",
            "--dry-run",
            "--venv-dir",
            ".venv",
        ])
        .unwrap();
        assert_eq!(
            cli.command,
            Some(Commands::Clean {
                dry_run: true,
                force: false
            })
        );
        assert_eq!(cli.env.venv_dir, Some(PathBuf::from(".venv")));
    }

    #[test]
    fn test_cli_flag_overrides_default() {
        let cli = Cli::try_parse_from(["venvkit", "--requirements", "requirements-dev.txt"])
            .unwrap();
        let cfg = cli.env.to_config();
        assert_eq!(cfg.requirements, PathBuf::from("requirements-dev.txt"));
    }
}
