mod cli;
mod commands;

use std::process::ExitCode;

use clap::Parser;
use cli::{Cli, Commands};
use venvkit_env::BootstrapError;

fn main() -> ExitCode {
    // Before parsing, so `.env` values reach clap's `env =` fallbacks.
    venvkit_core::config::load_dotenv();
    venvkit_core::observability::init_tracing();
    let cli = Cli::parse();
    let config = cli.env.to_config();

    let result = match cli.command.unwrap_or(Commands::Bootstrap) {
        Commands::Bootstrap => commands::bootstrap::cmd_bootstrap(&config),
        Commands::Info { json } => commands::info::cmd_info(&config, json),
        Commands::Clean { dry_run, force } => commands::clean::cmd_clean(&config, dry_run, force),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(exit_status(&e))
        }
    }
}

/// A failing external tool's own status passes through; everything else is 1.
fn exit_status(err: &anyhow::Error) -> u8 {
    let code = err
        .downcast_ref::<BootstrapError>()
        .map_or(1, BootstrapError::exit_code);
    u8::try_from(code).ok().filter(|c| *c != 0).unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_status_mapping() {
        let unsupported = anyhow::Error::new(BootstrapError::UnsupportedVersion { major: 2, minor: 7 });
        assert_eq!(exit_status(&unsupported), 1);

        let pip = anyhow::Error::new(BootstrapError::CommandFailed {
            program: "pip".to_string(),
            code: Some(2),
        })
        .context("Bootstrap failed");
        assert_eq!(exit_status(&pip), 2);

        let out_of_range = anyhow::Error::new(BootstrapError::CommandFailed {
            program: "pip".to_string(),
            code: Some(-1073741510),
        });
        assert_eq!(exit_status(&out_of_range), 1);

        assert_eq!(exit_status(&anyhow::anyhow!("other")), 1);
    }
}
