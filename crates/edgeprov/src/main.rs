mod cli;
mod commands;
mod error;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.global.verbose);

    // Dispatch and handle errors with proper exit codes
    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        // Template and config commands never touch the orchestrator
        Command::Template(cmd) => commands::template_cmd::handle(&cmd),
        Command::Config(cmd) => commands::config_cmd::handle(cmd, &cli.global),

        Command::Provision(args) => {
            let session = commands::util::connect(&cli.global, args.output_dir.as_ref())?;
            commands::provision::handle(&session, &args, &cli.global).await
        }

        Command::Teardown(args) => {
            let session = commands::util::connect(&cli.global, args.output_dir.as_ref())?;
            commands::teardown::handle(&session, &args, &cli.global).await
        }
    }
}
