mod commands;
mod terminal;

use std::process::ExitCode;

use commands::{CommandLine, Commands, discover, status};
use hotscan_common::config::Config;
use terminal::{logging, print};

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let commands = CommandLine::parse_args();

    logging::init_logging(commands.verbose);

    let mut cfg = Config {
        no_dns: commands.no_dns,
        quiet: commands.quiet,
        ..Config::default()
    };

    match commands.command {
        Commands::Discover(args) => {
            discover::apply_overrides(&args, &mut cfg);
            print::header("getting ready for discovery", cfg.quiet);
            discover::discover(args, &cfg).await?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Status => {
            print::header("hotspot status", cfg.quiet);
            let enabled: bool = status::status(&cfg);
            Ok(ExitCode::from(status::exit_status(enabled)))
        }
    }
}
