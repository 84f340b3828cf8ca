mod commands;
mod terminal;

use anyhow::Context;
use commands::{CommandLine, Commands, once, run};
use governor_common::config::Config;
use terminal::{logging, print};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let commands = CommandLine::parse_args();

    logging::init_logging(&commands.log_level);

    let mut cfg = Config::from_file(&commands.config)
        .with_context(|| format!("loading {}", commands.config.display()))?;
    commands.apply_overrides(&mut cfg);
    cfg.validate()?;

    match commands.command {
        Commands::Run => {
            print::header("starting health check rounds");
            run::run(&cfg).await
        }
        Commands::Once => {
            print::header("running a single round");
            once::once(&cfg).await
        }
    }
}
