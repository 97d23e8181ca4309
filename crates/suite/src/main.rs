use clap::Parser;
use tracing::error;

mod cli;
mod doctor;

use cli::{Cli, Commands};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    rly::logging::init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Doctor => doctor::run().await,
        Commands::Config => doctor::print_config(),
    };

    if let Err(err) = result {
        error!(target = "rly", error = %err, "command failed");
        std::process::exit(1);
    }
}
