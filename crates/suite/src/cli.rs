use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "rly-e2e")]
#[command(about = "Resourcely E2E suite utilities")]
#[command(version)]
pub struct Cli {
    /// Increase verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check that the frontend and the WebDriver endpoint are reachable
    Doctor,

    /// Print the resolved suite configuration
    Config,
}
