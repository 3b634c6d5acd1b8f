use std::sync::Arc;

use anyhow::Result;
use clap::Parser;

use zsh_bootstrap::{cli, commands, logging};

fn main() -> Result<()> {
    let args = cli::Cli::parse();
    logging::init_subscriber(args.quiet, "bootstrap");
    let log = Arc::new(logging::Logger::new("bootstrap"));

    commands::bootstrap::run(&log)
}
