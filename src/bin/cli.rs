// src/bin/cli.rs
use std::path::Path;

use clap::Parser;

use addon_sync::{cli, config::consts::STORE_DIR, log};

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let args = cli::Cli::parse();
    let _guard = log::init(Path::new(STORE_DIR))?;

    let summary = cli::run(args)?;
    println!("{summary}");
    Ok(())
}
