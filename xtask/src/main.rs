// Host tooling: unwrap/expect/panic acceptable outside firmware code.
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(clippy::arithmetic_side_effects, clippy::indexing_slicing)]
#![allow(missing_docs)]

mod cargo;
mod check;

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "i2s-stream development tasks", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check every crate and feature combination, then clippy and rustfmt
    Check {
        /// Also check the ESP8266 board (needs the `esp` xtensa toolchain)
        #[arg(long)]
        xtensa: bool,
    },
    /// Run host tests against the mock board
    Test {
        /// Run only unit tests
        #[arg(long)]
        unit: bool,
        /// Run only integration tests
        #[arg(long)]
        integration: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Check { xtensa } => check::run(xtensa),
        Commands::Test { unit, integration } => test::run(unit, integration),
    }
}
