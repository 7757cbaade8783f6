pub mod api;
pub mod board;
mod cli;
pub mod config;
pub mod filter;
mod logs;
pub mod models;
pub mod render;
mod utils;

use clap::Parser;

pub use cli::Cli;

pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    if let Err(err) = logs::init_logger() {
        eprintln!("failed to initialise logging: {err}");
    }
    cli::run(cli)
}
