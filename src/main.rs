use anyhow::Result;

mod cli;
mod commands;

use cli::Cli;

fn main() -> Result<()> {
    Cli::run()
}
