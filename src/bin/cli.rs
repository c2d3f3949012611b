// src/bin/cli.rs
use hiscore_locate::cli;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    cli::run()
}
