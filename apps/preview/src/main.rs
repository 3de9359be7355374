#![allow(clippy::print_stdout)]

use clap::Parser;
use impulse_preview::{Cli, run};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let output = run(Cli::parse()).await?;
    print!("{output}");
    Ok(())
}
