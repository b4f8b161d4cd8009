//! reslock admin CLI entry point

use clap::Parser;
use reslock::cli::{Cli, run};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let mut stdout = std::io::stdout().lock();
    run(cli, &mut stdout).await?;
    Ok(())
}
