use anyhow::Result;
use roomboard::cli;

#[tokio::main]
async fn main() -> Result<()> {
    cli::run().await
}
