use anyhow::Result;
use mailpilot::cli;

#[tokio::main]
async fn main() -> Result<()> {
    cli::run().await
}
