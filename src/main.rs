use anyhow::Result;
use rachelbot::cli;

#[tokio::main]
async fn main() -> Result<()> {
    cli::run().await
}
