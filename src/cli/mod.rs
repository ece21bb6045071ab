use anyhow::Result;
use clap::{Parser, Subcommand};

pub mod chat;
pub mod query;
pub mod serve;

use crate::core::AppConfig;

#[derive(Subcommand)]
enum Command {
    /// Run the chat web server
    Serve {
        /// Set the server host address
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Set the server port
        #[arg(long, default_value = "2222")]
        port: String,
    },
    /// Ask a single question and print the answer as JSON
    Query {
        #[arg(long)]
        term: String,
    },
    /// Start a chat session in the terminal
    Chat {},
}

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

pub async fn run() -> Result<()> {
    let args = Cli::parse();

    // Handle each sub command
    match args.command {
        Some(Command::Serve { host, port }) => {
            serve::run(host, port, AppConfig::from_env()?).await?;
        }
        Some(Command::Query { term }) => {
            query::run(term, AppConfig::from_env()?).await?;
        }
        Some(Command::Chat {}) => {
            chat::run(AppConfig::from_env()?).await?;
        }
        None => {}
    }

    Ok(())
}

/// When using the CLI without the webserver, log to stderr so stdout
/// only carries command output.
fn init_cli_tracing() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("{}=info", env!("CARGO_CRATE_NAME")).into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
