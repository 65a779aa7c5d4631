use anyhow::Result;
use clap::{Parser, Subcommand};

pub mod demo;
pub mod serve;

#[derive(Subcommand)]
enum Command {
    /// Run the API server
    Serve {
        /// Set the server host address
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Set the server port
        #[arg(long, default_value = "8000")]
        port: String,
    },
    /// Run the processing pipeline over the demo mailbox and print a
    /// triage report
    Demo {
        /// Reply tone: professional, friendly, or concise
        #[arg(long, default_value = "professional")]
        tone: String,
    },
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

    match args.command {
        Some(Command::Serve { host, port }) => {
            serve::run(host, port).await;
        }
        Some(Command::Demo { tone }) => {
            demo::run(&tone).await?;
        }
        None => {}
    }

    Ok(())
}
