use anyhow::Result;
use clap::{Parser, Subcommand};

pub mod check;
pub mod serve;

#[derive(Subcommand)]
enum Command {
    /// Run the display server and the periodic booking refresh
    Serve {
        /// Set the server host address
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Set the server port
        #[arg(long, default_value = "5000")]
        port: String,
    },
    /// Verify the calendar connection and print the booking that
    /// would be displayed right now
    Check {},
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
            serve::run(host, port).await?;
        }
        Some(Command::Check {}) => {
            check::run().await?;
        }
        None => {}
    }

    Ok(())
}
