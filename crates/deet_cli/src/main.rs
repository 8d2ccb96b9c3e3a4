use clap::{Parser, Subcommand};
use colored::Colorize;
use deet_cli::commands::{self, RegisterArgs};
use tracing::error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Deet CLI: manage the relay's application commands
#[derive(Parser)]
#[command(name = "deet")]
#[command(about = "Manage the deet relay's application commands", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Register the relay's commands with the platform
    Register(RegisterArgs),

    /// Print the command definitions as JSON
    Commands,

    /// Show the CLI version
    Version,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(fmt::layer().pretty())
        .with(EnvFilter::from_env("DEET_LOG"))
        .init();

    let cli = Cli::parse();
    match &cli.command {
        Commands::Register(args) => {
            match commands::register(args, |name| std::env::var(name).ok()).await {
                Ok(registered) => {
                    for command in registered {
                        println!("{} {} ({})", "registered".green(), command.name, command.id);
                    }
                }
                Err(e) => {
                    error!("Error: {e}");
                    eprintln!("{} {e}", "error:".red());
                    std::process::exit(1);
                }
            }
        }
        Commands::Commands => match commands::render_commands() {
            Ok(json) => println!("{json}"),
            Err(e) => {
                error!("Error: {e}");
                std::process::exit(1);
            }
        },
        Commands::Version => {
            println!("deet version {}", env!("CARGO_PKG_VERSION"));
        }
    }
}
