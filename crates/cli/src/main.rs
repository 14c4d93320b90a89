//! Contact Book CLI - Database migrations and operator tools.
//!
//! # Usage
//!
//! ```bash
//! # Apply database migrations
//! contact-book-cli migrate
//!
//! # Mint a bearer token for user 42
//! contact-book-cli token --user-id 42
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use contact_book_core::UserId;

mod commands;

#[derive(Parser)]
#[command(name = "contact-book-cli")]
#[command(version, about = "Contact Book CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Mint a bearer token for an existing user
    Token {
        /// User id to issue the token for
        #[arg(short, long)]
        user_id: i32,
    },
}

#[tokio::main]
async fn main() {
    // Load .env file if present
    dotenvy::dotenv().ok();

    // Logs go to stderr so `token` output can be piped
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Token { user_id } => {
            let token = commands::token::mint(UserId::new(user_id)).await?;

            #[allow(clippy::print_stdout)]
            {
                println!("{token}");
            }
        }
    }
    Ok(())
}
