mod cli;
mod client;
mod commands;
mod config;
mod observability;
mod output;
mod session;
mod terminal;

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;

use cli::{Cli, Commands, GslbCommands};
use client::DynectClient;
use output::{print_error, print_success};

#[tokio::main]
async fn main() {
    // Optional .env for local development
    if let Err(e) = dotenvy::dotenv()
        && !matches!(e, dotenvy::Error::Io(ref io_err) if io_err.kind() == std::io::ErrorKind::NotFound)
    {
        eprintln!("Warning: Failed to load .env file: {e}");
    }

    if let Err(e) = run().await {
        print_error(&format!("{e:#}"));
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    let settings = config::load_settings(&cli)?;
    observability::init_tracing(&settings.log_level)?;

    match &cli.command {
        Commands::GenerateDocs(args) => {
            let written = commands::docs::generate(&args.dir)?;
            print_success(&format!(
                "Wrote {} pages to {}",
                written.len(),
                args.dir.display()
            ));
        }
        Commands::Gslb(args) => match &args.command {
            GslbCommands::UpdatePools(_) => {
                let desired = commands::gslb::desired_config(&settings)?;
                let client = Arc::new(DynectClient::new(&settings.api_url)?);
                session::login(&client, &settings).await?;
                let result =
                    commands::gslb::update_pools(Arc::clone(&client), &settings, &desired).await;
                session::finish(&client, result).await?;
            }
        },
    }

    Ok(())
}
