pub mod client;
pub mod commands;
pub mod config;
pub mod token_store;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use client::{ApiClient, ClientError};
use token_store::FileTokenStore;

/// API client backed by the on-disk token, as used by every command.
pub type Session = ApiClient<FileTokenStore>;

#[derive(Parser)]
#[command(name = "landing")]
#[command(about = "Landing CLI - browse the landing page and manage its content")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in human-readable text format")]
    pub text: bool,

    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[arg(long, global = true, env = "LANDING_API_URL", help = "API base URL")]
    pub server: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Admin login and token management")]
    Auth {
        #[command(subcommand)]
        cmd: commands::auth::AuthCommands,
    },

    #[command(about = "Show the public landing page (projects and clients)")]
    Landing,

    #[command(about = "Manage projects")]
    Projects {
        #[command(subcommand)]
        cmd: commands::projects::ProjectCommands,
    },

    #[command(about = "Manage client testimonials")]
    Clients {
        #[command(subcommand)]
        cmd: commands::clients::ClientCommands,
    },

    #[command(about = "Newsletter subscription")]
    Newsletter {
        #[command(subcommand)]
        cmd: commands::newsletter::NewsletterCommands,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

/// Returned once a failure has already been printed in the selected format.
#[derive(Debug, thiserror::Error)]
#[error("command failed")]
pub struct Reported;

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);
    let server = config::resolve_server(cli.server.clone())?;
    let session = Session::new(&server, FileTokenStore::in_config_dir()?)?;

    let result = match cli.command {
        Commands::Auth { cmd } => commands::auth::handle(cmd, &session, output_format.clone()).await,
        Commands::Landing => commands::landing::handle(&session, output_format.clone()).await,
        Commands::Projects { cmd } => commands::projects::handle(cmd, &session, output_format.clone()).await,
        Commands::Clients { cmd } => commands::clients::handle(cmd, &session, output_format.clone()).await,
        Commands::Newsletter { cmd } => {
            commands::newsletter::handle(cmd, &session, output_format.clone()).await
        }
    };

    match result {
        Err(err) => match err.downcast_ref::<ClientError>() {
            Some(client_err) => {
                utils::output_error(&output_format, client_err)?;
                Err(Reported.into())
            }
            None => Err(err),
        },
        ok => ok,
    }
}
