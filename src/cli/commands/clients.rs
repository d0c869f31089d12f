use std::path::PathBuf;

use clap::Subcommand;

use super::resource::{self, fields};
use crate::cli::utils::truncate;
use crate::cli::{OutputFormat, Session};
use crate::database::models::Client;

#[derive(Subcommand)]
pub enum ClientCommands {
    #[command(about = "List client testimonials, newest first")]
    List {
        #[arg(long, help = "Use the admin endpoint (requires login)")]
        admin: bool,
    },

    #[command(about = "Create a client testimonial with a photo")]
    Create {
        #[arg(long, help = "Client name")]
        name: String,
        #[arg(long, help = "Client designation, e.g. CEO")]
        designation: String,
        #[arg(long, help = "Testimonial text")]
        description: String,
        #[arg(long, help = "Path to the client photo")]
        image: PathBuf,
    },

    #[command(about = "Update some fields of a client")]
    Update {
        #[arg(help = "Client id")]
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        designation: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long, help = "Replacement photo")]
        image: Option<PathBuf>,
    },

    #[command(about = "Delete a client")]
    Delete {
        #[arg(help = "Client id")]
        id: String,
    },
}

pub async fn handle(cmd: ClientCommands, session: &Session, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        ClientCommands::List { admin } => {
            resource::list::<Client, _>(session, admin, &output_format, render).await
        }
        ClientCommands::Create { name, designation, description, image } => {
            let form = fields([
                ("clientName", Some(name)),
                ("clientDesignation", Some(designation)),
                ("clientDescription", Some(description)),
            ]);
            resource::create::<Client>(session, form, &image, &output_format).await
        }
        ClientCommands::Update { id, name, designation, description, image } => {
            let form = fields([
                ("clientName", name),
                ("clientDesignation", designation),
                ("clientDescription", description),
            ]);
            resource::update::<Client>(session, &id, form, image.as_deref(), &output_format).await
        }
        ClientCommands::Delete { id } => resource::delete::<Client>(session, &id, &output_format).await,
    }
}

pub fn render(client: &Client) -> String {
    format!(
        "{}  {} ({})  {}",
        client.id,
        client.client_name,
        client.client_designation,
        truncate(&client.client_description, 50)
    )
}
