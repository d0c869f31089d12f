use std::path::PathBuf;

use clap::Subcommand;

use super::resource::{self, fields};
use crate::cli::utils::truncate;
use crate::cli::{OutputFormat, Session};
use crate::database::models::Project;

#[derive(Subcommand)]
pub enum ProjectCommands {
    #[command(about = "List projects, newest first")]
    List {
        #[arg(long, help = "Use the admin endpoint (requires login)")]
        admin: bool,
    },

    #[command(about = "Create a project with an image")]
    Create {
        #[arg(long, help = "Project name")]
        name: String,
        #[arg(long, help = "Project description")]
        description: String,
        #[arg(long, help = "Path to the project image")]
        image: PathBuf,
    },

    #[command(about = "Update some fields of a project")]
    Update {
        #[arg(help = "Project id")]
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long, help = "Replacement image")]
        image: Option<PathBuf>,
    },

    #[command(about = "Delete a project")]
    Delete {
        #[arg(help = "Project id")]
        id: String,
    },
}

pub async fn handle(cmd: ProjectCommands, session: &Session, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        ProjectCommands::List { admin } => {
            resource::list::<Project, _>(session, admin, &output_format, render).await
        }
        ProjectCommands::Create { name, description, image } => {
            let form = fields([
                ("projectName", Some(name)),
                ("projectDescription", Some(description)),
            ]);
            resource::create::<Project>(session, form, &image, &output_format).await
        }
        ProjectCommands::Update { id, name, description, image } => {
            let form = fields([("projectName", name), ("projectDescription", description)]);
            resource::update::<Project>(session, &id, form, image.as_deref(), &output_format).await
        }
        ProjectCommands::Delete { id } => resource::delete::<Project>(session, &id, &output_format).await,
    }
}

pub fn render(project: &Project) -> String {
    format!(
        "{}  {}  {}",
        project.id,
        project.project_name,
        truncate(&project.project_description, 60)
    )
}
