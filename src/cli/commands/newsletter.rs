use clap::Subcommand;

use crate::cli::utils::{output_collection, output_success};
use crate::cli::{OutputFormat, Session};
use crate::database::models::Subscriber;

#[derive(Subcommand)]
pub enum NewsletterCommands {
    #[command(about = "Subscribe an email address")]
    Subscribe {
        #[arg(help = "Email address")]
        email: String,
    },

    #[command(about = "List subscribers (requires login)")]
    List,
}

pub async fn handle(cmd: NewsletterCommands, session: &Session, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        NewsletterCommands::Subscribe { email } => {
            let response = session.subscribe(&email).await?;
            output_success(
                &output_format,
                &response.message,
                Some(serde_json::json!({ "subscriber": response.subscriber })),
            )
        }
        NewsletterCommands::List => {
            let subscribers = session.subscribers().await?;
            output_collection(
                &output_format,
                "subscribers",
                &subscribers,
                "No subscribers yet",
                render,
            )
        }
    }
}

fn render(subscriber: &Subscriber) -> String {
    format!(
        "{}  {}",
        subscriber.subscribed_at.format("%Y-%m-%d %H:%M"),
        subscriber.email
    )
}
