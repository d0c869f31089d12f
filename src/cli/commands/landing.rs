use serde::Serialize;
use serde_json::{json, Value};

use super::{clients, projects};
use crate::cli::client::ClientError;
use crate::cli::{OutputFormat, Session};

/// Render the public landing page: projects and clients are fetched together
/// and each section reports its own outcome.
pub async fn handle(session: &Session, output_format: OutputFormat) -> anyhow::Result<()> {
    let landing = session.landing().await;

    match output_format {
        OutputFormat::Json => {
            let body = json!({
                "projects": section_json(&landing.projects),
                "clients": section_json(&landing.clients),
            });
            println!("{}", serde_json::to_string_pretty(&body)?);
        }
        OutputFormat::Text => {
            print_section("Our Projects", "No projects yet", &landing.projects, projects::render);
            println!();
            print_section("Happy Clients", "No clients yet", &landing.clients, clients::render);
        }
    }
    Ok(())
}

fn section_json<T: Serialize>(section: &Result<Vec<T>, ClientError>) -> Value {
    match section {
        Ok(items) => json!(items),
        Err(e) => json!({ "error": e.to_string() }),
    }
}

fn print_section<T>(
    title: &str,
    empty: &str,
    section: &Result<Vec<T>, ClientError>,
    render: fn(&T) -> String,
) {
    println!("== {} ==", title);
    match section {
        Ok(items) if items.is_empty() => println!("{}", empty),
        Ok(items) => items.iter().for_each(|item| println!("{}", render(item))),
        Err(e) => println!("Could not load: {}", e),
    }
}
