use std::io::{self, BufRead, Write};

use clap::Subcommand;
use serde_json::json;

use crate::cli::config::{load_cli_config, save_cli_config};
use crate::cli::token_store::TokenStore;
use crate::cli::utils::{output_record, output_success};
use crate::cli::{OutputFormat, Session};

#[derive(Subcommand)]
pub enum AuthCommands {
    #[command(about = "Log in as an admin and store the token")]
    Login {
        #[arg(help = "Admin email")]
        email: String,
        #[arg(long, env = "LANDING_PASSWORD", help = "Password (will prompt if not provided)")]
        password: Option<String>,
    },

    #[command(about = "Forget the stored token")]
    Logout,

    #[command(about = "Show whether a token is stored")]
    Status,

    #[command(about = "Show the identity behind the stored token")]
    Whoami,
}

pub async fn handle(cmd: AuthCommands, session: &Session, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        AuthCommands::Login { email, password } => {
            let password = match password {
                Some(password) => password,
                None => prompt("Password: ")?,
            };

            session.login(&email, &password).await?;

            let mut cli_config = load_cli_config()?;
            cli_config.last_login = Some(email.clone());
            cli_config.server = Some(session.base_url().to_string());
            save_cli_config(&cli_config)?;

            output_success(
                &output_format,
                &format!("Logged in as {}", email),
                Some(json!({ "email": email, "server": session.base_url() })),
            )
        }
        AuthCommands::Logout => {
            session.logout()?;
            output_success(&output_format, "Logged out", None)
        }
        AuthCommands::Status => {
            let authenticated = session.token_store().get().is_some();
            let last_login = load_cli_config()?.last_login;
            let message = match (&last_login, authenticated) {
                (Some(email), true) => format!("Logged in as {} on {}", email, session.base_url()),
                (None, true) => format!("Token stored for {}", session.base_url()),
                (_, false) => "Not logged in".to_string(),
            };
            output_success(
                &output_format,
                &message,
                Some(json!({
                    "authenticated": authenticated,
                    "email": last_login,
                    "server": session.base_url()
                })),
            )
        }
        AuthCommands::Whoami => {
            let me = session.me().await?;
            let email = me.get("email").and_then(|v| v.as_str()).unwrap_or_default();
            output_record(&output_format, &format!("Logged in as {}", email), &me)
        }
    }
}

fn prompt(label: &str) -> anyhow::Result<String> {
    print!("{}", label);
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}
