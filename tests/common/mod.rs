#![allow(dead_code)]

use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::multipart::{Form, Part};
use reqwest::StatusCode;
use tempfile::TempDir;
use uuid::Uuid;

use landing_api::auth::{generate_jwt, Claims};
use landing_api::config::AppConfig;
use landing_api::database::models::{Client, Project, Resource, Role};
use landing_api::database::Repositories;
use landing_api::routes;
use landing_api::services::AccountService;
use landing_api::state::AppState;

pub const ADMIN_EMAIL: &str = "admin@example.com";
pub const ADMIN_PASSWORD: &str = "integration-pass";
pub const JWT_SECRET: &str = "integration-test-secret";

/// Smallest useful JPEG-looking payload; the server only checks the MIME type.
pub const JPEG_BYTES: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F', 0xFF, 0xD9];

/// The real router served in-process on a free port, backed by the memory
/// store and a throwaway upload directory. Lives as long as the test runtime.
pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    pub state: AppState,
    pub http: reqwest::Client,
    uploads: TempDir,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn upload_dir(&self) -> &std::path::Path {
        self.uploads.path()
    }

    /// Token for the configured admin, minted directly without a login round trip.
    pub fn admin_token(&self) -> String {
        self.token_for(ADMIN_EMAIL, Role::Admin, 1)
    }

    /// Valid token for a non-admin identity.
    pub fn user_token(&self) -> String {
        self.token_for("visitor@example.com", Role::User, 1)
    }

    pub fn token_for(&self, email: &str, role: Role, expiry_hours: u64) -> String {
        let claims = Claims::new(Uuid::now_v7(), email.to_string(), role, expiry_hours);
        generate_jwt(&claims, JWT_SECRET).expect("token generation")
    }

    /// Create the admin account so `/api/auth/login` succeeds.
    pub async fn seed_admin(&self) -> Result<()> {
        AccountService::new(self.state.repos.users.clone())
            .seed_admin(&self.state.config.security)
            .await?;
        Ok(())
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline {
                break;
            }
            if let Ok(resp) = self.http.get(self.url("/health")).send().await {
                if resp.status() == StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(25)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }
}

pub async fn spawn_server() -> Result<TestServer> {
    spawn_server_with(|_| {}).await
}

pub async fn spawn_server_with(configure: impl FnOnce(&mut AppConfig)) -> Result<TestServer> {
    let uploads = tempfile::tempdir().context("failed to create upload dir")?;
    let port = portpicker::pick_unused_port().context("failed to pick free port")?;

    let mut config = AppConfig::development();
    config.server.port = port;
    config.uploads.directory = uploads.path().to_path_buf();
    config.security.jwt_secret = JWT_SECRET.to_string();
    config.security.admin_email = ADMIN_EMAIL.to_string();
    config.security.admin_password = Some(ADMIN_PASSWORD.to_string());
    configure(&mut config);

    let state = AppState::new(config, Repositories::memory());
    state
        .uploads
        .ensure_dirs(&[Project::COLLECTION, Client::COLLECTION])
        .await?;

    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
        .await
        .with_context(|| format!("failed to bind port {}", port))?;
    let app = routes::app(state.clone());
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    let server = TestServer {
        port,
        base_url: format!("http://127.0.0.1:{}", port),
        state,
        http: reqwest::Client::new(),
        uploads,
    };
    server.wait_ready(Duration::from_secs(5)).await?;
    Ok(server)
}

pub fn image_part(filename: &str, mime: &str, bytes: &[u8]) -> Part {
    Part::bytes(bytes.to_vec())
        .file_name(filename.to_string())
        .mime_str(mime)
        .expect("valid mime")
}

pub fn project_form(name: &str, description: &str) -> Form {
    Form::new()
        .text("projectName", name.to_string())
        .text("projectDescription", description.to_string())
        .part("projectImage", image_part("villa.jpg", "image/jpeg", JPEG_BYTES))
}

pub fn client_form(name: &str, designation: &str, description: &str) -> Form {
    Form::new()
        .text("clientName", name.to_string())
        .text("clientDesignation", designation.to_string())
        .text("clientDescription", description.to_string())
        .part("clientImage", image_part("ana.jpg", "image/jpeg", JPEG_BYTES))
}

/// Create a project through the admin API and return the response body.
pub async fn create_project(server: &TestServer, name: &str) -> Result<serde_json::Value> {
    let res = server
        .http
        .post(server.url("/api/admin/projects"))
        .bearer_auth(server.admin_token())
        .multipart(project_form(name, "A project description"))
        .send()
        .await?;
    anyhow::ensure!(res.status() == StatusCode::CREATED, "create failed: {}", res.status());
    Ok(res.json().await?)
}

/// Files currently stored for a collection.
pub fn stored_files(server: &TestServer, collection: &str) -> Vec<String> {
    std::fs::read_dir(server.upload_dir().join(collection))
        .map(|entries| {
            entries
                .filter_map(|entry| entry.ok())
                .map(|entry| entry.file_name().to_string_lossy().into_owned())
                .collect()
        })
        .unwrap_or_default()
}
