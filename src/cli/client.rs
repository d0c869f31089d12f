//! HTTP client for the landing API, shared by the `landing` CLI and tests.
//!
//! Every call goes through [`ApiClient::execute`], which attaches the stored
//! bearer token and clears it again as soon as the server answers 401.

use std::path::{Path, PathBuf};

use reqwest::multipart::{Form, Part};
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use url::Url;

use super::token_store::TokenStore;
use crate::database::models::{Client, Project, Resource, Subscriber};
use crate::database::FormFields;
use crate::handlers::auth::login::LoginResponse;
use crate::routes::Access;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Session expired, please log in again")]
    SessionExpired,

    #[error("{message} (HTTP {status})")]
    Api { status: u16, message: String },

    #[error("invalid server URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error("failed to read {}: {source}", .path.display())]
    File {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("token store: {0}")]
    TokenStore(String),
}

impl ClientError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::SessionExpired => Some(401),
            ClientError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Both landing sections, fetched concurrently. Each one fails on its own.
#[derive(Debug)]
pub struct Landing {
    pub projects: Result<Vec<Project>, ClientError>,
    pub clients: Result<Vec<Client>, ClientError>,
}

#[derive(Debug, Deserialize)]
pub struct SubscribeResponse {
    pub message: String,
    pub subscriber: Subscriber,
}

pub struct ApiClient<S: TokenStore> {
    http: reqwest::Client,
    base: String,
    store: S,
}

impl<S: TokenStore> ApiClient<S> {
    pub fn new(server: &str, store: S) -> Result<Self, ClientError> {
        let base = Url::parse(server)?;
        Ok(Self {
            http: reqwest::Client::new(),
            base: base.as_str().trim_end_matches('/').to_string(),
            store,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base
    }

    pub fn token_store(&self) -> &S {
        &self.store
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    /// Send with the stored token attached. On 401 the token is dropped; if
    /// one was sent the session is reported as expired.
    async fn execute(&self, request: RequestBuilder) -> Result<Response, ClientError> {
        let token = self.store.get();
        let request = match &token {
            Some(token) => request.bearer_auth(token),
            None => request,
        };

        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = error_message(response).await;
        if status == StatusCode::UNAUTHORIZED {
            self.store
                .clear()
                .map_err(|e| ClientError::TokenStore(e.to_string()))?;
            if token.is_some() {
                return Err(ClientError::SessionExpired);
            }
        }

        Err(ClientError::Api {
            status: status.as_u16(),
            message,
        })
    }

    async fn fetch<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ClientError> {
        Ok(self.execute(request).await?.json::<T>().await?)
    }

    pub async fn health(&self) -> Result<Value, ClientError> {
        self.fetch(self.http.get(self.url("/health"))).await
    }

    /// Exchange credentials for a token and keep it in the store.
    pub async fn login(&self, email: &str, password: &str) -> Result<String, ClientError> {
        let request = self
            .http
            .post(self.url("/api/auth/login"))
            .json(&json!({ "email": email, "password": password }));
        let LoginResponse { token } = self.fetch(request).await?;

        self.store
            .set(&token)
            .map_err(|e| ClientError::TokenStore(e.to_string()))?;
        Ok(token)
    }

    pub fn logout(&self) -> Result<(), ClientError> {
        self.store
            .clear()
            .map_err(|e| ClientError::TokenStore(e.to_string()))
    }

    pub async fn me(&self) -> Result<Value, ClientError> {
        self.fetch(self.http.get(self.url("/api/auth/me"))).await
    }

    pub async fn landing(&self) -> Landing {
        let (projects, clients) = tokio::join!(
            self.list::<Project>(Access::Public),
            self.list::<Client>(Access::Public)
        );
        Landing { projects, clients }
    }

    pub async fn list<R>(&self, access: Access) -> Result<Vec<R>, ClientError>
    where
        R: Resource + DeserializeOwned,
    {
        self.fetch(self.http.get(self.url(&collection_path::<R>(access))))
            .await
    }

    pub async fn create<R>(&self, fields: FormFields, image: &Path) -> Result<R, ClientError>
    where
        R: Resource + DeserializeOwned,
    {
        let form = resource_form::<R>(fields, Some(image)).await?;
        let request = self
            .http
            .post(self.url(&collection_path::<R>(Access::Admin)))
            .multipart(form);
        self.fetch(request).await
    }

    pub async fn update<R>(
        &self,
        id: &str,
        fields: FormFields,
        image: Option<&Path>,
    ) -> Result<R, ClientError>
    where
        R: Resource + DeserializeOwned,
    {
        let form = resource_form::<R>(fields, image).await?;
        let path = format!("{}/{}", collection_path::<R>(Access::Admin), id);
        self.fetch(self.http.put(self.url(&path)).multipart(form)).await
    }

    /// Returns the server's confirmation message.
    pub async fn delete<R: Resource>(&self, id: &str) -> Result<String, ClientError> {
        let path = format!("{}/{}", collection_path::<R>(Access::Admin), id);
        let body: Value = self.fetch(self.http.delete(self.url(&path))).await?;
        Ok(body
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string())
    }

    pub async fn subscribe(&self, email: &str) -> Result<SubscribeResponse, ClientError> {
        let request = self
            .http
            .post(self.url("/api/newsletter"))
            .json(&json!({ "email": email }));
        self.fetch(request).await
    }

    pub async fn subscribers(&self) -> Result<Vec<Subscriber>, ClientError> {
        self.fetch(self.http.get(self.url("/api/admin/newsletter")))
            .await
    }
}

fn collection_path<R: Resource>(access: Access) -> String {
    match access {
        Access::Public => format!("/api/{}", R::COLLECTION),
        Access::Admin => format!("/api/admin/{}", R::COLLECTION),
    }
}

async fn resource_form<R: Resource>(
    fields: FormFields,
    image: Option<&Path>,
) -> Result<Form, ClientError> {
    let mut form = Form::new();
    for (name, value) in fields {
        form = form.text(name, value);
    }

    if let Some(path) = image {
        let bytes = tokio::fs::read(path).await.map_err(|source| ClientError::File {
            path: path.to_path_buf(),
            source,
        })?;
        let filename = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("image")
            .to_string();
        let part = Part::bytes(bytes)
            .file_name(filename)
            .mime_str(image_mime(path))?;
        form = form.part(R::IMAGE_FIELD, part);
    }

    Ok(form)
}

/// MIME type from the file extension; the server rejects anything not `image/*`.
pub fn image_mime(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "avif" => "image/avif",
        "bmp" => "image/bmp",
        _ => "application/octet-stream",
    }
}

async fn error_message(response: Response) -> String {
    let status = response.status();
    response
        .json::<Value>()
        .await
        .ok()
        .and_then(|body| body.get("message").and_then(Value::as_str).map(String::from))
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("Request failed")
                .to_string()
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::token_store::MemoryTokenStore;

    #[test]
    fn mime_follows_extension() {
        assert_eq!(image_mime(Path::new("ana.JPG")), "image/jpeg");
        assert_eq!(image_mime(Path::new("logo.png")), "image/png");
        assert_eq!(image_mime(Path::new("notes.txt")), "application/octet-stream");
    }

    #[test]
    fn paths_follow_access() {
        assert_eq!(collection_path::<Project>(Access::Public), "/api/projects");
        assert_eq!(collection_path::<Client>(Access::Admin), "/api/admin/clients");
    }

    #[test]
    fn base_url_is_normalized() {
        let client = ApiClient::new("http://localhost:5000/", MemoryTokenStore::default()).unwrap();
        assert_eq!(client.base_url(), "http://localhost:5000");
        assert!(ApiClient::new("not a url", MemoryTokenStore::default()).is_err());
    }
}
