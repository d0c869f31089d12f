use std::collections::HashMap;
use std::marker::PhantomData;

use async_trait::async_trait;
use axum::extract::{FromRequest, Multipart, Request};
use axum::http::header::CONTENT_TYPE;
use axum::{Form, Json};
use serde_json::{Map, Value};

use super::UploadForm;
use crate::database::models::Resource;
use crate::database::FormFields;
use crate::error::ApiError;
use crate::state::AppState;

/// Body of a resource create/update: multipart (with the resource's image
/// field stored to disk) or plain JSON / urlencoded text fields.
pub struct ResourceForm<R> {
    pub form: UploadForm,
    _resource: PhantomData<R>,
}

impl<R> ResourceForm<R> {
    pub fn into_inner(self) -> UploadForm {
        self.form
    }
}

#[async_trait]
impl<R: Resource> FromRequest<AppState> for ResourceForm<R> {
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &AppState) -> Result<Self, Self::Rejection> {
        let form = if content_type(&req).starts_with("multipart/form-data") {
            let multipart = Multipart::from_request(req, state)
                .await
                .map_err(|e| ApiError::bad_request(e.body_text()))?;
            state
                .uploads
                .read_multipart(multipart, R::COLLECTION, R::IMAGE_FIELD)
                .await?
        } else {
            let TextForm(fields) = TextForm::from_request(req, state).await?;
            UploadForm {
                fields,
                image: None,
            }
        };

        Ok(Self {
            form,
            _resource: PhantomData,
        })
    }
}

/// Flat text fields from a JSON object or an urlencoded form. An empty body
/// yields no fields.
pub struct TextForm(pub FormFields);

#[async_trait]
impl<S: Send + Sync> FromRequest<S> for TextForm {
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = content_type(&req);

        if content_type.starts_with("application/json") {
            let Json(object) = Json::<Map<String, Value>>::from_request(req, state)
                .await
                .map_err(|e| ApiError::invalid_json(e.body_text()))?;
            return Ok(TextForm(json_fields(object)));
        }

        if content_type.starts_with("application/x-www-form-urlencoded") {
            let Form(fields) = Form::<HashMap<String, String>>::from_request(req, state)
                .await
                .map_err(|e| ApiError::bad_request(e.body_text()))?;
            return Ok(TextForm(fields));
        }

        let body = axum::body::Bytes::from_request(req, state)
            .await
            .map_err(|e| ApiError::bad_request(e.body_text()))?;
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(TextForm(FormFields::new()));
        }
        Err(ApiError::bad_request(
            "Expected a JSON, urlencoded or multipart request body",
        ))
    }
}

fn content_type(req: &Request) -> String {
    req.headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_ascii_lowercase()
}

/// Scalars become strings; nulls, arrays and objects are dropped.
fn json_fields(object: Map<String, Value>) -> FormFields {
    object
        .into_iter()
        .filter_map(|(key, value)| match value {
            Value::String(s) => Some((key, s)),
            Value::Number(n) => Some((key, n.to_string())),
            Value::Bool(b) => Some((key, b.to_string())),
            _ => None,
        })
        .collect()
}
