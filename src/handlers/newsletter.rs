// handlers/newsletter.rs - Newsletter subscription handlers

use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};

use crate::database::models::subscriber::{looks_like_email, normalize_email};
use crate::database::models::Subscriber;
use crate::database::DatabaseError;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use crate::upload::form::TextForm;

const ALREADY_SUBSCRIBED: &str = "Email already subscribed";

/// POST /api/newsletter - Public subscription
///
/// Expected Input:
/// ```json
/// { "email": "ana@example.com" }
/// ```
///
/// Expected Output (201):
/// ```json
/// {
///   "message": "Successfully subscribed to newsletter",
///   "subscriber": { "_id": "...", "email": "ana@example.com", "subscribedAt": "...", "createdAt": "..." }
/// }
/// ```
pub async fn subscribe(
    State(state): State<AppState>,
    TextForm(fields): TextForm,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let raw = fields.get("email").map(String::as_str).unwrap_or_default();
    if raw.trim().is_empty() {
        return Err(ApiError::field_required("email", "Please provide an email"));
    }

    let email = normalize_email(raw);
    if !looks_like_email(&email) {
        return Err(ApiError::field_required("email", "Please provide a valid email"));
    }

    let subscribers = &state.repos.subscribers;
    if subscribers.find_by_email(&email).await?.is_some() {
        return Err(ApiError::conflict(ALREADY_SUBSCRIBED));
    }

    // a concurrent request may win the race between the lookup and the insert
    let subscriber = match subscribers.insert(Subscriber::new(email)).await {
        Ok(subscriber) => subscriber,
        Err(DatabaseError::Duplicate(_)) => return Err(ApiError::conflict(ALREADY_SUBSCRIBED)),
        Err(e) => return Err(e.into()),
    };

    tracing::info!("New newsletter subscriber {}", subscriber.id);
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Successfully subscribed to newsletter",
            "subscriber": subscriber
        })),
    ))
}

/// GET /api/admin/newsletter - All subscribers, most recent first
pub async fn list(State(state): State<AppState>) -> ApiResult<Json<Vec<Subscriber>>> {
    let subscribers = state.repos.subscribers.list().await?;
    Ok(Json(subscribers))
}
