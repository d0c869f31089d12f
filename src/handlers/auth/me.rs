// handlers/auth/me.rs - GET /api/auth/me handler

use axum::Json;
use serde_json::{json, Value};

use crate::middleware::AuthUser;

/// GET /api/auth/me - Identity carried by the caller's token
pub async fn me_get(user: AuthUser) -> Json<Value> {
    Json(json!({
        "_id": user.id,
        "email": user.email,
        "role": user.role,
    }))
}
