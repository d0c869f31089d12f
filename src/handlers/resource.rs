// handlers/resource.rs - Shared CRUD handlers for image-backed resources
//
// Projects and clients go through the same four handlers; the `Resource`
// implementation on each model supplies names, fields and messages.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use tracing::info;
use uuid::Uuid;

use crate::database::models::Resource;
use crate::error::{ApiError, ApiResult};
use crate::middleware::RequestOrigin;
use crate::state::AppState;
use crate::upload::{ResourceForm, UploadForm};

/// GET /api/{collection} and GET /api/admin/{collection}
///
/// Every record, newest first. Both mounts return the same payload.
pub async fn list<R: Resource>(State(state): State<AppState>) -> ApiResult<Json<Vec<R>>> {
    let records = R::repository(&state.repos).list().await?;
    Ok(Json(records))
}

/// POST /api/admin/{collection} - multipart with the text fields and one image
///
/// Expected Output (201):
/// ```json
/// {
///   "_id": "0190f5c4-...",
///   "projectName": "Harbor Villa",
///   "projectDescription": "...",
///   "projectImage": "http://localhost:5000/uploads/projects/1718000000000-123456789.jpg",
///   "createdAt": "2025-01-01T00:00:00Z",
///   "updatedAt": "2025-01-01T00:00:00Z"
/// }
/// ```
pub async fn create<R: Resource>(
    State(state): State<AppState>,
    origin: RequestOrigin,
    form: ResourceForm<R>,
) -> ApiResult<(StatusCode, Json<R>)> {
    let mut form = form.into_inner();
    let result = insert_record::<R>(&state, &origin, &mut form).await;
    if result.is_err() {
        form.discard_image().await;
    }
    result.map(|record| (StatusCode::CREATED, Json(record)))
}

async fn insert_record<R: Resource>(
    state: &AppState,
    origin: &RequestOrigin,
    form: &mut UploadForm,
) -> ApiResult<R> {
    let draft = R::draft(&form.fields)?;

    let Some(image) = form.image.as_ref() else {
        return Err(ApiError::field_required(
            R::IMAGE_FIELD,
            format!("{} image is required", R::LABEL),
        ));
    };

    let record = R::create(draft, image.public_url(origin.as_str()));
    let record = R::repository(&state.repos).insert(record).await?;

    // the record now owns the file
    form.image = None;
    info!("Created {} {}", R::LABEL.to_lowercase(), record.id());
    Ok(record)
}

/// PUT /api/admin/{collection}/:id - partial update, image optional
///
/// Fields that are not supplied keep their stored values; without a new image
/// the existing image URL is kept.
pub async fn update<R: Resource>(
    State(state): State<AppState>,
    Path(id): Path<String>,
    origin: RequestOrigin,
    form: ResourceForm<R>,
) -> ApiResult<Json<R>> {
    let mut form = form.into_inner();
    let result = update_record::<R>(&state, &id, &origin, &mut form).await;
    if result.is_err() {
        form.discard_image().await;
    }
    result.map(Json)
}

async fn update_record<R: Resource>(
    state: &AppState,
    id: &str,
    origin: &RequestOrigin,
    form: &mut UploadForm,
) -> ApiResult<R> {
    let repo = R::repository(&state.repos);
    let id = parse_id::<R>(id)?;

    if repo.find(id).await?.is_none() {
        return Err(not_found::<R>());
    }

    let patch = R::patch(&form.fields)?;
    let image_url = form.image.as_ref().map(|image| image.public_url(origin.as_str()));

    // deleted between the lookup and the write
    let record = repo
        .update(id, patch, image_url)
        .await?
        .ok_or_else(not_found::<R>)?;

    form.image = None;
    info!("Updated {} {}", R::LABEL.to_lowercase(), id);
    Ok(record)
}

/// DELETE /api/admin/{collection}/:id
///
/// Expected Output:
/// ```json
/// { "message": "Project deleted successfully" }
/// ```
pub async fn delete<R: Resource>(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    let id = parse_id::<R>(&id)?;

    if !R::repository(&state.repos).delete(id).await? {
        return Err(not_found::<R>());
    }

    info!("Deleted {} {}", R::LABEL.to_lowercase(), id);
    Ok(Json(json!({
        "message": format!("{} deleted successfully", R::LABEL)
    })))
}

/// Ids that are not UUIDs cannot match anything.
fn parse_id<R: Resource>(id: &str) -> ApiResult<Uuid> {
    Uuid::parse_str(id).map_err(|_| not_found::<R>())
}

fn not_found<R: Resource>() -> ApiError {
    ApiError::not_found(format!("{} not found", R::LABEL))
}
