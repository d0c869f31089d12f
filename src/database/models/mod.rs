pub mod client;
pub mod project;
pub mod subscriber;
pub mod user;

pub use client::{Client, ClientDraft, ClientPatch};
pub use project::{Project, ProjectDraft, ProjectPatch};
pub use subscriber::Subscriber;
pub use user::{Role, User};

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::database::record::{FormFields, RecordError};
use crate::database::repository::{Repositories, ResourceRepository};

/// An image-backed content record managed through the admin CRUD surface.
///
/// Projects and clients share one controller; everything that differs between
/// them (collection name, form field names, validation messages) lives here.
pub trait Resource: Serialize + Clone + Send + Sync + 'static {
    /// Validated input for a create.
    type Draft: Send;
    /// Supplied fields of a partial update.
    type Patch: Send + Sync + Clone + Default;

    /// Collection / upload subdirectory name, e.g. `projects`.
    const COLLECTION: &'static str;
    /// Human label used in messages, e.g. `Project`.
    const LABEL: &'static str;
    /// Multipart field carrying the image, e.g. `projectImage`.
    const IMAGE_FIELD: &'static str;

    fn draft(fields: &FormFields) -> Result<Self::Draft, RecordError>;

    fn patch(fields: &FormFields) -> Result<Self::Patch, RecordError>;

    /// Build a brand new record with a fresh id and timestamps.
    fn create(draft: Self::Draft, image_url: String) -> Self;

    /// Apply a partial update in place.
    fn apply(&mut self, patch: Self::Patch, image_url: Option<String>);

    fn id(&self) -> Uuid;

    fn created_at(&self) -> DateTime<Utc>;

    fn repository(repos: &Repositories) -> &dyn ResourceRepository<Self>;
}

/// Newest first; ties broken by id, which is time ordered.
pub fn sort_newest_first<R: Resource>(records: &mut [R]) {
    records.sort_by(|a, b| {
        b.created_at()
            .cmp(&a.created_at())
            .then_with(|| b.id().cmp(&a.id()))
    });
}
