use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::Resource;
use crate::database::record::{patched, required_all, FormFields, RecordError};
use crate::database::repository::{Repositories, ResourceRepository};

/// A client testimonial shown on the landing page.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub client_name: String,
    pub client_designation: String,
    pub client_description: String,
    pub client_image: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct ClientDraft {
    pub client_name: String,
    pub client_designation: String,
    pub client_description: String,
}

#[derive(Debug, Clone, Default)]
pub struct ClientPatch {
    pub client_name: Option<String>,
    pub client_designation: Option<String>,
    pub client_description: Option<String>,
}

impl Resource for Client {
    type Draft = ClientDraft;
    type Patch = ClientPatch;

    const COLLECTION: &'static str = "clients";
    const LABEL: &'static str = "Client";
    const IMAGE_FIELD: &'static str = "clientImage";

    fn draft(fields: &FormFields) -> Result<ClientDraft, RecordError> {
        let [name, designation, description] =
            required_all(fields, ["clientName", "clientDesignation", "clientDescription"])?;
        Ok(ClientDraft {
            client_name: name.trim().to_string(),
            client_designation: designation.trim().to_string(),
            client_description: description.to_string(),
        })
    }

    fn patch(fields: &FormFields) -> Result<ClientPatch, RecordError> {
        Ok(ClientPatch {
            client_name: patched(fields, "clientName", "Client name is required", true)?,
            client_designation: patched(
                fields,
                "clientDesignation",
                "Client designation is required",
                true,
            )?,
            client_description: patched(
                fields,
                "clientDescription",
                "Client description is required",
                false,
            )?,
        })
    }

    fn create(draft: ClientDraft, image_url: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            client_name: draft.client_name,
            client_designation: draft.client_designation,
            client_description: draft.client_description,
            client_image: image_url,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply(&mut self, patch: ClientPatch, image_url: Option<String>) {
        if let Some(name) = patch.client_name {
            self.client_name = name;
        }
        if let Some(designation) = patch.client_designation {
            self.client_designation = designation;
        }
        if let Some(description) = patch.client_description {
            self.client_description = description;
        }
        if let Some(url) = image_url {
            self.client_image = url;
        }
        self.updated_at = Utc::now();
    }

    fn id(&self) -> Uuid {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn repository(repos: &Repositories) -> &dyn ResourceRepository<Self> {
        repos.clients.as_ref()
    }
}
