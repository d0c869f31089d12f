use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::Resource;
use crate::database::record::{patched, required_all, FormFields, RecordError};
use crate::database::repository::{Repositories, ResourceRepository};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub project_name: String,
    pub project_description: String,
    pub project_image: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct ProjectDraft {
    pub project_name: String,
    pub project_description: String,
}

#[derive(Debug, Clone, Default)]
pub struct ProjectPatch {
    pub project_name: Option<String>,
    pub project_description: Option<String>,
}

impl Resource for Project {
    type Draft = ProjectDraft;
    type Patch = ProjectPatch;

    const COLLECTION: &'static str = "projects";
    const LABEL: &'static str = "Project";
    const IMAGE_FIELD: &'static str = "projectImage";

    fn draft(fields: &FormFields) -> Result<ProjectDraft, RecordError> {
        let [name, description] = required_all(fields, ["projectName", "projectDescription"])?;
        Ok(ProjectDraft {
            project_name: name.trim().to_string(),
            project_description: description.to_string(),
        })
    }

    fn patch(fields: &FormFields) -> Result<ProjectPatch, RecordError> {
        Ok(ProjectPatch {
            project_name: patched(fields, "projectName", "Project name is required", true)?,
            project_description: patched(
                fields,
                "projectDescription",
                "Project description is required",
                false,
            )?,
        })
    }

    fn create(draft: ProjectDraft, image_url: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            project_name: draft.project_name,
            project_description: draft.project_description,
            project_image: image_url,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply(&mut self, patch: ProjectPatch, image_url: Option<String>) {
        if let Some(name) = patch.project_name {
            self.project_name = name;
        }
        if let Some(description) = patch.project_description {
            self.project_description = description;
        }
        if let Some(url) = image_url {
            self.project_image = url;
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
        repos.projects.as_ref()
    }
}
