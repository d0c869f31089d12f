//! Shared list/create/update/delete flow for the `projects` and `clients`
//! command groups.

use std::path::Path;

use serde::de::DeserializeOwned;
use serde_json::json;

use crate::cli::utils::{output_collection, output_record, output_success};
use crate::cli::{OutputFormat, Session};
use crate::database::models::Resource;
use crate::database::FormFields;
use crate::routes::Access;

pub async fn list<R, F>(
    session: &Session,
    admin: bool,
    output_format: &OutputFormat,
    render: F,
) -> anyhow::Result<()>
where
    R: Resource + DeserializeOwned,
    F: Fn(&R) -> String,
{
    let access = if admin { Access::Admin } else { Access::Public };
    let records = session.list::<R>(access).await?;
    output_collection(
        output_format,
        R::COLLECTION,
        &records,
        &format!("No {} yet", R::COLLECTION),
        render,
    )
}

pub async fn create<R>(
    session: &Session,
    fields: FormFields,
    image: &Path,
    output_format: &OutputFormat,
) -> anyhow::Result<()>
where
    R: Resource + DeserializeOwned,
{
    let record = session.create::<R>(fields, image).await?;
    output_record(output_format, &format!("{} {} created", R::LABEL, record.id()), &record)
}

pub async fn update<R>(
    session: &Session,
    id: &str,
    fields: FormFields,
    image: Option<&Path>,
    output_format: &OutputFormat,
) -> anyhow::Result<()>
where
    R: Resource + DeserializeOwned,
{
    if fields.is_empty() && image.is_none() {
        anyhow::bail!("Nothing to update: pass at least one field or --image");
    }
    let record = session.update::<R>(id, fields, image).await?;
    output_record(output_format, &format!("{} {} updated", R::LABEL, record.id()), &record)
}

pub async fn delete<R: Resource>(
    session: &Session,
    id: &str,
    output_format: &OutputFormat,
) -> anyhow::Result<()> {
    let message = session.delete::<R>(id).await?;
    output_success(output_format, &message, Some(json!({ "_id": id })))
}

/// Form fields from optional CLI values; absent values are left out.
pub fn fields<const N: usize>(values: [(&str, Option<String>); N]) -> FormFields {
    values
        .into_iter()
        .filter_map(|(name, value)| value.map(|value| (name.to_string(), value)))
        .collect()
}
