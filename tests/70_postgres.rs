//! PostgreSQL backend. Runs only when DATABASE_URL points at a scratch
//! database; every test skips otherwise.

use anyhow::Result;
use axum::http::StatusCode;
use uuid::Uuid;

use landing_api::config::DatabaseConfig;
use landing_api::database::models::{Client, Project, Resource, Subscriber};
use landing_api::database::{
    DatabaseError, DatabaseManager, FormFields, Repositories, ResourceRepository, SubscriberRepository,
};
use landing_api::error::ApiError;

async fn postgres() -> Result<Option<Repositories>> {
    let Some(url) = std::env::var("DATABASE_URL").ok().filter(|v| !v.trim().is_empty()) else {
        eprintln!("DATABASE_URL not set, skipping");
        return Ok(None);
    };
    let config = DatabaseConfig {
        url: Some(url),
        max_connections: 2,
        connection_timeout: 10,
    };
    let pool = DatabaseManager::connect(&config).await?;
    Ok(Some(Repositories::postgres(pool)))
}

fn fields(pairs: &[(&str, &str)]) -> FormFields {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[tokio::test]
async fn health_check_reaches_the_server() -> Result<()> {
    let Some(repos) = postgres().await? else { return Ok(()) };

    repos.health_check().await?;
    assert_eq!(repos.backend_name(), "postgres");
    Ok(())
}

#[tokio::test]
async fn partial_update_keeps_unsent_columns_and_image() -> Result<()> {
    let Some(repos) = postgres().await? else { return Ok(()) };

    let draft = Project::draft(&fields(&[
        ("projectName", "Harbor Villa"),
        ("projectDescription", "Sea views"),
    ]))?;
    let created = repos
        .projects
        .insert(Project::create(draft, "http://h/uploads/projects/a.jpg".into()))
        .await?;

    let patch = Project::patch(&fields(&[("projectName", "Harbor Villa II")]))?;
    let updated = repos
        .projects
        .update(created.id, patch, None)
        .await?
        .expect("row exists");

    assert_eq!(updated.project_name, "Harbor Villa II");
    assert_eq!(updated.project_description, "Sea views");
    assert_eq!(updated.project_image, "http://h/uploads/projects/a.jpg");

    let replaced = repos
        .projects
        .update(created.id, Project::patch(&FormFields::new())?, Some("http://h/b.png".into()))
        .await?
        .expect("row exists");
    assert_eq!(replaced.project_name, "Harbor Villa II");
    assert_eq!(replaced.project_image, "http://h/b.png");

    assert!(repos.projects.delete(created.id).await?);
    assert!(repos.projects.find(created.id).await?.is_none());
    Ok(())
}

#[tokio::test]
async fn client_round_trip_and_missing_rows() -> Result<()> {
    let Some(repos) = postgres().await? else { return Ok(()) };

    let draft = Client::draft(&fields(&[
        ("clientName", "Ana"),
        ("clientDesignation", "CEO"),
        ("clientDescription", "Great work"),
    ]))?;
    let created = repos
        .clients
        .insert(Client::create(draft, "http://h/uploads/clients/ana.jpg".into()))
        .await?;

    let listed = repos.clients.list().await?;
    assert!(listed.iter().any(|c| c.id == created.id));

    let patch = Client::patch(&fields(&[("clientDesignation", "CTO")]))?;
    let updated = repos.clients.update(created.id, patch, None).await?.expect("row exists");
    assert_eq!(updated.client_name, "Ana");
    assert_eq!(updated.client_designation, "CTO");
    assert_eq!(updated.client_image, created.client_image);

    let unknown = Uuid::now_v7();
    assert!(repos.clients.update(unknown, Default::default(), None).await?.is_none());
    assert!(!repos.clients.delete(unknown).await?);

    assert!(repos.clients.delete(created.id).await?);
    Ok(())
}

#[tokio::test]
async fn duplicate_subscriber_hits_the_unique_index() -> Result<()> {
    let Some(repos) = postgres().await? else { return Ok(()) };

    let email = format!("{}@example.com", Uuid::now_v7().simple());
    repos.subscribers.insert(Subscriber::new(email.clone())).await?;

    let err = repos
        .subscribers
        .insert(Subscriber::new(email.clone()))
        .await
        .unwrap_err();
    assert!(matches!(err, DatabaseError::Duplicate(_)), "got {err:?}");

    let api: ApiError = err.into();
    assert_eq!(api.status_code(), StatusCode::CONFLICT);

    let found = repos.subscribers.find_by_email(&email).await?;
    assert_eq!(found.map(|s| s.email), Some(email));
    Ok(())
}
