mod common;

use anyhow::Result;
use reqwest::StatusCode;

#[tokio::test]
async fn root_returns_welcome_banner() -> Result<()> {
    let server = common::spawn_server().await?;

    let res = server.http.get(server.url("/")).send().await?;
    assert_eq!(res.status(), StatusCode::OK);

    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["message"], "Welcome to the landing API");
    Ok(())
}

#[tokio::test]
async fn health_reports_the_store() -> Result<()> {
    let server = common::spawn_server().await?;

    let res = server.http.get(server.url("/health")).send().await?;
    assert_eq!(res.status(), StatusCode::OK);

    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["database"], "memory");
    assert!(body["timestamp"].is_string());
    Ok(())
}

#[tokio::test]
async fn unknown_route_is_json_404() -> Result<()> {
    let server = common::spawn_server().await?;

    let res = server.http.get(server.url("/api/nothing-here")).send().await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["error"], true);
    assert_eq!(body["code"], "NOT_FOUND");
    assert!(body["message"].is_string());
    Ok(())
}
