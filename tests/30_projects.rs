mod common;

use anyhow::Result;
use reqwest::multipart::Form;
use reqwest::StatusCode;
use serde_json::{json, Value};

#[tokio::test]
async fn create_then_list_newest_first() -> Result<()> {
    let server = common::spawn_server().await?;

    let first = common::create_project(&server, "Harbor Villa").await?;
    let second = common::create_project(&server, "Cliff House").await?;

    assert_eq!(first["projectName"], "Harbor Villa");
    let image = first["projectImage"].as_str().expect("image url");
    assert!(
        image.starts_with(&format!("{}/uploads/projects/", server.base_url)),
        "unexpected image url {image}"
    );
    assert!(image.ends_with(".jpg"));
    assert!(first["_id"].is_string());
    assert!(first["createdAt"].is_string());
    assert!(first["updatedAt"].is_string());

    // the public and admin lists agree
    let public: Vec<Value> = server.http.get(server.url("/api/projects")).send().await?.json().await?;
    let admin: Vec<Value> = server
        .http
        .get(server.url("/api/admin/projects"))
        .bearer_auth(server.admin_token())
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(public, admin);
    assert_eq!(public.len(), 2);
    assert_eq!(public[0]["_id"], second["_id"]);
    assert_eq!(public[1]["_id"], first["_id"]);
    Ok(())
}

#[tokio::test]
async fn empty_list_is_an_empty_array() -> Result<()> {
    let server = common::spawn_server().await?;
    let body: Value = server.http.get(server.url("/api/projects")).send().await?.json().await?;
    assert_eq!(body, json!([]));
    Ok(())
}

#[tokio::test]
async fn missing_fields_are_rejected_and_nothing_is_kept() -> Result<()> {
    let server = common::spawn_server().await?;

    let form = Form::new()
        .text("projectName", "Harbor Villa")
        .part(
            "projectImage",
            common::image_part("villa.jpg", "image/jpeg", common::JPEG_BYTES),
        );
    let res = server
        .http
        .post(server.url("/api/admin/projects"))
        .bearer_auth(server.admin_token())
        .multipart(form)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = res.json::<Value>().await?;
    assert_eq!(body["message"], "Please provide all required fields");
    assert_eq!(body["code"], "VALIDATION_ERROR");

    // the uploaded image was removed again
    assert!(common::stored_files(&server, "projects").is_empty());

    let list: Vec<Value> = server.http.get(server.url("/api/projects")).send().await?.json().await?;
    assert!(list.is_empty());
    Ok(())
}

#[tokio::test]
async fn blank_fields_count_as_missing() -> Result<()> {
    let server = common::spawn_server().await?;

    let res = server
        .http
        .post(server.url("/api/admin/projects"))
        .bearer_auth(server.admin_token())
        .multipart(common::project_form("   ", "A description"))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn image_is_required_on_create() -> Result<()> {
    let server = common::spawn_server().await?;

    let form = Form::new()
        .text("projectName", "Harbor Villa")
        .text("projectDescription", "Sea views");
    let res = server
        .http
        .post(server.url("/api/admin/projects"))
        .bearer_auth(server.admin_token())
        .multipart(form)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = res.json::<Value>().await?;
    assert_eq!(body["message"], "Project image is required");
    Ok(())
}

#[tokio::test]
async fn partial_update_keeps_other_fields_and_image() -> Result<()> {
    let server = common::spawn_server().await?;
    let created = common::create_project(&server, "Harbor Villa").await?;
    let id = created["_id"].as_str().expect("id");

    let res = server
        .http
        .put(server.url(&format!("/api/admin/projects/{id}")))
        .bearer_auth(server.admin_token())
        .multipart(Form::new().text("projectName", "  Harbor Villa II  "))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let updated = res.json::<Value>().await?;

    assert_eq!(updated["_id"], created["_id"]);
    assert_eq!(updated["projectName"], "Harbor Villa II");
    assert_eq!(updated["projectDescription"], created["projectDescription"]);
    assert_eq!(updated["projectImage"], created["projectImage"]);
    assert_eq!(updated["createdAt"], created["createdAt"]);
    Ok(())
}

#[tokio::test]
async fn image_url_sent_as_text_is_ignored() -> Result<()> {
    let server = common::spawn_server().await?;
    let created = common::create_project(&server, "Harbor Villa").await?;
    let id = created["_id"].as_str().expect("id");

    let form = Form::new()
        .text("projectName", "Renamed")
        .text("projectImage", "http://elsewhere.example/uploads/projects/other.jpg");
    let res = server
        .http
        .put(server.url(&format!("/api/admin/projects/{id}")))
        .bearer_auth(server.admin_token())
        .multipart(form)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let updated = res.json::<Value>().await?;

    assert_eq!(updated["projectName"], "Renamed");
    assert_eq!(updated["projectImage"], created["projectImage"]);
    assert_eq!(common::stored_files(&server, "projects").len(), 1);
    Ok(())
}

#[tokio::test]
async fn update_accepts_json_and_replaces_image_over_multipart() -> Result<()> {
    let server = common::spawn_server().await?;
    let created = common::create_project(&server, "Harbor Villa").await?;
    let id = created["_id"].as_str().expect("id");
    let path = format!("/api/admin/projects/{id}");

    let res = server
        .http
        .put(server.url(&path))
        .bearer_auth(server.admin_token())
        .json(&json!({ "projectDescription": "Now with a pool" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.json::<Value>().await?["projectDescription"], "Now with a pool");

    let form = Form::new().part(
        "projectImage",
        common::image_part("pool.png", "image/png", b"\x89PNG\r\n\x1a\n"),
    );
    let res = server
        .http
        .put(server.url(&path))
        .bearer_auth(server.admin_token())
        .multipart(form)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let updated = res.json::<Value>().await?;
    assert_ne!(updated["projectImage"], created["projectImage"]);
    assert!(updated["projectImage"].as_str().unwrap_or_default().ends_with(".png"));
    Ok(())
}

#[tokio::test]
async fn blank_field_in_update_is_rejected() -> Result<()> {
    let server = common::spawn_server().await?;
    let created = common::create_project(&server, "Harbor Villa").await?;
    let id = created["_id"].as_str().expect("id");

    let res = server
        .http
        .put(server.url(&format!("/api/admin/projects/{id}")))
        .bearer_auth(server.admin_token())
        .json(&json!({ "projectName": "" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn unknown_and_malformed_ids_are_404() -> Result<()> {
    let server = common::spawn_server().await?;
    let missing = uuid::Uuid::now_v7().to_string();

    for id in [missing.as_str(), "not-an-id"] {
        let res = server
            .http
            .put(server.url(&format!("/api/admin/projects/{id}")))
            .bearer_auth(server.admin_token())
            .json(&json!({ "projectName": "x" }))
            .send()
            .await?;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        assert_eq!(res.json::<Value>().await?["message"], "Project not found");

        let res = server
            .http
            .delete(server.url(&format!("/api/admin/projects/{id}")))
            .bearer_auth(server.admin_token())
            .send()
            .await?;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }
    Ok(())
}

#[tokio::test]
async fn delete_removes_the_record() -> Result<()> {
    let server = common::spawn_server().await?;
    let created = common::create_project(&server, "Harbor Villa").await?;
    let id = created["_id"].as_str().expect("id");
    let path = format!("/api/admin/projects/{id}");

    let res = server
        .http
        .delete(server.url(&path))
        .bearer_auth(server.admin_token())
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.json::<Value>().await?["message"], "Project deleted successfully");

    let list: Vec<Value> = server.http.get(server.url("/api/projects")).send().await?.json().await?;
    assert!(list.is_empty());

    let again = server
        .http
        .delete(server.url(&path))
        .bearer_auth(server.admin_token())
        .send()
        .await?;
    assert_eq!(again.status(), StatusCode::NOT_FOUND);
    Ok(())
}
