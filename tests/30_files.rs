mod common;

use anyhow::Result;
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};

fn upload(filename: &str, content_type: &str, body: &'static str) -> Result<Request<Body>> {
    Ok(Request::post(format!("/api/files/{}", filename))
        .header(header::CONTENT_TYPE, content_type)
        .body(Body::from(body))?)
}

#[tokio::test]
async fn upload_get_list_delete() -> Result<()> {
    let app = common::app()?;

    let (status, payload) = common::send(&app, upload("brief.pdf", "application/pdf", "hello")?).await?;
    assert_eq!(status, StatusCode::CREATED, "{}", payload);
    let created = &payload["data"];
    assert_eq!(created["id"], 1);
    assert_eq!(created["filename"], "brief.pdf");
    assert_eq!(created["contentType"], "application/pdf");
    assert_eq!(created["size"], 5);
    assert_eq!(
        created["checksum"],
        "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"
    );

    let (status, payload) = common::get(&app, "/api/files/1").await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(payload["data"]["filename"], "brief.pdf");

    let (_, payload) = common::get(&app, "/api/files").await?;
    assert_eq!(payload["data"].as_array().map(Vec::len), Some(1));

    let (status, _) = common::send(&app, Request::delete("/api/files/1").body(Body::empty())?).await?;
    assert_eq!(status, StatusCode::OK);

    let (status, payload) = common::get(&app, "/api/files/1").await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(payload["code"], "NOT_FOUND");
    Ok(())
}

#[tokio::test]
async fn reupload_replaces_metadata_under_the_same_id() -> Result<()> {
    let app = common::app()?;

    let (_, first) = common::send(&app, upload("notes.txt", "text/plain", "v1")?).await?;
    let (_, second) = common::send(&app, upload("notes.txt", "text/markdown", "version 2")?).await?;

    assert_eq!(first["data"]["id"], second["data"]["id"]);
    assert_eq!(second["data"]["contentType"], "text/markdown");
    assert_eq!(second["data"]["size"], 9);

    let (_, listing) = common::get(&app, "/api/files").await?;
    assert_eq!(listing["data"].as_array().map(Vec::len), Some(1));
    Ok(())
}

#[tokio::test]
async fn missing_content_type_defaults_to_octet_stream() -> Result<()> {
    let app = common::app()?;
    let request = Request::post("/api/files/blob.bin").body(Body::from("x"))?;

    let (status, payload) = common::send(&app, request).await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(payload["data"]["contentType"], "application/octet-stream");
    Ok(())
}

#[tokio::test]
async fn path_like_filenames_are_rejected() -> Result<()> {
    let app = common::app()?;
    let (status, payload) = common::send(&app, upload("a%5Cb", "text/plain", "x")?).await?;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(payload["code"], "BAD_REQUEST");
    Ok(())
}
