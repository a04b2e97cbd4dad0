mod common;

use anyhow::Result;
use reqwest::StatusCode;

#[tokio::test]
async fn health_endpoint_responds() -> Result<()> {
    let server = &common::start_server().await?;
    let client = reqwest::Client::new();

    let res = client.get(server.url("/health")).send().await?;
    assert_eq!(res.status(), StatusCode::OK);

    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["status"], "ok");
    Ok(())
}

#[tokio::test]
async fn root_lists_endpoints() -> Result<()> {
    let server = &common::start_server().await?;
    let body = reqwest::get(server.url("/"))
        .await?
        .json::<serde_json::Value>()
        .await?;

    assert_eq!(body["success"], true);
    assert!(body["data"]["endpoints"]["login"].is_string());
    Ok(())
}

#[tokio::test]
async fn dropped_server_stops_listening() -> Result<()> {
    let server = common::start_server().await?;
    let url = server.url("/health");
    let data_dir = server.data_dir.clone();
    drop(server);

    assert!(reqwest::get(&url).await.is_err());
    assert!(!data_dir.exists());
    Ok(())
}
