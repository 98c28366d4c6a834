use std::net::{Ipv4Addr, SocketAddr};

use anyhow::{Ok, Result};
use axum::{
    body::Body,
    http::{Request, StatusCode, header::CONTENT_TYPE},
};
use hyper_util::{client::legacy::Client, rt::TokioExecutor};
use serde_json::json;
use tokio::net::TcpListener;
use tower::ServiceExt as _;

use super::*;
use crate::tests::ext::BodyExt as _;


fn documents() -> DocumentStore {
    DocumentStore::from_documents([
        ("v1", r#"{"openapi":"3.0.3","info":{"title":"Pets","version":"1"}}"#),
        ("v2", r#"{"openapi":"3.1.0","info":{"title":"Pets","version":"2"}}"#),
        ("default", r#"{"openapi":"3.1.0","info":{"title":"Pets","version":"default"}}"#),
    ])
}

fn default_app() -> Router {
    app(&SwaggerConfig::default(), documents())
}

async fn get(app: Router, uri: &str) -> Result<axum::response::Response> {
    Ok(app.oneshot(Request::builder().uri(uri).body(Body::empty())?).await?)
}

#[tokio::test]
async fn swagger_ui_lists_loaded_documents() -> Result<()> {
    let response = get(default_app(), "/swagger").await?;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers().get(CONTENT_TYPE).unwrap(), "text/html; charset=utf-8");

    let body = response.into_body().body_as_string().await;
    assert!(body.contains("<title>OpenApi documentation</title>"));
    assert!(body.contains("{ name: 'default', url: '/openapi?v=default' },"));
    assert!(body.contains("{ name: 'v1', url: '/openapi?v=v1' },"));
    assert!(body.contains("{ name: 'v2', url: '/openapi?v=v2' }\n"));
    assert!(body.contains(r#"validatorUrl: "https://validator.swagger.io/validator""#));
    assert!(body.contains(r#"href="/webjars/swagger-ui/5.17.14/swagger-ui.css""#));
    Ok(())
}

#[tokio::test]
async fn swagger_ui_falls_back_to_configured_versions() -> Result<()> {
    let config = SwaggerConfig {
        versions: vec!["beta".to_string(), "alpha".to_string()],
        ..Default::default()
    };
    let body = get(app(&config, DocumentStore::default()), "/swagger")
        .await?
        .into_body()
        .body_as_string()
        .await;

    let beta = body.find("name: 'beta'").unwrap();
    let alpha = body.find("name: 'alpha'").unwrap();
    assert!(beta < alpha);
    Ok(())
}

#[tokio::test]
async fn swagger_ui_without_versions() -> Result<()> {
    let body = get(app(&SwaggerConfig::default(), DocumentStore::default()), "/swagger")
        .await?
        .into_body()
        .body_as_string()
        .await;

    assert!(body.contains("urls: [],"));
    Ok(())
}

#[tokio::test]
async fn routes_are_mounted_under_routing_path() -> Result<()> {
    let config = SwaggerConfig::from_json(
        r#"{
            "routing_path": "/docs/",
            "base_path": "/api/",
            "validator_url": null
        }"#,
    )?;

    let response = get(app(&config, documents()), "/docs/swagger").await?;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response.into_body().body_as_string().await;
    assert!(body.contains("url: '/api/docs/openapi?v=v1'"));
    assert!(body.contains(r#"src="/api/docs/webjars/swagger-ui/5.17.14/swagger-ui-bundle.js""#));
    assert!(body.contains("validatorUrl: null"));

    let response = get(app(&config, documents()), "/docs/openapi?v=v1").await?;
    assert_eq!(response.status(), StatusCode::OK);

    let response = get(app(&config, documents()), "/swagger").await?;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[test_case::test_case("/openapi?v=v1", "1")]
#[test_case::test_case("/openapi?v=v2", "2")]
#[test_case::test_case("/openapi", "default")]
#[tokio::test]
async fn openapi_document(uri: &str, version: &str) -> Result<()> {
    let response = get(default_app(), uri).await?;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers().get(CONTENT_TYPE).unwrap(), "application/json");
    let body = response.into_body().body_as_json().await;
    assert_eq!(body["info"]["version"], version);
    Ok(())
}

#[tokio::test]
async fn unknown_openapi_version() -> Result<()> {
    let response = get(default_app(), "/openapi?v=v9").await?;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        response.into_body().body_as_json().await,
        json!({
            "status_code": 404,
            "error": "Not Found",
            "detail": "unknown openapi version: v9"
        })
    );
    Ok(())
}

#[tokio::test]
async fn empty_openapi_version_is_rejected() -> Result<()> {
    let response = get(default_app(), "/openapi?v=").await?;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = response.into_body().body_as_json().await;
    assert_eq!(body["status_code"], 400);
    assert_eq!(body["error"], "Bad Request");
    Ok(())
}

#[tokio::test]
async fn serves_swagger_ui_assets() -> Result<()> {
    let assets = tempfile::tempdir()?;
    std::fs::write(assets.path().join("swagger-ui.css"), "body { margin: 0 }")?;
    let config = SwaggerConfig {
        assets_dir: Some(assets.path().to_path_buf()),
        ..Default::default()
    };

    let response = get(app(&config, documents()), "/webjars/swagger-ui/5.17.14/swagger-ui.css").await?;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers().get(CONTENT_TYPE).unwrap(), "text/css");
    assert_eq!(response.into_body().body_as_string().await, "body { margin: 0 }");

    let response = get(app(&config, documents()), "/webjars/swagger-ui/5.17.14/missing.js").await?;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn assets_are_not_served_without_directory() -> Result<()> {
    let response = get(default_app(), "/webjars/swagger-ui/5.17.14/swagger-ui.css").await?;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn not_found() -> Result<()> {
    let response = get(default_app(), "/does-not-exist").await?;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = response.into_body().body_as_string().await;
    assert!(body.is_empty());
    Ok(())
}

#[tokio::test]
async fn the_real_deal() -> Result<()> {
    let listener = TcpListener::bind(SocketAddr::from((Ipv4Addr::LOCALHOST, 0))).await?;
    let addr = listener.local_addr()?;

    tokio::spawn(start_server(listener, default_app()));

    let client = Client::builder(TokioExecutor::new()).build_http();

    let response = client
        .request(Request::builder().uri(format!("http://{addr}/openapi?v=v2")).body(Body::empty())?)
        .await?;

    assert_eq!(response.status(), StatusCode::OK);
    let body = response.into_body().body_as_json().await;
    assert_eq!(
        body,
        json!({"openapi": "3.1.0", "info": {"title": "Pets", "version": "2"}})
    );
    Ok(())
}
