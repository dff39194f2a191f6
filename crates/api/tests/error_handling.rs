//! Tests for `AppError` → HTTP response mapping.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use http_body_util::BodyExt;
use proofsheet_api::error::AppError;
use proofsheet_core::error::CoreError;

async fn error_to_response(err: AppError) -> (StatusCode, serde_json::Value) {
    let response = err.into_response();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}

#[tokio::test]
async fn invalid_proof_lists_every_message() {
    let err = AppError::InvalidProof(vec![
        "Prompt must not be empty.".to_string(),
        "Grid Size must be between 1 and 10.".to_string(),
    ]);

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(
        json["error"],
        "Prompt must not be empty. Grid Size must be between 1 and 10."
    );
    assert_eq!(
        json["messages"],
        serde_json::json!([
            "Prompt must not be empty.",
            "Grid Size must be between 1 and 10."
        ])
    );
}

#[tokio::test]
async fn unknown_proof_returns_404() {
    let err = AppError::Core(CoreError::NotFound {
        entity: "Proof",
        id: "abc".to_string(),
    });

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");
    assert_eq!(json["error"], "Proof abc not found");
    assert!(json.get("messages").is_none());
}

#[tokio::test]
async fn core_validation_returns_400() {
    let err = AppError::Core(CoreError::Validation("Invalid image id '9_9'".into()));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(json["error"], "Invalid image id '9_9'");
}

#[tokio::test]
async fn storage_failure_hides_the_path() {
    let err = AppError::Storage(std::io::Error::new(
        std::io::ErrorKind::PermissionDenied,
        "/var/lib/proofsheet/proofs: permission denied",
    ));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["code"], "INTERNAL_ERROR");
    assert_eq!(json["error"], "An internal error occurred");
}

#[tokio::test]
async fn row_not_found_returns_404() {
    let (status, json) = error_to_response(AppError::Database(sqlx::Error::RowNotFound)).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");
}
