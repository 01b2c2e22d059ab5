//! HTTP handlers. Each one unpacks the request, calls into [`crate::operations`], and turns
//! the outcome into a JSON response. Errors render through [`ApiError`]'s `IntoResponse`.

use axum::{
    Json,
    extract::{FromRequest, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::{
    AppState,
    error::ApiError,
    model::{
        login_object::{LoginObject, LoginResponse},
        summary::Summary,
    },
    operations::portal,
};

pub mod classes;
pub mod parents;
pub mod staff;
pub mod students;

/// JSON request body. A body that fails to parse is reported as an [`ApiError`] like any other
/// validation failure.
#[derive(FromRequest)]
#[from_request(via(Json), rejection(ApiError))]
pub struct Payload<T>(pub T);

/// 201 with the created record as the body.
fn created<T: Serialize>(body: T) -> Response {
    (StatusCode::CREATED, Json(body)).into_response()
}

/// Counts for the dashboard cards.
pub async fn summary(State(state): State<AppState>) -> Result<Json<Summary>, ApiError> {
    Ok(Json(portal::summary(state.store.as_ref()).await?))
}

/// Checks a student or parent portal login.
pub async fn login(
    State(state): State<AppState>,
    Payload(login_req): Payload<LoginObject>,
) -> Result<Json<LoginResponse>, ApiError> {
    Ok(Json(portal::login(state.store.as_ref(), login_req).await?))
}


#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::Request;
    use axum::http::header::CONTENT_TYPE;
    use axum::response::IntoResponse;
    use serde_json::json;

    use crate::model::order_item::OrderRequest;

    use super::test_support::{body_json, state};
    use super::*;

    #[tokio::test]
    async fn bad_login_is_401_with_a_message() {
        let state = state();
        let response = login(
            State(state),
            Payload(LoginObject {
                email: Some("1st@school.edu".into()),
                password: Some("std1123".into()),
            }),
        )
        .await
        .into_response();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            body_json(response).await,
            json!({ "message": "Invalid email or password.", "status": "unauthorized", "retryable": false })
        );
    }

    #[tokio::test]
    async fn malformed_body_is_a_json_validation_error() {
        let request = Request::builder()
            .method("PATCH")
            .uri("/api/classes")
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"items":[{"id":"abc","order":1}]}"#))
            .unwrap();

        let Err(rejection) = Payload::<OrderRequest>::from_request(request, &()).await else {
            panic!("body should not parse");
        };
        let response = rejection.into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["status"], "validation");
        assert_eq!(body["retryable"], false);
        assert!(body["message"].as_str().unwrap().contains("items"));
    }

    #[tokio::test]
    async fn missing_content_type_is_a_json_validation_error() {
        let request = Request::builder()
            .method("POST")
            .uri("/api/login")
            .body(Body::from(r#"{"email":"1st@school.edu"}"#))
            .unwrap();

        let Err(rejection) = Payload::<LoginObject>::from_request(request, &()).await else {
            panic!("body without a content type should be refused");
        };
        let response = rejection.into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["status"], "validation");
    }

    #[tokio::test]
    async fn empty_summary_is_all_zero() {
        let response = summary(State(state())).await.into_response();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await,
            json!({ "students": 0, "classes": 0, "teachers": 0, "parents": 0, "employees": 0 })
        );
    }
}
