use axum::{Json, extract::State, response::Response};

use crate::{
    AppState,
    endpoints::{Payload, created},
    error::ApiError,
    model::{
        id_request::{IdRequest, UpdateRequest},
        parent::{NewParent, Parent, ParentUpdate},
        simple_response::SuccessResponse,
    },
    operations::parents,
};

pub async fn list_parents(State(state): State<AppState>) -> Result<Json<Vec<Parent>>, ApiError> {
    Ok(Json(parents::list(state.store.as_ref()).await?))
}

/// Registers a parent. The response carries the generated `password` once; it is not stored.
pub async fn create_parent(
    State(state): State<AppState>,
    Payload(client_req): Payload<NewParent>,
) -> Result<Response, ApiError> {
    let issued = parents::create(state.store.as_ref(), &state.email_domain, client_req).await?;
    Ok(created(issued))
}

pub async fn update_parent(
    State(state): State<AppState>,
    Payload(client_req): Payload<UpdateRequest<ParentUpdate>>,
) -> Result<Json<Parent>, ApiError> {
    let parent = parents::update(state.store.as_ref(), client_req.id, client_req.changes).await?;
    Ok(Json(parent))
}

pub async fn delete_parent(
    State(state): State<AppState>,
    Payload(client_req): Payload<IdRequest>,
) -> Result<Json<SuccessResponse>, ApiError> {
    parents::delete(state.store.as_ref(), client_req.id).await?;
    Ok(Json(SuccessResponse::ok()))
}

#[cfg(test)]
mod tests {
    use axum::{http::StatusCode, response::IntoResponse};
    use serde_json::json;

    use super::*;
    use crate::endpoints::test_support::{body_json, state};

    fn request(cnic: &str, password: Option<&str>) -> NewParent {
        serde_json::from_value(json!({
            "fullName": "Farah Naz",
            "cnic": cnic,
            "phone": "0345-0000001",
            "address": "Street 9, F-7",
            "gender": "Female",
            "password": password
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn create_assigns_p_id_and_credentials() {
        let state = state();
        let response = create_parent(State(state), Payload(request("61101-1", None)))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::CREATED);
        let body = body_json(response).await;
        assert_eq!(body["p_id"], 1);
        assert_eq!(body["email"], "1p@school.edu");
        assert_eq!(body["password"], "prnt1123");
        assert_eq!(body["gender"], "female");
    }

    #[tokio::test]
    async fn explicit_password_is_echoed_back() {
        let response = create_parent(State(state()), Payload(request("61101-1", Some("Margalla-55"))))
            .await
            .into_response();
        assert_eq!(body_json(response).await["password"], "Margalla-55");
    }

    #[tokio::test]
    async fn duplicate_cnic_is_409_not_retryable() {
        let state = state();
        create_parent(State(state.clone()), Payload(request("61101-1", None)))
            .await
            .unwrap();
        let response = create_parent(State(state), Payload(request("61101-1", None)))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::CONFLICT);
        let body = body_json(response).await;
        assert_eq!(body["status"], "duplicate");
        assert_eq!(body["retryable"], false);
    }
}
