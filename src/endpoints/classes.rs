use std::sync::Arc;

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{
    AppState,
    endpoints::{Payload, created},
    error::ApiError,
    model::{
        class_item::{Class, ClassUpdate, NewClass},
        id_request::{IdRequest, UpdateRequest},
        order_item::OrderRequest,
        simple_response::SuccessResponse,
    },
    operations::classes,
};

/// Lists classes by display order, newest first within the same rank.
pub async fn list_classes(State(state): State<AppState>) -> Result<Json<Vec<Class>>, ApiError> {
    Ok(Json(classes::list(state.store.as_ref()).await?))
}

pub async fn create_class(
    State(state): State<AppState>,
    Payload(client_req): Payload<NewClass>,
) -> Result<Response, ApiError> {
    let class = classes::create(state.store.as_ref(), client_req).await?;
    Ok(created(class))
}

/// Renames a class or replaces its sections. The display order is left alone.
pub async fn update_class(
    State(state): State<AppState>,
    Payload(client_req): Payload<UpdateRequest<ClassUpdate>>,
) -> Result<Json<Class>, ApiError> {
    let class = classes::update(state.store.as_ref(), client_req.id, client_req.changes).await?;
    Ok(Json(class))
}

/// Bulk order update. 200 when every item was applied, 207 when some were not.
pub async fn reorder_classes(
    State(state): State<AppState>,
    Payload(client_req): Payload<OrderRequest>,
) -> Response {
    let report = classes::reorder(Arc::clone(&state.store), client_req.items).await;
    let status = if report.is_complete() {
        StatusCode::OK
    } else {
        StatusCode::MULTI_STATUS
    };

    (status, Json(report)).into_response()
}

pub async fn delete_class(
    State(state): State<AppState>,
    Payload(client_req): Payload<IdRequest>,
) -> Result<Json<SuccessResponse>, ApiError> {
    classes::delete(state.store.as_ref(), client_req.id).await?;
    Ok(Json(SuccessResponse::ok()))
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use super::*;
    use crate::endpoints::test_support::{body_json, state};

    async fn make(state: &AppState, name: &str) -> i64 {
        let response = create_class(
            State(state.clone()),
            Payload(NewClass {
                name: Some(name.into()),
                sections: None,
            }),
        )
        .await
        .into_response();
        assert_eq!(response.status(), StatusCode::CREATED);
        body_json(response).await["id"].as_i64().unwrap()
    }

    #[tokio::test]
    async fn new_class_starts_at_order_zero() {
        let state = state();
        let response = create_class(
            State(state),
            Payload(NewClass {
                name: Some("Nursery".into()),
                sections: Some(vec!["Red".into()]),
            }),
        )
        .await
        .into_response();

        let body = body_json(response).await;
        assert_eq!(body["order"], 0);
        assert_eq!(body["sections"], json!(["Red"]));
    }

    #[tokio::test]
    async fn missing_name_is_400() {
        let response = create_class(State(state()), Payload(NewClass::default()))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["message"], "Class name is required");
    }

    #[tokio::test]
    async fn reorder_then_list() {
        let state = state();
        let a = make(&state, "A").await;
        let b = make(&state, "B").await;
        let c = make(&state, "C").await;

        let request: OrderRequest = serde_json::from_value(json!({
            "items": [{ "id": a, "order": 2 }, { "id": b, "order": 1 }, { "id": c, "order": 3 }]
        }))
        .unwrap();
        let response = reorder_classes(State(state.clone()), Payload(request)).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["message"], "Order updated successfully");

        let listed = list_classes(State(state)).await.into_response();
        let names = body_json(listed)
            .await
            .as_array()
            .unwrap()
            .iter()
            .map(|c| c["name"].clone())
            .collect::<Vec<Value>>();
        assert_eq!(names, vec![json!("B"), json!("A"), json!("C")]);
    }

    #[tokio::test]
    async fn partial_reorder_is_207_and_names_each_item() {
        let state = state();
        let a = make(&state, "A").await;

        let request: OrderRequest = serde_json::from_value(json!({
            "items": [{ "id": a, "order": 1 }, { "id": 77, "order": 2 }]
        }))
        .unwrap();
        let response = reorder_classes(State(state), Payload(request)).await;

        assert_eq!(response.status(), StatusCode::MULTI_STATUS);
        let body = body_json(response).await;
        assert_eq!(body["updated"], json!([a]));
        assert_eq!(body["failed"], json!([{ "id": 77, "message": "Class not found" }]));
    }

    #[tokio::test]
    async fn update_and_delete_unknown_class_are_404() {
        let state = state();
        let request: UpdateRequest<ClassUpdate> =
            serde_json::from_value(json!({ "id": 5, "name": "Grade 9" })).unwrap();
        let response = update_class(State(state.clone()), Payload(request))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = delete_class(State(state), Payload(IdRequest { id: Some(5) }))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await["status"], "not_found");
    }
}
