//! `/api/teachers` and `/api/employees`. Both route into the same staff operations.

use axum::{Json, extract::State, response::Response};

use crate::{
    AppState,
    endpoints::{Payload, created},
    error::ApiError,
    model::{
        id_request::{IdRequest, UpdateRequest},
        simple_response::SuccessResponse,
        staff::{NewStaff, StaffKind, StaffMember, StaffUpdate},
    },
    operations::staff,
};

async fn list(state: AppState, kind: StaffKind) -> Result<Json<Vec<StaffMember>>, ApiError> {
    Ok(Json(staff::list(state.store.as_ref(), kind).await?))
}

async fn create(state: AppState, kind: StaffKind, client_req: NewStaff) -> Result<Response, ApiError> {
    let member = staff::create(state.store.as_ref(), kind, client_req).await?;
    Ok(created(member))
}

async fn update(
    state: AppState,
    kind: StaffKind,
    client_req: UpdateRequest<StaffUpdate>,
) -> Result<Json<StaffMember>, ApiError> {
    let member = staff::update(state.store.as_ref(), kind, client_req.id, client_req.changes).await?;
    Ok(Json(member))
}

async fn delete(state: AppState, kind: StaffKind, client_req: IdRequest) -> Result<Json<SuccessResponse>, ApiError> {
    staff::delete(state.store.as_ref(), kind, client_req.id).await?;
    Ok(Json(SuccessResponse::ok()))
}

pub async fn list_teachers(State(state): State<AppState>) -> Result<Json<Vec<StaffMember>>, ApiError> {
    list(state, StaffKind::Teacher).await
}

pub async fn create_teacher(
    State(state): State<AppState>,
    Payload(client_req): Payload<NewStaff>,
) -> Result<Response, ApiError> {
    create(state, StaffKind::Teacher, client_req).await
}

pub async fn update_teacher(
    State(state): State<AppState>,
    Payload(client_req): Payload<UpdateRequest<StaffUpdate>>,
) -> Result<Json<StaffMember>, ApiError> {
    update(state, StaffKind::Teacher, client_req).await
}

pub async fn delete_teacher(
    State(state): State<AppState>,
    Payload(client_req): Payload<IdRequest>,
) -> Result<Json<SuccessResponse>, ApiError> {
    delete(state, StaffKind::Teacher, client_req).await
}

pub async fn list_employees(State(state): State<AppState>) -> Result<Json<Vec<StaffMember>>, ApiError> {
    list(state, StaffKind::Employee).await
}

pub async fn create_employee(
    State(state): State<AppState>,
    Payload(client_req): Payload<NewStaff>,
) -> Result<Response, ApiError> {
    create(state, StaffKind::Employee, client_req).await
}

pub async fn update_employee(
    State(state): State<AppState>,
    Payload(client_req): Payload<UpdateRequest<StaffUpdate>>,
) -> Result<Json<StaffMember>, ApiError> {
    update(state, StaffKind::Employee, client_req).await
}

pub async fn delete_employee(
    State(state): State<AppState>,
    Payload(client_req): Payload<IdRequest>,
) -> Result<Json<SuccessResponse>, ApiError> {
    delete(state, StaffKind::Employee, client_req).await
}

#[cfg(test)]
mod tests {
    use axum::{http::StatusCode, response::IntoResponse};
    use serde_json::json;

    use super::*;
    use crate::endpoints::test_support::{body_json, state};

    #[tokio::test]
    async fn employee_round_trip_through_handlers() {
        let state = state();
        let request: NewStaff = serde_json::from_value(json!({
            "firstName": "Naveed",
            "lastName": "Akhtar",
            "email": "Naveed@School.edu",
            "nicNumber": "37405-1111111-3",
            "gender": "male",
            "staffCategory": "other",
            "salary": 42000,
            "emergencyContact": { "name": "Rubina", "phone": "0300-0000000", "relation": "Wife" }
        }))
        .unwrap();

        let response = create_employee(State(state.clone()), Payload(request))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::CREATED);
        let body = body_json(response).await;
        assert_eq!(body["email"], "naveed@school.edu");
        assert_eq!(body["emergencyContact"]["relation"], "Wife");

        let listed = list_employees(State(state.clone())).await.into_response();
        assert_eq!(body_json(listed).await.as_array().unwrap().len(), 1);
        let teachers = list_teachers(State(state)).await.into_response();
        assert_eq!(body_json(teachers).await, json!([]));
    }

    #[tokio::test]
    async fn teacher_without_email_is_400() {
        let request: NewStaff =
            serde_json::from_value(json!({ "firstName": "Huma", "lastName": "Jaffar" })).unwrap();
        let response = create_teacher(State(state()), Payload(request))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["message"], "Required fields are missing");
    }

    #[tokio::test]
    async fn deleting_a_missing_teacher_is_404() {
        let response = delete_teacher(State(state()), Payload(IdRequest { id: Some(1) }))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await["message"], "Teacher not found");
    }
}
