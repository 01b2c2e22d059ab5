use axum::{
    Json,
    extract::{Query, State},
    response::Response,
};
use serde::Deserialize;

use crate::{
    AppState,
    endpoints::{Payload, created},
    error::ApiError,
    model::{
        id_request::{IdRequest, UpdateRequest},
        simple_response::SuccessResponse,
        student::{NewStudent, Student, StudentUpdate},
    },
    operations::students,
};

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StudentFilter {
    pub parent_id: Option<i32>,
}

/// Lists students, newest first. `?parentId=` narrows the list to one parent's children.
pub async fn list_students(
    State(state): State<AppState>,
    Query(filter): Query<StudentFilter>,
) -> Result<Json<Vec<Student>>, ApiError> {
    Ok(Json(students::list(state.store.as_ref(), filter.parent_id).await?))
}

/// Enrolls a student. The response carries the generated `password` once; it is not stored.
pub async fn create_student(
    State(state): State<AppState>,
    Payload(client_req): Payload<NewStudent>,
) -> Result<Response, ApiError> {
    let issued = students::create(state.store.as_ref(), &state.email_domain, client_req).await?;
    Ok(created(issued))
}

pub async fn update_student(
    State(state): State<AppState>,
    Payload(client_req): Payload<UpdateRequest<StudentUpdate>>,
) -> Result<Json<Student>, ApiError> {
    let student = students::update(state.store.as_ref(), client_req.id, client_req.changes).await?;
    Ok(Json(student))
}

pub async fn delete_student(
    State(state): State<AppState>,
    Payload(client_req): Payload<IdRequest>,
) -> Result<Json<SuccessResponse>, ApiError> {
    students::delete(state.store.as_ref(), client_req.id).await?;
    Ok(Json(SuccessResponse::ok()))
}

#[cfg(test)]
mod tests {
    use axum::{http::StatusCode, response::IntoResponse};
    use serde_json::json;

    use super::*;
    use crate::endpoints::test_support::{body_json, state};
    use crate::operations::test_support::seed_class;

    #[tokio::test]
    async fn create_returns_identity_and_one_time_password() {
        let state = state();
        let class = seed_class(state.store.as_ref(), "Grade 6").await;

        let request: NewStudent = serde_json::from_value(json!({
            "firstName": "Ali",
            "lastName": "Raza",
            "classId": class.id,
            "dateOfBirth": "2013-04-09"
        }))
        .unwrap();
        let response = create_student(State(state.clone()), Payload(request))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::CREATED);
        let body = body_json(response).await;
        assert_eq!(body["grNumber"], 1);
        assert_eq!(body["email"], "1st@school.edu");
        assert_eq!(body["password"], "std1123");
        assert_eq!(body["status"], "active");
        assert!(body.get("passwordHash").is_none());

        let listed = list_students(State(state), Query(StudentFilter::default()))
            .await
            .into_response();
        let listed = body_json(listed).await;
        assert!(listed[0].get("password").is_none());
    }

    #[tokio::test]
    async fn missing_names_are_400() {
        let state = state();
        let request: NewStudent = serde_json::from_value(json!({ "firstName": "Ali" })).unwrap();
        let response = create_student(State(state), Payload(request))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await,
            json!({ "message": "Required fields are missing", "status": "validation", "retryable": false })
        );
    }

    #[tokio::test]
    async fn update_without_id_is_400_and_unknown_id_is_404() {
        let state = state();
        let request: UpdateRequest<StudentUpdate> =
            serde_json::from_value(json!({ "address": "Gulberg" })).unwrap();
        let response = update_student(State(state.clone()), Payload(request))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["message"], "Student ID is required");

        let response = delete_student(State(state), Payload(IdRequest { id: Some(12) }))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
