//! Dashboard summary and the portal credential check.

use tracing::info;

use crate::database::Store;
use crate::error::ApiError;
use crate::model::login_object::{LoginObject, LoginResponse};
use crate::model::summary::Summary;
use crate::security::verify_password;

pub async fn summary(store: &dyn Store) -> Result<Summary, ApiError> {
    store.summary().await
}

/// Checks a portal login against the stored hash. Students are looked up first, then parents.
pub async fn login(store: &dyn Store, request: LoginObject) -> Result<LoginResponse, ApiError> {
    let (Some(email), Some(password)) = (request.email, request.password) else {
        return Err(ApiError::Validation("Email and password are required".into()));
    };
    let email = email.trim().to_lowercase();

    if let Some(student) = store.find_student_by_email(&email).await? {
        if verify_password(&password, &student.password_hash) {
            info!(gr_number = student.gr_number, "Student signed in");
            return Ok(LoginResponse {
                role: "student".into(),
                id: student.id,
                identifier: student.gr_number,
            });
        }
        return Err(ApiError::Unauthorized);
    }

    if let Some(parent) = store.find_parent_by_email(&email).await? {
        if verify_password(&password, &parent.password_hash) {
            info!(p_id = parent.p_id, "Parent signed in");
            return Ok(LoginResponse {
                role: "parent".into(),
                id: parent.id,
                identifier: parent.p_id,
            });
        }
    }

    Err(ApiError::Unauthorized)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::staff::{NewStaff, StaffKind};
    use crate::operations::test_support::{DOMAIN, parent_request, seed_class, store, student_request};
    use crate::operations::{parents, staff, students};

    fn login_object(email: &str, password: &str) -> LoginObject {
        LoginObject {
            email: Some(email.into()),
            password: Some(password.into()),
        }
    }

    #[tokio::test]
    async fn issued_credentials_sign_in() {
        let store = store();
        let class = seed_class(store.as_ref(), "Grade 2").await;
        let student = students::create(store.as_ref(), DOMAIN, student_request(class.id))
            .await
            .unwrap();
        let parent = parents::create(store.as_ref(), DOMAIN, parent_request("1"))
            .await
            .unwrap();

        let as_student = login(store.as_ref(), login_object(" 1ST@School.edu ", &student.password))
            .await
            .unwrap();
        assert_eq!(as_student.role, "student");
        assert_eq!(as_student.identifier, 1);

        let as_parent = login(store.as_ref(), login_object("1p@school.edu", "prnt1123"))
            .await
            .unwrap();
        assert_eq!(as_parent.role, "parent");
        assert_eq!(as_parent.id, parent.record.id);
    }

    #[tokio::test]
    async fn password_with_surrounding_spaces_signs_in_as_given() {
        let store = store();
        let mut request = parent_request("1");
        request.password = Some(" pass word ".into());
        parents::create(store.as_ref(), DOMAIN, request).await.unwrap();

        let signed_in = login(store.as_ref(), login_object("1p@school.edu", " pass word "))
            .await
            .unwrap();
        assert_eq!(signed_in.role, "parent");
        assert!(matches!(
            login(store.as_ref(), login_object("1p@school.edu", "pass word")).await,
            Err(ApiError::Unauthorized)
        ));
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_email_are_unauthorized() {
        let store = store();
        parents::create(store.as_ref(), DOMAIN, parent_request("1")).await.unwrap();

        assert!(matches!(
            login(store.as_ref(), login_object("1p@school.edu", "prnt2123")).await,
            Err(ApiError::Unauthorized)
        ));
        assert!(matches!(
            login(store.as_ref(), login_object("8p@school.edu", "prnt8123")).await,
            Err(ApiError::Unauthorized)
        ));
        assert!(matches!(
            login(store.as_ref(), LoginObject::default()).await,
            Err(ApiError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn summary_counts_every_table() {
        let store = store();
        let class = seed_class(store.as_ref(), "Grade 2").await;
        students::create(store.as_ref(), DOMAIN, student_request(class.id))
            .await
            .unwrap();
        parents::create(store.as_ref(), DOMAIN, parent_request("1")).await.unwrap();
        staff::create(
            store.as_ref(),
            StaffKind::Employee,
            NewStaff {
                first_name: Some("Gul".into()),
                last_name: Some("Khan".into()),
                email: Some("gul@school.edu".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        let counts = summary(store.as_ref()).await.unwrap();
        assert_eq!(
            counts,
            Summary {
                students: 1,
                classes: 1,
                teachers: 0,
                parents: 1,
                employees: 1,
            }
        );
    }
}
