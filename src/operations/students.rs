use tracing::info;

use crate::database::Store;
use crate::error::ApiError;
use crate::identity::{Credentials, Enrollment, Issued, Role};
use crate::model::student::{NewStudent, Student, StudentUpdate};

pub async fn list(store: &dyn Store, parent_id: Option<i32>) -> Result<Vec<Student>, ApiError> {
    let students = store.list_students(parent_id).await?;
    info!("Found students: {}", students.len());
    Ok(students)
}

/// Enrolls a student: validate, take the next `grNumber`, derive the portal login, then insert.
///
/// Validation runs first so a rejected request never consumes an identifier. A failed insert
/// does, which leaves a gap in the sequence but never a duplicate.
pub async fn create(
    store: &dyn Store,
    email_domain: &str,
    request: NewStudent,
) -> Result<Issued<Student>, ApiError> {
    let (profile, supplied_password) = request.validate()?;

    if store.get_class(profile.class_id).await?.is_none() {
        return Err(ApiError::Validation("Class does not exist".into()));
    }
    if let Some(parent_id) = profile.parent_id {
        if store.get_parent(parent_id).await?.is_none() {
            return Err(ApiError::Validation("Parent does not exist".into()));
        }
    }

    let gr_number = store.next_identifier(Role::Student).await?;
    let credentials = Credentials::derive(Role::Student, gr_number, email_domain, supplied_password);
    let student = store
        .insert_student(Enrollment::new(&credentials, profile))
        .await?;

    info!(gr_number, "Student created: {}", student.email);
    Ok(Issued {
        record: student,
        password: credentials.password,
    })
}

pub async fn update(
    store: &dyn Store,
    id: Option<i32>,
    changes: StudentUpdate,
) -> Result<Student, ApiError> {
    let Some(id) = id else {
        return Err(ApiError::Validation("Student ID is required".into()));
    };
    let changes = changes.normalize()?;

    match store.update_student(id, &changes).await? {
        Some(student) => {
            info!(gr_number = student.gr_number, "Student updated");
            Ok(student)
        }
        None => Err(ApiError::NotFound("Student not found".into())),
    }
}

pub async fn delete(store: &dyn Store, id: Option<i32>) -> Result<(), ApiError> {
    let Some(id) = id else {
        return Err(ApiError::Validation("Student ID is required".into()));
    };

    if !store.delete_student(id).await? {
        return Err(ApiError::NotFound("Student not found".into()));
    }
    info!(student_id = id, "Student deleted");
    Ok(())
}
