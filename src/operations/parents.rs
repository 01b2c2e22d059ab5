use tracing::info;

use crate::database::Store;
use crate::error::ApiError;
use crate::identity::{Credentials, Enrollment, Issued, Role};
use crate::model::parent::{NewParent, Parent, ParentUpdate};

pub async fn list(store: &dyn Store) -> Result<Vec<Parent>, ApiError> {
    store.list_parents().await
}

/// Registers a parent. Same sequence as students: validate, take the next `p_id`, derive, insert.
pub async fn create(
    store: &dyn Store,
    email_domain: &str,
    request: NewParent,
) -> Result<Issued<Parent>, ApiError> {
    let (profile, supplied_password) = request.validate()?;

    let p_id = store.next_identifier(Role::Parent).await?;
    let credentials = Credentials::derive(Role::Parent, p_id, email_domain, supplied_password);
    let parent = store
        .insert_parent(Enrollment::new(&credentials, profile))
        .await?;

    info!(p_id, "Parent created: {}", parent.email);
    Ok(Issued {
        record: parent,
        password: credentials.password,
    })
}

pub async fn update(store: &dyn Store, id: Option<i32>, changes: ParentUpdate) -> Result<Parent, ApiError> {
    let Some(id) = id else {
        return Err(ApiError::Validation("Parent ID is required".into()));
    };
    let changes = changes.normalize()?;

    match store.update_parent(id, &changes).await? {
        Some(parent) => {
            info!(p_id = parent.p_id, "Parent updated");
            Ok(parent)
        }
        None => Err(ApiError::NotFound("Parent not found".into())),
    }
}

/// Children of a deleted parent stay enrolled and simply lose the link.
pub async fn delete(store: &dyn Store, id: Option<i32>) -> Result<(), ApiError> {
    let Some(id) = id else {
        return Err(ApiError::Validation("Parent ID is required".into()));
    };

    if !store.delete_parent(id).await? {
        return Err(ApiError::NotFound("Parent not found".into()));
    }
    info!(parent_id = id, "Parent deleted");
    Ok(())
}
