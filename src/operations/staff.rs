//! Teachers and employees. Plain records, no generated identity.

use tracing::info;

use crate::database::Store;
use crate::error::ApiError;
use crate::model::staff::{NewStaff, StaffKind, StaffMember, StaffUpdate};

pub async fn list(store: &dyn Store, kind: StaffKind) -> Result<Vec<StaffMember>, ApiError> {
    let members = store.list_staff(kind).await?;
    info!("Found {}s: {}", kind.as_str(), members.len());
    Ok(members)
}

pub async fn create(store: &dyn Store, kind: StaffKind, request: NewStaff) -> Result<StaffMember, ApiError> {
    let profile = request.validate(kind)?;
    let member = store.insert_staff(kind, profile).await?;
    info!(id = member.id, "{} created: {}", kind.label(), member.profile.email);
    Ok(member)
}

pub async fn update(
    store: &dyn Store,
    kind: StaffKind,
    id: Option<i32>,
    changes: StaffUpdate,
) -> Result<StaffMember, ApiError> {
    let Some(id) = id else {
        return Err(ApiError::Validation(format!("{} ID is required", kind.label())));
    };
    let changes = changes.normalize(kind)?;

    match store.update_staff(kind, id, &changes).await? {
        Some(member) => {
            info!(id, "{} updated", kind.label());
            Ok(member)
        }
        None => Err(ApiError::NotFound(format!("{} not found", kind.label()))),
    }
}

pub async fn delete(store: &dyn Store, kind: StaffKind, id: Option<i32>) -> Result<(), ApiError> {
    let Some(id) = id else {
        return Err(ApiError::Validation(format!("{} ID is required", kind.label())));
    };

    if !store.delete_staff(kind, id).await? {
        return Err(ApiError::NotFound(format!("{} not found", kind.label())));
    }
    info!(id, "{} deleted", kind.label());
    Ok(())
}
