//! Persistence contract for the dashboard and its two backends.
//!
//! [`postgres::PgStore`] is the production store. [`memory::MemoryStore`] keeps everything in
//! process and honours the same uniqueness rules, it backs the tests and `storage = "memory"`.

use async_trait::async_trait;

use crate::error::ApiError;
use crate::identity::{Enrollment, Role};
use crate::model::class_item::{Class, ClassDraft, ClassUpdate};
use crate::model::parent::{Parent, ParentProfile, ParentUpdate};
use crate::model::staff::{StaffKind, StaffMember, StaffProfile, StaffUpdate};
use crate::model::student::{Student, StudentProfile, StudentUpdate};
use crate::model::summary::Summary;

pub mod memory;
pub mod postgres;

/// `update_*` return `Ok(None)` and `delete_*` return `Ok(false)` when the id does not exist.
#[async_trait]
pub trait Store: Send + Sync {
    /// Atomically advances the role's counter and returns the new value. The first value is 1.
    async fn next_identifier(&self, role: Role) -> Result<i32, ApiError>;

    async fn list_classes(&self) -> Result<Vec<Class>, ApiError>;
    async fn get_class(&self, id: i32) -> Result<Option<Class>, ApiError>;
    async fn insert_class(&self, draft: ClassDraft) -> Result<Class, ApiError>;
    async fn update_class(&self, id: i32, changes: &ClassUpdate) -> Result<Option<Class>, ApiError>;
    async fn set_class_order(&self, id: i32, order: i32) -> Result<bool, ApiError>;
    async fn delete_class(&self, id: i32) -> Result<bool, ApiError>;

    async fn list_students(&self, parent_id: Option<i32>) -> Result<Vec<Student>, ApiError>;
    async fn insert_student(&self, enrollment: Enrollment<StudentProfile>) -> Result<Student, ApiError>;
    async fn update_student(&self, id: i32, changes: &StudentUpdate) -> Result<Option<Student>, ApiError>;
    async fn delete_student(&self, id: i32) -> Result<bool, ApiError>;
    async fn find_student_by_email(&self, email: &str) -> Result<Option<Student>, ApiError>;

    async fn list_parents(&self) -> Result<Vec<Parent>, ApiError>;
    async fn get_parent(&self, id: i32) -> Result<Option<Parent>, ApiError>;
    async fn insert_parent(&self, enrollment: Enrollment<ParentProfile>) -> Result<Parent, ApiError>;
    async fn update_parent(&self, id: i32, changes: &ParentUpdate) -> Result<Option<Parent>, ApiError>;
    async fn delete_parent(&self, id: i32) -> Result<bool, ApiError>;
    async fn find_parent_by_email(&self, email: &str) -> Result<Option<Parent>, ApiError>;

    async fn list_staff(&self, kind: StaffKind) -> Result<Vec<StaffMember>, ApiError>;
    async fn insert_staff(&self, kind: StaffKind, profile: StaffProfile) -> Result<StaffMember, ApiError>;
    async fn update_staff(
        &self,
        kind: StaffKind,
        id: i32,
        changes: &StaffUpdate,
    ) -> Result<Option<StaffMember>, ApiError>;
    async fn delete_staff(&self, kind: StaffKind, id: i32) -> Result<bool, ApiError>;

    async fn summary(&self) -> Result<Summary, ApiError>;
}

/// Message for a uniqueness violation on a role's identifier column.
pub(crate) fn identifier_taken(role: Role, identifier: i32) -> ApiError {
    let field = match role {
        Role::Student => "grNumber",
        Role::Parent => "p_id",
    };
    ApiError::IdentifierCollision(format!("{field} {identifier} is already assigned, retry the request"))
}
