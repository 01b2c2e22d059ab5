use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;

use crate::database::{Store, identifier_taken};
use crate::error::ApiError;
use crate::identity::{Enrollment, Role};
use crate::model::class_item::{Class, ClassDraft, ClassUpdate};
use crate::model::parent::{Parent, ParentProfile, ParentUpdate};
use crate::model::staff::{StaffKind, StaffMember, StaffProfile, StaffUpdate};
use crate::model::student::{Student, StudentProfile, StudentUpdate};
use crate::model::summary::Summary;

#[derive(Debug, Default)]
struct Tables {
    sequences: HashMap<Role, i32>,
    last_row_id: i32,
    classes: Vec<Class>,
    students: Vec<Student>,
    parents: Vec<Parent>,
    staff: Vec<(StaffKind, StaffMember)>,
}

impl Tables {
    fn row_id(&mut self) -> i32 {
        self.last_row_id += 1;
        self.last_row_id
    }

    fn check_student_refs(&self, class_id: Option<i32>, parent_id: Option<i32>) -> Result<(), ApiError> {
        if let Some(class_id) = class_id {
            if !self.classes.iter().any(|c| c.id == class_id) {
                return Err(ApiError::Validation("Class does not exist".into()));
            }
        }
        if let Some(parent_id) = parent_id {
            if !self.parents.iter().any(|p| p.id == parent_id) {
                return Err(ApiError::Validation("Parent does not exist".into()));
            }
        }
        Ok(())
    }

    fn staff_email_taken(&self, kind: StaffKind, email: &str, except: Option<i32>) -> bool {
        self.staff
            .iter()
            .any(|(k, m)| *k == kind && m.profile.email == email && Some(m.id) != except)
    }
}

/// Store kept entirely in process memory. A single lock serializes every operation.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn next_identifier(&self, role: Role) -> Result<i32, ApiError> {
        let mut tables = self.tables.lock().await;
        let counter = tables.sequences.entry(role).or_insert(0);
        *counter += 1;
        Ok(*counter)
    }

    async fn list_classes(&self) -> Result<Vec<Class>, ApiError> {
        let tables = self.tables.lock().await;
        let mut classes = tables.classes.clone();
        classes.sort_by(|a, b| {
            a.order
                .cmp(&b.order)
                .then(b.created_at.cmp(&a.created_at))
                .then(b.id.cmp(&a.id))
        });
        Ok(classes)
    }

    async fn get_class(&self, id: i32) -> Result<Option<Class>, ApiError> {
        let tables = self.tables.lock().await;
        Ok(tables.classes.iter().find(|c| c.id == id).cloned())
    }

    async fn insert_class(&self, draft: ClassDraft) -> Result<Class, ApiError> {
        let mut tables = self.tables.lock().await;
        let now = Utc::now();
        let class = Class {
            id: tables.row_id(),
            name: draft.name,
            sections: draft.sections,
            order: 0,
            created_at: now,
            updated_at: now,
        };
        tables.classes.push(class.clone());
        Ok(class)
    }

    async fn update_class(&self, id: i32, changes: &ClassUpdate) -> Result<Option<Class>, ApiError> {
        let mut tables = self.tables.lock().await;
        let Some(class) = tables.classes.iter_mut().find(|c| c.id == id) else {
            return Ok(None);
        };
        changes.apply(class);
        class.updated_at = Utc::now();
        Ok(Some(class.clone()))
    }

    async fn set_class_order(&self, id: i32, order: i32) -> Result<bool, ApiError> {
        let mut tables = self.tables.lock().await;
        let Some(class) = tables.classes.iter_mut().find(|c| c.id == id) else {
            return Ok(false);
        };
        class.order = order;
        class.updated_at = Utc::now();
        Ok(true)
    }

    async fn delete_class(&self, id: i32) -> Result<bool, ApiError> {
        let mut tables = self.tables.lock().await;
        if tables.students.iter().any(|s| s.profile.class_id == id) {
            return Err(ApiError::Validation("Class still has students assigned".into()));
        }
        let before = tables.classes.len();
        tables.classes.retain(|c| c.id != id);
        Ok(tables.classes.len() != before)
    }

    async fn list_students(&self, parent_id: Option<i32>) -> Result<Vec<Student>, ApiError> {
        let tables = self.tables.lock().await;
        let mut students = tables
            .students
            .iter()
            .filter(|s| parent_id.is_none() || s.profile.parent_id == parent_id)
            .cloned()
            .collect::<Vec<Student>>();
        students.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(students)
    }

    async fn insert_student(&self, enrollment: Enrollment<StudentProfile>) -> Result<Student, ApiError> {
        let mut tables = self.tables.lock().await;
        if tables.students.iter().any(|s| s.gr_number == enrollment.identifier) {
            return Err(identifier_taken(Role::Student, enrollment.identifier));
        }
        if tables.students.iter().any(|s| s.email == enrollment.email) {
            return Err(ApiError::Duplicate(format!("Email {} is already in use", enrollment.email)));
        }
        tables.check_student_refs(Some(enrollment.profile.class_id), enrollment.profile.parent_id)?;

        let now = Utc::now();
        let student = Student {
            id: tables.row_id(),
            gr_number: enrollment.identifier,
            email: enrollment.email,
            password_hash: enrollment.password_hash,
            profile: enrollment.profile,
            created_at: now,
            updated_at: now,
        };
        tables.students.push(student.clone());
        Ok(student)
    }

    async fn update_student(&self, id: i32, changes: &StudentUpdate) -> Result<Option<Student>, ApiError> {
        let mut tables = self.tables.lock().await;
        tables.check_student_refs(changes.class_id, changes.parent_id.flatten())?;
        let Some(student) = tables.students.iter_mut().find(|s| s.id == id) else {
            return Ok(None);
        };
        changes.apply(&mut student.profile);
        student.updated_at = Utc::now();
        Ok(Some(student.clone()))
    }

    async fn delete_student(&self, id: i32) -> Result<bool, ApiError> {
        let mut tables = self.tables.lock().await;
        let before = tables.students.len();
        tables.students.retain(|s| s.id != id);
        Ok(tables.students.len() != before)
    }

    async fn find_student_by_email(&self, email: &str) -> Result<Option<Student>, ApiError> {
        let tables = self.tables.lock().await;
        Ok(tables.students.iter().find(|s| s.email == email).cloned())
    }

    async fn list_parents(&self) -> Result<Vec<Parent>, ApiError> {
        let tables = self.tables.lock().await;
        let mut parents = tables.parents.clone();
        parents.sort_by(|a, b| a.profile.full_name.cmp(&b.profile.full_name).then(a.id.cmp(&b.id)));
        Ok(parents)
    }

    async fn get_parent(&self, id: i32) -> Result<Option<Parent>, ApiError> {
        let tables = self.tables.lock().await;
        Ok(tables.parents.iter().find(|p| p.id == id).cloned())
    }

    async fn insert_parent(&self, enrollment: Enrollment<ParentProfile>) -> Result<Parent, ApiError> {
        let mut tables = self.tables.lock().await;
        if tables.parents.iter().any(|p| p.p_id == enrollment.identifier) {
            return Err(identifier_taken(Role::Parent, enrollment.identifier));
        }
        if tables.parents.iter().any(|p| p.email == enrollment.email) {
            return Err(ApiError::Duplicate(format!("Email {} is already in use", enrollment.email)));
        }
        if tables.parents.iter().any(|p| p.profile.cnic == enrollment.profile.cnic) {
            return Err(ApiError::Duplicate("A parent with this CNIC already exists".into()));
        }

        let now = Utc::now();
        let parent = Parent {
            id: tables.row_id(),
            p_id: enrollment.identifier,
            email: enrollment.email,
            password_hash: enrollment.password_hash,
            profile: enrollment.profile,
            created_at: now,
            updated_at: now,
        };
        tables.parents.push(parent.clone());
        Ok(parent)
    }

    async fn update_parent(&self, id: i32, changes: &ParentUpdate) -> Result<Option<Parent>, ApiError> {
        let mut tables = self.tables.lock().await;
        if let Some(cnic) = &changes.cnic {
            if tables.parents.iter().any(|p| &p.profile.cnic == cnic && p.id != id) {
                return Err(ApiError::Duplicate("A parent with this CNIC already exists".into()));
            }
        }
        let Some(parent) = tables.parents.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };
        changes.apply(&mut parent.profile);
        parent.updated_at = Utc::now();
        Ok(Some(parent.clone()))
    }

    async fn delete_parent(&self, id: i32) -> Result<bool, ApiError> {
        let mut tables = self.tables.lock().await;
        let before = tables.parents.len();
        tables.parents.retain(|p| p.id != id);
        if tables.parents.len() == before {
            return Ok(false);
        }
        for student in tables.students.iter_mut() {
            if student.profile.parent_id == Some(id) {
                student.profile.parent_id = None;
            }
        }
        Ok(true)
    }

    async fn find_parent_by_email(&self, email: &str) -> Result<Option<Parent>, ApiError> {
        let tables = self.tables.lock().await;
        Ok(tables.parents.iter().find(|p| p.email == email).cloned())
    }

    async fn list_staff(&self, kind: StaffKind) -> Result<Vec<StaffMember>, ApiError> {
        let tables = self.tables.lock().await;
        let mut members = tables
            .staff
            .iter()
            .filter(|(k, _)| *k == kind)
            .map(|(_, m)| m.clone())
            .collect::<Vec<StaffMember>>();
        members.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(members)
    }

    async fn insert_staff(&self, kind: StaffKind, profile: StaffProfile) -> Result<StaffMember, ApiError> {
        let mut tables = self.tables.lock().await;
        if tables.staff_email_taken(kind, &profile.email, None) {
            return Err(ApiError::Duplicate(format!(
                "Another {} already uses this email",
                kind.as_str()
            )));
        }

        let now = Utc::now();
        let member = StaffMember {
            id: tables.row_id(),
            profile,
            created_at: now,
            updated_at: now,
        };
        tables.staff.push((kind, member.clone()));
        Ok(member)
    }

    async fn update_staff(
        &self,
        kind: StaffKind,
        id: i32,
        changes: &StaffUpdate,
    ) -> Result<Option<StaffMember>, ApiError> {
        let mut tables = self.tables.lock().await;
        if let Some(email) = &changes.email {
            if tables.staff_email_taken(kind, email, Some(id)) {
                return Err(ApiError::Duplicate(format!(
                    "Another {} already uses this email",
                    kind.as_str()
                )));
            }
        }
        let Some((_, member)) = tables
            .staff
            .iter_mut()
            .find(|(k, m)| *k == kind && m.id == id)
        else {
            return Ok(None);
        };
        changes.apply(&mut member.profile);
        member.updated_at = Utc::now();
        Ok(Some(member.clone()))
    }

    async fn delete_staff(&self, kind: StaffKind, id: i32) -> Result<bool, ApiError> {
        let mut tables = self.tables.lock().await;
        let before = tables.staff.len();
        tables.staff.retain(|(k, m)| !(*k == kind && m.id == id));
        Ok(tables.staff.len() != before)
    }

    async fn summary(&self) -> Result<Summary, ApiError> {
        let tables = self.tables.lock().await;
        let count_staff = |kind: StaffKind| tables.staff.iter().filter(|(k, _)| *k == kind).count() as i64;
        Ok(Summary {
            students: tables.students.len() as i64,
            classes: tables.classes.len() as i64,
            teachers: count_staff(StaffKind::Teacher),
            parents: tables.parents.len() as i64,
            employees: count_staff(StaffKind::Employee),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::Credentials;
    use crate::model::person::Status;

    fn profile(class_id: i32) -> StudentProfile {
        StudentProfile {
            first_name: "Hina".into(),
            last_name: "Baig".into(),
            phone: None,
            date_of_birth: None,
            class_id,
            section: Some("A".into()),
            roll_number: None,
            address: None,
            guardian_name: None,
            guardian_phone: None,
            guardian_relation: None,
            enrollment_date: None,
            status: Status::Active,
            blood_group: None,
            previous_school: None,
            parent_id: None,
        }
    }

    async fn class(store: &MemoryStore) -> i32 {
        store
            .insert_class(ClassDraft {
                name: "Grade 1".into(),
                sections: vec![],
            })
            .await
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn counters_are_independent_per_role() {
        let store = MemoryStore::new();
        assert_eq!(store.next_identifier(Role::Student).await.unwrap(), 1);
        assert_eq!(store.next_identifier(Role::Student).await.unwrap(), 2);
        assert_eq!(store.next_identifier(Role::Parent).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn duplicate_gr_number_is_a_retryable_collision() {
        let store = MemoryStore::new();
        let class_id = class(&store).await;

        let first = Credentials::derive(Role::Student, 5, "school.edu", None);
        store
            .insert_student(Enrollment::new(&first, profile(class_id)))
            .await
            .unwrap();

        let err = store
            .insert_student(Enrollment::new(&first, profile(class_id)))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::IdentifierCollision(_)));
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn unknown_class_reference_is_rejected() {
        let store = MemoryStore::new();
        let creds = Credentials::derive(Role::Student, 1, "school.edu", None);
        let err = store
            .insert_student(Enrollment::new(&creds, profile(404)))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Class does not exist");
    }

    #[tokio::test]
    async fn class_with_students_cannot_be_deleted() {
        let store = MemoryStore::new();
        let class_id = class(&store).await;
        let creds = Credentials::derive(Role::Student, 1, "school.edu", None);
        store
            .insert_student(Enrollment::new(&creds, profile(class_id)))
            .await
            .unwrap();

        assert!(store.delete_class(class_id).await.is_err());
        assert!(!store.delete_class(class_id + 100).await.unwrap());
    }

    #[tokio::test]
    async fn set_order_on_missing_class_reports_false() {
        let store = MemoryStore::new();
        let id = class(&store).await;
        assert!(store.set_class_order(id, 3).await.unwrap());
        assert!(!store.set_class_order(id + 1, 3).await.unwrap());
        assert_eq!(store.get_class(id).await.unwrap().unwrap().order, 3);
    }
}
