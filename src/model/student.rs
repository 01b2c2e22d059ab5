use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::model::person::Status;
use crate::model::{Patch, apply_patch, optional_text, patch, patch_text, required_text};

/// Everything about a student that staff may edit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentProfile {
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub class_id: i32,
    pub section: Option<String>,
    pub roll_number: Option<String>,
    pub address: Option<String>,
    pub guardian_name: Option<String>,
    pub guardian_phone: Option<String>,
    pub guardian_relation: Option<String>,
    pub enrollment_date: Option<NaiveDate>,
    pub status: Status,
    pub blood_group: Option<String>,
    pub previous_school: Option<String>,
    pub parent_id: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: i32,
    pub gr_number: i32,
    pub email: String,
    #[serde(skip)]
    pub password_hash: String,
    #[serde(flatten)]
    pub profile: StudentProfile,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body of `POST /api/students`. Identity fields sent by the client are ignored.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NewStudent {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub class_id: Option<i32>,
    pub section: Option<String>,
    pub roll_number: Option<String>,
    pub address: Option<String>,
    pub guardian_name: Option<String>,
    pub guardian_phone: Option<String>,
    pub guardian_relation: Option<String>,
    pub enrollment_date: Option<NaiveDate>,
    pub status: Option<Status>,
    pub blood_group: Option<String>,
    pub previous_school: Option<String>,
    pub parent_id: Option<i32>,
    pub password: Option<String>,
}

impl NewStudent {
    /// Splits the request into the validated profile and the caller-supplied password, if any.
    pub fn validate(self) -> Result<(StudentProfile, Option<String>), ApiError> {
        let first_name = self.first_name.filter(|v| !v.trim().is_empty());
        let last_name = self.last_name.filter(|v| !v.trim().is_empty());
        let (Some(first_name), Some(last_name)) = (first_name, last_name) else {
            return Err(ApiError::Validation("Required fields are missing".into()));
        };
        let Some(class_id) = self.class_id else {
            return Err(ApiError::Validation("Class is required".into()));
        };

        let profile = StudentProfile {
            first_name: required_text(Some(first_name), "First name is required")?,
            last_name: required_text(Some(last_name), "Last name is required")?,
            phone: optional_text(self.phone),
            date_of_birth: self.date_of_birth,
            class_id,
            section: optional_text(self.section),
            roll_number: optional_text(self.roll_number),
            address: optional_text(self.address),
            guardian_name: optional_text(self.guardian_name),
            guardian_phone: optional_text(self.guardian_phone),
            guardian_relation: optional_text(self.guardian_relation),
            enrollment_date: self.enrollment_date,
            status: self.status.unwrap_or_default(),
            blood_group: optional_text(self.blood_group),
            previous_school: optional_text(self.previous_school),
            parent_id: self.parent_id,
        };

        Ok((profile, self.password.filter(|p| !p.is_empty())))
    }
}

/// Partial edit of a student. `grNumber`, `email` and `password` have no field here, so
/// an update can never touch them. Optional fields sent as `null` (or blank) are cleared.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StudentUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    #[serde(deserialize_with = "patch")]
    pub phone: Patch<String>,
    #[serde(deserialize_with = "patch")]
    pub date_of_birth: Patch<NaiveDate>,
    pub class_id: Option<i32>,
    #[serde(deserialize_with = "patch")]
    pub section: Patch<String>,
    #[serde(deserialize_with = "patch")]
    pub roll_number: Patch<String>,
    #[serde(deserialize_with = "patch")]
    pub address: Patch<String>,
    #[serde(deserialize_with = "patch")]
    pub guardian_name: Patch<String>,
    #[serde(deserialize_with = "patch")]
    pub guardian_phone: Patch<String>,
    #[serde(deserialize_with = "patch")]
    pub guardian_relation: Patch<String>,
    #[serde(deserialize_with = "patch")]
    pub enrollment_date: Patch<NaiveDate>,
    pub status: Option<Status>,
    #[serde(deserialize_with = "patch")]
    pub blood_group: Patch<String>,
    #[serde(deserialize_with = "patch")]
    pub previous_school: Patch<String>,
    #[serde(deserialize_with = "patch")]
    pub parent_id: Patch<i32>,
}

impl StudentUpdate {
    pub fn normalize(self) -> Result<Self, ApiError> {
        let first_name = match self.first_name {
            Some(v) => Some(required_text(Some(v), "First name cannot be empty")?),
            None => None,
        };
        let last_name = match self.last_name {
            Some(v) => Some(required_text(Some(v), "Last name cannot be empty")?),
            None => None,
        };

        Ok(Self {
            first_name,
            last_name,
            phone: patch_text(self.phone),
            section: patch_text(self.section),
            roll_number: patch_text(self.roll_number),
            address: patch_text(self.address),
            guardian_name: patch_text(self.guardian_name),
            guardian_phone: patch_text(self.guardian_phone),
            guardian_relation: patch_text(self.guardian_relation),
            blood_group: patch_text(self.blood_group),
            previous_school: patch_text(self.previous_school),
            ..self
        })
    }

    pub fn apply(&self, profile: &mut StudentProfile) {
        fn set<T: Clone>(target: &mut T, value: &Option<T>) {
            if let Some(v) = value {
                *target = v.clone();
            }
        }

        set(&mut profile.first_name, &self.first_name);
        set(&mut profile.last_name, &self.last_name);
        apply_patch(&mut profile.phone, &self.phone);
        apply_patch(&mut profile.date_of_birth, &self.date_of_birth);
        set(&mut profile.class_id, &self.class_id);
        apply_patch(&mut profile.section, &self.section);
        apply_patch(&mut profile.roll_number, &self.roll_number);
        apply_patch(&mut profile.address, &self.address);
        apply_patch(&mut profile.guardian_name, &self.guardian_name);
        apply_patch(&mut profile.guardian_phone, &self.guardian_phone);
        apply_patch(&mut profile.guardian_relation, &self.guardian_relation);
        apply_patch(&mut profile.enrollment_date, &self.enrollment_date);
        set(&mut profile.status, &self.status);
        apply_patch(&mut profile.blood_group, &self.blood_group);
        apply_patch(&mut profile.previous_school, &self.previous_school);
        apply_patch(&mut profile.parent_id, &self.parent_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> NewStudent {
        NewStudent {
            first_name: Some(" Bilal ".into()),
            last_name: Some("Ahmed".into()),
            class_id: Some(2),
            blood_group: Some("".into()),
            ..Default::default()
        }
    }

    #[test]
    fn names_and_class_are_required() {
        let err = NewStudent {
            last_name: None,
            ..request()
        }
        .validate()
        .unwrap_err();
        assert_eq!(err.to_string(), "Required fields are missing");

        let err = NewStudent {
            class_id: None,
            ..request()
        }
        .validate()
        .unwrap_err();
        assert_eq!(err.to_string(), "Class is required");
    }

    #[test]
    fn validate_trims_and_defaults() {
        let (profile, password) = request().validate().unwrap();
        assert_eq!(profile.first_name, "Bilal");
        assert_eq!(profile.status, Status::Active);
        assert_eq!(profile.blood_group, None);
        assert_eq!(password, None);
    }

    #[test]
    fn supplied_password_is_passed_through_untrimmed() {
        let (_, password) = NewStudent {
            password: Some(" Kite 9 ".into()),
            ..request()
        }
        .validate()
        .unwrap();
        assert_eq!(password.as_deref(), Some(" Kite 9 "));
    }

    #[test]
    fn client_supplied_identity_is_ignored() {
        let body = r#"{ "firstName": "Sara", "lastName": "Khan", "classId": 1,
                        "grNumber": 99, "email": "99st@elsewhere.org" }"#;
        let parsed: NewStudent = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.first_name.as_deref(), Some("Sara"));
        assert!(parsed.validate().is_ok());
    }

    #[test]
    fn update_only_touches_given_fields() {
        let (mut profile, _) = request().validate().unwrap();
        let update = StudentUpdate {
            address: Some(Some(" 12 Canal Road ".into())),
            ..Default::default()
        }
        .normalize()
        .unwrap();

        update.apply(&mut profile);
        assert_eq!(profile.address.as_deref(), Some("12 Canal Road"));
        assert_eq!(profile.first_name, "Bilal");
        assert_eq!(profile.class_id, 2);
    }

    #[test]
    fn null_unlinks_the_parent_and_blank_clears_text() {
        let (mut profile, _) = NewStudent {
            parent_id: Some(4),
            section: Some("B".into()),
            ..request()
        }
        .validate()
        .unwrap();

        let update: StudentUpdate =
            serde_json::from_str(r#"{ "parentId": null, "section": "  " }"#).unwrap();
        update.normalize().unwrap().apply(&mut profile);

        assert_eq!(profile.parent_id, None);
        assert_eq!(profile.section, None);
        assert_eq!(profile.first_name, "Bilal");
    }

    #[test]
    fn update_rejects_blank_names() {
        let update = StudentUpdate {
            first_name: Some("  ".into()),
            ..Default::default()
        };
        assert!(update.normalize().is_err());
    }
}
