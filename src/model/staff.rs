//! Teachers and employees share one record shape. Employees additionally carry
//! `nicNumber`, `gender` and `staffCategory`.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::model::person::{Gender, Status};
use crate::model::{Patch, apply_patch, optional_text, patch, patch_text, required_text};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StaffKind {
    Teacher,
    Employee,
}

impl StaffKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StaffKind::Teacher => "teacher",
            StaffKind::Employee => "employee",
        }
    }

    /// Capitalized name used in client-facing messages.
    pub fn label(&self) -> &'static str {
        match self {
            StaffKind::Teacher => "Teacher",
            StaffKind::Employee => "Employee",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StaffCategory {
    Teacher,
    Other,
}

impl StaffCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            StaffCategory::Teacher => "teacher",
            StaffCategory::Other => "other",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "teacher" => Some(StaffCategory::Teacher),
            "other" => Some(StaffCategory::Other),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmergencyContact {
    pub name: String,
    pub phone: String,
    pub relation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffProfile {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub qualification: Option<String>,
    pub experience: Option<i32>,
    pub subject: Option<String>,
    pub address: Option<String>,
    pub salary: Option<f64>,
    pub joining_date: Option<NaiveDate>,
    pub status: Status,
    pub emergency_contact: Option<EmergencyContact>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nic_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub staff_category: Option<StaffCategory>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffMember {
    pub id: i32,
    #[serde(flatten)]
    pub profile: StaffProfile,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NewStaff {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub qualification: Option<String>,
    pub experience: Option<i32>,
    pub subject: Option<String>,
    pub address: Option<String>,
    pub salary: Option<f64>,
    pub joining_date: Option<NaiveDate>,
    pub status: Option<Status>,
    pub emergency_contact: Option<EmergencyContact>,
    pub nic_number: Option<String>,
    pub gender: Option<Gender>,
    pub staff_category: Option<StaffCategory>,
}

impl NewStaff {
    pub fn validate(self, kind: StaffKind) -> Result<StaffProfile, ApiError> {
        let (Some(first_name), Some(last_name), Some(email)) = (
            optional_text(self.first_name),
            optional_text(self.last_name),
            optional_text(self.email),
        ) else {
            return Err(ApiError::Validation("Required fields are missing".into()));
        };

        check_non_negative(self.experience.map(f64::from), "Experience")?;
        check_non_negative(self.salary, "Salary")?;

        let subject = optional_text(self.subject);
        if kind == StaffKind::Teacher && subject.is_none() {
            return Err(ApiError::Validation("Subject is required".into()));
        }

        let (nic_number, gender, staff_category) = match kind {
            StaffKind::Teacher => (None, None, None),
            StaffKind::Employee => (
                optional_text(self.nic_number),
                self.gender,
                Some(self.staff_category.unwrap_or(StaffCategory::Other)),
            ),
        };

        Ok(StaffProfile {
            first_name,
            last_name,
            email: email.to_lowercase(),
            phone: optional_text(self.phone),
            date_of_birth: self.date_of_birth,
            qualification: optional_text(self.qualification),
            experience: self.experience,
            subject,
            address: optional_text(self.address),
            salary: self.salary,
            joining_date: self.joining_date,
            status: self.status.unwrap_or_default(),
            emergency_contact: self.emergency_contact,
            nic_number,
            gender,
            staff_category,
        })
    }
}

/// Partial edit of a staff member. Employee-only fields are ignored for teachers. Optional
/// fields sent as `null` (or blank) are cleared.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StaffUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    #[serde(deserialize_with = "patch")]
    pub phone: Patch<String>,
    #[serde(deserialize_with = "patch")]
    pub date_of_birth: Patch<NaiveDate>,
    #[serde(deserialize_with = "patch")]
    pub qualification: Patch<String>,
    #[serde(deserialize_with = "patch")]
    pub experience: Patch<i32>,
    #[serde(deserialize_with = "patch")]
    pub subject: Patch<String>,
    #[serde(deserialize_with = "patch")]
    pub address: Patch<String>,
    #[serde(deserialize_with = "patch")]
    pub salary: Patch<f64>,
    #[serde(deserialize_with = "patch")]
    pub joining_date: Patch<NaiveDate>,
    pub status: Option<Status>,
    #[serde(deserialize_with = "patch")]
    pub emergency_contact: Patch<EmergencyContact>,
    #[serde(deserialize_with = "patch")]
    pub nic_number: Patch<String>,
    #[serde(deserialize_with = "patch")]
    pub gender: Patch<Gender>,
    #[serde(deserialize_with = "patch")]
    pub staff_category: Patch<StaffCategory>,
}

impl StaffUpdate {
    pub fn normalize(self, kind: StaffKind) -> Result<Self, ApiError> {
        fn non_blank(value: Option<String>, message: &str) -> Result<Option<String>, ApiError> {
            value.map(|v| required_text(Some(v), message)).transpose()
        }

        check_non_negative(self.experience.flatten().map(f64::from), "Experience")?;
        check_non_negative(self.salary.flatten(), "Salary")?;

        let subject = patch_text(self.subject);
        if kind == StaffKind::Teacher && subject == Some(None) {
            return Err(ApiError::Validation("Subject is required".into()));
        }

        let employee = kind == StaffKind::Employee;
        Ok(Self {
            first_name: non_blank(self.first_name, "First name cannot be empty")?,
            last_name: non_blank(self.last_name, "Last name cannot be empty")?,
            email: non_blank(self.email, "Email cannot be empty")?.map(|e| e.to_lowercase()),
            phone: patch_text(self.phone),
            qualification: patch_text(self.qualification),
            subject,
            address: patch_text(self.address),
            nic_number: patch_text(self.nic_number).filter(|_| employee),
            gender: self.gender.filter(|_| employee),
            staff_category: self.staff_category.filter(|_| employee),
            ..self
        })
    }

    pub fn apply(&self, profile: &mut StaffProfile) {
        fn set<T: Clone>(target: &mut T, value: &Option<T>) {
            if let Some(v) = value {
                *target = v.clone();
            }
        }

        set(&mut profile.first_name, &self.first_name);
        set(&mut profile.last_name, &self.last_name);
        set(&mut profile.email, &self.email);
        apply_patch(&mut profile.phone, &self.phone);
        apply_patch(&mut profile.date_of_birth, &self.date_of_birth);
        apply_patch(&mut profile.qualification, &self.qualification);
        apply_patch(&mut profile.experience, &self.experience);
        apply_patch(&mut profile.subject, &self.subject);
        apply_patch(&mut profile.address, &self.address);
        apply_patch(&mut profile.salary, &self.salary);
        apply_patch(&mut profile.joining_date, &self.joining_date);
        set(&mut profile.status, &self.status);
        apply_patch(&mut profile.emergency_contact, &self.emergency_contact);
        apply_patch(&mut profile.nic_number, &self.nic_number);
        apply_patch(&mut profile.gender, &self.gender);
        apply_patch(&mut profile.staff_category, &self.staff_category);
    }
}

fn check_non_negative(value: Option<f64>, field: &str) -> Result<(), ApiError> {
    match value {
        Some(v) if v < 0.0 => Err(ApiError::Validation(format!("{field} cannot be negative"))),
        _ => Ok(()),
    }
}
