use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::model::person::Gender;
use crate::model::{Patch, apply_patch, optional_text, patch, patch_text, required_text};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParentProfile {
    pub full_name: String,
    /// National identity card number. Unique across parents.
    pub cnic: String,
    pub phone: String,
    pub address: String,
    pub occupation: Option<String>,
    pub gender: Gender,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Parent {
    pub id: i32,
    #[serde(rename = "p_id")]
    pub p_id: i32,
    pub email: String,
    #[serde(skip)]
    pub password_hash: String,
    #[serde(flatten)]
    pub profile: ParentProfile,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NewParent {
    pub full_name: Option<String>,
    pub cnic: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub occupation: Option<String>,
    pub gender: Option<Gender>,
    pub password: Option<String>,
}

impl NewParent {
    pub fn validate(self) -> Result<(ParentProfile, Option<String>), ApiError> {
        let Some(gender) = self.gender else {
            return Err(ApiError::Validation("Gender is required".into()));
        };

        let profile = ParentProfile {
            full_name: required_text(self.full_name, "Full name is required")?,
            cnic: required_text(self.cnic, "CNIC is required")?,
            phone: required_text(self.phone, "Phone is required")?,
            address: required_text(self.address, "Address is required")?,
            occupation: optional_text(self.occupation),
            gender,
        };

        Ok((profile, self.password.filter(|p| !p.is_empty())))
    }
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ParentUpdate {
    pub full_name: Option<String>,
    pub cnic: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    /// `null` or blank clears it.
    #[serde(deserialize_with = "patch")]
    pub occupation: Patch<String>,
    pub gender: Option<Gender>,
}

impl ParentUpdate {
    pub fn normalize(self) -> Result<Self, ApiError> {
        fn non_blank(value: Option<String>, message: &str) -> Result<Option<String>, ApiError> {
            value.map(|v| required_text(Some(v), message)).transpose()
        }

        Ok(Self {
            full_name: non_blank(self.full_name, "Full name cannot be empty")?,
            cnic: non_blank(self.cnic, "CNIC cannot be empty")?,
            phone: non_blank(self.phone, "Phone cannot be empty")?,
            address: non_blank(self.address, "Address cannot be empty")?,
            occupation: patch_text(self.occupation),
            gender: self.gender,
        })
    }

    pub fn apply(&self, profile: &mut ParentProfile) {
        if let Some(v) = &self.full_name {
            profile.full_name = v.clone();
        }
        if let Some(v) = &self.cnic {
            profile.cnic = v.clone();
        }
        if let Some(v) = &self.phone {
            profile.phone = v.clone();
        }
        if let Some(v) = &self.address {
            profile.address = v.clone();
        }
        apply_patch(&mut profile.occupation, &self.occupation);
        if let Some(v) = self.gender {
            profile.gender = v;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parent_serializes_p_id_verbatim() {
        let parent = Parent {
            id: 1,
            p_id: 3,
            email: "3p@school.edu".into(),
            password_hash: "secret".into(),
            profile: ParentProfile {
                full_name: "Rashid Mahmood".into(),
                cnic: "35202-1234567-1".into(),
                phone: "0300-1234567".into(),
                address: "House 4, Model Town".into(),
                occupation: None,
                gender: Gender::Male,
            },
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let json = serde_json::to_value(&parent).unwrap();
        assert_eq!(json["p_id"], 3);
        assert_eq!(json["fullName"], "Rashid Mahmood");
        assert!(json.get("passwordHash").is_none());
    }

    #[test]
    fn occupation_can_be_cleared() {
        let (mut profile, _) = NewParent {
            full_name: Some("Nadia Butt".into()),
            cnic: Some("35202-2".into()),
            phone: Some("0300-0000002".into()),
            address: Some("Street 1".into()),
            occupation: Some("Teacher".into()),
            gender: Some(Gender::Female),
            password: None,
        }
        .validate()
        .unwrap();

        let keep: ParentUpdate = serde_json::from_str(r#"{ "phone": "0300-0000003" }"#).unwrap();
        keep.normalize().unwrap().apply(&mut profile);
        assert_eq!(profile.occupation.as_deref(), Some("Teacher"));

        let clear: ParentUpdate = serde_json::from_str(r#"{ "occupation": null }"#).unwrap();
        clear.normalize().unwrap().apply(&mut profile);
        assert_eq!(profile.occupation, None);
    }

    #[test]
    fn missing_gender_is_a_validation_error() {
        let err = NewParent {
            full_name: Some("Nadia".into()),
            ..Default::default()
        }
        .validate()
        .unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }
}
