//! Request and record shapes exchanged with the dashboard. Field names follow the
//! dashboard's JSON (`camelCase`, with `p_id` kept as-is for parents).

use serde::{Deserialize, Deserializer};

use crate::error::ApiError;

pub mod class_item;
pub mod id_request;
pub mod login_object;
pub mod order_item;
pub mod parent;
pub mod person;
pub mod simple_response;
pub mod staff;
pub mod student;
pub mod summary;

/// Trims a required text field, rejecting it when absent or blank.
pub fn required_text(value: Option<String>, message: &str) -> Result<String, ApiError> {
    match value.map(|v| v.trim().to_string()) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(ApiError::Validation(message.into())),
    }
}

/// Trims an optional text field. Blank becomes `None`.
pub fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// A field of a partial update. `None` leaves the stored value alone, `Some(None)` clears it.
pub type Patch<T> = Option<Option<T>>;

/// Reads a [`Patch`] so that an explicit `null` means "clear". Pair with `#[serde(default)]`.
pub fn patch<'de, T, D>(deserializer: D) -> Result<Patch<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Trims a text patch. A blank value clears the field.
pub fn patch_text(value: Patch<String>) -> Patch<String> {
    value.map(optional_text)
}

pub fn apply_patch<T: Clone>(target: &mut Option<T>, value: &Patch<T>) {
    if let Some(v) = value {
        *target = v.clone();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_text_trims_and_rejects_blank() {
        assert_eq!(required_text(Some("  Ayesha ".into()), "x").unwrap(), "Ayesha");
        assert!(matches!(
            required_text(Some("   ".into()), "First name is required"),
            Err(ApiError::Validation(m)) if m == "First name is required"
        ));
        assert!(required_text(None, "x").is_err());
    }

    #[derive(Debug, Default, Deserialize)]
    #[serde(default)]
    struct Edit {
        #[serde(deserialize_with = "patch")]
        occupation: Patch<String>,
    }

    #[test]
    fn patch_tells_absent_from_null() {
        let absent: Edit = serde_json::from_str("{}").unwrap();
        let cleared: Edit = serde_json::from_str(r#"{ "occupation": null }"#).unwrap();
        let set: Edit = serde_json::from_str(r#"{ "occupation": " Tailor " }"#).unwrap();

        assert_eq!(absent.occupation, None);
        assert_eq!(cleared.occupation, Some(None));
        assert_eq!(patch_text(set.occupation), Some(Some("Tailor".into())));
        assert_eq!(patch_text(Some(Some("  ".into()))), Some(None));
    }

    #[test]
    fn optional_text_drops_blank() {
        assert_eq!(optional_text(Some(" O+ ".into())), Some("O+".into()));
        assert_eq!(optional_text(Some("".into())), None);
    }
}
