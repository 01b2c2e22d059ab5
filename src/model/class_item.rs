use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::model::{optional_text, required_text};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Class {
    pub id: i32,
    pub name: String,
    pub sections: Vec<String>,
    /// Display rank. Not unique, defaults to 0.
    pub order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NewClass {
    pub name: Option<String>,
    pub sections: Option<Vec<String>>,
}

/// A validated class, ready to be stored.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassDraft {
    pub name: String,
    pub sections: Vec<String>,
}

impl NewClass {
    pub fn validate(self) -> Result<ClassDraft, ApiError> {
        Ok(ClassDraft {
            name: required_text(self.name, "Class name is required")?,
            sections: clean_sections(self.sections.unwrap_or_default()),
        })
    }
}

/// Edits to a class. `order` is absent, only the bulk order update moves it.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassUpdate {
    pub name: Option<String>,
    pub sections: Option<Vec<String>>,
}

impl ClassUpdate {
    pub fn normalize(self) -> Result<Self, ApiError> {
        let name = match self.name {
            Some(name) => Some(required_text(Some(name), "Class name cannot be empty")?),
            None => None,
        };
        Ok(Self {
            name,
            sections: self.sections.map(clean_sections),
        })
    }

    pub fn apply(&self, class: &mut Class) {
        if let Some(name) = &self.name {
            class.name = name.clone();
        }
        if let Some(sections) = &self.sections {
            class.sections = sections.clone();
        }
    }
}

fn clean_sections(sections: Vec<String>) -> Vec<String> {
    sections
        .into_iter()
        .filter_map(|s| optional_text(Some(s)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_class_requires_a_name() {
        let err = NewClass::default().validate().unwrap_err();
        assert_eq!(err.to_string(), "Class name is required");
    }

    #[test]
    fn blank_sections_are_dropped() {
        let draft = NewClass {
            name: Some(" Grade 5 ".into()),
            sections: Some(vec!["A".into(), " ".into(), " B".into()]),
        }
        .validate()
        .unwrap();

        assert_eq!(draft.name, "Grade 5");
        assert_eq!(draft.sections, vec!["A".to_string(), "B".to_string()]);
    }
}
