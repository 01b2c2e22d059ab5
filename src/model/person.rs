//! Small enumerations shared by students, parents and staff.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    #[default]
    Active,
    Inactive,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Active => "active",
            Status::Inactive => "inactive",
        }
    }
}

impl FromStr for Status {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Status::Active),
            "inactive" => Ok(Status::Inactive),
            other => Err(format!("Unknown status '{other}'")),
        }
    }
}

/// Parents send `Male`, staff forms send `male`. Both are accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    #[serde(rename = "male", alias = "Male")]
    Male,
    #[serde(rename = "female", alias = "Female")]
    Female,
    #[serde(rename = "other", alias = "Other")]
    Other,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Other => "other",
        }
    }
}

impl FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "male" => Ok(Gender::Male),
            "female" => Ok(Gender::Female),
            "other" => Ok(Gender::Other),
            other => Err(format!("Unknown gender '{other}'")),
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gender_accepts_both_casings() {
        let parent: Gender = serde_json::from_str(r#""Female""#).unwrap();
        let staff: Gender = serde_json::from_str(r#""female""#).unwrap();
        assert_eq!(parent, staff);
        assert_eq!(serde_json::to_string(&parent).unwrap(), r#""female""#);
    }

    #[test]
    fn status_round_trips_through_its_column_text() {
        assert_eq!("inactive".parse::<Status>().unwrap(), Status::Inactive);
        assert!("retired".parse::<Status>().is_err());
    }
}
