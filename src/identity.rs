//! Sequential identifiers and the login identity derived from them.
//!
//! Students and parents receive an identifier from a per-role counter the first time they are
//! stored. The counter is advanced atomically by the store, so two concurrent creations can never
//! observe the same value. The portal email and the default password are derived from that
//! identifier once, here, before the record is written. Updates never come through this module.

use serde::Serialize;

use crate::security::hash_password;

/// Roles that get a sequential identifier and a portal account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Student,
    Parent,
}

impl Role {
    /// Name of the counter backing this role's identifiers.
    pub fn sequence(&self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Parent => "parent",
        }
    }

    fn email_suffix(&self) -> &'static str {
        match self {
            Role::Student => "st",
            Role::Parent => "p",
        }
    }

    fn password_prefix(&self) -> &'static str {
        match self {
            Role::Student => "std",
            Role::Parent => "prnt",
        }
    }

    pub fn email(&self, identifier: i32, domain: &str) -> String {
        format!("{}{}@{}", identifier, self.email_suffix(), domain).to_lowercase()
    }

    pub fn default_password(&self, identifier: i32) -> String {
        format!("{}{}123", self.password_prefix(), identifier)
    }
}

/// The plaintext credentials issued to a new account. Only ever returned in the creation response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub identifier: i32,
    pub email: String,
    pub password: String,
}

impl Credentials {
    /// A supplied password wins over the derived default.
    pub fn derive(role: Role, identifier: i32, domain: &str, supplied: Option<String>) -> Self {
        Self {
            identifier,
            email: role.email(identifier, domain),
            password: supplied.unwrap_or_else(|| role.default_password(identifier)),
        }
    }
}

/// A record that has been given its identity and is ready to be inserted.
#[derive(Debug, Clone, PartialEq)]
pub struct Enrollment<P> {
    pub identifier: i32,
    pub email: String,
    pub password_hash: String,
    pub profile: P,
}

impl<P> Enrollment<P> {
    /// Builds the insertable record. The plaintext password is hashed and not kept.
    pub fn new(credentials: &Credentials, profile: P) -> Self {
        Self {
            identifier: credentials.identifier,
            email: credentials.email.clone(),
            password_hash: hash_password(&credentials.password),
            profile,
        }
    }
}

/// Creation response: the stored record plus the one-time plaintext password.
#[derive(Debug, Serialize)]
pub struct Issued<T> {
    #[serde(flatten)]
    pub record: T,
    pub password: String,
}
