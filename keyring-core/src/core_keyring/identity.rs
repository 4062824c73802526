//! Identity module
//!
//! User-identity records as carried by an entity, and the `Identity`
//! (name, email) view extracted from them. Extraction keeps the entity's
//! order and multiplicity; nothing is deduplicated.

use crate::core_keyring::entity::Entity;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Display name and email address of a key owner
///
/// Either field may be empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Identity {
    pub name: String,
    pub email: String,
}

impl Identity {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Identity {
            name: name.into(),
            email: email.into(),
        }
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.name.is_empty(), self.email.is_empty()) {
            (_, true) => write!(f, "{}", self.name),
            (true, false) => write!(f, "<{}>", self.email),
            (false, false) => write!(f, "{} <{}>", self.name, self.email),
        }
    }
}

/// A user-identity record attached to an entity
///
/// Follows the `Name (comment) <email>` convention. A string with no angle
/// brackets is taken to be a bare name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserIdRecord {
    raw: String,
    name: String,
    comment: String,
    email: String,
}

impl UserIdRecord {
    /// Parse a raw user-id string
    pub fn parse(raw: &str) -> Self {
        let mut rest = raw.trim();
        let mut email = "";
        let mut comment = "";

        if rest.ends_with('>') {
            if let Some(start) = rest.rfind('<') {
                email = rest[start + 1..rest.len() - 1].trim();
                rest = rest[..start].trim_end();
            }
        }

        if rest.ends_with(')') {
            if let Some(start) = rest.rfind('(') {
                comment = rest[start + 1..rest.len() - 1].trim();
                rest = rest[..start].trim_end();
            }
        }

        UserIdRecord {
            raw: raw.to_string(),
            name: rest.to_string(),
            comment: comment.to_string(),
            email: email.to_string(),
        }
    }

    /// Build a record from its parts, rendering the raw form
    pub fn from_parts(name: &str, comment: &str, email: &str) -> Self {
        let mut raw = name.to_string();
        if !comment.is_empty() {
            if !raw.is_empty() {
                raw.push(' ');
            }
            raw.push_str(&format!("({})", comment));
        }
        if !email.is_empty() {
            if !raw.is_empty() {
                raw.push(' ');
            }
            raw.push_str(&format!("<{}>", email));
        }

        UserIdRecord {
            raw,
            name: name.to_string(),
            comment: comment.to_string(),
            email: email.to_string(),
        }
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn comment(&self) -> &str {
        &self.comment
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn to_identity(&self) -> Identity {
        Identity::new(self.name.clone(), self.email.clone())
    }
}

/// Read the identities of an entity, in declared order
pub fn extract_identities(entity: &Entity) -> Vec<Identity> {
    entity
        .user_ids()
        .iter()
        .map(UserIdRecord::to_identity)
        .collect()
}
