//! Versioned identities of datasets and tables.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{ModelError, Result};

/// Archive UID of the form `uid://A002/X1f2/X3`.
///
/// Each of the three path segments is a letter followed by hexadecimal digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityId(String);

impl EntityId {
    pub const PREFIX: &'static str = "uid://";

    pub fn new(value: impl Into<String>) -> Result<Self> {
        let value = value.into();
        validate_entity_id(&value)?;
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self("uid://X0/X0/X0".to_string())
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for EntityId {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s.trim())
    }
}

fn validate_entity_id(value: &str) -> Result<()> {
    let invalid = || ModelError::InvalidEntityId(value.to_string());
    let path = value.strip_prefix(EntityId::PREFIX).ok_or_else(invalid)?;
    let segments: Vec<&str> = path.split('/').collect();
    if segments.len() != 3 {
        return Err(invalid());
    }
    for segment in segments {
        let mut chars = segment.chars();
        let leading_letter = chars.next().is_some_and(|c| c.is_ascii_alphabetic());
        let digits = chars.as_str();
        if !leading_letter || digits.is_empty() || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }
    }
    Ok(())
}

/// Identity record attached to the dataset and to every table.
///
/// The type name of a table entity is the table name followed by `Table`
/// (e.g. `StationTable`); loaders use it to detect mismatched files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub entity_id: EntityId,
    pub entity_id_encrypted: String,
    pub entity_type_name: String,
    pub entity_version: String,
    pub instance_version: String,
}

impl Entity {
    pub fn new(entity_id: EntityId, entity_type_name: impl Into<String>) -> Self {
        Self {
            entity_id,
            entity_type_name: entity_type_name.into(),
            ..Self::default()
        }
    }

    /// Default identity carrying the given type name.
    pub fn for_type(entity_type_name: impl Into<String>) -> Self {
        Self::new(EntityId::default(), entity_type_name)
    }
}

impl Default for Entity {
    fn default() -> Self {
        Self {
            entity_id: EntityId::default(),
            entity_id_encrypted: "na".to_string(),
            entity_type_name: String::new(),
            entity_version: "1".to_string(),
            instance_version: "1".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_id_accepts_archive_uids() {
        assert!(EntityId::new("uid://X0/X0/X0").is_ok());
        assert!(EntityId::new("uid://A002/X1f2a/X3c").is_ok());
    }

    #[test]
    fn test_entity_id_rejects_malformed() {
        for bad in [
            "",
            "X0/X0/X0",
            "uid://X0/X0",
            "uid://X0/X0/X0/X0",
            "uid://X0/XZZ/X0",
            "uid://0/X0/X0",
            "uid://X/X0/X0",
        ] {
            assert!(EntityId::new(bad).is_err(), "{bad} should be rejected");
        }
    }

    #[test]
    fn test_entity_defaults() {
        let entity = Entity::for_type("StationTable");
        assert_eq!(entity.entity_id.as_str(), "uid://X0/X0/X0");
        assert_eq!(entity.entity_id_encrypted, "na");
        assert_eq!(entity.entity_type_name, "StationTable");
        assert_eq!(entity.entity_version, "1");
    }
}
