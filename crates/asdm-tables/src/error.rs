//! Error types for table and dataset operations.

use std::fmt;
use std::path::Path;

use thiserror::Error;

/// Errors raised by tables and the dataset container.
///
/// Every variant names the table it concerns so failures during a dataset
/// load or save point at the offending file.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AsdmError {
    // =========================================================================
    // Persistence
    // =========================================================================
    /// Malformed XML, binary or MIME content, or a failed file operation.
    #[error("{table}: conversion failed: {message}")]
    Conversion { table: String, message: String },

    // =========================================================================
    // Table invariants
    // =========================================================================
    /// A row with the same key but different content is already present.
    #[error("{table}: duplicate key")]
    DuplicateKey { table: String },

    /// A row equal on every attribute but its surrogate key is already present.
    #[error("{table}: uniqueness violation")]
    UniquenessViolation { table: String },

    /// A key lookup that must succeed found nothing.
    #[error("{table}: no row with key {key}")]
    NoSuchRow { table: String, key: String },

    /// A key attribute was modified after the row was added, or an absent
    /// optional attribute was dereferenced.
    #[error("{table}: illegal access to attribute '{attribute}'")]
    IllegalAccess { table: String, attribute: String },

    // =========================================================================
    // Container
    // =========================================================================
    #[error("{message}")]
    InvalidArgument { message: String },
}

pub type Result<T> = std::result::Result<T, AsdmError>;

impl AsdmError {
    pub fn conversion(table: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Conversion {
            table: table.into(),
            message: message.to_string(),
        }
    }

    /// A conversion error for a failed file operation on `path`.
    pub fn io(table: impl Into<String>, path: &Path, source: &std::io::Error) -> Self {
        Self::conversion(table, format!("{}: {source}", path.display()))
    }

    pub fn duplicate_key(table: impl Into<String>) -> Self {
        Self::DuplicateKey {
            table: table.into(),
        }
    }

    pub fn uniqueness_violation(table: impl Into<String>) -> Self {
        Self::UniquenessViolation {
            table: table.into(),
        }
    }

    pub fn no_such_row(table: impl Into<String>, key: impl fmt::Display) -> Self {
        Self::NoSuchRow {
            table: table.into(),
            key: key.to_string(),
        }
    }

    pub fn illegal_access(table: impl Into<String>, attribute: impl Into<String>) -> Self {
        Self::IllegalAccess {
            table: table.into(),
            attribute: attribute.into(),
        }
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AsdmError::no_such_row("Station", "Station_4");
        assert_eq!(err.to_string(), "Station: no row with key Station_4");

        let err = AsdmError::illegal_access("Subscan", "scanNumber");
        assert_eq!(
            err.to_string(),
            "Subscan: illegal access to attribute 'scanNumber'"
        );
    }

    #[test]
    fn test_io_error_names_path() {
        let source = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err = AsdmError::io("Antenna", Path::new("/data/Antenna.xml"), &source);
        assert_eq!(
            err.to_string(),
            "Antenna: conversion failed: /data/Antenna.xml: missing"
        );
    }
}
