//! Error types for codec operations.

use std::fmt;

use asdm_model::ModelError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CodecError {
    /// Input ended before a value was complete.
    #[error("unexpected end of input at offset {offset}: {needed} more bytes needed")]
    UnexpectedEof { offset: usize, needed: usize },

    /// A string field did not hold valid UTF-8.
    #[error("invalid UTF-8 string at offset {offset}")]
    InvalidUtf8 { offset: usize },

    /// A length prefix was negative or too large.
    #[error("invalid length {length} at offset {offset}")]
    InvalidLength { offset: usize, length: i64 },

    /// Text that does not parse as the expected value type.
    #[error("invalid value '{text}': {message}")]
    InvalidValue { text: String, message: String },

    /// Content of a named element could not be decoded.
    #[error("invalid content in <{element}>: {message}")]
    InvalidElement { element: String, message: String },

    /// A required element is absent.
    #[error("missing element <{name}>")]
    MissingElement { name: String },

    /// A required XML attribute is absent.
    #[error("missing attribute '{attribute}' on <{element}>")]
    MissingAttribute { element: String, attribute: String },

    /// Malformed XML.
    #[error("XML error: {message}")]
    Xml { message: String },

    /// Malformed MIME envelope.
    #[error("invalid MIME message: {message}")]
    Mime { message: String },

    #[error("unknown byte order '{0}'")]
    UnknownByteOrder(String),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CodecError>;

impl CodecError {
    pub fn invalid_value(text: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            text: text.into(),
            message: message.into(),
        }
    }

    pub fn invalid_element(element: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::InvalidElement {
            element: element.into(),
            message: message.to_string(),
        }
    }

    pub fn missing_element(name: impl Into<String>) -> Self {
        Self::MissingElement { name: name.into() }
    }

    pub fn missing_attribute(element: impl Into<String>, attribute: impl Into<String>) -> Self {
        Self::MissingAttribute {
            element: element.into(),
            attribute: attribute.into(),
        }
    }

    pub fn xml(message: impl fmt::Display) -> Self {
        Self::Xml {
            message: message.to_string(),
        }
    }

    pub fn mime(message: impl Into<String>) -> Self {
        Self::Mime {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CodecError::UnexpectedEof {
            offset: 12,
            needed: 4,
        };
        assert_eq!(
            err.to_string(),
            "unexpected end of input at offset 12: 4 more bytes needed"
        );
        let err = CodecError::missing_attribute("BulkStoreRef", "byteOrder");
        assert_eq!(
            err.to_string(),
            "missing attribute 'byteOrder' on <BulkStoreRef>"
        );
    }

    #[test]
    fn test_model_error_is_transparent() {
        let err: CodecError = ModelError::InvalidTag("Foo".to_string()).into();
        assert_eq!(err.to_string(), "invalid tag: Foo");
    }
}
