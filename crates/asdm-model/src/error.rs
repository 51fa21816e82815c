use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("invalid tag: {0}")]
    InvalidTag(String),
    #[error("invalid entity id: {0}")]
    InvalidEntityId(String),
    #[error("invalid {enum_name} literal: {value}")]
    InvalidEnumLiteral {
        enum_name: &'static str,
        value: String,
    },
    #[error("invalid {enum_name} ordinal: {ordinal}")]
    InvalidEnumOrdinal { enum_name: &'static str, ordinal: i32 },
    #[error("invalid time: {0}")]
    InvalidTime(String),
    #[error("invalid {kind} value: {value}")]
    InvalidQuantity { kind: &'static str, value: String },
}

pub type Result<T> = std::result::Result<T, ModelError>;
