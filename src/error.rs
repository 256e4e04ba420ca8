// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Generation-time errors.
//!
//! Every error aborts generation of one entity only; [`Generator`] keeps
//! going with the next one.
//!
//! [`Generator`]: crate::Generator

use std::{io, path::PathBuf};

use thiserror::Error;

/// Result alias for generator operations.
pub type Result<T> = std::result::Result<T, GenerateError>;

/// Bad entity metadata.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Entity name is empty.
    #[error("entity name is empty")]
    EmptyName,

    /// Table name is empty.
    #[error("table name is empty")]
    EmptyTable,

    /// A field has no column name.
    #[error("field `{field}` has an empty column name")]
    EmptyColumn {
        /// Field name.
        field: String
    },

    /// Not a Rust identifier.
    #[error("`{value}` is not a valid identifier")]
    InvalidIdentifier {
        /// Offending text.
        value: String
    },

    /// Not a Rust path.
    #[error("`{value}` is not a valid path")]
    InvalidPath {
        /// Offending text.
        value: String
    },

    /// Field type does not parse.
    #[error("field `{field}` has invalid type `{ty}`: {reason}")]
    InvalidType {
        /// Field name.
        field:  String,
        /// Declared type.
        ty:     String,
        /// Parser message.
        reason: String
    },

    /// No field is flagged as primary key.
    #[error("no primary key")]
    NoPrimaryKey,

    /// More than one field is flagged as primary key.
    #[error("{} primary keys: {}", .fields.len(), .fields.join(", "))]
    MultiplePrimaryKeys {
        /// Fields flagged as primary key.
        fields: Vec<String>
    },

    /// Two fields map to the same column.
    #[error("column `{column}` is used by more than one field")]
    DuplicateColumn {
        /// Column name.
        column: String
    },

    /// Two fields share a name.
    #[error("field `{field}` is declared more than once")]
    DuplicateField {
        /// Field name.
        field: String
    }
}

/// Unknown dialect selector.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown dialect `{0}`, expected one of: generic, mysql, sqlite, postgres")]
pub struct DialectError(pub String);

/// Error raised while generating one entity's repository.
#[derive(Debug, Error)]
pub enum GenerateError {
    /// The descriptor failed validation.
    #[error("invalid entity `{entity}`: {source}")]
    Validation {
        /// Entity name.
        entity: String,
        /// What is wrong.
        #[source]
        source: ValidationError
    },

    /// Unknown dialect.
    #[error(transparent)]
    Dialect(#[from] DialectError),

    /// The descriptor cannot be rendered (no fields or no primary key).
    #[error("cannot render entity `{entity}`: {reason}")]
    Template {
        /// Entity name.
        entity: String,
        /// What is missing.
        reason: String
    },

    /// Generator configuration is malformed.
    #[error("invalid generator configuration: {0}")]
    Config(String),

    /// Writing a unit failed.
    #[error("cannot write `{}`: {source}", .path.display())]
    Io {
        /// File being written.
        path:   PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error
    }
}

impl GenerateError {
    /// Wrap a validation error for `entity`.
    pub fn validation(entity: impl Into<String>, source: ValidationError) -> Self {
        Self::Validation {
            entity: entity.into(),
            source
        }
    }

    /// Build a template error for `entity`.
    pub fn template(entity: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Template {
            entity: entity.into(),
            reason: reason.into()
        }
    }
}

impl From<toml::de::Error> for GenerateError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multiple_primary_keys_lists_fields() {
        let err = ValidationError::MultiplePrimaryKeys {
            fields: vec!["id".into(), "uuid".into()]
        };
        assert_eq!(err.to_string(), "2 primary keys: id, uuid");
    }

    #[test]
    fn validation_wraps_entity_name() {
        let err = GenerateError::validation("Book", ValidationError::EmptyTable);
        assert_eq!(err.to_string(), "invalid entity `Book`: table name is empty");
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn dialect_error_is_transparent() {
        let err: GenerateError = DialectError("oracle".into()).into();
        assert!(err.to_string().starts_with("unknown dialect `oracle`"));
    }

    #[test]
    fn io_error_mentions_path() {
        let err = GenerateError::Io {
            path:   PathBuf::from("/tmp/book_repo.rs"),
            source: io::Error::other("disk full")
        };
        assert_eq!(err.to_string(), "cannot write `/tmp/book_repo.rs`: disk full");
    }
}
