// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Entity descriptors as handed over by the annotation scanner.
//!
//! These are plain data: names and types are still strings. They become
//! [`EntityDef`](super::EntityDef) once validated.
//!
//! # Example
//!
//! ```toml
//! name = "Book"
//! package = "crate::model"
//! table = "books"
//!
//! [[fields]]
//! name = "id"
//! column = "id"
//! type = "i64"
//! primary_key = true
//!
//! [[fields]]
//! name = "created_at"
//! column = "created_at"
//! type = "DateTime<Utc>"
//! default_value = "now()"
//! skip_update = true
//!
//! [imports]
//! "chrono::DateTime" = "DateTime"
//! "chrono::Utc" = "Utc"
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::EntityDef;
use crate::error::ValidationError;

/// One persisted field of an entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    /// Rust field name on the entity struct.
    pub name: String,

    /// Column name in the table.
    pub column: String,

    /// Rust type of the field, e.g. `i64` or `Option<String>`.
    #[serde(rename = "type")]
    pub ty: String,

    /// Primary key; exactly one field per entity.
    #[serde(default)]
    pub primary_key: bool,

    /// SQL expression written verbatim instead of the runtime value on
    /// insert and update, e.g. `now()`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,

    /// Never written by `update` or `patch`.
    #[serde(default)]
    pub skip_update: bool
}

impl Field {
    /// Create a plain field.
    pub fn new(name: impl Into<String>, column: impl Into<String>, ty: impl Into<String>) -> Self {
        Self {
            name:          name.into(),
            column:        column.into(),
            ty:            ty.into(),
            primary_key:   false,
            default_value: None,
            skip_update:   false
        }
    }

    /// Mark as primary key.
    #[must_use]
    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    /// Set the default SQL expression.
    #[must_use]
    pub fn default_value(mut self, expr: impl Into<String>) -> Self {
        self.default_value = Some(expr.into());
        self
    }

    /// Exclude from `update` and `patch`.
    #[must_use]
    pub fn skip_update(mut self) -> Self {
        self.skip_update = true;
        self
    }
}

/// Everything the generator needs to know about one entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityDescriptor {
    /// Entity struct name, e.g. `Book`.
    pub name: String,

    /// Module path holding the entity struct, e.g. `crate::model`.
    #[serde(default)]
    pub package: String,

    /// Table name, e.g. `books`.
    pub table: String,

    /// Persisted fields in column order.
    #[serde(default)]
    pub fields: Vec<Field>,

    /// Import path to alias; an alias equal to the last path segment (or
    /// empty) imports the item under its own name.
    #[serde(default)]
    pub imports: BTreeMap<String, String>
}

impl EntityDescriptor {
    /// Create a descriptor without fields.
    pub fn new(
        name: impl Into<String>,
        package: impl Into<String>,
        table: impl Into<String>
    ) -> Self {
        Self {
            name:    name.into(),
            package: package.into(),
            table:   table.into(),
            fields:  Vec::new(),
            imports: BTreeMap::new()
        }
    }

    /// Append a field.
    #[must_use]
    pub fn field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    /// Add an import.
    #[must_use]
    pub fn import(mut self, path: impl Into<String>, alias: impl Into<String>) -> Self {
        self.imports.insert(path.into(), alias.into());
        self
    }

    /// Fields flagged as primary key.
    pub fn primary_keys(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter().filter(|f| f.primary_key)
    }

    /// Check the descriptor without rendering anything.
    ///
    /// # Errors
    ///
    /// The first [`ValidationError`] found.
    pub fn validate(&self) -> Result<(), ValidationError> {
        EntityDef::from_descriptor(self).map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_from_toml() {
        let src = r#"
            name = "Book"
            package = "crate::model"
            table = "books"

            [[fields]]
            name = "id"
            column = "id"
            type = "i64"
            primary_key = true

            [[fields]]
            name = "created_at"
            column = "created_at"
            type = "DateTime<Utc>"
            default_value = "now()"
            skip_update = true

            [imports]
            "chrono::DateTime" = "DateTime"
        "#;
        let desc: EntityDescriptor = toml::from_str(src).unwrap();
        assert_eq!(desc.fields.len(), 2);
        assert!(desc.fields[0].primary_key);
        assert_eq!(desc.fields[1].default_value.as_deref(), Some("now()"));
        assert!(desc.fields[1].skip_update);
        assert!(!desc.fields[0].skip_update);
        assert_eq!(desc.imports["chrono::DateTime"], "DateTime");
        assert!(desc.validate().is_ok());
    }

    #[test]
    fn builder_matches_literal() {
        let built = EntityDescriptor::new("Book", "crate::model", "books")
            .field(Field::new("id", "id", "i64").primary_key())
            .field(Field::new("title", "title", "String"));
        assert_eq!(built.primary_keys().count(), 1);
        assert_eq!(built.fields[1].column, "title");
    }
}
