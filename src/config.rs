// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Generator configuration.
//!
//! # Format
//!
//! ```toml
//! dialect = "mysql"
//! schema = "library"
//!
//! [tables]
//! Book = "books_v2"
//! ```
//!
//! | Key | Default | Effect |
//! |-----|---------|--------|
//! | `dialect` | `"postgres"` | Template to render |
//! | `schema` | none | Prefix for every table, `schema.table` |
//! | `tables` | empty | Entity name to table override |

use std::{collections::BTreeMap, fs, path::Path};

use serde::Deserialize;

use crate::{
    entity::parse::Dialect,
    error::{GenerateError, Result}
};

/// Settings shared by every entity of a generation run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorConfig {
    /// Dialect to render.
    pub dialect: Dialect,

    /// Schema prefix applied to every table.
    pub schema: Option<String>,

    /// Table name overrides keyed by entity name.
    pub tables: BTreeMap<String, String>
}

impl GeneratorConfig {
    /// Configuration with the given dialect and no overrides.
    #[must_use]
    pub fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            ..Self::default()
        }
    }

    /// Set the schema prefix.
    #[must_use]
    pub fn schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = Some(schema.into());
        self
    }

    /// Override the table of one entity.
    #[must_use]
    pub fn table(mut self, entity: impl Into<String>, table: impl Into<String>) -> Self {
        self.tables.insert(entity.into(), table.into());
        self
    }

    /// Parse configuration from TOML text.
    ///
    /// # Errors
    ///
    /// [`GenerateError::Config`] on malformed TOML, unknown keys or an
    /// unknown dialect.
    pub fn from_toml_str(input: &str) -> Result<Self> {
        Ok(toml::from_str(input)?)
    }

    /// Read configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// [`GenerateError::Io`] when the file cannot be read, otherwise as
    /// [`from_toml_str`](Self::from_toml_str).
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let input = fs::read_to_string(path).map_err(|source| GenerateError::Io {
            path: path.to_path_buf(),
            source
        })?;
        Self::from_toml_str(&input)
    }

    /// Table for `entity`, applying the override and the schema prefix.
    ///
    /// A table that already names a schema is left unprefixed.
    #[must_use]
    pub fn table_for(&self, entity: &str, default: &str) -> String {
        let table = self.tables.get(entity).map_or(default, String::as_str);
        match self.schema.as_deref().map(str::trim) {
            Some(schema) if !schema.is_empty() && !table.contains('.') => {
                format!("{schema}.{table}")
            }
            _ => table.to_owned()
        }
    }
}
