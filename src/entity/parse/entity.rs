// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Validated entity definition.
//!
//! [`EntityDef`] is what every generator works with. Building one from an
//! [`EntityDescriptor`] performs all validation, so generators can rely on
//! exactly one primary key and well-formed names.
//!
//! # Derived Names
//!
//! | Item | Example |
//! |------|---------|
//! | Table name constant | `BOOK_TABLE_NAME` |
//! | Columns struct | `BookColumns` |
//! | Columns constant | `BOOK_TABLE` |
//! | Row scanner | `scan_book` |
//! | Repository trait | `BookRepo` |
//! | Implementation | `BookRepoImpl` |

use std::collections::HashSet;

use convert_case::{Case, Casing};
use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{Ident, Path};

use super::{
    EntityDescriptor, FieldDef,
    field::parse_ident
};
use crate::error::ValidationError;

/// A `use` item emitted into the generated unit.
#[derive(Debug, Clone)]
pub struct Import {
    /// Imported path.
    pub path:  Path,
    /// Alias, when it differs from the last path segment.
    pub alias: Option<Ident>
}

/// Entity ready for code generation.
#[derive(Debug, Clone)]
pub struct EntityDef {
    /// Struct name.
    pub ident: Ident,

    /// Module holding the struct; `None` for the including module.
    pub package: Option<Path>,

    /// Table name, possibly schema-qualified.
    pub table: String,

    /// Fields in descriptor order.
    pub fields: Vec<FieldDef>,

    /// Imports for the generated unit.
    pub imports: Vec<Import>,

    id_index: usize
}

impl EntityDef {
    /// Validate a descriptor and parse its names and types.
    ///
    /// # Errors
    ///
    /// The first [`ValidationError`] found.
    pub fn from_descriptor(desc: &EntityDescriptor) -> Result<Self, ValidationError> {
        if desc.name.trim().is_empty() {
            return Err(ValidationError::EmptyName);
        }
        let ident = parse_ident(&desc.name)?;

        if desc.table.trim().is_empty() {
            return Err(ValidationError::EmptyTable);
        }

        let package = match desc.package.trim() {
            "" => None,
            path => Some(parse_path(path)?)
        };

        let imports = desc
            .imports
            .iter()
            .map(|(path, alias)| parse_import(path, alias))
            .collect::<Result<Vec<_>, _>>()?;

        let fields = desc
            .fields
            .iter()
            .map(FieldDef::from_field)
            .collect::<Result<Vec<_>, _>>()?;

        let mut names = HashSet::new();
        let mut columns = HashSet::new();
        for field in &fields {
            if !names.insert(field.name_str()) {
                return Err(ValidationError::DuplicateField {
                    field: field.name_str()
                });
            }
            if !columns.insert(field.column.as_str()) {
                return Err(ValidationError::DuplicateColumn {
                    column: field.column.clone()
                });
            }
        }

        let keys: Vec<usize> = fields
            .iter()
            .enumerate()
            .filter(|(_, f)| f.primary_key)
            .map(|(i, _)| i)
            .collect();
        let id_index = match keys.as_slice() {
            [] => return Err(ValidationError::NoPrimaryKey),
            [index] => *index,
            _ => {
                return Err(ValidationError::MultiplePrimaryKeys {
                    fields: keys.iter().map(|&i| fields[i].name_str()).collect()
                });
            }
        };

        Ok(Self {
            ident,
            package,
            table: desc.table.trim().to_owned(),
            fields,
            imports,
            id_index
        })
    }

    /// Replace the table name (configuration override).
    #[must_use]
    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = table.into();
        self
    }

    /// Entity name.
    #[must_use]
    pub fn name(&self) -> &Ident {
        &self.ident
    }

    /// Entity name as string.
    #[must_use]
    pub fn name_str(&self) -> String {
        self.ident.to_string()
    }

    /// Entity name in snake case (`Book` -> `book`).
    #[must_use]
    pub fn snake(&self) -> String {
        self.name_str().to_case(Case::Snake)
    }

    /// Entity name in upper snake case (`BookAuthor` -> `BOOK_AUTHOR`).
    #[must_use]
    pub fn upper_snake(&self) -> String {
        self.snake().to_uppercase()
    }

    /// Identifier built from the entity name with a prefix and suffix.
    #[must_use]
    pub fn ident_with(&self, prefix: &str, suffix: &str) -> Ident {
        format_ident!("{}{}{}", prefix, self.ident, suffix)
    }

    /// Path to the entity type in generated code.
    #[must_use]
    pub fn entity_path(&self) -> TokenStream {
        let ident = &self.ident;
        match &self.package {
            Some(package) => quote! { #package::#ident },
            None => quote! { #ident }
        }
    }

    /// The primary key field.
    #[must_use]
    pub fn id_field(&self) -> &FieldDef {
        &self.fields[self.id_index]
    }

    /// All fields in descriptor order.
    #[must_use]
    pub fn all_fields(&self) -> &[FieldDef] {
        &self.fields
    }

    /// Fields written by `create`.
    #[must_use]
    pub fn insert_fields(&self) -> Vec<&FieldDef> {
        self.fields.iter().filter(|f| f.is_insertable()).collect()
    }

    /// Fields written by `update` and `patch`.
    #[must_use]
    pub fn update_fields(&self) -> Vec<&FieldDef> {
        self.fields.iter().filter(|f| f.is_updatable()).collect()
    }
}

fn parse_path(value: &str) -> Result<Path, ValidationError> {
    syn::parse_str::<Path>(value).map_err(|_| ValidationError::InvalidPath {
        value: value.to_owned()
    })
}

fn parse_import(path: &str, alias: &str) -> Result<Import, ValidationError> {
    let path = parse_path(path)?;
    let last = path.segments.last().map(|s| s.ident.to_string());
    let alias = match alias.trim() {
        "" => None,
        alias if Some(alias) == last.as_deref() => None,
        alias => Some(parse_ident(alias)?)
    };
    Ok(Import {
        path,
        alias
    })
}
