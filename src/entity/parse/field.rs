// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Validated field definition.

use syn::{Ident, Type};

use super::Field;
use crate::error::ValidationError;

/// Field with its name and type parsed.
#[derive(Debug, Clone)]
pub struct FieldDef {
    /// Field identifier (e.g., `id`, `title`, `created_at`).
    pub ident: Ident,

    /// Column name.
    pub column: String,

    /// Field type (e.g., `i64`, `Option<String>`, `DateTime<Utc>`).
    pub ty: Type,

    /// Primary key flag.
    pub primary_key: bool,

    /// Default SQL expression, emitted verbatim.
    pub default_value: Option<String>,

    /// Excluded from `update` and `patch`.
    pub skip_update: bool
}

impl FieldDef {
    /// Parse and validate a descriptor field.
    ///
    /// # Errors
    ///
    /// [`ValidationError`] when the name is not an identifier, the column is
    /// empty or the type does not parse.
    pub fn from_field(field: &Field) -> Result<Self, ValidationError> {
        let ident = parse_ident(&field.name)?;

        if field.column.trim().is_empty() {
            return Err(ValidationError::EmptyColumn {
                field: field.name.clone()
            });
        }

        let ty = syn::parse_str::<Type>(&field.ty).map_err(|e| ValidationError::InvalidType {
            field:  field.name.clone(),
            ty:     field.ty.clone(),
            reason: e.to_string()
        })?;

        let default_value = field
            .default_value
            .as_deref()
            .map(str::trim)
            .filter(|expr| !expr.is_empty())
            .map(str::to_owned);

        Ok(Self {
            ident,
            column: field.column.clone(),
            ty,
            primary_key: field.primary_key,
            default_value,
            skip_update: field.skip_update
        })
    }

    /// Field identifier.
    #[must_use]
    pub fn name(&self) -> &Ident {
        &self.ident
    }

    /// Field name as string.
    #[must_use]
    pub fn name_str(&self) -> String {
        self.ident.to_string()
    }

    /// Field type.
    #[must_use]
    pub fn ty(&self) -> &Type {
        &self.ty
    }

    /// Written by `create`.
    #[must_use]
    pub fn is_insertable(&self) -> bool {
        !self.primary_key
    }

    /// Written by `update` and `patch`.
    #[must_use]
    pub fn is_updatable(&self) -> bool {
        !self.primary_key && !self.skip_update
    }
}

/// Parse a Rust identifier, rejecting keywords.
pub(crate) fn parse_ident(value: &str) -> Result<Ident, ValidationError> {
    syn::parse_str::<Ident>(value).map_err(|_| ValidationError::InvalidIdentifier {
        value: value.to_owned()
    })
}
