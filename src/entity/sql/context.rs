// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Generation context for repository code.
//!
//! Contains the [`Context`] struct that precomputes all identifiers needed
//! by the method generators.

use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::Ident;

use crate::entity::parse::{DialectCaps, EntityDef, FieldDef};

/// Context for repository code generation.
///
/// # Fields
///
/// | Field | Example |
/// |-------|---------|
/// | `entity_ty` | `crate::model::Book` |
/// | `trait_name` | `BookRepo` |
/// | `impl_name` | `BookRepoImpl` |
/// | `columns_name` | `BookColumns` |
/// | `table_name` | `BOOK_TABLE_NAME` |
/// | `table_const` | `BOOK_TABLE` |
/// | `scanner` | `scan_book` |
pub struct Context<'a> {
    /// Reference to the validated entity.
    pub entity: &'a EntityDef,

    /// Dialect capabilities.
    pub caps: DialectCaps,

    /// Path to the entity type.
    pub entity_ty: TokenStream,

    /// Repository trait name.
    pub trait_name: Ident,

    /// Repository implementation struct name.
    pub impl_name: Ident,

    /// Columns struct name.
    pub columns_name: Ident,

    /// Table name constant.
    pub table_name: Ident,

    /// Columns constant.
    pub table_const: Ident,

    /// Row scanner function.
    pub scanner: Ident,

    /// Placeholder style expression.
    pub placeholder: TokenStream
}

impl<'a> Context<'a> {
    /// Create a new generation context.
    pub fn new(entity: &'a EntityDef, caps: DialectCaps) -> Self {
        let upper = entity.upper_snake();

        Self {
            entity,
            caps,
            entity_ty: entity.entity_path(),
            trait_name: entity.ident_with("", "Repo"),
            impl_name: entity.ident_with("", "RepoImpl"),
            columns_name: entity.ident_with("", "Columns"),
            table_name: format_ident!("{}_TABLE_NAME", upper),
            table_const: format_ident!("{}_TABLE", upper),
            scanner: format_ident!("scan_{}", entity.snake()),
            placeholder: caps.placeholder_tokens()
        }
    }

    /// Symbolic column reference, e.g. `BOOK_TABLE.title`.
    pub fn column(&self, field: &FieldDef) -> TokenStream {
        let table_const = &self.table_const;
        let name = field.name();
        quote! { #table_const.#name }
    }

    /// Symbolic reference to the primary key column.
    pub fn id_column(&self) -> TokenStream {
        self.column(self.entity.id_field())
    }
}
