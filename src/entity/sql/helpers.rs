// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Helper functions for statement generation.
//!
//! - [`select_columns`] - column list for SELECT
//! - [`insert_values`] - `.value(..)` chain for INSERT
//! - [`update_sets`] - `.set(..)` chain for UPDATE
//! - [`patch_sets`] - zero-checked `set` statements for PATCH

use proc_macro2::TokenStream;
use quote::quote;

use super::context::Context;
use crate::entity::parse::FieldDef;

/// Column references for every field, in descriptor order.
///
/// ```rust,ignore
/// [BOOK_TABLE.id, BOOK_TABLE.title, BOOK_TABLE.author]
/// ```
pub fn select_columns(ctx: &Context<'_>, fields: &[FieldDef]) -> Vec<TokenStream> {
    fields.iter().map(|f| ctx.column(f)).collect()
}

/// Build the `.value(..)` chain for INSERT.
///
/// Fields with a default expression get `.value_expr(..)` instead.
///
/// ```rust,ignore
/// .value(BOOK_TABLE.title, ent.title.clone())
/// .value_expr(BOOK_TABLE.created_at, "now()")
/// ```
pub fn insert_values(ctx: &Context<'_>, fields: &[&FieldDef]) -> Vec<TokenStream> {
    fields
        .iter()
        .map(|f| {
            let column = ctx.column(f);
            let name = f.name();
            match &f.default_value {
                Some(expr) => quote! { .value_expr(#column, #expr) },
                None => quote! { .value(#column, ent.#name.clone()) }
            }
        })
        .collect()
}

/// Build the `.set(..)` chain for UPDATE.
///
/// ```rust,ignore
/// .set(BOOK_TABLE.title, ent.title.clone())
/// .set_expr(BOOK_TABLE.updated_at, "now()")
/// ```
pub fn update_sets(ctx: &Context<'_>, fields: &[&FieldDef]) -> Vec<TokenStream> {
    fields
        .iter()
        .map(|f| {
            let column = ctx.column(f);
            let name = f.name();
            match &f.default_value {
                Some(expr) => quote! { .set_expr(#column, #expr) },
                None => quote! { .set(#column, ent.#name.clone()) }
            }
        })
        .collect()
}

/// Build PATCH statements: default expressions are always set, other
/// fields only when non-zero.
///
/// ```rust,ignore
/// if !::repokit_core::IsZero::is_zero(&ent.title) {
///     builder = builder.set(BOOK_TABLE.title, ent.title.clone());
/// }
/// ```
pub fn patch_sets(ctx: &Context<'_>, fields: &[&FieldDef]) -> Vec<TokenStream> {
    fields
        .iter()
        .map(|f| {
            let column = ctx.column(f);
            let name = f.name();
            match &f.default_value {
                Some(expr) => quote! {
                    builder = builder.set_expr(#column, #expr);
                },
                None => quote! {
                    if !::repokit_core::IsZero::is_zero(&ent.#name) {
                        builder = builder.set(#column, ent.#name.clone());
                    }
                }
            }
        })
        .collect()
}
