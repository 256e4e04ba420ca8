// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Table constants and row scanner generation.
//!
//! # Generated Items
//!
//! For an entity `Book` stored in `books`:
//!
//! ```rust,ignore
//! pub const BOOK_TABLE_NAME: &str = "books";
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub struct BookColumns {
//!     pub id: &'static str,
//!     pub title: &'static str
//! }
//!
//! pub const BOOK_TABLE: BookColumns = BookColumns {
//!     id: "id",
//!     title: "title"
//! };
//!
//! fn scan_book(row: &::repokit_core::Row) -> Result<Book, ::repokit_core::Error> { .. }
//! ```
//!
//! Generated methods and caller-side options refer to columns through
//! `BOOK_TABLE.<field>`, so a renamed column only changes the constant.

use proc_macro2::TokenStream;
use quote::quote;

use super::sql::Context;

/// Generate the table name constant, the columns struct and its constant.
pub fn generate(ctx: &Context<'_>) -> TokenStream {
    let Context {
        entity,
        columns_name,
        table_name,
        table_const,
        ..
    } = ctx;
    let table = &entity.table;

    let struct_fields = entity.all_fields().iter().map(|f| {
        let name = f.name();
        let doc = format!("Column `{}`.", f.column);
        quote! {
            #[doc = #doc]
            pub #name: &'static str
        }
    });
    let values = entity.all_fields().iter().map(|f| {
        let name = f.name();
        let column = &f.column;
        quote! { #name: #column }
    });

    let table_doc = format!("Table backing `{}`.", entity.name_str());
    let columns_doc = format!("Column names of [`{}`].", table_name);

    quote! {
        #[doc = #table_doc]
        pub const #table_name: &str = #table;

        #[doc = #columns_doc]
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub struct #columns_name {
            #(#struct_fields),*
        }

        /// Column names, in declaration order.
        pub const #table_const: #columns_name = #columns_name {
            #(#values),*
        };
    }
}

/// Generate the row scanner.
///
/// Fields are decoded by column name, so the column order of the statement
/// does not matter.
pub fn scanner(ctx: &Context<'_>) -> TokenStream {
    let Context {
        entity,
        entity_ty,
        scanner,
        ..
    } = ctx;

    let assigns = entity.all_fields().iter().map(|f| {
        let name = f.name();
        let ty = f.ty();
        let column = ctx.column(f);
        quote! { ent.#name = row.get::<#ty>(#column)?; }
    });

    quote! {
        #[allow(clippy::field_reassign_with_default)]
        fn #scanner(row: &::repokit_core::Row) -> Result<#entity_ty, ::repokit_core::Error> {
            let mut ent = <#entity_ty as ::core::default::Default>::default();
            #(#assigns)*
            Ok(ent)
        }
    }
}
