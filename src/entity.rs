// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Repository code generation.
//!
//! Orchestrates the generators for one validated entity and one dialect.
//!
//! # Architecture
//!
//! ```text
//! entity.rs (orchestrator)
//! │
//! ├── parse/         → Descriptor, validation, dialect capabilities
//! │
//! ├── columns.rs     → Table constants, columns struct, row scanner
//! ├── repository.rs  → Repository trait definition
//! │
//! └── sql/           → Implementation struct and method bodies
//!     ├── context.rs → Precomputed identifiers
//!     ├── crud.rs    → count, find, create, update, patch, delete
//!     └── helpers.rs → Column lists and value chains
//! ```
//!
//! # Generated Code
//!
//! | Item | Purpose |
//! |------|---------|
//! | `use ...;` | Imports listed in the descriptor |
//! | `BOOK_TABLE_NAME` | Table name constant |
//! | `BookColumns`, `BOOK_TABLE` | Symbolic column names |
//! | `BookRepo` | Async repository trait |
//! | `BookRepoImpl<D>` | Implementation over any transactional database |
//! | `scan_book` | Row to entity decoder |

mod columns;
pub mod parse;
mod repository;
mod sql;

use proc_macro2::TokenStream;
use quote::quote;

use self::{
    parse::{DialectCaps, EntityDef},
    sql::Context
};

/// Generate the complete repository unit for an entity.
///
/// The output has no inner attributes, so it can be `include!`d into any
/// module.
pub fn generate(entity: &EntityDef, caps: DialectCaps) -> TokenStream {
    let ctx = Context::new(entity, caps);

    let imports = imports(entity);
    let columns = columns::generate(&ctx);
    let repository = repository::generate(&ctx);
    let sql = sql::generate(&ctx);
    let scanner = columns::scanner(&ctx);

    quote! {
        #imports
        #columns
        #repository
        #sql
        #scanner
    }
}

/// Generate `use` items for the descriptor imports.
fn imports(entity: &EntityDef) -> TokenStream {
    let items = entity.imports.iter().map(|import| {
        let path = &import.path;
        match &import.alias {
            Some(alias) => quote! {
                #[allow(unused_imports)]
                use #path as #alias;
            },
            None => quote! {
                #[allow(unused_imports)]
                use #path;
            }
        }
    });
    quote! { #(#items)* }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::parse::{Dialect, EntityDescriptor, Field};

    fn book() -> EntityDef {
        let desc = EntityDescriptor::new("Book", "crate::model", "books")
            .import("chrono::DateTime", "")
            .import("chrono::Utc", "Tz")
            .field(Field::new("id", "id", "i64").primary_key())
            .field(Field::new("title", "title", "String"));
        EntityDef::from_descriptor(&desc).unwrap()
    }

    #[test]
    fn imports_emitted_with_aliases() {
        let tokens = imports(&book()).to_string();
        assert!(tokens.contains("use chrono :: DateTime ;"));
        assert!(tokens.contains("use chrono :: Utc as Tz ;"));
    }

    #[test]
    fn unit_contains_every_item() {
        let tokens = generate(&book(), Dialect::Postgres.caps()).to_string();
        for item in [
            "BOOK_TABLE_NAME",
            "pub struct BookColumns",
            "pub trait BookRepo",
            "pub struct BookRepoImpl",
            "fn scan_book"
        ] {
            assert!(tokens.contains(item), "missing {item}");
        }
        assert!(!tokens.contains("# !"));
    }

    #[test]
    fn output_parses_as_file() {
        for dialect in [Dialect::Generic, Dialect::Postgres] {
            let tokens = generate(&book(), dialect.caps());
            assert!(syn::parse2::<syn::File>(tokens).is_ok());
        }
    }
}
