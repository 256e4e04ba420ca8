// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Repository implementation generation.
//!
//! Emits the implementation struct and its repository trait impl. The
//! dialect only changes the placeholder style, the key retrieval strategy
//! for `create` and whether `count` exists.
//!
//! # Supported Dialects
//!
//! | Dialect | Placeholders | New key | `count` |
//! |---------|--------------|---------|---------|
//! | Generic | `?` | `last_insert_id` | yes |
//! | PostgreSQL | `$1, $2, ...` | `RETURNING "<pk>"` | no |

mod context;
mod crud;
pub mod helpers;

use proc_macro2::TokenStream;
use quote::quote;

pub use self::context::Context;

/// Generate the implementation struct and trait impl.
pub fn generate(ctx: &Context<'_>) -> TokenStream {
    let Context {
        trait_name,
        impl_name,
        ..
    } = ctx;

    let count_impl = ctx.count_method();
    let find_impl = ctx.find_method();
    let create_impl = ctx.create_method();
    let update_impl = ctx.update_method();
    let patch_impl = ctx.patch_method();
    let delete_impl = ctx.delete_method();

    let doc = format!("Database-backed [`{trait_name}`].");

    quote! {
        #[doc = #doc]
        #[derive(Debug, Clone)]
        pub struct #impl_name<D> {
            db: D
        }

        impl<D> #impl_name<D> {
            /// Wrap a database handle.
            pub const fn new(db: D) -> Self {
                Self { db }
            }

            /// Underlying database handle.
            pub const fn db(&self) -> &D {
                &self.db
            }
        }

        #[::repokit_core::async_trait]
        impl<D> #trait_name for #impl_name<D>
        where
            D: ::repokit_core::Transactional
        {
            type Transaction = D::Transaction;

            #count_impl
            #find_impl
            #create_impl
            #update_impl
            #patch_impl
            #delete_impl
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::parse::{Dialect, EntityDef, EntityDescriptor, Field};

    fn book() -> EntityDef {
        let desc = EntityDescriptor::new("Book", "", "books")
            .field(Field::new("id", "id", "i64").primary_key())
            .field(Field::new("title", "title", "String"));
        EntityDef::from_descriptor(&desc).unwrap()
    }

    #[test]
    fn implements_trait_for_any_transactional() {
        let def = book();
        let tokens = generate(&Context::new(&def, Dialect::Postgres.caps())).to_string();
        assert!(tokens.contains("pub struct BookRepoImpl < D >"));
        assert!(tokens.contains("impl < D > BookRepo for BookRepoImpl < D >"));
        assert!(tokens.contains("type Transaction = D :: Transaction"));
        assert!(tokens.contains("async fn patch"));
        assert!(!tokens.contains("async fn count"));
    }

    #[test]
    fn generic_dialect_adds_count() {
        let def = book();
        let tokens = generate(&Context::new(&def, Dialect::Generic.caps())).to_string();
        assert!(tokens.contains("async fn count"));
    }
}
