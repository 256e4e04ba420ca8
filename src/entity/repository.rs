// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Repository trait generation.
//!
//! Every method takes the caller's `Scope` first, so
//! a call made with the scope of an open unit of work joins its
//! transaction instead of starting a new one.

use proc_macro2::TokenStream;
use quote::quote;

use super::sql::Context;

/// Generate the repository trait for the entity.
pub fn generate(ctx: &Context<'_>) -> TokenStream {
    let Context {
        entity,
        entity_ty,
        trait_name,
        caps,
        ..
    } = ctx;

    let doc = format!(
        "Repository for `{}` rows in table `{}`.",
        entity.name_str(),
        entity.table
    );

    let count_method = if caps.with_count {
        quote! {
            /// Count rows matching every option.
            async fn count(
                &self,
                scope: &::repokit_core::Scope<Self::Transaction>,
                opts: &[&dyn ::repokit_core::SelectOption]
            ) -> Result<i64, ::repokit_core::Error>;
        }
    } else {
        TokenStream::new()
    };

    quote! {
        #[doc = #doc]
        #[::repokit_core::async_trait]
        pub trait #trait_name: Send + Sync {
            /// Transaction type joined through [`Scope`](::repokit_core::Scope).
            type Transaction: ::repokit_core::TransactionOps;

            #count_method

            /// Select rows matching every option, in order.
            ///
            /// A row that fails to decode stops the scan; rows decoded
            /// before it are kept in the error.
            async fn find(
                &self,
                scope: &::repokit_core::Scope<Self::Transaction>,
                opts: &[&dyn ::repokit_core::SelectOption]
            ) -> Result<Vec<#entity_ty>, ::repokit_core::FindError<#entity_ty>>;

            /// Insert a row and return the generated primary key.
            async fn create(
                &self,
                scope: &::repokit_core::Scope<Self::Transaction>,
                ent: &#entity_ty
            ) -> Result<i64, ::repokit_core::Error>;

            /// Overwrite every updatable column; returns affected rows.
            async fn update(
                &self,
                scope: &::repokit_core::Scope<Self::Transaction>,
                ent: &#entity_ty,
                opt: Option<&dyn ::repokit_core::UpdateOption>
            ) -> Result<u64, ::repokit_core::Error>;

            /// Set only the updatable columns whose value is non-zero;
            /// returns affected rows.
            async fn patch(
                &self,
                scope: &::repokit_core::Scope<Self::Transaction>,
                ent: &#entity_ty,
                opt: Option<&dyn ::repokit_core::UpdateOption>
            ) -> Result<u64, ::repokit_core::Error>;

            /// Delete matching rows; returns affected rows.
            async fn delete(
                &self,
                scope: &::repokit_core::Scope<Self::Transaction>,
                opt: Option<&dyn ::repokit_core::DeleteOption>
            ) -> Result<u64, ::repokit_core::Error>;
        }
    }
}
