// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Repository method generators.
//!
//! | Method | Statement | Unit of work |
//! |--------|-----------|--------------|
//! | [`count`](Context::count_method) | `SELECT count(*) FROM ...` | reads through scope |
//! | [`find`](Context::find_method) | `SELECT ... FROM ...` | reads through scope |
//! | [`create`](Context::create_method) | `INSERT INTO ... VALUES ...` | yes |
//! | [`update`](Context::update_method) | `UPDATE ... SET ...` | yes |
//! | [`patch`](Context::patch_method) | `UPDATE ... SET ...` (non-zero fields) | yes |
//! | [`delete`](Context::delete_method) | `DELETE FROM ...` | yes |
//!
//! Write methods share one shape: acquire a unit of work, run the body in an
//! async block, hand the block's result to `finish`.

use proc_macro2::TokenStream;
use quote::quote;

use super::{
    context::Context,
    helpers::{insert_values, patch_sets, select_columns, update_sets}
};
use crate::entity::parse::KeyRetrieval;

/// Wrap a write body in a unit of work.
fn in_unit_of_work(result_ty: &TokenStream, body: &TokenStream) -> TokenStream {
    quote! {
        let uow = ::repokit_core::UnitOfWork::acquire(scope, &self.db).await?;
        let result: Result<#result_ty, ::repokit_core::Error> = async {
            #body
        }
        .await;
        uow.finish(result).await
    }
}

impl Context<'_> {
    /// Generate the `count` method (generic dialect only).
    ///
    /// # Returns
    ///
    /// Empty `TokenStream` when the dialect has no `count`.
    pub fn count_method(&self) -> TokenStream {
        if !self.caps.with_count {
            return TokenStream::new();
        }

        let Self {
            table_name,
            placeholder,
            ..
        } = self;

        quote! {
            async fn count(
                &self,
                scope: &::repokit_core::Scope<Self::Transaction>,
                opts: &[&dyn ::repokit_core::SelectOption]
            ) -> Result<i64, ::repokit_core::Error> {
                let mut builder = ::repokit_core::SelectBuilder::count(#table_name)
                    .placeholder(#placeholder);
                for opt in opts {
                    builder = ::repokit_core::SelectOption::compile_select(*opt, builder)?;
                }
                let rows = ::repokit_core::fetch_all(&self.db, scope, builder.build()?).await?;
                rows.first()
                    .ok_or(::repokit_core::Error::RowNotFound)?
                    .get_index::<i64>(0)
            }
        }
    }

    /// Generate the `find` method.
    ///
    /// Rows scanned before a failure are returned inside the error.
    pub fn find_method(&self) -> TokenStream {
        let Self {
            entity_ty,
            table_name,
            scanner,
            placeholder,
            entity,
            ..
        } = self;
        let columns = select_columns(self, entity.all_fields());

        quote! {
            async fn find(
                &self,
                scope: &::repokit_core::Scope<Self::Transaction>,
                opts: &[&dyn ::repokit_core::SelectOption]
            ) -> Result<Vec<#entity_ty>, ::repokit_core::FindError<#entity_ty>> {
                let mut builder = ::repokit_core::SelectBuilder::new(#table_name, [#(#columns),*])
                    .placeholder(#placeholder);
                for opt in opts {
                    builder = ::repokit_core::SelectOption::compile_select(*opt, builder)?;
                }
                let rows = ::repokit_core::fetch_all(&self.db, scope, builder.build()?).await?;

                let mut list = Vec::with_capacity(rows.len());
                for row in &rows {
                    match #scanner(row) {
                        Ok(ent) => list.push(ent),
                        Err(err) => return Err(::repokit_core::FindError::new(list, err))
                    }
                }
                Ok(list)
            }
        }
    }

    /// Generate the `create` method.
    ///
    /// # Key Retrieval
    ///
    /// | Strategy | Generated |
    /// |----------|-----------|
    /// | `Returning` | `RETURNING "<pk>"`, scan the single returned column |
    /// | `LastInsertId` | read `last_insert_id` from the execution result |
    pub fn create_method(&self) -> TokenStream {
        let Self {
            entity_ty,
            table_name,
            placeholder,
            entity,
            caps,
            ..
        } = self;
        let values = insert_values(self, &entity.insert_fields());
        let id_column = self.id_column();

        let body = match caps.key_retrieval {
            KeyRetrieval::Returning => quote! {
                let statement = ::repokit_core::InsertBuilder::new(#table_name)
                    #(#values)*
                    .returning(#id_column)
                    .placeholder(#placeholder)
                    .build()?;
                let row = uow.fetch_one(statement).await?;
                let id = row.get::<i64>(#id_column)?;
                Ok(id)
            },
            KeyRetrieval::LastInsertId => quote! {
                let statement = ::repokit_core::InsertBuilder::new(#table_name)
                    #(#values)*
                    .placeholder(#placeholder)
                    .build()?;
                let executed = uow.execute(statement).await?;
                let id = executed
                    .last_insert_id
                    .ok_or(::repokit_core::Error::MissingInsertId)?;
                Ok(id)
            }
        };
        let body = in_unit_of_work(&quote! { i64 }, &body);

        quote! {
            async fn create(
                &self,
                scope: &::repokit_core::Scope<Self::Transaction>,
                ent: &#entity_ty
            ) -> Result<i64, ::repokit_core::Error> {
                #body
            }
        }
    }

    /// Generate the `update` method: every updatable field is set.
    pub fn update_method(&self) -> TokenStream {
        let Self {
            entity_ty,
            table_name,
            placeholder,
            entity,
            ..
        } = self;
        let sets = update_sets(self, &entity.update_fields());

        let body = in_unit_of_work(
            &quote! { u64 },
            &quote! {
                let mut builder = ::repokit_core::UpdateBuilder::new(#table_name)
                    #(#sets)*
                    .placeholder(#placeholder);
                if let Some(opt) = opt {
                    builder = ::repokit_core::UpdateOption::compile_update(opt, builder)?;
                }
                let executed = uow.execute(builder.build()?).await?;
                Ok(executed.rows_affected)
            }
        );

        quote! {
            async fn update(
                &self,
                scope: &::repokit_core::Scope<Self::Transaction>,
                ent: &#entity_ty,
                opt: Option<&dyn ::repokit_core::UpdateOption>
            ) -> Result<u64, ::repokit_core::Error> {
                #body
            }
        }
    }

    /// Generate the `patch` method: only non-zero fields are set.
    pub fn patch_method(&self) -> TokenStream {
        let Self {
            entity_ty,
            table_name,
            placeholder,
            entity,
            ..
        } = self;
        let sets = patch_sets(self, &entity.update_fields());

        let body = in_unit_of_work(
            &quote! { u64 },
            &quote! {
                let mut builder = ::repokit_core::UpdateBuilder::new(#table_name)
                    .placeholder(#placeholder);
                #(#sets)*
                if let Some(opt) = opt {
                    builder = ::repokit_core::UpdateOption::compile_update(opt, builder)?;
                }
                let executed = uow.execute(builder.build()?).await?;
                Ok(executed.rows_affected)
            }
        );

        quote! {
            async fn patch(
                &self,
                scope: &::repokit_core::Scope<Self::Transaction>,
                ent: &#entity_ty,
                opt: Option<&dyn ::repokit_core::UpdateOption>
            ) -> Result<u64, ::repokit_core::Error> {
                #body
            }
        }
    }

    /// Generate the `delete` method.
    pub fn delete_method(&self) -> TokenStream {
        let Self {
            table_name,
            placeholder,
            ..
        } = self;

        let body = in_unit_of_work(
            &quote! { u64 },
            &quote! {
                let mut builder = ::repokit_core::DeleteBuilder::new(#table_name)
                    .placeholder(#placeholder);
                if let Some(opt) = opt {
                    builder = ::repokit_core::DeleteOption::compile_delete(opt, builder)?;
                }
                let executed = uow.execute(builder.build()?).await?;
                Ok(executed.rows_affected)
            }
        );

        quote! {
            async fn delete(
                &self,
                scope: &::repokit_core::Scope<Self::Transaction>,
                opt: Option<&dyn ::repokit_core::DeleteOption>
            ) -> Result<u64, ::repokit_core::Error> {
                #body
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::parse::{Dialect, EntityDef, EntityDescriptor, Field};

    fn book() -> EntityDef {
        let desc = EntityDescriptor::new("Book", "crate::model", "books")
            .field(Field::new("id", "id", "i64").primary_key())
            .field(Field::new("title", "title", "String"))
            .field(Field::new("author", "author", "String"))
            .field(Field::new("created_at", "created_at", "DateTime<Utc>").skip_update())
            .field(Field::new("updated_at", "updated_at", "DateTime<Utc>"));
        EntityDef::from_descriptor(&desc).unwrap()
    }

    #[test]
    fn count_only_for_generic() {
        let def = book();
        assert!(Context::new(&def, Dialect::Postgres.caps()).count_method().is_empty());

        let count = Context::new(&def, Dialect::Generic.caps())
            .count_method()
            .to_string();
        assert!(count.contains("async fn count"));
        assert!(count.contains("SelectBuilder :: count (BOOK_TABLE_NAME)"));
        assert!(count.contains("Placeholder :: Question"));
    }

    #[test]
    fn find_keeps_partial_rows() {
        let def = book();
        let find = Context::new(&def, Dialect::Postgres.caps())
            .find_method()
            .to_string();
        assert!(find.contains("FindError :: new (list , err)"));
        assert!(find.contains("scan_book (row)"));
        assert!(find.contains("compile_select (* opt , builder)"));
        assert!(find.contains("Placeholder :: Dollar"));
    }

    #[test]
    fn create_returning_for_postgres() {
        let def = book();
        let create = Context::new(&def, Dialect::Postgres.caps())
            .create_method()
            .to_string();
        assert!(create.contains(". returning (BOOK_TABLE . id)"));
        assert!(create.contains("fetch_one (statement)"));
        assert!(!create.contains("last_insert_id"));
        assert!(!create.contains("BOOK_TABLE . id , ent . id"));
    }

    #[test]
    fn create_last_insert_id_for_generic() {
        let def = book();
        let create = Context::new(&def, Dialect::Generic.caps())
            .create_method()
            .to_string();
        assert!(create.contains("last_insert_id"));
        assert!(create.contains("MissingInsertId"));
        assert!(!create.contains("returning"));
        assert_eq!(create.matches(". value (").count(), 4);
    }

    #[test]
    fn update_skips_primary_key_and_skip_update() {
        let def = book();
        let update = Context::new(&def, Dialect::Postgres.caps())
            .update_method()
            .to_string();
        assert_eq!(update.matches(". set (").count(), 3);
        assert!(!update.contains("BOOK_TABLE . created_at"));
        assert!(!update.contains("BOOK_TABLE . id"));
        assert!(update.contains("UnitOfWork :: acquire (scope , & self . db)"));
        assert!(update.contains("Result < u64 , :: repokit_core :: Error > = async"));
        assert!(update.contains("uow . finish (result)"));
    }

    #[test]
    fn patch_checks_every_field() {
        let def = book();
        let patch = Context::new(&def, Dialect::Postgres.caps())
            .patch_method()
            .to_string();
        assert_eq!(patch.matches("is_zero").count(), 3);
    }

    #[test]
    fn delete_applies_option() {
        let def = book();
        let delete = Context::new(&def, Dialect::Generic.caps())
            .delete_method()
            .to_string();
        assert!(delete.contains("DeleteBuilder :: new (BOOK_TABLE_NAME)"));
        assert!(delete.contains("compile_delete (opt , builder)"));
    }
}
