// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Run-time support for repokit generated repositories.
//!
//! Generated code links against this crate only; it never talks to a
//! database driver directly.
//!
//! # Overview
//!
//! - [`SelectBuilder`], [`UpdateBuilder`], [`DeleteBuilder`],
//!   [`InsertBuilder`] - statement builders that own clause placement
//! - [`SelectOption`], [`UpdateOption`], [`DeleteOption`] - composable query
//!   options ([`Equal`], [`Pagination`], [`Sort`], closures)
//! - [`UnitOfWork`] and [`Scope`] - transaction-scoped execution
//! - [`Value`], [`Row`], [`FromValue`], [`IsZero`] - backend-neutral values
//! - [`prelude`] - convenient re-exports
//!
//! # Backends
//!
//! | Feature | Pool | Placeholder |
//! |---------|------|-------------|
//! | `postgres` | `sqlx::PgPool` | `$1` |
//! | `mysql` | `sqlx::MySqlPool` | `?` |
//! | `mock` | [`MockDatabase`] | any |

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
#![warn(clippy::all)]

mod builder;
mod error;
mod option;
pub mod prelude;
mod transaction;
mod value;

#[cfg(any(test, feature = "mock"))]
#[cfg_attr(docsrs, doc(cfg(feature = "mock")))]
mod mock;
#[cfg(feature = "mysql")]
mod mysql;
#[cfg(feature = "postgres")]
mod postgres;

/// Re-export async_trait for generated code.
pub use async_trait::async_trait;
pub use builder::{
    Assignment, DeleteBuilder, InsertBuilder, Placeholder, Predicate, SelectBuilder, Statement,
    UpdateBuilder
};
pub use error::{BoxError, Error, FindError};
#[cfg(any(test, feature = "mock"))]
pub use mock::{MockDatabase, MockError, MockTransaction};
pub use option::{
    DeleteFn, DeleteOption, Equal, Pagination, SelectFn, SelectOption, Sort, SortDirection,
    UpdateFn, UpdateOption, delete_fn, equal, select_fn, update_fn
};
pub use transaction::{Scope, TransactionOps, Transactional, UnitOfWork, fetch_all};
pub use value::{Executed, FromValue, IsZero, Row, Value};
