// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Convenient re-exports for common usage.
//!
//! # Usage
//!
//! ```rust,ignore
//! use repokit_core::prelude::*;
//! ```

pub use crate::{
    DeleteOption, Equal, Error, FindError, Pagination, Scope, SelectOption, Sort, SortDirection,
    TransactionOps, Transactional, UnitOfWork, UpdateOption, async_trait, delete_fn, equal,
    select_fn, update_fn
};
