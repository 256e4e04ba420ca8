// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! SQL dialect configuration.
//!
//! Both dialects go through one rendering pipeline; the differences are
//! captured by [`DialectCaps`].
//!
//! | Aspect | Generic | Postgres |
//! |--------|---------|----------|
//! | Placeholders | `?` | `$1, $2, ...` |
//! | New primary key | last insert id | `RETURNING "<pk>"` |
//! | `count` method | yes | no |

use std::{fmt, str::FromStr};

use proc_macro2::TokenStream;
use quote::quote;
use serde::Deserialize;

use crate::error::DialectError;

/// SQL dialect for code generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(try_from = "String")]
pub enum Dialect {
    /// MySQL, SQLite and other `?`-placeholder backends.
    Generic,

    /// PostgreSQL.
    #[default]
    Postgres
}

/// How `create` learns the new primary key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyRetrieval {
    /// Read the id reported by the execution result.
    LastInsertId,

    /// Append `RETURNING "<pk>"` and scan the single returned value.
    Returning
}

/// Dialect capabilities driving the generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DialectCaps {
    /// Dollar placeholders when true, `?` otherwise.
    pub dollar_placeholders: bool,

    /// Primary key retrieval strategy for `create`.
    pub key_retrieval: KeyRetrieval,

    /// Whether the repository exposes `count`.
    pub with_count: bool
}

impl Dialect {
    /// Capabilities for this dialect.
    #[must_use]
    pub const fn caps(self) -> DialectCaps {
        match self {
            Self::Generic => DialectCaps {
                dollar_placeholders: false,
                key_retrieval:       KeyRetrieval::LastInsertId,
                with_count:          true
            },
            Self::Postgres => DialectCaps {
                dollar_placeholders: true,
                key_retrieval:       KeyRetrieval::Returning,
                with_count:          false
            }
        }
    }

    /// Canonical selector string.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Generic => "generic",
            Self::Postgres => "postgres"
        }
    }
}

impl DialectCaps {
    /// `repokit_core::Placeholder` variant emitted into generated code.
    pub fn placeholder_tokens(&self) -> TokenStream {
        if self.dollar_placeholders {
            quote! { ::repokit_core::Placeholder::Dollar }
        } else {
            quote! { ::repokit_core::Placeholder::Question }
        }
    }
}

impl FromStr for Dialect {
    type Err = DialectError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "generic" | "mysql" | "sqlite" => Ok(Self::Generic),
            "postgres" | "postgresql" | "pg" => Ok(Self::Postgres),
            _ => Err(DialectError(value.to_owned()))
        }
    }
}

impl TryFrom<String> for Dialect {
    type Error = DialectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
