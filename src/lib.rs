// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! # repokit
//!
//! Build-time repository generator.
//!
//! Given an [`EntityDescriptor`] and a dialect, renders a Rust source unit
//! with a repository trait and its implementation over
//! [`repokit-core`](https://docs.rs/repokit-core).
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! // build.rs
//! use repokit::{EntityDescriptor, Field};
//!
//! let book = EntityDescriptor::new("Book", "crate::model", "books")
//!     .import("chrono::DateTime", "")
//!     .import("chrono::Utc", "")
//!     .field(Field::new("id", "id", "i64").primary_key())
//!     .field(Field::new("title", "title", "String"))
//!     .field(Field::new("created_at", "created_at", "DateTime<Utc>").skip_update());
//!
//! let source = repokit::render(&book, "postgres")?;
//! std::fs::write(out_dir.join("book_repo.rs"), source)?;
//! ```
//!
//! Generates `BOOK_TABLE_NAME`, `BookColumns`/`BOOK_TABLE`, the `BookRepo`
//! trait and `BookRepoImpl<D>` for any `D: repokit_core::Transactional`.
//!
//! ## Many Entities
//!
//! ```rust,ignore
//! let config = repokit::GeneratorConfig::from_file("repokit.toml")?;
//! let rendered = repokit::Generator::new(config).render_all(&descriptors);
//! let units: Vec<_> = rendered.into_iter().filter_map(|r| r.result.ok()).collect();
//! repokit::write_units("src/repo", &units)?;
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod entity;
pub mod error;
pub mod generator;
mod utils;
pub mod writer;

use proc_macro2::TokenStream;

pub use crate::{
    config::GeneratorConfig,
    entity::parse::{Dialect, DialectCaps, EntityDef, EntityDescriptor, Field, KeyRetrieval},
    error::{DialectError, GenerateError, Result, ValidationError},
    generator::{Generator, Rendered},
    writer::{Unit, format_code, write_units}
};

/// Render one entity for a dialect given by name.
///
/// # Errors
///
/// [`GenerateError::Dialect`] for an unknown selector, then the errors of
/// [`Generator::render`].
pub fn render(desc: &EntityDescriptor, dialect: &str) -> Result<String> {
    let dialect: Dialect = dialect.parse()?;
    Generator::new(GeneratorConfig::new(dialect))
        .render(desc)
        .map(|unit| unit.source)
}

/// Render one entity to tokens, without header or formatting.
///
/// # Errors
///
/// Same as [`Generator::render`].
pub fn render_tokens(desc: &EntityDescriptor, dialect: Dialect) -> Result<TokenStream> {
    let def = Generator::new(GeneratorConfig::new(dialect)).prepare(desc)?;
    Ok(entity::generate(&def, dialect.caps()))
}
