// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Marker comments for generated units.
//!
//! Token streams cannot carry plain comments, so the header is prepended to
//! the rendered text.

use crate::entity::parse::{Dialect, EntityDef};

/// First line of every generated unit.
pub const GENERATED: &str = "// Code generated by repokit. DO NOT EDIT.";

/// Header comment for one entity's unit.
///
/// ```text
/// // Code generated by repokit. DO NOT EDIT.
/// // entity: Book, table: books, dialect: postgres
/// ```
pub fn header(entity: &EntityDef, dialect: Dialect) -> String {
    format!(
        "{GENERATED}\n// entity: {}, table: {}, dialect: {}\n\n",
        entity.name_str(),
        entity.table,
        dialect
    )
}

/// Check whether `source` starts with the generated marker.
pub fn is_generated(source: &str) -> bool {
    source.starts_with(GENERATED)
}
