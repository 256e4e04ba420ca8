// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Entity metadata.
//!
//! The annotation scanner hands over an [`EntityDescriptor`] (plain strings,
//! serde-friendly). Validation turns it into an [`EntityDef`] with parsed
//! identifiers, paths and types, which is what the generators consume.
//!
//! # Module Structure
//!
//! - [`descriptor`] - Descriptor types as received from the scanner
//! - [`field`] - Validated field definition
//! - [`entity`] - Validated entity definition and derived names
//! - [`dialect`] - SQL dialect selection and capabilities
//!
//! # Data Structures
//!
//! ```text
//! EntityDef
//! ├── ident: Ident           (struct name, e.g., "Book")
//! ├── package: Option<Path>  (module holding the struct)
//! ├── table: String          (database table name)
//! ├── imports: Vec<Import>   (use items for the generated unit)
//! └── fields: Vec<FieldDef>
//!     └── FieldDef
//!         ├── ident: Ident               (field name)
//!         ├── column: String             (column name)
//!         ├── ty: Type                   (field type)
//!         ├── primary_key: bool
//!         ├── default_value: Option<String>
//!         └── skip_update: bool
//! ```

pub mod descriptor;
pub mod dialect;
pub mod entity;
pub mod field;

pub use descriptor::{EntityDescriptor, Field};
pub use dialect::{Dialect, DialectCaps, KeyRetrieval};
pub use entity::{EntityDef, Import};
pub use field::FieldDef;
