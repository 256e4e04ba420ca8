// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Entities and their generated repositories.
//!
//! `build.rs` renders every entity in [`model`] once per dialect; the units
//! are included into [`generic`] and [`postgres`].

pub mod model {
    //! Entity structs.

    use chrono::{DateTime, Utc};

    /// A book in the catalogue.
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct Book {
        pub id:         i64,
        pub title:      String,
        pub author:     String,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>
    }

    /// A free-form note; `touched_at` is always set by the database.
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct Note {
        pub id:         i64,
        pub body:       Option<String>,
        pub score:      Option<i64>,
        pub touched_at: String
    }
}

/// Repositories rendered for the generic dialect.
pub mod generic {
    include!(concat!(env!("OUT_DIR"), "/generic/book_repo.rs"));
    include!(concat!(env!("OUT_DIR"), "/generic/note_repo.rs"));
}

/// Repositories rendered for PostgreSQL.
pub mod postgres {
    include!(concat!(env!("OUT_DIR"), "/postgres/book_repo.rs"));
    include!(concat!(env!("OUT_DIR"), "/postgres/note_repo.rs"));
}
