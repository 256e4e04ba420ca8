// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Renders the `Book` and `Note` repositories for both dialects into `OUT_DIR`.

use std::{env, error::Error, path::PathBuf};

use repokit::{Dialect, EntityDescriptor, Field, Generator, GeneratorConfig, write_units};

fn book() -> EntityDescriptor {
    EntityDescriptor::new("Book", "crate::model", "books")
        .import("chrono::DateTime", "")
        .import("chrono::Utc", "")
        .field(Field::new("id", "id", "i64").primary_key())
        .field(Field::new("title", "title", "String"))
        .field(Field::new("author", "author", "String"))
        .field(Field::new("created_at", "created_at", "DateTime<Utc>").skip_update())
        .field(Field::new("updated_at", "updated_at", "DateTime<Utc>"))
}

fn note() -> EntityDescriptor {
    EntityDescriptor::new("Note", "crate::model", "notes")
        .field(Field::new("id", "id", "i64").primary_key())
        .field(Field::new("body", "body", "Option<String>"))
        .field(Field::new("score", "score", "Option<i64>"))
        .field(Field::new("touched_at", "touched_at", "String").default_value("CURRENT_TIMESTAMP"))
}

fn main() -> Result<(), Box<dyn Error>> {
    println!("cargo:rerun-if-changed=build.rs");

    let out = PathBuf::from(env::var("OUT_DIR")?);
    for dialect in [Dialect::Generic, Dialect::Postgres] {
        let generator = Generator::new(GeneratorConfig::new(dialect));
        let units = [generator.render(&book())?, generator.render(&note())?];
        write_units(out.join(dialect.as_str()), &units)?;
    }
    Ok(())
}
