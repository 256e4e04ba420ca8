// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Rendering driver.
//!
//! A [`Generator`] applies one [`GeneratorConfig`] to any number of entity
//! descriptors. Each entity is rendered on its own: a bad descriptor fails
//! that entity only.

use tracing::{debug, warn};

use crate::{
    config::GeneratorConfig,
    entity::{
        self,
        parse::{Dialect, EntityDef, EntityDescriptor}
    },
    error::{GenerateError, Result},
    utils::marker,
    writer::{Unit, format_code}
};

/// Outcome of rendering one entity.
#[derive(Debug)]
pub struct Rendered {
    /// Entity name as given in the descriptor.
    pub entity: String,
    /// The unit, or why it could not be rendered.
    pub result: Result<Unit>
}

/// Repository generator for one configuration.
#[derive(Debug, Clone, Default)]
pub struct Generator {
    config: GeneratorConfig
}

impl Generator {
    /// Create a generator.
    #[must_use]
    pub const fn new(config: GeneratorConfig) -> Self {
        Self { config }
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Dialect being rendered.
    #[must_use]
    pub const fn dialect(&self) -> Dialect {
        self.config.dialect
    }

    /// Validate `desc` and apply the table configuration.
    ///
    /// # Errors
    ///
    /// [`GenerateError::Template`] when the descriptor has no fields or no
    /// primary key, [`GenerateError::Validation`] for any other problem.
    pub fn prepare(&self, desc: &EntityDescriptor) -> Result<EntityDef> {
        if desc.fields.is_empty() {
            return Err(GenerateError::template(&desc.name, "no fields"));
        }
        if desc.primary_keys().next().is_none() {
            return Err(GenerateError::template(&desc.name, "no primary key"));
        }

        let def = EntityDef::from_descriptor(desc)
            .map_err(|e| GenerateError::validation(&desc.name, e))?;
        let table = self.config.table_for(&desc.name, &def.table);
        Ok(def.with_table(table))
    }

    /// Render one entity.
    ///
    /// # Errors
    ///
    /// See [`prepare`](Self::prepare).
    pub fn render(&self, desc: &EntityDescriptor) -> Result<Unit> {
        let def = self.prepare(desc)?;
        let dialect = self.dialect();
        let tokens = entity::generate(&def, dialect.caps());

        let mut source = marker::header(&def, dialect);
        source.push_str(&format_code(&tokens.to_string()));

        debug!(
            entity = %def.name_str(),
            table = %def.table,
            dialect = %dialect,
            "entity rendered"
        );

        Ok(Unit {
            entity: def.name_str(),
            file_name: format!("{}_repo.rs", def.snake()),
            source
        })
    }

    /// Render every entity, collecting per-entity results in input order.
    pub fn render_all<'a, I>(&self, descs: I) -> Vec<Rendered>
    where
        I: IntoIterator<Item = &'a EntityDescriptor>
    {
        descs
            .into_iter()
            .map(|desc| {
                let result = self.render(desc);
                if let Err(err) = &result {
                    warn!(entity = %desc.name, error = %err, "entity skipped");
                }
                Rendered {
                    entity: desc.name.clone(),
                    result
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{entity::parse::Field, error::ValidationError};

    fn book() -> EntityDescriptor {
        EntityDescriptor::new("Book", "crate::model", "books")
            .field(Field::new("id", "id", "i64").primary_key())
            .field(Field::new("title", "title", "String"))
    }

    #[test]
    fn render_names_unit_after_entity() {
        let unit = Generator::default().render(&book()).unwrap();
        assert_eq!(unit.entity, "Book");
        assert_eq!(unit.file_name, "book_repo.rs");
        assert!(marker::is_generated(&unit.source));
        assert!(unit.source.contains("dialect: postgres"));
    }

    #[test]
    fn config_rewrites_table() {
        let config = GeneratorConfig::new(Dialect::Generic).schema("library");
        let def = Generator::new(config).prepare(&book()).unwrap();
        assert_eq!(def.table, "library.books");
    }

    #[test]
    fn missing_fields_is_template_error() {
        let desc = EntityDescriptor::new("Book", "", "books");
        let err = Generator::default().render(&desc).unwrap_err();
        assert!(matches!(err, GenerateError::Template { reason, .. } if reason == "no fields"));
    }

    #[test]
    fn missing_primary_key_is_template_error() {
        let desc = EntityDescriptor::new("Book", "", "books").field(Field::new("id", "id", "i64"));
        let err = Generator::default().render(&desc).unwrap_err();
        assert!(matches!(err, GenerateError::Template { reason, .. } if reason == "no primary key"));
    }

    #[test]
    fn invalid_descriptor_is_validation_error() {
        let desc = book().field(Field::new("again", "title", "String"));
        let err = Generator::default().render(&desc).unwrap_err();
        assert!(matches!(
            err,
            GenerateError::Validation {
                source: ValidationError::DuplicateColumn { .. },
                ..
            }
        ));
    }

    #[test]
    fn one_failure_does_not_stop_the_run() {
        let broken = EntityDescriptor::new("Broken", "", "broken");
        let descs = [book(), broken];
        let rendered = Generator::default().render_all(&descs);
        assert_eq!(rendered.len(), 2);
        assert!(rendered[0].result.is_ok());
        assert_eq!(rendered[1].entity, "Broken");
        assert!(rendered[1].result.is_err());
    }
}
