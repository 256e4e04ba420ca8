// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Composable query options.
//!
//! An option takes a statement builder and returns it with more data
//! attached. Generated repositories accept options instead of knowing every
//! filter up front:
//!
//! ```rust
//! use repokit_core::{Pagination, SelectBuilder, SelectOption, Sort, equal};
//!
//! let opts: [&dyn SelectOption; 3] = [
//!     &Pagination::new(10, 20),
//!     &equal("author", "ursula"),
//!     &Sort::by(["title"])
//! ];
//!
//! let mut builder = SelectBuilder::new("books", ["id", "title"]);
//! for opt in opts {
//!     builder = opt.compile_select(builder).unwrap();
//! }
//! let stmt = builder.build().unwrap();
//! assert_eq!(
//!     stmt.sql(),
//!     "SELECT id, title FROM books WHERE author = ? ORDER BY title LIMIT 10 OFFSET 20"
//! );
//! ```
//!
//! Options are applied in the order given; validation happens when an option
//! is applied, never when it is constructed.

use crate::{DeleteBuilder, Error, Predicate, SelectBuilder, UpdateBuilder, Value};

/// Transforms a `SELECT` builder.
pub trait SelectOption: Send + Sync {
    /// Attach this option to `builder`.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidOption`] when the option is malformed.
    fn compile_select(&self, builder: SelectBuilder) -> Result<SelectBuilder, Error>;
}

/// Transforms an `UPDATE` builder.
pub trait UpdateOption: Send + Sync {
    /// Attach this option to `builder`.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidOption`] when the option is malformed.
    fn compile_update(&self, builder: UpdateBuilder) -> Result<UpdateBuilder, Error>;
}

/// Transforms a `DELETE` builder.
pub trait DeleteOption: Send + Sync {
    /// Attach this option to `builder`.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidOption`] when the option is malformed.
    fn compile_delete(&self, builder: DeleteBuilder) -> Result<DeleteBuilder, Error>;
}

/// Closure-backed [`SelectOption`]. See [`select_fn`].
#[derive(Debug, Clone, Copy)]
pub struct SelectFn<F>(F);

/// Closure-backed [`UpdateOption`]. See [`update_fn`].
#[derive(Debug, Clone, Copy)]
pub struct UpdateFn<F>(F);

/// Closure-backed [`DeleteOption`]. See [`delete_fn`].
#[derive(Debug, Clone, Copy)]
pub struct DeleteFn<F>(F);

/// Wrap a closure as a [`SelectOption`].
///
/// ```rust
/// use repokit_core::{Predicate, SelectOption, select_fn};
///
/// let recent = select_fn(|b| Ok(b.and_where(Predicate::raw("created_at > now() - interval '1 day'", vec![]))));
/// # let _: &dyn SelectOption = &recent;
/// ```
pub const fn select_fn<F>(f: F) -> SelectFn<F>
where
    F: Fn(SelectBuilder) -> Result<SelectBuilder, Error> + Send + Sync
{
    SelectFn(f)
}

/// Wrap a closure as an [`UpdateOption`].
pub const fn update_fn<F>(f: F) -> UpdateFn<F>
where
    F: Fn(UpdateBuilder) -> Result<UpdateBuilder, Error> + Send + Sync
{
    UpdateFn(f)
}

/// Wrap a closure as a [`DeleteOption`].
pub const fn delete_fn<F>(f: F) -> DeleteFn<F>
where
    F: Fn(DeleteBuilder) -> Result<DeleteBuilder, Error> + Send + Sync
{
    DeleteFn(f)
}

impl<F> SelectOption for SelectFn<F>
where
    F: Fn(SelectBuilder) -> Result<SelectBuilder, Error> + Send + Sync
{
    fn compile_select(&self, builder: SelectBuilder) -> Result<SelectBuilder, Error> {
        (self.0)(builder)
    }
}

impl<F> UpdateOption for UpdateFn<F>
where
    F: Fn(UpdateBuilder) -> Result<UpdateBuilder, Error> + Send + Sync
{
    fn compile_update(&self, builder: UpdateBuilder) -> Result<UpdateBuilder, Error> {
        (self.0)(builder)
    }
}

impl<F> DeleteOption for DeleteFn<F>
where
    F: Fn(DeleteBuilder) -> Result<DeleteBuilder, Error> + Send + Sync
{
    fn compile_delete(&self, builder: DeleteBuilder) -> Result<DeleteBuilder, Error> {
        (self.0)(builder)
    }
}

/// Equality predicate on one column.
///
/// Usable as a select, update or delete option.
#[derive(Debug, Clone, PartialEq)]
pub struct Equal {
    column: String,
    value:  Value
}

/// Shorthand for [`Equal::new`].
pub fn equal(column: impl Into<String>, value: impl Into<Value>) -> Equal {
    Equal::new(column, value)
}

impl Equal {
    /// Create an equality option on `column`.
    pub fn new(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            column: column.into(),
            value:  value.into()
        }
    }

    /// Column compared.
    pub fn column(&self) -> &str {
        &self.column
    }

    /// Value compared against.
    pub const fn value(&self) -> &Value {
        &self.value
    }

    fn predicate(&self) -> Result<Predicate, Error> {
        if self.column.trim().is_empty() {
            return Err(Error::InvalidOption(
                "equality option requires a column name".into()
            ));
        }
        Ok(Predicate::eq(self.column.clone(), self.value.clone()))
    }
}

impl SelectOption for Equal {
    fn compile_select(&self, builder: SelectBuilder) -> Result<SelectBuilder, Error> {
        Ok(builder.and_where(self.predicate()?))
    }
}

impl UpdateOption for Equal {
    fn compile_update(&self, builder: UpdateBuilder) -> Result<UpdateBuilder, Error> {
        Ok(builder.and_where(self.predicate()?))
    }
}

impl DeleteOption for Equal {
    fn compile_delete(&self, builder: DeleteBuilder) -> Result<DeleteBuilder, Error> {
        Ok(builder.and_where(self.predicate()?))
    }
}

/// Pagination parameters for `find`.
///
/// A zero field means "not applied": `Pagination::default()` leaves the
/// statement untouched.
///
/// ```rust
/// use repokit_core::Pagination;
///
/// let first = Pagination::new(10, 0); // First 10 items
/// let third = Pagination::page(2, 25); // offset=50, limit=25
/// assert_eq!(third.offset, 50);
/// assert_eq!(Pagination::default(), Pagination::new(0, 0));
/// # let _ = first;
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Pagination {
    /// Maximum number of rows; zero for no limit.
    pub limit: u64,

    /// Number of rows to skip; zero for no offset.
    pub offset: u64
}

impl Pagination {
    /// Create pagination parameters.
    pub const fn new(limit: u64, offset: u64) -> Self {
        Self {
            limit,
            offset
        }
    }

    /// Pagination for a 0-indexed page.
    pub const fn page(page: u64, per_page: u64) -> Self {
        Self {
            limit:  per_page,
            offset: page.saturating_mul(per_page)
        }
    }
}

impl SelectOption for Pagination {
    fn compile_select(&self, builder: SelectBuilder) -> Result<SelectBuilder, Error> {
        Ok(builder.limit(self.limit).offset(self.offset))
    }
}

/// Sort direction for [`Sort`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    /// Ascending order; rendered as the bare column name.
    #[default]
    Asc,

    /// Descending order.
    Desc
}

impl SortDirection {
    /// Convert to SQL keyword.
    pub const fn as_sql(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC"
        }
    }
}

/// `ORDER BY` option over a list of columns, in the given order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Sort {
    columns:   Vec<String>,
    direction: SortDirection
}

impl Sort {
    /// Ascending sort on `columns`.
    pub fn by<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>
    {
        Self {
            columns:   columns.into_iter().map(Into::into).collect(),
            direction: SortDirection::Asc
        }
    }

    /// Switch every column to descending order.
    #[must_use]
    pub const fn desc(mut self) -> Self {
        self.direction = SortDirection::Desc;
        self
    }

    /// Sorted columns.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Direction applied to every column.
    pub const fn direction(&self) -> SortDirection {
        self.direction
    }
}

impl SelectOption for Sort {
    fn compile_select(&self, builder: SelectBuilder) -> Result<SelectBuilder, Error> {
        if self.columns.iter().any(|c| c.trim().is_empty()) {
            return Err(Error::InvalidOption("sort column must not be empty".into()));
        }
        let columns = self.columns.iter().map(|c| match self.direction {
            SortDirection::Asc => c.clone(),
            SortDirection::Desc => format!("{c} {}", self.direction.as_sql())
        });
        Ok(builder.order_by(columns))
    }
}

macro_rules! forward_option {
    ($trait:ident, $method:ident, $builder:ty) => {
        impl<T: $trait + ?Sized> $trait for &T {
            fn $method(&self, builder: $builder) -> Result<$builder, Error> {
                (**self).$method(builder)
            }
        }

        impl<T: $trait + ?Sized> $trait for Box<T> {
            fn $method(&self, builder: $builder) -> Result<$builder, Error> {
                (**self).$method(builder)
            }
        }

        impl<T: $trait> $trait for Vec<T> {
            fn $method(&self, builder: $builder) -> Result<$builder, Error> {
                self.iter().try_fold(builder, |b, opt| opt.$method(b))
            }
        }

        impl<T: $trait> $trait for Option<T> {
            fn $method(&self, builder: $builder) -> Result<$builder, Error> {
                match self {
                    Some(opt) => opt.$method(builder),
                    None => Ok(builder)
                }
            }
        }
    };
}

forward_option!(SelectOption, compile_select, SelectBuilder);
forward_option!(UpdateOption, compile_update, UpdateBuilder);
forward_option!(DeleteOption, compile_delete, DeleteBuilder);
