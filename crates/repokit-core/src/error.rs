// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Run-time error taxonomy.
//!
//! | Variant | Raised by |
//! |---------|-----------|
//! | [`Error::InvalidOption`] | A query option applied to a builder |
//! | [`Error::InvalidStatement`] | A builder asked to render an impossible statement |
//! | [`Error::TransactionStart`] | [`UnitOfWork::acquire`](crate::UnitOfWork::acquire) |
//! | [`Error::TransactionFinalize`] | [`UnitOfWork::finish`](crate::UnitOfWork::finish) |
//! | [`Error::Database`] | The backend while executing a statement |
//!
//! Operational errors from the backend are wrapped transparently, so their
//! message reaches the caller unchanged.

use std::fmt;

use thiserror::Error;

/// Boxed error produced by a database driver.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors raised by generated repositories and their support code.
#[derive(Debug, Error)]
pub enum Error {
    /// A query option could not be applied (e.g. empty column name).
    #[error("invalid query option: {0}")]
    InvalidOption(String),

    /// The builder state cannot be rendered into SQL.
    #[error("invalid statement: {0}")]
    InvalidStatement(String),

    /// The connection refused to begin a transaction.
    #[error("failed to begin transaction: {0}")]
    TransactionStart(#[source] BoxError),

    /// Commit or rollback failed.
    #[error("failed to finalize transaction: {0}")]
    TransactionFinalize(#[source] BoxError),

    /// The transaction behind a scope was already committed or rolled back.
    #[error("transaction already finalized")]
    TransactionClosed,

    /// A column value could not be converted into the requested type.
    #[error("cannot decode column `{column}`: {message}")]
    Decode {
        /// Column name or ordinal.
        column:  String,
        /// What went wrong.
        message: String
    },

    /// A statement expected to yield a row yielded none.
    #[error("no rows returned")]
    RowNotFound,

    /// The backend did not report the id of the inserted row.
    #[error("backend did not report last insert id")]
    MissingInsertId,

    /// Statement execution error, passed through verbatim.
    #[error(transparent)]
    Database(BoxError)
}

impl Error {
    /// Wrap a driver error as an operational error.
    pub fn database<E>(err: E) -> Self
    where
        E: Into<BoxError>
    {
        Self::Database(err.into())
    }

    /// Build a decode error for `column`.
    pub fn decode(column: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Decode {
            column:  column.into(),
            message: message.to_string()
        }
    }

    /// Check whether this is an operational (statement execution) error.
    pub const fn is_database(&self) -> bool {
        matches!(self, Self::Database(_))
    }

    /// Check whether this is a transaction start or finalize error.
    pub const fn is_transaction(&self) -> bool {
        matches!(
            self,
            Self::TransactionStart(_) | Self::TransactionFinalize(_) | Self::TransactionClosed
        )
    }
}

/// Error returned by a generated `find`.
///
/// Rows decoded before the failure are kept, the way
/// [`FromUtf8Error`](std::string::FromUtf8Error) keeps its bytes.
#[derive(Debug)]
pub struct FindError<T> {
    rows:   Vec<T>,
    source: Error
}

impl<T> FindError<T> {
    /// Pair the rows scanned so far with the error that stopped the scan.
    pub const fn new(rows: Vec<T>, source: Error) -> Self {
        Self {
            rows,
            source
        }
    }

    /// Rows decoded before the failure.
    pub fn rows(&self) -> &[T] {
        &self.rows
    }

    /// Take the rows decoded before the failure.
    pub fn into_rows(self) -> Vec<T> {
        self.rows
    }

    /// The underlying error.
    pub const fn error(&self) -> &Error {
        &self.source
    }

    /// Split into rows and error.
    pub fn into_parts(self) -> (Vec<T>, Error) {
        (self.rows, self.source)
    }
}

impl<T> From<Error> for FindError<T> {
    fn from(source: Error) -> Self {
        Self::new(Vec::new(), source)
    }
}

impl<T> From<FindError<T>> for Error {
    fn from(err: FindError<T>) -> Self {
        err.source
    }
}

impl<T> fmt::Display for FindError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.source, f)
    }
}

impl<T: fmt::Debug> std::error::Error for FindError<T> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}
