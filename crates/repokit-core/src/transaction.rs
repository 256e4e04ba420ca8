// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Transaction-scoped unit of work.
//!
//! Every generated write method runs inside a [`UnitOfWork`]. The handle
//! either starts a transaction of its own (the *owner*) or joins the one
//! carried by the caller's [`Scope`]. Only the owner commits or rolls back.
//!
//! # Overview
//!
//! - [`Transactional`] - a connection pool that can begin transactions
//! - [`TransactionOps`] - an open transaction
//! - [`Scope`] - execution context passed explicitly through repository calls
//! - [`UnitOfWork`] - per-call handle with a sticky failure flag
//!
//! # Example
//!
//! ```rust,ignore
//! use repokit_core::{Scope, UnitOfWork};
//!
//! async fn transfer(db: &PgPool, books: &BookRepoImpl<PgPool>) -> Result<(), repokit_core::Error> {
//!     let uow = UnitOfWork::acquire(&Scope::new(), db).await?;
//!     let scope = uow.scope();
//!
//!     // Both calls join the outer transaction.
//!     let result = async {
//!         books.create(&scope, &first).await?;
//!         books.create(&scope, &second).await?;
//!         Ok(())
//!     }
//!     .await;
//!
//!     uow.finish(result).await
//! }
//! ```
//!
//! # Teardown
//!
//! | Owner | Failed | `finish` does |
//! |-------|--------|---------------|
//! | no | any | nothing, result passes through |
//! | yes | no | commit |
//! | yes | yes | rollback |
//!
//! Dropping an owner without calling `finish` (the future was cancelled)
//! releases the transaction, which the backend rolls back.

use std::{
    fmt,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering}
    }
};

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::{BoxError, Error, Executed, Row, Statement};

/// A connection pool that can begin transactions.
#[async_trait]
pub trait Transactional: Send + Sync {
    /// Transaction type produced by [`begin`](Self::begin).
    type Transaction: TransactionOps;

    /// Begin a new transaction.
    async fn begin(&self) -> Result<Self::Transaction, BoxError>;

    /// Run a query outside any transaction.
    async fn fetch_all(&self, statement: Statement) -> Result<Vec<Row>, Error>;
}

/// An open transaction.
#[async_trait]
pub trait TransactionOps: Send + Sized + 'static {
    /// Execute a statement that returns no rows.
    async fn execute(&mut self, statement: Statement) -> Result<Executed, Error>;

    /// Execute a statement and collect its rows.
    async fn fetch_all(&mut self, statement: Statement) -> Result<Vec<Row>, Error>;

    /// Commit the transaction.
    async fn commit(self) -> Result<(), BoxError>;

    /// Roll back the transaction.
    async fn rollback(self) -> Result<(), BoxError>;
}

/// Transaction state shared by the owner and every handle that joins it.
struct Shared<T> {
    tx:     Mutex<Option<T>>,
    failed: AtomicBool
}

impl<T> Shared<T> {
    fn mark_failed(&self) {
        self.failed.store(true, Ordering::SeqCst);
    }

    fn is_failed(&self) -> bool {
        self.failed.load(Ordering::SeqCst)
    }
}

/// Execution context for repository calls.
///
/// `Scope::new()` carries no transaction, so each write opens its own.
/// [`UnitOfWork::scope`] returns a scope carrying the handle's transaction;
/// calls made with it join that transaction.
pub struct Scope<T> {
    ambient: Option<Arc<Shared<T>>>
}

impl<T> Scope<T> {
    /// Scope without an ambient transaction.
    pub const fn new() -> Self {
        Self {
            ambient: None
        }
    }

    /// Check whether calls made with this scope join a transaction.
    pub const fn in_transaction(&self) -> bool {
        self.ambient.is_some()
    }
}

impl<T> Default for Scope<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for Scope<T> {
    fn clone(&self) -> Self {
        Self {
            ambient: self.ambient.clone()
        }
    }
}

impl<T> fmt::Debug for Scope<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scope")
            .field("in_transaction", &self.in_transaction())
            .finish()
    }
}

/// Per-call transaction handle.
///
/// Created with [`acquire`](Self::acquire), finalized with
/// [`finish`](Self::finish).
#[must_use = "call `finish` to commit or roll back"]
pub struct UnitOfWork<T: TransactionOps> {
    shared:   Arc<Shared<T>>,
    owned:    bool,
    finished: bool
}

impl<T: TransactionOps> UnitOfWork<T> {
    /// Join the transaction carried by `scope`, or begin a new one on `db`.
    ///
    /// # Errors
    ///
    /// [`Error::TransactionStart`] when `db` cannot begin a transaction.
    pub async fn acquire<D>(scope: &Scope<T>, db: &D) -> Result<Self, Error>
    where
        D: Transactional<Transaction = T>
    {
        if let Some(shared) = &scope.ambient {
            return Ok(Self {
                shared:   Arc::clone(shared),
                owned:    false,
                finished: false
            });
        }

        let tx = db.begin().await.map_err(|e| {
            warn!(error = %e, "failed to begin transaction");
            Error::TransactionStart(e)
        })?;
        debug!("transaction started");

        Ok(Self {
            shared:   Arc::new(Shared {
                tx:     Mutex::new(Some(tx)),
                failed: AtomicBool::new(false)
            }),
            owned:    true,
            finished: false
        })
    }

    /// Scope that makes nested calls join this transaction.
    pub fn scope(&self) -> Scope<T> {
        Scope {
            ambient: Some(Arc::clone(&self.shared))
        }
    }

    /// Check whether this handle began the transaction.
    pub const fn is_owner(&self) -> bool {
        self.owned
    }

    /// Check whether any handle on this transaction recorded a failure.
    pub fn is_failed(&self) -> bool {
        self.shared.is_failed()
    }

    /// Mark the transaction as failed and hand `err` back.
    ///
    /// ```rust,ignore
    /// return Err(uow.set_error(err));
    /// ```
    pub fn set_error<E>(&self, err: E) -> E {
        self.shared.mark_failed();
        err
    }

    /// Mark the transaction as failed when `result` is an error.
    pub fn record<R, E>(&self, result: Result<R, E>) -> Result<R, E> {
        if result.is_err() {
            self.shared.mark_failed();
        }
        result
    }

    /// Execute a statement inside the transaction.
    ///
    /// # Errors
    ///
    /// [`Error::TransactionClosed`] when the transaction was already
    /// finalized, otherwise whatever the backend reports.
    pub async fn execute(&self, statement: Statement) -> Result<Executed, Error> {
        debug!(sql = statement.sql(), "execute");
        let mut guard = self.shared.tx.lock().await;
        let tx = guard.as_mut().ok_or(Error::TransactionClosed)?;
        tx.execute(statement).await
    }

    /// Run a query inside the transaction.
    ///
    /// # Errors
    ///
    /// Same as [`execute`](Self::execute).
    pub async fn fetch_all(&self, statement: Statement) -> Result<Vec<Row>, Error> {
        debug!(sql = statement.sql(), "fetch");
        let mut guard = self.shared.tx.lock().await;
        let tx = guard.as_mut().ok_or(Error::TransactionClosed)?;
        tx.fetch_all(statement).await
    }

    /// Run a query expected to return at least one row; returns the first.
    ///
    /// # Errors
    ///
    /// [`Error::RowNotFound`] on an empty result.
    pub async fn fetch_one(&self, statement: Statement) -> Result<Row, Error> {
        self.fetch_all(statement)
            .await?
            .into_iter()
            .next()
            .ok_or(Error::RowNotFound)
    }

    /// Tear the handle down.
    ///
    /// A non-owner only records a failed `result` and returns it. The owner
    /// rolls back when the transaction failed and commits otherwise. A commit
    /// or rollback failure is reported as [`Error::TransactionFinalize`]
    /// unless `result` is already an error, which is returned instead.
    pub async fn finish<R>(mut self, result: Result<R, Error>) -> Result<R, Error> {
        self.finished = true;
        let result = self.record(result);
        if !self.owned {
            return result;
        }

        let Some(tx) = self.shared.tx.lock().await.take() else {
            return result.and(Err(Error::TransactionClosed));
        };

        let rollback = self.shared.is_failed();
        let outcome = if rollback {
            tx.rollback().await
        } else {
            tx.commit().await
        };

        match (result, outcome) {
            (result, Ok(())) => {
                debug!(rollback, "transaction finalized");
                result
            }
            (Err(err), Err(fin)) => {
                warn!(rollback, error = %fin, "failed to finalize transaction");
                Err(err)
            }
            (Ok(_), Err(fin)) => {
                warn!(rollback, error = %fin, "failed to finalize transaction");
                Err(Error::TransactionFinalize(fin))
            }
        }
    }
}

impl<T: TransactionOps> Drop for UnitOfWork<T> {
    fn drop(&mut self) {
        if !self.owned || self.finished {
            return;
        }
        self.shared.mark_failed();
        // A contended lock means a joined call or a cancelled statement still
        // holds the transaction. It is then released, and rolled back by the
        // backend, when the last `Scope` or handle drops the shared state.
        if let Ok(mut guard) = self.shared.tx.try_lock()
            && guard.take().is_some()
        {
            warn!("unit of work dropped without finish, rolling back");
        }
    }
}

impl<T: TransactionOps> fmt::Debug for UnitOfWork<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UnitOfWork")
            .field("owned", &self.owned)
            .field("failed", &self.is_failed())
            .field("finished", &self.finished)
            .finish()
    }
}

/// Run a read query in `scope`.
///
/// Goes through the ambient transaction when the scope carries one and
/// straight to the pool otherwise; never begins a transaction. A failed read
/// inside a transaction marks it failed.
///
/// # Errors
///
/// [`Error::TransactionClosed`] for a finalized ambient transaction,
/// otherwise whatever the backend reports.
pub async fn fetch_all<D>(
    db: &D,
    scope: &Scope<D::Transaction>,
    statement: Statement
) -> Result<Vec<Row>, Error>
where
    D: Transactional
{
    let Some(shared) = &scope.ambient else {
        debug!(sql = statement.sql(), "fetch");
        return db.fetch_all(statement).await;
    };

    debug!(sql = statement.sql(), "fetch in transaction");
    let mut guard = shared.tx.lock().await;
    let tx = guard.as_mut().ok_or(Error::TransactionClosed)?;
    let result = tx.fetch_all(statement).await;
    if result.is_err() {
        shared.mark_failed();
    }
    result
}
