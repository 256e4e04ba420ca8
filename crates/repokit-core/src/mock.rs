// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! In-memory backend for tests.
//!
//! Results are scripted up front and consumed in order; every statement is
//! logged. A transaction dropped without commit or rollback counts as rolled
//! back, the same as a dropped `sqlx::Transaction`.
//!
//! ```rust,ignore
//! use repokit_core::{Executed, MockDatabase, Row};
//!
//! let db = MockDatabase::new()
//!     .append_exec_results([Executed::new(1, Some(42))])
//!     .append_query_results([vec![Row::new().with("id", 42_i64)]]);
//! assert_eq!(db.begins(), 0);
//! ```

use std::{
    collections::VecDeque,
    sync::{Arc, Mutex, MutexGuard, PoisonError}
};

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::Notify;

use crate::{BoxError, Error, Executed, Row, Statement, TransactionOps, Transactional};

/// Error produced by scripted failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct MockError(pub String);

#[derive(Debug, Default)]
struct State {
    exec:          VecDeque<Result<Executed, String>>,
    query:         VecDeque<Result<Vec<Row>, String>>,
    statements:    Vec<Statement>,
    begins:        usize,
    commits:       usize,
    rollbacks:     usize,
    fail_begin:    Option<String>,
    fail_commit:   Option<String>,
    fail_rollback: Option<String>,
    park_exec:     Option<Arc<Notify>>
}

/// Scripted database. Clones share state.
#[derive(Debug, Clone, Default)]
pub struct MockDatabase {
    state: Arc<Mutex<State>>
}

impl MockDatabase {
    /// Empty mock.
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        lock(&self.state)
    }

    /// Queue results for `execute` calls.
    #[must_use]
    pub fn append_exec_results<I>(self, results: I) -> Self
    where
        I: IntoIterator<Item = Executed>
    {
        self.state().exec.extend(results.into_iter().map(Ok));
        self
    }

    /// Queue a failing `execute` call.
    #[must_use]
    pub fn append_exec_error(self, message: impl Into<String>) -> Self {
        self.state().exec.push_back(Err(message.into()));
        self
    }

    /// Queue result sets for `fetch_all` calls.
    #[must_use]
    pub fn append_query_results<I>(self, results: I) -> Self
    where
        I: IntoIterator<Item = Vec<Row>>
    {
        self.state().query.extend(results.into_iter().map(Ok));
        self
    }

    /// Queue a failing `fetch_all` call.
    #[must_use]
    pub fn append_query_error(self, message: impl Into<String>) -> Self {
        self.state().query.push_back(Err(message.into()));
        self
    }

    /// Make the next `begin` fail.
    #[must_use]
    pub fn fail_begin(self, message: impl Into<String>) -> Self {
        self.state().fail_begin = Some(message.into());
        self
    }

    /// Make the next `commit` fail.
    #[must_use]
    pub fn fail_commit(self, message: impl Into<String>) -> Self {
        self.state().fail_commit = Some(message.into());
        self
    }

    /// Make the next `rollback` fail.
    #[must_use]
    pub fn fail_rollback(self, message: impl Into<String>) -> Self {
        self.state().fail_rollback = Some(message.into());
        self
    }

    /// Make the next `execute` log its statement, notify `entered` and
    /// never complete. Dropping the caller's future is then the only way out.
    #[must_use]
    pub fn park_exec(self, entered: Arc<Notify>) -> Self {
        self.state().park_exec = Some(entered);
        self
    }

    /// Every statement seen so far, in order.
    pub fn statements(&self) -> Vec<Statement> {
        self.state().statements.clone()
    }

    /// Number of transactions begun.
    pub fn begins(&self) -> usize {
        self.state().begins
    }

    /// Number of commits.
    pub fn commits(&self) -> usize {
        self.state().commits
    }

    /// Number of rollbacks, including dropped transactions.
    pub fn rollbacks(&self) -> usize {
        self.state().rollbacks
    }
}

fn lock(state: &Mutex<State>) -> MutexGuard<'_, State> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

fn next_query(state: &Mutex<State>, statement: Statement) -> Result<Vec<Row>, Error> {
    let mut state = lock(state);
    state.statements.push(statement);
    match state.query.pop_front() {
        Some(Ok(rows)) => Ok(rows),
        Some(Err(message)) => Err(Error::database(MockError(message))),
        None => Err(Error::database(MockError("no query result scripted".into())))
    }
}

#[async_trait]
impl Transactional for MockDatabase {
    type Transaction = MockTransaction;

    async fn begin(&self) -> Result<MockTransaction, BoxError> {
        let mut state = self.state();
        if let Some(message) = state.fail_begin.take() {
            return Err(Box::new(MockError(message)));
        }
        state.begins += 1;
        Ok(MockTransaction {
            state:     Arc::clone(&self.state),
            finalized: false
        })
    }

    async fn fetch_all(&self, statement: Statement) -> Result<Vec<Row>, Error> {
        next_query(&self.state, statement)
    }
}

/// Transaction handed out by [`MockDatabase`].
#[derive(Debug)]
pub struct MockTransaction {
    state:     Arc<Mutex<State>>,
    finalized: bool
}

#[async_trait]
impl TransactionOps for MockTransaction {
    async fn execute(&mut self, statement: Statement) -> Result<Executed, Error> {
        let parked = {
            let mut state = lock(&self.state);
            state.statements.push(statement);
            state.park_exec.take()
        };
        if let Some(entered) = parked {
            entered.notify_one();
            std::future::pending::<()>().await;
        }

        let mut state = lock(&self.state);
        match state.exec.pop_front() {
            Some(Ok(executed)) => Ok(executed),
            Some(Err(message)) => Err(Error::database(MockError(message))),
            None => Err(Error::database(MockError("no exec result scripted".into())))
        }
    }

    async fn fetch_all(&mut self, statement: Statement) -> Result<Vec<Row>, Error> {
        next_query(&self.state, statement)
    }

    async fn commit(mut self) -> Result<(), BoxError> {
        let failure = {
            let mut state = lock(&self.state);
            let failure = state.fail_commit.take();
            if failure.is_none() {
                state.commits += 1;
            }
            failure
        };
        match failure {
            Some(message) => Err(Box::new(MockError(message))),
            None => {
                self.finalized = true;
                Ok(())
            }
        }
    }

    async fn rollback(mut self) -> Result<(), BoxError> {
        let failure = {
            let mut state = lock(&self.state);
            state.rollbacks += 1;
            state.fail_rollback.take()
        };
        self.finalized = true;
        match failure {
            Some(message) => Err(Box::new(MockError(message))),
            None => Ok(())
        }
    }
}

impl Drop for MockTransaction {
    fn drop(&mut self) {
        if !self.finalized {
            lock(&self.state).rollbacks += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Value;

    #[tokio::test]
    async fn scripted_results_are_consumed_in_order() {
        let db = MockDatabase::new()
            .append_exec_results([Executed::new(1, Some(10)), Executed::new(0, None)]);
        let mut tx = db.begin().await.unwrap();

        let first = tx.execute(Statement::new("a", vec![])).await.unwrap();
        let second = tx.execute(Statement::new("b", vec![Value::Int(1)])).await.unwrap();
        assert_eq!(first.last_insert_id, Some(10));
        assert_eq!(second.rows_affected, 0);
        assert!(tx.execute(Statement::new("c", vec![])).await.is_err());

        let sql: Vec<String> = db.statements().iter().map(|s| s.sql().to_owned()).collect();
        assert_eq!(sql, ["a", "b", "c"]);
        tx.commit().await.unwrap();
        assert_eq!((db.begins(), db.commits(), db.rollbacks()), (1, 1, 0));
    }

    #[tokio::test]
    async fn failed_commit_counts_as_rollback() {
        let db = MockDatabase::new().fail_commit("gone");
        let tx = db.begin().await.unwrap();
        assert!(tx.commit().await.is_err());
        assert_eq!((db.commits(), db.rollbacks()), (0, 1));
    }

    #[tokio::test]
    async fn parked_exec_never_completes() {
        let entered = Arc::new(Notify::new());
        let db = MockDatabase::new().park_exec(Arc::clone(&entered));
        let mut tx = db.begin().await.unwrap();

        tokio::select! {
            biased;
            _ = tx.execute(Statement::new("UPDATE", vec![])) => panic!("parked execute completed"),
            () = entered.notified() => {}
        }
        assert_eq!(db.statements().len(), 1);
        drop(tx);
        assert_eq!(db.rollbacks(), 1);
    }

    #[tokio::test]
    async fn query_error_is_operational() {
        let db = MockDatabase::new().append_query_error("syntax error");
        let err = db.fetch_all(Statement::new("SELECT", vec![])).await.unwrap_err();
        assert!(err.is_database());
        assert_eq!(err.to_string(), "syntax error");
    }
}
