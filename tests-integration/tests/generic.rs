// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Generated generic-dialect repositories against the mock backend.

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use repokit_core::{
    Error, Executed, MockDatabase, Pagination, Row, Scope, Sort, UnitOfWork, Value, equal
};
use repokit_integration_tests::{
    generic::{BOOK_TABLE, BOOK_TABLE_NAME, BookRepo, BookRepoImpl, NoteRepo, NoteRepoImpl},
    model::{Book, Note}
};
use tokio::sync::Notify;

fn written_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
}

fn sample() -> Book {
    Book {
        id:         0,
        title:      "t".into(),
        author:     "a".into(),
        created_at: written_at(),
        updated_at: written_at()
    }
}

fn book_row(id: i64, title: &str) -> Row {
    Row::new()
        .with("id", id)
        .with("title", title)
        .with("author", "a")
        .with("created_at", written_at())
        .with("updated_at", written_at())
}

fn sql(db: &MockDatabase) -> Vec<String> {
    db.statements().iter().map(|s| s.sql().to_owned()).collect()
}

#[test]
fn constants_name_table_and_columns() {
    assert_eq!(BOOK_TABLE_NAME, "books");
    assert_eq!(BOOK_TABLE.id, "id");
    assert_eq!(BOOK_TABLE.created_at, "created_at");
}

#[tokio::test]
async fn create_binds_every_non_key_field_and_reads_insert_id() {
    let db = MockDatabase::new().append_exec_results([Executed::new(1, Some(7))]);
    let repo = BookRepoImpl::new(db.clone());

    let id = repo.create(&Scope::new(), &sample()).await.unwrap();

    assert_eq!(id, 7);
    let statements = db.statements();
    assert_eq!(
        statements[0].sql(),
        "INSERT INTO books (title, author, created_at, updated_at) VALUES (?, ?, ?, ?)"
    );
    assert_eq!(
        statements[0].args(),
        [
            Value::from("t"),
            Value::from("a"),
            Value::from(written_at()),
            Value::from(written_at())
        ]
    );
    assert_eq!((db.begins(), db.commits(), db.rollbacks()), (1, 1, 0));
}

#[tokio::test]
async fn create_without_insert_id_rolls_back() {
    let db = MockDatabase::new().append_exec_results([Executed::new(1, None)]);
    let repo = BookRepoImpl::new(db.clone());

    let err = repo.create(&Scope::new(), &sample()).await.unwrap_err();

    assert!(matches!(err, Error::MissingInsertId));
    assert_eq!((db.commits(), db.rollbacks()), (0, 1));
}

#[tokio::test]
async fn failed_begin_is_reported() {
    let db = MockDatabase::new().fail_begin("pool exhausted");
    let repo = BookRepoImpl::new(db.clone());

    let err = repo.create(&Scope::new(), &sample()).await.unwrap_err();

    assert!(matches!(err, Error::TransactionStart(_)));
    assert!(db.statements().is_empty());
}

#[tokio::test]
async fn update_sets_updatable_fields_only() {
    let db = MockDatabase::new().append_exec_results([Executed::new(1, None)]);
    let repo = BookRepoImpl::new(db.clone());

    let affected = repo
        .update(&Scope::new(), &sample(), Some(&equal(BOOK_TABLE.id, 3_i64)))
        .await
        .unwrap();

    assert_eq!(affected, 1);
    assert_eq!(
        sql(&db),
        ["UPDATE books SET title = ?, author = ?, updated_at = ? WHERE id = ?"]
    );
    assert_eq!(db.commits(), 1);
}

#[tokio::test]
async fn update_error_is_returned_and_rolls_back() {
    let db = MockDatabase::new().append_exec_error("constraint violated");
    let repo = BookRepoImpl::new(db.clone());

    let err = repo
        .update(&Scope::new(), &sample(), Some(&equal(BOOK_TABLE.id, 3_i64)))
        .await
        .unwrap_err();

    assert!(err.is_database());
    assert_eq!(err.to_string(), "constraint violated");
    assert_eq!((db.begins(), db.commits(), db.rollbacks()), (1, 0, 1));
}

#[tokio::test]
async fn failed_commit_is_finalize_error() {
    let db = MockDatabase::new()
        .append_exec_results([Executed::new(1, None)])
        .fail_commit("connection reset");
    let repo = BookRepoImpl::new(db.clone());

    let err = repo.update(&Scope::new(), &sample(), None).await.unwrap_err();

    assert!(matches!(err, Error::TransactionFinalize(_)));
}

#[tokio::test]
async fn cancelled_update_rolls_back() {
    let entered = Arc::new(Notify::new());
    let db = MockDatabase::new().park_exec(Arc::clone(&entered));
    let repo = BookRepoImpl::new(db.clone());
    let scope = Scope::new();
    let book = sample();
    let by_id = equal(BOOK_TABLE.id, 3_i64);

    let mut update = repo.update(&scope, &book, Some(&by_id));
    tokio::select! {
        biased;
        _ = &mut update => panic!("update finished while its statement was parked"),
        () = entered.notified() => {}
    }
    assert_eq!(sql(&db), ["UPDATE books SET title = ?, author = ?, updated_at = ? WHERE id = ?"]);
    assert_eq!((db.begins(), db.rollbacks()), (1, 0));

    drop(update);
    assert_eq!((db.begins(), db.commits(), db.rollbacks()), (1, 0, 1));
}

#[tokio::test]
async fn concurrent_top_level_calls_get_their_own_transactions() {
    let db = MockDatabase::new().append_exec_results([Executed::new(1, Some(1)), Executed::new(1, Some(2))]);
    let repo = BookRepoImpl::new(db.clone());
    let (first, second) = (sample(), sample());
    let (scope_a, scope_b) = (Scope::new(), Scope::new());

    let (a, b) = tokio::join!(repo.create(&scope_a, &first), repo.create(&scope_b, &second));

    let mut ids = [a.unwrap(), b.unwrap()];
    ids.sort_unstable();
    assert_eq!(ids, [1, 2]);
    assert_eq!((db.begins(), db.commits(), db.rollbacks()), (2, 2, 0));
}

#[tokio::test]
async fn patch_touches_only_populated_columns() {
    let db = MockDatabase::new().append_exec_results([Executed::new(1, None)]);
    let repo = BookRepoImpl::new(db.clone());
    let partial = Book {
        title: "renamed".into(),
        ..Book::default()
    };

    repo.patch(&Scope::new(), &partial, Some(&equal(BOOK_TABLE.id, 3_i64)))
        .await
        .unwrap();

    let statements = db.statements();
    assert_eq!(statements[0].sql(), "UPDATE books SET title = ? WHERE id = ?");
    assert_eq!(statements[0].args(), [Value::from("renamed"), Value::Int(3)]);
}

#[tokio::test]
async fn patch_with_nothing_set_fails_without_executing() {
    let db = MockDatabase::new();
    let repo = BookRepoImpl::new(db.clone());

    let err = repo
        .patch(&Scope::new(), &Book::default(), None)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::InvalidStatement(_)));
    assert!(db.statements().is_empty());
    assert_eq!(db.rollbacks(), 1);
}

#[tokio::test]
async fn delete_of_missing_row_is_zero_not_error() {
    let db = MockDatabase::new().append_exec_results([Executed::new(0, None)]);
    let repo = BookRepoImpl::new(db.clone());

    let affected = repo
        .delete(&Scope::new(), Some(&equal(BOOK_TABLE.id, 404_i64)))
        .await
        .unwrap();

    assert_eq!(affected, 0);
    assert_eq!(sql(&db), ["DELETE FROM books WHERE id = ?"]);
    assert_eq!(db.commits(), 1);
}

#[tokio::test]
async fn delete_with_combined_equalities() {
    let db = MockDatabase::new().append_exec_results([Executed::new(2, None)]);
    let repo = BookRepoImpl::new(db.clone());
    let both = vec![equal(BOOK_TABLE.author, "a"), equal(BOOK_TABLE.title, "t")];

    repo.delete(&Scope::new(), Some(&both)).await.unwrap();

    assert_eq!(sql(&db), ["DELETE FROM books WHERE author = ? AND title = ?"]);
}

#[tokio::test]
async fn find_applies_options_in_clause_order() {
    let db = MockDatabase::new().append_query_results([vec![book_row(1, "t")]]);
    let repo = BookRepoImpl::new(db.clone());

    let books = repo
        .find(
            &Scope::new(),
            &[
                &Sort::by([BOOK_TABLE.title]),
                &Pagination::new(10, 20),
                &equal(BOOK_TABLE.author, "a")
            ]
        )
        .await
        .unwrap();

    assert_eq!(books.len(), 1);
    assert_eq!(books[0].title, "t");
    assert_eq!(books[0].created_at, written_at());
    assert_eq!(
        sql(&db),
        [
            "SELECT id, title, author, created_at, updated_at FROM books WHERE author = ? ORDER BY title LIMIT 10 OFFSET 20"
        ]
    );
    assert_eq!(db.begins(), 0);
}

#[tokio::test]
async fn zero_pagination_renders_nothing() {
    let db = MockDatabase::new().append_query_results([vec![], vec![]]);
    let repo = BookRepoImpl::new(db.clone());

    let with = repo
        .find(&Scope::new(), &[&Pagination::default()])
        .await
        .unwrap();
    let without = repo.find(&Scope::new(), &[]).await.unwrap();

    assert!(with.is_empty() && without.is_empty());
    let sql = sql(&db);
    assert_eq!(sql[0], sql[1]);
}

#[tokio::test]
async fn find_keeps_rows_scanned_before_a_bad_row() {
    let bad = Row::new().with("id", 2_i64).with("title", 5_i64);
    let db = MockDatabase::new().append_query_results([vec![book_row(1, "ok"), bad]]);
    let repo = BookRepoImpl::new(db.clone());

    let err = repo.find(&Scope::new(), &[]).await.unwrap_err();

    assert_eq!(err.rows().len(), 1);
    assert_eq!(err.rows()[0].title, "ok");
    assert!(matches!(err.error(), Error::Decode { .. }));
}

#[tokio::test]
async fn count_reads_single_scalar() {
    let db = MockDatabase::new().append_query_results([vec![Row::new().with("count(*)", 3_i64)]]);
    let repo = BookRepoImpl::new(db.clone());

    let count = repo
        .count(&Scope::new(), &[&equal(BOOK_TABLE.author, "a")])
        .await
        .unwrap();

    assert_eq!(count, 3);
    assert_eq!(sql(&db), ["SELECT count(*) FROM books WHERE author = ?"]);
}

#[tokio::test]
async fn calls_inside_a_unit_of_work_never_finalize_it() {
    let db = MockDatabase::new()
        .append_exec_results([Executed::new(1, Some(5)), Executed::new(1, None)])
        .append_query_results([vec![book_row(5, "t")]]);
    let repo = BookRepoImpl::new(db.clone());

    let uow = UnitOfWork::acquire(&Scope::new(), &db).await.unwrap();
    let scope = uow.scope();
    let id = repo.create(&scope, &sample()).await.unwrap();
    repo.update(&scope, &sample(), Some(&equal(BOOK_TABLE.id, id)))
        .await
        .unwrap();
    let found = repo
        .find(&scope, &[&equal(BOOK_TABLE.id, id)])
        .await
        .unwrap();
    assert_eq!(found[0].id, 5);
    assert_eq!((db.begins(), db.commits(), db.rollbacks()), (1, 0, 0));

    uow.finish(Ok(())).await.unwrap();
    assert_eq!((db.begins(), db.commits(), db.rollbacks()), (1, 1, 0));
}

#[tokio::test]
async fn nested_failure_rolls_back_the_outer_transaction() {
    let db = MockDatabase::new()
        .append_exec_results([Executed::new(1, Some(5))])
        .append_exec_error("deadlock");
    let repo = BookRepoImpl::new(db.clone());

    let uow = UnitOfWork::acquire(&Scope::new(), &db).await.unwrap();
    let scope = uow.scope();
    repo.create(&scope, &sample()).await.unwrap();
    assert!(repo.delete(&scope, None).await.is_err());
    assert!(uow.is_failed());

    uow.finish(Ok(())).await.unwrap();
    assert_eq!((db.commits(), db.rollbacks()), (0, 1));
}

#[tokio::test]
async fn default_expression_replaces_runtime_value() {
    let db = MockDatabase::new().append_exec_results([Executed::new(1, Some(1)), Executed::new(1, None)]);
    let repo = NoteRepoImpl::new(db.clone());

    repo.create(&Scope::new(), &Note::default()).await.unwrap();
    repo.patch(&Scope::new(), &Note::default(), None).await.unwrap();

    let statements = db.statements();
    assert_eq!(
        statements[0].sql(),
        "INSERT INTO notes (body, score, touched_at) VALUES (NULL, NULL, CURRENT_TIMESTAMP)"
    );
    assert!(statements[0].args().is_empty());
    assert_eq!(statements[1].sql(), "UPDATE notes SET touched_at = CURRENT_TIMESTAMP");
    assert!(statements[1].args().is_empty());
}
