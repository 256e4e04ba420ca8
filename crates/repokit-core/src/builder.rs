// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Statement builders.
//!
//! Builders only collect data; clause placement happens in `build()`. This is
//! what lets query options attach predicates, pagination and ordering in any
//! order and still produce valid SQL:
//!
//! ```text
//! SELECT cols FROM table WHERE p1 AND p2 ORDER BY c1, c2 LIMIT n OFFSET m
//! UPDATE table SET c1 = $1, c2 = now() WHERE p1
//! DELETE FROM table WHERE p1
//! INSERT INTO table (c1, c2) VALUES ($1, now()) RETURNING "id"
//! ```
//!
//! # Example
//!
//! ```rust
//! use repokit_core::{Placeholder, Predicate, SelectBuilder};
//!
//! let stmt = SelectBuilder::new("books", ["id", "title"])
//!     .and_where(Predicate::eq("author", "ursula"))
//!     .limit(10)
//!     .placeholder(Placeholder::Dollar)
//!     .build()
//!     .unwrap();
//! assert_eq!(stmt.sql(), "SELECT id, title FROM books WHERE author = $1 LIMIT 10");
//! ```

use crate::{Error, Value};

/// Argument marker style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Placeholder {
    /// `?` for every argument (MySQL, SQLite).
    #[default]
    Question,
    /// `$1, $2, ...` (PostgreSQL).
    Dollar
}

impl Placeholder {
    /// Render the marker for the argument at `index` (1-based).
    pub fn render(self, index: usize) -> String {
        match self {
            Self::Question => "?".to_owned(),
            Self::Dollar => format!("${index}")
        }
    }
}

/// Rendered SQL text with its arguments in placeholder order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Statement {
    sql:  String,
    args: Vec<Value>
}

impl Statement {
    /// Create a statement from raw parts.
    pub fn new(sql: impl Into<String>, args: Vec<Value>) -> Self {
        Self {
            sql: sql.into(),
            args
        }
    }

    /// SQL text.
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// Arguments in placeholder order.
    pub fn args(&self) -> &[Value] {
        &self.args
    }

    /// Split into SQL text and arguments.
    pub fn into_parts(self) -> (String, Vec<Value>) {
        (self.sql, self.args)
    }
}

/// A boolean condition for a `WHERE` clause.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// `column = arg`, or `column IS NULL` for a null argument.
    Eq {
        /// Column name.
        column: String,
        /// Compared value.
        value:  Value
    },
    /// SQL fragment with `?` markers, one per argument. A `?` inside a
    /// quoted literal or identifier is kept; `??` is a literal `?`.
    Raw {
        /// Fragment text.
        sql:  String,
        /// Fragment arguments.
        args: Vec<Value>
    }
}

impl Predicate {
    /// Equality predicate.
    pub fn eq(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Eq {
            column: column.into(),
            value:  value.into()
        }
    }

    /// Free-form predicate; `?` marks each argument, `??` escapes one.
    pub fn raw(sql: impl Into<String>, args: Vec<Value>) -> Self {
        Self::Raw {
            sql: sql.into(),
            args
        }
    }
}

/// Right-hand side of a `SET` or `VALUES` entry.
#[derive(Debug, Clone, PartialEq)]
pub enum Assignment {
    /// Bound argument.
    Bind(Value),
    /// SQL expression emitted verbatim (e.g. `now()`).
    Expr(String)
}

/// Accumulates SQL text and arguments, numbering placeholders as it goes.
struct SqlWriter {
    sql:         String,
    args:        Vec<Value>,
    placeholder: Placeholder
}

impl SqlWriter {
    fn new(placeholder: Placeholder) -> Self {
        Self {
            sql: String::new(),
            args: Vec::new(),
            placeholder
        }
    }

    fn push(&mut self, s: &str) {
        self.sql.push_str(s);
    }

    /// Bind `value`, or write `NULL` inline. An untyped inline `NULL` lets
    /// the server take the column's type, which a bound null does not.
    fn push_arg(&mut self, value: Value) {
        if value.is_null() {
            self.push("NULL");
            return;
        }
        self.args.push(value);
        let marker = self.placeholder.render(self.args.len());
        self.sql.push_str(&marker);
    }

    fn push_assignment(&mut self, assignment: &Assignment) {
        match assignment {
            Assignment::Bind(value) => self.push_arg(value.clone()),
            Assignment::Expr(expr) => self.push(expr)
        }
    }

    fn push_predicate(&mut self, predicate: &Predicate) -> Result<(), Error> {
        match predicate {
            Predicate::Eq {
                column,
                value: Value::Null
            } => {
                self.push(column);
                self.push(" IS NULL");
            }
            Predicate::Eq {
                column,
                value
            } => {
                self.push(column);
                self.push(" = ");
                self.push_arg(value.clone());
            }
            Predicate::Raw {
                sql,
                args
            } => self.push_raw(sql, args)?
        }
        Ok(())
    }

    fn push_raw(&mut self, sql: &str, args: &[Value]) -> Result<(), Error> {
        let mut args = args.iter();
        let mut quote = None;
        let mut chars = sql.chars().peekable();
        while let Some(ch) = chars.next() {
            match (quote, ch) {
                (Some(open), _) if ch == open => quote = None,
                (Some(_), _) => {}
                (None, '\'' | '"') => quote = Some(ch),
                (None, '?') if chars.peek() == Some(&'?') => {
                    chars.next();
                }
                (None, '?') => {
                    let value = args.next().ok_or_else(|| {
                        Error::InvalidStatement(format!("too few arguments for `{sql}`"))
                    })?;
                    self.push_arg(value.clone());
                    continue;
                }
                (None, _) => {}
            }
            self.sql.push(ch);
        }
        if quote.is_some() {
            return Err(Error::InvalidStatement(format!(
                "unterminated quote in `{sql}`"
            )));
        }
        if args.next().is_some() {
            return Err(Error::InvalidStatement(format!(
                "too many arguments for `{sql}`"
            )));
        }
        Ok(())
    }

    fn push_where(&mut self, predicates: &[Predicate]) -> Result<(), Error> {
        for (i, predicate) in predicates.iter().enumerate() {
            self.push(if i == 0 { " WHERE " } else { " AND " });
            self.push_predicate(predicate)?;
        }
        Ok(())
    }

    fn finish(self) -> Statement {
        Statement {
            sql:  self.sql,
            args: self.args
        }
    }
}

fn set_or_replace(entries: &mut Vec<(String, Assignment)>, column: String, assignment: Assignment) {
    match entries.iter_mut().find(|(c, _)| *c == column) {
        Some(entry) => entry.1 = assignment,
        None => entries.push((column, assignment))
    }
}

/// `SELECT` builder.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SelectBuilder {
    table:       String,
    columns:     Vec<String>,
    predicates:  Vec<Predicate>,
    order_by:    Vec<String>,
    limit:       Option<u64>,
    offset:      Option<u64>,
    placeholder: Placeholder
}

impl SelectBuilder {
    /// Select `columns` from `table`.
    pub fn new<I, S>(table: impl Into<String>, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>
    {
        Self {
            table: table.into(),
            columns: columns.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// `SELECT count(*) FROM table`.
    pub fn count(table: impl Into<String>) -> Self {
        Self::new(table, ["count(*)"])
    }

    /// Add a predicate; predicates are joined with `AND`.
    #[must_use]
    pub fn and_where(mut self, predicate: Predicate) -> Self {
        self.predicates.push(predicate);
        self
    }

    /// Append `ORDER BY` columns.
    #[must_use]
    pub fn order_by<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>
    {
        self.order_by.extend(columns.into_iter().map(Into::into));
        self
    }

    /// Set `LIMIT`; zero removes it.
    #[must_use]
    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = (limit > 0).then_some(limit);
        self
    }

    /// Set `OFFSET`; zero removes it.
    #[must_use]
    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = (offset > 0).then_some(offset);
        self
    }

    /// Choose the placeholder style.
    #[must_use]
    pub fn placeholder(mut self, placeholder: Placeholder) -> Self {
        self.placeholder = placeholder;
        self
    }

    /// Attached predicates.
    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    /// Attached `ORDER BY` columns.
    pub fn order_by_columns(&self) -> &[String] {
        &self.order_by
    }

    /// Current `LIMIT`, if any.
    pub const fn limit_value(&self) -> Option<u64> {
        self.limit
    }

    /// Current `OFFSET`, if any.
    pub const fn offset_value(&self) -> Option<u64> {
        self.offset
    }

    /// Render the statement.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidStatement`] when no column is selected or a raw
    /// predicate's arguments do not match its markers.
    pub fn build(&self) -> Result<Statement, Error> {
        if self.columns.is_empty() {
            return Err(Error::InvalidStatement(
                "select statements must have at least one result column".into()
            ));
        }

        let mut w = SqlWriter::new(self.placeholder);
        w.push("SELECT ");
        w.push(&self.columns.join(", "));
        w.push(" FROM ");
        w.push(&self.table);
        w.push_where(&self.predicates)?;
        if !self.order_by.is_empty() {
            w.push(" ORDER BY ");
            w.push(&self.order_by.join(", "));
        }
        match (self.limit, self.offset, self.placeholder) {
            (Some(limit), _, _) => w.push(&format!(" LIMIT {limit}")),
            // MySQL has no OFFSET without LIMIT.
            (None, Some(_), Placeholder::Question) => w.push(" LIMIT 18446744073709551615"),
            _ => {}
        }
        if let Some(offset) = self.offset {
            w.push(&format!(" OFFSET {offset}"));
        }
        Ok(w.finish())
    }
}

/// `UPDATE` builder.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct UpdateBuilder {
    table:       String,
    sets:        Vec<(String, Assignment)>,
    predicates:  Vec<Predicate>,
    placeholder: Placeholder
}

impl UpdateBuilder {
    /// Update rows of `table`.
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            ..Self::default()
        }
    }

    /// Set `column` to a bound value. Setting a column twice keeps the last
    /// value in the first position.
    #[must_use]
    pub fn set(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        set_or_replace(&mut self.sets, column.into(), Assignment::Bind(value.into()));
        self
    }

    /// Set `column` to a raw SQL expression, emitted verbatim.
    #[must_use]
    pub fn set_expr(mut self, column: impl Into<String>, expr: impl Into<String>) -> Self {
        set_or_replace(&mut self.sets, column.into(), Assignment::Expr(expr.into()));
        self
    }

    /// Add a predicate; predicates are joined with `AND`.
    #[must_use]
    pub fn and_where(mut self, predicate: Predicate) -> Self {
        self.predicates.push(predicate);
        self
    }

    /// Choose the placeholder style.
    #[must_use]
    pub fn placeholder(mut self, placeholder: Placeholder) -> Self {
        self.placeholder = placeholder;
        self
    }

    /// Columns in `SET` order.
    pub fn set_columns(&self) -> impl Iterator<Item = &str> {
        self.sets.iter().map(|(c, _)| c.as_str())
    }

    /// Attached predicates.
    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    /// Render the statement.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidStatement`] when nothing is set.
    pub fn build(&self) -> Result<Statement, Error> {
        if self.sets.is_empty() {
            return Err(Error::InvalidStatement(
                "update statements must have at least one SET clause".into()
            ));
        }

        let mut w = SqlWriter::new(self.placeholder);
        w.push("UPDATE ");
        w.push(&self.table);
        w.push(" SET ");
        for (i, (column, assignment)) in self.sets.iter().enumerate() {
            if i > 0 {
                w.push(", ");
            }
            w.push(column);
            w.push(" = ");
            w.push_assignment(assignment);
        }
        w.push_where(&self.predicates)?;
        Ok(w.finish())
    }
}

/// `DELETE` builder.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DeleteBuilder {
    table:       String,
    predicates:  Vec<Predicate>,
    placeholder: Placeholder
}

impl DeleteBuilder {
    /// Delete rows of `table`.
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            ..Self::default()
        }
    }

    /// Add a predicate; predicates are joined with `AND`.
    #[must_use]
    pub fn and_where(mut self, predicate: Predicate) -> Self {
        self.predicates.push(predicate);
        self
    }

    /// Choose the placeholder style.
    #[must_use]
    pub fn placeholder(mut self, placeholder: Placeholder) -> Self {
        self.placeholder = placeholder;
        self
    }

    /// Attached predicates.
    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    /// Render the statement.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidStatement`] for a malformed raw predicate.
    pub fn build(&self) -> Result<Statement, Error> {
        let mut w = SqlWriter::new(self.placeholder);
        w.push("DELETE FROM ");
        w.push(&self.table);
        w.push_where(&self.predicates)?;
        Ok(w.finish())
    }
}

/// `INSERT` builder for a single row.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct InsertBuilder {
    table:       String,
    values:      Vec<(String, Assignment)>,
    returning:   Option<String>,
    placeholder: Placeholder
}

impl InsertBuilder {
    /// Insert into `table`.
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            ..Self::default()
        }
    }

    /// Insert a bound value into `column`.
    #[must_use]
    pub fn value(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        set_or_replace(&mut self.values, column.into(), Assignment::Bind(value.into()));
        self
    }

    /// Insert a raw SQL expression into `column`, emitted verbatim.
    #[must_use]
    pub fn value_expr(mut self, column: impl Into<String>, expr: impl Into<String>) -> Self {
        set_or_replace(&mut self.values, column.into(), Assignment::Expr(expr.into()));
        self
    }

    /// Append `RETURNING "column"`.
    #[must_use]
    pub fn returning(mut self, column: impl Into<String>) -> Self {
        self.returning = Some(column.into());
        self
    }

    /// Choose the placeholder style.
    #[must_use]
    pub fn placeholder(mut self, placeholder: Placeholder) -> Self {
        self.placeholder = placeholder;
        self
    }

    /// Render the statement.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidStatement`] when no column is given.
    pub fn build(&self) -> Result<Statement, Error> {
        if self.values.is_empty() {
            return Err(Error::InvalidStatement(
                "insert statements must have at least one column".into()
            ));
        }

        let mut w = SqlWriter::new(self.placeholder);
        w.push("INSERT INTO ");
        w.push(&self.table);
        w.push(" (");
        let columns: Vec<&str> = self.values.iter().map(|(c, _)| c.as_str()).collect();
        w.push(&columns.join(", "));
        w.push(") VALUES (");
        for (i, (_, assignment)) in self.values.iter().enumerate() {
            if i > 0 {
                w.push(", ");
            }
            w.push_assignment(assignment);
        }
        w.push(")");
        if let Some(column) = &self.returning {
            w.push(&format!(" RETURNING \"{column}\""));
        }
        Ok(w.finish())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn select_clause_order_is_fixed() {
        let stmt = SelectBuilder::new("books", ["id", "title"])
            .offset(20)
            .order_by(["title"])
            .limit(10)
            .and_where(Predicate::eq("author", "le guin"))
            .placeholder(Placeholder::Dollar)
            .build()
            .unwrap();
        assert_eq!(
            stmt.sql(),
            "SELECT id, title FROM books WHERE author = $1 ORDER BY title LIMIT 10 OFFSET 20"
        );
        assert_eq!(stmt.args(), &[Value::Text("le guin".into())]);
    }

    #[test]
    fn zero_limit_and_offset_are_not_rendered() {
        let plain = SelectBuilder::new("books", ["id"]).build().unwrap();
        let zeroed = SelectBuilder::new("books", ["id"])
            .limit(0)
            .offset(0)
            .build()
            .unwrap();
        assert_eq!(plain, zeroed);
        assert_eq!(plain.sql(), "SELECT id FROM books");
    }

    #[test]
    fn predicates_join_with_and() {
        let stmt = SelectBuilder::new("books", ["id"])
            .and_where(Predicate::eq("a", 1))
            .and_where(Predicate::eq("b", 2))
            .build()
            .unwrap();
        assert_eq!(stmt.sql(), "SELECT id FROM books WHERE a = ? AND b = ?");
        assert_eq!(stmt.args().len(), 2);
    }

    #[test]
    fn null_equality_renders_is_null() {
        let stmt = DeleteBuilder::new("books")
            .and_where(Predicate::eq("deleted_at", Value::Null))
            .build()
            .unwrap();
        assert_eq!(stmt.sql(), "DELETE FROM books WHERE deleted_at IS NULL");
        assert!(stmt.args().is_empty());
    }

    #[test]
    fn raw_predicate_numbers_markers() {
        let stmt = UpdateBuilder::new("books")
            .set("title", "x")
            .and_where(Predicate::raw(
                "id BETWEEN ? AND ?",
                vec![Value::Int(1), Value::Int(5)]
            ))
            .placeholder(Placeholder::Dollar)
            .build()
            .unwrap();
        assert_eq!(stmt.sql(), "UPDATE books SET title = $1 WHERE id BETWEEN $2 AND $3");
    }

    #[test]
    fn raw_predicate_argument_mismatch_fails() {
        let few = SelectBuilder::new("t", ["id"])
            .and_where(Predicate::raw("a = ? AND b = ?", vec![Value::Int(1)]))
            .build();
        assert!(matches!(few, Err(Error::InvalidStatement(_))));

        let many = SelectBuilder::new("t", ["id"])
            .and_where(Predicate::raw("a = ?", vec![Value::Int(1), Value::Int(2)]))
            .build();
        assert!(matches!(many, Err(Error::InvalidStatement(_))));
    }

    #[test]
    fn raw_predicate_skips_quoted_markers() {
        let stmt = SelectBuilder::new("notes", ["id"])
            .placeholder(Placeholder::Dollar)
            .and_where(Predicate::raw("title <> '?' AND id > ?", vec![Value::Int(1)]))
            .and_where(Predicate::raw("\"odd?col\" = ? AND tags ?? 'x'", vec![Value::Int(2)]))
            .build()
            .unwrap();
        assert_eq!(
            stmt.sql(),
            "SELECT id FROM notes WHERE title <> '?' AND id > $1 AND \"odd?col\" = $2 AND tags ? 'x'"
        );
        assert_eq!(stmt.args(), &[Value::Int(1), Value::Int(2)]);

        let open = SelectBuilder::new("notes", ["id"])
            .and_where(Predicate::raw("title = 'it''s ?", vec![]))
            .build();
        assert!(matches!(open, Err(Error::InvalidStatement(_))));
    }

    #[test]
    fn null_is_written_inline() {
        let stmt = InsertBuilder::new("notes")
            .value("body", "b")
            .value("score", Value::Null)
            .value("rank", 3)
            .placeholder(Placeholder::Dollar)
            .build()
            .unwrap();
        assert_eq!(stmt.sql(), "INSERT INTO notes (body, score, rank) VALUES ($1, NULL, $2)");
        assert_eq!(stmt.args(), &[Value::Text("b".into()), Value::Int(3)]);

        let stmt = UpdateBuilder::new("notes")
            .set("score", Value::Null)
            .and_where(Predicate::raw("id = ? OR ? IS NULL", vec![Value::Int(1), Value::Null]))
            .placeholder(Placeholder::Dollar)
            .build()
            .unwrap();
        assert_eq!(stmt.sql(), "UPDATE notes SET score = NULL WHERE id = $1 OR NULL IS NULL");
        assert_eq!(stmt.args(), &[Value::Int(1)]);
    }

    #[test]
    fn offset_without_limit() {
        let mysql = SelectBuilder::new("notes", ["id"]).offset(20).build().unwrap();
        assert_eq!(
            mysql.sql(),
            "SELECT id FROM notes LIMIT 18446744073709551615 OFFSET 20"
        );

        let pg = SelectBuilder::new("notes", ["id"])
            .offset(20)
            .placeholder(Placeholder::Dollar)
            .build()
            .unwrap();
        assert_eq!(pg.sql(), "SELECT id FROM notes OFFSET 20");
    }

    #[test]
    fn update_set_last_write_wins() {
        let stmt = UpdateBuilder::new("books")
            .set("title", "first")
            .set("author", "a")
            .set("title", "second")
            .build()
            .unwrap();
        assert_eq!(stmt.sql(), "UPDATE books SET title = ?, author = ?");
        assert_eq!(stmt.args()[0], Value::Text("second".into()));
    }

    #[test]
    fn update_expression_is_verbatim() {
        let stmt = UpdateBuilder::new("books")
            .set("title", "t")
            .set_expr("updated_at", "now()")
            .and_where(Predicate::eq("id", 3))
            .placeholder(Placeholder::Dollar)
            .build()
            .unwrap();
        assert_eq!(
            stmt.sql(),
            "UPDATE books SET title = $1, updated_at = now() WHERE id = $2"
        );
    }

    #[test]
    fn update_without_set_fails() {
        let err = UpdateBuilder::new("books").build().unwrap_err();
        assert!(matches!(err, Error::InvalidStatement(_)));
    }

    #[test]
    fn insert_with_returning() {
        let stmt = InsertBuilder::new("books")
            .value("title", "t")
            .value("author", "a")
            .value_expr("created_at", "now()")
            .returning("id")
            .placeholder(Placeholder::Dollar)
            .build()
            .unwrap();
        assert_eq!(
            stmt.sql(),
            "INSERT INTO books (title, author, created_at) VALUES ($1, $2, now()) RETURNING \"id\""
        );
        assert_eq!(stmt.args().len(), 2);
    }

    #[test]
    fn count_statement() {
        let stmt = SelectBuilder::count("books").build().unwrap();
        assert_eq!(stmt.sql(), "SELECT count(*) FROM books");
    }

    #[test]
    fn question_placeholders() {
        assert_eq!(Placeholder::Question.render(3), "?");
        assert_eq!(Placeholder::Dollar.render(3), "$3");
    }
}
