// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! PostgreSQL backend via `sqlx::PgPool`.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use sqlx::{
    Column, PgPool, Postgres, Row as _, TypeInfo,
    postgres::{PgArguments, PgRow},
    query::Query
};

use crate::{BoxError, Error, Executed, Row, Statement, TransactionOps, Transactional, Value};

type PgQuery<'q> = Query<'q, Postgres, PgArguments>;

fn bind(mut query: PgQuery<'_>, args: Vec<Value>) -> PgQuery<'_> {
    for arg in args {
        query = match arg {
            // Builders write NULL inline; only hand-built statements get here,
            // and the parameter is typed as text.
            Value::Null => query.bind(None::<String>),
            Value::Bool(v) => query.bind(v),
            Value::Int(v) => query.bind(v),
            Value::Float(v) => query.bind(v),
            Value::Text(v) => query.bind(v),
            Value::Timestamp(v) => query.bind(v),
            Value::Bytes(v) => query.bind(v)
        };
    }
    query
}

fn get<T>(row: &PgRow, idx: usize, column: &str) -> Result<Option<T>, Error>
where
    T: for<'r> sqlx::Decode<'r, Postgres> + sqlx::Type<Postgres>
{
    row.try_get::<Option<T>, _>(idx)
        .map_err(|e| Error::decode(column, e))
}

fn decode_row(row: &PgRow) -> Result<Row, Error> {
    let mut out = Row::new();
    for (idx, column) in row.columns().iter().enumerate() {
        let name = column.name();
        let value = match column.type_info().name() {
            "BOOL" => get::<bool>(row, idx, name)?.map(Value::Bool),
            "INT2" => get::<i16>(row, idx, name)?.map(|v| Value::Int(v.into())),
            "INT4" => get::<i32>(row, idx, name)?.map(|v| Value::Int(v.into())),
            "INT8" => get::<i64>(row, idx, name)?.map(Value::Int),
            "FLOAT4" => get::<f32>(row, idx, name)?.map(|v| Value::Float(v.into())),
            "FLOAT8" => get::<f64>(row, idx, name)?.map(Value::Float),
            "TEXT" | "VARCHAR" | "BPCHAR" | "NAME" | "CHAR" => {
                get::<String>(row, idx, name)?.map(Value::Text)
            }
            "TIMESTAMPTZ" => get::<DateTime<Utc>>(row, idx, name)?.map(Value::Timestamp),
            "TIMESTAMP" => get::<NaiveDateTime>(row, idx, name)?.map(|v| Value::Timestamp(v.and_utc())),
            "BYTEA" => get::<Vec<u8>>(row, idx, name)?.map(Value::Bytes),
            other => return Err(Error::decode(name, format!("unsupported column type {other}")))
        };
        out.push(name, value.unwrap_or_default());
    }
    Ok(out)
}

fn decode_rows(rows: &[PgRow]) -> Result<Vec<Row>, Error> {
    rows.iter().map(decode_row).collect()
}

#[async_trait]
impl Transactional for PgPool {
    type Transaction = sqlx::Transaction<'static, Postgres>;

    async fn begin(&self) -> Result<Self::Transaction, BoxError> {
        Ok(sqlx::Pool::begin(self).await?)
    }

    async fn fetch_all(&self, statement: Statement) -> Result<Vec<Row>, Error> {
        let (sql, args) = statement.into_parts();
        let rows = bind(sqlx::query(&sql), args)
            .fetch_all(self)
            .await
            .map_err(Error::database)?;
        decode_rows(&rows)
    }
}

#[async_trait]
impl TransactionOps for sqlx::Transaction<'static, Postgres> {
    async fn execute(&mut self, statement: Statement) -> Result<Executed, Error> {
        let (sql, args) = statement.into_parts();
        let done = bind(sqlx::query(&sql), args)
            .execute(&mut **self)
            .await
            .map_err(Error::database)?;
        Ok(Executed::new(done.rows_affected(), None))
    }

    async fn fetch_all(&mut self, statement: Statement) -> Result<Vec<Row>, Error> {
        let (sql, args) = statement.into_parts();
        let rows = bind(sqlx::query(&sql), args)
            .fetch_all(&mut **self)
            .await
            .map_err(Error::database)?;
        decode_rows(&rows)
    }

    async fn commit(self) -> Result<(), BoxError> {
        Ok(sqlx::Transaction::commit(self).await?)
    }

    async fn rollback(self) -> Result<(), BoxError> {
        Ok(sqlx::Transaction::rollback(self).await?)
    }
}
