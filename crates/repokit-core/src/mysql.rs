// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! MySQL backend via `sqlx::MySqlPool`, the reference backend for the
//! generic dialect.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use sqlx::{
    Column, MySql, MySqlPool, Row as _, TypeInfo,
    mysql::{MySqlArguments, MySqlRow},
    query::Query
};

use crate::{BoxError, Error, Executed, Row, Statement, TransactionOps, Transactional, Value};

type MySqlQuery<'q> = Query<'q, MySql, MySqlArguments>;

fn bind(mut query: MySqlQuery<'_>, args: Vec<Value>) -> MySqlQuery<'_> {
    for arg in args {
        query = match arg {
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

fn get<T>(row: &MySqlRow, idx: usize, column: &str) -> Result<Option<T>, Error>
where
    T: for<'r> sqlx::Decode<'r, MySql> + sqlx::Type<MySql>
{
    row.try_get::<Option<T>, _>(idx)
        .map_err(|e| Error::decode(column, e))
}

fn decode_row(row: &MySqlRow) -> Result<Row, Error> {
    let mut out = Row::new();
    for (idx, column) in row.columns().iter().enumerate() {
        let name = column.name();
        let value = match column.type_info().name() {
            "BOOLEAN" => get::<bool>(row, idx, name)?.map(Value::Bool),
            "TINYINT" | "SMALLINT" | "MEDIUMINT" | "INT" | "BIGINT" => {
                get::<i64>(row, idx, name)?.map(Value::Int)
            }
            "TINYINT UNSIGNED" | "SMALLINT UNSIGNED" | "MEDIUMINT UNSIGNED" | "INT UNSIGNED"
            | "BIGINT UNSIGNED" => match get::<u64>(row, idx, name)? {
                Some(v) => Some(Value::Int(
                    i64::try_from(v).map_err(|e| Error::decode(name, e))?
                )),
                None => None
            },
            "FLOAT" | "DOUBLE" => get::<f64>(row, idx, name)?.map(Value::Float),
            "VARCHAR" | "CHAR" | "TEXT" | "TINYTEXT" | "MEDIUMTEXT" | "LONGTEXT" | "ENUM" => {
                get::<String>(row, idx, name)?.map(Value::Text)
            }
            "TIMESTAMP" => get::<DateTime<Utc>>(row, idx, name)?.map(Value::Timestamp),
            "DATETIME" => get::<NaiveDateTime>(row, idx, name)?.map(|v| Value::Timestamp(v.and_utc())),
            "BLOB" | "TINYBLOB" | "MEDIUMBLOB" | "LONGBLOB" | "BINARY" | "VARBINARY" => {
                get::<Vec<u8>>(row, idx, name)?.map(Value::Bytes)
            }
            other => return Err(Error::decode(name, format!("unsupported column type {other}")))
        };
        out.push(name, value.unwrap_or_default());
    }
    Ok(out)
}

fn decode_rows(rows: &[MySqlRow]) -> Result<Vec<Row>, Error> {
    rows.iter().map(decode_row).collect()
}

#[async_trait]
impl Transactional for MySqlPool {
    type Transaction = sqlx::Transaction<'static, MySql>;

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
impl TransactionOps for sqlx::Transaction<'static, MySql> {
    async fn execute(&mut self, statement: Statement) -> Result<Executed, Error> {
        let (sql, args) = statement.into_parts();
        let done = bind(sqlx::query(&sql), args)
            .execute(&mut **self)
            .await
            .map_err(Error::database)?;
        // Zero means the statement generated no id.
        let last_insert_id = match done.last_insert_id() {
            0 => None,
            id => Some(i64::try_from(id).map_err(|e| Error::decode("last_insert_id", e))?)
        };
        Ok(Executed::new(done.rows_affected(), last_insert_id))
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
