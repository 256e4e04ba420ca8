// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Backend-neutral values, rows and conversions.
//!
//! Statement arguments and decoded columns share one [`Value`] enum so the
//! builders, the mock backend and the sqlx adapters never branch on driver
//! types. Generated code moves entity fields in and out of it through
//! [`From`], [`FromValue`] and [`IsZero`].

use chrono::{DateTime, NaiveDateTime, Utc};

use crate::Error;

/// A statement argument or a decoded column value.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// SQL `NULL`.
    #[default]
    Null,
    /// Boolean.
    Bool(bool),
    /// Integer, widened to 64 bits.
    Int(i64),
    /// Floating point, widened to 64 bits.
    Float(f64),
    /// Text.
    Text(String),
    /// Point in time, normalized to UTC.
    Timestamp(DateTime<Utc>),
    /// Binary data.
    Bytes(Vec<u8>)
}

impl Value {
    /// Check if this value is `NULL`.
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Short type name used in decode errors.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Text(_) => "text",
            Self::Timestamp(_) => "timestamp",
            Self::Bytes(_) => "bytes"
        }
    }
}

macro_rules! value_from_int {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Self::Int(i64::from(v))
                }
            }
        )*
    };
}

value_from_int!(i8, i16, i32, i64, u8, u16, u32);

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Self::Float(f64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Text(v.to_owned())
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(v: DateTime<Utc>) -> Self {
        Self::Timestamp(v)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(v: NaiveDateTime) -> Self {
        Self::Timestamp(v.and_utc())
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Self::Bytes(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

/// Decode a [`Value`] into a Rust field type.
///
/// `column` only feeds error messages.
pub trait FromValue: Sized {
    /// Convert `value`, failing with [`Error::Decode`] on a type mismatch.
    fn from_value(column: &str, value: Value) -> Result<Self, Error>;
}

fn mismatch(column: &str, expected: &str, value: &Value) -> Error {
    Error::decode(column, format!("expected {expected}, found {}", value.kind()))
}

impl FromValue for Value {
    fn from_value(_column: &str, value: Value) -> Result<Self, Error> {
        Ok(value)
    }
}

impl FromValue for i64 {
    fn from_value(column: &str, value: Value) -> Result<Self, Error> {
        match value {
            Value::Int(v) => Ok(v),
            Value::Bool(v) => Ok(i64::from(v)),
            other => Err(mismatch(column, "int", &other))
        }
    }
}

macro_rules! narrow_int {
    ($($ty:ty),*) => {
        $(
            impl FromValue for $ty {
                fn from_value(column: &str, value: Value) -> Result<Self, Error> {
                    let wide = i64::from_value(column, value)?;
                    <$ty>::try_from(wide).map_err(|e| Error::decode(column, e))
                }
            }
        )*
    };
}

narrow_int!(i8, i16, i32, u8, u16, u32, u64);

impl FromValue for bool {
    fn from_value(column: &str, value: Value) -> Result<Self, Error> {
        match value {
            Value::Bool(v) => Ok(v),
            Value::Int(0) => Ok(false),
            Value::Int(1) => Ok(true),
            other => Err(mismatch(column, "bool", &other))
        }
    }
}

impl FromValue for f64 {
    fn from_value(column: &str, value: Value) -> Result<Self, Error> {
        match value {
            Value::Float(v) => Ok(v),
            Value::Int(v) => Ok(v as f64),
            other => Err(mismatch(column, "float", &other))
        }
    }
}

impl FromValue for f32 {
    fn from_value(column: &str, value: Value) -> Result<Self, Error> {
        f64::from_value(column, value).map(|v| v as f32)
    }
}

impl FromValue for String {
    fn from_value(column: &str, value: Value) -> Result<Self, Error> {
        match value {
            Value::Text(v) => Ok(v),
            other => Err(mismatch(column, "text", &other))
        }
    }
}

impl FromValue for DateTime<Utc> {
    fn from_value(column: &str, value: Value) -> Result<Self, Error> {
        match value {
            Value::Timestamp(v) => Ok(v),
            Value::Text(s) => DateTime::parse_from_rfc3339(&s)
                .map(|v| v.with_timezone(&Utc))
                .map_err(|e| Error::decode(column, e)),
            other => Err(mismatch(column, "timestamp", &other))
        }
    }
}

impl FromValue for NaiveDateTime {
    fn from_value(column: &str, value: Value) -> Result<Self, Error> {
        DateTime::<Utc>::from_value(column, value).map(|v| v.naive_utc())
    }
}

impl FromValue for Vec<u8> {
    fn from_value(column: &str, value: Value) -> Result<Self, Error> {
        match value {
            Value::Bytes(v) => Ok(v),
            other => Err(mismatch(column, "bytes", &other))
        }
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(column: &str, value: Value) -> Result<Self, Error> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(column, other).map(Some)
        }
    }
}

/// Zero-value test used by generated `patch` methods.
///
/// A field whose value is zero is treated as "not provided" and left out of
/// the `SET` clause. There is no way to tell an explicit zero from an unset
/// field; wrap the field in `Option` when that distinction matters.
pub trait IsZero {
    /// Check if the value equals the type's zero value.
    fn is_zero(&self) -> bool;
}

macro_rules! is_zero_num {
    ($($ty:ty),*) => {
        $(
            impl IsZero for $ty {
                fn is_zero(&self) -> bool {
                    *self == 0 as $ty
                }
            }
        )*
    };
}

is_zero_num!(i8, i16, i32, i64, u8, u16, u32, u64, f32, f64);

impl IsZero for bool {
    fn is_zero(&self) -> bool {
        !*self
    }
}

impl IsZero for String {
    fn is_zero(&self) -> bool {
        self.is_empty()
    }
}

impl IsZero for Vec<u8> {
    fn is_zero(&self) -> bool {
        self.is_empty()
    }
}

impl IsZero for DateTime<Utc> {
    fn is_zero(&self) -> bool {
        *self == DateTime::<Utc>::default()
    }
}

impl IsZero for NaiveDateTime {
    fn is_zero(&self) -> bool {
        *self == NaiveDateTime::default()
    }
}

impl IsZero for Value {
    fn is_zero(&self) -> bool {
        match self {
            Self::Null => true,
            Self::Bool(v) => v.is_zero(),
            Self::Int(v) => v.is_zero(),
            Self::Float(v) => v.is_zero(),
            Self::Text(v) => v.is_zero(),
            Self::Timestamp(v) => v.is_zero(),
            Self::Bytes(v) => v.is_zero()
        }
    }
}

impl<T> IsZero for Option<T> {
    fn is_zero(&self) -> bool {
        self.is_none()
    }
}

/// One row returned by a backend.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Row {
    columns: Vec<String>,
    values:  Vec<Value>
}

impl Row {
    /// Create an empty row.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a column (builder style).
    pub fn with(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.push(column, value);
        self
    }

    /// Append a column.
    pub fn push(&mut self, column: impl Into<String>, value: impl Into<Value>) {
        self.columns.push(column.into());
        self.values.push(value.into());
    }

    /// Number of columns.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if the row has no columns.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Column names in select order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Decode the column named `column`.
    pub fn get<T: FromValue>(&self, column: &str) -> Result<T, Error> {
        let idx = self
            .columns
            .iter()
            .position(|c| c == column)
            .ok_or_else(|| Error::decode(column, "no such column"))?;
        T::from_value(column, self.values[idx].clone())
    }

    /// Decode the column at `idx` (0-based).
    pub fn get_index<T: FromValue>(&self, idx: usize) -> Result<T, Error> {
        let name = self
            .columns
            .get(idx)
            .cloned()
            .unwrap_or_else(|| idx.to_string());
        let value = self
            .values
            .get(idx)
            .cloned()
            .ok_or_else(|| Error::decode(name.as_str(), "column index out of range"))?;
        T::from_value(&name, value)
    }
}

/// Outcome of a statement that does not return rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Executed {
    /// Rows touched by the statement.
    pub rows_affected:  u64,
    /// Id generated by the backend for an INSERT, when it reports one.
    pub last_insert_id: Option<i64>
}

impl Executed {
    /// Create an outcome.
    pub const fn new(rows_affected: u64, last_insert_id: Option<i64>) -> Self {
        Self {
            rows_affected,
            last_insert_id
        }
    }
}
