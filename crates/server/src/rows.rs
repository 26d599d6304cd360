//! Column-by-column conversion of driver rows into JSON objects.

use serde_json::{Map, Number, Value};
use sqlx::mysql::MySqlRow;
use sqlx::sqlite::SqliteRow;
use sqlx::types::chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use sqlx::types::{Decimal, Json};
use sqlx::{Column, Row, TypeInfo, ValueRef};

use crate::errors::StoreError;

/// One result row, keyed by column name in result-set order.
pub type GroceryRow = Map<String, Value>;

pub fn mysql_row(row: &MySqlRow) -> Result<GroceryRow, StoreError> {
    let mut out = Map::with_capacity(row.len());
    for column in row.columns() {
        let value = mysql_value(row, column.ordinal(), column.type_info().name()).map_err(
            |source| StoreError::Decode {
                column: column.name().to_string(),
                source,
            },
        )?;
        out.insert(column.name().to_string(), value);
    }
    Ok(out)
}

pub fn sqlite_row(row: &SqliteRow) -> Result<GroceryRow, StoreError> {
    let mut out = Map::with_capacity(row.len());
    for column in row.columns() {
        let value = sqlite_value(row, column.ordinal()).map_err(|source| StoreError::Decode {
            column: column.name().to_string(),
            source,
        })?;
        out.insert(column.name().to_string(), value);
    }
    Ok(out)
}

/// How a MySQL column type name is turned into JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MySqlKind {
    Signed,
    Unsigned,
    Year,
    Float,
    Double,
    Decimal,
    Date,
    DateTime,
    Timestamp,
    Time,
    Json,
    Binary,
    Text,
}

fn classify(ty: &str) -> MySqlKind {
    match ty {
        "BOOLEAN" | "TINYINT" | "SMALLINT" | "MEDIUMINT" | "INT" | "BIGINT" => MySqlKind::Signed,
        t if t.ends_with("UNSIGNED") => MySqlKind::Unsigned,
        "YEAR" => MySqlKind::Year,
        "FLOAT" => MySqlKind::Float,
        "DOUBLE" => MySqlKind::Double,
        "DECIMAL" => MySqlKind::Decimal,
        "DATE" => MySqlKind::Date,
        "DATETIME" => MySqlKind::DateTime,
        "TIMESTAMP" => MySqlKind::Timestamp,
        "TIME" => MySqlKind::Time,
        "JSON" => MySqlKind::Json,
        "BINARY" | "VARBINARY" | "TINYBLOB" | "BLOB" | "MEDIUMBLOB" | "LONGBLOB" | "BIT"
        | "GEOMETRY" => MySqlKind::Binary,
        _ => MySqlKind::Text,
    }
}

fn mysql_value(row: &MySqlRow, idx: usize, ty: &str) -> Result<Value, sqlx::Error> {
    if row.try_get_raw(idx)?.is_null() {
        return Ok(Value::Null);
    }

    let value = match classify(ty) {
        MySqlKind::Signed => match row.try_get::<i64, _>(idx) {
            Ok(v) => Value::from(v),
            Err(_) => Value::from(row.try_get::<u64, _>(idx)?),
        },
        MySqlKind::Unsigned => Value::from(row.try_get::<u64, _>(idx)?),
        // YEAR arrives as a little-endian integer that no checked decoder accepts.
        MySqlKind::Year => Value::from(row.try_get_unchecked::<i64, _>(idx)?),
        MySqlKind::Float => float(f64::from(row.try_get::<f32, _>(idx)?)),
        MySqlKind::Double => float(row.try_get::<f64, _>(idx)?),
        MySqlKind::Decimal => format_decimal(row.try_get::<Decimal, _>(idx)?),
        MySqlKind::Date => format_date(row.try_get::<NaiveDate, _>(idx)?),
        MySqlKind::DateTime => format_datetime(row.try_get::<NaiveDateTime, _>(idx)?),
        MySqlKind::Timestamp => format_timestamp(row.try_get::<DateTime<Utc>, _>(idx)?),
        MySqlKind::Time => format_time(row.try_get::<NaiveTime, _>(idx)?),
        MySqlKind::Json => row.try_get::<Json<Value>, _>(idx)?.0,
        MySqlKind::Binary => lossy(row.try_get_unchecked::<Vec<u8>, _>(idx)?),
        MySqlKind::Text => match row.try_get::<String, _>(idx) {
            Ok(v) => Value::String(v),
            Err(_) => lossy(row.try_get_unchecked::<Vec<u8>, _>(idx)?),
        },
    };
    Ok(value)
}

fn format_decimal(v: Decimal) -> Value {
    Value::String(v.to_string())
}

fn format_date(v: NaiveDate) -> Value {
    Value::String(v.format("%Y-%m-%d").to_string())
}

fn format_datetime(v: NaiveDateTime) -> Value {
    Value::String(v.format("%Y-%m-%dT%H:%M:%S").to_string())
}

fn format_timestamp(v: DateTime<Utc>) -> Value {
    Value::String(v.to_rfc3339())
}

fn format_time(v: NaiveTime) -> Value {
    Value::String(v.format("%H:%M:%S").to_string())
}

fn sqlite_value(row: &SqliteRow, idx: usize) -> Result<Value, sqlx::Error> {
    // SQLite reports the storage class of the value itself, not the declared type.
    let storage = {
        let raw = row.try_get_raw(idx)?;
        if raw.is_null() {
            return Ok(Value::Null);
        }
        raw.type_info().name().to_string()
    };

    let value = match storage.as_str() {
        "INTEGER" => Value::from(row.try_get::<i64, _>(idx)?),
        "REAL" => float(row.try_get::<f64, _>(idx)?),
        "BLOB" => lossy(row.try_get::<Vec<u8>, _>(idx)?),
        _ => Value::String(row.try_get::<String, _>(idx)?),
    };
    Ok(value)
}

fn float(v: f64) -> Value {
    Number::from_f64(v).map(Value::Number).unwrap_or(Value::Null)
}

fn lossy(bytes: Vec<u8>) -> Value {
    Value::String(String::from_utf8_lossy(&bytes).into_owned())
}
