use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, SecondsFormat, Utc};
use sqlx::mysql::MySqlRow;
use sqlx::types::Decimal;
use sqlx::{Row, TypeInfo, ValueRef};

use vinsnap_core::{Error, FieldValue, Result, WineRecord};

/// How a column's declared SQL type is carried into the snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Signed,
    Unsigned,
    Float,
    Double,
    Decimal,
    Bit,
    Date,
    Time,
    DateTime,
    Timestamp,
    Text,
    Binary,
    Null,
    Unsupported,
}

/// Classify a MySQL type name as reported by the driver.
///
/// `BOOLEAN` is `TINYINT(1)` on the wire and stays numeric; `YEAR` is a
/// small integer. Temporal values are written as ISO 8601 text.
pub fn classify(type_name: &str) -> ColumnKind {
    if type_name.ends_with(" UNSIGNED") {
        return ColumnKind::Unsigned;
    }

    match type_name {
        "TINYINT" | "SMALLINT" | "MEDIUMINT" | "INT" | "BIGINT" | "BOOLEAN" | "YEAR" => {
            ColumnKind::Signed
        }
        "FLOAT" => ColumnKind::Float,
        "DOUBLE" => ColumnKind::Double,
        "DECIMAL" => ColumnKind::Decimal,
        "BIT" => ColumnKind::Bit,
        "DATE" => ColumnKind::Date,
        "TIME" => ColumnKind::Time,
        "DATETIME" => ColumnKind::DateTime,
        "TIMESTAMP" => ColumnKind::Timestamp,
        "CHAR" | "VARCHAR" | "TINYTEXT" | "TEXT" | "MEDIUMTEXT" | "LONGTEXT" | "ENUM" | "SET"
        | "JSON" => ColumnKind::Text,
        "BINARY" | "VARBINARY" | "TINYBLOB" | "BLOB" | "MEDIUMBLOB" | "LONGBLOB" => {
            ColumnKind::Binary
        }
        "NULL" => ColumnKind::Null,
        _ => ColumnKind::Unsupported,
    }
}

pub fn map_wine_rows(rows: &[MySqlRow]) -> Result<Vec<WineRecord>> {
    rows.iter().map(map_wine_row).collect()
}

fn map_wine_row(row: &MySqlRow) -> Result<WineRecord> {
    Ok(WineRecord {
        sku: text(row, "sku")?,
        name: text(row, "name")?,
        price: field_value(row, "price")?,
        vintage: field_value(row, "vintage")?,
        category: text(row, "category")?.unwrap_or_default(),
        region: text(row, "region")?,
        variety: text(row, "variety")?,
        stock: field_value(row, "stock")?,
        image_url: text(row, "image_url")?,
        description: text(row, "description")?,
        status: field_value(row, "status")?,
    })
}

fn text(row: &MySqlRow, column: &str) -> Result<Option<String>> {
    field_value(row, column).map(FieldValue::into_text)
}

/// Decode a column according to its declared type, without coercion.
fn field_value(row: &MySqlRow, column: &str) -> Result<FieldValue> {
    let raw = row.try_get_raw(column).map_err(|err| decode_error(column, err))?;
    if raw.is_null() {
        return Ok(FieldValue::Null);
    }
    let type_name = raw.type_info().name().to_string();

    match classify(&type_name) {
        ColumnKind::Signed => row
            .try_get_unchecked::<i64, _>(column)
            .map(FieldValue::from)
            .map_err(|err| decode_error(column, err)),
        ColumnKind::Unsigned => row
            .try_get_unchecked::<u64, _>(column)
            .map(FieldValue::from)
            .map_err(|err| decode_error(column, err)),
        ColumnKind::Float => {
            let value = row
                .try_get_unchecked::<f32, _>(column)
                .map_err(|err| decode_error(column, err))?;
            float_literal(value)
                .and_then(|literal| FieldValue::from_decimal_str(&literal))
                .ok_or_else(|| non_finite(column, value))
        }
        ColumnKind::Double => {
            let value = row
                .try_get_unchecked::<f64, _>(column)
                .map_err(|err| decode_error(column, err))?;
            FieldValue::from_f64(value).ok_or_else(|| non_finite(column, value))
        }
        ColumnKind::Decimal => {
            let value = row
                .try_get::<Decimal, _>(column)
                .map_err(|err| decode_error(column, err))?;
            FieldValue::from_decimal_str(&value.to_string()).ok_or_else(|| {
                Error::Serialization(format!(
                    "column `{column}` holds unrepresentable decimal {value}"
                ))
            })
        }
        ColumnKind::Bit => {
            let bytes = row
                .try_get_unchecked::<Vec<u8>, _>(column)
                .map_err(|err| decode_error(column, err))?;
            bits_to_u64(&bytes).map(FieldValue::from).ok_or_else(|| {
                Error::Query(format!("column `{column}` holds {} bit bytes", bytes.len()))
            })
        }
        ColumnKind::Date => row
            .try_get_unchecked::<NaiveDate, _>(column)
            .map(|date| FieldValue::Text(format_date(date)))
            .map_err(|err| decode_error(column, err)),
        ColumnKind::Time => row
            .try_get_unchecked::<NaiveTime, _>(column)
            .map(|time| FieldValue::Text(format_time(time)))
            .map_err(|err| decode_error(column, err)),
        ColumnKind::DateTime => row
            .try_get_unchecked::<NaiveDateTime, _>(column)
            .map(|datetime| FieldValue::Text(format_datetime(datetime)))
            .map_err(|err| decode_error(column, err)),
        ColumnKind::Timestamp => row
            .try_get_unchecked::<DateTime<Utc>, _>(column)
            .map(|timestamp| FieldValue::Text(format_timestamp(timestamp)))
            .map_err(|err| decode_error(column, err)),
        ColumnKind::Text => row
            .try_get_unchecked::<String, _>(column)
            .map(FieldValue::from)
            .map_err(|err| decode_error(column, err)),
        ColumnKind::Binary => row
            .try_get_unchecked::<Vec<u8>, _>(column)
            .map(|bytes| FieldValue::from(String::from_utf8_lossy(&bytes).into_owned()))
            .map_err(|err| decode_error(column, err)),
        ColumnKind::Null => Ok(FieldValue::Null),
        ColumnKind::Unsupported => Err(Error::Query(format!(
            "column `{column}` has unsupported type {type_name}"
        ))),
    }
}

/// Shortest text that reads back as the same `f32`, so a stored `0.1` stays
/// `0.1` instead of its widened `f64` expansion.
fn float_literal(value: f32) -> Option<String> {
    value.is_finite().then(|| value.to_string())
}

/// `BIT(n)` arrives as big-endian bytes, at most eight of them.
fn bits_to_u64(bytes: &[u8]) -> Option<u64> {
    if bytes.len() > 8 {
        return None;
    }
    Some(bytes.iter().fold(0_u64, |acc, byte| (acc << 8) | u64::from(*byte)))
}

fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn format_time(time: NaiveTime) -> String {
    time.format("%H:%M:%S%.f").to_string()
}

fn format_datetime(datetime: NaiveDateTime) -> String {
    datetime.format("%Y-%m-%dT%H:%M:%S%.f").to_string()
}

fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

fn non_finite(column: &str, value: impl std::fmt::Display) -> Error {
    Error::Serialization(format!("column `{column}` holds non-finite value {value}"))
}

fn decode_error(column: &str, err: sqlx::Error) -> Error {
    Error::Query(format!("failed to decode column `{column}`: {err}"))
}
