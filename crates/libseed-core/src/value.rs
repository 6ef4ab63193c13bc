use chrono::{NaiveDate, NaiveDateTime};

use crate::error::{Error, Result};

/// Typed value of one column in a generated row.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Date(NaiveDate),
    Timestamp(NaiveDateTime),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Text(_) => "text",
            Value::Date(_) => "date",
            Value::Timestamp(_) => "timestamp",
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(value) => Some(value.as_str()),
            _ => None,
        }
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Value::Null)
    }
}

/// Render a value as a SQL literal for a multi-row INSERT.
///
/// Only null, text and finite numbers are accepted. Text is single-quoted with
/// embedded quotes doubled; nothing else is escaped, so the input must come
/// from trusted generators. Any other kind is rejected rather than stringified.
pub fn encode_value(value: &Value) -> Result<String> {
    match value {
        Value::Null => Ok("NULL".to_string()),
        Value::Int(value) => Ok(value.to_string()),
        Value::Float(value) if value.is_finite() => Ok(value.to_string()),
        Value::Float(_) => Err(Error::UnsupportedValue {
            kind: "non-finite float",
        }),
        Value::Text(value) => Ok(quote_text(value)),
        other => Err(Error::UnsupportedValue { kind: other.kind() }),
    }
}

/// Render a whole row as a parenthesized tuple: `(v1,v2,...)`.
pub fn encode_row(row: &[Value]) -> Result<String> {
    let mut out = String::from("(");
    for (idx, value) in row.iter().enumerate() {
        if idx > 0 {
            out.push(',');
        }
        out.push_str(&encode_value(value)?);
    }
    out.push(')');
    Ok(out)
}

fn quote_text(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('\'');
    for ch in value.chars() {
        if ch == '\'' {
            out.push('\'');
        }
        out.push(ch);
    }
    out.push('\'');
    out
}
