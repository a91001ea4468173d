//! Scalar bind values.
//!
//! Request bodies carry JSON scalars, while table columns have concrete Postgres
//! types (`integer`, `numeric`, `text`...). [`Value`] keeps the JSON shape and
//! converts to the column's wire type when tokio-postgres binds it, so a JSON
//! number can land in an `integer` column and a JSON string in a `numeric` one.

use crate::error::{SqlError, SqlResult};
use bytes::BytesMut;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt;
use tokio_postgres::types::{IsNull, ToSql, Type, to_sql_checked};

type BoxError = Box<dyn Error + Sync + Send>;

/// A JSON-representable scalar bound as a statement parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Whole-number view. Integral text such as `"150"` counts, since query
    /// strings carry numbers as text; floats and `"2.5"` do not.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            Value::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub(crate) fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Int(_) | Value::Float(_) => "number",
            Value::Text(_) => "string",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Text(s) => write!(f, "{s:?}"),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

impl TryFrom<serde_json::Value> for Value {
    type Error = SqlError;

    fn try_from(json: serde_json::Value) -> SqlResult<Self> {
        match json {
            serde_json::Value::Null => Ok(Value::Null),
            serde_json::Value::Bool(b) => Ok(Value::Bool(b)),
            serde_json::Value::Number(n) => n
                .as_i64()
                .map(Value::Int)
                .or_else(|| n.as_f64().map(Value::Float))
                .ok_or_else(|| SqlError::validation(format!("number out of range: {n}"))),
            serde_json::Value::String(s) => Ok(Value::Text(s)),
            other => Err(SqlError::validation(format!(
                "expected a scalar value, got {other}"
            ))),
        }
    }
}

fn int_to_sql(i: i64, ty: &Type, out: &mut BytesMut) -> Result<IsNull, BoxError> {
    if *ty == Type::INT2 {
        i16::try_from(i)?.to_sql(ty, out)
    } else if *ty == Type::INT4 {
        i32::try_from(i)?.to_sql(ty, out)
    } else if *ty == Type::FLOAT4 {
        (i as f32).to_sql(ty, out)
    } else if *ty == Type::FLOAT8 {
        (i as f64).to_sql(ty, out)
    } else if *ty == Type::NUMERIC {
        Decimal::from(i).to_sql(ty, out)
    } else {
        i.to_sql_checked(ty, out)
    }
}

fn float_to_sql(f: f64, ty: &Type, out: &mut BytesMut) -> Result<IsNull, BoxError> {
    if *ty == Type::FLOAT4 {
        (f as f32).to_sql(ty, out)
    } else if *ty == Type::NUMERIC {
        Decimal::try_from(f)?.to_sql(ty, out)
    } else {
        f.to_sql_checked(ty, out)
    }
}

fn text_to_sql(s: &str, ty: &Type, out: &mut BytesMut) -> Result<IsNull, BoxError> {
    if *ty == Type::NUMERIC {
        s.trim().parse::<Decimal>()?.to_sql(ty, out)
    } else {
        s.to_sql_checked(ty, out)
    }
}

impl ToSql for Value {
    fn to_sql(&self, ty: &Type, out: &mut BytesMut) -> Result<IsNull, BoxError> {
        match self {
            Value::Null => Ok(IsNull::Yes),
            Value::Bool(b) => b.to_sql_checked(ty, out),
            Value::Int(i) => int_to_sql(*i, ty, out),
            Value::Float(f) => float_to_sql(*f, ty, out),
            Value::Text(s) => text_to_sql(s, ty, out),
        }
    }

    // Type checking happens per variant in `to_sql`.
    fn accepts(_ty: &Type) -> bool {
        true
    }

    to_sql_checked!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn json_scalars_convert() {
        assert_eq!(Value::try_from(json!(null)).unwrap(), Value::Null);
        assert_eq!(Value::try_from(json!(true)).unwrap(), Value::Bool(true));
        assert_eq!(Value::try_from(json!(32)).unwrap(), Value::Int(32));
        assert_eq!(Value::try_from(json!(0.5)).unwrap(), Value::Float(0.5));
        assert_eq!(Value::try_from(json!("c1")).unwrap(), Value::Text("c1".into()));
    }

    #[test]
    fn json_containers_are_rejected() {
        assert!(Value::try_from(json!([1, 2])).is_err());
        assert!(Value::try_from(json!({"a": 1})).is_err());
    }

    #[test]
    fn deserializes_untagged() {
        let v: Vec<Value> = serde_json::from_str(r#"[null, false, 7, 1.5, "x"]"#).unwrap();
        assert_eq!(
            v,
            vec![
                Value::Null,
                Value::Bool(false),
                Value::Int(7),
                Value::Float(1.5),
                Value::Text("x".into()),
            ]
        );
    }

    #[test]
    fn int_narrows_to_column_type() {
        let mut buf = BytesMut::new();
        assert!(Value::Int(100).to_sql_checked(&Type::INT4, &mut buf).is_ok());
        assert_eq!(&buf[..], &100_i32.to_be_bytes());

        let mut buf = BytesMut::new();
        assert!(
            Value::Int(i64::from(i32::MAX) + 1)
                .to_sql_checked(&Type::INT4, &mut buf)
                .is_err()
        );
    }

    #[test]
    fn text_binds_to_numeric() {
        let mut buf = BytesMut::new();
        assert!(Value::from("0.2").to_sql_checked(&Type::NUMERIC, &mut buf).is_ok());

        let mut buf = BytesMut::new();
        assert!(
            Value::from("lots")
                .to_sql_checked(&Type::NUMERIC, &mut buf)
                .is_err()
        );
    }

    #[test]
    fn mismatched_types_fail() {
        let mut buf = BytesMut::new();
        assert!(Value::Bool(true).to_sql_checked(&Type::TEXT, &mut buf).is_err());
        let mut buf = BytesMut::new();
        assert!(Value::from("x").to_sql_checked(&Type::INT4, &mut buf).is_err());
    }

    #[test]
    fn integer_view_rejects_fractions() {
        assert_eq!(Value::Int(3).as_integer(), Some(3));
        assert_eq!(Value::from(" 150 ").as_integer(), Some(150));
        assert_eq!(Value::from("2.5").as_integer(), None);
        assert_eq!(Value::from("NaN").as_integer(), None);
        assert_eq!(Value::Float(2.0).as_integer(), None);
        assert_eq!(Value::Bool(true).as_integer(), None);
    }

    #[test]
    fn null_binds_to_anything() {
        let mut buf = BytesMut::new();
        let is_null = Value::Null.to_sql_checked(&Type::NUMERIC, &mut buf).unwrap();
        assert!(matches!(is_null, IsNull::Yes));
    }
}
