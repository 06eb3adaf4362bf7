use std::fmt::{self, Display};

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use ordered_float::NotNan;
use serde_json::Value;
use uuid::Uuid;

/// A value on the right-hand side of an equality restriction.
#[derive(Clone, PartialEq)]
pub enum Literal {
    Null,
    Bool(bool),
    Int(i64),
    Float(NotNan<f64>),
    String(String),
    /// Decimal kept in its exact textual form
    Decimal(String),
    Date(NaiveDate),
    Time(NaiveTime),
    DateTime(NaiveDateTime),
    Uuid(Uuid),
    List(Vec<Literal>),
    Json(Value),
}

impl Literal {
    pub fn decimal(text: &str) -> Self {
        Literal::Decimal(text.to_string())
    }

    pub fn is_null(&self) -> bool {
        match self {
            Literal::Null => true,
            Literal::Float(n) => !n.is_finite(),
            _ => false,
        }
    }
}

impl Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Null => write!(f, "NULL"),
            Literal::Bool(b) => write!(f, "{}", if *b { "TRUE" } else { "FALSE" }),
            Literal::Int(i) => write!(f, "{}", i),
            Literal::Float(n) if !n.is_finite() => write!(f, "NULL"),
            Literal::Float(n) => write!(f, "{}", n.into_inner()),
            Literal::String(s) | Literal::Decimal(s) => write!(f, "{}", s),
            Literal::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Literal::Time(t) => write!(f, "{}", t.format("%H:%M:%S%.f")),
            Literal::DateTime(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S%.f")),
            Literal::Uuid(u) => write!(f, "{}", u),
            Literal::List(items) => {
                let parts: Vec<String> = items.iter().map(|i| i.to_string()).collect();
                write!(f, "[{}]", parts.join(", "))
            }
            Literal::Json(v) => write!(f, "{}", v),
        }
    }
}

impl fmt::Debug for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Null => write!(f, "Null"),
            Literal::Bool(_) => write!(f, "Bool({})", self),
            Literal::Int(_) => write!(f, "Int({})", self),
            Literal::Float(_) => write!(f, "Float({})", self),
            Literal::String(_) => write!(f, "String({:?})", self.to_string()),
            Literal::Decimal(_) => write!(f, "Decimal({})", self),
            Literal::Date(_) => write!(f, "Date({})", self),
            Literal::Time(_) => write!(f, "Time({})", self),
            Literal::DateTime(_) => write!(f, "DateTime({})", self),
            Literal::Uuid(_) => write!(f, "Uuid({})", self),
            Literal::List(_) => write!(f, "List({})", self),
            Literal::Json(_) => write!(f, "Json({})", self),
        }
    }
}

impl From<bool> for Literal { fn from(v: bool) -> Self { Literal::Bool(v) } }
impl From<i32> for Literal { fn from(v: i32) -> Self { Literal::Int(v as i64) } }
impl From<i64> for Literal { fn from(v: i64) -> Self { Literal::Int(v) } }
impl From<&str> for Literal { fn from(v: &str) -> Self { Literal::String(v.to_string()) } }
impl From<String> for Literal { fn from(v: String) -> Self { Literal::String(v) } }
impl From<NaiveDate> for Literal { fn from(v: NaiveDate) -> Self { Literal::Date(v) } }
impl From<NaiveTime> for Literal { fn from(v: NaiveTime) -> Self { Literal::Time(v) } }
impl From<NaiveDateTime> for Literal { fn from(v: NaiveDateTime) -> Self { Literal::DateTime(v) } }
impl From<Uuid> for Literal { fn from(v: Uuid) -> Self { Literal::Uuid(v) } }

/// NaN and the infinities have no SQL spelling and map to NULL.
impl From<f64> for Literal {
    fn from(v: f64) -> Self {
        if !v.is_finite() {
            return Literal::Null;
        }
        NotNan::new(v).map(Literal::Float).unwrap_or(Literal::Null)
    }
}

impl<T: Into<Literal>> From<Option<T>> for Literal {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Literal::Null)
    }
}

impl<T: Into<Literal>> From<Vec<T>> for Literal {
    fn from(v: Vec<T>) -> Self {
        Literal::List(v.into_iter().map(Into::into).collect())
    }
}

impl From<Value> for Literal {
    fn from(v: Value) -> Self {
        match v {
            Value::Null => Literal::Null,
            Value::Bool(b) => Literal::Bool(b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Literal::Int(i),
                None => n.as_f64().map(Literal::from).unwrap_or(Literal::Null),
            },
            Value::String(s) => Literal::String(s),
            Value::Array(items) => Literal::List(items.into_iter().map(Literal::from).collect()),
            obj @ Value::Object(_) => Literal::Json(obj),
        }
    }
}
