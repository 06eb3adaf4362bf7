use serde_json::{Map, Value};

use crate::{condition::{AndList, Literal}, error::{QueryError, Result}, expression::{QueryExpression, UniversalSet}};

/// Anything a query expression can be restricted by.
#[derive(Debug, Clone, PartialEq)]
pub enum Restriction {
    /// Constant truth value
    Const(bool),
    /// Raw SQL boolean expression
    Raw(String),
    /// Attribute equalities, in declaration order
    Mapping(Vec<(String, Literal)>),
    /// A fetched row used as a restriction
    Record(Map<String, Value>),
    /// Disjunction
    OrList(Vec<Restriction>),
    /// Conjunction
    AndList(AndList),
    /// Complement
    Not(Box<Restriction>),
    /// Semijoin on the common attributes of another expression
    Expr { expr: Box<QueryExpression>, semantic_check: bool },
    /// The universal set: always true
    Universal(UniversalSet),
}

impl Restriction {
    pub fn raw(sql: &str) -> Self {
        Restriction::Raw(sql.to_string())
    }

    pub fn mapping<K: Into<String>, V: Into<Literal>>(pairs: impl IntoIterator<Item = (K, V)>) -> Self {
        Restriction::Mapping(pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }

    pub fn record(row: Map<String, Value>) -> Self {
        Restriction::Record(row)
    }

    pub fn not(restriction: impl Into<Restriction>) -> Self {
        Restriction::Not(Box::new(restriction.into()))
    }

    pub fn or(items: impl IntoIterator<Item = Restriction>) -> Self {
        Restriction::OrList(items.into_iter().collect())
    }

    pub fn and(items: impl IntoIterator<Item = Restriction>) -> Self {
        Restriction::AndList(items.into_iter().collect())
    }

    /// Semijoin that skips lineage matching on the shared attributes.
    pub fn unchecked(expr: &QueryExpression) -> Self {
        Restriction::Expr { expr: Box::new(expr.clone()), semantic_check: false }
    }

    /// Build a restriction from a dynamically typed value.
    ///
    /// Strings are raw SQL, booleans are constants, arrays are disjunctions,
    /// objects are records and `null` is an empty disjunction. Numbers have
    /// no meaning as restrictions.
    pub fn from_value(value: &Value) -> Result<Self> {
        match value {
            Value::Null => Ok(Restriction::OrList(vec![])),
            Value::Bool(b) => Ok(Restriction::Const(*b)),
            Value::String(s) => Ok(Restriction::Raw(s.clone())),
            Value::Array(items) => Ok(Restriction::OrList(
                items.iter().map(Restriction::from_value).collect::<Result<Vec<_>>>()?,
            )),
            Value::Object(row) => Ok(Restriction::Record(row.clone())),
            Value::Number(n) => QueryError::InvalidRestriction(format!("Invalid restriction type {}", n)).err(),
        }
    }
}

impl From<bool> for Restriction {
    fn from(b: bool) -> Self { Restriction::Const(b) }
}

impl From<&str> for Restriction {
    fn from(s: &str) -> Self { Restriction::raw(s) }
}

impl From<String> for Restriction {
    fn from(s: String) -> Self { Restriction::Raw(s) }
}

impl From<AndList> for Restriction {
    fn from(list: AndList) -> Self { Restriction::AndList(list) }
}

impl From<Vec<Restriction>> for Restriction {
    fn from(items: Vec<Restriction>) -> Self { Restriction::OrList(items) }
}

impl From<Map<String, Value>> for Restriction {
    fn from(row: Map<String, Value>) -> Self { Restriction::Record(row) }
}

impl From<&QueryExpression> for Restriction {
    fn from(expr: &QueryExpression) -> Self {
        Restriction::Expr { expr: Box::new(expr.clone()), semantic_check: true }
    }
}

impl From<QueryExpression> for Restriction {
    fn from(expr: QueryExpression) -> Self {
        Restriction::Expr { expr: Box::new(expr), semantic_check: true }
    }
}

impl From<UniversalSet> for Restriction {
    fn from(u: UniversalSet) -> Self { Restriction::Universal(u) }
}

/// `None` restricts to nothing, like an empty disjunction.
impl From<Option<Restriction>> for Restriction {
    fn from(r: Option<Restriction>) -> Self {
        r.unwrap_or(Restriction::OrList(vec![]))
    }
}
