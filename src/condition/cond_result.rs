use std::fmt;

/// Outcome of compiling a restriction: a constant or a SQL boolean expression.
#[derive(Clone, PartialEq, Eq)]
pub enum CondResult {
    Bool(bool),
    Sql(String),
}

impl CondResult {
    pub fn is_true(&self) -> bool {
        matches!(self, CondResult::Bool(true))
    }

    pub fn is_false(&self) -> bool {
        matches!(self, CondResult::Bool(false))
    }

    /// Render as a SQL boolean expression.
    pub fn to_sql(&self) -> String {
        match self {
            CondResult::Bool(true) => "TRUE".to_string(),
            CondResult::Bool(false) => "FALSE".to_string(),
            CondResult::Sql(sql) => sql.clone(),
        }
    }
}

impl fmt::Debug for CondResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CondResult::Bool(b) => write!(f, "Bool({})", b),
            CondResult::Sql(s) => write!(f, "Sql({})", s),
        }
    }
}
