use thiserror::Error;

/// Canonical result for the query-expression engine.
pub type Result<T> = std::result::Result<T, QueryError>;

/// Compile-time errors raised while building or rendering query expressions.
///
/// None of these are retryable: they all describe a query that cannot be
/// compiled as written.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum QueryError {
    #[error("Invalid restriction: {0}")]
    InvalidRestriction(String),

    #[error("non-homologous namesake: {0}")]
    NonHomologousNamesake(String),

    #[error("Cannot join query expressions: {0}")]
    JoinIncompatible(String),

    #[error("Left join requires A → B")]
    LeftJoinNotEligible,

    #[error("Invalid union: {0}")]
    UnionShapeMismatch(String),

    #[error("Badly formed UUID {value} in restriction by `{attribute}`")]
    MalformedUuidLiteral { attribute: String, value: String },

    #[error("Restriction on derived attribute `{0}` requires a subquery")]
    UnresolvableProjectionRestriction(String),

    #[error("Attribute `{0}` is not found")]
    UnknownAttribute(String),

    #[error("Invalid projection: {0}")]
    InvalidProjection(String),

    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),

    #[error("Invalid heading: {0}")]
    InvalidHeading(String),

    #[error("Session is not connected to a database")]
    NotConnected,
}

impl QueryError {
    pub fn cross_session() -> Self {
        QueryError::JoinIncompatible(
            "operands originate from different database sessions".into(),
        )
    }

    pub fn dependent_attribute(name: &str) -> Self {
        QueryError::JoinIncompatible(format!("shared secondary attribute `{name}`"))
    }

    pub fn no_complement() -> Self {
        QueryError::UnsupportedOperation("infinite set has no complement".into())
    }

    pub fn err<T>(self) -> Result<T> {
        Err(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_keep_user_visible_text() {
        assert_eq!(
            QueryError::NonHomologousNamesake("id".into()).to_string(),
            "non-homologous namesake: id"
        );
        assert_eq!(QueryError::LeftJoinNotEligible.to_string(), "Left join requires A → B");
        assert!(QueryError::no_complement().to_string().ends_with("infinite set has no complement"));
    }

    #[test]
    fn cross_session_is_a_join_incompatibility() {
        assert!(matches!(QueryError::cross_session(), QueryError::JoinIncompatible(_)));
    }
}
