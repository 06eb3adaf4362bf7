use serde::{Deserialize, Serialize};

/// Compiler configuration carried by a session.
///
/// - `semantic_check` is the default used by `join` and `restrict` when the
///   caller does not pass one explicitly.
/// - `subquery_alias_prefix` / `union_alias_prefix` name the derived tables
///   generated while rendering SQL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Reject joins and restrictions on non-homologous namesakes
    pub semantic_check: bool,
    /// Prefix of `(SELECT ...) AS _s1` aliases
    pub subquery_alias_prefix: String,
    /// Prefix of `(... UNION ...) AS _u1` aliases
    pub union_alias_prefix: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            semantic_check: true,
            subquery_alias_prefix: "_s".to_string(),
            union_alias_prefix: "_u".to_string(),
        }
    }
}

impl Config {
    /// Create default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Semantic matching enabled (default).
    pub fn strict() -> Self {
        Self::default()
    }

    /// Semantic matching disabled: plain natural joins on any shared name.
    pub fn permissive() -> Self {
        Self {
            semantic_check: false,
            ..Self::default()
        }
    }

    /// Override the alias prefixes used for generated derived tables.
    pub fn with_alias_prefixes(mut self, subquery: &str, union: &str) -> Self {
        self.subquery_alias_prefix = subquery.to_string();
        self.union_alias_prefix = union.to_string();
        self
    }
}
