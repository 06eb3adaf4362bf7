use crate::{
    condition::Restriction,
    error::{QueryError, Result},
    expression::{rename_map, AttrSpec, GroupBy, QueryExpression},
};

/// Every possible tuple over a set of attributes.
///
/// Restricting anything by it is a no-op, and restricting it by an expression
/// yields the distinct values of its attributes in that expression.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UniversalSet {
    attributes: Vec<String>,
}

impl UniversalSet {
    pub fn new(attributes: &[&str]) -> Self {
        Self { attributes: attributes.iter().map(|a| a.trim().to_string()).collect() }
    }

    pub fn attributes(&self) -> &[String] {
        &self.attributes
    }

    /// Distinct combinations of this set's attributes found in `expr`.
    pub fn restrict_with(&self, expr: &QueryExpression) -> Result<QueryExpression> {
        if self.attributes.is_empty() {
            return QueryError::UnsupportedOperation("restricting an attribute-less universal set".into()).err();
        }
        let specs: Vec<AttrSpec> = self.attributes.iter().map(|a| AttrSpec::Name(a.clone())).collect();
        expr.project_with(&specs, &Default::default(), false)
    }

    pub fn join_with(&self, _expr: &QueryExpression) -> Result<QueryExpression> {
        QueryError::UnsupportedOperation("a universal set cannot be joined; restrict by it instead".into()).err()
    }

    /// Aggregate `group` per combination of this set's attributes, or into a
    /// single row when the set has none.
    pub fn aggregate(&self, group: &QueryExpression, renamed: &[(&str, &str)], keep_all_rows: bool) -> Result<QueryExpression> {
        if keep_all_rows {
            return QueryError::UnsupportedOperation("a universal set aggregation cannot keep all rows".into()).err();
        }
        GroupBy::over(group, &self.attributes, &rename_map(renamed))
    }

    pub fn subtract(&self, _restriction: impl Into<Restriction>) -> Result<Self> {
        Err(QueryError::no_complement())
    }
}
