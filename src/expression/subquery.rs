use std::sync::Arc;

use crate::{
    error::Result,
    expression::{CompileContext, Node, QueryExpression},
};

/// An expression wrapped as a derived table, `(SELECT ...) AS alias`.
///
/// Its heading is resolved: renamed and computed attributes become plain
/// columns of the derived table and hidden attributes are gone.
#[derive(Debug, Clone, PartialEq)]
pub struct Subquery {
    pub inner: Arc<QueryExpression>,
}

impl Subquery {
    pub fn create(inner: &QueryExpression) -> QueryExpression {
        // only the selected attributes cross the boundary
        let heading = inner.heading.resolve().without_hidden();
        let node = Node::Subquery(Subquery { inner: Arc::new(inner.clone()) });
        QueryExpression::from_parts(inner.connection.clone(), node, heading.clone(), heading)
    }

    pub fn from_clause(&self, ctx: &CompileContext) -> Result<String> {
        let sql = self.inner.make_sql_with(ctx, None)?;
        Ok(format!("({}) AS {}", sql, ctx.subquery_alias()))
    }
}
