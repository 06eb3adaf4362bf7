use std::sync::Arc;

use crate::{
    connection::SameSession,
    error::{QueryError, Result},
    expression::{CompileContext, Node, QueryExpression},
    heading::Heading,
};

/// `(SELECT ... UNION SELECT ...) AS alias` over two expressions with the same
/// primary key and no secondary attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct Union {
    pub left: Arc<QueryExpression>,
    pub right: Arc<QueryExpression>,
}

impl Union {
    pub fn create(left: &QueryExpression, right: &QueryExpression) -> Result<QueryExpression> {
        if !left.connection.same_session(&right.connection) {
            return Err(QueryError::cross_session());
        }

        let mut left_names = left.heading.names();
        let mut right_names = right.heading.names();
        left_names.sort();
        right_names.sort();
        if left_names != right_names {
            return QueryError::UnionShapeMismatch(format!(
                "operands have different attributes: [{}] and [{}]",
                left_names.join(", "),
                right_names.join(", ")
            )).err();
        }
        for operand in [left, right] {
            let secondary = operand.heading.secondary_attributes();
            if !secondary.is_empty() {
                return QueryError::UnionShapeMismatch(format!(
                    "operands may only have primary-key attributes, found [{}]",
                    secondary.join(", ")
                )).err();
            }
        }

        let heading = left.heading.resolve().without_hidden();
        Ok(QueryExpression::from_parts(
            left.connection.clone(),
            Node::Union(Union { left: Arc::new(left.clone()), right: Arc::new(right.clone()) }),
            heading.clone(),
            heading,
        ))
    }

    pub fn from_clause(&self, heading: &Heading, ctx: &CompileContext) -> Result<String> {
        let fields = heading.names();
        let left = self.left.make_sql_with(ctx, Some(&fields))?;
        let right = self.right.make_sql_with(ctx, Some(&fields))?;
        Ok(format!("({} UNION {}) AS {}", left, right, ctx.union_alias()))
    }
}
