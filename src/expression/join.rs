use std::sync::Arc;

use crate::{
    condition::JoinCompatibility,
    connection::SameSession,
    error::{QueryError, Result},
    expression::{CompileContext, Node, QueryExpression},
};

/// Natural join of two expressions.
#[derive(Debug, Clone, PartialEq)]
pub struct Join {
    pub left: Arc<QueryExpression>,
    pub right: Arc<QueryExpression>,
    pub keep_all_rows: bool,
}

/// Which operand's key determines the other's rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dependency {
    /// Every key attribute of the right operand is an attribute of the left
    pub left_determines_right: bool,
    /// Every key attribute of the left operand is an attribute of the right
    pub right_determines_left: bool,
}

impl Join {
    /// Build `left NATURAL [LEFT] JOIN right`.
    ///
    /// `enforce_left_join` is off only for aggregation, whose key is replaced
    /// by the left operand's key afterwards.
    pub fn create(
        left: &QueryExpression,
        right: &QueryExpression,
        keep_all_rows: bool,
        semantic_check: bool,
        enforce_left_join: bool,
    ) -> Result<QueryExpression> {
        if !left.connection.same_session(&right.connection) {
            return Err(QueryError::cross_session());
        }
        if semantic_check {
            JoinCompatibility::assert(&left.heading, &right.heading)?;
        }

        let dependency = Self::dependency(left, right);
        if keep_all_rows && enforce_left_join && !dependency.left_determines_right {
            return Err(QueryError::LeftJoinNotEligible);
        }
        let primary_key = Self::primary_key(left, right, dependency);
        tracing::debug!(?dependency, ?primary_key, "join key");

        let join_attributes = JoinCompatibility::common_attributes(&right.heading, &left.heading);
        let right_columns = right.original_heading.all_names();
        let from_overlap = left.original_heading.all_names().iter()
            .any(|n| right_columns.contains(n) && !join_attributes.contains(n));

        let left = Self::operand(left, from_overlap);
        let right = Self::operand(right, from_overlap);

        let heading = left.heading.join(&right.heading, &primary_key)?;
        let original_heading = left.original_heading.join(&right.original_heading, &[])?;

        let mut result = QueryExpression::from_parts(
            left.connection.clone(),
            Node::Join(Join { left: Arc::new(left.clone()), right: Arc::new(right.clone()), keep_all_rows }),
            heading,
            original_heading,
        );
        result.restriction = left.restriction.clone();
        result.restriction.extend(&right.restriction);
        result.restriction_attributes = left.restriction_attributes.clone();
        result.restriction_attributes.extend(right.restriction_attributes.iter().cloned());
        Ok(result)
    }

    pub fn dependency(left: &QueryExpression, right: &QueryExpression) -> Dependency {
        let left_names = left.heading.names();
        let right_names = right.heading.names();
        Dependency {
            left_determines_right: right.heading.primary_key().iter().all(|k| left_names.contains(k)),
            right_determines_left: left.heading.primary_key().iter().all(|k| right_names.contains(k)),
        }
    }

    /// Key of the joined relation.
    ///
    /// The determining operand's key wins, the left one on a tie. When
    /// neither side determines the other, both keys combine, left first.
    pub fn primary_key(left: &QueryExpression, right: &QueryExpression, dependency: Dependency) -> Vec<String> {
        let left_key = left.heading.primary_key();
        match (dependency.left_determines_right, dependency.right_determines_left) {
            (true, _) => left_key,
            (false, true) => right.heading.primary_key(),
            (false, false) => {
                let mut key = left_key;
                for k in right.heading.primary_key() {
                    if !key.contains(&k) {
                        key.push(k);
                    }
                }
                key
            }
        }
    }

    fn operand(expr: &QueryExpression, from_overlap: bool) -> QueryExpression {
        if from_overlap || expr.needs_resolution() || !expr.restriction.is_empty() {
            tracing::debug!(
                from_overlap,
                restricted = !expr.restriction.is_empty(),
                kind = expr.node.kind(),
                "join operand wrapped in a subquery"
            );
            expr.make_subquery()
        } else {
            expr.clone()
        }
    }

    /// Whether the FROM clause of `expr` is itself a bare join.
    fn reads_from_join(expr: &QueryExpression) -> bool {
        match &expr.node {
            Node::Join(_) => true,
            Node::Projection(projection) => Self::reads_from_join(&projection.source),
            Node::GroupBy(group_by) => Self::reads_from_join(&group_by.source),
            Node::Table(_) | Node::Union(_) | Node::Subquery(_) => false,
        }
    }

    pub fn from_clause(&self, ctx: &CompileContext) -> Result<String> {
        let left = self.left.from_clause(ctx)?;
        let right = if Self::reads_from_join(&self.right) {
            format!("({})", self.right.from_clause(ctx)?)
        } else {
            self.right.from_clause(ctx)?
        };
        Ok(format!(
            "{} NATURAL {}JOIN {}",
            left,
            if self.keep_all_rows { "LEFT " } else { "" },
            right
        ))
    }
}
