use std::fmt;

use indexmap::{IndexMap, IndexSet};

use crate::{
    condition::{AndList, CondResult, ConditionCompiler, Restriction},
    connection::{ConnectionRef, RowSet},
    error::{QueryError, Result},
    expression::{AttrSpec, CompileContext, GroupBy, Join, Node, Projection, Subquery, Table, Union},
    heading::{Heading, TableDefinition},
};

/// A node of the relational algebra, rendered lazily to a single SQL statement.
///
/// Operators never modify their operands: each returns a new expression that
/// shares the operand sub-trees.
#[derive(Debug, Clone)]
pub struct QueryExpression {
    pub(crate) connection: ConnectionRef,
    pub(crate) node: Node,
    pub(crate) heading: Heading,
    /// Columns visible in this node's FROM clause, hidden ones included
    pub(crate) original_heading: Heading,
    pub(crate) restriction: AndList,
    pub(crate) restriction_attributes: IndexSet<String>,
    pub(crate) distinct: bool,
}

impl QueryExpression {
    pub(crate) fn from_parts(connection: ConnectionRef, node: Node, heading: Heading, original_heading: Heading) -> Self {
        Self {
            connection,
            node,
            heading,
            original_heading,
            restriction: AndList::new(),
            restriction_attributes: IndexSet::new(),
            distinct: false,
        }
    }

    /// A base table of the session.
    pub fn table(connection: &ConnectionRef, definition: &TableDefinition) -> Result<Self> {
        Table::create(connection, definition)
    }

    pub fn heading(&self) -> &Heading {
        &self.heading
    }

    pub fn primary_key(&self) -> Vec<String> {
        self.heading.primary_key()
    }

    pub fn connection(&self) -> &ConnectionRef {
        &self.connection
    }

    pub fn restriction(&self) -> &AndList {
        &self.restriction
    }

    pub fn restriction_attributes(&self) -> &IndexSet<String> {
        &self.restriction_attributes
    }

    pub fn is_distinct(&self) -> bool {
        self.distinct
    }

    pub fn node(&self) -> &Node {
        &self.node
    }

    /// Renamed or computed attributes, a GROUP BY, or DISTINCT: anything the
    /// FROM clause alone cannot reproduce.
    pub(crate) fn needs_resolution(&self) -> bool {
        matches!(self.node, Node::GroupBy(_)) || self.distinct || self.heading.has_derived_attributes()
    }

    // --- restriction ---

    /// Conjoin a condition, wrapping `self` in a subquery when the condition
    /// could otherwise not be resolved against the FROM clause.
    pub fn restrict(&self, restriction: impl Into<Restriction>) -> Result<Self> {
        let restriction = restriction.into();
        let (compiled, columns) = self.validate(&restriction)?;
        if compiled.is_true() {
            return Ok(self.clone());
        }

        let need_subquery = !matches!(self.node, Node::GroupBy(_)) && self.heading.has_derived_attributes();
        let mut result = if need_subquery {
            tracing::debug!(derived = ?self.heading.derived_attributes(), "restriction requires a subquery");
            self.make_subquery()
        } else {
            self.clone()
        };
        result.restriction.append(restriction);
        result.restriction_attributes.extend(columns);
        Ok(result)
    }

    /// Conjoin a condition without wrapping.
    ///
    /// Fails when the condition references a renamed or computed attribute
    /// of a node that has no HAVING clause.
    pub fn restrict_in_place(&mut self, restriction: impl Into<Restriction>) -> Result<()> {
        let restriction = restriction.into();
        let (compiled, columns) = self.validate(&restriction)?;
        if compiled.is_true() {
            return Ok(());
        }
        if !matches!(self.node, Node::GroupBy(_)) {
            let derived = self.heading.derived_attributes();
            if let Some(name) = columns.iter().find(|c| derived.contains(c)) {
                return Err(QueryError::UnresolvableProjectionRestriction(name.clone()));
            }
        }
        self.restriction.append(restriction);
        self.restriction_attributes.extend(columns);
        Ok(())
    }

    /// Rows that do not satisfy the condition.
    pub fn subtract(&self, restriction: impl Into<Restriction>) -> Result<Self> {
        self.restrict(Restriction::not(restriction))
    }

    fn validate(&self, restriction: &Restriction) -> Result<(CondResult, IndexSet<String>)> {
        let ctx = CompileContext::new(self.connection.config());
        let mut columns = IndexSet::new();
        let compiled = ConditionCompiler::new(&self.heading, &self.connection, &ctx).compile(restriction, &mut columns)?;
        if let Some(missing) = columns.iter().find(|c| !self.heading.contains(c)) {
            return Err(QueryError::UnknownAttribute(missing.clone()));
        }
        Ok((compiled, columns))
    }

    // --- operators ---

    /// Natural join, semantic matching as configured for the session.
    pub fn join(&self, other: &QueryExpression) -> Result<Self> {
        self.join_with(other, false, self.connection.config().semantic_check)
    }

    pub fn join_with(&self, other: &QueryExpression, keep_all_rows: bool, semantic_check: bool) -> Result<Self> {
        Join::create(self, other, keep_all_rows, semantic_check, true)
    }

    /// Left join: every row of `self` is kept.
    pub fn left_join(&self, other: &QueryExpression) -> Result<Self> {
        self.join_with(other, true, self.connection.config().semantic_check)
    }

    /// Project onto `attributes` (`"..."` for all secondary, `"-name"` to drop)
    /// with `(new_name, value)` renames or computations.
    pub fn project(&self, attributes: &[&str], renamed: &[(&str, &str)]) -> Result<Self> {
        let specs: Vec<AttrSpec> = attributes.iter().map(|a| AttrSpec::from(*a)).collect();
        self.project_with(&specs, &rename_map(renamed), true)
    }

    pub fn project_with(&self, attributes: &[AttrSpec], renamed: &IndexMap<String, String>, include_primary_key: bool) -> Result<Self> {
        Projection::create(self, attributes, renamed, include_primary_key)
    }

    /// Aggregate `group` per row of `self`.
    pub fn aggregate(&self, group: &QueryExpression, attributes: &[&str], renamed: &[(&str, &str)], keep_all_rows: bool) -> Result<Self> {
        let specs: Vec<AttrSpec> = attributes.iter().map(|a| AttrSpec::from(*a)).collect();
        GroupBy::create(self, group, &specs, &rename_map(renamed), keep_all_rows)
    }

    pub fn union(&self, other: &QueryExpression) -> Result<Self> {
        Union::create(self, other)
    }

    pub fn make_subquery(&self) -> Self {
        Subquery::create(self)
    }

    // --- rendering ---

    pub fn from_clause(&self, ctx: &CompileContext) -> Result<String> {
        match &self.node {
            Node::Table(table) => Ok(table.full_name.clone()),
            Node::Join(join) => join.from_clause(ctx),
            Node::Projection(projection) => projection.source.from_clause(ctx),
            Node::GroupBy(group_by) => group_by.source.from_clause(ctx),
            Node::Union(union) => union.from_clause(&self.heading, ctx),
            Node::Subquery(subquery) => subquery.from_clause(ctx),
        }
    }

    /// The conjunction of this node's restrictions.
    pub fn compiled_restriction(&self, ctx: &CompileContext) -> Result<CondResult> {
        let mut columns = IndexSet::new();
        ConditionCompiler::new(&self.heading, &self.connection, ctx)
            .compile(&Restriction::AndList(self.restriction.clone()), &mut columns)
    }

    pub fn where_clause(&self) -> Result<String> {
        self.where_clause_with(&CompileContext::new(self.connection.config()))
    }

    /// `""`, `" WHERE FALSE"` or `" WHERE <condition>"`.
    pub fn where_clause_with(&self, ctx: &CompileContext) -> Result<String> {
        Ok(match self.compiled_restriction(ctx)? {
            CondResult::Bool(true) => String::new(),
            CondResult::Bool(false) => " WHERE FALSE".to_string(),
            CondResult::Sql(sql) => format!(" WHERE {}", sql),
        })
    }

    pub fn select_fields(&self, fields: Option<&[String]>) -> Result<String> {
        match (&self.node, fields) {
            (Node::Subquery(_), None) => Ok("*".to_string()),
            _ => self.heading.as_sql(fields),
        }
    }

    pub fn make_sql(&self, fields: Option<&[String]>) -> Result<String> {
        self.make_sql_with(&CompileContext::new(self.connection.config()), fields)
    }

    pub fn make_sql_with(&self, ctx: &CompileContext, fields: Option<&[String]>) -> Result<String> {
        let sql = match &self.node {
            Node::GroupBy(group_by) => group_by.make_sql(self, ctx, fields)?,
            _ => {
                let select = self.select_fields(fields)?;
                let from = self.from_clause(ctx)?;
                let where_clause = self.where_clause_with(ctx)?;
                format!(
                    "SELECT {}{} FROM {}{}",
                    if self.distinct { "DISTINCT " } else { "" },
                    select,
                    from,
                    where_clause
                )
            }
        };
        tracing::trace!(sql = %sql, "rendered");
        Ok(sql)
    }

    pub fn preview_sql(&self) -> Result<String> {
        self.make_sql(None)
    }

    /// Run the rendered statement on the session.
    pub fn fetch(&self) -> Result<RowSet> {
        let sql = self.make_sql(None)?;
        self.connection.execute(&sql)
    }
}

impl PartialEq for QueryExpression {
    fn eq(&self, other: &Self) -> bool {
        self.connection.session_id() == other.connection.session_id()
            && self.node == other.node
            && self.heading == other.heading
            && self.restriction == other.restriction
            && self.distinct == other.distinct
    }
}

impl fmt::Display for QueryExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.make_sql(None) {
            Ok(sql) => write!(f, "{}", sql),
            Err(e) => write!(f, "<{}>", e),
        }
    }
}

pub(crate) fn rename_map(renamed: &[(&str, &str)]) -> IndexMap<String, String> {
    renamed.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
}
