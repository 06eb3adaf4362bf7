use indexmap::IndexSet;

use crate::{
    condition::{ColumnExtractor, CondResult, JoinCompatibility, Literal, Restriction, ValueEncoder},
    connection::{ConnectionRef, SameSession},
    error::{QueryError, Result},
    expression::{CompileContext, Node, QueryExpression},
    heading::Heading,
};

/// Translates a [`Restriction`] into a SQL boolean expression, or a constant
/// when the outcome is known without the database.
///
/// Attribute names are resolved against `heading`. Every column the condition
/// references is recorded in the `columns` set passed to [`compile`](Self::compile).
pub struct ConditionCompiler<'a> {
    heading: &'a Heading,
    connection: &'a ConnectionRef,
    ctx: &'a CompileContext,
}

impl<'a> ConditionCompiler<'a> {
    pub fn new(heading: &'a Heading, connection: &'a ConnectionRef, ctx: &'a CompileContext) -> Self {
        Self { heading, connection, ctx }
    }

    pub fn compile(&self, restriction: &Restriction, columns: &mut IndexSet<String>) -> Result<CondResult> {
        self.compile_with(restriction, false, columns)
    }

    fn compile_with(&self, restriction: &Restriction, negate: bool, columns: &mut IndexSet<String>) -> Result<CondResult> {
        let template = |sql: String| if negate { format!("NOT ({})", sql) } else { sql };

        match restriction {
            Restriction::Not(inner) => self.compile_with(inner, !negate, columns),

            Restriction::Raw(sql) => {
                let sql = sql.trim();
                if sql.is_empty() {
                    return QueryError::InvalidRestriction("empty SQL condition".into()).err();
                }
                columns.extend(ColumnExtractor::extract(sql));
                Ok(CondResult::Sql(template(sql.replace('%', "%%"))))
            }

            Restriction::AndList(list) => {
                let items = list.iter()
                    .map(|item| self.compile_with(item, false, columns))
                    .collect::<Result<Vec<_>>>()?;
                if items.iter().any(CondResult::is_false) {
                    return Ok(CondResult::Bool(negate));
                }
                let items: Vec<String> = items.into_iter().filter(|i| !i.is_true()).map(|i| i.to_sql()).collect();
                if items.is_empty() {
                    return Ok(CondResult::Bool(!negate));
                }
                Ok(CondResult::Sql(template(format!("({})", items.join(") AND (")))))
            }

            Restriction::Universal(_) => Ok(CondResult::Bool(!negate)),

            Restriction::Const(b) => Ok(CondResult::Bool(negate != *b)),

            Restriction::Mapping(pairs) => {
                self.equalities(pairs.iter().map(|(k, v)| (k.as_str(), v.clone())), negate, columns)
            }

            Restriction::Record(row) => {
                self.equalities(row.iter().map(|(k, v)| (k.as_str(), Literal::from(v.clone()))), negate, columns)
            }

            Restriction::Expr { expr, semantic_check } => self.semijoin(expr, *semantic_check, negate, columns),

            Restriction::OrList(items) => {
                let mut parts = Vec::new();
                let mut any_true = false;
                for item in items {
                    match self.compile_with(item, false, columns)? {
                        CondResult::Bool(true) => any_true = true,
                        CondResult::Bool(false) => {}
                        CondResult::Sql(sql) => parts.push(sql),
                    }
                }
                if any_true {
                    return Ok(CondResult::Bool(!negate));
                }
                if parts.is_empty() {
                    return Ok(CondResult::Bool(negate));
                }
                Ok(CondResult::Sql(template(format!("({})", parts.join(") OR (")))))
            }
        }
    }

    fn equalities<'k>(
        &self,
        pairs: impl Iterator<Item = (&'k str, Literal)>,
        negate: bool,
        columns: &mut IndexSet<String>,
    ) -> Result<CondResult> {
        let names = self.heading.names();
        let matching: Vec<(&str, Literal)> = pairs
            .filter(|(k, _)| names.iter().any(|n| n == ValueEncoder::split_key(k).0))
            .collect();
        if matching.is_empty() {
            return Ok(CondResult::Bool(!negate));
        }

        let mut fragments = Vec::with_capacity(matching.len());
        for (key, value) in &matching {
            columns.insert(ValueEncoder::split_key(key).0.to_string());
            fragments.push(ValueEncoder::equality(self.heading, key, value)?);
        }
        let sql = format!("({})", fragments.join(") AND ("));
        Ok(CondResult::Sql(if negate { format!("NOT ({})", sql) } else { sql }))
    }

    fn semijoin(
        &self,
        expr: &QueryExpression,
        semantic_check: bool,
        negate: bool,
        columns: &mut IndexSet<String>,
    ) -> Result<CondResult> {
        if !self.connection.same_session(expr.connection()) {
            return Err(QueryError::cross_session());
        }
        if semantic_check && self.ctx.semantic_check() {
            JoinCompatibility::assert(self.heading, expr.heading())?;
        }

        let common = JoinCompatibility::common_attributes(self.heading, expr.heading());
        columns.extend(common.iter().cloned());
        let not = if negate { "NOT " } else { "" };

        if common.is_empty() {
            if expr.compiled_restriction(self.ctx)?.is_false() {
                return Ok(CondResult::Bool(negate));
            }
            tracing::trace!("semijoin without common attributes renders as EXISTS");
            return Ok(CondResult::Sql(format!("{}EXISTS ({})", not, expr.make_sql_with(self.ctx, None)?)));
        }

        let wrapped;
        let inner = match expr.node() {
            Node::GroupBy(_) | Node::Projection(_) => {
                wrapped = expr.make_subquery();
                &wrapped
            }
            _ => expr,
        };
        let fields = common.iter().map(|c| format!("`{}`", c)).collect::<Vec<_>>().join(",");
        Ok(CondResult::Sql(format!(
            "({}) {}IN ({})",
            fields,
            not,
            inner.make_sql_with(self.ctx, Some(&common))?
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        condition::AndList,
        connection::OfflineConnection,
        expression::{fixtures::{equipment, lab, table, Lab}, UniversalSet},
        heading::{Attribute, AttributeType},
        Config,
    };
    use serde_json::json;

    fn people() -> Heading {
        Heading::new(vec![
            Attribute::new("id", AttributeType::Int).key(),
            Attribute::new("name", AttributeType::String),
            Attribute::new("age", AttributeType::Int),
        ]).unwrap()
    }

    fn compile(r: impl Into<Restriction>) -> (Result<CondResult>, Vec<String>) {
        let heading = people();
        let conn = OfflineConnection::new();
        let ctx = CompileContext::new(&Config::default());
        let mut columns = IndexSet::new();
        let result = ConditionCompiler::new(&heading, &conn, &ctx).compile(&r.into(), &mut columns);
        (result, columns.into_iter().collect())
    }

    fn sql(r: impl Into<Restriction>) -> CondResult {
        compile(r).0.unwrap()
    }

    #[test]
    fn constants() {
        assert!(sql(true).is_true());
        assert!(sql(false).is_false());
        assert!(sql(Restriction::not(true)).is_false());
        assert!(sql(Restriction::not(Restriction::not(false))).is_false());
    }

    #[test]
    fn raw_sql_is_escaped_and_negated() {
        assert_eq!(sql("name LIKE 'A%'"), CondResult::Sql("name LIKE 'A%%'".into()));
        assert_eq!(sql(Restriction::not("age > 3")), CondResult::Sql("NOT (age > 3)".into()));
        let (_, cols) = compile("age > 3 and name is not null");
        assert_eq!(cols, vec!["age", "name"]);
    }

    #[test]
    fn empty_raw_sql_is_invalid() {
        assert!(matches!(compile("  ").0, Err(QueryError::InvalidRestriction(_))));
    }

    #[test]
    fn and_list_rules() {
        assert!(sql(AndList::new()).is_true());
        assert!(sql(Restriction::not(AndList::new())).is_false());
        assert!(sql(Restriction::and([Restriction::raw("age > 3"), false.into()])).is_false());
        assert_eq!(
            sql(Restriction::and([Restriction::raw("age > 3"), true.into(), Restriction::raw("id < 9")])),
            CondResult::Sql("(age > 3) AND (id < 9)".into())
        );
    }

    #[test]
    fn or_list_rules() {
        assert!(sql(Vec::<Restriction>::new()).is_false());
        assert!(sql(Restriction::not(Vec::<Restriction>::new())).is_true());
        assert!(sql(Restriction::or([Restriction::raw("age > 3"), true.into()])).is_true());
        assert_eq!(
            sql(Restriction::not(Restriction::or([Restriction::raw("age > 3"), false.into(), Restriction::raw("id = 1")]))),
            CondResult::Sql("NOT ((age > 3) OR (id = 1))".into())
        );
    }

    #[test]
    fn none_is_false() {
        assert!(sql(None::<Restriction>).is_false());
    }

    #[test]
    fn mapping_ignores_foreign_keys() {
        assert!(sql(Restriction::mapping([("city", "Porto")])).is_true());
        assert!(sql(Restriction::not(Restriction::mapping([("city", "Porto")]))).is_false());
        let (result, cols) = compile(Restriction::mapping([("city", Literal::from("Porto")), ("age", Literal::from(30))]));
        assert_eq!(result.unwrap(), CondResult::Sql("(`age`=30)".into()));
        assert_eq!(cols, vec!["age"]);
    }

    #[test]
    fn record_restriction() {
        let row = json!({"id": 3, "name": "Carla", "other": 1});
        let Restriction::Record(map) = Restriction::from_value(&row).unwrap() else { panic!("record expected") };
        assert_eq!(sql(map), CondResult::Sql("(`id`=3) AND (`name`=\"Carla\")".into()));
    }

    #[test]
    fn universal_set_is_true() {
        assert!(sql(UniversalSet::new(&["id"])).is_true());
        assert!(sql(Restriction::not(UniversalSet::new(&[]))).is_false());
    }

    #[test]
    fn semijoin_renders_in_subquery() {
        let Lab { subject, session, .. } = lab();
        let r = session.restrict("session_idx > 2").unwrap();
        let ctx = CompileContext::new(&Config::default());
        let mut cols = IndexSet::new();
        let out = ConditionCompiler::new(subject.heading(), subject.connection(), &ctx)
            .compile(&Restriction::from(&r), &mut cols)
            .unwrap();
        assert_eq!(
            out.to_sql(),
            "(`subject_id`) IN (SELECT `subject_id` FROM `lab`.`session` WHERE (session_idx > 2))"
        );
        let out = ConditionCompiler::new(subject.heading(), subject.connection(), &ctx)
            .compile(&Restriction::not(&r), &mut cols)
            .unwrap();
        assert!(out.to_sql().starts_with("(`subject_id`) NOT IN ("));
    }

    #[test]
    fn semijoin_without_common_attributes() {
        let Lab { subject, conn, .. } = lab();
        let other = table(&conn, equipment());
        let ctx = CompileContext::new(&Config::default());
        let mut cols = IndexSet::new();
        let compiler = ConditionCompiler::new(subject.heading(), subject.connection(), &ctx);

        let empty = other.restrict(false).unwrap();
        assert!(compiler.compile(&Restriction::from(&empty), &mut cols).unwrap().is_false());
        assert!(compiler.compile(&Restriction::not(&empty), &mut cols).unwrap().is_true());

        let out = compiler.compile(&Restriction::from(&other), &mut cols).unwrap();
        assert_eq!(out.to_sql(), "EXISTS (SELECT `rig_id`,`model` FROM `lab`.`equipment`)");
    }

    #[test]
    fn semijoin_across_sessions_fails() {
        let Lab { subject, .. } = lab();
        let Lab { session, .. } = lab();
        let ctx = CompileContext::new(&Config::default());
        let mut cols = IndexSet::new();
        let err = ConditionCompiler::new(subject.heading(), subject.connection(), &ctx)
            .compile(&Restriction::from(&session), &mut cols)
            .unwrap_err();
        assert_eq!(err, QueryError::cross_session());
    }
}
