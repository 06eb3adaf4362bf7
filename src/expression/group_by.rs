use std::sync::Arc;

use indexmap::IndexMap;

use crate::{
    error::Result,
    expression::{AttrSpec, CompileContext, Join, Node, QueryExpression},
    heading::Heading,
};

/// Per-row aggregation: `SELECT ... FROM source GROUP BY key`.
///
/// Restrictions of `source` stay in WHERE. Restrictions applied to the
/// aggregated expression itself render as HAVING, so they may use computed
/// attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupBy {
    pub source: Arc<QueryExpression>,
}

impl GroupBy {
    /// Aggregate `group` for every row of `base`.
    ///
    /// The key of the result is always the key of `base`.
    pub fn create(
        base: &QueryExpression,
        group: &QueryExpression,
        attributes: &[AttrSpec],
        renamed: &IndexMap<String, String>,
        keep_all_rows: bool,
    ) -> Result<QueryExpression> {
        let semantic_check = base.connection.config().semantic_check;
        let joined = Join::create(base, group, keep_all_rows, semantic_check, false)?;

        let base_key = base.heading.primary_key();
        let keyed = joined.heading.set_primary_key(&base_key)?;

        // the ellipsis means the secondary attributes of `base`, not of the join
        let base_secondary = base.heading.secondary_attributes();
        let selection = AttrSpec::select(attributes, &keyed, renamed, &base_key)?;
        let selected: Vec<String> = selection.selected.into_iter()
            .filter(|a| base_key.contains(a) || base_secondary.contains(a) || Self::named(attributes, a))
            .collect();
        let heading = keyed.project(&selected, renamed, None)?;

        tracing::debug!(key = ?base_key, keep_all_rows, "aggregation");
        Ok(Self::wrap(joined, heading))
    }

    /// Group `source` on `key` with no partner; an empty key yields one row.
    pub fn over(source: &QueryExpression, key: &[String], renamed: &IndexMap<String, String>) -> Result<QueryExpression> {
        let source = if source.needs_resolution() { source.make_subquery() } else { source.clone() };
        let heading = source.heading.project(key, renamed, Some(key))?;
        Ok(Self::wrap(source, heading))
    }

    fn wrap(source: QueryExpression, heading: Heading) -> QueryExpression {
        QueryExpression::from_parts(
            source.connection.clone(),
            Node::GroupBy(GroupBy { source: Arc::new(source) }),
            heading.clone(),
            heading,
        )
    }

    fn named(attributes: &[AttrSpec], name: &str) -> bool {
        attributes.iter().any(|s| matches!(s, AttrSpec::Name(n) if n == name))
    }

    pub fn make_sql(&self, expr: &QueryExpression, ctx: &CompileContext, fields: Option<&[String]>) -> Result<String> {
        let select = expr.select_fields(fields)?;
        let from = self.source.from_clause(ctx)?;
        let where_clause = self.source.where_clause_with(ctx)?;
        let key = expr.heading.primary_key();
        let group_by = if key.is_empty() {
            String::new()
        } else {
            format!(" GROUP BY `{}`", key.join("`,`"))
        };
        let having = expr.where_clause_with(ctx)?
            .replacen(" WHERE ", " HAVING ", 1);
        Ok(format!("SELECT {} FROM {}{}{}{}", select, from, where_clause, group_by, having))
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        error::QueryError,
        expression::fixtures::{lab, Lab},
    };

    #[test]
    fn counts_per_parent() {
        let Lab { subject, session, .. } = lab();
        let a = subject.aggregate(&session, &["species"], &[("n", "count(session_idx)")], false).unwrap();
        assert_eq!(a.primary_key(), vec!["subject_id".to_string()]);
        assert_eq!(a.heading().names(), vec!["subject_id", "species", "n"]);
        assert_eq!(
            a.make_sql(None).unwrap(),
            "SELECT `subject_id`,`species`,count(session_idx) AS `n` FROM `lab`.`subject` NATURAL JOIN `lab`.`session` GROUP BY `subject_id`"
        );
    }

    #[test]
    fn ellipsis_keeps_base_secondary_attributes() {
        let Lab { subject, session, .. } = lab();
        let a = subject.aggregate(&session, &["..."], &[("last", "max(session_date)")], true).unwrap();
        assert_eq!(a.heading().names(), vec!["subject_id", "species", "sex", "last"]);
        assert!(a.make_sql(None).unwrap().contains("NATURAL LEFT JOIN"));
    }

    #[test]
    fn restriction_on_aggregate_is_having() {
        let Lab { subject, session, .. } = lab();
        let a = subject
            .restrict("sex = 'F'").unwrap()
            .aggregate(&session, &[], &[("n", "count(*)")], false).unwrap()
            .restrict("n > 2").unwrap();
        let sql = a.make_sql(None).unwrap();
        assert!(sql.ends_with(" WHERE (sex = 'F')) AS `_s1` NATURAL JOIN `lab`.`session` GROUP BY `subject_id` HAVING (n > 2)"), "{sql}");
        assert_eq!(a.node().kind(), "group_by");
    }

    #[test]
    fn restricted_group_is_wrapped() {
        let Lab { subject, session, .. } = lab();
        let a = subject
            .aggregate(&session.restrict("session_idx > 1").unwrap(), &[], &[("n", "count(*)")], false)
            .unwrap();
        assert_eq!(
            a.make_sql(None).unwrap(),
            "SELECT `subject_id`,count(*) AS `n` FROM `lab`.`subject` NATURAL JOIN \
             (SELECT `subject_id`,`session_idx`,`session_date` FROM `lab`.`session` WHERE (session_idx > 1)) AS `_s1` \
             GROUP BY `subject_id`"
        );
    }

    #[test]
    fn partner_key_never_promoted() {
        let Lab { session, scan, .. } = lab();
        let a = session.aggregate(&scan, &[], &[("scans", "count(*)")], false).unwrap();
        assert_eq!(a.primary_key(), vec!["subject_id".to_string(), "session_idx".to_string()]);
    }

    #[test]
    fn unknown_computed_reference_is_unknown_attribute() {
        let Lab { subject, session, .. } = lab();
        let a = subject.aggregate(&session, &[], &[("n", "count(*)")], false).unwrap();
        assert_eq!(a.restrict("total > 1").unwrap_err(), QueryError::UnknownAttribute("total".into()));
    }
}
