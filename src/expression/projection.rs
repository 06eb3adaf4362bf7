use std::sync::Arc;

use indexmap::IndexMap;

use crate::{
    error::Result,
    expression::{AttrSpec, Node, QueryExpression},
    heading::Rename,
};

/// Attribute selection, renaming and computation over a source expression.
#[derive(Debug, Clone, PartialEq)]
pub struct Projection {
    pub source: Arc<QueryExpression>,
}

impl Projection {
    /// Project `source`.
    ///
    /// With `include_primary_key` the source key is always kept. Without it
    /// every selected attribute joins the key, and the result turns DISTINCT
    /// when part of the source key is dropped.
    pub fn create(
        source: &QueryExpression,
        attributes: &[AttrSpec],
        renamed: &IndexMap<String, String>,
        include_primary_key: bool,
    ) -> Result<QueryExpression> {
        let source_key = source.heading.primary_key();
        let keep = if include_primary_key { source_key.clone() } else { Vec::new() };
        let selection = AttrSpec::select(attributes, &source.heading, renamed, &keep)?;

        // attributes that still identify source columns after the projection
        let retained: Vec<String> = selection.selected.iter().cloned()
            .chain(renamed.values().filter_map(|v| match source.heading.classify_rename(v) {
                Rename::Rename(old) | Rename::Duplicate(old) => Some(old),
                Rename::Compute(_) => None,
            }))
            .collect();
        let distinct = !include_primary_key && !source_key.iter().all(|k| retained.contains(k));

        let dropped: Vec<String> = source.heading.names().into_iter()
            .filter(|n| !selection.selected.contains(n))
            .collect();
        let restriction_lost = source.restriction_attributes.iter().any(|a| dropped.contains(a));

        let need_subquery = distinct
            || source.needs_resolution()
            || restriction_lost;
        let source = if need_subquery {
            tracing::debug!(distinct, restriction_lost, kind = source.node.kind(), "projection wraps its source");
            source.make_subquery()
        } else {
            source.clone()
        };

        let mut heading = source.heading.project(&selection.selected, renamed, None)?;
        if !include_primary_key {
            heading = heading.set_primary_key(&heading.names())?;
        }

        let mut result = QueryExpression::from_parts(
            source.connection.clone(),
            Node::Projection(Projection { source: Arc::new(source.clone()) }),
            heading,
            source.original_heading.clone(),
        );
        result.distinct = distinct;
        if !need_subquery {
            result.restriction = source.restriction.clone();
            result.restriction_attributes = source.restriction_attributes.clone();
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        error::QueryError,
        expression::fixtures::{lab, Lab},
    };

    #[test]
    fn primary_key_is_always_kept() {
        let Lab { session, .. } = lab();
        let p = session.project(&["session_date"], &[]).unwrap();
        assert_eq!(p.heading().names(), vec!["subject_id", "session_idx", "session_date"]);
        assert_eq!(
            p.make_sql(None).unwrap(),
            "SELECT `subject_id`,`session_idx`,`session_date` FROM `lab`.`session`"
        );
    }

    #[test]
    fn in_place_projection_keeps_restriction() {
        let Lab { subject, .. } = lab();
        let p = subject.restrict("species = 'mouse'").unwrap().project(&["species"], &[]).unwrap();
        assert_eq!(
            p.make_sql(None).unwrap(),
            "SELECT `subject_id`,`species` FROM `lab`.`subject` WHERE (species = 'mouse')"
        );
    }

    #[test]
    fn dropping_restricted_attribute_wraps() {
        let Lab { subject, .. } = lab();
        let p = subject.restrict("sex = 'F'").unwrap().project(&["species"], &[]).unwrap();
        assert_eq!(
            p.make_sql(None).unwrap(),
            "SELECT `subject_id`,`species` FROM (SELECT `subject_id`,`species`,`sex` FROM `lab`.`subject` WHERE (sex = 'F')) AS `_s1`"
        );
    }

    #[test]
    fn rename_and_compute() {
        let Lab { subject, .. } = lab();
        let p = subject.project(&[], &[("kind", "species"), ("tag", "upper(sex)")]).unwrap();
        assert_eq!(
            p.make_sql(None).unwrap(),
            "SELECT `subject_id`,`species` AS `kind`,upper(sex) AS `tag` FROM `lab`.`subject`"
        );
        // projecting again resolves the renamed attributes first
        let again = p.project(&["kind"], &[]).unwrap();
        assert!(again.make_sql(None).unwrap().contains("AS `_s1`"));
    }

    #[test]
    fn duplicate_keeps_original() {
        let Lab { subject, .. } = lab();
        let p = subject.project(&["species"], &[("species_copy", "(species)")]).unwrap();
        assert_eq!(p.heading().names(), vec!["subject_id", "species", "species_copy"]);
    }

    #[test]
    fn renamed_key_keeps_lineage() {
        let Lab { subject, .. } = lab();
        let p = subject.project(&[], &[("animal_id", "subject_id")]).unwrap();
        assert_eq!(p.primary_key(), vec!["animal_id".to_string()]);
        assert_eq!(
            p.heading().get("animal_id").unwrap().lineage.as_deref(),
            Some("lab.subject.subject_id")
        );
    }

    #[test]
    fn without_primary_key_becomes_distinct() {
        let Lab { subject, .. } = lab();
        let p = subject.project_with(&["species".into()], &Default::default(), false).unwrap();
        assert!(p.is_distinct());
        assert_eq!(p.primary_key(), vec!["species".to_string()]);
        assert_eq!(
            p.make_sql(None).unwrap(),
            "SELECT DISTINCT `species` FROM (SELECT `subject_id`,`species`,`sex` FROM `lab`.`subject`) AS `_s1`"
        );

        let keyed = subject.project_with(&["subject_id".into()], &Default::default(), false).unwrap();
        assert!(!keyed.is_distinct());
    }

    #[test]
    fn excluding_key_fails() {
        let Lab { subject, .. } = lab();
        let err = subject.project(&["...", "-subject_id"], &[]).unwrap_err();
        assert!(matches!(err, QueryError::InvalidProjection(_)));
        let ok = subject.project(&["...", "-sex", "-nothing"], &[]).unwrap();
        assert_eq!(ok.heading().names(), vec!["subject_id", "species"]);
    }

    #[test]
    fn unknown_attribute() {
        let Lab { subject, .. } = lab();
        assert_eq!(
            subject.project(&["weight"], &[]).unwrap_err(),
            QueryError::UnknownAttribute("weight".into())
        );
    }
}
