use crate::{error::{QueryError, Result}, heading::{Attribute, AttributeType, Heading}};

/// Declaration of a base table: native attributes plus foreign-key references.
///
/// Lineage follows provenance:
/// - a native primary-key attribute gets `schema.table.attribute`
/// - a native secondary attribute gets no lineage
/// - an attribute inherited through a foreign key keeps its parent's lineage,
///   so after any number of hops it still names the table that introduced it
#[derive(Debug, Clone, PartialEq)]
pub struct TableDefinition {
    pub schema: String,
    pub table: String,
    attributes: Vec<Attribute>,
    errors: Vec<String>,
}

impl TableDefinition {
    pub fn new(schema: &str, table: &str) -> Self {
        Self {
            schema: schema.to_string(),
            table: table.to_string(),
            attributes: Vec::new(),
            errors: Vec::new(),
        }
    }

    pub fn primary(self, name: &str, attr_type: AttributeType) -> Self {
        let lineage = format!("{}.{}.{}", self.schema, self.table, name);
        self.push(Attribute::new(name, attr_type).key().with_lineage(&lineage))
    }

    pub fn secondary(self, name: &str, attr_type: AttributeType) -> Self {
        self.push(Attribute::new(name, attr_type))
    }

    pub fn nullable(self, name: &str, attr_type: AttributeType) -> Self {
        self.push(Attribute::new(name, attr_type).nullable())
    }

    pub fn hidden(self, name: &str, attr_type: AttributeType) -> Self {
        self.push(Attribute::new(name, attr_type).hidden())
    }

    /// Inherit the parent's primary key, into this table's key when `in_key`.
    pub fn foreign_key(self, parent: &TableDefinition, in_key: bool) -> Self {
        self.foreign_key_as(parent, in_key, &[])
    }

    /// Inherit the parent's primary key with some attributes renamed (`(new, old)`).
    ///
    /// Renaming does not change lineage.
    pub fn foreign_key_as(mut self, parent: &TableDefinition, in_key: bool, renames: &[(&str, &str)]) -> Self {
        let parent_heading = match parent.heading() {
            Ok(h) => h,
            Err(e) => {
                self.errors.push(e.to_string());
                return self;
            }
        };
        for old in parent_heading.primary_key() {
            let Some(origin) = parent_heading.get(&old) else { continue };
            let name = renames.iter()
                .find(|(_, o)| *o == old)
                .map(|(n, _)| n.to_string())
                .unwrap_or(old.clone());
            let inherited = Attribute {
                name,
                in_key,
                nullable: false,
                attribute_expression: None,
                is_hidden: false,
                ..origin.clone()
            };
            self = self.push(inherited);
        }
        self
    }

    fn push(mut self, attr: Attribute) -> Self {
        match self.attributes.iter_mut().find(|a| a.name == attr.name) {
            // two references to the same origin merge into one attribute
            Some(existing) if existing.lineage.is_some() && existing.lineage == attr.lineage => {
                existing.in_key |= attr.in_key;
            }
            Some(_) => self.errors.push(format!("duplicate attribute `{}` in `{}`", attr.name, self.table)),
            None => self.attributes.push(attr),
        }
        self
    }

    pub fn full_table_name(&self) -> String {
        format!("`{}`.`{}`", self.schema, self.table)
    }

    pub fn heading(&self) -> Result<Heading> {
        if let Some(e) = self.errors.first() {
            return Err(QueryError::InvalidHeading(e.clone()));
        }
        Heading::new(self.attributes.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn subject() -> TableDefinition {
        TableDefinition::new("lab", "subject")
            .primary("subject_id", AttributeType::Int)
            .secondary("species", AttributeType::String)
    }

    #[test]
    fn native_lineage() {
        let h = subject().heading().unwrap();
        assert_eq!(h.get("subject_id").unwrap().lineage.as_deref(), Some("lab.subject.subject_id"));
        assert!(h.get("species").unwrap().lineage.is_none());
    }

    #[test]
    fn lineage_follows_one_hop() {
        let session = TableDefinition::new("lab", "session")
            .foreign_key(&subject(), true)
            .primary("session_idx", AttributeType::Int);
        let h = session.heading().unwrap();
        assert_eq!(h.primary_key(), vec!["subject_id".to_string(), "session_idx".to_string()]);
        assert_eq!(h.get("subject_id").unwrap().lineage.as_deref(), Some("lab.subject.subject_id"));
        assert_eq!(h.get("session_idx").unwrap().lineage.as_deref(), Some("lab.session.session_idx"));
    }

    #[test]
    fn lineage_follows_two_hops_to_origin() {
        let session = TableDefinition::new("lab", "session")
            .foreign_key(&subject(), true)
            .primary("session_idx", AttributeType::Int);
        let scan = TableDefinition::new("imaging", "scan")
            .foreign_key(&session, true)
            .primary("scan_idx", AttributeType::Int);
        let h = scan.heading().unwrap();
        assert_eq!(h.get("subject_id").unwrap().lineage.as_deref(), Some("lab.subject.subject_id"));
        assert_eq!(h.get("session_idx").unwrap().lineage.as_deref(), Some("lab.session.session_idx"));
    }

    #[test]
    fn secondary_reference_keeps_lineage() {
        let note = TableDefinition::new("lab", "note")
            .primary("note_id", AttributeType::Int)
            .foreign_key(&subject(), false);
        let h = note.heading().unwrap();
        assert_eq!(h.secondary_attributes(), vec!["subject_id".to_string()]);
        assert_eq!(h.get("subject_id").unwrap().lineage.as_deref(), Some("lab.subject.subject_id"));
    }

    #[test]
    fn renamed_reference_keeps_origin_lineage() {
        let pair = TableDefinition::new("lab", "pair")
            .foreign_key_as(&subject(), true, &[("left_id", "subject_id")])
            .foreign_key_as(&subject(), true, &[("right_id", "subject_id")]);
        let h = pair.heading().unwrap();
        assert_eq!(h.primary_key(), vec!["left_id".to_string(), "right_id".to_string()]);
        assert_eq!(h.get("right_id").unwrap().lineage.as_deref(), Some("lab.subject.subject_id"));
    }

    #[test]
    fn conflicting_native_duplicate_fails() {
        let bad = subject().secondary("species", AttributeType::String);
        assert!(matches!(bad.heading(), Err(QueryError::InvalidHeading(_))));
    }
}
