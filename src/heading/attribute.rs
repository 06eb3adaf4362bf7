use crate::heading::AttributeType;

/// Metadata for a single column of a heading.
///
/// `lineage` identifies where the attribute originates (`schema.table.attribute`)
/// and is what semantic matching compares. `attribute_expression` is set for
/// renamed and computed attributes, whose SQL form is not the bare column name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub in_key: bool,
    pub attr_type: AttributeType,
    pub nullable: bool,
    pub lineage: Option<String>,
    pub attribute_expression: Option<String>,
    pub is_hidden: bool,
}

impl Attribute {
    pub fn new(name: &str, attr_type: AttributeType) -> Self {
        Self {
            name: name.to_string(),
            in_key: false,
            attr_type,
            nullable: false,
            lineage: None,
            attribute_expression: None,
            is_hidden: false,
        }
    }

    /// A computed attribute: `expression AS name`.
    pub fn computed(name: &str, expression: &str) -> Self {
        Self {
            attribute_expression: Some(expression.to_string()),
            nullable: true,
            ..Self::new(name, AttributeType::Blob)
        }
    }

    pub fn key(mut self) -> Self { self.in_key = true; self }
    pub fn nullable(mut self) -> Self { self.nullable = true; self }
    pub fn hidden(mut self) -> Self { self.is_hidden = true; self }
    pub fn with_lineage(mut self, lineage: &str) -> Self { self.lineage = Some(lineage.to_string()); self }

    /// Renamed or computed: the column does not exist under this name in the FROM clause.
    pub fn is_derived(&self) -> bool {
        self.attribute_expression.is_some()
    }

    /// Same attribute under a different name, rendered as `` `old` AS `new` ``.
    pub fn renamed(&self, new_name: &str) -> Self {
        let expression = match &self.attribute_expression {
            Some(expr) => expr.clone(),
            None => format!("`{}`", self.name),
        };
        Self {
            name: new_name.to_string(),
            attribute_expression: Some(expression),
            ..self.clone()
        }
    }

    /// The attribute as seen through a subquery boundary.
    pub fn resolved(&self) -> Self {
        Self {
            attribute_expression: None,
            ..self.clone()
        }
    }

    /// SELECT-list form of this attribute.
    pub fn as_sql(&self) -> String {
        match &self.attribute_expression {
            Some(expr) => format!("{} AS `{}`", expr, self.name),
            None => format!("`{}`", self.name),
        }
    }
}
