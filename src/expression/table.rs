use crate::{
    connection::ConnectionRef,
    error::Result,
    expression::{Node, QueryExpression},
    heading::TableDefinition,
};

/// A base relation of the database.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub full_name: String,
}

impl Table {
    pub fn create(connection: &ConnectionRef, definition: &TableDefinition) -> Result<QueryExpression> {
        let heading = definition.heading()?;
        let node = Node::Table(Table { full_name: definition.full_table_name() });
        Ok(QueryExpression::from_parts(connection.clone(), node, heading.clone(), heading))
    }
}
