use crate::expression::{GroupBy, Join, Projection, Subquery, Table, Union};

/// The operator a [`QueryExpression`](crate::expression::QueryExpression) applies.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Table(Table),
    Join(Join),
    Projection(Projection),
    GroupBy(GroupBy),
    Union(Union),
    Subquery(Subquery),
}

impl Node {
    pub fn kind(&self) -> &'static str {
        match self {
            Node::Table(_) => "table",
            Node::Join(_) => "join",
            Node::Projection(_) => "projection",
            Node::GroupBy(_) => "group_by",
            Node::Union(_) => "union",
            Node::Subquery(_) => "subquery",
        }
    }
}
