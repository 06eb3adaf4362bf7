use serde::{Deserialize, Serialize};

/// Coarse classification of a column's declared SQL type.
///
/// The condition compiler only needs to know how to encode a literal for
/// comparison against the column, so types are grouped by encoding rule
/// rather than by storage width.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttributeType {
    /// Integer column (any width)
    #[default]
    Int,
    /// Floating-point column
    Float,
    /// Fixed-point decimal
    Decimal,
    /// Boolean / tinyint(1)
    Bool,
    /// Character data
    String,
    /// Calendar date
    Date,
    /// Time of day
    Time,
    /// Date and time
    DateTime,
    /// UUID stored as binary(16)
    Uuid,
    /// JSON document
    Json,
    /// Opaque serialized value
    Blob,
}

impl AttributeType {
    /// Parse a declared SQL type such as `varchar(32)` or `decimal(8,2)`.
    pub fn from_sql(declared: &str) -> AttributeType {
        let lower = declared.trim().to_ascii_lowercase();
        let head = lower.split(['(', ' ']).next().unwrap_or_default();
        match head {
            "tinyint" | "smallint" | "mediumint" | "int" | "integer" | "bigint" => {
                if lower.starts_with("tinyint(1)") { AttributeType::Bool } else { AttributeType::Int }
            }
            "bool" | "boolean" => AttributeType::Bool,
            "float" | "double" | "real" => AttributeType::Float,
            "decimal" | "numeric" => AttributeType::Decimal,
            "char" | "varchar" | "text" | "tinytext" | "mediumtext" | "longtext" | "enum" => AttributeType::String,
            "date" => AttributeType::Date,
            "time" => AttributeType::Time,
            "datetime" | "timestamp" => AttributeType::DateTime,
            "uuid" | "binary" if lower == "uuid" || lower == "binary(16)" => AttributeType::Uuid,
            "json" => AttributeType::Json,
            _ => AttributeType::Blob,
        }
    }

    pub fn is_uuid(&self) -> bool {
        matches!(self, AttributeType::Uuid)
    }

    pub fn is_json(&self) -> bool {
        matches!(self, AttributeType::Json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_declared_types() {
        assert_eq!(AttributeType::from_sql("int unsigned"), AttributeType::Int);
        assert_eq!(AttributeType::from_sql("tinyint(1)"), AttributeType::Bool);
        assert_eq!(AttributeType::from_sql("varchar(64)"), AttributeType::String);
        assert_eq!(AttributeType::from_sql("decimal(8,2)"), AttributeType::Decimal);
        assert_eq!(AttributeType::from_sql("DATETIME"), AttributeType::DateTime);
        assert_eq!(AttributeType::from_sql("uuid"), AttributeType::Uuid);
        assert_eq!(AttributeType::from_sql("binary(16)"), AttributeType::Uuid);
        assert_eq!(AttributeType::from_sql("binary(32)"), AttributeType::Blob);
        assert_eq!(AttributeType::from_sql("json"), AttributeType::Json);
        assert_eq!(AttributeType::from_sql("longblob"), AttributeType::Blob);
    }
}
