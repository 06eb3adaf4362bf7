use uuid::Uuid;

use crate::{condition::Literal, error::{QueryError, Result}, heading::Heading};

/// Renders `attribute = value` fragments for mapping restrictions.
pub struct ValueEncoder;

impl ValueEncoder {
    /// Split `attr.path.to.key` into the attribute and its JSON path.
    pub fn split_key(key: &str) -> (&str, Option<&str>) {
        match key.split_once('.') {
            Some((attr, path)) => (attr, Some(path)),
            None => (key, None),
        }
    }

    pub fn equality(heading: &Heading, key: &str, value: &Literal) -> Result<String> {
        let (attr_name, path) = Self::split_key(key);
        let attr = heading.get(attr_name)
            .ok_or_else(|| QueryError::UnknownAttribute(attr_name.to_string()))?;

        let column = match path {
            None => format!("`{}`", attr_name),
            Some(path) if attr.attr_type.is_json() => {
                format!("JSON_VALUE(`{}`, '$.{}')", attr_name, path.replace('\'', "''"))
            }
            Some(_) => {
                return QueryError::InvalidRestriction(format!("`{}` is not a JSON attribute", attr_name)).err();
            }
        };

        if path.is_some() {
            if let Literal::Json(doc) = value {
                if doc.is_object() {
                    return Ok(format!("{}='{}'", column, Self::escape_single(&doc.to_string())));
                }
            }
        }

        if value.is_null() {
            return Ok(format!("{} IS NULL", column));
        }

        if attr.attr_type.is_uuid() {
            let uuid = match value {
                Literal::Uuid(u) => *u,
                Literal::String(s) => Uuid::parse_str(s.trim()).map_err(|_| QueryError::MalformedUuidLiteral {
                    attribute: attr_name.to_string(),
                    value: s.clone(),
                })?,
                other => return QueryError::MalformedUuidLiteral {
                    attribute: attr_name.to_string(),
                    value: other.to_string(),
                }.err(),
            };
            return Ok(format!("{}=X'{}'", column, uuid.simple()));
        }

        Ok(match value {
            Literal::Date(_) | Literal::Time(_) | Literal::DateTime(_) | Literal::Decimal(_) | Literal::List(_) => {
                format!("{}=\"{}\"", column, Self::escape(&value.to_string()))
            }
            Literal::String(s) => format!("{}=\"{}\"", column, Self::escape(s)),
            Literal::Json(doc) => format!("{}=\"{}\"", column, Self::escape(&doc.to_string())),
            Literal::Uuid(u) => format!("{}=\"{}\"", column, u),
            _ => format!("{}={}", column, value),
        })
    }

    /// Escape placeholder markers, backslashes and double quotes.
    fn escape(s: &str) -> String {
        s.replace('%', "%%").replace('\\', "\\\\").replace('"', "\\\"")
    }

    /// Same for a single-quoted literal: quotes are doubled.
    fn escape_single(s: &str) -> String {
        s.replace('%', "%%").replace('\\', "\\\\").replace('\'', "''")
    }
}
