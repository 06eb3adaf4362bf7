use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::{error::{QueryError, Result}, heading::Attribute};

static IDENTIFIER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*([a-zA-Z_][a-zA-Z0-9_]*)\s*$").unwrap());
static DUPLICATION: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*\(\s*([a-zA-Z_][a-zA-Z0-9_]*)\s*\)\s*$").unwrap());

const CONSTANT_LITERALS: [&str; 5] = ["null", "true", "false", "current_timestamp", "current_date"];

/// How the value side of a `new_name => value` projection entry is interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rename {
    /// `new => old`: the attribute moves to a new name
    Rename(String),
    /// `new => (old)`: the attribute is copied under a new name, the original stays
    Duplicate(String),
    /// `new => <sql expression>`
    Compute(String),
}

/// Ordered attribute metadata of a relation.
///
/// Primary-key attributes always precede secondary attributes. Hidden
/// attributes are carried but never listed by `names()`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Heading {
    attributes: IndexMap<String, Attribute>,
}

impl Heading {
    pub fn new(attributes: Vec<Attribute>) -> Result<Self> {
        let (keys, secondary): (Vec<_>, Vec<_>) = attributes.into_iter().partition(|a| a.in_key);
        let mut map = IndexMap::with_capacity(keys.len() + secondary.len());
        for attr in keys.into_iter().chain(secondary) {
            if attr.in_key && attr.is_hidden {
                return Err(QueryError::InvalidHeading(format!("primary-key attribute `{}` cannot be hidden", attr.name)));
            }
            if map.contains_key(&attr.name) {
                return Err(QueryError::InvalidHeading(format!("duplicate attribute `{}`", attr.name)));
            }
            map.insert(attr.name.clone(), attr);
        }
        Ok(Self { attributes: map })
    }

    pub fn attributes(&self) -> impl Iterator<Item = &Attribute> {
        self.attributes.values().filter(|a| !a.is_hidden)
    }

    pub fn names(&self) -> Vec<String> {
        self.attributes().map(|a| a.name.clone()).collect()
    }

    /// Every attribute name, hidden ones included.
    pub fn all_names(&self) -> Vec<String> {
        self.attributes.keys().cloned().collect()
    }

    pub fn primary_key(&self) -> Vec<String> {
        self.attributes().filter(|a| a.in_key).map(|a| a.name.clone()).collect()
    }

    pub fn secondary_attributes(&self) -> Vec<String> {
        self.attributes().filter(|a| !a.in_key).map(|a| a.name.clone()).collect()
    }

    pub fn get(&self, name: &str) -> Option<&Attribute> {
        self.attributes.get(name).filter(|a| !a.is_hidden)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes().next().is_none()
    }

    pub fn has_derived_attributes(&self) -> bool {
        self.attributes().any(Attribute::is_derived)
    }

    pub fn derived_attributes(&self) -> Vec<String> {
        self.attributes().filter(|a| a.is_derived()).map(|a| a.name.clone()).collect()
    }

    /// Interpret the value of a projection rename entry against this heading.
    pub fn classify_rename(&self, value: &str) -> Rename {
        let is_constant = |name: &str| CONSTANT_LITERALS.contains(&name.to_ascii_lowercase().as_str());
        if let Some(caps) = DUPLICATION.captures(value) {
            let name = &caps[1];
            if !is_constant(name) && self.contains(name) {
                return Rename::Duplicate(name.to_string());
            }
        }
        if let Some(caps) = IDENTIFIER.captures(value) {
            let name = &caps[1];
            if !is_constant(name) && self.contains(name) {
                return Rename::Rename(name.to_string());
            }
        }
        Rename::Compute(value.trim().to_string())
    }

    /// Select, rename, and compute attributes.
    ///
    /// `select` lists the attributes kept under their own names, `renamed`
    /// maps new names to rename sources or SQL expressions. When
    /// `force_primary_key` is given, exactly those attributes form the key.
    pub fn project(&self, select: &[String], renamed: &IndexMap<String, String>, force_primary_key: Option<&[String]>) -> Result<Heading> {
        let mut out: Vec<Attribute> = Vec::new();
        let mut computed: Vec<Attribute> = Vec::new();

        for (new_name, value) in renamed {
            if let Rename::Compute(expr) = self.classify_rename(value) {
                computed.push(Attribute::computed(new_name, &expr));
            }
        }

        for attr in self.attributes() {
            if select.contains(&attr.name) {
                out.push(attr.clone());
            }
            for (new_name, value) in renamed {
                match self.classify_rename(value) {
                    Rename::Rename(old) | Rename::Duplicate(old) if old == attr.name => {
                        out.push(attr.renamed(new_name));
                    }
                    _ => {}
                }
            }
        }
        if let Some(missing) = select.iter().find(|n| !self.contains(n)) {
            return Err(QueryError::UnknownAttribute(missing.clone()));
        }

        out.extend(computed);
        if let Some(pk) = force_primary_key {
            for attr in out.iter_mut() {
                attr.in_key = pk.contains(&attr.name);
            }
            out.sort_by_key(|a| pk.iter().position(|k| *k == a.name).unwrap_or(usize::MAX));
        }
        Heading::new(out)
    }

    /// Same attributes with exactly `primary_key` as the key, in that order.
    pub fn set_primary_key(&self, primary_key: &[String]) -> Result<Heading> {
        if let Some(missing) = primary_key.iter().find(|n| !self.contains(n)) {
            return Err(QueryError::UnknownAttribute(missing.clone()));
        }
        let mut attrs: Vec<Attribute> = primary_key.iter()
            .filter_map(|k| self.attributes.get(k))
            .map(|a| Attribute { in_key: true, ..a.clone() })
            .collect();
        attrs.extend(self.attributes.values()
            .filter(|a| !primary_key.contains(&a.name))
            .map(|a| Attribute { in_key: false, ..a.clone() }));
        Heading::new(attrs)
    }

    /// Heading of the natural join of `self` and `other` keyed on `primary_key`.
    ///
    /// Key attributes come first in the given order, then the remaining
    /// attributes of `self`, then those of `other`.
    pub fn join(&self, other: &Heading, primary_key: &[String]) -> Result<Heading> {
        let mut attrs: Vec<Attribute> = Vec::new();
        for name in primary_key {
            let source = [self, other].into_iter()
                .filter_map(|h| h.get(name))
                .find(|a| a.in_key)
                .or_else(|| self.get(name))
                .or_else(|| other.get(name))
                .ok_or_else(|| QueryError::UnknownAttribute(name.clone()))?;
            attrs.push(Attribute { in_key: true, ..source.clone() });
        }
        for attr in self.attributes.values().chain(other.attributes.values()) {
            if primary_key.contains(&attr.name) || attrs.iter().any(|a| a.name == attr.name) {
                continue;
            }
            attrs.push(Attribute { in_key: false, ..attr.clone() });
        }
        Heading::new(attrs)
    }

    /// The heading as seen from outside a subquery: no derived markers.
    pub fn resolve(&self) -> Heading {
        Heading {
            attributes: self.attributes.iter().map(|(k, a)| (k.clone(), a.resolved())).collect(),
        }
    }

    /// The heading without hidden attributes.
    pub fn without_hidden(&self) -> Heading {
        Heading {
            attributes: self.attributes.iter()
                .filter(|(_, a)| !a.is_hidden)
                .map(|(k, a)| (k.clone(), a.clone()))
                .collect(),
        }
    }

    /// SELECT-list for the given fields, or for all visible attributes.
    pub fn as_sql(&self, fields: Option<&[String]>) -> Result<String> {
        let names = match fields {
            Some(fields) => fields.to_vec(),
            None => self.names(),
        };
        let mut parts = Vec::with_capacity(names.len());
        for name in &names {
            let attr = self.get(name).ok_or_else(|| QueryError::UnknownAttribute(name.clone()))?;
            parts.push(attr.as_sql());
        }
        Ok(parts.join(","))
    }
}
