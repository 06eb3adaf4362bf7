use indexmap::IndexMap;

use crate::{error::{QueryError, Result}, heading::{Heading, Rename}};

/// One entry of a projection list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttrSpec {
    Name(String),
    /// `...`: every secondary attribute not otherwise renamed
    All,
    /// `-name`: drop an attribute the ellipsis would include
    Exclude(String),
}

impl From<&str> for AttrSpec {
    fn from(s: &str) -> Self {
        let s = s.trim();
        if s == "..." {
            AttrSpec::All
        } else if let Some(name) = s.strip_prefix('-') {
            AttrSpec::Exclude(name.trim().to_string())
        } else {
            AttrSpec::Name(s.to_string())
        }
    }
}

impl From<String> for AttrSpec {
    fn from(s: String) -> Self {
        AttrSpec::from(s.as_str())
    }
}

/// The attributes a projection keeps under their own names.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    pub selected: Vec<String>,
    /// Attributes moved to a new name (not duplicated)
    pub rename_sources: Vec<String>,
}

impl AttrSpec {
    /// Expand a projection list against `heading`.
    ///
    /// `keep` attributes lead the selection. Plain names that are unknown,
    /// listed twice, or also used by a rename entry are rejected.
    pub fn select(specs: &[AttrSpec], heading: &Heading, renamed: &IndexMap<String, String>, keep: &[String]) -> Result<Selection> {
        let mut rename_sources: Vec<String> = Vec::new();
        for (new_name, value) in renamed {
            if let Rename::Rename(old) = heading.classify_rename(value) {
                if rename_sources.contains(&old) {
                    return QueryError::InvalidProjection(format!("attribute `{}` is renamed twice", old)).err();
                }
                rename_sources.push(old);
            }
            if specs.iter().any(|s| matches!(s, AttrSpec::Name(n) if n == new_name)) {
                return QueryError::InvalidProjection(format!("attribute `{}` is used twice", new_name)).err();
            }
        }

        let mut names: Vec<String> = Vec::new();
        let mut excluded: Vec<String> = Vec::new();
        let mut all = false;
        for spec in specs {
            match spec {
                AttrSpec::Name(name) => {
                    if !heading.contains(name) {
                        return Err(QueryError::UnknownAttribute(name.clone()));
                    }
                    if names.contains(name) || rename_sources.contains(name) {
                        return QueryError::InvalidProjection(format!("attribute `{}` is used twice", name)).err();
                    }
                    names.push(name.clone());
                }
                AttrSpec::All => all = true,
                AttrSpec::Exclude(name) => excluded.push(name.clone()),
            }
        }

        if let Some(key) = excluded.iter().find(|e| keep.contains(e)) {
            return QueryError::InvalidProjection(format!("primary-key attribute `{}` cannot be excluded", key)).err();
        }

        let mut selected: Vec<String> = keep.iter()
            .filter(|k| !rename_sources.contains(k))
            .cloned()
            .collect();
        let candidates = names.into_iter().chain(
            if all { heading.secondary_attributes() } else { Vec::new() }
                .into_iter()
                .filter(|a| !rename_sources.contains(a) && !renamed.contains_key(a)),
        );
        for name in candidates {
            if !selected.contains(&name) && !excluded.contains(&name) {
                selected.push(name);
            }
        }
        Ok(Selection { selected, rename_sources })
    }
}
