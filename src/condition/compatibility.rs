use crate::{error::{QueryError, Result}, heading::Heading};

/// Semantic matching of the attributes two headings share by name.
pub struct JoinCompatibility;

impl JoinCompatibility {
    /// Every namesake must be homologous: same lineage on both sides, and
    /// part of at least one primary key.
    pub fn assert(a: &Heading, b: &Heading) -> Result<()> {
        for name in a.names() {
            let Some(right) = b.get(&name) else { continue };
            let Some(left) = a.get(&name) else { continue };

            if !left.in_key && !right.in_key {
                return Err(QueryError::dependent_attribute(&name));
            }
            match (&left.lineage, &right.lineage) {
                (Some(l), Some(r)) if l == r => {}
                (l, r) => {
                    tracing::trace!(attribute = %name, left = ?l, right = ?r, "lineage mismatch");
                    return Err(QueryError::NonHomologousNamesake(format!(
                        "`{}` originates from {} and {}",
                        name,
                        l.as_deref().unwrap_or("<none>"),
                        r.as_deref().unwrap_or("<none>"),
                    )));
                }
            }
        }
        Ok(())
    }

    /// Names present in both headings, in `b`'s order.
    pub fn common_attributes(a: &Heading, b: &Heading) -> Vec<String> {
        b.names().into_iter().filter(|n| a.contains(n)).collect()
    }
}
