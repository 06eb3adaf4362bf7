use crate::condition::Restriction;

/// A conjunction of restrictions.
///
/// Appending another `AndList` merges its members, and a member equal to
/// one already present is not added twice, so restricting twice by the same
/// condition leaves the conjunction unchanged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AndList(Vec<Restriction>);

impl AndList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, restriction: Restriction) {
        match restriction {
            Restriction::AndList(list) => {
                for item in list.0 {
                    self.append(item);
                }
            }
            other => {
                if !self.0.contains(&other) {
                    self.0.push(other);
                }
            }
        }
    }

    pub fn extend(&mut self, other: &AndList) {
        for item in other.iter() {
            self.append(item.clone());
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Restriction> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<R: Into<Restriction>> FromIterator<R> for AndList {
    fn from_iter<T: IntoIterator<Item = R>>(iter: T) -> Self {
        let mut list = AndList::new();
        for r in iter {
            list.append(r.into());
        }
        list
    }
}
