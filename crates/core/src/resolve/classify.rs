use std::collections::BTreeMap;

use tracing::{debug, warn};

use super::{Category, DeclarationBody};

/// Partition of every named declaration into exactly one [`Category`].
#[derive(Debug, Default)]
pub struct Classification {
    categories: BTreeMap<String, Category>,
}

impl Classification {
    /// Classify `decls`, skipping every name for which `skip` returns true
    /// (builtin scalars, operation roots). A name seen twice keeps its first
    /// category.
    pub fn build<'a, B, I>(decls: I, skip: impl Fn(&str) -> bool) -> Self
    where
        B: DeclarationBody + 'a,
        I: IntoIterator<Item = (&'a String, &'a B)>,
    {
        let mut categories = BTreeMap::new();
        for (name, body) in decls {
            if skip(name) {
                debug!(name = %name, "Skipping reserved type name.");
                continue;
            }
            if categories.contains_key(name) {
                warn!(name = %name, "Declaration name already classified, keeping the first.");
                continue;
            }
            categories.insert(name.clone(), body.category());
        }
        debug!(count = categories.len(), "Classified declarations.");
        Self { categories }
    }

    pub fn category(&self, name: &str) -> Option<Category> {
        self.categories.get(name).copied()
    }

    pub fn names(&self, category: Category) -> impl Iterator<Item = &str> {
        self.categories
            .iter()
            .filter(move |(_, c)| **c == category)
            .map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}
