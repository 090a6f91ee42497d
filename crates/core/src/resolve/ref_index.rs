use std::collections::BTreeMap;

/// Pointer-keyed view over a document's declarations.
///
/// Pointers are unique by construction (`#/definitions/<name>`,
/// `#/responses/<name>`, `#/types/<name>`), so insertion order is irrelevant.
#[derive(Debug)]
pub struct RefIndex<'a, B> {
    names: BTreeMap<String, String>,
    bodies: BTreeMap<String, &'a B>,
}

impl<B> Default for RefIndex<'_, B> {
    fn default() -> Self {
        Self {
            names: BTreeMap::new(),
            bodies: BTreeMap::new(),
        }
    }
}

impl<'a, B> RefIndex<'a, B> {
    /// Index every entry of `decls` under `<prefix><name>`.
    pub fn with_section(mut self, prefix: &str, decls: &'a BTreeMap<String, B>) -> Self {
        for (name, body) in decls {
            self.insert(format!("{prefix}{name}"), name, Some(body));
        }
        self
    }

    /// Register one pointer. A declaration without a body (e.g. a response
    /// with no schema) still resolves to its name.
    pub fn insert(&mut self, pointer: String, name: &str, body: Option<&'a B>) {
        if let Some(body) = body {
            self.bodies.insert(pointer.clone(), body);
        }
        self.names.insert(pointer, name.to_string());
    }

    pub fn resolve(&self, pointer: &str) -> Option<&str> {
        self.names.get(pointer).map(String::as_str)
    }

    pub fn body(&self, pointer: &str) -> Option<&'a B> {
        self.bodies.get(pointer).copied()
    }

    pub fn names(&self) -> &BTreeMap<String, String> {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
