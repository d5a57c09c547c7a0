use std::collections::HashSet;

/// Distinct supplier names seen during the current search.
///
/// Iteration order is unspecified; use [`SupplierRegistry::sorted`] when a
/// stable order is needed for display.
#[derive(Debug, Default, Clone)]
pub struct SupplierRegistry {
    names: HashSet<String>,
}

impl SupplierRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `name`. Blank names are ignored. Returns `true` if the name was
    /// not present before.
    pub fn add(&mut self, name: &str) -> bool {
        let name = name.trim();
        if name.is_empty() {
            return false;
        }
        self.names.insert(name.to_owned())
    }

    pub fn reset(&mut self) {
        self.names.clear();
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name.trim())
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    #[must_use]
    pub fn sorted(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.iter().collect();
        names.sort_unstable();
        names
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
