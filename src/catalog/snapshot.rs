//! Point-in-time catalog snapshots.

use std::collections::HashMap;

use crate::catalog::item::CatalogItem;

/// Every item from one catalog listing pass, keyed by ISBN.
///
/// Iteration follows discovery order. Re-inserting a known ISBN replaces the
/// item in place.
#[derive(Debug, Clone, Default)]
pub struct CatalogSnapshot {
    items: Vec<CatalogItem>,
    index: HashMap<String, usize>,
}

impl CatalogSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an item, returning the one it replaced.
    pub fn insert(&mut self, item: CatalogItem) -> Option<CatalogItem> {
        match self.index.get(&item.isbn) {
            Some(&pos) => Some(std::mem::replace(&mut self.items[pos], item)),
            None => {
                self.index.insert(item.isbn.clone(), self.items.len());
                self.items.push(item);
                None
            }
        }
    }

    /// Merge a page of items.
    pub fn merge_page<I: IntoIterator<Item = CatalogItem>>(&mut self, page: I) {
        for item in page {
            if let Some(previous) = self.insert(item) {
                tracing::debug!("Duplicate catalog entry replaced: {}", previous.isbn);
            }
        }
    }

    pub fn get(&self, isbn: &str) -> Option<&CatalogItem> {
        self.index.get(isbn).map(|&pos| &self.items[pos])
    }

    pub fn contains(&self, isbn: &str) -> bool {
        self.index.contains_key(isbn)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CatalogItem> {
        self.items.iter()
    }
}

impl FromIterator<CatalogItem> for CatalogSnapshot {
    fn from_iter<T: IntoIterator<Item = CatalogItem>>(iter: T) -> Self {
        let mut snapshot = Self::new();
        snapshot.merge_page(iter);
        snapshot
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_keeps_discovery_order() {
        let snapshot: CatalogSnapshot = vec![
            CatalogItem::new("3", "C", "Author"),
            CatalogItem::new("1", "A", "Author"),
            CatalogItem::new("2", "B", "Author"),
        ]
        .into_iter()
        .collect();

        let isbns: Vec<&str> = snapshot.iter().map(|i| i.isbn.as_str()).collect();
        assert_eq!(isbns, vec!["3", "1", "2"]);
    }

    #[test]
    fn test_duplicate_replaces_in_place() {
        let mut snapshot = CatalogSnapshot::new();
        snapshot.merge_page(vec![
            CatalogItem::new("1", "Old", "Author"),
            CatalogItem::new("2", "B", "Author"),
        ]);
        snapshot.merge_page(vec![CatalogItem::new("1", "New", "Author")]);

        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot.get("1").unwrap().title, "New");
        assert_eq!(snapshot.iter().next().unwrap().isbn, "1");
    }
}
