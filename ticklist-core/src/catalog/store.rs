//! The in-memory catalog store

use super::model::{Completion, TodoId, TodoItem};
use super::CatalogError;
use crate::config::SeedEntry;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, instrument};

/// Catalog shared between request handlers.
///
/// Mutating handlers hold the write guard across the whole
/// read/modify/write so id allocation always sees the current state.
pub type SharedCatalog = Arc<RwLock<Catalog>>;

/// Insertion-ordered mapping from id to record.
#[derive(Debug, Clone)]
pub struct Catalog {
    items: Vec<TodoItem>,
    index: HashMap<TodoId, usize>,
    // `None` once the counter has handed out `u64::MAX`
    next_id: Option<u64>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new()
    }
}

impl Catalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            index: HashMap::new(),
            next_id: Some(1),
        }
    }

    /// Build a catalog pre-seeded with the given entries.
    ///
    /// Entries without an explicit id receive the next free numeric id.
    /// Fails on an empty title or a duplicate id.
    pub fn from_seed(entries: &[SeedEntry]) -> Result<Self, CatalogError> {
        let reserved: HashSet<TodoId> = entries
            .iter()
            .filter_map(|e| e.id.as_deref().map(TodoId::from))
            .collect();

        let mut catalog = Self::new();
        for entry in entries {
            if entry.title.trim().is_empty() {
                return Err(CatalogError::InvalidArgument(
                    "seed entry title must not be empty".to_string(),
                ));
            }

            let id = match entry.id.as_deref() {
                Some("") => {
                    return Err(CatalogError::InvalidArgument(
                        "seed entry id must not be empty".to_string(),
                    ));
                }
                Some(raw) => TodoId::from(raw),
                None => catalog.allocate_id_avoiding(&reserved)?,
            };

            if catalog.index.contains_key(&id) {
                return Err(CatalogError::InvalidArgument(format!(
                    "duplicate seed id: {}",
                    id
                )));
            }

            catalog.insert(TodoItem::new(id, entry.title.clone()).with_completed(entry.completed));
        }

        let highest_numeric = catalog
            .items
            .iter()
            .filter_map(|item| item.id.numeric())
            .max()
            .unwrap_or(0);
        let floor = highest_numeric
            .max(catalog.items.len() as u64)
            .checked_add(1);
        catalog.next_id = match (catalog.next_id, floor) {
            (Some(current), Some(floor)) => Some(current.max(floor)),
            _ => None,
        };

        Ok(catalog)
    }

    /// Wrap the catalog for sharing across handlers
    pub fn into_shared(self) -> SharedCatalog {
        Arc::new(RwLock::new(self))
    }

    /// All records in insertion order
    pub fn list(&self) -> Vec<TodoItem> {
        self.items.clone()
    }

    /// Iterate records in insertion order without cloning
    pub fn iter(&self) -> impl Iterator<Item = &TodoItem> {
        self.items.iter()
    }

    /// Look up a record by id
    pub fn get(&self, id: &TodoId) -> Result<&TodoItem, CatalogError> {
        self.index
            .get(id)
            .map(|&pos| &self.items[pos])
            .ok_or_else(|| CatalogError::NotFound(id.clone()))
    }

    /// Create a new pending record with a freshly allocated id
    #[instrument(skip_all, fields(next_id = ?self.next_id))]
    pub fn create(&mut self, title: &str) -> Result<TodoItem, CatalogError> {
        if title.trim().is_empty() {
            return Err(CatalogError::InvalidArgument("title is required".to_string()));
        }

        let id = self.allocate_id_avoiding(&HashSet::new())?;
        let item = TodoItem::new(id, title);
        self.insert(item.clone());

        debug!(id = %item.id, "Created todo");
        Ok(item)
    }

    /// Transition a record to completed.
    ///
    /// Completing an already-completed record succeeds without mutation.
    #[instrument(skip_all, fields(id = %id))]
    pub fn complete(&mut self, id: &TodoId) -> Result<Completion, CatalogError> {
        if id.is_empty() {
            return Err(CatalogError::InvalidArgument("id is required".to_string()));
        }

        let pos = *self
            .index
            .get(id)
            .ok_or_else(|| CatalogError::NotFound(id.clone()))?;
        let item = &mut self.items[pos];

        if item.completed {
            debug!("Todo already completed");
            return Ok(Completion::AlreadyCompleted(item.clone()));
        }

        item.completed = true;
        debug!("Todo completed");
        Ok(Completion::Completed(item.clone()))
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of records still pending
    pub fn pending_count(&self) -> usize {
        self.items.iter().filter(|item| !item.completed).count()
    }

    /// Number of completed records
    pub fn completed_count(&self) -> usize {
        self.items.iter().filter(|item| item.completed).count()
    }

    fn insert(&mut self, item: TodoItem) {
        self.index.insert(item.id.clone(), self.items.len());
        self.items.push(item);
    }

    // Ids are never reused: the counter only moves forward and skips any id
    // already present or reserved by a later seed entry.
    fn allocate_id_avoiding(
        &mut self,
        reserved: &HashSet<TodoId>,
    ) -> Result<TodoId, CatalogError> {
        loop {
            let next = self.next_id.ok_or(CatalogError::IdsExhausted)?;
            self.next_id = next.checked_add(1);

            let candidate = TodoId::from(next);
            if !self.index.contains_key(&candidate) && !reserved.contains(&candidate) {
                return Ok(candidate);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seed(id: Option<&str>, title: &str, completed: bool) -> SeedEntry {
        SeedEntry {
            id: id.map(str::to_string),
            title: title.to_string(),
            completed,
        }
    }

    #[test]
    fn test_create_assigns_sequential_ids() {
        let mut catalog = Catalog::new();
        let first = catalog.create("Write spec").unwrap();
        let second = catalog.create("Implement").unwrap();

        assert_eq!(first.id.as_str(), "1");
        assert_eq!(second.id.as_str(), "2");
        assert!(!first.completed);
        assert_eq!(catalog.len(), 2);
    }

    #[test]
    fn test_create_rejects_blank_title() {
        let mut catalog = Catalog::new();
        assert!(matches!(
            catalog.create(""),
            Err(CatalogError::InvalidArgument(_))
        ));
        assert!(matches!(
            catalog.create("   "),
            Err(CatalogError::InvalidArgument(_))
        ));
        assert!(catalog.is_empty());
    }

    #[test]
    fn test_complete_is_one_way_and_idempotent() {
        let mut catalog = Catalog::new();
        let item = catalog.create("Test").unwrap();

        let first = catalog.complete(&item.id).unwrap();
        assert!(!first.was_already_completed());
        assert!(first.item().completed);

        let second = catalog.complete(&item.id).unwrap();
        assert!(second.was_already_completed());
        assert!(catalog.get(&item.id).unwrap().completed);
    }

    #[test]
    fn test_complete_unknown_and_empty_id() {
        let mut catalog = Catalog::new();
        assert!(matches!(
            catalog.complete(&TodoId::from("9")),
            Err(CatalogError::NotFound(_))
        ));
        assert!(matches!(
            catalog.complete(&TodoId::from("")),
            Err(CatalogError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_seed_sets_counter_past_existing_ids() {
        let catalog = Catalog::from_seed(&[
            seed(Some("1"), "Write spec", true),
            seed(Some("2"), "Implement", true),
            seed(Some("3"), "Test", false),
        ])
        .unwrap();
        let mut catalog = catalog;
        assert_eq!(catalog.create("Ship it").unwrap().id.as_str(), "4");
    }

    #[test]
    fn test_seed_skips_reserved_ids() {
        // The anonymous entry must not take "1", which a later entry claims.
        let mut catalog = Catalog::from_seed(&[
            seed(None, "Anonymous", false),
            seed(Some("1"), "Claimed", false),
        ])
        .unwrap();

        let ids: Vec<String> = catalog.iter().map(|i| i.id.to_string()).collect();
        assert_eq!(ids, vec!["2", "1"]);
        assert_eq!(catalog.create("Next").unwrap().id.as_str(), "3");
    }

    #[test]
    fn test_ids_never_collide_with_out_of_band_ids() {
        let mut catalog = Catalog::from_seed(&[
            seed(Some("alpha"), "Named", false),
            seed(Some("3"), "Three", false),
        ])
        .unwrap();

        let created = catalog.create("Fresh").unwrap();
        assert_eq!(created.id.as_str(), "4");
        assert_eq!(catalog.len(), 3);
    }

    #[test]
    fn test_seed_rejects_duplicates_and_blank_titles() {
        let duplicated = [seed(Some("1"), "a", false), seed(Some("1"), "b", false)];
        assert!(Catalog::from_seed(&duplicated).is_err());
        assert!(Catalog::from_seed(&[seed(None, " ", false)]).is_err());
        assert!(Catalog::from_seed(&[seed(Some(""), "x", false)]).is_err());
    }

    #[test]
    fn test_list_preserves_insertion_order() {
        let mut catalog = Catalog::new();
        for title in ["c", "a", "b"] {
            catalog.create(title).unwrap();
        }
        let titles: Vec<String> = catalog.list().into_iter().map(|i| i.title).collect();
        assert_eq!(titles, vec!["c", "a", "b"]);
    }

    #[test]
    fn test_read_returns_created_record() {
        let mut catalog = Catalog::from_seed(&[seed(Some("1"), "Write spec", true)]).unwrap();
        let created = catalog.create("Ship it").unwrap();

        assert_eq!(catalog.get(&created.id), Ok(&created));
        assert_eq!(catalog.list().last(), Some(&created));
    }

    #[test]
    fn test_counter_stops_at_u64_max() {
        let mut catalog =
            Catalog::from_seed(&[seed(Some("18446744073709551614"), "big", false)]).unwrap();

        let last = catalog.create("next").unwrap();
        assert_eq!(last.id.as_str(), "18446744073709551615");

        let before = catalog.list();
        assert_eq!(catalog.create("one more"), Err(CatalogError::IdsExhausted));
        assert_eq!(catalog.list(), before);
    }

    #[test]
    fn test_seed_at_u64_max_leaves_no_ids() {
        let mut catalog =
            Catalog::from_seed(&[seed(Some("18446744073709551615"), "max", false)]).unwrap();

        assert_eq!(catalog.create("next"), Err(CatalogError::IdsExhausted));
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn test_counts() {
        let mut catalog = Catalog::new();
        let a = catalog.create("a").unwrap();
        catalog.create("b").unwrap();
        catalog.complete(&a.id).unwrap();
        assert_eq!(catalog.pending_count(), 1);
        assert_eq!(catalog.completed_count(), 1);
    }
}
