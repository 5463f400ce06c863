use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::time::Duration;

use super::schema::{COLLECTIONS, declared_indexes};

/// What the server reports for one collection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectionState {
    pub indexes: Vec<String>,
    pub documents: u64,
}

/// Point-in-time view of a database catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogSnapshot {
    pub collections: BTreeMap<String, CollectionState>,
}

impl CatalogSnapshot {
    pub fn collection_names(&self) -> Vec<&str> {
        self.collections.keys().map(String::as_str).collect()
    }

    pub fn has_index(&self, collection: &str, index_name: &str) -> bool {
        self.collections
            .get(collection)
            .is_some_and(|c| c.indexes.iter().any(|n| n == index_name))
    }

    /// Indexes besides the implicit `_id_` one.
    pub fn secondary_index_count(&self) -> usize {
        self.collections
            .values()
            .flat_map(|c| c.indexes.iter())
            .filter(|n| n.as_str() != "_id_")
            .count()
    }

    pub fn total_documents(&self) -> u64 {
        self.collections.values().map(|c| c.documents).sum()
    }

    /// Declared collections and `collection.index` labels the server does not have.
    pub fn missing_declared(&self) -> Vec<String> {
        let collections = COLLECTIONS
            .iter()
            .filter(|c| !self.collections.contains_key(c.name))
            .map(|c| c.name.to_string());
        let indexes = declared_indexes()
            .filter(|(coll, idx)| !self.has_index(coll, &idx.name()))
            .map(|(coll, idx)| idx.label(coll));
        collections.chain(indexes).collect()
    }
}

/// Outcome of one initializer run.
#[derive(Debug, Clone)]
pub struct BootstrapReport {
    pub database: String,
    pub started_at: DateTime<Utc>,
    pub elapsed: Duration,
    pub collections_created: Vec<String>,
    pub collections_existing: Vec<String>,
    pub indexes_ensured: Vec<String>,
}

impl BootstrapReport {
    /// The two operator-facing lines printed on success.
    pub fn confirmation(&self) -> [String; 2] {
        [
            format!("✅ Database {} initialized successfully", self.database),
            "✅ Collections and indexes created".to_string(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provisioned() -> CatalogSnapshot {
        let mut snap = CatalogSnapshot::default();
        for spec in COLLECTIONS {
            let mut indexes = vec!["_id_".to_string()];
            indexes.extend(spec.indexes.iter().map(|i| i.name()));
            snap.collections.insert(
                spec.name.to_string(),
                CollectionState {
                    indexes,
                    documents: 0,
                },
            );
        }
        snap
    }

    #[test]
    fn fully_provisioned_snapshot_has_nothing_missing() {
        let snap = provisioned();
        assert!(snap.missing_declared().is_empty());
        assert_eq!(snap.collection_names().len(), 11);
        assert_eq!(snap.secondary_index_count(), 9);
        assert_eq!(snap.total_documents(), 0);
    }

    #[test]
    fn reports_absent_collection_and_its_index() {
        let mut snap = provisioned();
        snap.collections.remove("tools");
        let missing = snap.missing_declared();
        assert_eq!(missing, vec!["tools", "tools.order_index_1"]);
    }

    #[test]
    fn reports_index_dropped_from_existing_collection() {
        let mut snap = provisioned();
        snap.collections
            .get_mut("contact_messages")
            .unwrap()
            .indexes
            .retain(|n| n == "_id_");
        assert_eq!(snap.missing_declared(), vec!["contact_messages.sent_at_-1"]);
    }

    #[test]
    fn confirmation_is_two_lines_naming_the_database() {
        let report = BootstrapReport {
            database: "portfolio_db".to_string(),
            started_at: Utc::now(),
            elapsed: Duration::from_millis(12),
            collections_created: Vec::new(),
            collections_existing: Vec::new(),
            indexes_ensured: Vec::new(),
        };
        let lines = report.confirmation();
        assert!(lines[0].contains("portfolio_db"));
        assert!(lines.iter().all(|l| !l.contains('\n')));
    }
}
