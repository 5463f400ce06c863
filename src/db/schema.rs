//! Static catalog of the portfolio store: every collection and the indexes it carries.
//!
//! Adding a collection or index means adding a row here; the initializer
//! iterates this table and nothing else.

use mongodb::{IndexModel, bson::Document, options::IndexOptions};

/// Logical database the portfolio API reads from.
pub const DATABASE_NAME: &str = "portfolio_db";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

impl Direction {
    pub fn as_i32(self) -> i32 {
        match self {
            Direction::Ascending => 1,
            Direction::Descending => -1,
        }
    }
}

/// Single-field index on one collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexSpec {
    pub field: &'static str,
    pub direction: Direction,
    pub unique: bool,
}

impl IndexSpec {
    pub const fn unique_asc(field: &'static str) -> Self {
        Self {
            field,
            direction: Direction::Ascending,
            unique: true,
        }
    }

    pub const fn asc(field: &'static str) -> Self {
        Self {
            field,
            direction: Direction::Ascending,
            unique: false,
        }
    }

    pub const fn desc(field: &'static str) -> Self {
        Self {
            field,
            direction: Direction::Descending,
            unique: false,
        }
    }

    pub fn keys(&self) -> Document {
        let mut keys = Document::new();
        keys.insert(self.field, self.direction.as_i32());
        keys
    }

    /// Server-side name the driver derives from the key document, e.g. `sent_at_-1`.
    pub fn name(&self) -> String {
        format!("{}_{}", self.field, self.direction.as_i32())
    }

    /// `collection.index_name`, used in logs, errors and verification.
    pub fn label(&self, collection: &str) -> String {
        format!("{collection}.{}", self.name())
    }

    pub fn model(&self) -> IndexModel {
        let builder = IndexModel::builder().keys(self.keys());
        if self.unique {
            builder
                .options(IndexOptions::builder().unique(true).build())
                .build()
        } else {
            builder.build()
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct CollectionSpec {
    pub name: &'static str,
    pub indexes: &'static [IndexSpec],
}

const ORDERED: &[IndexSpec] = &[IndexSpec::asc("order_index")];
const BY_ID: &[IndexSpec] = &[IndexSpec::unique_asc("id")];

/// Collections in creation order.
pub const COLLECTIONS: &[CollectionSpec] = &[
    CollectionSpec { name: "profiles", indexes: BY_ID },
    CollectionSpec { name: "contact_information", indexes: BY_ID },
    CollectionSpec { name: "social_networks", indexes: ORDERED },
    CollectionSpec { name: "projects", indexes: ORDERED },
    CollectionSpec { name: "work_experiences", indexes: ORDERED },
    CollectionSpec { name: "education", indexes: ORDERED },
    CollectionSpec { name: "additional_training", indexes: &[] },
    CollectionSpec { name: "certifications", indexes: &[] },
    CollectionSpec { name: "skills", indexes: ORDERED },
    CollectionSpec { name: "tools", indexes: ORDERED },
    CollectionSpec {
        name: "contact_messages",
        indexes: &[IndexSpec::desc("sent_at")],
    },
];

/// Every (collection, index) pair in declaration order.
pub fn declared_indexes() -> impl Iterator<Item = (&'static str, &'static IndexSpec)> {
    COLLECTIONS
        .iter()
        .flat_map(|c| c.indexes.iter().map(move |idx| (c.name, idx)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::doc;
    use std::collections::HashSet;

    #[test]
    fn declares_eleven_distinct_collections() {
        let names: HashSet<_> = COLLECTIONS.iter().map(|c| c.name).collect();
        assert_eq!(COLLECTIONS.len(), 11);
        assert_eq!(names.len(), 11);
        for expected in [
            "profiles",
            "contact_information",
            "social_networks",
            "projects",
            "work_experiences",
            "education",
            "additional_training",
            "certifications",
            "skills",
            "tools",
            "contact_messages",
        ] {
            assert!(names.contains(expected), "missing collection {expected}");
        }
    }

    #[test]
    fn index_table_matches_catalog() {
        let got: Vec<_> = declared_indexes()
            .map(|(c, i)| (c, i.field, i.direction, i.unique))
            .collect();
        use Direction::*;
        assert_eq!(
            got,
            vec![
                ("profiles", "id", Ascending, true),
                ("contact_information", "id", Ascending, true),
                ("social_networks", "order_index", Ascending, false),
                ("projects", "order_index", Ascending, false),
                ("work_experiences", "order_index", Ascending, false),
                ("education", "order_index", Ascending, false),
                ("skills", "order_index", Ascending, false),
                ("tools", "order_index", Ascending, false),
                ("contact_messages", "sent_at", Descending, false),
            ]
        );
    }

    #[test]
    fn names_follow_driver_convention() {
        assert_eq!(IndexSpec::unique_asc("id").name(), "id_1");
        assert_eq!(IndexSpec::desc("sent_at").name(), "sent_at_-1");
        let labels: Vec<String> = declared_indexes()
            .map(|(coll, idx)| idx.label(coll))
            .collect();
        assert!(labels.contains(&"contact_messages.sent_at_-1".to_string()));
        assert!(labels.contains(&"projects.order_index_1".to_string()));
    }

    #[test]
    fn unique_flag_only_on_id_indexes() {
        let model = IndexSpec::unique_asc("id").model();
        assert_eq!(model.keys, doc! { "id": 1 });
        assert_eq!(model.options.and_then(|o| o.unique), Some(true));

        let model = IndexSpec::desc("sent_at").model();
        assert_eq!(model.keys, doc! { "sent_at": -1 });
        assert!(model.options.and_then(|o| o.unique).is_none());
    }
}
