pub mod client;
pub mod invoice;
pub mod project;
pub mod time_entry;

use serde::Deserialize;
use std::path::Path;

use crate::database::{DatabaseError, MemoryStore};
use crate::filter::EntitySchema;

pub use client::{Client, ClientDto, CLIENT_SCHEMA};
pub use invoice::{Invoice, InvoiceDto, InvoiceStatus, INVOICE_SCHEMA};
pub use project::{Project, ProjectDto, ProjectStatus, PROJECT_SCHEMA};
pub use time_entry::{TimeEntry, TimeEntryDto, TIME_ENTRY_SCHEMA};

pub static ENTITIES: [&EntitySchema; 4] = [&CLIENT_SCHEMA, &PROJECT_SCHEMA, &INVOICE_SCHEMA, &TIME_ENTRY_SCHEMA];

/// Looks an entity up by name, table, or route segment (`timeEntry`,
/// `time_entries`, `time-entries`).
pub fn entity_schema(name: &str) -> Option<&'static EntitySchema> {
    let normalized = name.replace('-', "_");
    ENTITIES
        .iter()
        .copied()
        .find(|schema| schema.name.eq_ignore_ascii_case(name) || schema.table == normalized)
}

/// Seed data for the memory backend.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Fixtures {
    pub clients: Vec<Client>,
    pub projects: Vec<Project>,
    pub invoices: Vec<Invoice>,
    pub time_entries: Vec<TimeEntry>,
}

impl Fixtures {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DatabaseError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| DatabaseError::Fixture(format!("{}: {}", path.display(), e)))?;
        Self::parse(&raw)
    }

    pub fn parse(raw: &str) -> Result<Self, DatabaseError> {
        serde_json::from_str(raw).map_err(|e| DatabaseError::Fixture(e.to_string()))
    }

    pub fn into_store(self) -> Result<MemoryStore, DatabaseError> {
        let mut store = MemoryStore::new();
        store.insert(self.clients)?;
        store.insert(self.projects)?;
        store.insert(self.invoices)?;
        store.insert(self.time_entries)?;
        tracing::info!(
            "Loaded fixtures: {} clients, {} projects, {} invoices, {} time entries",
            store.len(&CLIENT_SCHEMA),
            store.len(&PROJECT_SCHEMA),
            store.len(&INVOICE_SCHEMA),
            store.len(&TIME_ENTRY_SCHEMA)
        );
        Ok(store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{AttributePath, Kind};

    #[test]
    fn looks_up_entities_by_any_name() {
        assert_eq!(entity_schema("client").map(|s| s.table), Some("clients"));
        assert_eq!(entity_schema("invoices").map(|s| s.table), Some("invoices"));
        assert_eq!(entity_schema("time-entries").map(|s| s.name), Some("timeEntry"));
        assert_eq!(entity_schema("timeentry").map(|s| s.name), Some("timeEntry"));
        assert!(entity_schema("users").is_none());
    }

    #[test]
    fn attribute_names_never_contain_underscores() {
        for schema in ENTITIES {
            for attribute in schema.attributes {
                assert!(!attribute.name.contains('_'), "{}.{}", schema.name, attribute.name);
            }
        }
    }

    #[test]
    fn relations_point_at_foreign_keys() {
        for schema in ENTITIES {
            for attribute in schema.attributes {
                if let Kind::Relation { via, .. } = attribute.kind {
                    let fk = schema.attribute(via).expect("foreign key attribute");
                    assert_eq!(fk.column, attribute.column);
                }
            }
        }
    }

    #[test]
    fn two_hop_paths_resolve() {
        let resolved = INVOICE_SCHEMA
            .resolve(&AttributePath::parse("project.client.name").unwrap())
            .unwrap();
        assert_eq!(resolved.joins.len(), 2);
        assert_eq!(resolved.owner.name, "client");
    }

    #[test]
    fn fixtures_reject_duplicate_ids() {
        let raw = r#"{
            "clients": [
                { "id": 1, "name": "A", "email": "a@x.test", "company": null, "active": true, "createdAt": "2025-01-01T00:00:00" },
                { "id": 1, "name": "B", "email": "b@x.test", "company": null, "active": true, "createdAt": "2025-01-01T00:00:00" }
            ]
        }"#;
        let err = Fixtures::parse(raw).unwrap().into_store().unwrap_err();
        assert!(matches!(err, DatabaseError::Fixture(_)));
    }

    #[test]
    fn bundled_fixtures_load() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/fixtures/portal.json");
        let store = Fixtures::load(path).unwrap().into_store().unwrap();
        assert!(store.len(&INVOICE_SCHEMA) > 0);
    }
}
