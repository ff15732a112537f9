use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::{
    country::{CountryRecord, CountryRequest},
    error::{DirectoryError, Result},
    types::CountryId,
    validate::{validate, validate_id},
};

/// Country capability consumed by the person service.
pub trait CountryStore {
    /// Validates and stores a new country.
    fn add(&mut self, request: impl Into<Option<CountryRequest>>) -> Result<CountryRecord>;
    /// Looks up a country by id.
    fn get(&self, id: impl Into<Option<CountryId>>) -> Result<CountryRecord>;
    /// All countries, oldest first.
    fn list(&self) -> Vec<CountryRecord>;
}

/// Serializable copy of a [`CountryRegistry`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CountrySnapshot {
    /// Records in insertion order.
    pub records: Vec<CountryRecord>,
}

/// In-memory [`CountryStore`] with a case-insensitive name index.
#[derive(Debug, Default)]
pub struct CountryRegistry {
    records: HashMap<CountryId, CountryRecord>,
    order: Vec<CountryId>,
    by_name: HashMap<String, CountryId>,
}

impl CountryRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a registry, holding each record to the same rules as [`CountryStore::add`].
    ///
    /// Fails on a nil or repeated id, a blank name, or a duplicate name.
    pub fn from_snapshot(snapshot: CountrySnapshot) -> Result<Self> {
        let mut registry = Self::new();
        for rec in snapshot.records {
            validate_id(Some(rec.id))?;
            validate(&CountryRequest::new(rec.name.as_str()))?;
            if registry.records.contains_key(&rec.id) {
                return Err(DirectoryError::country_id_exists(rec.id));
            }
            if registry.by_name.contains_key(&name_key(&rec.name)) {
                return Err(DirectoryError::country_exists(&rec.name));
            }
            registry.insert_record(rec);
        }
        Ok(registry)
    }

    /// Copies every record out, in insertion order.
    pub fn export_snapshot(&self) -> CountrySnapshot {
        CountrySnapshot {
            records: self.list(),
        }
    }

    /// Case-insensitive lookup by name.
    pub fn find_by_name(&self, name: &str) -> Option<&CountryRecord> {
        self.by_name
            .get(&name_key(name))
            .and_then(|id| self.records.get(id))
    }

    /// Number of stored countries.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true when no country is stored.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn insert_record(&mut self, rec: CountryRecord) {
        self.by_name.insert(name_key(&rec.name), rec.id);
        self.order.push(rec.id);
        self.records.insert(rec.id, rec);
    }
}

impl CountryStore for CountryRegistry {
    fn add(&mut self, request: impl Into<Option<CountryRequest>>) -> Result<CountryRecord> {
        let request = request
            .into()
            .ok_or(DirectoryError::MissingArgument("country request"))?;
        validate(&request)?;

        let rec = request.into_record(Uuid::new_v4());
        if self.by_name.contains_key(&name_key(&rec.name)) {
            debug!(name = %rec.name, "duplicate country rejected");
            return Err(DirectoryError::country_exists(&rec.name));
        }

        info!(id = %rec.id, name = %rec.name, "country added");
        self.insert_record(rec.clone());
        Ok(rec)
    }

    fn get(&self, id: impl Into<Option<CountryId>>) -> Result<CountryRecord> {
        let id = validate_id(id.into())?;
        self.records
            .get(&id)
            .cloned()
            .ok_or(DirectoryError::country_not_found(Some(id)))
    }

    fn list(&self) -> Vec<CountryRecord> {
        self.order
            .iter()
            .filter_map(|id| self.records.get(id).cloned())
            .collect()
    }
}

fn name_key(name: &str) -> String {
    name.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_trimmed_and_indexed_case_insensitively() {
        let mut registry = CountryRegistry::new();
        let usa = registry.add(CountryRequest::new("  USA ")).unwrap();
        assert_eq!(usa.name, "USA");
        assert_eq!(registry.find_by_name("usa").map(|c| c.id), Some(usa.id));

        let err = registry.add(CountryRequest::new("uSa")).unwrap_err();
        assert_eq!(err, DirectoryError::country_exists("uSa"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn snapshot_rejects_duplicate_names() {
        let snapshot = CountrySnapshot {
            records: vec![
                CountryRecord {
                    id: Uuid::new_v4(),
                    name: "Japan".into(),
                },
                CountryRecord {
                    id: Uuid::new_v4(),
                    name: "JAPAN".into(),
                },
            ],
        };
        assert!(matches!(
            CountryRegistry::from_snapshot(snapshot),
            Err(DirectoryError::AlreadyExists { .. })
        ));
    }

    #[test]
    fn snapshot_rejects_repeated_id_without_corrupting_index() {
        let id = Uuid::new_v4();
        let snapshot = CountrySnapshot {
            records: vec![
                CountryRecord {
                    id,
                    name: "USA".into(),
                },
                CountryRecord {
                    id,
                    name: "Japan".into(),
                },
            ],
        };
        assert_eq!(
            CountryRegistry::from_snapshot(snapshot).unwrap_err(),
            DirectoryError::country_id_exists(id)
        );
    }

    #[test]
    fn snapshot_rejects_nil_id_and_blank_name() {
        let nil = CountrySnapshot {
            records: vec![CountryRecord {
                id: Uuid::nil(),
                name: "Peru".into(),
            }],
        };
        assert!(matches!(
            CountryRegistry::from_snapshot(nil),
            Err(DirectoryError::InvalidArgument(_))
        ));

        let blank = CountrySnapshot {
            records: vec![CountryRecord {
                id: Uuid::new_v4(),
                name: "   ".into(),
            }],
        };
        assert_eq!(
            CountryRegistry::from_snapshot(blank).unwrap_err(),
            DirectoryError::ValidationFailed("Country Name is required".into())
        );
    }
}
