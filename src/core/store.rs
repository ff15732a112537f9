use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::{
    error::{DirectoryError, Result},
    person::PersonRecord,
    types::PersonId,
};

/// Backing storage for person records.
///
/// Implementations own their records and report them in insertion order.
pub trait PersonStore {
    /// Adds `rec`; fails if its id is nil or already present.
    fn insert(&mut self, rec: PersonRecord) -> Result<()>;
    /// Looks up a record by id.
    fn get(&self, id: PersonId) -> Option<&PersonRecord>;
    /// Mutable lookup by id.
    fn get_mut(&mut self, id: PersonId) -> Option<&mut PersonRecord>;
    /// All records, oldest first.
    fn records(&self) -> Vec<&PersonRecord>;
    /// Removes and returns a record.
    fn remove(&mut self, id: PersonId) -> Option<PersonRecord>;
    /// Number of stored records.
    fn len(&self) -> usize;
    /// Returns true when nothing is stored.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Serializable copy of a [`MemoryPersonStore`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PersonSnapshot {
    /// Records in insertion order.
    pub records: Vec<PersonRecord>,
}

/// Process-lifetime person store keyed by id.
#[derive(Debug, Default)]
pub struct MemoryPersonStore {
    records: HashMap<PersonId, PersonRecord>,
    order: Vec<PersonId>,
    pos: HashMap<PersonId, usize>,
}

impl MemoryPersonStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a store from an exported snapshot.
    pub fn from_snapshot(snapshot: PersonSnapshot) -> Result<Self> {
        let mut store = Self::new();
        for rec in snapshot.records {
            store.insert(rec)?;
        }
        Ok(store)
    }

    /// Copies every record out, in insertion order.
    pub fn export_snapshot(&self) -> PersonSnapshot {
        PersonSnapshot {
            records: self.records().into_iter().cloned().collect(),
        }
    }

    /// Ids in insertion order.
    pub fn ordered_ids(&self) -> &[PersonId] {
        &self.order
    }
}

impl PersonStore for MemoryPersonStore {
    fn insert(&mut self, rec: PersonRecord) -> Result<()> {
        if rec.id.is_nil() {
            return Err(DirectoryError::InvalidArgument("id cannot be the nil uuid"));
        }
        if self.records.contains_key(&rec.id) {
            return Err(DirectoryError::person_exists(rec.id));
        }

        let id = rec.id;
        self.pos.insert(id, self.order.len());
        self.order.push(id);
        self.records.insert(id, rec);
        Ok(())
    }

    fn get(&self, id: PersonId) -> Option<&PersonRecord> {
        self.records.get(&id)
    }

    fn get_mut(&mut self, id: PersonId) -> Option<&mut PersonRecord> {
        self.records.get_mut(&id)
    }

    fn records(&self) -> Vec<&PersonRecord> {
        self.order
            .iter()
            .filter_map(|id| self.records.get(id))
            .collect()
    }

    fn remove(&mut self, id: PersonId) -> Option<PersonRecord> {
        let rec = self.records.remove(&id)?;
        if let Some(idx) = self.pos.remove(&id) {
            self.order.remove(idx);
            for moved in &self.order[idx..] {
                if let Some(p) = self.pos.get_mut(moved) {
                    *p -= 1;
                }
            }
        }
        Some(rec)
    }

    fn len(&self) -> usize {
        self.records.len()
    }
}
