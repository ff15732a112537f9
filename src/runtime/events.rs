//! Runtime event stream payloads.

use crate::types::{CountryId, PersonId};

/// Events emitted from the single-writer runtime loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectoryEvent {
    /// A new country was stored.
    CountryAdded {
        /// Added country id.
        id: CountryId,
    },
    /// A new person was stored.
    PersonAdded {
        /// Added person id.
        id: PersonId,
    },
    /// An existing person was updated.
    PersonUpdated {
        /// Updated person id.
        id: PersonId,
    },
    /// A person was removed.
    PersonDeleted {
        /// Removed person id.
        id: PersonId,
    },
}
