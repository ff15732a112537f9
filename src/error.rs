//! Error taxonomy shared by the stores and the person service.

use uuid::Uuid;

/// Kind of record a lookup targeted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    /// A [`crate::country::CountryRecord`].
    Country,
    /// A [`crate::person::PersonRecord`].
    Person,
}

impl std::fmt::Display for Entity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Entity::Country => f.write_str("country"),
            Entity::Person => f.write_str("person"),
        }
    }
}

/// Failure raised by any directory operation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DirectoryError {
    /// A required request or id was absent.
    #[error("missing argument: {0}")]
    MissingArgument(&'static str),
    /// An argument was present but malformed (e.g. the nil id).
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),
    /// A declared field rule failed; carries the rule's message.
    #[error("{0}")]
    ValidationFailed(String),
    /// A record with the same key already exists.
    #[error("{entity} '{key}' already exists")]
    AlreadyExists {
        /// Kind of record that collided.
        entity: Entity,
        /// Colliding key (country name or person id).
        key: String,
    },
    /// No record with the given id, or a referenced record is gone.
    #[error("{entity} with id {} not found", display_id(.id))]
    NotFound {
        /// Kind of record looked up.
        entity: Entity,
        /// Id that missed, if one was supplied.
        id: Option<Uuid>,
    },
}

impl DirectoryError {
    pub(crate) fn country_not_found(id: Option<Uuid>) -> Self {
        Self::NotFound {
            entity: Entity::Country,
            id,
        }
    }

    pub(crate) fn country_exists(name: &str) -> Self {
        Self::AlreadyExists {
            entity: Entity::Country,
            key: name.to_string(),
        }
    }

    pub(crate) fn country_id_exists(id: Uuid) -> Self {
        Self::AlreadyExists {
            entity: Entity::Country,
            key: id.to_string(),
        }
    }

    pub(crate) fn person_exists(id: Uuid) -> Self {
        Self::AlreadyExists {
            entity: Entity::Person,
            key: id.to_string(),
        }
    }

    pub(crate) fn person_not_found(id: Uuid) -> Self {
        Self::NotFound {
            entity: Entity::Person,
            id: Some(id),
        }
    }
}

fn display_id(id: &Option<Uuid>) -> String {
    id.map_or_else(|| "<none>".to_string(), |id| id.to_string())
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, DirectoryError>;
