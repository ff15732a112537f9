//! Country record and request types.

use serde::{Deserialize, Serialize};

use crate::{
    types::CountryId,
    validate::{FieldRule, Rule, Validate},
};

/// Stored country. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountryRecord {
    /// Server-assigned id.
    pub id: CountryId,
    /// Display name, unique case-insensitively.
    pub name: String,
}

/// Payload used to create a [`CountryRecord`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountryRequest {
    /// Requested country name; surrounding whitespace is dropped on add.
    pub name: String,
}

impl CountryRequest {
    /// Builds a request for `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub(crate) fn into_record(self, id: CountryId) -> CountryRecord {
        CountryRecord {
            id,
            name: self.name.trim().to_string(),
        }
    }
}

impl Validate for CountryRequest {
    fn rules(&self) -> Vec<FieldRule<'_>> {
        vec![FieldRule::new(
            "name",
            Some(&self.name),
            Rule::Required,
            "Country Name is required",
        )]
    }
}
