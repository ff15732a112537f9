//! Person query and mutation logic.

/// Person service over injected stores.
pub mod person;
/// Filterable and sortable person fields.
pub mod query;
/// Response assembly and age derivation.
pub mod response;
