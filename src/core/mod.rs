//! In-memory authoritative stores.

/// Country store capability and its in-memory registry.
pub mod country;
/// Person store capability and its in-memory implementation.
pub mod store;
