//! In-memory country and person directory with validated mutations,
//! field-based filtering and sorting, and derived read views.
//!
//! # Examples
//!
//! Synchronous usage with [`service::person::PersonService`]:
//! ```
//! use census::{
//!     core::country::CountryStore,
//!     country::CountryRequest,
//!     person::PersonRequest,
//!     service::person::PersonService,
//!     types::{Gender, SortOrder},
//! };
//!
//! let mut svc = PersonService::in_memory();
//! let usa = svc.countries_mut().add(CountryRequest::new("USA")).expect("add country");
//! let jane = svc.add(PersonRequest {
//!     name: "Jane".to_string(),
//!     email: "jane@x.com".to_string(),
//!     birth_date: chrono::NaiveDate::from_ymd_opt(1995, 5, 15),
//!     gender: Some(Gender::Female),
//!     country_id: Some(usa.id),
//!     ..PersonRequest::default()
//! }).expect("add person");
//! assert_eq!(jane.country_name.as_deref(), Some("USA"));
//! assert!(jane.age.is_some());
//!
//! let women = svc.filtered("Gender", "female").expect("filter");
//! let sorted = svc.sorted(women, "PersonName", SortOrder::Descending);
//! assert_eq!(sorted.len(), 1);
//! ```
//!
//! Runtime usage behind a single-writer task:
//! ```no_run
//! use census::{
//!     country::CountryRequest,
//!     runtime::handle::{spawn_directory, RuntimeConfig},
//!     service::person::PersonService,
//! };
//!
//! # #[tokio::main]
//! # async fn main() {
//! let handle = spawn_directory(PersonService::in_memory(), RuntimeConfig::default());
//! let _usa = handle.add_country(CountryRequest::new("USA")).await.expect("add country");
//! handle.shutdown().await.expect("shutdown");
//! # }
//! ```
#![deny(missing_docs)]

/// In-memory store traits and implementations.
pub mod core;
/// Country record and request types.
pub mod country;
/// Error taxonomy.
pub mod error;
/// Person records, requests, and responses.
pub mod person;
/// Single-writer runtime handle and events.
pub mod runtime;
/// Person service, query fields, and response assembly.
pub mod service;
/// Shared primitive types and enums.
pub mod types;
/// Field-rule validation.
pub mod validate;
