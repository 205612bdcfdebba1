//! Bundled provider implementations.
//!
//! Real sources live in separate extensions; what ships here is the
//! deterministic in-memory [`CatalogProvider`] that hosts and tests use to
//! exercise the contract without network access.

pub mod catalog;

pub use catalog::{CatalogEpisode, CatalogProvider, CatalogSource, CatalogTitle, CatalogTranslation};
