//! Data-driven ability catalogs.
//!
//! This crate reads TOML catalog files and validates them into
//! `ability-core` types:
//! - ability registrations
//! - notice templates
//! - cooldown permission tiers
//! - the secondary-trigger item list
//!
//! Content is handed to the runtime builder and never mutated afterwards.

pub mod loaders;

pub use loaders::{AbilityCatalog, CatalogLoader, LoadResult};
