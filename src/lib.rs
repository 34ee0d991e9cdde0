//! Logicnet - typed operator evaluation for logic network content
//!
//! Values flow through composable operators that are validated, evaluated,
//! partially applied and persisted to text. See `registry::Registries` for
//! the entry point.

pub mod core;
pub mod evaluate;
pub mod registry;
pub mod values;

pub use registry::{CatalogEntry, Registries, RegistryBuilder};
