//! core
//!
//! Domain types for the repository layer.
//!
//! # Modules
//!
//! - [`types`] - Strong types: Identifier, Revision
//! - [`entity`] - Entity kinds, typed entities, drafts, and self-link parsing
//! - [`search`] - Listing results
//! - [`query`] - Listing query construction
//! - [`config`] - Configuration schema and loading
//!
//! # Design Principles
//!
//! - Strong typing prevents malformed identifiers at construction time
//! - Entity kinds are types, so a schema can never be written to the
//!   organization collection
//! - Entities are values; writes produce new entities

pub mod config;
pub mod entity;
pub mod query;
pub mod search;
pub mod types;
