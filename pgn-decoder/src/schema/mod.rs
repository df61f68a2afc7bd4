//! Schema registry and the built-in PGN catalog
//!
//! This module contains the parameter layout types, the read-only registry
//! and the compiled-in catalog it is usually built from.

pub mod catalog;
pub mod database;

// Re-export key types for convenience
pub use database::{
    ByteRange, MessageDefinition, ParameterDefinition, RegistryStats, SchemaRegistry,
    MAX_RANGE_BYTES,
};
