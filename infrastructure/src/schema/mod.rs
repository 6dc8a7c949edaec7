//! Schema generation adapters.

pub mod generator;

pub use generator::SchemaGenerator;
