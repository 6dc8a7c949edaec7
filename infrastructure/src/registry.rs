//! Tool registry — the concrete implementation of [`ToolRegistryPort`].
//!
//! Registration is the pipeline's only validation point for descriptors:
//! a descriptor that makes it into the registry has a resolved handler, a
//! well-formed parameter list, and a generated input schema. Lookup at
//! invocation time is a plain map read.

use crate::schema::generator::SchemaGenerator;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, PoisonError, RwLock};
use toolgate_application::ports::tool_registry::ToolRegistryPort;
use toolgate_domain::core::error::RegistrationError;
use toolgate_domain::tool::entities::{ToolDescriptor, ToolRecord};
use tracing::debug;

/// Registry of invocable tools.
///
/// Thread-safe; registration and lookup may race freely. The schema
/// generator is shared so composite renderings are memoized across tools.
#[derive(Debug, Default)]
pub struct ToolRegistry {
    generator: Arc<SchemaGenerator>,
    records: RwLock<HashMap<String, Arc<ToolRecord>>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with a shared schema generator.
    pub fn with_generator(generator: Arc<SchemaGenerator>) -> Self {
        Self {
            generator,
            records: RwLock::new(HashMap::new()),
        }
    }

    /// Register a tool, generating its input schema once.
    pub fn register(
        &self,
        descriptor: ToolDescriptor,
    ) -> Result<Arc<ToolRecord>, RegistrationError> {
        validate_descriptor(&descriptor)?;

        let mut records = self
            .records
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        if records.contains_key(descriptor.name()) {
            return Err(RegistrationError::DuplicateTool(
                descriptor.name().to_string(),
            ));
        }

        let schema = self.generator.tool_schema(&descriptor);
        let record = Arc::new(ToolRecord::new(descriptor, schema));
        records.insert(record.name().to_string(), Arc::clone(&record));
        debug!("Registered tool '{}'", record.name());
        Ok(record)
    }

    /// All records, sorted by tool name.
    pub fn records(&self) -> Vec<Arc<ToolRecord>> {
        let records = self.records.read().unwrap_or_else(PoisonError::into_inner);
        let mut all: Vec<Arc<ToolRecord>> = records.values().cloned().collect();
        all.sort_by(|a, b| a.name().cmp(b.name()));
        all
    }

    pub fn len(&self) -> usize {
        self.records
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ToolRegistryPort for ToolRegistry {
    fn lookup(&self, name: &str) -> Option<Arc<ToolRecord>> {
        self.records
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
    }

    fn names(&self) -> Vec<String> {
        let records = self.records.read().unwrap_or_else(PoisonError::into_inner);
        let mut names: Vec<String> = records.keys().cloned().collect();
        names.sort();
        names
    }
}

fn validate_descriptor(descriptor: &ToolDescriptor) -> Result<(), RegistrationError> {
    if descriptor.name().is_empty() {
        return Err(RegistrationError::InvalidDescriptor {
            tool: "<unnamed>".to_string(),
            reason: "tool name must not be empty".to_string(),
        });
    }

    let mut seen = HashSet::new();
    for parameter in descriptor.parameters() {
        if parameter.name().is_empty() {
            return Err(RegistrationError::InvalidDescriptor {
                tool: descriptor.name().to_string(),
                reason: "parameter name must not be empty".to_string(),
            });
        }
        if !seen.insert(parameter.name()) {
            return Err(RegistrationError::InvalidDescriptor {
                tool: descriptor.name().to_string(),
                reason: format!("duplicate parameter '{}'", parameter.name()),
            });
        }
    }
    Ok(())
}
