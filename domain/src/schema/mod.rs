//! JSON-Schema-like validation model.
//!
//! The wire format uses exactly the keys `type`, `properties`, `required`,
//! `items`, `additionalProperties` and `enum`, plus the additive descriptive
//! keys `description`, `examples` and `default`. Unset fields are omitted
//! from serialization, so the permissive schema (all fields unset)
//! serializes to `{}` and matches any value.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_json::Value;

/// Allowed `type` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaType {
    Object,
    Array,
    String,
    Number,
    Integer,
    Boolean,
}

impl SchemaType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SchemaType::Object => "object",
            SchemaType::Array => "array",
            SchemaType::String => "string",
            SchemaType::Number => "number",
            SchemaType::Integer => "integer",
            SchemaType::Boolean => "boolean",
        }
    }
}

/// Property schemas in declared order.
///
/// Declared order matters for readability of the emitted document, so this
/// is a vector of pairs rather than a map; lookups are linear over what is
/// in practice a handful of parameters.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SchemaProperties(Vec<(String, Schema)>);

impl SchemaProperties {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn push(&mut self, name: impl Into<String>, schema: Schema) {
        self.0.push((name.into(), schema));
    }

    pub fn get(&self, name: &str) -> Option<&Schema> {
        self.0
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, schema)| schema)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Schema)> {
        self.0.iter().map(|(name, schema)| (name.as_str(), schema))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for SchemaProperties {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, schema) in &self.0 {
            map.serialize_entry(name, schema)?;
        }
        map.end()
    }
}

/// A recursive validation schema.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Schema {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<SchemaType>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<SchemaProperties>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<Schema>>,

    #[serde(
        rename = "additionalProperties",
        skip_serializing_if = "Option::is_none"
    )]
    pub additional_properties: Option<Box<Schema>>,

    #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub examples: Option<Vec<Value>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
}

impl Schema {
    /// The permissive schema `{}`: matches any value.
    pub fn permissive() -> Self {
        Self::default()
    }

    pub fn of_type(schema_type: SchemaType) -> Self {
        Self {
            schema_type: Some(schema_type),
            ..Self::default()
        }
    }

    pub fn is_permissive(&self) -> bool {
        *self == Self::default()
    }

    /// Names listed as required, empty when the key is absent.
    pub fn required_names(&self) -> &[String] {
        self.required.as_deref().unwrap_or(&[])
    }

    /// Render as a `serde_json::Value` tree.
    ///
    /// Serialization of this model cannot fail; the fallback keeps the
    /// signature total rather than threading an impossible error.
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or_else(|_| Value::Object(serde_json::Map::new()))
    }
}
