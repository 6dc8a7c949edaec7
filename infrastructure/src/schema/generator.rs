//! Schema generator — renders type shapes into wire schemas.
//!
//! [`SchemaGenerator`] walks a [`TypeShape`] and produces the [`Schema`]
//! document published to callers. Two properties hold for every input:
//!
//! - **Total**: generation never fails. Anything unresolvable was already
//!   collapsed to [`TypeShape::Opaque`] at registration, which renders as
//!   the permissive schema `{}`.
//! - **Finite**: recursive composites are cut at the first repeated shape
//!   on the expansion path, rendering as a bare `{"type": "object"}`.
//!
//! # Caching
//!
//! Composite renderings are memoized by shape identity. Only renderings
//! begun from an empty path are cached: a composite rendered midway
//! through another expansion can be truncated differently depending on
//! what is already on the path above it.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};
use toolgate_domain::schema::{Schema, SchemaProperties, SchemaType};
use toolgate_domain::shape::{CompositeShape, PrimitiveKind, TypeShape};
use toolgate_domain::tool::entities::ToolDescriptor;

/// Renders [`TypeShape`]s into [`Schema`] documents.
#[derive(Debug, Default)]
pub struct SchemaGenerator {
    /// Composite renderings keyed by shape identity.
    composites: RwLock<HashMap<usize, Schema>>,
}

impl SchemaGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Render a single shape.
    pub fn generate(&self, shape: &TypeShape) -> Schema {
        let mut visited = HashSet::new();
        self.expand(shape, &mut visited)
    }

    /// Render the input schema for a whole tool.
    ///
    /// Context parameters are dispatcher-injected and never published;
    /// everything else lands in `properties` with its descriptive metadata
    /// merged in. `required` lists the required parameters and is omitted
    /// when empty.
    pub fn tool_schema(&self, descriptor: &ToolDescriptor) -> Schema {
        let mut properties = SchemaProperties::new();
        let mut required = Vec::new();

        for parameter in descriptor.visible_parameters() {
            let mut schema = self.generate(parameter.shape());
            let metadata = parameter.metadata();
            if let Some(description) = metadata.rendered_description() {
                schema.description = Some(description);
            }
            if !metadata.examples.is_empty() {
                schema.examples = Some(metadata.examples.clone());
            }
            if let Some(default) = &metadata.default {
                schema.default = Some(default.clone());
            }
            properties.push(parameter.name(), schema);
            if parameter.is_required() {
                required.push(parameter.name().to_string());
            }
        }

        let mut schema = Schema::of_type(SchemaType::Object);
        schema.properties = Some(properties);
        if !required.is_empty() {
            schema.required = Some(required);
        }
        schema
    }

    fn expand(&self, shape: &TypeShape, visited: &mut HashSet<usize>) -> Schema {
        match shape {
            TypeShape::Primitive(kind) => Schema::of_type(primitive_type(*kind)),
            TypeShape::Enum(values) => {
                let mut schema = Schema::of_type(SchemaType::String);
                schema.enum_values = Some(values.clone());
                schema
            }
            TypeShape::Sequence(element) => {
                let mut schema = Schema::of_type(SchemaType::Array);
                schema.items = Some(Box::new(self.expand(element, visited)));
                schema
            }
            TypeShape::Mapping(value_shape) => {
                let mut schema = Schema::of_type(SchemaType::Object);
                schema.additional_properties = Some(Box::new(self.expand(value_shape, visited)));
                schema
            }
            TypeShape::Composite(composite) => self.expand_composite(composite, visited),
            TypeShape::Opaque => Schema::permissive(),
        }
    }

    fn expand_composite(
        &self,
        composite: &Arc<CompositeShape>,
        visited: &mut HashSet<usize>,
    ) -> Schema {
        let identity = composite.identity();
        if visited.contains(&identity) {
            // Cycle: cut the expansion here.
            return Schema::of_type(SchemaType::Object);
        }

        let cacheable = visited.is_empty();
        if cacheable
            && let Ok(cache) = self.composites.read()
            && let Some(cached) = cache.get(&identity)
        {
            return cached.clone();
        }

        visited.insert(identity);
        let mut properties = SchemaProperties::new();
        let mut required = Vec::new();
        for field in composite.fields() {
            properties.push(field.name(), self.expand(field.shape(), visited));
            // An opaque field accepts anything including null, so listing
            // it as required would demand a key that carries no information.
            if field.is_required() && !field.shape().is_opaque() {
                required.push(field.name().to_string());
            }
        }
        visited.remove(&identity);

        let mut schema = Schema::of_type(SchemaType::Object);
        if !properties.is_empty() {
            schema.properties = Some(properties);
        }
        if !required.is_empty() {
            schema.required = Some(required);
        }

        if cacheable && let Ok(mut cache) = self.composites.write() {
            cache.entry(identity).or_insert_with(|| schema.clone());
        }
        schema
    }
}

fn primitive_type(kind: PrimitiveKind) -> SchemaType {
    match kind {
        PrimitiveKind::String => SchemaType::String,
        PrimitiveKind::Integer | PrimitiveKind::Long => SchemaType::Integer,
        PrimitiveKind::Float | PrimitiveKind::Double => SchemaType::Number,
        PrimitiveKind::Boolean => SchemaType::Boolean,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};
    use toolgate_domain::shape::FieldShape;
    use toolgate_domain::tool::entities::ParameterSpec;
    use toolgate_domain::tool::handler::ToolHandler;

    fn rendered(shape: &TypeShape) -> Value {
        SchemaGenerator::new().generate(shape).to_value()
    }

    #[test]
    fn test_primitive_mappings() {
        assert_eq!(rendered(&TypeShape::string()), json!({"type": "string"}));
        assert_eq!(rendered(&TypeShape::integer()), json!({"type": "integer"}));
        assert_eq!(rendered(&TypeShape::long()), json!({"type": "integer"}));
        assert_eq!(rendered(&TypeShape::float()), json!({"type": "number"}));
        assert_eq!(rendered(&TypeShape::double()), json!({"type": "number"}));
        assert_eq!(rendered(&TypeShape::boolean()), json!({"type": "boolean"}));
    }

    #[test]
    fn test_enum_preserves_declared_order() {
        assert_eq!(
            rendered(&TypeShape::enumeration(["RED", "BLUE"])),
            json!({"type": "string", "enum": ["RED", "BLUE"]})
        );
    }

    #[test]
    fn test_opaque_renders_permissive() {
        assert_eq!(rendered(&TypeShape::Opaque), json!({}));
    }

    #[test]
    fn test_nested_collections() {
        let shape = TypeShape::sequence(TypeShape::mapping(TypeShape::Opaque));
        assert_eq!(
            rendered(&shape),
            json!({
                "type": "array",
                "items": {"type": "object", "additionalProperties": {}}
            })
        );
    }

    #[test]
    fn test_composite_fields_and_required() {
        let shape = CompositeShape::new(
            "Server",
            vec![
                FieldShape::required("host", TypeShape::string()),
                FieldShape::optional("port", TypeShape::integer()),
                FieldShape::required("payload", TypeShape::Opaque),
            ],
        );
        assert_eq!(
            rendered(&TypeShape::composite(shape)),
            json!({
                "type": "object",
                "properties": {
                    "host": {"type": "string"},
                    "port": {"type": "integer"},
                    "payload": {}
                },
                "required": ["host"]
            })
        );
    }

    #[test]
    fn test_self_referential_composite_truncates() {
        let node = CompositeShape::declare("Node");
        node.define(vec![
            FieldShape::required("value", TypeShape::integer()),
            FieldShape::optional("next", TypeShape::composite(Arc::clone(&node))),
        ]);

        assert_eq!(
            rendered(&TypeShape::composite(node)),
            json!({
                "type": "object",
                "properties": {
                    "value": {"type": "integer"},
                    "next": {"type": "object"}
                },
                "required": ["value"]
            })
        );
    }

    #[test]
    fn test_mutually_recursive_composites_truncate_per_root() {
        let a = CompositeShape::declare("A");
        let b = CompositeShape::new(
            "B",
            vec![FieldShape::required("a", TypeShape::composite(Arc::clone(&a)))],
        );
        a.define(vec![FieldShape::required(
            "b",
            TypeShape::composite(Arc::clone(&b)),
        )]);

        let generator = SchemaGenerator::new();
        assert_eq!(
            generator.generate(&TypeShape::composite(Arc::clone(&a))).to_value(),
            json!({
                "type": "object",
                "properties": {
                    "b": {
                        "type": "object",
                        "properties": {"a": {"type": "object"}},
                        "required": ["a"]
                    }
                },
                "required": ["b"]
            })
        );
        // B rendered as its own root expands one level deeper than the B
        // embedded in A's rendering did.
        assert_eq!(
            generator.generate(&TypeShape::composite(b)).to_value(),
            json!({
                "type": "object",
                "properties": {
                    "a": {
                        "type": "object",
                        "properties": {"b": {"type": "object"}},
                        "required": ["b"]
                    }
                },
                "required": ["a"]
            })
        );
    }

    #[test]
    fn test_generation_is_idempotent() {
        let shape = TypeShape::composite(CompositeShape::new(
            "Point",
            vec![
                FieldShape::required("x", TypeShape::double()),
                FieldShape::required("y", TypeShape::double()),
            ],
        ));
        let generator = SchemaGenerator::new();
        let first = generator.generate(&shape);
        let second = generator.generate(&shape);
        assert_eq!(first, second);
    }

    #[test]
    fn test_tool_schema_excludes_context_and_merges_metadata() {
        let descriptor = ToolDescriptor::new(
            "greet",
            "Greet someone",
            ToolHandler::blocking(|_args, _ctx| Ok(Value::Null)),
        )
        .with_parameter(
            ParameterSpec::required("name", TypeShape::string())
                .with_description("Who to greet")
                .with_examples(vec![json!("Ada")]),
        )
        .with_parameter(
            ParameterSpec::optional("excited", TypeShape::boolean()).with_default(json!(false)),
        )
        .with_parameter(ParameterSpec::context("ctx"));

        let schema = SchemaGenerator::new().tool_schema(&descriptor);
        assert_eq!(
            schema.to_value(),
            json!({
                "type": "object",
                "properties": {
                    "name": {
                        "type": "string",
                        "description": "Who to greet",
                        "examples": ["Ada"]
                    },
                    "excited": {"type": "boolean", "default": false}
                },
                "required": ["name"]
            })
        );
    }

    #[test]
    fn test_tool_schema_folds_constraints_into_description() {
        let descriptor = ToolDescriptor::new(
            "take",
            "Take items",
            ToolHandler::blocking(|_args, _ctx| Ok(Value::Null)),
        )
        .with_parameter(
            ParameterSpec::required("count", TypeShape::integer())
                .with_description("Count of items")
                .with_constraints("between 1 and 100"),
        );

        let schema = SchemaGenerator::new().tool_schema(&descriptor);
        let count = schema
            .properties
            .as_ref()
            .and_then(|p| p.get("count"))
            .expect("count property");
        assert_eq!(
            count.description.as_deref(),
            Some("Count of items. Constraints: between 1 and 100")
        );
    }

    #[test]
    fn test_tool_schema_without_parameters() {
        let descriptor = ToolDescriptor::new(
            "ping",
            "Liveness probe",
            ToolHandler::blocking(|_args, _ctx| Ok(Value::Null)),
        );
        let schema = SchemaGenerator::new().tool_schema(&descriptor);
        assert_eq!(schema.to_value(), json!({"type": "object", "properties": {}}));
    }
}
