//! Tool descriptor entities.

use crate::schema::Schema;
use crate::shape::TypeShape;
use crate::tool::handler::ToolHandler;
use serde_json::Value;

/// Free-form guidance attached to a parameter.
///
/// Purely descriptive: rendered into the generated schema's additive keys,
/// never into validation semantics. Constraints and hints fold into the
/// description text; examples and default emit as their own keys.
#[derive(Debug, Clone, Default)]
pub struct ParameterMetadata {
    pub description: Option<String>,
    pub examples: Vec<Value>,
    pub constraints: Option<String>,
    pub hints: Option<String>,
    pub default: Option<Value>,
}

impl ParameterMetadata {
    /// Description text with constraints and hints folded in.
    pub fn rendered_description(&self) -> Option<String> {
        let mut parts: Vec<String> = Vec::new();
        if let Some(description) = &self.description {
            parts.push(description.clone());
        }
        if let Some(constraints) = &self.constraints {
            parts.push(format!("Constraints: {constraints}"));
        }
        if let Some(hints) = &self.hints {
            parts.push(format!("Hints: {hints}"));
        }
        if parts.is_empty() {
            None
        } else {
            Some(parts.join(". "))
        }
    }

    pub fn is_empty(&self) -> bool {
        self.description.is_none()
            && self.examples.is_empty()
            && self.constraints.is_none()
            && self.hints.is_none()
            && self.default.is_none()
    }
}

/// A declared parameter of a tool.
#[derive(Debug, Clone)]
pub struct ParameterSpec {
    name: String,
    shape: TypeShape,
    required: bool,
    context: bool,
    metadata: ParameterMetadata,
}

impl ParameterSpec {
    /// Required parameter with the given shape.
    pub fn required(name: impl Into<String>, shape: TypeShape) -> Self {
        Self {
            name: name.into(),
            shape,
            required: true,
            context: false,
            metadata: ParameterMetadata::default(),
        }
    }

    /// Optional parameter with the given shape.
    pub fn optional(name: impl Into<String>, shape: TypeShape) -> Self {
        Self {
            name: name.into(),
            shape,
            required: false,
            context: false,
            metadata: ParameterMetadata::default(),
        }
    }

    /// Context parameter: satisfied from the per-call [`ToolContext`], never
    /// from the raw arguments, and never part of the generated schema.
    ///
    /// [`ToolContext`]: crate::context::ToolContext
    pub fn context(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            shape: TypeShape::Opaque,
            required: false,
            context: true,
            metadata: ParameterMetadata::default(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.metadata.description = Some(description.into());
        self
    }

    pub fn with_examples(mut self, examples: Vec<Value>) -> Self {
        self.metadata.examples = examples;
        self
    }

    pub fn with_constraints(mut self, constraints: impl Into<String>) -> Self {
        self.metadata.constraints = Some(constraints.into());
        self
    }

    pub fn with_hints(mut self, hints: impl Into<String>) -> Self {
        self.metadata.hints = Some(hints.into());
        self
    }

    pub fn with_default(mut self, default: Value) -> Self {
        self.metadata.default = Some(default);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn shape(&self) -> &TypeShape {
        &self.shape
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn is_context(&self) -> bool {
        self.context
    }

    pub fn metadata(&self) -> &ParameterMetadata {
        &self.metadata
    }
}

/// A named, schema-described, invocable capability.
///
/// The handler is resolved at construction; nothing about the descriptor
/// changes after registration.
#[derive(Debug, Clone)]
pub struct ToolDescriptor {
    name: String,
    description: String,
    parameters: Vec<ParameterSpec>,
    handler: ToolHandler,
}

impl ToolDescriptor {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        handler: ToolHandler,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters: Vec::new(),
            handler,
        }
    }

    /// Builder method to append a parameter (declared order is preserved).
    pub fn with_parameter(mut self, parameter: ParameterSpec) -> Self {
        self.parameters.push(parameter);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn parameters(&self) -> &[ParameterSpec] {
        &self.parameters
    }

    /// Parameters that appear in the schema and in bound arguments.
    pub fn visible_parameters(&self) -> impl Iterator<Item = &ParameterSpec> {
        self.parameters.iter().filter(|p| !p.is_context())
    }

    pub fn handler(&self) -> &ToolHandler {
        &self.handler
    }

    /// Whether the handler returns a deferred value instead of blocking.
    pub fn is_async(&self) -> bool {
        self.handler.is_deferred()
    }
}

/// A descriptor paired with its generated input schema.
///
/// Created by the registry at registration time; immutable afterwards and
/// shared across concurrent invocations.
#[derive(Debug)]
pub struct ToolRecord {
    descriptor: ToolDescriptor,
    input_schema: Schema,
}

impl ToolRecord {
    pub fn new(descriptor: ToolDescriptor, input_schema: Schema) -> Self {
        Self {
            descriptor,
            input_schema,
        }
    }

    pub fn name(&self) -> &str {
        self.descriptor.name()
    }

    pub fn descriptor(&self) -> &ToolDescriptor {
        &self.descriptor
    }

    pub fn input_schema(&self) -> &Schema {
        &self.input_schema
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn noop_handler() -> ToolHandler {
        ToolHandler::blocking(|_args, _ctx| Ok(Value::Null))
    }

    #[test]
    fn test_descriptor_builder_preserves_parameter_order() {
        let descriptor = ToolDescriptor::new("add", "Add two numbers", noop_handler())
            .with_parameter(ParameterSpec::required("a", TypeShape::integer()))
            .with_parameter(ParameterSpec::required("b", TypeShape::integer()));

        assert_eq!(descriptor.name(), "add");
        assert_eq!(descriptor.description(), "Add two numbers");
        let names: Vec<_> = descriptor.parameters().iter().map(|p| p.name()).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert!(!descriptor.is_async());
    }

    #[test]
    fn test_visible_parameters_skip_context() {
        let descriptor = ToolDescriptor::new("greet", "Greet someone", noop_handler())
            .with_parameter(ParameterSpec::context("ctx"))
            .with_parameter(ParameterSpec::required("name", TypeShape::string()));

        let visible: Vec<_> = descriptor.visible_parameters().map(|p| p.name()).collect();
        assert_eq!(visible, vec!["name"]);
        assert!(descriptor.parameters()[0].is_context());
        assert!(descriptor.parameters()[0].shape().is_opaque());
    }

    #[test]
    fn test_parameter_metadata_rendering() {
        let parameter = ParameterSpec::required("count", TypeShape::integer())
            .with_description("How many times to retry")
            .with_constraints("1-10")
            .with_hints("prefer small values")
            .with_examples(vec![json!(3)])
            .with_default(json!(1));

        let metadata = parameter.metadata();
        assert_eq!(
            metadata.rendered_description().as_deref(),
            Some("How many times to retry. Constraints: 1-10. Hints: prefer small values")
        );
        assert_eq!(metadata.examples, vec![json!(3)]);
        assert_eq!(metadata.default, Some(json!(1)));
    }

    #[test]
    fn test_empty_metadata_renders_nothing() {
        let parameter = ParameterSpec::optional("x", TypeShape::string());
        assert!(parameter.metadata().is_empty());
        assert_eq!(parameter.metadata().rendered_description(), None);
    }

    #[test]
    fn test_deferred_descriptor_reports_async() {
        let descriptor = ToolDescriptor::new(
            "fetch",
            "Fetch a value",
            ToolHandler::deferred(|_args, _ctx| async { Ok(Value::Null) }),
        );
        assert!(descriptor.is_async());
    }
}
