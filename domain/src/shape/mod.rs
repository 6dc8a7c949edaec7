//! Structural type descriptions for tool parameters.
//!
//! A [`TypeShape`] describes the structure of a parameter or field
//! independently of any source-language type system. Shapes are built once
//! at registration time and never mutated; recursive variants share their
//! element shapes through `Arc`, so cloning a shape is cheap and identity
//! (for caching and cycle detection) is the allocation itself.
//!
//! | Variant | Meaning | Schema type |
//! |---------|---------|-------------|
//! | `Primitive` | scalar value | fixed table per kind |
//! | `Enum` | closed string set | `"string"` + `enum` |
//! | `Sequence` | uniform ordered collection | `"array"` |
//! | `Mapping` | string-keyed uniform values | `"object"` |
//! | `Composite` | named fields | `"object"` + `properties` |
//! | `Opaque` | accepts anything | `{}` (permissive) |

mod composite;

pub use composite::{CompositeShape, FieldShape};

use serde_json::Value;
use std::sync::Arc;

/// Scalar parameter kinds.
///
/// Width variants (`Integer`/`Long`, `Float`/`Double`) collapse to the same
/// schema type; the distinction only matters when binding raw values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    String,
    Integer,
    Long,
    Float,
    Double,
    Boolean,
}

impl PrimitiveKind {
    /// Human-readable kind name used in coercion error messages.
    pub fn name(&self) -> &'static str {
        match self {
            PrimitiveKind::String => "string",
            PrimitiveKind::Integer => "integer",
            PrimitiveKind::Long => "long",
            PrimitiveKind::Float => "float",
            PrimitiveKind::Double => "double",
            PrimitiveKind::Boolean => "boolean",
        }
    }
}

/// Structural description of a parameter or field.
#[derive(Debug, Clone)]
pub enum TypeShape {
    /// A scalar value.
    Primitive(PrimitiveKind),
    /// A closed set of string values; declared order is significant.
    Enum(Vec<String>),
    /// An ordered collection with a uniform element shape.
    Sequence(Arc<TypeShape>),
    /// String-keyed values with a uniform value shape.
    Mapping(Arc<TypeShape>),
    /// Named fields in declared order.
    Composite(Arc<CompositeShape>),
    /// An unresolvable element: accepts any value.
    Opaque,
}

impl TypeShape {
    pub fn string() -> Self {
        TypeShape::Primitive(PrimitiveKind::String)
    }

    pub fn integer() -> Self {
        TypeShape::Primitive(PrimitiveKind::Integer)
    }

    pub fn long() -> Self {
        TypeShape::Primitive(PrimitiveKind::Long)
    }

    pub fn float() -> Self {
        TypeShape::Primitive(PrimitiveKind::Float)
    }

    pub fn double() -> Self {
        TypeShape::Primitive(PrimitiveKind::Double)
    }

    pub fn boolean() -> Self {
        TypeShape::Primitive(PrimitiveKind::Boolean)
    }

    pub fn enumeration<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        TypeShape::Enum(values.into_iter().map(Into::into).collect())
    }

    pub fn sequence(element: TypeShape) -> Self {
        TypeShape::Sequence(Arc::new(element))
    }

    pub fn mapping(value: TypeShape) -> Self {
        TypeShape::Mapping(Arc::new(value))
    }

    pub fn composite(shape: Arc<CompositeShape>) -> Self {
        TypeShape::Composite(shape)
    }

    pub fn is_opaque(&self) -> bool {
        matches!(self, TypeShape::Opaque)
    }

    /// Neutral value substituted for an absent optional parameter that
    /// declared no default.
    pub fn zero_value(&self) -> Value {
        match self {
            TypeShape::Primitive(PrimitiveKind::String) => Value::String(String::new()),
            TypeShape::Primitive(PrimitiveKind::Integer | PrimitiveKind::Long) => Value::from(0),
            TypeShape::Primitive(PrimitiveKind::Float | PrimitiveKind::Double) => Value::from(0.0),
            TypeShape::Primitive(PrimitiveKind::Boolean) => Value::Bool(false),
            TypeShape::Enum(values) => values
                .first()
                .map(|v| Value::String(v.clone()))
                .unwrap_or(Value::Null),
            TypeShape::Sequence(_) => Value::Array(Vec::new()),
            // Composite zero is shallow: fields are only materialized when
            // a value is actually present, which also keeps cyclic shapes
            // from recursing here.
            TypeShape::Mapping(_) | TypeShape::Composite(_) => Value::Object(serde_json::Map::new()),
            TypeShape::Opaque => Value::Null,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_constructors_produce_expected_variants() {
        assert!(matches!(
            TypeShape::integer(),
            TypeShape::Primitive(PrimitiveKind::Integer)
        ));
        assert!(matches!(
            TypeShape::sequence(TypeShape::string()),
            TypeShape::Sequence(_)
        ));

        let shape = TypeShape::enumeration(["RED", "BLUE"]);
        match shape {
            TypeShape::Enum(values) => assert_eq!(values, vec!["RED", "BLUE"]),
            other => panic!("unexpected shape: {other:?}"),
        }
    }

    #[test]
    fn test_zero_values() {
        assert_eq!(TypeShape::string().zero_value(), json!(""));
        assert_eq!(TypeShape::integer().zero_value(), json!(0));
        assert_eq!(TypeShape::long().zero_value(), json!(0));
        assert_eq!(TypeShape::double().zero_value(), json!(0.0));
        assert_eq!(TypeShape::boolean().zero_value(), json!(false));
        assert_eq!(
            TypeShape::enumeration(["RED", "BLUE"]).zero_value(),
            json!("RED")
        );
        assert_eq!(TypeShape::sequence(TypeShape::string()).zero_value(), json!([]));
        assert_eq!(TypeShape::mapping(TypeShape::string()).zero_value(), json!({}));
        assert_eq!(TypeShape::Opaque.zero_value(), Value::Null);
    }

    #[test]
    fn test_empty_enum_zero_value_is_null() {
        let values: Vec<String> = Vec::new();
        assert_eq!(TypeShape::Enum(values).zero_value(), Value::Null);
    }

    #[test]
    fn test_primitive_kind_names() {
        assert_eq!(PrimitiveKind::Integer.name(), "integer");
        assert_eq!(PrimitiveKind::Double.name(), "double");
    }
}
