//! Argument binding.
//!
//! The binder turns the caller's untyped [`ArgumentMap`] into the ordered,
//! coerced [`BoundArguments`] a handler receives. Binding walks the
//! descriptor's declared parameters in order and stops at the first
//! violation, so handlers never observe a partially valid call.

use crate::core::error::BindError;
use crate::shape::{CompositeShape, PrimitiveKind, TypeShape};
use crate::tool::entities::ToolDescriptor;
use crate::tool::value_objects::{ArgumentMap, BoundArguments};
use serde_json::Value;

const I32_MIN: i64 = i32::MIN as i64;
const I32_MAX: i64 = i32::MAX as i64;

/// Caps on what a single call may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BindLimits {
    /// Maximum number of caller-supplied arguments.
    pub max_arguments: usize,
    /// Maximum byte length of a top-level string argument.
    pub max_value_bytes: usize,
}

impl Default for BindLimits {
    fn default() -> Self {
        Self {
            max_arguments: 50,
            max_value_bytes: 1024 * 1024,
        }
    }
}

/// Binds raw argument maps against a tool's declared parameters.
#[derive(Debug, Clone, Default)]
pub struct ArgumentBinder {
    limits: BindLimits,
}

impl ArgumentBinder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limits(limits: BindLimits) -> Self {
        Self { limits }
    }

    pub fn limits(&self) -> &BindLimits {
        &self.limits
    }

    /// Bind `arguments` to `descriptor`'s declared parameters.
    ///
    /// Context parameters are skipped entirely: they are injected by the
    /// dispatcher and never read from the caller's map. Absent optional
    /// parameters fall back to their declared default, then to the shape's
    /// zero value. Unknown keys in the map are ignored.
    pub fn bind(
        &self,
        descriptor: &ToolDescriptor,
        arguments: &ArgumentMap,
    ) -> Result<BoundArguments, BindError> {
        if arguments.len() > self.limits.max_arguments {
            return Err(BindError::TooManyArguments {
                count: arguments.len(),
                limit: self.limits.max_arguments,
            });
        }

        let mut bound = BoundArguments::new();
        for parameter in descriptor.parameters() {
            if parameter.is_context() {
                continue;
            }
            let name = parameter.name();
            match arguments.get(name) {
                Some(value) => {
                    self.check_size(name, value)?;
                    bound.push(name, self.coerce(name, parameter.shape(), value)?);
                }
                None if parameter.is_required() => {
                    return Err(BindError::Missing {
                        parameter: name.to_string(),
                    });
                }
                None => {
                    let fallback = parameter
                        .metadata()
                        .default
                        .clone()
                        .unwrap_or_else(|| parameter.shape().zero_value());
                    bound.push(name, fallback);
                }
            }
        }
        Ok(bound)
    }

    fn check_size(&self, name: &str, value: &Value) -> Result<(), BindError> {
        if let Value::String(text) = value
            && text.len() > self.limits.max_value_bytes
        {
            return Err(BindError::ValueTooLarge {
                parameter: name.to_string(),
                limit: self.limits.max_value_bytes,
            });
        }
        Ok(())
    }

    fn coerce(&self, path: &str, shape: &TypeShape, value: &Value) -> Result<Value, BindError> {
        match shape {
            TypeShape::Primitive(kind) => coerce_primitive(path, *kind, value),
            TypeShape::Enum(members) => coerce_enum(path, members, value),
            TypeShape::Sequence(element) => self.coerce_sequence(path, element, value),
            TypeShape::Mapping(value_shape) => self.coerce_mapping(path, value_shape, value),
            TypeShape::Composite(composite) => self.coerce_composite(path, composite, value),
            TypeShape::Opaque => Ok(value.clone()),
        }
    }

    fn coerce_sequence(
        &self,
        path: &str,
        element: &TypeShape,
        value: &Value,
    ) -> Result<Value, BindError> {
        match value {
            Value::Array(items) => {
                let mut coerced = Vec::with_capacity(items.len());
                for (index, item) in items.iter().enumerate() {
                    coerced.push(self.coerce(&format!("{path}[{index}]"), element, item)?);
                }
                Ok(Value::Array(coerced))
            }
            // A lone value binds as a one-element sequence.
            single => Ok(Value::Array(vec![self.coerce(path, element, single)?])),
        }
    }

    fn coerce_mapping(
        &self,
        path: &str,
        value_shape: &TypeShape,
        value: &Value,
    ) -> Result<Value, BindError> {
        let Value::Object(entries) = value else {
            return Err(coercion(path, "expected an object"));
        };
        let mut coerced = serde_json::Map::with_capacity(entries.len());
        for (key, entry) in entries {
            coerced.insert(
                key.clone(),
                self.coerce(&format!("{path}.{key}"), value_shape, entry)?,
            );
        }
        Ok(Value::Object(coerced))
    }

    fn coerce_composite(
        &self,
        path: &str,
        composite: &CompositeShape,
        value: &Value,
    ) -> Result<Value, BindError> {
        let Value::Object(entries) = value else {
            return Err(coercion(path, "expected an object"));
        };
        // Unknown keys are dropped; only declared fields survive binding.
        let mut coerced = serde_json::Map::new();
        for field in composite.fields() {
            let field_path = format!("{path}.{}", field.name());
            match entries.get(field.name()) {
                Some(entry) => {
                    coerced.insert(
                        field.name().to_string(),
                        self.coerce(&field_path, field.shape(), entry)?,
                    );
                }
                None if field.is_required() && !field.shape().is_opaque() => {
                    return Err(BindError::Missing {
                        parameter: field_path,
                    });
                }
                None => {
                    coerced.insert(field.name().to_string(), field.shape().zero_value());
                }
            }
        }
        Ok(Value::Object(coerced))
    }
}

fn coerce_primitive(path: &str, kind: PrimitiveKind, value: &Value) -> Result<Value, BindError> {
    match kind {
        PrimitiveKind::String => coerce_string(path, value),
        PrimitiveKind::Integer => coerce_integral(path, value, I32_MIN, I32_MAX),
        PrimitiveKind::Long => coerce_integral(path, value, i64::MIN, i64::MAX),
        PrimitiveKind::Float | PrimitiveKind::Double => coerce_float(path, value),
        PrimitiveKind::Boolean => coerce_boolean(path, value),
    }
}

fn coerce_string(path: &str, value: &Value) -> Result<Value, BindError> {
    match value {
        Value::String(_) => Ok(value.clone()),
        Value::Number(number) => Ok(Value::String(number.to_string())),
        Value::Bool(flag) => Ok(Value::String(flag.to_string())),
        _ => Err(coercion(path, "expected a string")),
    }
}

fn coerce_integral(path: &str, value: &Value, min: i64, max: i64) -> Result<Value, BindError> {
    let number = match value {
        Value::Number(number) => {
            if let Some(integer) = number.as_i64() {
                integer
            } else if let Some(float) = number.as_f64() {
                integral_from_float(path, float)?
            } else {
                return Err(coercion(path, "value out of integer range"));
            }
        }
        Value::String(text) => text
            .parse::<i64>()
            .map_err(|_| coercion(path, format!("cannot parse '{text}' as an integer")))?,
        _ => return Err(coercion(path, "expected an integer")),
    };
    if number < min || number > max {
        return Err(coercion(path, format!("value {number} out of range")));
    }
    Ok(Value::from(number))
}

fn integral_from_float(path: &str, float: f64) -> Result<i64, BindError> {
    if float.is_finite() && float.fract() == 0.0 && float >= i64::MIN as f64 && float <= i64::MAX as f64
    {
        Ok(float as i64)
    } else {
        Err(coercion(
            path,
            format!("value {float} is not a whole number"),
        ))
    }
}

fn coerce_float(path: &str, value: &Value) -> Result<Value, BindError> {
    match value {
        Value::Number(_) => Ok(value.clone()),
        Value::String(text) => {
            let parsed = text
                .parse::<f64>()
                .map_err(|_| coercion(path, format!("cannot parse '{text}' as a number")))?;
            if parsed.is_finite() {
                Ok(Value::from(parsed))
            } else {
                Err(coercion(path, "expected a finite number"))
            }
        }
        _ => Err(coercion(path, "expected a number")),
    }
}

fn coerce_boolean(path: &str, value: &Value) -> Result<Value, BindError> {
    match value {
        Value::Bool(_) => Ok(value.clone()),
        Value::String(text) if text == "true" => Ok(Value::Bool(true)),
        Value::String(text) if text == "false" => Ok(Value::Bool(false)),
        _ => Err(coercion(path, "expected a boolean")),
    }
}

fn coerce_enum(path: &str, members: &[String], value: &Value) -> Result<Value, BindError> {
    match value {
        Value::String(text) => {
            if members.iter().any(|member| member == text) {
                Ok(value.clone())
            } else {
                Err(BindError::InvalidEnumValue {
                    parameter: path.to_string(),
                    value: text.clone(),
                })
            }
        }
        _ => Err(coercion(path, "enumerated values must be strings")),
    }
}

fn coercion(path: &str, reason: impl Into<String>) -> BindError {
    BindError::Coercion {
        parameter: path.to_string(),
        reason: reason.into(),
    }
}
