//! Composite (named-field) shapes.

use super::TypeShape;
use std::sync::{Arc, OnceLock};

/// A single named field of a composite shape.
#[derive(Debug, Clone)]
pub struct FieldShape {
    name: String,
    shape: TypeShape,
    required: bool,
}

impl FieldShape {
    /// Field that must be present when a value is bound.
    pub fn required(name: impl Into<String>, shape: TypeShape) -> Self {
        Self {
            name: name.into(),
            shape,
            required: true,
        }
    }

    /// Field that may be absent; binding substitutes its zero value.
    pub fn optional(name: impl Into<String>, shape: TypeShape) -> Self {
        Self {
            name: name.into(),
            shape,
            required: false,
        }
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
}

/// A named aggregate of fields in declared order.
///
/// Identity is the allocation: two composites with identical fields are
/// still distinct shapes, which is what schema caching and cycle detection
/// key on. Fields are write-once so a composite can reference itself:
/// `declare` first, then `define` once the referencing shape exists.
///
/// ```
/// use std::sync::Arc;
/// use toolgate_domain::shape::{CompositeShape, FieldShape, TypeShape};
///
/// let node = CompositeShape::declare("TreeNode");
/// node.define(vec![
///     FieldShape::required("label", TypeShape::string()),
///     FieldShape::optional(
///         "children",
///         TypeShape::sequence(TypeShape::composite(Arc::clone(&node))),
///     ),
/// ]);
/// assert_eq!(node.fields().len(), 2);
/// ```
#[derive(Debug)]
pub struct CompositeShape {
    name: String,
    fields: OnceLock<Vec<FieldShape>>,
}

impl CompositeShape {
    /// Build a fully-defined composite.
    pub fn new(name: impl Into<String>, fields: Vec<FieldShape>) -> Arc<Self> {
        let shape = Self::declare(name);
        let _ = shape.fields.set(fields);
        shape
    }

    /// Declare a composite whose fields are supplied later via [`define`].
    ///
    /// [`define`]: CompositeShape::define
    pub fn declare(name: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            name: name.into(),
            fields: OnceLock::new(),
        })
    }

    /// Supply the field list of a declared composite.
    ///
    /// Returns `false` if the fields were already set; the first definition
    /// wins.
    pub fn define(&self, fields: Vec<FieldShape>) -> bool {
        self.fields.set(fields).is_ok()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared fields; empty while the composite is declared but not yet
    /// defined.
    pub fn fields(&self) -> &[FieldShape] {
        self.fields.get().map(Vec::as_slice).unwrap_or(&[])
    }

    /// Pointer identity used by schema caching and cycle detection.
    pub fn identity(self: &Arc<Self>) -> usize {
        Arc::as_ptr(self) as usize
    }
}
