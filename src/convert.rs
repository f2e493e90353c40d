//! Type-driven conversion dispatch.
//!
//! Every type that can travel to and from a JSON tree implements
//! [`JsonConvert`]. Picking the conversion strategy for a type is just trait
//! resolution, so it happens at compile time and nested types
//! (sequence of mapping of composite, ...) compose without glue:
//!
//! 1. `serde_json::Value` → identity (escape hatch for untyped fields)
//! 2. bool / integers / floats / `String` → [`scalar`]
//! 3. `Vec`, `VecDeque`, `LinkedList` → [`seq`]
//! 4. `HashMap`, `BTreeMap`, `IndexMap` with [`MapKey`] keys → [`map`]
//! 5. types registered with `impl_composite!` → [`crate::composite`]
//! 6. `Option<T>` → null ⇄ `None`, otherwise `T`
//!
//! A type with none of these impls simply doesn't compile, which is the
//! registration-time failure for "no resolvable category".
pub mod scalar;
pub mod seq;
pub mod map;

use serde_json::Value;

use crate::registry::FieldShape;

pub use scalar::MapKey;

// -------------------------------- Category -------------------------------- //

/// Scalar flavour, also used for mapping keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarKind {
    Bool,
    /// Inclusive range of the concrete integer type; values outside it decode to 0.
    Integer { min: i128, max: i128 },
    Float,
    Text,
}

impl ScalarKind {
    pub fn json_type(self) -> &'static str {
        match self {
            ScalarKind::Bool => "boolean",
            ScalarKind::Integer { .. } => "integer",
            ScalarKind::Float => "number",
            ScalarKind::Text => "string",
        }
    }
}

/// Which conversion strategy a type resolved to.
#[derive(Debug, Clone)]
pub enum TypeCategory {
    RawJson,
    Scalar(ScalarKind),
    Sequence(Box<TypeCategory>),
    Mapping {
        key: ScalarKind,
        value: Box<TypeCategory>,
    },
    Optional(Box<TypeCategory>),
    Composite {
        name: &'static str,
        /// Resolved lazily so describing a type never walks nested registries up front.
        fields: fn() -> Vec<FieldShape>,
    },
}

impl TypeCategory {
    /// Short label for reports (`"integer"`, `"array"`, `"PageInfo"`, ...).
    pub fn label(&self) -> &'static str {
        match self {
            TypeCategory::RawJson => "any",
            TypeCategory::Scalar(kind) => kind.json_type(),
            TypeCategory::Sequence(_) => "array",
            TypeCategory::Mapping { .. } => "object",
            TypeCategory::Optional(inner) => inner.label(),
            TypeCategory::Composite { name, .. } => name,
        }
    }
}

// ---------------------------------- Trait --------------------------------- //

/// Bidirectional conversion between a Rust value and a JSON node.
///
/// `from_json` never fails: a node of the wrong shape decodes to the
/// type's default (empty container, zero, empty string).
pub trait JsonConvert: Sized {
    fn category() -> TypeCategory;

    fn to_json(&self) -> Value;

    fn from_json(node: &Value) -> Self;
}

// ------------------------------- Raw JSON --------------------------------- //

impl JsonConvert for Value {
    fn category() -> TypeCategory { TypeCategory::RawJson }

    fn to_json(&self) -> Value { self.clone() }

    fn from_json(node: &Value) -> Self { node.clone() }
}

// -------------------------------- Optional -------------------------------- //

impl<T: JsonConvert> JsonConvert for Option<T> {
    fn category() -> TypeCategory {
        TypeCategory::Optional(Box::new(T::category()))
    }

    fn to_json(&self) -> Value {
        match self {
            Some(value) => value.to_json(),
            None => Value::Null,
        }
    }

    fn from_json(node: &Value) -> Self {
        match node {
            Value::Null => None,
            other => Some(T::from_json(other)),
        }
    }
}

// ---------------------------------- Tests --------------------------------- //

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn raw_json_passes_through_unchanged() {
        let node = json!({"any": [1, "two", null, {"three": 3.5}]});
        assert_eq!(node.to_json(), node);
        assert_eq!(Value::from_json(&node), node);
        assert!(matches!(Value::category(), TypeCategory::RawJson));
    }

    #[test]
    fn option_maps_null_to_none() {
        assert_eq!(Option::<i32>::from_json(&Value::Null), None);
        assert_eq!(Option::<i32>::from_json(&json!(7)), Some(7));
        assert_eq!(Some("x".to_string()).to_json(), json!("x"));
        assert_eq!(None::<String>.to_json(), Value::Null);
    }

    #[test]
    fn categories_nest() {
        let category = <Vec<std::collections::BTreeMap<String, Option<f64>>>>::category();
        let TypeCategory::Sequence(inner) = category else { panic!("expected sequence") };
        let TypeCategory::Mapping { key, value } = *inner else { panic!("expected mapping") };
        assert_eq!(key, ScalarKind::Text);
        assert!(matches!(*value, TypeCategory::Optional(ref v) if matches!(**v, TypeCategory::Scalar(ScalarKind::Float))));
    }
}
