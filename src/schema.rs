//! JSON-Schema-ish view of a type's category tree.
//!
//! Mirrors what encode produces: composite properties in declaration order,
//! optional values as `oneOf [T, null]`, raw JSON fields unconstrained.
use serde_json::{json, Map, Value};

use crate::convert::{JsonConvert, ScalarKind, TypeCategory};

pub fn json_schema<T: JsonConvert>() -> Value {
    schema_from_category(&T::category())
}

pub fn schema_from_category(category: &TypeCategory) -> Value {
    fn nullable(inner: Value) -> Value {
        json!({ "oneOf": [inner, { "type": "null" }] })
    }

    match category {
        TypeCategory::RawJson => json!({}),
        TypeCategory::Scalar(kind) => json!({ "type": kind.json_type() }),
        TypeCategory::Sequence(item) => json!({
            "type": "array",
            "items": schema_from_category(item),
        }),
        TypeCategory::Mapping { key, value } => {
            let mut o = json!({
                "type": "object",
                "additionalProperties": schema_from_category(value),
            });
            match key {
                ScalarKind::Integer { .. } => o["propertyNames"] = json!({ "pattern": "^-?[0-9]+$" }),
                ScalarKind::Bool => o["propertyNames"] = json!({ "enum": ["true", "false"] }),
                ScalarKind::Float | ScalarKind::Text => {}
            }
            o
        }
        TypeCategory::Optional(inner) => nullable(schema_from_category(inner)),
        TypeCategory::Composite { name, fields } => {
            let mut props = Map::new();
            for field in fields() {
                props.insert(field.name.to_owned(), schema_from_category(&field.category));
            }
            json!({
                "title": name,
                "type": "object",
                "properties": props,
            })
        }
    }
}
