//! Report what a best-effort decode would silently do.
//!
//! Decoding never fails, so a caller cannot tell "absent" from "malformed"
//! from "valid but zero". `audit` walks a node against a type's category
//! tree and lists every place where the decode would fall back: missing
//! fields, ignored keys, shapes that will be coerced or defaulted. It never
//! mutates anything and the decode contract itself is unchanged.
use std::fmt;

use serde_json::{Map, Number, Value};

use crate::convert::scalar::kind_name;
use crate::convert::{JsonConvert, ScalarKind, TypeCategory};
use crate::registry::{fold_name, FieldShape};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FindingKind {
    /// Declared field with no matching key; decode keeps the prior value.
    MissingField,
    /// Key that matches no declared field; decode ignores it.
    UnknownKey,
    /// Another case-variant of a key already used for `field`; ignored.
    ShadowedKey { field: &'static str },
    /// Node shape differs from the declared type; decode coerces or defaults.
    TypeMismatch { expected: &'static str, found: &'static str },
    /// Mapping key that does not parse back into the key type.
    UnparsableKey { expected: &'static str },
    /// Integer value or key outside the target type's range; decodes to 0.
    OutOfRange { min: i128, max: i128 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    /// JSON Pointer (RFC 6901) to the offending node; empty for the root.
    pub path: String,
    pub kind: FindingKind,
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = if self.path.is_empty() { "<root>" } else { self.path.as_str() };
        match &self.kind {
            FindingKind::MissingField => write!(f, "{path}: missing field, prior value kept"),
            FindingKind::UnknownKey => write!(f, "{path}: unknown key, ignored"),
            FindingKind::ShadowedKey { field } => {
                write!(f, "{path}: duplicate of field `{field}` in another case, ignored")
            }
            FindingKind::TypeMismatch { expected, found } => {
                write!(f, "{path}: expected {expected}, found {found}")
            }
            FindingKind::UnparsableKey { expected } => {
                write!(f, "{path}: key does not parse as {expected}")
            }
            FindingKind::OutOfRange { min, max } => {
                write!(f, "{path}: integer outside {min}..={max}, decodes to 0")
            }
        }
    }
}

pub fn audit<T: JsonConvert>(node: &Value) -> Vec<Finding> {
    audit_category(&T::category(), node)
}

pub fn audit_category(category: &TypeCategory, node: &Value) -> Vec<Finding> {
    let mut out = Vec::new();
    walk(category, node, "", &mut out);
    out
}

// ------------------------------- Walk ------------------------------------- //

fn walk(category: &TypeCategory, node: &Value, path: &str, out: &mut Vec<Finding>) {
    match category {
        TypeCategory::RawJson => {}
        TypeCategory::Scalar(kind) => check_scalar(*kind, node, path, out),
        TypeCategory::Optional(inner) => {
            if !node.is_null() {
                walk(inner, node, path, out);
            }
        }
        TypeCategory::Sequence(item) => match node {
            Value::Array(items) => {
                for (i, el) in items.iter().enumerate() {
                    walk(item, el, &child(path, &i.to_string()), out);
                }
            }
            other => mismatch("array", other, path, out),
        },
        TypeCategory::Mapping { key, value } => match node {
            Value::Object(object) => {
                for (k, v) in object {
                    let child_path = child(path, k);
                    check_key(*key, k, &child_path, out);
                    walk(value, v, &child_path, out);
                }
            }
            other => mismatch("object", other, path, out),
        },
        TypeCategory::Composite { name, fields } => match node {
            Value::Object(object) => walk_composite(&fields(), object, path, out),
            other => mismatch(*name, other, path, out),
        },
    }
}

fn walk_composite(fields: &[FieldShape], object: &Map<String, Value>, path: &str, out: &mut Vec<Finding>) {
    let folded: Vec<String> = fields.iter().map(|f| fold_name(f.name)).collect();
    let keys: Vec<(String, &String, &Value)> = object.iter().map(|(k, v)| (fold_name(k), k, v)).collect();
    for (field, folded_name) in fields.iter().zip(&folded) {
        let mut matching = keys.iter().filter(|(key_folded, _, _)| key_folded == folded_name);
        match matching.next() {
            Some((_, key, value)) => walk(&field.category, value, &child(path, key), out),
            None => out.push(Finding { path: child(path, field.name), kind: FindingKind::MissingField }),
        }
        for (_, key, _) in matching {
            out.push(Finding {
                path: child(path, key),
                kind: FindingKind::ShadowedKey { field: field.name },
            });
        }
    }
    for (key_folded, key, _) in &keys {
        if !folded.contains(key_folded) {
            out.push(Finding { path: child(path, key), kind: FindingKind::UnknownKey });
        }
    }
}

fn mismatch(expected: &'static str, node: &Value, path: &str, out: &mut Vec<Finding>) {
    out.push(Finding {
        path: path.to_owned(),
        kind: FindingKind::TypeMismatch { expected, found: kind_name(node) },
    });
}

fn out_of_range(min: i128, max: i128, path: &str, out: &mut Vec<Finding>) {
    out.push(Finding { path: path.to_owned(), kind: FindingKind::OutOfRange { min, max } });
}

fn check_scalar(kind: ScalarKind, node: &Value, path: &str, out: &mut Vec<Finding>) {
    match (kind, node) {
        (ScalarKind::Bool, Value::Bool(_))
        | (ScalarKind::Float, Value::Number(_))
        | (ScalarKind::Text, Value::String(_)) => {}
        (ScalarKind::Integer { min, max }, Value::Number(n)) => match integral(n) {
            Some(v) if (min..=max).contains(&v) => {}
            Some(_) => out_of_range(min, max, path, out),
            None => mismatch(kind.json_type(), node, path, out),
        },
        _ => mismatch(kind.json_type(), node, path, out),
    }
}

/// Whole-number value of `n`, whatever its JSON representation. Floats
/// beyond `i128` saturate, which still lands outside every integer range.
fn integral(n: &Number) -> Option<i128> {
    n.as_i64()
        .map(i128::from)
        .or_else(|| n.as_u64().map(i128::from))
        .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i128))
}

fn check_key(kind: ScalarKind, key: &str, path: &str, out: &mut Vec<Finding>) {
    let trimmed = key.trim();
    let unparsable = |out: &mut Vec<Finding>| {
        out.push(Finding {
            path: path.to_owned(),
            kind: FindingKind::UnparsableKey { expected: kind.json_type() },
        })
    };
    match kind {
        ScalarKind::Text | ScalarKind::Bool => {}
        ScalarKind::Float => {
            if trimmed.parse::<f64>().is_err() {
                unparsable(out);
            }
        }
        ScalarKind::Integer { min, max } => match trimmed.parse::<i128>() {
            Ok(v) if (min..=max).contains(&v) => {}
            Ok(_) => out_of_range(min, max, path, out),
            Err(_) => unparsable(out),
        },
    }
}

/// Append one RFC 6901 reference token.
fn child(path: &str, token: &str) -> String {
    format!("{path}/{}", token.replace('~', "~0").replace('/', "~1"))
}

// ------------------------------- Tests ------------------------------------ //

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::samples::{sample_paged_persons, PageInfo, PagedPersons, Person};
    use serde_json::json;

    fn kinds(findings: &[Finding]) -> Vec<(&str, &FindingKind)> {
        findings.iter().map(|f| (f.path.as_str(), &f.kind)).collect()
    }

    #[test]
    fn clean_document_has_no_findings() {
        let node = crate::to_json(&sample_paged_persons());
        assert!(audit::<PagedPersons>(&node).is_empty());
    }

    #[test]
    fn missing_unknown_and_mismatched_fields() {
        let node = json!({"totalNumber": "80", "pageSize": 20, "currentPage": 1.0, "extra": 1});
        let findings = audit::<PageInfo>(&node);
        assert_eq!(kinds(&findings), vec![
            ("/totalNumber", &FindingKind::TypeMismatch { expected: "integer", found: "string" }),
            ("/totalPage", &FindingKind::MissingField),
            ("/extra", &FindingKind::UnknownKey),
        ]);
    }

    #[test]
    fn nested_paths_use_the_keys_as_written() {
        let node = json!({
            "Page": {"totalNumber": 80, "totalPage": 4, "pageSize": 20, "currentPage": 1},
            "persons": [{"name": "A", "age": 18.5, "hobbies": "none"}]
        });
        let findings = audit::<PagedPersons>(&node);
        assert_eq!(kinds(&findings), vec![
            ("/persons/0/age", &FindingKind::TypeMismatch { expected: "integer", found: "number" }),
            ("/persons/0/hobbies", &FindingKind::TypeMismatch { expected: "array", found: "string" }),
        ]);
    }

    #[test]
    fn shadowed_case_variants_are_reported() {
        let node: Value = serde_json::from_str(r#"{"name": "A", "NAME": "B", "age": 1, "hobbies": []}"#).unwrap();
        let findings = audit::<Person>(&node);
        assert_eq!(kinds(&findings), vec![("/NAME", &FindingKind::ShadowedKey { field: "name" })]);
    }

    #[test]
    fn composite_given_a_non_object() {
        let findings = audit::<PagedPersons>(&json!([]));
        assert_eq!(kinds(&findings), vec![
            ("", &FindingKind::TypeMismatch { expected: "PagedPersons", found: "array" }),
        ]);
        assert_eq!(findings[0].to_string(), "<root>: expected PagedPersons, found array");
    }

    #[test]
    fn mapping_keys_and_pointer_escaping() {
        let node = json!({"1": 1.5, "a/b": 2.0, "x~": "three"});
        let findings = audit::<BTreeMap<i32, f64>>(&node);
        assert_eq!(kinds(&findings), vec![
            ("/a~1b", &FindingKind::UnparsableKey { expected: "integer" }),
            ("/x~0", &FindingKind::UnparsableKey { expected: "integer" }),
            ("/x~0", &FindingKind::TypeMismatch { expected: "number", found: "string" }),
        ]);
    }

    #[test]
    fn integers_outside_the_field_type_are_reported() {
        let node = json!({"totalNumber": 5000000000u64, "totalPage": -1, "pageSize": 2147483647, "currentPage": 3e10});
        let findings = audit::<PageInfo>(&node);
        let i32_range = FindingKind::OutOfRange { min: i32::MIN as i128, max: i32::MAX as i128 };
        assert_eq!(kinds(&findings), vec![("/totalNumber", &i32_range), ("/currentPage", &i32_range)]);
        assert_eq!(crate::from_json::<PageInfo>(&node).total_number, 0);
        assert_eq!(findings[0].to_string(), "/totalNumber: integer outside -2147483648..=2147483647, decodes to 0");

        let bytes = audit::<Vec<u8>>(&json!([255, 300, -1, 7.0]));
        assert_eq!(kinds(&bytes), vec![
            ("/1", &FindingKind::OutOfRange { min: 0, max: 255 }),
            ("/2", &FindingKind::OutOfRange { min: 0, max: 255 }),
        ]);
        assert!(audit::<u64>(&json!(u64::MAX)).is_empty());
        assert_eq!(audit::<i64>(&json!(u64::MAX)).len(), 1);
    }

    #[test]
    fn mapping_keys_outside_the_key_type_are_reported() {
        let node = json!({"300": 1.0, "12": 2.0, " 7 ": 3.0, "-1": 4.0});
        let findings = audit::<BTreeMap<u8, f64>>(&node);
        let u8_range = FindingKind::OutOfRange { min: 0, max: 255 };
        assert_eq!(kinds(&findings), vec![("/300", &u8_range), ("/-1", &u8_range)]);
        assert_eq!(crate::from_json::<BTreeMap<u8, f64>>(&json!({"300": 1.0})), BTreeMap::from([(0, 1.0)]));
    }

    #[test]
    fn optional_and_raw_fields_accept_anything_reasonable() {
        assert!(audit::<Option<i32>>(&Value::Null).is_empty());
        assert_eq!(audit::<Option<i32>>(&json!("x")).len(), 1);
        assert!(audit::<Value>(&json!({"whatever": [null]})).is_empty());
    }
}
