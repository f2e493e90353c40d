use std::collections::{BTreeMap, HashMap};
use std::hash::{BuildHasher, Hash};

use indexmap::IndexMap;
use serde_json::{Map, Value};

use super::{scalar::kind_name, JsonConvert, MapKey, TypeCategory};

/// Encode `(key, value)` pairs into an object, keys projected to text.
/// Key order follows the source map's iteration order.
pub fn map_to_json<'a, K, V, I>(entries: I) -> Value
where
    K: MapKey + 'a,
    V: JsonConvert + 'a,
    I: IntoIterator<Item = (&'a K, &'a V)>,
{
    let mut object = Map::new();
    for (key, value) in entries {
        object.insert(key.to_key(), value.to_json());
    }
    Value::Object(object)
}

/// Rebuild a mapping from an object node, starting from empty. Keys that
/// project to the same `K` collapse, last write wins. A non-object node
/// gives an empty mapping.
pub fn map_from_json<K, V, C>(node: &Value) -> C
where
    K: MapKey,
    V: JsonConvert,
    C: Default + Extend<(K, V)>,
{
    let mut out = C::default();
    match node {
        Value::Object(object) => {
            out.extend(object.iter().map(|(key, value)| (K::from_key(key), V::from_json(value))));
        }
        other => {
            tracing::trace!(found = kind_name(other), "expected object, using empty mapping");
        }
    }
    out
}

fn mapping_category<K: MapKey, V: JsonConvert>() -> TypeCategory {
    TypeCategory::Mapping { key: K::KIND, value: Box::new(V::category()) }
}

impl<K, V, S> JsonConvert for HashMap<K, V, S>
where
    K: MapKey + Eq + Hash,
    V: JsonConvert,
    S: BuildHasher + Default,
{
    fn category() -> TypeCategory { mapping_category::<K, V>() }

    fn to_json(&self) -> Value { map_to_json(self) }

    fn from_json(node: &Value) -> Self { map_from_json::<K, V, _>(node) }
}

impl<K, V> JsonConvert for BTreeMap<K, V>
where
    K: MapKey + Ord,
    V: JsonConvert,
{
    fn category() -> TypeCategory { mapping_category::<K, V>() }

    fn to_json(&self) -> Value { map_to_json(self) }

    fn from_json(node: &Value) -> Self { map_from_json::<K, V, _>(node) }
}

impl<K, V, S> JsonConvert for IndexMap<K, V, S>
where
    K: MapKey + Eq + Hash,
    V: JsonConvert,
    S: BuildHasher + Default,
{
    fn category() -> TypeCategory { mapping_category::<K, V>() }

    fn to_json(&self) -> Value { map_to_json(self) }

    fn from_json(node: &Value) -> Self { map_from_json::<K, V, _>(node) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::ScalarKind;
    use ordered_float::OrderedFloat;
    use serde_json::json;

    #[test]
    fn text_keyed_map_round_trips() {
        let m: BTreeMap<String, i32> = [("b".to_string(), 2), ("a".to_string(), 1)].into();
        let node = m.to_json();
        assert_eq!(node, json!({"a": 1, "b": 2}));
        assert_eq!(BTreeMap::<String, i32>::from_json(&node), m);
    }

    #[test]
    fn integer_keys_project_to_text() {
        let m: HashMap<i32, String> = [(1, "one".to_string()), (-2, "minus two".to_string())].into();
        let node = m.to_json();
        assert_eq!(node["1"], json!("one"));
        assert_eq!(node["-2"], json!("minus two"));
        assert_eq!(HashMap::<i32, String>::from_json(&node), m);
    }

    #[test]
    fn float_keys_via_ordered_float() {
        let m: BTreeMap<OrderedFloat<f64>, bool> = [(OrderedFloat(0.5), true), (OrderedFloat(2.0), false)].into();
        assert_eq!(BTreeMap::<OrderedFloat<f64>, bool>::from_json(&m.to_json()), m);
    }

    #[test]
    fn index_map_keeps_insertion_order() {
        let mut m: IndexMap<String, u8> = IndexMap::new();
        m.insert("zeta".into(), 1);
        m.insert("alpha".into(), 2);
        let text = m.to_json().to_string();
        assert_eq!(text, r#"{"zeta":1,"alpha":2}"#);
        let back = IndexMap::<String, u8>::from_json(&serde_json::from_str::<Value>(&text).unwrap());
        assert_eq!(back.keys().collect::<Vec<_>>(), ["zeta", "alpha"]);
    }

    #[test]
    fn non_object_decodes_to_empty() {
        assert!(BTreeMap::<String, i32>::from_json(&json!([["a", 1]])).is_empty());
        assert!(HashMap::<String, i32>::from_json(&Value::Null).is_empty());
    }

    #[test]
    fn colliding_projected_keys_last_write_wins() {
        // "x" and "y" both fail to parse as integers and collapse onto key 0.
        let m = BTreeMap::<i32, String>::from_json(&json!({"x": "first", "y": "second"}));
        assert_eq!(m.len(), 1);
        assert_eq!(m[&0], "second");
    }

    #[test]
    fn nested_values_recurse() {
        let m: BTreeMap<String, Vec<i32>> = [("evens".to_string(), vec![2, 4]), ("none".to_string(), vec![])].into();
        let node = m.to_json();
        assert_eq!(node, json!({"evens": [2, 4], "none": []}));
        assert_eq!(BTreeMap::<String, Vec<i32>>::from_json(&node), m);
    }

    #[test]
    fn category_records_key_kind() {
        let TypeCategory::Mapping { key, .. } = HashMap::<u32, String>::category() else {
            panic!("expected mapping");
        };
        assert_eq!(key, ScalarKind::Integer { min: 0, max: u32::MAX as i128 });
    }
}
