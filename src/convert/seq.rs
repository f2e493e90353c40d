use std::collections::{LinkedList, VecDeque};

use serde_json::Value;

use super::{scalar::kind_name, JsonConvert, TypeCategory};

/// Encode elements in order. Empty input gives `[]`, never `null`.
pub fn seq_to_json<'a, T, I>(items: I) -> Value
where
    T: JsonConvert + 'a,
    I: IntoIterator<Item = &'a T>,
{
    Value::Array(items.into_iter().map(T::to_json).collect())
}

/// Rebuild a sequence from an array node, always starting from empty.
/// A non-array node gives an empty sequence.
pub fn seq_from_json<T, C>(node: &Value) -> C
where
    T: JsonConvert,
    C: FromIterator<T>,
{
    match node {
        Value::Array(items) => items.iter().map(T::from_json).collect(),
        other => {
            tracing::trace!(found = kind_name(other), "expected array, using empty sequence");
            std::iter::empty::<T>().collect()
        }
    }
}

macro_rules! impl_sequence {
    ($($seq:ident),+) => {$(
        impl<T: JsonConvert> JsonConvert for $seq<T> {
            fn category() -> TypeCategory {
                TypeCategory::Sequence(Box::new(T::category()))
            }

            fn to_json(&self) -> Value { seq_to_json(self) }

            fn from_json(node: &Value) -> Self { seq_from_json::<T, _>(node) }
        }
    )+};
}

impl_sequence!(Vec, VecDeque, LinkedList);

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn order_and_length_survive_round_trip() {
        let xs = vec![3, 1, 2, 1];
        let node = xs.to_json();
        assert_eq!(node, json!([3, 1, 2, 1]));
        assert_eq!(Vec::<i32>::from_json(&node), xs);
    }

    #[test]
    fn empty_sequence_is_empty_array() {
        let xs: Vec<String> = Vec::new();
        assert_eq!(xs.to_json(), json!([]));
        assert!(Vec::<String>::from_json(&json!([])).is_empty());
    }

    #[test]
    fn non_array_decodes_to_empty() {
        assert!(Vec::<i32>::from_json(&json!({"0": 1})).is_empty());
        assert!(Vec::<i32>::from_json(&json!("1,2")).is_empty());
        assert!(VecDeque::<i32>::from_json(&Value::Null).is_empty());
    }

    #[test]
    fn nested_sequences_recurse() {
        let grid = vec![vec!["a".to_string()], vec![], vec!["b".into(), "c".into()]];
        let node = grid.to_json();
        assert_eq!(node, json!([["a"], [], ["b", "c"]]));
        assert_eq!(Vec::<Vec<String>>::from_json(&node), grid);
    }

    #[test]
    fn elements_are_coerced_individually() {
        let xs = Vec::<u8>::from_json(&json!([1, "2", null, 3.2, 1000]));
        assert_eq!(xs, vec![1, 2, 0, 3, 0]);
    }

    #[test]
    fn deque_and_list_behave_like_vec() {
        let dq: VecDeque<i64> = VecDeque::from([5, 6]);
        assert_eq!(VecDeque::<i64>::from_json(&dq.to_json()), dq);
        let ll: LinkedList<bool> = [true, false].into_iter().collect();
        assert_eq!(LinkedList::<bool>::from_json(&ll.to_json()), ll);
    }
}
