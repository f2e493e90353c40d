//! Type-driven JSON binding.
//!
//! Declare a type once, get `Value` ⇄ type conversion for free:
//! scalars, sequences, mappings, raw JSON and user composites (registered
//! with [`impl_composite!`]) all go through [`JsonConvert`], recursively.
//!
//! Decoding is best-effort and never fails: wrong shapes decode to defaults,
//! missing fields keep their prior value, unknown keys are ignored. Use
//! [`audit::audit`] when you need to know what a decode would silently do.
pub mod audit;
pub mod composite;
pub mod convert;
pub mod registry;
pub mod samples;
pub mod schema;
pub mod text;

use serde_json::Value;

pub use composite::Composite;
pub use convert::{JsonConvert, MapKey, ScalarKind, TypeCategory};
pub use registry::{FieldDescriptor, FieldRegistry, FieldShape, RegistryError};

#[doc(hidden)]
pub mod __private {
    pub use once_cell::sync::Lazy;
    pub use serde_json::Value;
}

// ------------------------------- Front API -------------------------------- //

pub fn to_json<T: JsonConvert>(value: &T) -> Value { value.to_json() }

pub fn from_json<T: JsonConvert>(node: &Value) -> T { T::from_json(node) }

/// Compact JSON text of `value`, as UTF-8 bytes.
pub fn to_bytes<T: JsonConvert>(value: &T) -> Vec<u8> {
    text::print(&value.to_json()).into_bytes()
}

/// Indented JSON text of `value`, as UTF-8 bytes.
pub fn to_bytes_pretty<T: JsonConvert>(value: &T) -> Vec<u8> {
    text::print_pretty(&value.to_json()).into_bytes()
}

/// Malformed input decodes like `null` (default value).
pub fn from_bytes<T: JsonConvert>(data: &[u8]) -> T {
    T::from_json(&text::parse_bytes(data))
}

pub fn from_str<T: JsonConvert>(src: &str) -> T {
    T::from_json(&text::parse(src))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::samples::{sample_paged_persons, PageInfo, PagedPersons};
    use std::collections::HashMap;

    #[test]
    fn bytes_round_trip() {
        let paged = sample_paged_persons();
        assert_eq!(from_bytes::<PagedPersons>(&to_bytes(&paged)), paged);
        assert_eq!(from_bytes::<PagedPersons>(&to_bytes_pretty(&paged)), paged);
    }

    #[derive(Debug, Default, PartialEq)]
    struct Reading {
        value: f64,
        history: Vec<f64>,
    }

    crate::impl_composite!(Reading {
        "value" => value,
        "history" => history,
    });

    fn spread_of_floats(count: usize) -> Vec<f64> {
        let mut state = 0x2545_F491_4F6C_DD1Du64;
        let mut out = Vec::with_capacity(count);
        while out.len() < count {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            let v = f64::from_bits(state);
            if v.is_finite() {
                out.push(v);
            }
        }
        out
    }

    #[test]
    fn floats_round_trip_through_bytes() {
        let values = spread_of_floats(5_000);
        for v in &values {
            assert_eq!(from_bytes::<f64>(&to_bytes(v)), *v, "{v:e}");
        }
        assert_eq!(from_bytes::<Vec<f64>>(&to_bytes_pretty(&values)), values);

        let reading = Reading { value: -1.603964615428183e143, history: values[..64].to_vec() };
        let mut back = Reading::default();
        back.decode_bytes(&reading.to_raw_json());
        assert_eq!(back, reading);
    }

    #[test]
    fn malformed_text_yields_defaults() {
        assert_eq!(from_str::<PageInfo>("{\"totalNumber\": 80,"), PageInfo::default());
        assert!(from_str::<Vec<i32>>("[1, 2").is_empty());
        assert_eq!(from_bytes::<i32>(b"nope"), 0);
    }

    #[test]
    fn non_composite_values_encode_directly() {
        assert_eq!(to_bytes(&vec![1, 2, 3]), b"[1,2,3]");
        let m: HashMap<String, bool> = [("on".to_string(), true)].into();
        assert_eq!(to_bytes(&m), br#"{"on":true}"#);
        assert_eq!(from_str::<String>("\"hi\""), "hi");
    }
}
