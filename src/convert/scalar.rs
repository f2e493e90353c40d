use ordered_float::OrderedFloat;
use serde_json::Value;

use super::{JsonConvert, ScalarKind, TypeCategory};

// ------------------------------- Coercion --------------------------------- //
//
// One dynamic coercion path shared by every scalar target and by mapping
// keys. Anything that can't be coerced yields `None`; callers fall back to
// the target's default.

pub(crate) fn as_i64(node: &Value) -> Option<i64> {
    match node {
        Value::Number(n) => n.as_i64()
            .or_else(|| n.as_u64().and_then(|u| i64::try_from(u).ok()))
            .or_else(|| n.as_f64().and_then(round_to_i64)),
        Value::Bool(b) => Some(i64::from(*b)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

pub(crate) fn as_u64(node: &Value) -> Option<u64> {
    match node {
        Value::Number(n) => n.as_u64()
            .or_else(|| n.as_i64().and_then(|i| u64::try_from(i).ok()))
            .or_else(|| n.as_f64().and_then(round_to_u64)),
        Value::Bool(b) => Some(u64::from(*b)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

pub(crate) fn as_f64(node: &Value) -> Option<f64> {
    match node {
        Value::Number(n) => n.as_f64(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

pub(crate) fn as_bool(node: &Value) -> Option<bool> {
    match node {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => n.as_f64().map(|f| f != 0.0),
        Value::String(s) => {
            let s = s.trim();
            Some(!(s.is_empty() || s == "0" || s.eq_ignore_ascii_case("false")))
        }
        _ => None,
    }
}

pub(crate) fn as_text(node: &Value) -> Option<String> {
    match node {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn round_to_i64(f: f64) -> Option<i64> {
    let r = f.round();
    (r.is_finite() && r >= i64::MIN as f64 && r < i64::MAX as f64).then_some(r as i64)
}

fn round_to_u64(f: f64) -> Option<u64> {
    let r = f.round();
    (r.is_finite() && r >= 0.0 && r < u64::MAX as f64).then_some(r as u64)
}

/// Name of a node's JSON type, for diagnostics.
pub fn kind_name(node: &Value) -> &'static str {
    match node {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn defaulted<T: Default>(node: &Value, ty: &'static str) -> T {
    tracing::trace!(ty, found = kind_name(node), "scalar coercion failed, using default");
    T::default()
}

// -------------------------------- Map keys -------------------------------- //

/// Scalars usable as mapping keys: projected to text on encode, parsed back
/// through the scalar coercion path on decode.
pub trait MapKey: Sized {
    const KIND: ScalarKind;

    fn to_key(&self) -> String;

    fn from_key(key: &str) -> Self;
}

impl MapKey for String {
    const KIND: ScalarKind = ScalarKind::Text;

    fn to_key(&self) -> String { self.clone() }

    fn from_key(key: &str) -> Self { key.to_owned() }
}

/// Integer kind carrying the inclusive range of `$ty`.
macro_rules! integer_kind {
    ($ty:ty) => {
        ScalarKind::Integer { min: <$ty>::MIN as i128, max: <$ty>::MAX as i128 }
    };
}

macro_rules! impl_map_key {
    (integer => $($ty:ty),+) => {$(
        impl_map_key!(integer_kind!($ty) => $ty);
    )+};
    ($kind:expr => $($ty:ty),+) => {$(
        impl MapKey for $ty {
            const KIND: ScalarKind = $kind;

            fn to_key(&self) -> String {
                as_text(&self.to_json()).unwrap_or_default()
            }

            fn from_key(key: &str) -> Self {
                Self::from_json(&Value::String(key.to_owned()))
            }
        }
    )+};
}

// -------------------------------- Scalars --------------------------------- //

macro_rules! impl_signed {
    ($($ty:ty),+) => {$(
        impl JsonConvert for $ty {
            fn category() -> TypeCategory { TypeCategory::Scalar(integer_kind!($ty)) }

            fn to_json(&self) -> Value { Value::from(*self) }

            fn from_json(node: &Value) -> Self {
                as_i64(node)
                    .and_then(|v| <$ty>::try_from(v).ok())
                    .unwrap_or_else(|| defaulted(node, stringify!($ty)))
            }
        }
    )+};
}

macro_rules! impl_unsigned {
    ($($ty:ty),+) => {$(
        impl JsonConvert for $ty {
            fn category() -> TypeCategory { TypeCategory::Scalar(integer_kind!($ty)) }

            fn to_json(&self) -> Value { Value::from(*self) }

            fn from_json(node: &Value) -> Self {
                as_u64(node)
                    .and_then(|v| <$ty>::try_from(v).ok())
                    .unwrap_or_else(|| defaulted(node, stringify!($ty)))
            }
        }
    )+};
}

impl_signed!(i8, i16, i32, i64, isize);
impl_unsigned!(u8, u16, u32, u64, usize);

/// Non-finite floats have no JSON form and encode as `null`.
impl JsonConvert for f64 {
    fn category() -> TypeCategory { TypeCategory::Scalar(ScalarKind::Float) }

    fn to_json(&self) -> Value { Value::from(*self) }

    fn from_json(node: &Value) -> Self {
        as_f64(node).unwrap_or_else(|| defaulted(node, "f64"))
    }
}

impl JsonConvert for f32 {
    fn category() -> TypeCategory { TypeCategory::Scalar(ScalarKind::Float) }

    fn to_json(&self) -> Value { f64::from(*self).to_json() }

    fn from_json(node: &Value) -> Self {
        as_f64(node).map(|f| f as f32).unwrap_or_else(|| defaulted(node, "f32"))
    }
}

/// `f32`/`f64` are neither `Ord` nor `Hash`; the ordered wrappers let floats
/// key a `BTreeMap` or `HashMap`.
macro_rules! impl_ordered_float {
    ($($ty:ty),+) => {$(
        impl JsonConvert for OrderedFloat<$ty> {
            fn category() -> TypeCategory { <$ty>::category() }

            fn to_json(&self) -> Value { self.0.to_json() }

            fn from_json(node: &Value) -> Self { OrderedFloat(<$ty>::from_json(node)) }
        }
    )+};
}

impl_ordered_float!(f32, f64);

impl JsonConvert for bool {
    fn category() -> TypeCategory { TypeCategory::Scalar(ScalarKind::Bool) }

    fn to_json(&self) -> Value { Value::Bool(*self) }

    fn from_json(node: &Value) -> Self {
        as_bool(node).unwrap_or_else(|| defaulted(node, "bool"))
    }
}

impl JsonConvert for String {
    fn category() -> TypeCategory { TypeCategory::Scalar(ScalarKind::Text) }

    fn to_json(&self) -> Value { Value::String(self.clone()) }

    fn from_json(node: &Value) -> Self {
        as_text(node).unwrap_or_else(|| defaulted(node, "String"))
    }
}

impl_map_key!(integer => i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);
impl_map_key!(ScalarKind::Float => f32, f64, OrderedFloat<f32>, OrderedFloat<f64>);
impl_map_key!(ScalarKind::Bool => bool);

// ------------------------------- Tests ------------------------------------ //
