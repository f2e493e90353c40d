//! Object-level encode/decode for user-defined types.
//!
//! A struct becomes composite by listing its JSON-bearing fields once:
//!
//! ```
//! use json_bind::{impl_composite, Composite};
//!
//! #[derive(Debug, Default, PartialEq)]
//! pub struct PageInfo { pub total_number: i32, pub page_size: i32 }
//!
//! impl_composite!(PageInfo {
//!     "totalNumber" => total_number,
//!     "pageSize" => page_size,
//! });
//!
//! let page = PageInfo { total_number: 80, page_size: 20 };
//! let text = json_bind::text::print(&json_bind::to_json(&page));
//! assert_eq!(text, r#"{"totalNumber":80,"pageSize":20}"#);
//!
//! let mut back = PageInfo::default();
//! back.decode_bytes(br#"{"TOTALNUMBER": 80, "pageSize": 20, "unknown": 1}"#);
//! assert_eq!(back, page);
//! ```
//!
//! The generated `JsonConvert` impl delegates to the registry, so composites
//! nest inside sequences, mappings and other composites with no extra code.
use serde_json::{Map, Value};

use crate::registry::{FieldRegistry, FieldShape};
use crate::text;

pub trait Composite: Default + 'static {
    /// The type's field registry, built on first use.
    fn registry() -> &'static FieldRegistry<Self>;

    fn encode(&self) -> Map<String, Value> {
        Self::registry().encode(self)
    }

    /// Sparse, case-insensitive merge of `node` onto `self`. A non-object
    /// node changes nothing.
    fn decode(&mut self, node: &Value) {
        Self::registry().decode(self, node)
    }

    /// Indented JSON text of [`Composite::encode`], as UTF-8 bytes.
    fn to_raw_json(&self) -> Vec<u8> {
        text::print_pretty(&Value::Object(self.encode())).into_bytes()
    }

    /// Parse `data` and [`Composite::decode`] it. Malformed text parses to
    /// `null`, which leaves `self` unchanged.
    fn decode_bytes(&mut self, data: &[u8]) {
        self.decode(&text::parse_bytes(data))
    }

    fn field_shapes() -> Vec<FieldShape> {
        Self::registry().shapes()
    }
}

/// Decode into a freshly defaulted instance.
pub fn decode_new<T: Composite>(node: &Value) -> T {
    let mut instance = T::default();
    instance.decode(node);
    instance
}

/// Register a struct's JSON fields: `"jsonName" => rust_field, ...`.
///
/// Generates `Composite` (with a lazily built, shared registry) and
/// `JsonConvert`. Names that collide ignoring ASCII case fail to compile;
/// other case collisions panic when the registry is first built.
///
/// A bare type name is also the name used in reports and schemas. Any other
/// concrete type (a path, or a generic instantiated with concrete arguments)
/// takes an explicit name: `impl_composite!(Page<Person> as "PersonPage" { .. })`.
/// Generic parameters are not supported; each instantiation owns its own
/// registry static.
#[macro_export]
macro_rules! impl_composite {
    (@impl $ty:ty, $name:expr, { $($key:literal => $field:ident),+ $(,)? }) => {
        const _: () = ::core::assert!(
            $crate::registry::names_are_distinct(&[$($key),+]),
            "composite field names must be non-empty and distinct ignoring case"
        );

        impl $crate::Composite for $ty {
            fn registry() -> &'static $crate::FieldRegistry<Self> {
                static REGISTRY: $crate::__private::Lazy<$crate::FieldRegistry<$ty>> =
                    $crate::__private::Lazy::new(|| {
                        let builder = $crate::FieldRegistry::<$ty>::builder($name)
                            $(.field($key, |this: &$ty| &this.$field, |this: &mut $ty| &mut this.$field))+;
                        match builder.build() {
                            Ok(registry) => registry,
                            Err(error) => ::core::panic!("{error}"),
                        }
                    });
                &REGISTRY
            }
        }

        impl $crate::JsonConvert for $ty {
            fn category() -> $crate::TypeCategory {
                $crate::TypeCategory::Composite {
                    name: $name,
                    fields: <$ty as $crate::Composite>::field_shapes,
                }
            }

            fn to_json(&self) -> $crate::__private::Value {
                $crate::__private::Value::Object($crate::Composite::encode(self))
            }

            fn from_json(node: &$crate::__private::Value) -> Self {
                $crate::composite::decode_new(node)
            }
        }
    };
    ($ty:ident { $($fields:tt)* }) => {
        $crate::impl_composite!(@impl $ty, ::core::stringify!($ty), { $($fields)* });
    };
    ($ty:ty as $name:literal { $($fields:tt)* }) => {
        $crate::impl_composite!(@impl $ty, $name, { $($fields)* });
    };
}

// ------------------------------- Tests ------------------------------------ //
