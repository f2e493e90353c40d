//! Per-type field registry.
//!
//! A composite type declares its fields once; the registry keeps, per field,
//! the JSON name and a pair of accessors that already know how to convert
//! the field's declared type. Built once, never mutated, shared by every
//! instance (and every thread).
use serde_json::{Map, Value};

use crate::convert::{JsonConvert, TypeCategory};

// ------------------------------- Errors ----------------------------------- //

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("`{type_name}`: field `{second}` collides with `{first}` (field names are matched case-insensitively)")]
    DuplicateField {
        type_name: &'static str,
        first: &'static str,
        second: &'static str,
    },
    #[error("`{type_name}`: field names must not be empty")]
    EmptyName { type_name: &'static str },
}

// ------------------------------ Descriptors ------------------------------- //

type ReadFn<T> = Box<dyn Fn(&T) -> Value + Send + Sync>;
type WriteFn<T> = Box<dyn Fn(&mut T, &Value) + Send + Sync>;

pub struct FieldDescriptor<T> {
    name: &'static str,
    folded: String,
    category: TypeCategory,
    read: ReadFn<T>,
    write: WriteFn<T>,
}

impl<T> FieldDescriptor<T> {
    pub fn name(&self) -> &'static str { self.name }

    pub fn category(&self) -> &TypeCategory { &self.category }

    /// Case-insensitive name match.
    pub fn matches(&self, key: &str) -> bool {
        folded_chars(key).eq(self.folded.chars())
    }

    /// Current value of the field, converted.
    pub fn get(&self, instance: &T) -> Value { (self.read)(instance) }

    /// Decode `node` into the field's type and store it.
    pub fn set(&self, instance: &mut T, node: &Value) { (self.write)(instance, node) }
}

impl<T> std::fmt::Debug for FieldDescriptor<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("name", &self.name)
            .field("category", &self.category)
            .finish_non_exhaustive()
    }
}

/// Name + category of one field, detached from the owning type.
#[derive(Debug, Clone)]
pub struct FieldShape {
    pub name: &'static str,
    pub category: TypeCategory,
}

// ------------------------------- Registry --------------------------------- //

#[derive(Debug)]
pub struct FieldRegistry<T> {
    type_name: &'static str,
    fields: Vec<FieldDescriptor<T>>,
}

impl<T: 'static> FieldRegistry<T> {
    pub fn builder(type_name: &'static str) -> RegistryBuilder<T> {
        RegistryBuilder { type_name, fields: Vec::new() }
    }

    pub fn type_name(&self) -> &'static str { self.type_name }

    pub fn fields(&self) -> &[FieldDescriptor<T>] { &self.fields }

    pub fn shapes(&self) -> Vec<FieldShape> {
        self.fields.iter()
            .map(|f| FieldShape { name: f.name, category: f.category.clone() })
            .collect()
    }

    /// One key per registered field, in declaration order, defaults included.
    pub fn encode(&self, instance: &T) -> Map<String, Value> {
        let mut object = Map::with_capacity(self.fields.len());
        for field in &self.fields {
            object.insert(field.name.to_owned(), field.get(instance));
        }
        object
    }

    /// Sparse merge of `node` onto `instance`.
    ///
    /// - non-object node: `instance` is left untouched
    /// - per field, the first key matching case-insensitively wins
    /// - fields without a matching key keep their value
    /// - keys matching no field are ignored
    pub fn decode(&self, instance: &mut T, node: &Value) {
        let Value::Object(object) = node else {
            tracing::trace!(
                type_name = self.type_name,
                found = crate::convert::scalar::kind_name(node),
                "expected object, leaving instance unchanged"
            );
            return;
        };
        let keys: Vec<(String, &Value)> = object.iter().map(|(key, value)| (fold_name(key), value)).collect();
        for field in &self.fields {
            match keys.iter().find(|(folded, _)| *folded == field.folded) {
                Some((_, value)) => field.set(instance, value),
                None => tracing::trace!(type_name = self.type_name, field = field.name, "field absent, keeping prior value"),
            }
        }
    }
}

// ------------------------------- Builder ---------------------------------- //

pub struct RegistryBuilder<T> {
    type_name: &'static str,
    fields: Vec<FieldDescriptor<T>>,
}

impl<T: 'static> RegistryBuilder<T> {
    /// Register a field by JSON name and a pair of plain accessors; the
    /// converter is resolved from the field's type.
    pub fn field<F: JsonConvert + 'static>(
        mut self,
        name: &'static str,
        get: fn(&T) -> &F,
        get_mut: fn(&mut T) -> &mut F,
    ) -> Self {
        self.fields.push(FieldDescriptor {
            name,
            folded: fold_name(name),
            category: F::category(),
            read: Box::new(move |instance: &T| get(instance).to_json()),
            write: Box::new(move |instance: &mut T, node: &Value| *get_mut(instance) = F::from_json(node)),
        });
        self
    }

    pub fn build(self) -> Result<FieldRegistry<T>, RegistryError> {
        let type_name = self.type_name;
        for (i, field) in self.fields.iter().enumerate() {
            if field.name.is_empty() {
                return Err(RegistryError::EmptyName { type_name });
            }
            if let Some(first) = self.fields[..i].iter().find(|prev| prev.folded == field.folded) {
                return Err(RegistryError::DuplicateField { type_name, first: first.name, second: field.name });
            }
        }
        Ok(FieldRegistry { type_name, fields: self.fields })
    }
}

// ------------------------------- Utilities -------------------------------- //

pub fn fold_name(name: &str) -> String { folded_chars(name).collect() }

fn folded_chars(name: &str) -> impl Iterator<Item = char> + '_ {
    name.chars().flat_map(char::to_lowercase)
}

/// Compile-time check used by `impl_composite!`: no two names are equal
/// ignoring ASCII case, and none is empty. Full Unicode folding is checked
/// again by [`RegistryBuilder::build`].
pub const fn names_are_distinct(names: &[&str]) -> bool {
    let mut i = 0;
    while i < names.len() {
        if names[i].is_empty() {
            return false;
        }
        let mut j = i + 1;
        while j < names.len() {
            if ascii_fold_eq(names[i].as_bytes(), names[j].as_bytes()) {
                return false;
            }
            j += 1;
        }
        i += 1;
    }
    true
}

const fn ascii_fold_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut i = 0;
    while i < a.len() {
        if a[i].to_ascii_lowercase() != b[i].to_ascii_lowercase() {
            return false;
        }
        i += 1;
    }
    true
}

// ------------------------------- Tests ------------------------------------ //
