use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

use crate::value::Value;

/// A record whose fields can be read by name.
///
/// Returning `None` means the field does not exist on this record. Sorting treats a missing field
/// like [`Value::Null`], so it never decides an ordering on its own.
///
/// Fields are returned as owned values, so a string field is cloned on every read.
/// `Comparator::compare` reads both sides for each criterion it visits. `Comparator::try_sort`
/// reads every field once per record, so prefer it when keys are expensive to clone.
pub trait Record {
    fn field(&self, name: &str) -> Option<Value>;
}

impl<R: Record + ?Sized> Record for &R {
    #[inline]
    fn field(&self, name: &str) -> Option<Value> {
        (**self).field(name)
    }
}

impl<R: Record + ?Sized> Record for Box<R> {
    #[inline]
    fn field(&self, name: &str) -> Option<Value> {
        (**self).field(name)
    }
}

impl<V, S> Record for HashMap<String, V, S>
where
    V: Clone + Into<Value>,
    S: BuildHasher,
{
    #[inline]
    fn field(&self, name: &str) -> Option<Value> {
        self.get(name).cloned().map(Into::into)
    }
}

impl<V> Record for BTreeMap<String, V>
where
    V: Clone + Into<Value>,
{
    #[inline]
    fn field(&self, name: &str) -> Option<Value> {
        self.get(name).cloned().map(Into::into)
    }
}

impl Record for serde_json::Map<String, serde_json::Value> {
    #[inline]
    fn field(&self, name: &str) -> Option<Value> {
        self.get(name).map(Value::from)
    }
}

impl Record for serde_json::Value {
    /// Only objects have fields.
    #[inline]
    fn field(&self, name: &str) -> Option<Value> {
        self.as_object().and_then(|object| object.field(name))
    }
}

/// Implements [`Record`] for a struct by exposing the listed fields under their own names.
///
/// Every listed field must be `Clone + Into<Value>`.
///
/// ```ignore
/// struct Person {
///     name: String,
///     age: u32,
/// }
///
/// impl_record!(Person { name, age });
/// ```
#[macro_export]
macro_rules! impl_record {
    ($ty:ty { $($field:ident),* $(,)? }) => {
        impl $crate::record::Record for $ty {
            fn field(&self, name: &str) -> ::std::option::Option<$crate::value::Value> {
                match name {
                    $(
                        stringify!($field) => ::std::option::Option::Some(
                            ::std::convert::Into::into(::std::clone::Clone::clone(&self.$field))
                        ),
                    )*
                    _ => ::std::option::Option::None,
                }
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[derive(Debug, Clone)]
    struct Person {
        name: String,
        age: u32,
        nickname: Option<String>,
    }

    impl_record!(Person { name, age, nickname });

    #[test]
    fn test_struct_record() {
        let p = Person {
            name: "Bob".into(),
            age: 23,
            nickname: None,
        };
        assert_eq!(p.field("name"), Some(Value::from("Bob")));
        assert_eq!(p.field("age"), Some(Value::UInt64(23)));
        assert_eq!(p.field("nickname"), Some(Value::Null));
        assert_eq!(p.field("email"), None);
    }

    #[test]
    fn test_map_records() {
        let mut hash = HashMap::new();
        hash.insert("n".to_string(), 3i64);
        assert_eq!(hash.field("n"), Some(Value::Int64(3)));
        assert_eq!(hash.field("m"), None);

        let btree: BTreeMap<String, Value> = [("n".to_string(), Value::from("x"))].into();
        assert_eq!(btree.field("n"), Some(Value::from("x")));

        let json: HashMap<String, serde_json::Value> =
            [("n".to_string(), json!("x")), ("m".to_string(), json!(null))].into();
        assert_eq!(json.field("n"), Some(Value::from("x")));
        assert_eq!(json.field("m"), Some(Value::Null));
    }

    #[test]
    fn test_json_records() {
        let record = json!({ "name": "Alice", "age": 23, "tags": ["a"] });
        assert_eq!(record.field("name"), Some(Value::from("Alice")));
        assert_eq!(record.field("age"), Some(Value::Int64(23)));
        assert_eq!(record.field("tags"), Some(Value::Null));
        assert_eq!(record.field("missing"), None);
        assert_eq!(json!([1, 2]).field("0"), None);
    }
}
