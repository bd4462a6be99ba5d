use std::cmp::Ordering;
use std::fmt;

/// A sort key extracted from a record.
///
/// Values only order against values of the same kind, with all numeric variants forming a single
/// kind. Every other pairing is non-comparable, see [`Value::partial_compare`].
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Value {
    #[default]
    Null,
    Boolean(bool),
    Int64(i64),
    UInt64(u64),
    Float64(f64),
    String(String),
}

impl Value {
    /// Compares two values with their native ordering.
    ///
    /// Returns `None` when the values are not comparable: mismatched kinds, `Null` on either side,
    /// or a NaN operand. No coercion happens beyond treating all numbers as one kind. Integers
    /// compare against floats exactly, so the numeric kind stays transitive past 2^53.
    pub fn partial_compare(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::Boolean(l), Value::Boolean(r)) => Some(l.cmp(r)),
            (Value::String(l), Value::String(r)) => Some(l.as_str().cmp(r.as_str())),
            (Value::Float64(l), Value::Float64(r)) => l.partial_cmp(r),
            (Value::Float64(l), r) => Some(compare_integer_float(r.as_integer()?, *l)?.reverse()),
            (l, Value::Float64(r)) => compare_integer_float(l.as_integer()?, *r),
            (l, r) => Some(l.as_integer()?.cmp(&r.as_integer()?)),
        }
    }

    #[inline]
    fn as_integer(&self) -> Option<i128> {
        match self {
            Value::Int64(v) => Some(i128::from(*v)),
            Value::UInt64(v) => Some(i128::from(*v)),
            _ => None,
        }
    }
}

/// 2^64, the first float above every `u64`.
const TWO_POW_64: f64 = 18_446_744_073_709_551_616.0;
/// -2^63, the lowest `i64`.
const NEG_TWO_POW_63: f64 = -9_223_372_036_854_775_808.0;

/// Orders an integer against a float without rounding the integer to `f64`.
fn compare_integer_float(int: i128, float: f64) -> Option<Ordering> {
    if float.is_nan() {
        return None;
    }
    if float >= TWO_POW_64 {
        return Some(Ordering::Less);
    }
    if float < NEG_TWO_POW_63 {
        return Some(Ordering::Greater);
    }
    // In range, so the floor converts to `i128` exactly.
    let floor = float.floor();
    match int.cmp(&(floor as i128)) {
        Ordering::Equal if float > floor => Some(Ordering::Less),
        ordering => Some(ordering),
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Boolean(v) => write!(f, "{v}"),
            Value::Int64(v) => write!(f, "{v}"),
            Value::UInt64(v) => write!(f, "{v}"),
            Value::Float64(v) => write!(f, "{v}"),
            Value::String(v) => write!(f, "{v:?}"),
        }
    }
}

macro_rules! for_each_native_type {
    ($m:ident) => {
        $m!(bool, Boolean);
        $m!(i8, Int64);
        $m!(i16, Int64);
        $m!(i32, Int64);
        $m!(i64, Int64);
        $m!(u8, UInt64);
        $m!(u16, UInt64);
        $m!(u32, UInt64);
        $m!(u64, UInt64);
        $m!(f32, Float64);
        $m!(f64, Float64);
        $m!(String, String);
    };
}

macro_rules! impl_from_native_type {
    ($ty:ty, $variant:ident) => {
        impl From<$ty> for Value {
            #[inline]
            fn from(value: $ty) -> Self {
                Value::$variant(value.into())
            }
        }
    };
}

for_each_native_type!(impl_from_native_type);

impl From<usize> for Value {
    #[inline]
    fn from(value: usize) -> Self {
        Value::UInt64(value as u64)
    }
}

impl From<isize> for Value {
    #[inline]
    fn from(value: isize) -> Self {
        Value::Int64(value as i64)
    }
}

impl From<char> for Value {
    #[inline]
    fn from(value: char) -> Self {
        Value::String(value.to_string())
    }
}

impl From<&str> for Value {
    #[inline]
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<&String> for Value {
    #[inline]
    fn from(value: &String) -> Self {
        Value::String(value.clone())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    #[inline]
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

impl From<&serde_json::Value> for Value {
    #[inline]
    fn from(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::String(v) => Value::String(v.clone()),
            other => from_json_scalar(other),
        }
    }
}

impl From<serde_json::Value> for Value {
    #[inline]
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::String(v) => Value::String(v),
            other => from_json_scalar(&other),
        }
    }
}

/// Arrays and objects have no native ordering and convert to `Null`.
fn from_json_scalar(value: &serde_json::Value) -> Value {
    match value {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(v) => Value::Boolean(*v),
        serde_json::Value::Number(n) => {
            if let Some(v) = n.as_i64() {
                Value::Int64(v)
            } else if let Some(v) = n.as_u64() {
                Value::UInt64(v)
            } else {
                n.as_f64().map_or(Value::Null, Value::Float64)
            }
        }
        serde_json::Value::String(v) => Value::String(v.clone()),
        serde_json::Value::Array(_) | serde_json::Value::Object(_) => Value::Null,
    }
}
