use std::collections::HashMap;

use super::Block;
use crate::ast::{Key, Value};
use crate::ConfError;

fn mismatch(expected: &str, value: &Value, hint: &str, code: u32) -> ConfError {
    ConfError::Type {
        message: format!("Expected {}, got {} {:?}", expected, value.type_name(), value),
        hint: Some(hint.into()),
        code: Some(code),
    }
}

impl TryFrom<Value> for String {
    type Error = ConfError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Str(s) => Ok(s),
            other => Err(mismatch("string", &other, "Use a quoted string in your config", 410)),
        }
    }
}

impl TryFrom<Value> for bool {
    type Error = ConfError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Bool(b) => Ok(b),
            other => Err(mismatch("boolean", &other, "Use TRUE or FALSE in your config", 411)),
        }
    }
}

impl TryFrom<Value> for f64 {
    type Error = ConfError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Float(f) => Ok(f),
            Value::Int(i) => Ok(i as f64),
            other => Err(mismatch("number", &other, "Use a number value in your config", 412)),
        }
    }
}

impl TryFrom<Value> for f32 {
    type Error = ConfError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        f64::try_from(value).map(|f| f as f32)
    }
}

macro_rules! impl_integer_conversion {
    ($($ty:ty),*) => {
        $(
            impl TryFrom<Value> for $ty {
                type Error = ConfError;

                fn try_from(value: Value) -> Result<Self, Self::Error> {
                    match value {
                        Value::Int(i) => <$ty>::try_from(i).map_err(|_| ConfError::Type {
                            message: format!("Number {} out of range for {}", i, stringify!($ty)),
                            hint: Some(format!(
                                "Use a number between {} and {}",
                                <$ty>::MIN,
                                <$ty>::MAX
                            )),
                            code: Some(414),
                        }),
                        other => Err(mismatch(
                            "integer",
                            &other,
                            "Write whole numbers without a decimal point",
                            413,
                        )),
                    }
                }
            }
        )*
    };
}

impl_integer_conversion!(i64, i32, u8, u16, u32, u64, usize);

impl<T> TryFrom<Value> for Vec<T>
where
    T: TryFrom<Value, Error = ConfError>,
{
    type Error = ConfError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::List(items) | Value::Tuple(items) => {
                items.into_iter().map(T::try_from).collect()
            }
            other => Err(mismatch("list", &other, "Use [a, b, ...] or a, b, ... in your config", 415)),
        }
    }
}

impl<A, B> TryFrom<Value> for (A, B)
where
    A: TryFrom<Value, Error = ConfError>,
    B: TryFrom<Value, Error = ConfError>,
{
    type Error = ConfError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Tuple(items) | Value::List(items) if items.len() == 2 => {
                let mut items = items.into_iter();
                match (items.next(), items.next()) {
                    (Some(a), Some(b)) => Ok((A::try_from(a)?, B::try_from(b)?)),
                    _ => unreachable!("length checked above"),
                }
            }
            other => Err(mismatch("pair", &other, "Use (a, b) format", 416)),
        }
    }
}

/// Dictionaries with string keys and blocks both convert to maps.
impl<T> TryFrom<Value> for HashMap<String, T>
where
    T: TryFrom<Value, Error = ConfError>,
{
    type Error = ConfError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Dict(dict) => dict
                .into_iter()
                .map(|(key, v)| match key {
                    Key::Str(k) => Ok((k, T::try_from(v)?)),
                    other => Err(ConfError::Type {
                        message: format!("Expected string dictionary key, got {}", other),
                        hint: Some("Quote dictionary keys to use them by name".into()),
                        code: Some(417),
                    }),
                })
                .collect(),
            Value::Block(block) => block
                .entries
                .into_iter()
                .map(|(k, v)| Ok((k, T::try_from(v)?)))
                .collect(),
            other => Err(mismatch("dictionary", &other, "Use {\"key\": value} or a block", 417)),
        }
    }
}

impl TryFrom<Value> for Block {
    type Error = ConfError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Block(block) => Ok(block),
            other => Err(mismatch("block", &other, "Use name { ... } in your config", 418)),
        }
    }
}
