// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Call argument [`Value`]s and declared [`ParamType`]s of step handlers.

use derive_more::Display;

use crate::DataTable;

/// Argument passed to a step handler.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Value {
    /// Positional argument parsed as a base-10 integer.
    Int(i64),

    /// Positional argument that isn't an integer, kept verbatim.
    Str(String),

    /// [`DataTable`] attached to the step.
    Table(DataTable),
}

impl Value {
    /// Coerces a raw positional argument: an integer if `raw` parses as a
    /// base-10 [`i64`], the unmodified string otherwise.
    #[must_use]
    pub fn coerce(raw: &str) -> Self {
        raw.parse().map_or_else(|_| Self::Str(raw.to_owned()), Self::Int)
    }

    /// Human-readable name of this [`Value`]'s variant.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Int(_) => "integer",
            Self::Str(_) => "string",
            Self::Table(_) => "table",
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Str(v.to_owned())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Str(v)
    }
}

impl From<DataTable> for Value {
    fn from(v: DataTable) -> Self {
        Self::Table(v)
    }
}

/// Declared type of a step handler parameter.
#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
pub enum ParamType {
    /// Accepts [`Value::Int`] only.
    #[display(fmt = "integer")]
    Int,

    /// Accepts [`Value::Str`] only.
    #[display(fmt = "string")]
    Str,

    /// Accepts [`Value::Table`] only. May only be the last parameter.
    #[display(fmt = "table")]
    Table,

    /// Accepts any [`Value`].
    #[display(fmt = "any")]
    Any,
}

impl ParamType {
    /// Checks whether a parameter of this type accepts the given [`Value`].
    #[must_use]
    pub const fn accepts(self, value: &Value) -> bool {
        matches!(
            (self, value),
            (Self::Any, _)
                | (Self::Int, Value::Int(_))
                | (Self::Str, Value::Str(_))
                | (Self::Table, Value::Table(_)),
        )
    }

    /// Checks whether a parameter of this type accepts a [`DataTable`].
    #[must_use]
    pub const fn accepts_table(self) -> bool {
        matches!(self, Self::Table | Self::Any)
    }
}

/// Conversion of a [`Value`] into a typed handler parameter.
pub trait FromValue: Sized {
    /// [`ParamType`] declared for this parameter at registration.
    const PARAM: ParamType;

    /// Converts the given [`Value`], if it fits.
    fn from_value(value: Value) -> Option<Self>;
}

impl FromValue for Value {
    const PARAM: ParamType = ParamType::Any;

    fn from_value(value: Value) -> Option<Self> {
        Some(value)
    }
}

impl FromValue for String {
    const PARAM: ParamType = ParamType::Str;

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Str(s) => Some(s),
            Value::Int(_) | Value::Table(_) => None,
        }
    }
}

impl FromValue for DataTable {
    const PARAM: ParamType = ParamType::Table;

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Table(t) => Some(t),
            Value::Int(_) | Value::Str(_) => None,
        }
    }
}

macro_rules! impl_from_value_for_int {
    ($($ty:ty),*) => {$(
        impl FromValue for $ty {
            const PARAM: ParamType = ParamType::Int;

            fn from_value(value: Value) -> Option<Self> {
                match value {
                    Value::Int(i) => i.try_into().ok(),
                    Value::Str(_) | Value::Table(_) => None,
                }
            }
        }
    )*};
}

impl_from_value_for_int!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coerces_integers_only() {
        assert_eq!(Value::coerce("42"), Value::Int(42));
        assert_eq!(Value::coerce("-7"), Value::Int(-7));
        assert_eq!(Value::coerce("+3"), Value::Int(3));
        assert_eq!(Value::coerce("4.2"), Value::from("4.2"));
        assert_eq!(Value::coerce("true"), Value::from("true"));
        assert_eq!(Value::coerce(" 1"), Value::from(" 1"));
        assert_eq!(Value::coerce(""), Value::from(""));
    }

    #[test]
    fn out_of_range_integers_stay_strings() {
        assert_eq!(
            Value::coerce("99999999999999999999"),
            Value::from("99999999999999999999"),
        );
    }

    #[test]
    fn param_type_compatibility() {
        let int = Value::Int(1);
        let text = Value::from("a");
        let table = Value::Table(DataTable::default());

        assert!(ParamType::Int.accepts(&int));
        assert!(!ParamType::Int.accepts(&text));
        assert!(ParamType::Str.accepts(&text));
        assert!(!ParamType::Str.accepts(&int));
        assert!(ParamType::Table.accepts(&table));
        assert!(!ParamType::Table.accepts(&int));
        assert!([int, text, table].iter().all(|v| ParamType::Any.accepts(v)));

        assert!(ParamType::Table.accepts_table());
        assert!(ParamType::Any.accepts_table());
        assert!(!ParamType::Str.accepts_table());
    }

    #[test]
    fn narrows_integers() {
        assert_eq!(u8::from_value(Value::Int(200)), Some(200));
        assert_eq!(u8::from_value(Value::Int(300)), None);
        assert_eq!(u32::from_value(Value::Int(-1)), None);
        assert_eq!(i64::from_value(Value::from("1")), None);
    }
}
