use std::{
    fmt::{Display, Formatter},
    num::{ParseFloatError, ParseIntError},
    str::FromStr,
};

use crate::google::protobuf::{
    BoolValue, BytesValue, DoubleValue, FloatValue, Int32Value, Int64Value, StringValue,
    UInt32Value, UInt64Value,
};

impl From<String> for StringValue {
    fn from(value: String) -> Self {
        Self { value }
    }
}

impl From<StringValue> for String {
    fn from(value: StringValue) -> Self {
        value.value
    }
}

impl From<&str> for StringValue {
    fn from(value: &str) -> Self {
        Self {
            value: value.into(),
        }
    }
}

impl From<Vec<u8>> for BytesValue {
    fn from(value: Vec<u8>) -> Self {
        Self { value }
    }
}

impl From<BytesValue> for Vec<u8> {
    fn from(value: BytesValue) -> Self {
        value.value
    }
}

macro_rules! impl_primitive_wrapper {
    ($type:tt, [ $($as:ty),* $(,)? ]) => {
        impl Display for $type {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                Display::fmt(&self.value, f)
            }
        }
        $(
            impl From<$as> for $type {
                fn from(value: $as) -> Self {
                    $type {
                        value: value.into(),
                    }
                }
            }
            impl From<&$as> for $type {
                fn from(value: &$as) -> Self {
                    $type {
                        value: (*value).into(),
                    }
                }
            }
            impl From<$type> for $as {
                fn from(value: $type) -> Self {
                    #![allow(trivial_casts, trivial_numeric_casts)]
                    value.value as $as
                }
            }
        )*
    };
}

impl_primitive_wrapper!(Int32Value, [i8, i16, i32]);
impl_primitive_wrapper!(UInt32Value, [u8, u16, u32]);
impl_primitive_wrapper!(Int64Value, [i8, i16, i32, i64]);
impl_primitive_wrapper!(UInt64Value, [u8, u16, u32, u64]);
impl_primitive_wrapper!(BoolValue, [bool]);
impl_primitive_wrapper!(FloatValue, [f32]);
impl_primitive_wrapper!(DoubleValue, [f32, f64]);

macro_rules! impl_size_wrapper {
    ($type:tt, $as:ty) => {
        impl From<isize> for $type {
            fn from(value: isize) -> Self {
                Self {
                    value: value as $as,
                }
            }
        }

        impl From<&isize> for $type {
            fn from(value: &isize) -> Self {
                Self {
                    value: (*value) as $as,
                }
            }
        }

        impl From<$type> for isize {
            fn from(value: $type) -> Self {
                #![allow(trivial_casts, trivial_numeric_casts)]
                value.value as isize
            }
        }

        impl From<usize> for $type {
            fn from(value: usize) -> Self {
                Self {
                    value: value as $as,
                }
            }
        }

        impl From<&usize> for $type {
            fn from(value: &usize) -> Self {
                Self {
                    value: (*value) as $as,
                }
            }
        }

        impl From<$type> for usize {
            fn from(value: $type) -> Self {
                #![allow(trivial_casts, trivial_numeric_casts)]
                value.value as usize
            }
        }
    };
}

impl_size_wrapper!(Int32Value, i32);
impl_size_wrapper!(UInt32Value, u32);

impl_size_wrapper!(Int64Value, i64);
impl_size_wrapper!(UInt64Value, u64);

macro_rules! impl_int_from_str {
    ($type:tt, $as:ty) => {
        impl FromStr for $type {
            type Err = ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(<$as>::from_str(s)?.into())
            }
        }
    };
}
impl_int_from_str!(Int32Value, i32);
impl_int_from_str!(UInt32Value, u32);
impl_int_from_str!(Int64Value, i64);
impl_int_from_str!(UInt64Value, u64);

macro_rules! impl_float_from_str {
    ($type:tt, $as:ty) => {
        impl FromStr for $type {
            type Err = ParseFloatError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(<$as>::from_str(s)?.into())
            }
        }
    };
}

impl_float_from_str!(FloatValue, f32);
impl_float_from_str!(DoubleValue, f64);
