//! Element types and scalar values.

use half::f16;
use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Mul};
use std::str::FromStr;

use super::Buffer;

/// Element type of a [`NumericArray`](super::NumericArray).
#[allow(missing_docs)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum DType {
    Int8,
    Int16,
    Int32,
    Int64,
    UInt8,
    UInt16,
    UInt32,
    UInt64,
    Float16,
    Float32,
    Float64,
    Bool,
}
impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
impl FromStr for DType {
    type Err = ();

    /// Parses one of the canonical dtype names, such as `int32` or
    /// `float16`. No other spellings are accepted.
    fn from_str(s: &str) -> Result<Self, ()> {
        DType::ALL
            .iter()
            .copied()
            .find(|dtype| dtype.name() == s)
            .ok_or(())
    }
}

impl DType {
    /// Every dtype, in declaration order.
    pub const ALL: [DType; 12] = [
        DType::Int8,
        DType::Int16,
        DType::Int32,
        DType::Int64,
        DType::UInt8,
        DType::UInt16,
        DType::UInt32,
        DType::UInt64,
        DType::Float16,
        DType::Float32,
        DType::Float64,
        DType::Bool,
    ];

    /// Returns the canonical lowercase name of the dtype.
    pub fn name(self) -> &'static str {
        match self {
            DType::Int8 => "int8",
            DType::Int16 => "int16",
            DType::Int32 => "int32",
            DType::Int64 => "int64",
            DType::UInt8 => "uint8",
            DType::UInt16 => "uint16",
            DType::UInt32 => "uint32",
            DType::UInt64 => "uint64",
            DType::Float16 => "float16",
            DType::Float32 => "float32",
            DType::Float64 => "float64",
            DType::Bool => "bool",
        }
    }
    /// Returns whether the dtype is a floating-point type.
    pub fn is_float(self) -> bool {
        matches!(self, DType::Float16 | DType::Float32 | DType::Float64)
    }
    /// Returns whether the dtype is a signed or unsigned integer type.
    pub fn is_integer(self) -> bool {
        !self.is_float() && self != DType::Bool
    }
    /// Returns the size of one element in bytes.
    pub fn size_of(self) -> usize {
        match self {
            DType::Int8 | DType::UInt8 | DType::Bool => 1,
            DType::Int16 | DType::UInt16 | DType::Float16 => 2,
            DType::Int32 | DType::UInt32 | DType::Float32 => 4,
            DType::Int64 | DType::UInt64 | DType::Float64 => 8,
        }
    }
}

/// Single numeric value, independent of any dtype.
///
/// Integers are held as `i128` so that every `i64` and `u64` value survives a
/// round trip.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Scalar {
    /// Boolean value.
    Bool(bool),
    /// Integer value.
    Int(i128),
    /// Floating-point value.
    Float(f64),
}
impl Default for Scalar {
    fn default() -> Self {
        Scalar::Int(0)
    }
}
impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Bool(b) => write!(f, "{}", b),
            Scalar::Int(i) => write!(f, "{}", i),
            Scalar::Float(x) => write!(f, "{}", x),
        }
    }
}

macro_rules! impl_scalar_from {
    ($variant:ident as $inner:ty: $($t:ty),*) => {
        $(
            impl From<$t> for Scalar {
                fn from(x: $t) -> Self {
                    Scalar::$variant(x as $inner)
                }
            }
        )*
    };
}
impl_scalar_from!(Int as i128: i8, i16, i32, i64, u8, u16, u32, u64, usize, isize);
impl_scalar_from!(Float as f64: f32, f64);
impl From<bool> for Scalar {
    fn from(b: bool) -> Self {
        Scalar::Bool(b)
    }
}

impl Scalar {
    /// Returns the value as an `f64`, converting integers and booleans.
    pub fn as_f64(self) -> f64 {
        match self {
            Scalar::Bool(b) => b as u8 as f64,
            Scalar::Int(i) => i as f64,
            Scalar::Float(x) => x,
        }
    }
    /// Returns whether the value is anything other than zero or `false`.
    pub fn is_nonzero(self) -> bool {
        match self {
            Scalar::Bool(b) => b,
            Scalar::Int(i) => i != 0,
            Scalar::Float(x) => x != 0.0,
        }
    }

    fn promote(self) -> Self {
        match self {
            Scalar::Bool(b) => Scalar::Int(b as i128),
            other => other,
        }
    }
}

impl Add for Scalar {
    type Output = Scalar;

    fn add(self, rhs: Scalar) -> Scalar {
        match (self.promote(), rhs.promote()) {
            (Scalar::Int(a), Scalar::Int(b)) => Scalar::Int(a.wrapping_add(b)),
            (a, b) => Scalar::Float(a.as_f64() + b.as_f64()),
        }
    }
}
impl Mul for Scalar {
    type Output = Scalar;

    fn mul(self, rhs: Scalar) -> Scalar {
        match (self.promote(), rhs.promote()) {
            (Scalar::Int(a), Scalar::Int(b)) => Scalar::Int(a.wrapping_mul(b)),
            (a, b) => Scalar::Float(a.as_f64() * b.as_f64()),
        }
    }
}
impl PartialOrd for Scalar {
    fn partial_cmp(&self, other: &Scalar) -> Option<Ordering> {
        match (self.promote(), other.promote()) {
            (Scalar::Int(a), Scalar::Int(b)) => Some(a.cmp(&b)),
            (a, b) => a.as_f64().partial_cmp(&b.as_f64()),
        }
    }
}

/// Rust type that can be stored in a [`Buffer`].
///
/// Conversions from [`Scalar`] follow C casting rules: integers wrap when
/// narrowed, floats truncate toward zero (saturating at the bounds of the
/// target type), and anything nonzero becomes `true`.
pub trait Element: 'static + Copy + Send + Sync + fmt::Debug + PartialEq {
    /// Dtype tag for this element type.
    const DTYPE: DType;

    /// Converts the element into a scalar.
    fn to_scalar(self) -> Scalar;
    /// Converts a scalar into the element type.
    fn from_scalar(s: Scalar) -> Self;
    /// Wraps a vector of elements in a buffer.
    fn wrap(data: Vec<Self>) -> Buffer;
    /// Returns the elements of the buffer, if it holds this element type.
    fn view(buffer: &Buffer) -> Option<&[Self]>;
}

macro_rules! impl_int_element {
    ($($t:ty => $variant:ident),* $(,)?) => {
        $(
            impl Element for $t {
                const DTYPE: DType = DType::$variant;

                fn to_scalar(self) -> Scalar {
                    Scalar::Int(self as i128)
                }
                fn from_scalar(s: Scalar) -> Self {
                    match s {
                        Scalar::Bool(b) => b as $t,
                        Scalar::Int(i) => i as $t,
                        Scalar::Float(x) => x as $t,
                    }
                }
                fn wrap(data: Vec<Self>) -> Buffer {
                    Buffer::$variant(data)
                }
                fn view(buffer: &Buffer) -> Option<&[Self]> {
                    match buffer {
                        Buffer::$variant(data) => Some(data),
                        _ => None,
                    }
                }
            }
        )*
    };
}
impl_int_element!(
    i8 => Int8,
    i16 => Int16,
    i32 => Int32,
    i64 => Int64,
    u8 => UInt8,
    u16 => UInt16,
    u32 => UInt32,
    u64 => UInt64,
);

macro_rules! impl_float_element {
    ($($t:ty => $variant:ident),* $(,)?) => {
        $(
            impl Element for $t {
                const DTYPE: DType = DType::$variant;

                fn to_scalar(self) -> Scalar {
                    Scalar::Float(self as f64)
                }
                fn from_scalar(s: Scalar) -> Self {
                    s.as_f64() as $t
                }
                fn wrap(data: Vec<Self>) -> Buffer {
                    Buffer::$variant(data)
                }
                fn view(buffer: &Buffer) -> Option<&[Self]> {
                    match buffer {
                        Buffer::$variant(data) => Some(data),
                        _ => None,
                    }
                }
            }
        )*
    };
}
impl_float_element!(f32 => Float32, f64 => Float64);

impl Element for f16 {
    const DTYPE: DType = DType::Float16;

    fn to_scalar(self) -> Scalar {
        Scalar::Float(self.to_f64())
    }
    fn from_scalar(s: Scalar) -> Self {
        f16::from_f64(s.as_f64())
    }
    fn wrap(data: Vec<Self>) -> Buffer {
        Buffer::Float16(data)
    }
    fn view(buffer: &Buffer) -> Option<&[Self]> {
        match buffer {
            Buffer::Float16(data) => Some(data),
            _ => None,
        }
    }
}

impl Element for bool {
    const DTYPE: DType = DType::Bool;

    fn to_scalar(self) -> Scalar {
        Scalar::Bool(self)
    }
    fn from_scalar(s: Scalar) -> Self {
        s.is_nonzero()
    }
    fn wrap(data: Vec<Self>) -> Buffer {
        Buffer::Bool(data)
    }
    fn view(buffer: &Buffer) -> Option<&[Self]> {
        match buffer {
            Buffer::Bool(data) => Some(data),
            _ => None,
        }
    }
}
