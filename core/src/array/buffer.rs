//! Typed flat storage behind every array.

use half::f16;

use super::{DType, Element, Scalar};

/// Flat, typed element storage.
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq)]
pub enum Buffer {
    Int8(Vec<i8>),
    Int16(Vec<i16>),
    Int32(Vec<i32>),
    Int64(Vec<i64>),
    UInt8(Vec<u8>),
    UInt16(Vec<u16>),
    UInt32(Vec<u32>),
    UInt64(Vec<u64>),
    Float16(Vec<f16>),
    Float32(Vec<f32>),
    Float64(Vec<f64>),
    Bool(Vec<bool>),
}

/// Runs `$body` with `$data` bound to the typed vector inside a buffer.
macro_rules! match_buffer {
    ($buffer:expr, $data:ident => $body:expr) => {
        match $buffer {
            Buffer::Int8($data) => $body,
            Buffer::Int16($data) => $body,
            Buffer::Int32($data) => $body,
            Buffer::Int64($data) => $body,
            Buffer::UInt8($data) => $body,
            Buffer::UInt16($data) => $body,
            Buffer::UInt32($data) => $body,
            Buffer::UInt64($data) => $body,
            Buffer::Float16($data) => $body,
            Buffer::Float32($data) => $body,
            Buffer::Float64($data) => $body,
            Buffer::Bool($data) => $body,
        }
    };
}

/// Runs `$body` with the type alias `$t` bound to the Rust type of a dtype.
macro_rules! match_dtype {
    ($dtype:expr, $t:ident => $body:expr) => {
        match $dtype {
            DType::Int8 => {
                type $t = i8;
                $body
            }
            DType::Int16 => {
                type $t = i16;
                $body
            }
            DType::Int32 => {
                type $t = i32;
                $body
            }
            DType::Int64 => {
                type $t = i64;
                $body
            }
            DType::UInt8 => {
                type $t = u8;
                $body
            }
            DType::UInt16 => {
                type $t = u16;
                $body
            }
            DType::UInt32 => {
                type $t = u32;
                $body
            }
            DType::UInt64 => {
                type $t = u64;
                $body
            }
            DType::Float16 => {
                type $t = f16;
                $body
            }
            DType::Float32 => {
                type $t = f32;
                $body
            }
            DType::Float64 => {
                type $t = f64;
                $body
            }
            DType::Bool => {
                type $t = bool;
                $body
            }
        }
    };
}

impl Buffer {
    /// Creates a buffer of `len` copies of `value`, converted to `dtype`.
    pub fn filled(dtype: DType, len: usize, value: Scalar) -> Self {
        match_dtype!(dtype, T => T::wrap(vec![T::from_scalar(value); len]))
    }
    /// Creates a buffer by converting each scalar to `dtype`.
    pub fn from_scalars(dtype: DType, values: &[Scalar]) -> Self {
        match_dtype!(dtype, T => T::wrap(values.iter().map(|&s| T::from_scalar(s)).collect()))
    }
    /// Creates a boolean buffer.
    pub fn from_bools(values: Vec<bool>) -> Self {
        Buffer::Bool(values)
    }

    /// Returns the dtype of the elements.
    pub fn dtype(&self) -> DType {
        match self {
            Buffer::Int8(_) => DType::Int8,
            Buffer::Int16(_) => DType::Int16,
            Buffer::Int32(_) => DType::Int32,
            Buffer::Int64(_) => DType::Int64,
            Buffer::UInt8(_) => DType::UInt8,
            Buffer::UInt16(_) => DType::UInt16,
            Buffer::UInt32(_) => DType::UInt32,
            Buffer::UInt64(_) => DType::UInt64,
            Buffer::Float16(_) => DType::Float16,
            Buffer::Float32(_) => DType::Float32,
            Buffer::Float64(_) => DType::Float64,
            Buffer::Bool(_) => DType::Bool,
        }
    }
    /// Returns the number of elements.
    pub fn len(&self) -> usize {
        match_buffer!(self, data => data.len())
    }
    /// Returns whether the buffer holds no elements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the element at `idx` as a scalar.
    pub fn get(&self, idx: usize) -> Option<Scalar> {
        match_buffer!(self, data => data.get(idx).map(|x| x.to_scalar()))
    }
    /// Returns every element as a scalar.
    pub fn to_scalars(&self) -> Vec<Scalar> {
        match_buffer!(self, data => data.iter().map(|x| x.to_scalar()).collect())
    }
    /// Converts every element to `dtype`.
    pub fn cast(&self, dtype: DType) -> Self {
        if self.dtype() == dtype {
            return self.clone();
        }
        Self::from_scalars(dtype, &self.to_scalars())
    }
    /// Overwrites every element with `value`.
    pub fn fill(&mut self, value: Scalar) {
        match_buffer!(self, data => {
            let x = Element::from_scalar(value);
            data.iter_mut().for_each(|elem| *elem = x);
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_cast_preserves_length_and_wraps() {
        let b = Buffer::from_scalars(DType::Int32, &[Scalar::Int(300), Scalar::Int(-1)]);
        assert_eq!(DType::Int32, b.dtype());
        let c = b.cast(DType::UInt8);
        assert_eq!(Buffer::UInt8(vec![44, 255]), c);
        assert_eq!(Buffer::Bool(vec![true, true]), b.cast(DType::Bool));
    }

    #[test]
    fn test_buffer_fill() {
        let mut b = Buffer::filled(DType::Float32, 4, Scalar::Int(2));
        assert_eq!(Buffer::Float32(vec![2.0; 4]), b);
        b.fill(Scalar::Float(0.5));
        assert_eq!(Some(Scalar::Float(0.5)), b.get(3));
        assert_eq!(None, b.get(4));
    }
}
