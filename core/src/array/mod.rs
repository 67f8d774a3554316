//! Shape- and dtype-tagged numeric arrays.
//!
//! A [`NumericArray`] is owned by exactly one engine and lives on one device.
//! Arrays are opaque: the only way to read individual elements is to
//! materialize a [`HostArray`] through
//! [`ArrayRuntime::to_host()`](crate::runtime::ArrayRuntime::to_host).

use itertools::Itertools;
use std::fmt;

mod buffer;
mod dtype;

pub use buffer::Buffer;
pub use dtype::{DType, Element, Scalar};

use crate::error::{Error, Result};
use crate::runtime::BackendKind;

/// Execution target within an engine.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Device {
    /// Host memory.
    Host,
    /// Accelerator with the given index.
    Accelerator(u32),
}
impl Default for Device {
    fn default() -> Self {
        Device::Host
    }
}
impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Device::Host => write!(f, "host"),
            Device::Accelerator(i) => write!(f, "accelerator:{}", i),
        }
    }
}

/// Size of an array along each axis. Every dimension is positive.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Shape(Vec<usize>);
impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.len() == 1 {
            write!(f, "({},)", self.0[0])
        } else {
            write!(f, "({})", self.0.iter().join(", "))
        }
    }
}

impl Shape {
    /// Constructs a shape, rejecting empty shapes and zero-length dimensions.
    pub fn new(dims: impl Into<Vec<usize>>) -> Result<Self> {
        let dims = dims.into();
        if dims.is_empty() || dims.contains(&0) {
            return Err(Error::InvalidShape(dims));
        }
        Ok(Self(dims))
    }

    /// Returns the size along each axis.
    pub fn dims(&self) -> &[usize] {
        &self.0
    }
    /// Returns the number of axes.
    pub fn ndim(&self) -> usize {
        self.0.len()
    }
    /// Returns the size along a single axis.
    pub fn dim(&self, axis: usize) -> Result<usize> {
        self.0.get(axis).copied().ok_or_else(|| Error::AxisOutOfRange {
            axis,
            shape: self.clone(),
        })
    }
    /// Returns the total number of elements.
    pub fn numel(&self) -> usize {
        self.0.iter().product()
    }

    /// Returns the `(rows, cols)` of a 2D shape.
    pub fn as_2d(&self) -> Result<(usize, usize)> {
        match self.0[..] {
            [rows, cols] => Ok((rows, cols)),
            _ => Err(Error::RankMismatch {
                expected: 2,
                got: self.clone(),
            }),
        }
    }

    /// Converts a row-major flat index into a position.
    pub fn unflatten(&self, mut idx: usize) -> Vec<usize> {
        let mut pos = vec![0; self.ndim()];
        for (axis, &len) in self.0.iter().enumerate().rev() {
            pos[axis] = idx % len;
            idx /= len;
        }
        pos
    }
    /// Converts a position into a row-major flat index, or returns `None` if
    /// the position is out of bounds.
    pub fn flatten(&self, pos: &[usize]) -> Option<usize> {
        if pos.len() != self.ndim() {
            return None;
        }
        let mut idx = 0;
        for (&p, &len) in pos.iter().zip(&self.0) {
            if p >= len {
                return None;
            }
            idx = idx * len + p;
        }
        Some(idx)
    }
}

/// Numeric buffer owned by one engine of an
/// [`ArrayRuntime`](crate::runtime::ArrayRuntime).
///
/// The shape is fixed at creation and every element shares one dtype.
#[derive(Debug, Clone, PartialEq)]
pub struct NumericArray {
    backend: BackendKind,
    device: Device,
    shape: Shape,
    data: Buffer,
}

impl NumericArray {
    /// Creates an array from its parts.
    ///
    /// # Panics
    ///
    /// This function panics if the length of `data` does not match `shape`.
    pub(crate) fn from_parts(
        backend: BackendKind,
        device: Device,
        shape: Shape,
        data: Buffer,
    ) -> Self {
        assert_eq!(shape.numel(), data.len(), "Wrong size for NumericArray");
        Self {
            backend,
            device,
            shape,
            data,
        }
    }

    /// Returns the backend that owns the array.
    pub fn backend(&self) -> BackendKind {
        self.backend
    }
    /// Returns the device the array lives on.
    pub fn device(&self) -> Device {
        self.device
    }
    /// Returns the shape of the array.
    pub fn shape(&self) -> &Shape {
        &self.shape
    }
    /// Returns the dtype of the array.
    pub fn dtype(&self) -> DType {
        self.data.dtype()
    }
    /// Returns the number of axes.
    pub fn ndim(&self) -> usize {
        self.shape.ndim()
    }

    pub(crate) fn data(&self) -> &Buffer {
        &self.data
    }
    pub(crate) fn data_mut(&mut self) -> &mut Buffer {
        &mut self.data
    }
    /// Returns a copy of the array tagged with a different device.
    pub(crate) fn placed_on(&self, device: Device) -> Self {
        Self {
            device,
            ..self.clone()
        }
    }
}

/// Host-resident copy of an array with random element access.
#[derive(Debug, Clone, PartialEq)]
pub struct HostArray {
    shape: Shape,
    data: Buffer,
}

impl HostArray {
    /// Creates a host array from scalars, converted to `dtype`.
    pub fn new(shape: Shape, values: &[Scalar], dtype: DType) -> Result<Self> {
        if values.len() != shape.numel() {
            return Err(Error::ValueCount {
                got: values.len(),
                shape,
            });
        }
        let data = Buffer::from_scalars(dtype, values);
        Ok(Self { shape, data })
    }
    /// Creates a host array from typed elements.
    pub fn from_elements<T: Element>(shape: Shape, values: Vec<T>) -> Result<Self> {
        if values.len() != shape.numel() {
            return Err(Error::ValueCount {
                got: values.len(),
                shape,
            });
        }
        let data = T::wrap(values);
        Ok(Self { shape, data })
    }
    /// Creates a 2D host array from equal-length rows.
    pub fn from_rows<T: Element>(rows: &[Vec<T>]) -> Result<Self> {
        let cols = rows.first().map(Vec::len).unwrap_or(0);
        let shape = Shape::new(vec![rows.len(), cols])?;
        if let Some(ragged) = rows.iter().find(|row| row.len() != cols) {
            return Err(Error::ValueCount {
                got: ragged.len(),
                shape: Shape(vec![cols]),
            });
        }
        let values = rows.iter().flatten().copied().collect_vec();
        Self::from_elements(shape, values)
    }

    /// Returns the shape of the array.
    pub fn shape(&self) -> &Shape {
        &self.shape
    }
    /// Returns the dtype of the array.
    pub fn dtype(&self) -> DType {
        self.data.dtype()
    }
    /// Returns the element at `pos`, or `None` if it is out of bounds.
    pub fn get(&self, pos: &[usize]) -> Option<Scalar> {
        self.data.get(self.shape.flatten(pos)?)
    }
    /// Returns the elements in row-major order, if they have type `T`.
    pub fn as_slice<T: Element>(&self) -> Option<&[T]> {
        T::view(&self.data)
    }
    /// Returns every element as a scalar, in row-major order.
    pub fn to_scalars(&self) -> Vec<Scalar> {
        self.data.to_scalars()
    }

    pub(crate) fn buffer(&self) -> &Buffer {
        &self.data
    }
}

impl From<NumericArray> for HostArray {
    fn from(array: NumericArray) -> Self {
        Self {
            shape: array.shape,
            data: array.data,
        }
    }
}
