//! The common interface every array engine implements.

use enum_dispatch::enum_dispatch;

mod cpu;
mod gpu;
pub mod kernels;
mod tensor;

pub use cpu::CpuEngine;
pub use gpu::GpuEngine;
pub use tensor::TensorEngine;

use super::BackendKind;
use crate::array::{Buffer, DType, Device, HostArray, NumericArray, Scalar, Shape};
use crate::config::RuntimeConfig;
use crate::error::{Error, Result};
use kernels::{CmpOp, Exec, LogicOp, Padding};

/// Numeric array engine.
///
/// Every operation rejects arrays owned by a different engine. Default
/// methods delegate to the shared [`kernels`]; engines override them where
/// they support less.
#[enum_dispatch]
pub trait ArrayEngine {
    /// Returns the identifier of the engine.
    fn kind(&self) -> BackendKind;
    /// Returns the device a new array is placed on, given the runtime's
    /// active device.
    fn placement(&self, active: Device) -> Device;
    /// Returns how kernels execute for arrays on `device`.
    fn exec(&self, device: Device) -> Exec;
    /// Returns an error if the engine cannot store elements of `dtype`.
    fn check_dtype(&self, _dtype: DType) -> Result<()> {
        Ok(())
    }

    /// Returns an error unless `array` belongs to this engine.
    fn own(&self, array: &NumericArray) -> Result<()> {
        if array.backend() == self.kind() {
            Ok(())
        } else {
            Err(Error::BackendMismatch {
                active: self.kind(),
                got: array.backend(),
            })
        }
    }

    /// Creates an array from a buffer.
    fn from_buffer(&self, shape: Shape, data: Buffer, device: Device) -> Result<NumericArray> {
        self.check_dtype(data.dtype())?;
        if data.len() != shape.numel() {
            return Err(Error::ValueCount {
                got: data.len(),
                shape,
            });
        }
        Ok(NumericArray::from_parts(
            self.kind(),
            self.placement(device),
            shape,
            data,
        ))
    }
    /// Creates an array with every element set to `value`.
    fn full(&self, shape: Shape, value: Scalar, dtype: DType, device: Device) -> Result<NumericArray> {
        let data = Buffer::filled(dtype, shape.numel(), value);
        self.from_buffer(shape, data, device)
    }
    /// Creates an array of uniformly random floats in `[0, 1)`.
    fn random_uniform(&self, _shape: Shape, _device: Device) -> Result<NumericArray> {
        Err(Error::Unsupported {
            op: "random_uniform",
            backend: self.kind(),
        })
    }
    /// Overwrites every element of `array` with `value`.
    fn fill(&self, array: &mut NumericArray, value: Scalar) -> Result<()> {
        self.own(array)?;
        array.data_mut().fill(value);
        Ok(())
    }

    /// Applies a logical operation elementwise, producing a bool array.
    fn logic(
        &self,
        op: LogicOp,
        a: &NumericArray,
        b: Option<&NumericArray>,
    ) -> Result<NumericArray> {
        self.own(a)?;
        if let Some(b) = b {
            self.own(b)?;
        }
        kernels::logic(self.exec(a.device()), op, a, b)
    }
    /// Compares every element against a scalar, producing a bool array.
    fn compare(&self, a: &NumericArray, op: CmpOp, rhs: Scalar) -> Result<NumericArray> {
        self.own(a)?;
        Ok(kernels::compare(self.exec(a.device()), a, op, rhs))
    }
    /// Compares two arrays elementwise, producing a bool array.
    fn compare_arrays(&self, a: &NumericArray, b: &NumericArray, op: CmpOp) -> Result<NumericArray> {
        self.own(a)?;
        self.own(b)?;
        kernels::compare_arrays(self.exec(a.device()), a, b, op)
    }
    /// Convolves a 2D array with a 2D kernel of odd side lengths.
    fn convolve2d(
        &self,
        input: &NumericArray,
        kernel: &NumericArray,
        padding: Padding,
    ) -> Result<NumericArray> {
        self.own(input)?;
        self.own(kernel)?;
        kernels::convolve2d(self.exec(input.device()), input, kernel, padding)
    }
    /// Converts every element to `dtype`.
    fn cast(&self, a: &NumericArray, dtype: DType) -> Result<NumericArray> {
        self.own(a)?;
        self.check_dtype(dtype)?;
        Ok(kernels::cast(a, dtype))
    }
    /// Moves an array to `device`. Engines without device placement leave
    /// the array where it is.
    fn to_device(&self, a: &NumericArray, _device: Device) -> Result<NumericArray> {
        self.own(a)?;
        Ok(a.clone())
    }
    /// Copies an array into host memory.
    fn to_host(&self, a: &NumericArray) -> Result<HostArray> {
        self.own(a)?;
        Ok(HostArray::from(a.clone()))
    }

    /// Counts the elements that are not zero or `false`.
    fn count_nonzero(&self, a: &NumericArray) -> Result<usize> {
        self.own(a)?;
        Ok(kernels::count_nonzero(a))
    }
    /// Adds up every element.
    fn sum(&self, a: &NumericArray) -> Result<Scalar> {
        self.own(a)?;
        Ok(kernels::sum(a))
    }
    /// Returns the positions of every nonzero element, in row-major order.
    fn argwhere(&self, a: &NumericArray) -> Result<Vec<Vec<usize>>> {
        self.own(a)?;
        Ok(kernels::argwhere(a))
    }
    /// Computes the inner product of two 1D arrays.
    fn dot(&self, a: &NumericArray, b: &NumericArray) -> Result<Scalar> {
        self.own(a)?;
        self.own(b)?;
        kernels::dot(a, b)
    }
}

/// Any array engine.
#[allow(missing_docs)]
#[enum_dispatch(ArrayEngine)]
#[derive(Debug)]
pub enum Engine {
    CpuEngine,
    GpuEngine,
    TensorEngine,
}
impl Engine {
    /// Initializes the engine for `kind`.
    pub fn init(kind: BackendKind, config: &RuntimeConfig) -> Self {
        match kind {
            BackendKind::CpuArray => CpuEngine::new(config.seed).into(),
            BackendKind::GpuArray => GpuEngine::default().into(),
            BackendKind::Tensor => TensorEngine::default().into(),
        }
    }
}
