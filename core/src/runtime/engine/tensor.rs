use log::trace;

use super::kernels::{self, Exec, Padding};
use super::{ArrayEngine, BackendKind};
use crate::array::{DType, Device, NumericArray};
use crate::error::{Error, Result};

/// Float-oriented engine that places arrays on the runtime's active device.
///
/// Kernels run sequentially for host arrays and data-parallel for
/// accelerator arrays. Wide unsigned integers are not supported, and
/// convolution requires a floating-point input.
#[derive(Debug, Default)]
pub struct TensorEngine;

impl ArrayEngine for TensorEngine {
    fn kind(&self) -> BackendKind {
        BackendKind::Tensor
    }
    fn placement(&self, active: Device) -> Device {
        active
    }
    fn exec(&self, device: Device) -> Exec {
        match device {
            Device::Host => Exec::Sequential,
            Device::Accelerator(_) => Exec::Parallel,
        }
    }
    fn check_dtype(&self, dtype: DType) -> Result<()> {
        match dtype {
            DType::UInt16 | DType::UInt32 | DType::UInt64 => Err(Error::UnsupportedDType {
                dtype,
                backend: self.kind(),
            }),
            _ => Ok(()),
        }
    }

    fn convolve2d(
        &self,
        input: &NumericArray,
        kernel: &NumericArray,
        padding: Padding,
    ) -> Result<NumericArray> {
        self.own(input)?;
        self.own(kernel)?;
        if !input.dtype().is_float() {
            return Err(Error::Unsupported {
                op: "convolve2d on integer arrays",
                backend: self.kind(),
            });
        }
        kernels::convolve2d(self.exec(input.device()), input, kernel, padding)
    }
    fn to_device(&self, a: &NumericArray, device: Device) -> Result<NumericArray> {
        self.own(a)?;
        if a.device() != device {
            trace!("Moving {} tensor from {} to {}", a.shape(), a.device(), device);
        }
        Ok(a.placed_on(device))
    }
}
