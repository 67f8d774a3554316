//! Backend-polymorphic array operations.
//!
//! An [`ArrayRuntime`] owns one instance of every engine that initialized
//! successfully and routes each operation to the *active* engine. The active
//! engine and device change only through [`ArrayRuntime::select()`],
//! [`ArrayRuntime::set_device()`] or a scoped [`BackendGuard`].
//!
//! The runtime uses interior mutability without locking, so it is neither
//! `Sync` nor meant to be shared between threads; one thread drives the whole
//! simulate/draw loop.

use itertools::Itertools;
use log::{debug, warn};
use std::cell::Cell;

mod backend;
pub mod engine;

pub use backend::BackendKind;
pub use engine::kernels::{CmpOp, LogicOp, Padding};
pub use engine::{ArrayEngine, Engine};

use crate::array::{Buffer, DType, Device, HostArray, NumericArray, Scalar, Shape};
use crate::config::RuntimeConfig;
use crate::error::{Error, Result};

/// Dispatches array operations to the active engine.
#[derive(Debug)]
pub struct ArrayRuntime {
    engines: Vec<Engine>,
    active: Cell<BackendKind>,
    device: Cell<Device>,
    accelerator_count: u32,
}

impl ArrayRuntime {
    /// Initializes every engine that is not disabled and activates the first
    /// one in probe order.
    ///
    /// Returns [`Error::NoEngine`] if no engine in the probe order could be
    /// initialized.
    pub fn new(config: &RuntimeConfig) -> Result<Self> {
        let engines = BackendKind::ALL
            .iter()
            .copied()
            .filter(|&kind| {
                // The GPU engine always places arrays on accelerator 0.
                let unavailable = config.disabled.contains(&kind)
                    || (kind == BackendKind::GpuArray && config.accelerator_count == 0);
                if unavailable {
                    warn!("Array backend '{}' is unavailable", kind);
                }
                !unavailable
            })
            .map(|kind| Engine::init(kind, config))
            .collect_vec();
        let first = config
            .probe_order
            .iter()
            .copied()
            .find(|kind| engines.iter().any(|e| e.kind() == *kind))
            .ok_or(Error::NoEngine)?;
        debug!("Selected array backend '{}' at startup", first);
        Ok(Self {
            engines,
            active: Cell::new(first),
            device: Cell::new(Device::Host),
            accelerator_count: config.accelerator_count,
        })
    }

    /// Returns the active backend.
    pub fn backend(&self) -> BackendKind {
        self.active.get()
    }
    /// Returns the active device.
    pub fn device(&self) -> Device {
        self.device.get()
    }
    /// Returns the backends that initialized successfully.
    pub fn available_backends(&self) -> Vec<BackendKind> {
        self.engines.iter().map(ArrayEngine::kind).collect()
    }

    /// Makes `kind` the active backend and returns the previous one.
    pub fn select(&self, kind: BackendKind) -> Result<BackendKind> {
        self.engine_for(kind)?;
        let previous = self.active.replace(kind);
        if previous != kind {
            debug!("Switched array backend from '{}' to '{}'", previous, kind);
        }
        Ok(previous)
    }
    /// Parses a backend name and makes it the active backend, returning the
    /// previous one.
    pub fn select_backend(&self, name: &str) -> Result<BackendKind> {
        self.select(name.parse()?)
    }
    /// Makes `device` the active device and returns the previous one.
    ///
    /// Only engines with device placement honor the active device.
    pub fn set_device(&self, device: Device) -> Result<Device> {
        self.check_device(device)?;
        let previous = self.device.replace(device);
        if previous != device {
            debug!("Switched active device from '{}' to '{}'", previous, device);
        }
        Ok(previous)
    }

    /// Activates `kind` until the returned guard is dropped.
    pub fn enter(&self, kind: BackendKind) -> Result<BackendGuard<'_>> {
        self.enter_on(kind, self.device())
    }
    /// Activates `kind` and `device` until the returned guard is dropped.
    pub fn enter_on(&self, kind: BackendKind, device: Device) -> Result<BackendGuard<'_>> {
        self.engine_for(kind)?;
        self.check_device(device)?;
        let guard = BackendGuard {
            runtime: self,
            saved_backend: self.backend(),
            saved_device: self.device(),
        };
        self.select(kind)?;
        self.set_device(device)?;
        Ok(guard)
    }
    /// Runs `body` with `kind` active, then restores the previous backend,
    /// whether `body` returns normally, fails or panics.
    pub fn with_backend<T, E: From<Error>>(
        &self,
        kind: BackendKind,
        body: impl FnOnce(&Self) -> std::result::Result<T, E>,
    ) -> std::result::Result<T, E> {
        let _guard = self.enter(kind)?;
        body(self)
    }
    /// Same as [`ArrayRuntime::with_backend()`], but parses the backend name.
    pub fn with_backend_named<T, E: From<Error>>(
        &self,
        name: &str,
        body: impl FnOnce(&Self) -> std::result::Result<T, E>,
    ) -> std::result::Result<T, E> {
        let kind: BackendKind = name.parse()?;
        self.with_backend(kind, body)
    }

    fn engine_for(&self, kind: BackendKind) -> Result<&Engine> {
        self.engines
            .iter()
            .find(|e| e.kind() == kind)
            .ok_or(Error::BackendUnavailable(kind))
    }
    fn engine(&self) -> Result<&Engine> {
        self.engine_for(self.backend())
    }
    fn check_device(&self, device: Device) -> Result<()> {
        match device {
            Device::Accelerator(i) if i >= self.accelerator_count => {
                Err(Error::DeviceUnavailable(device))
            }
            _ => Ok(()),
        }
    }

    // Creation

    /// Creates an array of zeros.
    pub fn zeros(&self, shape: &[usize], dtype: DType) -> Result<NumericArray> {
        self.full(shape, 0, dtype)
    }
    /// Creates an array of ones.
    pub fn ones(&self, shape: &[usize], dtype: DType) -> Result<NumericArray> {
        self.full(shape, 1, dtype)
    }
    /// Creates an array whose contents are unspecified. Callers must not
    /// rely on them.
    pub fn empty(&self, shape: &[usize], dtype: DType) -> Result<NumericArray> {
        self.zeros(shape, dtype)
    }
    /// Creates an array with every element set to `value`.
    pub fn full(
        &self,
        shape: &[usize],
        value: impl Into<Scalar>,
        dtype: DType,
    ) -> Result<NumericArray> {
        let shape = Shape::new(shape)?;
        self.engine()?
            .full(shape, value.into(), dtype, self.device())
    }
    /// Creates a 1D array from a list of values.
    pub fn from_values<T: Into<Scalar> + Copy>(
        &self,
        values: &[T],
        dtype: DType,
    ) -> Result<NumericArray> {
        self.from_shaped(&[values.len()], values, dtype)
    }
    /// Creates an array of the given shape from values in row-major order.
    pub fn from_shaped<T: Into<Scalar> + Copy>(
        &self,
        shape: &[usize],
        values: &[T],
        dtype: DType,
    ) -> Result<NumericArray> {
        let shape = Shape::new(shape)?;
        let values = values.iter().map(|&v| v.into()).collect_vec();
        let data = Buffer::from_scalars(dtype, &values);
        self.engine()?.from_buffer(shape, data, self.device())
    }
    /// Copies a host array into the active engine.
    pub fn from_host(&self, host: &HostArray) -> Result<NumericArray> {
        self.engine()?
            .from_buffer(host.shape().clone(), host.buffer().clone(), self.device())
    }
    /// Creates an array of uniformly random `float64` values in `[0, 1)`.
    ///
    /// Fails with a capability error on engines without a random source.
    pub fn random_uniform(&self, shape: &[usize]) -> Result<NumericArray> {
        let shape = Shape::new(shape)?;
        self.engine()?.random_uniform(shape, self.device())
    }
    /// Overwrites every element of `array` with `value`.
    pub fn fill(&self, array: &mut NumericArray, value: impl Into<Scalar>) -> Result<()> {
        self.engine()?.fill(array, value.into())
    }

    // Elementwise logic

    /// Logical negation.
    pub fn not(&self, a: &NumericArray) -> Result<NumericArray> {
        self.engine()?.logic(LogicOp::Not, a, None)
    }
    /// Logical conjunction of two same-shape arrays.
    pub fn and(&self, a: &NumericArray, b: &NumericArray) -> Result<NumericArray> {
        self.engine()?.logic(LogicOp::And, a, Some(b))
    }
    /// Logical disjunction of two same-shape arrays.
    pub fn or(&self, a: &NumericArray, b: &NumericArray) -> Result<NumericArray> {
        self.engine()?.logic(LogicOp::Or, a, Some(b))
    }
    /// Logical exclusive disjunction of two same-shape arrays.
    pub fn xor(&self, a: &NumericArray, b: &NumericArray) -> Result<NumericArray> {
        self.engine()?.logic(LogicOp::Xor, a, Some(b))
    }
    /// Compares every element of `a` against `rhs`.
    pub fn compare(
        &self,
        a: &NumericArray,
        op: CmpOp,
        rhs: impl Into<Scalar>,
    ) -> Result<NumericArray> {
        self.engine()?.compare(a, op, rhs.into())
    }
    /// Compares two same-shape arrays elementwise.
    pub fn compare_arrays(
        &self,
        a: &NumericArray,
        b: &NumericArray,
        op: CmpOp,
    ) -> Result<NumericArray> {
        self.engine()?.compare_arrays(a, b, op)
    }

    // Convolution and conversion

    /// Convolves a 2D array with a 2D kernel whose side lengths are odd.
    pub fn convolve2d(
        &self,
        input: &NumericArray,
        kernel: &NumericArray,
        padding: Padding,
    ) -> Result<NumericArray> {
        self.engine()?.convolve2d(input, kernel, padding)
    }
    /// Converts every element to `dtype`.
    pub fn cast(&self, a: &NumericArray, dtype: DType) -> Result<NumericArray> {
        self.engine()?.cast(a, dtype)
    }
    /// Moves an array to `device`.
    pub fn to_device(&self, a: &NumericArray, device: Device) -> Result<NumericArray> {
        self.check_device(device)?;
        self.engine()?.to_device(a, device)
    }
    /// Copies an array into host memory, whichever engine owns it.
    pub fn to_host(&self, a: &NumericArray) -> Result<HostArray> {
        self.engine_for(a.backend())?.to_host(a)
    }

    // Queries

    /// Returns the shape of an array.
    pub fn shape(&self, a: &NumericArray) -> Shape {
        a.shape().clone()
    }
    /// Returns the size of an array along one axis.
    pub fn shape_along(&self, a: &NumericArray, axis: usize) -> Result<usize> {
        a.shape().dim(axis)
    }
    /// Returns the dtype of an array.
    pub fn dtype(&self, a: &NumericArray) -> DType {
        a.dtype()
    }
    /// Returns the number of axes of an array.
    pub fn ndim(&self, a: &NumericArray) -> usize {
        a.ndim()
    }
    /// Counts the elements that are not zero or `false`.
    pub fn count_nonzero(&self, a: &NumericArray) -> Result<usize> {
        self.engine()?.count_nonzero(a)
    }
    /// Adds up every element.
    pub fn sum(&self, a: &NumericArray) -> Result<Scalar> {
        self.engine()?.sum(a)
    }
    /// Returns the position of every nonzero element, in row-major order.
    pub fn argwhere(&self, a: &NumericArray) -> Result<Vec<Vec<usize>>> {
        self.engine()?.argwhere(a)
    }
    /// Computes the inner product of two 1D arrays.
    pub fn dot(&self, a: &NumericArray, b: &NumericArray) -> Result<Scalar> {
        self.engine()?.dot(a, b)
    }
}

/// Restores the previously active backend and device when dropped.
///
/// Guards must be dropped in the reverse order they were created, which
/// lexical scoping guarantees.
#[derive(Debug)]
#[must_use = "the previous backend is restored as soon as the guard is dropped"]
pub struct BackendGuard<'a> {
    runtime: &'a ArrayRuntime,
    saved_backend: BackendKind,
    saved_device: Device,
}
impl Drop for BackendGuard<'_> {
    fn drop(&mut self) {
        debug!(
            "Restoring array backend '{}' on '{}'",
            self.saved_backend, self.saved_device,
        );
        self.runtime.active.set(self.saved_backend);
        self.runtime.device.set(self.saved_device);
    }
}
