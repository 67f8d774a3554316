//! Errors returned by the array runtime, the scene model and the renderers.

use thiserror::Error;

use crate::array::{DType, Device, Shape};
use crate::runtime::BackendKind;

/// Result type returned by fallible routines in this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Broad category of an [`Error`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The runtime was asked for a backend or device that does not exist or
    /// could not be initialized.
    Configuration,
    /// An argument had the wrong shape, rank, sign or structure.
    Validation,
    /// The active engine does not implement the requested operation.
    Capability,
    /// An object lacks the capability an operation requires of it.
    Type,
}

/// Error encountered by the array runtime, the scene or a renderer.
#[allow(missing_docs)]
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    // Configuration errors
    #[error("unknown array backend: {0:?}")]
    UnknownBackend(String),
    #[error("array backend '{0}' was not initialized")]
    BackendUnavailable(BackendKind),
    #[error("device '{0}' is not available")]
    DeviceUnavailable(Device),
    #[error("no array backend could be initialized")]
    NoEngine,

    // Validation errors
    #[error("shape mismatch: {0} vs {1}")]
    ShapeMismatch(Shape, Shape),
    #[error("expected a {expected}-dimensional array; got shape {got}")]
    RankMismatch { expected: usize, got: Shape },
    #[error("invalid shape {0:?}; every dimension must be positive")]
    InvalidShape(Vec<usize>),
    #[error("axis {axis} is out of range for shape {shape}")]
    AxisOutOfRange { axis: usize, shape: Shape },
    #[error("got {got} values for shape {shape}")]
    ValueCount { got: usize, shape: Shape },
    #[error("convolution kernel must have odd side lengths; got {0}")]
    EvenKernel(Shape),
    #[error("convolution kernel {kernel} does not fit inside input {input}")]
    KernelTooLarge { kernel: Shape, input: Shape },
    #[error("array belongs to backend '{got}' but the active backend is '{active}'")]
    BackendMismatch { active: BackendKind, got: BackendKind },
    #[error("arrays live on different devices: '{0}' and '{1}'")]
    DeviceMismatch(Device, Device),
    #[error("{name} must be a positive finite number; got {value}")]
    NotPositive { name: &'static str, value: f64 },
    #[error("position must have exactly 3 finite components; got {0:?}")]
    InvalidPosition(Vec<f64>),
    #[error("frame delta must be a non-negative finite number of seconds; got {0}")]
    InvalidDelta(f64),
    #[error("pixel buffer of {width}x{height} is too small to draw a {rows}x{cols} grid")]
    BufferTooSmall {
        width: usize,
        height: usize,
        rows: usize,
        cols: usize,
    },
    #[error("{0}")]
    Immobile(&'static str),
    #[error("scene has no object #{0}")]
    NoSuchObject(usize),

    // Capability errors
    #[error("'{op}' is not implemented for the '{backend}' backend")]
    Unsupported { op: &'static str, backend: BackendKind },
    #[error("dtype {dtype} is not supported by the '{backend}' backend")]
    UnsupportedDType { dtype: DType, backend: BackendKind },

    // Type errors
    #[error("scene object #{index} ({name}) is not {capability}")]
    MissingCapability {
        index: usize,
        name: String,
        capability: &'static str,
    },
}

impl Error {
    /// Returns the category of the error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::UnknownBackend(_)
            | Error::BackendUnavailable(_)
            | Error::DeviceUnavailable(_)
            | Error::NoEngine => ErrorKind::Configuration,

            Error::ShapeMismatch(..)
            | Error::RankMismatch { .. }
            | Error::InvalidShape(_)
            | Error::AxisOutOfRange { .. }
            | Error::ValueCount { .. }
            | Error::EvenKernel(_)
            | Error::KernelTooLarge { .. }
            | Error::BackendMismatch { .. }
            | Error::DeviceMismatch(..)
            | Error::NotPositive { .. }
            | Error::InvalidPosition(_)
            | Error::InvalidDelta(_)
            | Error::BufferTooSmall { .. }
            | Error::Immobile(_)
            | Error::NoSuchObject(_) => ErrorKind::Validation,

            Error::Unsupported { .. } | Error::UnsupportedDType { .. } => ErrorKind::Capability,

            Error::MissingCapability { .. } => ErrorKind::Type,
        }
    }
}

/// Returns an error if `value` is not a positive finite number.
pub(crate) fn check_positive(name: &'static str, value: f64) -> Result<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(Error::NotPositive { name, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_positive() {
        assert_eq!(Ok(2.5), check_positive("radius", 2.5));
        for &value in &[0.0, -1.0, f64::NAN, f64::INFINITY] {
            let err = check_positive("radius", value).unwrap_err();
            assert_eq!(ErrorKind::Validation, err.kind());
        }
        assert_eq!(
            "radius must be a positive finite number; got -1",
            check_positive("radius", -1.0).unwrap_err().to_string(),
        );
    }
}
