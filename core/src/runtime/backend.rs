//! Backend identifiers and name parsing.

use lazy_static::lazy_static;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Identifier of an interchangeable array engine.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum BackendKind {
    /// Sequential engine operating on host memory.
    CpuArray,
    /// Data-parallel engine operating on accelerator memory.
    GpuArray,
    /// Float-oriented engine with selectable device placement.
    Tensor,
}
impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

lazy_static! {
    /// Accepted spellings of each backend, after normalization.
    static ref BACKEND_NAMES: HashMap<&'static str, BackendKind> = {
        let mut names = HashMap::new();
        for &name in &["cpu_array", "cpu", "numpy", "np"] {
            names.insert(name, BackendKind::CpuArray);
        }
        for &name in &["gpu_array", "gpu", "cupy"] {
            names.insert(name, BackendKind::GpuArray);
        }
        for &name in &["tensor", "torch"] {
            names.insert(name, BackendKind::Tensor);
        }
        names
    };
}

impl FromStr for BackendKind {
    type Err = Error;

    /// Parses a backend name. Matching is case-insensitive and treats `-` and
    /// `_` as the same character.
    fn from_str(s: &str) -> Result<Self, Error> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        BACKEND_NAMES
            .get(normalized.as_str())
            .copied()
            .ok_or_else(|| Error::UnknownBackend(s.to_owned()))
    }
}

impl BackendKind {
    /// Every backend, in default probe order.
    pub const ALL: [BackendKind; 3] = [
        BackendKind::CpuArray,
        BackendKind::GpuArray,
        BackendKind::Tensor,
    ];

    /// Returns the canonical name of the backend.
    pub fn name(self) -> &'static str {
        match self {
            BackendKind::CpuArray => "cpu_array",
            BackendKind::GpuArray => "gpu_array",
            BackendKind::Tensor => "tensor",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_backend_name_normalization() {
        assert_eq!(Ok(BackendKind::CpuArray), "CPU-Array".parse());
        assert_eq!(Ok(BackendKind::CpuArray), "numpy".parse());
        assert_eq!(Ok(BackendKind::GpuArray), "gpu_ARRAY".parse());
        assert_eq!(Ok(BackendKind::GpuArray), "CuPy".parse());
        assert_eq!(Ok(BackendKind::Tensor), " torch ".parse());
        for &kind in &BackendKind::ALL {
            assert_eq!(Ok(kind), kind.name().parse());
        }
    }

    #[test]
    fn test_unknown_backend_is_configuration_error() {
        let err = "jax".parse::<BackendKind>().unwrap_err();
        assert_eq!(Error::UnknownBackend("jax".to_owned()), err);
        assert_eq!(ErrorKind::Configuration, err.kind());
        assert!("cpu array".parse::<BackendKind>().is_err());
    }
}
