use super::kernels::Exec;
use super::{ArrayEngine, BackendKind};
use crate::array::Device;

/// Data-parallel engine whose arrays always live on accelerator 0.
///
/// Kernels run on the rayon thread pool and return once every element is
/// written, so callers never observe queued work.
#[derive(Debug, Default)]
pub struct GpuEngine;

impl ArrayEngine for GpuEngine {
    fn kind(&self) -> BackendKind {
        BackendKind::GpuArray
    }
    fn placement(&self, _active: Device) -> Device {
        Device::Accelerator(0)
    }
    fn exec(&self, _device: Device) -> Exec {
        Exec::Parallel
    }
}
