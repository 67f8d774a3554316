use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::kernels::Exec;
use super::{ArrayEngine, BackendKind};
use crate::array::{Buffer, Device, NumericArray, Shape};
use crate::error::Result;

/// Sequential engine on host memory.
///
/// This is the only engine with a random number source.
#[derive(Debug)]
pub struct CpuEngine {
    rng: Mutex<StdRng>,
}
impl CpuEngine {
    /// Creates an engine whose random source starts from `seed`.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl ArrayEngine for CpuEngine {
    fn kind(&self) -> BackendKind {
        BackendKind::CpuArray
    }
    fn placement(&self, _active: Device) -> Device {
        Device::Host
    }
    fn exec(&self, _device: Device) -> Exec {
        Exec::Sequential
    }

    fn random_uniform(&self, shape: Shape, device: Device) -> Result<NumericArray> {
        let mut rng = self.rng.lock();
        let values = (0..shape.numel()).map(|_| rng.gen::<f64>()).collect();
        self.from_buffer(shape, Buffer::Float64(values), device)
    }
}
