use crate::runtime::BackendKind;

/// Array engine initialization.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Order in which engines are tried when picking the initial backend.
    pub probe_order: Vec<BackendKind>,
    /// Engines that fail to initialize.
    pub disabled: Vec<BackendKind>,
    /// Number of accelerator devices.
    pub accelerator_count: u32,
    /// Seed for the random source of the CPU engine.
    pub seed: u64,
}
impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            probe_order: BackendKind::ALL.to_vec(),
            disabled: vec![],
            accelerator_count: 1,
            seed: 0x5eed,
        }
    }
}
