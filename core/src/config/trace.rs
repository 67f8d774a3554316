use crate::runtime::BackendKind;

/// Ray tracing.
#[derive(Debug, Clone)]
pub struct TraceConfig {
    /// Distance from the camera to the viewport.
    pub focal_length: f64,
    /// Width of the viewport in world units. The height follows the aspect
    /// ratio of the pixel buffer.
    pub viewport_width: f64,
    /// Hit distance that maps to black; nearer hits are brighter.
    pub max_distance: f64,
    /// Backend that holds depth maps.
    pub backend: BackendKind,
}
impl Default for TraceConfig {
    fn default() -> Self {
        Self {
            focal_length: 1.0,
            viewport_width: 2.0,
            max_distance: 10.0,
            backend: BackendKind::CpuArray,
        }
    }
}
