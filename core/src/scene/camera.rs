use cgmath::{EuclideanSpace, Point3};

use super::{check_position, Drawable, SceneView, Updatable, WorldObject};
use crate::colors;
use crate::error::Result;
use crate::pixels::PixelBuffer;
use crate::runtime::ArrayRuntime;

/// Camera that sees nothing but a single color.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SolidCamera {
    position: Point3<f64>,
    /// Packed RGBA color that fills the whole buffer.
    pub color: u32,
}
impl Default for SolidCamera {
    fn default() -> Self {
        Self {
            position: Point3::origin(),
            color: colors::CAMERA_FILL,
        }
    }
}

impl SolidCamera {
    /// Constructs a camera at `position`.
    pub fn new(position: Point3<f64>) -> Result<Self> {
        Ok(Self {
            position: check_position(position)?,
            ..Self::default()
        })
    }
}

impl Updatable for SolidCamera {}

impl WorldObject for SolidCamera {
    fn name(&self) -> &'static str {
        "camera"
    }
    fn position(&self) -> Point3<f64> {
        self.position
    }
    fn set_position(&mut self, position: Point3<f64>) -> Result<()> {
        self.position = check_position(position)?;
        Ok(())
    }
    fn as_drawable_mut(&mut self) -> Option<&mut dyn Drawable> {
        Some(self)
    }
}

impl Drawable for SolidCamera {
    fn draw(
        &mut self,
        _rt: &ArrayRuntime,
        buffer: &mut PixelBuffer,
        _scene: &SceneView<'_>,
    ) -> Result<()> {
        buffer.fill(self.color);
        Ok(())
    }
}
