//! Capabilities of scene objects.

use cgmath::{InnerSpace, Point3, Vector3};
use std::any::Any;
use std::fmt;

use super::SceneView;
use crate::error::{Error, Result};
use crate::pixels::PixelBuffer;
use crate::runtime::ArrayRuntime;

/// Conversion to `Any`, for typed lookup of scene objects.
pub trait AsAny {
    /// Returns `self` as `&dyn Any`.
    fn as_any(&self) -> &dyn Any;
    /// Returns `self` as `&mut dyn Any`.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}
impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Object that reacts to the passage of time.
pub trait Updatable {
    /// Advances the object by `delta` seconds. `scene` holds every other
    /// object in the scene; objects before this one have already been
    /// updated this frame.
    fn update(&mut self, _scene: &SceneView<'_>, _delta: f64) -> Result<()> {
        Ok(())
    }
}

/// Entity that can be placed in a [`Scene`](super::Scene).
pub trait WorldObject: AsAny + Updatable + fmt::Debug {
    /// Returns a short human-readable name for the kind of object.
    fn name(&self) -> &'static str;

    /// Returns the position of the object in world space.
    fn position(&self) -> Point3<f64>;
    /// Moves the object.
    fn set_position(&mut self, position: Point3<f64>) -> Result<()>;

    /// Returns the object as an intersectable, if it is one.
    fn as_intersectable(&self) -> Option<&dyn Intersectable> {
        None
    }
    /// Returns the object as a drawable, if it is one.
    fn as_drawable_mut(&mut self) -> Option<&mut dyn Drawable> {
        None
    }
}

/// Object that rays can hit.
pub trait Intersectable: Sync {
    /// Returns the nearest intersection along `ray`, as a multiple of its
    /// direction, or `None` if the line through the ray never meets the
    /// object.
    ///
    /// The result may be negative when the object lies behind the start of
    /// the ray; callers that only want forward hits must discard those.
    fn distance_along(&self, ray: &Ray) -> Option<f64>;
}

/// Object that renders into a pixel buffer.
pub trait Drawable {
    /// Draws into `buffer`. The buffer keeps whatever was drawn into it
    /// previously.
    fn draw(
        &mut self,
        rt: &ArrayRuntime,
        buffer: &mut PixelBuffer,
        scene: &SceneView<'_>,
    ) -> Result<()>;
}

/// Ray from `start` through `end`.
///
/// Points along the ray are parametrized as `start + t * (end - start)`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    /// Origin of the ray.
    pub start: Point3<f64>,
    /// Point reached at `t = 1`.
    pub end: Point3<f64>,
}
impl Ray {
    /// Constructs a ray.
    pub fn new(start: Point3<f64>, end: Point3<f64>) -> Self {
        Self { start, end }
    }
    /// Returns `end - start`.
    pub fn direction(&self) -> Vector3<f64> {
        self.end - self.start
    }
    /// Returns the point at parameter `t`.
    pub fn at(&self, t: f64) -> Point3<f64> {
        self.start + self.direction() * t
    }
    /// Returns the length of the direction vector.
    pub fn length(&self) -> f64 {
        self.direction().magnitude()
    }
}

/// Returns an error unless every component of `position` is finite.
pub fn check_position(position: Point3<f64>) -> Result<Point3<f64>> {
    let coords = [position.x, position.y, position.z];
    if coords.iter().all(|x| x.is_finite()) {
        Ok(position)
    } else {
        Err(Error::InvalidPosition(coords.to_vec()))
    }
}

/// Converts exactly three finite coordinates into a point.
pub fn position_from_slice(coords: &[f64]) -> Result<Point3<f64>> {
    match *coords {
        [x, y, z] => check_position(Point3::new(x, y, z)),
        _ => Err(Error::InvalidPosition(coords.to_vec())),
    }
}
