use cgmath::{EuclideanSpace, InnerSpace, Point3};

use super::{check_position, Intersectable, Ray, Updatable, WorldObject};
use crate::error::{check_positive, Result};

/// Solid sphere.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Sphere {
    position: Point3<f64>,
    radius: f64,
}

impl Sphere {
    /// Constructs a sphere centered at `position`. `radius` must be positive.
    pub fn new(position: Point3<f64>, radius: f64) -> Result<Self> {
        Ok(Self {
            position: check_position(position)?,
            radius: check_positive("radius", radius)?,
        })
    }
    /// Constructs a sphere of radius 1 at the origin.
    pub fn unit() -> Self {
        Self {
            position: Point3::origin(),
            radius: 1.0,
        }
    }

    /// Returns the radius of the sphere.
    pub fn radius(&self) -> f64 {
        self.radius
    }
}

impl Updatable for Sphere {}

impl WorldObject for Sphere {
    fn name(&self) -> &'static str {
        "sphere"
    }
    fn position(&self) -> Point3<f64> {
        self.position
    }
    fn set_position(&mut self, position: Point3<f64>) -> Result<()> {
        self.position = check_position(position)?;
        Ok(())
    }
    fn as_intersectable(&self) -> Option<&dyn Intersectable> {
        Some(self)
    }
}

impl Intersectable for Sphere {
    /// Solves `|start + t * d - center|^2 = radius^2` for `t` and returns the
    /// smaller root. A tangent ray has a single repeated root.
    fn distance_along(&self, ray: &Ray) -> Option<f64> {
        let d = ray.direction();
        let oc = self.position - ray.start;

        let a = d.dot(d);
        if a == 0.0 {
            return None;
        }
        let b = (d * -2.0).dot(oc);
        let c = oc.dot(oc) - self.radius * self.radius;

        let discriminant = b * b - 4.0 * a * c;
        if discriminant < 0.0 {
            return None;
        }
        let sqrt_disc = discriminant.sqrt();
        let t1 = (-b + sqrt_disc) / (2.0 * a);
        let t2 = (-b - sqrt_disc) / (2.0 * a);
        Some(t1.min(t2))
    }
}
