//! Naive ray tracer.
//!
//! The tracer sits at the origin and looks down the +Z axis through a
//! viewport centered at `(0, 0, focal_length)`. One ray is cast through the
//! center of each pixel and tested against every intersectable object in the
//! scene. The nearest forward hit determines the brightness of the pixel:
//! close objects are white, objects at `max_distance` or farther are black,
//! and pixels that hit nothing get [`TRACE_BACKGROUND`].

use cgmath::{EuclideanSpace, Point3};
use log::trace;
use rayon::prelude::*;

use crate::array::{DType, NumericArray};
use crate::colors::{gray, TRACE_BACKGROUND};
use crate::config::TraceConfig;
use crate::error::{check_positive, Error, Result};
use crate::pixels::PixelBuffer;
use crate::runtime::{ArrayRuntime, BackendKind};
use crate::scene::{Drawable, Intersectable, Ray, SceneView, Updatable, WorldObject};

/// Depth value for pixels whose ray hits nothing.
pub const NO_HIT: f64 = -1.0;

/// Camera that renders intersectable objects by ray casting.
#[derive(Debug, Clone, PartialEq)]
pub struct RayTracer {
    focal_length: f64,
    viewport_width: f64,
    max_distance: f64,
    backend: BackendKind,
}

impl RayTracer {
    /// Constructs a ray tracer with the default maximum distance and
    /// backend.
    pub fn new(focal_length: f64, viewport_width: f64) -> Result<Self> {
        Self::with_config(&TraceConfig {
            focal_length,
            viewport_width,
            ..TraceConfig::default()
        })
    }
    /// Constructs a ray tracer from a configuration.
    pub fn with_config(config: &TraceConfig) -> Result<Self> {
        Ok(Self {
            focal_length: check_positive("focal length", config.focal_length)?,
            viewport_width: check_positive("viewport width", config.viewport_width)?,
            max_distance: check_positive("max distance", config.max_distance)?,
            backend: config.backend,
        })
    }

    /// Returns the distance from the origin to the viewport.
    pub fn focal_length(&self) -> f64 {
        self.focal_length
    }
    /// Returns the width of the viewport in world units.
    pub fn viewport_width(&self) -> f64 {
        self.viewport_width
    }

    /// Returns the ray through the center of pixel `(row, col)` of a
    /// `width` by `height` image. Increasing rows go down in world space.
    pub fn ray_through(&self, width: usize, height: usize, row: usize, col: usize) -> Ray {
        let pixel_size = self.viewport_width / width as f64;
        let viewport_height = height as f64 * pixel_size;
        let x = -self.viewport_width / 2.0 + (col as f64 + 0.5) * pixel_size;
        let y = -viewport_height / 2.0 + ((height - row) as f64 + 0.5) * pixel_size;
        Ray::new(Point3::origin(), Point3::new(x, y, self.focal_length))
    }

    /// Returns the nearest non-negative hit distance of every pixel as a
    /// `float64` array of shape `[height, width]` on the tracer's backend.
    /// Pixels that hit nothing hold [`NO_HIT`].
    pub fn render_depth(
        &self,
        rt: &ArrayRuntime,
        width: usize,
        height: usize,
        scene: &SceneView<'_>,
    ) -> Result<NumericArray> {
        let depths = self.trace_depths(width, height, &scene.intersectables());
        rt.with_backend(self.backend, |rt| {
            rt.from_shaped(&[height, width], &depths, DType::Float64)
        })
    }

    fn trace_depths(
        &self,
        width: usize,
        height: usize,
        objects: &[&dyn Intersectable],
    ) -> Vec<f64> {
        (0..width * height)
            .into_par_iter()
            .map(|idx| {
                let ray = self.ray_through(width, height, idx / width, idx % width);
                objects
                    .iter()
                    .filter_map(|obj| obj.distance_along(&ray))
                    .filter(|&t| t >= 0.0)
                    .fold(None, |nearest: Option<f64>, t| {
                        Some(nearest.map_or(t, |n| n.min(t)))
                    })
                    .unwrap_or(NO_HIT)
            })
            .collect()
    }

    /// Returns the color of a pixel at depth `distance`.
    pub fn shade(&self, distance: f64) -> u32 {
        if distance < 0.0 {
            return TRACE_BACKGROUND;
        }
        let clamped = (distance / self.max_distance).max(0.0).min(1.0);
        gray(255 - (255.0 * clamped).round() as u8)
    }
}

impl Updatable for RayTracer {}

impl WorldObject for RayTracer {
    fn name(&self) -> &'static str {
        "ray tracer"
    }
    fn position(&self) -> Point3<f64> {
        Point3::origin()
    }
    fn set_position(&mut self, _position: Point3<f64>) -> Result<()> {
        Err(Error::Immobile("the ray tracer is fixed at the origin"))
    }
    fn as_drawable_mut(&mut self) -> Option<&mut dyn Drawable> {
        Some(self)
    }
}

impl Drawable for RayTracer {
    fn draw(
        &mut self,
        rt: &ArrayRuntime,
        buffer: &mut PixelBuffer,
        scene: &SceneView<'_>,
    ) -> Result<()> {
        let (width, height) = buffer.shape();
        let depth = self.render_depth(rt, width, height, scene)?;
        let depth = rt.to_host(&depth)?;
        let depth = depth
            .as_slice::<f64>()
            .ok_or_else(|| Error::Unsupported {
                op: "float64 depth map",
                backend: self.backend,
            })?;

        let tracer = &*self;
        buffer
            .par_rows_mut()
            .zip(depth.par_chunks(width))
            .for_each(|(pixels, depths)| {
                for (px, &d) in pixels.iter_mut().zip(depths) {
                    *px = tracer.shade(d);
                }
            });
        trace!("Traced {}x{} frame", width, height);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colors::pack_rgba;
    use crate::config::RuntimeConfig;
    use crate::error::ErrorKind;
    use crate::scene::{Scene, Sphere};

    fn runtime() -> ArrayRuntime {
        ArrayRuntime::new(&RuntimeConfig::default()).unwrap()
    }

    #[test]
    fn test_tracer_validation() {
        for &(f, w) in &[(0.0, 2.0), (1.0, -2.0), (f64::NAN, 1.0)] {
            assert_eq!(ErrorKind::Validation, RayTracer::new(f, w).unwrap_err().kind());
        }
        let mut tracer = RayTracer::new(1.0, 2.0).unwrap();
        let err = tracer.set_position(Point3::new(1.0, 0.0, 0.0)).unwrap_err();
        assert_eq!(ErrorKind::Validation, err.kind());
        assert_eq!(Point3::origin(), tracer.position());
    }

    #[test]
    fn test_ray_through_pixel_centers() {
        let tracer = RayTracer::new(1.0, 2.0).unwrap();
        // 4x2 image: pixels are 0.5 world units wide.
        let ray = tracer.ray_through(4, 2, 0, 0);
        assert_eq!(Point3::origin(), ray.start);
        assert_eq!(Point3::new(-0.75, 0.75, 1.0), ray.end);
        let ray = tracer.ray_through(4, 2, 1, 3);
        assert_eq!(Point3::new(0.75, 0.25, 1.0), ray.end);
    }

    #[test]
    fn test_shade() {
        let tracer = RayTracer::new(1.0, 2.0).unwrap();
        assert_eq!(TRACE_BACKGROUND, tracer.shade(NO_HIT));
        assert_eq!(pack_rgba(255, 255, 255, 255), tracer.shade(0.0));
        assert_eq!(gray(153), tracer.shade(4.0));
        assert_eq!(gray(0), tracer.shade(25.0));
    }

    #[test]
    fn test_nearest_hit_wins() {
        let rt = runtime();
        let mut scene = Scene::new();
        let far = Sphere::new(Point3::new(0.0, 0.0, 8.0), 1.0).unwrap();
        let near = Sphere::new(Point3::new(0.0, 0.0, 5.0), 1.0).unwrap();
        let behind = Sphere::new(Point3::new(0.0, 0.0, -3.0), 1.0).unwrap();
        scene.add_object(far);
        scene.add_object(near);
        scene.add_object(behind);
        let tracer = RayTracer::new(1.0, 0.01).unwrap();

        // A single narrow pixel looks almost straight down +Z.
        let depth = tracer.render_depth(&rt, 1, 1, &scene.view()).unwrap();
        assert_eq!(BackendKind::CpuArray, depth.backend());
        let depth = rt.to_host(&depth).unwrap();
        let d = depth.as_slice::<f64>().unwrap()[0];
        let expected = near.distance_along(&tracer.ray_through(1, 1, 0, 0)).unwrap();
        assert!((d - expected).abs() < 1e-12);
        assert!(d > 3.9 && d < 4.1);
    }

    #[test]
    fn test_draw_empty_and_filled() {
        let rt = runtime();
        let mut scene = Scene::new();
        let tracer = scene.add_object(RayTracer::new(1.0, 2.0).unwrap());
        let mut buffer = PixelBuffer::new(8, 6, 0);
        scene.draw(tracer, &rt, &mut buffer).unwrap();
        assert!(buffer.as_slice().iter().all(|&px| px == TRACE_BACKGROUND));

        // A huge sphere just in front of the camera covers every pixel.
        scene.add_object(Sphere::new(Point3::new(0.0, 0.0, 20.0), 19.0).unwrap());
        scene.draw(tracer, &rt, &mut buffer).unwrap();
        assert!(buffer.as_slice().iter().all(|&px| px != TRACE_BACKGROUND));
    }

    #[test]
    fn test_depth_on_other_backend() {
        let rt = runtime();
        let mut scene = Scene::new();
        scene.add_object(Sphere::new(Point3::new(0.0, 0.0, 5.0), 1.0).unwrap());
        let config = TraceConfig {
            backend: BackendKind::GpuArray,
            ..TraceConfig::default()
        };
        let tracer = RayTracer::with_config(&config).unwrap();
        let depth = tracer.render_depth(&rt, 5, 3, &scene.view()).unwrap();
        assert_eq!(BackendKind::GpuArray, depth.backend());
        assert_eq!(&[3, 5], depth.shape().dims());
        assert_eq!(BackendKind::CpuArray, rt.backend());
    }
}
