//! Scene model: an ordered collection of world objects and a clock.
//!
//! Objects are addressed through the capabilities they implement
//! ([`Updatable`], [`Intersectable`], [`Drawable`]) rather than through their
//! concrete types. While one object is being updated or drawn, it sees every
//! other object through a read-only [`SceneView`].

use log::trace;

mod camera;
mod object;
mod sphere;

pub use camera::SolidCamera;
pub use object::*;
pub use sphere::Sphere;

use crate::error::{Error, Result};
use crate::pixels::PixelBuffer;
use crate::runtime::ArrayRuntime;

/// Handle to an object in a [`Scene`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(usize);
impl ObjectId {
    /// Returns the insertion index of the object.
    pub fn index(self) -> usize {
        self.0
    }
}

/// Ordered, append-only collection of world objects.
#[derive(Debug, Default)]
pub struct Scene {
    objects: Vec<Box<dyn WorldObject>>,
    time: f64,
}

impl Scene {
    /// Constructs an empty scene at time zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an object and returns its handle.
    pub fn add_object(&mut self, object: impl WorldObject + 'static) -> ObjectId {
        self.add_boxed(Box::new(object))
    }
    /// Appends a boxed object and returns its handle.
    pub fn add_boxed(&mut self, object: Box<dyn WorldObject>) -> ObjectId {
        self.objects.push(object);
        ObjectId(self.objects.len() - 1)
    }
    /// Appends objects in order and returns their handles.
    pub fn add_objects(
        &mut self,
        objects: impl IntoIterator<Item = Box<dyn WorldObject>>,
    ) -> Vec<ObjectId> {
        objects.into_iter().map(|o| self.add_boxed(o)).collect()
    }

    /// Returns the sum of every delta ever passed to [`Scene::update()`].
    pub fn time(&self) -> f64 {
        self.time
    }
    /// Returns the number of objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }
    /// Returns whether the scene has no objects.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
    /// Returns every object in insertion order.
    pub fn objects(&self) -> impl Iterator<Item = &dyn WorldObject> {
        self.objects.iter().map(|o| &**o)
    }
    /// Returns a view of every object in the scene.
    pub fn view(&self) -> SceneView<'_> {
        SceneView {
            time: self.time,
            before: &self.objects,
            after: &[],
        }
    }

    /// Returns the object with the given handle, if it has type `T`.
    pub fn get<T: WorldObject + 'static>(&self, id: ObjectId) -> Option<&T> {
        (**self.objects.get(id.0)?).as_any().downcast_ref()
    }
    /// Returns the object with the given handle mutably, if it has type `T`.
    pub fn get_mut<T: WorldObject + 'static>(&mut self, id: ObjectId) -> Option<&mut T> {
        (**self.objects.get_mut(id.0)?).as_any_mut().downcast_mut()
    }

    /// Returns one object mutably, along with a view of every other object.
    pub fn focus(&mut self, id: ObjectId) -> Result<(&mut dyn WorldObject, SceneView<'_>)> {
        let time = self.time;
        if id.0 >= self.objects.len() {
            return Err(Error::NoSuchObject(id.0));
        }
        let (before, rest) = self.objects.split_at_mut(id.0);
        let (object, after) = rest
            .split_first_mut()
            .ok_or(Error::NoSuchObject(id.0))?;
        let view = SceneView {
            time,
            before,
            after,
        };
        Ok((&mut **object, view))
    }

    /// Updates every object in insertion order, then advances the clock by
    /// `delta` seconds.
    pub fn update(&mut self, delta: f64) -> Result<()> {
        if !delta.is_finite() || delta < 0.0 {
            return Err(Error::InvalidDelta(delta));
        }
        for i in 0..self.objects.len() {
            let (object, view) = self.focus(ObjectId(i))?;
            object.update(&view, delta)?;
        }
        self.time += delta;
        trace!("Advanced scene by {}s to t={}", delta, self.time);
        Ok(())
    }

    /// Draws one object into `buffer`.
    pub fn draw(&mut self, id: ObjectId, rt: &ArrayRuntime, buffer: &mut PixelBuffer) -> Result<()> {
        let (object, view) = self.focus(id)?;
        let name = object.name();
        let drawable = object
            .as_drawable_mut()
            .ok_or_else(|| Error::MissingCapability {
                index: id.0,
                name: name.to_owned(),
                capability: "Drawable",
            })?;
        drawable.draw(rt, buffer, &view)
    }
}

/// Read-only view of a scene from the perspective of one of its objects.
///
/// The view contains every object except the one being updated or drawn.
#[derive(Debug, Copy, Clone)]
pub struct SceneView<'a> {
    time: f64,
    before: &'a [Box<dyn WorldObject>],
    after: &'a [Box<dyn WorldObject>],
}

impl<'a> SceneView<'a> {
    /// Returns the scene time.
    pub fn time(&self) -> f64 {
        self.time
    }
    /// Returns every visible object in insertion order.
    pub fn objects(&self) -> impl Iterator<Item = &'a dyn WorldObject> {
        self.before.iter().chain(self.after).map(|o| &**o)
    }
    /// Returns every visible intersectable object in insertion order.
    pub fn intersectables(&self) -> Vec<&'a dyn Intersectable> {
        self.objects().filter_map(|o| o.as_intersectable()).collect()
    }
}
