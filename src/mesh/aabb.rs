//! Axis-aligned bounding box.

use crate::float_types::Real;
use nalgebra::{Point3, Vector3};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub mins: Point3<Real>,
    pub maxs: Point3<Real>,
}

impl Aabb {
    #[inline]
    pub const fn new(mins: Point3<Real>, maxs: Point3<Real>) -> Self {
        Self { mins, maxs }
    }

    /// A degenerate box at the origin, used for empty meshes.
    pub fn zero() -> Self {
        Self::new(Point3::origin(), Point3::origin())
    }

    /// Grow the box to contain `p`.
    pub fn take_point(&mut self, p: &Point3<Real>) {
        self.mins.x = self.mins.x.min(p.x);
        self.mins.y = self.mins.y.min(p.y);
        self.mins.z = self.mins.z.min(p.z);
        self.maxs.x = self.maxs.x.max(p.x);
        self.maxs.y = self.maxs.y.max(p.y);
        self.maxs.z = self.maxs.z.max(p.z);
    }

    /// Build the box spanning an iterator of points, or `None` if empty.
    pub fn from_points<'a, I: IntoIterator<Item = &'a Point3<Real>>>(points: I) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut aabb = Aabb::new(*first, *first);
        for p in iter {
            aabb.take_point(p);
        }
        Some(aabb)
    }

    #[inline]
    pub fn intersects(&self, other: &Self) -> bool {
        self.maxs.x >= other.mins.x
            && self.mins.x <= other.maxs.x
            && self.maxs.y >= other.mins.y
            && self.mins.y <= other.maxs.y
            && self.maxs.z >= other.mins.z
            && self.mins.z <= other.maxs.z
    }

    #[inline]
    pub fn center(&self) -> Point3<Real> {
        nalgebra::center(&self.mins, &self.maxs)
    }

    /// Edge lengths of the box.
    #[inline]
    pub fn extents(&self) -> Vector3<Real> {
        self.maxs - self.mins
    }

    /// Largest edge length.
    #[inline]
    pub fn max_extent(&self) -> Real {
        let e = self.extents();
        e.x.max(e.y).max(e.z)
    }
}
