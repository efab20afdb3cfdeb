// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Axis-aligned bounding boxes in world millimetres.
//!
//! A box starts in the inverted empty state (min = +MAX, max = -MAX) and
//! becomes valid once a point has been added. All interval tests are closed:
//! boxes that merely touch count as overlapping, which the detector relies
//! on for its conservative broad phase.

use nalgebra::{Matrix4, Point3, Vector3};

/// World-space axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner
    pub min: Point3<f64>,
    /// Maximum corner
    pub max: Point3<f64>,
}

impl Aabb {
    /// Create an empty box (invalid until a point is added)
    #[inline]
    pub fn empty() -> Self {
        Self {
            min: Point3::new(f64::MAX, f64::MAX, f64::MAX),
            max: Point3::new(f64::MIN, f64::MIN, f64::MIN),
        }
    }

    /// Create a box from explicit corners
    #[inline]
    pub fn new(min: Point3<f64>, max: Point3<f64>) -> Self {
        Self { min, max }
    }

    /// Tightest box containing all given points
    pub fn from_points<I>(points: I) -> Self
    where
        I: IntoIterator<Item = Point3<f64>>,
    {
        let mut bounds = Self::empty();
        for p in points {
            bounds.expand(&p);
        }
        bounds
    }

    /// Check if the box is valid (non-inverted and finite on every axis)
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.min.x <= self.max.x
            && self.min.y <= self.max.y
            && self.min.z <= self.max.z
            && self.min.coords.iter().all(|v| v.is_finite())
            && self.max.coords.iter().all(|v| v.is_finite())
    }

    /// Expand the box to include a point
    #[inline]
    pub fn expand(&mut self, p: &Point3<f64>) {
        self.min.x = self.min.x.min(p.x);
        self.min.y = self.min.y.min(p.y);
        self.min.z = self.min.z.min(p.z);
        self.max.x = self.max.x.max(p.x);
        self.max.y = self.max.y.max(p.y);
        self.max.z = self.max.z.max(p.z);
    }

    /// Closed-interval overlap test: touching boxes count as overlapping.
    /// Invalid boxes never overlap anything.
    #[inline]
    pub fn intersects(&self, other: &Aabb) -> bool {
        if !self.is_valid() || !other.is_valid() {
            return false;
        }
        self.min.x <= other.max.x
            && other.min.x <= self.max.x
            && self.min.y <= other.max.y
            && other.min.y <= self.max.y
            && self.min.z <= other.max.z
            && other.min.z <= self.max.z
    }

    /// Overlap region of two boxes, if any.
    ///
    /// A touching contact yields a degenerate (zero-thickness) but valid box;
    /// its center is still the well-defined contact centroid.
    pub fn intersection(&self, other: &Aabb) -> Option<Aabb> {
        if !self.intersects(other) {
            return None;
        }
        Some(Aabb {
            min: Point3::new(
                self.min.x.max(other.min.x),
                self.min.y.max(other.min.y),
                self.min.z.max(other.min.z),
            ),
            max: Point3::new(
                self.max.x.min(other.max.x),
                self.max.y.min(other.max.y),
                self.max.z.min(other.max.z),
            ),
        })
    }

    /// Center of the box
    #[inline]
    pub fn center(&self) -> Point3<f64> {
        Point3::new(
            (self.min.x + self.max.x) / 2.0,
            (self.min.y + self.max.y) / 2.0,
            (self.min.z + self.max.z) / 2.0,
        )
    }

    /// Half extents per axis
    #[inline]
    pub fn half_extents(&self) -> Vector3<f64> {
        Vector3::new(
            (self.max.x - self.min.x) / 2.0,
            (self.max.y - self.min.y) / 2.0,
            (self.max.z - self.min.z) / 2.0,
        )
    }

    /// Box grown by `margin` on every side (negative shrinks)
    #[inline]
    pub fn inflate(&self, margin: f64) -> Aabb {
        Aabb {
            min: Point3::new(self.min.x - margin, self.min.y - margin, self.min.z - margin),
            max: Point3::new(self.max.x + margin, self.max.y + margin, self.max.z + margin),
        }
    }

    /// Closed containment test for a point
    #[inline]
    pub fn contains_point(&self, p: &Point3<f64>) -> bool {
        self.is_valid()
            && p.x >= self.min.x
            && p.x <= self.max.x
            && p.y >= self.min.y
            && p.y <= self.max.y
            && p.z >= self.min.z
            && p.z <= self.max.z
    }

    /// The eight corners of the box
    pub fn corners(&self) -> [Point3<f64>; 8] {
        [
            Point3::new(self.min.x, self.min.y, self.min.z),
            Point3::new(self.max.x, self.min.y, self.min.z),
            Point3::new(self.min.x, self.max.y, self.min.z),
            Point3::new(self.max.x, self.max.y, self.min.z),
            Point3::new(self.min.x, self.min.y, self.max.z),
            Point3::new(self.max.x, self.min.y, self.max.z),
            Point3::new(self.min.x, self.max.y, self.max.z),
            Point3::new(self.max.x, self.max.y, self.max.z),
        ]
    }

    /// Axis-aligned box of the transformed corners.
    ///
    /// Under rotation this is conservative (the result can be larger than the
    /// rotated solid), which is the right bias for a broad-phase test.
    pub fn transformed(&self, transform: &Matrix4<f64>) -> Aabb {
        if !self.is_valid() {
            return *self;
        }
        Self::from_points(self.corners().iter().map(|c| transform.transform_point(c)))
    }

    /// Support radius of the box along a unit direction: the half extent of
    /// its projection onto that direction.
    #[inline]
    pub fn support_radius(&self, direction: &Vector3<f64>) -> f64 {
        let he = self.half_extents();
        he.x * direction.x.abs() + he.y * direction.y.abs() + he.z * direction.z.abs()
    }
}

impl Default for Aabb {
    fn default() -> Self {
        Self::empty()
    }
}
