// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Local placement frames on host surfaces.
//!
//! A frame maps between world coordinates and the 2D face plane of a wall or
//! slab: `right` and `up` span the face, `normal` points through it. Opening
//! rectangles and merge geometry are computed in this local space so that the
//! math stays 2D regardless of how the host is oriented in the model.

use nalgebra::{Point3, Vector3};

use crate::error::{Error, Result};

/// Directions shorter than this are considered degenerate
pub const MIN_DIRECTION_NORM: f64 = 1e-10;

/// Orthonormal right-handed frame anchored on a host surface.
///
/// Invariant: `right x up == normal` and all three are unit length.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocalFrame {
    /// Frame origin in world coordinates
    pub origin: Point3<f64>,
    /// Face normal (through-thickness direction)
    pub normal: Vector3<f64>,
    /// In-plane horizontal axis (local +x)
    pub right: Vector3<f64>,
    /// In-plane vertical axis (local +y)
    pub up: Vector3<f64>,
}

impl LocalFrame {
    /// Frame for a wall face from its outward orientation.
    ///
    /// Fails when the orientation vector is too short to normalize.
    pub fn for_wall(origin: Point3<f64>, orientation: Vector3<f64>) -> Result<Self> {
        let normal = orientation.try_normalize(MIN_DIRECTION_NORM).ok_or_else(|| {
            Error::DegenerateDirection(format!(
                "wall orientation {:?} has near-zero length",
                orientation
            ))
        })?;
        Ok(Self::from_normal(origin, normal))
    }

    /// Frame for a horizontal slab, normal pointing up
    pub fn for_slab(origin: Point3<f64>) -> Self {
        Self::from_normal(origin, Vector3::z())
    }

    /// Build the in-plane axes for a unit normal.
    ///
    /// The up axis is seeded with world Z (or world Y when the normal is
    /// near-vertical) and Gram-Schmidt projected into the face plane, so wall
    /// openings keep "up" aligned with gravity wherever possible.
    fn from_normal(origin: Point3<f64>, normal: Vector3<f64>) -> Self {
        let seed = if normal.z.abs() < 0.9 {
            Vector3::z()
        } else {
            Vector3::y()
        };
        let up = (seed - normal * seed.dot(&normal)).normalize();
        let right = up.cross(&normal);
        Self {
            origin,
            normal,
            right,
            up,
        }
    }

    /// World point to frame-local coordinates (x=right, y=up, z=normal)
    #[inline]
    pub fn to_local_point(&self, p: &Point3<f64>) -> Point3<f64> {
        let d = p - self.origin;
        Point3::new(d.dot(&self.right), d.dot(&self.up), d.dot(&self.normal))
    }

    /// World vector to frame-local components
    #[inline]
    pub fn to_local_vector(&self, v: &Vector3<f64>) -> Vector3<f64> {
        Vector3::new(v.dot(&self.right), v.dot(&self.up), v.dot(&self.normal))
    }

    /// Frame-local point back to world coordinates
    #[inline]
    pub fn to_world_point(&self, local: &Point3<f64>) -> Point3<f64> {
        self.origin + self.right * local.x + self.up * local.y + self.normal * local.z
    }

    /// Frame-local vector back to world components
    #[inline]
    pub fn to_world_vector(&self, local: &Vector3<f64>) -> Vector3<f64> {
        self.right * local.x + self.up * local.y + self.normal * local.z
    }
}
