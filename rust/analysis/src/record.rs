// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Intermediate records flowing through a pass.
//!
//! A raw [`Crossing`] comes out of the detector, gets sized into an
//! [`IntersectionRecord`], and later stages annotate (gap analyzer) or
//! consume (cluster engine) those records. Records are plain owned values;
//! once a pass ends nothing survives into the next one.

use std::sync::Arc;

use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};

use provoid_core::{CrossSection, ElementId};

/// Raw detector hit: a conduit's box overlaps a host's box.
///
/// Geometry is already resolved into the host frame; sizing has not
/// happened yet.
#[derive(Debug, Clone)]
pub struct Crossing {
    pub host: ElementId,
    pub conduit: ElementId,
    /// Overlap-region centroid in world coordinates
    pub world_point: Point3<f64>,
    /// The same point in the host frame
    pub local_point: Point3<f64>,
    /// Conduit axis in the host frame (unit)
    pub local_axis: Vector3<f64>,
    pub section: CrossSection,
}

/// Final opening dimensions in millimetres, already rounded
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OpeningSize {
    pub width: f64,
    pub height: f64,
}

impl OpeningSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn is_square(&self) -> bool {
        self.width == self.height
    }

    #[inline]
    pub fn half_width(&self) -> f64 {
        self.width / 2.0
    }

    #[inline]
    pub fn half_height(&self) -> f64 {
        self.height / 2.0
    }
}

/// One sized penetration of one conduit through one host.
///
/// The detector guarantees at most one record per (host, conduit) pair.
#[derive(Debug, Clone)]
pub struct IntersectionRecord {
    pub host: ElementId,
    pub conduit: ElementId,
    pub world_point: Point3<f64>,
    pub local_point: Point3<f64>,
    pub local_axis: Vector3<f64>,
    pub section: CrossSection,
    pub opening: OpeningSize,
    pub label: Arc<str>,
    /// Set when the oblique sizing path elongated the opening
    pub diagonal: bool,
    /// Distance to the nearest neighbour on the same host, attached by the
    /// gap analyzer only when it is below the merge threshold
    pub gap: Option<f64>,
}

impl IntersectionRecord {
    /// Promote a raw crossing once its opening has been sized
    pub fn sized(crossing: Crossing, opening: OpeningSize, label: Arc<str>, diagonal: bool) -> Self {
        Self {
            host: crossing.host,
            conduit: crossing.conduit,
            world_point: crossing.world_point,
            local_point: crossing.local_point,
            local_axis: crossing.local_axis,
            section: crossing.section,
            opening,
            label,
            diagonal,
            gap: None,
        }
    }

    /// In-plane opening rectangle centered on the record's local point
    pub fn local_rect(&self) -> LocalRect {
        LocalRect::centered(
            self.local_point.x,
            self.local_point.y,
            self.opening.width,
            self.opening.height,
        )
    }
}

/// Axis-aligned rectangle in the host face plane (local x = Right,
/// local y = Up)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocalRect {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl LocalRect {
    /// Rectangle of the given size centered at a point
    pub fn centered(cx: f64, cy: f64, width: f64, height: f64) -> Self {
        Self {
            min_x: cx - width / 2.0,
            min_y: cy - height / 2.0,
            max_x: cx + width / 2.0,
            max_y: cy + height / 2.0,
        }
    }

    /// Smallest rectangle containing both operands
    pub fn union(&self, other: &LocalRect) -> LocalRect {
        LocalRect {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }

    /// Closed-interval overlap with a per-axis allowance.
    ///
    /// At allowance 0 this is plain overlap (touching counts); a positive
    /// allowance additionally admits rectangles separated by at most that
    /// gap on each axis.
    pub fn overlaps_within(&self, other: &LocalRect, allowance: f64) -> bool {
        self.min_x <= other.max_x + allowance
            && other.min_x <= self.max_x + allowance
            && self.min_y <= other.max_y + allowance
            && other.min_y <= self.max_y + allowance
    }

    /// Whether `other` lies entirely inside this rectangle
    pub fn contains(&self, other: &LocalRect) -> bool {
        self.min_x <= other.min_x
            && self.min_y <= other.min_y
            && self.max_x >= other.max_x
            && self.max_y >= other.max_y
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// Rectangle centroid as (x, y)
    #[inline]
    pub fn center(&self) -> (f64, f64) {
        (
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }
}
