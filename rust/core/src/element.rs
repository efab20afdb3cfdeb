// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Model elements taking part in a pass: host surfaces (walls, slabs),
//! penetrating conduit segments, and the exclusion/obstruction volumes
//! attached to hosts.
//!
//! Elements referenced from a linked model carry that model's rigid source
//! transform; `world_*` accessors resolve geometry into shared world
//! coordinates. Everything here is a read-only snapshot for the pass.

use std::str::FromStr;

use nalgebra::{Matrix4, Point3, Vector3};

use crate::bbox::Aabb;
use crate::error::{Error, Result};
use crate::frame::{LocalFrame, MIN_DIRECTION_NORM};
use crate::ids::ElementId;
use crate::section::CrossSection;

/// Host surface family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HostKind {
    Wall,
    Slab,
}

impl HostKind {
    /// Map an authoring-tool category string to a host family
    pub fn from_category(category: &str) -> Option<Self> {
        match category.trim().to_ascii_lowercase().as_str() {
            "wall" | "walls" | "basic wall" => Some(Self::Wall),
            "floor" | "floors" | "slab" | "slabs" | "structural floor" => Some(Self::Slab),
            _ => None,
        }
    }
}

impl FromStr for HostKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_category(s).ok_or_else(|| Error::UnsupportedHost(s.to_string()))
    }
}

/// Door or window zone on a host. Openings landing inside (plus a fixed
/// tolerance) are suppressed.
#[derive(Debug, Clone)]
pub struct ExclusionZone {
    pub id: ElementId,
    /// Zone box in world coordinates
    pub bounds: Aabb,
}

impl ExclusionZone {
    pub fn new(id: ElementId, bounds: Aabb) -> Self {
        Self { id, bounds }
    }
}

/// Structural element (column, beam) that must not be cut. Carries its own
/// source transform when it comes from a linked model.
#[derive(Debug, Clone)]
pub struct Obstruction {
    pub id: ElementId,
    /// Box in source-model coordinates
    pub bounds: Aabb,
    /// Source-model rigid transform (identity for the primary model)
    pub transform: Matrix4<f64>,
}

impl Obstruction {
    pub fn new(id: ElementId, bounds: Aabb) -> Self {
        Self {
            id,
            bounds,
            transform: Matrix4::identity(),
        }
    }

    pub fn with_transform(mut self, transform: Matrix4<f64>) -> Self {
        self.transform = transform;
        self
    }

    /// Bounds resolved into world coordinates
    pub fn world_bounds(&self) -> Aabb {
        self.bounds.transformed(&self.transform)
    }
}

/// A wall or slab that conduits may penetrate
#[derive(Debug, Clone)]
pub struct HostSurface {
    pub id: ElementId,
    pub kind: HostKind,
    /// World-space bounding box of the host solid
    pub bounds: Aabb,
    /// Face-plane frame anchored at the box center
    pub frame: LocalFrame,
    pub exclusions: Vec<ExclusionZone>,
    pub obstructions: Vec<Obstruction>,
}

impl HostSurface {
    /// Wall host from its world box and outward orientation.
    ///
    /// Fails on an invalid box or a degenerate orientation; such hosts are
    /// rejected here rather than skipped silently inside the pass.
    pub fn wall(id: ElementId, bounds: Aabb, orientation: Vector3<f64>) -> Result<Self> {
        if !bounds.is_valid() {
            return Err(Error::InvalidBounds(format!("wall {id}")));
        }
        let frame = LocalFrame::for_wall(bounds.center(), orientation)?;
        Ok(Self {
            id,
            kind: HostKind::Wall,
            bounds,
            frame,
            exclusions: Vec::new(),
            obstructions: Vec::new(),
        })
    }

    /// Slab host from its world box; the face normal is world Z
    pub fn slab(id: ElementId, bounds: Aabb) -> Result<Self> {
        if !bounds.is_valid() {
            return Err(Error::InvalidBounds(format!("slab {id}")));
        }
        let frame = LocalFrame::for_slab(bounds.center());
        Ok(Self {
            id,
            kind: HostKind::Slab,
            bounds,
            frame,
            exclusions: Vec::new(),
            obstructions: Vec::new(),
        })
    }

    pub fn with_exclusions(mut self, exclusions: Vec<ExclusionZone>) -> Self {
        self.exclusions = exclusions;
        self
    }

    pub fn with_obstructions(mut self, obstructions: Vec<Obstruction>) -> Self {
        self.obstructions = obstructions;
        self
    }

    /// Half the host thickness measured along its face normal
    pub fn half_thickness(&self) -> f64 {
        self.bounds.support_radius(&self.frame.normal)
    }
}

/// A penetrating element: pipe, duct, cable tray or conduit run segment
#[derive(Debug, Clone)]
pub struct ConduitSegment {
    pub id: ElementId,
    pub section: CrossSection,
    /// Centerline direction in source-model coordinates
    pub direction: Vector3<f64>,
    /// Reference point on the centerline in source-model coordinates
    pub origin: Point3<f64>,
    /// Bounding box in source-model coordinates
    pub bounds: Aabb,
    /// Source-model rigid transform (identity for the primary model)
    pub transform: Matrix4<f64>,
}

impl ConduitSegment {
    pub fn new(
        id: ElementId,
        section: CrossSection,
        direction: Vector3<f64>,
        origin: Point3<f64>,
        bounds: Aabb,
    ) -> Self {
        Self {
            id,
            section,
            direction,
            origin,
            bounds,
            transform: Matrix4::identity(),
        }
    }

    /// Attach the rigid transform of the linked model this segment came from
    pub fn with_source_transform(mut self, transform: Matrix4<f64>) -> Self {
        self.transform = transform;
        self
    }

    /// Bounding box resolved into world coordinates
    pub fn world_bounds(&self) -> Aabb {
        self.bounds.transformed(&self.transform)
    }

    /// Unit centerline direction in world coordinates.
    ///
    /// `None` when the stored direction is degenerate; the detector skips
    /// such segments.
    pub fn world_axis(&self) -> Option<Vector3<f64>> {
        self.transform
            .transform_vector(&self.direction)
            .try_normalize(MIN_DIRECTION_NORM)
    }

    /// Reference point resolved into world coordinates
    pub fn world_point(&self) -> Point3<f64> {
        self.transform.transform_point(&self.origin)
    }
}
