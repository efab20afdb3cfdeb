// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Placement-surface selection.
//!
//! A host exposes candidate faces (two sides of a wall, top and bottom of a
//! slab). The opening is placed on the face most nearly perpendicular to the
//! preferred direction, ties broken by projection distance. The trait keeps
//! the scoring generic over the surface shape; normals of non-planar
//! surfaces are evaluated at the projection of the target, which is why
//! `normal_at` takes the point and may fail.

use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};
use smallvec::{smallvec, SmallVec};

use provoid_core::{ElementId, HostSurface};

use crate::error::{Error, Result};

/// Alignment differences below this are a tie; distance decides
const ALIGN_EPSILON: f64 = 1e-9;

/// Which side of the host the face is on, measured along the frame normal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FaceSide {
    Positive,
    Negative,
}

/// Stable reference to one face of one host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FaceRef {
    pub host: ElementId,
    pub side: FaceSide,
}

/// A surface an opening can be placed on
pub trait PlacementSurface {
    fn reference(&self) -> FaceRef;

    /// Nearest point on the surface, `None` when projection fails
    fn project(&self, point: &Point3<f64>) -> Option<Point3<f64>>;

    /// Outward normal at the point nearest the target
    fn normal_at(&self, point: &Point3<f64>) -> Result<Vector3<f64>>;

    /// Fallback placement when projection fails
    fn midpoint(&self) -> Point3<f64>;
}

/// Planar host face: a point on the plane plus the outward normal
#[derive(Debug, Clone, Copy)]
pub struct PlanarFace {
    reference: FaceRef,
    origin: Point3<f64>,
    normal: Vector3<f64>,
}

impl PlanarFace {
    pub fn new(reference: FaceRef, origin: Point3<f64>, normal: Vector3<f64>) -> Self {
        Self {
            reference,
            origin,
            normal,
        }
    }
}

impl PlacementSurface for PlanarFace {
    fn reference(&self) -> FaceRef {
        self.reference
    }

    fn project(&self, point: &Point3<f64>) -> Option<Point3<f64>> {
        let offset = (point - self.origin).dot(&self.normal);
        Some(point - self.normal * offset)
    }

    fn normal_at(&self, _point: &Point3<f64>) -> Result<Vector3<f64>> {
        Ok(self.normal)
    }

    fn midpoint(&self) -> Point3<f64> {
        self.origin
    }
}

/// The two placement faces of a wall or slab
pub fn host_faces(host: &HostSurface) -> SmallVec<[PlanarFace; 2]> {
    let frame = &host.frame;
    let half = host.half_thickness();
    smallvec![
        PlanarFace::new(
            FaceRef {
                host: host.id,
                side: FaceSide::Positive,
            },
            frame.origin + frame.normal * half,
            frame.normal,
        ),
        PlanarFace::new(
            FaceRef {
                host: host.id,
                side: FaceSide::Negative,
            },
            frame.origin - frame.normal * half,
            -frame.normal,
        ),
    ]
}

/// Pick the surface best facing the preferred direction and nearest to the
/// target; returns the surface and the placement point on it.
///
/// Surfaces whose normal evaluation fails are skipped; failing every surface
/// (or an empty list) is an explicit error the caller turns into a skipped
/// candidate.
pub fn select_surface<'a, S: PlacementSurface>(
    surfaces: &'a [S],
    target: &Point3<f64>,
    preferred: &Vector3<f64>,
) -> Result<(&'a S, Point3<f64>)> {
    let mut best: Option<(&S, Point3<f64>, f64, f64)> = None;
    for surface in surfaces {
        let normal = match surface.normal_at(target) {
            Ok(n) => n,
            Err(_) => continue,
        };
        let align = normal.dot(preferred).abs();
        let point = surface
            .project(target)
            .unwrap_or_else(|| surface.midpoint());
        let distance = (point - target).norm();

        let better = match &best {
            None => true,
            Some((_, _, best_align, best_distance)) => {
                align > best_align + ALIGN_EPSILON
                    || ((align - best_align).abs() <= ALIGN_EPSILON && distance < *best_distance)
            }
        };
        if better {
            best = Some((surface, point, align, distance));
        }
    }
    best.map(|(surface, point, _, _)| (surface, point))
        .ok_or_else(|| Error::NoPlacementSurface(format!("target {:?}", target)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use provoid_core::Aabb;

    fn wall() -> HostSurface {
        HostSurface::wall(
            ElementId(1),
            Aabb::new(
                Point3::new(-100.0, -500.0, -500.0),
                Point3::new(100.0, 500.0, 500.0),
            ),
            Vector3::x(),
        )
        .unwrap()
    }

    #[test]
    fn test_wall_faces() {
        let faces = host_faces(&wall());
        assert_eq!(faces.len(), 2);
        assert_eq!(faces[0].reference().side, FaceSide::Positive);
        assert_relative_eq!(faces[0].origin, Point3::new(100.0, 0.0, 0.0));
        assert_relative_eq!(faces[0].normal, Vector3::x());
        assert_relative_eq!(faces[1].origin, Point3::new(-100.0, 0.0, 0.0));
        assert_relative_eq!(faces[1].normal, -Vector3::x());
    }

    #[test]
    fn test_slab_faces() {
        let slab = HostSurface::slab(
            ElementId(2),
            Aabb::new(
                Point3::new(-1000.0, -1000.0, -150.0),
                Point3::new(1000.0, 1000.0, 150.0),
            ),
        )
        .unwrap();
        let faces = host_faces(&slab);
        assert_relative_eq!(faces[0].origin.z, 150.0);
        assert_relative_eq!(faces[1].origin.z, -150.0);
    }

    #[test]
    fn test_alignment_tie_goes_to_nearest() {
        let faces = host_faces(&wall());
        // Both faces align equally with an axis along X; the target sits
        // closer to the positive face
        let target = Point3::new(10.0, 0.0, 0.0);
        let (face, point) = select_surface(&faces, &target, &Vector3::x()).unwrap();
        assert_eq!(face.reference().side, FaceSide::Positive);
        assert_relative_eq!(point, Point3::new(100.0, 0.0, 0.0));
    }

    #[test]
    fn test_projection_keeps_in_plane_coordinates() {
        let faces = host_faces(&wall());
        let target = Point3::new(-30.0, 40.0, -20.0);
        let (_, point) = select_surface(&faces, &target, &Vector3::x()).unwrap();
        assert_relative_eq!(point, Point3::new(-100.0, 40.0, -20.0));
    }

    #[test]
    fn test_empty_surface_list_errors() {
        let faces: Vec<PlanarFace> = Vec::new();
        let result = select_surface(&faces, &Point3::origin(), &Vector3::x());
        assert!(matches!(result, Err(Error::NoPlacementSurface(_))));
    }

    struct BrokenSurface;

    impl PlacementSurface for BrokenSurface {
        fn reference(&self) -> FaceRef {
            FaceRef {
                host: ElementId(1),
                side: FaceSide::Positive,
            }
        }

        fn project(&self, _point: &Point3<f64>) -> Option<Point3<f64>> {
            None
        }

        fn normal_at(&self, _point: &Point3<f64>) -> Result<Vector3<f64>> {
            Err(Error::SurfaceNormal("no tangent plane".into()))
        }

        fn midpoint(&self) -> Point3<f64> {
            Point3::origin()
        }
    }

    #[test]
    fn test_all_normals_failing_errors() {
        let faces = vec![BrokenSurface, BrokenSurface];
        let result = select_surface(&faces, &Point3::origin(), &Vector3::x());
        assert!(matches!(result, Err(Error::NoPlacementSurface(_))));
    }
}
