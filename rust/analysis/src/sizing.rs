// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Opening dimension calculation.
//!
//! Clearance is applied symmetrically on both sides of the conduit, oblique
//! incidence elongates the silhouette by `1/cos(theta)`, and every final
//! dimension is rounded up to the next 5 mm step for fabrication. Circular
//! sections get square openings by shop policy.

use std::sync::Arc;

use nalgebra::Vector3;
use rustc_hash::FxHashMap;

use provoid_core::CrossSection;

use crate::record::OpeningSize;

/// `|axis . normal|` at or above this counts as perpendicular incidence
pub const PERPENDICULAR_COS: f64 = 0.999;
/// Lower clamp on cos(theta); keeps near-tangential axes from elongating
/// without bound
pub const MIN_INCIDENCE_COS: f64 = 1e-3;

/// Round up to the next 5 mm step
#[inline]
pub fn round_up_5(v: f64) -> f64 {
    (v / 5.0).ceil() * 5.0
}

/// Result of sizing one crossing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SizedOpening {
    pub size: OpeningSize,
    /// True when the oblique path elongated the opening
    pub diagonal: bool,
}

/// Compute opening dimensions for a section crossing the host with the given
/// frame-local axis (unit; z is the through-thickness component).
///
/// Never fails: the incidence cosine is clamped, and a degenerate axis is
/// rejected by the detector before sizing runs.
pub fn size_opening(
    section: &CrossSection,
    local_axis: &Vector3<f64>,
    clearance: f64,
) -> SizedOpening {
    let cos_incidence = local_axis.z.abs();

    if cos_incidence >= PERPENDICULAR_COS {
        let size = if section.is_circular() {
            let side = round_up_5(section.width + 2.0 * clearance);
            OpeningSize::new(side, side)
        } else {
            OpeningSize::new(
                round_up_5(section.width + 2.0 * clearance),
                round_up_5(section.height + 2.0 * clearance),
            )
        };
        return SizedOpening {
            size,
            diagonal: false,
        };
    }

    let cos = cos_incidence.max(MIN_INCIDENCE_COS);
    let (right, up) = if section.is_circular() {
        // Elliptical silhouette: Right stays at the diameter, Up elongates
        (section.width, section.width / cos)
    } else if local_axis.x.abs() > local_axis.y.abs() {
        // Tilt leans along Right: that side elongates and is carried on Up
        (section.height, section.width / cos)
    } else {
        (section.width, section.height / cos)
    };
    SizedOpening {
        size: OpeningSize::new(
            round_up_5(right + 2.0 * clearance),
            round_up_5(up + 2.0 * clearance),
        ),
        diagonal: true,
    }
}

/// Human-readable label from rounded dimensions
pub fn format_label(size: &OpeningSize) -> String {
    if size.is_square() {
        format!("square {:.0}x{:.0}", size.width, size.height)
    } else {
        format!("rect {:.0}x{:.0}", size.width, size.height)
    }
}

/// Memoized labels keyed by exact dimensions.
///
/// Scoped to a single pass; openings repeat the same few sizes, so sharing
/// one `Arc<str>` per size keeps records cheap to clone.
#[derive(Debug, Default)]
pub struct LabelCache {
    labels: FxHashMap<(u64, u64), Arc<str>>,
}

impl LabelCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&mut self, size: &OpeningSize) -> Arc<str> {
        let key = (size.width.to_bits(), size.height.to_bits());
        self.labels
            .entry(key)
            .or_insert_with(|| Arc::from(format_label(size)))
            .clone()
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_up_5() {
        assert_eq!(round_up_5(0.0), 0.0);
        assert_eq!(round_up_5(100.0), 100.0);
        assert_eq!(round_up_5(100.01), 105.0);
        assert_eq!(round_up_5(104.99), 105.0);
        assert_eq!(round_up_5(165.47), 170.0);
    }

    #[test]
    fn test_perpendicular_circular_is_square() {
        let sized = size_opening(&CrossSection::circular(150.0), &Vector3::z(), 25.0);
        assert_eq!(sized.size, OpeningSize::new(200.0, 200.0));
        assert!(sized.size.is_square());
        assert!(!sized.diagonal);
    }

    #[test]
    fn test_perpendicular_rectangular() {
        let sized = size_opening(&CrossSection::rectangular(300.0, 198.0), &Vector3::z(), 50.0);
        assert_eq!(sized.size, OpeningSize::new(400.0, 300.0));
        assert!(!sized.diagonal);
    }

    #[test]
    fn test_oblique_circular_thirty_degrees() {
        // 30 degrees off the normal, leaning along Up
        let theta = 30f64.to_radians();
        let axis = Vector3::new(0.0, theta.sin(), theta.cos());
        let sized = size_opening(&CrossSection::circular(100.0), &axis, 25.0);
        // Right stays 100 + 50 = 150; Up = 100/cos30 + 50 = 165.47 -> 170
        assert_eq!(sized.size, OpeningSize::new(150.0, 170.0));
        assert!(sized.diagonal);
    }

    #[test]
    fn test_oblique_rect_mapping_follows_dominant_component() {
        let section = CrossSection::rectangular(300.0, 200.0);
        let theta = 30f64.to_radians();

        // Leaning along Up: height elongates, width stays on Right
        let up_lean = Vector3::new(0.0, theta.sin(), theta.cos());
        let sized = size_opening(&section, &up_lean, 0.0);
        assert_eq!(sized.size, OpeningSize::new(300.0, 235.0));

        // Leaning along Right: width elongates and is carried on Up
        let right_lean = Vector3::new(theta.sin(), 0.0, theta.cos());
        let sized = size_opening(&section, &right_lean, 0.0);
        assert_eq!(sized.size, OpeningSize::new(200.0, 350.0));
    }

    #[test]
    fn test_near_tangential_axis_is_clamped() {
        let axis = Vector3::new(1.0, 0.0, 1e-9).normalize();
        let sized = size_opening(&CrossSection::circular(100.0), &axis, 0.0);
        assert!(sized.size.height.is_finite());
        // Clamp fixes the elongation at 1/1e-3
        assert_eq!(sized.size.height, round_up_5(100.0 / MIN_INCIDENCE_COS));
    }

    #[test]
    fn test_labels() {
        assert_eq!(format_label(&OpeningSize::new(200.0, 200.0)), "square 200x200");
        assert_eq!(format_label(&OpeningSize::new(250.0, 150.0)), "rect 250x150");
    }

    #[test]
    fn test_label_cache_shares_one_arc_per_size() {
        let mut cache = LabelCache::new();
        let a = cache.get(&OpeningSize::new(200.0, 200.0));
        let b = cache.get(&OpeningSize::new(200.0, 200.0));
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(&*a, "square 200x200");
        cache.get(&OpeningSize::new(250.0, 150.0));
        assert_eq!(cache.len(), 2);
    }
}
