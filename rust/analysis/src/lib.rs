//! Provoid Analysis
//!
//! Penetration-opening analysis pass over a building model snapshot:
//! detects conduit/host crossings, sizes and labels openings, merges
//! overlapping ones and selects placement faces.

pub mod cluster;
pub mod detect;
pub mod error;
pub mod face;
pub mod filter;
pub mod gap;
pub mod pipeline;
pub mod record;
pub mod sizing;
pub mod trace;

// Re-export nalgebra types for convenience
pub use nalgebra::{Point2, Point3, Vector2, Vector3};

pub use cluster::{merge_host, Cluster, OpeningCandidate};
pub use detect::find_crossings;
pub use error::{Error, Result};
pub use face::{host_faces, select_surface, FaceRef, FaceSide, PlacementSurface, PlanarFace};
pub use filter::{apply_exclusions, EXCLUSION_TOLERANCE_MM, OBSTRUCTION_PROBE_MM};
pub use gap::annotate_gaps;
pub use pipeline::{run_pass, Opening, PassOutcome, PassStats};
pub use record::{Crossing, IntersectionRecord, LocalRect, OpeningSize};
pub use sizing::{
    format_label, round_up_5, size_opening, LabelCache, SizedOpening, MIN_INCIDENCE_COS,
    PERPENDICULAR_COS,
};
pub use trace::Trace;
