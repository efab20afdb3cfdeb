// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # Provoid Core
//!
//! Element and geometry model for penetration-opening analysis. All lengths
//! are millimetres; world coordinates are `f64`.
//!
//! ## Overview
//!
//! This crate provides the input model the analysis pass runs over:
//!
//! - **Bounding volumes**: conservative world-space AABBs ([`Aabb`])
//! - **Host frames**: Right/Up/Normal face bases on walls and slabs
//!   ([`LocalFrame`])
//! - **Elements**: host surfaces, conduit segments, exclusion and
//!   obstruction volumes, each resolving linked-model transforms
//! - **Cross-sections**: shape classification and attribute probing
//!   ([`CrossSection`], [`AttributeSet`])
//! - **Configuration**: per-pass knobs with defaults ([`AnalysisConfig`])
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use provoid_core::{Aabb, ConduitSegment, CrossSection, ElementId, HostSurface};
//! use provoid_core::nalgebra::{Point3, Vector3};
//!
//! let wall = HostSurface::wall(
//!     ElementId(1),
//!     Aabb::new(Point3::new(-100.0, -500.0, -500.0), Point3::new(100.0, 500.0, 500.0)),
//!     Vector3::x(),
//! )?;
//!
//! let pipe = ConduitSegment::new(
//!     ElementId(2),
//!     CrossSection::circular(110.0),
//!     Vector3::x(),
//!     Point3::origin(),
//!     Aabb::new(Point3::new(-500.0, -55.0, -55.0), Point3::new(500.0, 55.0, 55.0)),
//! );
//! ```

pub mod attrs;
pub mod bbox;
pub mod config;
pub mod element;
pub mod error;
pub mod frame;
pub mod ids;
pub mod section;

// The math types used throughout the public API
pub use nalgebra;

pub use attrs::AttributeSet;
pub use bbox::Aabb;
pub use config::{
    AnalysisConfig, DEFAULT_CLEARANCE_MM, DEFAULT_GRAZING_THRESHOLD, DEFAULT_MERGE_THRESHOLD_MM,
};
pub use element::{ConduitSegment, ExclusionZone, HostKind, HostSurface, Obstruction};
pub use error::{Error, Result};
pub use frame::{LocalFrame, MIN_DIRECTION_NORM};
pub use ids::ElementId;
pub use section::{CrossSection, ShapeKind, DIAMETER_ATTRS, HEIGHT_ATTRS, WIDTH_ATTRS};
