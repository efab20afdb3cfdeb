// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Conduit cross-sections.
//!
//! The shape family decides both which attributes describe the section and
//! which sizing rule applies later (circular sections get square openings by
//! policy, everything else gets rectangles).

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::attrs::AttributeSet;
use crate::error::{Error, Result};

/// Attribute names probed for circular sections, in priority order
pub const DIAMETER_ATTRS: &[&str] = &["diameter", "outside_diameter", "nominal_diameter"];
/// Attribute names probed for section width, in priority order
pub const WIDTH_ATTRS: &[&str] = &["width", "duct_width", "tray_width"];
/// Attribute names probed for section height, in priority order
pub const HEIGHT_ATTRS: &[&str] = &["height", "duct_height", "tray_height"];

/// Shape family of a penetrating element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    Circular,
    Rectangular,
    Square,
    Tray,
}

impl ShapeKind {
    /// Map an authoring-tool category string to a shape family
    pub fn from_category(category: &str) -> Option<Self> {
        match category.trim().to_ascii_lowercase().as_str() {
            "pipe" | "pipes" | "conduit" | "conduits" | "round duct" => Some(Self::Circular),
            "duct" | "ducts" | "rectangular duct" => Some(Self::Rectangular),
            "square duct" => Some(Self::Square),
            "cable tray" | "cable trays" | "tray" | "trays" => Some(Self::Tray),
            _ => None,
        }
    }
}

impl FromStr for ShapeKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_category(s).ok_or_else(|| Error::UnsupportedShape(s.to_string()))
    }
}

/// Section dimensions in millimetres. For circular sections both dimensions
/// carry the diameter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CrossSection {
    pub kind: ShapeKind,
    pub width: f64,
    pub height: f64,
}

impl CrossSection {
    /// Circular section of the given diameter
    pub fn circular(diameter: f64) -> Self {
        Self {
            kind: ShapeKind::Circular,
            width: diameter,
            height: diameter,
        }
    }

    /// Rectangular section (duct)
    pub fn rectangular(width: f64, height: f64) -> Self {
        Self {
            kind: ShapeKind::Rectangular,
            width,
            height,
        }
    }

    /// Square section
    pub fn square(side: f64) -> Self {
        Self {
            kind: ShapeKind::Square,
            width: side,
            height: side,
        }
    }

    /// Cable tray section
    pub fn tray(width: f64, height: f64) -> Self {
        Self {
            kind: ShapeKind::Tray,
            width,
            height,
        }
    }

    /// Build a section by probing element attributes.
    ///
    /// Each shape family declares its own attribute fallback chain; the first
    /// present name wins. An exhausted chain is a `MissingDimension` error,
    /// a non-positive or non-finite value an `InvalidCrossSection` error.
    pub fn from_attributes(kind: ShapeKind, attrs: &AttributeSet) -> Result<Self> {
        let section = match kind {
            ShapeKind::Circular => {
                let diameter = attrs.first_of(DIAMETER_ATTRS).ok_or_else(|| {
                    Error::MissingDimension("circular section has no diameter attribute".into())
                })?;
                Self::circular(diameter)
            }
            ShapeKind::Square => {
                let side = attrs.first_of(WIDTH_ATTRS).ok_or_else(|| {
                    Error::MissingDimension("square section has no width attribute".into())
                })?;
                Self::square(side)
            }
            ShapeKind::Rectangular | ShapeKind::Tray => {
                let width = attrs.first_of(WIDTH_ATTRS).ok_or_else(|| {
                    Error::MissingDimension("section has no width attribute".into())
                })?;
                let height = attrs.first_of(HEIGHT_ATTRS).ok_or_else(|| {
                    Error::MissingDimension("section has no height attribute".into())
                })?;
                match kind {
                    ShapeKind::Tray => Self::tray(width, height),
                    _ => Self::rectangular(width, height),
                }
            }
        };
        if !section.is_valid() {
            return Err(Error::InvalidCrossSection(format!(
                "{:?} section {}x{} mm",
                section.kind, section.width, section.height
            )));
        }
        Ok(section)
    }

    #[inline]
    pub fn is_circular(&self) -> bool {
        self.kind == ShapeKind::Circular
    }

    /// Finite, strictly positive dimensions
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}
