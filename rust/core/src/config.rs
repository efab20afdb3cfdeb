// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Pass configuration.

use serde::{Deserialize, Serialize};

/// Default annular clearance around a conduit (mm)
pub const DEFAULT_CLEARANCE_MM: f64 = 50.0;
/// Default merge threshold; 0 keeps merging off
pub const DEFAULT_MERGE_THRESHOLD_MM: f64 = 0.0;
/// Default grazing cutoff on `|axis . normal|`
pub const DEFAULT_GRAZING_THRESHOLD: f64 = 0.5;

/// Knobs a user can turn per pass. Engineering constants that are not meant
/// to be tuned (probe reach, exclusion tolerance) live as module consts in
/// the analysis crate instead.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Clearance added on every side of the conduit section (mm)
    pub clearance_mm: f64,
    /// Largest gap between neighbouring openings that still merges them (mm);
    /// 0 disables merging entirely
    pub merge_threshold_mm: f64,
    /// Openings whose axis satisfies `|axis . normal| <` this are dropped
    /// as grazing
    pub grazing_threshold: f64,
}

impl AnalysisConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_clearance(mut self, clearance_mm: f64) -> Self {
        self.clearance_mm = clearance_mm;
        self
    }

    pub fn with_merge_threshold(mut self, merge_threshold_mm: f64) -> Self {
        self.merge_threshold_mm = merge_threshold_mm;
        self
    }

    pub fn with_grazing_threshold(mut self, grazing_threshold: f64) -> Self {
        self.grazing_threshold = grazing_threshold;
        self
    }

    #[inline]
    pub fn merging_enabled(&self) -> bool {
        self.merge_threshold_mm > 0.0
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            clearance_mm: DEFAULT_CLEARANCE_MM,
            merge_threshold_mm: DEFAULT_MERGE_THRESHOLD_MM,
            grazing_threshold: DEFAULT_GRAZING_THRESHOLD,
        }
    }
}
