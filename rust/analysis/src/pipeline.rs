// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The analysis pass.
//!
//! One synchronous, single-threaded run over a read-only snapshot:
//! detect crossings, size openings, annotate gaps, merge clusters, filter,
//! then pick a placement face per survivor. All intermediate records are
//! owned by the pass and dropped with it; per-candidate failures are counted
//! and traced instead of aborting the batch. Writing openings back into a
//! host document is the embedding tool's job, not this crate's.

use nalgebra::{Point3, Vector3};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use provoid_core::{AnalysisConfig, ConduitSegment, ElementId, HostSurface};

use crate::cluster::{merge_host, OpeningCandidate};
use crate::detect::find_crossings;
use crate::error::Result;
use crate::face::{host_faces, select_surface, FaceRef, PlacementSurface};
use crate::filter::apply_exclusions;
use crate::gap::annotate_gaps;
use crate::record::{IntersectionRecord, OpeningSize};
use crate::sizing::{size_opening, LabelCache};
use crate::trace::Trace;

/// Counters for one pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassStats {
    pub hosts: usize,
    pub conduits: usize,
    pub skipped_hosts: usize,
    pub skipped_conduits: usize,
    pub crossings: usize,
    pub clusters: usize,
    pub dropped_excluded: usize,
    pub dropped_obstructed: usize,
    pub dropped_grazing: usize,
    pub failed_placement: usize,
    pub openings: usize,
}

impl PassStats {
    /// Candidates that reached the filter or placement stage and were lost
    pub fn discarded(&self) -> usize {
        self.dropped_excluded + self.dropped_obstructed + self.dropped_grazing
            + self.failed_placement
    }
}

/// One opening to be created by the embedding tool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Opening {
    pub host: ElementId,
    /// World placement point on the chosen face (x, y, z in mm)
    pub point: [f64; 3],
    pub face: FaceRef,
    /// In-plane reference direction: the host frame's Right axis in world
    pub direction: [f64; 3],
    pub size: OpeningSize,
    pub label: String,
    /// Conduits this opening serves, ascending; more than one means merged
    pub sources: Vec<ElementId>,
}

impl Opening {
    pub fn placement_point(&self) -> Point3<f64> {
        Point3::new(self.point[0], self.point[1], self.point[2])
    }

    pub fn reference_direction(&self) -> Vector3<f64> {
        Vector3::new(self.direction[0], self.direction[1], self.direction[2])
    }

    pub fn is_merged(&self) -> bool {
        self.sources.len() > 1
    }
}

/// Everything a pass produces
#[derive(Debug, Clone, Default)]
pub struct PassOutcome {
    pub openings: Vec<Opening>,
    pub stats: PassStats,
    pub trace: Trace,
}

fn place_candidate(host: &HostSurface, candidate: &OpeningCandidate) -> Result<Opening> {
    // A single opening should face its conduit; a merged one has no single
    // axis, so the host normal stands in
    let preferred = match candidate {
        OpeningCandidate::Single(r) => host.frame.to_world_vector(&r.local_axis),
        OpeningCandidate::Merged(_) => host.frame.normal,
    };
    let faces = host_faces(host);
    let target = candidate.world_point();
    let (face, point) = select_surface(faces.as_slice(), &target, &preferred)?;
    let right = host.frame.right;
    Ok(Opening {
        host: host.id,
        point: [point.x, point.y, point.z],
        face: face.reference(),
        direction: [right.x, right.y, right.z],
        size: candidate.opening(),
        label: candidate.label().to_string(),
        sources: candidate.source_ids(),
    })
}

/// Run one full analysis pass over the snapshot.
///
/// Never fails as a whole: unusable elements and candidates are skipped,
/// counted in [`PassStats`] and explained in the [`Trace`]. Output openings
/// are ordered by host input order, then by smallest source conduit id.
pub fn run_pass(
    hosts: &[HostSurface],
    conduits: &[ConduitSegment],
    config: &AnalysisConfig,
) -> PassOutcome {
    let mut stats = PassStats {
        hosts: hosts.len(),
        conduits: conduits.len(),
        ..PassStats::default()
    };
    let mut trace = Trace::new();
    let mut labels = LabelCache::new();

    info!(
        hosts = hosts.len(),
        conduits = conduits.len(),
        clearance_mm = config.clearance_mm,
        merge_threshold_mm = config.merge_threshold_mm,
        "starting opening analysis pass"
    );

    let crossings = find_crossings(hosts, conduits, &mut stats, &mut trace);

    let mut by_host: FxHashMap<ElementId, Vec<IntersectionRecord>> = FxHashMap::default();
    for crossing in crossings {
        let sized = size_opening(&crossing.section, &crossing.local_axis, config.clearance_mm);
        let label = labels.get(&sized.size);
        let record = IntersectionRecord::sized(crossing, sized.size, label, sized.diagonal);
        by_host.entry(record.host).or_default().push(record);
    }

    let mut openings = Vec::new();
    for host in hosts {
        let Some(mut group) = by_host.remove(&host.id) else {
            continue;
        };
        group.sort_by_key(|r| r.conduit);
        annotate_gaps(&mut group, config.merge_threshold_mm);
        let candidates = merge_host(host, group, config, &mut labels);
        stats.clusters += candidates.iter().filter(|c| c.is_merged()).count();

        let kept = apply_exclusions(host, candidates, config, &mut stats, &mut trace);
        for candidate in kept {
            match place_candidate(host, &candidate) {
                Ok(opening) => openings.push(opening),
                Err(err) => {
                    warn!(host = host.id.raw(), "placement failed: {err}");
                    trace.note(format!("host {}: placement failed: {err}", host.id));
                    stats.failed_placement += 1;
                }
            }
        }
    }

    stats.openings = openings.len();
    info!(
        openings = stats.openings,
        crossings = stats.crossings,
        clusters = stats.clusters,
        discarded = stats.discarded(),
        "pass complete"
    );
    trace.note(format!(
        "pass complete: {} openings from {} crossings ({} discarded)",
        stats.openings,
        stats.crossings,
        stats.discarded()
    ));

    PassOutcome {
        openings,
        stats,
        trace,
    }
}
