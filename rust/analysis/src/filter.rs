// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Exclusion filter.
//!
//! Runs last over the merged candidates of a host. Three rules, evaluated in
//! a fixed order on fixed geometry, first match drops the candidate: door and
//! window zones, structural obstructions near the opening, and grazing
//! incidence. Dropping is monotonic; nothing is re-admitted later.

use nalgebra::Point3;
use tracing::debug;

use provoid_core::{Aabb, AnalysisConfig, HostSurface, LocalFrame};

use crate::cluster::OpeningCandidate;
use crate::pipeline::PassStats;
use crate::trace::Trace;

/// Fixed inflation applied to door/window zone boxes (mm)
pub const EXCLUSION_TOLERANCE_MM: f64 = 50.0;
/// Probe reach beyond the opening along the host normal, both directions (mm)
pub const OBSTRUCTION_PROBE_MM: f64 = 150.0;

fn candidate_desc(candidate: &OpeningCandidate) -> String {
    match candidate {
        OpeningCandidate::Single(r) => format!("conduit {}", r.conduit),
        OpeningCandidate::Merged(c) => {
            let ids: Vec<String> = c.members.iter().map(|m| m.conduit.to_string()).collect();
            format!("merged [{}]", ids.join(", "))
        }
    }
}

/// World box re-expressed in the host frame (conservative corner hull)
fn local_bounds(frame: &LocalFrame, world: &Aabb) -> Aabb {
    Aabb::from_points(world.corners().iter().map(|c| frame.to_local_point(c)))
}

fn inside_exclusion_zone(host: &HostSurface, candidate: &OpeningCandidate) -> Option<String> {
    let point = candidate.world_point();
    host.exclusions
        .iter()
        .find(|zone| {
            zone.bounds
                .inflate(EXCLUSION_TOLERANCE_MM)
                .contains_point(&point)
        })
        .map(|zone| format!("inside exclusion zone {}", zone.id))
}

fn blocked_by_obstruction(host: &HostSurface, candidate: &OpeningCandidate) -> Option<String> {
    let rect = candidate.rect();
    let depth = candidate.local_point().z;
    let probe = Aabb::new(
        Point3::new(rect.min_x, rect.min_y, depth - OBSTRUCTION_PROBE_MM),
        Point3::new(rect.max_x, rect.max_y, depth + OBSTRUCTION_PROBE_MM),
    );
    for obstruction in &host.obstructions {
        let world = obstruction.world_bounds();
        if !world.is_valid() {
            continue;
        }
        if probe.intersects(&local_bounds(&host.frame, &world)) {
            return Some(format!("blocked by obstruction {}", obstruction.id));
        }
    }
    None
}

fn is_grazing(candidate: &OpeningCandidate, threshold: f64) -> bool {
    match candidate {
        OpeningCandidate::Single(r) => r.local_axis.z.abs() < threshold,
        // A merged opening only grazes when every member does
        OpeningCandidate::Merged(c) => {
            c.members.iter().all(|m| m.local_axis.z.abs() < threshold)
        }
    }
}

/// Drop candidates that must not become openings.
///
/// Survivors keep their relative order. Each drop is counted under its rule
/// and traced with the reason.
pub fn apply_exclusions(
    host: &HostSurface,
    candidates: Vec<OpeningCandidate>,
    config: &AnalysisConfig,
    stats: &mut PassStats,
    trace: &mut Trace,
) -> Vec<OpeningCandidate> {
    let mut kept = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        if let Some(reason) = inside_exclusion_zone(host, &candidate) {
            debug!(host = host.id.raw(), "candidate dropped: {reason}");
            trace.note(format!(
                "host {}: {} dropped: {reason}",
                host.id,
                candidate_desc(&candidate)
            ));
            stats.dropped_excluded += 1;
            continue;
        }
        if let Some(reason) = blocked_by_obstruction(host, &candidate) {
            debug!(host = host.id.raw(), "candidate dropped: {reason}");
            trace.note(format!(
                "host {}: {} dropped: {reason}",
                host.id,
                candidate_desc(&candidate)
            ));
            stats.dropped_obstructed += 1;
            continue;
        }
        if is_grazing(&candidate, config.grazing_threshold) {
            debug!(host = host.id.raw(), "candidate dropped: grazing incidence");
            trace.note(format!(
                "host {}: {} dropped: grazing incidence",
                host.id,
                candidate_desc(&candidate)
            ));
            stats.dropped_grazing += 1;
            continue;
        }
        kept.push(candidate);
    }
    kept
}
