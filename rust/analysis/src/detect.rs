// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Intersection detector.
//!
//! Tests every (host, conduit) pair with a closed-interval AABB overlap in
//! world coordinates, the conduit box first resolved through its source
//! transform. The test is deliberately conservative: it can admit a conduit
//! that merely grazes a corner, and the exclusion and grazing filters deal
//! with those later. A pair that passes yields one [`Crossing`] anchored at
//! the overlap-region centroid.

use nalgebra::Vector3;
use tracing::{debug, warn};

use provoid_core::{Aabb, ConduitSegment, HostSurface};

use crate::pipeline::PassStats;
use crate::record::Crossing;
use crate::trace::Trace;

/// Conduit with its world geometry resolved once, reused across hosts
struct PreparedConduit<'a> {
    segment: &'a ConduitSegment,
    world_bounds: Aabb,
    world_axis: Vector3<f64>,
}

fn prepare<'a>(
    conduits: &'a [ConduitSegment],
    stats: &mut PassStats,
    trace: &mut Trace,
) -> Vec<PreparedConduit<'a>> {
    let mut prepared = Vec::with_capacity(conduits.len());
    for segment in conduits {
        if !segment.section.is_valid() {
            warn!(conduit = segment.id.raw(), "skipping conduit: invalid cross-section");
            trace.note(format!("conduit {} skipped: invalid cross-section", segment.id));
            stats.skipped_conduits += 1;
            continue;
        }
        let world_bounds = segment.world_bounds();
        if !world_bounds.is_valid() {
            warn!(conduit = segment.id.raw(), "skipping conduit: invalid bounds");
            trace.note(format!("conduit {} skipped: invalid bounds", segment.id));
            stats.skipped_conduits += 1;
            continue;
        }
        let world_axis = match segment.world_axis() {
            Some(axis) => axis,
            None => {
                warn!(conduit = segment.id.raw(), "skipping conduit: degenerate axis");
                trace.note(format!("conduit {} skipped: degenerate axis", segment.id));
                stats.skipped_conduits += 1;
                continue;
            }
        };
        prepared.push(PreparedConduit {
            segment,
            world_bounds,
            world_axis,
        });
    }
    prepared
}

/// Find every conduit whose world box overlaps a host box.
///
/// Produces at most one crossing per (host, conduit) pair, in
/// (host order, conduit order) of the inputs. Unusable elements are skipped,
/// counted and traced rather than failing the pass.
pub fn find_crossings(
    hosts: &[HostSurface],
    conduits: &[ConduitSegment],
    stats: &mut PassStats,
    trace: &mut Trace,
) -> Vec<Crossing> {
    let prepared = prepare(conduits, stats, trace);

    let mut crossings = Vec::new();
    for host in hosts {
        if !host.bounds.is_valid() {
            warn!(host = host.id.raw(), "skipping host: invalid bounds");
            trace.note(format!("host {} skipped: invalid bounds", host.id));
            stats.skipped_hosts += 1;
            continue;
        }
        for conduit in &prepared {
            let Some(overlap) = host.bounds.intersection(&conduit.world_bounds) else {
                continue;
            };
            let world_point = overlap.center();
            let local_point = host.frame.to_local_point(&world_point);
            let local_axis = host.frame.to_local_vector(&conduit.world_axis);
            debug!(
                host = host.id.raw(),
                conduit = conduit.segment.id.raw(),
                x = world_point.x,
                y = world_point.y,
                z = world_point.z,
                "crossing detected"
            );
            crossings.push(Crossing {
                host: host.id,
                conduit: conduit.segment.id,
                world_point,
                local_point,
                local_axis,
                section: conduit.segment.section,
            });
        }
    }
    stats.crossings = crossings.len();
    crossings
}
