// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Cluster/merge engine.
//!
//! Openings on one host whose in-plane rectangles touch (or sit within the
//! merge threshold of each other) are collapsed into a single union-rectangle
//! opening. Members live on inside the cluster for audit; the merged
//! geometry is always derived from the union rectangle, never from averaged
//! member centers. O(n^2) pairwise adjacency per host is fine at the
//! candidate counts a building model produces.

use std::collections::VecDeque;
use std::sync::Arc;

use nalgebra::Point3;
use tracing::debug;

use provoid_core::{AnalysisConfig, ElementId, HostSurface};

use crate::record::{IntersectionRecord, LocalRect, OpeningSize};
use crate::sizing::{round_up_5, LabelCache};

/// A merged opening covering several conduits
#[derive(Debug, Clone)]
pub struct Cluster {
    pub host: ElementId,
    /// Constituent records, sorted by conduit id
    pub members: Vec<IntersectionRecord>,
    /// Union of the member rectangles in the host face plane
    pub rect: LocalRect,
    /// Rounded union spans
    pub opening: OpeningSize,
    pub label: Arc<str>,
    /// Union-rectangle centroid; z is the mean member depth
    pub local_center: Point3<f64>,
    /// `local_center` mapped through the host frame
    pub world_point: Point3<f64>,
}

impl Cluster {
    pub fn member_ids(&self) -> Vec<ElementId> {
        self.members.iter().map(|m| m.conduit).collect()
    }
}

/// One opening candidate leaving the merge stage
#[derive(Debug, Clone)]
pub enum OpeningCandidate {
    Single(IntersectionRecord),
    Merged(Cluster),
}

impl OpeningCandidate {
    pub fn host(&self) -> ElementId {
        match self {
            Self::Single(r) => r.host,
            Self::Merged(c) => c.host,
        }
    }

    pub fn world_point(&self) -> Point3<f64> {
        match self {
            Self::Single(r) => r.world_point,
            Self::Merged(c) => c.world_point,
        }
    }

    /// Representative point in the host face plane
    pub fn local_point(&self) -> Point3<f64> {
        match self {
            Self::Single(r) => r.local_point,
            Self::Merged(c) => c.local_center,
        }
    }

    pub fn opening(&self) -> OpeningSize {
        match self {
            Self::Single(r) => r.opening,
            Self::Merged(c) => c.opening,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::Single(r) => &r.label,
            Self::Merged(c) => &c.label,
        }
    }

    /// In-plane rectangle of the final opening
    pub fn rect(&self) -> LocalRect {
        match self {
            Self::Single(r) => r.local_rect(),
            Self::Merged(c) => c.rect,
        }
    }

    pub fn is_merged(&self) -> bool {
        matches!(self, Self::Merged(_))
    }

    /// Conduits this candidate covers
    pub fn source_ids(&self) -> Vec<ElementId> {
        match self {
            Self::Single(r) => vec![r.conduit],
            Self::Merged(c) => c.member_ids(),
        }
    }

    /// Smallest covered conduit id; the stable ordering key
    pub fn min_conduit(&self) -> ElementId {
        match self {
            Self::Single(r) => r.conduit,
            // Members are sorted, the first is the smallest
            Self::Merged(c) => c.members[0].conduit,
        }
    }
}

/// Merge the records of one host into opening candidates.
///
/// With merging disabled (threshold 0) every record passes through as a
/// single. Otherwise connected components of the rectangle adjacency (with
/// per-axis allowance = threshold) coalesce into one candidate each, and the
/// adjacency is re-run over the union rectangles until it reaches a fixed
/// point, so merging the output again changes nothing. Output is ordered by
/// smallest member conduit id, which makes the result independent of input
/// permutation.
pub fn merge_host(
    host: &HostSurface,
    records: Vec<IntersectionRecord>,
    config: &AnalysisConfig,
    labels: &mut LabelCache,
) -> Vec<OpeningCandidate> {
    if !config.merging_enabled() || records.len() < 2 {
        let mut singles: Vec<OpeningCandidate> =
            records.into_iter().map(OpeningCandidate::Single).collect();
        singles.sort_by_key(|c| c.min_conduit());
        return singles;
    }

    let allowance = config.merge_threshold_mm;

    // A union rectangle covers corner space no member did, so it can newly
    // overlap a candidate none of its members touched. Re-run the adjacency
    // over the union rectangles until nothing coalesces; the group count
    // strictly decreases each round, so the loop terminates.
    let mut groups: Vec<Vec<usize>> = (0..records.len()).map(|i| vec![i]).collect();
    let mut rects: Vec<LocalRect> = records.iter().map(|r| r.local_rect()).collect();
    loop {
        let components = adjacency_components(&rects, allowance);
        if components.len() == groups.len() {
            break;
        }
        let mut coalesced: Vec<Vec<usize>> = Vec::with_capacity(components.len());
        for component in components {
            let mut merged = Vec::new();
            for g in component {
                merged.append(&mut groups[g]);
            }
            coalesced.push(merged);
        }
        groups = coalesced;
        rects = groups
            .iter()
            .map(|group| {
                let mut rect = records[group[0]].local_rect();
                for &i in &group[1..] {
                    rect = rect.union(&records[i].local_rect());
                }
                rect
            })
            .collect();
    }

    let mut slots: Vec<Option<IntersectionRecord>> = records.into_iter().map(Some).collect();
    let mut candidates = Vec::with_capacity(groups.len());
    for group in groups {
        if group.len() == 1 {
            if let Some(record) = slots[group[0]].take() {
                candidates.push(OpeningCandidate::Single(record));
            }
            continue;
        }

        let mut members: Vec<IntersectionRecord> = group
            .into_iter()
            .filter_map(|i| slots[i].take())
            .collect();
        members.sort_by_key(|m| m.conduit);

        let mut rect = members[0].local_rect();
        for member in &members[1..] {
            rect = rect.union(&member.local_rect());
        }
        let opening = OpeningSize::new(round_up_5(rect.width()), round_up_5(rect.height()));
        let label = labels.get(&opening);

        let (cx, cy) = rect.center();
        let mean_depth =
            members.iter().map(|m| m.local_point.z).sum::<f64>() / members.len() as f64;
        let local_center = Point3::new(cx, cy, mean_depth);
        let world_point = host.frame.to_world_point(&local_center);

        debug!(
            host = host.id.raw(),
            members = members.len(),
            width = opening.width,
            height = opening.height,
            "merged opening cluster"
        );
        candidates.push(OpeningCandidate::Merged(Cluster {
            host: host.id,
            members,
            rect,
            opening,
            label,
            local_center,
            world_point,
        }));
    }

    candidates.sort_by_key(|c| c.min_conduit());
    candidates
}

/// Connected components of the pairwise overlap relation, as index lists
fn adjacency_components(rects: &[LocalRect], allowance: f64) -> Vec<Vec<usize>> {
    let n = rects.len();
    let mut visited = vec![false; n];
    let mut components: Vec<Vec<usize>> = Vec::new();
    for seed in 0..n {
        if visited[seed] {
            continue;
        }
        visited[seed] = true;
        let mut component = vec![seed];
        let mut queue = VecDeque::from([seed]);
        while let Some(i) = queue.pop_front() {
            for j in 0..n {
                if !visited[j] && rects[i].overlaps_within(&rects[j], allowance) {
                    visited[j] = true;
                    component.push(j);
                    queue.push_back(j);
                }
            }
        }
        components.push(component);
    }
    components
}
