// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Gap analyzer.
//!
//! Approximates every opening on a host as an in-plane circle of radius
//! opening-width / 2 and measures the clear distance to its nearest
//! neighbour. The distance is only attached to a record when it falls below
//! the merge threshold, so downstream stages can treat `gap.is_some()` as
//! "close enough to consider merging".

use smallvec::SmallVec;

use crate::record::IntersectionRecord;

/// Annotate each record with its nearest-neighbour gap on the same host.
///
/// Gaps are clamped to zero for overlapping openings. With a zero threshold
/// nothing is attached. Geometry is never modified.
pub fn annotate_gaps(records: &mut [IntersectionRecord], merge_threshold: f64) {
    if records.len() < 2 {
        return;
    }

    let mut nearest: SmallVec<[f64; 8]> = SmallVec::from_elem(f64::INFINITY, records.len());
    for i in 0..records.len() {
        for j in (i + 1)..records.len() {
            let a = &records[i];
            let b = &records[j];
            let dx = a.local_point.x - b.local_point.x;
            let dy = a.local_point.y - b.local_point.y;
            let distance = (dx * dx + dy * dy).sqrt();
            let gap = (distance - a.opening.half_width() - b.opening.half_width()).max(0.0);
            nearest[i] = nearest[i].min(gap);
            nearest[j] = nearest[j].min(gap);
        }
    }

    for (record, gap) in records.iter_mut().zip(nearest) {
        if gap < merge_threshold {
            record.gap = Some(gap);
        }
    }
}
