// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::sync::Arc;

use approx::assert_relative_eq;
use provoid_analysis::{
    merge_host, round_up_5, run_pass, FaceSide, IntersectionRecord, LabelCache, LocalRect,
    OpeningSize, Point3, Vector3,
};
use provoid_core::{
    Aabb, AnalysisConfig, ConduitSegment, CrossSection, ElementId, ExclusionZone, HostSurface,
};

/// Wall centered at the origin, 200 mm thick, facing +X. Its frame maps
/// local x to world Y and local y to world Z.
fn wall(id: u64) -> HostSurface {
    HostSurface::wall(
        ElementId(id),
        Aabb::new(
            Point3::new(-100.0, -500.0, -500.0),
            Point3::new(100.0, 500.0, 500.0),
        ),
        Vector3::x(),
    )
    .unwrap()
}

/// Conduit running along world X through the wall at height `y`
fn conduit(id: u64, section: CrossSection, y: f64) -> ConduitSegment {
    let hw = section.width / 2.0;
    let hh = section.height / 2.0;
    ConduitSegment::new(
        ElementId(id),
        section,
        Vector3::x(),
        Point3::new(0.0, y, 0.0),
        Aabb::new(
            Point3::new(-500.0, y - hw, -hh),
            Point3::new(500.0, y + hw, hh),
        ),
    )
}

#[test]
fn test_clustering_example_three_candidates() {
    // A 100x100 at local (0,0), B 100x100 at (80,0), C 50x50 at (300,0):
    // A and B overlap on x (30..50) and merge, C stays alone
    let hosts = vec![wall(1)];
    let conduits = vec![
        conduit(10, CrossSection::square(100.0), 0.0),
        conduit(11, CrossSection::square(100.0), 80.0),
        conduit(12, CrossSection::square(50.0), 300.0),
    ];
    let config = AnalysisConfig::new()
        .with_clearance(0.0)
        .with_merge_threshold(10.0);
    let outcome = run_pass(&hosts, &conduits, &config);

    assert_eq!(outcome.stats.crossings, 3);
    assert_eq!(outcome.stats.clusters, 1);
    assert_eq!(outcome.stats.openings, 2);
    assert_eq!(outcome.stats.discarded(), 0);

    let merged = &outcome.openings[0];
    assert!(merged.is_merged());
    assert_eq!(merged.size, OpeningSize::new(180.0, 100.0));
    assert_eq!(merged.label, "rect 180x100");
    assert_eq!(merged.sources, vec![ElementId(10), ElementId(11)]);
    // Union centroid local (40, 0), projected onto the +X face
    assert_relative_eq!(merged.placement_point(), Point3::new(100.0, 40.0, 0.0));
    assert_relative_eq!(merged.reference_direction(), Vector3::y());

    let standalone = &outcome.openings[1];
    assert!(!standalone.is_merged());
    assert_eq!(standalone.size, OpeningSize::new(50.0, 50.0));
    assert_eq!(standalone.label, "square 50x50");
    assert_eq!(standalone.sources, vec![ElementId(12)]);
    assert_relative_eq!(standalone.placement_point(), Point3::new(100.0, 300.0, 0.0));
}

#[test]
fn test_round_up_properties() {
    assert_eq!(round_up_5(172.0), 175.0);
    assert_eq!(round_up_5(200.0), 200.0);
    assert_eq!(round_up_5(0.0), 0.0);

    let mut v = 0.0;
    while v < 500.0 {
        let r = round_up_5(v);
        assert!(r >= v);
        assert!(r - v < 5.0);
        assert_relative_eq!(r % 5.0, 0.0, epsilon = 1e-9);
        v += 0.37;
    }
}

#[test]
fn test_perpendicular_circular_gets_square_opening() {
    let hosts = vec![wall(1)];
    let conduits = vec![conduit(2, CrossSection::circular(150.0), 0.0)];
    let config = AnalysisConfig::new().with_clearance(25.0);
    let outcome = run_pass(&hosts, &conduits, &config);

    assert_eq!(outcome.openings.len(), 1);
    assert_eq!(outcome.openings[0].size, OpeningSize::new(200.0, 200.0));
    assert_eq!(outcome.openings[0].label, "square 200x200");
}

#[test]
fn test_oblique_circular_elongates_up() {
    // Axis 30 degrees off the wall normal, leaning along world Z (local Up)
    let theta = 30f64.to_radians();
    let axis = Vector3::new(theta.cos(), 0.0, theta.sin());
    let pipe = ConduitSegment::new(
        ElementId(2),
        CrossSection::circular(100.0),
        axis,
        Point3::origin(),
        Aabb::new(
            Point3::new(-500.0, -60.0, -300.0),
            Point3::new(500.0, 60.0, 300.0),
        ),
    );
    let config = AnalysisConfig::new().with_clearance(25.0);
    let outcome = run_pass(&[wall(1)], &[pipe], &config);

    assert_eq!(outcome.openings.len(), 1);
    // Right stays 100 + 50; Up is 100/cos30 + 50 = 165.47, rounded up to 170
    assert_eq!(outcome.openings[0].size, OpeningSize::new(150.0, 170.0));
    assert_eq!(outcome.openings[0].label, "rect 150x170");
}

#[test]
fn test_cluster_contains_members() {
    let hosts = vec![wall(1)];
    let conduits = vec![
        conduit(10, CrossSection::square(100.0), 0.0),
        conduit(11, CrossSection::square(100.0), 80.0),
        conduit(12, CrossSection::square(50.0), 300.0),
    ];
    let frame = hosts[0].frame;

    let unmerged = run_pass(&hosts, &conduits, &AnalysisConfig::new().with_clearance(0.0));
    let merged = run_pass(
        &hosts,
        &conduits,
        &AnalysisConfig::new().with_clearance(0.0).with_merge_threshold(10.0),
    );

    let rect_of = |opening: &provoid_analysis::Opening| {
        let lp = frame.to_local_point(&opening.placement_point());
        LocalRect::centered(lp.x, lp.y, opening.size.width, opening.size.height)
    };

    let union = rect_of(&merged.openings[0]);
    for single in unmerged
        .openings
        .iter()
        .filter(|o| merged.openings[0].sources.contains(&o.sources[0]))
    {
        assert!(union.contains(&rect_of(single)));
    }
}

#[test]
fn test_merging_merged_output_changes_nothing() {
    let hosts = vec![wall(1)];
    let host = &hosts[0];
    let conduits = vec![
        conduit(10, CrossSection::square(100.0), 0.0),
        conduit(11, CrossSection::square(100.0), 80.0),
        conduit(12, CrossSection::square(50.0), 300.0),
    ];
    let config = AnalysisConfig::new()
        .with_clearance(0.0)
        .with_merge_threshold(10.0);
    let outcome = run_pass(&hosts, &conduits, &config);

    // Feed the final openings back in as plain rectangles
    let records: Vec<IntersectionRecord> = outcome
        .openings
        .iter()
        .map(|o| {
            let lp = host.frame.to_local_point(&o.placement_point());
            IntersectionRecord {
                host: host.id,
                conduit: o.sources[0],
                world_point: o.placement_point(),
                local_point: Point3::new(lp.x, lp.y, 0.0),
                local_axis: Vector3::z(),
                section: CrossSection::rectangular(o.size.width, o.size.height),
                opening: o.size,
                label: Arc::from(o.label.as_str()),
                diagonal: false,
                gap: None,
            }
        })
        .collect();

    let again = merge_host(host, records, &config, &mut LabelCache::new());
    assert_eq!(again.len(), outcome.openings.len());
    assert!(again.iter().all(|c| !c.is_merged()));
}

#[test]
fn test_conduit_order_does_not_change_output() {
    let hosts = vec![wall(1)];
    let forward = vec![
        conduit(10, CrossSection::square(100.0), 0.0),
        conduit(11, CrossSection::square(100.0), 80.0),
        conduit(12, CrossSection::square(50.0), 300.0),
    ];
    let shuffled = vec![forward[2].clone(), forward[0].clone(), forward[1].clone()];
    let config = AnalysisConfig::new()
        .with_clearance(0.0)
        .with_merge_threshold(10.0);

    let a = run_pass(&hosts, &forward, &config);
    let b = run_pass(&hosts, &shuffled, &config);
    assert_eq!(a.openings, b.openings);
    assert_eq!(a.stats.clusters, b.stats.clusters);
}

#[test]
fn test_grazing_dropped_at_04_kept_at_06() {
    // |axis . normal| = 0.4 for the first pipe, 0.6 for the second
    let grazing = ConduitSegment::new(
        ElementId(2),
        CrossSection::circular(100.0),
        Vector3::new(0.4, (1.0 - 0.4f64 * 0.4).sqrt(), 0.0),
        Point3::new(0.0, -200.0, 0.0),
        Aabb::new(
            Point3::new(-200.0, -400.0, -50.0),
            Point3::new(200.0, 0.0, 50.0),
        ),
    );
    let puncturing = ConduitSegment::new(
        ElementId(3),
        CrossSection::circular(100.0),
        Vector3::new(0.6, 0.8, 0.0),
        Point3::new(0.0, 200.0, 0.0),
        Aabb::new(
            Point3::new(-200.0, 0.0, -50.0),
            Point3::new(200.0, 400.0, 50.0),
        ),
    );
    let outcome = run_pass(
        &[wall(1)],
        &[grazing, puncturing],
        &AnalysisConfig::default(),
    );

    assert_eq!(outcome.stats.dropped_grazing, 1);
    assert_eq!(outcome.openings.len(), 1);
    assert_eq!(outcome.openings[0].sources, vec![ElementId(3)]);
}

#[test]
fn test_door_zone_suppresses_opening() {
    let host = wall(1).with_exclusions(vec![ExclusionZone::new(
        ElementId(40),
        Aabb::new(
            Point3::new(-100.0, -450.0, -500.0),
            Point3::new(100.0, 450.0, 400.0),
        ),
    )]);
    let conduits = vec![conduit(2, CrossSection::circular(100.0), 0.0)];
    let outcome = run_pass(&[host], &conduits, &AnalysisConfig::default());

    assert!(outcome.openings.is_empty());
    assert_eq!(outcome.stats.dropped_excluded, 1);
    assert!(outcome
        .trace
        .iter()
        .any(|line| line.contains("exclusion zone #40")));
}

#[test]
fn test_slab_vertical_pipe() {
    let slab = HostSurface::slab(
        ElementId(1),
        Aabb::new(
            Point3::new(-1000.0, -1000.0, -150.0),
            Point3::new(1000.0, 1000.0, 150.0),
        ),
    )
    .unwrap();
    let riser = ConduitSegment::new(
        ElementId(2),
        CrossSection::circular(100.0),
        Vector3::z(),
        Point3::new(200.0, 300.0, 0.0),
        Aabb::new(
            Point3::new(150.0, 250.0, -2000.0),
            Point3::new(250.0, 350.0, 2000.0),
        ),
    );
    let outcome = run_pass(&[slab], &[riser], &AnalysisConfig::default());

    assert_eq!(outcome.openings.len(), 1);
    let opening = &outcome.openings[0];
    assert_eq!(opening.size, OpeningSize::new(200.0, 200.0));
    assert_eq!(opening.face.side, FaceSide::Positive);
    assert_relative_eq!(opening.placement_point(), Point3::new(200.0, 300.0, 150.0));
    assert_relative_eq!(opening.reference_direction(), Vector3::x());
}

#[test]
fn test_linked_model_conduit() {
    use provoid_core::nalgebra::Matrix4;

    // Authored 5 m off in its own model, placed onto the wall by the link
    let linked = conduit(2, CrossSection::circular(100.0), 5000.0).with_source_transform(
        Matrix4::new_translation(&Vector3::new(0.0, -5000.0, 0.0)),
    );
    let outcome = run_pass(&[wall(1)], &[linked], &AnalysisConfig::default());

    assert_eq!(outcome.openings.len(), 1);
    assert_relative_eq!(
        outcome.openings[0].placement_point(),
        Point3::new(100.0, 0.0, 0.0)
    );
}

#[test]
fn test_outputs_serialize() {
    let hosts = vec![wall(1)];
    let conduits = vec![
        conduit(10, CrossSection::square(100.0), 0.0),
        conduit(11, CrossSection::square(100.0), 80.0),
    ];
    let config = AnalysisConfig::new()
        .with_clearance(0.0)
        .with_merge_threshold(10.0);
    let outcome = run_pass(&hosts, &conduits, &config);

    let json = serde_json::to_string(&outcome.openings).unwrap();
    let back: Vec<provoid_analysis::Opening> = serde_json::from_str(&json).unwrap();
    assert_eq!(back, outcome.openings);
    assert!(json.contains("rect 180x100"));

    let stats_json = serde_json::to_string(&outcome.stats).unwrap();
    let stats: provoid_analysis::PassStats = serde_json::from_str(&stats_json).unwrap();
    assert_eq!(stats, outcome.stats);

    let config_json = serde_json::to_string(&config).unwrap();
    let config_back: AnalysisConfig = serde_json::from_str(&config_json).unwrap();
    assert_eq!(config_back, config);
}
