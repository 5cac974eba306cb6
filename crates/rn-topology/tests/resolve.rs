//! Integration tests for topology resolution.

use geo::{LineString, Point};
use proptest::prelude::*;
use rn_core::geometry::{end_point, start_point};
use rn_core::ReachId;
use rn_topology::{RawReach, Resolution, ResolverOptions, TopologyResolver};

fn line(coords: &[(f64, f64)]) -> LineString<f64> {
    LineString::from(coords.to_vec())
}

fn resolve(reaches: Vec<RawReach>, outlets: &[Point<f64>]) -> Resolution {
    TopologyResolver::new(ResolverOptions::default())
        .unwrap()
        .resolve(reaches, outlets)
}

fn assert_oriented(res: &Resolution) {
    for reach in res.resolved_reaches() {
        let start = &res.nodes[reach.start.unwrap().as_usize()];
        let end = &res.nodes[reach.end.unwrap().as_usize()];
        assert_eq!(start_point(&reach.geometry), Some(start.point), "{}", reach.reach_id);
        assert_eq!(end_point(&reach.geometry), Some(end.point), "{}", reach.reach_id);
    }
}

#[test]
fn junction_with_branch_drawn_the_wrong_way() {
    // A -> B, B -> C, B -> D as drawn; only C is on the coast.
    let a = (0.0, 20.0);
    let b = (0.0, 10.0);
    let c = (0.0, 0.0);
    let d = (10.0, 15.0);
    let reaches = vec![
        RawReach::new("AB", 6224, line(&[a, b])),
        RawReach::new("BC", 6224, line(&[b, c])),
        RawReach::new("BD", 6225, line(&[b, (5.0, 12.0), d])),
    ];
    let res = resolve(reaches, &[Point::from(c)]);

    assert!(res.report.is_complete());
    assert!(res.report.ambiguous.is_empty());
    assert_eq!(res.nodes.len(), 4, "C, B, A and D");
    assert_oriented(&res);

    let bd = &res.reaches[2];
    assert!(bd.reversed);
    assert_eq!(start_point(&bd.geometry), Some(Point::from(d)));
    assert_eq!(bd.end, res.reaches[1].start, "BD now drains into B");
    assert!(!res.reaches[0].reversed);
    assert!(!res.reaches[1].reversed);
    assert_eq!(res.report.iterations, 2);
}

#[test]
fn isolated_reach_is_reported_not_dropped() {
    let reaches = vec![
        RawReach::new("main", 0, line(&[(0.0, 10.0), (0.0, 0.0)])),
        RawReach::new("island", 0, line(&[(50.0, 50.0), (60.0, 60.0)])),
        RawReach::new("island-2", 0, line(&[(60.0, 60.0), (70.0, 50.0)])),
    ];
    let res = resolve(reaches, &[Point::new(0.0, 0.0)]);

    assert!(!res.report.is_complete());
    assert_eq!(
        res.report.unresolved,
        vec![ReachId::from("island"), ReachId::from("island-2")]
    );
    // Zero-progress stop: one productive pass, one empty pass
    assert_eq!(res.report.iterations, 2);

    let network = res.to_network().unwrap();
    assert_eq!(network.reaches().len(), 1);
}

#[test]
fn no_outlets_resolves_nothing() {
    let reaches = vec![RawReach::new("r", 0, line(&[(0.0, 1.0), (0.0, 0.0)]))];
    let res = resolve(reaches, &[]);

    assert_eq!(res.report.unresolved.len(), 1);
    assert_eq!(res.report.iterations, 1);
    assert!(res.nodes.is_empty());
}

#[test]
fn exact_matching_misses_near_miss_that_tolerance_catches() {
    let reaches = vec![
        RawReach::new("low", 0, line(&[(0.0, 10.0), (0.0, 0.0)])),
        RawReach::new("high", 0, line(&[(0.0, 20.0), (0.0, 10.0004)])),
    ];
    let outlets = [Point::new(0.0, 0.0)];

    let exact = resolve(reaches.clone(), &outlets);
    assert_eq!(exact.report.unresolved, vec![ReachId::from("high")]);

    let tolerant = TopologyResolver::new(ResolverOptions {
        touch_tolerance: 0.001,
        ..Default::default()
    })
    .unwrap()
    .resolve(reaches, &outlets);
    assert!(tolerant.report.is_complete());
    assert_eq!(tolerant.nodes.len(), 3);
    assert!(tolerant.to_network().is_ok());
}

#[test]
fn tiny_tolerance_in_projected_coordinates() {
    let reaches = vec![
        RawReach::new("low", 0, line(&[(400_000.0, 300_100.0), (400_000.0, 300_000.0)])),
        RawReach::new("high", 0, line(&[(400_000.0, 300_100.0), (400_050.0, 300_200.0)])),
    ];
    let res = TopologyResolver::new(ResolverOptions {
        touch_tolerance: 1e-15,
        ..Default::default()
    })
    .unwrap()
    .resolve(reaches, &[Point::new(400_000.0, 300_000.0)]);

    assert!(res.report.is_complete());
    assert_eq!(res.nodes.len(), 3);
    assert_oriented(&res);
    assert!(res.to_network().is_ok());
}

/// Random dendritic network: node 0 is the outlet, node i > 0 drains into
/// a parent with a smaller index. Extra links join arbitrary node pairs.
fn river_tree() -> impl Strategy<Value = (Vec<RawReach>, Point<f64>, usize)> {
    (2usize..40)
        .prop_flat_map(|n| {
            (
                Just(n),
                prop::collection::vec(any::<prop::sample::Index>(), n - 1),
                prop::collection::vec(any::<bool>(), n - 1),
                prop::collection::vec((any::<prop::sample::Index>(), any::<prop::sample::Index>()), 0..5),
            )
        })
        .prop_map(|(n, parents, flips, links)| {
            let point = |i: usize| (i as f64 * 10.0, ((i * 37) % 101) as f64);
            let mut reaches = Vec::new();
            for i in 1..n {
                let parent = parents[i - 1].index(i);
                let (child_xy, parent_xy) = (point(i), point(parent));
                let mut coords = vec![child_xy, parent_xy];
                if flips[i - 1] {
                    coords.reverse();
                }
                reaches.push(RawReach::new(format!("t{i}"), 6224, line(&coords)));
            }
            for (k, (a, b)) in links.iter().enumerate() {
                let (a, b) = (a.index(n), b.index(n));
                if a == b {
                    continue;
                }
                let (pa, pb) = (point(a), point(b));
                let mid = ((pa.0 + pb.0) / 2.0, (pa.1 + pb.1) / 2.0 + 1.0);
                reaches.push(RawReach::new(format!("l{k}"), 6225, line(&[pa, mid, pb])));
            }
            (reaches, Point::from(point(0)), n)
        })
}

proptest! {
    #[test]
    fn every_connected_reach_resolves_acyclic_and_oriented((reaches, outlet, n) in river_tree()) {
        let count = reaches.len();
        let res = resolve(reaches, &[outlet]);

        prop_assert!(res.report.is_complete());
        prop_assert_eq!(res.resolved_reaches().count(), count);
        prop_assert_eq!(res.nodes.len(), n);
        for reach in res.resolved_reaches() {
            prop_assert!(reach.start.unwrap() > reach.end.unwrap());
        }
        assert_oriented(&res);

        // Builder re-checks orientation and rejects any cycle
        prop_assert!(res.to_network().is_ok());
    }
}
