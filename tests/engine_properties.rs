//! Property-based and scenario tests for the launch query engine.

use std::sync::Arc;

use launch_dash::{
    Breakdown, LaunchDataset, LaunchQueryEngine, LaunchRecord, LaunchSite, Outcome, PayloadRange,
    QueryError, SiteSelector,
};
use proptest::prelude::*;

fn record_strategy() -> impl Strategy<Value = LaunchRecord> {
    (
        prop::sample::select(LaunchSite::ALL.to_vec()),
        0.0f64..10_000.0,
        prop::sample::select(vec!["v1.0", "v1.1", "FT", "B4", "B5"]),
        any::<bool>(),
    )
        .prop_map(|(site, mass, category, ok)| {
            let outcome = if ok { Outcome::Success } else { Outcome::Failure };
            LaunchRecord::new(site, mass.round(), category, outcome)
        })
}

fn engine_strategy() -> impl Strategy<Value = LaunchQueryEngine> {
    prop::collection::vec(record_strategy(), 0..60)
        .prop_map(|records| LaunchQueryEngine::new(LaunchDataset::new(records).unwrap()))
}

fn selector_strategy() -> impl Strategy<Value = SiteSelector> {
    prop_oneof![
        Just(SiteSelector::All),
        prop::sample::select(LaunchSite::ALL.to_vec()).prop_map(SiteSelector::Site),
    ]
}

// ── Breakdown invariants ─────────────────────────────────────────────

proptest! {
    /// All-sites values sum to the dataset's total success count.
    #[test]
    fn all_sites_sum_equals_total_successes(engine in engine_strategy()) {
        let expected = engine
            .dataset()
            .records()
            .iter()
            .filter(|r| r.outcome.is_success())
            .count() as u64;
        let breakdown = engine.site_success_breakdown(SiteSelector::All);
        prop_assert_eq!(breakdown.total(), expected);

        let Breakdown::AllSites { successes } = breakdown else {
            return Err(TestCaseError::fail("expected all-sites breakdown"));
        };
        let keys: Vec<LaunchSite> = successes.keys().copied().collect();
        let present: Vec<LaunchSite> = engine.dataset().sites().into_iter().collect();
        prop_assert_eq!(keys, present);
    }

    /// Success plus failure equals the number of launches at the site.
    #[test]
    fn single_site_counts_cover_every_launch(
        engine in engine_strategy(),
        site in prop::sample::select(LaunchSite::ALL.to_vec()),
    ) {
        let attempts = engine.dataset().records().iter().filter(|r| r.site == site).count() as u64;
        match engine.site_success_breakdown(site.into()) {
            Breakdown::SingleSite { site: s, success, failure } => {
                prop_assert_eq!(s, site);
                prop_assert_eq!(success + failure, attempts);
            }
            other => return Err(TestCaseError::fail(format!("unexpected {other:?}"))),
        }
    }

    /// Every point lies in the range and the count matches an independent scan.
    #[test]
    fn points_respect_site_and_range(
        engine in engine_strategy(),
        selector in selector_strategy(),
        a in 0.0f64..10_000.0,
        b in 0.0f64..10_000.0,
    ) {
        let range = PayloadRange::new(a.min(b), a.max(b)).unwrap();
        let points = engine.payload_correlation_points(selector, range).unwrap();

        for p in &points {
            prop_assert!(range.min_kg <= p.payload_mass_kg && p.payload_mass_kg <= range.max_kg);
        }
        let expected = engine
            .dataset()
            .records()
            .iter()
            .filter(|r| selector.matches(r.site))
            .filter(|r| r.payload_mass_kg >= range.min_kg && r.payload_mass_kg <= range.max_kg)
            .count();
        prop_assert_eq!(points.len(), expected);
    }

    /// Repeated calls give identical results, order included.
    #[test]
    fn queries_are_idempotent(
        engine in engine_strategy(),
        selector in selector_strategy(),
    ) {
        prop_assert_eq!(
            engine.site_success_breakdown(selector),
            engine.site_success_breakdown(selector)
        );
        let range = PayloadRange::new(0.0, 10_000.0).unwrap();
        prop_assert_eq!(
            engine.payload_correlation_points(selector, range).unwrap(),
            engine.payload_correlation_points(selector, range).unwrap()
        );
    }

    /// Inverted ranges always fail, regardless of the data.
    #[test]
    fn inverted_ranges_fail(
        engine in engine_strategy(),
        lo in 0.0f64..5_000.0,
        gap in 0.001f64..5_000.0,
    ) {
        let range = PayloadRange { min_kg: lo + gap, max_kg: lo };
        let is_invalid_range = matches!(
            engine.payload_correlation_points(SiteSelector::All, range),
            Err(QueryError::InvalidRange { .. })
        );
        prop_assert!(is_invalid_range);
    }
}

// ── Scenarios ────────────────────────────────────────────────────────

fn three_launches() -> LaunchQueryEngine {
    LaunchQueryEngine::new(
        LaunchDataset::new(vec![
            LaunchRecord::new(LaunchSite::CcafsLc40, 500.0, "v1.0", Outcome::Success),
            LaunchRecord::new(LaunchSite::CcafsLc40, 1500.0, "v1.1", Outcome::Failure),
            LaunchRecord::new(LaunchSite::KscLc39a, 800.0, "FT", Outcome::Success),
        ])
        .unwrap(),
    )
}

#[test]
fn three_record_scenario() {
    let engine = three_launches();

    let Breakdown::AllSites { successes } = engine.site_success_breakdown(SiteSelector::All) else {
        panic!("expected all-sites breakdown");
    };
    assert_eq!(
        successes.into_iter().collect::<Vec<_>>(),
        vec![(LaunchSite::CcafsLc40, 1), (LaunchSite::KscLc39a, 1)]
    );

    assert_eq!(
        engine.site_success_breakdown(LaunchSite::CcafsLc40.into()),
        Breakdown::SingleSite {
            site: LaunchSite::CcafsLc40,
            success: 1,
            failure: 1
        }
    );

    let points = engine
        .payload_correlation_points(SiteSelector::All, PayloadRange::new(0.0, 1000.0).unwrap())
        .unwrap();
    let masses: Vec<f64> = points.iter().map(|p| p.payload_mass_kg).collect();
    assert_eq!(masses, vec![500.0, 800.0]);
}

#[test]
fn degenerate_range_on_exact_mass_includes_record() {
    let engine = three_launches();
    let points = engine
        .payload_correlation_points(SiteSelector::All, PayloadRange::new(1500.0, 1500.0).unwrap())
        .unwrap();
    assert_eq!(points.len(), 1);
    assert_eq!(points[0].outcome, Outcome::Failure);
}

#[test]
fn range_outside_all_masses_is_empty_not_error() {
    let engine = three_launches();
    let points = engine
        .payload_correlation_points(SiteSelector::All, PayloadRange::new(5000.0, 9000.0).unwrap())
        .unwrap();
    assert!(points.is_empty());
}

#[test]
fn malformed_queries_fail() {
    let engine = three_launches();
    assert!(matches!(
        engine.site_success_breakdown_for("nonexistent-site"),
        Err(QueryError::InvalidSelector(s)) if s == "nonexistent-site"
    ));
    assert!(matches!(
        engine.payload_correlation_points_for(
            "nonexistent-site",
            PayloadRange::new(0.0, 1.0).unwrap()
        ),
        Err(QueryError::InvalidSelector(_))
    ));
    assert!(matches!(
        engine.payload_correlation_points_for(
            "ALL",
            PayloadRange {
                min_kg: 5000.0,
                max_kg: 1000.0
            }
        ),
        Err(QueryError::InvalidRange { .. })
    ));
}

#[test]
fn engine_is_shareable_across_threads() {
    let engine = Arc::new(three_launches());
    let expected = engine.site_success_breakdown(SiteSelector::All);

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let engine = Arc::clone(&engine);
            std::thread::spawn(move || engine.site_success_breakdown(SiteSelector::All))
        })
        .collect();
    for h in handles {
        assert_eq!(h.join().unwrap(), expected);
    }
}
