//! Integration tests for end-to-end feasibility decisions.

mod common;

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use grid_feasibility::engine::{
    CapacitySource, ConnectionType, FeasibilityEngine, FeasibilityRequest, Locale,
    NoFacilityFound, RecommendationKind, TrafficLight, UsageInsights, VoltageTier, brief,
};
use grid_feasibility::grid::{GeoPoint, GridDataset};

#[test]
fn small_feed_in_at_f1_is_green_on_low_voltage() {
    let engine = common::fixture_engine();
    let req = common::request_near(common::F1, 50.0, ConnectionType::FeedIn);
    let result = engine.evaluate(&req, Locale::En).expect("F1 is eligible");

    assert_eq!(result.local_facility_id, "F1");
    assert_eq!(result.tier, VoltageTier::LowHighLoad);
    assert!(!result.escalated);
    assert_eq!(result.capacity.source, CapacitySource::LocalFacility);
    assert_eq!(result.capacity.max_capacity_kw, 630.0);
    assert_eq!(result.traffic_light, TrafficLight::Green);
    assert_eq!(result.timeline, "2-4 weeks");
}

#[test]
fn medium_request_uses_upstream_capacity() {
    let engine = common::fixture_engine();
    let req = common::request_near(common::F1, 150.0, ConnectionType::Load);
    let result = engine.evaluate(&req, Locale::En).expect("F1 is eligible");

    assert_eq!(result.tier, VoltageTier::Medium);
    assert_eq!(result.resolved_facility_id(), "UW1");
    assert_eq!(result.capacity.max_capacity_kw, 15_500.0);
    assert_eq!(result.capacity.current_load_kw, 0.0);
    assert_eq!(result.traffic_light, TrafficLight::Green);
}

#[test]
fn saturated_station_without_upstream_is_red() {
    let engine = common::fixture_engine();
    let req = common::request_near(common::F_RED, 50.0, ConnectionType::FeedIn);
    let result = engine.evaluate(&req, Locale::En).expect("F-RED is eligible");

    assert_eq!(result.local_facility_id, "F-RED");
    assert_eq!(result.nominal_tier, VoltageTier::LowHighLoad);
    assert_eq!(result.tier, VoltageTier::Medium);
    assert!(result.escalated);
    assert_eq!(result.capacity.source, CapacitySource::UpstreamUnresolved);
    assert_eq!(result.capacity.remaining_safe_kw, 0.0);
    assert_eq!(result.traffic_light, TrafficLight::Red);
    assert_eq!(result.timeline, "6-12+ months");
    assert_eq!(result.recommendations[0].kind, RecommendationKind::Battery);
}

#[test]
fn thin_margin_is_yellow() {
    let engine = common::fixture_engine();
    let req = common::request_near(common::F_TIGHT, 50.0, ConnectionType::FeedIn);
    let result = engine.evaluate(&req, Locale::En).expect("F-TIGHT is eligible");

    assert_eq!(result.local_facility_id, "F-TIGHT");
    assert_eq!(result.capacity.remaining_safe_kw, 52.0);
    assert_eq!(result.traffic_light, TrafficLight::Yellow);
    assert_eq!(result.timeline, "1-3 months");
}

#[test]
fn empty_candidate_set_is_no_facility_found() {
    let dataset = GridDataset::new(
        vec![
            common::station("no-pos", None, Some(100.0)),
            common::station("no-cap", Some(common::F1), None),
        ],
        vec![],
        vec![],
    );
    let engine = FeasibilityEngine::new(Arc::new(dataset));
    let req = common::request_near(common::F1, 10.0, ConnectionType::Load);
    assert_eq!(
        engine.evaluate(&req, Locale::En),
        Err(NoFacilityFound {
            lat: req.lat,
            lon: req.lon
        })
    );
}

#[test]
fn large_low_voltage_load_needs_review() {
    let engine = common::fixture_engine();
    let req = common::request_near(common::F1, 50.0, ConnectionType::Load);
    let result = engine.evaluate(&req, Locale::En).expect("F1 is eligible");
    assert_eq!(result.traffic_light, TrafficLight::Yellow);
    assert_eq!(result.tier, VoltageTier::LowHighLoad);
}

#[test]
fn high_voltage_request_with_insufficient_upstream_is_red() {
    let engine = common::fixture_engine();
    let req = common::request_near(common::F1, 20_000.0, ConnectionType::FeedIn);
    let result = engine.evaluate(&req, Locale::En).expect("F1 is eligible");
    assert_eq!(result.tier, VoltageTier::High);
    assert_eq!(result.traffic_light, TrafficLight::Red);
}

#[test]
fn repeated_evaluation_is_deterministic() {
    let engine = common::fixture_engine();
    let req = common::request_near(common::F_TIGHT, 45.0, ConnectionType::FeedIn);
    let first = engine.evaluate(&req, Locale::De);
    for _ in 0..10 {
        assert_eq!(engine.evaluate(&req, Locale::De), first);
    }
}

#[test]
fn locale_changes_text_but_not_decision() {
    let engine = common::fixture_engine();
    let req = common::request_near(common::F_TIGHT, 50.0, ConnectionType::FeedIn);
    let en = engine.evaluate(&req, Locale::En).expect("eligible");
    let de = engine.evaluate(&req, Locale::De).expect("eligible");

    assert_eq!(en.traffic_light, de.traffic_light);
    assert_eq!(en.eco_score, de.eco_score);
    assert_eq!(
        en.recommendations.iter().map(|r| (r.kind, r.priority)).collect::<Vec<_>>(),
        de.recommendations.iter().map(|r| (r.kind, r.priority)).collect::<Vec<_>>()
    );
    assert_ne!(en.message, de.message);
    assert_eq!(de.timeline, "1-3 Monate");
}

#[test]
fn nearest_facility_is_minimal_for_random_points() {
    let engine = common::fixture_engine();
    let dataset = engine.dataset();
    let mut rng = StdRng::seed_from_u64(42);

    for _ in 0..500 {
        let point = GeoPoint::new(rng.random_range(48.8..49.5), rng.random_range(8.7..9.8));
        let req = FeasibilityRequest {
            lat: point.lat,
            lon: point.lon,
            kw_requested: 5.0,
            connection_type: ConnectionType::Load,
        };
        let result = engine.evaluate(&req, Locale::En).expect("fixture has stations");

        for f in dataset.facilities().iter().filter(|f| f.is_locatable()) {
            let pos = f.position.expect("locatable has position");
            assert!(
                result.distance_m <= point.distance_m(&pos) + 1e-6,
                "{} is closer to {point:?} than {}",
                f.id,
                result.local_facility_id
            );
        }
    }
}

#[test]
fn tier_never_decreases_with_power_at_a_fixed_point() {
    let engine = common::fixture_engine();
    let mut rng = StdRng::seed_from_u64(9);
    let mut kws: Vec<f64> = (0..300).map(|_| rng.random_range(0.5..40_000.0)).collect();
    kws.sort_by(f64::total_cmp);

    let mut prev = VoltageTier::LowStandard;
    for kw in kws {
        let req = common::request_near(common::F1, kw, ConnectionType::FeedIn);
        let result = engine.evaluate(&req, Locale::En).expect("eligible");
        assert!(result.nominal_tier >= prev, "nominal tier dropped at {kw} kW");
        prev = result.nominal_tier;
    }
}

#[test]
fn capacity_figures_are_never_negative() {
    let engine = common::fixture_engine();
    let mut rng = StdRng::seed_from_u64(3);
    for _ in 0..200 {
        let at = [common::F1, common::F_RED, common::F_TIGHT][rng.random_range(0..3)];
        let kw = rng.random_range(0.1..30_000.0);
        let req = common::request_near(at, kw, ConnectionType::FeedIn);
        let r = engine.evaluate(&req, Locale::En).expect("eligible");
        let c = &r.capacity;
        assert!(c.max_capacity_kw >= 0.0);
        assert!(c.current_load_kw >= 0.0);
        assert!(c.remaining_raw_kw >= 0.0);
        assert!(c.remaining_safe_kw >= 0.0);
        assert!(r.eco_score <= 100);
    }
}

#[test]
fn briefing_offers_alternatives_only_when_not_green() {
    let engine = common::fixture_engine();

    let green = engine
        .evaluate(&common::request_near(common::F1, 50.0, ConnectionType::FeedIn), Locale::En)
        .expect("eligible");
    let b = brief(&green);
    assert!(b.greeting.starts_with("Great news"));
    assert!(b.alternatives.is_empty());

    let red = engine
        .evaluate(&common::request_near(common::F_RED, 50.0, ConnectionType::FeedIn), Locale::De)
        .expect("eligible");
    let b = brief(&red);
    assert!(b.greeting.starts_with("Leider"));
    assert_eq!(b.alternatives.len(), 4);
    assert!(b.details.iter().any(|d| d.contains("F-RED")));
    assert!(b.to_string().contains("1. Leistung reduzieren"));
}

#[test]
fn insights_count_outcomes() {
    let engine = common::fixture_engine();
    let insights = UsageInsights::new();
    for (at, kw) in [(common::F1, 50.0), (common::F_RED, 50.0), (common::F_TIGHT, 50.0)] {
        let r = engine
            .evaluate(&common::request_near(at, kw, ConnectionType::FeedIn), Locale::En)
            .expect("eligible");
        insights.record(&r);
    }
    insights.record_not_found();

    let snap = insights.snapshot();
    assert_eq!(snap.evaluations, 4);
    assert_eq!(snap.not_found, 1);
    assert_eq!(snap.traffic_lights.green, 1);
    assert_eq!(snap.traffic_lights.yellow, 1);
    assert_eq!(snap.traffic_lights.red, 1);
    assert_eq!(snap.escalations, 1);
    assert_eq!(snap.tiers.medium, 1);
    assert_eq!(snap.tiers.low_high_load, 2);
    assert!((snap.total_requested_kw - 150.0).abs() < 1e-9);
}
