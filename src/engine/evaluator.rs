//! Feasibility engine that orchestrates lookup, capacity check, and verdict.

use std::sync::Arc;

use crate::grid::{FacilityLocator, GridDataset, LinearScanLocator};

use super::capacity::assess_capacity;
use super::classifier::{classify, narrate};
use super::eco_score::eco_score;
use super::locale::Locale;
use super::recommend::{RecommendationContext, recommend};
use super::types::{
    FacilityStatus, FacilitySummary, FeasibilityRequest, FeasibilityResult, NoFacilityFound,
};

/// Decision engine over one immutable grid snapshot.
///
/// Generic over `L: FacilityLocator` for static dispatch. Holds the dataset
/// behind an `Arc` so clones are cheap and can be handed to worker threads;
/// evaluation never mutates anything.
#[derive(Debug, Clone)]
pub struct FeasibilityEngine<L: FacilityLocator = LinearScanLocator> {
    dataset: Arc<GridDataset>,
    locator: L,
}

impl FeasibilityEngine<LinearScanLocator> {
    /// Creates an engine with the linear-scan locator.
    pub fn new(dataset: Arc<GridDataset>) -> Self {
        Self::with_locator(dataset, LinearScanLocator)
    }
}

impl<L: FacilityLocator> FeasibilityEngine<L> {
    /// Creates an engine with a custom locator.
    ///
    /// # Arguments
    ///
    /// * `dataset` - Grid snapshot shared with other engines
    /// * `locator` - Nearest-facility strategy
    pub fn with_locator(dataset: Arc<GridDataset>, locator: L) -> Self {
        Self { dataset, locator }
    }

    /// The grid snapshot this engine reads.
    pub fn dataset(&self) -> &GridDataset {
        &self.dataset
    }

    /// Answers one feasibility request.
    ///
    /// The request is expected to have passed
    /// [`FeasibilityRequest::validate`]; the engine itself only looks up and
    /// classifies.
    ///
    /// # Errors
    ///
    /// Returns [`NoFacilityFound`] when the dataset has no facility with both
    /// a position and a remaining-safe capacity.
    pub fn evaluate(
        &self,
        request: &FeasibilityRequest,
        locale: Locale,
    ) -> Result<FeasibilityResult, NoFacilityFound> {
        // 1. Nearest local station
        let nearest = self
            .locator
            .nearest(&self.dataset, request.point())
            .ok_or(NoFacilityFound {
                lat: request.lat,
                lon: request.lon,
            })?;

        // 2. Tier and capacity figures, escalating upstream if needed
        let assessment = assess_capacity(&self.dataset, nearest.facility, request.kw_requested);
        let remaining_kw = assessment.figures.remaining_safe_kw;

        // 3. Verdict and narrative
        let reason = classify(
            remaining_kw,
            request.kw_requested,
            assessment.tier,
            request.connection_type,
        );
        let traffic_light = reason.traffic_light();
        let narrative = narrate(
            reason,
            assessment.tier,
            remaining_kw,
            request.kw_requested,
            locale,
        );

        // 4. Recommendations and score
        let ctx = RecommendationContext {
            remaining_kw,
            kw_requested: request.kw_requested,
            tier: assessment.tier,
            traffic_light,
        };
        let recommendations = recommend(&ctx, locale);
        let eco_score = eco_score(ctx.capacity_ratio(), &recommendations);

        tracing::debug!(
            facility = %nearest.facility.id,
            distance_m = nearest.distance_m,
            kw_requested = request.kw_requested,
            tier = %assessment.tier,
            escalated = assessment.escalated,
            remaining_kw,
            verdict = %traffic_light,
            ?reason,
            "feasibility evaluated"
        );

        Ok(FeasibilityResult {
            kw_requested: request.kw_requested,
            connection_type: request.connection_type,
            locale,
            local_facility_id: nearest.facility.id.clone(),
            facility_position: nearest.position,
            distance_m: nearest.distance_m,
            nominal_tier: assessment.nominal_tier,
            tier: assessment.tier,
            escalated: assessment.escalated,
            capacity: assessment.figures,
            traffic_light,
            message: narrative.message,
            timeline: narrative.timeline,
            next_steps: narrative.next_steps,
            connection_note: narrative.connection_note,
            recommendations,
            eco_score,
        })
    }

    /// Map markers for every facility with a position, in dataset order.
    pub fn list_facilities(&self) -> Vec<FacilitySummary> {
        self.dataset
            .facilities()
            .iter()
            .filter_map(|f| {
                let position = f.position?;
                let remaining = f.remaining_safe_capacity_kw.unwrap_or(0.0);
                Some(FacilitySummary {
                    id: f.id.clone(),
                    lat: position.lat,
                    lon: position.lon,
                    status: FacilityStatus::from_remaining_kw(remaining),
                    remaining_capacity: remaining,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::types::{ConnectionType, TrafficLight, VoltageTier};
    use crate::grid::{Facility, GeoPoint, NearestFacility, TopologyLink, UpstreamFacility};

    fn dataset() -> Arc<GridDataset> {
        Arc::new(GridDataset::new(
            vec![
                Facility {
                    id: "F1".into(),
                    position: Some(GeoPoint::new(49.14269, 9.21088)),
                    installed_capacity_kw: 630.0,
                    current_pv_load_kw: 12.0,
                    remaining_raw_capacity_kw: 618.0,
                    remaining_safe_capacity_kw: Some(600.0),
                    upstream_id: None,
                },
                Facility {
                    id: "hidden".into(),
                    position: None,
                    installed_capacity_kw: 400.0,
                    current_pv_load_kw: 0.0,
                    remaining_raw_capacity_kw: 400.0,
                    remaining_safe_capacity_kw: Some(280.0),
                    upstream_id: None,
                },
            ],
            vec![UpstreamFacility {
                id: "UW1".into(),
                available_feed_in_capacity_mw: 15.5,
            }],
            vec![TopologyLink {
                local_id: "F1".into(),
                upstream_id: "UW1".into(),
            }],
        ))
    }

    fn request(kw: f64, connection_type: ConnectionType) -> FeasibilityRequest {
        FeasibilityRequest {
            lat: 49.1427,
            lon: 9.2109,
            kw_requested: kw,
            connection_type,
        }
    }

    #[test]
    fn evaluates_small_feed_in_as_green() {
        let engine = FeasibilityEngine::new(dataset());
        let result = engine
            .evaluate(&request(50.0, ConnectionType::FeedIn), Locale::En)
            .expect("F1 is eligible");
        assert_eq!(result.local_facility_id, "F1");
        assert_eq!(result.tier, VoltageTier::LowHighLoad);
        assert_eq!(result.capacity.max_capacity_kw, 630.0);
        assert_eq!(result.traffic_light, TrafficLight::Green);
        assert!(result.distance_m < 50.0);
    }

    #[test]
    fn custom_locator_is_used() {
        struct NoneLocator;
        impl FacilityLocator for NoneLocator {
            fn nearest<'a>(&self, _: &'a GridDataset, _: GeoPoint) -> Option<NearestFacility<'a>> {
                None
            }
        }
        let engine = FeasibilityEngine::with_locator(dataset(), NoneLocator);
        let err = engine.evaluate(&request(5.0, ConnectionType::Load), Locale::En);
        assert_eq!(
            err,
            Err(NoFacilityFound {
                lat: 49.1427,
                lon: 9.2109
            })
        );
    }

    #[test]
    fn listing_skips_facilities_without_position() {
        let engine = FeasibilityEngine::new(dataset());
        let list = engine.list_facilities();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].id, "F1");
        assert_eq!(list[0].status, FacilityStatus::Green);
        assert_eq!(list[0].remaining_capacity, 600.0);
    }
}
