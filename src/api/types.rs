//! API request and response types.
//!
//! Capacity field names follow the station sheet conventions the map
//! frontend already consumes (`max_capacity`, `remaining_safe`, ...).

use serde::{Deserialize, Serialize};

use crate::engine::classifier::tier_label;
use crate::engine::{
    Briefing, CapacitySource, ConnectionType, FeasibilityRequest, FeasibilityResult, Locale,
    Recommendation, TrafficLight, VoltageTier,
};
use crate::grid::GridDataset;

/// Body of `POST /check-feasibility` and `POST /briefing`.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckFeasibilityBody {
    /// Latitude (degrees).
    pub lat: f64,
    /// Longitude (degrees).
    pub lon: f64,
    /// Requested power (kW).
    pub kw_requested: f64,
    /// `load`/`consumer` or `feed-in`/`producer`.
    #[serde(rename = "type")]
    pub connection_type: ConnectionType,
    /// Output language; the configured default when absent.
    #[serde(default)]
    pub lang: Option<Locale>,
}

impl CheckFeasibilityBody {
    /// The engine request this body describes.
    pub fn to_request(&self) -> FeasibilityRequest {
        FeasibilityRequest {
            lat: self.lat,
            lon: self.lon,
            kw_requested: self.kw_requested,
            connection_type: self.connection_type,
        }
    }
}

/// Feasibility answer.
#[derive(Debug, Serialize)]
pub struct FeasibilityResponse {
    /// Closest local station.
    pub nearest_station_id: String,
    /// Distance to it, rounded to centimeters (m).
    pub distance_meters: f64,
    /// Station latitude.
    pub station_lat: f64,
    /// Station longitude.
    pub station_lon: f64,
    /// Station or substation whose capacity was checked.
    pub resolved_facility_id: String,
    /// Localized tier name.
    pub grid_level: String,
    /// Tier used for the capacity check.
    pub voltage_tier: VoltageTier,
    /// Tier implied by the requested power.
    pub nominal_tier: VoltageTier,
    /// Whether a saturated station pushed the check upstream.
    pub escalated: bool,
    /// Where the capacity figures come from.
    pub capacity_source: CapacitySource,
    /// Maximum capacity (kW).
    pub max_capacity: f64,
    /// Connected PV load (kW).
    pub current_load_pv: f64,
    /// Remaining capacity before derating (kW).
    pub remaining_raw: f64,
    /// Remaining capacity after derating (kW).
    pub remaining_safe: f64,
    /// Verdict.
    pub status: TrafficLight,
    /// Same verdict under the result field name the map frontend reads.
    pub traffic_light: TrafficLight,
    pub message: String,
    pub timeline: String,
    pub next_steps: String,
    /// Connection kind for the tier.
    pub connection_note: String,
    /// Suggestions, highest priority first.
    pub recommendations: Vec<Recommendation>,
    /// 0-100.
    pub eco_score: u8,
    /// Echo of the request.
    pub kw_requested: f64,
    /// Echo of the request type.
    pub request_type: ConnectionType,
    /// Language of the text fields.
    pub lang: Locale,
}

impl From<&FeasibilityResult> for FeasibilityResponse {
    fn from(r: &FeasibilityResult) -> Self {
        Self {
            nearest_station_id: r.local_facility_id.clone(),
            distance_meters: (r.distance_m * 100.0).round() / 100.0,
            station_lat: r.facility_position.lat,
            station_lon: r.facility_position.lon,
            resolved_facility_id: r.resolved_facility_id().to_string(),
            grid_level: tier_label(r.tier).get(r.locale).to_string(),
            voltage_tier: r.tier,
            nominal_tier: r.nominal_tier,
            escalated: r.escalated,
            capacity_source: r.capacity.source,
            max_capacity: r.capacity.max_capacity_kw,
            current_load_pv: r.capacity.current_load_kw,
            remaining_raw: r.capacity.remaining_raw_kw,
            remaining_safe: r.capacity.remaining_safe_kw,
            status: r.traffic_light,
            traffic_light: r.traffic_light,
            message: r.message.clone(),
            timeline: r.timeline.clone(),
            next_steps: r.next_steps.clone(),
            connection_note: r.connection_note.clone(),
            recommendations: r.recommendations.clone(),
            eco_score: r.eco_score,
            kw_requested: r.kw_requested,
            request_type: r.connection_type,
            lang: r.locale,
        }
    }
}

/// Feasibility answer plus the applicant briefing.
#[derive(Debug, Serialize)]
pub struct BriefingResponse {
    pub result: FeasibilityResponse,
    pub briefing: Briefing,
}

/// `GET /` liveness message.
#[derive(Debug, Serialize)]
pub struct RootResponse {
    pub message: &'static str,
}

/// `GET /health` dataset summary.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub facilities: usize,
    pub locatable_facilities: usize,
    pub upstream_facilities: usize,
    pub topology_links: usize,
}

impl From<&GridDataset> for HealthResponse {
    fn from(ds: &GridDataset) -> Self {
        Self {
            status: "ok",
            facilities: ds.facilities().len(),
            locatable_facilities: ds.locatable_count(),
            upstream_facilities: ds.upstream_facilities().len(),
            topology_links: ds.topology_len(),
        }
    }
}

/// JSON error body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Machine-readable error kind.
    pub error: String,
    /// Human-readable description.
    pub message: String,
}
