//! Request, verdict, and result types of the feasibility engine.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::locale::Locale;
use super::recommend::Recommendation;
use crate::grid::{GeoPoint, ServiceArea};

/// Lower bound of the "low (high load)" tier (kW).
pub const LOW_HIGH_LOAD_THRESHOLD_KW: f64 = 30.0;
/// Lower bound of the medium-voltage tier (kW).
pub const MEDIUM_VOLTAGE_THRESHOLD_KW: f64 = 135.0;
/// Lower bound of the high-voltage tier (kW).
pub const HIGH_VOLTAGE_THRESHOLD_KW: f64 = 20_000.0;

/// Voltage class of the prospective connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoltageTier {
    /// Low voltage, household-sized request (< 30 kW).
    LowStandard,
    /// Low voltage, high load (30 kW to < 135 kW).
    LowHighLoad,
    /// Medium voltage (135 kW to < 20 MW).
    Medium,
    /// High voltage (>= 20 MW).
    High,
}

impl VoltageTier {
    /// Nominal tier for a requested power.
    ///
    /// Monotonic non-decreasing in `kw_requested`.
    pub fn for_request(kw_requested: f64) -> Self {
        if kw_requested < LOW_HIGH_LOAD_THRESHOLD_KW {
            Self::LowStandard
        } else if kw_requested < MEDIUM_VOLTAGE_THRESHOLD_KW {
            Self::LowHighLoad
        } else if kw_requested < HIGH_VOLTAGE_THRESHOLD_KW {
            Self::Medium
        } else {
            Self::High
        }
    }

    /// Both low tiers share the local facility as capacity source.
    pub fn is_low(self) -> bool {
        matches!(self, Self::LowStandard | Self::LowHighLoad)
    }

    /// Stable machine-readable name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::LowStandard => "low_standard",
            Self::LowHighLoad => "low_high_load",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl fmt::Display for VoltageTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Direction of the connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConnectionType {
    /// Consumption: EV charging, heat pumps, other loads.
    #[serde(rename = "load", alias = "consumer")]
    Load,
    /// Generation fed into the grid, typically PV.
    #[serde(rename = "feed-in", alias = "producer", alias = "feed_in")]
    FeedIn,
}

impl FromStr for ConnectionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "load" | "consumer" => Ok(Self::Load),
            "feed-in" | "feed_in" | "producer" => Ok(Self::FeedIn),
            other => Err(format!(
                "unknown connection type \"{other}\" (expected \"load\" or \"feed-in\")"
            )),
        }
    }
}

impl fmt::Display for ConnectionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Load => "load",
            Self::FeedIn => "feed-in",
        })
    }
}

/// Three-state feasibility verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrafficLight {
    /// Feasible with a standard application.
    Green,
    /// Feasible after review.
    Yellow,
    /// Not feasible without grid expansion.
    Red,
}

impl fmt::Display for TrafficLight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Green => "green",
            Self::Yellow => "yellow",
            Self::Red => "red",
        })
    }
}

/// A single feasibility question.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeasibilityRequest {
    /// Query latitude (degrees).
    pub lat: f64,
    /// Query longitude (degrees).
    pub lon: f64,
    /// Requested power (kW, > 0).
    pub kw_requested: f64,
    /// Load or feed-in.
    pub connection_type: ConnectionType,
}

impl FeasibilityRequest {
    /// The query position.
    pub fn point(&self) -> GeoPoint {
        GeoPoint::new(self.lat, self.lon)
    }

    /// Rejects requests the engine must never see.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError::InvalidCoordinate`] for non-finite or
    /// out-of-area positions and [`RequestError::InvalidPower`] for a
    /// non-positive or non-finite power.
    pub fn validate(&self, area: &ServiceArea) -> Result<(), RequestError> {
        if !self.lat.is_finite() || !self.lon.is_finite() || !area.contains(self.point()) {
            return Err(RequestError::InvalidCoordinate {
                lat: self.lat,
                lon: self.lon,
            });
        }
        if !self.kw_requested.is_finite() || self.kw_requested <= 0.0 {
            return Err(RequestError::InvalidPower(self.kw_requested));
        }
        Ok(())
    }
}

/// Request rejected at the boundary, before any lookup.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RequestError {
    /// Position is outside the service area or not a number.
    #[error("coordinate ({lat}, {lon}) is outside the service area")]
    InvalidCoordinate {
        /// Rejected latitude.
        lat: f64,
        /// Rejected longitude.
        lon: f64,
    },
    /// Requested power is not a positive number.
    #[error("requested power must be a positive number of kW, got {0}")]
    InvalidPower(f64),
}

/// No facility with a position and a remaining-safe capacity exists.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
#[error("no grid facility found near ({lat}, {lon})")]
pub struct NoFacilityFound {
    /// Query latitude.
    pub lat: f64,
    /// Query longitude.
    pub lon: f64,
}

/// Which dataset the capacity figures of a result come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CapacitySource {
    /// The local facility's own figures.
    LocalFacility,
    /// The upstream facility's available feed-in capacity.
    UpstreamFacility,
    /// Upstream capacity was required but could not be resolved; all zero.
    UpstreamUnresolved,
}

/// Capacity figures attached to a verdict (all kW, all >= 0).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CapacityFigures {
    /// Facility the figures belong to (local or upstream).
    pub facility_id: String,
    /// Where the figures come from.
    pub source: CapacitySource,
    /// Installed or available maximum capacity.
    pub max_capacity_kw: f64,
    /// Load already connected.
    pub current_load_kw: f64,
    /// Remaining capacity before derating.
    pub remaining_raw_kw: f64,
    /// Remaining capacity after derating; this drives the verdict.
    pub remaining_safe_kw: f64,
}

/// Complete answer to one [`FeasibilityRequest`].
///
/// Built fresh per request and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeasibilityResult {
    /// Echo of the requested power (kW).
    pub kw_requested: f64,
    /// Echo of the connection type.
    pub connection_type: ConnectionType,
    /// Language of the narrative fields.
    pub locale: Locale,
    /// Closest local facility.
    pub local_facility_id: String,
    /// Normalized position of the closest local facility.
    pub facility_position: GeoPoint,
    /// Distance from the query point to the local facility (m).
    pub distance_m: f64,
    /// Tier implied by the requested power alone.
    pub nominal_tier: VoltageTier,
    /// Tier actually used for the capacity check.
    pub tier: VoltageTier,
    /// `true` when a saturated local facility pushed the request upstream.
    pub escalated: bool,
    /// Capacity figures for `tier`.
    pub capacity: CapacityFigures,
    /// Verdict.
    pub traffic_light: TrafficLight,
    /// Headline for the applicant.
    pub message: String,
    /// Expected processing time.
    pub timeline: String,
    /// What the applicant should do next.
    pub next_steps: String,
    /// Kind of connection the tier implies.
    pub connection_note: String,
    /// Suggestions, highest priority first.
    pub recommendations: Vec<Recommendation>,
    /// 0-100 indicator.
    pub eco_score: u8,
}

impl FeasibilityResult {
    /// Id of the facility whose capacity was checked.
    pub fn resolved_facility_id(&self) -> &str {
        &self.capacity.facility_id
    }
}

impl fmt::Display for FeasibilityResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Feasibility ---")?;
        writeln!(
            f,
            "Request:            {:.1} kW {}",
            self.kw_requested, self.connection_type
        )?;
        writeln!(
            f,
            "Nearest station:    {} ({:.0} m)",
            self.local_facility_id, self.distance_m
        )?;
        write!(f, "Voltage tier:       {}", self.tier)?;
        if self.escalated {
            write!(f, " (escalated from {})", self.nominal_tier)?;
        }
        writeln!(f)?;
        writeln!(f, "Capacity facility:  {}", self.capacity.facility_id)?;
        writeln!(f, "Max capacity:       {:.1} kW", self.capacity.max_capacity_kw)?;
        writeln!(f, "Remaining (safe):   {:.1} kW", self.capacity.remaining_safe_kw)?;
        writeln!(f, "Traffic light:      {}", self.traffic_light)?;
        writeln!(f, "Message:            {}", self.message)?;
        writeln!(f, "Timeline:           {}", self.timeline)?;
        writeln!(f, "Next steps:         {}", self.next_steps)?;
        writeln!(f, "Eco score:          {}/100", self.eco_score)?;
        for rec in &self.recommendations {
            writeln!(f, "  [{}] {}", rec.priority, rec.title)?;
        }
        Ok(())
    }
}

/// Map status of a facility derived from its remaining-safe capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FacilityStatus {
    /// More than 100 kW left.
    Green,
    /// Some capacity left.
    Yellow,
    /// Nothing left.
    Red,
}

impl FacilityStatus {
    /// Presentation status for a remaining-safe capacity.
    pub fn from_remaining_kw(remaining_kw: f64) -> Self {
        if remaining_kw > 100.0 {
            Self::Green
        } else if remaining_kw > 0.0 {
            Self::Yellow
        } else {
            Self::Red
        }
    }

    /// Lowercase name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Green => "green",
            Self::Yellow => "yellow",
            Self::Red => "red",
        }
    }
}

/// One map marker.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FacilitySummary {
    /// Facility id.
    pub id: String,
    /// Normalized latitude.
    pub lat: f64,
    /// Normalized longitude.
    pub lon: f64,
    /// Capacity-derived status.
    pub status: FacilityStatus,
    /// Remaining-safe capacity, 0 when unknown (kW).
    pub remaining_capacity: f64,
}
