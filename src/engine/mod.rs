//! Feasibility decision engine: tier and capacity selection, verdict,
//! recommendations, eco score, and the text built on top of them.

pub mod briefing;
pub mod capacity;
/// Traffic-light rules and their localized narrative.
pub mod classifier;
pub mod eco_score;
pub mod evaluator;
pub mod insights;
pub mod locale;
pub mod recommend;
/// Request, result, and verdict types.
pub mod types;

pub use briefing::{Briefing, brief};
pub use capacity::{CapacityAssessment, assess_capacity};
pub use classifier::{VerdictReason, classify};
pub use eco_score::eco_score;
pub use evaluator::FeasibilityEngine;
pub use insights::{InsightsSnapshot, UsageInsights};
pub use locale::Locale;
pub use recommend::{Priority, Recommendation, RecommendationKind};
pub use types::{
    CapacityFigures, CapacitySource, ConnectionType, FacilityStatus, FacilitySummary,
    FeasibilityRequest, FeasibilityResult, NoFacilityFound, RequestError, TrafficLight,
    VoltageTier,
};
