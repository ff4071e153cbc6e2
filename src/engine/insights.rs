//! Usage insights: lock-free counters over evaluation outcomes.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

use super::types::{FeasibilityResult, TrafficLight, VoltageTier};

/// Running totals, safe to update from many request handlers at once.
#[derive(Debug, Default)]
pub struct UsageInsights {
    evaluations: AtomicU64,
    not_found: AtomicU64,
    green: AtomicU64,
    yellow: AtomicU64,
    red: AtomicU64,
    per_tier: [AtomicU64; 4],
    escalations: AtomicU64,
    requested_kw_milli: AtomicU64,
}

impl UsageInsights {
    /// Empty counters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts one completed evaluation.
    pub fn record(&self, result: &FeasibilityResult) {
        self.evaluations.fetch_add(1, Ordering::Relaxed);
        let light = match result.traffic_light {
            TrafficLight::Green => &self.green,
            TrafficLight::Yellow => &self.yellow,
            TrafficLight::Red => &self.red,
        };
        light.fetch_add(1, Ordering::Relaxed);
        self.per_tier[tier_slot(result.tier)].fetch_add(1, Ordering::Relaxed);
        if result.escalated {
            self.escalations.fetch_add(1, Ordering::Relaxed);
        }
        self.add_requested_kw(result.kw_requested);
    }

    /// Adds to the requested-power total, saturating at `u64::MAX` milli-kW.
    fn add_requested_kw(&self, kw: f64) {
        let milli = (kw * 1000.0).round();
        if !milli.is_finite() || milli <= 0.0 {
            return;
        }
        // float-to-int `as` saturates
        let milli = milli as u64;
        let _ = self
            .requested_kw_milli
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |total| {
                Some(total.saturating_add(milli))
            });
    }

    /// Counts one request without a nearby facility.
    pub fn record_not_found(&self) {
        self.evaluations.fetch_add(1, Ordering::Relaxed);
        self.not_found.fetch_add(1, Ordering::Relaxed);
    }

    /// Point-in-time copy of all counters.
    ///
    /// Counters are read one by one, so a snapshot taken under load may mix
    /// adjacent updates.
    pub fn snapshot(&self) -> InsightsSnapshot {
        let load = |c: &AtomicU64| c.load(Ordering::Relaxed);
        InsightsSnapshot {
            evaluations: load(&self.evaluations),
            not_found: load(&self.not_found),
            traffic_lights: TrafficLightCounts {
                green: load(&self.green),
                yellow: load(&self.yellow),
                red: load(&self.red),
            },
            tiers: TierCounts {
                low_standard: load(&self.per_tier[0]),
                low_high_load: load(&self.per_tier[1]),
                medium: load(&self.per_tier[2]),
                high: load(&self.per_tier[3]),
            },
            escalations: load(&self.escalations),
            total_requested_kw: load(&self.requested_kw_milli) as f64 / 1000.0,
        }
    }
}

fn tier_slot(tier: VoltageTier) -> usize {
    match tier {
        VoltageTier::LowStandard => 0,
        VoltageTier::LowHighLoad => 1,
        VoltageTier::Medium => 2,
        VoltageTier::High => 3,
    }
}

/// Serializable copy of [`UsageInsights`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InsightsSnapshot {
    pub evaluations: u64,
    pub not_found: u64,
    pub traffic_lights: TrafficLightCounts,
    pub tiers: TierCounts,
    pub escalations: u64,
    pub total_requested_kw: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrafficLightCounts {
    pub green: u64,
    pub yellow: u64,
    pub red: u64,
}

/// Evaluations per effective tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TierCounts {
    pub low_standard: u64,
    pub low_high_load: u64,
    pub medium: u64,
    pub high: u64,
}
