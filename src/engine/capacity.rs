//! Voltage tier selection and the capacity figures that go with it.
//!
//! Low tiers are checked against the local station itself. Medium and high
//! tiers are checked against the upstream substation feeding it. A low tier
//! request that does not fit the local station is escalated to medium.

use super::types::{CapacityFigures, CapacitySource, VoltageTier};
use crate::grid::{Facility, GridDataset, UpstreamResolution, resolve_upstream};

/// Tier and capacity figures chosen for one request.
#[derive(Debug, Clone, PartialEq)]
pub struct CapacityAssessment {
    /// Tier implied by the requested power.
    pub nominal_tier: VoltageTier,
    /// Tier the figures belong to.
    pub tier: VoltageTier,
    /// Set when a saturated local station moved the check upstream.
    pub escalated: bool,
    /// Figures for `tier`.
    pub figures: CapacityFigures,
}

/// Picks the tier and capacity figures for `kw_requested` at `facility`.
pub fn assess_capacity(
    dataset: &GridDataset,
    facility: &Facility,
    kw_requested: f64,
) -> CapacityAssessment {
    let nominal_tier = VoltageTier::for_request(kw_requested);

    if nominal_tier.is_low() {
        let local = local_figures(facility);
        if local.remaining_safe_kw >= kw_requested {
            return CapacityAssessment {
                nominal_tier,
                tier: nominal_tier,
                escalated: false,
                figures: local,
            };
        }
        tracing::debug!(
            facility = %facility.id,
            remaining_kw = local.remaining_safe_kw,
            kw_requested,
            "local station saturated, escalating to medium voltage"
        );
        return CapacityAssessment {
            nominal_tier,
            tier: VoltageTier::Medium,
            escalated: true,
            figures: upstream_figures(dataset, facility),
        };
    }

    CapacityAssessment {
        nominal_tier,
        tier: nominal_tier,
        escalated: false,
        figures: upstream_figures(dataset, facility),
    }
}

/// The station's own four figures; a missing safe value counts as zero.
pub fn local_figures(facility: &Facility) -> CapacityFigures {
    CapacityFigures {
        facility_id: facility.id.clone(),
        source: CapacitySource::LocalFacility,
        max_capacity_kw: facility.installed_capacity_kw,
        current_load_kw: facility.current_pv_load_kw,
        remaining_raw_kw: facility.remaining_raw_capacity_kw,
        remaining_safe_kw: facility.remaining_safe_capacity_kw.unwrap_or(0.0),
    }
}

/// Available feed-in capacity of the substation upstream of `facility`.
///
/// Falls back to all-zero figures when no upstream substation can be found.
pub fn upstream_figures(dataset: &GridDataset, facility: &Facility) -> CapacityFigures {
    let resolution = resolve_upstream(dataset, facility);
    let upstream = resolution.upstream_id().and_then(|id| dataset.upstream(id));

    match (resolution, upstream) {
        (UpstreamResolution::Resolved { source, .. }, Some(upstream)) => {
            let available_kw = upstream.available_capacity_kw();
            tracing::trace!(
                facility = %facility.id,
                upstream = %upstream.id,
                ?source,
                available_kw,
                "upstream capacity resolved"
            );
            CapacityFigures {
                facility_id: upstream.id.clone(),
                source: CapacitySource::UpstreamFacility,
                max_capacity_kw: available_kw,
                current_load_kw: 0.0,
                remaining_raw_kw: available_kw,
                remaining_safe_kw: available_kw,
            }
        }
        (UpstreamResolution::Resolved { upstream_id, .. }, None) => {
            tracing::warn!(
                facility = %facility.id,
                upstream = %upstream_id,
                "upstream substation not in dataset, assuming zero capacity"
            );
            zero_figures(upstream_id)
        }
        (UpstreamResolution::Unresolved, _) => {
            tracing::debug!(
                facility = %facility.id,
                "no upstream substation linked, assuming zero capacity"
            );
            zero_figures(&facility.id)
        }
    }
}

fn zero_figures(facility_id: &str) -> CapacityFigures {
    CapacityFigures {
        facility_id: facility_id.to_string(),
        source: CapacitySource::UpstreamUnresolved,
        max_capacity_kw: 0.0,
        current_load_kw: 0.0,
        remaining_raw_kw: 0.0,
        remaining_safe_kw: 0.0,
    }
}
