//! Local facility to upstream facility resolution.

use serde::Serialize;

use super::model::{Facility, GridDataset};

/// Where an upstream facility id came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UpstreamSource {
    /// The explicit topology table.
    Topology,
    /// The reference stored on the facility record.
    FacilityRecord,
}

/// Outcome of resolving the upstream facility of a local facility.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpstreamResolution<'a> {
    /// An upstream id was found.
    Resolved {
        /// Upstream facility id.
        upstream_id: &'a str,
        /// Lookup that produced it.
        source: UpstreamSource,
    },
    /// Neither the topology table nor the record names an upstream facility.
    Unresolved,
}

impl<'a> UpstreamResolution<'a> {
    /// The resolved id, if any.
    pub fn upstream_id(&self) -> Option<&'a str> {
        match *self {
            Self::Resolved { upstream_id, .. } => Some(upstream_id),
            Self::Unresolved => None,
        }
    }
}

/// Resolves the upstream facility id for `facility`.
///
/// The topology table takes precedence over the facility's own reference.
/// Blank references count as absent.
pub fn resolve_upstream<'a>(dataset: &'a GridDataset, facility: &'a Facility) -> UpstreamResolution<'a> {
    if let Some(upstream_id) = dataset.topology_link(&facility.id).filter(|id| !id.is_empty()) {
        return UpstreamResolution::Resolved {
            upstream_id,
            source: UpstreamSource::Topology,
        };
    }
    match facility.upstream_id.as_deref().filter(|id| !id.is_empty()) {
        Some(upstream_id) => UpstreamResolution::Resolved {
            upstream_id,
            source: UpstreamSource::FacilityRecord,
        },
        None => UpstreamResolution::Unresolved,
    }
}
