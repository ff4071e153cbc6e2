//! Immutable grid dataset: local facilities, upstream facilities, and topology.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use serde::Serialize;

use super::geo::GeoPoint;

/// A local substation / transformer station (ONS).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Facility {
    /// Station identifier.
    pub id: String,
    /// Normalized position, `None` if the source lacked a coordinate.
    pub position: Option<GeoPoint>,
    /// Installed transformer rating (kW).
    pub installed_capacity_kw: f64,
    /// PV generation already connected (kW).
    pub current_pv_load_kw: f64,
    /// Remaining transformer capacity without derating (kW).
    pub remaining_raw_capacity_kw: f64,
    /// Remaining capacity after the 0.7 simultaneity derating (kW).
    pub remaining_safe_capacity_kw: Option<f64>,
    /// Upstream facility id carried on the station record itself.
    pub upstream_id: Option<String>,
}

impl Facility {
    /// Returns `true` when the facility can take part in nearest-facility search.
    pub fn is_locatable(&self) -> bool {
        self.position.is_some() && self.remaining_safe_capacity_kw.is_some()
    }
}

/// A primary substation (UW).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpstreamFacility {
    /// Substation identifier.
    pub id: String,
    /// Feed-in capacity still available (MW).
    pub available_feed_in_capacity_mw: f64,
}

impl UpstreamFacility {
    /// Available capacity converted to kW.
    pub fn available_capacity_kw(&self) -> f64 {
        self.available_feed_in_capacity_mw * 1000.0
    }
}

/// Local facility to upstream facility assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopologyLink {
    /// Local facility id.
    pub local_id: String,
    /// Upstream facility id.
    pub upstream_id: String,
}

/// Read-only snapshot of the regional grid.
///
/// Built once at startup and shared behind an `Arc`; nothing mutates it
/// afterwards, so concurrent evaluations need no locking.
#[derive(Debug, Clone, Default)]
pub struct GridDataset {
    facilities: Vec<Facility>,
    facility_index: HashMap<String, usize>,
    upstream: Vec<UpstreamFacility>,
    upstream_index: HashMap<String, usize>,
    topology: HashMap<String, String>,
}

impl GridDataset {
    /// Builds a dataset from its three record sets.
    ///
    /// Facility order is preserved and defines the scan order of the locator.
    /// Duplicate upstream ids and duplicate topology links keep their first
    /// occurrence.
    pub fn new(
        facilities: Vec<Facility>,
        upstream: Vec<UpstreamFacility>,
        links: Vec<TopologyLink>,
    ) -> Self {
        let mut facility_index = HashMap::with_capacity(facilities.len());
        for (i, f) in facilities.iter().enumerate() {
            facility_index.entry(f.id.clone()).or_insert(i);
        }

        let mut upstream_index = HashMap::with_capacity(upstream.len());
        for (i, u) in upstream.iter().enumerate() {
            if let Entry::Vacant(slot) = upstream_index.entry(u.id.clone()) {
                slot.insert(i);
            } else {
                tracing::debug!(upstream_id = %u.id, "duplicate upstream facility ignored");
            }
        }

        let mut topology = HashMap::with_capacity(links.len());
        for link in links {
            match topology.entry(link.local_id) {
                Entry::Vacant(slot) => {
                    slot.insert(link.upstream_id);
                }
                Entry::Occupied(slot) => {
                    tracing::debug!(
                        local_id = %slot.key(),
                        kept = %slot.get(),
                        ignored = %link.upstream_id,
                        "duplicate topology link ignored"
                    );
                }
            }
        }

        Self {
            facilities,
            facility_index,
            upstream,
            upstream_index,
            topology,
        }
    }

    /// All local facilities in source order.
    pub fn facilities(&self) -> &[Facility] {
        &self.facilities
    }

    /// All upstream facilities in source order, duplicates included.
    pub fn upstream_facilities(&self) -> &[UpstreamFacility] {
        &self.upstream
    }

    /// Looks up a local facility by id.
    pub fn facility(&self, id: &str) -> Option<&Facility> {
        self.facility_index.get(id).map(|&i| &self.facilities[i])
    }

    /// Looks up an upstream facility by id.
    pub fn upstream(&self, id: &str) -> Option<&UpstreamFacility> {
        self.upstream_index.get(id).map(|&i| &self.upstream[i])
    }

    /// Upstream id from the explicit topology table.
    pub fn topology_link(&self, local_id: &str) -> Option<&str> {
        self.topology.get(local_id).map(String::as_str)
    }

    /// Number of deduplicated topology links.
    pub fn topology_len(&self) -> usize {
        self.topology.len()
    }

    /// Number of facilities eligible for nearest-facility search.
    pub fn locatable_count(&self) -> usize {
        self.facilities.iter().filter(|f| f.is_locatable()).count()
    }
}
