//! Grid data model and the spatial / topological lookups over it.

/// Positions, service area, coordinate repair, and distances.
pub mod geo;
pub mod locator;
/// Facility, upstream facility, and topology records.
pub mod model;
pub mod topology;

pub use geo::{GeoPoint, HEILBRONN_SERVICE_AREA, ServiceArea};
pub use locator::{FacilityLocator, LinearScanLocator, NearestFacility};
pub use model::{Facility, GridDataset, TopologyLink, UpstreamFacility};
pub use topology::{UpstreamResolution, UpstreamSource, resolve_upstream};
