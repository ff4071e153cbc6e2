//! Nearest-facility search.

use super::geo::GeoPoint;
use super::model::{Facility, GridDataset};

/// The facility closest to a query point.
#[derive(Debug, Clone, Copy)]
pub struct NearestFacility<'a> {
    /// The winning facility.
    pub facility: &'a Facility,
    /// Its normalized position.
    pub position: GeoPoint,
    /// Great-circle distance from the query point (m).
    pub distance_m: f64,
}

/// Strategy for finding the closest eligible facility.
///
/// Only facilities with a position and a remaining-safe capacity are
/// eligible. Implementations must be deterministic: the same dataset and
/// point always yield the same facility.
pub trait FacilityLocator {
    /// Returns the closest eligible facility, or `None` if there is none.
    fn nearest<'a>(&self, dataset: &'a GridDataset, point: GeoPoint)
    -> Option<NearestFacility<'a>>;
}

/// Linear scan over all facilities in dataset order.
///
/// O(n) per query, fine for a few hundred stations. A spatial index can be
/// dropped in behind [`FacilityLocator`] if the dataset grows by orders of
/// magnitude.
#[derive(Debug, Default, Clone, Copy)]
pub struct LinearScanLocator;

impl FacilityLocator for LinearScanLocator {
    fn nearest<'a>(
        &self,
        dataset: &'a GridDataset,
        point: GeoPoint,
    ) -> Option<NearestFacility<'a>> {
        let mut best: Option<NearestFacility<'a>> = None;

        for facility in dataset.facilities() {
            let (Some(position), Some(_)) = (facility.position, facility.remaining_safe_capacity_kw)
            else {
                continue;
            };
            let distance_m = point.distance_m(&position);
            if !distance_m.is_finite() {
                continue;
            }
            // strict `<`: the earlier candidate keeps a tie
            if best.is_none_or(|b| distance_m < b.distance_m) {
                best = Some(NearestFacility {
                    facility,
                    position,
                    distance_m,
                });
            }
        }

        best
    }
}
