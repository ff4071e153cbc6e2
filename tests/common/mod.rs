//! Shared test fixtures for integration tests.

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use grid_feasibility::engine::{ConnectionType, FeasibilityEngine, FeasibilityRequest};
use grid_feasibility::grid::{Facility, GeoPoint, GridDataset, TopologyLink, UpstreamFacility};

/// Heilbronn station linked to `UW1`: 630 kW installed, 600 kW safe.
pub const F1: (f64, f64) = (49.14269, 9.21088);
/// Saturated station without an upstream link: 40 kW safe.
pub const F_RED: (f64, f64) = (49.30, 9.05);
/// Station without an upstream link: 52 kW safe.
pub const F_TIGHT: (f64, f64) = (48.95, 9.55);

/// A station with the given position and safe capacity.
pub fn station(id: &str, pos: Option<(f64, f64)>, safe: Option<f64>) -> Facility {
    Facility {
        id: id.to_string(),
        position: pos.map(|(lat, lon)| GeoPoint::new(lat, lon)),
        installed_capacity_kw: 630.0,
        current_pv_load_kw: 12.0,
        remaining_raw_capacity_kw: safe.map_or(0.0, |s| s + 18.0),
        remaining_safe_capacity_kw: safe,
        upstream_id: None,
    }
}

/// Three stations, one substation at 15.5 MW, one topology link.
pub fn fixture_dataset() -> GridDataset {
    GridDataset::new(
        vec![
            station("F1", Some(F1), Some(600.0)),
            station("F-RED", Some(F_RED), Some(40.0)),
            station("F-TIGHT", Some(F_TIGHT), Some(52.0)),
            station("F-NOPOS", None, Some(900.0)),
        ],
        vec![UpstreamFacility {
            id: "UW1".into(),
            available_feed_in_capacity_mw: 15.5,
        }],
        vec![TopologyLink {
            local_id: "F1".into(),
            upstream_id: "UW1".into(),
        }],
    )
}

/// Engine over [`fixture_dataset`].
pub fn fixture_engine() -> FeasibilityEngine {
    FeasibilityEngine::new(Arc::new(fixture_dataset()))
}

/// Request a few meters from `at`.
pub fn request_near(at: (f64, f64), kw: f64, connection_type: ConnectionType) -> FeasibilityRequest {
    FeasibilityRequest {
        lat: at.0 + 0.0001,
        lon: at.1 + 0.0001,
        kw_requested: kw,
        connection_type,
    }
}

/// Station sheet with the original German headers, coordinates partly swapped.
pub const FACILITIES_CSV: &str = "\
ONS,Breitengrad,Längengrad,Installierte Trafoleistung,PV-Leistung an ONS,Übrige Trafokapazität,\"Übrige Trafokapazität bei Gleichzeitigkeitsfaktor 0,7\",Umspannwerk
F1,49.14269,9.21088,630 kW,12 kW,618 kW,600 kW,UW1
F-RED,9.05,49.30,400 kW,360 kW,\"57,1 kW\",\"40,0 kW\",
F-TIGHT,48.95,9.55,250 kW,180 kW,70 kW,52 kW,
F-NOPOS,,,400 kW,0 kW,400 kW,280 kW,UW1
";

/// Substation sheet.
pub const UPSTREAM_CSV: &str = "\
UW,Verfügbare Einspeisekapazität in MW
UW1,\"15,5 MW\"
UW2,0 MW
";

/// Topology table naming a second link for F1 that must be ignored.
pub const TOPOLOGY_CSV: &str = "\
ONS,UW
F1,UW1
F1,UW2
";

/// Writes `content` to a per-process temp file and returns its path.
pub fn temp_file(name: &str, content: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("grid-feasibility-{}", std::process::id()));
    std::fs::create_dir_all(&dir).expect("temp dir should be creatable");
    let path = dir.join(name);
    std::fs::write(&path, content).expect("temp file should be writable");
    path
}
