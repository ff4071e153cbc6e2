//! CSV ingestion for stations, substations, and the topology table.
//!
//! Source sheets come from spreadsheet exports: German headers, unit
//! suffixes in numeric cells, decimal commas, and occasionally swapped
//! coordinate columns. Everything is cleaned here, once, so the rest of the
//! crate only ever sees normalized, non-negative values.

use std::fmt;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::config::DataConfig;
use crate::grid::{Facility, GeoPoint, GridDataset, TopologyLink, UpstreamFacility};

/// Which dataset an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetKind {
    Facilities,
    Upstream,
    Topology,
}

impl fmt::Display for DatasetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Facilities => "facility",
            Self::Upstream => "upstream facility",
            Self::Topology => "topology",
        })
    }
}

/// A required dataset could not be loaded. Fatal at startup.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("cannot read {kind} dataset {}: {source}", path.display())]
    Io {
        kind: DatasetKind,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("malformed {kind} dataset: {source}")]
    Csv {
        kind: DatasetKind,
        #[source]
        source: csv::Error,
    },
    #[error("{kind} dataset contains no usable records")]
    Empty { kind: DatasetKind },
}

#[derive(Debug, Deserialize)]
struct FacilityRow {
    #[serde(rename = "ONS", alias = "id")]
    id: Option<String>,
    #[serde(rename = "Breitengrad", alias = "latitude", default)]
    latitude: Option<String>,
    #[serde(rename = "Längengrad", alias = "longitude", default)]
    longitude: Option<String>,
    #[serde(
        rename = "Installierte Trafoleistung",
        alias = "installed_capacity_kw",
        default
    )]
    installed: Option<String>,
    #[serde(rename = "PV-Leistung an ONS", alias = "current_pv_load_kw", default)]
    pv_load: Option<String>,
    #[serde(
        rename = "Übrige Trafokapazität",
        alias = "remaining_raw_capacity_kw",
        default
    )]
    remaining_raw: Option<String>,
    #[serde(
        rename = "Übrige Trafokapazität bei Gleichzeitigkeitsfaktor 0,7",
        alias = "remaining_safe_capacity_kw",
        default
    )]
    remaining_safe: Option<String>,
    #[serde(rename = "Umspannwerk", alias = "upstream_id", default)]
    upstream: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UpstreamRow {
    #[serde(rename = "UW", alias = "id")]
    id: Option<String>,
    #[serde(
        rename = "Verfügbare Einspeisekapazität in MW",
        alias = "available_feed_in_capacity_mw",
        default
    )]
    available_mw: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TopologyRow {
    #[serde(rename = "ONS", alias = "local_id")]
    local_id: Option<String>,
    #[serde(rename = "UW", alias = "upstream_id")]
    upstream_id: Option<String>,
}

const UNIT_SUFFIXES: [&str; 3] = ["kva", "kw", "mw"];

/// Parses a spreadsheet quantity such as `"1.234,5 kW"` or `"15,5 MW"`.
///
/// Unit suffixes are dropped (the caller knows the unit of its column). A
/// comma is the decimal separator; when both separators occur, dots are
/// thousands separators. Returns `None` for blank or unparsable cells.
pub fn parse_quantity(raw: &str) -> Option<f64> {
    let mut text = raw.trim();
    let lower = text.to_ascii_lowercase();
    for suffix in UNIT_SUFFIXES {
        if lower.ends_with(suffix) {
            text = text[..text.len() - suffix.len()].trim_end();
            break;
        }
    }

    let mut cleaned: String = text
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '\u{a0}')
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    if cleaned.contains(',') {
        if cleaned.contains('.') {
            cleaned.retain(|c| c != '.');
        }
        cleaned = cleaned.replace(',', ".");
    }

    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn quantity(cell: Option<&str>) -> Option<f64> {
    cell.and_then(parse_quantity)
}

fn non_negative(value: Option<f64>) -> f64 {
    value.unwrap_or(0.0).max(0.0)
}

fn clean_id(cell: Option<String>) -> Option<String> {
    cell.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

fn csv_reader<R: Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader)
}

/// Reads local facilities from CSV.
///
/// Rows without an id are skipped. Positions are normalized and capacity
/// figures clamped to zero here.
///
/// # Errors
///
/// Returns [`DatasetError::Csv`] if the CSV is malformed.
pub fn read_facilities(reader: impl Read) -> Result<Vec<Facility>, DatasetError> {
    let kind = DatasetKind::Facilities;
    let mut rdr = csv_reader(reader);
    let mut out = Vec::new();

    for (line, row) in rdr.deserialize::<FacilityRow>().enumerate() {
        let row = row.map_err(|source| DatasetError::Csv { kind, source })?;
        let Some(id) = clean_id(row.id) else {
            tracing::warn!(row = line + 2, "facility row without id skipped");
            continue;
        };

        let position = GeoPoint::from_raw_pair(
            quantity(row.latitude.as_deref()),
            quantity(row.longitude.as_deref()),
        );
        if position.is_none() {
            tracing::debug!(facility = %id, "facility has no usable coordinates");
        }

        out.push(Facility {
            id,
            position,
            installed_capacity_kw: non_negative(quantity(row.installed.as_deref())),
            current_pv_load_kw: non_negative(quantity(row.pv_load.as_deref())),
            remaining_raw_capacity_kw: non_negative(quantity(row.remaining_raw.as_deref())),
            remaining_safe_capacity_kw: quantity(row.remaining_safe.as_deref()).map(|v| v.max(0.0)),
            upstream_id: clean_id(row.upstream),
        });
    }

    Ok(out)
}

/// Reads upstream facilities from CSV.
///
/// A missing capacity cell counts as zero available capacity.
///
/// # Errors
///
/// Returns [`DatasetError::Csv`] if the CSV is malformed.
pub fn read_upstream(reader: impl Read) -> Result<Vec<UpstreamFacility>, DatasetError> {
    let kind = DatasetKind::Upstream;
    let mut rdr = csv_reader(reader);
    let mut out = Vec::new();

    for (line, row) in rdr.deserialize::<UpstreamRow>().enumerate() {
        let row = row.map_err(|source| DatasetError::Csv { kind, source })?;
        let Some(id) = clean_id(row.id) else {
            tracing::warn!(row = line + 2, "upstream row without id skipped");
            continue;
        };
        out.push(UpstreamFacility {
            id,
            available_feed_in_capacity_mw: non_negative(quantity(row.available_mw.as_deref())),
        });
    }

    Ok(out)
}

/// Reads the local-to-upstream topology table from CSV.
///
/// Incomplete rows are skipped; deduplication happens in [`GridDataset::new`].
///
/// # Errors
///
/// Returns [`DatasetError::Csv`] if the CSV is malformed.
pub fn read_topology(reader: impl Read) -> Result<Vec<TopologyLink>, DatasetError> {
    let kind = DatasetKind::Topology;
    let mut rdr = csv_reader(reader);
    let mut out = Vec::new();

    for row in rdr.deserialize::<TopologyRow>() {
        let row = row.map_err(|source| DatasetError::Csv { kind, source })?;
        if let (Some(local_id), Some(upstream_id)) = (clean_id(row.local_id), clean_id(row.upstream_id)) {
            out.push(TopologyLink {
                local_id,
                upstream_id,
            });
        }
    }

    Ok(out)
}

fn open(kind: DatasetKind, path: &Path) -> Result<BufReader<File>, DatasetError> {
    File::open(path)
        .map(BufReader::new)
        .map_err(|source| DatasetError::Io {
            kind,
            path: path.to_path_buf(),
            source,
        })
}

/// Loads the complete grid snapshot described by `config`.
///
/// # Errors
///
/// Returns a [`DatasetError`] if the facility or upstream file is missing,
/// malformed, or empty, or if a configured topology file cannot be read.
pub fn load_dataset(config: &DataConfig) -> Result<GridDataset, DatasetError> {
    let facilities = read_facilities(open(DatasetKind::Facilities, &config.facilities)?)?;
    if facilities.is_empty() {
        return Err(DatasetError::Empty {
            kind: DatasetKind::Facilities,
        });
    }

    let upstream = read_upstream(open(DatasetKind::Upstream, &config.upstream)?)?;
    if upstream.is_empty() {
        return Err(DatasetError::Empty {
            kind: DatasetKind::Upstream,
        });
    }

    let links = match &config.topology {
        Some(path) => read_topology(open(DatasetKind::Topology, path)?)?,
        None => Vec::new(),
    };

    let dataset = GridDataset::new(facilities, upstream, links);
    tracing::info!(
        facilities = dataset.facilities().len(),
        locatable = dataset.locatable_count(),
        upstream = dataset.upstream_facilities().len(),
        topology_links = dataset.topology_len(),
        "grid dataset loaded"
    );
    Ok(dataset)
}
