//! Grid connection feasibility checks for a regional electricity grid.
//!
//! Given a position and a requested power, the engine finds the closest
//! local station, picks the voltage tier, checks the matching capacity, and
//! answers with a traffic-light verdict, recommendations, and an eco score.

pub mod cli;
/// TOML service configuration.
pub mod config;
pub mod engine;
pub mod grid;
pub mod io;
pub mod logging;

/// REST API (requires the `api` feature).
#[cfg(feature = "api")]
pub mod api;
