//! Grid feasibility entry point: CLI wiring, dataset loading, and serving.

use std::path::Path;
use std::process;
use std::sync::Arc;

use grid_feasibility::cli::{self, CliOptions};
use grid_feasibility::config::ServiceConfig;
use grid_feasibility::engine::{FeasibilityEngine, FeasibilityRequest, brief};
use grid_feasibility::io::export::export_facilities_csv;
use grid_feasibility::io::load_dataset;
use grid_feasibility::logging;

fn load_config(cli: &CliOptions) -> ServiceConfig {
    // --config takes priority, then the built-in baseline
    let mut config = match cli.config {
        Some(ref path) => ServiceConfig::from_toml_file(path).unwrap_or_else(|e| {
            eprintln!("{e}");
            process::exit(1);
        }),
        None => ServiceConfig::baseline(),
    };

    if let Some(port) = cli.port {
        config.server.port = port;
    }

    let errors = config.validate();
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("{e}");
        }
        process::exit(1);
    }

    config
}

fn run_check(engine: &FeasibilityEngine, config: &ServiceConfig, cli: &CliOptions) {
    let Some(check) = cli.check else { return };
    let request = FeasibilityRequest {
        lat: check.lat,
        lon: check.lon,
        kw_requested: check.kw,
        connection_type: cli.connection_type,
    };
    if let Err(e) = request.validate(&config.service_area) {
        eprintln!("error: {e}");
        process::exit(1);
    }

    let locale = cli.lang.unwrap_or(config.defaults.locale);
    match engine.evaluate(&request, locale) {
        Ok(result) => {
            println!("{result}");
            if cli.briefing {
                println!("{}", brief(&result));
            }
        }
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}

fn main() {
    let cli = cli::parse_args().unwrap_or_else(|e| {
        eprintln!("error: {e}");
        cli::print_usage();
        process::exit(1);
    });
    if cli.help {
        cli::print_usage();
        return;
    }

    let config = load_config(&cli);
    if let Err(e) = logging::init(&config.logging) {
        eprintln!("warning: logging already initialized: {e}");
    }

    let dataset = match load_dataset(&config.data) {
        Ok(dataset) => Arc::new(dataset),
        Err(e) => {
            tracing::error!(error = %e, "grid dataset unavailable");
            eprintln!("error: {e}");
            process::exit(1);
        }
    };
    let engine = FeasibilityEngine::new(dataset);

    run_check(&engine, &config, &cli);

    if let Some(ref path) = cli.stations_out {
        let stations = engine.list_facilities();
        if let Err(e) = export_facilities_csv(&stations, Path::new(path)) {
            eprintln!("error: failed to write CSV: {e}");
            process::exit(1);
        }
        eprintln!("{} stations written to {}", stations.len(), path.display());
    }

    if cli.serve {
        serve(engine, config);
    }
}

#[cfg(feature = "api")]
fn serve(engine: FeasibilityEngine, config: ServiceConfig) {
    use grid_feasibility::api::{self, AppState};

    let addr = config.socket_addr().unwrap_or_else(|e| {
        eprintln!("{e}");
        process::exit(1);
    });
    let state = Arc::new(AppState::new(engine, &config));
    let rt = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
        eprintln!("error: failed to create tokio runtime: {e}");
        process::exit(1);
    });
    if let Err(e) = rt.block_on(api::serve(state, addr)) {
        eprintln!("error: {e}");
        process::exit(1);
    }
}

#[cfg(not(feature = "api"))]
fn serve(_engine: FeasibilityEngine, _config: ServiceConfig) {
    eprintln!("error: --serve requires the \"api\" feature");
    process::exit(1);
}
