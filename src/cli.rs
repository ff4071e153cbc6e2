//! Command-line argument parsing.

use std::env;
use std::path::PathBuf;

use crate::engine::{ConnectionType, Locale};

/// A one-off feasibility question from the command line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CheckArgs {
    pub lat: f64,
    pub lon: f64,
    pub kw: f64,
}

/// Parsed CLI arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct CliOptions {
    pub config: Option<PathBuf>,
    pub check: Option<CheckArgs>,
    pub connection_type: ConnectionType,
    pub lang: Option<Locale>,
    pub briefing: bool,
    pub stations_out: Option<PathBuf>,
    pub serve: bool,
    pub port: Option<u16>,
    pub help: bool,
}

impl Default for CliOptions {
    fn default() -> Self {
        Self {
            config: None,
            check: None,
            connection_type: ConnectionType::Load,
            lang: None,
            briefing: false,
            stations_out: None,
            serve: false,
            port: None,
            help: false,
        }
    }
}

pub fn parse_args() -> Result<CliOptions, String> {
    let args: Vec<String> = env::args().skip(1).collect();
    parse_args_from(args)
}

pub fn parse_args_from(args: Vec<String>) -> Result<CliOptions, String> {
    let mut opts = CliOptions::default();
    let mut connection_type = None;
    let mut i = 0usize;

    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                opts.help = true;
                return Ok(opts);
            }
            "--config" => {
                i += 1;
                let path = args.next_or_err(i, "missing value for --config (expected a TOML file path)")?;
                if opts.config.replace(PathBuf::from(path)).is_some() {
                    return Err("--config provided more than once".to_string());
                }
            }
            "--check" => {
                let lat = parse_f64(&args, i + 1, "latitude")?;
                let lon = parse_f64(&args, i + 2, "longitude")?;
                let kw = parse_f64(&args, i + 3, "requested kW")?;
                i += 3;
                if opts.check.replace(CheckArgs { lat, lon, kw }).is_some() {
                    return Err("--check provided more than once".to_string());
                }
            }
            "--type" => {
                i += 1;
                let value = args.next_or_err(i, "missing value for --type (expected load or feed-in)")?;
                if connection_type.replace(value.parse::<ConnectionType>()?).is_some() {
                    return Err("--type provided more than once".to_string());
                }
            }
            "--lang" => {
                i += 1;
                let value = args.next_or_err(i, "missing value for --lang (expected en or de)")?;
                if opts.lang.replace(value.parse::<Locale>()?).is_some() {
                    return Err("--lang provided more than once".to_string());
                }
            }
            "--briefing" => opts.briefing = true,
            "--stations-out" => {
                i += 1;
                let path = args.next_or_err(i, "missing value for --stations-out (expected a file path)")?;
                if opts.stations_out.replace(PathBuf::from(path)).is_some() {
                    return Err("--stations-out provided more than once".to_string());
                }
            }
            "--serve" => opts.serve = true,
            "--port" => {
                i += 1;
                let value = args.next_or_err(i, "missing value for --port (expected a u16)")?;
                let port = value
                    .parse::<u16>()
                    .map_err(|_| format!("--port value \"{value}\" is not a valid u16"))?;
                opts.port = Some(port);
            }
            other => return Err(format!("unknown argument: {other}")),
        }
        i += 1;
    }

    if let Some(ct) = connection_type {
        if opts.check.is_none() {
            return Err("--type only applies together with --check".to_string());
        }
        opts.connection_type = ct;
    }
    if opts.briefing && opts.check.is_none() {
        return Err("--briefing only applies together with --check".to_string());
    }
    if opts.port.is_some() && !opts.serve {
        return Err("--port only applies together with --serve".to_string());
    }
    if opts.check.is_none() && opts.stations_out.is_none() && !opts.serve {
        return Err("nothing to do: give --check, --stations-out, or --serve".to_string());
    }

    Ok(opts)
}

fn parse_f64(args: &[String], index: usize, what: &str) -> Result<f64, String> {
    let raw = args.next_or_err(index, &format!("--check expects <lat> <lon> <kw>, missing {what}"))?;
    raw.parse::<f64>()
        .map_err(|_| format!("--check {what} \"{raw}\" is not a number"))
}

trait SliceArgExt {
    fn next_or_err(&self, index: usize, err: &str) -> Result<&str, String>;
}

impl SliceArgExt for [String] {
    fn next_or_err(&self, index: usize, err: &str) -> Result<&str, String> {
        self.get(index)
            .map(String::as_str)
            .ok_or_else(|| err.to_string())
    }
}

pub fn print_usage() {
    eprintln!("grid-feasibility: grid connection feasibility checks for the Heilbronn region");
    eprintln!();
    eprintln!("Usage: grid-feasibility [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --config <path>           Load service configuration from a TOML file");
    eprintln!("  --check <lat> <lon> <kw>  Evaluate one connection request");
    eprintln!("  --type <load|feed-in>     Connection type for --check (default: load)");
    eprintln!("  --lang <en|de>            Output language (default: from config)");
    eprintln!("  --briefing                Print the applicant briefing after --check");
    eprintln!("  --stations-out <path>     Export the facility status list to CSV");
    eprintln!("  --serve                   Start the HTTP API");
    eprintln!("  --port <u16>              Override the configured API port");
    eprintln!("  --help                    Show this help message");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parses_check_with_type_and_lang() {
        let opts = parse_args_from(args(&[
            "--check", "49.14", "9.21", "50", "--type", "feed-in", "--lang", "de",
        ]))
        .expect("parse should succeed");
        assert_eq!(
            opts.check,
            Some(CheckArgs {
                lat: 49.14,
                lon: 9.21,
                kw: 50.0
            })
        );
        assert_eq!(opts.connection_type, ConnectionType::FeedIn);
        assert_eq!(opts.lang, Some(Locale::De));
    }

    #[test]
    fn check_defaults_to_load() {
        let opts = parse_args_from(args(&["--check", "49.1", "9.2", "11"])).expect("parse");
        assert_eq!(opts.connection_type, ConnectionType::Load);
        assert!(opts.lang.is_none());
    }

    #[test]
    fn supports_serve_with_port_and_config() {
        let opts = parse_args_from(args(&["--config", "service.toml", "--serve", "--port", "9000"]))
            .expect("parse should succeed");
        assert!(opts.serve);
        assert_eq!(opts.port, Some(9000));
        assert_eq!(
            opts.config.as_deref().and_then(|p| p.to_str()),
            Some("service.toml")
        );
    }

    #[test]
    fn help_short_circuits() {
        let opts = parse_args_from(args(&["--help", "--bogus"])).expect("parse");
        assert!(opts.help);
    }

    #[test]
    fn rejects_incomplete_check() {
        let err = parse_args_from(args(&["--check", "49.1", "9.2"]));
        assert!(err.is_err_and(|e| e.contains("missing requested kW")));
    }

    #[test]
    fn rejects_non_numeric_check() {
        assert!(parse_args_from(args(&["--check", "north", "9.2", "5"])).is_err());
    }

    #[test]
    fn rejects_unknown_type_and_lang() {
        assert!(parse_args_from(args(&["--check", "49.1", "9.2", "5", "--type", "battery"])).is_err());
        assert!(parse_args_from(args(&["--check", "49.1", "9.2", "5", "--lang", "fr"])).is_err());
    }

    #[test]
    fn rejects_dangling_modifiers() {
        assert!(parse_args_from(args(&["--serve", "--type", "load"])).is_err());
        assert!(parse_args_from(args(&["--stations-out", "s.csv", "--port", "80"])).is_err());
        assert!(parse_args_from(args(&["--serve", "--briefing"])).is_err());
    }

    #[test]
    fn requires_an_action() {
        assert!(parse_args_from(args(&[])).is_err());
        assert!(parse_args_from(args(&["--config", "service.toml"])).is_err());
    }

    #[test]
    fn rejects_unknown_argument() {
        let err = parse_args_from(args(&["--serve", "--verbose"]));
        assert_eq!(err, Err("unknown argument: --verbose".to_string()));
    }
}
