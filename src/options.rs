use std::{env, path::Path, str::FromStr};

use geotour_core::{
    Error, Point, Result, SolverOptions, Strategy, algo::two_opt::DEFAULT_DECAY_RATE,
};
use log::LevelFilter;

/// Command-line options for the `geotour` binary.
#[derive(Clone, Debug, PartialEq)]
pub struct AppOptions {
    pub input: String,
    pub output: String,
    pub method: Strategy,
    /// Annealing decay rate.
    pub rate: f64,
    /// 1-based index of the point the tour starts at.
    pub start: usize,
    pub anchor: Option<Point>,
    /// Run k-means with this many clusters instead of routing; 0 disables.
    pub clusters: usize,
    /// Route one centroid per label instead of every location.
    pub centers: bool,
    /// Write the center header line and the order column.
    pub format: bool,
    pub seed: Option<u64>,
    /// Pre-confirm a long exhaustive search.
    pub yes: bool,
    pub help: bool,
    pub log_level: LogLevel,
    pub log_format: LogFormat,
    pub log_timestamp: bool,
    pub log_output: String,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
    Off,
}

impl LogLevel {
    pub fn to_filter(self) -> LevelFilter {
        match self {
            Self::Error => LevelFilter::Error,
            Self::Warn => LevelFilter::Warn,
            Self::Info => LevelFilter::Info,
            Self::Debug => LevelFilter::Debug,
            Self::Trace => LevelFilter::Trace,
            Self::Off => LevelFilter::Off,
        }
    }
}

impl FromStr for LogLevel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "error" => Ok(Self::Error),
            "warn" | "warning" => Ok(Self::Warn),
            "info" => Ok(Self::Info),
            "debug" => Ok(Self::Debug),
            "trace" => Ok(Self::Trace),
            "off" => Ok(Self::Off),
            _ => Err(Error::invalid_input(format!(
                "Invalid value for --log-level: {s} (expected error|warn|info|debug|trace|off)"
            ))),
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LogFormat {
    Compact,
    Pretty,
}

impl FromStr for LogFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            _ => Err(Error::invalid_input(format!(
                "Invalid value for --log-format: {s} (expected compact|pretty)"
            ))),
        }
    }
}

impl Default for AppOptions {
    fn default() -> Self {
        Self {
            input: String::new(),
            output: String::new(),
            method: Strategy::Auto,
            rate: DEFAULT_DECAY_RATE,
            start: 1,
            anchor: None,
            clusters: 0,
            centers: false,
            format: true,
            seed: None,
            yes: false,
            help: false,
            log_level: LogLevel::Warn,
            log_format: LogFormat::Compact,
            log_timestamp: true,
            log_output: String::new(),
        }
    }
}

impl AppOptions {
    pub fn from_args() -> Result<Self> {
        Self::parse_from_iter(env::args().skip(1))
    }

    fn parse_from_iter<I, S>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut options = Self::default();
        let mut args = args
            .into_iter()
            .map(|arg| arg.as_ref().to_owned())
            .peekable();

        while let Some(arg) = args.next() {
            if arg == "--help" || arg == "-h" {
                options.help = true;
                continue;
            }

            let Some(raw_name) = arg.strip_prefix("--") else {
                return Err(Error::invalid_input(format!(
                    "Unexpected argument: {arg}\n\n{}",
                    Self::usage()
                )));
            };

            if raw_name.is_empty() {
                return Err(Error::invalid_input(format!(
                    "Invalid option name: {arg}\n\n{}",
                    Self::usage()
                )));
            }

            let (name, value) = split_arg(raw_name, &mut args);

            match name.as_str() {
                "input" => options.input = require_value(&name, value)?,
                "output" => options.output = require_value(&name, value)?,
                "method" => options.method = parse_value(&name, value)?,
                "rate" => options.rate = parse_value(&name, value)?,
                "start" => {
                    let start: usize = parse_value(&name, value)?;
                    if start == 0 {
                        return Err(Error::invalid_input(
                            "Invalid value for --start: 0 (indices start at 1)",
                        ));
                    }
                    options.start = start;
                }
                "anchor" => {
                    let raw = require_value(&name, value)?;
                    options.anchor = Some(parse_anchor(&raw)?);
                }
                "clusters" => options.clusters = parse_value(&name, value)?,
                "centers" => options.centers = parse_flag(&name, value)?,
                "format" => options.format = parse_flag(&name, value)?,
                "seed" => options.seed = Some(parse_value(&name, value)?),
                "yes" => options.yes = parse_flag(&name, value)?,
                "log-level" => options.log_level = parse_value(&name, value)?,
                "log-format" => options.log_format = parse_value(&name, value)?,
                "log-timestamp" => options.log_timestamp = parse_flag(&name, value)?,
                "no-log-timestamp" => {
                    if value.is_some() {
                        return Err(Error::invalid_input(format!(
                            "Flag --{name} does not take a value"
                        )));
                    }
                    options.log_timestamp = false;
                }
                "log-output" => options.log_output = require_value(&name, value)?,
                _ => {
                    return Err(Error::invalid_input(format!(
                        "Unknown option: --{name}\n\n{}",
                        Self::usage()
                    )));
                }
            }
        }

        Ok(options)
    }

    pub fn usage() -> &'static str {
        concat!(
            "Usage:\n",
            "  geotour [options] [--input points.txt]\n",
            "  geotour [options] < points.txt\n\n",
            "Input is tab-delimited with a header row: label, lat, lon.\n\n",
            "Options:\n",
            "  --input <path>\n",
            "  --output <path>\n",
            "  --method <auto|exh|opt|resOpt|bigOpt|nnMul|nn|none>\n",
            "  --rate <f64>             annealing decay rate, in (0, 1)\n",
            "  --start <usize>          1-based index of the first point\n",
            "  --anchor <lat,lon>       start at the point nearest to this location\n",
            "  --clusters <usize>       k-means clustering instead of routing\n",
            "  --centers[=<bool>]       route one centroid per label\n",
            "  --format[=<bool>]        center header and order column\n",
            "  --seed <u64>\n",
            "  --yes                    accept long exhaustive searches\n",
            "  --log-level <error|warn|info|debug|trace|off>\n",
            "  --log-format <compact|pretty>\n",
            "  --log-timestamp[=<bool>]\n",
            "  --no-log-timestamp\n",
            "  --log-output <path>\n",
            "  --help\n",
            "\n",
            "Examples:\n",
            "  geotour --input stores.txt --output route.txt --log-level info\n",
            "  geotour --method resOpt --anchor 45.52,-122.68 < stores.txt\n",
            "  geotour --clusters 4 --seed 7 --format=false < stores.txt\n",
        )
    }

    pub fn solver_options(&self) -> SolverOptions {
        SolverOptions {
            strategy: self.method,
            decay_rate: self.rate,
            start_index: self.start - 1,
            anchor: self.anchor.clone(),
        }
    }

    pub fn input_path(&self) -> Option<&Path> {
        non_stdio_path(&self.input)
    }

    pub fn output_path(&self) -> Option<&Path> {
        non_stdio_path(&self.output)
    }

    pub fn log_output_path(&self) -> Option<&Path> {
        non_stdio_path(&self.log_output)
    }
}

fn non_stdio_path(raw: &str) -> Option<&Path> {
    let raw = raw.trim();
    if raw.is_empty() || raw == "-" {
        None
    } else {
        Some(Path::new(raw))
    }
}

fn parse_anchor(raw: &str) -> Result<Point> {
    let invalid = || Error::invalid_input(format!("Invalid value for --anchor: {raw} (expected lat,lon)"));
    let (lat, lon) = raw.split_once(',').ok_or_else(invalid)?;
    let lat: f64 = lat.trim().parse().map_err(|_| invalid())?;
    let lon: f64 = lon.trim().parse().map_err(|_| invalid())?;
    let anchor = Point::at(lat, lon);
    if !anchor.is_valid() {
        return Err(invalid());
    }
    Ok(anchor)
}

fn require_value(name: &str, value: Option<String>) -> Result<String> {
    value.ok_or_else(|| Error::invalid_input(format!("Missing value for --{name}")))
}

fn parse_value<T>(name: &str, value: Option<String>) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let raw = require_value(name, value)?;
    raw.parse::<T>()
        .map_err(|e| Error::invalid_input(format!("Invalid value for --{name}: {raw} ({e})")))
}

fn parse_flag(name: &str, value: Option<String>) -> Result<bool> {
    match value {
        Some(v) => parse_bool(name, &v),
        None => Ok(true),
    }
}

fn parse_bool(name: &str, value: &str) -> Result<bool> {
    match value {
        "1" | "true" | "TRUE" | "True" | "yes" | "YES" | "on" | "ON" => Ok(true),
        "0" | "false" | "FALSE" | "False" | "no" | "NO" | "off" | "OFF" => Ok(false),
        _ => Err(Error::invalid_input(format!(
            "Invalid boolean for --{name}: {value} (expected true/false)"
        ))),
    }
}

fn split_arg(
    raw_name: &str,
    args: &mut std::iter::Peekable<impl Iterator<Item = String>>,
) -> (String, Option<String>) {
    if let Some((k, v)) = raw_name.split_once('=') {
        return (k.to_string(), Some(v.to_string()));
    }

    let value = match args.peek() {
        Some(next) if !next.starts_with("--") => args.next(),
        _ => None,
    };

    (raw_name.to_string(), value)
}

#[cfg(test)]
mod tests {
    use geotour_core::{Point, Strategy};
    use log::LevelFilter;

    use super::{AppOptions, LogFormat, LogLevel, parse_anchor, parse_bool};

    #[test]
    fn defaults_route_automatically_from_the_first_point() {
        let options = AppOptions::parse_from_iter(Vec::<String>::new()).expect("parse options");
        assert_eq!(options, AppOptions::default());
        let solver = options.solver_options();
        assert_eq!(solver.strategy, Strategy::Auto);
        assert_eq!(solver.start_index, 0);
        assert_eq!(solver.decay_rate, 0.8);
        assert!(options.format);
        assert!(options.input_path().is_none());
    }

    #[test]
    fn parse_from_iter_applies_known_cli_options() {
        let options = AppOptions::parse_from_iter([
            "--input=points.txt",
            "--output",
            "route.txt",
            "--method=resOpt",
            "--rate=0.5",
            "--start=3",
            "--anchor",
            "-45.5,122.25",
            "--clusters=4",
            "--centers",
            "--format=false",
            "--seed=77",
            "--yes",
            "--log-level=debug",
            "--log-format=pretty",
            "--log-timestamp=false",
            "--log-output=run.log",
        ])
        .expect("parse options");

        assert_eq!(options.input, "points.txt");
        assert_eq!(options.output, "route.txt");
        assert_eq!(options.method, Strategy::RestrictedTwoOpt);
        assert_eq!(options.rate, 0.5);
        assert_eq!(options.start, 3);
        assert_eq!(options.anchor, Some(Point::at(-45.5, 122.25)));
        assert_eq!(options.clusters, 4);
        assert!(options.centers);
        assert!(!options.format);
        assert_eq!(options.seed, Some(77));
        assert!(options.yes);
        assert_eq!(options.log_level, LogLevel::Debug);
        assert_eq!(options.log_format, LogFormat::Pretty);
        assert!(!options.log_timestamp);
        assert_eq!(
            options.log_output_path().and_then(|p| p.to_str()),
            Some("run.log")
        );
        assert_eq!(options.solver_options().start_index, 2);
    }

    #[test]
    fn help_is_a_flag_not_an_error() {
        let options = AppOptions::parse_from_iter(["-h"]).expect("parse options");
        assert!(options.help);
        assert!(AppOptions::usage().contains("--method"));
    }

    #[test]
    fn rejects_unknown_method_and_option() {
        let err = AppOptions::parse_from_iter(["--method=fast"]).expect_err("bad method");
        assert!(err.to_string().contains("auto|exh|opt|resOpt|bigOpt|nnMul|nn|none"));

        let err = AppOptions::parse_from_iter(["--unknown-opt=1"]).expect_err("unknown option");
        assert!(err.to_string().contains("Unknown option: --unknown-opt"));

        let err = AppOptions::parse_from_iter(["points.txt"]).expect_err("positional");
        assert!(err.to_string().contains("Unexpected argument"));
    }

    #[test]
    fn rejects_zero_start_and_missing_values() {
        let err = AppOptions::parse_from_iter(["--start=0"]).expect_err("zero start");
        assert!(err.to_string().contains("indices start at 1"));

        let err = AppOptions::parse_from_iter(["--clusters"]).expect_err("missing value");
        assert!(err.to_string().contains("Missing value for --clusters"));
    }

    #[test]
    fn no_log_timestamp_rejects_a_value() {
        let options = AppOptions::parse_from_iter(["--no-log-timestamp"]).expect("parse options");
        assert!(!options.log_timestamp);
        let err = AppOptions::parse_from_iter(["--no-log-timestamp=true"])
            .expect_err("expected flag value rejection");
        assert!(err.to_string().contains("does not take a value"));
    }

    #[test]
    fn anchor_must_be_a_valid_coordinate_pair() {
        assert_eq!(
            parse_anchor(" 45.5 , -122.7 ").expect("valid anchor"),
            Point::at(45.5, -122.7)
        );
        assert!(parse_anchor("45.5").is_err());
        assert!(parse_anchor("95,0").is_err());
        assert!(parse_anchor("a,b").is_err());
    }

    #[test]
    fn parse_bool_accepts_common_values() {
        assert!(parse_bool("x", "YES").expect("parse"));
        assert!(!parse_bool("x", "off").expect("parse"));
        let err = parse_bool("format", "maybe").expect_err("invalid bool should fail");
        assert!(err.to_string().contains("Invalid boolean for --format: maybe"));
    }

    #[test]
    fn log_settings_parse_case_insensitively() {
        assert_eq!("WARNING".parse::<LogLevel>().ok(), Some(LogLevel::Warn));
        assert_eq!(LogLevel::Off.to_filter(), LevelFilter::Off);
        assert_eq!(LogLevel::Trace.to_filter(), LevelFilter::Trace);
        assert_eq!("Pretty".parse::<LogFormat>().ok(), Some(LogFormat::Pretty));
        assert!("fancy".parse::<LogFormat>().is_err());
    }
}
