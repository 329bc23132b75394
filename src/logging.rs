use std::{
    fmt,
    fs::File,
    io::{self, Write},
};

use env_logger::{Builder, Target, WriteStyle};
use geotour_core::{Error, Result};
use log::Level;

use crate::options::{AppOptions, LogFormat};

/// Installs the global logger from `--log-level`, `--log-format`,
/// `--log-timestamp` and `--log-output`.
pub fn init_logger(options: &AppOptions) -> Result<()> {
    let format = options.log_format;
    let stamp = options.log_timestamp;

    let mut builder = Builder::new();
    builder
        .filter_level(options.log_level.to_filter())
        .write_style(WriteStyle::Never)
        .format(move |buf, record| {
            if stamp {
                write!(buf, "{} ", buf.timestamp_millis())?;
            }
            write_record(buf, format, record.level(), record.target(), *record.args())
        });

    let target = match options.log_output_path() {
        Some(path) => {
            let file = File::create(path).map_err(|e| {
                Error::invalid_input(format!("--log-output {}: {e}", path.display()))
            })?;
            Target::Pipe(Box::new(file))
        }
        None => Target::Stderr,
    };
    builder.target(target);

    builder
        .try_init()
        .map_err(|e| Error::other(format!("logger init failed: {e}")))
}

/// One log line. Pretty lines name the emitting module, e.g. `[two_opt]`
/// for `geotour_core::algo::two_opt`.
fn write_record<W: Write>(
    out: &mut W,
    format: LogFormat,
    level: Level,
    target: &str,
    args: fmt::Arguments<'_>,
) -> io::Result<()> {
    match format {
        LogFormat::Compact => writeln!(out, "{level:<5} {args}"),
        LogFormat::Pretty => writeln!(out, "{level:<5} [{}] {args}", module_name(target)),
    }
}

fn module_name(target: &str) -> &str {
    target.rsplit("::").next().unwrap_or(target)
}
