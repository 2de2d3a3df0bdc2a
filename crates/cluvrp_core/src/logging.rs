//! Stderr logging for the run modes.
//!
//! Compact is the default and fits the key=value progress lines the modes
//! emit (`eval: distance=...`, `par-batch: wrote ...`); pretty adds the
//! module target for tracing which parser skipped a line.

use std::io::{self, Write};

use env_logger::{Builder, Target};
use log::Record;

use crate::io::options::{AppOptions, LogFormat};

pub fn init_logger(options: &AppOptions) -> io::Result<()> {
    let format = options.log_format;
    let timestamp = options.log_timestamp;

    Builder::new()
        .filter_level(options.log_level.to_filter())
        .write_style(env_logger::WriteStyle::Never)
        .target(Target::Stderr)
        .format(move |buf, record| {
            if timestamp {
                write!(buf, "{} ", buf.timestamp_millis())?;
            }
            writeln!(buf, "{}", format_record(format, record))
        })
        .try_init()
        .map_err(io::Error::other)
}

/// One record without the timestamp prefix. The level column is padded so
/// the messages line up across levels.
fn format_record(format: LogFormat, record: &Record<'_>) -> String {
    match format {
        LogFormat::Compact => format!("{:<5} {}", record.level(), record.args()),
        LogFormat::Pretty => format!(
            "{:<5} [{}] {}",
            record.level(),
            record.target(),
            record.args()
        ),
    }
}
