use crate::handler::Record;
use chrono::{DateTime, FixedOffset};
use std::fmt::Write;
use std::path::Path;

/// Writes `<timestamp> <LEVEL> [<file>:<line> ]<message>`.
pub fn write_header(writer: &mut impl Write, record: &Record, add_source: bool) -> std::fmt::Result {
    write_timestamp(writer, &record.time)?;
    write!(writer, " ")?;
    write_level(writer, record.level)?;
    write!(writer, " ")?;

    if add_source && let Some(source) = &record.source {
        write!(writer, "{}:{} ", basename(&source.file), source.line)?;
    }

    write!(writer, "{}", record.message)
}

/// RFC 3339 with at most millisecond precision. Trailing zeros of the fraction are dropped,
/// and so is the dot when nothing remains. UTC is written as `Z`.
fn write_timestamp(writer: &mut impl Write, time: &DateTime<FixedOffset>) -> std::fmt::Result {
    write!(writer, "{}", time.format("%Y-%m-%dT%H:%M:%S"))?;

    // Leap seconds report up to 1999 millis.
    let millis = time.timestamp_subsec_millis() % 1000;
    if millis > 0 {
        let fraction = format!("{:03}", millis);
        write!(writer, ".{}", fraction.trim_end_matches('0'))?;
    }

    if time.offset().local_minus_utc() == 0 {
        write!(writer, "Z")
    } else {
        write!(writer, "{}", time.format("%:z"))
    }
}

fn basename(file: &str) -> &str {
    Path::new(file)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(file)
}

#[cfg(not(feature = "pretty_logs"))]
fn write_level(writer: &mut impl Write, level: tracing::Level) -> std::fmt::Result {
    write!(writer, "{}", level)
}

#[cfg(feature = "pretty_logs")]
fn write_level(writer: &mut impl Write, level: tracing::Level) -> std::fmt::Result {
    use nu_ansi_term::{Color, Style};
    use tracing::Level;

    let style = match level {
        Level::TRACE => Style::new().fg(Color::Purple),
        Level::DEBUG => Style::new().fg(Color::Blue),
        Level::INFO => Style::new().fg(Color::Green),
        Level::WARN => Style::new().fg(Color::Yellow),
        Level::ERROR => Style::new().fg(Color::Red),
    };

    write!(writer, "{}{}{}", style.prefix(), level, style.suffix())
}
