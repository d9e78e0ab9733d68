//! Timecode parsing and formatting.
//!
//! The canonical grammar is `HH:MM:SS.mmm`. The SRT comma variant
//! (`HH:MM:SS,mmm`) is accepted on read and normalized. All arithmetic is
//! performed on a single canonical unit (seconds as `f64`, exact at
//! millisecond granularity); formatting rounds to the nearest total
//! millisecond before decomposing so carry propagates across components.

use thiserror::Error;

/// Timecode parsing error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimestampError {
    #[error("timecode cannot be empty")]
    Empty,

    #[error("invalid {component} value: {value}")]
    InvalidValue {
        component: &'static str,
        value: String,
    },

    #[error("invalid timecode format '{0}', expected HH:MM:SS.mmm")]
    InvalidFormat(String),
}

/// Parse a timecode string to total seconds.
///
/// Accepts `HH:MM:SS`, `HH:MM:SS.mmm`, and the comma-delimited millisecond
/// variant `HH:MM:SS,mmm`. Milliseconds beyond three digits are truncated.
///
/// # Examples
/// ```
/// use subclip_models::timestamp::parse_timestamp;
/// assert_eq!(parse_timestamp("00:01:30.000").unwrap(), 90.0);
/// assert_eq!(parse_timestamp("00:00:02,300").unwrap(), 2.3);
/// ```
pub fn parse_timestamp(ts: &str) -> Result<f64, TimestampError> {
    let ts = ts.trim();
    if ts.is_empty() {
        return Err(TimestampError::Empty);
    }

    // Normalize the SRT comma variant before splitting out the fraction.
    let normalized = ts.replace(',', ".");
    let parts: Vec<&str> = normalized.split(':').collect();
    if parts.len() != 3 {
        return Err(TimestampError::InvalidFormat(ts.to_string()));
    }

    let hours = parse_component(parts[0], "hours")?;
    let minutes = parse_component(parts[1], "minutes")?;

    let (secs_str, frac) = match parts[2].split_once('.') {
        Some((s, f)) => (s, f),
        None => (parts[2], ""),
    };
    let seconds = parse_component(secs_str, "seconds")?;
    let millis = parse_millis(frac)?;

    let total_ms = hours * 3_600_000 + minutes * 60_000 + seconds * 1_000 + millis;
    Ok(total_ms as f64 / 1000.0)
}

fn parse_component(value: &str, component: &'static str) -> Result<u64, TimestampError> {
    value.parse::<u64>().map_err(|_| TimestampError::InvalidValue {
        component,
        value: value.to_string(),
    })
}

fn parse_millis(frac: &str) -> Result<u64, TimestampError> {
    if frac.is_empty() {
        return Ok(0);
    }
    if !frac.chars().all(|c| c.is_ascii_digit()) {
        return Err(TimestampError::InvalidValue {
            component: "milliseconds",
            value: frac.to_string(),
        });
    }
    let mut digits = frac.to_string();
    digits.truncate(3);
    while digits.len() < 3 {
        digits.push('0');
    }
    // Padded to exactly three ASCII digits above.
    Ok(digits.parse::<u64>().unwrap_or(0))
}

/// Format total seconds as `HH:MM:SS.mmm`.
///
/// The value is rounded to the nearest total millisecond first, so a
/// duration like 999.9996s formats as `00:16:40.000` rather than truncating
/// the second component.
///
/// # Examples
/// ```
/// use subclip_models::timestamp::format_timestamp;
/// assert_eq!(format_timestamp(90.0), "00:01:30.000");
/// assert_eq!(format_timestamp(999.9996), "00:16:40.000");
/// ```
pub fn format_timestamp(total_secs: f64) -> String {
    let total_ms = (total_secs * 1000.0).round().max(0.0) as u64;
    let hours = total_ms / 3_600_000;
    let minutes = (total_ms % 3_600_000) / 60_000;
    let seconds = (total_ms % 60_000) / 1_000;
    let millis = total_ms % 1_000;
    format!("{:02}:{:02}:{:02}.{:03}", hours, minutes, seconds, millis)
}
