//! Caption cues as produced by the caption parser.

use serde::{Deserialize, Serialize};

/// One caption entry: a start/end timecode pair and its text.
///
/// Cues are ordered by start time; that ordering is assumed by the segment
/// analyzer, not verified. Text may contain embedded line breaks, which are
/// preserved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cue {
    /// Start timecode (`HH:MM:SS.mmm`)
    pub start: String,
    /// End timecode (`HH:MM:SS.mmm`)
    pub end: String,
    /// Caption text, possibly multi-line
    pub text: String,
}

impl Cue {
    /// Create a cue from text-form timecodes.
    pub fn new(start: impl Into<String>, end: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
            text: text.into(),
        }
    }
}
