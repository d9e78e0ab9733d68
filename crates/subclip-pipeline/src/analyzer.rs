//! Cue merging: turns a flat caption track into clip boundaries.
//!
//! A single left-to-right greedy pass groups adjacent cues under three
//! signals: the silence gap between cues, sentence-ending punctuation, and
//! the configured duration window. The max-duration ceiling always wins;
//! the minimum duration overrides sentence boundaries ("clip length beats
//! sentence aesthetics"); the gap threshold gates everything else.

use tracing::debug;

use subclip_models::{parse_timestamp, ChildSegment, Cue, Segment, TimestampError};

/// Thresholds driving the merge pass. A value of `0` disables that check.
#[derive(Debug, Clone, Copy)]
pub struct AnalyzerConfig {
    /// Source frame rate, used for per-segment frame counts
    pub fps: f64,
    /// Merge cues separated by at most this gap (ms)
    pub gap_threshold_ms: u64,
    /// Groups shorter than this (ms) force a merge past sentence boundaries
    pub min_segment_duration_ms: u64,
    /// Hard ceiling (ms) a merge may never exceed
    pub max_segment_duration_ms: u64,
}

/// A cue with its timecodes resolved to seconds.
#[derive(Debug, Clone)]
struct TimedCue {
    start: f64,
    end: f64,
    text: String,
}

/// Analyze an ordered cue sequence into merged, reindexed segments.
///
/// Cue ordering by start time is assumed, not verified. An empty input
/// produces an empty output.
pub fn analyze_cues(cues: &[Cue], config: &AnalyzerConfig) -> Result<Vec<Segment>, TimestampError> {
    let timed: Vec<TimedCue> = cues
        .iter()
        .map(|cue| {
            Ok(TimedCue {
                start: parse_timestamp(&cue.start)?,
                end: parse_timestamp(&cue.end)?,
                text: cue.text.clone(),
            })
        })
        .collect::<Result<_, TimestampError>>()?;

    let mut segments: Vec<Segment> = Vec::new();
    let mut group: Vec<TimedCue> = Vec::new();

    for cue in timed {
        if group.is_empty() {
            group.push(cue);
            continue;
        }

        // Invariant: group is non-empty here.
        let first = &group[0];
        let last = &group[group.len() - 1];

        let gap_ms = (cue.start - last.end) * 1000.0;
        let current_duration_ms = (last.end - first.start) * 1000.0;
        let potential_duration_ms = (cue.end - first.start) * 1000.0;

        let ends_sentence = ends_with_sentence(&last.text);
        let force_merge = config.min_segment_duration_ms > 0
            && current_duration_ms < config.min_segment_duration_ms as f64;
        let exceeds_max = config.max_segment_duration_ms > 0
            && potential_duration_ms > config.max_segment_duration_ms as f64;

        // Negative gaps (overlapping cues) always pass the gap check.
        let should_merge = gap_ms <= config.gap_threshold_ms as f64
            && (!ends_sentence || force_merge)
            && !exceeds_max;

        debug!(
            gap_ms,
            current_duration_ms,
            potential_duration_ms,
            ends_sentence,
            force_merge,
            exceeds_max,
            merged = should_merge,
            "Cue merge decision"
        );

        if should_merge {
            group.push(cue);
        } else {
            segments.push(close_group(&group, config.fps, segments.len() as u32 + 1));
            group = vec![cue];
        }
    }

    if !group.is_empty() {
        segments.push(close_group(&group, config.fps, segments.len() as u32 + 1));
    }

    Ok(segments)
}

/// True when the trimmed text ends in sentence-final punctuation.
fn ends_with_sentence(text: &str) -> bool {
    matches!(text.trim_end().chars().last(), Some('.') | Some('!') | Some('?'))
}

/// Emit one segment for a closed group.
///
/// Singleton groups carry the cue verbatim with no children; larger groups
/// span first-start to last-end, keep every cue's absolute timing as a
/// child, and join captions with newlines.
fn close_group(group: &[TimedCue], fps: f64, index: u32) -> Segment {
    let first = &group[0];
    let last = &group[group.len() - 1];

    let children = if group.len() >= 2 {
        Some(
            group
                .iter()
                .map(|cue| ChildSegment {
                    start_time: cue.start,
                    end_time: cue.end,
                    text: cue.text.clone(),
                })
                .collect(),
        )
    } else {
        None
    };

    let caption = group
        .iter()
        .map(|cue| cue.text.as_str())
        .collect::<Vec<_>>()
        .join("\n");

    Segment::new(index, first.start, last.end, fps, caption, children)
}
