//! Stroke recording
//!
//! Strokes live in one flat sequence; a `None` entry is the break
//! sentinel between consecutive strokes, so the structure stays flat
//! without nesting. Points are stored exactly as the coordinate mapper
//! produced them: no deduplication, no smoothing.

use crate::capture::geometry::Point;
use std::fmt;

/// Append-only stroke buffer for one capture session
#[derive(Debug, Default, Clone)]
pub struct StrokeRecorder {
    entries: Vec<Option<Point>>,
}

impl StrokeRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the start of a new stroke. No sentinel is written before
    /// the very first stroke of the session.
    pub fn begin_stroke(&mut self) {
        if !self.entries.is_empty() {
            self.entries.push(None);
        }
    }

    /// Append a point to the current stroke
    pub fn push_point(&mut self, p: Point) {
        self.entries.push(Some(p));
    }

    /// Drop all recorded strokes and sentinels
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total recorded points across all strokes
    pub fn point_count(&self) -> usize {
        self.entries.iter().filter(|e| e.is_some()).count()
    }

    /// Iterate strokes as contiguous point runs
    pub fn strokes(&self) -> impl Iterator<Item = Vec<Point>> + '_ {
        self.entries
            .split(|e| e.is_none())
            .filter(|run| !run.is_empty())
            .map(|run| run.iter().filter_map(|e| *e).collect())
    }

    pub fn stroke_count(&self) -> usize {
        self.strokes().count()
    }
}

impl fmt::Display for StrokeRecorder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "StrokeRecorder({} strokes, {} points)",
            self.stroke_count(),
            self.point_count()
        )
    }
}
