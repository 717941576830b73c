//! # Span Assignment
//!
//! Assigns each segment the spans its start and end stations fall in.
//!
//! Spans are walked left to right starting at the span after the girder's
//! start pier; the walk only advances when a station is past the current
//! span. Start stations belong to `[span start, span end)` and end stations to
//! `(span start, span end]`, so a segment that ends exactly on a pier ends in
//! the span before it, and the next segment starts in the span after it.

use tracing::{debug, warn};

use crate::bridge::BridgeTopology;
use crate::girder::SplicedGirder;
use crate::ids::SpanIndex;
use crate::profile::TOLERANCE;

/// Forward-only position in the bridge's span sequence.
struct SpanCursor<'a> {
    bridge: &'a dyn BridgeTopology,
    current: Option<SpanIndex>,
}

impl<'a> SpanCursor<'a> {
    /// Span holding a start station, `[start, end)`
    fn start_station(&mut self, station_ft: f64) -> Option<SpanIndex> {
        let span = self.advance_while(|end| station_ft >= end - TOLERANCE)?;
        let info = self.bridge.span(span)?;
        (station_ft >= info.start_station_ft - TOLERANCE).then_some(span)
    }

    /// Span holding an end station, `(start, end]`
    fn end_station(&mut self, station_ft: f64) -> Option<SpanIndex> {
        let span = self.advance_while(|end| station_ft > end + TOLERANCE)?;
        let info = self.bridge.span(span)?;
        (station_ft > info.start_station_ft + TOLERANCE).then_some(span)
    }

    /// Move forward while `past(span end station)` holds.
    fn advance_while(&mut self, past: impl Fn(f64) -> bool) -> Option<SpanIndex> {
        while let Some(span) = self.current {
            match self.bridge.span(span) {
                Some(info) if past(info.end_station_ft) => self.current = Some(span.next()),
                Some(_) => return Some(span),
                None => self.current = None,
            }
        }
        None
    }
}

impl SplicedGirder {
    /// Recompute `span_start` / `span_end` on every segment.
    ///
    /// Segments whose stations cannot be located keep `None` references.
    pub fn resolve_spans(&mut self, bridge: &dyn BridgeTopology) {
        let mut cursor = SpanCursor {
            bridge,
            current: bridge.span_after_pier(self.start_pier),
        };
        if cursor.current.is_none() {
            warn!(pier = %self.start_pier, "no span starts at the girder's start pier");
        }

        for index in 0..self.segments.len() {
            let (span_start, span_end) = match self.segment_stations(index, bridge) {
                Some((start, end)) => (cursor.start_station(start), cursor.end_station(end)),
                None => {
                    warn!(segment = index, "segment stations cannot be located");
                    (None, None)
                }
            };
            let segment = &mut self.segments[index];
            segment.span_start = span_start;
            segment.span_end = span_end;
            debug!(
                segment = index,
                span_start = ?span_start,
                span_end = ?span_end,
                "span assignment"
            );
        }
    }
}
