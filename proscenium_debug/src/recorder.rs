// Copyright 2026 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Compact binary event recording and decoding.
//!
//! [`RecorderSink`] implements [`TraceSink`] and encodes events into a
//! `Vec<u8>` as fixed-size little-endian records. [`decode`] reads them back
//! as an iterator of [`RecordedEvent`].
//!
//! Counts are stored as `u32`; recordings with more than four billion nodes
//! per frame are not a target.

use proscenium_core::trace::{
    DrawNodeEvent, EnterFrameEvent, FrameBeginEvent, FrameEndEvent, PathRebuildEvent, TraceSink,
};

// ---------------------------------------------------------------------------
// Event type discriminants
// ---------------------------------------------------------------------------

const TAG_FRAME_BEGIN: u8 = 1;
const TAG_FRAME_END: u8 = 2;
const TAG_PATH_REBUILD: u8 = 3;
const TAG_ENTER_FRAME: u8 = 4;
const TAG_DRAW_NODE: u8 = 5;

// ---------------------------------------------------------------------------
// RecorderSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that encodes events into a compact binary buffer.
#[derive(Debug, Default)]
pub struct RecorderSink {
    buf: Vec<u8>,
}

impl RecorderSink {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a view of the recorded bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Consumes the recorder and returns the recorded bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    // -- encoding helpers --------------------------------------------------

    fn write_u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    fn write_u32(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_u64(&mut self, v: u64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_f64(&mut self, v: f64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_count(&mut self, v: usize) {
        #[expect(
            clippy::cast_possible_truncation,
            reason = "counts are capped at u32::MAX for recording"
        )]
        self.write_u32(v.min(u32::MAX as usize) as u32);
    }
}

impl TraceSink for RecorderSink {
    fn on_frame_begin(&mut self, e: &FrameBeginEvent) {
        self.write_u8(TAG_FRAME_BEGIN);
        self.write_u64(e.frame_index);
        self.write_f64(e.timestamp_ms);
    }

    fn on_frame_end(&mut self, e: &FrameEndEvent) {
        self.write_u8(TAG_FRAME_END);
        self.write_u64(e.frame_index);
        self.write_count(e.layers_cleared);
        self.write_count(e.nodes_drawn);
    }

    fn on_path_rebuild(&mut self, e: &PathRebuildEvent) {
        self.write_u8(TAG_PATH_REBUILD);
        self.write_count(e.attached);
        self.write_count(e.total);
    }

    fn on_enter_frame(&mut self, e: &EnterFrameEvent) {
        self.write_u8(TAG_ENTER_FRAME);
        self.write_u64(e.frame_index);
        self.write_count(e.receivers);
    }

    fn on_draw_node(&mut self, e: &DrawNodeEvent) {
        self.write_u8(TAG_DRAW_NODE);
        self.write_u64(e.frame_index);
        self.write_u32(e.node_index);
        self.write_count(e.op_count);
    }
}

// ---------------------------------------------------------------------------
// Decoder
// ---------------------------------------------------------------------------

/// A decoded event from a binary recording.
#[derive(Clone, Copy, Debug)]
pub enum RecordedEvent {
    /// A [`FrameBeginEvent`].
    FrameBegin(FrameBeginEvent),
    /// A [`FrameEndEvent`].
    FrameEnd(FrameEndEvent),
    /// A [`PathRebuildEvent`].
    PathRebuild(PathRebuildEvent),
    /// An [`EnterFrameEvent`].
    EnterFrame(EnterFrameEvent),
    /// A [`DrawNodeEvent`].
    DrawNode(DrawNodeEvent),
}

/// Decodes a byte slice produced by [`RecorderSink`] into an iterator of
/// [`RecordedEvent`].
pub fn decode(bytes: &[u8]) -> DecodeIter<'_> {
    DecodeIter {
        data: bytes,
        pos: 0,
    }
}

/// Iterator over decoded events.
#[derive(Debug)]
pub struct DecodeIter<'a> {
    data: &'a [u8],
    pos: usize,
}

impl DecodeIter<'_> {
    fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    fn read_u8(&mut self) -> Option<u8> {
        if self.remaining() < 1 {
            return None;
        }
        let v = self.data[self.pos];
        self.pos += 1;
        Some(v)
    }

    fn read_u32(&mut self) -> Option<u32> {
        if self.remaining() < 4 {
            return None;
        }
        let v = u32::from_le_bytes(self.data[self.pos..self.pos + 4].try_into().ok()?);
        self.pos += 4;
        Some(v)
    }

    fn read_u64(&mut self) -> Option<u64> {
        if self.remaining() < 8 {
            return None;
        }
        let v = u64::from_le_bytes(self.data[self.pos..self.pos + 8].try_into().ok()?);
        self.pos += 8;
        Some(v)
    }

    fn read_f64(&mut self) -> Option<f64> {
        if self.remaining() < 8 {
            return None;
        }
        let v = f64::from_le_bytes(self.data[self.pos..self.pos + 8].try_into().ok()?);
        self.pos += 8;
        Some(v)
    }

    fn read_count(&mut self) -> Option<usize> {
        self.read_u32().map(|v| v as usize)
    }

    fn decode_frame_begin(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::FrameBegin(FrameBeginEvent {
            frame_index: self.read_u64()?,
            timestamp_ms: self.read_f64()?,
        }))
    }

    fn decode_frame_end(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::FrameEnd(FrameEndEvent {
            frame_index: self.read_u64()?,
            layers_cleared: self.read_count()?,
            nodes_drawn: self.read_count()?,
        }))
    }

    fn decode_path_rebuild(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::PathRebuild(PathRebuildEvent {
            attached: self.read_count()?,
            total: self.read_count()?,
        }))
    }

    fn decode_enter_frame(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::EnterFrame(EnterFrameEvent {
            frame_index: self.read_u64()?,
            receivers: self.read_count()?,
        }))
    }

    fn decode_draw_node(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::DrawNode(DrawNodeEvent {
            frame_index: self.read_u64()?,
            node_index: self.read_u32()?,
            op_count: self.read_count()?,
        }))
    }
}

impl Iterator for DecodeIter<'_> {
    type Item = RecordedEvent;

    fn next(&mut self) -> Option<Self::Item> {
        let tag = self.read_u8()?;
        match tag {
            TAG_FRAME_BEGIN => self.decode_frame_begin(),
            TAG_FRAME_END => self.decode_frame_end(),
            TAG_PATH_REBUILD => self.decode_path_rebuild(),
            TAG_ENTER_FRAME => self.decode_enter_frame(),
            TAG_DRAW_NODE => self.decode_draw_node(),
            _ => None, // unknown tag → stop iteration
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_frame_begin() {
        let mut rec = RecorderSink::new();
        rec.on_frame_begin(&FrameBeginEvent {
            frame_index: 7,
            timestamp_ms: 116.625,
        });

        let events: Vec<_> = decode(rec.as_bytes()).collect();
        assert_eq!(events.len(), 1);
        match &events[0] {
            RecordedEvent::FrameBegin(e) => {
                assert_eq!(e.frame_index, 7);
                assert_eq!(e.timestamp_ms, 116.625);
            }
            other => panic!("expected FrameBegin, got {other:?}"),
        }
    }

    #[test]
    fn round_trip_frame_end() {
        let mut rec = RecorderSink::new();
        rec.on_frame_end(&FrameEndEvent {
            frame_index: 7,
            layers_cleared: 2,
            nodes_drawn: 41,
        });

        let events: Vec<_> = decode(rec.as_bytes()).collect();
        match &events[0] {
            RecordedEvent::FrameEnd(e) => {
                assert_eq!(e.frame_index, 7);
                assert_eq!(e.layers_cleared, 2);
                assert_eq!(e.nodes_drawn, 41);
            }
            other => panic!("expected FrameEnd, got {other:?}"),
        }
    }

    #[test]
    fn round_trip_path_rebuild_and_enter_frame() {
        let mut rec = RecorderSink::new();
        rec.on_path_rebuild(&PathRebuildEvent {
            attached: 5,
            total: 8,
        });
        rec.on_enter_frame(&EnterFrameEvent {
            frame_index: 3,
            receivers: 2,
        });

        let events: Vec<_> = decode(rec.as_bytes()).collect();
        assert_eq!(events.len(), 2);
        match &events[0] {
            RecordedEvent::PathRebuild(e) => {
                assert_eq!(e.attached, 5);
                assert_eq!(e.total, 8);
            }
            other => panic!("expected PathRebuild, got {other:?}"),
        }
        match &events[1] {
            RecordedEvent::EnterFrame(e) => {
                assert_eq!(e.frame_index, 3);
                assert_eq!(e.receivers, 2);
            }
            other => panic!("expected EnterFrame, got {other:?}"),
        }
    }

    #[test]
    fn round_trip_draw_node() {
        let mut rec = RecorderSink::new();
        rec.on_draw_node(&DrawNodeEvent {
            frame_index: 9,
            node_index: 12,
            op_count: 6,
        });

        let events: Vec<_> = decode(rec.as_bytes()).collect();
        match &events[0] {
            RecordedEvent::DrawNode(e) => {
                assert_eq!(e.frame_index, 9);
                assert_eq!(e.node_index, 12);
                assert_eq!(e.op_count, 6);
            }
            other => panic!("expected DrawNode, got {other:?}"),
        }
    }

    #[test]
    fn whole_frame_sequence_decodes_in_order() {
        let mut rec = RecorderSink::new();
        rec.on_frame_begin(&FrameBeginEvent {
            frame_index: 1,
            timestamp_ms: 16.0,
        });
        rec.on_enter_frame(&EnterFrameEvent {
            frame_index: 1,
            receivers: 0,
        });
        rec.on_path_rebuild(&PathRebuildEvent {
            attached: 3,
            total: 3,
        });
        rec.on_draw_node(&DrawNodeEvent {
            frame_index: 1,
            node_index: 2,
            op_count: 4,
        });
        rec.on_frame_end(&FrameEndEvent {
            frame_index: 1,
            layers_cleared: 1,
            nodes_drawn: 1,
        });

        let events: Vec<_> = decode(rec.as_bytes()).collect();
        assert_eq!(events.len(), 5);
        assert!(matches!(events[0], RecordedEvent::FrameBegin(_)));
        assert!(matches!(events[1], RecordedEvent::EnterFrame(_)));
        assert!(matches!(events[2], RecordedEvent::PathRebuild(_)));
        assert!(matches!(events[3], RecordedEvent::DrawNode(_)));
        assert!(matches!(events[4], RecordedEvent::FrameEnd(_)));
    }

    #[test]
    fn empty_buffer_decodes_to_nothing() {
        let events: Vec<_> = decode(&[]).collect();
        assert!(events.is_empty());
    }

    #[test]
    fn truncated_record_stops_iteration() {
        let mut rec = RecorderSink::new();
        rec.on_frame_begin(&FrameBeginEvent {
            frame_index: 1,
            timestamp_ms: 0.0,
        });
        let bytes = rec.into_bytes();
        let events: Vec<_> = decode(&bytes[..bytes.len() - 3]).collect();
        assert!(events.is_empty());
    }
}
