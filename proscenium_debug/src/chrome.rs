// Copyright 2026 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chrome Trace Event Format exporter.
//!
//! [`export`] reads recorded bytes from a
//! [`RecorderSink`](super::recorder::RecorderSink) and writes
//! [Chrome Trace Event Format][spec] JSON to the given writer.
//!
//! [spec]: https://docs.google.com/document/d/1CvAClvFfyA5R-PhYUmn5OOQtYMH4h6I0nSsKchNAySU

use std::io::{self, Write};

use serde_json::{Value, json};

use crate::recorder::{RecordedEvent, decode};

/// Exports recorded events as Chrome Trace Event Format JSON.
///
/// The output is a complete JSON array of trace event objects, suitable for
/// loading into `chrome://tracing` or [Perfetto](https://ui.perfetto.dev/).
///
/// Frames become duration (`B`/`E`) pairs; everything else becomes instant
/// events at the enclosing frame's begin time. Host timestamps (milliseconds)
/// are converted to the microseconds the format expects.
///
/// # Errors
///
/// Returns any I/O error from the writer.
pub fn export(bytes: &[u8], writer: &mut dyn Write) -> io::Result<()> {
    let mut events: Vec<Value> = Vec::new();
    // Records carry one timestamp per frame, on the begin event.
    let mut frame_ts_us = 0.0_f64;

    for recorded in decode(bytes) {
        match recorded {
            RecordedEvent::FrameBegin(e) => {
                frame_ts_us = e.timestamp_ms * 1000.0;
                events.push(json!({
                    "ph": "B",
                    "name": "Frame",
                    "cat": "Frame",
                    "ts": frame_ts_us,
                    "pid": 0,
                    "tid": 0,
                    "args": {
                        "frame_index": e.frame_index,
                    }
                }));
            }
            RecordedEvent::FrameEnd(e) => {
                events.push(json!({
                    "ph": "E",
                    "name": "Frame",
                    "cat": "Frame",
                    "ts": frame_ts_us,
                    "pid": 0,
                    "tid": 0,
                    "args": {
                        "frame_index": e.frame_index,
                        "layers_cleared": e.layers_cleared,
                        "nodes_drawn": e.nodes_drawn,
                    }
                }));
            }
            RecordedEvent::PathRebuild(e) => {
                events.push(json!({
                    "ph": "i",
                    "name": "PathRebuild",
                    "cat": "Evaluate",
                    "ts": frame_ts_us,
                    "pid": 0,
                    "tid": 0,
                    "s": "g",
                    "args": {
                        "attached": e.attached,
                        "total": e.total,
                    }
                }));
            }
            RecordedEvent::EnterFrame(e) => {
                events.push(json!({
                    "ph": "i",
                    "name": "EnterFrame",
                    "cat": "Events",
                    "ts": frame_ts_us,
                    "pid": 0,
                    "tid": 0,
                    "s": "t",
                    "args": {
                        "frame_index": e.frame_index,
                        "receivers": e.receivers,
                    }
                }));
            }
            RecordedEvent::DrawNode(e) => {
                events.push(json!({
                    "ph": "i",
                    "name": "DrawNode",
                    "cat": "Draw",
                    "ts": frame_ts_us,
                    "pid": 0,
                    "tid": 0,
                    "s": "t",
                    "args": {
                        "frame_index": e.frame_index,
                        "node_index": e.node_index,
                        "op_count": e.op_count,
                    }
                }));
            }
        }
    }

    serde_json::to_writer_pretty(writer, &events)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recorder::RecorderSink;
    use proscenium_core::trace::{DrawNodeEvent, FrameBeginEvent, FrameEndEvent, TraceSink};

    #[test]
    fn export_produces_valid_json() {
        let mut rec = RecorderSink::new();
        rec.on_frame_begin(&FrameBeginEvent {
            frame_index: 0,
            timestamp_ms: 16.0,
        });
        rec.on_draw_node(&DrawNodeEvent {
            frame_index: 0,
            node_index: 2,
            op_count: 3,
        });
        rec.on_frame_end(&FrameEndEvent {
            frame_index: 0,
            layers_cleared: 1,
            nodes_drawn: 1,
        });

        let mut out = Vec::new();
        export(rec.as_bytes(), &mut out).unwrap();
        let json_str = String::from_utf8(out).unwrap();

        // Should parse as a JSON array.
        let parsed: Vec<Value> = serde_json::from_str(&json_str).unwrap();
        assert_eq!(parsed.len(), 3);

        // Frame as a duration pair around the draw instant.
        assert_eq!(parsed[0]["ph"], "B");
        assert_eq!(parsed[0]["name"], "Frame");
        assert_eq!(parsed[0]["ts"], 16000.0);
        assert_eq!(parsed[1]["ph"], "i");
        assert_eq!(parsed[1]["name"], "DrawNode");
        assert_eq!(parsed[2]["ph"], "E");
        assert_eq!(parsed[2]["args"]["nodes_drawn"], 1);
    }

    #[test]
    fn export_empty_recording() {
        let mut out = Vec::new();
        export(&[], &mut out).unwrap();
        let json_str = String::from_utf8(out).unwrap();
        let parsed: Vec<Value> = serde_json::from_str(&json_str).unwrap();
        assert!(parsed.is_empty());
    }
}
