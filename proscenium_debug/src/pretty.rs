// Copyright 2026 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output and scene-tree dumps.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr).
//! [`format_tree`] renders a stage's node tree as an indented listing for
//! debugging topology and property state.

use std::fmt::Write as _;
use std::io::Write;

use proscenium_core::scene::{NodeId, Stage};
use proscenium_core::trace::{
    DrawNodeEvent, EnterFrameEvent, FrameBeginEvent, FrameEndEvent, PathRebuildEvent, TraceSink,
};

/// Writes human-readable trace lines to a [`Write`](std::io::Write)
/// destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink").finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self {
            writer: Box::new(std::io::stderr()),
        }
    }

    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>) -> Self {
        Self { writer }
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W) -> Self {
        Self { writer }
    }

    /// Consumes the sink and returns the writer.
    pub fn into_writer(self) -> W {
        self.writer
    }
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_frame_begin(&mut self, e: &FrameBeginEvent) {
        let _ = writeln!(
            self.writer,
            "[frame:begin] frame={} t={:.3}ms",
            e.frame_index, e.timestamp_ms,
        );
    }

    fn on_frame_end(&mut self, e: &FrameEndEvent) {
        let _ = writeln!(
            self.writer,
            "[frame:end] frame={} layers={} drawn={}",
            e.frame_index, e.layers_cleared, e.nodes_drawn,
        );
    }

    fn on_path_rebuild(&mut self, e: &PathRebuildEvent) {
        let _ = writeln!(
            self.writer,
            "[path] attached={} total={}",
            e.attached, e.total,
        );
    }

    fn on_enter_frame(&mut self, e: &EnterFrameEvent) {
        let _ = writeln!(
            self.writer,
            "[enter-frame] frame={} receivers={}",
            e.frame_index, e.receivers,
        );
    }

    fn on_draw_node(&mut self, e: &DrawNodeEvent) {
        let _ = writeln!(
            self.writer,
            "[draw] frame={} node={} ops={}",
            e.frame_index, e.node_index, e.op_count,
        );
    }
}

/// Renders the stage's attached tree as an indented listing.
///
/// One line per node: slot index, name (`-` when unset), layer and hidden
/// markers, translation, and local alpha.
#[must_use]
pub fn format_tree(stage: &Stage) -> String {
    let mut out = String::new();
    format_node(stage, stage.root(), 0, &mut out);
    out
}

fn format_node(stage: &Stage, node: NodeId, depth: usize, out: &mut String) {
    let m = stage.transform(node);
    let layer = if stage.is_layer(node) { " [layer]" } else { "" };
    let hidden = if stage.visible(node) { "" } else { " [hidden]" };
    let _ = writeln!(
        out,
        "{:indent$}#{} {}{layer}{hidden} t=({},{}) alpha={}",
        "",
        node.index(),
        stage.name(node).unwrap_or("-"),
        m.tx,
        m.ty,
        stage.alpha(node),
        indent = depth * 2,
    );
    for child in stage.children(node) {
        format_node(stage, child, depth + 1, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pretty_print_frame_lines() {
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new());
        sink.on_frame_begin(&FrameBeginEvent {
            frame_index: 1,
            timestamp_ms: 16.0,
        });
        sink.on_draw_node(&DrawNodeEvent {
            frame_index: 1,
            node_index: 3,
            op_count: 5,
        });
        let output = String::from_utf8(sink.into_writer()).unwrap();
        assert!(output.contains("[frame:begin]"), "got: {output}");
        assert!(output.contains("frame=1"), "got: {output}");
        assert!(output.contains("node=3 ops=5"), "got: {output}");
    }

    #[test]
    fn tree_dump_shows_names_and_structure() {
        use proscenium_core::geom::Matrix;

        let mut stage = Stage::new();
        let root = stage.root();
        let panel = stage.create_node();
        stage.set_name(panel, Some("panel".into()));
        stage.set_transform(panel, Matrix::from_translation(10.0, 20.0));
        stage.add_child(root, panel).unwrap();
        let child = stage.create_node();
        stage.set_visible(child, false);
        stage.add_child(panel, child).unwrap();

        let dump = format_tree(&stage);
        let lines: Vec<&str> = dump.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("#0"));
        assert!(lines[1].contains("panel"), "got: {dump}");
        assert!(lines[1].contains("t=(10,20)"), "got: {dump}");
        assert!(lines[2].starts_with("    "), "got: {dump}");
        assert!(lines[2].contains("[hidden]"), "got: {dump}");
    }
}
