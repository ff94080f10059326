// Copyright 2026 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Host input translation.
//!
//! The host feeds raw input samples in; these entry points resolve them to
//! scene targets and dispatch the corresponding events. Pointer events hit
//! the topmost node whose stage-space subtree bounds contain the point (the
//! scene path scanned from the end); keyboard and text input are broadcast to
//! the dispatcher queue, ignoring tree structure.
//!
//! Hover state is a single "pointer inside" flag per node, tracking the
//! topmost hit only: entering fires `MouseOver` + `MouseEnter`, losing
//! topmost status fires `MouseOut` + `MouseLeave`, and staying put fires
//! `MouseMove`.

use crate::event::{
    Event, EventKind, EventPayload, KeySample, MouseData, PointerSample, TextSample, TouchData,
    TouchSample, WheelSample,
};
use crate::geom::Point;

use super::id::NodeId;
use super::store::Stage;

impl Stage {
    /// Returns the topmost effectively visible node whose subtree bounds
    /// contain the stage-space point.
    ///
    /// Call [`evaluate`](Self::evaluate) first when topology or properties
    /// have changed; the input entry points below do so themselves.
    #[must_use]
    pub fn hit_test(&self, point: Point) -> Option<NodeId> {
        for &idx in self.scene_path().iter().rev() {
            // The stage root itself is not a hit target.
            if idx == 0 || !self.effective_visible[idx as usize] {
                continue;
            }
            let node = NodeId {
                idx,
                generation: self.generation[idx as usize],
            };
            let bounds = self.get_bounds(node, self.root());
            if !bounds.is_empty() && bounds.contains_point(point) {
                return Some(node);
            }
        }
        None
    }

    /// Translates a button press. Returns whether a node was hit and a
    /// listener handled the event.
    pub fn on_pointer_down(&mut self, sample: &PointerSample) -> bool {
        self.pointer_button_event(EventKind::MouseDown, sample)
    }

    /// Translates a button release.
    pub fn on_pointer_up(&mut self, sample: &PointerSample) -> bool {
        self.pointer_button_event(EventKind::MouseUp, sample)
    }

    /// Translates a click.
    pub fn on_click(&mut self, sample: &PointerSample) -> bool {
        self.pointer_button_event(EventKind::Click, sample)
    }

    /// Translates a double click.
    pub fn on_double_click(&mut self, sample: &PointerSample) -> bool {
        self.pointer_button_event(EventKind::DoubleClick, sample)
    }

    /// Translates a context-menu request.
    pub fn on_context_menu(&mut self, sample: &PointerSample) -> bool {
        self.pointer_button_event(EventKind::ContextMenu, sample)
    }

    /// Translates a wheel sample to the node under the pointer.
    pub fn on_wheel(&mut self, sample: &WheelSample) -> bool {
        self.evaluate();
        let Some(node) = self.hit_test(sample.position) else {
            return false;
        };
        let mut event = Event::with_flags(EventKind::Wheel, true, true)
            .with_timestamp(sample.timestamp_ms)
            .with_payload(EventPayload::Mouse(MouseData {
                stage: sample.position,
                delta: sample.delta,
                modifiers: sample.modifiers,
                ..MouseData::default()
            }));
        self.dispatch_fresh(node, &mut event)
    }

    /// Translates pointer motion, maintaining hover state.
    ///
    /// A node newly under the pointer receives `MouseOver` then `MouseEnter`;
    /// the node that lost topmost status receives `MouseOut` then
    /// `MouseLeave`; an unchanged topmost node receives `MouseMove`.
    pub fn on_pointer_move(&mut self, sample: &PointerSample) {
        self.evaluate();
        let hit = self.hit_test(sample.position);

        // Flush stale hover flags before anything new fires.
        for idx in 0..self.len {
            if self.pointer_inside[idx as usize] && hit.map(|h| h.idx) != Some(idx) {
                self.pointer_inside[idx as usize] = false;
                let node = NodeId {
                    idx,
                    generation: self.generation[idx as usize],
                };
                self.hover_pair(node, EventKind::MouseOut, EventKind::MouseLeave, sample);
            }
        }

        let Some(node) = hit else { return };
        if self.pointer_inside[node.idx as usize] {
            let mut event = Event::with_flags(EventKind::MouseMove, true, true)
                .with_timestamp(sample.timestamp_ms)
                .with_payload(pointer_payload(sample));
            let _ = self.dispatch_fresh(node, &mut event);
        } else {
            self.pointer_inside[node.idx as usize] = true;
            self.hover_pair(node, EventKind::MouseOver, EventKind::MouseEnter, sample);
        }
    }

    /// Handles the pointer leaving the stage entirely.
    ///
    /// All hover flags reset, and one `MouseOut` + `MouseLeave` pair fires on
    /// the topmost layer, or on the stage root when no layer exists.
    pub fn on_pointer_leave(&mut self, timestamp_ms: f64) {
        for idx in 0..self.len {
            self.pointer_inside[idx as usize] = false;
        }
        let target = self.topmost_layer().unwrap_or_else(|| self.root());
        let sample = PointerSample::at(Point::ZERO, timestamp_ms);
        self.hover_pair(target, EventKind::MouseOut, EventKind::MouseLeave, &sample);
    }

    /// Broadcasts a key press to every queue member listening for it.
    pub fn on_key_down(&mut self, sample: &KeySample) -> bool {
        self.key_event(EventKind::KeyDown, sample)
    }

    /// Broadcasts a key release.
    pub fn on_key_up(&mut self, sample: &KeySample) -> bool {
        self.key_event(EventKind::KeyUp, sample)
    }

    /// Broadcasts a character-producing key press.
    pub fn on_key_press(&mut self, sample: &KeySample) -> bool {
        self.key_event(EventKind::KeyPress, sample)
    }

    /// Broadcasts committed text input.
    pub fn on_text_input(&mut self, sample: TextSample) -> bool {
        let mut event = Event::with_flags(EventKind::TextInput, false, true)
            .with_timestamp(sample.timestamp_ms)
            .with_payload(EventPayload::Text(sample.text));
        matches!(self.broadcast_event(&mut event), Ok(true))
    }

    /// Translates a touch contact beginning, targeting the hit node.
    pub fn on_touch_start(&mut self, sample: &TouchSample) -> bool {
        self.touch_event(EventKind::TouchStart, sample)
    }

    /// Translates touch contact motion.
    pub fn on_touch_move(&mut self, sample: &TouchSample) -> bool {
        self.touch_event(EventKind::TouchMove, sample)
    }

    /// Translates a touch contact lifting.
    pub fn on_touch_end(&mut self, sample: &TouchSample) -> bool {
        self.touch_event(EventKind::TouchEnd, sample)
    }

    // -- Internal helpers --

    fn pointer_button_event(&mut self, kind: EventKind, sample: &PointerSample) -> bool {
        self.evaluate();
        let Some(node) = self.hit_test(sample.position) else {
            return false;
        };
        let mut event = Event::with_flags(kind, true, true)
            .with_timestamp(sample.timestamp_ms)
            .with_payload(pointer_payload(sample));
        self.dispatch_fresh(node, &mut event)
    }

    fn touch_event(&mut self, kind: EventKind, sample: &TouchSample) -> bool {
        self.evaluate();
        let Some(node) = self.hit_test(sample.position) else {
            return false;
        };
        let mut event = Event::with_flags(kind, true, true)
            .with_timestamp(sample.timestamp_ms)
            .with_payload(EventPayload::Touch(TouchData {
                stage: sample.position,
                contact_id: sample.contact_id,
            }));
        self.dispatch_fresh(node, &mut event)
    }

    fn key_event(&mut self, kind: EventKind, sample: &KeySample) -> bool {
        let mut event = Event::with_flags(kind, false, true)
            .with_timestamp(sample.timestamp_ms)
            .with_payload(EventPayload::Keyboard(crate::event::KeyData {
                key: sample.key,
                repeat: sample.repeat,
                modifiers: sample.modifiers,
            }));
        matches!(self.broadcast_event(&mut event), Ok(true))
    }

    /// Fires a bubbling/non-bubbling hover event pair at `node`.
    fn hover_pair(&mut self, node: NodeId, bubbling: EventKind, scoped: EventKind, sample: &PointerSample) {
        let mut event = Event::with_flags(bubbling, true, true)
            .with_timestamp(sample.timestamp_ms)
            .with_payload(pointer_payload(sample));
        let _ = self.dispatch_fresh(node, &mut event);
        let mut event = Event::with_flags(scoped, false, false)
            .with_timestamp(sample.timestamp_ms)
            .with_payload(pointer_payload(sample));
        let _ = self.dispatch_fresh(node, &mut event);
    }

    fn dispatch_fresh(&mut self, node: NodeId, event: &mut Event) -> bool {
        // Freshly built events can never arrive cancelled.
        matches!(self.dispatch_event(node, event), Ok(true))
    }
}

fn pointer_payload(sample: &PointerSample) -> EventPayload {
    EventPayload::Mouse(MouseData {
        stage: sample.position,
        button: sample.button,
        delta: Point::ZERO,
        modifiers: sample.modifiers,
    })
}

#[cfg(test)]
mod tests {
    use alloc::rc::Rc;
    use alloc::vec;
    use alloc::vec::Vec;
    use core::cell::RefCell;

    use super::*;
    use crate::draw::DrawOp;
    use crate::geom::{Matrix, Rectangle};

    type Log = Rc<RefCell<Vec<EventKind>>>;

    fn record(stage: &mut Stage, node: NodeId, kinds: &[EventKind], log: &Log) {
        for &kind in kinds {
            let log = Rc::clone(log);
            stage.add_event_listener(node, kind, false, move |_, event| {
                log.borrow_mut().push(event.kind);
            });
        }
    }

    fn rect_node(stage: &mut Stage, r: Rectangle) -> NodeId {
        let id = stage.create_node();
        stage.draw_list_mut(id).push(DrawOp::Rect(r));
        id
    }

    #[test]
    fn click_hits_the_topmost_overlapping_node() {
        let mut stage = Stage::new();
        let root = stage.root();
        let below = rect_node(&mut stage, Rectangle::new(0.0, 0.0, 100.0, 100.0));
        let above = rect_node(&mut stage, Rectangle::new(0.0, 0.0, 100.0, 100.0));
        stage.add_child_at(root, below, 0).unwrap();
        stage.add_child_at(root, above, 1).unwrap();

        let log: Log = Log::default();
        record(&mut stage, below, &[EventKind::Click], &log);
        record(&mut stage, above, &[EventKind::Click], &log);

        let hit = Rc::new(RefCell::new(None));
        {
            let hit = Rc::clone(&hit);
            stage.add_event_listener(above, EventKind::Click, false, move |_, event| {
                *hit.borrow_mut() = event.target;
            });
        }

        assert!(stage.on_click(&PointerSample::at(Point::new(50.0, 50.0), 0.0)));
        assert_eq!(*hit.borrow(), Some(above));
        // Exactly one dispatch, at `above`.
        assert_eq!(*log.borrow(), vec![EventKind::Click]);
    }

    #[test]
    fn miss_means_no_dispatch() {
        let mut stage = Stage::new();
        let root = stage.root();
        let shape = rect_node(&mut stage, Rectangle::new(0.0, 0.0, 10.0, 10.0));
        stage.add_child(root, shape).unwrap();
        let log: Log = Log::default();
        record(&mut stage, shape, &[EventKind::Click], &log);

        assert!(!stage.on_click(&PointerSample::at(Point::new(50.0, 50.0), 0.0)));
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn invisible_nodes_are_not_hit() {
        let mut stage = Stage::new();
        let root = stage.root();
        let shape = rect_node(&mut stage, Rectangle::new(0.0, 0.0, 10.0, 10.0));
        stage.add_child(root, shape).unwrap();
        stage.set_visible(shape, false);
        let log: Log = Log::default();
        record(&mut stage, shape, &[EventKind::MouseDown], &log);

        assert!(!stage.on_pointer_down(&PointerSample::at(Point::new(5.0, 5.0), 0.0)));
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn hit_testing_respects_transforms() {
        let mut stage = Stage::new();
        let root = stage.root();
        let shape = rect_node(&mut stage, Rectangle::new(0.0, 0.0, 10.0, 10.0));
        stage.add_child(root, shape).unwrap();
        stage.set_transform(shape, Matrix::from_translation(40.0, 40.0));

        stage.add_event_listener(shape, EventKind::Click, false, |_, _| {});
        assert!(!stage.on_click(&PointerSample::at(Point::new(5.0, 5.0), 0.0)));
        assert!(stage.on_click(&PointerSample::at(Point::new(45.0, 45.0), 0.0)));
    }

    #[test]
    fn hover_transitions_fire_the_full_sequence() {
        let mut stage = Stage::new();
        let root = stage.root();
        let shape = rect_node(&mut stage, Rectangle::new(0.0, 0.0, 10.0, 10.0));
        stage.add_child(root, shape).unwrap();

        let log: Log = Log::default();
        record(
            &mut stage,
            shape,
            &[
                EventKind::MouseOver,
                EventKind::MouseEnter,
                EventKind::MouseMove,
                EventKind::MouseOut,
                EventKind::MouseLeave,
            ],
            &log,
        );

        stage.on_pointer_move(&PointerSample::at(Point::new(5.0, 5.0), 0.0));
        stage.on_pointer_move(&PointerSample::at(Point::new(6.0, 5.0), 16.0));
        stage.on_pointer_move(&PointerSample::at(Point::new(50.0, 50.0), 32.0));

        assert_eq!(
            *log.borrow(),
            vec![
                EventKind::MouseOver,
                EventKind::MouseEnter,
                EventKind::MouseMove,
                EventKind::MouseOut,
                EventKind::MouseLeave,
            ]
        );
    }

    #[test]
    fn hover_moves_to_the_new_topmost_node() {
        let mut stage = Stage::new();
        let root = stage.root();
        let left = rect_node(&mut stage, Rectangle::new(0.0, 0.0, 10.0, 10.0));
        let right = rect_node(&mut stage, Rectangle::new(20.0, 0.0, 10.0, 10.0));
        stage.add_child_at(root, left, 0).unwrap();
        stage.add_child_at(root, right, 1).unwrap();

        let log: Log = Log::default();
        record(&mut stage, left, &[EventKind::MouseOut], &log);
        record(&mut stage, right, &[EventKind::MouseOver], &log);

        stage.on_pointer_move(&PointerSample::at(Point::new(5.0, 5.0), 0.0));
        stage.on_pointer_move(&PointerSample::at(Point::new(25.0, 5.0), 16.0));

        assert_eq!(*log.borrow(), vec![EventKind::MouseOut, EventKind::MouseOver]);
    }

    #[test]
    fn pointer_leave_resets_hover_and_notifies_the_root() {
        let mut stage = Stage::new();
        let root = stage.root();
        let shape = rect_node(&mut stage, Rectangle::new(0.0, 0.0, 10.0, 10.0));
        stage.add_child(root, shape).unwrap();

        let log: Log = Log::default();
        record(&mut stage, root, &[EventKind::MouseOut, EventKind::MouseLeave], &log);

        stage.on_pointer_move(&PointerSample::at(Point::new(5.0, 5.0), 0.0));
        stage.on_pointer_leave(16.0);
        assert_eq!(
            *log.borrow(),
            vec![EventKind::MouseOut, EventKind::MouseLeave]
        );

        // Re-entering fires MouseOver again: the inside flag was reset.
        let over: Log = Log::default();
        record(&mut stage, shape, &[EventKind::MouseOver], &over);
        stage.on_pointer_move(&PointerSample::at(Point::new(5.0, 5.0), 32.0));
        assert_eq!(*over.borrow(), vec![EventKind::MouseOver]);
    }

    #[test]
    fn keyboard_input_is_broadcast_regardless_of_tree() {
        let mut stage = Stage::new();
        // Detached node still receives broadcasts.
        let loose = stage.create_node();
        let log: Log = Log::default();
        record(&mut stage, loose, &[EventKind::KeyDown], &log);

        let sample = KeySample {
            key: crate::event::Key::Enter,
            repeat: false,
            modifiers: crate::event::Modifiers::empty(),
            timestamp_ms: 0.0,
        };
        assert!(stage.on_key_down(&sample));
        assert_eq!(*log.borrow(), vec![EventKind::KeyDown]);
    }

    #[test]
    fn text_input_carries_the_committed_string() {
        let mut stage = Stage::new();
        let node = stage.create_node();

        let seen = Rc::new(RefCell::new(alloc::string::String::new()));
        {
            let seen = Rc::clone(&seen);
            stage.add_event_listener(node, EventKind::TextInput, false, move |_, event| {
                if let EventPayload::Text(text) = &event.payload {
                    seen.borrow_mut().push_str(text);
                }
            });
        }

        assert!(stage.on_text_input(TextSample {
            text: alloc::string::String::from("héllo"),
            timestamp_ms: 0.0,
        }));
        assert_eq!(&*seen.borrow(), "héllo");
    }
}
