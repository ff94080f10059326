// Copyright 2026 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Event model.
//!
//! One [`Event`] struct carries the capability set every variant shares
//! (kind, target, phase, the cancellation flags); the per-variant data lives
//! in the [`EventPayload`] tagged enum. This is the composition rendering of
//! a prototype-chain hierarchy: there is no inheritance, just a base record
//! plus a tag.
//!
//! Events are plain values. Dispatch allocates (or the caller reuses) one per
//! call; a cancelled event must be [`reset`](Event::reset) before it can be
//! dispatched again.

mod input;
mod kind;

pub use input::{
    Key, KeySample, Modifiers, MouseButton, PointerSample, TextSample, TouchSample, WheelSample,
};
pub use kind::{EventKind, EventPhase};

use alloc::string::String;

use crate::error::Error;
use crate::geom::Point;
use crate::scene::NodeId;

/// Pointer payload fields.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MouseData {
    /// Pointer position in stage coordinates.
    pub stage: Point,
    /// Button involved.
    pub button: MouseButton,
    /// Wheel delta (zero for non-wheel events).
    pub delta: Point,
    /// Modifier keys held.
    pub modifiers: Modifiers,
}

/// Keyboard payload fields.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct KeyData {
    /// Which key.
    pub key: Key,
    /// Whether this is an auto-repeat.
    pub repeat: bool,
    /// Modifier keys held.
    pub modifiers: Modifiers,
}

/// Touch payload fields.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TouchData {
    /// Contact position in stage coordinates.
    pub stage: Point,
    /// Host-assigned contact identifier.
    pub contact_id: u32,
}

/// Variant-specific event data.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum EventPayload {
    /// No payload (lifecycle, enter-frame, custom events).
    #[default]
    None,
    /// Generic UI detail counter.
    Ui(i32),
    /// Pointer events.
    Mouse(MouseData),
    /// Keyboard events.
    Keyboard(KeyData),
    /// Touch events.
    Touch(TouchData),
    /// Committed text input.
    Text(String),
}

/// A dispatchable event.
#[derive(Clone, Debug, PartialEq)]
pub struct Event {
    /// What happened.
    pub kind: EventKind,
    /// Whether the bubble phase runs after the target phase.
    pub bubbles: bool,
    /// Whether listeners may stop propagation / prevent the default.
    pub cancelable: bool,
    /// The node the event is aimed at. Pre-setting this before dispatch
    /// re-targets the dispatch; it is filled in otherwise.
    pub target: Option<NodeId>,
    /// The node whose listeners are currently being invoked.
    pub current_target: Option<NodeId>,
    /// Current propagation phase.
    pub phase: EventPhase,
    /// Host timestamp in milliseconds.
    pub timestamp_ms: f64,
    /// Legacy bubble suppression: set to skip the bubble phase without
    /// stopping the capture/target phases.
    pub cancel_bubble: bool,
    /// Whether a listener prevented the default action.
    pub default_prevented: bool,
    /// Legacy return channel: a listener setting this to `false` is
    /// equivalent to calling [`stop_propagation`](Self::stop_propagation).
    pub return_value: bool,
    /// Variant data.
    pub payload: EventPayload,

    // Internal cancellation flags; readable through the accessors so the
    // dispatch code is the only writer besides `stop_*`/`reset`.
    pub(crate) cancel: bool,
    pub(crate) cancel_immediate: bool,
}

impl Event {
    /// Creates a non-bubbling, non-cancelable event with no payload.
    #[must_use]
    pub fn new(kind: EventKind) -> Self {
        Self::with_flags(kind, false, false)
    }

    /// Creates an event with explicit propagation flags.
    #[must_use]
    pub fn with_flags(kind: EventKind, bubbles: bool, cancelable: bool) -> Self {
        Self {
            kind,
            bubbles,
            cancelable,
            target: None,
            current_target: None,
            phase: EventPhase::None,
            timestamp_ms: 0.0,
            cancel_bubble: false,
            default_prevented: false,
            return_value: true,
            payload: EventPayload::None,
            cancel: false,
            cancel_immediate: false,
        }
    }

    /// Attaches a payload.
    #[must_use]
    pub fn with_payload(mut self, payload: EventPayload) -> Self {
        self.payload = payload;
        self
    }

    /// Stamps the event with a host timestamp.
    #[must_use]
    pub fn with_timestamp(mut self, timestamp_ms: f64) -> Self {
        self.timestamp_ms = timestamp_ms;
        self
    }

    /// Stops propagation after the current node's listeners finish.
    ///
    /// # Errors
    ///
    /// [`Error::NotCancelable`] when the event is not cancelable.
    pub fn stop_propagation(&mut self) -> Result<(), Error> {
        if !self.cancelable {
            return Err(Error::NotCancelable);
        }
        self.cancel = true;
        Ok(())
    }

    /// Stops propagation and skips the remaining listeners on the current
    /// node.
    ///
    /// # Errors
    ///
    /// [`Error::NotCancelable`] when the event is not cancelable.
    pub fn stop_immediate_propagation(&mut self) -> Result<(), Error> {
        if !self.cancelable {
            return Err(Error::NotCancelable);
        }
        self.cancel = true;
        self.cancel_immediate = true;
        Ok(())
    }

    /// Marks the default action as prevented (cancelable events only).
    pub fn prevent_default(&mut self) {
        if self.cancelable {
            self.default_prevented = true;
        }
    }

    /// Whether propagation has been stopped.
    #[inline]
    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        self.cancel
    }

    /// Whether the remaining listeners on the current node are skipped too.
    #[inline]
    #[must_use]
    pub const fn is_immediately_cancelled(&self) -> bool {
        self.cancel_immediate
    }

    /// Clears cancellation state, target, and phase so the event can be
    /// dispatched again (possibly at a new target).
    pub fn reset(&mut self) {
        self.target = None;
        self.current_target = None;
        self.phase = EventPhase::None;
        self.cancel_bubble = false;
        self.default_prevented = false;
        self.return_value = true;
        self.cancel = false;
        self.cancel_immediate = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_event_is_inert() {
        let e = Event::new(EventKind::EnterFrame);
        assert!(!e.bubbles);
        assert!(!e.cancelable);
        assert!(!e.is_cancelled());
        assert_eq!(e.phase, EventPhase::None);
        assert!(e.return_value);
    }

    #[test]
    fn stop_propagation_requires_cancelable() {
        let mut e = Event::new(EventKind::Added);
        assert_eq!(e.stop_propagation(), Err(Error::NotCancelable));
        assert!(!e.is_cancelled());

        let mut e = Event::with_flags(EventKind::Click, true, true);
        e.stop_propagation().unwrap();
        assert!(e.is_cancelled());
        assert!(!e.is_immediately_cancelled());
    }

    #[test]
    fn immediate_stop_sets_both_flags() {
        let mut e = Event::with_flags(EventKind::Click, true, true);
        e.stop_immediate_propagation().unwrap();
        assert!(e.is_cancelled());
        assert!(e.is_immediately_cancelled());
    }

    #[test]
    fn prevent_default_ignored_when_not_cancelable() {
        let mut e = Event::new(EventKind::Click);
        e.prevent_default();
        assert!(!e.default_prevented);
    }

    #[test]
    fn reset_clears_dispatch_state() {
        let mut e = Event::with_flags(EventKind::Click, true, true);
        e.stop_immediate_propagation().unwrap();
        e.cancel_bubble = true;
        e.phase = EventPhase::Bubbling;
        e.reset();
        assert!(!e.is_cancelled());
        assert!(!e.is_immediately_cancelled());
        assert!(!e.cancel_bubble);
        assert_eq!(e.phase, EventPhase::None);
        assert_eq!(e.target, None);
    }
}
