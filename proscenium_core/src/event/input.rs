// Copyright 2026 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Host input boundary types.
//!
//! The host (windowing glue, test harness) maps its pointer and keyboard
//! signals verbatim into these samples before handing them to the stage's
//! `on_*` methods; they carry exactly the fields the event payloads need and
//! nothing platform-specific.

use alloc::string::String;

use bitflags::bitflags;

use crate::geom::Point;

bitflags! {
    /// Modifier keys held during an input sample.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        /// Shift key.
        const SHIFT = 1 << 0;
        /// Control key.
        const CTRL = 1 << 1;
        /// Alt / Option key.
        const ALT = 1 << 2;
        /// Meta / Command / Super key.
        const META = 1 << 3;
    }
}

/// A pointer button.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Primary (usually left) button.
    #[default]
    Primary,
    /// Middle button / wheel press.
    Middle,
    /// Secondary (usually right) button.
    Secondary,
}

/// A key identity, independent of layout details the engine does not need.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    /// A printable character.
    Char(char),
    /// Enter / Return.
    Enter,
    /// Escape.
    Escape,
    /// Backspace.
    Backspace,
    /// Tab.
    Tab,
    /// Space bar.
    Space,
    /// Up arrow.
    ArrowUp,
    /// Down arrow.
    ArrowDown,
    /// Left arrow.
    ArrowLeft,
    /// Right arrow.
    ArrowRight,
    /// Any other key, identified by the host's raw code.
    Other(u32),
}

/// One pointer signal from the host.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerSample {
    /// Pointer position in stage coordinates.
    pub position: Point,
    /// Button involved (meaningful for press/release/click signals).
    pub button: MouseButton,
    /// Modifier keys held.
    pub modifiers: Modifiers,
    /// Host timestamp in milliseconds.
    pub timestamp_ms: f64,
}

impl PointerSample {
    /// A primary-button sample at `position` with no modifiers.
    #[must_use]
    pub fn at(position: Point, timestamp_ms: f64) -> Self {
        Self {
            position,
            button: MouseButton::Primary,
            modifiers: Modifiers::empty(),
            timestamp_ms,
        }
    }
}

/// One scroll-wheel signal from the host.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WheelSample {
    /// Pointer position in stage coordinates.
    pub position: Point,
    /// Scroll delta, in host units.
    pub delta: Point,
    /// Modifier keys held.
    pub modifiers: Modifiers,
    /// Host timestamp in milliseconds.
    pub timestamp_ms: f64,
}

/// One keyboard signal from the host.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct KeySample {
    /// Which key.
    pub key: Key,
    /// Whether this is an auto-repeat.
    pub repeat: bool,
    /// Modifier keys held.
    pub modifiers: Modifiers,
    /// Host timestamp in milliseconds.
    pub timestamp_ms: f64,
}

/// One touch-contact signal from the host.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TouchSample {
    /// Contact position in stage coordinates.
    pub position: Point,
    /// Host-assigned contact identifier, stable for the contact's lifetime.
    pub contact_id: u32,
    /// Host timestamp in milliseconds.
    pub timestamp_ms: f64,
}

/// Committed text from the host's input method.
#[derive(Clone, Debug, PartialEq)]
pub struct TextSample {
    /// The committed text.
    pub text: String,
    /// Host timestamp in milliseconds.
    pub timestamp_ms: f64,
}
