// Copyright 2026 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Event kinds and propagation phases.

/// The closed set of event kinds the engine dispatches.
///
/// [`Custom`](Self::Custom) exists for application-defined events flowing
/// through the same listener registry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EventKind {
    /// A node (or an ancestor) was attached to a stage root.
    Added,
    /// A node (or an ancestor) is about to be detached from a stage root.
    Removed,
    /// Delivered to the dispatcher queue once per frame tick.
    EnterFrame,
    /// Primary-button click.
    Click,
    /// Primary-button double click.
    DoubleClick,
    /// Pointer button pressed.
    MouseDown,
    /// Pointer button released.
    MouseUp,
    /// Context-menu gesture.
    ContextMenu,
    /// Pointer moved inside a node already containing it.
    MouseMove,
    /// Pointer newly entered a node's bounds.
    MouseOver,
    /// Companion of [`MouseOver`](Self::MouseOver).
    MouseEnter,
    /// Pointer left a node's bounds.
    MouseOut,
    /// Companion of [`MouseOut`](Self::MouseOut).
    MouseLeave,
    /// Scroll wheel.
    Wheel,
    /// Key pressed.
    KeyDown,
    /// Key released.
    KeyUp,
    /// Character-producing key press.
    KeyPress,
    /// Committed text input.
    TextInput,
    /// Touch began.
    TouchStart,
    /// Touch moved.
    TouchMove,
    /// Touch ended.
    TouchEnd,
    /// Application-defined event.
    Custom(&'static str),
}

/// Where an event currently is in the capture → target → bubble flow.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum EventPhase {
    /// Not being dispatched.
    #[default]
    None,
    /// Travelling root → target, exclusive of the target.
    Capturing,
    /// At the target node.
    AtTarget,
    /// Travelling target → root, exclusive of the target.
    Bubbling,
}
