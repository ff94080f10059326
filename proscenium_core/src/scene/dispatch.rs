// Copyright 2026 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Listener registry and event propagation.
//!
//! Listeners are stored per node slot, keyed by [`EventKind`], in separate
//! capture and bubble lists. Registration returns a [`ListenerId`], which is
//! the removal handle. Each stage keeps one dispatcher *queue* — every node
//! with at least one listener, in registration order — which
//! [`broadcast_event`](Stage::broadcast_event) walks in reverse.
//!
//! Dispatch snapshots both the ancestor chain and each node's listener list
//! before invoking anything, so handlers are free to mutate the tree or the
//! registry mid-flight without corrupting the in-progress dispatch.

use alloc::collections::BTreeMap;
use alloc::rc::Rc;
use alloc::vec::Vec;

use crate::error::Error;
use crate::event::{Event, EventKind, EventPhase};

use super::id::{INVALID, ListenerId, NodeId};
use super::store::Stage;

/// A registered event callback.
pub type Callback = Rc<dyn Fn(&mut Stage, &mut Event)>;

#[derive(Clone)]
struct ListenerEntry {
    id: ListenerId,
    callback: Callback,
}

#[derive(Clone, Default)]
struct PhaseLists {
    capture: Vec<ListenerEntry>,
    bubble: Vec<ListenerEntry>,
}

/// Per-node listener storage.
#[derive(Clone, Default)]
pub(crate) struct ListenerMap {
    kinds: BTreeMap<EventKind, PhaseLists>,
}

impl ListenerMap {
    fn push(&mut self, kind: EventKind, use_capture: bool, entry: ListenerEntry) {
        let lists = self.kinds.entry(kind).or_default();
        if use_capture {
            lists.capture.push(entry);
        } else {
            lists.bubble.push(entry);
        }
    }

    fn remove(&mut self, id: ListenerId) -> bool {
        let mut removed = false;
        self.kinds.retain(|_, lists| {
            lists.capture.retain(|e| {
                let keep = e.id != id;
                removed |= !keep;
                keep
            });
            lists.bubble.retain(|e| {
                let keep = e.id != id;
                removed |= !keep;
                keep
            });
            !lists.capture.is_empty() || !lists.bubble.is_empty()
        });
        removed
    }

    fn has(&self, kind: EventKind) -> bool {
        self.kinds
            .get(&kind)
            .is_some_and(|l| !l.capture.is_empty() || !l.bubble.is_empty())
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    /// Clones the phase-selected callback list for invocation.
    fn snapshot(&self, kind: EventKind, use_capture: bool) -> Vec<Callback> {
        self.kinds
            .get(&kind)
            .map(|lists| {
                let list = if use_capture {
                    &lists.capture
                } else {
                    &lists.bubble
                };
                list.iter().map(|e| Rc::clone(&e.callback)).collect()
            })
            .unwrap_or_default()
    }
}

impl Stage {
    /// Registers a listener for `kind` on `node`.
    ///
    /// `use_capture` selects the capture list (invoked on the way down) over
    /// the bubble list (invoked at the target and on the way back up).
    /// Listeners fire in registration order. The node joins the dispatcher
    /// queue with its first listener.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn add_event_listener(
        &mut self,
        node: NodeId,
        kind: EventKind,
        use_capture: bool,
        callback: impl Fn(&mut Stage, &mut Event) + 'static,
    ) -> ListenerId {
        self.validate(node);
        let idx = node.idx;
        let id = ListenerId(self.next_listener_id);
        self.next_listener_id += 1;
        if self.listeners[idx as usize].is_empty() {
            self.queue.push(idx);
        }
        self.listeners[idx as usize].push(
            kind,
            use_capture,
            ListenerEntry {
                id,
                callback: Rc::new(callback),
            },
        );
        id
    }

    /// Removes a listener by its registration handle.
    ///
    /// Returns whether anything was removed. The node leaves the dispatcher
    /// queue with its last listener. An in-flight dispatch keeps running from
    /// its snapshot.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn remove_event_listener(&mut self, node: NodeId, id: ListenerId) -> bool {
        self.validate(node);
        let idx = node.idx;
        let removed = self.listeners[idx as usize].remove(id);
        if removed && self.listeners[idx as usize].is_empty() {
            self.queue.retain(|&q| q != idx);
        }
        removed
    }

    /// Returns whether `node` has any listener (capture or bubble) for
    /// `kind`.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    #[must_use]
    pub fn has_event_listener(&self, node: NodeId, kind: EventKind) -> bool {
        self.validate(node);
        self.listeners[node.idx as usize].has(kind)
    }

    /// Invokes `node`'s listeners for the event's kind and current phase.
    ///
    /// The capture list is selected only in the `Capturing` phase; both the
    /// target and bubble phases use the bubble list. Listeners run in
    /// registration order over a snapshot taken up front. A listener clearing
    /// [`return_value`](Event::return_value) cancels a cancelable event;
    /// immediate cancellation skips the rest of the snapshot.
    ///
    /// Returns whether any listener was registered for this kind and phase.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale, or if a listener panics.
    pub fn handle_event(&mut self, node: NodeId, event: &mut Event) -> bool {
        self.validate(node);
        let use_capture = event.phase == EventPhase::Capturing;
        let snapshot = self.listeners[node.idx as usize].snapshot(event.kind, use_capture);
        if snapshot.is_empty() {
            return false;
        }
        event.current_target = Some(node);
        for callback in snapshot {
            callback(self, event);
            if !event.return_value && event.cancelable && !event.is_cancelled() {
                event.cancel = true;
            }
            if event.is_immediately_cancelled() {
                break;
            }
        }
        true
    }

    /// Dispatches an event through the capture → target → bubble pipeline.
    ///
    /// The target is `event.target` when pre-set (re-targeted dispatch),
    /// otherwise `node`. The ancestor chain is snapshotted before any
    /// listener runs. When no listener for the event's kind exists anywhere
    /// on the chain, this returns `Ok(false)` without invoking anything.
    /// Cancellation ends propagation early but still reports `Ok(true)`.
    ///
    /// # Errors
    ///
    /// [`Error::AlreadyCancelled`] when the event arrives cancelled; call
    /// [`Event::reset`] to re-arm it.
    ///
    /// # Panics
    ///
    /// Panics if a handle is stale.
    pub fn dispatch_event(&mut self, node: NodeId, event: &mut Event) -> Result<bool, Error> {
        self.validate(node);
        if event.is_cancelled() {
            return Err(Error::AlreadyCancelled);
        }
        let target = event.target.unwrap_or(node);
        self.validate(target);
        event.target = Some(target);

        // Ancestor chain, root-most first, snapshotted before any listener
        // can mutate the tree.
        let mut chain: Vec<NodeId> = Vec::new();
        let mut cur = self.parent[target.idx as usize];
        while cur != INVALID {
            chain.push(NodeId {
                idx: cur,
                generation: self.generation[cur as usize],
            });
            cur = self.parent[cur as usize];
        }
        chain.reverse();

        let anyone_listening = self.has_event_listener(target, event.kind)
            || chain
                .iter()
                .any(|&n| self.has_event_listener(n, event.kind));
        if !anyone_listening {
            return Ok(false);
        }

        event.phase = EventPhase::Capturing;
        for &ancestor in &chain {
            self.handle_event(ancestor, event);
            if event.is_cancelled() {
                return Ok(true);
            }
        }

        event.phase = EventPhase::AtTarget;
        self.handle_event(target, event);
        if event.is_cancelled() {
            return Ok(true);
        }

        if event.bubbles && !event.cancel_bubble {
            event.phase = EventPhase::Bubbling;
            for &ancestor in chain.iter().rev() {
                self.handle_event(ancestor, event);
                if event.is_cancelled() {
                    return Ok(true);
                }
            }
        }
        Ok(true)
    }

    /// Delivers an event to every dispatcher-queue member with a matching
    /// listener, newest registration first, ignoring tree structure.
    ///
    /// Returns whether any listener ran. Cancellation stops the walk.
    ///
    /// # Errors
    ///
    /// [`Error::AlreadyCancelled`] when the event arrives cancelled.
    pub fn broadcast_event(&mut self, event: &mut Event) -> Result<bool, Error> {
        if event.is_cancelled() {
            return Err(Error::AlreadyCancelled);
        }
        event.phase = EventPhase::AtTarget;
        let queue: Vec<u32> = self.queue.clone();
        let mut handled = false;
        for &idx in queue.iter().rev() {
            // A handler may have emptied this slot's registry mid-walk.
            if self.listeners[idx as usize].is_empty() {
                continue;
            }
            let node = NodeId {
                idx,
                generation: self.generation[idx as usize],
            };
            handled |= self.handle_event(node, event);
            if event.is_cancelled() {
                break;
            }
        }
        Ok(handled)
    }
}
