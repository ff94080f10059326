// Copyright 2026 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tree traversal utilities.

use super::id::{INVALID, NodeId};
use super::store::Stage;

/// An iterator over the direct children of a node, back to front.
///
/// Created by [`Stage::children`].
#[derive(Debug)]
pub struct Children<'a> {
    stage: &'a Stage,
    current: u32,
}

impl<'a> Children<'a> {
    pub(crate) fn new(stage: &'a Stage, first: u32) -> Self {
        Self {
            stage,
            current: first,
        }
    }
}

impl Iterator for Children<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        if self.current == INVALID {
            return None;
        }
        let idx = self.current;
        self.current = self.stage.next_sibling[idx as usize];
        Some(NodeId {
            idx,
            generation: self.stage.generation[idx as usize],
        })
    }
}
