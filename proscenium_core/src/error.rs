// Copyright 2026 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error taxonomy.
//!
//! Three kinds of failure surface from the engine, all fail-fast with no
//! silent recovery:
//!
//! - **Validation** — malformed arguments (negative rectangle extents,
//!   out-of-range child index, sibling operations across different parents).
//! - **State** — an operation that is illegal for the current state of an
//!   otherwise well-formed value (inverting a singular matrix, stopping a
//!   non-cancelable event, dispatching an already-cancelled event, attaching
//!   a node to its own descendant).
//! - **Resource** — a backing surface is unavailable. The engine never
//!   retries; the owning backend deals with it.
//!
//! Stale [`NodeId`](crate::scene::NodeId) handles are a caller bug rather
//! than a runtime condition and panic via `assert!` instead of returning an
//! error.

use thiserror::Error;

/// Coarse classification of an [`Error`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed method arguments.
    Validation,
    /// Operation illegal in the current state.
    State,
    /// Backing resource unavailable.
    Resource,
}

/// Errors raised by the engine.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum Error {
    /// A rectangle operation received a negative extent.
    #[error("rectangle extent is negative: {width}x{height}")]
    NegativeExtent {
        /// Offending width.
        width: f64,
        /// Offending height.
        height: f64,
    },

    /// A child index was outside `0..=child_count`.
    #[error("child index {index} out of range (count {count})")]
    IndexOutOfRange {
        /// Requested index.
        index: usize,
        /// Number of children the parent currently has.
        count: usize,
    },

    /// A sibling operation was given nodes with different parents.
    #[error("nodes do not share a parent")]
    NotSiblings,

    /// A child operation named a node that is not a child of the given parent.
    #[error("node is not a child of the given parent")]
    NotAChild,

    /// A geometry argument was NaN or infinite.
    #[error("geometry argument is not finite")]
    NonFinite,

    /// Matrix inversion was attempted on a matrix with zero determinant.
    #[error("matrix is singular (determinant is zero)")]
    SingularMatrix,

    /// `stop_propagation` was called on a non-cancelable event.
    #[error("event is not cancelable")]
    NotCancelable,

    /// A cancelled event was dispatched or broadcast without being reset.
    #[error("event is already cancelled; reset it before re-dispatching")]
    AlreadyCancelled,

    /// Attaching a node to itself or one of its own descendants.
    #[error("attaching here would create a cycle")]
    WouldCycle,

    /// A layer's backing surface could not be acquired.
    #[error("layer surface is unavailable")]
    SurfaceUnavailable,
}

impl Error {
    /// Returns the coarse classification of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::NegativeExtent { .. }
            | Self::IndexOutOfRange { .. }
            | Self::NotSiblings
            | Self::NotAChild
            | Self::NonFinite => ErrorKind::Validation,
            Self::SingularMatrix
            | Self::NotCancelable
            | Self::AlreadyCancelled
            | Self::WouldCycle => ErrorKind::State,
            Self::SurfaceUnavailable => ErrorKind::Resource,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_partition_the_taxonomy() {
        assert_eq!(
            Error::NegativeExtent {
                width: -1.0,
                height: 2.0
            }
            .kind(),
            ErrorKind::Validation
        );
        assert_eq!(Error::SingularMatrix.kind(), ErrorKind::State);
        assert_eq!(Error::AlreadyCancelled.kind(), ErrorKind::State);
        assert_eq!(Error::SurfaceUnavailable.kind(), ErrorKind::Resource);
    }
}
