/*
 * SPDX-FileCopyrightText: 2023 Tommaso Fontana
 * SPDX-FileCopyrightText: 2023 Inria
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use thiserror::Error;

/// Shorthand for results whose error is a [`StreamError`].
pub type Result<T, E = StreamError> = core::result::Result<T, E>;

/// The error returned by byte sources, byte sinks, scalar streams and
/// structs.
///
/// All failures are local and synchronous: the only retrying performed by
/// this crate happens inside [`read_exact`](crate::traits::ScalarRead::read_exact)
/// and [`skip_exact`](crate::traits::ScalarRead::skip_exact), and only while the
/// source reports progress.
#[derive(Debug, Error)]
pub enum StreamError {
    /// A read demanded more bytes than the source could ever supply.
    #[error("Unexpected end of stream at byte position {position}")]
    EndOfStream { position: u64 },

    /// A bulk read or skip returned fewer bytes than requested after retrying
    /// until the source reported exhaustion.
    #[error("Short transfer: requested {requested} bytes, got {actual}")]
    ShortTransfer { requested: u64, actual: u64 },

    /// A reset was requested with no prior mark, or on a source without
    /// checkpoint support.
    #[error("No checkpoint to reset to")]
    InvalidCheckpoint,

    /// A conditional struct was read with a false predicate and a failing
    /// skip policy.
    #[error("Conditional struct skipped on read and no default value is available")]
    UnreadableConditional,

    /// A deliberately disabled operation.
    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(&'static str),

    /// A value handed to a struct does not have the shape the struct expects.
    #[error("Type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    /// A composite value does not have as many slots as the sequence writing it.
    #[error("Arity mismatch: expected {expected} slots, found {found}")]
    ArityMismatch { expected: usize, found: usize },

    /// The declared count of a repeated struct differs from the length of the
    /// array being written.
    #[error("Count mismatch: declared {declared}, array has {actual} elements")]
    CountMismatch { declared: usize, actual: usize },

    /// A value used as a count is negative or not an integer.
    #[error("Invalid count: {0}")]
    InvalidCount(String),

    /// A count refers to a sibling slot that has not been decoded yet.
    #[error("Slot {0} is not available to the repeated struct")]
    MissingSlot(usize),

    /// A value does not fit the wire representation chosen for it.
    #[error("Value {value} out of range for {target}")]
    ValueOutOfRange { value: i128, target: &'static str },

    /// Bytes that should hold modified UTF-8 text are malformed.
    #[error("Malformed text: {0}")]
    MalformedText(&'static str),

    /// A string does not name an [atom](crate::structs::Atom).
    #[error("Unknown atom: {0}")]
    UnknownAtom(String),

    /// An error from an underlying [`std::io`] collaborator.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
