// Copyright 2018 the Kurbo Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors reported by path queries.

use core::fmt;

/// An error from a [`BezPath`](crate::BezPath) query or trim.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PathError {
    /// An element index was not less than the number of elements.
    IndexOutOfRange {
        /// The requested index.
        index: usize,
        /// The number of elements in the path.
        len: usize,
    },
    /// A trim range ends before it starts.
    InvalidRange,
}

impl fmt::Display for PathError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathError::IndexOutOfRange { index, len } => {
                write!(f, "element index {index} out of range for path of {len} elements")
            }
            PathError::InvalidRange => write!(f, "trim range ends before it starts"),
        }
    }
}

impl std::error::Error for PathError {}
