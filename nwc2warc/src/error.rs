// Copyright 2025 Janek Bevendorff
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.


//! Error types for corpus conversion.

use thiserror::Error;

/// Result type alias for conversion operations.
pub type Result<T> = std::result::Result<T, ConvertError>;

/// Fatal conditions that abort the conversion of an input file.
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The input ended before the first byte of a chunk. Only a clean end of
    /// stream when observed at the start of a record.
    #[error("unexpected end of input")]
    EndOfInput,

    #[error("input truncated while reading {field}")]
    TruncatedRecord { field: &'static str },

    #[error("{field} is not ASCII text")]
    InvalidText { field: &'static str },

    #[error("{field} is not a non-negative integer: {value:?}")]
    InvalidNumber { field: &'static str, value: String },

    #[error("invalid fallback date: {0:?}")]
    InvalidFallbackDate(String),

    #[error("batch error: {0}")]
    Batch(String),
}

impl ConvertError {
    /// Reinterpret an end of input as a truncation of `field`.
    pub(crate) fn within(self, field: &'static str) -> Self {
        match self {
            ConvertError::EndOfInput => ConvertError::TruncatedRecord { field },
            ConvertError::TruncatedRecord { .. } => ConvertError::TruncatedRecord { field },
            other => other,
        }
    }
}
