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


//! Non-fatal conversion warnings and where they go.
//!
//! Every stage that can warn takes a `&mut dyn WarningSink`. The binary uses
//! [`TracingSink`], tests collect into a `Vec<Warning>`.

use std::fmt;
use tracing::warn;

/// A recoverable irregularity in the input. Conversion continues after it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// The target URL does not start with `http`.
    UrlScheme { url: String },
    /// A colonless header line with no preceding field was dropped.
    HeaderLineSkipped { line: String },
    /// A colonless header line was appended to the preceding field's value.
    HeaderLineConcatenated { line: String },
    ContentLengthMismatch { url: String, declared: String, actual: usize },
    MissingContentType { url: String },
    MissingDate { url: String },
    InvalidDate { url: String, value: String },
    /// No reason phrase is registered for the status code.
    UnknownStatus { status: u32 },
}

impl Warning {
    /// Target URL of the record the warning belongs to, if known.
    pub fn url(&self) -> Option<&str> {
        match self {
            Warning::UrlScheme { url }
            | Warning::ContentLengthMismatch { url, .. }
            | Warning::MissingContentType { url }
            | Warning::MissingDate { url }
            | Warning::InvalidDate { url, .. } => Some(url),
            _ => None,
        }
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::UrlScheme { .. } => write!(f, "URL doesn't start with 'http'"),
            Warning::HeaderLineSkipped { line } => {
                write!(f, "Invalid header sequence found, skipped: {line}")
            }
            Warning::HeaderLineConcatenated { line } => write!(
                f,
                "Invalid header sequence found, concatenated to the previous header: {line}"
            ),
            Warning::ContentLengthMismatch { declared, actual, .. } => {
                write!(f, "Content-Length mismatched: {declared} != {actual}")
            }
            Warning::MissingContentType { .. } => write!(f, "No header: Content-Type"),
            Warning::MissingDate { .. } => write!(f, "No header: Date"),
            Warning::InvalidDate { value, .. } => write!(f, "Invalid datetime format: {value}"),
            Warning::UnknownStatus { status } => write!(f, "Unknown HTTP status: {status}"),
        }
    }
}

/// Receiver of conversion warnings.
pub trait WarningSink {
    fn warn(&mut self, warning: Warning);
}

/// Forwards warnings to `tracing` at WARN level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl WarningSink for TracingSink {
    fn warn(&mut self, warning: Warning) {
        match warning.url() {
            Some(url) => warn!(url = %url, "{warning}"),
            None => warn!("{warning}"),
        }
    }
}

impl WarningSink for Vec<Warning> {
    fn warn(&mut self, warning: Warning) {
        self.push(warning);
    }
}
