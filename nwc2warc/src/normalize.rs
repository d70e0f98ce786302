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


//! Per-record validation policy applied between framing and encoding.

use chrono::{DateTime, Utc};
use crate::config::ConvertOptions;
use crate::diagnostics::{Warning, WarningSink};
use crate::document::{parse_http_date, Document};
use crate::error::{ConvertError, Result};
use crate::header;

/// Framing fields of one record, as read from the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    pub url: String,
    pub status: u32,
    pub header: Vec<u8>,
    pub body: Vec<u8>,
}

/// Turns raw records into documents with resolved `Content-Length`,
/// `Content-Type` and `Date` headers.
#[derive(Debug, Clone)]
pub struct Normalizer {
    fallback_http_date: String,
    fallback_date: DateTime<Utc>,
    default_content_type: String,
}

impl Normalizer {
    /// Fails if the configured fallback date is not a valid HTTP date.
    pub fn new(options: &ConvertOptions) -> Result<Self> {
        let fallback_date = parse_http_date(&options.fallback_http_date)
            .ok_or_else(|| ConvertError::InvalidFallbackDate(options.fallback_http_date.clone()))?;
        Ok(Normalizer {
            fallback_http_date: options.fallback_http_date.clone(),
            fallback_date,
            default_content_type: options.default_content_type.clone(),
        })
    }

    pub fn fallback_date(&self) -> DateTime<Utc> {
        self.fallback_date
    }

    pub fn normalize(&self, raw: RawRecord, sink: &mut dyn WarningSink) -> Document {
        let RawRecord { url, status, header: header_raw, body } = raw;

        if !url.starts_with("http") {
            sink.warn(Warning::UrlScheme { url: url.clone() });
        }

        let mut header = header::reconstruct(&header_raw, sink);

        let actual = body.len();
        match header.find("Content-Length") {
            // Most records carry no Content-Length, so no warning here.
            None => header.set_exact("Content-Length", actual.to_string()),
            Some((key, declared)) => {
                if declared.trim().parse::<usize>().ok() != Some(actual) {
                    sink.warn(Warning::ContentLengthMismatch { url: url.clone(), declared, actual });
                    header.set_exact(key, actual.to_string());
                }
            }
        }

        if !header.contains_key("Content-Type") {
            sink.warn(Warning::MissingContentType { url: url.clone() });
            header.set_exact("Content-Type", &self.default_content_type);
        }

        let date = match header.find("Date") {
            None => {
                sink.warn(Warning::MissingDate { url: url.clone() });
                header.set_exact("Date", &self.fallback_http_date);
                self.fallback_date
            }
            Some((key, value)) => match parse_http_date(&value) {
                Some(date) => date,
                None => {
                    sink.warn(Warning::InvalidDate { url: url.clone(), value });
                    header.set_exact(key, &self.fallback_http_date);
                    self.fallback_date
                }
            },
        };

        Document::new(url, date, status, header, body)
    }
}
