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


//! Converter settings.

/// Assumed last day of the crawl, used whenever a record carries no usable date.
pub const FALLBACK_HTTP_DATE: &str = "Thu, 30 Sep 2010 23:59:59 GMT";

/// Content type assumed for records without one.
pub const DEFAULT_CONTENT_TYPE: &str = "text/html";

/// Size of the blocks read from the input file.
pub const DEFAULT_READ_BLOCK_SIZE: usize = 1_000_000;

/// Default gzip level for output records.
pub const DEFAULT_COMPRESSION_LEVEL: u32 = 9;

/// Settings for a single conversion run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertOptions {
    /// Read buffer size in bytes.
    pub read_block_size: usize,
    /// HTTP date substituted for missing or unparseable `Date` headers.
    pub fallback_http_date: String,
    /// `Content-Type` substituted when the header is missing.
    pub default_content_type: String,
    /// gzip level (0-9) of each output record.
    pub compression_level: u32,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        ConvertOptions {
            read_block_size: DEFAULT_READ_BLOCK_SIZE,
            fallback_http_date: FALLBACK_HTTP_DATE.to_string(),
            default_content_type: DEFAULT_CONTENT_TYPE.to_string(),
            compression_level: DEFAULT_COMPRESSION_LEVEL,
        }
    }
}
