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


//! Conversion of NWC web corpus dumps into WARC files.
//!
//! The corpus is a plain concatenation of records, each holding a URL, an HTTP
//! status, a raw header block and a raw body, the blocks prefixed by their
//! length. Each record becomes a WARC `response` record with a synthesized
//! HTTP/1.1 response as payload, written as its own gzip member.
//!
//! ```text
//! ByteCursor -> ChunkReader -> RecordExtractor -> Document -> synthesize -> RecordEncoder
//! ```

pub mod batch;
pub mod chunk;
pub mod config;
pub mod convert;
pub mod cursor;
pub mod diagnostics;
pub mod document;
pub mod encode;
pub mod error;
pub mod extract;
pub mod header;
pub mod logging;
pub mod normalize;
pub mod response;

pub use batch::{BatchOptions, BatchReport, Job};
pub use chunk::ChunkReader;
pub use config::ConvertOptions;
pub use convert::{convert, ConvertStats};
pub use cursor::ByteCursor;
pub use diagnostics::{TracingSink, Warning, WarningSink};
pub use document::Document;
pub use encode::RecordEncoder;
pub use error::{ConvertError, Result};
pub use extract::{Extracted, RecordExtractor};
pub use normalize::{Normalizer, RawRecord};
