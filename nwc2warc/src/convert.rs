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


//! One input file in, one WARC file out.

use std::fs::{DirBuilder, File};
use std::io::BufWriter;
use std::path::Path;
use tracing::{debug, info, warn};
use crate::chunk::ChunkReader;
use crate::config::ConvertOptions;
use crate::cursor::ByteCursor;
use crate::diagnostics::WarningSink;
use crate::encode::RecordEncoder;
use crate::error::Result;
use crate::extract::{Extracted, RecordExtractor};
use crate::normalize::Normalizer;

/// Counters of a finished conversion.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ConvertStats {
    /// WARC records written.
    pub records: usize,
    /// Input records dropped for an empty header or body.
    pub skipped: usize,
    /// Uncompressed size of all written records.
    pub uncompressed_bytes: usize,
}

/// Create `dir` and its missing parents.
pub fn create_dir_all(dir: &Path) -> std::io::Result<()> {
    let mut builder = DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(0o755);
    }
    builder.create(dir)
}

/// Convert the corpus file `input` into gzipped WARC records in `output`.
///
/// Parent directories of `output` are created as needed. On a fatal error the
/// records written so far stay in `output`.
pub fn convert(
    input: &Path,
    output: &Path,
    options: &ConvertOptions,
    sink: &mut dyn WarningSink,
) -> Result<ConvertStats> {
    let normalizer = Normalizer::new(options)?;

    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() {
            create_dir_all(parent)?;
        }
    }

    info!(input = %input.display(), output = %output.display(), "Converting");
    let cursor = ByteCursor::open(input, options.read_block_size)?;
    let mut extractor = RecordExtractor::new(ChunkReader::new(cursor), normalizer);
    let mut encoder = RecordEncoder::new(BufWriter::new(File::create(output)?), options.compression_level);

    let mut stats = ConvertStats::default();
    loop {
        match extractor.extract(sink) {
            Extracted::Record(doc) => {
                stats.uncompressed_bytes += encoder.encode(&doc, sink)?;
                stats.records += 1;
            }
            Extracted::Skipped => {
                stats.skipped += 1;
                debug!("Skipped record with empty header or body");
            }
            Extracted::EndOfStream => break,
            Extracted::Fatal(e) => {
                if let Err(flush_err) = encoder.finish() {
                    warn!("Failed to flush partial output: {flush_err}");
                }
                return Err(e);
            }
        }
    }
    encoder.finish()?;

    info!(
        records = stats.records,
        skipped = stats.skipped,
        bytes = stats.uncompressed_bytes,
        "Finished {}",
        input.display()
    );
    Ok(stats)
}
