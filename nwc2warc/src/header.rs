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


//! Lenient reconstruction of raw HTTP header blocks.

use encoding::{DecoderTrap, Encoding};
use encoding::all::ISO_8859_1;
use warcgen::{HeaderEncoding, HeaderMap};
use crate::diagnostics::{Warning, WarningSink};

/// Parse a raw header block into an ordered header map.
///
/// The block is decoded as Latin-1, so decoding cannot fail. Lines without a
/// colon continue the value of the preceding line, with no separator. A
/// colonless line before any field is dropped. Keys and values are trimmed
/// after continuations are applied. A repeated key (same spelling) keeps its
/// first position and takes the last value.
pub fn reconstruct(raw: &[u8], sink: &mut dyn WarningSink) -> HeaderMap {
    let decoded = ISO_8859_1
        .decode(raw, DecoderTrap::Replace)
        .unwrap_or_else(|e| e.into_owned());

    let fields = decoded
        .trim_end()
        .split('\n')
        .map(str::trim_end)
        .fold(Vec::new(), |fields, line| fold_line(fields, line, sink));

    let mut header = HeaderMap::new(HeaderEncoding::Latin1);
    for (key, value) in &fields {
        header.set_exact(key.trim(), value.trim());
    }
    header
}

fn fold_line(
    mut fields: Vec<(String, String)>,
    line: &str,
    sink: &mut dyn WarningSink,
) -> Vec<(String, String)> {
    match line.split_once(':') {
        Some((key, value)) => fields.push((key.to_string(), value.to_string())),
        None => match fields.last_mut() {
            Some((_, value)) => {
                sink.warn(Warning::HeaderLineConcatenated { line: line.to_string() });
                value.push_str(line);
            }
            None => sink.warn(Warning::HeaderLineSkipped { line: line.to_string() }),
        },
    }
    fields
}
