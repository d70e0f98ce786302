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


//! Record extraction as an explicit state machine over the chunk reader.
//!
//! Each record is framed as
//!
//! ```text
//! <url>\n
//! <status>\n
//! <header length>\n
//! <header bytes>
//! <body length>\n
//! <body bytes>
//! ```
//!
//! and records follow each other with no separator.

use std::io::BufRead;
use crate::chunk::ChunkReader;
use crate::diagnostics::WarningSink;
use crate::document::Document;
use crate::error::{ConvertError, Result};
use crate::normalize::{Normalizer, RawRecord};

/// Outcome of extracting one record.
#[derive(Debug)]
pub enum Extracted {
    Record(Document),
    /// The record had an empty header or body and was dropped.
    Skipped,
    /// The input ended cleanly at a record boundary.
    EndOfStream,
    /// The input is corrupt; nothing further can be extracted.
    Fatal(ConvertError),
}

#[derive(Debug)]
enum State {
    ReadUrl,
    ReadStatus { url: String },
    ReadHeaderLength { url: String, status: u32 },
    ReadHeaderBlock { url: String, status: u32, header_length: usize },
    ReadBodyLength { url: String, status: u32, header: Vec<u8> },
    ReadBodyBlock { url: String, status: u32, header: Vec<u8>, body_length: usize },
    Normalize(RawRecord),
    Done,
}

enum Transition {
    Next(State),
    Emit(Extracted),
}

pub struct RecordExtractor<R> {
    reader: ChunkReader<R>,
    normalizer: Normalizer,
    finished: bool,
}

impl<R: BufRead> RecordExtractor<R> {
    pub fn new(reader: ChunkReader<R>, normalizer: Normalizer) -> Self {
        RecordExtractor {
            reader,
            normalizer,
            finished: false,
        }
    }

    /// Run the state machine through the next record.
    ///
    /// After [`Extracted::EndOfStream`] or [`Extracted::Fatal`] every further
    /// call returns [`Extracted::EndOfStream`].
    pub fn extract(&mut self, sink: &mut dyn WarningSink) -> Extracted {
        if self.finished {
            return Extracted::EndOfStream;
        }
        let mut state = State::ReadUrl;
        loop {
            match self.step(state, sink) {
                Ok(Transition::Next(next)) => state = next,
                Ok(Transition::Emit(extracted)) => {
                    if matches!(extracted, Extracted::EndOfStream) {
                        self.finished = true;
                    }
                    return extracted;
                }
                Err(e) => {
                    self.finished = true;
                    return Extracted::Fatal(e);
                }
            }
        }
    }

    /// Iterate over documents, skipping dropped records.
    pub fn documents<'s>(self, sink: &'s mut dyn WarningSink) -> Documents<'s, R> {
        Documents { extractor: self, sink }
    }

    fn step(&mut self, state: State, sink: &mut dyn WarningSink) -> Result<Transition> {
        use Transition::{Emit, Next};

        Ok(match state {
            State::ReadUrl => match self.reader.read_line() {
                Err(ConvertError::EndOfInput) => Next(State::Done),
                line => Next(State::ReadStatus { url: decode_url(line?)? }),
            },
            State::ReadStatus { url } => {
                let status = parse_number(self.line("status")?, "status")?;
                Next(State::ReadHeaderLength { url, status })
            }
            State::ReadHeaderLength { url, status } => {
                let header_length = parse_number(self.line("header length")?, "header length")?;
                Next(State::ReadHeaderBlock { url, status, header_length })
            }
            State::ReadHeaderBlock { url, status, header_length } => {
                let header = self.block(header_length, "header block")?;
                Next(State::ReadBodyLength { url, status, header })
            }
            State::ReadBodyLength { url, status, header } => {
                let body_length = parse_number(self.line("body length")?, "body length")?;
                Next(State::ReadBodyBlock { url, status, header, body_length })
            }
            State::ReadBodyBlock { url, status, header, body_length } => {
                let body = self.block(body_length, "body block")?;
                if header.is_empty() || body.is_empty() {
                    Emit(Extracted::Skipped)
                } else {
                    Next(State::Normalize(RawRecord { url, status, header, body }))
                }
            }
            State::Normalize(raw) => Emit(Extracted::Record(self.normalizer.normalize(raw, sink))),
            State::Done => Emit(Extracted::EndOfStream),
        })
    }

    fn line(&mut self, field: &'static str) -> Result<Vec<u8>> {
        self.reader.read_line().map_err(|e| e.within(field))
    }

    fn block(&mut self, n: usize, field: &'static str) -> Result<Vec<u8>> {
        self.reader.read_exact(n).map_err(|e| e.within(field))
    }
}

fn decode_url(line: Vec<u8>) -> Result<String> {
    if !line.is_ascii() {
        return Err(ConvertError::InvalidText { field: "url" });
    }
    let mut url = String::from_utf8_lossy(&line).into_owned();
    while url.ends_with('\n') {
        url.pop();
    }
    Ok(url)
}

fn parse_number<T: std::str::FromStr>(line: Vec<u8>, field: &'static str) -> Result<T> {
    if !line.is_ascii() {
        return Err(ConvertError::InvalidText { field });
    }
    let text = String::from_utf8_lossy(&line);
    text.trim().parse().map_err(|_| ConvertError::InvalidNumber {
        field,
        value: text.trim_end_matches('\n').to_string(),
    })
}

/// Documents of an input, as an iterator.
///
/// Yields at most one error, after which the iterator is exhausted.
pub struct Documents<'s, R> {
    extractor: RecordExtractor<R>,
    sink: &'s mut dyn WarningSink,
}

impl<R: BufRead> Iterator for Documents<'_, R> {
    type Item = Result<Document>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.extractor.extract(self.sink) {
                Extracted::Record(doc) => return Some(Ok(doc)),
                Extracted::Skipped => continue,
                Extracted::EndOfStream => return None,
                Extracted::Fatal(e) => return Some(Err(e)),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use crate::config::ConvertOptions;
    use crate::cursor::ByteCursor;
    use crate::diagnostics::Warning;

    fn record(url: &str, status: &str, header: &[u8], body: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(format!("{url}\n{status}\n{}\n", header.len()).as_bytes());
        out.extend_from_slice(header);
        out.extend_from_slice(format!("{}\n", body.len()).as_bytes());
        out.extend_from_slice(body);
        out
    }

    fn extractor(data: Vec<u8>) -> RecordExtractor<Cursor<Vec<u8>>> {
        let normalizer = Normalizer::new(&ConvertOptions::default()).unwrap();
        RecordExtractor::new(ChunkReader::new(ByteCursor::new(Cursor::new(data))), normalizer)
    }

    const HEADER: &[u8] = b"Content-Type: text/html\nDate: Wed, 01 Sep 2010 10:00:00 GMT\n";

    #[test]
    fn empty_input_ends_cleanly() {
        let mut ex = extractor(Vec::new());
        let mut sink: Vec<Warning> = Vec::new();
        assert!(matches!(ex.extract(&mut sink), Extracted::EndOfStream));
        assert!(matches!(ex.extract(&mut sink), Extracted::EndOfStream));
    }

    #[test]
    fn body_is_read_verbatim() {
        let body = b"<html>\n\0\xff\r\n</html>";
        let mut data = record("http://a/", "200", HEADER, body);
        data.extend(record("http://b/", "404", HEADER, b"gone"));

        let mut sink: Vec<Warning> = Vec::new();
        let docs: Vec<_> = extractor(data).documents(&mut sink).collect::<Result<_>>().unwrap();
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].url(), "http://a/");
        assert_eq!(docs[0].body(), body);
        assert_eq!(docs[1].status(), 404);
        assert_eq!(docs[1].body(), b"gone");
        assert!(sink.is_empty());
        assert_ne!(docs[0].id(), docs[1].id());
    }

    #[test]
    fn zero_lengths_are_skipped() {
        let mut data = record("http://a/", "200", b"", b"body");
        data.extend(record("http://b/", "200", HEADER, b""));
        data.extend(record("not-a-url", "200", b"", b""));

        let mut ex = extractor(data);
        let mut sink: Vec<Warning> = Vec::new();
        for _ in 0..3 {
            assert!(matches!(ex.extract(&mut sink), Extracted::Skipped));
        }
        assert!(matches!(ex.extract(&mut sink), Extracted::EndOfStream));
        // No warnings from skipped records, not even for the URL.
        assert!(sink.is_empty());
    }

    #[test]
    fn url_keeps_carriage_return() {
        let data = record("http://a/\r", "200", HEADER, b"x");
        let mut sink: Vec<Warning> = Vec::new();
        let doc = extractor(data).documents(&mut sink).next().unwrap().unwrap();
        assert_eq!(doc.url(), "http://a/\r");
    }

    #[test]
    fn scheme_warning_does_not_reject() {
        let data = record("www.example.com", "200", HEADER, b"x");
        let mut sink: Vec<Warning> = Vec::new();
        let doc = extractor(data).documents(&mut sink).next().unwrap().unwrap();
        assert_eq!(doc.url(), "www.example.com");
        assert_eq!(sink, vec![Warning::UrlScheme { url: "www.example.com".into() }]);
    }

    #[test]
    fn number_fields_tolerate_whitespace() {
        let data = b"http://a/\n 200 \r\n 1\r\nX 3 \nabc".to_vec();
        let mut sink: Vec<Warning> = Vec::new();
        let doc = extractor(data).documents(&mut sink).next().unwrap().unwrap();
        assert_eq!(doc.status(), 200);
        assert_eq!(doc.body(), b"abc");
        assert_eq!(sink[0], Warning::HeaderLineSkipped { line: "X".into() });
    }

    #[test]
    fn bad_status_is_fatal() {
        let data = record("http://a/", "OK", HEADER, b"x");
        let mut ex = extractor(data);
        let mut sink: Vec<Warning> = Vec::new();
        match ex.extract(&mut sink) {
            Extracted::Fatal(ConvertError::InvalidNumber { field, value }) => {
                assert_eq!(field, "status");
                assert_eq!(value, "OK");
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(matches!(ex.extract(&mut sink), Extracted::EndOfStream));
    }

    #[test]
    fn negative_length_is_fatal() {
        let data = b"http://a/\n200\n-1\n".to_vec();
        let mut ex = extractor(data);
        assert!(matches!(
            ex.extract(&mut Vec::<Warning>::new()),
            Extracted::Fatal(ConvertError::InvalidNumber { field: "header length", .. })
        ));
    }

    #[test]
    fn non_ascii_url_is_fatal() {
        let data = record("http://\u{e9}/", "200", HEADER, b"x");
        let mut ex = extractor(data);
        assert!(matches!(
            ex.extract(&mut Vec::<Warning>::new()),
            Extracted::Fatal(ConvertError::InvalidText { field: "url" })
        ));
    }

    #[test]
    fn truncated_body_stops_extraction() {
        let mut data = record("http://a/", "200", HEADER, b"complete");
        let mut broken = record("http://b/", "200", HEADER, b"0123456789");
        broken.truncate(broken.len() - 4);
        data.extend(broken);

        let mut sink: Vec<Warning> = Vec::new();
        let results: Vec<_> = extractor(data).documents(&mut sink).collect();
        assert_eq!(results.len(), 2);
        assert!(results[0].is_ok());
        assert!(matches!(
            results[1],
            Err(ConvertError::TruncatedRecord { field: "body block" })
        ));
    }

    #[test]
    fn end_of_input_inside_record_is_truncation() {
        let mut ex = extractor(b"http://a/\n200\n".to_vec());
        assert!(matches!(
            ex.extract(&mut Vec::<Warning>::new()),
            Extracted::Fatal(ConvertError::TruncatedRecord { field: "header length" })
        ));

        let mut ex = extractor(b"http://a/".to_vec());
        assert!(matches!(
            ex.extract(&mut Vec::<Warning>::new()),
            Extracted::Fatal(ConvertError::TruncatedRecord { .. })
        ));
    }
}
