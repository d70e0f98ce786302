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


//! Wrapping synthesized responses into WARC response records.

use std::io;
use warcgen::{WarcRecord, WarcRecordType};
use crate::diagnostics::WarningSink;
use crate::document::Document;
use crate::response;

/// Build the WARC response record for `doc`.
pub fn to_warc_record(doc: &Document, sink: &mut dyn WarningSink) -> WarcRecord {
    let payload = response::synthesize(doc, sink);
    let urn = format!("urn:uuid:{}", doc.id());

    let mut record = WarcRecord::new();
    record.init_headers(WarcRecordType::Response, Some(&urn), doc.date());
    record.set_target_uri(doc.url());
    record.set_content(payload);
    record.set_is_http(true);
    record
}

/// Writes documents as independently gzipped WARC records.
pub struct RecordEncoder<W> {
    writer: W,
    level: u32,
}

impl<W: io::Write> RecordEncoder<W> {
    pub fn new(writer: W, level: u32) -> Self {
        RecordEncoder { writer, level }
    }

    /// Append one record as its own gzip member.
    ///
    /// Returns the uncompressed record size.
    pub fn encode(&mut self, doc: &Document, sink: &mut dyn WarningSink) -> io::Result<usize> {
        to_warc_record(doc, sink).write_gzip(&mut self.writer, self.level)
    }

    /// Flush and return the underlying writer.
    pub fn finish(mut self) -> io::Result<W> {
        self.writer.flush()?;
        Ok(self.writer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;
    use chrono::{TimeZone, Utc};
    use flate2::read::GzDecoder;
    use warcgen::{HeaderEncoding, HeaderMap};
    use crate::diagnostics::Warning;

    fn doc() -> Document {
        let mut header = HeaderMap::new(HeaderEncoding::Latin1);
        header.set_exact("Content-Length", "2");
        let date = Utc.with_ymd_and_hms(2010, 9, 1, 10, 0, 0).unwrap();
        Document::new("http://a/".into(), date, 200, header, b"hi".to_vec())
    }

    #[test]
    fn record_headers() {
        let doc = doc();
        let record = to_warc_record(&doc, &mut Vec::<Warning>::new());
        let headers = record.headers();

        assert!(headers.to_bytes().starts_with(b"WARC/1.0\r\n"));
        assert_eq!(headers.get("WARC-Type").as_deref(), Some("response"));
        assert_eq!(record.record_id(), Some(format!("<urn:uuid:{}>", doc.id())));
        assert_eq!(headers.get("WARC-Date").as_deref(), Some("2010-09-01T10:00:00Z"));
        assert_eq!(headers.get("WARC-Target-URI").as_deref(), Some("http://a/"));
        assert_eq!(headers.get("Content-Type").as_deref(), Some("application/http; msgtype=response"));
        assert_eq!(headers.get("Content-Length"), Some(record.content_length().to_string()));
        assert!(record.content().starts_with(b"HTTP/1.1 200 OK\r\n"));

        let keys: Vec<_> = headers.items().map(|(k, _)| k).collect();
        assert_eq!(keys, [
            "WARC-Type", "WARC-Record-ID", "WARC-Date", "WARC-Target-URI",
            "Content-Length", "Content-Type",
        ]);
    }

    #[test]
    fn target_uri_matches_document_url() {
        let date = Utc.with_ymd_and_hms(2010, 9, 1, 10, 0, 0).unwrap();
        let header = HeaderMap::new(HeaderEncoding::Latin1);
        let doc = Document::new("http://a/\r".into(), date, 200, header, Vec::new());
        let record = to_warc_record(&doc, &mut Vec::<Warning>::new());

        assert_eq!(record.headers().get("WARC-Target-URI").as_deref(), Some(doc.url()));
        let mut out = Vec::new();
        record.write(&mut out).unwrap();
        assert!(out.windows(29).any(|w| w == b"WARC-Target-URI: http://a/\r\r\n"));
    }

    #[test]
    fn each_record_is_one_member() {
        let mut encoder = RecordEncoder::new(Vec::new(), 6);
        let size = encoder.encode(&doc(), &mut Vec::<Warning>::new()).unwrap();
        let out = encoder.finish().unwrap();

        let mut plain = Vec::new();
        let mut decoder = GzDecoder::new(&out[..]);
        decoder.read_to_end(&mut plain).unwrap();
        assert_eq!(plain.len(), size);
        assert!(plain.starts_with(b"WARC/1.0\r\n"));
        assert!(plain.ends_with(b"\r\n\r\nhi"));
    }
}
