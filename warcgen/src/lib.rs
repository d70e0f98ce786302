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

use std::io;
use chrono::{DateTime, Utc};
use encoding::{DecoderTrap, EncoderTrap, Encoding};
use encoding::all::ISO_8859_1;
use flate2::Compression;
use flate2::write::GzEncoder;
use uuid::Uuid;

/// WARC version line written at the top of every record.
pub const WARC_VERSION: &str = "WARC/1.0";

/// `strftime` format of the `WARC-Date` header (whole seconds, UTC).
pub const WARC_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";


/// WARC record type enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WarcRecordType {
    WarcInfo,
    Response,
    Resource,
    Request,
    Metadata,
    Revisit,
    Conversion,
    Continuation,
    Unknown,
}

impl WarcRecordType {
    pub fn as_str(&self) -> &'static str {
        match self {
            WarcRecordType::WarcInfo => "warcinfo",
            WarcRecordType::Response => "response",
            WarcRecordType::Resource => "resource",
            WarcRecordType::Request => "request",
            WarcRecordType::Metadata => "metadata",
            WarcRecordType::Revisit => "revisit",
            WarcRecordType::Conversion => "conversion",
            WarcRecordType::Continuation => "continuation",
            WarcRecordType::Unknown => "unknown",
        }
    }
}

#[derive(Debug, Eq, PartialEq, Clone, Copy)]
pub enum HeaderEncoding {
    Unicode,
    /// ISO-8859-1: one byte per character, every byte value is valid.
    Latin1
}

/// Ordered header block of a WARC record or an HTTP message.
///
/// Keys keep their original spelling, lookups ignore ASCII case.
/// Keys and values are stored as raw bytes and decoded on access.
#[derive(Debug, Clone)]
pub struct HeaderMap {
    encoding: HeaderEncoding,
    status_line: Vec<u8>,
    headers: Vec<(Vec<u8>, Vec<u8>)>,
}

impl HeaderMap {
    /// Create a new header map with the specified encoding.
    ///
    /// # Arguments
    ///
    /// * `encoding` - Header source encoding
    pub fn new(encoding: HeaderEncoding) -> Self {
        HeaderMap {
            encoding,
            status_line: Vec::new(),
            headers: Vec::new(),
        }
    }

    /// Set status line contents.
    pub fn set_status_line(&mut self, status_line: impl AsRef<[u8]>) {
        self.status_line = status_line.as_ref().to_vec();
    }

    fn decode(&self, byte_str: &[u8]) -> String {
        match self.encoding {
            HeaderEncoding::Unicode => String::from_utf8_lossy(byte_str).to_string(),
            HeaderEncoding::Latin1 => ISO_8859_1.decode(byte_str, DecoderTrap::Replace)
                .unwrap_or_else(|e| e.into_owned())
        }
    }

    fn encode(&self, s: &str) -> Vec<u8> {
        match self.encoding {
            HeaderEncoding::Unicode => s.as_bytes().to_vec(),
            HeaderEncoding::Latin1 => ISO_8859_1.encode(s, EncoderTrap::Replace)
                .unwrap_or_else(|_| s.bytes().filter(u8::is_ascii).collect())
        }
    }

    /// Get value for (case-insensitive) header key a string.
    /// Duplicate headers are returned as a single value joined with `","`.
    ///
    /// # Arguments
    ///
    /// * `key` - Header key
    pub fn get(&self, key: &str) -> Option<String> {
        Some(self.decode(&self.get_bytes(&self.encode(key))?))
    }

    /// Get value for (case-insensitive) header key as bytes.
    /// Duplicate headers are returned as a single value joined with `","`.
    fn get_bytes(&self, key: &[u8]) -> Option<Vec<u8>> {
        let values: Vec<&[u8]> = self.headers.iter()
            .filter(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_slice())
            .collect();
        if !values.is_empty() {
            Some(values.as_slice().join(b",".as_slice()))
        } else {
            None
        }
    }

    /// First header whose key matches `key` ignoring case, as `(stored key, value)`.
    ///
    /// # Arguments
    ///
    /// * `key` - Header key
    pub fn find(&self, key: &str) -> Option<(String, String)> {
        let key_bytes = self.encode(key);
        self.headers.iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(&key_bytes))
            .map(|(k, v)| (self.decode(k), self.decode(v)))
    }

    /// Check if a (case-insensitive) header key exists.
    ///
    /// # Arguments
    ///
    /// * `key` - Header key
    pub fn contains_key(&self, key: &str) -> bool {
        let key_bytes = self.encode(key);
        self.headers.iter().any(|(k, _)| k.eq_ignore_ascii_case(&key_bytes))
    }

    /// Insert new header and overwrite existing header(s) if the key already exists.
    ///
    /// Key matching ignores ASCII case. If a header already exists, its first
    /// occurrence will be updated and all following occurrences will be dropped.
    /// Key and value are trimmed.
    pub fn set_bytes(&mut self, key: &[u8], value: &[u8]) {
        let key_lower = key.to_ascii_lowercase();
        let mut found = false;
        self.headers.retain_mut(|h| {
            if h.0.to_ascii_lowercase() != key_lower {
                true
            } else if !found {
                *h = (key.trim_ascii().to_vec(), value.trim_ascii().to_vec());
                found = true;
                true
            } else {
                false
            }
        });
        if !found {
            self.headers.push((key.trim_ascii().to_vec(), value.trim_ascii().to_vec()));
        }
    }

    /// Set the value of the header spelled exactly `key` (case-sensitive).
    ///
    /// An existing entry keeps its position, otherwise the header is appended.
    /// Headers spelled with different case are left untouched.
    ///
    /// # Arguments
    ///
    /// * `key` - Header key
    /// * `value` - Header value
    pub fn set_exact(&mut self, key: impl AsRef<str>, value: impl AsRef<str>) {
        let key = self.encode(key.as_ref());
        let value = self.encode(value.as_ref());
        match self.headers.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.headers.push((key, value)),
        }
    }

    /// Append header.
    ///
    /// Appending a new header is efficient and does not check for
    /// existing headers with the same name.
    pub fn append_bytes(&mut self, key: &[u8], value: &[u8]) {
        self.headers.push((key.trim_ascii().to_vec(), value.trim_ascii().to_vec()));
    }

    /// Iterator of keys and values.
    pub fn items(&self) -> impl Iterator<Item = (String, String)> + use<'_> {
        self.headers
            .iter()
            .map(|(k, v)| (self.decode(k), self.decode(v)))
    }

    /// Clear all headers.
    pub fn clear(&mut self) {
        self.headers.clear();
        self.status_line.clear();
    }

    /// Write header block into stream.
    ///
    /// The status line (if set) and every header are terminated by `CRLF`.
    /// The blank line that ends the block is not written.
    pub fn write<W: io::Write>(&self, writer: &mut W) -> io::Result<usize> {
        let mut bytes_written = 0usize;
        if !self.status_line.is_empty() {
            writer.write_all(&self.status_line)?;
            bytes_written += self.status_line.len();
            writer.write_all(b"\r\n")?;
            bytes_written += 2;
        }
        for (key, value) in &self.headers {
            writer.write_all(key)?;
            bytes_written += key.len();
            writer.write_all(b": ")?;
            bytes_written += 2;
            writer.write_all(value)?;
            bytes_written += value.len();
            writer.write_all(b"\r\n")?;
            bytes_written += 2;
        }
        Ok(bytes_written)
    }

    /// Serialized header block, see [`HeaderMap::write`].
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        // Writing into a Vec does not fail.
        let _ = self.write(&mut buf);
        buf
    }
}


/// A WARC record to be written.
#[derive(Debug, Clone)]
pub struct WarcRecord {
    record_type: WarcRecordType,
    headers: HeaderMap,
    content: Vec<u8>,
}

impl Default for WarcRecord {
    fn default() -> Self {
        Self::new()
    }
}

impl WarcRecord {
    /// Create a new empty WARC record.
    pub fn new() -> Self {
        WarcRecord {
            record_type: WarcRecordType::Unknown,
            headers: HeaderMap::new(HeaderEncoding::Unicode),
            content: Vec::new(),
        }
    }

    /// Record ID (same as `headers['WARC-Record-ID']`).
    pub fn record_id(&self) -> Option<String> {
        self.headers.get("WARC-Record-ID")
    }

    /// WARC record headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Mark this record as an HTTP record.
    /// Setting this will also set the `Content-Type` of this record.
    pub fn set_is_http(&mut self, is_http: bool) {
        if is_http {
            self.headers.set_bytes(b"Content-Type", match self.record_type {
                WarcRecordType::Request => b"application/http; msgtype=request",
                WarcRecordType::Response => b"application/http; msgtype=response",
                _ => b"application/http",
            });
        }
    }

    /// Record block length in bytes.
    pub fn content_length(&self) -> usize {
        self.content.len()
    }

    /// Get the record content as a byte slice.
    pub fn content(&self) -> &[u8] {
        &self.content
    }

    /// Initialize mandatory headers in a fresh WARC record instance.
    ///
    /// Writes the version line followed by `WARC-Type`, `WARC-Record-ID` and `WARC-Date`.
    /// `Content-Length` is added by [`WarcRecord::set_content`].
    ///
    /// # Arguments
    ///
    /// * `record_type` - WARC-Type
    /// * `record_urn` - WARC-Record-ID as URN without `'<'`, `'>'` (if unset, a random URN will be generated)
    /// * `date` - WARC-Date, truncated to whole seconds
    pub fn init_headers(
        &mut self,
        record_type: WarcRecordType,
        record_urn: Option<&str>,
        date: DateTime<Utc>,
    ) {
        let urn = match record_urn {
            Some(urn) => urn.to_string(),
            None => format!("urn:uuid:{}", Uuid::new_v4()),
        };

        self.record_type = record_type;

        self.headers.clear();
        self.headers.set_status_line(WARC_VERSION);
        self.headers.append_bytes(b"WARC-Type", self.record_type.as_str().as_bytes());

        let record_id = format!("<{}>", urn);
        self.headers.append_bytes(b"WARC-Record-ID", record_id.as_bytes());

        let date = date.format(WARC_DATE_FORMAT).to_string();
        self.headers.append_bytes(b"WARC-Date", date.as_bytes());
    }

    /// Set `WARC-Target-URI`.
    ///
    /// The URI is stored exactly as given, without trimming.
    pub fn set_target_uri(&mut self, uri: &str) {
        self.headers.set_exact("WARC-Target-URI", uri);
    }

    /// Set WARC body and update `Content-Length`.
    ///
    /// # Arguments
    ///
    /// * `content` - Body as bytes
    pub fn set_content(&mut self, content: Vec<u8>) {
        self.content = content;
        self.headers.set_bytes(b"Content-Length", self.content.len().to_string().as_bytes());
    }

    /// Write WARC record onto a stream.
    ///
    /// Returns the number of bytes written.
    pub fn write<W: io::Write>(&self, writer: &mut W) -> io::Result<usize> {
        let mut bytes_written = self.headers.write(writer)?;
        writer.write_all(b"\r\n")?;
        bytes_written += 2;
        writer.write_all(&self.content)?;
        bytes_written += self.content.len();
        Ok(bytes_written)
    }

    /// Write WARC record onto a stream as a standalone gzip member.
    ///
    /// Every call produces a complete member, so records written this way can be
    /// concatenated and each one still decompresses on its own.
    /// Returns the number of uncompressed bytes written.
    ///
    /// # Arguments
    ///
    /// * `writer` - Output stream
    /// * `level` - Compression level (0-9)
    pub fn write_gzip<W: io::Write>(&self, writer: &mut W, level: u32) -> io::Result<usize> {
        let mut encoder = GzEncoder::new(writer, Compression::new(level));
        let bytes_written = self.write(&mut encoder)?;
        encoder.finish()?;
        Ok(bytes_written)
    }
}
