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


//! Linear byte access to one (optionally gzipped) input file.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::Path;
use flate2::read::MultiGzDecoder;

/// Whether `path` names a gzip-compressed file.
pub fn is_compressed(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "gz")
}

/// Decompressed contents of one input file as a single byte sequence.
///
/// Reads happen in blocks through an internal buffer. The underlying file
/// handle is released when the cursor is dropped.
pub struct ByteCursor<R> {
    reader: R,
}

impl ByteCursor<Box<dyn BufRead>> {
    /// Open `path`, transparently decompressing files ending in `.gz`.
    ///
    /// # Arguments
    ///
    /// * `path` - Input file
    /// * `block_size` - Size of the read buffer in bytes
    pub fn open(path: &Path, block_size: usize) -> io::Result<Self> {
        let file = File::open(path)?;
        let reader: Box<dyn BufRead> = if is_compressed(path) {
            Box::new(BufReader::with_capacity(block_size, MultiGzDecoder::new(file)))
        } else {
            Box::new(BufReader::with_capacity(block_size, file))
        };
        Ok(ByteCursor::new(reader))
    }
}

impl<R: BufRead> ByteCursor<R> {
    pub fn new(reader: R) -> Self {
        ByteCursor { reader }
    }

    /// Next byte, or `None` once the input is exhausted.
    #[cfg(test)]
    fn next_byte(&mut self) -> io::Result<Option<u8>> {
        let byte = loop {
            match self.reader.fill_buf() {
                Ok(buf) => break buf.first().copied(),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        };
        if byte.is_some() {
            self.reader.consume(1);
        }
        Ok(byte)
    }

    /// Append bytes up to and including `delim` to `out`.
    ///
    /// Stops early at end of input. Returns the number of bytes appended.
    pub fn read_until(&mut self, delim: u8, out: &mut Vec<u8>) -> io::Result<usize> {
        self.reader.read_until(delim, out)
    }

    /// Append up to `n` bytes to `out`, fewer only at end of input.
    ///
    /// Returns the number of bytes appended.
    pub fn read_up_to(&mut self, n: usize, out: &mut Vec<u8>) -> io::Result<usize> {
        (&mut self.reader).take(n as u64).read_to_end(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use flate2::Compression;
    use flate2::write::GzEncoder;

    fn drain<R: BufRead>(mut cursor: ByteCursor<R>) -> Vec<u8> {
        let mut out = Vec::new();
        while let Some(b) = cursor.next_byte().unwrap() {
            out.push(b);
        }
        out
    }

    #[test]
    fn detects_gzip_suffix() {
        assert!(is_compressed(Path::new("a/b.gz")));
        assert!(!is_compressed(Path::new("a/b.txt")));
        assert!(!is_compressed(Path::new("a/gz")));
    }

    #[test]
    fn bytes_one_at_a_time() {
        let cursor = ByteCursor::new(io::Cursor::new(b"abc".to_vec()));
        assert_eq!(drain(cursor), b"abc");
    }

    #[test]
    fn plain_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("input.txt");
        std::fs::write(&path, b"hello\n").unwrap();

        let cursor = ByteCursor::open(&path, 2).unwrap();
        assert_eq!(drain(cursor), b"hello\n");
    }

    #[test]
    fn gzip_file_with_several_members() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("input.gz");
        let mut data = Vec::new();
        for part in [&b"first "[..], &b"second"[..]] {
            let mut enc = GzEncoder::new(Vec::new(), Compression::default());
            enc.write_all(part).unwrap();
            data.extend(enc.finish().unwrap());
        }
        std::fs::write(&path, data).unwrap();

        let cursor = ByteCursor::open(&path, 4).unwrap();
        assert_eq!(drain(cursor), b"first second");
    }

    #[test]
    fn bulk_reads() {
        let mut cursor = ByteCursor::new(io::Cursor::new(b"ab\ncdef".to_vec()));
        let mut out = Vec::new();
        assert_eq!(cursor.read_until(b'\n', &mut out).unwrap(), 3);
        assert_eq!(cursor.read_up_to(2, &mut out).unwrap(), 2);
        assert_eq!(cursor.read_up_to(10, &mut out).unwrap(), 2);
        assert_eq!(out, b"ab\ncdef");
    }
}
