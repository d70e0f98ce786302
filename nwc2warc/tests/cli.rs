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


//! Tests driving the `nwc2warc` executable.

use std::io::{Read, Write};
use std::path::PathBuf;
use std::process::Command;
use flate2::read::MultiGzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use nwc2warc::batch::{self, BatchOptions};

fn exe() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_nwc2warc"))
}

fn corpus(body: &[u8]) -> Vec<u8> {
    let header = b"Content-Type: text/html\nDate: Wed, 01 Sep 2010 10:00:00 GMT\n";
    let mut data = format!("http://example.com/\n200\n{}\n", header.len()).into_bytes();
    data.extend_from_slice(header);
    data.extend_from_slice(format!("{}\n", body.len()).as_bytes());
    data.extend_from_slice(body);

    let mut enc = GzEncoder::new(Vec::new(), Compression::default());
    enc.write_all(&data).unwrap();
    enc.finish().unwrap()
}

fn decompress(data: &[u8]) -> String {
    let mut out = Vec::new();
    MultiGzDecoder::new(data).read_to_end(&mut out).unwrap();
    String::from_utf8(out).unwrap()
}

#[test]
fn convert_command() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("a.gz");
    let output = dir.path().join("warc/a.warc.gz");
    std::fs::write(&input, corpus(b"hello")).unwrap();

    let status = Command::new(exe())
        .arg("convert")
        .arg(&input)
        .arg(&output)
        .args(["--compression-level", "1"])
        .status()
        .unwrap();
    assert!(status.success());

    let warc = decompress(&std::fs::read(&output).unwrap());
    assert!(warc.starts_with("WARC/1.0\r\nWARC-Type: response\r\n"));
    assert!(warc.ends_with("\r\n\r\nhello"));
}

#[test]
fn convert_command_fails_on_corrupt_input() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("bad");
    std::fs::write(&input, b"http://example.com/\nOK\n").unwrap();

    let output = Command::new(exe())
        .arg("convert")
        .arg(&input)
        .arg(dir.path().join("bad.warc.gz"))
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("status"));
}

#[test]
fn batch_writes_warc_and_log_per_input() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    std::fs::write(input.path().join("one.gz"), corpus(b"first")).unwrap();
    std::fs::write(input.path().join("two.gz"), corpus(b"second")).unwrap();
    std::fs::write(input.path().join("broken.gz"), b"not gzip").unwrap();

    let options = BatchOptions { jobs: 2, program: exe(), extra_args: Vec::new() };
    let report = batch::run(input.path(), output.path(), &options).unwrap();
    assert_eq!(report.succeeded.len(), 2);
    assert_eq!(report.failed, vec![input.path().join("broken.gz")]);

    let one = decompress(&std::fs::read(output.path().join("one.warc.gz")).unwrap());
    assert!(one.ends_with("first"));
    let two = decompress(&std::fs::read(output.path().join("two.warc.gz")).unwrap());
    assert!(two.ends_with("second"));

    let log = std::fs::read_to_string(output.path().join("one.log")).unwrap();
    assert!(log.contains("Finished"));
    assert!(output.path().join("broken.log").is_file());
}
