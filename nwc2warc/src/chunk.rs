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


//! Tokenizer for the record framing: lines and fixed-length blocks.

use std::io::BufRead;
use crate::cursor::ByteCursor;
use crate::error::{ConvertError, Result};

pub struct ChunkReader<R> {
    cursor: ByteCursor<R>,
}

impl<R: BufRead> ChunkReader<R> {
    pub fn new(cursor: ByteCursor<R>) -> Self {
        ChunkReader { cursor }
    }

    /// Read up to and including the next `\n`.
    ///
    /// Fails with [`ConvertError::EndOfInput`] if no byte is left and with
    /// [`ConvertError::TruncatedRecord`] if the input ends inside the line.
    pub fn read_line(&mut self) -> Result<Vec<u8>> {
        let mut line = Vec::new();
        let n = self.cursor.read_until(b'\n', &mut line)?;
        if n == 0 {
            return Err(ConvertError::EndOfInput);
        }
        if line.last() != Some(&b'\n') {
            return Err(ConvertError::TruncatedRecord { field: "line" });
        }
        Ok(line)
    }

    /// Read exactly `n` bytes.
    ///
    /// Fails with [`ConvertError::TruncatedRecord`] if fewer than `n` bytes remain.
    pub fn read_exact(&mut self, n: usize) -> Result<Vec<u8>> {
        let mut block = Vec::new();
        if self.cursor.read_up_to(n, &mut block)? < n {
            return Err(ConvertError::TruncatedRecord { field: "block" });
        }
        Ok(block)
    }
}
