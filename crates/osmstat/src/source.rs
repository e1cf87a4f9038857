// Dweve OSMStat - OpenStreetMap archive statistics
//
// Copyright (c) 2025 Dweve IP B.V. and individual contributors.
//
// SPDX-License-Identifier: Apache-2.0
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE file at the
// root of this repository or at: http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Decompression source for bzip2-compressed archives.
//!
//! Wraps a raw byte stream and exposes the decompressed bytes as a forward-only
//! [`BufRead`]. The bzip2 signature is checked eagerly so that a file which is
//! not an archive at all fails when it is opened, before any XML is scanned.
//! Corruption further inside the stream surfaces as an I/O error on read.
//!
//! Concatenated multi-stream archives, as written by parallel compressors,
//! are decoded in full.

use crate::error::{StatsError, StatsResult};
use bzip2::bufread::MultiBzDecoder;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Chain, Cursor, Read};
use std::path::Path;
use tracing::debug;

/// Stream signature: `BZh` followed by a block size digit `1`-`9`.
const BZIP2_SIGNATURE: &[u8; 3] = b"BZh";

/// Decompressed view over a bzip2 stream.
///
/// Owns the underlying reader; dropping it releases the file handle.
pub struct ArchiveReader<R: BufRead> {
    inner: BufReader<MultiBzDecoder<Chain<Cursor<Vec<u8>>, R>>>,
}

impl<R: BufRead> ArchiveReader<R> {
    /// Wrap a compressed byte stream.
    ///
    /// `origin` names the stream in error messages.
    ///
    /// # Errors
    ///
    /// Returns [`StatsError::Source`] if the stream cannot be read or does not
    /// start with a bzip2 signature.
    pub fn new(mut reader: R, buffer_size: usize, origin: &Path) -> StatsResult<Self> {
        let head = read_signature(&mut reader, origin)?;
        let stream = Cursor::new(head).chain(reader);
        Ok(Self {
            inner: BufReader::with_capacity(buffer_size, MultiBzDecoder::new(stream)),
        })
    }
}

impl<R: BufRead> Read for ArchiveReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.inner.read(buf)
    }
}

impl<R: BufRead> BufRead for ArchiveReader<R> {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        self.inner.fill_buf()
    }

    fn consume(&mut self, amt: usize) {
        self.inner.consume(amt)
    }
}

/// Open an archive file for decompressed reading.
///
/// # Errors
///
/// Returns [`StatsError::Source`] if the file is missing, unreadable, or not a
/// bzip2 stream.
///
/// # Examples
///
/// ```no_run
/// use osmstat::source::open_archive;
/// use std::io::Read;
/// use std::path::Path;
///
/// let mut xml = String::new();
/// open_archive(Path::new("map.osm.bz2"), 65536)?.read_to_string(&mut xml).ok();
/// # Ok::<(), osmstat::StatsError>(())
/// ```
pub fn open_archive(path: &Path, buffer_size: usize) -> StatsResult<ArchiveReader<BufReader<File>>> {
    debug!(path = %path.display(), "Opening archive");
    let file = File::open(path).map_err(|e| StatsError::source_io(path, e))?;
    ArchiveReader::new(BufReader::with_capacity(buffer_size, file), buffer_size, path)
}

/// Read and validate the four signature bytes, returning them so they can be
/// replayed in front of the rest of the stream.
///
/// The reader's own buffer may hold fewer than four bytes, so this reads until
/// the signature is complete or the input ends.
fn read_signature<R: BufRead>(reader: &mut R, origin: &Path) -> StatsResult<Vec<u8>> {
    let mut head = Vec::with_capacity(BZIP2_SIGNATURE.len() + 1);
    reader
        .by_ref()
        .take(BZIP2_SIGNATURE.len() as u64 + 1)
        .read_to_end(&mut head)
        .map_err(|e| StatsError::source_io(origin, e))?;

    match head.as_slice() {
        [] => Err(StatsError::source(origin, "archive is empty")),
        [a, b, c, level] if [*a, *b, *c] == *BZIP2_SIGNATURE && (b'1'..=b'9').contains(level) => {
            Ok(head)
        }
        _ => Err(StatsError::source(
            origin,
            "not a bzip2 stream (missing 'BZh' signature)",
        )),
    }
}
