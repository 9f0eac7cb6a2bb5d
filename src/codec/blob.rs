//! Blob codec and the stream-shaped `BlobValue` handle.
//!
//! Blob columns are identity-encoded: the stored bytes are the value. What
//! this module guarantees is the *shape* of the decoded value: it is always
//! a stream (`Read + Seek`), never a raw byte buffer, even when the storage
//! driver cannot natively stream large objects. Small values ride an
//! in-memory cursor; values built from an unsized reader spill to an
//! anonymous temp file past a threshold.
//!
//! A `BlobValue` is a single-owner, single-pass resource. Encoding consumes
//! the handle's content; re-reading afterwards requires the source to
//! support seeking back to offset 0 (all built-in sources do, but a
//! caller-supplied reader's `seek` may fail). The handle closes its
//! underlying resource when dropped, on every exit path.

use std::fs::File;
use std::io::{self, Cursor, Read, Seek, SeekFrom, Write};

use crate::error::ColumnError;
use crate::schema::{ColumnType, ColumnValue};

use super::ColumnCodec;

/// Readers larger than this spill to an anonymous temp file instead of
/// buffering in memory.
const SPILL_THRESHOLD: u64 = 8 * 1024 * 1024;

/// Reader that also supports seeking; object-safe alias for boxed sources.
pub trait ReadSeek: Read + Seek + Send {}

impl<T: Read + Seek + Send> ReadSeek for T {}

enum BlobSource {
    Memory(Cursor<Vec<u8>>),
    Temp(File),
    Reader(Box<dyn ReadSeek>),
}

/// Stream-shaped handle to a blob column value.
///
/// Implements [`Read`] and [`Seek`]. Obtain one from in-memory bytes, by
/// draining an arbitrary reader (with temp-file spill for large inputs),
/// or by wrapping an existing seekable source.
///
/// # Example
///
/// ```
/// use std::io::Read;
/// use buoy::BlobValue;
///
/// let mut blob = BlobValue::from_bytes(b"cover art".to_vec());
/// let mut buf = String::new();
/// blob.read_to_string(&mut buf).unwrap();
/// assert_eq!(buf, "cover art");
/// ```
pub struct BlobValue {
    source: BlobSource,
}

impl BlobValue {
    /// Wrap in-memory bytes in a stream handle
    #[must_use]
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            source: BlobSource::Memory(Cursor::new(bytes.into())),
        }
    }

    /// Drain an arbitrary reader into a new handle.
    ///
    /// Content up to the spill threshold stays in memory; beyond it the
    /// remainder is copied to an anonymous temp file that is removed when
    /// the handle is dropped. The resulting handle is positioned at
    /// offset 0.
    pub fn from_reader<R: Read>(mut reader: R) -> io::Result<Self> {
        let mut head = Vec::new();
        let copied = (&mut reader)
            .take(SPILL_THRESHOLD)
            .read_to_end(&mut head)? as u64;
        if copied < SPILL_THRESHOLD {
            return Ok(Self::from_bytes(head));
        }
        let mut file = tempfile::tempfile()?;
        file.write_all(&head)?;
        drop(head);
        io::copy(&mut reader, &mut file)?;
        file.seek(SeekFrom::Start(0))?;
        Ok(Self {
            source: BlobSource::Temp(file),
        })
    }

    /// Wrap an existing seekable source without copying it.
    ///
    /// The handle takes exclusive ownership of the source for the duration
    /// of the field access.
    #[must_use]
    pub fn from_seekable<R: Read + Seek + Send + 'static>(reader: R) -> Self {
        Self {
            source: BlobSource::Reader(Box::new(reader)),
        }
    }

    /// Seek back to offset 0.
    ///
    /// Fails if the underlying source rejects the seek, in which case the
    /// content consumed so far cannot be re-read.
    pub fn rewind(&mut self) -> io::Result<()> {
        self.seek(SeekFrom::Start(0)).map(|_| ())
    }

    /// Read the full content from offset 0, consuming the stream.
    pub(crate) fn drain(&mut self) -> io::Result<Vec<u8>> {
        self.rewind()?;
        let mut buf = Vec::new();
        self.read_to_end(&mut buf)?;
        Ok(buf)
    }
}

impl Read for BlobValue {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match &mut self.source {
            BlobSource::Memory(c) => c.read(buf),
            BlobSource::Temp(f) => f.read(buf),
            BlobSource::Reader(r) => r.read(buf),
        }
    }
}

impl Seek for BlobValue {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        match &mut self.source {
            BlobSource::Memory(c) => c.seek(pos),
            BlobSource::Temp(f) => f.seek(pos),
            BlobSource::Reader(r) => r.seek(pos),
        }
    }
}

impl std::fmt::Debug for BlobValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let source = match &self.source {
            BlobSource::Memory(c) => format!("Memory({} bytes)", c.get_ref().len()),
            BlobSource::Temp(_) => "Temp".to_string(),
            BlobSource::Reader(_) => "Reader".to_string(),
        };
        write!(f, "BlobValue({})", source)
    }
}

/// Identity codec for blob columns.
///
/// Encode drains the stream to bytes; decode wraps stored bytes in a fresh
/// in-memory stream handle.
#[derive(Debug)]
pub struct BlobCodec {
    column: String,
}

impl BlobCodec {
    pub(crate) fn new(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
        }
    }
}

impl ColumnCodec for BlobCodec {
    fn column_type(&self) -> ColumnType {
        ColumnType::Blob
    }

    fn validate(&self, value: &ColumnValue) -> Result<(), ColumnError> {
        match value {
            ColumnValue::Blob(_) => Ok(()),
            other => Err(ColumnError::UnsupportedValueKind {
                column: self.column.clone(),
                expected: "blob",
                actual: other.kind().to_string(),
            }),
        }
    }

    fn encode(&self, value: ColumnValue) -> Result<Vec<u8>, ColumnError> {
        match value {
            ColumnValue::Blob(mut blob) => {
                blob.drain().map_err(|e| ColumnError::UnsupportedValueKind {
                    column: self.column.clone(),
                    expected: "readable blob stream",
                    actual: format!("stream error: {}", e),
                })
            }
            other => Err(ColumnError::UnsupportedValueKind {
                column: self.column.clone(),
                expected: "blob",
                actual: other.kind().to_string(),
            }),
        }
    }

    fn decode(&self, bytes: &[u8]) -> Result<ColumnValue, ColumnError> {
        Ok(ColumnValue::Blob(BlobValue::from_bytes(bytes.to_vec())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blob_round_trip_is_stream_shaped() {
        let codec = BlobCodec::new("cover_image");
        let encoded = codec
            .encode(ColumnValue::Blob(BlobValue::from_bytes(b"png data".to_vec())))
            .unwrap();
        assert_eq!(encoded, b"png data");

        let decoded = codec.decode(&encoded).unwrap();
        match decoded {
            ColumnValue::Blob(mut blob) => {
                let mut buf = Vec::new();
                blob.read_to_end(&mut buf).unwrap();
                assert_eq!(buf, b"png data");
            }
            other => panic!("expected blob, got {}", other.kind()),
        }
    }

    #[test]
    fn test_blob_rewind_after_partial_read() {
        let mut blob = BlobValue::from_bytes(b"abcdef".to_vec());
        let mut head = [0u8; 3];
        blob.read_exact(&mut head).unwrap();
        assert_eq!(&head, b"abc");

        blob.rewind().unwrap();
        let mut all = Vec::new();
        blob.read_to_end(&mut all).unwrap();
        assert_eq!(all, b"abcdef");
    }

    #[test]
    fn test_blob_from_reader_small_stays_in_memory() {
        let blob = BlobValue::from_reader(&b"short"[..]).unwrap();
        assert!(format!("{:?}", blob).contains("Memory"));
    }

    #[test]
    fn test_blob_encode_rejects_other_kinds() {
        let codec = BlobCodec::new("cover_image");
        let err = codec
            .encode(ColumnValue::Enum("novel".to_string()))
            .unwrap_err();
        assert!(matches!(err, ColumnError::UnsupportedValueKind { .. }));
    }

    #[test]
    fn test_blob_encode_captures_full_content_after_partial_read() {
        let codec = BlobCodec::new("cover_image");
        let mut blob = BlobValue::from_bytes(b"abcdef".to_vec());
        let mut head = [0u8; 2];
        blob.read_exact(&mut head).unwrap();

        // encode rewinds first, so the partial read does not truncate
        let encoded = codec.encode(ColumnValue::Blob(blob)).unwrap();
        assert_eq!(encoded, b"abcdef");
    }
}
