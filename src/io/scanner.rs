use serde_json::{Map, Value};

use super::error::IoError;
use crate::domain::RawRecord;

/// Largest partial object kept in memory by default (1 MiB)
pub const DEFAULT_MAX_OBJECT_BYTES: usize = 1024 * 1024;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Incremental splitter for a byte stream of concatenated JSON objects.
///
/// Bytes are fed in arbitrary chunks. The scanner tracks nesting depth and
/// string state across chunks, so every byte is inspected once. Only the
/// current partial object is retained between calls.
///
/// Between objects, whitespace and the array punctuation `[`, `]` and `,` are
/// skipped. Anything else there is a fault. A UTF-8 byte order mark at the
/// very start of the stream is skipped as well.
#[derive(Debug)]
pub struct ObjectScanner {
    buffer: Vec<u8>,
    cursor: usize,
    object_start: Option<usize>,
    depth: usize,
    in_string: bool,
    escaped: bool,
    // Stream offset of buffer[0]
    offset: u64,
    max_object_bytes: usize,
    at_stream_start: bool,
}

impl ObjectScanner {
    pub fn new() -> Self {
        Self::with_max_object_bytes(DEFAULT_MAX_OBJECT_BYTES)
    }

    /// Create a scanner that faults once a partial object outgrows `limit`
    pub fn with_max_object_bytes(limit: usize) -> Self {
        Self {
            buffer: Vec::new(),
            cursor: 0,
            object_start: None,
            depth: 0,
            in_string: false,
            escaped: false,
            offset: 0,
            max_object_bytes: limit.max(2),
            at_stream_start: true,
        }
    }

    /// Append bytes read from the source
    pub fn feed(&mut self, bytes: &[u8]) {
        self.buffer.extend_from_slice(bytes);
    }

    /// Whether an object has started but not yet closed
    pub fn has_partial(&self) -> bool {
        self.object_start.is_some()
    }

    /// Bytes currently held
    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }

    /// Total bytes consumed from the source so far
    pub fn position(&self) -> u64 {
        self.offset + self.cursor as u64
    }

    /// Return the next complete object, if the buffered bytes contain one.
    ///
    /// `None` means more input is needed.
    pub fn next_object(&mut self) -> Option<Result<RawRecord, IoError>> {
        if self.at_stream_start {
            if self.buffer.len() < UTF8_BOM.len() && UTF8_BOM.starts_with(&self.buffer) {
                return None;
            }
            if self.buffer.starts_with(UTF8_BOM) {
                self.cursor = UTF8_BOM.len();
            }
            self.at_stream_start = false;
        }

        while self.cursor < self.buffer.len() {
            let index = self.cursor;
            let byte = self.buffer[index];
            self.cursor += 1;

            let Some(start) = self.object_start else {
                match byte {
                    b'{' => {
                        self.object_start = Some(index);
                        self.depth = 1;
                    }
                    b' ' | b'\t' | b'\r' | b'\n' | b',' | b'[' | b']' => {}
                    b'}' => return Some(Err(IoError::UnbalancedBrace(self.offset + index as u64))),
                    _ => {
                        return Some(Err(IoError::UnexpectedByte {
                            byte,
                            offset: self.offset + index as u64,
                        }));
                    }
                }
                continue;
            };

            if self.cursor - start > self.max_object_bytes {
                return Some(Err(IoError::ObjectTooLarge {
                    limit: self.max_object_bytes,
                }));
            }

            if self.in_string {
                if self.escaped {
                    self.escaped = false;
                } else if byte == b'\\' {
                    self.escaped = true;
                } else if byte == b'"' {
                    self.in_string = false;
                }
                continue;
            }

            match byte {
                b'"' => self.in_string = true,
                b'{' => self.depth += 1,
                b'}' => {
                    self.depth -= 1;
                    if self.depth == 0 {
                        return Some(self.complete(start, self.cursor));
                    }
                }
                _ => {}
            }
        }

        self.compact();
        None
    }

    fn complete(&mut self, start: usize, end: usize) -> Result<RawRecord, IoError> {
        let parsed = serde_json::from_slice::<Map<String, Value>>(&self.buffer[start..end]);

        self.object_start = None;
        self.buffer.drain(..end);
        self.offset += end as u64;
        self.cursor = 0;

        Ok(RawRecord::new(parsed?))
    }

    /// Drop bytes that can no longer be part of an object
    fn compact(&mut self) {
        let keep_from = self.object_start.unwrap_or(self.buffer.len());
        if keep_from == 0 {
            return;
        }

        self.buffer.drain(..keep_from);
        self.offset += keep_from as u64;
        self.cursor -= keep_from;
        if self.object_start.is_some() {
            self.object_start = Some(0);
        }
    }
}

impl Default for ObjectScanner {
    fn default() -> Self {
        Self::new()
    }
}
