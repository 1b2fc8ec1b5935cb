//! Mapping from buffer positions to positions in the source file.

/// Where a parsed buffer sits in its source file.
///
/// A buffer may start with synthesized bytes (a declaration header) that
/// have no place in the file. Bytes from `buffer_offset` onward are a
/// verbatim copy of the file starting at `file_offset`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PositionOrigin {
    pub buffer_offset: usize,
    pub file_offset: u64,
}

impl PositionOrigin {
    /// The buffer is the file itself.
    pub const IDENTITY: PositionOrigin = PositionOrigin {
        buffer_offset: 0,
        file_offset: 0,
    };

    pub fn new(buffer_offset: usize, file_offset: u64) -> Self {
        Self {
            buffer_offset,
            file_offset,
        }
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    /// File offset of a buffer position. Header positions map to `file_offset`.
    pub fn to_file(&self, buffer_pos: usize) -> u64 {
        self.file_offset + buffer_pos.saturating_sub(self.buffer_offset) as u64
    }
}
