//! Low-level byte and string helpers

use byteorder::{BigEndian, ReadBytesExt};

use crate::dict::types::error::{DictError, Result};

/// Read a big-endian `u32` from a byte slice and advance it.
///
/// Running out of bytes means the index framing is truncated.
pub fn read_u32(reader: &mut &[u8], field: &str) -> Result<u32> {
    reader.read_u32::<BigEndian>().map_err(|_| {
        DictError::MalformedIndex(format!("truncated record: missing {} field", field))
    })
}

/// Decode bytes as UTF-8, failing on any invalid sequence.
pub fn decode_utf8(bytes: &[u8], context: impl FnOnce() -> String) -> Result<String> {
    std::str::from_utf8(bytes)
        .map(str::to_owned)
        .map_err(|e| DictError::decode(context(), e))
}
