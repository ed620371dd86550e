//! Blobs: opaque file content with no further structure.

/// A blob's payload is stored byte-for-byte; parsing and serializing are
/// both the identity function.
pub fn parse(payload: &[u8]) -> Vec<u8> {
    payload.to_vec()
}

pub fn serialize(blob: &[u8]) -> Vec<u8> {
    blob.to_vec()
}
