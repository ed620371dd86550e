//! Object identifiers for the gyatt object store.
//!
//! This crate only ever deals in SHA-1: the format this core implements
//! doesn't anticipate SHA-256 repositories, so unlike `git-hash` upstream
//! there is no [`Kind`] enum to switch on.

use std::fmt;

pub mod prefix;
pub use prefix::Prefix;

/// Number of raw bytes in a SHA-1 digest.
pub const RAW_LEN: usize = 20;
/// Number of hex characters in a full object id.
pub const HEX_LEN: usize = RAW_LEN * 2;

quick_error::quick_error! {
    /// The error returned by [`ObjectId::from_hex()`].
    #[derive(Debug, PartialEq, Eq)]
    pub enum DecodeError {
        InvalidLength { len: usize } {
            display("Expected a {}-character hex string, got {}", HEX_LEN, len)
        }
        InvalidHex(err: hex::FromHexError) {
            display("Not a valid hex string: {}", err)
            from()
        }
    }
}

/// A content-addressed object identifier: the SHA-1 digest of a framed object.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObjectId([u8; RAW_LEN]);

impl ObjectId {
    /// The all-zero id, used as a sentinel in a few places (e.g. a freshly
    /// allocated [`Prefix`] before bytes are copied in).
    pub const fn null() -> Self {
        ObjectId([0; RAW_LEN])
    }

    /// Wrap a raw 20-byte digest.
    pub const fn from_bytes(bytes: [u8; RAW_LEN]) -> Self {
        ObjectId(bytes)
    }

    /// Parse a 40-character lowercase (or mixed-case) hex string.
    pub fn from_hex(s: impl AsRef<[u8]>) -> Result<Self, DecodeError> {
        let s = s.as_ref();
        if s.len() != HEX_LEN {
            return Err(DecodeError::InvalidLength { len: s.len() });
        }
        let mut bytes = [0u8; RAW_LEN];
        hex::decode_to_slice(s, &mut bytes)?;
        Ok(ObjectId(bytes))
    }

    /// The raw 20 bytes of the digest.
    pub fn as_bytes(&self) -> &[u8; RAW_LEN] {
        &self.0
    }

    /// Mutable access to the raw bytes, used by [`Prefix::new`] to build a
    /// zero-padded partial id.
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.0
    }

    /// Render as a lowercase 40-character hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Debug for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectId({})", self.to_hex())
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl TryFrom<&str> for ObjectId {
    type Error = DecodeError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        ObjectId::from_hex(value)
    }
}

/// Streaming SHA-1 hasher producing an [`ObjectId`]. Kept as a thin wrapper
/// so callers elsewhere in the workspace never import `sha1` directly.
#[derive(Default)]
pub struct Hasher(sha1::Sha1);

impl Hasher {
    /// Start a new hash computation.
    pub fn new() -> Self {
        use sha1::Digest;
        Hasher(sha1::Sha1::new())
    }

    /// Feed more bytes into the running digest.
    pub fn update(&mut self, data: impl AsRef<[u8]>) {
        use sha1::Digest;
        self.0.update(data.as_ref());
    }

    /// Finalize and produce the resulting object id.
    pub fn finish(self) -> ObjectId {
        use sha1::Digest;
        let digest = self.0.finalize();
        let mut bytes = [0u8; RAW_LEN];
        bytes.copy_from_slice(&digest);
        ObjectId(bytes)
    }
}

/// Hash a single buffer in one shot.
pub fn hash(data: impl AsRef<[u8]>) -> ObjectId {
    let mut hasher = Hasher::new();
    hasher.update(data);
    hasher.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blob_hello_matches_git() {
        // framed "blob 6\0hello\n" hashes to this id.
        let framed = b"blob 6\x00hello\n";
        assert_eq!(hash(framed).to_hex(), "ce013625030ba8dba906f756967f9e9ca394464a");
    }

    #[test]
    fn empty_tree_matches_git() {
        // framed empty tree hashes to git's well-known empty-tree id.
        let framed = b"tree 0\x00";
        assert_eq!(hash(framed).to_hex(), "4b825dc642cb6eb9a060e54bf8d69288fbee4904");
    }

    #[test]
    fn hex_round_trip() {
        let id = hash(b"round trip me");
        let hex = id.to_hex();
        assert_eq!(ObjectId::from_hex(&hex).unwrap(), id);
    }

    #[test]
    fn rejects_wrong_length() {
        assert_eq!(
            ObjectId::from_hex("abcd"),
            Err(DecodeError::InvalidLength { len: 4 })
        );
    }
}
