use std::cmp::Ordering;

use quick_error::quick_error;

use crate::{ObjectId, HEX_LEN};

/// The minimum hex length of a short object id; git itself refuses anything shorter.
pub const MIN_HEX_LEN: usize = 4;

quick_error! {
    /// The error returned by [`Prefix::new()`].
    #[derive(Debug, PartialEq, Eq)]
    pub enum Error {
        TooShort { hex_len: usize } {
            display("The minimum hex length of a short object id is {}, got {}", MIN_HEX_LEN, hex_len)
        }
        TooLong { hex_len: usize } {
            display("An id cannot be longer than {} hex characters, but {} was requested", HEX_LEN, hex_len)
        }
    }
}

///
pub mod from_hex {
    use quick_error::quick_error;

    quick_error! {
        /// The error returned by [`super::Prefix::from_hex()`].
        #[derive(Debug, PartialEq, Eq)]
        pub enum Error {
            TooShort { hex_len: usize } {
                display("The minimum hex length of a short object id is {}, got {}", super::MIN_HEX_LEN, hex_len)
            }
            TooLong { hex_len: usize } {
                display("An id cannot be longer than {} hex characters, but {} was requested", super::HEX_LEN, hex_len)
            }
            Invalid { c: char, index: usize } {
                display("Invalid character {} at position {}", c, index)
            }
        }
    }
}

/// A partial object id: the first `hex_len` hex digits of a full id, used for
/// disambiguation when resolving short hashes.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Prefix {
    bytes: ObjectId,
    hex_len: usize,
}

impl Prefix {
    /// The minimum accepted hex length.
    pub const MIN_HEX_LEN: usize = MIN_HEX_LEN;

    /// Create a new instance by taking a full `id` as input and truncating it
    /// to `hex_len`. With `hex_len` of 7 the resulting prefix is 3.5 bytes,
    /// or 3 bytes and 4 bits wide, with all other bytes and bits set to zero.
    pub fn new(id: &ObjectId, hex_len: usize) -> Result<Self, Error> {
        if hex_len > HEX_LEN {
            Err(Error::TooLong { hex_len })
        } else if hex_len < MIN_HEX_LEN {
            Err(Error::TooShort { hex_len })
        } else {
            let mut prefix = ObjectId::null();
            let b = prefix.as_mut_slice();
            let copy_len = (hex_len + 1) / 2;
            b[..copy_len].copy_from_slice(&id.as_bytes()[..copy_len]);
            if hex_len % 2 == 1 {
                b[hex_len / 2] &= 0xf0;
            }
            Ok(Prefix { bytes: prefix, hex_len })
        }
    }

    /// Parse a hex prefix like `35e77c16`, yielding a `Prefix` with `hex_len() == 8`.
    pub fn from_hex(value: &str) -> Result<Self, from_hex::Error> {
        let hex_len = value.len();
        if hex_len > HEX_LEN {
            return Err(from_hex::Error::TooLong { hex_len });
        } else if hex_len < MIN_HEX_LEN {
            return Err(from_hex::Error::TooShort { hex_len });
        }

        let padded = if value.len() % 2 == 0 {
            value.to_owned()
        } else {
            format!("{value}0")
        };
        let mut full = [0u8; HEX_LEN];
        full[..padded.len()].copy_from_slice(padded.as_bytes());
        // pad remaining hex chars with '0' so the full ObjectId parser accepts it
        for b in &mut full[padded.len()..] {
            *b = b'0';
        }
        let id = ObjectId::from_hex(&full).map_err(|_| {
            // locate the offending character for a precise error
            let bad = value
                .char_indices()
                .find(|(_, c)| !c.is_ascii_hexdigit())
                .expect("from_hex failed only because of a non-hex character");
            from_hex::Error::Invalid { c: bad.1, index: bad.0 }
        })?;

        Ok(Prefix { bytes: id, hex_len })
    }

    /// The prefix as a full-width object id; trailing bits beyond `hex_len()` are zero.
    pub fn as_oid(&self) -> &ObjectId {
        &self.bytes
    }

    /// How many hex characters (4-bit granularity) this prefix covers.
    pub fn hex_len(&self) -> usize {
        self.hex_len
    }

    /// Compare this prefix against a candidate full id, looking only at the
    /// prefix's bytes/half-byte.
    pub fn cmp_oid(&self, candidate: &ObjectId) -> Ordering {
        let common_len = self.hex_len / 2;
        self.bytes.as_bytes()[..common_len]
            .cmp(&candidate.as_bytes()[..common_len])
            .then(if self.hex_len % 2 == 1 {
                let half_byte_idx = self.hex_len / 2;
                self.bytes.as_bytes()[half_byte_idx].cmp(&(candidate.as_bytes()[half_byte_idx] & 0xf0))
            } else {
                Ordering::Equal
            })
    }
}

impl std::fmt::Display for Prefix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let hex = self.bytes.to_hex();
        f.write_str(&hex[..self.hex_len])
    }
}

impl TryFrom<&str> for Prefix {
    type Error = from_hex::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Prefix::from_hex(value)
    }
}
