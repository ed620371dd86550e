//! The `<kind> SP <len> NUL <payload>` envelope every loose object is wrapped
//! in before (de)compression. Kept separate from the kind parsers
//! themselves, since the envelope wraps any of the four payload shapes.

use crate::Kind;

/// Prepend the framing header to a serialized payload.
pub fn frame(kind: Kind, payload: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(kind.as_bytes().len() + 1 + 20 + payload.len());
    out.extend_from_slice(kind.as_bytes());
    out.push(b' ');
    out.extend_from_slice(payload.len().to_string().as_bytes());
    out.push(0);
    out.extend_from_slice(payload);
    out
}

/// The error returned by [`split`].
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum Error {
    #[error("object is missing the SP separator between kind and length")]
    MissingSpace,
    #[error("object is missing the NUL separator between length and payload")]
    MissingNul,
    #[error("unknown object kind {0:?}")]
    UnknownKind(String),
    #[error("invalid length {0:?} in object header")]
    InvalidLength(String),
    #[error("declared length {declared} does not match actual payload length {actual}")]
    LengthMismatch { declared: usize, actual: usize },
}

/// Split a framed, already-decompressed object into its kind and payload,
/// validating that the declared length matches reality.
pub fn split(raw: &[u8]) -> Result<(Kind, &[u8]), Error> {
    let space = raw.iter().position(|&b| b == b' ').ok_or(Error::MissingSpace)?;
    let kind = Kind::from_bytes(&raw[..space])
        .ok_or_else(|| Error::UnknownKind(String::from_utf8_lossy(&raw[..space]).into_owned()))?;

    let nul = raw[space..].iter().position(|&b| b == 0).ok_or(Error::MissingNul)? + space;
    let len_str = std::str::from_utf8(&raw[space + 1..nul]).map_err(|_| Error::InvalidLength("<non-utf8>".into()))?;
    let declared: usize = len_str
        .parse()
        .map_err(|_| Error::InvalidLength(len_str.to_string()))?;

    let payload = &raw[nul + 1..];
    if declared != payload.len() {
        return Err(Error::LengthMismatch {
            declared,
            actual: payload.len(),
        });
    }
    Ok((kind, payload))
}
