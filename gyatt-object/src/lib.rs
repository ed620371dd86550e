//! Object kinds and their wire encodings: blobs, trees, commits, tags.
//!
//! This crate owns the payload shapes and the framing envelope that wraps
//! them — everything between a loose object's raw decompressed bytes and
//! a typed [`Object`]. It does not touch storage;
//! that's [`gyatt_odb`](../gyatt_odb/index.html).

mod blob;
mod commit;
mod framing;
mod kind;
mod kvlm;
mod tag;
mod tree;

pub use commit::Commit;
pub use framing::{frame, split};
pub use kind::Kind;
pub use kvlm::Kvlm;
pub use tag::Tag;
pub use tree::{Entry as TreeEntry, Tree};

/// A fully-typed object payload, the result of parsing the bytes following
/// an object's `<kind> SP <len> NUL` framing header.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Object {
    Blob(Vec<u8>),
    Tree(Tree),
    Commit(Commit),
    Tag(Tag),
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Framing(#[from] framing::Error),
    #[error(transparent)]
    Tree(#[from] tree::Error),
    #[error(transparent)]
    Kvlm(#[from] kvlm::Error),
}

impl Object {
    pub fn kind(&self) -> Kind {
        match self {
            Object::Blob(_) => Kind::Blob,
            Object::Tree(_) => Kind::Tree,
            Object::Commit(_) => Kind::Commit,
            Object::Tag(_) => Kind::Tag,
        }
    }

    /// Parse a payload already separated from its framing header.
    pub fn parse(kind: Kind, payload: &[u8]) -> Result<Self, Error> {
        Ok(match kind {
            Kind::Blob => Object::Blob(blob::parse(payload)),
            Kind::Tree => Object::Tree(Tree::parse(payload)?),
            Kind::Commit => Object::Commit(Commit::parse(payload)?),
            Kind::Tag => Object::Tag(Tag::parse(payload)?),
        })
    }

    /// Parse a complete framed object.
    pub fn parse_framed(raw: &[u8]) -> Result<Self, Error> {
        let (kind, payload) = split(raw)?;
        Self::parse(kind, payload)
    }

    /// Serialize just the payload, without the framing header.
    pub fn serialize_payload(&self) -> Vec<u8> {
        match self {
            Object::Blob(b) => blob::serialize(b),
            Object::Tree(t) => t.serialize(),
            Object::Commit(c) => c.serialize(),
            Object::Tag(t) => t.serialize(),
        }
    }

    /// Serialize with the `<kind> SP <len> NUL` framing header prepended —
    /// the exact bytes that get hashed and zlib-compressed into a loose
    /// object.
    pub fn serialize_framed(&self) -> Vec<u8> {
        frame(self.kind(), &self.serialize_payload())
    }
}
