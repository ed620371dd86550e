use std::fmt;

/// The four object kinds this core understands.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum Kind {
    Blob,
    Tree,
    Commit,
    Tag,
}

impl Kind {
    /// The ASCII tag used in the `<kind> SP <len> NUL` framing header.
    pub fn as_bytes(&self) -> &'static [u8] {
        match self {
            Kind::Blob => b"blob",
            Kind::Tree => b"tree",
            Kind::Commit => b"commit",
            Kind::Tag => b"tag",
        }
    }

    /// Parse the ASCII tag from a framing header.
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        match bytes {
            b"blob" => Some(Kind::Blob),
            b"tree" => Some(Kind::Tree),
            b"commit" => Some(Kind::Commit),
            b"tag" => Some(Kind::Tag),
            _ => None,
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Kind::Blob => "blob",
            Kind::Tree => "tree",
            Kind::Commit => "commit",
            Kind::Tag => "tag",
        })
    }
}
