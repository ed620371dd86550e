//! Tree objects: ordered `(mode, name, target)` entries.

use bstr::{BString, ByteSlice};
use gyatt_hash::ObjectId;

/// A single tree entry. `mode` is stored as its ASCII bytes, always
/// normalized to 6 characters wide (a leading space is inserted for the
/// 5-byte modes real git uses for regular files, e.g. `100644`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Entry {
    pub mode: BString,
    pub name: BString,
    pub target: ObjectId,
}

impl Entry {
    /// True if this entry's mode marks it as a (non-symlink, non-gitlink)
    /// blob — mode starting with `"10"`, used as the sort key below.
    pub fn is_blob_like(&self) -> bool {
        self.mode.starts_with(b"10")
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum Error {
    #[error("tree entry at byte {at} has a mode of invalid width (expected 5 or 6 bytes)")]
    BadModeWidth { at: usize },
    #[error("tree entry at byte {at} is missing its NUL name terminator")]
    MissingNul { at: usize },
    #[error("tree entry at byte {at} is truncated: expected 20 more bytes for the object id")]
    TruncatedOid { at: usize },
    #[error("tree has duplicate entry name {name:?}")]
    DuplicateName { name: BString },
}

/// A tree's full (unsorted at parse time) list of entries.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct Tree {
    pub entries: Vec<Entry>,
}

impl Tree {
    pub fn parse(data: &[u8]) -> Result<Self, Error> {
        let mut entries = Vec::new();
        let mut cursor = 0usize;
        while cursor < data.len() {
            let space = data[cursor..]
                .find_byte(b' ')
                .map(|p| p + cursor)
                .ok_or(Error::BadModeWidth { at: cursor })?;
            let mode_width = space - cursor;
            if mode_width != 5 && mode_width != 6 {
                return Err(Error::BadModeWidth { at: cursor });
            }
            let mut mode: BString = data[cursor..space].into();
            if mode_width == 5 {
                mode.insert(0, b' ');
            }

            let nul = data[space + 1..]
                .find_byte(0)
                .map(|p| p + space + 1)
                .ok_or(Error::MissingNul { at: cursor })?;
            let name: BString = data[space + 1..nul].into();

            let oid_start = nul + 1;
            let oid_bytes: [u8; 20] = data
                .get(oid_start..oid_start + 20)
                .ok_or(Error::TruncatedOid { at: cursor })?
                .try_into()
                .expect("slice is exactly 20 bytes");
            let target = ObjectId::from_bytes(oid_bytes);

            entries.push(Entry { mode, name, target });
            cursor = oid_start + 20;
        }

        check_no_duplicates(&entries)?;
        Ok(Tree { entries })
    }

    /// Serialize, canonicalizing entry order first: directories sort as if
    /// suffixed with `/`, so tree OIDs are stable regardless of the order
    /// `entries` was built in.
    pub fn serialize(&self) -> Vec<u8> {
        let mut sorted = self.entries.clone();
        sorted.sort_by(|a, b| sort_key(a).cmp(&sort_key(b)));

        let mut out = Vec::new();
        for entry in &sorted {
            out.extend_from_slice(&entry.mode);
            out.push(b' ');
            out.extend_from_slice(&entry.name);
            out.push(0);
            out.extend_from_slice(entry.target.as_bytes());
        }
        out
    }
}

fn sort_key(entry: &Entry) -> BString {
    if entry.is_blob_like() {
        entry.name.clone()
    } else {
        let mut key = entry.name.clone();
        key.push(b'/');
        key
    }
}

fn check_no_duplicates(entries: &[Entry]) -> Result<(), Error> {
    let mut names: Vec<&BString> = entries.iter().map(|e| &e.name).collect();
    names.sort();
    if let Some(w) = names.windows(2).find(|w| w[0] == w[1]) {
        return Err(Error::DuplicateName { name: w[0].clone() });
    }
    Ok(())
}
