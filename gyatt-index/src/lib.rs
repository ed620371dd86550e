//! The binary staging index (`.git/index`, format version 2).

use bstr::BString;

const SIGNATURE: &[u8; 4] = b"DIRC";
const VERSION: u32 = 2;
const FIXED_ENTRY_LEN: usize = 62;
const LONG_NAME_FLAG: u16 = 0xFFF;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum Error {
    #[error("index header is truncated")]
    TruncatedHeader,
    #[error("bad signature {0:?}, expected \"DIRC\"")]
    BadSignature([u8; 4]),
    #[error("unsupported index version {0}, only version 2 is supported")]
    UnsupportedVersion(u32),
    #[error("index entry {index} is truncated")]
    TruncatedEntry { index: usize },
    #[error("index entry {index} has a reserved field that is not zero")]
    ReservedFieldNotZero { index: usize },
    #[error("index entry {index} has an extended flag set, which is not supported")]
    ExtendedFlagSet { index: usize },
    #[error("index entry {index} is missing its NUL name terminator")]
    MissingNameTerminator { index: usize },
}

/// Object type recorded in an entry's mode field: the low 3 of the
/// remaining bits beyond the type nibble are always zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModeType {
    Regular,
    Symlink,
    Gitlink,
}

impl ModeType {
    fn from_nibble(nibble: u16) -> Option<Self> {
        match nibble {
            0b1000 => Some(ModeType::Regular),
            0b1010 => Some(ModeType::Symlink),
            0b1110 => Some(ModeType::Gitlink),
            _ => None,
        }
    }

    fn as_nibble(&self) -> u16 {
        match self {
            ModeType::Regular => 0b1000,
            ModeType::Symlink => 0b1010,
            ModeType::Gitlink => 0b1110,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IndexEntry {
    pub ctime_s: u32,
    pub ctime_n: u32,
    pub mtime_s: u32,
    pub mtime_n: u32,
    pub dev: u32,
    pub ino: u32,
    pub mode_type: ModeType,
    pub mode_perms: u16,
    pub uid: u32,
    pub gid: u32,
    pub file_size: u32,
    pub oid: gyatt_hash::ObjectId,
    pub flag_assume_valid: bool,
    pub flag_stage: u8,
    pub name: BString,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Index {
    pub version: u32,
    /// Entries are kept in whatever order they were appended or read in —
    /// this core does not guarantee name-sorted entries.
    pub entries: Vec<IndexEntry>,
}

impl Default for Index {
    fn default() -> Self {
        Index {
            version: VERSION,
            entries: Vec::new(),
        }
    }
}

impl Index {
    pub fn parse(data: &[u8]) -> Result<Self, Error> {
        if data.len() < 12 {
            return Err(Error::TruncatedHeader);
        }
        let signature: [u8; 4] = data[0..4].try_into().unwrap();
        if &signature != SIGNATURE {
            return Err(Error::BadSignature(signature));
        }
        let version = u32::from_be_bytes(data[4..8].try_into().unwrap());
        if version != VERSION {
            return Err(Error::UnsupportedVersion(version));
        }
        let count = u32::from_be_bytes(data[8..12].try_into().unwrap()) as usize;

        let mut entries = Vec::with_capacity(count);
        let mut cursor = 12usize;
        for index in 0..count {
            let (entry, next) = parse_entry(data, cursor, index)?;
            entries.push(entry);
            cursor = next;
        }

        Ok(Index { version, entries })
    }

    pub fn serialize(&self) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(SIGNATURE);
        out.extend_from_slice(&self.version.to_be_bytes());
        out.extend_from_slice(&(self.entries.len() as u32).to_be_bytes());

        for entry in &self.entries {
            serialize_entry(entry, &mut out);
        }
        out
    }
}

fn parse_entry(data: &[u8], start: usize, index: usize) -> Result<(IndexEntry, usize), Error> {
    let fixed = data
        .get(start..start + FIXED_ENTRY_LEN)
        .ok_or(Error::TruncatedEntry { index })?;

    let be32 = |off: usize| u32::from_be_bytes(fixed[off..off + 4].try_into().unwrap());

    let ctime_s = be32(0);
    let ctime_n = be32(4);
    let mtime_s = be32(8);
    let mtime_n = be32(12);
    let dev = be32(16);
    let ino = be32(20);

    let reserved = u16::from_be_bytes(fixed[24..26].try_into().unwrap());
    if reserved != 0 {
        return Err(Error::ReservedFieldNotZero { index });
    }

    let mode = u16::from_be_bytes(fixed[26..28].try_into().unwrap());
    let mode_type = ModeType::from_nibble(mode >> 12)
        .ok_or(Error::TruncatedEntry { index })?;
    let mode_perms = mode & 0b1_1111_1111;

    let uid = be32(28);
    let gid = be32(32);
    let file_size = be32(36);

    let oid_bytes: [u8; 20] = fixed[40..60].try_into().unwrap();
    let oid = gyatt_hash::ObjectId::from_bytes(oid_bytes);

    let flags = u16::from_be_bytes(fixed[60..62].try_into().unwrap());
    let flag_assume_valid = flags & 0b1000_0000_0000_0000 != 0;
    let flag_extended = flags & 0b0100_0000_0000_0000 != 0;
    if flag_extended {
        return Err(Error::ExtendedFlagSet { index });
    }
    let flag_stage = ((flags & 0b0011_0000_0000_0000) >> 12) as u8;
    let name_length = flags & 0b0000_1111_1111_1111;

    let name_start = start + FIXED_ENTRY_LEN;
    let (name, after_name) = if name_length < LONG_NAME_FLAG {
        let name_length = name_length as usize;
        let name_end = name_start + name_length;
        if data.get(name_end).copied() != Some(0) {
            return Err(Error::MissingNameTerminator { index });
        }
        (
            BString::from(&data[name_start..name_end]),
            name_end + 1,
        )
    } else {
        let scan_from = name_start + LONG_NAME_FLAG as usize;
        let nul = scan_from
            + data
                .get(scan_from..)
                .ok_or(Error::MissingNameTerminator { index })?
                .iter()
                .position(|&b| b == 0)
                .ok_or(Error::MissingNameTerminator { index })?;
        (BString::from(&data[name_start..nul]), nul + 1)
    };

    let written = after_name - start;
    let padded = round_up_to_8(written);
    let next = start + padded;

    Ok((
        IndexEntry {
            ctime_s,
            ctime_n,
            mtime_s,
            mtime_n,
            dev,
            ino,
            mode_type,
            mode_perms,
            uid,
            gid,
            file_size,
            oid,
            flag_assume_valid,
            flag_stage,
            name,
        },
        next,
    ))
}

fn serialize_entry(entry: &IndexEntry, out: &mut Vec<u8>) {
    let start = out.len();

    out.extend_from_slice(&entry.ctime_s.to_be_bytes());
    out.extend_from_slice(&entry.ctime_n.to_be_bytes());
    out.extend_from_slice(&entry.mtime_s.to_be_bytes());
    out.extend_from_slice(&entry.mtime_n.to_be_bytes());
    out.extend_from_slice(&entry.dev.to_be_bytes());
    out.extend_from_slice(&entry.ino.to_be_bytes());
    out.extend_from_slice(&0u16.to_be_bytes()); // reserved

    let mode = (entry.mode_type.as_nibble() << 12) | (entry.mode_perms & 0b1_1111_1111);
    out.extend_from_slice(&mode.to_be_bytes());

    out.extend_from_slice(&entry.uid.to_be_bytes());
    out.extend_from_slice(&entry.gid.to_be_bytes());
    out.extend_from_slice(&entry.file_size.to_be_bytes());
    out.extend_from_slice(entry.oid.as_bytes());

    let name_bytes: &[u8] = &entry.name;
    let name_length = if name_bytes.len() > LONG_NAME_FLAG as usize {
        LONG_NAME_FLAG
    } else {
        name_bytes.len() as u16
    };
    let flags = (if entry.flag_assume_valid { 0b1000_0000_0000_0000 } else { 0 })
        | ((entry.flag_stage as u16) << 12)
        | name_length;
    out.extend_from_slice(&flags.to_be_bytes());

    out.extend_from_slice(name_bytes);
    out.push(0);

    let written = out.len() - start;
    let padded = round_up_to_8(written);
    out.resize(start + padded, 0);
}

fn round_up_to_8(n: usize) -> usize {
    (n + 7) / 8 * 8
}
