//! The loose object store: sharded, zlib-compressed, content-addressed
//! files under `.git/objects`.

use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use gyatt_hash::ObjectId;
use gyatt_object::Object;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("object {0} not found in the store")]
    NotFound(ObjectId),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Object(#[from] gyatt_object::Error),
}

/// A content-addressed store rooted at a repository's `objects` directory.
pub struct Store {
    objects_dir: PathBuf,
}

impl Store {
    /// `objects_dir` is the `.git/objects` directory itself (not its parent).
    pub fn at(objects_dir: impl Into<PathBuf>) -> Self {
        Store {
            objects_dir: objects_dir.into(),
        }
    }

    fn loose_path(&self, id: &ObjectId) -> PathBuf {
        let hex = id.to_hex();
        self.objects_dir.join(&hex[..2]).join(&hex[2..])
    }

    /// Cheap existence check: a path stat, no decompression.
    pub fn exists(&self, id: &ObjectId) -> bool {
        self.loose_path(id).is_file()
    }

    /// Read and fully parse an object, or `None` if it isn't present.
    pub fn read(&self, id: &ObjectId) -> Result<Option<Object>, Error> {
        let path = self.loose_path(id);
        let compressed = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let mut raw = Vec::new();
        ZlibDecoder::new(&compressed[..]).read_to_end(&mut raw)?;
        Ok(Some(Object::parse_framed(&raw)?))
    }

    /// Read a raw framed object's bytes without parsing, used by
    /// `cat_file -p`/`-t` style commands that only need to re-emit them.
    pub fn read_raw(&self, id: &ObjectId) -> Result<Option<Vec<u8>>, Error> {
        let path = self.loose_path(id);
        let compressed = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let mut raw = Vec::new();
        ZlibDecoder::new(&compressed[..]).read_to_end(&mut raw)?;
        Ok(Some(raw))
    }

    /// Hash an object and, when `persist` is true, write it to disk.
    /// Hashing without a store is just [`gyatt_hash::hash`] on the framed
    /// bytes, so that path needs no method here at all.
    pub fn write(&self, object: &Object, persist: bool) -> Result<ObjectId, Error> {
        let framed = object.serialize_framed();
        let id = gyatt_hash::hash(&framed);
        if persist {
            self.write_framed(&id, &framed)?;
        }
        Ok(id)
    }

    fn write_framed(&self, id: &ObjectId, framed: &[u8]) -> Result<(), Error> {
        if self.exists(id) {
            // Objects are immutable and content-addressed: an existing file
            // at this path is guaranteed byte-identical, so there's nothing
            // to do.
            return Ok(());
        }
        let path = self.loose_path(id);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(framed)?;
        let compressed = encoder.finish()?;

        let tmp_path = path.with_extension("tmp");
        fs::write(&tmp_path, &compressed)?;
        fs::rename(&tmp_path, &path)?;
        Ok(())
    }
}

/// Initialize an empty `objects` directory layout.
pub fn init_objects_dir(objects_dir: &Path) -> Result<(), Error> {
    fs::create_dir_all(objects_dir.join("pack"))?;
    fs::create_dir_all(objects_dir.join("info"))?;
    Ok(())
}
