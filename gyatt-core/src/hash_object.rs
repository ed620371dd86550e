use std::fs;
use std::path::Path;

use gyatt_object::{Kind, Object};
use gyatt_repository::Repository;

use crate::{CommandOutput, Error};

/// Hash a file's raw bytes as the given object `kind`, optionally persisting
/// it into `repo`'s store. Without a repository the object is hashed only
/// (`git hash-object` without `-w`).
pub fn hash_object(path: &Path, kind: Kind, repo: Option<&Repository>) -> Result<CommandOutput, Error> {
    let contents = fs::read(path)?;
    let object = Object::parse(kind, &contents)?;

    let oid = match repo {
        Some(repo) => repo.store().write(&object, true)?,
        None => gyatt_hash::hash(object.serialize_framed()),
    };
    Ok(CommandOutput::Lines(vec![oid.to_hex()]))
}
