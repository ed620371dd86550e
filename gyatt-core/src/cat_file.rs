use gyatt_object::Kind;
use gyatt_repository::Repository;

use crate::{CommandOutput, Error};

/// Resolve `name` to an object of the given `kind` and return its payload
/// bytes verbatim, the way `git cat-file -p` does.
pub fn cat_file(repo: &Repository, kind: Kind, name: &str) -> Result<CommandOutput, Error> {
    let oid = gyatt_revision::find(repo.gitdir(), name, Some(kind), true)?;
    let object = repo.store().read(&oid)?.ok_or(Error::ObjectNotFound(oid))?;
    Ok(CommandOutput::Raw(object.serialize_payload()))
}
