use gyatt_object::Kind;
use gyatt_repository::Repository;

use crate::{CommandOutput, Error};

/// Resolve `name` to a single object id, optionally requiring (and peeling
/// towards) a specific `kind`.
pub fn rev_parse(repo: &Repository, kind: Option<Kind>, name: &str) -> Result<CommandOutput, Error> {
    let oid = gyatt_revision::find(repo.gitdir(), name, kind, true)?;
    Ok(CommandOutput::Lines(vec![oid.to_hex()]))
}
