use std::collections::HashSet;

use gyatt_hash::ObjectId;
use gyatt_object::{Kind, Object};
use gyatt_repository::Repository;

use crate::{CommandOutput, Error};

/// Render the commit ancestry reachable from `start` as a Graphviz digraph,
/// visiting each commit (and each merge edge) at most once.
pub fn log(repo: &Repository, start: &str) -> Result<CommandOutput, Error> {
    let start_oid = gyatt_revision::find(repo.gitdir(), start, Some(Kind::Commit), true)?;

    let mut lines = vec!["digraph gyattlog{".to_string(), "  node[shape=rect]".to_string()];
    let mut seen = HashSet::new();
    walk(repo, start_oid, &mut seen, &mut lines)?;
    lines.push("}".to_string());
    Ok(CommandOutput::Lines(lines))
}

fn walk(repo: &Repository, oid: ObjectId, seen: &mut HashSet<ObjectId>, lines: &mut Vec<String>) -> Result<(), Error> {
    if !seen.insert(oid) {
        return Ok(());
    }

    let object = repo.store().read(&oid)?.ok_or(Error::ObjectNotFound(oid))?;
    let found_kind = object.kind();
    let Object::Commit(commit) = object else {
        return Err(Error::UnexpectedKind { expected: Kind::Commit, found: found_kind });
    };

    let short = &oid.to_hex()[..8];
    let message = commit.message().to_string();
    let first_line = message.split('\n').next().unwrap_or("");
    let label = first_line.replace('\\', "\\\\").replace('"', "\\\"");
    lines.push(format!("  c_{oid} [label=\"{short}: {label}\"]"));

    for parent in commit.parents() {
        lines.push(format!("  c_{oid} -> c_{parent}"));
        if let Ok(parent_oid) = ObjectId::from_hex(parent.as_slice()) {
            walk(repo, parent_oid, seen, lines)?;
        }
    }
    Ok(())
}
