//! Name resolution: turn a user-supplied revision string into an object id,
//! the way `git rev-parse` does.

use std::fs;
use std::path::Path;

use gyatt_hash::ObjectId;
use gyatt_object::{Kind, Object};
use gyatt_odb::Store;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("no object matches revision {0:?}")]
    NotFound(String),
    #[error("revision {name:?} is ambiguous between {candidates:?}")]
    Ambiguous {
        name: String,
        candidates: Vec<ObjectId>,
    },
    #[error(transparent)]
    Odb(#[from] gyatt_odb::Error),
    #[error(transparent)]
    Ref(#[from] gyatt_ref::Error),
}

/// Every candidate object id `name` could plausibly refer to. An empty or
/// whitespace-only name yields no candidates.
pub fn resolve_candidates(gitdir: &Path, name: &str) -> Result<Vec<ObjectId>, Error> {
    if name.trim().is_empty() {
        return Ok(Vec::new());
    }

    if name == "HEAD" {
        return Ok(gyatt_ref::resolve(gitdir, "HEAD")?.into_iter().collect());
    }

    let mut candidates = Vec::new();

    if is_hex_prefix(name) {
        candidates.extend(short_hex_matches(gitdir, name)?);
    }

    for prefix in ["refs/tags/", "refs/heads/", "refs/remotes/"] {
        if let Some(oid) = gyatt_ref::resolve(gitdir, &format!("{prefix}{name}"))? {
            candidates.push(oid);
        }
    }

    Ok(candidates)
}

fn is_hex_prefix(name: &str) -> bool {
    let len = name.len();
    (4..=40).contains(&len) && name.bytes().all(|b| b.is_ascii_hexdigit())
}

fn short_hex_matches(gitdir: &Path, name: &str) -> Result<Vec<ObjectId>, Error> {
    let name = name.to_ascii_lowercase();
    let (dir_prefix, file_prefix) = name.split_at(2);
    let dir = gitdir.join("objects").join(dir_prefix);

    let entries = match fs::read_dir(&dir) {
        Ok(e) => e,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(gyatt_odb::Error::Io(e).into()),
    };

    let mut matches = Vec::new();
    for entry in entries {
        let entry = entry.map_err(gyatt_odb::Error::Io)?;
        let file_name = entry.file_name();
        let file_name = file_name.to_string_lossy();
        if file_name.starts_with(file_prefix) {
            let full_hex = format!("{dir_prefix}{file_name}");
            if let Ok(oid) = ObjectId::from_hex(&full_hex) {
                matches.push(oid);
            }
        }
    }
    Ok(matches)
}

/// Resolve `name` to a single object id, optionally peeling tags/commits
/// down to `expected_kind`.
///
/// `follow = false` stops peeling after one hop even if the result still
/// doesn't match `expected_kind`, so callers that need full peeling chains
/// must pass `follow = true`.
pub fn find(
    gitdir: &Path,
    name: &str,
    expected_kind: Option<Kind>,
    follow: bool,
) -> Result<ObjectId, Error> {
    let candidates = resolve_candidates(gitdir, name)?;
    match candidates.len() {
        0 => Err(Error::NotFound(name.to_string())),
        1 => {
            let oid = candidates[0];
            match expected_kind {
                None => Ok(oid),
                Some(kind) => peel(gitdir, oid, kind, follow),
            }
        }
        _ => Err(Error::Ambiguous {
            name: name.to_string(),
            candidates,
        }),
    }
}

fn peel(gitdir: &Path, oid: ObjectId, expected_kind: Kind, follow: bool) -> Result<ObjectId, Error> {
    let store = Store::at(gitdir.join("objects"));
    let object = store
        .read(&oid)?
        .ok_or_else(|| Error::NotFound(oid.to_hex()))?;

    if object.kind() == expected_kind {
        return Ok(oid);
    }

    let next = match &object {
        Object::Tag(tag) => tag.object().and_then(|s| ObjectId::from_hex(s.as_slice()).ok()),
        Object::Commit(commit) if expected_kind == Kind::Tree => {
            commit.tree().and_then(|s| ObjectId::from_hex(s.as_slice()).ok())
        }
        _ => None,
    };

    match next {
        Some(next_oid) if follow => peel(gitdir, next_oid, expected_kind, follow),
        Some(next_oid) => {
            let next_object = store
                .read(&next_oid)?
                .ok_or_else(|| Error::NotFound(next_oid.to_hex()))?;
            if next_object.kind() == expected_kind {
                Ok(next_oid)
            } else {
                Err(Error::NotFound(oid.to_hex()))
            }
        }
        None => Err(Error::NotFound(oid.to_hex())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gyatt_object::{Commit, Kvlm, Tag};
    use std::fs;

    fn repo() -> (tempfile::TempDir, Store) {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("refs/heads")).unwrap();
        fs::create_dir_all(dir.path().join("refs/tags")).unwrap();
        let store = Store::at(dir.path().join("objects"));
        (dir, store)
    }

    #[test]
    fn empty_name_has_no_candidates() {
        let (dir, _store) = repo();
        assert_eq!(resolve_candidates(dir.path(), "  ").unwrap(), Vec::new());
    }

    #[test]
    fn resolves_head() {
        let (dir, store) = repo();
        let oid = store.write(&Object::Blob(b"x".to_vec()), true).unwrap();
        fs::write(dir.path().join("HEAD"), format!("{oid}\n")).unwrap();
        assert_eq!(resolve_candidates(dir.path(), "HEAD").unwrap(), vec![oid]);
    }

    #[test]
    fn short_hex_prefix_finds_the_loose_object() {
        let (dir, store) = repo();
        let oid = store.write(&Object::Blob(b"hello\n".to_vec()), true).unwrap();
        let hex = oid.to_hex();
        let candidates = resolve_candidates(dir.path(), &hex[..8]).unwrap();
        assert_eq!(candidates, vec![oid]);
    }

    #[test]
    fn ambiguous_short_hex_reports_all_candidates() {
        let (dir, store) = repo();
        let oid1 = store.write(&Object::Blob(b"a".to_vec()), true).unwrap();
        let oid2 = store.write(&Object::Blob(b"b".to_vec()), true).unwrap();
        let shared_prefix_len = oid1
            .to_hex()
            .chars()
            .zip(oid2.to_hex().chars())
            .take_while(|(a, b)| a == b)
            .count();
        if shared_prefix_len < 4 {
            // extremely unlikely for arbitrary test blobs, but guard anyway
            return;
        }
        let prefix = &oid1.to_hex()[..shared_prefix_len.max(4)];
        let err = find(dir.path(), prefix, None, true).unwrap_err();
        assert!(matches!(err, Error::Ambiguous { .. }));
    }

    #[test]
    fn peels_tag_to_commit_to_tree() {
        let (dir, store) = repo();
        let blob = store.write(&Object::Blob(b"hi\n".to_vec()), true).unwrap();
        let mut tree = gyatt_object::Tree::default();
        tree.entries.push(gyatt_object::TreeEntry {
            mode: "100644".into(),
            name: "f".into(),
            target: blob,
        });
        let tree_oid = store.write(&Object::Tree(tree), true).unwrap();

        let mut commit_kvlm = Kvlm::default();
        commit_kvlm.push("tree", tree_oid.to_hex());
        commit_kvlm.message = "msg".into();
        let commit_oid = store
            .write(&Object::Commit(Commit(commit_kvlm)), true)
            .unwrap();

        let mut tag_kvlm = Kvlm::default();
        tag_kvlm.push("object", commit_oid.to_hex());
        tag_kvlm.push("type", "commit");
        tag_kvlm.push("tag", "v1");
        tag_kvlm.message = "release".into();
        let tag_oid = store.write(&Object::Tag(Tag(tag_kvlm)), true).unwrap();

        gyatt_ref::create(dir.path(), "tags/v1", &tag_oid).unwrap();

        let resolved_tree = find(dir.path(), "v1", Some(Kind::Tree), true).unwrap();
        assert_eq!(resolved_tree, tree_oid);
    }

    #[test]
    fn not_found_for_unknown_name() {
        let (dir, _store) = repo();
        assert!(matches!(
            find(dir.path(), "nonexistent", None, true).unwrap_err(),
            Error::NotFound(_)
        ));
    }
}
