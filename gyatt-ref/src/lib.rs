//! Text references: files under `.git` whose contents are either a raw
//! 40-hex object id or a `ref: <other-ref>` indirection.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use gyatt_hash::ObjectId;

const MAX_SYMBOLIC_DEPTH: usize = 10;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("symbolic ref chain exceeded {MAX_SYMBOLIC_DEPTH} hops starting at {0:?}")]
    CyclicSymbolicRef(String),
    #[error("ref {0:?} does not contain a valid object id or ref: indirection")]
    Malformed(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Hash(#[from] gyatt_hash::DecodeError),
}

/// Read `<gitdir>/<name>` and follow `ref: ` indirections to a raw object id.
///
/// Returns `Ok(None)` when the named ref file doesn't exist — a missing ref
/// is not an error, it's an unset ref (e.g. `HEAD` on a brand new branch
/// with no commits yet).
pub fn resolve(gitdir: &Path, name: &str) -> Result<Option<ObjectId>, Error> {
    let mut current = name.to_string();
    for _ in 0..MAX_SYMBOLIC_DEPTH {
        let path = gitdir.join(&current);
        let contents = match fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let trimmed = contents.trim_end_matches('\n');
        if let Some(target) = trimmed.strip_prefix("ref: ") {
            current = target.to_string();
            continue;
        }
        return Ok(Some(ObjectId::from_hex(trimmed)?));
    }
    Err(Error::CyclicSymbolicRef(name.to_string()))
}

/// A node in the ordered tree produced by [`list`]: either a resolved ref,
/// or a subdirectory of further refs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RefTree {
    Leaf(ObjectId),
    Node(BTreeMap<String, RefTree>),
}

/// Recursively walk `<gitdir>/<path>`, resolving every leaf file and sorting
/// siblings by name.
pub fn list(gitdir: &Path, path: &str) -> Result<RefTree, Error> {
    list_dir(gitdir, Path::new(path))
}

fn list_dir(gitdir: &Path, relative: &Path) -> Result<RefTree, Error> {
    let full = gitdir.join(relative);
    let mut children = BTreeMap::new();

    let mut entries: Vec<_> = fs::read_dir(&full)?.collect::<Result<_, _>>()?;
    entries.sort_by_key(|e| e.file_name());

    for entry in entries {
        let name = entry.file_name().to_string_lossy().into_owned();
        let child_relative = relative.join(&name);
        let file_type = entry.file_type()?;
        let node = if file_type.is_dir() {
            list_dir(gitdir, &child_relative)?
        } else {
            let relative_str = child_relative.to_string_lossy().replace('\\', "/");
            match resolve(gitdir, &relative_str)? {
                Some(oid) => RefTree::Leaf(oid),
                None => continue,
            }
        };
        children.insert(name, node);
    }
    Ok(RefTree::Node(children))
}

/// Atomically write `<oid>\n` to `<gitdir>/refs/<relative_name>`.
pub fn create(gitdir: &Path, relative_name: &str, oid: &ObjectId) -> Result<(), Error> {
    let path = gitdir.join("refs").join(relative_name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let tmp = path.with_extension("tmp");
    fs::write(&tmp, format!("{oid}\n"))?;
    fs::rename(&tmp, &path)?;
    Ok(())
}

/// What `HEAD` currently points at (SUPPLEMENT factoring out the
/// `HEAD`-sniffing logic the status engine and `cmd_status_branch`
/// independently needed).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Branch {
    Named(String),
    Detached(ObjectId),
}

pub fn current_branch(gitdir: &Path) -> Result<Option<Branch>, Error> {
    let head_path = gitdir.join("HEAD");
    let contents = match fs::read_to_string(&head_path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    let trimmed = contents.trim_end_matches('\n');
    if let Some(target) = trimmed.strip_prefix("ref: ") {
        let name = target
            .strip_prefix("refs/heads/")
            .unwrap_or(target)
            .to_string();
        return Ok(Some(Branch::Named(name)));
    }
    let oid = ObjectId::from_hex(trimmed)?;
    Ok(Some(Branch::Detached(oid)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn init_gitdir() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("refs/heads")).unwrap();
        fs::create_dir_all(dir.path().join("refs/tags")).unwrap();
        dir
    }

    #[test]
    fn resolve_missing_ref_is_none() {
        let dir = init_gitdir();
        assert_eq!(resolve(dir.path(), "refs/heads/missing").unwrap(), None);
    }

    #[test]
    fn resolve_direct_oid() {
        let dir = init_gitdir();
        let oid = gyatt_hash::hash(b"blob 6\x00hello\n");
        create(dir.path(), "heads/main", &oid).unwrap();
        assert_eq!(resolve(dir.path(), "refs/heads/main").unwrap(), Some(oid));
    }

    #[test]
    fn resolve_follows_symbolic_chain() {
        let dir = init_gitdir();
        let oid = gyatt_hash::hash(b"blob 6\x00hello\n");
        create(dir.path(), "heads/main", &oid).unwrap();
        fs::write(dir.path().join("HEAD"), "ref: refs/heads/main\n").unwrap();
        assert_eq!(resolve(dir.path(), "HEAD").unwrap(), Some(oid));
    }

    #[test]
    fn resolve_detects_cycles() {
        let dir = init_gitdir();
        fs::write(dir.path().join("HEAD"), "ref: HEAD\n").unwrap();
        assert!(matches!(
            resolve(dir.path(), "HEAD").unwrap_err(),
            Error::CyclicSymbolicRef(_)
        ));
    }

    #[test]
    fn list_produces_sorted_nested_tree() {
        let dir = init_gitdir();
        let oid_a = gyatt_hash::hash(b"a");
        let oid_b = gyatt_hash::hash(b"b");
        create(dir.path(), "heads/a", &oid_a).unwrap();
        create(dir.path(), "heads/b", &oid_b).unwrap();

        let tree = list(dir.path(), "refs").unwrap();
        let RefTree::Node(refs) = tree else { panic!("expected node") };
        let RefTree::Node(heads) = refs.get("heads").unwrap() else { panic!("expected node") };
        assert_eq!(heads.get("a"), Some(&RefTree::Leaf(oid_a)));
        assert_eq!(heads.get("b"), Some(&RefTree::Leaf(oid_b)));
        assert_eq!(heads.keys().collect::<Vec<_>>(), vec!["a", "b"]);
    }

    #[test]
    fn current_branch_reports_named_branch() {
        let dir = init_gitdir();
        fs::write(dir.path().join("HEAD"), "ref: refs/heads/main\n").unwrap();
        assert_eq!(
            current_branch(dir.path()).unwrap(),
            Some(Branch::Named("main".to_string()))
        );
    }

    #[test]
    fn current_branch_reports_detached_head() {
        let dir = init_gitdir();
        let oid = gyatt_hash::hash(b"a");
        fs::write(dir.path().join("HEAD"), format!("{oid}\n")).unwrap();
        assert_eq!(current_branch(dir.path()).unwrap(), Some(Branch::Detached(oid)));
    }
}
