//! `checkout`: materialize a tree into an empty destination directory.
//! A direct structural consequence of the tree flattener plus the object
//! store — no merge, no working-tree diffing, just a recursive write.

use std::fs;
use std::path::Path;

use gyatt_hash::ObjectId;
use gyatt_object::{Kind, Object};

use crate::{Error, Repository};

/// Peel `treeish` to a tree and write its contents under `dest`, which must
/// not exist or must be an empty directory.
pub fn checkout(repo: &Repository, treeish: &str, dest: &Path) -> Result<(), Error> {
    if dest.exists() {
        if !dest.is_dir() {
            return Err(Error::NotADirectory(dest.to_path_buf()));
        }
        if fs::read_dir(dest)?.next().is_some() {
            return Err(Error::NotEmpty(dest.to_path_buf()));
        }
    } else {
        fs::create_dir_all(dest)?;
    }

    let tree_oid = gyatt_revision::find(repo.gitdir(), treeish, Some(Kind::Tree), true)?;
    write_tree(repo, tree_oid, dest)
}

fn write_tree(repo: &Repository, tree_oid: ObjectId, dest: &Path) -> Result<(), Error> {
    let store = repo.store();
    let object = store
        .read(&tree_oid)?
        .ok_or(Error::Odb(gyatt_odb::Error::NotFound(tree_oid)))?;
    let Object::Tree(tree) = object else {
        return Err(Error::Odb(gyatt_odb::Error::NotFound(tree_oid)));
    };

    for entry in &tree.entries {
        let target_path = dest.join(entry.name.to_string());

        if is_tree_mode(&entry.mode) {
            fs::create_dir_all(&target_path)?;
            write_tree(repo, entry.target, &target_path)?;
        } else if is_gitlink_mode(&entry.mode) {
            continue;
        } else {
            let blob = store
                .read(&entry.target)?
                .ok_or(Error::Odb(gyatt_odb::Error::NotFound(entry.target)))?;
            let Object::Blob(contents) = blob else {
                return Err(Error::Odb(gyatt_odb::Error::NotFound(entry.target)));
            };
            fs::write(&target_path, contents)?;
        }
    }
    Ok(())
}

fn is_tree_mode(mode: &[u8]) -> bool {
    mode.starts_with(b" 04") || mode.starts_with(b"04")
}

fn is_gitlink_mode(mode: &[u8]) -> bool {
    mode.starts_with(b" 16") || mode.starts_with(b"16")
}

#[cfg(test)]
mod tests {
    use super::*;
    use gyatt_object::{Commit, Kvlm, Tree, TreeEntry};

    fn init_repo() -> (tempfile::TempDir, Repository) {
        let dir = tempfile::tempdir().unwrap();
        let repo = Repository::init(dir.path().join("work")).unwrap();
        (dir, repo)
    }

    #[test]
    fn checks_out_nested_blobs_into_an_empty_directory() {
        let (scratch, repo) = init_repo();
        let store = repo.store();

        let blob = store.write(&Object::Blob(b"X".to_vec()), true).unwrap();
        let mut inner = Tree::default();
        inner.entries.push(TreeEntry {
            mode: "100644".into(),
            name: "b.txt".into(),
            target: blob,
        });
        let inner_oid = store.write(&Object::Tree(inner), true).unwrap();

        let mut root = Tree::default();
        root.entries.push(TreeEntry {
            mode: "040000".into(),
            name: "a".into(),
            target: inner_oid,
        });
        let root_oid = store.write(&Object::Tree(root), true).unwrap();

        let mut kvlm = Kvlm::default();
        kvlm.push("tree", root_oid.to_hex());
        kvlm.message = "m".into();
        let commit_oid = store.write(&Object::Commit(Commit(kvlm)), true).unwrap();
        gyatt_ref::create(repo.gitdir(), "heads/master", &commit_oid).unwrap();

        let dest = scratch.path().join("checkout_dest");
        checkout(&repo, "HEAD", &dest).unwrap();

        assert_eq!(fs::read_to_string(dest.join("a/b.txt")).unwrap(), "X");
    }

    /// The subtree entry uses the 5-byte mode (`"40000"`) real git writes
    /// for a directory, so `write_tree` sees the normalized, space-padded
    /// mode `Tree::parse()` actually produces rather than a hand-typed
    /// six-byte literal.
    #[test]
    fn checks_out_a_subtree_read_back_through_the_real_parser() {
        let (scratch, repo) = init_repo();
        let store = repo.store();

        let blob = store.write(&Object::Blob(b"X".to_vec()), true).unwrap();
        let mut inner = Tree::default();
        inner.entries.push(TreeEntry {
            mode: "100644".into(),
            name: "b.txt".into(),
            target: blob,
        });
        let inner_oid = store.write(&Object::Tree(inner), true).unwrap();

        let mut root = Tree::default();
        root.entries.push(TreeEntry {
            mode: "40000".into(),
            name: "a".into(),
            target: inner_oid,
        });
        let root_oid = store.write(&Object::Tree(root), true).unwrap();

        let mut kvlm = Kvlm::default();
        kvlm.push("tree", root_oid.to_hex());
        kvlm.message = "m".into();
        let commit_oid = store.write(&Object::Commit(Commit(kvlm)), true).unwrap();
        gyatt_ref::create(repo.gitdir(), "heads/master", &commit_oid).unwrap();

        let dest = scratch.path().join("checkout_dest");
        checkout(&repo, "HEAD", &dest).unwrap();

        assert_eq!(fs::read_to_string(dest.join("a/b.txt")).unwrap(), "X");
    }

    #[test]
    fn rejects_a_non_empty_destination() {
        let (scratch, repo) = init_repo();
        let dest = scratch.path().join("occupied");
        fs::create_dir_all(&dest).unwrap();
        fs::write(dest.join("already-here.txt"), "x").unwrap();

        assert!(matches!(
            checkout(&repo, "HEAD", &dest).unwrap_err(),
            Error::NotEmpty(_)
        ));
    }

    #[test]
    fn rejects_a_destination_that_is_a_file() {
        let (scratch, repo) = init_repo();
        let dest = scratch.path().join("not-a-dir");
        fs::write(&dest, "x").unwrap();

        assert!(matches!(
            checkout(&repo, "HEAD", &dest).unwrap_err(),
            Error::NotADirectory(_)
        ));
    }
}
