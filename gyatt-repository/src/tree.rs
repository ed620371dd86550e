use std::collections::BTreeMap;

use bstr::BString;
use gyatt_hash::ObjectId;
use gyatt_object::{Kind, Object};

use crate::{Error, Repository};

/// Peel `treeish` to a tree and recursively flatten it into a
/// `relative-path -> oid` map, skipping gitlink (submodule) entries.
pub fn flatten_tree(repo: &Repository, treeish: &str) -> Result<BTreeMap<BString, ObjectId>, Error> {
    let tree_oid = gyatt_revision::find(repo.gitdir(), treeish, Some(Kind::Tree), true)?;
    let mut map = BTreeMap::new();
    walk(repo, tree_oid, "", &mut map)?;
    Ok(map)
}

fn walk(
    repo: &Repository,
    tree_oid: ObjectId,
    prefix: &str,
    out: &mut BTreeMap<BString, ObjectId>,
) -> Result<(), Error> {
    let store = repo.store();
    let object = store
        .read(&tree_oid)?
        .ok_or_else(|| Error::Odb(gyatt_odb::Error::NotFound(tree_oid)))?;
    let Object::Tree(tree) = object else {
        return Err(Error::Odb(gyatt_odb::Error::NotFound(tree_oid)));
    };

    for entry in &tree.entries {
        let name = entry.name.to_string();
        let path = if prefix.is_empty() {
            name
        } else {
            format!("{prefix}/{name}")
        };

        if entry.mode.starts_with(b" 04") || entry.mode.starts_with(b"04") {
            walk(repo, entry.target, &path, out)?;
        } else if entry.mode.starts_with(b" 16") || entry.mode.starts_with(b"16") {
            // gitlink (submodule): not flattened into the tree.
            continue;
        } else {
            out.insert(path.into(), entry.target);
        }
    }
    Ok(())
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
    fn flattens_nested_tree_skipping_gitlinks() {
        let (_dir, repo) = init_repo();
        let store = repo.store();

        let blob = store.write(&Object::Blob(b"hi\n".to_vec()), true).unwrap();

        let mut inner = Tree::default();
        inner.entries.push(TreeEntry {
            mode: "100644".into(),
            name: "b.txt".into(),
            target: blob,
        });
        let inner_oid = store.write(&Object::Tree(inner), true).unwrap();

        let mut root = Tree::default();
        root.entries.push(TreeEntry {
            mode: "100644".into(),
            name: "a.txt".into(),
            target: blob,
        });
        root.entries.push(TreeEntry {
            mode: "040000".into(),
            name: "sub".into(),
            target: inner_oid,
        });
        root.entries.push(TreeEntry {
            mode: "160000".into(),
            name: "submod".into(),
            target: blob,
        });
        let root_oid = store.write(&Object::Tree(root), true).unwrap();

        let mut kvlm = Kvlm::default();
        kvlm.push("tree", root_oid.to_hex());
        kvlm.message = "msg".into();
        let commit_oid = store.write(&Object::Commit(Commit(kvlm)), true).unwrap();
        gyatt_ref::create(repo.gitdir(), "heads/master", &commit_oid).unwrap();

        let flattened = flatten_tree(&repo, "HEAD").unwrap();
        assert_eq!(flattened.len(), 2);
        assert_eq!(flattened.get(&BString::from("a.txt")), Some(&blob));
        assert_eq!(flattened.get(&BString::from("sub/b.txt")), Some(&blob));
        assert!(!flattened.contains_key(&BString::from("submod")));
    }

    /// Builds the subtree entry with the 5-byte mode (`"40000"`) real git
    /// writes for a directory, so the tree that comes back out of the store
    /// went through `Tree::parse()`'s five-to-six-byte normalization, not a
    /// hand-typed `"040000"` literal that happens to already be six bytes
    /// wide.
    #[test]
    fn recurses_into_a_subtree_read_back_through_the_real_parser() {
        let (_dir, repo) = init_repo();
        let store = repo.store();

        let blob = store.write(&Object::Blob(b"hi\n".to_vec()), true).unwrap();

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
            name: "sub".into(),
            target: inner_oid,
        });
        let root_oid = store.write(&Object::Tree(root), true).unwrap();
        let reparsed_root = store.read(&root_oid).unwrap().unwrap();
        let Object::Tree(reparsed_root) = reparsed_root else { panic!("expected tree") };
        assert_eq!(reparsed_root.entries[0].mode, BString::from(" 40000"));

        let mut kvlm = Kvlm::default();
        kvlm.push("tree", root_oid.to_hex());
        kvlm.message = "msg".into();
        let commit_oid = store.write(&Object::Commit(Commit(kvlm)), true).unwrap();
        gyatt_ref::create(repo.gitdir(), "heads/master", &commit_oid).unwrap();

        let flattened = flatten_tree(&repo, "HEAD").unwrap();
        assert_eq!(flattened.get(&BString::from("sub/b.txt")), Some(&blob));
    }
}
