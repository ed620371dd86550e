use bstr::BString;
use gyatt_hash::ObjectId;
use gyatt_object::{Kind, Object};
use gyatt_repository::Repository;

use crate::{CommandOutput, Error};

/// List the contents of `treeish`, one line per entry, in the `<mode> SP
/// <type> SP <oid> TAB <path>` shape `git ls-tree` uses. `recursive` expands
/// subtrees in place instead of listing them as a single `tree` entry.
pub fn ls_tree(repo: &Repository, treeish: &str, recursive: bool) -> Result<CommandOutput, Error> {
    let tree_oid = gyatt_revision::find(repo.gitdir(), treeish, Some(Kind::Tree), true)?;
    let mut lines = Vec::new();
    walk(repo, tree_oid, recursive, "", &mut lines)?;
    Ok(CommandOutput::Lines(lines))
}

fn walk(
    repo: &Repository,
    tree_oid: ObjectId,
    recursive: bool,
    prefix: &str,
    lines: &mut Vec<String>,
) -> Result<(), Error> {
    let object = repo.store().read(&tree_oid)?.ok_or(Error::ObjectNotFound(tree_oid))?;
    let found_kind = object.kind();
    let Object::Tree(tree) = object else {
        return Err(Error::UnexpectedKind { expected: Kind::Tree, found: found_kind });
    };

    for entry in &tree.entries {
        let padded_mode = zero_padded_mode(&entry.mode);
        let leaf_type = leaf_type_label(&padded_mode)?;
        let display_path = if prefix.is_empty() {
            entry.name.to_string()
        } else {
            format!("{prefix}/{}", entry.name)
        };

        if recursive && leaf_type == "tree" {
            walk(repo, entry.target, recursive, &display_path, lines)?;
        } else {
            lines.push(format!(
                "{padded_mode} {leaf_type} {}\t{display_path}",
                entry.target
            ));
        }
    }
    Ok(())
}

fn zero_padded_mode(mode: &BString) -> String {
    let bytes: &[u8] = mode;
    let trimmed = if bytes.first() == Some(&b' ') { &bytes[1..] } else { bytes };
    format!("{:0>6}", String::from_utf8_lossy(trimmed))
}

fn leaf_type_label(padded_mode: &str) -> Result<&'static str, Error> {
    match &padded_mode[..2] {
        "04" => Ok("tree"),
        "10" | "12" => Ok("blob"),
        "16" => Ok("commit"),
        other => Err(Error::UnknownTreeMode(other.to_string())),
    }
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
    fn lists_top_level_entries_without_descending_by_default() {
        let (_dir, repo) = init_repo();
        let store = repo.store();
        let blob = store.write(&Object::Blob(b"hi\n".to_vec()), true).unwrap();

        let mut inner = Tree::default();
        inner.entries.push(TreeEntry { mode: "100644".into(), name: "b.txt".into(), target: blob });
        let inner_oid = store.write(&Object::Tree(inner), true).unwrap();

        let mut root = Tree::default();
        root.entries.push(TreeEntry { mode: "100644".into(), name: "a.txt".into(), target: blob });
        root.entries.push(TreeEntry { mode: "040000".into(), name: "sub".into(), target: inner_oid });
        let root_oid = store.write(&Object::Tree(root), true).unwrap();

        let mut kvlm = Kvlm::default();
        kvlm.push("tree", root_oid.to_hex());
        kvlm.message = "m".into();
        let commit_oid = store.write(&Object::Commit(Commit(kvlm)), true).unwrap();
        gyatt_ref::create(repo.gitdir(), "heads/master", &commit_oid).unwrap();

        let CommandOutput::Lines(lines) = ls_tree(&repo, "HEAD", false).unwrap() else {
            panic!("expected lines");
        };
        assert_eq!(lines.len(), 2);
        assert!(lines.iter().any(|l| l.starts_with("100644 blob") && l.ends_with("a.txt")));
        assert!(lines.iter().any(|l| l.starts_with("040000 tree") && l.ends_with("sub")));
    }

    #[test]
    fn recursive_expands_subtrees() {
        let (_dir, repo) = init_repo();
        let store = repo.store();
        let blob = store.write(&Object::Blob(b"hi\n".to_vec()), true).unwrap();

        let mut inner = Tree::default();
        inner.entries.push(TreeEntry { mode: "100644".into(), name: "b.txt".into(), target: blob });
        let inner_oid = store.write(&Object::Tree(inner), true).unwrap();

        let mut root = Tree::default();
        root.entries.push(TreeEntry { mode: "040000".into(), name: "sub".into(), target: inner_oid });
        let root_oid = store.write(&Object::Tree(root), true).unwrap();

        let mut kvlm = Kvlm::default();
        kvlm.push("tree", root_oid.to_hex());
        kvlm.message = "m".into();
        let commit_oid = store.write(&Object::Commit(Commit(kvlm)), true).unwrap();
        gyatt_ref::create(repo.gitdir(), "heads/master", &commit_oid).unwrap();

        let CommandOutput::Lines(lines) = ls_tree(&repo, "HEAD", true).unwrap() else {
            panic!("expected lines");
        };
        assert_eq!(lines.len(), 1);
        assert!(lines[0].ends_with("sub/b.txt"));
    }
}
