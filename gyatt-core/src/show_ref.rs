use gyatt_ref::RefTree;
use gyatt_repository::Repository;

use crate::{CommandOutput, Error};

/// List every resolved ref under `refs/`, one `<oid> SP <path>` line each,
/// sorted the way the underlying directory walk already sorts siblings.
pub fn show_ref(repo: &Repository) -> Result<CommandOutput, Error> {
    let tree = gyatt_ref::list(repo.gitdir(), "refs")?;
    let mut lines = Vec::new();
    collect(&tree, "refs", &mut lines);
    Ok(CommandOutput::Lines(lines))
}

fn collect(node: &RefTree, prefix: &str, lines: &mut Vec<String>) {
    match node {
        RefTree::Leaf(oid) => lines.push(format!("{oid} {prefix}")),
        RefTree::Node(children) => {
            for (name, child) in children {
                collect(child, &format!("{prefix}/{name}"), lines);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_refs_with_their_full_path() {
        let dir = tempfile::tempdir().unwrap();
        let repo = Repository::init(dir.path().join("work")).unwrap();
        let oid = gyatt_hash::hash(b"blob 2\x00hi");
        gyatt_ref::create(repo.gitdir(), "heads/master", &oid).unwrap();
        gyatt_ref::create(repo.gitdir(), "tags/v1", &oid).unwrap();

        let CommandOutput::Lines(lines) = show_ref(&repo).unwrap() else {
            panic!("expected lines");
        };
        assert!(lines.contains(&format!("{oid} refs/heads/master")));
        assert!(lines.contains(&format!("{oid} refs/tags/v1")));
    }
}
