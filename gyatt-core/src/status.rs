use gyatt_ref::Branch;
use gyatt_repository::Repository;

use crate::{CommandOutput, Error};

/// Render the three independent pieces of `status`: the current branch,
/// the diff between HEAD's tree and the index, and the diff between the
/// index and the actual worktree contents.
pub fn status(repo: &Repository) -> Result<CommandOutput, Error> {
    let index = repo.read_index()?;
    let ignore = gyatt_repository::load_ignore(repo, &index)?;

    let mut lines = Vec::new();
    match gyatt_repository::status_branch(repo)? {
        Some(Branch::Named(name)) => lines.push(format!("On branch {name}.")),
        Some(Branch::Detached(oid)) => lines.push(format!("HEAD detached at {oid}")),
        None => lines.push("No commits yet.".to_string()),
    }

    let head_delta = gyatt_repository::head_vs_index(repo, &index)?;
    lines.push(String::new());
    lines.push("Changes to be committed:".to_string());
    for name in &head_delta.added {
        lines.push(format!("  added:    {name}"));
    }
    for name in &head_delta.modified {
        lines.push(format!("  modified: {name}"));
    }
    for name in &head_delta.deleted {
        lines.push(format!("  deleted:  {name}"));
    }

    let worktree_delta = gyatt_repository::index_vs_worktree(repo, &index, &ignore)?;
    lines.push(String::new());
    lines.push("Changes not staged for commit:".to_string());
    for name in &worktree_delta.modified {
        lines.push(format!("  modified: {name}"));
    }
    for name in &worktree_delta.deleted {
        lines.push(format!("  deleted:  {name}"));
    }

    lines.push(String::new());
    lines.push("Untracked files:".to_string());
    for name in &worktree_delta.untracked {
        lines.push(format!("  {name}"));
    }

    Ok(CommandOutput::Lines(lines))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;

    #[test]
    fn fresh_repository_reports_its_branch_and_no_changes() {
        let dir = tempfile::tempdir().unwrap();
        let repo = Repository::init(dir.path().join("work")).unwrap();

        let CommandOutput::Lines(lines) = status(&repo).unwrap() else {
            panic!("expected lines");
        };
        assert_eq!(lines[0], "On branch master.");
    }

    #[test]
    fn untracked_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let repo = Repository::init(dir.path().join("work")).unwrap();
        fs::write(repo.worktree().join("new.txt"), "hi").unwrap();

        let CommandOutput::Lines(lines) = status(&repo).unwrap() else {
            panic!("expected lines");
        };
        assert!(lines.iter().any(|l| l == "  new.txt"));
    }

    #[test]
    fn staged_addition_shows_up_as_added() {
        let dir = tempfile::tempdir().unwrap();
        let repo = Repository::init(dir.path().join("work")).unwrap();
        fs::write(repo.worktree().join("new.txt"), "hi").unwrap();
        gyatt_repository::add(&repo, &[PathBuf::from("new.txt")]).unwrap();

        let CommandOutput::Lines(lines) = status(&repo).unwrap() else {
            panic!("expected lines");
        };
        assert!(lines.iter().any(|l| l == "  added:    new.txt"));
    }
}
