//! The commands that touch the worktree or create a repository from
//! scratch: `init`, `add`, `rm`, `checkout`.

use std::path::{Path, PathBuf};

use gyatt_repository::Repository;

use crate::{CommandOutput, Error};

pub fn init(path: &Path) -> Result<Repository, Error> {
    Ok(Repository::init(path)?)
}

pub fn add(repo: &Repository, paths: &[PathBuf]) -> Result<CommandOutput, Error> {
    gyatt_repository::add(repo, paths)?;
    Ok(CommandOutput::Lines(Vec::new()))
}

/// Unstage `paths` and remove them from the worktree, matching plain
/// `git rm`'s default of deleting the file along with the index entry.
pub fn rm(repo: &Repository, paths: &[PathBuf]) -> Result<CommandOutput, Error> {
    gyatt_repository::rm(repo, paths, true, false)?;
    Ok(CommandOutput::Lines(Vec::new()))
}

pub fn checkout(repo: &Repository, commit: &str, dest: &Path) -> Result<CommandOutput, Error> {
    gyatt_repository::checkout(repo, commit, dest)?;
    Ok(CommandOutput::Lines(Vec::new()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn init_creates_a_repository_at_the_given_path() {
        let dir = tempfile::tempdir().unwrap();
        let repo_path = dir.path().join("work");
        let repo = init(&repo_path).unwrap();
        assert!(repo.gitdir().join("objects").is_dir());
    }

    #[test]
    fn add_then_rm_round_trips_through_the_index() {
        let dir = tempfile::tempdir().unwrap();
        let repo = init(&dir.path().join("work")).unwrap();
        fs::write(repo.worktree().join("a.txt"), "hi").unwrap();

        add(&repo, &[PathBuf::from("a.txt")]).unwrap();
        assert_eq!(repo.read_index().unwrap().entries.len(), 1);

        rm(&repo, &[PathBuf::from("a.txt")]).unwrap();
        assert!(repo.read_index().unwrap().entries.is_empty());
        assert!(!repo.worktree().join("a.txt").exists());
    }
}
