use gyatt_repository::Repository;

use crate::{CommandOutput, Error};

/// Of `paths`, print only the ones the ignore engine considers ignored —
/// matching `git check-ignore`'s default quiet-about-the-rest behavior.
pub fn check_ignore(repo: &Repository, paths: &[String]) -> Result<CommandOutput, Error> {
    let index = repo.read_index()?;
    let ignore = gyatt_repository::load_ignore(repo, &index)?;

    let mut lines = Vec::new();
    for path in paths {
        if ignore.is_ignored(path)? {
            lines.push(path.clone());
        }
    }
    Ok(CommandOutput::Lines(lines))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn reports_only_the_ignored_paths() {
        let dir = tempfile::tempdir().unwrap();
        let repo = Repository::init(dir.path().join("work")).unwrap();
        fs::create_dir_all(repo.gitdir().join("info")).unwrap();
        fs::write(repo.gitdir().join("info").join("exclude"), "*.log\n").unwrap();

        let out = check_ignore(
            &repo,
            &["build.log".to_string(), "main.rs".to_string()],
        )
        .unwrap();
        assert_eq!(out, CommandOutput::Lines(vec!["build.log".to_string()]));
    }
}
