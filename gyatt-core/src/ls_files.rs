use gyatt_index::ModeType;
use gyatt_repository::Repository;

use crate::{CommandOutput, Error};

/// List the paths currently staged in the index. `verbose` additionally
/// prints each entry's stat metadata, mirroring `git ls-files --debug`.
pub fn ls_files(repo: &Repository, verbose: bool) -> Result<CommandOutput, Error> {
    let index = repo.read_index()?;
    let mut lines = Vec::new();

    if verbose {
        lines.push(format!(
            "index format v{}, {} entries",
            index.version,
            index.entries.len()
        ));
    }

    for entry in &index.entries {
        lines.push(entry.name.to_string());
        if verbose {
            let mode_label = match entry.mode_type {
                ModeType::Regular => "regular file",
                ModeType::Symlink => "symlink",
                ModeType::Gitlink => "git link",
            };
            lines.push(format!("  {mode_label} with perms: {:o}", entry.mode_perms));
            lines.push(format!("  on blob: {}", entry.oid));
            lines.push(format!(
                "  ctime: {}.{}, mtime: {}.{}",
                entry.ctime_s, entry.ctime_n, entry.mtime_s, entry.mtime_n
            ));
            lines.push(format!("  device: {}, inode: {}", entry.dev, entry.ino));
            lines.push(format!("  uid: {}, gid: {}", entry.uid, entry.gid));
            lines.push(format!(
                "  flags: stage={} assume_valid={}",
                entry.flag_stage, entry.flag_assume_valid
            ));
        }
    }
    Ok(CommandOutput::Lines(lines))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn lists_staged_paths() {
        let dir = tempfile::tempdir().unwrap();
        let repo = Repository::init(dir.path().join("work")).unwrap();
        std::fs::write(repo.worktree().join("a.txt"), "hi").unwrap();
        gyatt_repository::add(&repo, &[PathBuf::from("a.txt")]).unwrap();

        let CommandOutput::Lines(lines) = ls_files(&repo, false).unwrap() else {
            panic!("expected lines");
        };
        assert_eq!(lines, vec!["a.txt".to_string()]);
    }

    #[test]
    fn verbose_adds_metadata_lines() {
        let dir = tempfile::tempdir().unwrap();
        let repo = Repository::init(dir.path().join("work")).unwrap();
        std::fs::write(repo.worktree().join("a.txt"), "hi").unwrap();
        gyatt_repository::add(&repo, &[PathBuf::from("a.txt")]).unwrap();

        let CommandOutput::Lines(lines) = ls_files(&repo, true).unwrap() else {
            panic!("expected lines");
        };
        assert!(lines.len() > 1);
        assert!(lines.iter().any(|l| l.contains("regular file")));
    }
}
