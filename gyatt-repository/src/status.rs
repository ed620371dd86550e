use std::os::unix::fs::MetadataExt;
use std::path::Path;

use gyatt_ignore::Ignore;
use gyatt_index::Index;
use gyatt_ref::Branch;

use crate::{Error, Repository};

/// Differences between a commit's flattened tree and the index.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HeadIndexDelta {
    pub modified: Vec<String>,
    pub added: Vec<String>,
    pub deleted: Vec<String>,
}

/// Differences between the index and the actual worktree contents.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WorktreeDelta {
    pub deleted: Vec<String>,
    pub modified: Vec<String>,
    pub untracked: Vec<String>,
}

/// The three independent pieces of `status`, bundled for
/// convenience; nothing here is printed — that's the CLI's job.
#[derive(Debug)]
pub struct StatusReport {
    pub branch: Option<Branch>,
    pub head_vs_index: HeadIndexDelta,
    pub index_vs_worktree: WorktreeDelta,
}

pub fn status_branch(repo: &Repository) -> Result<Option<Branch>, Error> {
    Ok(gyatt_ref::current_branch(repo.gitdir())?)
}

pub fn head_vs_index(repo: &Repository, index: &Index) -> Result<HeadIndexDelta, Error> {
    let mut head_map = match crate::tree::flatten_tree(repo, "HEAD") {
        Ok(map) => map,
        Err(_) => Default::default(), // no commits yet: everything in the index is "added"
    };

    let mut delta = HeadIndexDelta::default();
    for entry in &index.entries {
        let name_str = entry.name.to_string();
        match head_map.remove(&entry.name) {
            Some(oid) if oid != entry.oid => delta.modified.push(name_str),
            Some(_) => {}
            None => delta.added.push(name_str),
        }
    }
    for remaining in head_map.keys() {
        delta.deleted.push(remaining.to_string());
    }
    Ok(delta)
}

pub fn index_vs_worktree(
    repo: &Repository,
    index: &Index,
    ignore: &Ignore,
) -> Result<WorktreeDelta, Error> {
    let mut worktree_files = worktree_file_set(repo)?;
    let mut delta = WorktreeDelta::default();

    for entry in &index.entries {
        let name_str = entry.name.to_string();
        let full_path = repo.worktree().join(&name_str);

        if !full_path.exists() {
            delta.deleted.push(name_str.clone());
        } else {
            let meta = std::fs::metadata(&full_path)?;
            let recorded_ctime_ns = entry.ctime_s as i64 * 1_000_000_000 + entry.ctime_n as i64;
            let recorded_mtime_ns = entry.mtime_s as i64 * 1_000_000_000 + entry.mtime_n as i64;
            let actual_ctime_ns = meta.ctime() * 1_000_000_000 + meta.ctime_nsec();
            let actual_mtime_ns = meta.mtime() * 1_000_000_000 + meta.mtime_nsec();

            if recorded_ctime_ns != actual_ctime_ns || recorded_mtime_ns != actual_mtime_ns {
                let contents = std::fs::read(&full_path)?;
                let fresh_oid = gyatt_hash::hash(gyatt_object::frame(
                    gyatt_object::Kind::Blob,
                    &contents,
                ));
                if fresh_oid != entry.oid {
                    delta.modified.push(name_str.clone());
                }
            }
        }
        worktree_files.remove(&name_str);
    }

    for path in worktree_files {
        if !ignore.is_ignored(&path)? {
            delta.untracked.push(path);
        }
    }
    delta.untracked.sort();
    Ok(delta)
}

fn worktree_file_set(repo: &Repository) -> Result<std::collections::BTreeSet<String>, Error> {
    let mut set = std::collections::BTreeSet::new();
    for entry in walkdir::WalkDir::new(repo.worktree()) {
        let entry = entry.map_err(std::io::Error::from)?;
        if entry.path().starts_with(repo.gitdir()) {
            continue;
        }
        if entry.file_type().is_file() {
            let relative = entry
                .path()
                .strip_prefix(repo.worktree())
                .unwrap_or(entry.path());
            set.insert(path_to_slash_string(relative));
        }
    }
    Ok(set)
}

fn path_to_slash_string(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/")
}
