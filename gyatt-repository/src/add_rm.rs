//! `add`/`rm`: the only two operations that mutate the index directly from
//! worktree state.

use std::fs;
use std::os::unix::fs::MetadataExt;
use std::path::{Path, PathBuf};

use bstr::BString;
use gyatt_index::{IndexEntry, ModeType};
use gyatt_object::Object;

use crate::{Error, Repository};

/// Stage `paths`: read each file's current contents, write it as a blob,
/// and replace any existing index entry for that path with a fresh one
/// built from `stat` data.
pub fn add(repo: &Repository, paths: &[PathBuf]) -> Result<(), Error> {
    let mut staged = Vec::with_capacity(paths.len());
    for path in paths {
        let rel = to_repo_relative(repo, path)?;
        let abs = repo.worktree().join(rel.to_string());
        let sym_meta = fs::symlink_metadata(&abs).map_err(|_| Error::PathNotRegular(path.clone()))?;
        if !sym_meta.file_type().is_file() {
            return Err(Error::PathNotRegular(path.clone()));
        }
        staged.push((rel, abs));
    }

    let mut index = repo.read_index()?;
    let store = repo.store();

    for (rel, abs) in staged {
        index.entries.retain(|e| e.name != rel);

        let contents = fs::read(&abs)?;
        let oid = store.write(&Object::Blob(contents.clone()), true)?;
        let meta = fs::metadata(&abs)?;

        index.entries.push(IndexEntry {
            ctime_s: meta.ctime() as u32,
            ctime_n: meta.ctime_nsec() as u32,
            mtime_s: meta.mtime() as u32,
            mtime_n: meta.mtime_nsec() as u32,
            dev: meta.dev() as u32,
            ino: meta.ino() as u32,
            mode_type: ModeType::Regular,
            mode_perms: 0o644,
            uid: meta.uid(),
            gid: meta.gid(),
            file_size: contents.len() as u32,
            oid,
            flag_assume_valid: false,
            flag_stage: 0,
            name: rel,
        });
    }

    repo.write_index(&index)
}

/// Unstage `paths`: split the index into kept/removed entries, optionally
/// unlinking the removed paths' working-tree files.
pub fn rm(
    repo: &Repository,
    paths: &[PathBuf],
    delete_worktree: bool,
    skip_missing: bool,
) -> Result<(), Error> {
    let relatives: Vec<BString> = paths
        .iter()
        .map(|p| to_repo_relative(repo, p))
        .collect::<Result<_, _>>()?;

    let mut index = repo.read_index()?;

    let missing: Vec<PathBuf> = paths
        .iter()
        .zip(relatives.iter())
        .filter(|(_, rel)| !index.entries.iter().any(|e| &e.name == *rel))
        .map(|(p, _)| p.clone())
        .collect();
    if !missing.is_empty() && !skip_missing {
        return Err(Error::NotInIndex(missing));
    }

    let (kept, removed): (Vec<_>, Vec<_>) = index
        .entries
        .into_iter()
        .partition(|e| !relatives.contains(&e.name));
    index.entries = kept;
    repo.write_index(&index)?;

    if delete_worktree {
        for entry in &removed {
            let full = repo.worktree().join(entry.name.to_string());
            fs::remove_file(full)?;
        }
    }
    Ok(())
}

/// Resolve `path` (absolute, or relative to the worktree root) to a
/// worktree-relative, `/`-separated name, rejecting anything that escapes
/// the worktree. Lexical only — does
/// not require the path to exist, since `rm` must accept paths whose
/// worktree file is already gone.
pub(crate) fn to_repo_relative(repo: &Repository, path: &Path) -> Result<BString, Error> {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        repo.worktree().join(path)
    };
    let normalized = lexically_normalize(&absolute);
    let worktree = lexically_normalize(repo.worktree());

    let relative = normalized
        .strip_prefix(&worktree)
        .map_err(|_| Error::PathOutsideWorktree(path.to_path_buf()))?;
    if relative.as_os_str().is_empty() {
        return Err(Error::PathOutsideWorktree(path.to_path_buf()));
    }

    let slash_path = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/");
    Ok(BString::from(slash_path))
}

fn lexically_normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            std::path::Component::ParentDir => {
                out.pop();
            }
            std::path::Component::CurDir => {}
            other => out.push(other.as_os_str()),
        }
    }
    out
}
