use std::fs;
use std::path::PathBuf;

use gyatt_ignore::{parse_ruleset, Ignore};
use gyatt_index::Index;
use gyatt_object::Object;

use crate::{Error, Repository};

/// Build the full [`Ignore`] engine for `repo`: the two absolute rulesets
/// (`.git/info/exclude`, the global `git/ignore`) plus one scoped ruleset
/// per `.gitignore` found in `index`.
///
/// Scoped rules are read from the index, not the worktree, so a staged but
/// uncommitted `.gitignore` is honored.
pub fn load_ignore(repo: &Repository, index: &Index) -> Result<Ignore, Error> {
    let mut ignore = Ignore::new();

    let exclude_path = repo.gitdir().join("info").join("exclude");
    if let Ok(contents) = fs::read(&exclude_path) {
        ignore.add_absolute_ruleset(parse_ruleset(&contents));
    }

    if let Some(global_path) = global_ignore_path() {
        if let Ok(contents) = fs::read(&global_path) {
            ignore.add_absolute_ruleset(parse_ruleset(&contents));
        }
    }

    let store = repo.store();
    for entry in &index.entries {
        let name = entry.name.to_string();
        if name == ".gitignore" || name.ends_with("/.gitignore") {
            let dir = match name.rfind('/') {
                Some(i) => &name[..i],
                None => "",
            };
            if let Some(Object::Blob(contents)) = store.read(&entry.oid)? {
                ignore.add_scoped_ruleset(dir, parse_ruleset(&contents));
            }
        }
    }

    Ok(ignore)
}

fn global_ignore_path() -> Option<PathBuf> {
    if let Ok(config_home) = std::env::var("XDG_CONFIG_HOME") {
        if !config_home.is_empty() {
            return Some(PathBuf::from(config_home).join("git").join("ignore"));
        }
    }
    dirs::config_dir().map(|d| d.join("git").join("ignore"))
}
