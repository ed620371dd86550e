use std::fs;
use std::path::{Path, PathBuf};

use gyatt_config::Config;
use gyatt_index::Index;

use crate::Error;

/// An immutable (worktree root, git directory, configuration) triple.
pub struct Repository {
    worktree: PathBuf,
    gitdir: PathBuf,
    config: Config,
}

impl Repository {
    pub fn worktree(&self) -> &Path {
        &self.worktree
    }

    pub fn gitdir(&self) -> &Path {
        &self.gitdir
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn objects_dir(&self) -> PathBuf {
        self.gitdir.join("objects")
    }

    pub fn store(&self) -> gyatt_odb::Store {
        gyatt_odb::Store::at(self.objects_dir())
    }

    /// Open an existing repository rooted at `worktree`.
    pub fn open(worktree: impl Into<PathBuf>) -> Result<Self, Error> {
        let worktree = worktree.into();
        let gitdir = worktree.join(".git");
        if !gitdir.exists() {
            return Err(Error::NotARepository(worktree));
        }
        Self::load(worktree, gitdir)
    }

    fn load(worktree: PathBuf, gitdir: PathBuf) -> Result<Self, Error> {
        let config_path = gitdir.join("config");
        if !config_path.exists() {
            return Err(Error::ConfigMissing);
        }
        let config = Config::parse(&fs::read_to_string(&config_path)?)?;

        let version = config
            .get("core", "repositoryformatversion")
            .unwrap_or("")
            .to_string();
        if version != "0" {
            return Err(Error::UnsupportedFormatVersion(version));
        }

        Ok(Repository {
            worktree,
            gitdir,
            config,
        })
    }

    /// Create a brand new repository at `path`.
    pub fn init(path: impl Into<PathBuf>) -> Result<Self, Error> {
        let worktree = path.into();
        let gitdir = worktree.join(".git");

        if worktree.exists() {
            if !worktree.is_dir() {
                return Err(Error::NotADirectory(worktree));
            }
            if gitdir.exists() && fs::read_dir(&gitdir)?.next().is_some() {
                return Err(Error::AlreadyInitialized(worktree));
            }
        } else {
            fs::create_dir_all(&worktree)?;
        }

        repo_dir(&gitdir, &["branches"], true)?;
        repo_dir(&gitdir, &["refs", "tags"], true)?;
        repo_dir(&gitdir, &["refs", "heads"], true)?;
        repo_dir(&gitdir, &["objects"], true)?;

        fs::write(
            repo_file(&gitdir, &["description"], true)?,
            "Unnamed repository; edit this file 'description' to name the repository.\n",
        )?;
        fs::write(
            repo_file(&gitdir, &["HEAD"], true)?,
            "ref: refs/heads/master\n",
        )?;

        let mut config = Config::new();
        config.set("core", "repositoryformatversion", "0");
        config.set("core", "filemode", "false");
        config.set("core", "bare", "false");
        fs::write(repo_file(&gitdir, &["config"], true)?, config.to_ini_string())?;

        Ok(Repository {
            worktree,
            gitdir,
            config,
        })
    }

    /// Join path components under the git directory.
    pub fn repo_path(&self, segments: &[&str]) -> PathBuf {
        segments.iter().fold(self.gitdir.clone(), |p, s| p.join(s))
    }

    /// Compute (optionally creating) a directory under the git directory.
    /// Refuses to return a path that exists as a non-directory.
    pub fn repo_dir(&self, segments: &[&str], mkdir: bool) -> Result<PathBuf, Error> {
        repo_dir(&self.gitdir, segments, mkdir)
    }

    /// Compute a file path under the git directory, ensuring its parent
    /// directory exists (creating it if `mkdir`).
    pub fn repo_file(&self, segments: &[&str], mkdir: bool) -> Result<PathBuf, Error> {
        repo_file(&self.gitdir, segments, mkdir)
    }

    pub fn index_path(&self) -> PathBuf {
        self.gitdir.join("index")
    }

    /// Read `.git/index`. A missing file is treated as an empty index,
    /// not an error.
    pub fn read_index(&self) -> Result<Index, Error> {
        match fs::read(self.index_path()) {
            Ok(bytes) => Ok(gyatt_index::Index::parse(&bytes)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Index::default()),
            Err(e) => Err(e.into()),
        }
    }

    /// Wholly rewrite `.git/index` on every mutation; last writer wins.
    /// No `.lock` protocol.
    pub fn write_index(&self, index: &Index) -> Result<(), Error> {
        fs::write(self.index_path(), index.serialize())?;
        Ok(())
    }
}

fn repo_dir(gitdir: &Path, segments: &[&str], mkdir: bool) -> Result<PathBuf, Error> {
    let path = segments.iter().fold(gitdir.to_path_buf(), |p, s| p.join(s));
    if path.exists() {
        if path.is_dir() {
            return Ok(path);
        }
        return Err(Error::NotADirectory(path));
    }
    if mkdir {
        fs::create_dir_all(&path)?;
    }
    Ok(path)
}

fn repo_file(gitdir: &Path, segments: &[&str], mkdir: bool) -> Result<PathBuf, Error> {
    let (parent_segments, file_name) = segments.split_at(segments.len() - 1);
    let parent = repo_dir(gitdir, parent_segments, mkdir)?;
    Ok(parent.join(file_name[0]))
}
