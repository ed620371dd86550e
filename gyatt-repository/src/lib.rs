//! Repository context, path provider, tree flattening, the status engine,
//! and the worktree-mutating commands (`add`/`rm`/`checkout`).

mod add_rm;
mod checkout;
mod ignore_load;
mod repository;
mod status;
mod tree;

pub use add_rm::add;
pub use checkout::checkout;
pub use ignore_load::load_ignore;
pub use repository::Repository;
pub use status::{
    head_vs_index, index_vs_worktree, status_branch, HeadIndexDelta, StatusReport, WorktreeDelta,
};
pub use tree::flatten_tree;

pub use add_rm::rm;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("not a git repository: {0}")]
    NotARepository(std::path::PathBuf),
    #[error("configuration file missing")]
    ConfigMissing,
    #[error("unsupported repositoryformatversion {0}")]
    UnsupportedFormatVersion(String),
    #[error("{0} exists and is not a directory")]
    NotADirectory(std::path::PathBuf),
    #[error("{0} already has a non-empty .git directory")]
    AlreadyInitialized(std::path::PathBuf),
    #[error("path {0} is outside the worktree")]
    PathOutsideWorktree(std::path::PathBuf),
    #[error("path {0} is not a regular file")]
    PathNotRegular(std::path::PathBuf),
    #[error("paths not present in the index: {0:?}")]
    NotInIndex(Vec<std::path::PathBuf>),
    #[error("destination {0} is not empty")]
    NotEmpty(std::path::PathBuf),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Config(#[from] gyatt_config::Error),
    #[error(transparent)]
    Odb(#[from] gyatt_odb::Error),
    #[error(transparent)]
    Ref(#[from] gyatt_ref::Error),
    #[error(transparent)]
    Revision(#[from] gyatt_revision::Error),
    #[error(transparent)]
    Object(#[from] gyatt_object::Error),
    #[error(transparent)]
    Ignore(#[from] gyatt_ignore::Error),
    #[error(transparent)]
    Index(#[from] gyatt_index::Error),
}
