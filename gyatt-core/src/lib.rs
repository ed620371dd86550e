//! Command bodies backing the `gyatt` command-line surface, kept
//! independent of argument parsing so they can be exercised directly in
//! tests without going through `clap`.

mod cat_file;
mod check_ignore;
mod hash_object;
mod log;
mod ls_files;
mod ls_tree;
mod rev_parse;
mod show_ref;
mod status;
mod tag;
mod worktree;

pub use cat_file::cat_file;
pub use check_ignore::check_ignore;
pub use hash_object::hash_object;
pub use log::log;
pub use ls_files::ls_files;
pub use ls_tree::ls_tree;
pub use rev_parse::rev_parse;
pub use show_ref::show_ref;
pub use status::status;
pub use tag::{tag_create, tag_list};
pub use worktree::{add, checkout, init, rm};

use gyatt_hash::ObjectId;
use gyatt_object::Kind;

/// What a command produced: most commands emit printable lines, but
/// `cat-file` has to be able to emit an arbitrary blob's raw bytes, which
/// need not be valid UTF-8.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutput {
    Lines(Vec<String>),
    Raw(Vec<u8>),
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("object {0} not found")]
    ObjectNotFound(ObjectId),
    #[error("expected a {expected} object but found a {found}")]
    UnexpectedKind { expected: Kind, found: Kind },
    #[error("unrecognized tree entry mode {0:?}")]
    UnknownTreeMode(String),
    #[error(transparent)]
    Repository(#[from] gyatt_repository::Error),
    #[error(transparent)]
    Revision(#[from] gyatt_revision::Error),
    #[error(transparent)]
    Object(#[from] gyatt_object::Error),
    #[error(transparent)]
    Odb(#[from] gyatt_odb::Error),
    #[error(transparent)]
    Ref(#[from] gyatt_ref::Error),
    #[error(transparent)]
    Ignore(#[from] gyatt_ignore::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
