use std::io::Write;
use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use gyatt_core::CommandOutput;
use gyatt_repository::Repository;

#[derive(Parser)]
#[command(name = "gyatt", about = "A small, from-scratch version control engine inspired by git")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create an empty repository.
    Init {
        #[arg(default_value = ".")]
        path: PathBuf,
    },
    /// Print the contents of a repository object.
    CatFile { kind: ObjectKind, object: String },
    /// Compute the id of an object, optionally writing it into the store.
    HashObject {
        #[arg(short = 't', long = "type", default_value = "blob")]
        kind: ObjectKind,
        #[arg(short = 'w')]
        write: bool,
        path: PathBuf,
    },
    /// Print the commit ancestry of a revision as a Graphviz digraph.
    Log {
        #[arg(default_value = "HEAD")]
        commit: String,
    },
    /// List the contents of a tree.
    LsTree {
        #[arg(short = 'r')]
        recursive: bool,
        #[arg(default_value = "HEAD")]
        tree: String,
    },
    /// Materialize a commit's tree into an empty directory.
    Checkout { commit: String, path: PathBuf },
    /// List every resolved ref under refs/.
    ShowRef,
    /// Create a tag, or list every tag if no name is given.
    Tag {
        #[arg(short = 'a')]
        annotate: bool,
        name: Option<String>,
        #[arg(default_value = "HEAD")]
        object: String,
    },
    /// Resolve a name to a single object id.
    RevParse {
        #[arg(long = "gyatt-type")]
        kind: Option<ObjectKind>,
        name: String,
    },
    /// List the paths currently staged in the index.
    LsFiles {
        #[arg(long)]
        verbose: bool,
    },
    /// Print which of the given paths are ignored.
    CheckIgnore { paths: Vec<String> },
    /// Show the working tree status.
    Status,
    /// Remove paths from the index and the worktree.
    Rm { paths: Vec<PathBuf> },
    /// Stage paths.
    Add { paths: Vec<PathBuf> },
}

#[derive(Clone, Copy, ValueEnum)]
enum ObjectKind {
    Blob,
    Tree,
    Commit,
    Tag,
}

impl From<ObjectKind> for gyatt_object::Kind {
    fn from(kind: ObjectKind) -> Self {
        match kind {
            ObjectKind::Blob => gyatt_object::Kind::Blob,
            ObjectKind::Tree => gyatt_object::Kind::Tree,
            ObjectKind::Commit => gyatt_object::Kind::Commit,
            ObjectKind::Tag => gyatt_object::Kind::Tag,
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let cwd = std::env::current_dir()?;
    tracing::debug!(?cwd, "dispatching command");

    let output = match cli.command {
        Command::Init { path } => {
            gyatt_core::init(&path)?;
            None
        }
        Command::CatFile { kind, object } => {
            let repo = Repository::open(&cwd)?;
            Some(gyatt_core::cat_file(&repo, kind.into(), &object)?)
        }
        Command::HashObject { kind, write, path } => {
            let repo = if write { Some(Repository::open(&cwd)?) } else { None };
            Some(gyatt_core::hash_object(&path, kind.into(), repo.as_ref())?)
        }
        Command::Log { commit } => {
            let repo = Repository::open(&cwd)?;
            Some(gyatt_core::log(&repo, &commit)?)
        }
        Command::LsTree { recursive, tree } => {
            let repo = Repository::open(&cwd)?;
            Some(gyatt_core::ls_tree(&repo, &tree, recursive)?)
        }
        Command::Checkout { commit, path } => {
            let repo = Repository::open(&cwd)?;
            Some(gyatt_core::checkout(&repo, &commit, &path)?)
        }
        Command::ShowRef => {
            let repo = Repository::open(&cwd)?;
            Some(gyatt_core::show_ref(&repo)?)
        }
        Command::Tag { annotate, name, object } => {
            let repo = Repository::open(&cwd)?;
            Some(match name {
                Some(name) => gyatt_core::tag_create(&repo, &name, &object, annotate)?,
                None => gyatt_core::tag_list(&repo)?,
            })
        }
        Command::RevParse { kind, name } => {
            let repo = Repository::open(&cwd)?;
            Some(gyatt_core::rev_parse(&repo, kind.map(Into::into), &name)?)
        }
        Command::LsFiles { verbose } => {
            let repo = Repository::open(&cwd)?;
            Some(gyatt_core::ls_files(&repo, verbose)?)
        }
        Command::CheckIgnore { paths } => {
            let repo = Repository::open(&cwd)?;
            Some(gyatt_core::check_ignore(&repo, &paths)?)
        }
        Command::Status => {
            let repo = Repository::open(&cwd)?;
            Some(gyatt_core::status(&repo)?)
        }
        Command::Rm { paths } => {
            let repo = Repository::open(&cwd)?;
            Some(gyatt_core::rm(&repo, &paths)?)
        }
        Command::Add { paths } => {
            let repo = Repository::open(&cwd)?;
            Some(gyatt_core::add(&repo, &paths)?)
        }
    };

    if let Some(output) = output {
        print_output(output);
    }
    Ok(())
}

fn print_output(output: CommandOutput) {
    match output {
        CommandOutput::Lines(lines) => {
            for line in lines {
                println!("{line}");
            }
        }
        CommandOutput::Raw(bytes) => {
            let _ = std::io::stdout().write_all(&bytes);
        }
    }
}
