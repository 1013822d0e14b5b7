use std::{fmt, path::Path, path::PathBuf};

use serde::Deserialize;

use crate::Res;
use cli::{CliBackend, GitEnv};
use libgit2::Git2Backend;
use status::ChangeRecord;

pub mod cli;
pub mod divergence;
pub mod libgit2;
pub mod status;

/// Hex object id of a commit.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CommitId(String);

impl CommitId {
    pub fn new(hex: impl Into<String>) -> Self {
        Self(hex.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn short(&self) -> &str {
        self.0.get(..7).unwrap_or(&self.0)
    }
}

impl fmt::Display for CommitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<git2::Oid> for CommitId {
    fn from(oid: git2::Oid) -> Self {
        Self(oid.to_string())
    }
}

/// Where HEAD points.
///
/// A branch without a commit is an unborn branch in a fresh repository. A
/// commit without a branch is a detached HEAD.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Head {
    pub branch: Option<String>,
    pub commit: Option<CommitId>,
}

pub type History<'a> = Box<dyn Iterator<Item = Res<CommitId>> + 'a>;

/// Read-only access to a repository. Everything the status summary needs goes
/// through here so the git library and the `git` binary are interchangeable.
pub trait Backend {
    /// Working directory root.
    fn root(&self) -> Res<PathBuf>;

    fn head(&self) -> Res<Head>;

    /// Tip of the upstream of the current branch. `None` when HEAD is detached,
    /// unborn, or the branch tracks nothing.
    fn upstream_commit(&self) -> Res<Option<CommitId>>;

    fn change_records(&self) -> Res<Vec<ChangeRecord>>;

    /// `commit` and its ancestors, newest first, each yielded once. Every call
    /// starts an independent walk.
    fn history_of(&self, commit: &CommitId) -> Res<History<'_>>;

    fn stash_count(&self) -> Res<usize>;
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    #[default]
    Libgit2,
    Cli,
}

/// Opens the repository containing `path`. `Ok(None)` means `path` is not
/// inside a repository.
pub fn open(kind: BackendKind, path: &Path, env: &GitEnv) -> Res<Option<Box<dyn Backend>>> {
    log::debug!("Opening repo at {:?} with {:?} backend", path, kind);

    Ok(match kind {
        BackendKind::Libgit2 => {
            Git2Backend::discover(path)?.map(|backend| Box::new(backend) as Box<dyn Backend>)
        }
        BackendKind::Cli => CliBackend::discover(path, env)?
            .map(|backend| Box::new(backend) as Box<dyn Backend>),
    })
}
