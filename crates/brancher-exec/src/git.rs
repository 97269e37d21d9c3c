use std::path::{Path, PathBuf};

use brancher_core::BranchListing;

use crate::command::CommandError;
use crate::executor::{CommandExecutor, RealExecutor, args};

/// git operations, parameterized over the executor for testability.
///
/// Everything runs against the working tree of the current directory.
pub struct GitClient<E: CommandExecutor = RealExecutor> {
    executor: E,
}

impl GitClient<RealExecutor> {
    pub fn new() -> Self {
        Self {
            executor: RealExecutor::new("git"),
        }
    }
}

impl Default for GitClient<RealExecutor> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: CommandExecutor> GitClient<E> {
    pub fn with_executor(executor: E) -> Self {
        Self { executor }
    }

    // ── Branches ──

    pub async fn list_branches(&self) -> Result<BranchListing, GitError> {
        let output = self
            .executor
            .exec(&args(["branch"]))
            .await
            .map_err(|e| GitError::ListBranches { source: e })?;

        Ok(BranchListing::parse(&output))
    }

    pub async fn checkout(&self, branch: &str) -> Result<(), GitError> {
        self.executor
            .exec_streaming(&args(["checkout", branch]))
            .await
            .map_err(|e| GitError::Checkout {
                branch: branch.to_owned(),
                source: e,
            })
    }

    // ── Working tree ──

    /// Remove untracked and ignored files, including nested repositories.
    pub async fn clean(&self) -> Result<(), GitError> {
        self.executor
            .exec_streaming(&args(["clean", "-xffd"]))
            .await
            .map_err(|e| GitError::Clean { source: e })
    }

    pub async fn reset_hard(&self) -> Result<(), GitError> {
        self.executor
            .exec_streaming(&args(["reset", "--hard", "HEAD"]))
            .await
            .map_err(|e| GitError::Reset { source: e })
    }

    /// Restore `path` from the index.
    ///
    /// This discards every uncommitted change below `path`, not only the ones
    /// brancher made.
    pub async fn restore_path(&self, path: &Path) -> Result<(), GitError> {
        let path_str = path
            .to_str()
            .ok_or_else(|| GitError::InvalidPath(path.to_path_buf()))?;

        self.executor
            .exec_streaming(&args(["checkout", "--", path_str]))
            .await
            .map_err(|e| GitError::Restore {
                path: path.to_path_buf(),
                source: e,
            })
    }

    // ── Remotes ──

    /// Fetch large objects for `<remote>/<branch>` from `remote`.
    pub async fn lfs_fetch(&self, remote: &str, branch: &str) -> Result<(), GitError> {
        let refspec = format!("{remote}/{branch}");
        self.executor
            .exec_streaming(&args(["lfs", "fetch", remote, &refspec]))
            .await
            .map_err(|e| GitError::LfsFetch {
                refspec,
                source: e,
            })
    }

    pub async fn pull(&self) -> Result<(), GitError> {
        self.executor
            .exec_streaming(&args(["pull"]))
            .await
            .map_err(|e| GitError::Pull { source: e })
    }

    /// Merge `from` into the checked-out branch without opening an editor.
    pub async fn merge(&self, from: &str) -> Result<(), GitError> {
        self.executor
            .exec_streaming(&args(["merge", "--no-edit", from]))
            .await
            .map_err(|e| GitError::Merge {
                from: from.to_owned(),
                source: e,
            })
    }

    pub async fn push(&self) -> Result<(), GitError> {
        self.executor
            .exec_streaming(&args(["push"]))
            .await
            .map_err(|e| GitError::Push { source: e })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum GitError {
    #[error("failed to list branches")]
    ListBranches { source: CommandError },

    #[error("failed to check out {branch}")]
    Checkout {
        branch: String,
        source: CommandError,
    },

    #[error("failed to clean working tree")]
    Clean { source: CommandError },

    #[error("failed to reset working tree")]
    Reset { source: CommandError },

    #[error("path is not valid UTF-8: {0}")]
    InvalidPath(PathBuf),

    #[error("failed to restore {path} from the index")]
    Restore {
        path: PathBuf,
        source: CommandError,
    },

    #[error("failed to fetch large objects for {refspec}")]
    LfsFetch {
        refspec: String,
        source: CommandError,
    },

    #[error("failed to pull")]
    Pull { source: CommandError },

    #[error("failed to merge {from}")]
    Merge { from: String, source: CommandError },

    #[error("failed to push")]
    Push { source: CommandError },
}
