use std::path::{Path, PathBuf};

use crate::command::CommandError;
use crate::executor::{CommandExecutor, RealExecutor, args};

/// docker operations, parameterized over the executor for testability.
pub struct DockerClient<E: CommandExecutor = RealExecutor> {
    executor: E,
}

impl DockerClient<RealExecutor> {
    pub fn new() -> Self {
        Self {
            executor: RealExecutor::new("docker"),
        }
    }
}

impl Default for DockerClient<RealExecutor> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: CommandExecutor> DockerClient<E> {
    pub fn with_executor(executor: E) -> Self {
        Self { executor }
    }

    /// Build `context` into an image tagged `tag`, streaming build output.
    pub async fn build(&self, tag: &str, context: &Path) -> Result<(), DockerError> {
        let context_str = context
            .to_str()
            .ok_or_else(|| DockerError::InvalidPath(context.to_path_buf()))?;

        self.executor
            .exec_streaming(&args(["build", "-t", tag, context_str]))
            .await
            .map_err(|e| DockerError::Build {
                tag: tag.to_owned(),
                source: e,
            })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DockerError {
    #[error("build context path is not valid UTF-8: {0}")]
    InvalidPath(PathBuf),

    #[error("docker build of {tag} failed")]
    Build { tag: String, source: CommandError },
}
