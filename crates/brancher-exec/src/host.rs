use crate::command::CommandError;
use crate::executor::{CommandExecutor, RealExecutor, args};

/// Reads the local host name through `hostname`.
pub struct HostClient<E: CommandExecutor = RealExecutor> {
    executor: E,
}

impl HostClient<RealExecutor> {
    pub fn new() -> Self {
        Self {
            executor: RealExecutor::new("hostname"),
        }
    }
}

impl Default for HostClient<RealExecutor> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: CommandExecutor> HostClient<E> {
    pub fn with_executor(executor: E) -> Self {
        Self { executor }
    }

    /// Fully-qualified name if the resolver knows one, else the bare name.
    pub async fn hostname(&self) -> Result<String, HostError> {
        let output = match self.executor.exec(&args(["--fqdn"])).await {
            Ok(out) => out,
            Err(e) => {
                tracing::warn!(error = %e, "hostname --fqdn failed, falling back to hostname");
                self.executor
                    .exec(&[])
                    .await
                    .map_err(|e| HostError::Lookup { source: e })?
            }
        };

        let name = output.trim();
        if name.is_empty() {
            return Err(HostError::Empty);
        }
        Ok(name.to_owned())
    }
}

/// Reads the login name of the current uid from the account database
/// through `id -un`.
pub struct AccountClient<E: CommandExecutor = RealExecutor> {
    executor: E,
}

impl AccountClient<RealExecutor> {
    pub fn new() -> Self {
        Self {
            executor: RealExecutor::new("id"),
        }
    }
}

impl Default for AccountClient<RealExecutor> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: CommandExecutor> AccountClient<E> {
    pub fn with_executor(executor: E) -> Self {
        Self { executor }
    }

    pub async fn login_name(&self) -> Result<String, HostError> {
        let output = self
            .executor
            .exec(&args(["-un"]))
            .await
            .map_err(|e| HostError::Account { source: e })?;

        let name = output.trim();
        if name.is_empty() {
            return Err(HostError::EmptyAccount);
        }
        Ok(name.to_owned())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum HostError {
    #[error("failed to look up host name")]
    Lookup { source: CommandError },

    #[error("hostname printed an empty name")]
    Empty,

    #[error("cannot determine the current user")]
    Account { source: CommandError },

    #[error("id printed an empty user name")]
    EmptyAccount,
}
