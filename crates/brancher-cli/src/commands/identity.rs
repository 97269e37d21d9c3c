use std::sync::Arc;

use brancher_core::identity::{classify_network, resolve_fqdn, user_from_env};
use brancher_core::{HostConfig, HostIdentity, NetworkProbe, UdpProbe};
use brancher_exec::{AccountClient, CommandExecutor, HostClient, RealExecutor};
use tokio::sync::OnceCell;

/// Environment variable lookup, `brancher_core::identity::process_env` in production.
pub(crate) type EnvLookup = fn(&str) -> Option<String>;

/// Resolves the host identity on first use and keeps it for the rest of the run.
///
/// Nothing is looked up until a branch actually has templates to substitute.
pub(crate) struct IdentityResolver<
    H: CommandExecutor = RealExecutor,
    A: CommandExecutor = RealExecutor,
> {
    host: HostClient<H>,
    account: AccountClient<A>,
    config: HostConfig,
    probe: Arc<dyn NetworkProbe>,
    env: EnvLookup,
    resolved: OnceCell<HostIdentity>,
}

impl IdentityResolver<RealExecutor, RealExecutor> {
    pub fn new(config: HostConfig) -> Self {
        let probe = Arc::new(UdpProbe::new(config.probe_target.as_str()));
        Self::with_parts(
            HostClient::new(),
            AccountClient::new(),
            config,
            probe,
            brancher_core::identity::process_env,
        )
    }
}

impl<H: CommandExecutor, A: CommandExecutor> IdentityResolver<H, A> {
    pub fn with_parts(
        host: HostClient<H>,
        account: AccountClient<A>,
        config: HostConfig,
        probe: Arc<dyn NetworkProbe>,
        env: EnvLookup,
    ) -> Self {
        Self {
            host,
            account,
            config,
            probe,
            env,
            resolved: OnceCell::new(),
        }
    }

    pub async fn identity(&self) -> anyhow::Result<&HostIdentity> {
        self.resolved.get_or_try_init(|| self.discover()).await
    }

    async fn discover(&self) -> anyhow::Result<HostIdentity> {
        let hostname = self.host.hostname().await?;

        // The probe may resolve a name and open a socket.
        let probe = Arc::clone(&self.probe);
        let config = self.config.clone();
        let fqdn = tokio::task::spawn_blocking(move || {
            resolve_fqdn(
                &hostname,
                || {
                    classify_network(
                        std::env::consts::OS,
                        probe.as_ref(),
                        &config.home_address_prefix,
                    )
                },
                &config,
            )
        })
        .await?;

        let user = match user_from_env(self.env) {
            Some(user) => user,
            None => {
                tracing::debug!("no user in the environment, asking the account database");
                self.account.login_name().await?
            }
        };

        tracing::debug!(%fqdn, %user, "host identity");
        Ok(HostIdentity { fqdn, user })
    }
}
