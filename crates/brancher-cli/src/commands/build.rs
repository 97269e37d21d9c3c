use std::path::{Path, PathBuf};

use brancher_core::BrancherConfig;
use brancher_exec::{DockerClient, GitClient};

use super::identity::IdentityResolver;
use super::pipeline::{BuildContext, Pipeline};

/// Build and publish the checked-out branch, or every branch with `all`.
pub async fn build(all: bool, config_path: Option<&Path>, hosts: &[String]) -> anyhow::Result<()> {
    if !hosts.is_empty() {
        tracing::debug!(?hosts, "host targeting is not implemented, ignoring hosts");
    }

    let project_dir = PathBuf::from(".");
    let config = match config_path {
        Some(path) => BrancherConfig::load_file(path)?,
        None => BrancherConfig::load(&project_dir)?,
    };

    // Resolved on first substitution and shared by every branch build.
    let identity = IdentityResolver::new(config.host.clone());

    let context = BuildContext {
        config,
        project_dir,
    };
    let pipeline = Pipeline::new(GitClient::new(), DockerClient::new(), identity, context);
    let outcome = pipeline.run(all).await?;

    println!();
    for tag in &outcome.published {
        println!("Published: {tag}");
    }
    if let Some(branch) = &outcome.restored {
        println!("Restored branch: {branch}");
    }

    Ok(())
}
