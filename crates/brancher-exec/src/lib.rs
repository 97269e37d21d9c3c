//! External command clients for brancher.
//!
//! Each client wraps one CLI tool behind a [`CommandExecutor`] so the
//! branch pipeline can be exercised against mocks:
//!
//! - [`GitClient`]: branch listing, clean/reset, LFS fetch, checkout, pull,
//!   merge, push, restore-from-index
//! - [`DockerClient`]: `docker build -t <tag> <context>`
//! - [`HostClient`]: `hostname --fqdn`
//! - [`AccountClient`]: `id -un`

pub mod command;
pub mod docker;
pub mod executor;
pub mod git;
pub mod host;

pub use command::CommandError;
pub use docker::{DockerClient, DockerError};
pub use executor::{CommandExecutor, RealExecutor};
pub use git::{GitClient, GitError};
pub use host::{AccountClient, HostClient, HostError};
