//! Core types and configuration for brancher.
//!
//! This crate defines the `brancher.toml` schema ([`BrancherConfig`]),
//! `git branch` parsing and predecessor inference ([`BranchListing`],
//! [`resolve_predecessor`]), host identity resolution ([`HostIdentity`]),
//! and the shared error type.

pub mod branch;
pub mod config;
pub mod error;
pub mod identity;

pub use branch::{BranchListing, UNKNOWN_BRANCH, resolve_predecessor};
pub use config::{
    BranchConfig, BrancherConfig, HostConfig, ImageConfig, LargeObjectSource, TemplateConfig,
};
pub use error::{Error, Result};
pub use identity::{HostIdentity, NetworkClass, NetworkProbe, UdpProbe};
