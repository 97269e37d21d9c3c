//! Template substitution and image tagging for brancher.
//!
//! # Build step
//!
//! ```text
//! brancher (per branch)
//!   1. Substitute ── ref/**/*.xml: localhost, JENKINS_HOSTNAME, LOGNAME
//!   2. Tag         ── <namespace>/<branch>:<version from Dockerfile | latest>
//!   3. Build       ── docker build -t <tag> .
//!   4. Revert      ── git checkout -- ref
//! ```
//!
//! Steps 3 and 4 live in `brancher-exec`; this crate only touches files.
//!
//! # Revert semantics
//!
//! The revert restores the whole template directory from the git index. Any
//! uncommitted edit below it is lost along with the substitutions.

pub mod tag;
pub mod template;

pub use tag::{ImageTag, TagError, compute_tag, extract_version};
pub use template::{Substitutions, TemplateError};
