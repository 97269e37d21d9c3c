use std::fmt;
use std::path::{Path, PathBuf};

use regex::Regex;

/// Version used when the Dockerfile carries no recognizable default.
pub const FALLBACK_VERSION: &str = "latest";

/// `<namespace>/<name>:<version>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageTag {
    pub namespace: String,
    pub name: String,
    pub version: String,
}

impl fmt::Display for ImageTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}:{}", self.namespace, self.name, self.version)
    }
}

/// Find the default version of `variable` in Dockerfile text.
///
/// Matches a line that mentions `variable` and later carries
/// `<variable>:-<digits and dots>`, as in
/// `ARG JENKINS_VERSION=${JENKINS_VERSION:-2.263.1}`. When a line holds
/// several defaults the last one wins. An empty default is no version.
pub fn extract_version(dockerfile: &str, variable: &str) -> Result<Option<String>, TagError> {
    let var = regex::escape(variable);
    let re = Regex::new(&format!("{var}.*{var}:-([0-9.]*)")).map_err(|e| TagError::Pattern {
        variable: variable.to_owned(),
        source: e,
    })?;

    Ok(re
        .captures(dockerfile)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .filter(|version| !version.is_empty())
        .map(str::to_owned))
}

/// Tag for `branch`, versioned from the Dockerfile at `dockerfile`.
pub fn compute_tag(
    dockerfile: &Path,
    namespace: &str,
    branch: &str,
    version_variable: &str,
) -> Result<ImageTag, TagError> {
    let content = std::fs::read_to_string(dockerfile).map_err(|e| TagError::Read {
        path: dockerfile.to_path_buf(),
        source: e,
    })?;

    let version = extract_version(&content, version_variable)?.unwrap_or_else(|| {
        tracing::debug!(variable = version_variable, "no version default found, using latest");
        FALLBACK_VERSION.to_owned()
    });

    Ok(ImageTag {
        namespace: namespace.to_owned(),
        name: branch.to_owned(),
        version,
    })
}

#[derive(Debug, thiserror::Error)]
pub enum TagError {
    #[error("failed to read Dockerfile at {path}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("cannot build a version pattern for {variable:?}")]
    Pattern {
        variable: String,
        source: regex::Error,
    },
}
