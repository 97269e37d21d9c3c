use crate::config::BranchConfig;

/// Name reported when `git branch` marks no branch as checked out.
pub const UNKNOWN_BRANCH: &str = "unknown branch";

/// Parsed output of `git branch`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BranchListing {
    /// Branch marked with `* `, if any
    pub current: Option<String>,
    /// Every listed branch, current included, in the order git printed them
    pub branches: Vec<String>,
}

impl BranchListing {
    pub fn parse(output: &str) -> Self {
        let mut listing = Self::default();

        for line in output.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            match line.strip_prefix("* ") {
                Some(name) => {
                    // First marker wins; git never prints two.
                    if listing.current.is_none() {
                        listing.current = Some(name.to_owned());
                    }
                    listing.branches.push(name.to_owned());
                }
                None => listing.branches.push(line.to_owned()),
            }
        }

        listing
    }

    /// Checked-out branch, or [`UNKNOWN_BRANCH`].
    pub fn current_name(&self) -> &str {
        self.current.as_deref().unwrap_or(UNKNOWN_BRANCH)
    }
}

/// Find the branch to merge into `current` before building it.
///
/// A configured override is returned as is. Otherwise the candidate starts as
/// `<upstream_remote>/<current>` and `branches` is scanned in order: every
/// entry that is a proper prefix of `current` replaces the candidate, and the
/// scan stops at the entry equal to `current`. The last prefix seen before the
/// exact match therefore wins; with no exact match the whole list is scanned.
///
/// ```
/// # use brancher_core::{BranchConfig, resolve_predecessor};
/// let branches: Vec<String> = ["master", "lts", "lts-rc", "lts-rc-2"]
///     .iter()
///     .map(|b| b.to_string())
///     .collect();
/// let config = BranchConfig::default();
/// assert_eq!(resolve_predecessor("lts-rc-2", &branches, &config), "lts-rc");
/// assert_eq!(resolve_predecessor("lts", &branches, &config), "upstream/master");
/// ```
pub fn resolve_predecessor(current: &str, branches: &[String], config: &BranchConfig) -> String {
    if let Some(fixed) = config.predecessors.get(current) {
        return fixed.clone();
    }

    let mut candidate = format!("{}/{}", config.upstream_remote, current);
    for branch in branches {
        if branch == current {
            break;
        }
        if current.starts_with(branch.as_str()) {
            candidate = branch.clone();
        }
    }
    candidate
}
