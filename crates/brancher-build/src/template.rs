use std::path::{Path, PathBuf};

use brancher_core::HostIdentity;
use glob::Pattern;
use walkdir::WalkDir;

/// Placeholder tokens and their replacements, applied in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Substitutions {
    pairs: Vec<(String, String)>,
}

impl Substitutions {
    pub fn new(pairs: Vec<(String, String)>) -> Self {
        Self { pairs }
    }

    /// `localhost` and `JENKINS_HOSTNAME` become the host's FQDN, `LOGNAME`
    /// the invoking user.
    pub fn for_identity(identity: &HostIdentity) -> Self {
        Self::new(vec![
            ("localhost".to_owned(), identity.fqdn.clone()),
            ("JENKINS_HOSTNAME".to_owned(), identity.fqdn.clone()),
            ("LOGNAME".to_owned(), identity.user.clone()),
        ])
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    /// Literal, non-overlapping replacement of every token, one token at a time.
    pub fn apply_to(&self, text: &str) -> String {
        self.pairs
            .iter()
            .fold(text.to_owned(), |acc, (find, replace)| {
                acc.replace(find.as_str(), replace)
            })
    }
}

/// Rewrite every file under `template_dir` whose name matches `pattern`.
///
/// Returns the number of files whose content changed. A missing directory is
/// not an error: there is nothing to substitute and `0` is returned.
pub fn apply(
    template_dir: &Path,
    pattern: &str,
    substitutions: &Substitutions,
) -> Result<usize, TemplateError> {
    if !template_dir.is_dir() {
        tracing::debug!(dir = %template_dir.display(), "no template directory, skipping substitution");
        return Ok(0);
    }

    let matcher = Pattern::new(pattern).map_err(|e| TemplateError::Pattern {
        pattern: pattern.to_owned(),
        source: e,
    })?;

    let mut rewritten = 0;
    for entry in WalkDir::new(template_dir) {
        let entry = entry.map_err(|e| TemplateError::Walk {
            dir: template_dir.to_path_buf(),
            source: e,
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy();
        if !matcher.matches(&name) {
            continue;
        }

        let path = entry.path();
        let original = std::fs::read_to_string(path).map_err(|e| TemplateError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;
        let updated = substitutions.apply_to(&original);
        if updated == original {
            continue;
        }

        std::fs::write(path, updated).map_err(|e| TemplateError::Write {
            path: path.to_path_buf(),
            source: e,
        })?;
        tracing::debug!(path = %path.display(), "substituted placeholders");
        rewritten += 1;
    }

    Ok(rewritten)
}

#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    #[error("invalid template pattern {pattern:?}")]
    Pattern {
        pattern: String,
        source: glob::PatternError,
    },
    #[error("failed to walk template directory {dir}")]
    Walk {
        dir: PathBuf,
        source: walkdir::Error,
    },
    #[error("failed to read template {path}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to write template {path}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}
