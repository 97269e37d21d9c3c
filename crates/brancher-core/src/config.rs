use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// File name looked up in the working directory when no path is given.
pub const CONFIG_FILE_NAME: &str = "brancher.toml";

/// brancher.toml configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BrancherConfig {
    #[serde(default)]
    pub image: ImageConfig,
    #[serde(default)]
    pub templates: TemplateConfig,
    #[serde(default)]
    pub branches: BranchConfig,
    #[serde(default)]
    pub host: HostConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageConfig {
    /// Image namespace, the part before the branch name in the tag
    #[serde(default = "default_namespace")]
    pub namespace: String,
    /// Dockerfile the version token is read from
    #[serde(default = "default_dockerfile")]
    pub dockerfile: PathBuf,
    /// Variable whose `${VAR:-x.y.z}` default becomes the image version
    #[serde(default = "default_version_variable")]
    pub version_variable: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateConfig {
    /// Directory holding the templates. Substitution is skipped when it is absent.
    #[serde(default = "default_template_dir")]
    pub dir: PathBuf,
    /// Glob matched against file names below `dir`
    #[serde(default = "default_template_pattern")]
    pub pattern: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BranchConfig {
    /// Remote whose same-named branch is the default predecessor
    #[serde(default = "default_upstream_remote")]
    pub upstream_remote: String,
    /// Branches whose predecessor is fixed instead of inferred
    #[serde(default = "default_predecessors")]
    pub predecessors: HashMap<String, String>,
    /// Branches that need a `git lfs fetch` before checkout
    #[serde(default = "default_large_objects")]
    pub large_objects: Vec<LargeObjectSource>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LargeObjectSource {
    pub branch: String,
    pub remote: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostConfig {
    /// Domain appended to a bare host name on the home network
    #[serde(default = "default_home_domain")]
    pub home_domain: String,
    /// Domain appended to a bare host name anywhere else
    #[serde(default = "default_other_domain")]
    pub other_domain: String,
    /// Outbound address prefix identifying the home network
    #[serde(default = "default_home_address_prefix")]
    pub home_address_prefix: String,
    /// Address the network probe "connects" a UDP socket to
    #[serde(default = "default_probe_target")]
    pub probe_target: String,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            namespace: default_namespace(),
            dockerfile: default_dockerfile(),
            version_variable: default_version_variable(),
        }
    }
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self {
            dir: default_template_dir(),
            pattern: default_template_pattern(),
        }
    }
}

impl Default for BranchConfig {
    fn default() -> Self {
        Self {
            upstream_remote: default_upstream_remote(),
            predecessors: default_predecessors(),
            large_objects: default_large_objects(),
        }
    }
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            home_domain: default_home_domain(),
            other_domain: default_other_domain(),
            home_address_prefix: default_home_address_prefix(),
            probe_target: default_probe_target(),
        }
    }
}

impl BranchConfig {
    /// Remote to fetch large objects from before checking out `branch`, if any.
    pub fn large_object_remote(&self, branch: &str) -> Option<&str> {
        self.large_objects
            .iter()
            .find(|source| source.branch == branch)
            .map(|source| source.remote.as_str())
    }
}

impl BrancherConfig {
    /// Load from `brancher.toml` in the given directory, or return defaults if not found.
    pub fn load(project_dir: &Path) -> crate::Result<Self> {
        let config_path = project_dir.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            Self::load_file(&config_path)
        } else {
            tracing::debug!(path = %config_path.display(), "no config file, using defaults");
            Ok(Self::default())
        }
    }

    /// Load from an explicit path. A missing file is an error here.
    pub fn load_file(config_path: &Path) -> crate::Result<Self> {
        let content =
            std::fs::read_to_string(config_path).map_err(|e| crate::Error::ConfigLoad {
                path: config_path.to_path_buf(),
                source: e,
            })?;
        toml::from_str(&content).map_err(|e| crate::Error::ConfigParse {
            path: config_path.to_path_buf(),
            source: e,
        })
    }
}

fn default_namespace() -> String {
    "markewaite".to_owned()
}

fn default_dockerfile() -> PathBuf {
    PathBuf::from("Dockerfile")
}

fn default_version_variable() -> String {
    "JENKINS_VERSION".to_owned()
}

fn default_template_dir() -> PathBuf {
    PathBuf::from("ref")
}

fn default_template_pattern() -> String {
    "*.xml".to_owned()
}

fn default_upstream_remote() -> String {
    "upstream".to_owned()
}

fn default_predecessors() -> HashMap<String, String> {
    HashMap::from([
        ("lts".to_owned(), "upstream/master".to_owned()),
        ("cjt".to_owned(), "cjt".to_owned()),
    ])
}

fn default_large_objects() -> Vec<LargeObjectSource> {
    [
        ("lts-with-plugins", "public"),
        ("cjt-with-plugins", "public"),
        ("cjt-with-plugins-add-credentials", "private"),
    ]
    .into_iter()
    .map(|(branch, remote)| LargeObjectSource {
        branch: branch.to_owned(),
        remote: remote.to_owned(),
    })
    .collect()
}

fn default_home_domain() -> String {
    "markwaite.net".to_owned()
}

fn default_other_domain() -> String {
    "example.com".to_owned()
}

fn default_home_address_prefix() -> String {
    "172".to_owned()
}

fn default_probe_target() -> String {
    "google.com:80".to_owned()
}
