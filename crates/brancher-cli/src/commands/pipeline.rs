use std::path::PathBuf;

use brancher_build::template::{self, Substitutions};
use brancher_build::{ImageTag, compute_tag};
use brancher_core::{BrancherConfig, resolve_predecessor};
use brancher_exec::{CommandExecutor, DockerClient, GitClient, RealExecutor};

use super::identity::IdentityResolver;

/// Everything a branch build needs besides the command clients.
pub(crate) struct BuildContext {
    pub config: BrancherConfig,
    /// Working tree root; also the docker build context
    pub project_dir: PathBuf,
}

/// Result of a successful pipeline run.
pub(crate) struct PipelineOutcome {
    /// Tags built and pushed, in build order
    pub published: Vec<ImageTag>,
    /// Original branch, when it had to be checked out again at the end
    pub restored: Option<String>,
}

/// Branch lifecycle: clean → (lfs fetch) → checkout → pull → merge → build → push.
///
/// Any failing step aborts the run. The only cleanup performed on failure is
/// the template revert around the docker build.
pub(crate) struct Pipeline<
    G: CommandExecutor = RealExecutor,
    D: CommandExecutor = RealExecutor,
    H: CommandExecutor = RealExecutor,
    A: CommandExecutor = RealExecutor,
> {
    git: GitClient<G>,
    docker: DockerClient<D>,
    identity: IdentityResolver<H, A>,
    context: BuildContext,
}

impl<G: CommandExecutor, D: CommandExecutor, H: CommandExecutor, A: CommandExecutor>
    Pipeline<G, D, H, A>
{
    pub fn new(
        git: GitClient<G>,
        docker: DockerClient<D>,
        identity: IdentityResolver<H, A>,
        context: BuildContext,
    ) -> Self {
        Self {
            git,
            docker,
            identity,
            context,
        }
    }

    pub async fn run(&self, all: bool) -> anyhow::Result<PipelineOutcome> {
        let listing = self.git.list_branches().await?;
        let original = listing.current_name().to_owned();

        let targets = if all {
            listing.branches.clone()
        } else {
            vec![original.clone()]
        };

        let mut published = Vec::new();
        for branch in &targets {
            println!("Building {branch}");
            self.checkout_branch(branch).await?;
            self.merge_predecessor(branch, &listing.branches).await?;
            let tag = self.build_image(branch).await?;

            println!("Pushing current branch");
            self.git.push().await?;
            published.push(tag);
        }

        let current = self.git.list_branches().await?;
        let restored = if current.current_name() != original {
            tracing::info!(branch = %original, "restoring original branch");
            self.checkout_branch(&original).await?;
            Some(original)
        } else {
            None
        };

        Ok(PipelineOutcome {
            published,
            restored,
        })
    }

    /// Bring the working tree to a clean checkout of `target`.
    async fn checkout_branch(&self, target: &str) -> anyhow::Result<()> {
        self.git.clean().await?;
        self.git.reset_hard().await?;

        if let Some(remote) = self.context.config.branches.large_object_remote(target) {
            tracing::info!(branch = target, remote, "fetching large objects");
            self.git.lfs_fetch(remote, target).await?;
        }

        self.git.checkout(target).await?;
        self.git.pull().await?;
        Ok(())
    }

    async fn merge_predecessor(&self, branch: &str, branches: &[String]) -> anyhow::Result<()> {
        let predecessor = resolve_predecessor(branch, branches, &self.context.config.branches);
        println!("Merging from {predecessor} to {branch}");
        self.git.merge(&predecessor).await?;
        Ok(())
    }

    /// Substitute templates, build the image, and revert the templates.
    ///
    /// Without a template directory the image is built as is and the host
    /// identity is never looked up. Otherwise the revert runs whether or not
    /// the build succeeded; a build error is reported in preference to a
    /// revert error.
    async fn build_image(&self, branch: &str) -> anyhow::Result<ImageTag> {
        let templates = &self.context.config.templates;
        let template_dir = self.context.project_dir.join(&templates.dir);
        if !template_dir.is_dir() {
            tracing::debug!(dir = %template_dir.display(), "no template directory, skipping substitution");
            return self.tag_and_build(branch).await;
        }

        let substitutions = Substitutions::for_identity(self.identity.identity().await?);
        for (find, replace) in substitutions.pairs() {
            println!(
                "Replacing '{find}' with '{replace}', in files matching '{}'",
                templates.pattern
            );
        }

        let built = match template::apply(&template_dir, &templates.pattern, &substitutions) {
            Ok(count) => {
                tracing::debug!(count, "templates substituted");
                self.tag_and_build(branch).await
            }
            Err(e) => Err(e.into()),
        };
        let reverted = self.git.restore_path(&templates.dir).await;

        let tag = built?;
        reverted?;
        Ok(tag)
    }

    async fn tag_and_build(&self, branch: &str) -> anyhow::Result<ImageTag> {
        let image = &self.context.config.image;
        let tag = compute_tag(
            &self.context.project_dir.join(&image.dockerfile),
            &image.namespace,
            branch,
            &image.version_variable,
        )?;

        println!("Building {tag}");
        self.docker
            .build(&tag.to_string(), &self.context.project_dir)
            .await?;
        Ok(tag)
    }
}
