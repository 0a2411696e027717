//! PyPI and GitHub lookups.

use feu_core::error::{FeuError, FeuResult};
use feu_registry::{sort_repos_by_full_name, sort_repos_by_name, GithubRepo, RegistryClient};

use super::CommandContext;
use crate::{FetchVersionsArgs, RepoSort};

pub async fn execute_versions(args: FetchVersionsArgs, ctx: &CommandContext) -> FeuResult<()> {
    for version in fetch_versions(&args, &ctx.registry).await? {
        ctx.output.print(&version);
    }
    Ok(())
}

pub async fn execute_github_metadata(owner: &str, repo: &str, ctx: &CommandContext) -> FeuResult<()> {
    let metadata = ctx.registry.fetch_github_metadata(owner, repo).await?;
    ctx.output.print(&to_pretty_json(&metadata)?);
    Ok(())
}

pub async fn execute_github_repos(
    owner: &str,
    sort: Option<RepoSort>,
    reverse: bool,
    ctx: &CommandContext,
) -> FeuResult<()> {
    let repos = fetch_github_repos(owner, sort, reverse, &ctx.registry).await?;
    for repo in repos {
        ctx.output.print(&repo.full_name);
    }
    Ok(())
}

/// Versions selected by the flags; `--latest` yields a single entry
pub async fn fetch_versions(args: &FetchVersionsArgs, registry: &RegistryClient) -> FeuResult<Vec<String>> {
    let package = args.pkg_name.as_str();
    let lower = args.lower.as_deref();

    let mut versions = if args.latest {
        vec![registry.fetch_latest_version(package).await?]
    } else if args.latest_major {
        registry.fetch_latest_major_versions(package, lower).await?
    } else if args.latest_minor {
        registry.fetch_latest_minor_versions(package, lower).await?
    } else {
        registry.fetch_versions(package, lower, args.upper.as_deref()).await?
    };

    if args.reverse {
        versions.reverse();
    }
    Ok(versions)
}

pub async fn fetch_github_repos(
    owner: &str,
    sort: Option<RepoSort>,
    reverse: bool,
    registry: &RegistryClient,
) -> FeuResult<Vec<GithubRepo>> {
    let repos = registry.fetch_github_repos(owner).await?;
    Ok(match sort {
        Some(RepoSort::Name) => sort_repos_by_name(&repos, reverse),
        Some(RepoSort::FullName) => sort_repos_by_full_name(&repos, reverse),
        None if reverse => repos.into_iter().rev().collect(),
        None => repos,
    })
}

fn to_pretty_json(repo: &GithubRepo) -> FeuResult<String> {
    serde_json::to_string_pretty(repo).map_err(|e| FeuError::InvalidArgument {
        message: format!("Failed to render repository metadata: {}", e),
    })
}
