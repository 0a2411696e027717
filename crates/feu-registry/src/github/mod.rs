//! Repository metadata from the GitHub REST API.

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, LINK};
use tracing::{debug, info};
use url::Url;

use feu_core::error::FeuError;

use crate::api::GithubRepo;
use crate::client::{decode_json, invalid_json, RegistryClient};
use crate::RegistryResult;

const GITHUB_ACCEPT: &str = "application/vnd.github+json";
const REPOS_PER_PAGE: &str = "100";

impl RegistryClient {
    fn github_headers(&self) -> RegistryResult<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(GITHUB_ACCEPT));
        if let Some(token) = &self.github_token {
            let value = HeaderValue::from_str(&format!("Bearer {}", token)).map_err(|e| FeuError::InvalidArgument {
                message: format!("Invalid GITHUB_TOKEN: {}", e),
            })?;
            headers.insert(AUTHORIZATION, value);
        }
        Ok(headers)
    }

    /// Metadata of one repository
    pub async fn fetch_github_metadata(&self, owner: &str, repo: &str) -> RegistryResult<GithubRepo> {
        let url = format!("{}/repos/{}/{}", self.github_url, owner, repo);
        let body = self.fetch_json_cached(&url, &self.github_headers()?).await?;
        serde_json::from_value(body).map_err(|e| invalid_json(&url, e))
    }

    /// Every repository of a user, following `Link: rel="next"` pages
    pub async fn fetch_github_repos(&self, owner: &str) -> RegistryResult<Vec<GithubRepo>> {
        let headers = self.github_headers()?;
        let first = Url::parse_with_params(
            &format!("{}/users/{}/repos", self.github_url, owner),
            &[("per_page", REPOS_PER_PAGE), ("type", "all")],
        )
        .map_err(|e| FeuError::InvalidArgument {
            message: format!("Invalid GitHub URL for owner '{}': {}", owner, e),
        })?;

        let mut repos = Vec::new();
        let mut next = Some(first.to_string());
        while let Some(url) = next.take() {
            let response = self.get(&url, &headers).await?;
            next = response
                .headers()
                .get(LINK)
                .and_then(|value| value.to_str().ok())
                .and_then(next_page_link);

            let body = decode_json(&url, response).await?;
            let page: Vec<GithubRepo> = serde_json::from_value(body).map_err(|e| invalid_json(&url, e))?;
            debug!("Fetched {} repositories from {}", page.len(), url);
            repos.extend(page);
        }

        info!("Found {} repositories for {}", repos.len(), owner);
        Ok(repos)
    }
}

/// Target of the `rel="next"` entry of a `Link` header
pub fn next_page_link(header: &str) -> Option<String> {
    header
        .split(',')
        .find(|link| link.contains("rel=\"next\""))
        .and_then(|link| {
            let start = link.find('<')? + 1;
            let end = link.find('>')?;
            (start <= end).then(|| link[start..end].to_string())
        })
}

/// Sort repositories by `name`, descending when `reverse`
pub fn sort_repos_by_name(repos: &[GithubRepo], reverse: bool) -> Vec<GithubRepo> {
    sorted_by_key(repos, reverse, |repo| repo.name.as_str())
}

/// Sort repositories by `full_name`, descending when `reverse`
pub fn sort_repos_by_full_name(repos: &[GithubRepo], reverse: bool) -> Vec<GithubRepo> {
    sorted_by_key(repos, reverse, |repo| repo.full_name.as_str())
}

fn sorted_by_key<F>(repos: &[GithubRepo], reverse: bool, key: F) -> Vec<GithubRepo>
where
    F: Fn(&GithubRepo) -> &str,
{
    let mut sorted = repos.to_vec();
    sorted.sort_by(|a, b| key(a).cmp(key(b)));
    if reverse {
        sorted.reverse();
    }
    sorted
}

#[cfg(test)]
mod tests;
