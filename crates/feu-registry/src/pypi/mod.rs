//! Release lists from the PyPI JSON API.

use reqwest::header::HeaderMap;
use tracing::debug;

use feu_core::error::FeuError;
use feu_core::utils::{
    filter_range_versions, filter_stable_versions, filter_valid_versions, latest_major_versions,
    latest_minor_versions, latest_version, sort_versions,
};

use crate::api::PypiProject;
use crate::client::{invalid_json, RegistryClient};
use crate::RegistryResult;

impl RegistryClient {
    /// All valid release versions of a package, ascending unless `reverse`
    pub async fn fetch_pypi_versions(&self, package: &str, reverse: bool) -> RegistryResult<Vec<String>> {
        let url = format!("{}/pypi/{}/json", self.pypi_url, package);
        let body = self.fetch_json_cached(&url, &HeaderMap::new()).await?;
        let project: PypiProject = serde_json::from_value(body).map_err(|e| invalid_json(&url, e))?;

        let releases: Vec<&String> = project.releases.keys().collect();
        let valid = filter_valid_versions(&releases);
        debug!(
            "{} has {} releases ({} valid)",
            package,
            releases.len(),
            valid.len()
        );
        sort_versions(&valid, reverse)
    }

    /// Sorted releases in `[lower, upper)`; a missing bound is unbounded
    pub async fn fetch_versions(
        &self,
        package: &str,
        lower: Option<&str>,
        upper: Option<&str>,
    ) -> RegistryResult<Vec<String>> {
        let versions = self.fetch_pypi_versions(package, false).await?;
        filter_range_versions(&versions, lower, upper)
    }

    /// Latest stable release of each major version, ascending
    pub async fn fetch_latest_major_versions(&self, package: &str, lower: Option<&str>) -> RegistryResult<Vec<String>> {
        let versions = self.fetch_stable_versions(package, lower).await?;
        latest_major_versions(&versions)
    }

    /// Latest stable release of each `major.minor` series, ascending
    pub async fn fetch_latest_minor_versions(&self, package: &str, lower: Option<&str>) -> RegistryResult<Vec<String>> {
        let versions = self.fetch_stable_versions(package, lower).await?;
        latest_minor_versions(&versions)
    }

    /// Latest stable release, falling back to pre-releases when a package
    /// has no stable release yet
    pub async fn fetch_latest_version(&self, package: &str) -> RegistryResult<String> {
        let versions = self.fetch_pypi_versions(package, false).await?;
        if versions.is_empty() {
            return Err(FeuError::InvalidArgument {
                message: format!("'{}' has no releases on PyPI", package),
            });
        }

        let stable = filter_stable_versions(&versions)?;
        if stable.is_empty() {
            latest_version(&versions)
        } else {
            latest_version(&stable)
        }
    }

    async fn fetch_stable_versions(&self, package: &str, lower: Option<&str>) -> RegistryResult<Vec<String>> {
        let versions = self.fetch_versions(package, lower, None).await?;
        filter_stable_versions(&versions)
    }
}
