// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Read-only repository data source consumed by the aggregator.

use std::fmt;

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::Error;

/// Repository identified by owner and name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct RepositoryId {
    /// Account owning the repository.
    pub owner: String,
    /// Repository name.
    pub name:  String
}

impl RepositoryId {
    /// Creates an identifier, trimming surrounding whitespace.
    pub fn new(owner: impl AsRef<str>, name: impl AsRef<str>) -> Self {
        Self {
            owner: owner.as_ref().trim().to_owned(),
            name:  name.as_ref().trim().to_owned()
        }
    }

    /// Returns `true` when both owner and name are present.
    pub fn is_complete(&self) -> bool {
        !self.owner.is_empty() && !self.name.is_empty()
    }
}

impl fmt::Display for RepositoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Repository summary fields used to derive the base metrics.
///
/// Field names follow the GitHub REST payload so the record can be decoded
/// directly from the `GET /repos/{owner}/{repo}` response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RepositorySummary {
    /// Star count.
    #[serde(default)]
    pub stargazers_count:  Option<u64>,
    /// Fork count.
    #[serde(default)]
    pub forks_count:       Option<u64>,
    /// Open issues and pull requests combined.
    #[serde(default)]
    pub open_issues_count: Option<u64>,
    /// Watcher count; preferred over `watchers_count`.
    #[serde(default)]
    pub subscribers_count: Option<u64>,
    /// Legacy watcher field, equal to the star count.
    #[serde(default)]
    pub watchers_count:    Option<u64>,
    /// Primary language.
    #[serde(default)]
    pub language:          Option<String>,
    /// License metadata, if detected.
    #[serde(default)]
    pub license:           Option<LicenseSummary>,
    /// Size in kilobytes.
    #[serde(default)]
    pub size:              Option<u64>,
    /// Creation timestamp (RFC 3339).
    #[serde(default)]
    pub created_at:        Option<String>,
    /// Last metadata update timestamp (RFC 3339).
    #[serde(default)]
    pub updated_at:        Option<String>,
    /// Last push timestamp (RFC 3339).
    #[serde(default)]
    pub pushed_at:         Option<String>
}

/// License block of the repository summary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LicenseSummary {
    /// SPDX identifier such as `MIT`.
    #[serde(default)]
    pub spdx_id: Option<String>
}

/// First page of a paginated contributor listing requested with one item
/// per page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContributorPage {
    /// Page number advertised by the `rel="last"` pagination link.
    pub last_page: Option<u64>,
    /// Number of items on the returned page.
    pub items:     usize
}

impl ContributorPage {
    /// Total contributors implied by the page.
    ///
    /// Without pagination metadata the item count is used, which undercounts
    /// multi-page listings but never fails.
    pub fn total(&self) -> u64 {
        self.last_page.unwrap_or(self.items as u64)
    }
}

/// Outcome of the latest-release lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReleaseLookup {
    /// A published release exists.
    Found {
        /// Release tag name. May be empty.
        tag:       String,
        /// Sum of download counts across the release assets.
        downloads: u64
    },
    /// No release exists or the lookup failed.
    Absent
}

/// Read operations the aggregator depends on.
///
/// Implementations must be safe to share across concurrent requests.
#[async_trait]
pub trait RepositorySource: Send + Sync {
    /// Fetches the repository summary.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Upstream`] when the remote call fails.
    async fn repository(&self, repository: &RepositoryId) -> Result<RepositorySummary, Error>;

    /// Returns the total number of issues or pull requests matching `query`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Upstream`] when the remote call fails.
    async fn search_count(&self, query: &str) -> Result<u64, Error>;

    /// Fetches the first page of the contributor listing, one item per page.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Upstream`] when the remote call fails.
    async fn contributor_page(&self, repository: &RepositoryId) -> Result<ContributorPage, Error>;

    /// Looks up the latest release. Never fails: lookup failures are reported
    /// as [`ReleaseLookup::Absent`].
    async fn latest_release(&self, repository: &RepositoryId) -> ReleaseLookup;
}
