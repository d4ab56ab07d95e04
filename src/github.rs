// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

/// GitHub REST implementation of [`RepositorySource`].
///
/// Every call goes through the raw `octocrab` request helpers so the payloads
/// decode into the small records the aggregator needs.
use std::{fmt, sync::LazyLock};

use async_trait::async_trait;
use octocrab::{Octocrab, Page};
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    error::Error,
    source::{ContributorPage, ReleaseLookup, RepositoryId, RepositorySource, RepositorySummary},
};

static LAST_PAGE: LazyLock<Regex,> =
    LazyLock::new(|| Regex::new(r"[?&]page=(\d+)",).expect("valid page pattern",),);

#[derive(Debug, Serialize,)]
struct SearchQuery<'a,>
{
    q:        &'a str,
    per_page: u8,
}

#[derive(Debug, Serialize,)]
struct ContributorQuery
{
    per_page: u8,
    anon:     &'static str,
}

#[derive(Debug, Deserialize,)]
struct SearchTotal
{
    #[serde(default)]
    total_count: u64,
}

#[derive(Debug, Deserialize,)]
struct ReleasePayload
{
    #[serde(default)]
    tag_name: Option<String,>,
    #[serde(default)]
    assets:   Vec<AssetPayload,>,
}

#[derive(Debug, Deserialize,)]
struct AssetPayload
{
    #[serde(default)]
    download_count: u64,
}

/// Repository source backed by the GitHub REST API.
#[derive(Clone,)]
pub struct GitHubSource
{
    client: Octocrab,
}

impl fmt::Debug for GitHubSource
{
    fn fmt(&self, f: &mut fmt::Formatter<'_,>,) -> fmt::Result
    {
        f.debug_struct("GitHubSource",).finish_non_exhaustive()
    }
}

impl GitHubSource
{
    /// Builds a source with an optional personal token and API base URI.
    ///
    /// Anonymous clients work but are subject to much lower rate limits.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] when the base URI is invalid or the
    /// client cannot be initialized.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use repocard::GitHubSource;
    ///
    /// # fn example() -> Result<(), repocard::Error> {
    /// let token = std::env::var("GITHUB_TOKEN",).ok();
    /// let source = GitHubSource::new(token.as_deref(), None,)?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(token: Option<&str,>, api_base: Option<&str,>,) -> Result<Self, Error,>
    {
        let mut builder = Octocrab::builder();
        if let Some(base,) = api_base {
            builder = builder.base_uri(base,).map_err(|e| {
                Error::validation(format!("invalid GitHub API base URI '{base}': {e}"),)
            },)?;
        }
        if let Some(token,) = token.filter(|value| !value.is_empty(),) {
            builder = builder.personal_token(token,);
        }

        let client = builder.build().map_err(|e| {
            Error::validation(format!("failed to initialize GitHub client: {e}"),)
        },)?;

        Ok(Self::from_client(client,),)
    }

    /// Wraps an already configured client.
    pub fn from_client(client: Octocrab,) -> Self
    {
        Self {
            client,
        }
    }
}

#[async_trait]
impl RepositorySource for GitHubSource
{
    async fn repository(&self, repository: &RepositoryId,) -> Result<RepositorySummary, Error,>
    {
        debug!("Fetching repository summary for {}", repository);

        self.client
            .get(format!("/repos/{}/{}", repository.owner, repository.name), None::<&(),>,)
            .await
            .map_err(|e| Error::upstream(format!("failed to fetch {repository}: {e}"),),)
    }

    async fn search_count(&self, query: &str,) -> Result<u64, Error,>
    {
        debug!("Searching issues with query '{}'", query);

        let parameters = SearchQuery {
            q: query, per_page: 1,
        };
        let result: SearchTotal = self
            .client
            .get("/search/issues", Some(&parameters,),)
            .await
            .map_err(|e| Error::upstream(format!("search '{query}' failed: {e}"),),)?;

        Ok(result.total_count,)
    }

    async fn contributor_page(&self, repository: &RepositoryId,) -> Result<ContributorPage, Error,>
    {
        debug!("Fetching contributor pagination for {}", repository);

        let parameters = ContributorQuery {
            per_page: 1, anon: "true",
        };
        let page: Page<serde_json::Value,> = self
            .client
            .get(
                format!("/repos/{}/{}/contributors", repository.owner, repository.name),
                Some(&parameters,),
            )
            .await
            .map_err(|e| {
                Error::upstream(format!("failed to list contributors of {repository}: {e}"),)
            },)?;

        let last = page.last.as_ref().map(ToString::to_string,);

        Ok(ContributorPage {
            last_page: last.as_deref().and_then(parse_last_page,),
            items:     page.items.len(),
        },)
    }

    async fn latest_release(&self, repository: &RepositoryId,) -> ReleaseLookup
    {
        debug!("Fetching latest release for {}", repository);

        let route = format!("/repos/{}/{}/releases/latest", repository.owner, repository.name);
        match self.client.get::<ReleasePayload, _, _,>(route, None::<&(),>,).await {
            Ok(release,) => ReleaseLookup::Found {
                tag:       release.tag_name.unwrap_or_default(),
                downloads: release.assets.iter().map(|asset| asset.download_count,).sum(),
            },
            Err(e,) => {
                debug!("No latest release for {}: {}", repository, e);
                ReleaseLookup::Absent
            }
        }
    }
}

/// Extracts the page number from a pagination link.
fn parse_last_page(link: &str,) -> Option<u64,>
{
    LAST_PAGE.captures(link,)?.get(1,)?.as_str().parse().ok()
}
