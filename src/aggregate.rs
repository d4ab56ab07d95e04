// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Resolution of requested metrics into formatted display values.
//!
//! One repository-summary call yields every base metric. Pull request,
//! issue, contributor and release metrics each cost one extra call, issued
//! only when requested and run concurrently with the summary. Only the
//! latest-release lookup is allowed to fail softly.

use tracing::{debug, info};

use crate::{
    error::Error,
    format::{format_date, format_number, format_size},
    metric::{MetricKey, MetricValues, NOT_AVAILABLE, RequestedMetric},
    source::{ReleaseLookup, RepositoryId, RepositorySource, RepositorySummary}
};

/// Resolves formatted values for the requested metrics.
///
/// Base metrics derived from the repository summary are always present in
/// the returned map. Conditional metrics (`prs`, `issues_only`,
/// `contributors`, `latest_release`, `downloads`) are present only when
/// requested. An incomplete identifier short-circuits to an empty map
/// without any remote call.
///
/// # Errors
///
/// Returns [`Error::Upstream`] when the summary, search or contributor calls
/// fail. A missing or failing latest release degrades `latest_release` to
/// `N/A` and `downloads` to `0` instead.
///
/// # Example
///
/// ```no_run
/// use repocard::{GitHubSource, RepositoryId, parse_metric_list, resolve};
///
/// # async fn example() -> Result<(), repocard::Error> {
/// let source = GitHubSource::new(None, None)?;
/// let repository = RepositoryId::new("octocat", "Hello-World");
/// let values = resolve(&source, &repository, &parse_metric_list("stars,prs")).await?;
/// println!("{values:?}");
/// # Ok(())
/// # }
/// ```
pub async fn resolve<S>(
    source: &S,
    repository: &RepositoryId,
    requested: &[RequestedMetric]
) -> Result<MetricValues, Error>
where
    S: RepositorySource + ?Sized
{
    if !repository.is_complete() {
        debug!("Skipping metric resolution for incomplete repository identifier");
        return Ok(MetricValues::new());
    }

    let needs = |key: MetricKey| requested.iter().any(|metric| metric.key() == Some(key));
    let wants_release = needs(MetricKey::LatestRelease) || needs(MetricKey::Downloads);

    let pull_request_query = format!("repo:{repository} is:pr is:open");
    let issue_query = format!("repo:{repository} is:issue is:open");

    let pull_requests = async {
        if needs(MetricKey::PullRequests) {
            source.search_count(&pull_request_query).await.map(Some)
        } else {
            Ok(None)
        }
    };
    let open_issues = async {
        if needs(MetricKey::OpenIssues) {
            source.search_count(&issue_query).await.map(Some)
        } else {
            Ok(None)
        }
    };
    let contributors = async {
        if needs(MetricKey::Contributors) {
            source
                .contributor_page(repository)
                .await
                .map(|page| Some(page.total()))
        } else {
            Ok(None)
        }
    };
    let release = async {
        if wants_release {
            Ok::<_, Error>(Some(source.latest_release(repository).await))
        } else {
            Ok(None)
        }
    };

    let (summary, pull_requests, open_issues, contributors, release) = tokio::try_join!(
        source.repository(repository),
        pull_requests,
        open_issues,
        contributors,
        release
    )?;

    let mut values = base_values(&summary);

    if let Some(count) = pull_requests {
        values.insert(MetricKey::PullRequests, format_number(count));
    }
    if let Some(count) = open_issues {
        values.insert(MetricKey::OpenIssues, format_number(count));
    }
    if let Some(count) = contributors {
        values.insert(MetricKey::Contributors, format_number(count));
    }
    if let Some(release) = release {
        let (tag, downloads) = release_values(release);
        if needs(MetricKey::LatestRelease) {
            values.insert(MetricKey::LatestRelease, tag);
        }
        if needs(MetricKey::Downloads) {
            values.insert(MetricKey::Downloads, downloads);
        }
    }

    info!("Resolved {} metric values for {}", values.len(), repository);

    Ok(values)
}

/// Derives every base metric from the repository summary.
fn base_values(summary: &RepositorySummary) -> MetricValues {
    let mut values = MetricValues::new();

    values.insert(
        MetricKey::Stars,
        format_number(summary.stargazers_count.unwrap_or(0))
    );
    values.insert(MetricKey::Forks, format_number(summary.forks_count.unwrap_or(0)));
    values.insert(
        MetricKey::Issues,
        format_number(summary.open_issues_count.unwrap_or(0))
    );
    values.insert(
        MetricKey::Watchers,
        format_number(
            summary
                .subscribers_count
                .or(summary.watchers_count)
                .unwrap_or(0)
        )
    );
    values.insert(
        MetricKey::Language,
        non_empty_or_missing(summary.language.as_deref())
    );
    values.insert(
        MetricKey::License,
        non_empty_or_missing(
            summary
                .license
                .as_ref()
                .and_then(|license| license.spdx_id.as_deref())
        )
    );
    values.insert(MetricKey::Size, format_size(summary.size.unwrap_or(0)));
    values.insert(MetricKey::Created, format_date(summary.created_at.as_deref()));
    values.insert(MetricKey::Updated, format_date(summary.updated_at.as_deref()));
    values.insert(MetricKey::LastCommit, format_date(summary.pushed_at.as_deref()));

    values
}

fn release_values(release: ReleaseLookup) -> (String, String) {
    match release {
        ReleaseLookup::Found {
            tag,
            downloads
        } => (
            non_empty_or_missing(Some(tag.as_str())),
            format_number(downloads)
        ),
        ReleaseLookup::Absent => (NOT_AVAILABLE.to_owned(), "0".to_owned())
    }
}

fn non_empty_or_missing(value: Option<&str>) -> String {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .unwrap_or(NOT_AVAILABLE)
        .to_owned()
}
