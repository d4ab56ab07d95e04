// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Metric keys, their display labels and decorative glyphs.
//!
//! The label and glyph tables are fixed at compile time. Tokens that do not
//! name a known metric are preserved as [`RequestedMetric::Unknown`] so the
//! renderer can still display them with the raw token as label.

use std::fmt;

use indexmap::IndexMap;
use serde::Serialize;

/// Value rendered for metrics that could not be resolved.
pub const NOT_AVAILABLE: &str = "N/A";
/// Glyph used for tokens without a dedicated glyph.
pub const GENERIC_GLYPH: &str = "•";

/// Repository statistic that can be displayed on a badge or banner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKey {
    /// Stargazer count.
    Stars,
    /// Fork count.
    Forks,
    /// Open issues and pull requests as reported by the repository summary.
    Issues,
    /// Subscriber count.
    Watchers,
    /// Primary language.
    Language,
    /// Open pull requests.
    #[serde(rename = "prs")]
    PullRequests,
    /// Open issues excluding pull requests.
    #[serde(rename = "issues_only")]
    OpenIssues,
    /// Total contributors, anonymous ones included.
    Contributors,
    /// Tag of the latest release.
    LatestRelease,
    /// Date of the last push.
    LastCommit,
    /// SPDX license identifier.
    License,
    /// Repository size in kilobytes.
    Size,
    /// Creation date.
    Created,
    /// Last update date.
    Updated,
    /// Download total across the latest release assets.
    Downloads
}

impl MetricKey {
    /// Every metric key in canonical order.
    pub const ALL: [MetricKey; 15] = [
        MetricKey::Stars,
        MetricKey::Forks,
        MetricKey::Issues,
        MetricKey::Watchers,
        MetricKey::Language,
        MetricKey::PullRequests,
        MetricKey::OpenIssues,
        MetricKey::Contributors,
        MetricKey::LatestRelease,
        MetricKey::LastCommit,
        MetricKey::License,
        MetricKey::Size,
        MetricKey::Created,
        MetricKey::Updated,
        MetricKey::Downloads
    ];

    /// Keys derived from the repository summary without extra remote calls.
    pub const BASE: [MetricKey; 10] = [
        MetricKey::Stars,
        MetricKey::Forks,
        MetricKey::Issues,
        MetricKey::Watchers,
        MetricKey::Language,
        MetricKey::License,
        MetricKey::Size,
        MetricKey::Created,
        MetricKey::Updated,
        MetricKey::LastCommit
    ];

    /// Returns the request token identifying the key.
    pub const fn token(self) -> &'static str {
        match self {
            Self::Stars => "stars",
            Self::Forks => "forks",
            Self::Issues => "issues",
            Self::Watchers => "watchers",
            Self::Language => "language",
            Self::PullRequests => "prs",
            Self::OpenIssues => "issues_only",
            Self::Contributors => "contributors",
            Self::LatestRelease => "latest_release",
            Self::LastCommit => "last_commit",
            Self::License => "license",
            Self::Size => "size",
            Self::Created => "created",
            Self::Updated => "updated",
            Self::Downloads => "downloads"
        }
    }

    /// Returns the human label shown before the value.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Stars => "Stars",
            Self::Forks => "Forks",
            Self::Issues => "Issues",
            Self::Watchers => "Watchers",
            Self::Language => "Language",
            Self::PullRequests => "Open PRs",
            Self::OpenIssues => "Open Issues",
            Self::Contributors => "Contributors",
            Self::LatestRelease => "Latest release",
            Self::LastCommit => "Last commit",
            Self::License => "License",
            Self::Size => "Size",
            Self::Created => "Created",
            Self::Updated => "Updated",
            Self::Downloads => "Downloads"
        }
    }

    /// Returns the decorative glyph drawn when glyphs are enabled.
    pub const fn glyph(self) -> &'static str {
        match self {
            Self::Stars => "⭐",
            Self::Forks => "🍴",
            Self::Issues => "🐞",
            Self::Watchers => "👀",
            Self::Language => "🧠",
            Self::PullRequests => "🔀",
            Self::OpenIssues => "🧩",
            Self::Contributors => "👥",
            Self::LatestRelease => "🏷️",
            Self::LastCommit => "🕒",
            Self::License => "📄",
            Self::Size => "📦",
            Self::Created => "📆",
            Self::Updated => "📝",
            Self::Downloads => "⬇️"
        }
    }

    /// Looks up the key matching a request token.
    pub fn from_token(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|key| key.token() == token)
    }
}

impl fmt::Display for MetricKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Metric token as it appeared in a request.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RequestedMetric {
    /// Token naming one of the supported metrics.
    Known(MetricKey),
    /// Token the renderer does not recognize. Rendered with the raw token.
    Unknown(String)
}

impl RequestedMetric {
    /// Classifies a single trimmed token.
    pub fn from_token(token: &str) -> Self {
        match MetricKey::from_token(token) {
            Some(key) => Self::Known(key),
            None => Self::Unknown(token.to_owned())
        }
    }

    /// Label displayed for the metric, falling back to the raw token.
    pub fn label(&self) -> &str {
        match self {
            Self::Known(key) => key.label(),
            Self::Unknown(token) => token.as_str()
        }
    }

    /// Glyph displayed for the metric, falling back to [`GENERIC_GLYPH`].
    pub fn glyph(&self) -> &'static str {
        match self {
            Self::Known(key) => key.glyph(),
            Self::Unknown(_) => GENERIC_GLYPH
        }
    }

    /// Returns the known key, if any.
    pub fn key(&self) -> Option<MetricKey> {
        match self {
            Self::Known(key) => Some(*key),
            Self::Unknown(_) => None
        }
    }
}

/// Splits a comma separated list of metric tokens.
///
/// Whitespace around tokens is trimmed and empty entries are skipped. Order
/// and duplicates are preserved.
///
/// # Examples
///
/// ```
/// use repocard::{MetricKey, RequestedMetric, parse_metric_list};
///
/// let metrics = parse_metric_list(" stars, ,foo");
/// assert_eq!(metrics, vec![
///     RequestedMetric::Known(MetricKey::Stars),
///     RequestedMetric::Unknown("foo".to_owned()),
/// ]);
/// ```
pub fn parse_metric_list(value: &str) -> Vec<RequestedMetric> {
    value
        .split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(RequestedMetric::from_token)
        .collect()
}

/// Formatted metric values keyed by metric, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct MetricValues {
    values: IndexMap<MetricKey, String>
}

impl MetricValues {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a formatted value, replacing any previous one.
    pub fn insert(&mut self, key: MetricKey, value: impl Into<String>) {
        self.values.insert(key, value.into());
    }

    /// Returns the stored value for a key.
    pub fn get(&self, key: MetricKey) -> Option<&str> {
        self.values.get(&key).map(String::as_str)
    }

    /// Returns the display value for a requested metric, `N/A` when absent.
    pub fn display(&self, metric: &RequestedMetric) -> &str {
        metric
            .key()
            .and_then(|key| self.get(key))
            .unwrap_or(NOT_AVAILABLE)
    }

    /// Iterates over stored keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = MetricKey> + '_ {
        self.values.keys().copied()
    }

    /// Number of stored values.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` when no value is stored.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl FromIterator<(MetricKey, String)> for MetricValues {
    fn from_iter<I: IntoIterator<Item = (MetricKey, String)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_round_trip_through_lookup() {
        for key in MetricKey::ALL {
            assert_eq!(MetricKey::from_token(key.token()), Some(key));
        }
    }

    #[test]
    fn labels_match_display_table() {
        assert_eq!(MetricKey::PullRequests.label(), "Open PRs");
        assert_eq!(MetricKey::OpenIssues.label(), "Open Issues");
        assert_eq!(MetricKey::LatestRelease.label(), "Latest release");
        assert_eq!(MetricKey::LastCommit.label(), "Last commit");
    }

    #[test]
    fn unknown_token_falls_back_to_raw_label_and_generic_glyph() {
        let metric = RequestedMetric::from_token("foo");
        assert_eq!(metric.label(), "foo");
        assert_eq!(metric.glyph(), GENERIC_GLYPH);
        assert_eq!(metric.key(), None);
    }

    #[test]
    fn parse_metric_list_preserves_order_and_duplicates() {
        let metrics = parse_metric_list("forks,stars , forks");
        let tokens: Vec<&str> = metrics.iter().map(RequestedMetric::label).collect();
        assert_eq!(tokens, vec!["Forks", "Stars", "Forks"]);
    }

    #[test]
    fn parse_metric_list_handles_empty_input() {
        assert!(parse_metric_list("").is_empty());
        assert!(parse_metric_list(" , ,").is_empty());
    }

    #[test]
    fn display_defaults_to_not_available() {
        let mut values = MetricValues::new();
        values.insert(MetricKey::Stars, "1,024");

        assert_eq!(values.display(&RequestedMetric::Known(MetricKey::Stars)), "1,024");
        assert_eq!(values.display(&RequestedMetric::Known(MetricKey::Forks)), NOT_AVAILABLE);
        assert_eq!(
            values.display(&RequestedMetric::Unknown("foo".to_owned())),
            NOT_AVAILABLE
        );
    }

    #[test]
    fn values_serialize_with_tokens_in_insertion_order() {
        let values: MetricValues = [
            (MetricKey::PullRequests, "3".to_owned()),
            (MetricKey::Stars, "10".to_owned())
        ]
        .into_iter()
        .collect();

        let json = serde_json::to_string(&values).expect("serialization failed");
        assert_eq!(json, r#"{"prs":"3","stars":"10"}"#);
    }
}
