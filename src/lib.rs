//! SVG badges and banners built from live GitHub repository metrics.
//!
//! A request names a repository, the metrics to show and visual options. The
//! [`resolve`] aggregator fetches only the remote data those metrics need and
//! formats it for display; [`render_badge`] and [`render_template`] turn the
//! formatted values into self-contained SVG documents. [`BadgeService`] ties
//! the steps together for the HTTP server and the CLI.

mod aggregate;
mod config;
mod error;
mod format;
mod github;
mod metric;
pub mod render;
mod request;
mod server;
mod service;
mod source;
mod theme;

pub use aggregate::resolve;
pub use config::{DEFAULT_BIND, DEFAULT_CACHE_MAX_AGE, ServiceConfig};
pub use error::{
    Error, MISSING_REPOSITORY_MESSAGE, UPSTREAM_FAILURE_MESSAGE, io_error, output_error,
    server_error
};
pub use format::{format_date, format_number, format_size};
pub use github::GitHubSource;
pub use metric::{
    GENERIC_GLYPH, MetricKey, MetricValues, NOT_AVAILABLE, RequestedMetric, parse_metric_list
};
pub use render::{
    BannerStyle, FontSizes, ImageRef, VisualFlags,
    badge::{BadgeGeometry, BadgeInput, render_badge},
    template::{TemplateGeometry, TemplateInput, render_template}
};
pub use request::{
    DEFAULT_BADGE_METRICS, DEFAULT_MAX_INLINE_IMAGE_BYTES, DEFAULT_TEMPLATE_SLOTS,
    FALLBACK_TITLE, RenderMode, RenderRequest, RequestParams
};
pub use server::{AppState, configure_routes, run_server};
pub use service::BadgeService;
pub use source::{
    ContributorPage, LicenseSummary, ReleaseLookup, RepositoryId, RepositorySource,
    RepositorySummary
};
pub use theme::{NamedTheme, Palette, THEMES, named_theme, normalize_color};
