// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Request-to-SVG pipeline shared by the HTTP server and the CLI.

use std::{fmt, sync::Arc};

use tracing::{debug, instrument};

use crate::{
    aggregate::resolve,
    error::Error,
    metric::MetricValues,
    render::{
        badge::{BadgeInput, render_badge},
        template::{TemplateInput, render_template}
    },
    request::{DEFAULT_MAX_INLINE_IMAGE_BYTES, RenderMode, RenderRequest, RequestParams},
    source::RepositorySource
};

/// Renders badges and banners from normalized requests.
#[derive(Clone)]
pub struct BadgeService {
    source:                 Arc<dyn RepositorySource>,
    max_inline_image_bytes: usize
}

impl fmt::Debug for BadgeService {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("BadgeService")
            .field("max_inline_image_bytes", &self.max_inline_image_bytes)
            .finish_non_exhaustive()
    }
}

impl BadgeService {
    /// Creates a service backed by `source`.
    pub fn new(source: Arc<dyn RepositorySource>) -> Self {
        Self {
            source,
            max_inline_image_bytes: DEFAULT_MAX_INLINE_IMAGE_BYTES
        }
    }

    /// Overrides the decoded size limit for inline images.
    pub fn with_max_inline_image_bytes(mut self, limit: usize) -> Self {
        self.max_inline_image_bytes = limit;
        self
    }

    /// Normalizes raw parameters with the configured image limit.
    pub fn normalize(&self, params: &RequestParams) -> RenderRequest {
        RenderRequest::from_params(params, self.max_inline_image_bytes)
    }

    /// Normalizes and renders raw parameters.
    ///
    /// # Errors
    ///
    /// See [`BadgeService::render`].
    pub async fn render_params(&self, params: &RequestParams) -> Result<String, Error> {
        self.render(&self.normalize(params)).await
    }

    /// Renders a normalized request into an SVG document.
    ///
    /// Metrics are fetched only when the repository identifier is complete
    /// and at least one metric is requested; a template banner without a
    /// repository renders with `N/A` values.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BadRequest`] for a badge without a complete
    /// repository identifier and [`Error::Upstream`] when a required GitHub
    /// call fails.
    #[instrument(skip_all, fields(repository = %request.repository, mode = ?request.mode))]
    pub async fn render(&self, request: &RenderRequest) -> Result<String, Error> {
        request.validate()?;

        let values = if request.repository.is_complete() && !request.metrics.is_empty() {
            resolve(self.source.as_ref(), &request.repository, &request.metrics).await?
        } else {
            debug!("Rendering without remote metrics");
            MetricValues::new()
        };

        let svg = match request.mode {
            RenderMode::Badge => render_badge(&BadgeInput {
                repository: &request.repository,
                metrics:    &request.metrics,
                palette:    &request.palette,
                fonts:      request.fonts,
                flags:      request.flags,
                values:     &values
            }),
            RenderMode::Template => render_template(&TemplateInput {
                title:      &request.title,
                subtitle:   &request.subtitle,
                slots:      &request.metrics,
                palette:    &request.palette,
                fonts:      request.fonts,
                flags:      request.flags,
                logo:       request.logo.as_ref(),
                background: request.background.as_ref(),
                style:      request.style,
                values:     &values
            })
        };

        Ok(svg)
    }
}
