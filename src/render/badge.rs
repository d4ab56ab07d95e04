// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Compact single-column badge.
//!
//! The canvas width is fixed; the height grows by one line height per
//! requested metric.

use std::fmt::Write as _;

use super::{
    FontSizes, SVG_NAMESPACE, VisualFlags, XML_PROLOG, background_fill, escape_xml,
    filter_attribute, glow_filter, outline_stroke, scaled
};
use crate::{
    metric::{MetricValues, RequestedMetric},
    source::RepositoryId,
    theme::Palette
};

/// Fixed badge canvas width.
pub const BADGE_WIDTH: u32 = 420;
const MARGIN_X: u32 = 20;
const TITLE_TOP: u32 = 18;
const BOTTOM_MARGIN: u32 = 20;
const GLOW_DEVIATION: u32 = 3;

/// Inputs of [`render_badge`].
#[derive(Debug, Clone, Copy)]
pub struct BadgeInput<'a> {
    /// Repository shown in the title line.
    pub repository: &'a RepositoryId,
    /// Metrics in display order.
    pub metrics:    &'a [RequestedMetric],
    /// Colours applied to the badge.
    pub palette:    &'a Palette,
    /// Font sizes; re-clamped before use.
    pub fonts:      FontSizes,
    /// Decorative toggles.
    pub flags:      VisualFlags,
    /// Resolved metric values.
    pub values:     &'a MetricValues
}

/// Vertical layout of a badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BadgeGeometry {
    /// Height of one metric line.
    pub line_height:   u32,
    /// Baseline of the title line.
    pub title_y:       u32,
    /// Top of the first metric line.
    pub metrics_top:   u32,
    /// Vertical cursor after the last metric line.
    pub cursor_end:    u32,
    /// Total canvas height.
    pub height:        u32
}

impl BadgeGeometry {
    /// Computes the layout for `metric_count` lines.
    pub fn compute(fonts: FontSizes, metric_count: usize) -> Self {
        let fonts = fonts.clamped();
        let line_height = scaled(fonts.metric, 1.6).max(14);
        let title_y = TITLE_TOP + fonts.title;
        let metrics_top = title_y + scaled(fonts.metric, 1.8);
        let lines = u32::try_from(metric_count).unwrap_or(u32::MAX);
        let cursor_end = metrics_top.saturating_add(line_height.saturating_mul(lines));

        Self {
            line_height,
            title_y,
            metrics_top,
            cursor_end,
            height: cursor_end.saturating_add(BOTTOM_MARGIN)
        }
    }

    /// Baseline of the metric line at `index`.
    pub fn line_y(&self, index: usize) -> u32 {
        let index = u32::try_from(index).unwrap_or(u32::MAX);
        self.metrics_top
            .saturating_add(self.line_height.saturating_mul(index))
            .saturating_add(scaled(self.line_height, 0.5))
    }
}

/// Renders the compact badge.
///
/// # Examples
///
/// ```
/// use repocard::{
///     BadgeInput, FontSizes, MetricKey, MetricValues, Palette, RepositoryId, VisualFlags,
///     parse_metric_list, render_badge,
/// };
///
/// let repository = RepositoryId::new("octocat", "Hello-World");
/// let metrics = parse_metric_list("stars");
/// let mut values = MetricValues::new();
/// values.insert(MetricKey::Stars, "42");
///
/// let svg = render_badge(&BadgeInput {
///     repository: &repository,
///     metrics: &metrics,
///     palette: &Palette::default(),
///     fonts: FontSizes::default(),
///     flags: VisualFlags::default(),
///     values: &values,
/// });
/// assert!(svg.contains("Stars: 42"));
/// ```
pub fn render_badge(input: &BadgeInput<'_>) -> String {
    let fonts = input.fonts.clamped();
    let geometry = BadgeGeometry::compute(fonts, input.metrics.len());
    let flags = input.flags;
    let palette = input.palette;
    let title = input.repository.to_string();
    let escaped_title = escape_xml(&title);
    let accent = escape_xml(&palette.accent);
    let height = geometry.height;

    let mut buffer = String::with_capacity(1024 + input.metrics.len() * 192);

    let _ = writeln!(buffer, "{XML_PROLOG}");
    let _ = writeln!(
        buffer,
        "<svg xmlns=\"{SVG_NAMESPACE}\" role=\"img\" aria-label=\"{escaped_title}\" width=\"{BADGE_WIDTH}\" height=\"{height}\" viewBox=\"0 0 {BADGE_WIDTH} {height}\">"
    );
    let _ = writeln!(
        buffer,
        "  <style>\n    text {{ font-family: monospace; fill: {}; }}\n    .title {{ font-size: {}px; fill: {accent}; }}\n    .stat {{ font-size: {}px; }}\n  </style>",
        escape_xml(&palette.text),
        fonts.title,
        fonts.metric
    );

    if flags.glow {
        buffer.push_str("  <defs>\n");
        glow_filter(&mut buffer, GLOW_DEVIATION);
        buffer.push_str("  </defs>\n");
    }

    let _ = writeln!(
        buffer,
        "  <rect x=\"1\" y=\"1\" rx=\"12\" width=\"{}\" height=\"{}\" fill=\"{}\" stroke=\"{}\"{}/>",
        BADGE_WIDTH - 2,
        geometry.cursor_end + 10,
        background_fill(flags, &palette.background),
        outline_stroke(flags, &palette.accent),
        filter_attribute(flags)
    );
    let _ = writeln!(
        buffer,
        "  <text x=\"{MARGIN_X}\" y=\"{}\" class=\"title\" font-size=\"{}\" fill=\"{accent}\">{escaped_title}</text>",
        geometry.title_y, fonts.title
    );

    let label_x = if flags.emoji {
        MARGIN_X + scaled(fonts.metric, 1.4)
    } else {
        MARGIN_X
    };

    for (index, metric) in input.metrics.iter().enumerate() {
        let line_y = geometry.line_y(index);
        if flags.emoji {
            let _ = writeln!(
                buffer,
                "  <text x=\"{MARGIN_X}\" y=\"{line_y}\" class=\"stat emoji\" dominant-baseline=\"middle\">{}</text>",
                metric.glyph()
            );
        }
        let _ = writeln!(
            buffer,
            "  <text x=\"{label_x}\" y=\"{line_y}\" class=\"stat\" dominant-baseline=\"middle\">{}: {}</text>",
            escape_xml(metric.label()),
            escape_xml(input.values.display(metric))
        );
    }

    buffer.push_str("</svg>\n");
    buffer
}
