// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! SVG layout and rendering.
//!
//! Two modes are supported: the compact single-column [`badge`] and the wide
//! [`template`] banner. Both are pure functions of their inputs and produce a
//! complete, well-formed SVG document including the XML prolog.

pub mod badge;
pub mod template;

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Smallest accepted title font size.
pub const MIN_TITLE_SIZE: u32 = 10;
/// Largest accepted title font size.
pub const MAX_TITLE_SIZE: u32 = 32;
/// Smallest accepted metric font size.
pub const MIN_METRIC_SIZE: u32 = 9;
/// Largest accepted metric font size.
pub const MAX_METRIC_SIZE: u32 = 24;
/// Title font size used when the request does not specify one.
pub const DEFAULT_TITLE_SIZE: u32 = 14;
/// Metric font size used when the request does not specify one.
pub const DEFAULT_METRIC_SIZE: u32 = 12;

const XML_PROLOG: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>";
const SVG_NAMESPACE: &str = "http://www.w3.org/2000/svg";
const TRANSPARENT_FILL: &str = "none";

/// Font sizes in SVG user units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FontSizes {
    /// Title font size.
    pub title:  u32,
    /// Metric line font size.
    pub metric: u32
}

impl Default for FontSizes {
    fn default() -> Self {
        Self {
            title:  DEFAULT_TITLE_SIZE,
            metric: DEFAULT_METRIC_SIZE
        }
    }
}

impl FontSizes {
    /// Builds font sizes clamped to the supported ranges.
    pub fn new(title: i64, metric: i64) -> Self {
        Self {
            title:  clamp_size(title, MIN_TITLE_SIZE, MAX_TITLE_SIZE),
            metric: clamp_size(metric, MIN_METRIC_SIZE, MAX_METRIC_SIZE)
        }
    }

    /// Returns a copy with both sizes forced back into range.
    pub fn clamped(self) -> Self {
        Self::new(i64::from(self.title), i64::from(self.metric))
    }
}

fn clamp_size(value: i64, min: u32, max: u32) -> u32 {
    // Bounds are small; the clamped value always fits in u32.
    value.clamp(i64::from(min), i64::from(max)) as u32
}

/// Decorative toggles shared by both modes.
///
/// None of the flags changes layout geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VisualFlags {
    /// Attach a gaussian-blur glow filter to the background shape.
    pub glow:                   bool,
    /// Prefix metric labels with their glyph.
    pub emoji:                  bool,
    /// Leave the background unfilled.
    pub transparent_background: bool,
    /// Stroke the background shape with the accent colour.
    pub outline:                bool
}

impl Default for VisualFlags {
    fn default() -> Self {
        Self {
            glow:                   false,
            emoji:                  true,
            transparent_background: false,
            outline:                true
        }
    }
}

/// Canvas size class of the template banner.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BannerStyle {
    /// 1200×320 canvas.
    #[default]
    Wide,
    /// 940×220 canvas.
    Compact
}

impl BannerStyle {
    /// Parses the request token; anything but `compact` selects the wide
    /// banner.
    pub fn from_token(token: &str) -> Self {
        if token.trim().eq_ignore_ascii_case("compact") {
            Self::Compact
        } else {
            Self::Wide
        }
    }
}

/// Image embedded in a template banner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageRef {
    /// Image carried inline as a `data:` URL.
    Inline(String),
    /// Image referenced by an external `http(s)` URL.
    Remote(String)
}

impl ImageRef {
    /// Value placed in the `href` attribute.
    pub fn href(&self) -> &str {
        match self {
            Self::Inline(data) => data,
            Self::Remote(url) => url
        }
    }
}

/// Escapes text for use in XML character data and attribute values.
pub(crate) fn escape_xml(value: &str) -> Cow<'_, str> {
    if value
        .chars()
        .any(|character| matches!(character, '&' | '<' | '>' | '\"' | '\''))
    {
        let mut escaped = String::with_capacity(value.len());
        for character in value.chars() {
            match character {
                '&' => escaped.push_str("&amp;"),
                '<' => escaped.push_str("&lt;"),
                '>' => escaped.push_str("&gt;"),
                '\"' => escaped.push_str("&quot;"),
                '\'' => escaped.push_str("&apos;"),
                other => escaped.push(other)
            }
        }
        Cow::Owned(escaped)
    } else {
        Cow::Borrowed(value)
    }
}

/// Rounds `value * factor` half away from zero.
pub(crate) fn scaled(value: u32, factor: f64) -> u32 {
    (f64::from(value) * factor).round() as u32
}

/// Writes the glow filter definition.
fn glow_filter(buffer: &mut String, deviation: u32) {
    use std::fmt::Write as _;

    let _ = writeln!(
        buffer,
        "    <filter id=\"glow\">\n      <feGaussianBlur stdDeviation=\"{deviation}\" result=\"blur\"/>\n      <feMerge>\n        <feMergeNode in=\"blur\"/>\n        <feMergeNode in=\"SourceGraphic\"/>\n      </feMerge>\n    </filter>"
    );
}

fn background_fill<'a>(flags: VisualFlags, colour: &'a str) -> Cow<'a, str> {
    if flags.transparent_background {
        Cow::Borrowed(TRANSPARENT_FILL)
    } else {
        escape_xml(colour)
    }
}

fn outline_stroke<'a>(flags: VisualFlags, accent: &'a str) -> Cow<'a, str> {
    if flags.outline {
        escape_xml(accent)
    } else {
        Cow::Borrowed("none")
    }
}

fn filter_attribute(flags: VisualFlags) -> &'static str {
    if flags.glow { " filter=\"url(#glow)\"" } else { "" }
}
