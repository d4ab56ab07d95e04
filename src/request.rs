// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Normalization of incoming render parameters.
//!
//! Parameters may arrive as query pairs, as a JSON object body, or both; query
//! values win. Malformed visual input is clamped or replaced by defaults and
//! never rejected. The only hard requirement, a complete repository
//! identifier outside template mode, is checked by
//! [`RenderRequest::validate`].

use std::collections::HashMap;

use base64::{Engine as _, engine::general_purpose::STANDARD};
use serde_json::Value;
use tracing::warn;

use crate::{
    error::{Error, MISSING_REPOSITORY_MESSAGE},
    metric::{RequestedMetric, parse_metric_list},
    render::{BannerStyle, DEFAULT_METRIC_SIZE, DEFAULT_TITLE_SIZE, FontSizes, ImageRef, VisualFlags},
    source::RepositoryId,
    theme::Palette
};

/// Metrics shown by a badge when none are requested.
pub const DEFAULT_BADGE_METRICS: &str = "stars,forks,issues,watchers";
/// Slots shown by a template banner when none are requested.
pub const DEFAULT_TEMPLATE_SLOTS: &str = "stars,forks,downloads";
/// Title used by template banners without a title or repository.
pub const FALLBACK_TITLE: &str = "GitHub Project";
/// Largest decoded inline image accepted by default.
pub const DEFAULT_MAX_INLINE_IMAGE_BYTES: usize = 800_000;

/// Rendering mode selected by the `mode` parameter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum RenderMode {
    /// Compact single-column badge.
    #[default]
    Badge,
    /// Wide banner.
    Template
}

impl RenderMode {
    /// Parses the request token; anything but `template` selects the badge.
    pub fn from_token(token: &str) -> Self {
        if token.trim().eq_ignore_ascii_case("template") {
            Self::Template
        } else {
            Self::Badge
        }
    }
}

/// Raw request parameters merged from the query string and a JSON body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestParams {
    values: HashMap<String, String>
}

impl RequestParams {
    /// Merges query pairs with the fields of a JSON object body.
    ///
    /// Query pairs take precedence. JSON strings are used verbatim, numbers
    /// are stringified and booleans become `"1"`/`"0"`. Other JSON values and
    /// non-object bodies are ignored.
    ///
    /// # Examples
    ///
    /// ```
    /// use repocard::RequestParams;
    ///
    /// let body = serde_json::json!({"owner": "body", "titleSize": 20});
    /// let params = RequestParams::merge([("owner".to_owned(), "query".to_owned())], Some(&body));
    /// assert_eq!(params.get("owner"), Some("query"));
    /// assert_eq!(params.get("titleSize"), Some("20"));
    /// ```
    pub fn merge<I>(query: I, body: Option<&Value>) -> Self
    where
        I: IntoIterator<Item = (String, String)>
    {
        let mut values = HashMap::new();

        if let Some(Value::Object(fields)) = body {
            for (key, value) in fields {
                let text = match value {
                    Value::String(text) => text.clone(),
                    Value::Number(number) => number.to_string(),
                    Value::Bool(flag) => (if *flag { "1" } else { "0" }).to_owned(),
                    _ => continue
                };
                values.insert(key.clone(), text);
            }
        }

        values.extend(query);

        Self {
            values
        }
    }

    /// Returns the raw value of a parameter, including empty values.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    fn non_empty(&self, key: &str) -> Option<&str> {
        self.get(key).map(str::trim).filter(|value| !value.is_empty())
    }

    fn flag(&self, key: &str, default: bool) -> bool {
        match self.get(key) {
            Some(value) => {
                let value = value.trim();
                value == "1" || value.eq_ignore_ascii_case("true")
            }
            None => default
        }
    }

    fn integer(&self, key: &str, default: u32) -> i64 {
        self.get(key)
            .and_then(leading_integer)
            .unwrap_or(i64::from(default))
    }
}

/// Reads the integer prefix of `value`, so `"20px"` and `"16.0"` yield 20 and
/// 16. Values too large for `i64` saturate.
fn leading_integer(value: &str) -> Option<i64> {
    let value = value.trim_start();
    let (negative, rest) = match value.as_bytes().first() {
        Some(b'-') => (true, &value[1..]),
        Some(b'+') => (false, &value[1..]),
        _ => (false, value)
    };
    let end = rest
        .find(|character: char| !character.is_ascii_digit())
        .unwrap_or(rest.len());
    let digits = &rest[..end];
    if digits.is_empty() {
        return None;
    }

    let magnitude = digits.parse::<i64>().unwrap_or(i64::MAX);
    Some(if negative { -magnitude } else { magnitude })
}

/// Fully normalized render request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderRequest {
    /// Badge or template rendering.
    pub mode:       RenderMode,
    /// Repository whose metrics are shown.
    pub repository: RepositoryId,
    /// Badge metrics or template slots, depending on the mode.
    pub metrics:    Vec<RequestedMetric>,
    /// Resolved colours.
    pub palette:    Palette,
    /// Clamped font sizes.
    pub fonts:      FontSizes,
    /// Decorative toggles.
    pub flags:      VisualFlags,
    /// Banner size class; ignored by badges.
    pub style:      BannerStyle,
    /// Template title; already defaulted.
    pub title:      String,
    /// Template subtitle; empty when absent.
    pub subtitle:   String,
    /// Template logo that passed the image gate.
    pub logo:       Option<ImageRef>,
    /// Template background image that passed the image gate.
    pub background: Option<ImageRef>
}

impl RenderRequest {
    /// Normalizes raw parameters.
    ///
    /// `max_inline_image_bytes` bounds the decoded size of inline images.
    pub fn from_params(params: &RequestParams, max_inline_image_bytes: usize) -> Self {
        let mode = RenderMode::from_token(params.get("mode").unwrap_or_default());
        let repository = RepositoryId::new(
            params.get("owner").unwrap_or_default(),
            params.get("repo").unwrap_or_default()
        );

        let metrics = match mode {
            RenderMode::Badge => params.get("metrics").unwrap_or(DEFAULT_BADGE_METRICS),
            RenderMode::Template => params.get("slots").unwrap_or(DEFAULT_TEMPLATE_SLOTS)
        };

        let palette = Palette::resolve(
            params.non_empty("theme"),
            params.get("bg"),
            params.get("text"),
            params.get("accent")
        );

        let fonts = FontSizes::new(
            params.integer("titleSize", DEFAULT_TITLE_SIZE),
            params.integer("metricSize", DEFAULT_METRIC_SIZE)
        );

        let defaults = VisualFlags::default();
        let flags = VisualFlags {
            glow:                   params.flag("glow", defaults.glow),
            emoji:                  params.flag("emoji", defaults.emoji),
            transparent_background: params
                .flag("transparentBg", defaults.transparent_background),
            outline:                params.flag("outline", defaults.outline)
        };

        let title = match params.non_empty("title") {
            Some(title) => title.to_owned(),
            None if repository.is_complete() => repository.to_string(),
            None => FALLBACK_TITLE.to_owned()
        };

        Self {
            mode,
            metrics: parse_metric_list(metrics),
            palette,
            fonts,
            flags,
            style: BannerStyle::from_token(params.get("style").unwrap_or_default()),
            title,
            subtitle: params.get("subtitle").unwrap_or_default().trim().to_owned(),
            logo: image_ref(
                "logo",
                params.non_empty("logoData"),
                params.non_empty("logoUrl"),
                max_inline_image_bytes
            ),
            background: image_ref(
                "background",
                params.non_empty("bgImageData"),
                params.non_empty("bgImageUrl"),
                max_inline_image_bytes
            ),
            repository
        }
    }

    /// Checks the requirements of the selected mode.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BadRequest`] when a badge is requested without a
    /// complete repository identifier.
    pub fn validate(&self) -> Result<(), Error> {
        if self.mode == RenderMode::Badge && !self.repository.is_complete() {
            return Err(Error::bad_request(MISSING_REPOSITORY_MESSAGE));
        }
        Ok(())
    }
}

/// Selects the image reference for one image slot.
///
/// Inline data wins over a URL. References failing the type or size gate
/// are dropped with a warning.
fn image_ref(
    slot: &str,
    data: Option<&str>,
    url: Option<&str>,
    max_inline_image_bytes: usize
) -> Option<ImageRef> {
    if let Some(data) = data {
        match check_inline_image(data, max_inline_image_bytes) {
            Ok(()) => return Some(ImageRef::Inline(data.to_owned())),
            Err(reason) => warn!("Ignoring inline {} image: {}", slot, reason)
        }
    }

    let url = url?;
    if is_http_url(url) {
        Some(ImageRef::Remote(url.to_owned()))
    } else {
        warn!("Ignoring {} image URL without http(s) scheme", slot);
        None
    }
}

fn check_inline_image(data: &str, max_bytes: usize) -> Result<(), String> {
    let rest = data
        .strip_prefix("data:image/")
        .ok_or_else(|| "not an image data URL".to_owned())?;
    let (media, payload) = rest
        .split_once(',')
        .ok_or_else(|| "data URL has no payload".to_owned())?;
    let subtype = media
        .strip_suffix(";base64")
        .ok_or_else(|| "data URL is not base64 encoded".to_owned())?;

    if subtype.is_empty()
        || !subtype
            .chars()
            .all(|character| character.is_ascii_alphanumeric() || matches!(character, '+' | '-' | '.'))
    {
        return Err(format!("unsupported image type '{subtype}'"));
    }

    let decoded = STANDARD
        .decode(payload)
        .map_err(|error| format!("invalid base64 payload: {error}"))?;
    if decoded.len() > max_bytes {
        return Err(format!("{} bytes exceeds the {max_bytes} byte limit", decoded.len()));
    }

    Ok(())
}

fn is_http_url(url: &str) -> bool {
    (url.starts_with("https://") || url.starts_with("http://"))
        && !url.chars().any(char::is_whitespace)
}
