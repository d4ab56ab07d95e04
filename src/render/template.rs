// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Wide template banner with title, subtitle, optional images and metric
//! slots distributed along the bottom edge.

use std::{borrow::Cow, fmt::Write as _};

use super::{
    BannerStyle, FontSizes, ImageRef, SVG_NAMESPACE, VisualFlags, XML_PROLOG, background_fill,
    escape_xml, filter_attribute, glow_filter, outline_stroke, scaled
};
use crate::{
    metric::{MetricValues, RequestedMetric},
    theme::Palette
};

/// Slot count assumed when no slot metric is requested.
pub const DEFAULT_SLOT_COUNT: u32 = 3;
const LOGO_GAP: u32 = 20;
const CORNER_RADIUS: u32 = 24;
const GLOW_DEVIATION: u32 = 4;
const IMAGE_OVERLAY_OPACITY: &str = "0.6";

/// Inputs of [`render_template`].
#[derive(Debug, Clone, Copy)]
pub struct TemplateInput<'a> {
    /// Main title.
    pub title:      &'a str,
    /// Secondary line; omitted when empty.
    pub subtitle:   &'a str,
    /// Metrics shown in the bottom slots, in order.
    pub slots:      &'a [RequestedMetric],
    /// Colours applied to the banner.
    pub palette:    &'a Palette,
    /// Font sizes; re-clamped before use.
    pub fonts:      FontSizes,
    /// Decorative toggles.
    pub flags:      VisualFlags,
    /// Square logo drawn at the content origin.
    pub logo:       Option<&'a ImageRef>,
    /// Image filling the canvas beneath the theme overlay.
    pub background: Option<&'a ImageRef>,
    /// Canvas size class.
    pub style:      BannerStyle,
    /// Resolved metric values.
    pub values:     &'a MetricValues
}

/// Layout of a template banner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemplateGeometry {
    /// Canvas width.
    pub width:         u32,
    /// Canvas height.
    pub height:        u32,
    /// Inner margin on every edge.
    pub padding:       u32,
    /// Side length of the square logo.
    pub logo_size:     u32,
    /// Left edge of the text content.
    pub content_x:     u32,
    /// Baseline of the title.
    pub title_y:       u32,
    /// Baseline of the subtitle.
    pub subtitle_y:    u32,
    /// Subtitle font size.
    pub subtitle_size: u32,
    /// Shared baseline of every metric slot.
    pub slots_y:       u32,
    /// Horizontal distance between consecutive slots.
    pub slot_gap:      u32
}

impl TemplateGeometry {
    /// Computes the layout for the given style and slot count.
    pub fn compute(style: BannerStyle, fonts: FontSizes, has_logo: bool, slot_count: usize) -> Self {
        let fonts = fonts.clamped();
        let (width, height, padding, logo_size) = match style {
            BannerStyle::Compact => (940, 220, 28, 72),
            BannerStyle::Wide => (1200, 320, 40, 96)
        };

        let content_x = padding + if has_logo { logo_size + LOGO_GAP } else { 0 };
        let title_y = padding + fonts.title;
        let slots = match u32::try_from(slot_count) {
            Ok(0) => DEFAULT_SLOT_COUNT,
            Ok(count) => count,
            Err(_) => u32::MAX
        };

        Self {
            width,
            height,
            padding,
            logo_size,
            content_x,
            title_y,
            subtitle_y: title_y + scaled(fonts.title, 1.4),
            subtitle_size: scaled(fonts.title, 0.7).max(10),
            slots_y: height - padding - scaled(fonts.metric, 0.2),
            slot_gap: (width - content_x - padding) / slots
        }
    }

    /// Left edge of the slot at `index`.
    pub fn slot_x(&self, index: usize) -> u32 {
        let index = u32::try_from(index).unwrap_or(u32::MAX);
        self.content_x
            .saturating_add(self.slot_gap.saturating_mul(index))
    }
}

/// Renders the template banner.
///
/// The theme-coloured overlay is opaque unless a background image is
/// supplied, in which case it is drawn at 60% opacity so the image shows
/// through.
pub fn render_template(input: &TemplateInput<'_>) -> String {
    let fonts = input.fonts.clamped();
    let flags = input.flags;
    let palette = input.palette;
    let geometry =
        TemplateGeometry::compute(input.style, fonts, input.logo.is_some(), input.slots.len());
    let TemplateGeometry {
        width,
        height,
        padding,
        logo_size,
        content_x,
        ..
    } = geometry;
    let escaped_title = escape_xml(input.title);

    let mut buffer = String::with_capacity(2048 + input.slots.len() * 192);

    let _ = writeln!(buffer, "{XML_PROLOG}");
    let _ = writeln!(
        buffer,
        "<svg xmlns=\"{SVG_NAMESPACE}\" role=\"img\" aria-label=\"{escaped_title}\" width=\"{width}\" height=\"{height}\" viewBox=\"0 0 {width} {height}\">"
    );
    let _ = writeln!(
        buffer,
        "  <style>\n    text {{ font-family: \"Iceland\", monospace; fill: {text}; }}\n    .title {{ font-size: {}px; font-weight: 700; fill: {accent}; }}\n    .subtitle {{ font-size: {}px; fill: {text}; }}\n    .metric {{ font-size: {}px; }}\n  </style>",
        fonts.title,
        geometry.subtitle_size,
        fonts.metric,
        text = escape_xml(&palette.text),
        accent = escape_xml(&palette.accent)
    );

    if flags.glow || input.background.is_some() {
        buffer.push_str("  <defs>\n");
        if flags.glow {
            glow_filter(&mut buffer, GLOW_DEVIATION);
        }
        if let Some(image) = input.background {
            let _ = writeln!(
                buffer,
                "    <pattern id=\"bgImage\" patternUnits=\"objectBoundingBox\" width=\"1\" height=\"1\">\n      <image href=\"{}\" x=\"0\" y=\"0\" width=\"{width}\" height=\"{height}\" preserveAspectRatio=\"xMidYMid slice\"/>\n    </pattern>",
                escape_xml(image.href())
            );
        }
        buffer.push_str("  </defs>\n");
    }

    let theme_fill = background_fill(flags, &palette.background);
    let base_fill = if input.background.is_some() {
        Cow::Borrowed("url(#bgImage)")
    } else {
        theme_fill.clone()
    };
    let overlay_opacity = if input.background.is_some() {
        IMAGE_OVERLAY_OPACITY
    } else {
        "1"
    };

    let _ = writeln!(
        buffer,
        "  <rect x=\"0\" y=\"0\" width=\"{width}\" height=\"{height}\" rx=\"{CORNER_RADIUS}\" fill=\"{base_fill}\"/>"
    );
    let _ = writeln!(
        buffer,
        "  <rect x=\"0\" y=\"0\" width=\"{width}\" height=\"{height}\" rx=\"{CORNER_RADIUS}\" fill=\"{theme_fill}\" opacity=\"{overlay_opacity}\" stroke=\"{}\"{}/>",
        outline_stroke(flags, &palette.accent),
        filter_attribute(flags)
    );

    if let Some(logo) = input.logo {
        let _ = writeln!(
            buffer,
            "  <image href=\"{}\" x=\"{padding}\" y=\"{padding}\" width=\"{logo_size}\" height=\"{logo_size}\" preserveAspectRatio=\"xMidYMid meet\"/>",
            escape_xml(logo.href())
        );
    }

    let _ = writeln!(
        buffer,
        "  <text x=\"{content_x}\" y=\"{}\" class=\"title\" fill=\"{}\">{escaped_title}</text>",
        geometry.title_y,
        escape_xml(&palette.accent)
    );
    if !input.subtitle.is_empty() {
        let _ = writeln!(
            buffer,
            "  <text x=\"{content_x}\" y=\"{}\" class=\"subtitle\">{}</text>",
            geometry.subtitle_y,
            escape_xml(input.subtitle)
        );
    }

    for (index, metric) in input.slots.iter().enumerate() {
        let icon = if flags.emoji {
            format!("{} ", metric.glyph())
        } else {
            String::new()
        };
        let _ = writeln!(
            buffer,
            "  <g transform=\"translate({}, {})\">\n    <text class=\"metric\" y=\"0\" dominant-baseline=\"middle\">{icon}{}: {}</text>\n  </g>",
            geometry.slot_x(index),
            geometry.slots_y,
            escape_xml(metric.label()),
            escape_xml(input.values.display(metric))
        );
    }

    buffer.push_str("</svg>\n");
    buffer
}

#[cfg(test)]
mod tests {
    use std::sync::LazyLock;

    use proptest::prelude::*;
    use regex::Regex;

    use super::*;
    use crate::metric::{MetricKey, parse_metric_list};

    static TRANSLATE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"translate\((\d+), (\d+)\)").expect("valid pattern"));

    fn slot_positions(svg: &str) -> Vec<(u32, u32)> {
        TRANSLATE
            .captures_iter(svg)
            .map(|captures| {
                (
                    captures[1].parse().expect("numeric x"),
                    captures[2].parse().expect("numeric y")
                )
            })
            .collect()
    }

    fn render_with(
        slots: &[RequestedMetric],
        style: BannerStyle,
        flags: VisualFlags,
        logo: Option<&ImageRef>,
        background: Option<&ImageRef>,
        values: &MetricValues
    ) -> String {
        render_template(&TemplateInput {
            title: "octocat/Hello-World",
            subtitle: "",
            slots,
            palette: &Palette::default(),
            fonts: FontSizes::default(),
            flags,
            logo,
            background,
            style,
            values
        })
    }

    #[test]
    fn compact_geometry_without_logo() {
        let geometry = TemplateGeometry::compute(BannerStyle::Compact, FontSizes::default(), false, 3);
        assert_eq!((geometry.width, geometry.height), (940, 220));
        assert_eq!(geometry.content_x, 28);
        assert_eq!(geometry.title_y, 42);
        assert_eq!(geometry.subtitle_y, 42 + 20);
        assert_eq!(geometry.subtitle_size, 10);
        assert_eq!(geometry.slots_y, 220 - 28 - 2);
        assert_eq!(geometry.slot_gap, (940 - 28 - 28) / 3);
    }

    #[test]
    fn wide_geometry_with_logo_offsets_content() {
        let geometry = TemplateGeometry::compute(BannerStyle::Wide, FontSizes::default(), true, 2);
        assert_eq!((geometry.width, geometry.height), (1200, 320));
        assert_eq!(geometry.content_x, 40 + 96 + 20);
        assert_eq!(geometry.slot_gap, (1200 - 156 - 40) / 2);
    }

    #[test]
    fn empty_slot_list_uses_default_spacing() {
        let geometry = TemplateGeometry::compute(BannerStyle::Wide, FontSizes::default(), false, 0);
        assert_eq!(geometry.slot_gap, (1200 - 80) / DEFAULT_SLOT_COUNT);
    }

    #[test]
    fn title_rule_uses_accent_colour() {
        let palette = Palette::resolve(None, None, Some("#123456"), Some("#abcdef"));
        let svg = render_template(&TemplateInput {
            title:      "Banner",
            subtitle:   "",
            slots:      &[],
            palette:    &palette,
            fonts:      FontSizes::default(),
            flags:      VisualFlags::default(),
            logo:       None,
            background: None,
            style:      BannerStyle::Wide,
            values:     &MetricValues::new()
        });

        let title_rule = svg
            .lines()
            .find(|line| line.trim_start().starts_with(".title {"))
            .expect("title rule");
        assert!(title_rule.contains("fill: #abcdef;"));
        assert!(svg.contains("text { font-family: \"Iceland\", monospace; fill: #123456; }"));
    }

    #[test]
    fn compact_banner_renders_zero_downloads() {
        let slots = parse_metric_list("stars,forks,downloads");
        let values: MetricValues = [
            (MetricKey::Stars, "10".to_owned()),
            (MetricKey::Forks, "2".to_owned()),
            (MetricKey::Downloads, "0".to_owned())
        ]
        .into_iter()
        .collect();

        let svg = render_with(
            &slots,
            BannerStyle::Compact,
            VisualFlags::default(),
            None,
            None,
            &values
        );

        assert!(svg.contains("Downloads: 0</text>"));
        assert!(svg.contains("width=\"940\" height=\"220\""));
        assert_eq!(slot_positions(&svg).len(), 3);
    }

    #[test]
    fn subtitle_is_rendered_only_when_present() {
        let values = MetricValues::new();
        let slots = parse_metric_list("stars");
        let without = render_with(
            &slots,
            BannerStyle::Wide,
            VisualFlags::default(),
            None,
            None,
            &values
        );
        assert!(!without.contains("class=\"subtitle\""));

        let with = render_template(&TemplateInput {
            title:      "Title",
            subtitle:   "Fast & small",
            slots:      &slots,
            palette:    &Palette::default(),
            fonts:      FontSizes::default(),
            flags:      VisualFlags::default(),
            logo:       None,
            background: None,
            style:      BannerStyle::Wide,
            values:     &values
        });
        assert!(with.contains("<text x=\"40\" y=\"74\" class=\"subtitle\">Fast &amp; small</text>"));
    }

    #[test]
    fn overlay_is_opaque_without_background_image() {
        let values = MetricValues::new();
        let svg = render_with(&[], BannerStyle::Wide, VisualFlags::default(), None, None, &values);
        assert!(svg.contains("opacity=\"1\""));
        assert!(!svg.contains("bgImage"));
    }

    #[test]
    fn overlay_is_translucent_over_background_image() {
        let values = MetricValues::new();
        let image = ImageRef::Remote("https://example.com/bg.png?a=1&b=2".to_owned());
        let svg = render_with(
            &[],
            BannerStyle::Wide,
            VisualFlags::default(),
            None,
            Some(&image),
            &values
        );

        assert!(svg.contains("opacity=\"0.6\""));
        assert!(svg.contains("fill=\"url(#bgImage)\""));
        assert!(svg.contains("href=\"https://example.com/bg.png?a=1&amp;b=2\""));
        assert!(svg.contains("preserveAspectRatio=\"xMidYMid slice\""));
    }

    #[test]
    fn logo_is_drawn_at_content_origin() {
        let values = MetricValues::new();
        let logo = ImageRef::Inline("data:image/png;base64,iVBORw0KGgo=".to_owned());
        let svg = render_with(
            &parse_metric_list("stars"),
            BannerStyle::Compact,
            VisualFlags::default(),
            Some(&logo),
            None,
            &values
        );

        assert!(svg.contains(
            "<image href=\"data:image/png;base64,iVBORw0KGgo=\" x=\"28\" y=\"28\" width=\"72\" height=\"72\" preserveAspectRatio=\"xMidYMid meet\"/>"
        ));
        assert!(svg.contains("<text x=\"120\" y=\"42\" class=\"title\""));
    }

    #[test]
    fn emoji_flag_prefixes_slot_text() {
        let values = MetricValues::new();
        let slots = parse_metric_list("foo");
        let svg = render_with(
            &slots,
            BannerStyle::Wide,
            VisualFlags::default(),
            None,
            None,
            &values
        );
        assert!(svg.contains(">• foo: N/A</text>"));

        let flags = VisualFlags {
            emoji: false,
            ..VisualFlags::default()
        };
        let plain = render_with(&slots, BannerStyle::Wide, flags, None, None, &values);
        assert!(plain.contains(">foo: N/A</text>"));
    }

    #[test]
    fn transparency_changes_only_fill_attributes() {
        let values = MetricValues::new();
        let slots = parse_metric_list("stars,forks");
        let opaque = render_with(
            &slots,
            BannerStyle::Wide,
            VisualFlags::default(),
            None,
            None,
            &values
        );
        let transparent = render_with(
            &slots,
            BannerStyle::Wide,
            VisualFlags {
                transparent_background: true,
                ..VisualFlags::default()
            },
            None,
            None,
            &values
        );

        let background = &Palette::default().background;
        assert_eq!(
            opaque.replace(&format!("fill=\"{background}\""), "fill=\"none\""),
            transparent
        );
    }

    #[test]
    fn rendering_is_deterministic() {
        let values = MetricValues::new();
        let slots = parse_metric_list("stars,forks,downloads");
        let first = render_with(&slots, BannerStyle::Wide, VisualFlags::default(), None, None, &values);
        let second = render_with(&slots, BannerStyle::Wide, VisualFlags::default(), None, None, &values);
        assert_eq!(first, second);
    }

    proptest! {
        #[test]
        fn slots_are_evenly_spaced_on_one_baseline(
            count in 1usize..8,
            compact in any::<bool>(),
            has_logo in any::<bool>()
        ) {
            let style = if compact { BannerStyle::Compact } else { BannerStyle::Wide };
            let slots = vec![RequestedMetric::from_token("stars"); count];
            let logo = ImageRef::Remote("https://example.com/logo.png".to_owned());
            let values = MetricValues::new();
            let svg = render_with(
                &slots,
                style,
                VisualFlags::default(),
                has_logo.then_some(&logo),
                None,
                &values
            );

            let geometry = TemplateGeometry::compute(style, FontSizes::default(), has_logo, count);
            let positions = slot_positions(&svg);
            let gap = (geometry.width - geometry.content_x - geometry.padding) / count as u32;

            prop_assert_eq!(positions.len(), count);
            prop_assert_eq!(positions[count - 1].0, geometry.content_x + gap * (count as u32 - 1));
            prop_assert!(positions.iter().all(|(_, y)| *y == positions[0].1));
        }
    }
}
