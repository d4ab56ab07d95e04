// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Colour palettes applied to rendered documents.
//!
//! The named palette set is closed. Requests either select one of the named
//! palettes or supply three explicit colours; a recognized theme key always
//! takes precedence over explicit colours.

use serde::Serialize;

/// Default background colour used when none is supplied.
pub const DEFAULT_BACKGROUND: &str = "#0d1117";
/// Default text colour used when none is supplied.
pub const DEFAULT_TEXT: &str = "#c9d1d9";
/// Default accent colour used when none is supplied.
pub const DEFAULT_ACCENT: &str = "#00f7ff";

/// Built-in palette entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NamedTheme {
    /// Key used to select the palette in requests.
    pub key:        &'static str,
    /// Canvas background colour.
    pub background: &'static str,
    /// Body text colour.
    pub text:       &'static str,
    /// Accent colour used for titles and outlines.
    pub accent:     &'static str
}

/// Built-in palettes in presentation order.
pub const THEMES: &[NamedTheme] = &[
    NamedTheme {
        key:        "githubDark",
        background: "#0d1117",
        text:       "#c9d1d9",
        accent:     "#58a6ff"
    },
    NamedTheme {
        key:        "dracula",
        background: "#282a36",
        text:       "#f8f8f2",
        accent:     "#bd93f9"
    },
    NamedTheme {
        key:        "nord",
        background: "#2e3440",
        text:       "#d8dee9",
        accent:     "#88c0d0"
    },
    NamedTheme {
        key:        "solarizedDark",
        background: "#002b36",
        text:       "#93a1a1",
        accent:     "#b58900"
    },
    NamedTheme {
        key:        "catppuccinMocha",
        background: "#1e1e2e",
        text:       "#cdd6f4",
        accent:     "#cba6f7"
    },
    NamedTheme {
        key:        "tokyoNight",
        background: "#1a1b26",
        text:       "#c0caf5",
        accent:     "#7aa2f7"
    },
    NamedTheme {
        key:        "monokai",
        background: "#272822",
        text:       "#f8f8f2",
        accent:     "#f92672"
    },
    NamedTheme {
        key:        "gruvboxDark",
        background: "#282828",
        text:       "#ebdbb2",
        accent:     "#fabd2f"
    },
    NamedTheme {
        key:        "emberGlow",
        background: "#1a120c",
        text:       "#f1d8c4",
        accent:     "#ff6d1f"
    }
];

/// Looks up a built-in palette by key.
pub fn named_theme(key: &str) -> Option<&'static NamedTheme> {
    THEMES.iter().find(|theme| theme.key == key)
}

/// Background, text and accent colours used by the renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Palette {
    /// Canvas background colour.
    pub background: String,
    /// Body text colour.
    pub text:       String,
    /// Accent colour used for titles and outlines.
    pub accent:     String
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            background: DEFAULT_BACKGROUND.to_owned(),
            text:       DEFAULT_TEXT.to_owned(),
            accent:     DEFAULT_ACCENT.to_owned()
        }
    }
}

impl From<&NamedTheme> for Palette {
    fn from(theme: &NamedTheme) -> Self {
        Self {
            background: theme.background.to_owned(),
            text:       theme.text.to_owned(),
            accent:     theme.accent.to_owned()
        }
    }
}

impl Palette {
    /// Resolves the palette for a request.
    ///
    /// A recognized `theme` key wins. Otherwise each explicit colour is
    /// normalized through [`normalize_color`] with the crate defaults as
    /// fallbacks.
    ///
    /// # Examples
    ///
    /// ```
    /// use repocard::Palette;
    ///
    /// let palette = Palette::resolve(Some("dracula"), Some("ffffff"), None, None);
    /// assert_eq!(palette.background, "#282a36");
    ///
    /// let custom = Palette::resolve(None, Some("ffffff"), None, None);
    /// assert_eq!(custom.background, "#ffffff");
    /// ```
    pub fn resolve(
        theme: Option<&str>,
        background: Option<&str>,
        text: Option<&str>,
        accent: Option<&str>
    ) -> Self {
        if let Some(named) = theme.and_then(named_theme) {
            return Self::from(named);
        }

        Self {
            background: normalize_color(background, DEFAULT_BACKGROUND),
            text:       normalize_color(text, DEFAULT_TEXT),
            accent:     normalize_color(accent, DEFAULT_ACCENT)
        }
    }
}

/// Normalizes a user-supplied hex colour.
///
/// A missing `#` prefix is added. Values that are not `#` followed by 3, 4,
/// 6 or 8 hex digits are replaced by `fallback`.
pub fn normalize_color(value: Option<&str>, fallback: &str) -> String {
    let Some(raw) = value.map(str::trim).filter(|raw| !raw.is_empty()) else {
        return fallback.to_owned();
    };

    let digits = raw.strip_prefix('#').unwrap_or(raw);
    let valid = matches!(digits.len(), 3 | 4 | 6 | 8)
        && digits.chars().all(|character| character.is_ascii_hexdigit());

    if valid {
        format!("#{digits}")
    } else {
        fallback.to_owned()
    }
}
