//! Output language and the bilingual text type the narrative tables use.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Language of every applicant-facing string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    /// English.
    #[default]
    En,
    /// German.
    De,
}

impl Locale {
    /// ISO 639-1 code.
    pub fn code(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::De => "de",
        }
    }
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" | "english" => Ok(Self::En),
            "de" | "german" | "deutsch" => Ok(Self::De),
            other => Err(format!("unsupported language \"{other}\" (expected \"en\" or \"de\")")),
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A static string in every supported language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Localized {
    /// English text.
    pub en: &'static str,
    /// German text.
    pub de: &'static str,
}

impl Localized {
    /// Text for `locale`.
    pub const fn get(&self, locale: Locale) -> &'static str {
        match locale {
            Locale::En => self.en,
            Locale::De => self.de,
        }
    }

    /// Text for `locale` with `{name}` placeholders replaced.
    pub fn render(&self, locale: Locale, args: &[(&str, String)]) -> String {
        args.iter()
            .fold(self.get(locale).to_string(), |text, (name, value)| {
                text.replace(&format!("{{{name}}}"), value)
            })
    }
}

/// Formats a kW figure the way the locale writes decimals.
pub fn format_kw(value: f64, locale: Locale) -> String {
    let text = format!("{value:.1}");
    match locale {
        Locale::En => text,
        Locale::De => text.replace('.', ","),
    }
}
