//! Target scripts.
//!
//! A [Script] knows its code point range, the characters that end a sentence,
//! and the punctuation/numerals that cleaning removes.
use std::{fmt, ops::RangeInclusive, str::FromStr};

use serde::Deserialize;
use unic_ucd::GeneralCategory;

use crate::error::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Script {
    /// Hindi
    #[serde(alias = "hi")]
    Devanagari,
    /// Urdu
    #[serde(alias = "ur")]
    Arabic,
    /// Simplified Chinese
    #[serde(alias = "zh")]
    Han,
}

impl Default for Script {
    fn default() -> Self {
        Script::Devanagari
    }
}

impl Script {
    /// Unicode code point ranges of the script.
    pub fn ranges(&self) -> &'static [RangeInclusive<u32>] {
        match self {
            Script::Devanagari => &[0x0900..=0x097F],
            Script::Arabic => &[0x0600..=0x06FF],
            Script::Han => &[0x4E00..=0x9FFF],
        }
    }

    /// Default sentence delimiters.
    pub fn delimiters(&self) -> &'static [char] {
        match self {
            Script::Devanagari => &['।', '!'],
            Script::Arabic => &['۔', '؟', '!'],
            Script::Han => &['。', '！', '？', '!'],
        }
    }

    /// Script specific punctuation, replaced by spaces on cleaning.
    pub fn punctuation(&self) -> &'static [char] {
        match self {
            Script::Devanagari => &['।', '॥', '॰'],
            Script::Arabic => &['۔', '؟', '،', '؛', '٪', '٭'],
            Script::Han => &[],
        }
    }

    /// Script specific numerals, removed on cleaning.
    pub fn numerals(&self) -> &'static [char] {
        match self {
            Script::Devanagari => &['०', '१', '२', '३', '४', '५', '६', '७', '८', '९'],
            Script::Arabic => &[
                '۰', '۱', '۲', '۳', '۴', '۵', '۶', '۷', '۸', '۹', '٠', '١', '٢', '٣', '٤', '٥', '٦',
                '٧', '٨', '٩',
            ],
            Script::Han => &['一', '二', '三', '四', '五', '六', '七', '八', '九', '零'],
        }
    }

    /// ISO 639-1 code of the language the script is used for.
    pub fn lang(&self) -> &'static str {
        match self {
            Script::Devanagari => "hi",
            Script::Arabic => "ur",
            Script::Han => "zh",
        }
    }

    #[inline]
    pub fn contains(&self, c: char) -> bool {
        let c = c as u32;
        self.ranges().iter().any(|r| r.contains(&c))
    }

    /// Returns `true` if `word` holds at least one letter of the script.
    pub fn has_letter(&self, word: &str) -> bool {
        word.chars()
            .any(|c| self.contains(c) && GeneralCategory::of(c).is_letter())
    }

    /// Returns `true` if every non-whitespace char of `word` belongs to the script.
    pub fn covers(&self, word: &str) -> bool {
        word.chars().all(|c| c.is_whitespace() || self.contains(c))
    }
}

impl FromStr for Script {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "hi" | "devanagari" => Ok(Script::Devanagari),
            "ur" | "arabic" => Ok(Script::Arabic),
            "zh" | "han" => Ok(Script::Han),
            other => Err(Error::Config(format!(
                "unknown language {:?}, choose from hi, ur and zh",
                other
            ))),
        }
    }
}

impl fmt::Display for Script {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.lang())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse() {
        assert_eq!("hi".parse::<Script>().unwrap(), Script::Devanagari);
        assert_eq!("UR".parse::<Script>().unwrap(), Script::Arabic);
        assert_eq!("han".parse::<Script>().unwrap(), Script::Han);
        assert!("fr".parse::<Script>().is_err());
    }

    #[test]
    fn letters() {
        let s = Script::Devanagari;
        assert!(s.has_letter("वाक्य"));
        assert!(!s.has_letter("hello"));
        // digits are in range but are not letters
        assert!(!s.has_letter("१२३"));
        assert!(Script::Han.has_letter("人人"));
    }

    #[test]
    fn coverage() {
        assert!(Script::Arabic.covers("یہ ایک"));
        assert!(!Script::Arabic.covers("یہ abc"));
    }
}
