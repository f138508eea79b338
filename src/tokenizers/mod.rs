/*! Tokenizers

A [Tokenizer] splits a cleaned segment into tokens, optionally de-duplicates them,
and keeps the ones that hold at least one letter of the target [Script].

The splitting backend is picked once, through [TokenizerKind::build]:

| kind | backend |
|---|---|
| `whitespace` | Unicode whitespace |
| `rule` | whitespace, then punctuation and symbols as standalone tokens |
| `words` | UAX#29 word boundaries |
| `script-runs` | maximal runs of a single Unicode script |
!*/
mod splitters;

use std::{fmt, str::FromStr};

use itertools::Itertools;
use serde::Deserialize;

use crate::{error::Error, script::Script};
pub use splitters::{RuleBased, ScriptRuns, Splitter, Whitespace, Words};

/// Output of a tokenization.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Tokenization {
    /// number of raw tokens, before de-duplication and filtering
    pub total: usize,
    /// number of kept tokens (`tokens.len()`)
    pub filtered: usize,
    pub tokens: Vec<String>,
}

pub trait Tokenizer {
    /// Tokenizes `text`. When `unique` is set, only the first occurrence of each token is kept.
    fn tokenize(&self, text: &str, unique: bool) -> Tokenization;
    fn name(&self) -> &'static str;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TokenizerKind {
    Whitespace,
    Rule,
    Words,
    ScriptRuns,
}

impl Default for TokenizerKind {
    fn default() -> Self {
        TokenizerKind::Rule
    }
}

impl TokenizerKind {
    pub fn build(self, script: Script) -> Box<dyn Tokenizer> {
        match self {
            TokenizerKind::Whitespace => Box::new(ScriptTokenizer::new(Whitespace, script)),
            TokenizerKind::Rule => Box::new(ScriptTokenizer::new(RuleBased, script)),
            TokenizerKind::Words => Box::new(ScriptTokenizer::new(Words, script)),
            TokenizerKind::ScriptRuns => Box::new(ScriptTokenizer::new(ScriptRuns, script)),
        }
    }
}

impl FromStr for TokenizerKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "whitespace" => Ok(TokenizerKind::Whitespace),
            "rule" | "rule-based" => Ok(TokenizerKind::Rule),
            "words" => Ok(TokenizerKind::Words),
            "script-runs" => Ok(TokenizerKind::ScriptRuns),
            other => Err(Error::Config(format!(
                "unknown tokenizer {:?} (whitespace, rule, words, script-runs)",
                other
            ))),
        }
    }
}

impl fmt::Display for TokenizerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenizerKind::Whitespace => "whitespace",
            TokenizerKind::Rule => "rule",
            TokenizerKind::Words => "words",
            TokenizerKind::ScriptRuns => "script-runs",
        };
        f.write_str(name)
    }
}

/// Splitter + script filter.
#[derive(Debug, Clone)]
pub struct ScriptTokenizer<S> {
    splitter: S,
    script: Script,
}

impl<S: Splitter> ScriptTokenizer<S> {
    pub fn new(splitter: S, script: Script) -> Self {
        Self { splitter, script }
    }
}

impl<S: Splitter> Tokenizer for ScriptTokenizer<S> {
    fn tokenize(&self, text: &str, unique: bool) -> Tokenization {
        let raw = self.splitter.split(text);
        let total = raw.len();

        let kept: Vec<&str> = if unique {
            raw.into_iter().unique().collect()
        } else {
            raw
        };
        let tokens: Vec<String> = kept
            .into_iter()
            .filter(|t| self.script.has_letter(t))
            .map(String::from)
            .collect();

        Tokenization {
            total,
            filtered: tokens.len(),
            tokens,
        }
    }

    fn name(&self) -> &'static str {
        self.splitter.name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whitespace_counts() {
        let t = TokenizerKind::Whitespace.build(Script::Devanagari);
        let res = t.tokenize("यह एक वाक्य है", true);
        assert_eq!(res.total, 4);
        assert_eq!(res.filtered, 4);
        assert_eq!(res.tokens, vec!["यह", "एक", "वाक्य", "है"]);
    }

    #[test]
    fn unique_keeps_first_occurrence() {
        let t = TokenizerKind::Whitespace.build(Script::Devanagari);
        let res = t.tokenize("है यह है यह वह", true);
        assert_eq!(res.total, 5);
        assert_eq!(res.tokens, vec!["है", "यह", "वह"]);

        let res = t.tokenize("है यह है", false);
        assert_eq!(res.tokens, vec!["है", "यह", "है"]);
    }

    #[test]
    fn filters_other_scripts() {
        let t = TokenizerKind::Rule.build(Script::Devanagari);
        let res = t.tokenize("यह abc, १२ है।", true);
        assert_eq!(res.total, 6);
        assert_eq!(res.tokens, vec!["यह", "है"]);
        assert_eq!(res.filtered, 2);
    }

    #[test]
    fn parse_kind() {
        assert_eq!(
            "script-runs".parse::<TokenizerKind>().unwrap(),
            TokenizerKind::ScriptRuns
        );
        assert!("spacy".parse::<TokenizerKind>().is_err());
    }
}
