//! Script based cleaning.
use itertools::Itertools;

use super::Cleaner;
use crate::script::Script;

/// Strips everything that is not a word character of the target script.
///
/// 1. chars outside of the script range, and script punctuation, become spaces
/// 1. ASCII digits and script numerals are removed
/// 1. whitespace runs are collapsed into a single space, and the result is trimmed
#[derive(Debug, Clone, Copy)]
pub struct ScriptCleaner {
    script: Script,
}

impl ScriptCleaner {
    pub fn new(script: Script) -> Self {
        Self { script }
    }
}

impl Cleaner for ScriptCleaner {
    fn clean(&self, text: &str) -> String {
        let numerals = self.script.numerals();
        let punctuation = self.script.punctuation();

        let mut out = String::with_capacity(text.len());
        for c in text.chars() {
            if c.is_ascii_digit() || numerals.contains(&c) {
                continue;
            }
            if !self.script.contains(c) || punctuation.contains(&c) {
                out.push(' ');
            } else {
                out.push(c);
            }
        }

        out.split_whitespace().join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hindi() {
        let c = ScriptCleaner::new(Script::Devanagari);
        assert_eq!(c.clean("  यह (एक) वाक्य है।  १२३ 45 😀 hello"), "यह एक वाक्य है");
    }

    #[test]
    fn urdu() {
        let c = ScriptCleaner::new(Script::Arabic);
        assert_eq!(c.clean("یہ، ایک ۱۲ جملہ ہے۔"), "یہ ایک جملہ ہے");
    }

    #[test]
    fn chinese() {
        let c = ScriptCleaner::new(Script::Han);
        assert_eq!(c.clean("第一條 人人, abc 生而自由"), "第條 人人 生而自由");
    }

    #[test]
    fn nothing_left() {
        let c = ScriptCleaner::new(Script::Devanagari);
        assert_eq!(c.clean("only latin 123"), "");
    }
}
