//! Splitting backends.
use unic_ucd::GeneralCategory;
use unicode_script::{Script as UScript, UnicodeScript};
use unicode_segmentation::UnicodeSegmentation;

/// Splits text into raw tokens, borrowing from the input.
pub trait Splitter {
    fn split<'t>(&self, text: &'t str) -> Vec<&'t str>;
    fn name(&self) -> &'static str;
}

#[inline]
fn is_separator_mark(c: char) -> bool {
    let cat = GeneralCategory::of(c);
    cat.is_punctuation() || cat.is_symbol()
}

#[derive(Debug, Default, Clone, Copy)]
pub struct Whitespace;

impl Splitter for Whitespace {
    fn split<'t>(&self, text: &'t str) -> Vec<&'t str> {
        text.split_whitespace().collect()
    }

    fn name(&self) -> &'static str {
        "whitespace"
    }
}

/// Whitespace splitting, with punctuation and symbols emitted as standalone tokens.
#[derive(Debug, Default, Clone, Copy)]
pub struct RuleBased;

impl Splitter for RuleBased {
    fn split<'t>(&self, text: &'t str) -> Vec<&'t str> {
        let mut tokens = Vec::new();
        for chunk in text.split_whitespace() {
            let mut start = 0;
            for (idx, c) in chunk.char_indices() {
                if is_separator_mark(c) {
                    if start < idx {
                        tokens.push(&chunk[start..idx]);
                    }
                    let end = idx + c.len_utf8();
                    tokens.push(&chunk[idx..end]);
                    start = end;
                }
            }
            if start < chunk.len() {
                tokens.push(&chunk[start..]);
            }
        }
        tokens
    }

    fn name(&self) -> &'static str {
        "rule"
    }
}

/// UAX#29 words. Punctuation is dropped by the segmentation itself.
#[derive(Debug, Default, Clone, Copy)]
pub struct Words;

impl Splitter for Words {
    fn split<'t>(&self, text: &'t str) -> Vec<&'t str> {
        text.unicode_words().collect()
    }

    fn name(&self) -> &'static str {
        "words"
    }
}

/// Maximal runs of characters sharing the same Unicode script.
///
/// Whitespace, punctuation and symbols separate runs and are dropped.
/// `Common`/`Inherited` characters (digits, combining marks) extend the current run.
#[derive(Debug, Default, Clone, Copy)]
pub struct ScriptRuns;

impl Splitter for ScriptRuns {
    fn split<'t>(&self, text: &'t str) -> Vec<&'t str> {
        let mut tokens = Vec::new();
        let mut start: Option<usize> = None;
        let mut current = UScript::Common;

        for (idx, c) in text.char_indices() {
            if c.is_whitespace() || is_separator_mark(c) {
                if let Some(s) = start.take() {
                    tokens.push(&text[s..idx]);
                }
                current = UScript::Common;
                continue;
            }

            let script = c.script();
            let neutral = matches!(script, UScript::Common | UScript::Inherited);
            match start {
                None => {
                    start = Some(idx);
                    current = script;
                }
                Some(s) => {
                    if !neutral && current != script {
                        if matches!(current, UScript::Common | UScript::Inherited) {
                            // the run only held neutral chars so far, it takes this script
                            current = script;
                        } else {
                            tokens.push(&text[s..idx]);
                            start = Some(idx);
                            current = script;
                        }
                    }
                }
            }
        }
        if let Some(s) = start {
            tokens.push(&text[s..]);
        }
        tokens
    }

    fn name(&self) -> &'static str {
        "script-runs"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rule_based() {
        let res = RuleBased.split("नमस्ते, दुनिया! (hi)");
        assert_eq!(res, vec!["नमस्ते", ",", "दुनिया", "!", "(", "hi", ")"]);
    }

    #[test]
    fn words() {
        let res = Words.split("यह एक वाक्य है। hello, world");
        assert_eq!(res, vec!["यह", "एक", "वाक्य", "है", "hello", "world"]);
    }

    #[test]
    fn words_han() {
        let res = Words.split("人人生而自由");
        assert_eq!(res, vec!["人", "人", "生", "而", "自", "由"]);
    }

    #[test]
    fn script_runs() {
        let res = ScriptRuns.split("हिंदीEnglish मिश्रित, text");
        assert_eq!(res, vec!["हिंदी", "English", "मिश्रित", "text"]);
    }

    #[test]
    fn script_runs_neutral_prefix() {
        let res = ScriptRuns.split("12abc");
        assert_eq!(res, vec!["12abc"]);
    }
}
