/*! Segment cleaning

Cleaners are pure `text -> text` functions applied to each segment before it is written to the intermediate file.

- [ScriptCleaner] keeps the characters of a target [crate::script::Script] only.
- [Passthrough] leaves text untouched, for already clean corpora.
!*/
mod script_cleaner;

pub use script_cleaner::ScriptCleaner;

/// Normalizes a segment. Implementations must be deterministic.
pub trait Cleaner {
    fn clean(&self, text: &str) -> String;
}

/// No-op cleaner.
#[derive(Debug, Default, Clone, Copy)]
pub struct Passthrough;

impl Cleaner for Passthrough {
    fn clean(&self, text: &str) -> String {
        text.to_string()
    }
}
