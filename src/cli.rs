//! Command line arguments and parameters management/parsing.
use std::path::PathBuf;

use structopt::StructOpt;

use crate::{config::Config, error::Error, script::Script, tokenizers::TokenizerKind};

#[derive(Debug, StructOpt)]
#[structopt(name = "vocabulist", about = "deduplicated vocabulary builder.")]
/// Holds every command that is callable by the `vocabulist` command.
pub enum Vocabulist {
    #[structopt(about = "Split a raw corpus into cleaned segments (pass 1)")]
    Segment(Segment),
    #[structopt(about = "Build the vocabulary of a segment file (pass 2)")]
    Build(Build),
    #[structopt(about = "Dump a store to a text or CSV file")]
    Dump(Dump),
    #[structopt(about = "Load a text or CSV dump into a store")]
    Recover(Recover),
    #[structopt(about = "Copy a store")]
    Backup(Backup),
    #[structopt(about = "Compute the size of a store")]
    Size(Size),
    #[structopt(about = "Write the length of each single-word token")]
    Lengths(Lengths),
    #[structopt(about = "Remove tokens holding characters outside of the script")]
    Purge(Purge),
    #[structopt(about = "Extract random lines of a segment file")]
    Sample(Sample),
    #[structopt(about = "Delete a store")]
    Destroy(Destroy),
}

/// Options shared by every command.
#[derive(Debug, StructOpt)]
pub struct Common {
    #[structopt(
        parse(from_os_str),
        long = "config",
        help = "JSON configuration file. Flags override its values."
    )]
    pub config: Option<PathBuf>,
    #[structopt(long = "lang", help = "target language (hi, ur, zh)")]
    pub lang: Option<Script>,
    #[structopt(
        long = "tokenizer",
        help = "tokenizer (whitespace, rule, words, script-runs)"
    )]
    pub tokenizer: Option<TokenizerKind>,
    #[structopt(long = "batch-size", help = "number of units per write batch")]
    pub batch_size: Option<usize>,
}

impl Common {
    /// Builds the run configuration: defaults, then the configuration file, then flags.
    pub fn config(&self) -> Result<Config, Error> {
        let mut config = match &self.config {
            Some(path) => Config::from_path(path)?,
            None => Config::default(),
        };
        if let Some(script) = self.lang {
            config.script = script;
        }
        if let Some(tokenizer) = self.tokenizer {
            config.tokenizer = tokenizer;
        }
        if let Some(batch_size) = self.batch_size {
            config.batch_size = batch_size;
        }
        config.validate()?;
        Ok(config)
    }
}

#[derive(Debug, StructOpt)]
pub struct Segment {
    #[structopt(parse(from_os_str), help = "raw corpus file")]
    pub src: PathBuf,
    #[structopt(parse(from_os_str), help = "segment file (appended to)")]
    pub dst: PathBuf,
    #[structopt(long = "no-clean", help = "write segments without script cleaning")]
    pub no_clean: bool,
    #[structopt(flatten)]
    pub common: Common,
}

#[derive(Debug, StructOpt)]
pub struct Build {
    #[structopt(parse(from_os_str), help = "segment file")]
    pub src: PathBuf,
    #[structopt(parse(from_os_str), help = "store location")]
    pub db: PathBuf,
    #[structopt(parse(from_os_str), help = "vocabulary text dump (appended to)")]
    pub dst: PathBuf,
    #[structopt(flatten)]
    pub common: Common,
}

#[derive(Debug, StructOpt)]
pub struct Dump {
    #[structopt(parse(from_os_str), help = "store location")]
    pub db: PathBuf,
    #[structopt(parse(from_os_str), help = "dump destination")]
    pub dst: PathBuf,
    #[structopt(long = "csv", help = "write a CSV file instead of a text file")]
    pub csv: bool,
    #[structopt(
        long = "with-values",
        help = "write key,value lines (text dumps only)"
    )]
    pub with_values: bool,
    #[structopt(flatten)]
    pub common: Common,
}

#[derive(Debug, StructOpt)]
pub struct Recover {
    #[structopt(parse(from_os_str), help = "text or CSV dump")]
    pub src: PathBuf,
    #[structopt(parse(from_os_str), help = "store location")]
    pub db: PathBuf,
    #[structopt(long = "csv", help = "source is a CSV file")]
    pub csv: bool,
    #[structopt(flatten)]
    pub common: Common,
}

#[derive(Debug, StructOpt)]
pub struct Backup {
    #[structopt(parse(from_os_str), help = "store location")]
    pub db: PathBuf,
    #[structopt(parse(from_os_str), help = "backup location")]
    pub dst: PathBuf,
    #[structopt(flatten)]
    pub common: Common,
}

#[derive(Debug, StructOpt)]
pub struct Size {
    #[structopt(parse(from_os_str), help = "store location")]
    pub db: PathBuf,
    #[structopt(flatten)]
    pub common: Common,
}

#[derive(Debug, StructOpt)]
pub struct Lengths {
    #[structopt(parse(from_os_str), help = "store location")]
    pub db: PathBuf,
    #[structopt(parse(from_os_str), help = "CSV destination (appended to)")]
    pub dst: PathBuf,
    #[structopt(flatten)]
    pub common: Common,
}

#[derive(Debug, StructOpt)]
pub struct Purge {
    #[structopt(parse(from_os_str), help = "store location")]
    pub db: PathBuf,
    #[structopt(long = "dry-run", help = "only count foreign tokens")]
    pub dry_run: bool,
    #[structopt(flatten)]
    pub common: Common,
}

#[derive(Debug, StructOpt)]
pub struct Sample {
    #[structopt(parse(from_os_str), help = "segment file")]
    pub src: PathBuf,
    #[structopt(parse(from_os_str), help = "sample destination (appended to)")]
    pub dst: PathBuf,
    #[structopt(short = "n", help = "number of lines to extract")]
    pub n: usize,
    #[structopt(
        long = "limit",
        help = "only sample among the first lines. Default is the whole file."
    )]
    pub limit: Option<usize>,
    #[structopt(long = "seed", default_value = "0", help = "RNG seed")]
    pub seed: u64,
}

#[derive(Debug, StructOpt)]
pub struct Destroy {
    #[structopt(parse(from_os_str), help = "store location")]
    pub db: PathBuf,
}
