//! # Vocabulist
//!
//! ```sh
//! vocabulist 0.1.0
//! deduplicated vocabulary builder.
//!
//! USAGE:
//!     vocabulist <SUBCOMMAND>
//!
//! SUBCOMMANDS:
//!     backup     Copy a store
//!     build      Build the vocabulary of a segment file (pass 2)
//!     destroy    Delete a store
//!     dump       Dump a store to a text or CSV file
//!     help       Prints this message or the help of the given subcommand(s)
//!     lengths    Write the length of each single-word token
//!     purge      Remove tokens holding characters outside of the script
//!     recover    Load a text or CSV dump into a store
//!     sample     Extract random lines of a segment file
//!     segment    Split a raw corpus into cleaned segments (pass 1)
//!     size       Compute the size of a store
//! ```
use log::{debug, warn};
use structopt::StructOpt;

use vocabulist::{
    cli::Vocabulist,
    error::{Error, Outcome},
    pipelines::{Pipeline, Segmentation, VocabBuilder},
    processing::sample,
    store::DedupStore,
};

/// Warns about an interrupted scan and returns the (possibly partial) value.
fn report<T>(outcome: Outcome<T>) -> T {
    if let Outcome::Partial { error, .. } = &outcome {
        warn!("result is partial: {}", error);
    }
    outcome.into_value()
}

fn main() -> Result<(), Error> {
    env_logger::init();

    let opt = Vocabulist::from_args();
    debug!("cli args\n{:#?}", opt);

    match opt {
        Vocabulist::Segment(s) => {
            let mut p = Segmentation::new(s.src, s.dst, s.common.config()?);
            if s.no_clean {
                p = p.without_cleaning();
            }
            let r = p.run()?;
            println!(
                "segments: {}, batches: {}, written: {}",
                r.segments, r.batches, r.written
            );
        }
        Vocabulist::Build(b) => {
            let p = VocabBuilder::new(b.src, b.db, b.dst, b.common.config()?);
            let r = p.run()?;
            println!(
                "segments: {}, tokens: {}, unique entries: {}, bytes: {}{}",
                r.segments,
                r.total_tokens,
                r.unique_entries,
                r.store_bytes,
                if r.partial { " (partial)" } else { "" }
            );
        }
        Vocabulist::Dump(d) => {
            let config = d.common.config()?;
            let store = DedupStore::open_with(&d.db, config.store_options())?;
            let count = if d.csv {
                report(store.dump_to_csv(&d.dst)?)
            } else {
                report(store.dump_to_text(&d.dst, !d.with_values)?)
            };
            println!("dumped {} entries", count);
        }
        Vocabulist::Recover(r) => {
            let config = r.common.config()?;
            let store = DedupStore::open_with(&r.db, config.store_options())?;
            let count = if r.csv {
                store.recover_from_csv(&r.src)?
            } else {
                store.recover_from_text(&r.src)?
            };
            println!("recovered {} entries", count);
        }
        Vocabulist::Backup(b) => {
            let config = b.common.config()?;
            let store = DedupStore::open_with(&b.db, config.store_options())?;
            println!("copied {} entries", store.backup(&b.dst)?);
        }
        Vocabulist::Size(s) => {
            let config = s.common.config()?;
            let store = DedupStore::open_with(&s.db, config.store_options())?;
            let size = report(store.size()?);
            println!("entries: {}, bytes: {}", size.entries, size.bytes);
        }
        Vocabulist::Lengths(l) => {
            let config = l.common.config()?;
            let store = DedupStore::open_with(&l.db, config.store_options())?;
            println!("{} words written", report(store.word_lengths(&l.dst)?));
        }
        Vocabulist::Purge(p) => {
            let config = p.common.config()?;
            let store = DedupStore::open_with(&p.db, config.store_options())?;
            let found = report(store.purge_foreign(config.script, !p.dry_run)?);
            if p.dry_run {
                println!("{} foreign words found", found);
            } else {
                println!("{} foreign words removed", found);
            }
        }
        Vocabulist::Sample(s) => {
            let written = sample::sample(&s.src, &s.dst, s.n, s.limit, s.seed)?;
            println!("{} lines sampled", written);
        }
        Vocabulist::Destroy(d) => DedupStore::destroy(&d.db)?,
    };
    Ok(())
}
