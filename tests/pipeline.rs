use std::collections::HashSet;
use std::fs;
use std::path::Path;

use vocabulist::config::Config;
use vocabulist::pipelines::{Pipeline, Segmentation, VocabBuilder};
use vocabulist::script::Script;
use vocabulist::store::DedupStore;
use vocabulist::tokenizers::{Tokenizer, TokenizerKind};

fn hindi_corpus(nb: usize) -> String {
    (0..nb)
        .map(|x| {
            if x % 3 == 0 {
                // sentence spanning two lines
                format!("वाक्य संख्या\n{} यहाँ है। ", x)
            } else {
                format!("यह वाक्य {} है! ", x)
            }
        })
        .collect()
}

fn store_keys(path: &Path) -> HashSet<String> {
    let store = DedupStore::open(path).unwrap();
    store
        .scan_all()
        .unwrap()
        .map(|e| String::from_utf8(e.unwrap().0).unwrap())
        .collect()
}

#[test_log::test]
fn hindi_example() {
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("raw.txt");
    let segments = dir.path().join("segments.txt");
    fs::write(&src, "यह एक वाक्य है। यह दूसरा है।").unwrap();

    let config = Config {
        tokenizer: TokenizerKind::Whitespace,
        ..Config::for_script(Script::Devanagari)
    };
    Segmentation::new(src, segments.clone(), config.clone())
        .run()
        .unwrap();

    let text = fs::read_to_string(&segments).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines, vec!["यह एक वाक्य है", "यह दूसरा है"]);

    let tokenizer = config.tokenizer.build(config.script);
    let t = tokenizer.tokenize(lines[0], true);
    assert_eq!(t.total, 4);
    assert_eq!(t.filtered, 4);
}

#[test_log::test]
fn segment_then_build() {
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("raw.txt");
    let segments = dir.path().join("segments.txt");
    let db = dir.path().join("db");
    let dump = dir.path().join("vocab.txt");
    fs::write(&src, hindi_corpus(30)).unwrap();

    let config = Config {
        batch_size: 4,
        log_window: 5,
        ..Config::for_script(Script::Devanagari)
    };

    let seg = Segmentation::new(src, segments.clone(), config.clone())
        .run()
        .unwrap();
    assert_eq!(seg.segments, 30);
    assert_eq!(seg.batches, 8);
    // digits are removed by cleaning, no segment is empty
    assert_eq!(seg.written, 30);

    let report = VocabBuilder::new(segments, db.clone(), dump.clone(), config)
        .run()
        .unwrap();
    assert_eq!(report.segments, 30);
    assert!(!report.partial);

    let expected: HashSet<String> = ["वाक्य", "संख्या", "यहाँ", "है", "यह"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    assert_eq!(report.unique_entries, expected.len() as u64);
    let bytes: usize = expected.iter().map(|t| 2 * t.len()).sum();
    assert_eq!(report.store_bytes, bytes as u64);
    assert_eq!(store_keys(&db), expected);

    let dumped = fs::read_to_string(&dump).unwrap();
    let mut lines = dumped.lines();
    assert_eq!(lines.next(), Some("Words"));
    assert_eq!(lines.map(String::from).collect::<HashSet<_>>(), expected);
}

#[test_log::test]
fn builds_are_incremental() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("db");
    let first = dir.path().join("first.txt");
    let second = dir.path().join("second.txt");
    fs::write(&first, "दिन रात\n").unwrap();
    fs::write(&second, "रात सुबह\n").unwrap();

    let config = Config::for_script(Script::Devanagari);
    VocabBuilder::new(first, db.clone(), dir.path().join("a.txt"), config.clone())
        .run()
        .unwrap();
    let report = VocabBuilder::new(second, db.clone(), dir.path().join("b.txt"), config)
        .run()
        .unwrap();

    assert_eq!(report.unique_entries, 3);
    assert_eq!(store_keys(&db).len(), 3);
}
