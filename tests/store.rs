use std::collections::HashSet;
use std::fs;

use vocabulist::config::StoreOptions;
use vocabulist::script::Script;
use vocabulist::store::{DedupStore, StoreSize};

fn words(nb: usize) -> Vec<String> {
    (0..nb).map(|x| format!("शब्द{}", x)).collect()
}

fn keys(store: &DedupStore) -> HashSet<Vec<u8>> {
    store.scan_all().unwrap().map(|e| e.unwrap().0).collect()
}

fn options() -> StoreOptions {
    StoreOptions {
        scan_page: 7,
        batch_size: 5,
    }
}

#[test_log::test]
fn dedup_cycle() {
    let dir = tempfile::tempdir().unwrap();
    let store = DedupStore::open(&dir.path().join("db")).unwrap();

    for _ in 0..2 {
        if !store.exists("दिन".as_bytes()).unwrap() {
            store.add_batch([("दिन", "दिन")]).unwrap();
        }
    }
    assert_eq!(store.size().unwrap().into_value().entries, 1);
}

#[test_log::test]
fn csv_recovery() {
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("words.csv");
    fs::write(&src, "Words\nदिन\nरात\n").unwrap();

    let store = DedupStore::open(&dir.path().join("db")).unwrap();
    store.recover_from_csv(&src).unwrap();

    let entries: Vec<(Vec<u8>, Vec<u8>)> = store.scan_all().unwrap().map(|e| e.unwrap()).collect();
    assert_eq!(entries.len(), 2);
    for (k, v) in entries {
        assert_eq!(k, v);
        assert!(k == "दिन".as_bytes() || k == "रात".as_bytes());
    }
}

#[test_log::test]
fn dump_recover_backup() {
    let dir = tempfile::tempdir().unwrap();
    let store = DedupStore::open_with(&dir.path().join("db"), options()).unwrap();
    let words = words(23);
    store.add_batch(words.iter().map(|w| (w, w))).unwrap();

    let dump = dir.path().join("dump.txt");
    assert_eq!(store.dump_to_text(&dump, true).unwrap().into_value(), 23);

    let recovered = DedupStore::open_with(&dir.path().join("recovered"), options()).unwrap();
    assert_eq!(recovered.recover_from_text(&dump).unwrap(), 23);
    assert_eq!(keys(&recovered), keys(&store));

    let backup = dir.path().join("backup");
    assert_eq!(store.backup(&backup).unwrap(), 23);
    let backup = DedupStore::open(&backup).unwrap();
    assert_eq!(keys(&backup), keys(&store));
    assert_eq!(backup.size().unwrap().into_value(), store.size().unwrap().into_value());
}

#[test_log::test]
fn size_accounting() {
    let dir = tempfile::tempdir().unwrap();
    let store = DedupStore::open(&dir.path().join("db")).unwrap();
    let tokens = ["a", "bb", "ccc", "dddd"];
    store.add_batch(tokens.iter().map(|t| (t, t))).unwrap();

    let size = store.size().unwrap();
    assert!(size.is_complete());
    assert_eq!(
        size.into_value(),
        StoreSize {
            bytes: 2 * (1 + 2 + 3 + 4),
            entries: 4
        }
    );
}

#[test_log::test]
fn lengths_and_purge() {
    let dir = tempfile::tempdir().unwrap();
    let store = DedupStore::open_with(&dir.path().join("db"), options()).unwrap();
    store
        .add_batch(["दिन", "रात", "hello", "दो शब्द"].iter().map(|t| (t, t)))
        .unwrap();

    let lengths = dir.path().join("lengths.csv");
    assert_eq!(store.word_lengths(&lengths).unwrap().into_value(), 3);
    let content = fs::read_to_string(&lengths).unwrap();
    assert!(content.starts_with("Word,lengths\n"));
    assert!(content.contains("दिन,3\n"));
    assert!(!content.contains("दो शब्द"));

    assert_eq!(
        store
            .purge_foreign(Script::Devanagari, true)
            .unwrap()
            .into_value(),
        1
    );
    assert!(!store.exists(b"hello").unwrap());
    assert_eq!(store.size().unwrap().into_value().entries, 3);
}

#[test_log::test]
fn closed_store() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("db");
    let mut store = DedupStore::open(&path).unwrap();
    store.close();
    store.close();
    assert!(store.exists(b"a").is_err());

    store.close_and_destroy().unwrap();
    assert!(!path.exists());
}
