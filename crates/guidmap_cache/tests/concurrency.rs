//! Concurrent access to a shared `CacheStore`.

use std::sync::Arc;
use std::thread;

use guidmap_cache::{CacheEntry, CacheStore};
use guidmap_common::Guid;

const THREADS: usize = 16;
const NAMES_PER_THREAD: usize = 200;

fn name(thread: usize, i: usize) -> String {
    format!("worker{thread}/asset_{i}.rmdl")
}

#[test]
fn concurrent_adds_are_all_visible_to_every_thread() {
    let store = CacheStore::new();

    let guids: Vec<Vec<Guid>> = thread::scope(|s| {
        let handles: Vec<_> = (0..THREADS)
            .map(|t| {
                let store = &store;
                s.spawn(move || {
                    (0..NAMES_PER_THREAD)
                        .map(|i| store.add(&name(t, i)))
                        .collect::<Vec<_>>()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(store.len(), THREADS * NAMES_PER_THREAD);

    thread::scope(|s| {
        for _ in 0..THREADS {
            let store = &store;
            let guids = &guids;
            s.spawn(move || {
                for (t, per_thread) in guids.iter().enumerate() {
                    for (i, guid) in per_thread.iter().enumerate() {
                        let entry = store.lookup_guid(*guid).expect("entry missing");
                        assert_eq!(entry.original_string, name(t, i));
                    }
                }
            });
        }
    });
}

#[test]
fn lookups_race_with_inserts() {
    let store = Arc::new(CacheStore::new());
    let seed = store.add("seed/asset.rpak");

    let writers: Vec<_> = (0..4)
        .map(|t| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                for i in 0..500 {
                    store.add(&name(t, i));
                }
            })
        })
        .collect();
    let readers: Vec<_> = (0..4)
        .map(|_| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                for _ in 0..2_000 {
                    let entry = store.lookup_guid(seed).expect("seed vanished");
                    assert_eq!(entry.original_string, "seed/asset.rpak");
                }
            })
        })
        .collect();

    for h in writers.into_iter().chain(readers) {
        h.join().unwrap();
    }
    assert_eq!(store.len(), 1 + 4 * 500);
}

#[test]
fn save_while_adding_produces_a_loadable_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cache.bin");
    let store = CacheStore::new();
    store.import_names((0..100).map(|i| name(0, i)));

    thread::scope(|s| {
        s.spawn(|| {
            for i in 100..1_100 {
                store.add(&name(0, i));
            }
        });
        s.spawn(|| {
            for _ in 0..5 {
                store.save_to_file(&path).unwrap();
            }
        });
    });

    let loaded = CacheStore::new();
    let count = loaded.load_from_file(&path).unwrap();
    assert!(count >= 100 && count <= 1_100, "count = {count}");
    for i in 0..100 {
        assert!(loaded.contains(loaded.guid_of(&name(0, i))));
    }
}

#[test]
fn concurrent_saves_to_one_path_all_succeed() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cache.bin");

    let large = CacheStore::new();
    large.import_names((0..5_000).map(|i| name(0, i)));
    let small = CacheStore::new();
    small.add("only/one.rpak");

    let failures: usize = thread::scope(|s| {
        let writers: Vec<_> = (0..4)
            .map(|t| {
                let (large, small, path) = (&large, &small, &path);
                s.spawn(move || {
                    (0..20)
                        .filter(|i| {
                            let store = if (t + i) % 2 == 0 { large } else { small };
                            store.save_to_file(path).is_err()
                        })
                        .count()
                })
            })
            .collect();
        writers.into_iter().map(|h| h.join().unwrap()).sum()
    });
    assert_eq!(failures, 0);

    let loaded = CacheStore::new();
    let count = loaded.load_from_file(&path).unwrap();
    assert!(count == 1 || count == 5_000, "count = {count}");
    let leftovers: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name())
        .filter(|n| n != "cache.bin")
        .collect();
    assert!(leftovers.is_empty(), "{leftovers:?}");
}

#[test]
fn add_lookup_save_load_flow() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cache.bin");

    let store = CacheStore::new();
    let h1 = store.add("materials/foo.rpak");
    let h2 = store.add("models/bar.rmdl");
    assert_eq!(
        store.lookup_guid(h1).map(|e| e.original_string),
        Some("materials/foo.rpak".to_string())
    );
    store.save_to_file(&path).unwrap();

    let fresh = CacheStore::new();
    fresh.load_from_file(&path).unwrap();
    assert_eq!(
        fresh.lookup_guid(h2),
        Some(CacheEntry::new(h2, "models/bar.rmdl"))
    );
}
