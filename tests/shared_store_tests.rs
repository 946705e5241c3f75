//! Integration Tests for the Shared Arena Engine
//!
//! Several independent handles attached to the same arena, as separate
//! processes would be.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Duration;

use arena_cache::cache::{CacheOptions, StampedeGuard, DEFAULT_PARTITION};
use arena_cache::clock::SystemClock;
use arena_cache::shm::{
    FileArena, FileLock, MemoryArena, MemoryLock, MemorySegment, SharedMemoryStore, StoreOptions,
};
use arena_cache::{Cache, CacheEngine, Expiry, ProducerError};

type MemoryCache = Cache<SharedMemoryStore<MemoryArena, MemoryLock, SystemClock>>;
type FileCache = Cache<SharedMemoryStore<FileArena, FileLock, SystemClock>>;

fn guard() -> StampedeGuard {
    StampedeGuard {
        poll_interval: Duration::from_millis(10),
        max_polls: 300,
        sentinel_ttl: Duration::from_secs(10),
    }
}

fn attach_memory(segment: &MemorySegment) -> MemoryCache {
    let store =
        SharedMemoryStore::in_memory(segment, SystemClock, StoreOptions::default()).unwrap();
    let options = CacheOptions {
        stampede: guard(),
        ..CacheOptions::default()
    };
    Cache::with_options(store, SystemClock, options)
}

fn attach_file(root: &std::path::Path, capacity: usize) -> FileCache {
    let store = SharedMemoryStore::open(root, 7, capacity, StoreOptions::default()).unwrap();
    Cache::with_options(store, SystemClock, CacheOptions::default())
}

// == Stampede Protection ==

#[test]
fn test_concurrent_get_set_converges_on_one_producer_output() {
    const CALLERS: usize = 8;
    let segment = MemorySegment::new(1024 * 1024);
    attach_memory(&segment).generation(DEFAULT_PARTITION).unwrap();

    let calls = Arc::new(AtomicUsize::new(0));
    let barrier = Arc::new(Barrier::new(CALLERS));

    let handles: Vec<_> = (0..CALLERS)
        .map(|_| {
            let segment = segment.clone();
            let calls = Arc::clone(&calls);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                let mut cache = attach_memory(&segment);
                barrier.wait();
                cache
                    .get_set(
                        "report",
                        || {
                            let n = calls.fetch_add(1, Ordering::SeqCst);
                            thread::sleep(Duration::from_millis(100));
                            Ok::<_, ProducerError<String>>(format!("fill-{n}"))
                        },
                        Duration::from_secs(60),
                    )
                    .unwrap()
            })
        })
        .collect();

    let returned: Vec<String> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    let calls = calls.load(Ordering::SeqCst);
    assert!((1..=CALLERS).contains(&calls), "producer ran {calls} times");

    let outputs: Vec<String> = (0..calls).map(|n| format!("fill-{n}")).collect();
    assert!(returned.iter().all(|value| outputs.contains(value)));

    let stored = attach_memory(&segment).get("report", String::new()).unwrap();
    assert!(outputs.contains(&stored), "stored {stored} was never produced");
}

#[test]
fn test_waiter_sees_value_filled_by_other_handle() {
    let segment = MemorySegment::new(1024 * 1024);
    let mut filler = attach_memory(&segment);
    let mut waiter = attach_memory(&segment);

    filler.reserve("k", Duration::from_secs(10)).unwrap();

    let background = thread::spawn(move || {
        thread::sleep(Duration::from_millis(50));
        filler.set("k", &7u32, Expiry::Never).unwrap();
    });

    let value = waiter
        .get_set(
            "k",
            || Ok::<_, ProducerError<u32>>(99),
            Expiry::Never,
        )
        .unwrap();
    background.join().unwrap();

    assert_eq!(value, 7);
}

// == Namespace Versioning ==

#[test]
fn test_clear_from_one_handle_hides_entries_from_all() {
    let segment = MemorySegment::new(64 * 1024);
    let mut a = attach_memory(&segment);
    let mut b = attach_memory(&segment);

    a.set("k", "v", Expiry::Never).unwrap();
    assert_eq!(b.get("k", String::new()).unwrap(), "v");

    b.clear().unwrap();

    assert!(!a.has("k").unwrap());
    assert_eq!(a.generation(DEFAULT_PARTITION).unwrap(), 2);
}

#[test]
fn test_first_resolve_race_agrees_on_generation() {
    const HANDLES: usize = 8;
    let segment = MemorySegment::new(64 * 1024);
    let barrier = Arc::new(Barrier::new(HANDLES));

    let handles: Vec<_> = (0..HANDLES)
        .map(|_| {
            let segment = segment.clone();
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                let mut cache = attach_memory(&segment);
                barrier.wait();
                cache.generation("fresh").unwrap()
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), 1);
    }
}

#[test]
fn test_cached_generation_needs_invalidation() {
    let segment = MemorySegment::new(64 * 1024);
    let mut cached = attach_memory(&segment);
    cached.namespaces_mut().enable_cache();
    let mut other = attach_memory(&segment);

    cached.set("k", "v", Expiry::Never).unwrap();
    other.clear().unwrap();

    // still reading generation 1
    assert!(cached.has("k").unwrap());

    cached.namespaces_mut().invalidate(DEFAULT_PARTITION);
    assert!(!cached.has("k").unwrap());
}

// == File Arena ==

#[test]
fn test_file_arena_handles_share_entries() {
    let dir = tempfile::tempdir().unwrap();
    let mut a = attach_file(dir.path(), 256 * 1024);
    let mut b = attach_file(dir.path(), 256 * 1024);

    a.set("k", &vec![1, 2, 3], Expiry::Never).unwrap();
    assert_eq!(b.get("k", Vec::<u32>::new()).unwrap(), vec![1, 2, 3]);

    // b rewrites the key under a fresh slot; a's mapping goes stale
    b.delete("k").unwrap();
    b.set("k", &vec![4], Expiry::Never).unwrap();
    assert_eq!(a.get("k", Vec::<u32>::new()).unwrap(), vec![4]);

    // a fresh attach sees the persisted state
    let mut c = attach_file(dir.path(), 256 * 1024);
    assert_eq!(c.get("k", Vec::<u32>::new()).unwrap(), vec![4]);
}

#[test]
fn test_file_arena_concurrent_writers_keep_accounting() {
    const WRITERS: usize = 4;
    const KEYS: usize = 25;
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().to_path_buf();
    attach_file(&root, 1024 * 1024).generation(DEFAULT_PARTITION).unwrap();

    let handles: Vec<_> = (0..WRITERS)
        .map(|w| {
            let root = root.clone();
            thread::spawn(move || {
                let mut cache = attach_file(&root, 1024 * 1024);
                for i in 0..KEYS {
                    assert!(cache
                        .set(&format!("w{w}-k{i}"), &format!("value-{w}-{i}"), Expiry::Never)
                        .unwrap());
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let mut cache = attach_file(&root, 1024 * 1024);
    for w in 0..WRITERS {
        for i in 0..KEYS {
            let value = cache.get(&format!("w{w}-k{i}"), String::new()).unwrap();
            assert_eq!(value, format!("value-{w}-{i}"));
        }
    }

    let store = cache.backend_mut();
    // every entry plus the generation counter
    assert_eq!(store.len(), WRITERS * KEYS + 1);
    let used = store.used_size();
    let report = store.sweep().unwrap();
    assert_eq!(report.repaired, 0);
    assert_eq!(store.used_size(), used);
}

#[test]
fn test_file_arena_evicts_under_pressure() {
    let dir = tempfile::tempdir().unwrap();
    let mut cache = attach_file(dir.path(), 8 * 1024);
    let payload = "x".repeat(500);

    for i in 0..40 {
        cache
            .set(&format!("k{i}"), &payload, Duration::from_secs(60 + i))
            .unwrap();
    }

    let store = cache.backend();
    assert!(store.evictions() > 0);
    assert!(store.used_size() <= store.capacity() as u64);
    // the most recent write always survives its own eviction pass
    assert!(cache.has("k39").unwrap());
    // generations are never evicted
    assert_eq!(cache.generation(DEFAULT_PARTITION).unwrap(), 1);
}
