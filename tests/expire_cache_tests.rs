//! Integration Tests for the expiring cache
//!
//! Drives the cache and its sweeper through the public API with a manual
//! clock and a stepped sweep timer.

use std::sync::Arc;
use std::time::Duration;

use chrono::{TimeZone, Utc};
use expirecache::clock::{ManualClock, StepTimer};
use expirecache::tasks::spawn_cleaner_with_timer;
use expirecache::ExpireCache;

// == Helper Functions ==

fn manual_cache(max_size: u64) -> (ExpireCache<String, String>, ManualClock) {
    let t0 = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let clock = ManualClock::new(t0);
    let cache = ExpireCache::with_clock(max_size, Arc::new(clock.clone()));
    (cache, clock)
}

fn assert_presence(cache: &ExpireCache<String, String>, expected: &[(&str, bool)]) {
    for (key, present) in expected {
        let value = cache.get(&key.to_string());
        assert_eq!(
            value.is_some(),
            *present,
            "get({}) = {:?}, want present = {}",
            key,
            value,
            present
        );
    }
}

// == Expiration Scenario ==

#[tokio::test]
async fn test_cache_expire() {
    let (cache, clock) = manual_cache(0);
    let (timer, mut stepper) = StepTimer::pair();
    let cleaner = spawn_cleaner_with_timer(cache.clone(), Duration::from_secs(300), timer);

    cache.set("foo".into(), "bar".into(), 3, 30);
    cache.set("baz".into(), "qux".into(), 3, 60);
    cache.set("zot".into(), "bork".into(), 4, 120);

    // unexpired
    assert_presence(&cache, &[("foo", true), ("baz", true), ("zot", true)]);
    assert_eq!(cache.len(), 3);
    assert_eq!(cache.total_size(), 3 + 3 + 4);

    cache.set("baz".into(), "snork".into(), 5, 60);
    assert_eq!(cache.len(), 3);
    assert_eq!(cache.total_size(), 3 + 5 + 4);
    assert_eq!(cache.get(&"baz".to_string()), Some("snork".to_string()));

    // lazy expiry of foo
    clock.advance_secs(45);
    assert_presence(&cache, &[("foo", false), ("baz", true), ("zot", true)]);

    // let the sweeper take baz
    clock.advance_secs(30);
    assert!(stepper.step().await);
    assert_eq!(cache.len(), 1);
    assert_eq!(cache.total_size(), 4);
    assert_presence(&cache, &[("foo", false), ("baz", false), ("zot", true)]);

    // get_or_set
    let d = "bar".to_string();
    assert_eq!(cache.get_or_set("bork".into(), d.clone(), 3, 30), d);
    assert_eq!(cache.get_or_set("bork".into(), "baz".into(), 3, 30), d);
    assert_eq!(cache.len(), 2);

    cleaner.stop().await.unwrap();
}

#[tokio::test]
async fn test_sweep_does_not_assume_expiry_order() {
    let (cache, clock) = manual_cache(0);
    let (timer, mut stepper) = StepTimer::pair();
    let cleaner = spawn_cleaner_with_timer(cache.clone(), Duration::from_secs(1), timer);

    cache.set("first".into(), "v".into(), 1, 600);
    cache.set("second".into(), "v".into(), 1, 10);
    cache.set("third".into(), "v".into(), 1, 600);
    cache.set("fourth".into(), "v".into(), 1, 5);

    clock.advance_secs(20);
    assert!(stepper.step().await);

    let stats = cache.stats();
    assert_eq!(stats.total_entries, 2);
    assert_eq!(stats.expirations, 2);
    assert_eq!(stats.hits + stats.misses, 0, "sweep must not count lookups");

    cleaner.stop().await.unwrap();
}

// == Size Bound ==

#[test]
fn test_size_bound_evicts_oldest_first() {
    let (cache, _clock) = manual_cache(10);

    cache.set("a".into(), "1".into(), 4, 600);
    cache.set("b".into(), "2".into(), 4, 5);
    cache.set("c".into(), "3".into(), 4, 600);

    assert_presence(&cache, &[("a", false), ("b", true), ("c", true)]);
    assert_eq!(cache.total_size(), 8);
    assert_eq!(cache.stats().evictions, 1);
}

#[test]
fn test_oversized_entry_is_admitted() {
    let (cache, _clock) = manual_cache(10);

    cache.set("small".into(), "1".into(), 2, 600);
    cache.set("huge".into(), "2".into(), 50, 600);

    assert_presence(&cache, &[("small", false), ("huge", true)]);
    assert_eq!(cache.total_size(), 50);

    cache.set("next".into(), "3".into(), 1, 600);
    assert_presence(&cache, &[("huge", false), ("next", true)]);
    assert_eq!(cache.total_size(), 1);
}
