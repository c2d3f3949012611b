// tests/lowest_cache.rs
//
// Refresh cadence and fallback behaviour of the lowest-rank cache.
//
mod common;

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use common::*;
use hiscore_locate::lowest::{Clock, HttpLowestRankSource, LowestRankCache, LowestRankSource, Refresh};
use hiscore_locate::AccountCategory::{self, *};

fn counting(summary: Option<HashMap<AccountCategory, u32>>) -> (Box<CountingSource>, Arc<Mutex<usize>>) {
    let calls = Arc::new(Mutex::new(0));
    (Box::new(CountingSource { summary, calls: calls.clone() }), calls)
}

fn cache(source: Box<dyn LowestRankSource>, clock: Arc<FakeClock>) -> LowestRankCache {
    LowestRankCache::new(source, clock, Duration::from_secs(3600), 2_000_000)
}

#[test]
fn at_most_one_fetch_per_hour() {
    let clock = FakeClock::new();
    let (source, calls) = counting(Some(HashMap::from([(Normal, 2_150_000)])));
    let c = cache(source, clock.clone());

    assert_eq!(c.refresh(), Refresh::Refreshed);
    clock.advance_secs(59 * 60);
    assert_eq!(c.refresh(), Refresh::Skipped);
    assert_eq!(*calls.lock().unwrap(), 1);

    clock.advance_secs(60);
    assert_eq!(c.refresh(), Refresh::Refreshed);
    assert_eq!(*calls.lock().unwrap(), 2);
}

#[test]
fn refreshed_values_replace_fallback() {
    let clock = FakeClock::new();
    let (source, _) = counting(Some(HashMap::from([(Iron, 1_500_311), (Hardcore, 80_123)])));
    let c = cache(source, clock.clone());

    assert_eq!(c.get_lowest_rank(Iron), 2_000_000);
    assert_eq!(c.entry(Iron).unwrap().last_refreshed, None);
    clock.advance_secs(90);
    c.refresh();
    assert_eq!(c.get_lowest_rank(Iron), 1_500_311);
    assert_eq!(c.get_lowest_rank(Hardcore), 80_123);
    // not in the summary
    assert_eq!(c.get_lowest_rank(Ultimate), 2_000_000);

    let entry = c.entry(Hardcore).unwrap();
    assert_eq!(entry.category, Hardcore);
    assert_eq!(entry.last_refreshed, Some(clock.now()));
    assert_eq!(c.entry(Iron).unwrap().last_refreshed, Some(clock.now()));
}

#[test]
fn failed_refresh_keeps_old_values_and_retries() {
    let clock = FakeClock::new();
    let t = FakeTransport::new();
    let url = "https://ranks.example/lowest.json";
    t.route(url, Reply::Body(r#"{"normal": 2100000}"#.into()));
    let c = cache(Box::new(HttpLowestRankSource::new(t.clone(), url)), clock.clone());

    assert_eq!(c.refresh(), Refresh::Refreshed);
    assert_eq!(c.get_lowest_rank(Normal), 2_100_000);

    clock.advance_secs(2 * 3600);
    t.route(url, Reply::Timeout);
    assert_eq!(c.refresh(), Refresh::Failed);
    assert_eq!(c.get_lowest_rank(Normal), 2_100_000);

    // a failure does not start a new quiet period
    t.route(url, Reply::Body(r#"{"normal": 2200000}"#.into()));
    assert_eq!(c.refresh(), Refresh::Refreshed);
    assert_eq!(c.get_lowest_rank(Normal), 2_200_000);
    assert_eq!(t.hit_count("lowest.json"), 3);
}

#[test]
fn garbage_summary_is_a_failed_refresh() {
    let clock = FakeClock::new();
    let t = FakeTransport::new();
    let url = "https://ranks.example/lowest.json";
    t.route(url, Reply::Body("<html>502 Bad Gateway</html>".into()));
    let c = cache(Box::new(HttpLowestRankSource::new(t.clone(), url)), clock);

    assert_eq!(c.refresh(), Refresh::Failed);
    assert_eq!(c.get_lowest_rank(Normal), 2_000_000);
}

#[test]
fn overlapping_refreshes_fetch_once() {
    let clock = FakeClock::new();
    let (source, calls) = counting(Some(HashMap::from([(Normal, 1_000)])));
    let c = Arc::new(cache(source, clock));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let c = Arc::clone(&c);
            thread::spawn(move || {
                c.refresh();
                c.get_lowest_rank(Normal)
            })
        })
        .collect();
    for h in handles {
        assert_eq!(h.join().unwrap(), 1_000);
    }
    assert_eq!(*calls.lock().unwrap(), 1);
}
