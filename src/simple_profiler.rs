//! Simple profiling macros using thread-local storage
//!
//! Lightweight timing of the search hot paths without changing function
//! signatures. Enable with environment variable: ISOLATION_PROFILE=1

use std::cell::RefCell;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::OnceLock;
use std::time::Instant;

const NUM_CATEGORIES: usize = 3;

/// Categories recorded by `profile!`
pub const CATEGORIES: [&str; NUM_CATEGORIES] = ["legal_moves", "forecast", "eval"];

#[derive(Debug, Default, Clone, Copy)]
struct Slot {
    time_ns: u64,
    calls: u64,
}

thread_local! {
    static LOCAL: RefCell<[Slot; NUM_CATEGORIES]> = RefCell::new([Slot::default(); NUM_CATEGORIES]);
    static LOCAL_CUTOFFS: RefCell<u64> = RefCell::new(0);
}

// Global aggregators, indexed like CATEGORIES
static GLOBAL_TIME: [AtomicU64; NUM_CATEGORIES] =
    [AtomicU64::new(0), AtomicU64::new(0), AtomicU64::new(0)];
static GLOBAL_CALLS: [AtomicU64; NUM_CATEGORIES] =
    [AtomicU64::new(0), AtomicU64::new(0), AtomicU64::new(0)];
static GLOBAL_CUTOFFS: AtomicU64 = AtomicU64::new(0);

#[inline]
pub fn is_profiling_enabled() -> bool {
    static ENABLED: OnceLock<bool> = OnceLock::new();
    *ENABLED.get_or_init(|| std::env::var("ISOLATION_PROFILE").is_ok())
}

pub struct ProfileGuard {
    start: Instant,
    slot: usize,
}

impl ProfileGuard {
    pub fn new(category: &'static str) -> Option<Self> {
        if !is_profiling_enabled() {
            return None;
        }
        let slot = CATEGORIES.iter().position(|&c| c == category)?;
        Some(ProfileGuard {
            start: Instant::now(),
            slot,
        })
    }
}

impl Drop for ProfileGuard {
    fn drop(&mut self) {
        let elapsed_ns = self.start.elapsed().as_nanos() as u64;
        LOCAL.with(|slots| {
            let mut slots = slots.borrow_mut();
            slots[self.slot].time_ns += elapsed_ns;
            slots[self.slot].calls += 1;
        });
    }
}

#[inline]
pub fn record_cutoff() {
    if is_profiling_enabled() {
        LOCAL_CUTOFFS.with(|c| *c.borrow_mut() += 1);
    }
}

/// Moves this thread's counters into the global totals
pub fn merge_thread_local() {
    if !is_profiling_enabled() {
        return;
    }

    LOCAL.with(|slots| {
        let mut slots = slots.borrow_mut();
        for (i, slot) in slots.iter_mut().enumerate() {
            GLOBAL_TIME[i].fetch_add(slot.time_ns, Ordering::Relaxed);
            GLOBAL_CALLS[i].fetch_add(slot.calls, Ordering::Relaxed);
            *slot = Slot::default();
        }
    });
    LOCAL_CUTOFFS.with(|c| {
        GLOBAL_CUTOFFS.fetch_add(*c.borrow(), Ordering::Relaxed);
        *c.borrow_mut() = 0;
    });
}

pub fn print_report(total_time_ms: u64) {
    if !is_profiling_enabled() {
        return;
    }

    let total_ns = total_time_ms * 1_000_000;

    eprintln!("\n═══════════════════════════════════════════════════════════");
    eprintln!("                 PERFORMANCE PROFILE");
    eprintln!("═══════════════════════════════════════════════════════════");
    eprintln!("Total Time: {}ms\n", total_time_ms);

    for (i, category) in CATEGORIES.iter().enumerate() {
        let time = GLOBAL_TIME[i].load(Ordering::Relaxed);
        let calls = GLOBAL_CALLS[i].load(Ordering::Relaxed);
        let ms = time as f64 / 1_000_000.0;
        let pct = if total_ns > 0 { 100.0 * time as f64 / total_ns as f64 } else { 0.0 };
        let avg_us = if calls > 0 { time as f64 / (calls * 1000) as f64 } else { 0.0 };

        eprintln!("{}:", category);
        eprintln!("  Time:     {:.2}ms ({:.1}%)", ms, pct);
        eprintln!("  Calls:    {}", calls);
        eprintln!("  Avg:      {:.2}µs/call\n", avg_us);
    }

    eprintln!("Cutoffs: {}", GLOBAL_CUTOFFS.load(Ordering::Relaxed));
    eprintln!("═══════════════════════════════════════════════════════════\n");
}

pub fn reset() {
    for i in 0..NUM_CATEGORIES {
        GLOBAL_TIME[i].store(0, Ordering::Relaxed);
        GLOBAL_CALLS[i].store(0, Ordering::Relaxed);
    }
    GLOBAL_CUTOFFS.store(0, Ordering::Relaxed);
}

#[macro_export]
macro_rules! profile {
    ($category:expr, $code:block) => {{
        let _guard = $crate::simple_profiler::ProfileGuard::new($category);
        $code
    }};
}
