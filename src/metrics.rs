//! Minimal in-process metrics scaffolding.
//! Counters feed the `/` service-info payload and the `status` CLI command.
use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

static COMMITS: AtomicU64 = AtomicU64::new(0);
static COMMIT_RETRIES: AtomicU64 = AtomicU64::new(0);
static COMMIT_EXHAUSTED: AtomicU64 = AtomicU64::new(0);
static PURCHASES: AtomicU64 = AtomicU64::new(0);
static ADOPTIONS: AtomicU64 = AtomicU64::new(0);
static GIFTS: AtomicU64 = AtomicU64::new(0);
static COMMENTS_POSTED: AtomicU64 = AtomicU64::new(0);
static ALLOWANCE_AWARDS: AtomicU64 = AtomicU64::new(0);

pub fn record_commit() {
    COMMITS.fetch_add(1, Ordering::Relaxed);
}

pub fn record_commit_retry() {
    COMMIT_RETRIES.fetch_add(1, Ordering::Relaxed);
}

pub fn record_commit_exhausted() {
    COMMIT_EXHAUSTED.fetch_add(1, Ordering::Relaxed);
}

pub fn record_purchase() {
    PURCHASES.fetch_add(1, Ordering::Relaxed);
}

pub fn record_adoption() {
    ADOPTIONS.fetch_add(1, Ordering::Relaxed);
}

pub fn record_gift() {
    GIFTS.fetch_add(1, Ordering::Relaxed);
}

pub fn record_comment_posted() {
    COMMENTS_POSTED.fetch_add(1, Ordering::Relaxed);
}

pub fn record_allowance_award() {
    ALLOWANCE_AWARDS.fetch_add(1, Ordering::Relaxed);
}

#[derive(Debug, Default, Clone, Serialize)]
pub struct Snapshot {
    pub commits: u64,
    pub commit_retries: u64,
    pub commit_exhausted: u64,
    pub purchases: u64,
    pub adoptions: u64,
    pub gifts: u64,
    pub comments_posted: u64,
    pub allowance_awards: u64,
}

pub fn snapshot() -> Snapshot {
    Snapshot {
        commits: COMMITS.load(Ordering::Relaxed),
        commit_retries: COMMIT_RETRIES.load(Ordering::Relaxed),
        commit_exhausted: COMMIT_EXHAUSTED.load(Ordering::Relaxed),
        purchases: PURCHASES.load(Ordering::Relaxed),
        adoptions: ADOPTIONS.load(Ordering::Relaxed),
        gifts: GIFTS.load(Ordering::Relaxed),
        comments_posted: COMMENTS_POSTED.load(Ordering::Relaxed),
        allowance_awards: ALLOWANCE_AWARDS.load(Ordering::Relaxed),
    }
}
