//! Thread-safe metrics collection
//!
//! Atomic counters for request and match statistics, plus mutex-protected
//! collections for per-label counts and latency percentiles. A single global
//! collector serves the whole process; the snapshot is exported on
//! `GET /metrics`.

use once_cell::sync::Lazy;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Global metrics collector instance
pub static METRICS: Lazy<MetricsCollector> = Lazy::new(MetricsCollector::new);

/// Get reference to global metrics collector
pub fn metrics() -> &'static MetricsCollector {
    &METRICS
}

/// Thread-safe metrics collector using atomics and mutexes
pub struct MetricsCollector {
    // Request metrics (atomic for high frequency)
    requests_received: AtomicU64,
    requests_completed: AtomicU64,
    requests_failed: AtomicU64,
    validation_failures: AtomicU64,
    empty_utterances: AtomicU64,

    // Match engine metrics
    match_attempts: AtomicU64,
    transient_failures: AtomicU64,
    retries_exhausted: AtomicU64,

    // Per-label suggestion counts (mutex protected)
    task_counts: Mutex<HashMap<String, u64>>,

    // Request handling times in milliseconds (mutex protected)
    processing_times: Mutex<Vec<u64>>,

    uptime_start: AtomicU64,
}

impl MetricsCollector {
    pub fn new() -> Self {
        Self {
            requests_received: AtomicU64::new(0),
            requests_completed: AtomicU64::new(0),
            requests_failed: AtomicU64::new(0),
            validation_failures: AtomicU64::new(0),
            empty_utterances: AtomicU64::new(0),
            match_attempts: AtomicU64::new(0),
            transient_failures: AtomicU64::new(0),
            retries_exhausted: AtomicU64::new(0),
            task_counts: Mutex::new(HashMap::new()),
            processing_times: Mutex::new(Vec::new()),
            uptime_start: AtomicU64::new(current_timestamp()),
        }
    }

    // Request metrics
    pub fn request_received(&self) {
        self.requests_received.fetch_add(1, Ordering::Relaxed);
    }

    pub fn request_completed(&self, duration: Duration) {
        self.requests_completed.fetch_add(1, Ordering::Relaxed);
        self.record_processing_time(duration);
    }

    pub fn request_failed(&self, duration: Duration) {
        self.requests_failed.fetch_add(1, Ordering::Relaxed);
        self.record_processing_time(duration);
    }

    pub fn validation_failed(&self) {
        self.validation_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn empty_utterance(&self) {
        self.empty_utterances.fetch_add(1, Ordering::Relaxed);
    }

    // Match engine metrics
    pub fn match_attempt(&self) {
        self.match_attempts.fetch_add(1, Ordering::Relaxed);
    }

    pub fn transient_failure(&self) {
        self.transient_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn retries_exhausted(&self) {
        self.retries_exhausted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn task_suggested(&self, task: &str) {
        if let Ok(mut counts) = self.task_counts.lock() {
            *counts.entry(task.to_string()).or_insert(0) += 1;
        }
    }

    fn record_processing_time(&self, duration: Duration) {
        if let Ok(mut times) = self.processing_times.lock() {
            times.push(duration.as_millis() as u64);

            // Limit to last 1000 measurements to prevent unbounded growth
            if times.len() > 1000 {
                times.remove(0);
            }
        }
    }

    // Reset all metrics (useful for testing)
    pub fn reset(&self) {
        self.requests_received.store(0, Ordering::Relaxed);
        self.requests_completed.store(0, Ordering::Relaxed);
        self.requests_failed.store(0, Ordering::Relaxed);
        self.validation_failures.store(0, Ordering::Relaxed);
        self.empty_utterances.store(0, Ordering::Relaxed);
        self.match_attempts.store(0, Ordering::Relaxed);
        self.transient_failures.store(0, Ordering::Relaxed);
        self.retries_exhausted.store(0, Ordering::Relaxed);
        self.uptime_start
            .store(current_timestamp(), Ordering::Relaxed);

        if let Ok(mut counts) = self.task_counts.lock() {
            counts.clear();
        }
        if let Ok(mut times) = self.processing_times.lock() {
            times.clear();
        }
    }

    /// Calculate processing time statistics
    fn calculate_processing_time_statistics(&self) -> (f64, f64, f64, f64) {
        if let Ok(times) = self.processing_times.lock() {
            if times.is_empty() {
                (0.0, 0.0, 0.0, 0.0)
            } else {
                let mut sorted_times = times.clone();
                sorted_times.sort_unstable();

                let avg = sorted_times.iter().sum::<u64>() as f64 / sorted_times.len() as f64;
                let p50 = percentile(&sorted_times, 50.0);
                let p95 = percentile(&sorted_times, 95.0);
                let p99 = percentile(&sorted_times, 99.0);

                (avg, p50, p95, p99)
            }
        } else {
            (0.0, 0.0, 0.0, 0.0)
        }
    }

    /// Get complete metrics snapshot
    pub fn get_metrics(&self) -> MetricsSnapshot {
        let now = current_timestamp();
        let (avg_processing_time_ms, p50, p95, p99) = self.calculate_processing_time_statistics();

        let task_counts = self
            .task_counts
            .lock()
            .map(|counts| counts.clone())
            .unwrap_or_default();

        MetricsSnapshot {
            requests: RequestMetrics {
                requests_received: self.requests_received.load(Ordering::Relaxed),
                requests_completed: self.requests_completed.load(Ordering::Relaxed),
                requests_failed: self.requests_failed.load(Ordering::Relaxed),
                validation_failures: self.validation_failures.load(Ordering::Relaxed),
                empty_utterances: self.empty_utterances.load(Ordering::Relaxed),
                avg_processing_time_ms,
                processing_time_p50_ms: p50,
                processing_time_p95_ms: p95,
                processing_time_p99_ms: p99,
            },
            matching: MatchMetrics {
                match_attempts: self.match_attempts.load(Ordering::Relaxed),
                transient_failures: self.transient_failures.load(Ordering::Relaxed),
                retries_exhausted: self.retries_exhausted.load(Ordering::Relaxed),
                task_counts,
            },
            uptime_seconds: now - self.uptime_start.load(Ordering::Relaxed),
            timestamp: now,
        }
    }
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new()
    }
}

// Public metrics structures
#[derive(Debug, Serialize)]
pub struct MetricsSnapshot {
    pub requests: RequestMetrics,
    pub matching: MatchMetrics,
    pub uptime_seconds: u64,
    pub timestamp: u64,
}

#[derive(Debug, Serialize)]
pub struct RequestMetrics {
    pub requests_received: u64,
    pub requests_completed: u64,
    pub requests_failed: u64,
    pub validation_failures: u64,
    pub empty_utterances: u64,
    pub avg_processing_time_ms: f64,
    pub processing_time_p50_ms: f64,
    pub processing_time_p95_ms: f64,
    pub processing_time_p99_ms: f64,
}

#[derive(Debug, Serialize)]
pub struct MatchMetrics {
    pub match_attempts: u64,
    pub transient_failures: u64,
    pub retries_exhausted: u64,
    pub task_counts: HashMap<String, u64>,
}

// Helper functions
fn current_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

fn percentile(sorted_data: &[u64], percentile: f64) -> f64 {
    if sorted_data.is_empty() {
        return 0.0;
    }

    let len = sorted_data.len();
    let index = (percentile / 100.0) * (len - 1) as f64;

    if index.fract() == 0.0 {
        sorted_data[index as usize] as f64
    } else {
        let lower_index = index.floor() as usize;
        let upper_index = index.ceil() as usize;
        let lower_value = sorted_data[lower_index] as f64;
        let upper_value = sorted_data[upper_index] as f64;

        lower_value + (upper_value - lower_value) * index.fract()
    }
}
