use serde::Serialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::{Duration, Instant};

pub struct Metrics {
    // Timing (in microseconds)
    total_load_time_us: AtomicU64,
    total_categorize_time_us: AtomicU64,
    total_export_time_us: AtomicU64,

    // Counts
    entities_loaded: AtomicUsize,
    rows_written: AtomicUsize,
}

impl Metrics {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            total_load_time_us: AtomicU64::new(0),
            total_categorize_time_us: AtomicU64::new(0),
            total_export_time_us: AtomicU64::new(0),
            entities_loaded: AtomicUsize::new(0),
            rows_written: AtomicUsize::new(0),
        })
    }

    pub fn record_load(&self, duration: Duration, entities: usize) {
        self.total_load_time_us.fetch_add(duration.as_micros() as u64, Ordering::Relaxed);
        self.entities_loaded.fetch_add(entities, Ordering::Relaxed);
    }

    pub fn record_categorize(&self, duration: Duration) {
        self.total_categorize_time_us.fetch_add(duration.as_micros() as u64, Ordering::Relaxed);
    }

    pub fn record_export(&self, duration: Duration, rows: usize) {
        self.total_export_time_us.fetch_add(duration.as_micros() as u64, Ordering::Relaxed);
        self.rows_written.fetch_add(rows, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            load_time_ms: Self::to_ms(&self.total_load_time_us),
            categorize_time_ms: Self::to_ms(&self.total_categorize_time_us),
            export_time_ms: Self::to_ms(&self.total_export_time_us),
            entities_loaded: self.entities_loaded.load(Ordering::Relaxed),
            rows_written: self.rows_written.load(Ordering::Relaxed),
        }
    }

    fn to_ms(total_us: &AtomicU64) -> f64 {
        total_us.load(Ordering::Relaxed) as f64 / 1000.0
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub load_time_ms: f64,
    pub categorize_time_ms: f64,
    pub export_time_ms: f64,
    pub entities_loaded: usize,
    pub rows_written: usize,
}

pub struct TimedOperation {
    start: Instant,
}

impl TimedOperation {
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}
