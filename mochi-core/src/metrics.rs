//! Runtime metrics for platform operations.
//!
//! Lightweight lock-free counters incremented on the hot path and read on
//! dashboard export as Prometheus-compatible text.

use std::sync::atomic::{AtomicU64, Ordering};

/// Atomic counters for platform events.
pub struct PlatformCounters {
    /// Chat prompts sent to the assistant.
    pub chat_requests: AtomicU64,
    /// Chapter-generation requests sent to the assistant.
    pub chapter_requests: AtomicU64,
    /// Assistant invocations that resolved to the fallback message.
    pub assistant_fallbacks: AtomicU64,
    /// Completed product redemptions.
    pub redemptions_completed: AtomicU64,
    /// Redemptions refused (balance, stock, listing).
    pub redemptions_rejected: AtomicU64,
    /// Daily check-ins credited.
    pub check_ins: AtomicU64,
    /// Sessions started.
    pub sessions_started: AtomicU64,
    /// Sessions dropped by expiry purges.
    pub sessions_expired: AtomicU64,
}

impl PlatformCounters {
    /// Create a new set of zeroed counters.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            chat_requests: AtomicU64::new(0),
            chapter_requests: AtomicU64::new(0),
            assistant_fallbacks: AtomicU64::new(0),
            redemptions_completed: AtomicU64::new(0),
            redemptions_rejected: AtomicU64::new(0),
            check_ins: AtomicU64::new(0),
            sessions_started: AtomicU64::new(0),
            sessions_expired: AtomicU64::new(0),
        }
    }

    /// Snapshot all counters for export.
    #[must_use]
    pub fn snapshot(&self) -> CounterSnapshot {
        CounterSnapshot {
            chat_requests: self.chat_requests.load(Ordering::Relaxed),
            chapter_requests: self.chapter_requests.load(Ordering::Relaxed),
            assistant_fallbacks: self.assistant_fallbacks.load(Ordering::Relaxed),
            redemptions_completed: self.redemptions_completed.load(Ordering::Relaxed),
            redemptions_rejected: self.redemptions_rejected.load(Ordering::Relaxed),
            check_ins: self.check_ins.load(Ordering::Relaxed),
            sessions_started: self.sessions_started.load(Ordering::Relaxed),
            sessions_expired: self.sessions_expired.load(Ordering::Relaxed),
        }
    }
}

impl Default for PlatformCounters {
    fn default() -> Self {
        Self::new()
    }
}

/// A snapshot of counter values at a point in time.
#[derive(Debug, Clone)]
pub struct CounterSnapshot {
    /// Chat prompts sent.
    pub chat_requests: u64,
    /// Chapter requests sent.
    pub chapter_requests: u64,
    /// Fallback results returned.
    pub assistant_fallbacks: u64,
    /// Completed redemptions.
    pub redemptions_completed: u64,
    /// Refused redemptions.
    pub redemptions_rejected: u64,
    /// Check-ins credited.
    pub check_ins: u64,
    /// Sessions started.
    pub sessions_started: u64,
    /// Sessions expired.
    pub sessions_expired: u64,
}

impl CounterSnapshot {
    /// Format as Prometheus-compatible text.
    #[must_use]
    pub fn to_prometheus(&self) -> String {
        format!(
            "# HELP mochi_chat_requests_total Chat prompts sent to the assistant\n\
             # TYPE mochi_chat_requests_total counter\n\
             mochi_chat_requests_total {}\n\
             # HELP mochi_chapter_requests_total Chapter-generation requests\n\
             # TYPE mochi_chapter_requests_total counter\n\
             mochi_chapter_requests_total {}\n\
             # HELP mochi_assistant_fallbacks_total Assistant calls resolved to the fallback message\n\
             # TYPE mochi_assistant_fallbacks_total counter\n\
             mochi_assistant_fallbacks_total {}\n\
             # HELP mochi_redemptions_completed_total Completed product redemptions\n\
             # TYPE mochi_redemptions_completed_total counter\n\
             mochi_redemptions_completed_total {}\n\
             # HELP mochi_redemptions_rejected_total Refused product redemptions\n\
             # TYPE mochi_redemptions_rejected_total counter\n\
             mochi_redemptions_rejected_total {}\n\
             # HELP mochi_check_ins_total Daily check-ins credited\n\
             # TYPE mochi_check_ins_total counter\n\
             mochi_check_ins_total {}\n\
             # HELP mochi_sessions_started_total Sessions started\n\
             # TYPE mochi_sessions_started_total counter\n\
             mochi_sessions_started_total {}\n\
             # HELP mochi_sessions_expired_total Sessions dropped by expiry purges\n\
             # TYPE mochi_sessions_expired_total counter\n\
             mochi_sessions_expired_total {}\n",
            self.chat_requests,
            self.chapter_requests,
            self.assistant_fallbacks,
            self.redemptions_completed,
            self.redemptions_rejected,
            self.check_ins,
            self.sessions_started,
            self.sessions_expired,
        )
    }
}
