//! Maintenance-window gate — daily time-of-day feature availability.
//!
//! Point-spending features close during a configured daily window so
//! balances can be reconciled. The window is half-open `[start, end)` in
//! UTC hours and may wrap midnight.

use chrono::{DateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::config::MaintenanceConfig;

/// Whether a gated feature is currently reachable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateStatus {
    /// Outside the maintenance window.
    Open,
    /// Inside the maintenance window.
    Closed {
        /// Hour of day (UTC) when the window ends.
        reopens_at_hour: u32,
    },
}

/// A daily maintenance window.
///
/// `start_hour == end_hour` means the window never closes anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaintenanceWindow {
    /// Hour of day (UTC) the window opens.
    pub start_hour: u32,
    /// Hour of day (UTC) the window closes.
    pub end_hour: u32,
}

impl MaintenanceWindow {
    /// Create a window. Hours are normalized into `0..24`.
    #[must_use]
    pub fn new(start_hour: u32, end_hour: u32) -> Self {
        Self {
            start_hour: start_hour % 24,
            end_hour: end_hour % 24,
        }
    }

    /// Build a window from config, or `None` when enforcement is disabled.
    #[must_use]
    pub fn from_config(config: &MaintenanceConfig) -> Option<Self> {
        config
            .enabled
            .then(|| Self::new(config.start_hour, config.end_hour))
    }

    /// Gate status at a given instant.
    #[must_use]
    pub fn status(&self, now: DateTime<Utc>) -> GateStatus {
        let hour = now.hour();
        let inside = if self.start_hour < self.end_hour {
            hour >= self.start_hour && hour < self.end_hour
        } else if self.start_hour > self.end_hour {
            // Wraps midnight, e.g. 22..6.
            hour >= self.start_hour || hour < self.end_hour
        } else {
            false
        };

        if inside {
            GateStatus::Closed {
                reopens_at_hour: self.end_hour,
            }
        } else {
            GateStatus::Open
        }
    }

    /// Whether gated features are reachable at a given instant.
    #[must_use]
    pub fn is_open(&self, now: DateTime<Utc>) -> bool {
        self.status(now) == GateStatus::Open
    }
}
