//! Status Aggregator - merges partial telemetry into one aircraft state.
//!
//! X-Plane sends position, attitude and speeds in separate records, often in
//! separate packets. The aggregator folds each [`TelemetryEvent`] into a
//! [`Snapshot`] and answers the two questions the track builders ask:
//!
//! - is the snapshot complete enough for an annotated flight-data sample?
//! - is the aircraft on the ground?
//!
//! # Usage
//!
//! ```
//! use xptrack::status::{StatusAggregator, VerticalRateSource};
//! use xptrack::telemetry::{PositionSample, TelemetryEvent};
//!
//! let mut aggregator = StatusAggregator::new(VerticalRateSource::AngularRate);
//! assert_eq!(aggregator.is_on_ground(), None);
//!
//! aggregator.apply(&TelemetryEvent::Position(PositionSample::new(45.0, -122.0, 0.0, 150.0)));
//! assert_eq!(aggregator.is_on_ground(), Some(true));
//! assert!(!aggregator.is_complete());
//! ```

mod snapshot;

use tracing::trace;

use crate::telemetry::TelemetryEvent;

pub use snapshot::{FlightSample, Snapshot, VerticalRateSource};

/// Merges a stream of telemetry events into a [`Snapshot`].
#[derive(Debug, Clone, Default)]
pub struct StatusAggregator {
    snapshot: Snapshot,
    vertical_rate_source: VerticalRateSource,
    events_applied: u64,
    events_ignored: u64,
}

impl StatusAggregator {
    /// Create an aggregator with an empty snapshot.
    pub fn new(vertical_rate_source: VerticalRateSource) -> Self {
        Self {
            vertical_rate_source,
            ..Default::default()
        }
    }

    /// Apply one event.
    ///
    /// Categories this version does not interpret are counted and ignored.
    pub fn apply(&mut self, event: &TelemetryEvent) {
        if let TelemetryEvent::Unknown { index } = event {
            self.events_ignored += 1;
            trace!(index, "Ignoring unsupported telemetry category");
            return;
        }

        self.snapshot = self.snapshot.with_event(event);
        self.events_applied += 1;
    }

    /// Current merged state.
    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    /// True once attitude, speed, position and vertical rate have all arrived.
    pub fn is_complete(&self) -> bool {
        self.flight_sample().is_some()
    }

    /// True once a position sample has arrived.
    pub fn has_position(&self) -> bool {
        self.snapshot.position.is_some()
    }

    /// Ground state of the last position sample.
    ///
    /// `None` until the first position sample has been applied.
    pub fn is_on_ground(&self) -> Option<bool> {
        self.snapshot.position.map(|p| p.is_on_ground())
    }

    /// Complete sample for the flight-data track, if available.
    pub fn flight_sample(&self) -> Option<FlightSample> {
        self.snapshot.flight_sample(self.vertical_rate_source)
    }

    /// Configured vertical rate policy.
    pub fn vertical_rate_source(&self) -> VerticalRateSource {
        self.vertical_rate_source
    }

    /// Number of events folded into the snapshot.
    pub fn events_applied(&self) -> u64 {
        self.events_applied
    }

    /// Number of events ignored as unsupported.
    pub fn events_ignored(&self) -> u64 {
        self.events_ignored
    }
}
