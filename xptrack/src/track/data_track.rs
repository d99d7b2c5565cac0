//! Flight-data track.
//!
//! Each complete flight sample is a candidate point. A candidate is kept
//! only if it deviates from the last kept point by more than the
//! simplification tolerance. The last kept point is read back from the
//! `Data` folder on every update.

use chrono::{DateTime, Local};
use tracing::{trace, warn};

use super::{DataAltitude, TrackConfig};
use crate::document::{AltitudeMode, Coordinate, DocumentTree, FolderKey, Placemark};
use crate::geometry::{Point3, Simplifier};
use crate::status::FlightSample;

/// Builds the simplified flight-data track.
#[derive(Debug, Clone)]
pub struct DataTrackBuilder {
    simplifier: Simplifier,
    altitude: DataAltitude,
    retained: u64,
    discarded: u64,
}

impl DataTrackBuilder {
    /// Create a builder from the session's track policies.
    pub fn new(config: &TrackConfig) -> Self {
        Self {
            simplifier: Simplifier::new(config.simplify_tolerance, config.metric),
            altitude: config.data_altitude,
            retained: 0,
            discarded: 0,
        }
    }

    /// Points appended to the track.
    pub fn retained(&self) -> u64 {
        self.retained
    }

    /// Candidates dropped as redundant.
    pub fn discarded(&self) -> u64 {
        self.discarded
    }

    /// Offer a complete sample to the track.
    ///
    /// Returns true if a placemark was appended. A simplification error
    /// keeps the candidate.
    pub fn on_sample(
        &mut self,
        sample: &FlightSample,
        recorded_at: DateTime<Local>,
        tree: &mut DocumentTree,
    ) -> bool {
        let position = sample.position;
        let (altitude, altitude_mode) = match self.altitude {
            DataAltitude::Msl => (position.altitude_msl, AltitudeMode::Absolute),
            DataAltitude::Agl => (position.altitude_agl, AltitudeMode::RelativeToGround),
        };
        let candidate = Point3::new(position.latitude, position.longitude, altitude);

        let previous = tree
            .latest_placemark(FolderKey::Data)
            .ok()
            .and_then(Placemark::last_coordinate)
            .map(|c| Point3::new(c.latitude, c.longitude, c.altitude.unwrap_or_default()));

        if let Some(previous) = previous {
            match self.simplifier.is_redundant(previous, candidate) {
                Ok(true) => {
                    self.discarded += 1;
                    trace!("Flight data point within tolerance, discarded");
                    return false;
                }
                Ok(false) => {}
                Err(e) => {
                    warn!(error = %e, "Failed to simplify flight data, keeping point");
                }
            }
        }

        let coordinate = Coordinate::new(position.longitude, position.latitude, Some(altitude));
        tree.add_placemark(
            FolderKey::Data,
            Placemark::flight_data(coordinate, altitude_mode, sample, recorded_at),
        );
        self.retained += 1;
        true
    }
}
