//! Track builders.
//!
//! Two tracks are built from the same stream of position updates:
//!
//! - [`TrackSegmenter`] - the flight track, one line-string placemark per
//!   contiguous ground or airborne run
//! - [`DataTrackBuilder`] - the flight-data track, annotated points thinned
//!   out by a streaming Ramer–Douglas–Peucker test
//!
//! Both write into a [`DocumentTree`](crate::document::DocumentTree) and
//! never keep references into it between updates.

mod data_track;
mod segmenter;

use std::fmt;
use std::str::FromStr;

use crate::document::DEFAULT_GROUND_ALTITUDE;
use crate::geometry::{DistanceMetric, DEFAULT_SIMPLIFY_TOLERANCE};
use crate::status::VerticalRateSource;

pub use data_track::DataTrackBuilder;
pub use segmenter::{SegmentState, TrackSegmenter};

/// Which altitude the flight-data track uses for its points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DataAltitude {
    /// Altitude above mean sea level.
    #[default]
    Msl,
    /// Altitude above ground level.
    Agl,
}

impl fmt::Display for DataAltitude {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataAltitude::Msl => write!(f, "msl"),
            DataAltitude::Agl => write!(f, "agl"),
        }
    }
}

impl FromStr for DataAltitude {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "msl" => Ok(DataAltitude::Msl),
            "agl" => Ok(DataAltitude::Agl),
            other => Err(format!("unknown altitude reference '{}'", other)),
        }
    }
}

/// Policies shared by the track builders of one session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackConfig {
    /// Maximum deviation for a flight-data point to be considered redundant.
    pub simplify_tolerance: f64,
    /// Fixed altitude of ground segments.
    pub ground_altitude: f64,
    /// Category that supplies the vertical rate of flight samples.
    pub vertical_rate_source: VerticalRateSource,
    /// Altitude used for flight-data points.
    pub data_altitude: DataAltitude,
    /// Distance metric used by the simplifier.
    pub metric: DistanceMetric,
}

impl Default for TrackConfig {
    fn default() -> Self {
        Self {
            simplify_tolerance: DEFAULT_SIMPLIFY_TOLERANCE,
            ground_altitude: DEFAULT_GROUND_ALTITUDE,
            vertical_rate_source: VerticalRateSource::default(),
            data_altitude: DataAltitude::default(),
            metric: DistanceMetric::Euclidean,
        }
    }
}
