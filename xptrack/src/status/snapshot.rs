//! Merged aircraft state.
//!
//! - [`Snapshot`] - latest value received for each telemetry category
//! - [`VerticalRateSource`] - which category supplies vertical rate
//! - [`FlightSample`] - the fields the flight-data track needs, all present

use std::fmt;
use std::str::FromStr;

use crate::telemetry::{
    AngularRate, Attitude, EngineRpm, FlightControls, GearBrakes, LoadFactor, PositionSample,
    Speed, TelemetryEvent, TrimFlapsBrakes, Weather,
};

/// Where the vertical rate of a flight sample comes from.
///
/// X-Plane reports a climb rate in the Mach/VVI/g-load row, but recorders
/// have historically used a component of the angular velocity vector
/// instead. Both are offered until one is settled on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VerticalRateSource {
    /// Y component of the angular velocity vector.
    #[default]
    AngularRate,
    /// Vertical speed (ft/min) from the load factor row.
    VerticalSpeed,
}

impl fmt::Display for VerticalRateSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VerticalRateSource::AngularRate => write!(f, "angular"),
            VerticalRateSource::VerticalSpeed => write!(f, "vvi"),
        }
    }
}

impl FromStr for VerticalRateSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "angular" => Ok(VerticalRateSource::AngularRate),
            "vvi" => Ok(VerticalRateSource::VerticalSpeed),
            other => Err(format!("unknown vertical rate source '{}'", other)),
        }
    }
}

/// Latest known value of every telemetry category.
///
/// Each field is `None` until its first event arrives and is only ever
/// replaced by a newer event of the same category.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Snapshot {
    pub position: Option<PositionSample>,
    pub attitude: Option<Attitude>,
    pub speed: Option<Speed>,
    pub angular_rate: Option<AngularRate>,
    pub engine_rpm: Option<EngineRpm>,
    pub flight_controls: Option<FlightControls>,
    pub gear_brakes: Option<GearBrakes>,
    pub load_factor: Option<LoadFactor>,
    pub weather: Option<Weather>,
    pub trim_flaps_brakes: Option<TrimFlapsBrakes>,
}

impl Snapshot {
    /// Return a new snapshot with `event` applied.
    ///
    /// Unknown categories return the snapshot unchanged.
    pub fn with_event(self, event: &TelemetryEvent) -> Self {
        let mut next = self;
        match *event {
            TelemetryEvent::Position(v) => next.position = Some(v),
            TelemetryEvent::Attitude(v) => next.attitude = Some(v),
            TelemetryEvent::Speed(v) => next.speed = Some(v),
            TelemetryEvent::AngularRate(v) => next.angular_rate = Some(v),
            TelemetryEvent::EngineRpm(v) => next.engine_rpm = Some(v),
            TelemetryEvent::FlightControls(v) => next.flight_controls = Some(v),
            TelemetryEvent::GearBrakes(v) => next.gear_brakes = Some(v),
            TelemetryEvent::LoadFactor(v) => next.load_factor = Some(v),
            TelemetryEvent::Weather(v) => next.weather = Some(v),
            TelemetryEvent::TrimFlapsBrakes(v) => next.trim_flaps_brakes = Some(v),
            TelemetryEvent::Unknown { .. } => {}
        }
        next
    }

    /// Vertical rate according to `source`, if that category has arrived.
    pub fn vertical_rate(&self, source: VerticalRateSource) -> Option<f64> {
        match source {
            VerticalRateSource::AngularRate => self.angular_rate.map(|a| a.y),
            VerticalRateSource::VerticalSpeed => self.load_factor.map(|l| l.vertical_speed),
        }
    }

    /// Everything the flight-data track needs, or `None` if incomplete.
    pub fn flight_sample(&self, source: VerticalRateSource) -> Option<FlightSample> {
        Some(FlightSample {
            position: self.position?,
            attitude: self.attitude?,
            speed: self.speed?,
            vertical_rate: self.vertical_rate(source)?,
        })
    }
}

/// A complete annotated sample for the flight-data track.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlightSample {
    pub position: PositionSample,
    pub attitude: Attitude,
    pub speed: Speed,
    pub vertical_rate: f64,
}
