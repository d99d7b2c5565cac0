//! Typed telemetry events.
//!
//! One variant per telemetry category. Values are carried in the units
//! X-Plane reports them in (degrees, feet, knots, rad/s).

/// Position sample: latitude/longitude in degrees, altitudes in feet.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PositionSample {
    pub latitude: f64,
    pub longitude: f64,
    pub altitude_agl: f64,
    pub altitude_msl: f64,
}

impl PositionSample {
    /// Create a new position sample.
    pub fn new(latitude: f64, longitude: f64, altitude_agl: f64, altitude_msl: f64) -> Self {
        Self {
            latitude,
            longitude,
            altitude_agl,
            altitude_msl,
        }
    }

    /// True when the aircraft is on the ground (AGL ≤ 0).
    pub fn is_on_ground(&self) -> bool {
        self.altitude_agl <= 0.0
    }
}

/// Pitch, roll and headings in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Attitude {
    pub pitch: f64,
    pub roll: f64,
    pub heading_magnetic: f64,
    pub heading_true: f64,
}

/// Airspeeds in knots.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Speed {
    pub indicated: f64,
    pub ground: f64,
    pub true_airspeed: f64,
}

/// Angular velocity vector in rad/s.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AngularRate {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// Engine RPM, one slot per engine.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EngineRpm {
    pub rpm: [f64; 8],
}

/// Flight control surface deflections (ratio).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FlightControls {
    pub elevator: f64,
    pub aileron: f64,
    pub rudder: f64,
}

/// Landing gear and brake state.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GearBrakes {
    pub gear: f64,
    pub wheel_brakes: f64,
    pub left_brake: f64,
    pub right_brake: f64,
}

/// Mach number, vertical speed (ft/min) and load factors (g).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LoadFactor {
    pub mach: f64,
    pub vertical_speed: f64,
    pub normal: f64,
    pub axial: f64,
    pub side: f64,
}

/// Sea-level atmosphere and wind.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Weather {
    pub sea_level_pressure: f64,
    pub sea_level_temperature: f64,
    pub wind_speed: f64,
    pub wind_direction: f64,
}

/// Trim, flaps and speedbrake positions.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TrimFlapsBrakes {
    pub elevator_trim: f64,
    pub aileron_trim: f64,
    pub rudder_trim: f64,
    pub flaps: f64,
    pub speedbrake: f64,
}

/// A single decoded telemetry event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TelemetryEvent {
    Position(PositionSample),
    Attitude(Attitude),
    Speed(Speed),
    AngularRate(AngularRate),
    EngineRpm(EngineRpm),
    FlightControls(FlightControls),
    GearBrakes(GearBrakes),
    LoadFactor(LoadFactor),
    Weather(Weather),
    TrimFlapsBrakes(TrimFlapsBrakes),
    /// A category this version does not interpret.
    Unknown { index: u32 },
}

/// Telemetry category, used for logging and completeness checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Position,
    Attitude,
    Speed,
    AngularRate,
    EngineRpm,
    FlightControls,
    GearBrakes,
    LoadFactor,
    Weather,
    TrimFlapsBrakes,
    Unknown,
}

impl TelemetryEvent {
    /// The category of this event.
    pub fn category(&self) -> Category {
        match self {
            TelemetryEvent::Position(_) => Category::Position,
            TelemetryEvent::Attitude(_) => Category::Attitude,
            TelemetryEvent::Speed(_) => Category::Speed,
            TelemetryEvent::AngularRate(_) => Category::AngularRate,
            TelemetryEvent::EngineRpm(_) => Category::EngineRpm,
            TelemetryEvent::FlightControls(_) => Category::FlightControls,
            TelemetryEvent::GearBrakes(_) => Category::GearBrakes,
            TelemetryEvent::LoadFactor(_) => Category::LoadFactor,
            TelemetryEvent::Weather(_) => Category::Weather,
            TelemetryEvent::TrimFlapsBrakes(_) => Category::TrimFlapsBrakes,
            TelemetryEvent::Unknown { .. } => Category::Unknown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ground_predicate() {
        assert!(PositionSample::new(45.0, -122.0, 0.0, 100.0).is_on_ground());
        assert!(PositionSample::new(45.0, -122.0, -0.5, 100.0).is_on_ground());
        assert!(!PositionSample::new(45.0, -122.0, 0.1, 100.0).is_on_ground());
    }

    #[test]
    fn test_category() {
        let event = TelemetryEvent::Speed(Speed::default());
        assert_eq!(event.category(), Category::Speed);
        assert_eq!(
            TelemetryEvent::Unknown { index: 99 }.category(),
            Category::Unknown
        );
    }
}
