//! Placemarks and their geometries.

use chrono::{DateTime, Local};

use crate::status::FlightSample;

/// Style shared by every flight-track segment.
pub const FLIGHT_STYLE_URL: &str = "#msn_ylw-pushpin";

/// Name of a flight-track segment recorded on the ground.
pub const ON_GROUND_NAME: &str = "On Ground";

/// Name of a flight-track segment recorded in the air.
pub const IN_THE_AIR_NAME: &str = "In the air";

/// Default fixed altitude for ground segments.
pub const DEFAULT_GROUND_ALTITUDE: f64 = 1.0;

/// A geographic coordinate in degrees, with optional altitude in feet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    pub longitude: f64,
    pub latitude: f64,
    pub altitude: Option<f64>,
}

impl Coordinate {
    /// Create a coordinate.
    pub fn new(longitude: f64, latitude: f64, altitude: Option<f64>) -> Self {
        Self {
            longitude,
            latitude,
            altitude,
        }
    }
}

/// How a geometry's altitude is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AltitudeMode {
    /// Drawn on the terrain, at the line's fixed altitude if one is set.
    #[default]
    ClampToGround,
    /// Each coordinate's altitude is above the terrain below it.
    RelativeToGround,
    /// Each coordinate's altitude is above mean sea level.
    Absolute,
}

/// An ordered, append-only run of coordinates with rendering hints.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LineString {
    pub extrude: bool,
    pub tessellate: bool,
    /// Fixed altitude used for every coordinate without one.
    pub altitude: Option<f64>,
    pub altitude_mode: AltitudeMode,
    coordinates: Vec<Coordinate>,
}

impl LineString {
    /// Line string for a ground segment, drawn at a fixed altitude.
    pub fn on_ground(altitude: f64) -> Self {
        Self {
            extrude: true,
            tessellate: true,
            altitude: Some(altitude),
            altitude_mode: AltitudeMode::ClampToGround,
            coordinates: Vec::new(),
        }
    }

    /// Line string for an airborne segment, using absolute altitudes.
    pub fn in_the_air() -> Self {
        Self {
            extrude: true,
            tessellate: true,
            altitude: None,
            altitude_mode: AltitudeMode::Absolute,
            coordinates: Vec::new(),
        }
    }

    /// Append a coordinate.
    pub fn push(&mut self, coordinate: Coordinate) {
        self.coordinates.push(coordinate);
    }

    /// Coordinates in insertion order.
    pub fn coordinates(&self) -> &[Coordinate] {
        &self.coordinates
    }

    /// Last appended coordinate.
    pub fn last(&self) -> Option<&Coordinate> {
        self.coordinates.last()
    }
}

/// Geometry of a placemark.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    LineString(LineString),
    /// A single coordinate and the reference its altitude is measured from.
    Point(Coordinate, AltitudeMode),
}

/// A named, styled geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct Placemark {
    pub name: Option<String>,
    pub description: Option<String>,
    pub style_url: Option<String>,
    pub geometry: Geometry,
}

impl Placemark {
    /// A new, empty flight-track segment.
    pub fn flight_segment(on_ground: bool, ground_altitude: f64) -> Self {
        let (name, line) = if on_ground {
            (ON_GROUND_NAME, LineString::on_ground(ground_altitude))
        } else {
            (IN_THE_AIR_NAME, LineString::in_the_air())
        };

        Self {
            name: Some(name.to_string()),
            description: None,
            style_url: Some(FLIGHT_STYLE_URL.to_string()),
            geometry: Geometry::LineString(line),
        }
    }

    /// An unnamed point annotated with the state of the aircraft.
    ///
    /// `altitude_mode` says whether the coordinate's altitude is MSL
    /// ([`AltitudeMode::Absolute`]) or AGL ([`AltitudeMode::RelativeToGround`]).
    pub fn flight_data(
        coordinate: Coordinate,
        altitude_mode: AltitudeMode,
        sample: &FlightSample,
        recorded_at: DateTime<Local>,
    ) -> Self {
        Self {
            name: None,
            description: Some(describe_sample(sample, recorded_at)),
            style_url: None,
            geometry: Geometry::Point(coordinate, altitude_mode),
        }
    }

    /// A named point marking a notable moment of the flight.
    ///
    /// Positioned at the sample's MSL altitude.
    pub fn special(
        name: impl Into<String>,
        sample: &FlightSample,
        recorded_at: DateTime<Local>,
    ) -> Self {
        let position = sample.position;
        let coordinate = Coordinate::new(
            position.longitude,
            position.latitude,
            Some(position.altitude_msl),
        );
        Self {
            name: Some(name.into()),
            ..Self::flight_data(coordinate, AltitudeMode::Absolute, sample, recorded_at)
        }
    }

    /// The line string, if this placemark is a track segment.
    pub fn line_string(&self) -> Option<&LineString> {
        match &self.geometry {
            Geometry::LineString(line) => Some(line),
            Geometry::Point(..) => None,
        }
    }

    /// Mutable access to the line string, if this placemark is a track segment.
    pub fn line_string_mut(&mut self) -> Option<&mut LineString> {
        match &mut self.geometry {
            Geometry::LineString(line) => Some(line),
            Geometry::Point(..) => None,
        }
    }

    /// The most recent coordinate of this placemark's geometry.
    pub fn last_coordinate(&self) -> Option<Coordinate> {
        match &self.geometry {
            Geometry::LineString(line) => line.last().copied(),
            Geometry::Point(coordinate, _) => Some(*coordinate),
        }
    }
}

/// HTML description of a flight sample, as shown in the placemark balloon.
pub fn describe_sample(sample: &FlightSample, recorded_at: DateTime<Local>) -> String {
    format!(
        "Time/Date: {}<br>Hdg: {:6.2}<br>True Hdg: {:6.2}<br>IAS: {:6.2}<br>GS: {:6.2}<br>\
         TAS: {:6.2}<br>Alt: {:6.2}<br>Alt AGL: {:6.2}<br>VS: {:6.2}",
        recorded_at.format("%Y-%m-%d %H:%M:%S%.3f %:z"),
        sample.attitude.heading_magnetic,
        sample.attitude.heading_true,
        sample.speed.indicated,
        sample.speed.ground,
        sample.speed.true_airspeed,
        sample.position.altitude_msl,
        sample.position.altitude_agl,
        sample.vertical_rate,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::telemetry::{Attitude, PositionSample, Speed};

    fn sample() -> FlightSample {
        FlightSample {
            position: PositionSample::new(45.5, -122.5, 1200.0, 1350.0),
            attitude: Attitude {
                heading_magnetic: 268.0,
                heading_true: 270.5,
                ..Default::default()
            },
            speed: Speed {
                indicated: 120.0,
                ground: 118.25,
                true_airspeed: 125.0,
            },
            vertical_rate: 0.75,
        }
    }

    #[test]
    fn test_ground_segment() {
        let placemark = Placemark::flight_segment(true, DEFAULT_GROUND_ALTITUDE);
        assert_eq!(placemark.name.as_deref(), Some(ON_GROUND_NAME));
        assert_eq!(placemark.style_url.as_deref(), Some(FLIGHT_STYLE_URL));

        let line = placemark.line_string().unwrap();
        assert!(line.extrude && line.tessellate);
        assert_eq!(line.altitude, Some(1.0));
        assert_eq!(line.altitude_mode, AltitudeMode::ClampToGround);
        assert!(line.coordinates().is_empty());
    }

    #[test]
    fn test_air_segment() {
        let placemark = Placemark::flight_segment(false, DEFAULT_GROUND_ALTITUDE);
        assert_eq!(placemark.name.as_deref(), Some(IN_THE_AIR_NAME));

        let line = placemark.line_string().unwrap();
        assert_eq!(line.altitude, None);
        assert_eq!(line.altitude_mode, AltitudeMode::Absolute);
    }

    #[test]
    fn test_segment_last_coordinate() {
        let mut placemark = Placemark::flight_segment(false, DEFAULT_GROUND_ALTITUDE);
        assert_eq!(placemark.last_coordinate(), None);

        let line = placemark.line_string_mut().unwrap();
        line.push(Coordinate::new(1.0, 2.0, Some(3.0)));
        line.push(Coordinate::new(4.0, 5.0, Some(6.0)));
        assert_eq!(
            placemark.last_coordinate(),
            Some(Coordinate::new(4.0, 5.0, Some(6.0)))
        );
    }

    #[test]
    fn test_description_fields() {
        let text = describe_sample(&sample(), Local::now());
        assert!(text.starts_with("Time/Date: "));
        assert!(text.contains("Hdg: 268.00"));
        assert!(text.contains("True Hdg: 270.50"));
        assert!(text.contains("GS: 118.25"));
        assert!(text.contains("Alt AGL: 1200.00"));
        assert!(text.contains("VS:   0.75"));
    }

    #[test]
    fn test_special_placemark() {
        let placemark = Placemark::special("Touchdown", &sample(), Local::now());
        assert_eq!(placemark.name.as_deref(), Some("Touchdown"));
        assert!(placemark.description.is_some());
        assert_eq!(
            placemark.geometry,
            Geometry::Point(
                Coordinate::new(-122.5, 45.5, Some(1350.0)),
                AltitudeMode::Absolute
            )
        );
        assert!(placemark.line_string().is_none());
    }
}
