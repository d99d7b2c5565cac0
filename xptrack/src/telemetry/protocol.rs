//! X-Plane `DATA` packet decoding.
//!
//! A packet is the ASCII header `DATA`, one internal-use byte, then a series
//! of 36-byte records: a little-endian `u32` data index followed by eight
//! little-endian `f32` values. Each record becomes one [`TelemetryEvent`].

use tracing::trace;

use super::event::{
    AngularRate, Attitude, EngineRpm, FlightControls, GearBrakes, LoadFactor, PositionSample,
    Speed, TelemetryEvent, TrimFlapsBrakes, Weather,
};

/// Size of the X-Plane DATA packet header ("DATA" + 1 byte).
const DATA_HEADER_SIZE: usize = 5;

/// Size of each data record (4-byte index + 8 floats).
const DATA_RECORD_SIZE: usize = 36;

/// [kias, keas, ktas, ktgs, -, mph ind, mph true, mph gs]
const INDEX_SPEEDS: u32 = 3;

/// [mach, -, vvi fpm, -, g normal, g axial, g side, -]
const INDEX_MACH_VVI_GLOAD: u32 = 4;

/// [sl pressure, sl temp, -, wind speed, wind dir, turbulence, precip, hail]
const INDEX_WEATHER: u32 = 5;

/// [elevator, aileron, rudder, ...]
const INDEX_FLIGHT_CONTROLS: u32 = 11;

/// [elev trim, ail trim, rud trim, flap handle, flap pos, slat, sbrake handle, sbrake pos]
const INDEX_TRIM_FLAPS_BRAKES: u32 = 13;

/// [gear, wheel brakes, left brake, right brake, ...]
const INDEX_GEAR_BRAKES: u32 = 14;

/// [Q, P, R, ...] in rad/s.
const INDEX_ANGULAR_VELOCITIES: u32 = 16;

/// [pitch, roll, heading true, heading mag, ...]
const INDEX_HEADINGS: u32 = 17;

/// [lat, lon, alt ft msl, alt ft agl, on runway, alt ind, lat south, lon west]
const INDEX_POSITION: u32 = 20;

/// RPM for engines 1 through 8.
const INDEX_ENGINE_RPM: u32 = 37;

/// Decode a `DATA` packet into telemetry events.
///
/// Returns `None` if the packet is not a `DATA` packet. Trailing bytes that
/// do not form a whole record are ignored.
pub fn parse_packet(data: &[u8]) -> Option<Vec<TelemetryEvent>> {
    if data.len() < DATA_HEADER_SIZE || &data[0..4] != b"DATA" {
        return None;
    }

    let records = &data[DATA_HEADER_SIZE..];
    if records.len() % DATA_RECORD_SIZE != 0 {
        trace!(
            len = records.len(),
            "DATA packet has a partial trailing record"
        );
    }

    Some(
        records
            .chunks_exact(DATA_RECORD_SIZE)
            .map(parse_record)
            .collect(),
    )
}

fn parse_record(chunk: &[u8]) -> TelemetryEvent {
    let index = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);

    let v: [f64; 8] = std::array::from_fn(|i| {
        let offset = 4 + i * 4;
        f32::from_le_bytes([
            chunk[offset],
            chunk[offset + 1],
            chunk[offset + 2],
            chunk[offset + 3],
        ]) as f64
    });

    match index {
        INDEX_SPEEDS => TelemetryEvent::Speed(Speed {
            indicated: v[0],
            true_airspeed: v[2],
            ground: v[3],
        }),
        INDEX_MACH_VVI_GLOAD => TelemetryEvent::LoadFactor(LoadFactor {
            mach: v[0],
            vertical_speed: v[2],
            normal: v[4],
            axial: v[5],
            side: v[6],
        }),
        INDEX_WEATHER => TelemetryEvent::Weather(Weather {
            sea_level_pressure: v[0],
            sea_level_temperature: v[1],
            wind_speed: v[3],
            wind_direction: v[4],
        }),
        INDEX_FLIGHT_CONTROLS => TelemetryEvent::FlightControls(FlightControls {
            elevator: v[0],
            aileron: v[1],
            rudder: v[2],
        }),
        INDEX_TRIM_FLAPS_BRAKES => TelemetryEvent::TrimFlapsBrakes(TrimFlapsBrakes {
            elevator_trim: v[0],
            aileron_trim: v[1],
            rudder_trim: v[2],
            flaps: v[4],
            speedbrake: v[7],
        }),
        INDEX_GEAR_BRAKES => TelemetryEvent::GearBrakes(GearBrakes {
            gear: v[0],
            wheel_brakes: v[1],
            left_brake: v[2],
            right_brake: v[3],
        }),
        INDEX_ANGULAR_VELOCITIES => TelemetryEvent::AngularRate(AngularRate {
            x: v[0],
            y: v[1],
            z: v[2],
        }),
        INDEX_HEADINGS => TelemetryEvent::Attitude(Attitude {
            pitch: v[0],
            roll: v[1],
            heading_true: v[2],
            heading_magnetic: v[3],
        }),
        INDEX_POSITION => TelemetryEvent::Position(PositionSample {
            latitude: v[0],
            longitude: v[1],
            altitude_msl: v[2],
            altitude_agl: v[3],
        }),
        INDEX_ENGINE_RPM => TelemetryEvent::EngineRpm(EngineRpm { rpm: v }),
        other => TelemetryEvent::Unknown { index: other },
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Build a DATA packet from (index, values) records.
    pub(crate) fn create_data_packet(records: &[(u32, [f32; 8])]) -> Vec<u8> {
        let mut packet = Vec::with_capacity(DATA_HEADER_SIZE + records.len() * DATA_RECORD_SIZE);
        packet.extend_from_slice(b"DATA");
        packet.push(b'*');

        for (index, floats) in records {
            packet.extend_from_slice(&index.to_le_bytes());
            for f in floats {
                packet.extend_from_slice(&f.to_le_bytes());
            }
        }
        packet
    }

    #[test]
    fn test_parse_position_record() {
        let packet = create_data_packet(&[(
            INDEX_POSITION,
            [45.5, -122.5, 5100.0, 4000.0, 0.0, 0.0, 0.0, 0.0],
        )]);

        let events = parse_packet(&packet).unwrap();
        assert_eq!(events.len(), 1);
        match events[0] {
            TelemetryEvent::Position(p) => {
                assert!((p.latitude - 45.5).abs() < 0.001);
                assert!((p.longitude - (-122.5)).abs() < 0.001);
                assert!((p.altitude_msl - 5100.0).abs() < 0.1);
                assert!((p.altitude_agl - 4000.0).abs() < 0.1);
            }
            other => panic!("expected position, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_headings_record() {
        let packet =
            create_data_packet(&[(INDEX_HEADINGS, [5.0, 2.0, 270.0, 268.0, 0.0, 0.0, 0.0, 0.0])]);

        let events = parse_packet(&packet).unwrap();
        match events[0] {
            TelemetryEvent::Attitude(a) => {
                assert!((a.heading_true - 270.0).abs() < 0.1);
                assert!((a.heading_magnetic - 268.0).abs() < 0.1);
                assert!((a.pitch - 5.0).abs() < 0.1);
            }
            other => panic!("expected attitude, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_speed_record() {
        let packet = create_data_packet(&[(
            INDEX_SPEEDS,
            [150.0, 148.0, 165.0, 145.0, 0.0, 0.0, 0.0, 0.0],
        )]);

        let events = parse_packet(&packet).unwrap();
        assert_eq!(
            events[0],
            TelemetryEvent::Speed(Speed {
                indicated: 150.0,
                ground: 145.0,
                true_airspeed: 165.0,
            })
        );
    }

    #[test]
    fn test_parse_combined_packet_preserves_order() {
        let packet = create_data_packet(&[
            (
                INDEX_POSITION,
                [40.0, -75.0, 3050.0, 3000.0, 0.0, 0.0, 0.0, 0.0],
            ),
            (INDEX_HEADINGS, [0.0, 0.0, 90.0, 88.0, 0.0, 0.0, 0.0, 0.0]),
            (INDEX_ANGULAR_VELOCITIES, [0.1, 0.2, 0.3, 0.0, 0.0, 0.0, 0.0, 0.0]),
        ]);

        let categories: Vec<_> = parse_packet(&packet)
            .unwrap()
            .iter()
            .map(|e| e.category())
            .collect();
        assert_eq!(
            categories,
            vec![
                super::super::event::Category::Position,
                super::super::event::Category::Attitude,
                super::super::event::Category::AngularRate,
            ]
        );
    }

    #[test]
    fn test_unknown_index_is_kept_as_unknown() {
        let packet = create_data_packet(&[(99, [0.0; 8])]);
        assert_eq!(
            parse_packet(&packet).unwrap(),
            vec![TelemetryEvent::Unknown { index: 99 }]
        );
    }

    #[test]
    fn test_parse_invalid_header() {
        assert!(parse_packet(b"NOTD\x00").is_none());
    }

    #[test]
    fn test_parse_too_short() {
        assert!(parse_packet(b"DAT").is_none());
    }

    #[test]
    fn test_header_only_packet_has_no_events() {
        assert_eq!(parse_packet(b"DATA*").unwrap(), vec![]);
    }

    #[test]
    fn test_partial_trailing_record_is_ignored() {
        let mut packet = create_data_packet(&[(INDEX_SPEEDS, [1.0; 8])]);
        packet.extend_from_slice(&[0u8; 10]);
        assert_eq!(parse_packet(&packet).unwrap().len(), 1);
    }

    #[test]
    fn test_engine_rpm_record() {
        let packet = create_data_packet(&[(
            INDEX_ENGINE_RPM,
            [2400.0, 2410.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
        )]);
        match parse_packet(&packet).unwrap()[0] {
            TelemetryEvent::EngineRpm(e) => {
                assert!((e.rpm[0] - 2400.0).abs() < 0.1);
                assert!((e.rpm[1] - 2410.0).abs() < 0.1);
            }
            other => panic!("expected engine rpm, got {:?}", other),
        }
    }
}
