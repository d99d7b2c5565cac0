//! Flight-track segmentation.
//!
//! Every ground/air transition closes the current segment and opens a new
//! one in the `FlightLog` subfolder. Ground segments carry no per-point
//! altitude; airborne segments carry MSL altitude.

use tracing::{debug, error, info};

use crate::document::{Coordinate, DocumentTree, FolderKey, Placemark};
use crate::telemetry::PositionSample;

/// Segmenter state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SegmentState {
    /// No segment opened yet.
    #[default]
    Idle,
    /// A segment is open with the given ground state.
    Active { on_ground: bool },
}

/// Builds the flight track from position updates.
#[derive(Debug, Clone)]
pub struct TrackSegmenter {
    state: SegmentState,
    ground_altitude: f64,
    segments_opened: usize,
}

impl TrackSegmenter {
    /// Create a segmenter; ground segments are drawn at `ground_altitude`.
    pub fn new(ground_altitude: f64) -> Self {
        Self {
            state: SegmentState::Idle,
            ground_altitude,
            segments_opened: 0,
        }
    }

    pub fn state(&self) -> SegmentState {
        self.state
    }

    /// Number of segments opened so far.
    pub fn segments_opened(&self) -> usize {
        self.segments_opened
    }

    /// Record a position update.
    ///
    /// Failures are logged and the update is skipped; the track is never
    /// left in a state that would stop later updates.
    pub fn on_position(&mut self, position: &PositionSample, tree: &mut DocumentTree) {
        let on_ground = position.is_on_ground();

        let needs_segment = match self.state {
            SegmentState::Idle => true,
            SegmentState::Active { on_ground: current } => current != on_ground,
        };

        if needs_segment {
            let segment = Placemark::flight_segment(on_ground, self.ground_altitude);
            if let Err(e) = tree.add_placemark_to_subfolder(FolderKey::Flight, segment) {
                error!(error = %e, "Failed to open flight track segment");
                return;
            }
            self.segments_opened += 1;
            if self.state != SegmentState::Idle {
                info!(on_ground, "Ground state changed, new track segment");
            } else {
                debug!(on_ground, "First track segment opened");
            }
            self.state = SegmentState::Active { on_ground };
        }

        let altitude = (!on_ground).then_some(position.altitude_msl);
        let coordinate = Coordinate::new(position.longitude, position.latitude, altitude);

        match tree.latest_subfolder_placemark_mut(FolderKey::Flight) {
            Ok(placemark) => match placemark.line_string_mut() {
                Some(line) => line.push(coordinate),
                None => error!("Latest flight track placemark has no line string"),
            },
            Err(e) => error!(error = %e, "Failed to fetch current flight track segment"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{AltitudeMode, IN_THE_AIR_NAME, ON_GROUND_NAME};
    use chrono::Local;
    use proptest::prelude::*;

    fn position(agl: f64) -> PositionSample {
        PositionSample::new(45.0, -122.0, agl, 150.0 + agl)
    }

    fn segments(tree: &DocumentTree) -> &[Placemark] {
        tree.folder(FolderKey::Flight)
            .subfolder()
            .map(|f| f.placemarks())
            .unwrap_or_default()
    }

    #[test]
    fn test_first_position_opens_one_segment() {
        let mut tree = DocumentTree::new(Local::now());
        let mut segmenter = TrackSegmenter::new(1.0);
        assert_eq!(segmenter.state(), SegmentState::Idle);

        segmenter.on_position(&position(500.0), &mut tree);

        assert_eq!(segments(&tree).len(), 1);
        assert_eq!(segmenter.state(), SegmentState::Active { on_ground: false });
        let line = segments(&tree)[0].line_string().unwrap();
        assert_eq!(line.altitude_mode, AltitudeMode::Absolute);
        assert_eq!(
            line.coordinates(),
            &[Coordinate::new(-122.0, 45.0, Some(650.0))]
        );
    }

    #[test]
    fn test_ground_then_air() {
        let mut tree = DocumentTree::new(Local::now());
        let mut segmenter = TrackSegmenter::new(1.0);

        for agl in [0.0, 0.0, 120.0] {
            segmenter.on_position(&position(agl), &mut tree);
        }

        let segments = segments(&tree);
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].name.as_deref(), Some(ON_GROUND_NAME));
        assert_eq!(segments[1].name.as_deref(), Some(IN_THE_AIR_NAME));

        let ground = segments[0].line_string().unwrap();
        assert_eq!(ground.coordinates().len(), 2);
        assert!(ground.coordinates().iter().all(|c| c.altitude.is_none()));
        assert_eq!(ground.altitude, Some(1.0));

        let air = segments[1].line_string().unwrap();
        assert_eq!(air.coordinates().len(), 1);
        assert_eq!(air.coordinates()[0].altitude, Some(270.0));
    }

    #[test]
    fn test_custom_ground_altitude() {
        let mut tree = DocumentTree::new(Local::now());
        let mut segmenter = TrackSegmenter::new(3.5);
        segmenter.on_position(&position(0.0), &mut tree);
        assert_eq!(segments(&tree)[0].line_string().unwrap().altitude, Some(3.5));
    }

    proptest! {
        #[test]
        fn prop_segments_equal_transitions_plus_one(
            agls in proptest::collection::vec(prop_oneof![Just(0.0), -5.0..0.0f64, 0.1..3000.0f64], 1..60),
        ) {
            let mut tree = DocumentTree::new(Local::now());
            let mut segmenter = TrackSegmenter::new(1.0);
            for agl in &agls {
                segmenter.on_position(&position(*agl), &mut tree);
            }

            let transitions = agls
                .windows(2)
                .filter(|w| (w[0] <= 0.0) != (w[1] <= 0.0))
                .count();
            prop_assert_eq!(segments(&tree).len(), transitions + 1);
            prop_assert_eq!(segmenter.segments_opened(), transitions + 1);

            let total: usize = segments(&tree)
                .iter()
                .map(|p| p.line_string().unwrap().coordinates().len())
                .sum();
            prop_assert_eq!(total, agls.len());
        }
    }
}
