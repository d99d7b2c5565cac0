//! Per-event dispatch into the aggregator and track builders.

use chrono::Local;

use crate::document::DocumentTree;
use crate::status::StatusAggregator;
use crate::telemetry::TelemetryEvent;
use crate::track::{DataTrackBuilder, TrackConfig, TrackSegmenter};

/// Counters for one recording.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecordingStats {
    /// Events consumed from the channel.
    pub events: u64,
    /// Events of categories that are not interpreted.
    pub ignored_events: u64,
    /// Flight-track segments opened.
    pub segments: usize,
    /// Flight-data points kept.
    pub data_points: u64,
    /// Flight-data candidates dropped by simplification.
    pub discarded_points: u64,
}

/// State owned by a session's consumer task.
#[derive(Debug, Clone)]
pub struct Recorder {
    aggregator: StatusAggregator,
    segmenter: TrackSegmenter,
    data_track: DataTrackBuilder,
    events: u64,
}

impl Recorder {
    /// Fresh recorder with an empty snapshot.
    pub fn new(config: &TrackConfig) -> Self {
        Self {
            aggregator: StatusAggregator::new(config.vertical_rate_source),
            segmenter: TrackSegmenter::new(config.ground_altitude),
            data_track: DataTrackBuilder::new(config),
            events: 0,
        }
    }

    /// Fold one event into the state and the document tree.
    ///
    /// Position events extend the flight track and, once every required
    /// category has been seen, offer a sample to the flight-data track.
    pub fn handle(&mut self, event: &TelemetryEvent, tree: &mut DocumentTree) {
        self.events += 1;
        self.aggregator.apply(event);

        let TelemetryEvent::Position(position) = event else {
            return;
        };

        self.segmenter.on_position(position, tree);

        if let Some(sample) = self.aggregator.flight_sample() {
            self.data_track.on_sample(&sample, Local::now(), tree);
        }
    }

    pub fn aggregator(&self) -> &StatusAggregator {
        &self.aggregator
    }

    pub fn stats(&self) -> RecordingStats {
        RecordingStats {
            events: self.events,
            ignored_events: self.aggregator.events_ignored(),
            segments: self.segmenter.segments_opened(),
            data_points: self.data_track.retained(),
            discarded_points: self.data_track.discarded(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::FolderKey;
    use crate::telemetry::{AngularRate, Attitude, PositionSample, Speed};

    fn prime(recorder: &mut Recorder, tree: &mut DocumentTree) {
        recorder.handle(&TelemetryEvent::Attitude(Attitude::default()), tree);
        recorder.handle(&TelemetryEvent::Speed(Speed::default()), tree);
        recorder.handle(&TelemetryEvent::AngularRate(AngularRate::default()), tree);
    }

    fn position(agl: f64) -> TelemetryEvent {
        TelemetryEvent::Position(PositionSample::new(45.0, -122.0, agl, 100.0 + agl))
    }

    #[test]
    fn test_incomplete_state_builds_only_flight_track() {
        let mut tree = DocumentTree::new(Local::now());
        let mut recorder = Recorder::new(&TrackConfig::default());

        recorder.handle(&position(0.0), &mut tree);

        assert_eq!(recorder.stats().segments, 1);
        assert!(tree.folder(FolderKey::Data).placemarks().is_empty());
    }

    #[test]
    fn test_complete_state_builds_both_tracks() {
        let mut tree = DocumentTree::new(Local::now());
        let mut recorder = Recorder::new(&TrackConfig::default());
        prime(&mut recorder, &mut tree);

        recorder.handle(&position(0.0), &mut tree);
        recorder.handle(&position(0.0), &mut tree);
        recorder.handle(&position(120.0), &mut tree);

        let stats = recorder.stats();
        assert_eq!(stats.events, 6);
        assert_eq!(stats.segments, 2);
        assert_eq!(stats.data_points, 2);
        assert_eq!(stats.discarded_points, 1);
    }

    #[test]
    fn test_non_position_events_do_not_touch_tree() {
        let mut tree = DocumentTree::new(Local::now());
        let mut recorder = Recorder::new(&TrackConfig::default());
        prime(&mut recorder, &mut tree);
        recorder.handle(&TelemetryEvent::Unknown { index: 42 }, &mut tree);

        assert_eq!(tree.total_placemarks(), 0);
        assert_eq!(recorder.stats().ignored_events, 1);
        assert!(!recorder.aggregator().is_complete());
    }
}
