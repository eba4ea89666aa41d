//! Track load lifecycle and active-cue tracking integration tests.
//!
//! Drives a track through mode changes, concurrent load attempts, and a
//! simulated playback timeline, asserting the edge-triggered tracker
//! contract against it.

use cue_core::{
    ActiveCueTracker, CoreError, ReadyState, Track, TrackKind, TrackMode,
};

const SOURCE: &str = "WEBVTT\n\n\
    a\n00:02.000 --> 00:05.000\nfirst\n\n\
    b\n00:04.000 --> 00:08.000\nsecond\n";

fn showing_track() -> Track {
    let mut track = Track::new(TrackKind::Subtitles, "English", "en");
    track.set_mode(TrackMode::Showing);
    let token = track.begin_load();
    track.commit_source(token, SOURCE).expect("valid source");
    track
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A playback sweep fires each enter and exit edge exactly once.
    #[test]
    fn test_playback_sweep_edges() {
        let track = showing_track();
        let mut tracker = ActiveCueTracker::new();

        let mut enters = 0;
        let mut exits = 0;
        for t in [0.0, 1.0, 2.0, 3.0, 4.0, 4.5, 6.0, 7.0, 9.0, 10.0] {
            let refresh = tracker.refresh(&track, t);
            enters += refresh.entered.len();
            exits += refresh.exited.len();
        }
        assert_eq!(enters, 2);
        assert_eq!(exits, 2);
    }

    /// `changed` reflects identity-list differences only; steady refreshes
    /// within a cue's interval report no change.
    #[test]
    fn test_changed_flag_is_identity_based() {
        let track = showing_track();
        let mut tracker = ActiveCueTracker::new();

        assert!(!tracker.refresh(&track, 0.0).changed);
        assert!(tracker.refresh(&track, 2.5).changed);
        assert!(!tracker.refresh(&track, 3.0).changed);
        assert!(tracker.refresh(&track, 4.5).changed);
        assert!(!tracker.refresh(&track, 4.6).changed);
    }

    /// Hidden tracks still track cues; disabled tracks drop everything.
    #[test]
    fn test_mode_transitions() {
        let mut track = showing_track();
        let mut tracker = ActiveCueTracker::new();
        assert_eq!(tracker.refresh(&track, 3.0).active.len(), 1);

        track.set_mode(TrackMode::Hidden);
        assert_eq!(tracker.refresh(&track, 3.0).active.len(), 1);

        track.set_mode(TrackMode::Disabled);
        let off = tracker.refresh(&track, 3.0);
        assert!(off.active.is_empty());
        assert!(off.changed);
        assert_eq!(track.ready_state(), ReadyState::NotLoaded);
        assert!(track.cues().is_empty());
    }

    /// Of two racing loads only the later one lands; the earlier commit is
    /// a silent no-op.
    #[test]
    fn test_racing_loads_keep_latest() {
        let mut track = Track::new(TrackKind::Captions, "t", "en");
        track.set_mode(TrackMode::Showing);

        let slow = track.begin_load();
        let fast = track.begin_load();
        assert!(track
            .commit_source(fast, "x\n00:01.000 --> 00:02.000\nfresh\n")
            .expect("fresh commit"));
        assert!(!track.commit_source(slow, SOURCE).expect("stale commit"));

        assert_eq!(track.cues().len(), 1);
        assert_eq!(track.cues().get_by_id("x").expect("cue x").render_text(None), "fresh");
    }

    /// A failed load surfaces through state and the error hook, and a
    /// retry recovers.
    #[test]
    fn test_failure_and_retry() {
        let mut track = Track::new(TrackKind::Subtitles, "t", "en");
        let token = track.begin_load();
        track.fail_load(token, &CoreError::parse("connection reset"));
        assert_eq!(track.ready_state(), ReadyState::Error);

        let retry = track.begin_load();
        track.commit_source(retry, SOURCE).expect("retry");
        assert_eq!(track.ready_state(), ReadyState::Loaded);
        assert_eq!(track.cues().len(), 2);
    }
}
