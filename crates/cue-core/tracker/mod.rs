//! Edge-triggered active-cue tracking
//!
//! [`ActiveCueTracker`] diffs the set of cues active at the current playback
//! time against the previous refresh: a cue entering fires once, a cue
//! leaving fires once, and a refresh with unchanged membership fires nothing.
//! The previous-membership snapshot is an owned copy taken at refresh time,
//! so mutating the track between refreshes cannot retroactively change what
//! was considered active.

use core::fmt;

use ahash::AHashSet;

use crate::cue::Cue;
use crate::track::Track;

/// Result of one tracker refresh.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActiveCues {
    /// Store indices of all currently active cues, in store order
    pub active: Vec<usize>,
    /// Store indices of cues that became active this refresh
    pub entered: Vec<usize>,
    /// Store indices of cues that stopped being active this refresh
    pub exited: Vec<usize>,
    /// True iff the ordered active identity list differs from the previous
    /// refresh
    pub changed: bool,
}

/// Tracks active-cue membership for one track across refreshes.
#[derive(Default)]
pub struct ActiveCueTracker {
    // Cue creation orders, which stay valid across store mutation.
    previous: Vec<u32>,
    previous_set: AHashSet<u32>,
    on_enter: Option<Box<dyn FnMut(&Cue)>>,
    on_exit: Option<Box<dyn FnMut(&Cue)>>,
}

impl fmt::Debug for ActiveCueTracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActiveCueTracker")
            .field("previous", &self.previous)
            .finish_non_exhaustive()
    }
}

impl ActiveCueTracker {
    /// Create a tracker with no prior membership.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Callback fired once per cue activation, during refresh.
    pub fn set_on_enter(&mut self, callback: impl FnMut(&Cue) + 'static) {
        self.on_enter = Some(Box::new(callback));
    }

    /// Callback fired once per cue deactivation, during refresh.
    pub fn set_on_exit(&mut self, callback: impl FnMut(&Cue) + 'static) {
        self.on_exit = Some(Box::new(callback));
    }

    /// Recompute active membership at `current_time` and diff it against
    /// the previous refresh.
    ///
    /// A cue is active iff the track is tracking (mode hidden/showing and
    /// source loaded) and `start <= current_time <= end`. A track that
    /// stops tracking exits every previously active cue.
    pub fn refresh(&mut self, track: &Track, current_time: f64) -> ActiveCues {
        let active_indices = if track.is_tracking() {
            track.cues().active_at(current_time)
        } else {
            Vec::new()
        };

        let store = track.cues();
        let active_orders: Vec<u32> = active_indices
            .iter()
            .filter_map(|&i| store.get(i))
            .map(Cue::order)
            .collect();
        let active_set: AHashSet<u32> = active_orders.iter().copied().collect();

        let mut entered = Vec::new();
        for &index in &active_indices {
            let Some(cue) = store.get(index) else { continue };
            if !self.previous_set.contains(&cue.order()) {
                entered.push(index);
                if let Some(callback) = self.on_enter.as_mut() {
                    callback(cue);
                }
            }
        }

        // Exited cues are located by identity; a cue removed from the store
        // since the last refresh has nothing to report against.
        let mut exited = Vec::new();
        for (index, cue) in store.iter().enumerate() {
            if self.previous_set.contains(&cue.order()) && !active_set.contains(&cue.order()) {
                exited.push(index);
                if let Some(callback) = self.on_exit.as_mut() {
                    callback(cue);
                }
            }
        }

        let changed = active_orders != self.previous;
        self.previous_set = active_set;
        self.previous = active_orders;

        ActiveCues {
            active: active_indices,
            entered,
            exited,
            changed,
        }
    }

    /// Forget all prior membership, so the next refresh re-enters
    /// everything active.
    pub fn reset(&mut self) {
        self.previous.clear();
        self.previous_set.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::track::{TrackKind, TrackMode};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn loaded_track(source: &str) -> Track {
        let mut track = Track::new(TrackKind::Captions, "t", "en");
        track.set_mode(TrackMode::Showing);
        let token = track.begin_load();
        track.commit_source(token, source).unwrap();
        track
    }

    #[test]
    fn enter_and_exit_fire_exactly_once() {
        let track = loaded_track("c\n00:00:02,000 --> 00:00:05,000\nHi\n");
        let mut tracker = ActiveCueTracker::new();

        let r1 = tracker.refresh(&track, 1.0);
        assert!(r1.active.is_empty() && r1.entered.is_empty() && !r1.changed);

        let r2 = tracker.refresh(&track, 2.0);
        assert_eq!(r2.entered, vec![0]);
        assert!(r2.changed);

        let r3 = tracker.refresh(&track, 3.0);
        assert!(r3.entered.is_empty() && r3.exited.is_empty() && !r3.changed);

        let r4 = tracker.refresh(&track, 5.0);
        assert!(r4.entered.is_empty() && !r4.changed);

        let r5 = tracker.refresh(&track, 6.0);
        assert_eq!(r5.exited, vec![0]);
        assert!(r5.active.is_empty() && r5.changed);
    }

    #[test]
    fn callbacks_observe_each_edge_once() {
        let track = loaded_track("c\n00:00:02,000 --> 00:00:05,000\nHi\n");
        let mut tracker = ActiveCueTracker::new();
        let log = Rc::new(RefCell::new(Vec::new()));

        let enter_log = Rc::clone(&log);
        tracker.set_on_enter(move |cue| enter_log.borrow_mut().push(format!("+{}", cue.id())));
        let exit_log = Rc::clone(&log);
        tracker.set_on_exit(move |cue| exit_log.borrow_mut().push(format!("-{}", cue.id())));

        for t in [1.0, 2.0, 3.0, 5.0, 6.0] {
            tracker.refresh(&track, t);
        }
        assert_eq!(*log.borrow(), ["+c", "-c"]);
    }

    #[test]
    fn overlapping_cues_diff_independently() {
        let track = loaded_track(
            "a\n00:00:01,000 --> 00:00:04,000\nA\n\nb\n00:00:03,000 --> 00:00:06,000\nB\n",
        );
        let mut tracker = ActiveCueTracker::new();

        let r1 = tracker.refresh(&track, 2.0);
        assert_eq!(r1.active, vec![0]);

        let r2 = tracker.refresh(&track, 3.5);
        assert_eq!(r2.active, vec![0, 1]);
        assert_eq!(r2.entered, vec![1]);
        assert!(r2.changed);

        let r3 = tracker.refresh(&track, 5.0);
        assert_eq!(r3.active, vec![1]);
        assert_eq!(r3.exited, vec![0]);
    }

    #[test]
    fn disabled_track_exits_everything() {
        let mut track = loaded_track("c\n00:00:00,000 --> 00:00:10,000\nHi\n");
        let mut tracker = ActiveCueTracker::new();
        assert_eq!(tracker.refresh(&track, 1.0).active, vec![0]);

        track.set_mode(TrackMode::Hidden);
        let hidden = tracker.refresh(&track, 1.0);
        assert_eq!(hidden.active, vec![0]);
        assert!(!hidden.changed);

        track.set_mode(TrackMode::Disabled);
        let off = tracker.refresh(&track, 1.0);
        assert!(off.active.is_empty());
        assert!(off.changed);
        // The cue store was cleared, so there is no index to surface.
        assert!(off.exited.is_empty());
    }

    #[test]
    fn reset_replays_enter_edges() {
        let track = loaded_track("c\n00:00:00,000 --> 00:00:10,000\nHi\n");
        let mut tracker = ActiveCueTracker::new();
        assert_eq!(tracker.refresh(&track, 1.0).entered, vec![0]);
        assert!(tracker.refresh(&track, 2.0).entered.is_empty());
        tracker.reset();
        assert_eq!(tracker.refresh(&track, 3.0).entered, vec![0]);
    }
}
