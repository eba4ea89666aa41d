//! Ordered cue container
//!
//! [`CueStore`] owns a track's cues and maintains the ordering invariant
//! `(start_time asc, end_time asc, order asc)` across every insertion, so
//! downstream consumers can rely on position without re-sorting.

use core::cmp::Ordering;

use crate::cue::Cue;

/// Owning, always-ordered cue sequence.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CueStore {
    cues: Vec<Cue>,
    next_order: u32,
}

impl CueStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from parser output, assigning creation orders.
    #[must_use]
    pub fn from_cues(cues: Vec<Cue>) -> Self {
        let mut store = Self::new();
        for cue in cues {
            store.insert(cue);
        }
        store
    }

    /// Insert a cue at its ordered position.
    ///
    /// The cue receives the next creation-order value, which also breaks
    /// ties: equal `(start, end)` cues keep insertion order.
    pub fn insert(&mut self, mut cue: Cue) {
        cue.set_order(self.next_order);
        self.next_order += 1;

        let at = self
            .cues
            .partition_point(|existing| cue_key_cmp(existing, &cue) != Ordering::Greater);
        self.cues.insert(at, cue);
    }

    /// First cue with the given id, if any.
    #[must_use]
    pub fn get_by_id(&self, id: &str) -> Option<&Cue> {
        self.cues.iter().find(|cue| cue.id() == id)
    }

    /// Cue at a store index.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Cue> {
        self.cues.get(index)
    }

    /// Iterate cues in order.
    pub fn iter(&self) -> core::slice::Iter<'_, Cue> {
        self.cues.iter()
    }

    /// Number of cues.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cues.len()
    }

    /// True when the store holds no cues.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cues.is_empty()
    }

    /// Remove all cues. Creation-order numbering continues, so cues from a
    /// later source never collide with identities handed out earlier.
    pub fn clear(&mut self) {
        self.cues.clear();
    }

    /// Store indices of cues active at `time` (`start <= time <= end`),
    /// in store order.
    #[must_use]
    pub fn active_at(&self, time: f64) -> Vec<usize> {
        self.cues
            .iter()
            .enumerate()
            .filter(|(_, cue)| cue.contains(time))
            .map(|(i, _)| i)
            .collect()
    }
}

impl<'a> IntoIterator for &'a CueStore {
    type Item = &'a Cue;
    type IntoIter = core::slice::Iter<'a, Cue>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

fn cue_key_cmp(a: &Cue, b: &Cue) -> Ordering {
    a.start_time()
        .partial_cmp(&b.start_time())
        .unwrap_or(Ordering::Equal)
        .then_with(|| {
            a.end_time()
                .partial_cmp(&b.end_time())
                .unwrap_or(Ordering::Equal)
        })
        .then_with(|| a.order().cmp(&b.order()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cue::CuePayload;

    fn cue(id: &str, start: f64, end: f64) -> Cue {
        Cue::new(id, start, end, CuePayload::Raw(id.to_string()))
    }

    #[test]
    fn insertion_keeps_start_order() {
        let mut store = CueStore::new();
        store.insert(cue("b", 5.0, 6.0));
        store.insert(cue("a", 1.0, 2.0));
        store.insert(cue("c", 3.0, 4.0));
        let ids: Vec<_> = store.iter().map(Cue::id).collect();
        assert_eq!(ids, ["a", "c", "b"]);
    }

    #[test]
    fn equal_keys_keep_insertion_order() {
        let mut store = CueStore::new();
        store.insert(cue("first", 1.0, 2.0));
        store.insert(cue("second", 1.0, 2.0));
        let ids: Vec<_> = store.iter().map(Cue::id).collect();
        assert_eq!(ids, ["first", "second"]);
        assert!(store.get(0).unwrap().order() < store.get(1).unwrap().order());
    }

    #[test]
    fn end_time_breaks_start_ties() {
        let mut store = CueStore::new();
        store.insert(cue("long", 1.0, 9.0));
        store.insert(cue("short", 1.0, 2.0));
        let ids: Vec<_> = store.iter().map(Cue::id).collect();
        assert_eq!(ids, ["short", "long"]);
    }

    #[test]
    fn id_lookup() {
        let store = CueStore::from_cues(vec![cue("x", 0.0, 1.0), cue("y", 2.0, 3.0)]);
        assert_eq!(store.get_by_id("y").unwrap().id(), "y");
        assert!(store.get_by_id("z").is_none());
    }

    #[test]
    fn active_at_uses_closed_interval() {
        let store = CueStore::from_cues(vec![cue("a", 2.0, 5.0), cue("b", 4.0, 6.0)]);
        assert_eq!(store.active_at(1.0), Vec::<usize>::new());
        assert_eq!(store.active_at(2.0), vec![0]);
        assert_eq!(store.active_at(4.5), vec![0, 1]);
        assert_eq!(store.active_at(5.0), vec![0, 1]);
        assert_eq!(store.active_at(6.0), vec![1]);
    }

    #[test]
    fn clear_keeps_order_counter_monotonic() {
        let mut store = CueStore::new();
        store.insert(cue("a", 0.0, 1.0));
        let first_order = store.get(0).unwrap().order();
        store.clear();
        assert!(store.is_empty());
        store.insert(cue("b", 0.0, 1.0));
        assert!(store.get(0).unwrap().order() > first_order);
    }
}
