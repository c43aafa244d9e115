//! Map session controller
//!
//! A pure reducer over subscription snapshots holding the "currently
//! selected map" state machine. No I/O here — the service layer pumps
//! snapshots in and reads selection out.

use crate::schema::EcosystemMap;
use crate::store::Snapshot;

/// Selection state over the delivered collection.
///
/// States: no maps, maps present with no survivor of the previous
/// selection, one map selected. Selection is never forced away from a
/// still-present map merely because other maps changed — a user viewing a
/// map keeps it while concurrent actors edit the collection around them.
#[derive(Debug, Default)]
pub struct MapSession {
    maps: Snapshot,
    selected: Option<String>,
}

impl MapSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume one delivered snapshot.
    ///
    /// If nothing is selected, or the selected id vanished from the
    /// delivery, selection falls to the first map in the delivered
    /// (most-recently-updated-first) order — or to none when the
    /// collection is empty.
    pub fn apply_snapshot(&mut self, snapshot: Snapshot) {
        let survives = self
            .selected
            .as_deref()
            .is_some_and(|id| snapshot.iter().any(|m| m.id == id));
        if !survives {
            self.selected = snapshot.first().map(|m| m.id.clone());
        }
        self.maps = snapshot;
    }

    /// Select a map by id. Only ids present in the last snapshot are
    /// selectable; returns whether the selection changed hands.
    pub fn select(&mut self, id: &str) -> bool {
        if self.maps.iter().any(|m| m.id == id) {
            self.selected = Some(id.to_string());
            true
        } else {
            false
        }
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn selected_map(&self) -> Option<&EcosystemMap> {
        let id = self.selected.as_deref()?;
        self.maps.iter().find(|m| m.id == id)
    }

    pub fn maps(&self) -> &[EcosystemMap] {
        &self.maps
    }

    pub fn is_empty(&self) -> bool {
        self.maps.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    /// A map stamped so that a larger `updated_offset` sorts earlier in the
    /// newest-first snapshot order.
    fn map_at(id: &str, updated_offset_secs: i64) -> EcosystemMap {
        let mut map = EcosystemMap::new(id);
        map.id = id.to_string();
        map.updated_at = Utc::now() + Duration::seconds(updated_offset_secs);
        map
    }

    // --- Scenario: first delivery selects the most recent map ---

    #[test]
    fn first_delivery_selects_head_of_snapshot() {
        let mut session = MapSession::new();
        session.apply_snapshot(vec![map_at("mapA", 5), map_at("mapB", 3)]);
        assert_eq!(session.selected_id(), Some("mapA"));
    }

    #[test]
    fn empty_first_delivery_selects_nothing() {
        let mut session = MapSession::new();
        session.apply_snapshot(Vec::new());
        assert_eq!(session.selected_id(), None);
        assert!(session.is_empty());
    }

    // --- Scenario: deletion of the selected map falls back to the head ---

    #[test]
    fn vanished_selection_falls_to_next_map() {
        let mut session = MapSession::new();
        session.apply_snapshot(vec![map_at("mapA", 5), map_at("mapB", 3)]);

        session.apply_snapshot(vec![map_at("mapB", 3)]);
        assert_eq!(session.selected_id(), Some("mapB"));
    }

    #[test]
    fn last_map_deleted_clears_selection() {
        let mut session = MapSession::new();
        session.apply_snapshot(vec![map_at("mapA", 5)]);
        session.apply_snapshot(Vec::new());
        assert_eq!(session.selected_id(), None);
    }

    // --- Scenario: selection is stable while other maps change ---

    #[test]
    fn selection_survives_other_maps_moving_ahead() {
        let mut session = MapSession::new();
        session.apply_snapshot(vec![map_at("mapA", 5), map_at("mapB", 3)]);
        assert_eq!(session.selected_id(), Some("mapA"));

        // mapB's updated_at now exceeds mapA's, so it leads the snapshot
        session.apply_snapshot(vec![map_at("mapB", 9), map_at("mapA", 5)]);
        assert_eq!(
            session.selected_id(),
            Some("mapA"),
            "selection must not chase recency"
        );
    }

    #[test]
    fn selection_survives_inserts() {
        let mut session = MapSession::new();
        session.apply_snapshot(vec![map_at("mapA", 5)]);
        session.apply_snapshot(vec![map_at("mapC", 9), map_at("mapA", 5)]);
        assert_eq!(session.selected_id(), Some("mapA"));
    }

    // --- Scenario: explicit selection ---

    #[test]
    fn select_switches_to_a_present_map() {
        let mut session = MapSession::new();
        session.apply_snapshot(vec![map_at("mapA", 5), map_at("mapB", 3)]);

        assert!(session.select("mapB"));
        assert_eq!(session.selected_id(), Some("mapB"));
        assert_eq!(session.selected_map().unwrap().id, "mapB");
    }

    #[test]
    fn select_rejects_absent_ids() {
        let mut session = MapSession::new();
        session.apply_snapshot(vec![map_at("mapA", 5)]);

        assert!(!session.select("ghost"));
        assert_eq!(session.selected_id(), Some("mapA"), "selection unchanged");
    }
}
