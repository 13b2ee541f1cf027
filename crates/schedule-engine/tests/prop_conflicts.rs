//! Property-based tests for conflict detection using proptest.
//!
//! These tests verify invariants that should hold for *any* schedule, not
//! just the hand-picked cases in `conflict_tests.rs`. Generated schedules
//! include zero-length and inverted intervals on purpose.

use chrono::{Duration, TimeZone, Utc};
use proptest::prelude::*;
use schedule_engine::conflict::conflicting_event_ids_pairwise;
use schedule_engine::{conflicting_event_ids, find_conflicts, ScheduleEvent, ScheduleStore};

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

/// Offsets in 15-minute steps across one day, so boundaries collide often.
fn arb_slot() -> impl Strategy<Value = i64> {
    0i64..96
}

/// Mostly well-formed intervals, with some instants and inverted ones.
fn arb_interval() -> impl Strategy<Value = (i64, i64)> {
    prop_oneof![
        8 => (arb_slot(), 1i64..16).prop_map(|(s, len)| (s, s + len)),
        1 => arb_slot().prop_map(|s| (s, s)),
        1 => (arb_slot(), 1i64..8).prop_map(|(s, back)| (s, s - back)),
    ]
}

fn arb_schedule() -> impl Strategy<Value = Vec<ScheduleEvent>> {
    prop::collection::vec(arb_interval(), 0..24).prop_map(|intervals| {
        let day = Utc.with_ymd_and_hms(2026, 3, 2, 0, 0, 0).unwrap();
        intervals
            .into_iter()
            .enumerate()
            .map(|(i, (s, e))| {
                ScheduleEvent::new(
                    format!("e{}", i),
                    format!("Event {}", i),
                    day + Duration::minutes(s * 15),
                    day + Duration::minutes(e * 15),
                )
            })
            .collect()
    })
}

/// A schedule together with a permutation of it.
fn arb_schedule_and_shuffle() -> impl Strategy<Value = (Vec<ScheduleEvent>, Vec<ScheduleEvent>)> {
    arb_schedule().prop_flat_map(|events| {
        let shuffled = Just(events.clone()).prop_shuffle();
        (Just(events), shuffled)
    })
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn sweep_matches_pairwise(events in arb_schedule()) {
        prop_assert_eq!(
            conflicting_event_ids(&events),
            conflicting_event_ids_pairwise(&events)
        );
    }

    #[test]
    fn permutation_does_not_change_result((events, shuffled) in arb_schedule_and_shuffle()) {
        prop_assert_eq!(conflicting_event_ids(&events), conflicting_event_ids(&shuffled));
    }

    #[test]
    fn detection_is_idempotent(events in arb_schedule()) {
        prop_assert_eq!(conflicting_event_ids(&events), conflicting_event_ids(&events));
    }

    #[test]
    fn conflicts_are_symmetric(events in arb_schedule()) {
        let set = conflicting_event_ids(&events);
        for a in &events {
            for b in &events {
                if a.id != b.id && a.overlaps(b) {
                    prop_assert!(set.contains(&a.id) && set.contains(&b.id));
                }
            }
        }
    }

    #[test]
    fn every_member_has_an_overlapping_partner(events in arb_schedule()) {
        let set = conflicting_event_ids(&events);
        for id in &set {
            let me = events.iter().find(|e| &e.id == id).unwrap();
            let has_partner = events.iter().any(|other| other.id != me.id && me.overlaps(other));
            prop_assert!(has_partner, "{} flagged without an overlapping partner", id);
        }
    }

    #[test]
    fn pair_report_agrees_with_membership(events in arb_schedule()) {
        let from_pairs: std::collections::BTreeSet<String> = find_conflicts(&events)
            .into_iter()
            .flat_map(|c| [c.event_a, c.event_b])
            .collect();
        prop_assert_eq!(from_pairs, conflicting_event_ids(&events));
    }

    /// After any single reschedule the store's conflict set equals a fresh
    /// computation over its events.
    #[test]
    fn store_never_holds_stale_conflicts(
        events in arb_schedule(),
        target in any::<prop::sample::Index>(),
        (s, e) in arb_interval(),
    ) {
        prop_assume!(!events.is_empty());
        let mut store = ScheduleStore::with_events(events.clone()).unwrap();
        let id = events[target.index(events.len())].id.clone();
        let day = Utc.with_ymd_and_hms(2026, 3, 2, 0, 0, 0).unwrap();

        store
            .reschedule(&id, day + Duration::minutes(s * 15), day + Duration::minutes(e * 15))
            .unwrap();

        prop_assert_eq!(store.conflicts(), &conflicting_event_ids(store.events()));
    }
}
