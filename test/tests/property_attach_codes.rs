/// PROPERTY-BASED TESTS: attach codes and pending creation
///
/// Key invariants:
/// 1. Codes allocated within a load generation are unique and decode back
/// 2. Every behavior meets its object exactly once, whatever the arrival order
/// 3. Nothing is left in the table once every pair has met

use std::collections::HashSet;

use proptest::prelude::*;
use vista_shared::{
    AttachCode, AttachCodeAllocator, BehaviorRegistration, ObjectResolution, PartitionId,
    PendingCreationTable,
};

fn partition_strategy() -> impl Strategy<Value = PartitionId> {
    0..=AttachCode::MAX_PARTITION_ID
}

// Each sequence appears twice, once for its behavior and once for its object
fn arrival_strategy() -> impl Strategy<Value = Vec<(u16, bool)>> {
    (1u16..64).prop_flat_map(|count| {
        let arrivals: Vec<(u16, bool)> = (1..=count)
            .flat_map(|sequence| [(sequence, true), (sequence, false)])
            .collect();
        Just(arrivals).prop_shuffle()
    })
}

proptest! {
    #[test]
    fn prop_allocated_codes_are_unique_and_decode(
        partition in partition_strategy(),
        count in 1usize..300,
    ) {
        let mut allocator = AttachCodeAllocator::new();
        let mut seen = HashSet::new();

        for expected_sequence in 1..=count {
            let code = allocator.allocate(partition).unwrap();
            prop_assert!(code.is_pending());
            prop_assert!(code.to_i32() < 0);
            prop_assert_eq!(code.partition_id(), Some(partition));
            prop_assert_eq!(code.sequence(), Some(expected_sequence as u16));
            prop_assert!(seen.insert(code));
        }
    }

    #[test]
    fn prop_partitions_never_share_codes(
        first in partition_strategy(),
        second in partition_strategy(),
        count in 1usize..50,
    ) {
        prop_assume!(first != second);
        let mut allocator = AttachCodeAllocator::new();
        let mut seen = HashSet::new();

        for _ in 0..count {
            prop_assert!(seen.insert(allocator.allocate(first).unwrap()));
            prop_assert!(seen.insert(allocator.allocate(second).unwrap()));
        }
    }

    #[test]
    fn prop_reset_restarts_the_sequence(
        partition in partition_strategy(),
        count in 1usize..50,
    ) {
        let mut allocator = AttachCodeAllocator::new();
        let first = allocator.allocate(partition).unwrap();
        for _ in 1..count {
            allocator.allocate(partition).unwrap();
        }

        allocator.reset(partition);

        prop_assert_eq!(allocator.allocate(partition).unwrap(), first);
    }

    #[test]
    fn prop_every_pair_meets_once_in_any_order(
        partition in partition_strategy(),
        arrivals in arrival_strategy(),
    ) {
        let mut table: PendingCreationTable<u16, u16> = PendingCreationTable::new();
        let mut matched = HashSet::new();

        for (sequence, is_behavior) in arrivals.iter().copied() {
            let code = AttachCode::pending(partition, sequence).unwrap();
            let pair = if is_behavior {
                match table.register_pending_behavior(code, sequence) {
                    BehaviorRegistration::Matched(behavior, object) => Some((behavior, object)),
                    BehaviorRegistration::Pending => None,
                    BehaviorRegistration::Replaced(_) => {
                        return Err(TestCaseError::fail("behavior registered twice"));
                    }
                }
            } else {
                match table.resolve_incoming_object(code, sequence) {
                    ObjectResolution::Matched(behavior, object) => Some((behavior, object)),
                    ObjectResolution::Buffered => None,
                    ObjectResolution::Unclaimed(_) => {
                        return Err(TestCaseError::fail("object left unclaimed"));
                    }
                }
            };

            if let Some((behavior, object)) = pair {
                prop_assert_eq!(behavior, object);
                prop_assert!(matched.insert(behavior));
            }
        }

        prop_assert_eq!(matched.len(), arrivals.len() / 2);
        prop_assert!(table.is_empty());
        prop_assert!(table.drain_unmatched(partition).is_empty());
    }

    #[test]
    fn prop_unmatched_behaviors_drain_in_sequence_order(
        partition in partition_strategy(),
        sequences in prop::collection::hash_set(1u16..500, 1..40),
    ) {
        let mut table: PendingCreationTable<u16, u16> = PendingCreationTable::new();
        for sequence in sequences.iter().copied() {
            let code = AttachCode::pending(partition, sequence).unwrap();
            table.register_pending_behavior(code, sequence);
        }

        let drained = table.drain_unmatched(partition);

        let mut expected: Vec<u16> = sequences.into_iter().collect();
        expected.sort_unstable();
        prop_assert_eq!(drained, expected);
        prop_assert!(table.is_empty());
    }
}
