use checklist_weights::{PercentageAllocator, WeightError, WeightedEntity};
use proptest::prelude::*;

fn group(weights: &[f64]) -> Vec<WeightedEntity> {
    weights
        .iter()
        .enumerate()
        .map(|(i, w)| WeightedEntity::new(i as u64 + 1, *w, i as i32))
        .collect()
}

fn expected_validity(weights: &[f64]) -> bool {
    let sum: f64 = weights.iter().sum();
    (sum - 100.0).abs() <= 0.01 + 1e-9 && weights.iter().all(|w| *w > 0.0)
}

/// Weights that land on or next to the tolerance edges: the last entry tops the
/// group up to 100 plus one of the adversarial offsets.
fn edge_weights() -> impl Strategy<Value = Vec<f64>> {
    (
        prop::collection::vec(1u32..=20, 1..6),
        prop::sample::select(vec![-100.0, -0.02, -0.01, 0.0, 0.01, 0.02, 5.0]),
    )
        .prop_map(|(parts, offset)| {
            let mut weights: Vec<f64> = parts.iter().map(|p| *p as f64).collect();
            let used: f64 = weights.iter().sum();
            weights.push(100.0 - used + offset);
            weights
        })
}

proptest! {
    #[test]
    fn distribute_sums_to_hundred(len in 1usize..64) {
        let allocator = PercentageAllocator::default();
        let distributed = allocator.distribute_equally(&group(&vec![0.0; len]));

        let sum: f64 = distributed.iter().map(|e| e.weight).sum();
        prop_assert!((sum - 100.0).abs() <= 1e-4, "sum was {}", sum);
        for entity in &distributed {
            prop_assert_eq!(entity.weight, 100.0 / len as f64);
        }
    }

    #[test]
    fn distribute_preserves_identity_and_order(
        weights in prop::collection::vec(0.0f64..100.0, 0..20),
    ) {
        let allocator = PercentageAllocator::default();
        let entities = group(&weights);
        let distributed = allocator.distribute_equally(&entities);

        prop_assert_eq!(distributed.len(), entities.len());
        for (before, after) in entities.iter().zip(&distributed) {
            prop_assert_eq!(before.id, after.id);
            prop_assert_eq!(before.order, after.order);
        }
    }

    #[test]
    fn validity_matches_definition_random(weights in prop::collection::vec(-5.0f64..60.0, 0..8)) {
        let allocator = PercentageAllocator::default();
        prop_assert_eq!(allocator.is_valid(&group(&weights)), expected_validity(&weights));
    }

    #[test]
    fn validity_matches_definition_at_edges(weights in edge_weights()) {
        let allocator = PercentageAllocator::default();
        prop_assert_eq!(allocator.is_valid(&group(&weights)), expected_validity(&weights));
    }

    #[test]
    fn negative_weight_is_rejected(
        weights in prop::collection::vec(0.0f64..100.0, 1..10),
        negative in -1000.0f64..-0.0001,
    ) {
        let allocator = PercentageAllocator::default();
        let entities = group(&weights);

        let result = allocator.set_weight(&entities, 1, negative);
        let rejected = matches!(result, Err(WeightError::InvalidWeight { .. }));
        prop_assert!(rejected, "expected InvalidWeight for {}", negative);
        prop_assert_eq!(entities, group(&weights));
    }

    #[test]
    fn reorder_is_invertible(len in 2usize..20, i in 0usize..20, j in 0usize..20) {
        let i = i % len;
        let j = j % len;
        prop_assume!(i != j);

        let allocator = PercentageAllocator::default();
        let weights: Vec<f64> = (0..len).map(|n| n as f64).collect();
        let entities = group(&weights);

        let moved = allocator.reorder(&entities, i, j);
        let orders: Vec<i32> = moved.iter().map(|e| e.order).collect();
        prop_assert_eq!(orders, (0..len as i32).collect::<Vec<_>>());
        prop_assert_eq!(allocator.reorder(&moved, j, i), entities);
    }
}
