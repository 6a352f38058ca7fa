//! Property tests: conversion output is bounded and internally consistent.

use bowtie_engine::ConversionEngine;
use bowtie_types::*;
use proptest::prelude::*;

// ---------------------------------------------------------------------------
// Helpers / Strategies
// ---------------------------------------------------------------------------

fn collected(activities: usize, pressures: usize, controls: usize) -> SelectedItems {
    let mut items = SelectedItems::new();
    for i in 0..activities {
        items.activities.add(Item::custom(format!("Activity {}", i))).unwrap();
    }
    for i in 0..pressures {
        items.pressures.add(Item::custom(format!("Pressure {}", i))).unwrap();
    }
    for i in 0..controls {
        items
            .preventive_controls
            .add(Item::custom(format!("Control {}", i)))
            .unwrap();
    }
    items
}

// ---------------------------------------------------------------------------
// Property Tests
// ---------------------------------------------------------------------------

proptest! {
    /// Row count is the base-scenario count, capped.
    #[test]
    fn output_never_exceeds_cap(
        activities in 1usize..25,
        pressures in 1usize..25,
        cap in 1usize..80,
        seed in any::<u64>(),
    ) {
        let items = collected(activities, pressures, 0);
        let rows = ConversionEngine::default()
            .with_cap(cap)
            .with_seed(seed)
            .convert("Eutrophication", &items)
            .unwrap();
        prop_assert_eq!(rows.len(), (activities * pressures).min(cap));
    }

    /// Every row has in-range scores and a matching risk level.
    #[test]
    fn rows_are_consistent(
        activities in 1usize..10,
        pressures in 1usize..10,
        controls in 0usize..6,
        seed in any::<u64>(),
    ) {
        let items = collected(activities, pressures, controls);
        let outcome = ConversionEngine::default()
            .with_seed(seed)
            .convert_detailed("Eutrophication", &items)
            .unwrap();

        for pathway in &outcome.pathways {
            prop_assert!(pathway.row.is_consistent());
            prop_assert!(pathway.scores.all_in_range());
            prop_assert_eq!(
                pathway.row.risk_level,
                RiskLevel::from_score(pathway.row.risk_score())
            );
        }
    }

    /// With at least as many rows as controls, each control appears.
    #[test]
    fn round_robin_uses_every_control(
        activities in 1usize..8,
        pressures in 1usize..8,
        controls in 1usize..6,
    ) {
        let items = collected(activities, pressures, controls);
        let rows = ConversionEngine::default().convert("x", &items).unwrap();
        prop_assume!(rows.len() >= controls);
        for name in items.preventive_controls.names() {
            prop_assert!(rows.iter().any(|r| r.preventive_control == name));
        }
    }
}
