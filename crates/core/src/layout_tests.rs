// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::function::{CapacityPlanner, FunctionOptions};
use proptest::prelude::*;
use std::collections::BTreeMap;

fn plan_with(
    shared_minimum: u32,
    functions: Vec<(&str, FunctionOptions)>,
) -> crate::function::FunctionPlan {
    let workers: BTreeMap<String, String> = functions
        .iter()
        .map(|(name, _)| (name.to_string(), format!("{}Handler", name)))
        .collect();
    let options: BTreeMap<String, FunctionOptions> = functions
        .into_iter()
        .map(|(name, opts)| (name.to_string(), opts))
        .collect();
    CapacityPlanner::new(shared_minimum)
        .plan(&workers, &options)
        .unwrap()
}

#[test]
fn shared_minimum_becomes_shared_workers() {
    let plan = plan_with(2, vec![("reverse", FunctionOptions::default())]);
    let layout = PoolLayout::from_plan(&plan, 2);

    assert_eq!(layout.len(), 2);
    assert!(layout
        .assignments()
        .iter()
        .all(|a| a.kind == AssignmentKind::Shared && a.functions == vec!["reverse"]));
}

#[test]
fn no_shared_workers_means_one_dedicated_each() {
    let plan = plan_with(
        0,
        vec![
            ("a", FunctionOptions::default()),
            ("b", FunctionOptions::default()),
        ],
    );
    let layout = PoolLayout::from_plan(&plan, 0);

    assert_eq!(layout.len(), 2);
    assert!(layout
        .assignments()
        .iter()
        .all(|a| a.kind == AssignmentKind::Dedicated && a.functions.len() == 1));
}

#[test]
fn dedicated_only_functions_stay_off_shared_workers() {
    let plan = plan_with(
        1,
        vec![
            ("reverse", FunctionOptions::default()),
            (
                "billing",
                FunctionOptions {
                    dedicated_only: true,
                    dedicated_count: Some(2),
                    ..Default::default()
                },
            ),
        ],
    );
    let layout = PoolLayout::from_plan(&plan, 1);

    let shared: Vec<_> = layout
        .assignments()
        .iter()
        .filter(|a| a.kind == AssignmentKind::Shared)
        .collect();
    assert_eq!(shared.len(), 1);
    assert_eq!(shared[0].functions, vec!["reverse"]);
    assert_eq!(layout.coverage("billing"), 2);
    assert_eq!(layout.coverage("reverse"), 1);
}

#[test]
fn shared_functions_register_highest_priority_first() {
    let plan = plan_with(
        1,
        vec![
            (
                "low",
                FunctionOptions {
                    priority: Some(-3),
                    ..Default::default()
                },
            ),
            (
                "high",
                FunctionOptions {
                    priority: Some(4),
                    ..Default::default()
                },
            ),
            ("mid", FunctionOptions::default()),
        ],
    );
    let layout = PoolLayout::from_plan(&plan, 1);

    assert_eq!(layout.assignments()[0].functions, vec!["high", "mid", "low"]);
}

#[test]
fn extra_dedicated_workers_fill_the_gap() {
    let plan = plan_with(
        1,
        vec![(
            "resize",
            FunctionOptions {
                dedicated_count: Some(2),
                ..Default::default()
            },
        )],
    );
    let layout = PoolLayout::from_plan(&plan, 1);

    // worker_count = 1 shared + 2 dedicated
    assert_eq!(plan.get("resize").unwrap().worker_count, 3);
    assert_eq!(layout.coverage("resize"), 3);
    assert_eq!(
        layout
            .assignments()
            .iter()
            .filter(|a| a.kind == AssignmentKind::Dedicated)
            .count(),
        2
    );
}

#[test]
fn empty_plan_has_empty_layout() {
    let layout = PoolLayout::from_plan(&Default::default(), 3);
    assert!(layout.is_empty());
}

proptest! {
    #[test]
    fn every_function_is_served_by_worker_count_processes(
        shared_minimum in 0..4u32,
        counts in proptest::collection::vec((0..5u32, any::<bool>(), 1..4u32), 1..6),
    ) {
        let functions: Vec<(String, FunctionOptions)> = counts
            .into_iter()
            .enumerate()
            .map(|(i, (count, dedicated_only, dedicated))| {
                let opts = FunctionOptions {
                    count: Some(count),
                    dedicated_only,
                    dedicated_count: dedicated_only.then_some(dedicated),
                    ..Default::default()
                };
                (format!("f{}", i), opts)
            })
            .collect();
        let plan = plan_with(
            shared_minimum,
            functions.iter().map(|(n, o)| (n.as_str(), o.clone())).collect(),
        );
        let layout = PoolLayout::from_plan(&plan, shared_minimum);

        for spec in plan.iter() {
            prop_assert_eq!(layout.coverage(&spec.name), spec.worker_count as usize);
        }
    }
}
