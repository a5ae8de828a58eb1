// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn fake_notifier_records_signals() {
    let notifier = FakeParentNotifier::new();
    notifier.notify(PoolSignal::NoWorkers).unwrap();
    notifier.notify(PoolSignal::ValidationFailed).unwrap();

    assert_eq!(
        notifier.calls(),
        vec![PoolSignal::NoWorkers, PoolSignal::ValidationFailed]
    );
}

#[test]
fn clones_share_recorded_signals() {
    let notifier = FakeParentNotifier::new();
    notifier.clone().notify(PoolSignal::Terminate).unwrap();
    assert_eq!(notifier.calls(), vec![PoolSignal::Terminate]);
}
