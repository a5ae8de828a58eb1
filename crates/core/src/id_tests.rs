// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn uuid_gen_creates_unique_ids() {
    let id_gen = UuidIdGen;
    let id1 = id_gen.next();
    let id2 = id_gen.next();
    assert_ne!(id1, id2);
    assert_eq!(id1.len(), 36); // UUID format
}

#[test]
fn next_worker_wraps_generated_id() {
    let id = UuidIdGen.next_worker();
    assert_eq!(id.as_str().len(), 36);
    assert_eq!(id.short(), &id.as_str()[..8]);
}

#[test]
fn worker_id_short_truncates_long_ids() {
    let id = WorkerId::new("0123456789abcdef");
    assert_eq!(id.short(), "01234567");
    assert_eq!(WorkerId::new("abc").short(), "abc");
}
