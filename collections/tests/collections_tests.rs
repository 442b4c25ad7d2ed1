// Copyright 2024 Persistent Collections Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use imm_collections::{Error, Map, Vector};

#[test]
fn scenario_1_vector_from_range_and_push() {
    let v: Vector<u32> = Vector::from_slice(&(0..100).collect::<Vec<_>>());
    assert_eq!(*v.get(0).unwrap(), 0);
    assert_eq!(*v.get(99).unwrap(), 99);
    assert_eq!(v.size(), 100);
    let pushed = v.push(100);
    assert_eq!(pushed.size(), 101);
    assert_eq!(v.size(), 100);
}

#[test]
fn scenario_2_incremental_build_matches_bulk() {
    let mut v: Vector<u32> = Vector::empty();
    for i in 0..1100 {
        v = v.push(i);
    }
    let bulk: Vector<u32> = Vector::from_slice(&(0..1100).collect::<Vec<_>>());
    assert_eq!(v, bulk);
    assert_eq!(v.iter().copied().collect::<Vec<_>>(), (0..1100).collect::<Vec<_>>());
}

#[test]
fn scenario_3_vector_transient_build_then_reject_reuse() {
    let v: Vector<u32> = Vector::empty();
    let built = v.transient(|t| {
        for i in 0..100 {
            t.push(i).unwrap();
        }
    });
    assert_eq!(built.size(), 100);
    for i in 0..100u32 {
        assert_eq!(*built.get(i as usize).unwrap(), i);
    }

    let mut t = v.to_transient();
    t.push(1).unwrap();
    t.persist().unwrap();
    assert!(matches!(t.push(2), Err(Error::InvalidTransient)));
}

#[test]
fn scenario_4_vector_pop() {
    let v: Vector<u32> = Vector::from_slice(&[1, 2, 3, 4]);
    let (popped, rest) = v.pop().unwrap();
    assert_eq!(popped, 4);
    assert_eq!(rest, Vector::from_slice(&[1, 2, 3]));

    let empty: Vector<u32> = Vector::empty();
    assert!(matches!(empty.pop(), Err(Error::OutOfRange { .. })));
    let (value, rest) = empty.pop_opt();
    assert_eq!(value, None);
    assert!(rest.is_empty());
}

#[test]
fn scenario_5_map_set_overwrite_delete_then_double_delete_fails() {
    let m: Map<&str, i32> = Map::empty();
    let m = m.set("foo", 1).set("bar", 2).set("foo", 3);
    assert_eq!(m.size(), 2);
    assert_eq!(m.get(&"foo"), Some(&3));
    assert_eq!(m.get(&"bar"), Some(&2));

    let m = m.delete(&"bar").unwrap();
    assert_eq!(m.size(), 1);
    assert!(!m.has_key(&"bar"));
    assert!(matches!(m.delete(&"bar"), Err(Error::KeyNotFound)));
}

#[test]
fn scenario_6_map_merge_is_right_biased_and_pure() {
    let a: Map<&str, i32> = Map::from_pairs([("foo", 1), ("bar", 2)]);
    let b: Map<&str, i32> = Map::from_pairs([("foo", 100), ("qux", 5)]);
    let merged = a.merge(&b);
    let expected: Map<&str, i32> = Map::from_pairs([("foo", 100), ("bar", 2), ("qux", 5)]);
    assert_eq!(merged, expected);
    assert_eq!(a.get(&"foo"), Some(&1));
    assert_eq!(a.size(), 2);
    assert_eq!(b.size(), 2);
}

#[test]
fn vector_update_does_not_disturb_other_indices() {
    let v: Vector<u32> = Vector::from_slice(&(0..200).collect::<Vec<_>>());
    let updated = v.set(150, 9999).unwrap();
    assert_eq!(*updated.get(150).unwrap(), 9999);
    for i in 0..200u32 {
        if i != 150 {
            assert_eq!(*updated.get(i as usize).unwrap(), *v.get(i as usize).unwrap());
        }
    }
    assert_eq!(*v.get(150).unwrap(), 150);
}

#[test]
fn vector_set_arithmetic_matches_scenario_style() {
    let a: Vector<u32> = Vector::from_slice(&[1, 2, 3]);
    let b: Vector<u32> = Vector::from_slice(&[2, 3, 4]);
    assert_eq!(a.clone() - b.clone(), Vector::from_slice(&[1]));
    assert_eq!(a.clone() & b.clone(), Vector::from_slice(&[2, 3]));
    assert_eq!(a.clone() | b.clone(), Vector::from_slice(&[1, 2, 3, 4]));
}

#[test]
fn map_iteration_helpers_are_stable_and_complete() {
    let m: Map<&str, i32> = Map::from_pairs([("a", 1), ("b", 2), ("c", 3)]);
    let mut first_pass: Vec<(&str, i32)> = Vec::new();
    m.each(|k, v| first_pass.push((*k, *v)));
    let mut second_pass: Vec<(&str, i32)> = Vec::new();
    m.each(|k, v| second_pass.push((*k, *v)));
    assert_eq!(first_pass, second_pass);
    assert_eq!(first_pass.len(), 3);
}

#[test]
fn map_from_native_mapping_round_trip() {
    let m: Map<String, i32> = Map::from_pairs([("a".to_string(), 1), ("b".to_string(), 2)]);
    let native = m.to_native_mapping();
    let roundtripped: Map<String, i32> = Map::from_native_mapping(&native).unwrap();
    assert_eq!(m, roundtripped);
}

#[test]
fn vector_native_sequence_round_trip() {
    let v: Vector<u32> = Vector::from_slice(&(0..50).collect::<Vec<_>>());
    let native = v.to_native_sequence();
    let roundtripped: Vector<u32> = Vector::from_native_sequence(&native).unwrap();
    assert_eq!(v, roundtripped);
}

#[test]
fn map_transient_persist_then_further_set_fails() {
    let m: Map<String, i32> = Map::empty();
    let mut t = m.to_transient();
    t.set("k".to_string(), 1).unwrap();
    let persisted = t.persist().unwrap();
    assert_eq!(persisted.get(&"k".to_string()), Some(&1));
    assert!(matches!(
        t.set("k2".to_string(), 2),
        Err(Error::InvalidTransient)
    ));
}
