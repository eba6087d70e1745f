//! Integration tests for `Array` invariants and growth behavior.

use anvil_core::{array, Array, CoreError, GrowthPolicy};
use proptest::prelude::*;

/// Storage is present exactly when capacity is non-zero, and never smaller than len.
fn assert_invariants<T>(array: &Array<T>) {
    assert!(array.len() <= array.capacity());
    assert_eq!(array.data().is_none(), array.capacity() == 0);
}

#[test]
fn test_growth_sequence_from_empty() {
    let mut array = Array::new();
    let mut observed = Vec::new();
    for i in 0..341u32 {
        array.push(i).unwrap();
        if observed.last() != Some(&array.capacity()) {
            observed.push(array.capacity());
        }
    }
    assert_eq!(
        observed,
        vec![16, 21, 28, 37, 49, 65, 87, 116, 155, 207, 276, 340, 404]
    );
}

#[test]
fn test_twenty_pushes() {
    let mut array = Array::new();
    for i in 0..20 {
        array.push(i).unwrap();
    }
    assert_eq!(array.len(), 20);
    assert_eq!(array.capacity(), 21);
}

#[test]
fn test_custom_growth_policy() {
    let policy = GrowthPolicy::from_toml_str("initial_capacity = 2\ngrowth_threshold = 4\ngrowth_step = 10").unwrap();
    let mut array = Array::new_with(Default::default(), policy);
    let mut observed = Vec::new();
    for i in 0..20u8 {
        array.push(i).unwrap();
        if observed.last() != Some(&array.capacity()) {
            observed.push(array.capacity());
        }
    }
    // Geometric below the threshold, linear from 4 on
    assert_eq!(observed, vec![2, 3, 4, 14, 24]);
}

#[test]
fn test_scenario_insert() {
    let mut array = array![1, 2, 3];
    array.insert(1, 99).unwrap();
    assert_eq!(array, [1, 99, 2, 3]);
    assert_eq!(array.len(), 4);
}

#[test]
fn test_scenario_filled() {
    let array = Array::filled(5, 7).unwrap();
    assert_eq!(array.len(), 5);
    assert!(array.capacity() >= 5);
    assert!(array.iter().all(|&v| v == 7));
}

#[test]
fn test_scenario_erase_range() {
    let mut array = array![1, 2, 3];
    let capacity = array.capacity();
    array.erase_range(0, 2).unwrap();
    assert_eq!(array, [3]);
    assert_eq!(array.capacity(), capacity);
}

#[test]
fn test_scenario_self_append() {
    let mut array = array![1, 2, 3];
    array.append_within(..).unwrap();
    assert_eq!(array, [1, 2, 3, 1, 2, 3]);
}

#[test]
fn test_cursor_range_round_trip() {
    let array = array![String::from("a"), String::from("b"), String::from("c")];
    let copy = Array::from_range(array.begin(), array.end()).unwrap();
    assert_eq!(copy, array);
    assert_eq!(copy.capacity(), 3);

    let tail = Array::from_range(array.begin() + 1, array.end()).unwrap();
    assert_eq!(tail, [String::from("b"), String::from("c")]);

    let reversed = Array::from_range(array.rbegin(), array.rend()).unwrap();
    assert_eq!(reversed, [String::from("c"), String::from("b"), String::from("a")]);

    assert!(matches!(
        Array::from_range(array.end(), array.begin()),
        Err(CoreError::InvalidRange { .. })
    ));
}

#[test]
fn test_take_then_reuse() {
    let mut source = array![1u64, 2, 3];
    let moved = source.take();
    assert_eq!(source.len(), 0);
    assert_eq!(source.capacity(), 0);
    assert_invariants(&source);

    source.push(4).unwrap();
    assert_eq!(source, [4]);
    assert_eq!(moved, [1, 2, 3]);
}

#[test]
fn test_failed_reserve_leaves_array_unchanged() {
    let mut array = array![1u64, 2, 3];
    let before = array.clone();
    let capacity = array.capacity();

    assert_eq!(array.reserve(usize::MAX), Err(CoreError::CapacityOverflow));
    assert_eq!(array, before);
    assert_eq!(array.capacity(), capacity);
}

#[test]
fn test_hash_matches_equality() {
    use std::collections::HashSet;

    let mut set = HashSet::new();
    set.insert(array![1, 2, 3]);
    assert!(set.contains(&array![1, 2, 3]));
    assert!(!set.contains(&array![3, 2, 1]));
}

#[test]
fn test_array_is_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Array<u32>>();
    assert_send_sync::<anvil_core::IntoIter<String>>();
}

// =============================================================================
// PROPERTIES
// =============================================================================

#[derive(Clone, Debug)]
enum Op {
    Push(i32),
    Pop,
    Insert(usize, i32),
    Erase(usize),
    EraseRange(usize, usize),
    Reserve(usize),
    Shrink,
    Resize(usize),
    AppendWithin,
    PrependSlice(Vec<i32>),
    Clear,
    Reset,
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        any::<i32>().prop_map(Op::Push),
        Just(Op::Pop),
        (0usize..64, any::<i32>()).prop_map(|(i, v)| Op::Insert(i, v)),
        (0usize..64).prop_map(Op::Erase),
        (0usize..64, 0usize..64).prop_map(|(a, b)| Op::EraseRange(a, b)),
        (0usize..300).prop_map(Op::Reserve),
        Just(Op::Shrink),
        (0usize..80).prop_map(Op::Resize),
        Just(Op::AppendWithin),
        prop::collection::vec(any::<i32>(), 0..8).prop_map(Op::PrependSlice),
        Just(Op::Clear),
        Just(Op::Reset),
    ]
}

proptest! {
    #[test]
    fn matches_vec_model(ops in prop::collection::vec(arb_op(), 0..60)) {
        let mut array: Array<i32> = Array::new();
        let mut model: Vec<i32> = Vec::new();

        for op in ops {
            match op {
                Op::Push(v) => {
                    array.push(v).unwrap();
                    model.push(v);
                }
                Op::Pop => {
                    prop_assert_eq!(array.pop(), model.pop());
                }
                Op::Insert(i, v) => {
                    let result = array.insert(i, v).map(|slot| *slot);
                    if i <= model.len() {
                        prop_assert_eq!(result, Ok(v));
                        model.insert(i, v);
                    } else {
                        prop_assert!(result.is_err());
                    }
                }
                Op::Erase(i) => {
                    let result = array.erase(i);
                    if i < model.len() {
                        prop_assert!(result.is_ok());
                        model.remove(i);
                    } else {
                        prop_assert!(result.is_err());
                    }
                }
                Op::EraseRange(a, b) => {
                    let capacity = array.capacity();
                    let result = array.erase_range(a, b);
                    if a <= b && b <= model.len() {
                        prop_assert!(result.is_ok());
                        model.drain(a..b).for_each(drop);
                    } else {
                        prop_assert!(result.is_err());
                    }
                    prop_assert_eq!(array.capacity(), capacity);
                }
                Op::Reserve(n) => {
                    array.reserve(n).unwrap();
                    prop_assert!(array.capacity() >= n);
                }
                Op::Shrink => {
                    array.shrink().unwrap();
                    prop_assert_eq!(array.capacity(), array.len());
                }
                Op::Resize(n) => {
                    array.resize(n).unwrap();
                    model.resize(n, 0);
                }
                Op::AppendWithin => {
                    // Bounded so repeated doubling stays small
                    if model.len() < 512 {
                        array.append_within(..).unwrap();
                        model.extend_from_within(..);
                    }
                }
                Op::PrependSlice(items) => {
                    array.prepend_slice(&items).unwrap();
                    model.splice(0..0, items).for_each(drop);
                }
                Op::Clear => {
                    array.clear();
                    model.clear();
                }
                Op::Reset => {
                    array.reset();
                    model.clear();
                    prop_assert_eq!(array.capacity(), 0);
                }
            }

            prop_assert_eq!(array.as_slice(), model.as_slice());
            prop_assert!(array.len() <= array.capacity());
            prop_assert_eq!(array.data().is_none(), array.capacity() == 0);
        }
    }

    #[test]
    fn collect_round_trip(items in prop::collection::vec(any::<u16>(), 0..200)) {
        let array: Array<u16> = items.iter().copied().collect();
        prop_assert_eq!(array.capacity(), items.len());

        let copy: Array<u16> = array.iter().cloned().collect();
        prop_assert_eq!(&copy, &array);

        let via_cursor: Array<u16> = array.begin().iter().copied().collect();
        prop_assert_eq!(&via_cursor, &array);
    }

    #[test]
    fn shrink_is_idempotent(items in prop::collection::vec(any::<u8>(), 0..100), extra in 0usize..500) {
        let mut array: Array<u8> = items.into_iter().collect();
        array.reserve(array.len() + extra).unwrap();

        array.shrink().unwrap();
        let once = (array.len(), array.capacity());
        array.shrink().unwrap();
        prop_assert_eq!((array.len(), array.capacity()), once);
        prop_assert_eq!(array.capacity(), array.len());
    }

    #[test]
    fn insert_then_erase_restores(
        items in prop::collection::vec(any::<i64>(), 0..50),
        index in 0usize..50,
        value in any::<i64>(),
    ) {
        let mut array: Array<i64> = items.into_iter().collect();
        let before = array.clone();
        let index = index.min(array.len());

        array.insert(index, value).unwrap();
        prop_assert_eq!(array[index], value);
        array.erase(index).unwrap();
        prop_assert_eq!(array, before);
    }

    #[test]
    fn reverse_twice_is_identity(items in prop::collection::vec(any::<i32>(), 0..64)) {
        let original: Array<i32> = items.into_iter().collect();
        let mut array = original.clone();
        array.reverse();
        prop_assert_eq!(array.iter().rev().copied().collect::<Vec<_>>(), original.as_slice().to_vec());
        array.reverse();
        prop_assert_eq!(array, original);
    }
}
