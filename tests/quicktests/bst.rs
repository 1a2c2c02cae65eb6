use search_trees::{BinarySearchTree, TreeError};

use std::collections::BTreeSet;

use crate::{do_ops, expected_string, init_logging, Op};

#[quickcheck]
fn fuzz_multiple_operations_i8(ops: Vec<Op<i8>>) -> bool {
    let mut tree = BinarySearchTree::new();
    let mut set = BTreeSet::new();

    do_ops(&ops, &mut tree, &mut set, |_| true)
}

#[quickcheck]
fn to_string_is_sorted(xs: Vec<i8>) -> bool {
    let mut tree = BinarySearchTree::new();
    for x in &xs {
        let _ = tree.insert(*x);
    }
    let set: BTreeSet<_> = xs.into_iter().collect();

    tree.to_string() == expected_string(&set)
}

#[quickcheck]
fn contains_not(xs: Vec<i8>, nots: Vec<i8>) -> bool {
    let mut tree = BinarySearchTree::new();
    for x in &xs {
        let _ = tree.insert(*x);
    }
    let added: BTreeSet<_> = xs.into_iter().collect();
    let nots: BTreeSet<_> = nots.into_iter().collect();
    let mut nots = nots.difference(&added);

    nots.all(|x| tree.find(x).unwrap_err() == TreeError::NotFound)
}

#[quickcheck]
fn duplicates_are_rejected(xs: Vec<i8>) -> bool {
    let mut tree = BinarySearchTree::new();
    let mut seen = BTreeSet::new();

    xs.into_iter().all(|x| match tree.insert(x) {
        Ok(_) => seen.insert(x),
        Err(e) => e == TreeError::DuplicateValue && !seen.insert(x),
    })
}

#[quickcheck]
fn insert_then_remove_round_trips(xs: Vec<i8>, x: i8) -> bool {
    let mut tree = BinarySearchTree::new();
    for x in xs.iter().filter(|&&y| y != x) {
        let _ = tree.insert(*x);
    }
    let before = tree.to_string();

    tree.insert(x).is_ok() && tree.remove(&x) == Ok(true) && tree.to_string() == before
}

#[test]
fn duplicate_insert_scenario() {
    init_logging();
    let mut tree = BinarySearchTree::new();
    tree.insert(10).unwrap();

    assert_eq!(tree.insert(10).unwrap_err(), TreeError::DuplicateValue);
}
