use search_trees::{AvlTree, Tree};

use std::collections::BTreeSet;

use crate::{do_ops, init_logging, Op};

fn balanced<S>(tree: &Tree<i8, S>) -> bool {
    tree.root().map_or(true, |root| root.is_balanced())
}

#[quickcheck]
fn fuzz_multiple_operations_i8(ops: Vec<Op<i8>>) -> bool {
    let mut tree = AvlTree::new();
    let mut set = BTreeSet::new();

    do_ops(&ops, &mut tree, &mut set, balanced)
}

#[quickcheck]
fn traversals_match(xs: Vec<i8>, removes: Vec<i8>) -> bool {
    let mut tree = AvlTree::new();
    for x in &xs {
        let _ = tree.insert(*x);
    }
    for x in &removes {
        let _ = tree.remove(x);
    }

    let mut reversed = tree.in_order_traversal(true);
    reversed.reverse();
    tree.in_order_traversal(false) == tree.in_order_traversal_iterative()
        && tree.in_order_traversal(false) == reversed
}

#[quickcheck]
fn insert_then_remove_round_trips(xs: Vec<i8>, x: i8) -> bool {
    let mut tree = AvlTree::new();
    for x in xs.iter().filter(|&&y| y != x) {
        let _ = tree.insert(*x);
    }
    let before = tree.to_string();

    tree.insert(x).is_ok()
        && tree.remove(&x) == Ok(true)
        && tree.to_string() == before
        && balanced(&tree)
}

#[test]
fn left_left_scenario() {
    init_logging();
    let mut tree = AvlTree::new();
    for x in [4, 3, 2] {
        tree.insert(x).unwrap();
    }

    assert_eq!(tree.to_string(), "2,3,4");
    let root = tree.root().unwrap();
    assert_eq!(root.value(), Some(&3));
    assert_eq!(root.height(), 1);
}

#[test]
fn complex_scenario() {
    init_logging();
    let mut tree = AvlTree::new();
    for x in [30, 20, 40, 10, 25, 5] {
        tree.insert(x).unwrap();
    }

    let root = tree.root().unwrap();
    assert_eq!(root.value(), Some(&20));
    assert_eq!(root.left().unwrap().value(), Some(&10));
    assert_eq!(root.right().unwrap().value(), Some(&30));
    assert_eq!(root.height(), 2);
}

#[test]
fn remove_not_found_scenario() {
    init_logging();
    let mut tree = AvlTree::new();
    tree.insert(15).unwrap();

    assert_eq!(tree.remove(&100), Ok(false));
    assert_eq!(tree.to_string(), "15");
}
