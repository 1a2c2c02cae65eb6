use search_trees::{Color, RedBlackTree};

use std::collections::BTreeSet;

use crate::{do_ops, expected_string, init_logging, Op};

#[quickcheck]
fn fuzz_multiple_operations_i8(ops: Vec<Op<i8>>) -> bool {
    let mut tree = RedBlackTree::new();
    let mut set = BTreeSet::new();

    do_ops(&ops, &mut tree, &mut set, RedBlackTree::is_valid)
}

#[quickcheck]
fn inserts_keep_colour_rules(xs: Vec<i8>) -> bool {
    let mut tree = RedBlackTree::new();
    let mut set = BTreeSet::new();
    for x in xs {
        let _ = tree.insert(x);
        set.insert(x);

        let root_is_black = tree.root().map_or(true, |root| root.color() == Color::Black);
        if !root_is_black || !tree.is_valid() {
            return false;
        }
    }

    tree.to_string() == expected_string(&set)
        && tree.in_order_traversal(false) == tree.in_order_traversal_iterative()
}

#[test]
fn colouring_scenario() {
    init_logging();
    let mut tree = RedBlackTree::new();
    tree.insert(10).unwrap();

    assert_eq!(tree.root().unwrap().color(), Color::Black);
    assert_eq!(tree.height(), 0);

    tree.insert(15).unwrap();
    tree.insert(5).unwrap();

    assert_eq!(tree.find(&15).unwrap().color(), Color::Red);
    assert_eq!(tree.find(&5).unwrap().color(), Color::Red);
    assert_eq!(tree.to_string(), "5,10,15");
    assert_eq!(tree.height(), 1);
}
