//! Black-box property tests shared by every tree variant.

#[macro_use(quickcheck)]
extern crate quickcheck_macros;

mod avl;
mod bst;
mod red_black;

use log::LevelFilter;
use quickcheck::{Arbitrary, Gen};
use search_trees::{Rebalance, Tree};
use simplelog::{Config, TestLogger};

use std::collections::BTreeSet;

/// An enum for the various kinds of "things" to do to
/// binary search trees in a quicktest.
#[derive(Copy, Clone, Debug)]
pub enum Op<T> {
    /// Insert the value into the data structure
    Insert(T),
    /// Remove the value from the data structure
    Remove(T),
    /// Compare iterators
    Iter,
}

impl<T> Arbitrary for Op<T>
where
    T: Arbitrary,
{
    fn arbitrary(g: &mut Gen) -> Self {
        match g.choose(&[0, 0, 1, 2]).unwrap() {
            0 => Op::Insert(T::arbitrary(g)),
            1 => Op::Remove(T::arbitrary(g)),
            2 => Op::Iter,
            _ => unreachable!(),
        }
    }
}

/// Applies a set of operations to a tree and a set, calling `check` after each one.
/// This way we can ensure that after a random smattering of inserts
/// and removes we have the same values in both.
pub fn do_ops<S>(
    ops: &[Op<i8>],
    tree: &mut Tree<i8, S>,
    set: &mut BTreeSet<i8>,
    check: impl Fn(&Tree<i8, S>) -> bool,
) -> bool
where
    S: Rebalance,
{
    for op in ops {
        let agrees = match op {
            Op::Insert(x) => tree.insert(*x).is_ok() == set.insert(*x),
            Op::Remove(x) => tree.remove(x) == Ok(set.remove(x)),
            Op::Iter => tree.iter().eq(set.iter()),
        };
        if !agrees || !check(tree) {
            return false;
        }
    }

    tree.is_search_tree() && tree.iter().eq(set.iter())
}

/// The values as the tree should print them: ascending and comma separated.
pub fn expected_string(set: &BTreeSet<i8>) -> String {
    set.iter()
        .map(|x| x.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

/// Routes the crate's rotation and recolouring traces into the test output.
/// Only the first call in a test binary installs the logger.
pub fn init_logging() {
    let _ = TestLogger::init(LevelFilter::Trace, Config::default());
}
