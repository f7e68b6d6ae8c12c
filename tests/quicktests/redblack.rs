use rbtree::{Error, Tree};

use std::collections::{BTreeSet, HashSet};

/// Inserts every key into a fresh tree, ignoring duplicates.
fn build(xs: &[i8]) -> Tree {
    let mut tree = Tree::new();
    for x in xs {
        let _ = tree.insert(i32::from(*x));
    }
    tree
}

/// The keys of an in-order string, in order.
fn infix_keys(tree: &Tree) -> Vec<i32> {
    tree.to_infix_string()
        .split_whitespace()
        .map(|node| node[1..].parse().unwrap())
        .collect()
}

quickcheck::quickcheck! {
    fn contains(xs: Vec<i8>) -> bool {
        let tree = build(&xs);

        xs.iter().all(|x| tree.contains(i32::from(*x)))
    }
}

quickcheck::quickcheck! {
    fn contains_not(xs: Vec<i8>, nots: Vec<i8>) -> bool {
        let tree = build(&xs);
        let added: HashSet<_> = xs.into_iter().collect();
        let nots: HashSet<_> = nots.into_iter().collect();
        let mut nots = nots.difference(&added);

        nots.all(|x| !tree.contains(i32::from(*x)))
    }
}

quickcheck::quickcheck! {
    fn len_counts_distinct_keys(xs: Vec<i8>) -> bool {
        let tree = build(&xs);
        let distinct: HashSet<_> = xs.iter().collect();

        tree.len() == distinct.len()
    }
}

quickcheck::quickcheck! {
    fn duplicates_are_rejected(xs: Vec<i8>) -> bool {
        let mut tree = build(&xs);
        let before = tree.to_prefix_string();
        let len = tree.len();

        xs.iter().all(|x| tree.insert(i32::from(*x)) == Err(Error::DuplicateKey(i32::from(*x))))
            && tree.to_prefix_string() == before
            && tree.len() == len
    }
}

quickcheck::quickcheck! {
    fn infix_is_sorted(xs: Vec<i32>) -> bool {
        let mut tree = Tree::new();
        for x in &xs {
            let _ = tree.insert(*x);
        }
        let expected: Vec<_> = xs.into_iter().collect::<BTreeSet<_>>().into_iter().collect();

        infix_keys(&tree) == expected && tree.iter().eq(expected.iter().copied())
    }
}

quickcheck::quickcheck! {
    fn min_and_max(xs: Vec<i8>) -> bool {
        let tree = build(&xs);
        let expected_min = xs.iter().min().map(|x| i32::from(*x)).ok_or(Error::EmptyTree);
        let expected_max = xs.iter().max().map(|x| i32::from(*x)).ok_or(Error::EmptyTree);

        tree.min() == expected_min && tree.max() == expected_max
    }
}

quickcheck::quickcheck! {
    fn root_is_black(xs: Vec<i8>) -> bool {
        let tree = build(&xs);

        tree.is_empty() || tree.to_prefix_string().starts_with(" B")
    }
}

quickcheck::quickcheck! {
    fn copies_are_independent(xs: Vec<i8>, ys: Vec<i8>, zs: Vec<i8>) -> bool {
        let mut original = build(&xs);
        let mut copy = original.clone();
        let prefix = original.to_prefix_string();
        let postfix = original.to_postfix_string();
        let len = original.len();

        // Growing the copy leaves the original alone.
        for y in ys {
            let _ = copy.insert(i32::from(y));
        }
        let copy_unchanged = original.to_prefix_string() == prefix
            && original.to_postfix_string() == postfix
            && original.len() == len;

        // And growing the original leaves the copy alone.
        let copy_prefix = copy.to_prefix_string();
        let copy_postfix = copy.to_postfix_string();
        let copy_len = copy.len();
        for z in zs {
            let _ = original.insert(i32::from(z));
        }

        copy_unchanged
            && copy.to_prefix_string() == copy_prefix
            && copy.to_postfix_string() == copy_postfix
            && copy.len() == copy_len
    }
}
