use super::*;
use crate::view::{RemovableView, SizedView};

use proptest::prelude::*;
use std::collections::HashMap;

#[derive(Clone, Debug)]
enum Op {
    Put(Vec<u8>, u32),
    Remove(Vec<u8>),
    Get(Vec<u8>),
    /// Remove the n-th path (mod len) through an entry cursor
    CursorRemove(usize),
    /// Remove every value equal to this one through the value collection
    RemoveValue(u32),
    Clear,
}

fn path_strategy() -> impl Strategy<Value = Vec<u8>> + Clone {
    // A small alphabet so paths share prefixes and collide often
    prop::collection::vec(0u8..4, 0..=5)
}

fn ops_strategy() -> impl Strategy<Value = Vec<Op>> {
    let path = path_strategy();
    let op = prop_oneof![
        45 => (path.clone(), 0u32..8).prop_map(|(p, v)| Op::Put(p, v)),
        20 => path.clone().prop_map(Op::Remove),
        20 => path.clone().prop_map(Op::Get),
        8 => any::<usize>().prop_map(Op::CursorRemove),
        6 => (0u32..8).prop_map(Op::RemoveValue),
        1 => Just(Op::Clear),
    ];
    prop::collection::vec(op, 0..=400)
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        .. ProptestConfig::default()
    })]

    #[test]
    fn prop_equivalence_with_map(ops in ops_strategy()) {
        let mut t: PathTree<u8, u32> = PathTree::new();
        let mut m: HashMap<Vec<u8>, u32> = HashMap::new();

        for op in ops {
            match op {
                Op::Put(path, value) => {
                    prop_assert_eq!(t.put(&path, value), m.insert(path, value));
                }
                Op::Remove(path) => {
                    prop_assert_eq!(t.remove(&path), m.remove(&path));
                }
                Op::Get(path) => {
                    prop_assert_eq!(t.get(&path), m.get(&path));
                    prop_assert_eq!(t.contains_path(&path), m.contains_key(&path));
                }
                Op::CursorRemove(n) => {
                    if !m.is_empty() {
                        let target = n % m.len();
                        let mut entries = t.entry_set();
                        let mut cursor = entries.cursor();
                        let mut i = 0;
                        while let Some(entry) = cursor.next() {
                            if i == target {
                                let path = entry.path().to_vec();
                                let value = cursor.remove().unwrap();
                                prop_assert_eq!(m.remove(&path), Some(value));
                                prop_assert!(cursor.remove().is_err());
                            }
                            i += 1;
                        }
                        prop_assert_eq!(i, m.len() + 1);
                    }
                }
                Op::RemoveValue(value) => {
                    let changed = t.value_collection().remove_all([&value]);
                    let before = m.len();
                    m.retain(|_, v| *v != value);
                    prop_assert_eq!(changed, before != m.len());
                }
                Op::Clear => {
                    t.clear();
                    m.clear();
                }
            }

            prop_assert_eq!(t.len(), m.len());
            prop_assert_eq!(t.path_set().len(), m.len());
        }

        t.validate().unwrap();
        prop_assert!(t == m);
        prop_assert_eq!(t.iter().count(), m.len());
        prop_assert_eq!(t.to_map(), m);
    }

    #[test]
    fn prop_order_independent_equality(
        pairs in prop::collection::hash_map(path_strategy(), 0u32..100, 0..40)
    ) {
        let forward: PathTree<u8, u32> = pairs.clone().into_iter().collect();
        let mut items: Vec<_> = pairs.into_iter().collect();
        items.reverse();
        let backward: PathTree<u8, u32> = items.into_iter().collect();

        prop_assert!(forward == backward);
        prop_assert_eq!(hash_one(&forward), hash_one(&backward));
    }

    #[test]
    fn prop_get_all_matches_prefixes(
        pairs in prop::collection::hash_map(path_strategy(), 0u32..100, 0..40),
        query in path_strategy(),
    ) {
        let tree: PathTree<u8, u32> = pairs.clone().into_iter().collect();
        let expected: Vec<u32> = (0..=query.len())
            .filter_map(|n| pairs.get(&query[..n]).copied())
            .collect();
        let got: Vec<u32> = tree.get_all(&query).copied().collect();
        prop_assert_eq!(got, expected);
    }
}
