//! Property test: parent/child links stay symmetric under any sequence of
//! add / remove / set_parent / set_children operations.

use form_tree::{ElementId, FormTree};
use proptest::prelude::*;

const NODES: usize = 6;

#[derive(Debug, Clone)]
enum Op {
    Add(usize, usize),
    RemoveByRef(usize, usize),
    RemoveByName(usize, usize),
    SetParent(usize, Option<usize>),
    SetChildren(usize, Vec<usize>),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0..NODES, 0..NODES).prop_map(|(p, c)| Op::Add(p, c)),
        (0..NODES, 0..NODES).prop_map(|(p, c)| Op::RemoveByRef(p, c)),
        (0..NODES, 0..NODES).prop_map(|(p, n)| Op::RemoveByName(p, n)),
        (0..NODES, proptest::option::of(0..NODES)).prop_map(|(c, p)| Op::SetParent(c, p)),
        (0..NODES, proptest::collection::vec(0..NODES, 0..4))
            .prop_map(|(p, cs)| Op::SetChildren(p, cs)),
    ]
}

fn assert_symmetric(tree: &FormTree, ids: &[ElementId]) {
    for &id in ids {
        if let Some(parent) = tree.parent(id) {
            let count = tree.children(parent).iter().filter(|&&c| c == id).count();
            assert_eq!(count, 1, "child listed exactly once by its parent");
        }
        for &child in tree.children(id) {
            assert_eq!(tree.parent(child), Some(id));
        }
    }
    for &id in ids {
        let holders = ids
            .iter()
            .filter(|&&p| tree.children(p).contains(&id))
            .count();
        assert!(holders <= 1, "element owned by more than one parent");
    }
}

proptest! {
    #[test]
    fn links_stay_symmetric(ops in proptest::collection::vec(op(), 0..40)) {
        let mut tree = FormTree::new();
        let ids: Vec<ElementId> = (0..NODES)
            .map(|i| tree.new_element(Some(&format!("n{}", i % 3))))
            .collect();

        for op in ops {
            // Errors (cycles) leave the tree unchanged, which is what we check.
            match op {
                Op::Add(p, c) => {
                    let _ = tree.add(ids[p], &[ids[c]]);
                }
                Op::RemoveByRef(p, c) => {
                    tree.remove(ids[p], ids[c]);
                }
                Op::RemoveByName(p, n) => {
                    let name = format!("n{}", n % 3);
                    tree.remove(ids[p], name.as_str());
                }
                Op::SetParent(c, p) => {
                    let _ = tree.set_parent(ids[c], p.map(|p| ids[p]));
                }
                Op::SetChildren(p, cs) => {
                    let _ = tree.set_children(ids[p], cs.into_iter().map(|c| ids[c]).collect());
                }
            }
            assert_symmetric(&tree, &ids);
        }
    }
}
