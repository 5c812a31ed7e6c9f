use induced_trees::collections::Frontier;
use induced_trees::graph::{Dimensions, Lattice, VertexId};
use induced_trees::search::{restore, update, ActionLog};
use induced_trees::subtree::Subtree;
use petgraph::graphmap::UnGraphMap;
use petgraph::visit::Dfs;
use proptest::prelude::*;

fn cube3() -> Lattice {
    Lattice::new(Dimensions::new(3, 3, 3).unwrap())
}

/// Checks the induced subgraph with petgraph: connected and acyclic.
fn is_induced_tree(g: &Lattice, s: &Subtree) -> bool {
    let mut graph = UnGraphMap::<VertexId, ()>::new();
    for v in s.induced() {
        graph.add_node(v);
        for &n in g.neighbors(v) {
            if s.contains(n) {
                graph.add_edge(v, n, ());
            }
        }
    }
    if graph.node_count() == 0 {
        return true;
    }
    if petgraph::algo::is_cyclic_undirected(&graph) {
        return false;
    }
    let mut dfs = Dfs::new(&graph, s.root());
    let mut reached = 0;
    while dfs.next(&graph).is_some() {
        reached += 1;
    }
    reached == graph.node_count()
}

fn assert_bookkeeping(g: &Lattice, s: &Subtree) {
    for v in 0..g.len() as VertexId {
        let induced_neighbours = g.neighbors(v).iter().filter(|&&n| s.contains(n)).count();
        assert_eq!(s.degree(v) as usize, induced_neighbours, "degree of {v}");
    }
    assert_eq!(s.len(), s.induced().count());
}

/// Vertices a canonical search could try next: above the root, not induced,
/// with exactly one induced neighbour.
fn candidates(g: &Lattice, s: &Subtree) -> Vec<VertexId> {
    (s.root() + 1..g.len() as VertexId)
        .filter(|&v| !s.contains(v) && s.degree(v) == 1)
        .collect()
}

#[derive(Debug, Clone)]
enum Step {
    Grow(prop::sample::Index),
    Shrink,
}

fn step() -> impl Strategy<Value = Step> {
    prop_oneof![
        3 => any::<prop::sample::Index>().prop_map(Step::Grow),
        1 => Just(Step::Shrink),
    ]
}

proptest! {
    #[test]
    fn test_growth_keeps_tree_and_degrees(
        root in 0u32..27,
        steps in proptest::collection::vec(step(), 1..60),
    ) {
        let g = cube3();
        let mut s = Subtree::new(&g, root);
        let mut added: Vec<(VertexId, Subtree)> = Vec::new();

        for step in steps {
            match step {
                Step::Grow(pick) => {
                    let options = candidates(&g, &s);
                    if options.is_empty() {
                        continue;
                    }
                    let v = options[pick.index(options.len())];
                    let before = s.clone();
                    if s.add(&g, v) {
                        added.push((v, before));
                    } else {
                        prop_assert_eq!(&s, &before, "failed add of {} left a trace", v);
                    }
                }
                Step::Shrink => {
                    if let Some((v, before)) = added.pop() {
                        s.rem(&g, v);
                        prop_assert_eq!(&s, &before, "rem({}) did not restore state", v);
                    }
                }
            }
            assert_bookkeeping(&g, &s);
            prop_assert!(is_induced_tree(&g, &s));
            for v in s.induced() {
                prop_assert!(s.is_locally_valid(&g, v));
            }
        }
    }

    #[test]
    fn test_update_then_restore_is_identity(
        root in 0u32..27,
        picks in proptest::collection::vec(any::<prop::sample::Index>(), 1..20),
    ) {
        let g = cube3();
        let mut s = Subtree::new(&g, root);
        let mut frontier = Frontier::with_universe(g.len());
        let mut log = ActionLog::new();
        log.barrier();
        update(&g, &mut s, &mut frontier, root, &mut log);

        for pick in picks {
            if frontier.is_empty() {
                break;
            }
            let options: Vec<_> = frontier.iter().collect();
            let x = options[pick.index(options.len())];
            prop_assert!(frontier.remove(x));
            if !s.add(&g, x) {
                continue;
            }

            let frontier_before: Vec<_> = frontier.iter().collect();
            let excluded_before = s.num_excluded();
            let log_before = log.len();

            log.barrier();
            update(&g, &mut s, &mut frontier, x, &mut log);
            for v in frontier.iter() {
                prop_assert!(v > root && !s.contains(v) && s.degree(v) == 1);
            }
            restore(&mut s, &mut frontier, &mut log);

            prop_assert_eq!(frontier.iter().collect::<Vec<_>>(), frontier_before);
            prop_assert_eq!(s.num_excluded(), excluded_before);
            prop_assert_eq!(log.len(), log_before);

            // Keep x and descend, as the search would.
            log.barrier();
            update(&g, &mut s, &mut frontier, x, &mut log);
        }
        prop_assert!(is_induced_tree(&g, &s));
    }
}
