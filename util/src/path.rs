use std::{collections::VecDeque, hash::Hash};

use crate::HashSet;

/// Generate an unweighted shortest paths map according to a neighbors
/// function.
///
/// Yields every node reachable from `starts` with its hop count, in
/// non-decreasing hop count order. Useful as a flood fill when the distances
/// don't matter.
pub fn dijkstra_map<'a, T, I>(
    mut neighbors: impl FnMut(&T) -> I + 'a,
    starts: impl IntoIterator<Item = T>,
) -> impl Iterator<Item = (T, usize)> + 'a
where
    T: Clone + Eq + Hash + 'a,
    I: IntoIterator<Item = T>,
{
    let mut seen = HashSet::default();
    let mut edge = VecDeque::new();
    for s in starts {
        if seen.insert(s.clone()) {
            edge.push_back((s, 0));
        }
    }

    std::iter::from_fn(move || {
        let (node, len) = edge.pop_front()?;
        for n in neighbors(&node) {
            if seen.insert(n.clone()) {
                edge.push_back((n, len + 1));
            }
        }
        Some((node, len))
    })
}

#[cfg(test)]
mod test {
    use glam::{ivec2, IVec2};

    use super::*;
    use crate::{HashMap, VecExt};

    #[test]
    fn hop_counts() {
        let inside = |p: &IVec2| p.x.abs() <= 3 && p.y.abs() <= 3;
        let map: HashMap<IVec2, usize> = dijkstra_map(
            |p: &IVec2| p.ns_8().filter(inside).collect::<Vec<_>>(),
            [IVec2::ZERO],
        )
        .collect();

        assert_eq!(map.len(), 49);
        assert_eq!(map[&IVec2::ZERO], 0);
        assert_eq!(map[&ivec2(1, -1)], 1);
        assert_eq!(map[&ivec2(3, -2)], 3);
    }

    #[test]
    fn duplicate_starts() {
        let n = dijkstra_map(|_: &i32| Vec::new(), [1, 1, 2]).count();
        assert_eq!(n, 2);
    }
}
