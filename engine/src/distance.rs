//! Shortest travel costs from one cell to the whole level.

use glam::IVec2;
use util::{FibHeap, Handle, HeapError, VecExt};
use world::{Cell, Terrain, HARDNESS_MAX};

use crate::EXCAVATION;

/// Distance value of cells that can't be reached from the source.
pub const UNREACHABLE: u32 = u32::MAX;

/// Travel costs from a source cell for tunneling and walking movers.
#[derive(Clone, Default, Eq, PartialEq, Debug)]
pub struct DistanceMaps {
    width: i32,
    source: Option<IVec2>,
    tunneling: Vec<u32>,
    walking: Vec<u32>,
}

impl DistanceMaps {
    pub fn new(terrain: &Terrain, source: IVec2) -> Result<Self, HeapError> {
        let mut ret = DistanceMaps::default();
        ret.generate(terrain, source)?;
        Ok(ret)
    }

    /// Recompute both maps for a new source or changed terrain.
    ///
    /// Tunnelers can pass any cell that isn't at maximum hardness, paying
    /// more for harder rock. Walkers only pass open cells at cost 1.
    pub fn generate(
        &mut self,
        terrain: &Terrain,
        source: IVec2,
    ) -> Result<(), HeapError> {
        self.width = terrain.width();
        self.source = Some(source);
        self.tunneling = dijkstra(terrain, source, tunneling_cost)?;
        self.walking = dijkstra(terrain, source, walking_cost)?;
        log::debug!("DistanceMaps::generate: from {source}");
        Ok(())
    }

    pub fn source(&self) -> Option<IVec2> {
        self.source
    }

    fn idx(&self, p: IVec2) -> Option<usize> {
        if p.x < 0 || p.y < 0 || p.x >= self.width {
            return None;
        }
        let i = (p.y * self.width + p.x) as usize;
        (i < self.walking.len()).then_some(i)
    }

    pub fn tunneling(&self, p: IVec2) -> u32 {
        self.idx(p).map_or(UNREACHABLE, |i| self.tunneling[i])
    }

    pub fn walking(&self, p: IVec2) -> u32 {
        self.idx(p).map_or(UNREACHABLE, |i| self.walking[i])
    }

    /// Distance in the map matching the mover's abilities.
    pub fn get(&self, p: IVec2, tunnels: bool) -> u32 {
        if tunnels {
            self.tunneling(p)
        } else {
            self.walking(p)
        }
    }

    pub fn is_reachable(&self, p: IVec2, tunnels: bool) -> bool {
        self.get(p, tunnels) != UNREACHABLE
    }
}

fn tunneling_cost(cell: Cell) -> Option<u32> {
    (cell.hardness != HARDNESS_MAX)
        .then(|| cell.hardness as u32 / EXCAVATION as u32 + 1)
}

fn walking_cost(cell: Cell) -> Option<u32> {
    (cell.hardness == 0).then_some(1)
}

/// Dijkstra's algorithm over the 8-connected grid.
///
/// `cost` gives the price of entering a cell or `None` if it can't be
/// entered.
fn dijkstra(
    terrain: &Terrain,
    source: IVec2,
    cost: impl Fn(Cell) -> Option<u32>,
) -> Result<Vec<u32>, HeapError> {
    let mut dist = vec![UNREACHABLE; terrain.len()];
    let Some(s) = terrain.idx(source) else {
        return Ok(dist);
    };

    let mut handles: Vec<Option<Handle>> = vec![None; terrain.len()];
    let mut queue = FibHeap::new();
    dist[s] = 0;
    handles[s] = Some(queue.insert(0, source)?);

    while let Some((d, p)) = queue.pop_min()? {
        let Some(i) = terrain.idx(p) else { continue };
        handles[i] = None;
        if d != dist[i] {
            // Duplicate entry superseded by a shorter path.
            continue;
        }

        for n in p.ns_8() {
            let Some(j) = terrain.idx(n) else { continue };
            let Some(step) = terrain.cell(n).and_then(&cost) else {
                continue;
            };
            let alt = d.saturating_add(step);
            if alt >= dist[j] {
                continue;
            }

            dist[j] = alt;
            match handles[j] {
                Some(h) if queue.contains(h) => {
                    queue.decrease_key(h, alt)?;
                }
                _ => handles[j] = Some(queue.insert(alt, n)?),
            }
        }
    }

    Ok(dist)
}
