//! Monsters figuring out where to go on their own.

use glam::IVec2;
use rand::{seq::SliceRandom, Rng};
use util::{HashSet, VecExt, DIR_8};
use world::Terrain;

use crate::{Caps, DistanceMaps, Monster, ERRATIC_ATTEMPTS};

/// What a monster knows about the world when deciding its move.
pub struct Perception<'a> {
    pub terrain: &'a Terrain,
    /// Distance maps with the player as the source.
    pub maps: &'a DistanceMaps,
    pub player: IVec2,
    /// Corridor cells connected to the player's cell, empty if the player
    /// isn't in a corridor.
    pub player_corridor: &'a HashSet<IVec2>,
}

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct Decision {
    /// Cell the monster wants to move into, its current cell to stay put.
    pub target: IVec2,
    /// Updated memory of the player's location.
    pub memory: Option<IVec2>,
}

impl Monster {
    /// Decide where a monster at `pos` moves next.
    pub fn decide(
        &self,
        pos: IVec2,
        view: &Perception,
        rng: &mut (impl Rng + ?Sized),
    ) -> Decision {
        let stay = Decision {
            target: pos,
            memory: self.memory,
        };

        if self.caps.contains(Caps::ERRATIC) && rng.gen_bool(0.5) {
            for _ in 0..ERRATIC_ATTEMPTS {
                let Some(&dir) = DIR_8.choose(rng) else { break };
                if self.can_enter(view.terrain, pos + dir) {
                    return Decision {
                        target: pos + dir,
                        ..stay
                    };
                }
            }
            return stay;
        }

        if self.is_aware(pos, view) {
            let target = if self.caps.contains(Caps::INTELLIGENT) {
                self.downhill(pos, view.maps).unwrap_or(pos)
            } else {
                self.straight_step(pos, view.player, view.terrain)
                    .unwrap_or(pos)
            };
            return Decision {
                target,
                memory: Some(view.player),
            };
        }

        match self.memory {
            Some(goal) if goal == pos => Decision {
                target: pos,
                memory: None,
            },
            Some(goal) => Decision {
                target: self
                    .straight_step(pos, goal, view.terrain)
                    .unwrap_or(pos),
                memory: Some(goal),
            },
            None => stay,
        }
    }

    /// Monster currently perceives the player.
    pub fn is_aware(&self, pos: IVec2, view: &Perception) -> bool {
        self.caps.contains(Caps::TELEPATHIC)
            || view.terrain.same_room(pos, view.player)
            || view.player_corridor.contains(&pos)
    }

    /// Neighbor with the smallest distance if it's closer than `pos`.
    ///
    /// The first one in `DIR_8` order wins ties.
    fn downhill(&self, pos: IVec2, maps: &DistanceMaps) -> Option<IVec2> {
        let tunnels = self.tunnels();
        let mut best = None;
        let mut best_dist = maps.get(pos, tunnels);
        for n in pos.ns_8() {
            let d = maps.get(n, tunnels);
            if d < best_dist {
                best = Some(n);
                best_dist = d;
            }
        }
        best
    }

    /// Step towards the goal ignoring the terrain in between.
    ///
    /// `None` if the monster can't enter the cell of the step.
    fn straight_step(
        &self,
        pos: IVec2,
        goal: IVec2,
        terrain: &Terrain,
    ) -> Option<IVec2> {
        let next = pos + pos.dir8_towards(&goal);
        (next != pos && self.can_enter(terrain, next)).then_some(next)
    }
}
