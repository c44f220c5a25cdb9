//! Simple room-and-corridor level generator.

use glam::{ivec2, IVec2};
use rand::prelude::*;

use crate::{Cell, CellKind, Room, Terrain, HARDNESS_MAX, MAP_HEIGHT, MAP_WIDTH};

#[derive(Copy, Clone, Debug)]
pub struct MapGen {
    width: i32,
    height: i32,
    /// Number of rooms the generator tries to fit into the level.
    rooms: usize,
}

impl Default for MapGen {
    fn default() -> Self {
        MapGen {
            width: MAP_WIDTH,
            height: MAP_HEIGHT,
            rooms: 8,
        }
    }
}

impl MapGen {
    pub fn new(width: i32, height: i32) -> Self {
        MapGen {
            width,
            height,
            ..Default::default()
        }
    }

    /// Generate a random room that fits inside the level border.
    fn room(&self, rng: &mut (impl Rng + ?Sized)) -> Option<Room> {
        let w = rng.gen_range(4..=12).min(self.width - 2);
        let h = rng.gen_range(3..=8).min(self.height - 2);
        if w < 1 || h < 1 {
            return None;
        }

        let x = rng.gen_range(1..=self.width - 1 - w);
        let y = rng.gen_range(1..=self.height - 1 - h);
        Some(Room::new(ivec2(x, y), ivec2(w, h)))
    }
}

impl Distribution<Terrain> for MapGen {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Terrain {
        let mut ret = Terrain::new(self.width, self.height);

        // Random rock density everywhere inside the border.
        for p in ret.points().collect::<Vec<_>>() {
            if ret.hardness(p) != HARDNESS_MAX {
                ret.set(p, Cell::rock(rng.gen_range(1..HARDNESS_MAX)));
            }
        }

        let mut rooms: Vec<Room> = Vec::new();
        for _ in 0..self.rooms * 50 {
            if rooms.len() >= self.rooms {
                break;
            }
            let Some(room) = self.room(rng) else {
                break;
            };
            if rooms.iter().all(|r| !r.intersects(&room, 1)) {
                rooms.push(room);
            }
        }
        if rooms.len() < self.rooms {
            log::warn!(
                "MapGen::sample: fit only {} of {} rooms",
                rooms.len(),
                self.rooms
            );
        }

        for &room in &rooms {
            ret.add_room(room);
        }
        for pair in rooms.windows(2) {
            dig_corridor(&mut ret, pair[0].center(), pair[1].center());
        }

        for stairs in [CellKind::Upstairs, CellKind::Downstairs] {
            if let Some(p) = ret.random_floor(rng) {
                ret.set(p, Cell::new(stairs));
            }
        }

        ret
    }
}

/// Generate a standard size level.
pub fn generate(rng: &mut (impl Rng + ?Sized)) -> Terrain {
    MapGen::default().sample(rng)
}

/// Carve an L-shaped corridor, horizontal leg first.
fn dig_corridor(terrain: &mut Terrain, a: IVec2, b: IVec2) {
    let corner = ivec2(b.x, a.y);
    let horizontal = (a.x.min(b.x)..=a.x.max(b.x)).map(|x| ivec2(x, a.y));
    let vertical = (a.y.min(b.y)..=a.y.max(b.y)).map(|y| ivec2(corner.x, y));

    for p in horizontal.chain(vertical) {
        if !terrain.is_walkable(p) {
            terrain.set(p, Cell::new(CellKind::Corridor));
        }
    }
}
